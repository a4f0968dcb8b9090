//! Document patches written as `{key: value, ...}` literals.
//!
//! ```
//! use aqlclad::assign::assign;
//! let patch = assign("x", 1).assign("y", "s");
//! assert_eq!(patch.to_string(), "{x: 1, y: \"s\"}");
//! ```

use std::fmt;

use crate::datatype::Tagged;

/// Ordered key/value pairs, emitted in the order they were assigned.
/// Duplicate keys are kept and emitted twice.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Assignment {
    pairs: Vec<(String, Tagged)>,
}

pub fn assign(key: impl Into<String>, value: impl Into<Tagged>) -> Assignment {
    Assignment::default().assign(key, value)
}

impl Assignment {
    pub fn assign(mut self, key: impl Into<String>, value: impl Into<Tagged>) -> Self {
        self.pairs.push((key.into(), value.into()));
        self
    }
    pub fn len(&self) -> usize {
        self.pairs.len()
    }
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Tagged)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("{")?;
        for (i, (key, value)) in self.pairs.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", key, value)?;
        }
        f.write_str("}")
    }
}
