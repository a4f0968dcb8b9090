// used to carry numbers in their canonical textual form and structured payloads
use serde_json::{Number, Value};

// used to print out the literal form of a value
use std::fmt;

/// A literal together with the tag deciding how it is quoted in query text.
///
/// The tag is fixed when the value is constructed, so values whose kind is
/// only known at runtime (e.g. fields of a `serde_json::Value`) are handled
/// the same way as statically typed ones.
#[derive(Debug, Clone, PartialEq)]
pub enum Tagged {
    Text(String),
    Number(Number),
    Bool(bool),
    Null,
    /// A bare expression or variable reference, emitted as is.
    Expr(String),
    /// Arrays and objects, emitted as compact JSON.
    Json(Value),
    /// NaN or an infinity. Printable, but rejected by predicate validation.
    NonFinite(f64),
}

impl Tagged {
    pub fn text(s: impl Into<String>) -> Self {
        Tagged::Text(s.into())
    }
    pub fn expr(s: impl Into<String>) -> Self {
        Tagged::Expr(s.into())
    }
    pub fn data_type(&self) -> &'static str {
        match self {
            Tagged::Text(_) => "Text",
            Tagged::Number(_) => "Number",
            Tagged::Bool(_) => "Bool",
            Tagged::Null => "Null",
            Tagged::Expr(_) => "Expr",
            Tagged::Json(_) => "Json",
            Tagged::NonFinite(_) => "NonFinite",
        }
    }
    pub fn is_quoted(&self) -> bool {
        matches!(self, Tagged::Text(_))
    }
    /// Text and expressions can be empty; everything else always has a textual form.
    pub fn is_empty(&self) -> bool {
        match self {
            Tagged::Text(s) | Tagged::Expr(s) => s.is_empty(),
            _ => false,
        }
    }
    /// False for empty text or expressions and for non-finite numbers.
    pub fn is_valid(&self) -> bool {
        !self.is_empty() && !matches!(self, Tagged::NonFinite(_))
    }
    /// The textual form without quotes, used for With/Options payloads
    /// where a string names a variable or keyword.
    pub fn bare(&self) -> String {
        match self {
            Tagged::Text(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for Tagged {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Tagged::Text(s) => write_quoted(f, s),
            Tagged::Number(n) => write!(f, "{}", n),
            Tagged::Bool(b) => write!(f, "{}", b),
            Tagged::Null => write!(f, "null"),
            Tagged::Expr(s) => write!(f, "{}", s),
            Tagged::Json(v) => write!(f, "{}", v),
            Tagged::NonFinite(n) => write!(f, "{}", n),
        }
    }
}

/// Writes `s` as a double-quoted literal with quotes, backslashes and control
/// characters escaped, so text can never close the literal early.
pub(crate) fn write_quoted(f: &mut fmt::Formatter, s: &str) -> fmt::Result {
    let quoted = serde_json::to_string(s).map_err(|_| fmt::Error)?;
    f.write_str(&quoted)
}

// ------------- Conversions --------------
impl From<&str> for Tagged {
    fn from(s: &str) -> Self {
        Tagged::Text(s.to_owned())
    }
}
impl From<String> for Tagged {
    fn from(s: String) -> Self {
        Tagged::Text(s)
    }
}
impl From<&String> for Tagged {
    fn from(s: &String) -> Self {
        Tagged::Text(s.clone())
    }
}
impl From<bool> for Tagged {
    fn from(b: bool) -> Self {
        Tagged::Bool(b)
    }
}
impl From<()> for Tagged {
    fn from(_: ()) -> Self {
        Tagged::Null
    }
}
impl<T: Into<Tagged>> From<Option<T>> for Tagged {
    fn from(o: Option<T>) -> Self {
        o.map_or(Tagged::Null, Into::into)
    }
}

macro_rules! tagged_from_integer {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Tagged {
                fn from(n: $t) -> Self {
                    Tagged::Number(Number::from(n))
                }
            }
        )*
    };
}
tagged_from_integer!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl From<f64> for Tagged {
    fn from(n: f64) -> Self {
        // NaN and infinities have no literal form
        Number::from_f64(n).map_or(Tagged::NonFinite(n), Tagged::Number)
    }
}
impl From<f32> for Tagged {
    fn from(n: f32) -> Self {
        Tagged::from(n as f64)
    }
}

impl From<Value> for Tagged {
    fn from(v: Value) -> Self {
        match v {
            Value::Null => Tagged::Null,
            Value::Bool(b) => Tagged::Bool(b),
            Value::Number(n) => Tagged::Number(n),
            Value::String(s) => Tagged::Text(s),
            structured => Tagged::Json(structured),
        }
    }
}
impl From<&Value> for Tagged {
    fn from(v: &Value) -> Self {
        Tagged::from(v.clone())
    }
}
