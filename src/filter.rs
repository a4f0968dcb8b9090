//! Filter predicates and their boolean composition.
//!
//! A [`Clause`] is a single comparison such as `u.name == "Neel"`. Clauses and
//! already built [`Junction`]s are combined with `&` (AND) and `|` (OR), or with
//! the equivalent `and`/`or` methods:
//!
//! ```
//! use aqlclad::filter::{clause, filter};
//! let adult = clause("u.age").ge(18);
//! let named = clause("u.name").eq("Neel");
//! let either = clause("u.vip").eq(true) | (&adult & &named);
//! assert_eq!(either.to_string(), "((u.age >= 18 AND u.name == \"Neel\") OR u.vip == true)");
//! assert_eq!(filter(&adult).to_string(), "FILTER u.age >= 18");
//! ```
//!
//! Combining never touches its operands: every combination owns fresh copies,
//! so a built clause or junction can be reused in any number of trees.

use std::fmt;
use std::ops::{BitAnd, BitOr};

use crate::datatype::Tagged;
use crate::error::{AqlcladError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Like,
    In,
    NotIn,
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
}

impl Operator {
    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Like => "LIKE",
            Operator::In => "IN",
            Operator::NotIn => "NOT IN",
            Operator::Eq => "==",
            Operator::Ne => "!=",
            Operator::Lt => "<",
            Operator::Gt => ">",
            Operator::Le => "<=",
            Operator::Ge => ">=",
        }
    }
}
impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// The left hand side of a predicate, waiting for its comparison.
#[derive(Debug, Clone)]
pub struct Field {
    key: String,
}

pub fn clause(key: impl Into<String>) -> Field {
    Field::new(key)
}

impl Field {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
    pub fn key(&self) -> &str {
        &self.key
    }
    pub fn compare(&self, operator: Operator, value: impl Into<Tagged>) -> Clause {
        Clause {
            key: self.key.clone(),
            operator,
            value: value.into(),
        }
    }
    pub fn like(&self, value: impl Into<Tagged>) -> Clause {
        self.compare(Operator::Like, value)
    }
    pub fn in_(&self, value: impl Into<Tagged>) -> Clause {
        self.compare(Operator::In, value)
    }
    pub fn not_in(&self, value: impl Into<Tagged>) -> Clause {
        self.compare(Operator::NotIn, value)
    }
    pub fn eq(&self, value: impl Into<Tagged>) -> Clause {
        self.compare(Operator::Eq, value)
    }
    pub fn ne(&self, value: impl Into<Tagged>) -> Clause {
        self.compare(Operator::Ne, value)
    }
    pub fn lt(&self, value: impl Into<Tagged>) -> Clause {
        self.compare(Operator::Lt, value)
    }
    pub fn gt(&self, value: impl Into<Tagged>) -> Clause {
        self.compare(Operator::Gt, value)
    }
    pub fn le(&self, value: impl Into<Tagged>) -> Clause {
        self.compare(Operator::Le, value)
    }
    pub fn ge(&self, value: impl Into<Tagged>) -> Clause {
        self.compare(Operator::Ge, value)
    }
}

/// A single comparison predicate `key operator value`.
#[derive(Debug, Clone, PartialEq)]
pub struct Clause {
    key: String,
    operator: Operator,
    value: Tagged,
}

impl Clause {
    pub fn key(&self) -> &str {
        &self.key
    }
    pub fn operator(&self) -> Operator {
        self.operator
    }
    pub fn value(&self) -> &Tagged {
        &self.value
    }
    pub fn is_valid(&self) -> bool {
        !self.key.is_empty() && self.value.is_valid()
    }
    pub fn validate(&self) -> Result<()> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(AqlcladError::MalformedPredicate {
                message: format!("empty key or invalid value in `{}`", self),
            })
        }
    }
}
impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {} {}", self.key, self.operator, self.value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    And,
    Or,
}
impl fmt::Display for Combinator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Combinator::And => f.write_str("AND"),
            Combinator::Or => f.write_str("OR"),
        }
    }
}

/// Boolean combination of two operands. The variant records the operand shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum Junction {
    Leaf {
        op: Combinator,
        left: Clause,
        right: Clause,
    },
    /// A junction combined with a clause; the junction is always kept on the left.
    Mixed {
        op: Combinator,
        left: Box<Junction>,
        right: Clause,
    },
    Compound {
        op: Combinator,
        left: Box<Junction>,
        right: Box<Junction>,
    },
}

impl Junction {
    pub fn op(&self) -> Combinator {
        match self {
            Junction::Leaf { op, .. } | Junction::Mixed { op, .. } | Junction::Compound { op, .. } => *op,
        }
    }
    pub fn validate(&self) -> Result<()> {
        match self {
            Junction::Leaf { left, right, .. } => {
                left.validate()?;
                right.validate()
            }
            Junction::Mixed { left, right, .. } => {
                left.validate()?;
                right.validate()
            }
            Junction::Compound { left, right, .. } => {
                left.validate()?;
                right.validate()
            }
        }
    }
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
    pub fn and(&self, other: impl Into<Condition>) -> Junction {
        Condition::combine(Combinator::And, self, other)
    }
    pub fn or(&self, other: impl Into<Condition>) -> Junction {
        Condition::combine(Combinator::Or, self, other)
    }
    // a leaf prints without parentheses on its own but not inside another junction
    fn fmt_nested(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Junction::Leaf { .. } => write!(f, "({})", self),
            _ => write!(f, "{}", self),
        }
    }
}

impl fmt::Display for Junction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Junction::Leaf { op, left, right } => write!(f, "{} {} {}", left, op, right),
            Junction::Mixed { op, left, right } => {
                f.write_str("(")?;
                left.fmt_nested(f)?;
                write!(f, " {} {})", op, right)
            }
            Junction::Compound { op, left, right } => {
                f.write_str("(")?;
                left.fmt_nested(f)?;
                write!(f, " {} ", op)?;
                right.fmt_nested(f)?;
                f.write_str(")")
            }
        }
    }
}

/// Either operand kind accepted by the combinators and by [`filter`].
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Clause(Clause),
    Junction(Junction),
}

impl Condition {
    /// Picks the junction shape from the operand kinds.
    pub fn combine(op: Combinator, left: impl Into<Condition>, right: impl Into<Condition>) -> Junction {
        match (left.into(), right.into()) {
            (Condition::Clause(left), Condition::Clause(right)) => Junction::Leaf { op, left, right },
            (Condition::Junction(junction), Condition::Clause(clause))
            | (Condition::Clause(clause), Condition::Junction(junction)) => Junction::Mixed {
                op,
                left: Box::new(junction),
                right: clause,
            },
            (Condition::Junction(left), Condition::Junction(right)) => Junction::Compound {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
        }
    }
    pub fn validate(&self) -> Result<()> {
        match self {
            Condition::Clause(c) => c.validate(),
            Condition::Junction(j) => j.validate(),
        }
    }
}
impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Condition::Clause(c) => write!(f, "{}", c),
            Condition::Junction(j) => write!(f, "{}", j),
        }
    }
}

impl From<Clause> for Condition {
    fn from(c: Clause) -> Self {
        Condition::Clause(c)
    }
}
impl From<&Clause> for Condition {
    fn from(c: &Clause) -> Self {
        Condition::Clause(c.clone())
    }
}
impl From<Junction> for Condition {
    fn from(j: Junction) -> Self {
        Condition::Junction(j)
    }
}
impl From<&Junction> for Condition {
    fn from(j: &Junction) -> Self {
        Condition::Junction(j.clone())
    }
}

impl Clause {
    pub fn and(&self, other: impl Into<Condition>) -> Junction {
        Condition::combine(Combinator::And, self, other)
    }
    pub fn or(&self, other: impl Into<Condition>) -> Junction {
        Condition::combine(Combinator::Or, self, other)
    }
}

// `&&` and `||` cannot be overloaded, so `&` and `|` stand in for them
macro_rules! combinators {
    ($($t:ty),*) => {
        $(
            impl<R: Into<Condition>> BitAnd<R> for $t {
                type Output = Junction;
                fn bitand(self, right: R) -> Junction {
                    Condition::combine(Combinator::And, self, right)
                }
            }
            impl<R: Into<Condition>> BitOr<R> for $t {
                type Output = Junction;
                fn bitor(self, right: R) -> Junction {
                    Condition::combine(Combinator::Or, self, right)
                }
            }
        )*
    };
}
combinators!(Clause, &Clause, Junction, &Junction);

/// A `FILTER` line holding a clause or junction.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    condition: Condition,
}

pub fn filter(condition: impl Into<Condition>) -> Filter {
    Filter {
        condition: condition.into(),
    }
}

impl Filter {
    pub fn condition(&self) -> &Condition {
        &self.condition
    }
    pub fn validate(&self) -> Result<()> {
        self.condition.validate()
    }
}
impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "FILTER {}", self.condition)
    }
}
