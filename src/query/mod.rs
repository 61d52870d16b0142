//! Path-query expressions over nested mapping/sequence data
//!
//! This module is the expression-evaluation collaborator for the study
//! model: participants and studies shape their records as a nested
//! `serde_json::Value` tree and hand that tree here together with a
//! [`PathExpr`]. Evaluation returns the matched values in document order.
//!
//! Queries are structured expressions built through the helper methods on
//! [`PathExpr`] (there is no string syntax to parse):
//!
//! ```
//! use biostudy::query::{PathExpr, gt};
//!
//! // every "weight" record above 70, projected to its value
//! let expr = PathExpr::new()
//!     .any()
//!     .any()
//!     .key("weight")
//!     .any()
//!     .filter(gt("value", 70.0))
//!     .select("value");
//! ```

mod error;
mod eval;

pub use error::{QueryError, QueryResult};
pub use eval::execute;

/// A literal value a record field can be compared against
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// Boolean value
    Bool(bool),
    /// Integer value
    Int(i64),
    /// Floating point value
    Float(f64),
    /// String value
    Str(String),
    /// Null value
    Null,
}

impl From<bool> for Literal {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Literal {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for Literal {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for Literal {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

/// One step along a path through the data tree
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Descend into the value under a mapping key; a missing key matches nothing
    Key(String),

    /// Take one element of a sequence; out-of-range matches nothing
    Index(usize),

    /// Take every value of a mapping or every element of a sequence
    Any,

    /// Descend into the sequence under a mapping key and take every element.
    /// Shorthand for `Key(name)` followed by `Any`.
    Values(String),
}

/// A predicate evaluated against a record-shaped (mapping) node
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Field equals a literal value
    Eq(String, Literal),

    /// Field does not equal a literal value
    NotEq(String, Literal),

    /// Field is numerically greater than a literal value
    Gt(String, Literal),

    /// Field is numerically greater than or equal to a literal value
    GtEq(String, Literal),

    /// Field is numerically less than a literal value
    Lt(String, Literal),

    /// Field is numerically less than or equal to a literal value
    LtEq(String, Literal),

    /// Field is present and non-null
    Has(String),

    /// Logical AND of predicates
    And(Vec<Predicate>),

    /// Logical OR of predicates
    Or(Vec<Predicate>),

    /// Logical NOT of a predicate
    Not(Box<Predicate>),
}

/// A declarative path query: a sequence of steps, an optional predicate
/// over the matched nodes, and an optional terminal field projection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathExpr {
    /// Path steps applied in order, starting at the tree root
    pub steps: Vec<Step>,
    /// Keep only matched nodes satisfying this predicate
    pub predicate: Option<Predicate>,
    /// Project each surviving mapping node to this field
    pub select: Option<String>,
}

impl PathExpr {
    /// Create an empty path expression matching the tree root
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a [`Step::Key`] step
    #[must_use]
    pub fn key(mut self, name: &str) -> Self {
        self.steps.push(Step::Key(name.to_string()));
        self
    }

    /// Append a [`Step::Index`] step
    #[must_use]
    pub fn index(mut self, index: usize) -> Self {
        self.steps.push(Step::Index(index));
        self
    }

    /// Append a [`Step::Any`] step
    #[must_use]
    pub fn any(mut self) -> Self {
        self.steps.push(Step::Any);
        self
    }

    /// Append a [`Step::Values`] step
    #[must_use]
    pub fn values(mut self, name: &str) -> Self {
        self.steps.push(Step::Values(name.to_string()));
        self
    }

    /// Restrict matches to nodes satisfying `predicate`
    #[must_use]
    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.predicate = Some(predicate);
        self
    }

    /// Project each matched mapping node to a single field
    #[must_use]
    pub fn select(mut self, field: &str) -> Self {
        self.select = Some(field.to_string());
        self
    }
}

/// Helper to create an equality predicate for a field
#[must_use]
pub fn eq(field: &str, value: impl Into<Literal>) -> Predicate {
    Predicate::Eq(field.to_string(), value.into())
}

/// Helper to create a greater-than predicate for a field
#[must_use]
pub fn gt(field: &str, value: impl Into<Literal>) -> Predicate {
    Predicate::Gt(field.to_string(), value.into())
}

/// Helper to create a less-than predicate for a field
#[must_use]
pub fn lt(field: &str, value: impl Into<Literal>) -> Predicate {
    Predicate::Lt(field.to_string(), value.into())
}

/// Helper to create a field-presence predicate
#[must_use]
pub fn has(field: &str) -> Predicate {
    Predicate::Has(field.to_string())
}
