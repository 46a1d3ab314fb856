//! Expression tree for `FILTER` clauses.
//!
//! Every node renders through `Display` as a pure function of its children,
//! so one pass over the tree yields the clause text. Bind variables are
//! resolved before a node is built; rendering never touches the interner.


use crate::{db::query::var::Var, value::Value};
use derive_more::Display;
use std::fmt;

///
/// CONSTANTS
///

/// Loop variable bound to the current document in generated queries.
pub const DOCUMENT_ALIAS: &str = "doc";

///
/// CompareOp
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum CompareOp {
    #[display("==")]
    Eq,
    #[display("!=")]
    Ne,
    #[display("<")]
    Lt,
    #[display("<=")]
    Lte,
    #[display(">")]
    Gt,
    #[display(">=")]
    Gte,
}

///
/// EmptyCheck
///
/// What a null-or-empty comparison tests against.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EmptyCheck {
    /// Compare against `null`.
    Null,
    /// Compare against `""`.
    EmptyString,
}

impl EmptyCheck {
    const fn literal(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::EmptyString => "\"\"",
        }
    }
}

///
/// Expr
///

#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Compare {
        left: Box<Self>,
        op: CompareOp,
        right: Box<Self>,
    },
    And(Box<Self>, Box<Self>),
    Or(Box<Self>, Box<Self>),
    Not(Box<Self>),
    /// `pattern` is always a bind variable carrying the `%` wildcards.
    Like {
        left: Box<Self>,
        pattern: Box<Self>,
    },
    InArray {
        value: Box<Self>,
        array: Box<Self>,
    },
    EmptyArray {
        array: Box<Self>,
    },
    /// `op` is `Eq` or `Ne`.
    NullOrEmpty {
        left: Box<Self>,
        op: CompareOp,
        check: EmptyCheck,
    },
    /// Literal injected without interning.
    Raw(Value),
    /// Field of the current document.
    Attribute(String),
    Var(Var),
}

impl Expr {
    #[must_use]
    pub fn attr(name: impl Into<String>) -> Self {
        Self::Attribute(name.into())
    }

    #[must_use]
    pub fn raw(value: impl Into<Value>) -> Self {
        Self::Raw(value.into())
    }

    #[must_use]
    pub fn compare(left: Self, op: CompareOp, right: Self) -> Self {
        Self::Compare {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    #[must_use]
    pub fn and(left: Self, right: Self) -> Self {
        Self::And(Box::new(left), Box::new(right))
    }

    #[must_use]
    pub fn or(left: Self, right: Self) -> Self {
        Self::Or(Box::new(left), Box::new(right))
    }

    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn not(inner: Self) -> Self {
        Self::Not(Box::new(inner))
    }

    #[must_use]
    pub fn like(left: Self, pattern: Self) -> Self {
        Self::Like {
            left: Box::new(left),
            pattern: Box::new(pattern),
        }
    }

    #[must_use]
    pub fn in_array(value: Self, array: Self) -> Self {
        Self::InArray {
            value: Box::new(value),
            array: Box::new(array),
        }
    }

    #[must_use]
    pub fn empty_array(array: Self) -> Self {
        Self::EmptyArray {
            array: Box::new(array),
        }
    }

    #[must_use]
    pub fn null_or_empty(left: Self, op: CompareOp, check: EmptyCheck) -> Self {
        Self::NullOrEmpty {
            left: Box::new(left),
            op,
            check,
        }
    }

    /// Path to a key inside an array of sub-documents: `<array>[*].<key>`.
    #[must_use]
    pub fn document_array_path(array: &str, key: &str) -> String {
        format!("{array}[*].{key}")
    }
}

impl From<Var> for Expr {
    fn from(var: Var) -> Self {
        Self::Var(var)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Compare { left, op, right } => write!(f, "({left} {op} {right}) "),
            Self::And(left, right) => write!(f, "({left} && {right})"),
            Self::Or(left, right) => write!(f, "({left} || {right})"),
            Self::Not(inner) => write!(f, "(NOT {inner}) "),
            Self::Like { left, pattern } => write!(f, "{left} LIKE {pattern} "),
            Self::InArray { value, array } => write!(f, "{value} IN {array}"),
            Self::EmptyArray { array } => write!(f, "({array} == null OR LENGTH({array}) == 0)"),
            Self::NullOrEmpty { left, op, check } => {
                write!(f, "({left} {op} {}) ", check.literal())
            }
            Self::Raw(value) => write_raw(f, value),
            Self::Attribute(name) => write!(f, "{DOCUMENT_ALIAS}.{name}"),
            Self::Var(var) => write!(f, "{var}"),
        }
    }
}

// Strings are quoted and lists become array literals; everything else uses
// its textual form.
fn write_raw(f: &mut fmt::Formatter<'_>, value: &Value) -> fmt::Result {
    match value {
        Value::Text(s) => {
            f.write_str("\"")?;
            for c in s.chars() {
                match c {
                    '"' => f.write_str("\\\"")?,
                    '\\' => f.write_str("\\\\")?,
                    _ => write!(f, "{c}")?,
                }
            }
            f.write_str("\"")
        }
        Value::List(items) => {
            f.write_str("[")?;
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write_raw(f, item)?;
            }
            f.write_str("]")
        }
        other => write!(f, "{other}"),
    }
}
