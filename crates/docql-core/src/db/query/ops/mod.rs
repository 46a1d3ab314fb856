
use crate::{
    db::query::{
        expr::{CompareOp, EmptyCheck, Expr},
        var::{Var, VarInterner},
    },
    value::Value,
};
use derive_more::From;
use std::{cell::RefCell, rc::Rc};

///
/// SharedVars
///
/// Interner shared between a filter chain and the operator handles it gives
/// out. Single-threaded by construction.
///

pub(crate) type SharedVars = Rc<RefCell<VarInterner>>;

///
/// Operand
///
/// Right-hand side of an operator: a native value that will be interned,
/// or an already-built expression that is passed through untouched.
///

#[derive(Clone, Debug, From, PartialEq)]
pub enum Operand {
    Value(Value),
    Expr(Expr),
}

impl From<Var> for Operand {
    fn from(var: Var) -> Self {
        Self::Expr(Expr::Var(var))
    }
}

macro_rules! impl_operand_from_native {
    ( $( $ty:ty ),* $(,)? ) => {
        $(
            impl From<$ty> for Operand {
                fn from(v: $ty) -> Self {
                    Self::Value(Value::from(v))
                }
            }
        )*
    };
}

impl_operand_from_native!(
    bool, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64, String, &str, &String,
);

///
/// Ops
///
/// Operator factory bound to one filter chain's interner.
/// Attribute names become `doc.<name>` references; native operands are
/// interned as bind variables.
///

#[derive(Clone, Debug)]
pub struct Ops {
    vars: SharedVars,
}

impl Ops {
    pub(crate) const fn new(vars: SharedVars) -> Self {
        Self { vars }
    }

    /// Intern a native value and reference its bind variable.
    #[must_use]
    pub fn var(&self, value: impl Into<Value>) -> Expr {
        Expr::Var(self.vars.borrow_mut().intern(value))
    }

    /// Intern if native, otherwise pass the expression through.
    #[must_use]
    pub fn operand(&self, operand: impl Into<Operand>) -> Expr {
        match operand.into() {
            Operand::Value(value) => self.var(value),
            Operand::Expr(expr) => expr,
        }
    }

    // ------------------------------------------------------------------
    // Boolean
    // ------------------------------------------------------------------

    #[must_use]
    pub fn and(&self, left: Expr, right: Expr) -> Expr {
        Expr::and(left, right)
    }

    #[must_use]
    pub fn or(&self, left: Expr, right: Expr) -> Expr {
        Expr::or(left, right)
    }

    #[must_use]
    pub fn not(&self, inner: impl Into<Operand>) -> Expr {
        Expr::not(self.operand(inner))
    }

    // ------------------------------------------------------------------
    // Equality
    // ------------------------------------------------------------------

    #[must_use]
    pub fn equal(&self, attribute: &str, right: impl Into<Operand>) -> Expr {
        self.compare(attribute, CompareOp::Eq, right)
    }

    #[must_use]
    pub fn not_equal(&self, attribute: &str, right: impl Into<Operand>) -> Expr {
        self.compare(attribute, CompareOp::Ne, right)
    }

    #[must_use]
    pub fn less_than(&self, attribute: &str, right: impl Into<Operand>) -> Expr {
        self.compare(attribute, CompareOp::Lt, right)
    }

    #[must_use]
    pub fn less_than_or_equal(&self, attribute: &str, right: impl Into<Operand>) -> Expr {
        self.compare(attribute, CompareOp::Lte, right)
    }

    #[must_use]
    pub fn greater_than(&self, attribute: &str, right: impl Into<Operand>) -> Expr {
        self.compare(attribute, CompareOp::Gt, right)
    }

    #[must_use]
    pub fn greater_than_or_equal(&self, attribute: &str, right: impl Into<Operand>) -> Expr {
        self.compare(attribute, CompareOp::Gte, right)
    }

    // ------------------------------------------------------------------
    // Null / empty
    // ------------------------------------------------------------------

    #[must_use]
    pub fn is_null(&self, attribute: &str) -> Expr {
        Expr::null_or_empty(Expr::attr(attribute), CompareOp::Eq, EmptyCheck::Null)
    }

    #[must_use]
    pub fn is_not_null(&self, attribute: &str) -> Expr {
        Expr::null_or_empty(Expr::attr(attribute), CompareOp::Ne, EmptyCheck::Null)
    }

    /// Attribute equals the empty string.
    #[must_use]
    pub fn is_empty(&self, attribute: &str) -> Expr {
        Expr::null_or_empty(Expr::attr(attribute), CompareOp::Eq, EmptyCheck::EmptyString)
    }

    #[must_use]
    pub fn is_not_empty(&self, attribute: &str) -> Expr {
        Expr::null_or_empty(Expr::attr(attribute), CompareOp::Ne, EmptyCheck::EmptyString)
    }

    /// Array attribute is missing, null, or has no elements.
    #[must_use]
    pub fn is_empty_array(&self, attribute: &str) -> Expr {
        Expr::empty_array(Expr::attr(attribute))
    }

    // ------------------------------------------------------------------
    // String matching
    // ------------------------------------------------------------------

    #[must_use]
    pub fn starts_with(&self, attribute: &str, pattern: &str) -> Expr {
        self.like(attribute, format!("{pattern}%"))
    }

    #[must_use]
    pub fn ends_with(&self, attribute: &str, pattern: &str) -> Expr {
        self.like(attribute, format!("%{pattern}"))
    }

    #[must_use]
    pub fn contains(&self, attribute: &str, pattern: &str) -> Expr {
        self.like(attribute, format!("%{pattern}%"))
    }

    fn compare(&self, attribute: &str, op: CompareOp, right: impl Into<Operand>) -> Expr {
        let right = self.operand(right);

        Expr::compare(Expr::attr(attribute), op, right)
    }

    fn like(&self, attribute: &str, pattern: String) -> Expr {
        let pattern = self.var(pattern);

        Expr::like(Expr::attr(attribute), pattern)
    }
}
