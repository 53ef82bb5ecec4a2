use crate::{AsValue, Aggregate, Column, RawExpr, Subquery, Value};
use std::ops;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    Like,
    NotLike,
    In,
    NotIn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantifier {
    All,
    Some,
    Any,
}

/// Side of a comparison.
#[derive(Debug, Clone)]
pub enum Operand {
    Column(Column),
    Aggregate(Aggregate),
    /// One bound argument.
    Value(Value),
    /// One bound argument per element, `(?,?,?)`.
    Values(Vec<Value>),
    Subquery(Subquery),
    Quantified(Quantifier, Subquery),
    Raw(RawExpr),
}

impl<T: AsValue> From<T> for Operand {
    fn from(value: T) -> Self {
        Operand::Value(value.as_value())
    }
}

impl From<&str> for Operand {
    fn from(value: &str) -> Self {
        Operand::Value(value.into())
    }
}

impl From<Value> for Operand {
    fn from(value: Value) -> Self {
        Operand::Value(value)
    }
}

impl From<Column> for Operand {
    fn from(value: Column) -> Self {
        Operand::Column(value)
    }
}

impl From<Aggregate> for Operand {
    fn from(value: Aggregate) -> Self {
        Operand::Aggregate(value)
    }
}

impl From<Subquery> for Operand {
    fn from(value: Subquery) -> Self {
        Operand::Subquery(value)
    }
}

impl From<&Subquery> for Operand {
    fn from(value: &Subquery) -> Self {
        Operand::Subquery(value.clone())
    }
}

impl From<RawExpr> for Operand {
    fn from(value: RawExpr) -> Self {
        Operand::Raw(value)
    }
}

/// `op ALL (subquery)`
pub fn all(subquery: &Subquery) -> Operand {
    Operand::Quantified(Quantifier::All, subquery.clone())
}

/// `op SOME (subquery)`
pub fn some(subquery: &Subquery) -> Operand {
    Operand::Quantified(Quantifier::Some, subquery.clone())
}

/// `op ANY (subquery)`
pub fn any(subquery: &Subquery) -> Operand {
    Operand::Quantified(Quantifier::Any, subquery.clone())
}

/// Boolean condition tree used by `WHERE`, `HAVING` and `ON`.
#[derive(Debug, Clone)]
pub enum Predicate {
    Compare {
        left: Operand,
        op: Operator,
        right: Operand,
    },
    And(Box<Predicate>, Box<Predicate>),
    Or(Box<Predicate>, Box<Predicate>),
    Not(Box<Predicate>),
    Exists(Subquery),
    Raw(RawExpr),
}

impl Predicate {
    pub fn compare(left: impl Into<Operand>, op: Operator, right: impl Into<Operand>) -> Self {
        Predicate::Compare {
            left: left.into(),
            op,
            right: right.into(),
        }
    }
    pub fn and(self, other: Predicate) -> Self {
        Predicate::And(Box::new(self), Box::new(other))
    }
    pub fn or(self, other: Predicate) -> Self {
        Predicate::Or(Box::new(self), Box::new(other))
    }
}

impl ops::Not for Predicate {
    type Output = Predicate;
    fn not(self) -> Self::Output {
        Predicate::Not(Box::new(self))
    }
}

impl From<RawExpr> for Predicate {
    fn from(value: RawExpr) -> Self {
        Predicate::Raw(value)
    }
}

pub fn not(predicate: Predicate) -> Predicate {
    !predicate
}

pub fn exists(subquery: &Subquery) -> Predicate {
    Predicate::Exists(subquery.clone())
}

pub fn not_exists(subquery: &Subquery) -> Predicate {
    !exists(subquery)
}

/// Comparison builders shared by everything that can stand on the left side.
macro_rules! impl_comparisons {
    ($($target:ty),+ $(,)?) => {$(
        impl $target {
            pub fn eq(self, rhs: impl Into<$crate::Operand>) -> $crate::Predicate {
                $crate::Predicate::compare(self, $crate::Operator::Equal, rhs)
            }
            pub fn neq(self, rhs: impl Into<$crate::Operand>) -> $crate::Predicate {
                $crate::Predicate::compare(self, $crate::Operator::NotEqual, rhs)
            }
            pub fn lt(self, rhs: impl Into<$crate::Operand>) -> $crate::Predicate {
                $crate::Predicate::compare(self, $crate::Operator::Less, rhs)
            }
            pub fn le(self, rhs: impl Into<$crate::Operand>) -> $crate::Predicate {
                $crate::Predicate::compare(self, $crate::Operator::LessEqual, rhs)
            }
            pub fn gt(self, rhs: impl Into<$crate::Operand>) -> $crate::Predicate {
                $crate::Predicate::compare(self, $crate::Operator::Greater, rhs)
            }
            pub fn ge(self, rhs: impl Into<$crate::Operand>) -> $crate::Predicate {
                $crate::Predicate::compare(self, $crate::Operator::GreaterEqual, rhs)
            }
            /// The pattern is bound as is, wildcards included.
            pub fn like(self, pattern: impl Into<$crate::Operand>) -> $crate::Predicate {
                $crate::Predicate::compare(self, $crate::Operator::Like, pattern)
            }
            pub fn not_like(self, pattern: impl Into<$crate::Operand>) -> $crate::Predicate {
                $crate::Predicate::compare(self, $crate::Operator::NotLike, pattern)
            }
            /// `IN (?,?,...)` with one argument per element, an empty list is always false.
            pub fn in_list<I>(self, values: I) -> $crate::Predicate
            where
                I: IntoIterator,
                I::Item: Into<$crate::Value>,
            {
                $crate::Predicate::compare(
                    self,
                    $crate::Operator::In,
                    $crate::Operand::Values(values.into_iter().map(Into::into).collect()),
                )
            }
            pub fn not_in_list<I>(self, values: I) -> $crate::Predicate
            where
                I: IntoIterator,
                I::Item: Into<$crate::Value>,
            {
                $crate::Predicate::compare(
                    self,
                    $crate::Operator::NotIn,
                    $crate::Operand::Values(values.into_iter().map(Into::into).collect()),
                )
            }
            /// `IN (?)` binding the whole container as one argument.
            pub fn in_value(self, value: impl Into<$crate::Value>) -> $crate::Predicate {
                $crate::Predicate::compare(
                    self,
                    $crate::Operator::In,
                    $crate::Operand::Value(value.into()),
                )
            }
            pub fn not_in_value(self, value: impl Into<$crate::Value>) -> $crate::Predicate {
                $crate::Predicate::compare(
                    self,
                    $crate::Operator::NotIn,
                    $crate::Operand::Value(value.into()),
                )
            }
            pub fn in_subquery(self, subquery: &$crate::Subquery) -> $crate::Predicate {
                $crate::Predicate::compare(self, $crate::Operator::In, subquery)
            }
            pub fn not_in_subquery(self, subquery: &$crate::Subquery) -> $crate::Predicate {
                $crate::Predicate::compare(self, $crate::Operator::NotIn, subquery)
            }
        }
    )+};
}
pub(crate) use impl_comparisons;

impl_comparisons!(Column);
