use super::predicate::impl_comparisons;
use crate::Value;

/// Verbatim SQL fragment, its arguments are bound where it appears.
#[derive(Debug, Clone, Default)]
pub struct RawExpr {
    pub sql: String,
    pub args: Vec<Value>,
}

impl_comparisons!(RawExpr);

pub fn raw(sql: impl Into<String>) -> RawExpr {
    RawExpr {
        sql: sql.into(),
        args: Vec::new(),
    }
}

/// The text is written verbatim and each argument takes one placeholder
/// position. Placeholder tokens are not rewritten, with the postgres dialect
/// the text must carry its own `$n` numbered from the preceding arguments.
pub fn raw_with_args<I>(sql: impl Into<String>, args: I) -> RawExpr
where
    I: IntoIterator,
    I::Item: Into<Value>,
{
    RawExpr {
        sql: sql.into(),
        args: args.into_iter().map(Into::into).collect(),
    }
}
