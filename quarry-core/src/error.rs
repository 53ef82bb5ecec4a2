use thiserror::Error;

/// Failures raised by the core itself.
///
/// Values travel inside [`crate::Error`] (an `anyhow::Error`), next to whatever the
/// executor reports. Use `error.downcast_ref::<QueryError>()` to inspect them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// The metadata of an entity cannot be derived.
    #[error("Cannot derive the metadata of `{shape}`: {reason}")]
    Metadata { shape: String, reason: String },

    /// A field name that does not resolve in the current scope.
    #[error("Invalid field `{0}`")]
    InvalidField(String),

    #[error("Unsupported expression: {0}")]
    UnsupportedExpression(String),

    /// `fetch_one` received zero rows.
    #[error("The query returned no rows")]
    NoRows,

    /// A row carries a column the result type cannot hold.
    #[error("Unknown column `{0}` in the result set")]
    UnknownColumn(String),

    #[error("Cannot map the result into `{target}`: {reason}")]
    Mapping { target: String, reason: String },
}

impl QueryError {
    pub fn metadata(shape: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Metadata {
            shape: shape.into(),
            reason: reason.into(),
        }
    }
    pub fn mapping(target: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Mapping {
            target: target.into(),
            reason: reason.into(),
        }
    }
}
