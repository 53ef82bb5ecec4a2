use crate::Value;

/// Indicates how (or if) a column participates in the primary key.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum PrimaryKeyType {
    /// Single-column primary key.
    PrimaryKey,
    /// Member of a composite primary key.
    PartOfPrimaryKey,
    /// Not part of the primary key.
    #[default]
    None,
}

/// Derived description of one column of a table.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnMeta {
    /// Name of the Rust field, the key used by expressions.
    pub field_name: String,
    pub column_name: String,
    /// Typed NULL of the declared field type.
    pub value: Value,
    pub nullable: bool,
    pub primary_key: PrimaryKeyType,
    pub auto_increment: bool,
}
