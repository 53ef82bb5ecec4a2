use crate::{Aggregate, RawExpr, TableReference};

/// Reference to a field, optionally owned by a table or a subquery.
///
/// The name is the Rust field name (or an alias declared in the same
/// statement), it becomes a column name only when the statement is built.
#[derive(Debug, Clone)]
pub struct Column {
    pub table: Option<TableReference>,
    pub field: String,
    pub alias: Option<String>,
}

impl Column {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            table: None,
            field: field.into(),
            alias: None,
        }
    }
    pub fn owned_by(table: impl Into<TableReference>, field: impl Into<String>) -> Self {
        Self {
            table: Some(table.into()),
            ..Self::new(field)
        }
    }
    /// Declare an alias. Unowned columns of every later predicate clause resolve
    /// against the aliases first, `WHERE` included. MySQL and PostgreSQL only
    /// accept select aliases in `HAVING`, use the underlying field in `WHERE`.
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }
}

pub fn col(field: impl Into<String>) -> Column {
    Column::new(field)
}

/// Several unowned fields of the primary table.
#[derive(Debug, Clone, Default)]
pub struct ColumnGroup {
    pub fields: Vec<String>,
}

pub fn columns<I>(fields: I) -> ColumnGroup
where
    I: IntoIterator,
    I::Item: Into<String>,
{
    ColumnGroup {
        fields: fields.into_iter().map(Into::into).collect(),
    }
}

/// Item of a select list.
#[derive(Debug, Clone)]
pub enum Selectable {
    Column(Column),
    ColumnGroup(ColumnGroup),
    Aggregate(Aggregate),
    Raw(RawExpr),
}

impl From<Column> for Selectable {
    fn from(value: Column) -> Self {
        Self::Column(value)
    }
}

impl From<ColumnGroup> for Selectable {
    fn from(value: ColumnGroup) -> Self {
        Self::ColumnGroup(value)
    }
}

impl From<Aggregate> for Selectable {
    fn from(value: Aggregate) -> Self {
        Self::Aggregate(value)
    }
}

impl From<RawExpr> for Selectable {
    fn from(value: RawExpr) -> Self {
        Self::Raw(value)
    }
}
