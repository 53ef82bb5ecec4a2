use crate::{Column, Entity, EntityShape, Join, SelectStatement};
use std::sync::Arc;

/// Base table of a record type, optionally aliased.
#[derive(Debug, Clone)]
pub struct Table {
    pub shape: &'static EntityShape,
    pub alias: Option<String>,
}

impl Table {
    pub fn new(shape: &'static EntityShape) -> Self {
        Self { shape, alias: None }
    }
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }
    /// Field of this table, qualified with the alias when there is one.
    pub fn c(&self, field: impl Into<String>) -> Column {
        Column::owned_by(self.clone(), field)
    }
}

pub fn table_of<E: Entity>() -> Table {
    E::table()
}

/// Built statement used as a table, as an `IN` list or under a quantifier.
#[derive(Debug, Clone)]
pub struct Subquery {
    pub statement: Arc<SelectStatement>,
    pub alias: String,
}

impl Subquery {
    pub fn new(statement: SelectStatement, alias: impl Into<String>) -> Self {
        Self {
            statement: Arc::new(statement),
            alias: alias.into(),
        }
    }
    /// Field exposed by the subquery, `` `alias`.`column` ``.
    pub fn c(&self, field: impl Into<String>) -> Column {
        Column::owned_by(self.clone(), field)
    }
}

/// Anything that can appear after `FROM`.
#[derive(Debug, Clone)]
pub enum TableReference {
    Table(Table),
    Join(Box<Join>),
    Subquery(Subquery),
}

impl From<Table> for TableReference {
    fn from(value: Table) -> Self {
        TableReference::Table(value)
    }
}

impl From<Join> for TableReference {
    fn from(value: Join) -> Self {
        TableReference::Join(Box::new(value))
    }
}

impl From<Subquery> for TableReference {
    fn from(value: Subquery) -> Self {
        TableReference::Subquery(value)
    }
}

impl From<&Subquery> for TableReference {
    fn from(value: &Subquery) -> Self {
        TableReference::Subquery(value.clone())
    }
}
