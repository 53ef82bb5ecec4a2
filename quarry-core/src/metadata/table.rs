use crate::{ColumnMeta, EntityShape, PrimaryKeyType};
use std::collections::HashMap;

/// Derived metadata of a record type: table name and flattened columns.
///
/// Columns keep declaration order, embedded records are expanded in place.
#[derive(Debug)]
pub struct TableMeta {
    pub table_name: String,
    pub columns: Vec<ColumnMeta>,
    /// Field name to column position.
    pub field_map: HashMap<String, usize>,
    /// Column name to column position.
    pub column_map: HashMap<String, usize>,
    pub shape: &'static EntityShape,
}

impl TableMeta {
    pub fn column(&self, field: &str) -> Option<&ColumnMeta> {
        self.field_map.get(field).map(|i| &self.columns[*i])
    }
    pub fn field_index(&self, field: &str) -> Option<usize> {
        self.field_map.get(field).copied()
    }
    pub fn column_index(&self, column_name: &str) -> Option<usize> {
        self.column_map.get(column_name).copied()
    }
    pub fn column_by_name(&self, column_name: &str) -> Option<&ColumnMeta> {
        self.column_index(column_name).map(|i| &self.columns[i])
    }
    pub fn primary_key_columns(&self) -> impl Iterator<Item = &ColumnMeta> {
        self.columns
            .iter()
            .filter(|c| c.primary_key != PrimaryKeyType::None)
    }
    pub fn auto_increment(&self) -> Option<&ColumnMeta> {
        self.columns.iter().find(|c| c.auto_increment)
    }
}
