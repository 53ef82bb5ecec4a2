use crate::{
    ColumnMeta, Entity, EntityShape, FieldKind, PrimaryKeyType, QueryError, Result, TableMeta,
    underscore_name,
};
use std::{
    any::TypeId,
    collections::HashMap,
    sync::{Arc, LazyLock, OnceLock, PoisonError, RwLock},
};

type Cell = Arc<OnceLock<Result<Arc<TableMeta>, QueryError>>>;

static GLOBAL: LazyLock<Arc<MetaRegistry>> = LazyLock::new(|| Arc::new(MetaRegistry::new()));

/// Process-wide cache of derived table metadata, keyed by record type.
///
/// Each type is derived at most once: concurrent first callers wait on the
/// same derivation and share its outcome, failures included. The map lock is
/// only held to look up or insert the per-type cell.
#[derive(Default)]
pub struct MetaRegistry {
    cells: RwLock<HashMap<TypeId, Cell>>,
}

impl MetaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry shared by every [`Session`](crate::Session) that doesn't bring its own.
    pub fn global() -> Arc<MetaRegistry> {
        GLOBAL.clone()
    }

    pub fn get<E: Entity>(&self) -> Result<Arc<TableMeta>> {
        self.resolve(E::shape())
    }

    pub fn resolve(&self, shape: &'static EntityShape) -> Result<Arc<TableMeta>> {
        self.lookup(shape).map_err(Into::into)
    }

    fn lookup(&self, shape: &'static EntityShape) -> Result<Arc<TableMeta>, QueryError> {
        self.cell(shape.type_id())
            .get_or_init(|| {
                let result = self.derive(shape).map(Arc::new);
                match &result {
                    Ok(meta) => log::debug!(
                        "Derived metadata of `{}`: table `{}` with {} columns",
                        shape.name,
                        meta.table_name,
                        meta.columns.len()
                    ),
                    Err(e) => log::debug!("{e}"),
                }
                result
            })
            .clone()
    }

    fn cell(&self, id: TypeId) -> Cell {
        if let Some(cell) = self
            .cells
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
        {
            return cell.clone();
        }
        self.cells
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(id)
            .or_default()
            .clone()
    }

    fn derive(&self, shape: &'static EntityShape) -> Result<TableMeta, QueryError> {
        check_acyclic(shape, &mut Vec::new())?;
        let mut columns = Vec::with_capacity(shape.fields.len());
        for field in shape.fields {
            match field.kind {
                FieldKind::Scalar {
                    prototype,
                    nullable,
                } => columns.push(ColumnMeta {
                    field_name: field.ident.to_string(),
                    column_name: field
                        .column_name
                        .map(ToOwned::to_owned)
                        .unwrap_or_else(|| underscore_name(field.ident)),
                    value: prototype(),
                    nullable,
                    primary_key: if field.primary_key {
                        PrimaryKeyType::PrimaryKey
                    } else {
                        PrimaryKeyType::None
                    },
                    auto_increment: field.auto_increment,
                }),
                FieldKind::Embedded(embedded) => {
                    let embedded = self.lookup(embedded()).map_err(|e| {
                        QueryError::metadata(
                            shape.name,
                            format!("embedded field `{}` is invalid ({e})", field.ident),
                        )
                    })?;
                    columns.extend(embedded.columns.iter().cloned());
                }
                FieldKind::Unsupported(ty) => {
                    return Err(QueryError::metadata(
                        shape.name,
                        format!("field `{}` has the unsupported type `{ty}`", field.ident),
                    ));
                }
            }
        }
        let mut field_map = HashMap::with_capacity(columns.len());
        let mut column_map = HashMap::with_capacity(columns.len());
        for (i, column) in columns.iter().enumerate() {
            if field_map.insert(column.field_name.clone(), i).is_some() {
                return Err(QueryError::metadata(
                    shape.name,
                    format!("duplicate field `{}`", column.field_name),
                ));
            }
            if column_map.insert(column.column_name.clone(), i).is_some() {
                return Err(QueryError::metadata(
                    shape.name,
                    format!("duplicate column `{}`", column.column_name),
                ));
            }
        }
        if columns
            .iter()
            .filter(|c| c.primary_key != PrimaryKeyType::None)
            .count()
            > 1
        {
            columns
                .iter_mut()
                .filter(|c| c.primary_key != PrimaryKeyType::None)
                .for_each(|c| c.primary_key = PrimaryKeyType::PartOfPrimaryKey);
        }
        Ok(TableMeta {
            table_name: shape
                .table_name
                .map(ToOwned::to_owned)
                .unwrap_or_else(|| underscore_name(shape.name)),
            columns,
            field_map,
            column_map,
            shape,
        })
    }
}

/// Embedding must form a tree, a cycle would make the derivation wait on itself.
fn check_acyclic(
    shape: &'static EntityShape,
    stack: &mut Vec<&'static EntityShape>,
) -> Result<(), QueryError> {
    if stack.iter().any(|v| v.type_id() == shape.type_id()) {
        let path = stack
            .iter()
            .map(|v| v.name)
            .chain([shape.name])
            .collect::<Vec<_>>()
            .join(" -> ");
        return Err(QueryError::metadata(
            stack.first().map_or(shape.name, |v| v.name),
            format!("recursive embedding {path}"),
        ));
    }
    stack.push(shape);
    for field in shape.fields {
        if let FieldKind::Embedded(embedded) = field.kind {
            check_acyclic(embedded(), stack)?;
        }
    }
    stack.pop();
    Ok(())
}
