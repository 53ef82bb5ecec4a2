use crate::{
    AsValue, Entity, EntityShape, Error, MetaRegistry, QueryError, Result, RowLabeled, TableMeta,
    Value,
};
use anyhow::Context;
use std::{any, sync::Arc};

/// How a result type consumes a row.
#[derive(Debug, Clone, Copy)]
pub enum ResultKind {
    /// Exactly one column converted through [`AsValue`], `Option<T>` accepts NULL.
    Scalar,
    /// A record whose columns are matched by name.
    Composite(&'static EntityShape),
}

/// Result type of a [`Selector`](crate::Selector).
pub trait FromRow: Sized + Send + 'static {
    fn result_kind() -> ResultKind;
    fn from_row(plan: &RowPlan, row: RowLabeled) -> Result<Self>;
}

impl<T: AsValue + Send + 'static> FromRow for T {
    fn result_kind() -> ResultKind {
        ResultKind::Scalar
    }
    fn from_row(_plan: &RowPlan, row: RowLabeled) -> Result<Self> {
        let mut values = row.values.into_vec().into_iter();
        match (values.next(), values.next()) {
            (Some(value), None) => T::try_from_value(value),
            _ => Err(single_column_expected::<T>(row.labels.len()).into()),
        }
    }
}

fn single_column_expected<T>(count: usize) -> QueryError {
    QueryError::mapping(
        any::type_name::<T>(),
        format!("expected exactly one column, the result has {count}"),
    )
}

/// Mapping from result labels to destinations, computed once per statement.
#[derive(Debug, Clone)]
pub enum RowPlan {
    Single,
    /// `positions[i]` is the flattened column slot of the `i`-th label.
    Slots {
        meta: Arc<TableMeta>,
        positions: Vec<usize>,
    },
}

impl RowPlan {
    pub fn new<T: FromRow>(registry: &MetaRegistry, labels: &[String]) -> Result<Self> {
        match T::result_kind() {
            ResultKind::Scalar => {
                if labels.len() != 1 {
                    return Err(single_column_expected::<T>(labels.len()).into());
                }
                Ok(RowPlan::Single)
            }
            ResultKind::Composite(shape) => {
                let meta = registry.resolve(shape)?;
                let mut positions = Vec::with_capacity(labels.len());
                for label in labels {
                    let Some(position) = meta.column_index(label) else {
                        return Err(QueryError::UnknownColumn(label.clone()).into());
                    };
                    if positions.contains(&position) {
                        return Err(QueryError::mapping(
                            shape.name,
                            format!("column `{label}` appears more than once"),
                        )
                        .into());
                    }
                    positions.push(position);
                }
                Ok(RowPlan::Slots { meta, positions })
            }
        }
    }

    /// Reassemble a record from a row, fields without a column get [`AsValue::absent`].
    pub fn assemble<E: Entity>(&self, row: RowLabeled) -> Result<E> {
        let RowPlan::Slots { meta, positions } = self else {
            return Err(QueryError::mapping(
                any::type_name::<E>(),
                "the mapping plan was computed for a scalar result",
            )
            .into());
        };
        if row.values.len() != positions.len() {
            return Err(QueryError::mapping(
                any::type_name::<E>(),
                format!(
                    "the row has {} values for {} labels",
                    row.values.len(),
                    positions.len()
                ),
            )
            .into());
        }
        let mut values = vec![None; meta.columns.len()];
        for (value, position) in row.values.into_vec().into_iter().zip(positions) {
            values[*position] = Some(value);
        }
        let mut slots = Slots {
            meta: meta.as_ref(),
            values,
            next: 0,
        };
        E::from_slots(&mut slots)
    }
}

/// Row values laid out in flattened column order, handed out one field at a time.
pub struct Slots<'a> {
    meta: &'a TableMeta,
    values: Vec<Option<Value>>,
    next: usize,
}

impl<'a> Slots<'a> {
    pub fn take<T: AsValue>(&mut self) -> Result<T> {
        let index = self.next;
        self.next += 1;
        let Some(column) = self.meta.columns.get(index) else {
            return Err(Error::msg(format!(
                "`{}` has more fields than the {} columns of its metadata",
                self.meta.shape.name,
                self.meta.columns.len()
            )));
        };
        match self.values.get_mut(index).and_then(Option::take) {
            Some(value) => T::try_from_value(value).with_context(|| {
                format!(
                    "While decoding the field `{}` from the column `{}`",
                    column.field_name, column.column_name
                )
            }),
            None => T::absent(&column.field_name),
        }
    }
}
