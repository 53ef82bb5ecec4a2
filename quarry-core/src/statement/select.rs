use crate::{
    Executor, FromRow, OrderBy, Predicate, Query, QueryError, Result, ResultKind, RowPlan,
    Selectable, Session, Subquery, TableReference, statement::StatementBuilder,
    stream::{Stream, TryStreamExt},
    truncate_long,
};
use async_stream::try_stream;
use std::{marker::PhantomData, pin::pin};

/// Untyped description of a `SELECT`, shared by [`Selector`] and [`Subquery`].
#[derive(Debug, Clone)]
pub struct SelectStatement {
    /// Empty selects every column of the primary table.
    pub columns: Vec<Selectable>,
    pub table: Option<TableReference>,
    pub distinct: bool,
    pub filter: Vec<Predicate>,
    pub group_by: Vec<String>,
    pub order_by: Vec<OrderBy>,
    pub having: Vec<Predicate>,
    pub offset: Option<u32>,
    pub limit: Option<u32>,
    /// Result kind of the record type the statement was started for.
    pub result: ResultKind,
}

impl SelectStatement {
    pub fn new(result: ResultKind) -> Self {
        Self {
            columns: Vec::new(),
            table: None,
            distinct: false,
            filter: Vec::new(),
            group_by: Vec::new(),
            order_by: Vec::new(),
            having: Vec::new(),
            offset: None,
            limit: None,
            result,
        }
    }
}

/// Fluent `SELECT` builder producing rows of type `T`.
///
/// Every clause setter replaces what was set before.
///
/// ```rust,ignore
/// let users = session
///     .select::<User>()
///     .filter([col("age").gt(18)])
///     .order_by([desc(["age"])])
///     .limit(10)
///     .fetch_all(&mut executor)
///     .await?;
/// ```
pub struct Selector<T: FromRow> {
    session: Session,
    statement: SelectStatement,
    _result: PhantomData<fn() -> T>,
}

impl<T: FromRow> Selector<T> {
    pub fn new(session: &Session) -> Self {
        Self {
            session: session.clone(),
            statement: SelectStatement::new(T::result_kind()),
            _result: PhantomData,
        }
    }

    pub fn select<I>(mut self, columns: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Selectable>,
    {
        self.statement.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn distinct(mut self) -> Self {
        self.statement.distinct = true;
        self
    }

    pub fn from(mut self, table: impl Into<TableReference>) -> Self {
        self.statement.table = Some(table.into());
        self
    }

    /// `WHERE`, several predicates are joined with `AND`.
    pub fn filter(mut self, predicates: impl IntoIterator<Item = Predicate>) -> Self {
        self.statement.filter = predicates.into_iter().collect();
        self
    }

    pub fn group_by<I>(mut self, fields: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.statement.group_by = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn order_by(mut self, order_by: impl IntoIterator<Item = OrderBy>) -> Self {
        self.statement.order_by = order_by.into_iter().collect();
        self
    }

    /// `HAVING`, several predicates are joined with `AND`.
    pub fn having(mut self, predicates: impl IntoIterator<Item = Predicate>) -> Self {
        self.statement.having = predicates.into_iter().collect();
        self
    }

    pub fn offset(mut self, offset: u32) -> Self {
        self.statement.offset = Some(offset);
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.statement.limit = Some(limit);
        self
    }

    /// Use this statement inside another one.
    pub fn as_subquery(self, alias: impl Into<String>) -> Subquery {
        Subquery::new(self.statement, alias)
    }

    /// Render the statement into SQL text and its ordered arguments.
    pub fn build(&self) -> Result<Query> {
        let query = StatementBuilder::new(self.session.writer(), self.session.registry())
            .build(&self.statement)?;
        log::debug!("{}", truncate_long!(query.sql));
        Ok(query)
    }

    /// Stream the rows mapped into `T`, the mapping plan is computed from the first row.
    pub fn fetch<'e, E: Executor>(
        self,
        executor: &'e mut E,
    ) -> impl Stream<Item = Result<T>> + Send + 'e {
        let registry = self.session.registry().clone();
        let query = self.build();
        try_stream! {
            let query = query?;
            let mut rows = pin!(executor.fetch(query));
            if let Some(first) = rows.try_next().await? {
                let plan = RowPlan::new::<T>(&registry, &first.labels)?;
                yield decode(&plan, first)?;
                while let Some(row) = rows.try_next().await? {
                    yield decode(&plan, row)?;
                }
            }
        }
    }

    /// All the rows in order, an empty vector when there are none.
    pub async fn fetch_all<E: Executor>(self, executor: &mut E) -> Result<Vec<T>> {
        self.fetch(executor).try_collect().await
    }

    /// First row only, forces `LIMIT 1` and fails with [`QueryError::NoRows`] when empty.
    pub async fn fetch_one<E: Executor>(self, executor: &mut E) -> Result<T> {
        let rows = self.limit(1).fetch(executor);
        let mut rows = pin!(rows);
        match rows.try_next().await? {
            Some(row) => Ok(row),
            None => Err(QueryError::NoRows.into()),
        }
    }
}

fn decode<T: FromRow>(plan: &RowPlan, row: crate::RowLabeled) -> Result<T> {
    T::from_row(plan, row).inspect_err(|e| {
        log::error!("{e:#}");
    })
}
