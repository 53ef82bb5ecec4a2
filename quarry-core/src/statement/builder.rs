use crate::{
    Aggregate, Column, ColumnMeta, Join, MetaRegistry, Operand, Operator, Predicate, Query,
    QueryError, RawExpr, Result, ResultKind, SelectStatement, Selectable, SqlWriter, Subquery,
    TableMeta, TableReference, Value, separated_by, try_separated_by,
    writer::{Context, Fragment},
};
use std::{collections::HashSet, sync::Arc};

/// Names visible while writing one `SELECT`, nested subqueries get their own.
struct Scope {
    primary: Arc<TableMeta>,
    /// Aliases declared by the select list written so far.
    aliases: HashSet<String>,
}

/// Single pass renderer of a [`SelectStatement`] and its nested subqueries.
///
/// Placeholders and arguments are emitted together, so argument order always
/// follows placeholder order in the text.
pub(crate) struct StatementBuilder<'a> {
    writer: &'a dyn SqlWriter,
    registry: &'a MetaRegistry,
    args: Vec<Value>,
}

impl<'a> StatementBuilder<'a> {
    pub(crate) fn new(writer: &'a dyn SqlWriter, registry: &'a MetaRegistry) -> Self {
        Self {
            writer,
            registry,
            args: Vec::new(),
        }
    }

    pub(crate) fn build(mut self, statement: &SelectStatement) -> Result<Query> {
        let mut context = Context::new(Fragment::SqlSelect);
        let mut out = String::with_capacity(128);
        self.write_select(&mut context, &mut out, statement)?;
        self.writer.write_statement_end(&mut context, &mut out);
        Ok(Query::new(out, self.args))
    }

    /// Table against which unowned fields resolve.
    fn primary_meta(&self, statement: &SelectStatement) -> Result<Arc<TableMeta>> {
        if let Some(TableReference::Table(table)) = &statement.table {
            return self.registry.resolve(table.shape);
        }
        if let ResultKind::Composite(shape) = statement.result {
            return self.registry.resolve(shape);
        }
        match &statement.table {
            Some(table) => self.leftmost_meta(table),
            None => Err(QueryError::metadata(
                "SELECT",
                "the statement has neither a base table nor a record result type",
            )
            .into()),
        }
    }

    /// Metadata of the leftmost source, a subquery contributes its own primary table.
    fn leftmost_meta(&self, table: &TableReference) -> Result<Arc<TableMeta>> {
        match table {
            TableReference::Table(table) => self.registry.resolve(table.shape),
            TableReference::Join(join) => self.leftmost_meta(&join.left),
            TableReference::Subquery(subquery) => self.primary_meta(&subquery.statement),
        }
    }

    fn write_select(
        &mut self,
        context: &mut Context,
        out: &mut String,
        statement: &SelectStatement,
    ) -> Result<()> {
        let mut scope = Scope {
            primary: self.primary_meta(statement)?,
            aliases: HashSet::new(),
        };
        out.push_str("SELECT ");
        if statement.distinct {
            out.push_str("DISTINCT ");
        }
        {
            let mut context = context.switch_fragment(Fragment::SqlSelect);
            self.write_select_list(&mut context.current, out, &mut scope, &statement.columns)?;
        }
        out.push_str(" FROM ");
        {
            let mut context = context.switch_fragment(Fragment::SqlSelectFrom);
            match &statement.table {
                Some(table) => {
                    self.write_table_reference(&mut context.current, out, &scope, table)?
                }
                None => self.writer.write_identifier_quoted(
                    &mut context.current,
                    out,
                    &scope.primary.table_name,
                ),
            }
        }
        if !statement.filter.is_empty() {
            out.push_str(" WHERE ");
            let mut context = context.switch_fragment(Fragment::SqlSelectWhere);
            self.write_predicates(&mut context.current, out, &scope, &statement.filter)?;
        }
        if !statement.group_by.is_empty() {
            out.push_str(" GROUP BY ");
            let mut context = context.switch_fragment(Fragment::SqlSelectGroupBy);
            let writer = self.writer;
            try_separated_by(
                out,
                &statement.group_by,
                |out, field| {
                    let column = primary_column(&mut context.current, &scope, field)?;
                    writer.write_identifier_quoted(&mut context.current, out, &column.column_name);
                    Ok::<_, QueryError>(())
                },
                ",",
            )?;
        }
        if !statement.order_by.is_empty() {
            out.push_str(" ORDER BY ");
            let mut context = context.switch_fragment(Fragment::SqlSelectOrderBy);
            let writer = self.writer;
            try_separated_by(
                out,
                statement
                    .order_by
                    .iter()
                    .flat_map(|v| v.fields.iter().map(|field| (field, &v.order))),
                |out, (field, order)| {
                    let column = primary_column(&mut context.current, &scope, field)?;
                    writer.write_identifier_quoted(&mut context.current, out, &column.column_name);
                    writer.write_order(&mut context.current, out, order);
                    Ok::<_, QueryError>(())
                },
                ",",
            )?;
        }
        if !statement.having.is_empty() {
            out.push_str(" HAVING ");
            let mut context = context.switch_fragment(Fragment::SqlSelectHaving);
            self.write_predicates(&mut context.current, out, &scope, &statement.having)?;
        }
        let mut context = context.switch_fragment(Fragment::SqlSelectLimit);
        if let Some(offset) = statement.offset {
            out.push_str(" OFFSET ");
            self.bind(&mut context.current, out, Value::UInt32(Some(offset)));
        }
        if let Some(limit) = statement.limit {
            out.push_str(" LIMIT ");
            self.bind(&mut context.current, out, Value::UInt32(Some(limit)));
        }
        Ok(())
    }

    fn bind(&mut self, context: &mut Context, out: &mut String, value: Value) {
        self.writer.write_placeholder(context, out);
        self.args.push(value);
    }

    fn write_select_list(
        &mut self,
        context: &mut Context,
        out: &mut String,
        scope: &mut Scope,
        columns: &[Selectable],
    ) -> Result<()> {
        if columns.is_empty() {
            let writer = self.writer;
            separated_by(
                out,
                &scope.primary.columns,
                |out, column| writer.write_identifier_quoted(context, out, &column.column_name),
                ",",
            );
            return Ok(());
        }
        try_separated_by(
            out,
            columns,
            |out, item| self.write_selectable(context, out, scope, item),
            ",",
        )
    }

    fn write_selectable(
        &mut self,
        context: &mut Context,
        out: &mut String,
        scope: &mut Scope,
        item: &Selectable,
    ) -> Result<()> {
        let alias = match item {
            Selectable::Column(column) => {
                self.write_column(context, out, scope, column, false)?;
                column.alias.as_ref()
            }
            Selectable::ColumnGroup(group) => {
                let writer = self.writer;
                try_separated_by(
                    out,
                    &group.fields,
                    |out, field| {
                        let column = primary_column(context, scope, field)?;
                        writer.write_identifier_quoted(context, out, &column.column_name);
                        Ok::<_, QueryError>(())
                    },
                    ",",
                )?;
                None
            }
            Selectable::Aggregate(aggregate) => {
                self.write_aggregate(context, out, scope, aggregate)?;
                aggregate.alias.as_ref()
            }
            Selectable::Raw(raw) => {
                self.write_raw(context, out, raw);
                None
            }
        };
        if let Some(alias) = alias {
            self.writer.write_alias(context, out, alias);
            scope.aliases.insert(alias.clone());
        }
        Ok(())
    }

    fn write_aggregate(
        &mut self,
        context: &mut Context,
        out: &mut String,
        scope: &Scope,
        aggregate: &Aggregate,
    ) -> Result<()> {
        out.push_str(aggregate.function.as_str());
        out.push('(');
        if aggregate.distinct {
            out.push_str("DISTINCT ");
        }
        let column = primary_column(context, scope, &aggregate.field)?;
        self.writer
            .write_identifier_quoted(context, out, &column.column_name);
        out.push(')');
        Ok(())
    }

    fn write_raw(&mut self, context: &mut Context, out: &mut String, raw: &RawExpr) {
        out.push_str(&raw.sql);
        context.counter += raw.args.len() as u32;
        self.args.extend(raw.args.iter().cloned());
    }

    /// Resolution order: the owner, then (if allowed) the aliases, then the primary table.
    fn write_column(
        &mut self,
        context: &mut Context,
        out: &mut String,
        scope: &Scope,
        column: &Column,
        allow_alias: bool,
    ) -> Result<()> {
        match &column.table {
            None => {
                if allow_alias && scope.aliases.contains(&column.field) {
                    self.writer
                        .write_identifier_quoted(context, out, &column.field);
                } else {
                    let meta = primary_column(context, scope, &column.field)?;
                    self.writer
                        .write_identifier_quoted(context, out, &meta.column_name);
                }
            }
            Some(TableReference::Table(table)) => {
                let meta = self.registry.resolve(table.shape)?;
                let Some(meta) = meta.column(&column.field) else {
                    return Err(invalid_field(context, &column.field).into());
                };
                if let Some(alias) = &table.alias {
                    self.writer.write_identifier_quoted(context, out, alias);
                    out.push('.');
                }
                self.writer
                    .write_identifier_quoted(context, out, &meta.column_name);
            }
            Some(TableReference::Subquery(subquery)) => {
                let Some(name) = self.subquery_column(subquery, &column.field)? else {
                    return Err(invalid_field(context, &column.field).into());
                };
                self.writer
                    .write_identifier_quoted(context, out, &subquery.alias);
                out.push('.');
                self.writer.write_identifier_quoted(context, out, &name);
            }
            Some(TableReference::Join(..)) => {
                return Err(QueryError::UnsupportedExpression(format!(
                    "column `{}` is owned by a join, use a column of one of its tables",
                    column.field
                ))
                .into());
            }
        }
        Ok(())
    }

    /// Output column name of `field` as exposed by the subquery.
    fn subquery_column(&self, subquery: &Subquery, field: &str) -> Result<Option<String>> {
        let inner = &subquery.statement;
        if inner.columns.is_empty() {
            let meta = self.primary_meta(inner)?;
            return Ok(meta.column(field).map(|c| c.column_name.clone()));
        }
        for item in &inner.columns {
            match item {
                Selectable::Column(column) => match &column.alias {
                    Some(alias) if alias == field => return Ok(Some(alias.clone())),
                    None if column.field == field => {
                        return self.owned_column_name(inner, column).map(Some);
                    }
                    _ => {}
                },
                Selectable::ColumnGroup(group) if group.fields.iter().any(|v| v == field) => {
                    let meta = self.primary_meta(inner)?;
                    return Ok(meta.column(field).map(|c| c.column_name.clone()));
                }
                Selectable::Aggregate(aggregate) if aggregate.alias.as_deref() == Some(field) => {
                    return Ok(Some(field.to_string()));
                }
                _ => {}
            }
        }
        Ok(None)
    }

    /// Column name of a column selected by `statement`.
    fn owned_column_name(&self, statement: &SelectStatement, column: &Column) -> Result<String> {
        let found = match &column.table {
            None => self
                .primary_meta(statement)?
                .column(&column.field)
                .map(|c| c.column_name.clone()),
            Some(TableReference::Table(table)) => self
                .registry
                .resolve(table.shape)?
                .column(&column.field)
                .map(|c| c.column_name.clone()),
            Some(TableReference::Subquery(subquery)) => {
                self.subquery_column(subquery, &column.field)?
            }
            Some(TableReference::Join(..)) => None,
        };
        found.ok_or_else(|| QueryError::InvalidField(column.field.clone()).into())
    }

    /// Column name of `field` on one side of a join, if that side has it.
    fn exposed_column(&self, table: &TableReference, field: &str) -> Result<Option<String>> {
        match table {
            TableReference::Table(table) => Ok(self
                .registry
                .resolve(table.shape)?
                .column(field)
                .map(|c| c.column_name.clone())),
            TableReference::Join(join) => match self.exposed_column(&join.left, field)? {
                Some(name) => Ok(Some(name)),
                None => self.exposed_column(&join.right, field),
            },
            TableReference::Subquery(subquery) => self.subquery_column(subquery, field),
        }
    }

    fn write_table_reference(
        &mut self,
        context: &mut Context,
        out: &mut String,
        scope: &Scope,
        table: &TableReference,
    ) -> Result<()> {
        match table {
            TableReference::Table(table) => {
                let meta = self.registry.resolve(table.shape)?;
                self.writer
                    .write_identifier_quoted(context, out, &meta.table_name);
                if let Some(alias) = &table.alias {
                    self.writer.write_alias(context, out, alias);
                }
            }
            TableReference::Join(join) => self.write_join(context, out, scope, join)?,
            TableReference::Subquery(subquery) => {
                out.push('(');
                self.write_select(context, out, &subquery.statement)?;
                out.push(')');
                if !subquery.alias.is_empty() {
                    self.writer.write_alias(context, out, &subquery.alias);
                }
            }
        }
        Ok(())
    }

    fn write_join(
        &mut self,
        context: &mut Context,
        out: &mut String,
        scope: &Scope,
        join: &Join,
    ) -> Result<()> {
        let mut context = context.switch_fragment(Fragment::SqlJoin);
        out.push('(');
        self.write_table_reference(&mut context.current, out, scope, &join.left)?;
        out.push(' ');
        self.writer
            .write_join_type(&mut context.current, out, &join.kind);
        out.push(' ');
        self.write_table_reference(&mut context.current, out, scope, &join.right)?;
        if !join.on.is_empty() {
            out.push_str(" ON ");
            self.write_predicates(&mut context.current, out, scope, &join.on)?;
        }
        if !join.using.is_empty() {
            out.push_str(" USING (");
            let writer = self.writer;
            try_separated_by(
                out,
                &join.using,
                |out, field| {
                    let name = match self.exposed_column(&join.left, field)? {
                        Some(name) => name,
                        None => match self.exposed_column(&join.right, field)? {
                            Some(name) => name,
                            None => primary_column(&mut context.current, scope, field)?
                                .column_name
                                .clone(),
                        },
                    };
                    writer.write_identifier_quoted(&mut context.current, out, &name);
                    Ok::<_, crate::Error>(())
                },
                ",",
            )?;
            out.push(')');
        }
        out.push(')');
        Ok(())
    }

    /// Several predicates are AND-folded left to right.
    fn write_predicates(
        &mut self,
        context: &mut Context,
        out: &mut String,
        scope: &Scope,
        predicates: &[Predicate],
    ) -> Result<()> {
        match predicates {
            [] => Ok(()),
            [predicate] => self.write_predicate(context, out, scope, predicate),
            [rest @ .., last] => {
                out.push('(');
                self.write_predicates(context, out, scope, rest)?;
                out.push_str(") AND (");
                self.write_predicate(context, out, scope, last)?;
                out.push(')');
                Ok(())
            }
        }
    }

    fn write_predicate(
        &mut self,
        context: &mut Context,
        out: &mut String,
        scope: &Scope,
        predicate: &Predicate,
    ) -> Result<()> {
        match predicate {
            Predicate::And(lhs, rhs) | Predicate::Or(lhs, rhs) => {
                out.push('(');
                self.write_predicate(context, out, scope, lhs)?;
                out.push_str(if matches!(predicate, Predicate::And(..)) {
                    ") AND ("
                } else {
                    ") OR ("
                });
                self.write_predicate(context, out, scope, rhs)?;
                out.push(')');
            }
            Predicate::Not(inner) => {
                out.push_str("NOT (");
                self.write_predicate(context, out, scope, inner)?;
                out.push(')');
            }
            Predicate::Exists(subquery) => {
                out.push_str("EXISTS ");
                self.write_subquery(context, out, subquery)?;
            }
            Predicate::Raw(raw) => self.write_raw(context, out, raw),
            Predicate::Compare { left, op, right } => {
                let is_in = matches!(op, Operator::In | Operator::NotIn);
                if is_in && matches!(right, Operand::Values(values) if values.is_empty()) {
                    // The left side must still resolve, its output is discarded
                    let (counter, args) = (context.counter, self.args.len());
                    self.write_operand(context, &mut String::new(), scope, left)?;
                    context.counter = counter;
                    self.args.truncate(args);
                    self.writer.write_value_false(context, out);
                    return Ok(());
                }
                self.write_operand(context, out, scope, left)?;
                self.writer.write_operator(context, out, op);
                match right {
                    Operand::Value(value) if is_in => {
                        out.push('(');
                        self.bind(context, out, value.clone());
                        out.push(')');
                    }
                    _ => self.write_operand(context, out, scope, right)?,
                }
            }
        }
        Ok(())
    }

    fn write_operand(
        &mut self,
        context: &mut Context,
        out: &mut String,
        scope: &Scope,
        operand: &Operand,
    ) -> Result<()> {
        match operand {
            Operand::Column(column) => self.write_column(context, out, scope, column, true)?,
            Operand::Aggregate(aggregate) => self.write_aggregate(context, out, scope, aggregate)?,
            Operand::Value(value) => self.bind(context, out, value.clone()),
            Operand::Values(values) => {
                out.push('(');
                let mut first = true;
                for value in values {
                    if !first {
                        out.push(',');
                    }
                    first = false;
                    self.bind(context, out, value.clone());
                }
                out.push(')');
            }
            Operand::Subquery(subquery) => self.write_subquery(context, out, subquery)?,
            Operand::Quantified(quantifier, subquery) => {
                self.writer.write_quantifier(context, out, quantifier);
                self.write_subquery(context, out, subquery)?;
            }
            Operand::Raw(raw) => self.write_raw(context, out, raw),
        }
        Ok(())
    }

    /// Inline subquery: parenthesized, no alias, no terminator.
    fn write_subquery(
        &mut self,
        context: &mut Context,
        out: &mut String,
        subquery: &Subquery,
    ) -> Result<()> {
        out.push('(');
        self.write_select(context, out, &subquery.statement)?;
        out.push(')');
        Ok(())
    }
}

fn invalid_field(context: &Context, field: &str) -> QueryError {
    log::debug!("Field `{field}` does not resolve in {:?}", context.fragment);
    QueryError::InvalidField(field.to_string())
}

fn primary_column<'s>(
    context: &mut Context,
    scope: &'s Scope,
    field: &str,
) -> Result<&'s ColumnMeta, QueryError> {
    scope
        .primary
        .column(field)
        .ok_or_else(|| invalid_field(context, field))
}
