use crate::{Predicate, Subquery, Table, TableReference};

#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub enum JoinType {
    #[default]
    Default,
    Inner,
    Left,
    Right,
}

/// `(left KIND right [ON ...] [USING (...)])`
#[derive(Debug, Clone)]
pub struct Join {
    pub kind: JoinType,
    pub left: TableReference,
    pub right: TableReference,
    /// AND-folded when rendered.
    pub on: Vec<Predicate>,
    /// Field names present on both sides.
    pub using: Vec<String>,
}

/// Join waiting for its `ON` predicates or its `USING` fields.
#[derive(Debug, Clone)]
pub struct JoinBuilder {
    kind: JoinType,
    left: TableReference,
    right: TableReference,
}

impl JoinBuilder {
    pub fn new(
        kind: JoinType,
        left: impl Into<TableReference>,
        right: impl Into<TableReference>,
    ) -> Self {
        Self {
            kind,
            left: left.into(),
            right: right.into(),
        }
    }
    pub fn on(self, predicates: impl IntoIterator<Item = Predicate>) -> Join {
        Join {
            kind: self.kind,
            left: self.left,
            right: self.right,
            on: predicates.into_iter().collect(),
            using: Vec::new(),
        }
    }
    pub fn using<I>(self, fields: I) -> Join
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Join {
            kind: self.kind,
            left: self.left,
            right: self.right,
            on: Vec::new(),
            using: fields.into_iter().map(Into::into).collect(),
        }
    }
}

/// Joins starting from a table reference: base tables, subqueries or other joins.
pub trait DataSet: Into<TableReference> + Sized {
    fn join(self, right: impl Into<TableReference>) -> JoinBuilder {
        JoinBuilder::new(JoinType::Default, self, right)
    }
    fn inner_join(self, right: impl Into<TableReference>) -> JoinBuilder {
        JoinBuilder::new(JoinType::Inner, self, right)
    }
    fn left_join(self, right: impl Into<TableReference>) -> JoinBuilder {
        JoinBuilder::new(JoinType::Left, self, right)
    }
    fn right_join(self, right: impl Into<TableReference>) -> JoinBuilder {
        JoinBuilder::new(JoinType::Right, self, right)
    }
}

impl DataSet for Table {}
impl DataSet for Join {}
impl DataSet for Subquery {}
impl DataSet for TableReference {}
