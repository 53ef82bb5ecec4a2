use super::predicate::impl_comparisons;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateFunction {
    Count,
    Avg,
    Sum,
    Max,
    Min,
}

impl AggregateFunction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AggregateFunction::Count => "COUNT",
            AggregateFunction::Avg => "AVG",
            AggregateFunction::Sum => "SUM",
            AggregateFunction::Max => "MAX",
            AggregateFunction::Min => "MIN",
        }
    }
}

/// Aggregate function applied to one field: `FN([DISTINCT ]column)`.
#[derive(Debug, Clone)]
pub struct Aggregate {
    pub function: AggregateFunction,
    pub field: String,
    pub distinct: bool,
    pub alias: Option<String>,
}

impl Aggregate {
    pub fn new(function: AggregateFunction, field: impl Into<String>, distinct: bool) -> Self {
        Self {
            function,
            field: field.into(),
            distinct,
            alias: None,
        }
    }
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }
}

impl_comparisons!(Aggregate);

pub fn count(field: impl Into<String>) -> Aggregate {
    Aggregate::new(AggregateFunction::Count, field, false)
}

pub fn count_distinct(field: impl Into<String>) -> Aggregate {
    Aggregate::new(AggregateFunction::Count, field, true)
}

pub fn avg(field: impl Into<String>) -> Aggregate {
    Aggregate::new(AggregateFunction::Avg, field, false)
}

pub fn avg_distinct(field: impl Into<String>) -> Aggregate {
    Aggregate::new(AggregateFunction::Avg, field, true)
}

pub fn sum(field: impl Into<String>) -> Aggregate {
    Aggregate::new(AggregateFunction::Sum, field, false)
}

pub fn sum_distinct(field: impl Into<String>) -> Aggregate {
    Aggregate::new(AggregateFunction::Sum, field, true)
}

pub fn max(field: impl Into<String>) -> Aggregate {
    Aggregate::new(AggregateFunction::Max, field, false)
}

pub fn min(field: impl Into<String>) -> Aggregate {
    Aggregate::new(AggregateFunction::Min, field, false)
}
