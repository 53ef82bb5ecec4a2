#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    ASC,
    DESC,
}

/// Fields sharing one direction in `ORDER BY`.
#[derive(Debug, Clone)]
pub struct OrderBy {
    pub fields: Vec<String>,
    pub order: Order,
}

pub fn asc<I>(fields: I) -> OrderBy
where
    I: IntoIterator,
    I::Item: Into<String>,
{
    OrderBy {
        fields: fields.into_iter().map(Into::into).collect(),
        order: Order::ASC,
    }
}

pub fn desc<I>(fields: I) -> OrderBy
where
    I: IntoIterator,
    I::Item: Into<String>,
{
    OrderBy {
        fields: fields.into_iter().map(Into::into).collect(),
        order: Order::DESC,
    }
}
