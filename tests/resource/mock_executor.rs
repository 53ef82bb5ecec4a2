use log::LevelFilter;
use quarry::{
    Error, Executor, Query, Result, RowLabeled, RowNames, Value,
    stream::{self, Stream},
};
use std::{collections::VecDeque, env};

pub fn init_logs() {
    let mut logger = env_logger::builder();
    logger
        .is_test(true)
        .format_file(true)
        .format_line_number(true);
    if env::var("RUST_LOG").is_err() {
        logger.filter_level(LevelFilter::Warn);
    }
    let _ = logger.try_init();
}

struct Expectation {
    sql: String,
    args: Vec<Value>,
    labels: Vec<String>,
    result: Result<Vec<Vec<Value>>>,
}

/// Executor answering queued expectations, each one matching the exact SQL and arguments.
#[derive(Default)]
pub struct MockExecutor {
    expectations: VecDeque<Expectation>,
    pub executed: Vec<Query>,
}

impl MockExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expect_rows(
        &mut self,
        sql: &str,
        args: Vec<Value>,
        labels: &[&str],
        rows: Vec<Vec<Value>>,
    ) -> &mut Self {
        self.expectations.push_back(Expectation {
            sql: sql.into(),
            args,
            labels: labels.iter().map(|v| v.to_string()).collect(),
            result: Ok(rows),
        });
        self
    }

    pub fn expect_error(&mut self, sql: &str, args: Vec<Value>, error: Error) -> &mut Self {
        self.expectations.push_back(Expectation {
            sql: sql.into(),
            args,
            labels: Vec::new(),
            result: Err(error),
        });
        self
    }

    pub fn is_done(&self) -> bool {
        self.expectations.is_empty()
    }
}

impl Executor for MockExecutor {
    fn fetch(&mut self, query: Query) -> impl Stream<Item = Result<RowLabeled>> + Send {
        self.executed.push(query.clone());
        let items: Vec<Result<RowLabeled>> = match self.expectations.pop_front() {
            None => vec![Err(Error::msg(format!("Unexpected query: {query}")))],
            Some(expectation) if expectation.sql != query.sql || expectation.args != query.args => {
                vec![Err(Error::msg(format!(
                    "Expected `{}` with {:?}, received `{}` with {:?}",
                    expectation.sql, expectation.args, query.sql, query.args
                )))]
            }
            Some(Expectation {
                result: Err(error), ..
            }) => vec![Err(error)],
            Some(Expectation {
                labels,
                result: Ok(rows),
                ..
            }) => {
                let labels: RowNames = labels.into();
                rows.into_iter()
                    .map(|values| Ok(RowLabeled::new(labels.clone(), values.into())))
                    .collect()
            }
        };
        stream::iter(items)
    }
}
