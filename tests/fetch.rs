mod resource {
    pub mod mock_executor;
    pub mod models;
}

#[cfg(test)]
mod tests {
    use crate::resource::{
        mock_executor::{MockExecutor, init_logs},
        models::{BaseEntity, CombinedModel, Event, Invoice, TestModel},
    };
    use futures::{StreamExt, TryStreamExt};
    use quarry::{
        Dialect, Error, Executor, Query, QueryError, Result, RowLabeled, RowNames, Session, Value,
        col, count,
        stream::{self, Stream},
        table_of,
    };
    use rust_decimal::Decimal;
    use std::{
        fmt,
        pin::pin,
        str::FromStr,
        sync::{
            Arc,
            atomic::{AtomicBool, Ordering},
        },
        time::Duration,
    };
    use time::macros::{date, datetime};
    use uuid::Uuid;

    const ALL: &str = "SELECT `id`,`first_name`,`age`,`last_name` FROM `test_model`";
    const LABELS: &[&str] = &["id", "first_name", "age", "last_name"];

    fn session() -> Session {
        init_logs();
        Session::new(Dialect::mysql())
    }

    fn tom() -> Vec<Value> {
        vec![
            Value::Int64(Some(1)),
            Value::Varchar(Some("Tom".into())),
            Value::Int8(Some(18)),
            Value::Varchar(Some("Jerry".into())),
        ]
    }

    #[derive(Debug)]
    struct BackendError(&'static str);
    impl fmt::Display for BackendError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "backend failure: {}", self.0)
        }
    }
    impl std::error::Error for BackendError {}

    #[tokio::test]
    async fn fetch_one() {
        let mut executor = MockExecutor::new();
        executor.expect_rows(
            &format!("{ALL} WHERE `id`=? LIMIT ?;"),
            vec![Value::Int32(Some(1)), Value::UInt32(Some(1))],
            LABELS,
            vec![tom()],
        );
        let model = session()
            .select::<TestModel>()
            .filter([col("id").eq(1)])
            .fetch_one(&mut executor)
            .await
            .unwrap();
        assert_eq!(
            model,
            TestModel {
                id: 1,
                first_name: "Tom".into(),
                age: 18,
                last_name: Some("Jerry".into()),
            }
        );
        assert!(executor.is_done());
    }

    #[tokio::test]
    async fn fetch_one_without_rows() {
        let mut executor = MockExecutor::new();
        executor.expect_rows(
            &format!("{ALL} LIMIT ?;"),
            vec![Value::UInt32(Some(1))],
            LABELS,
            vec![],
        );
        let error = session()
            .select::<TestModel>()
            .fetch_one(&mut executor)
            .await
            .unwrap_err();
        assert_eq!(error.downcast_ref::<QueryError>(), Some(&QueryError::NoRows));
    }

    #[tokio::test]
    async fn fetch_all() {
        let mut executor = MockExecutor::new();
        let mut second = tom();
        second[0] = Value::Int64(Some(2));
        second[1] = Value::Blob(Some(b"Ming".to_vec().into()));
        second[2] = Value::Int64(Some(30));
        second[3] = Value::Varchar(None);
        executor.expect_rows(&format!("{ALL};"), vec![], LABELS, vec![tom(), second]);
        let models = session()
            .select::<TestModel>()
            .fetch_all(&mut executor)
            .await
            .unwrap();
        assert_eq!(models.len(), 2);
        assert_eq!(models[0].first_name, "Tom");
        assert_eq!(
            models[1],
            TestModel {
                id: 2,
                first_name: "Ming".into(),
                age: 30,
                last_name: None,
            }
        );

        executor.expect_rows(&format!("{ALL};"), vec![], LABELS, vec![]);
        let models = session()
            .select::<TestModel>()
            .fetch_all(&mut executor)
            .await
            .unwrap();
        assert!(models.is_empty());
    }

    #[tokio::test]
    async fn backend_errors_pass_through() {
        let mut executor = MockExecutor::new();
        executor.expect_error(
            &format!("{ALL};"),
            vec![],
            Error::new(BackendError("connection reset")),
        );
        let error = session()
            .select::<TestModel>()
            .fetch_all(&mut executor)
            .await
            .unwrap_err();
        assert!(error.downcast_ref::<BackendError>().is_some());
        assert_eq!(error.to_string(), "backend failure: connection reset");
    }

    #[tokio::test]
    async fn build_errors_skip_the_backend() {
        let mut executor = MockExecutor::new();
        let error = session()
            .select::<TestModel>()
            .filter([col("Invalid").eq(1)])
            .fetch_all(&mut executor)
            .await
            .unwrap_err();
        assert_eq!(
            error.downcast_ref::<QueryError>(),
            Some(&QueryError::InvalidField("Invalid".into()))
        );
        assert!(executor.executed.is_empty());
    }

    #[tokio::test]
    async fn partial_columns() {
        let mut executor = MockExecutor::new();
        executor.expect_rows(
            "SELECT `id`,`first_name` FROM `test_model`;",
            vec![],
            &["id", "first_name"],
            vec![vec![Value::Int64(Some(7)), Value::Varchar(Some("Ann".into()))]],
        );
        let models = session()
            .select::<TestModel>()
            .select([col("id"), col("first_name")])
            .fetch_all(&mut executor)
            .await
            .unwrap();
        assert_eq!(
            models,
            [TestModel {
                id: 7,
                first_name: "Ann".into(),
                age: 0,
                last_name: None,
            }]
        );
    }

    #[tokio::test]
    async fn columns_in_any_order() {
        let mut executor = MockExecutor::new();
        executor.expect_rows(
            &format!("{ALL};"),
            vec![],
            &["last_name", "age", "first_name", "id"],
            vec![vec![
                Value::Null,
                Value::UInt8(Some(40)),
                Value::Varchar(Some("Bob".into())),
                Value::Int32(Some(3)),
            ]],
        );
        let models = session()
            .select::<TestModel>()
            .fetch_all(&mut executor)
            .await
            .unwrap();
        assert_eq!(
            models,
            [TestModel {
                id: 3,
                first_name: "Bob".into(),
                age: 40,
                last_name: None,
            }]
        );
    }

    #[tokio::test]
    async fn unknown_column() {
        let mut executor = MockExecutor::new();
        executor.expect_rows(
            &format!("{ALL};"),
            vec![],
            &["id", "extra"],
            vec![vec![Value::Int64(Some(1)), Value::Int64(Some(2))]],
        );
        let error = session()
            .select::<TestModel>()
            .fetch_all(&mut executor)
            .await
            .unwrap_err();
        assert_eq!(
            error.downcast_ref::<QueryError>(),
            Some(&QueryError::UnknownColumn("extra".into()))
        );
    }

    #[tokio::test]
    async fn conversion_errors_name_the_field() {
        let mut executor = MockExecutor::new();
        let mut bad = tom();
        bad[2] = Value::Varchar(Some("eighteen".into()));
        executor.expect_rows(&format!("{ALL};"), vec![], LABELS, vec![tom(), bad]);
        let error = session()
            .select::<TestModel>()
            .fetch_all(&mut executor)
            .await
            .unwrap_err();
        let message = format!("{error:#}");
        assert!(message.contains("`age`"), "{message}");

        let mut executor = MockExecutor::new();
        let mut overflow = tom();
        overflow[2] = Value::Int64(Some(1000));
        executor.expect_rows(&format!("{ALL};"), vec![], LABELS, vec![overflow]);
        assert!(
            session()
                .select::<TestModel>()
                .fetch_all(&mut executor)
                .await
                .is_err()
        );
    }

    #[tokio::test]
    async fn stream_rows() {
        let mut executor = MockExecutor::new();
        let mut second = tom();
        second[0] = Value::Int64(Some(2));
        executor.expect_rows(&format!("{ALL};"), vec![], LABELS, vec![tom(), second]);
        let ids = session()
            .select::<TestModel>()
            .fetch(&mut executor)
            .map_ok(|v| v.id)
            .try_collect::<Vec<_>>()
            .await
            .unwrap();
        assert_eq!(ids, [1, 2]);

        executor.expect_rows(&format!("{ALL};"), vec![], LABELS, vec![tom(), tom()]);
        let mut rows = pin!(session().select::<TestModel>().fetch(&mut executor));
        let first = rows.next().await.unwrap().unwrap();
        assert_eq!(first.id, 1);
    }

    #[tokio::test]
    async fn scalar_results() {
        let mut executor = MockExecutor::new();
        executor.expect_rows(
            "SELECT COUNT(`id`) FROM `test_model` LIMIT ?;",
            vec![Value::UInt32(Some(1))],
            &["COUNT(`id`)"],
            vec![vec![Value::Int64(Some(3))]],
        );
        let total = session()
            .select::<i64>()
            .select([count("id")])
            .from(table_of::<TestModel>())
            .fetch_one(&mut executor)
            .await
            .unwrap();
        assert_eq!(total, 3);

        executor.expect_rows(
            "SELECT `last_name` FROM `test_model`;",
            vec![],
            &["last_name"],
            vec![vec![Value::Varchar(None)], vec![Value::Varchar(Some("Lee".into()))]],
        );
        let names = session()
            .select::<Option<String>>()
            .select([col("last_name")])
            .from(table_of::<TestModel>())
            .fetch_all(&mut executor)
            .await
            .unwrap();
        assert_eq!(names, [None, Some("Lee".to_string())]);

        executor.expect_rows(
            "SELECT `id`,`age` FROM `test_model`;",
            vec![],
            &["id", "age"],
            vec![vec![Value::Int64(Some(1)), Value::Int64(Some(2))]],
        );
        let error = session()
            .select::<i64>()
            .select([col("id"), col("age")])
            .from(table_of::<TestModel>())
            .fetch_all(&mut executor)
            .await
            .unwrap_err();
        assert!(
            matches!(
                error.downcast_ref::<QueryError>(),
                Some(QueryError::Mapping { .. })
            ),
            "{error}"
        );
    }

    #[tokio::test]
    async fn embedded_records() {
        let mut executor = MockExecutor::new();
        executor.expect_rows(
            "SELECT `create_time`,`update_time`,`id`,`first_name`,`age`,`last_name` FROM `combined_model`;",
            vec![],
            &["create_time", "update_time", "id", "first_name", "age", "last_name"],
            vec![vec![
                Value::UInt64(Some(100)),
                Value::UInt64(Some(200)),
                Value::Int64(Some(5)),
                Value::Varchar(Some("Kim".into())),
                Value::Int8(Some(22)),
                Value::Varchar(None),
            ]],
        );
        let models = session()
            .select::<CombinedModel>()
            .fetch_all(&mut executor)
            .await
            .unwrap();
        assert_eq!(
            models,
            [CombinedModel {
                base: BaseEntity {
                    create_time: 100,
                    update_time: 200,
                },
                id: 5,
                first_name: "Kim".into(),
                age: 22,
                last_name: None,
            }]
        );
    }

    #[tokio::test]
    async fn missing_time_fields() {
        let mut executor = MockExecutor::new();
        executor.expect_rows(
            "SELECT `id` FROM `event`;",
            vec![],
            &["id"],
            vec![vec![Value::Int64(Some(1))]],
        );
        let error = session()
            .select::<Event>()
            .select([col("id")])
            .fetch_all(&mut executor)
            .await
            .unwrap_err();
        assert!(
            matches!(
                error.downcast_ref::<QueryError>(),
                Some(QueryError::Mapping { .. })
            ),
            "{error:#}"
        );
    }

    #[tokio::test]
    async fn typed_values() -> anyhow::Result<()> {
        let id = Uuid::from_str("6f2c8b1e-7d4a-4c3b-9a5e-1f0d2c3b4a59")?;
        let mut executor = MockExecutor::new();
        executor.expect_rows(
            "SELECT `id`,`amount`,`issued`,`paid_at` FROM `invoice` WHERE `id`=?;",
            vec![Value::Uuid(Some(id))],
            &["id", "amount", "issued", "paid_at"],
            vec![
                vec![
                    Value::Varchar(Some(id.to_string())),
                    Value::Decimal(Some(Decimal::from_str("12.50")?)),
                    Value::Date(Some(date!(2024 - 03 - 01))),
                    Value::Timestamp(Some(datetime!(2024-03-02 10:30:00))),
                ],
                vec![
                    Value::Blob(Some(id.as_bytes().to_vec().into())),
                    Value::Decimal(Some(Decimal::new(5, 0))),
                    Value::Date(Some(date!(2024 - 04 - 01))),
                    Value::TimestampWithTimezone(None),
                ],
            ],
        );
        let invoices = session()
            .select::<Invoice>()
            .filter([col("id").eq(id)])
            .fetch_all(&mut executor)
            .await?;
        assert_eq!(invoices.len(), 2);
        assert_eq!(invoices[0].id, id);
        assert_eq!(invoices[0].amount, Decimal::new(1250, 2));
        assert_eq!(
            invoices[0].paid_at,
            Some(datetime!(2024-03-02 10:30:00).assume_utc())
        );
        assert_eq!(invoices[1].id, id);
        assert_eq!(invoices[1].paid_at, None);
        Ok(())
    }

    #[tokio::test]
    async fn unexpected_queries_fail() {
        let mut executor = MockExecutor::new();
        executor.expect_error(
            "SELECT 1;",
            vec![],
            anyhow::anyhow!("never reached"),
        );
        let error = session()
            .select::<TestModel>()
            .fetch_all(&mut executor)
            .await
            .unwrap_err();
        assert!(error.to_string().starts_with("Expected `SELECT 1;`"), "{error}");
    }

    struct DropFlag(Arc<AtomicBool>);
    impl Drop for DropFlag {
        fn drop(&mut self) {
            self.0.store(true, Ordering::SeqCst);
        }
    }

    /// Yields one row, then never completes. Records when its stream is dropped.
    #[derive(Default)]
    struct StalledExecutor {
        dropped: Arc<AtomicBool>,
    }

    impl Executor for StalledExecutor {
        fn fetch(&mut self, _query: Query) -> impl Stream<Item = Result<RowLabeled>> + Send {
            let flag = DropFlag(self.dropped.clone());
            let labels: RowNames = vec!["COUNT(`id`)".to_string()].into();
            stream::iter([Ok(RowLabeled::new(
                labels,
                vec![Value::Int64(Some(1))].into(),
            ))])
            .chain(stream::pending())
            .map(move |row| {
                let _ = &flag;
                row
            })
        }
    }

    #[tokio::test]
    async fn dropping_the_stream_cancels_the_call() {
        let mut executor = StalledExecutor::default();
        let dropped = executor.dropped.clone();
        let mut rows = Box::pin(
            session()
                .select::<i64>()
                .select([count("id")])
                .from(table_of::<TestModel>())
                .fetch(&mut executor),
        );
        assert_eq!(rows.next().await.unwrap().unwrap(), 1);
        assert!(!dropped.load(Ordering::SeqCst));
        drop(rows);
        assert!(dropped.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn deadlines_wrap_the_call() {
        let mut executor = StalledExecutor::default();
        let dropped = executor.dropped.clone();
        let result = tokio::time::timeout(
            Duration::from_millis(20),
            session()
                .select::<i64>()
                .select([count("id")])
                .from(table_of::<TestModel>())
                .fetch_all(&mut executor),
        )
        .await;
        assert!(result.is_err());
        assert!(dropped.load(Ordering::SeqCst));
    }
}
