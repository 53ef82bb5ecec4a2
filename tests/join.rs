mod resource {
    pub mod mock_executor;
    pub mod models;
}

#[cfg(test)]
mod tests {
    use crate::resource::{
        mock_executor::init_logs,
        models::{PhoneModel, TestModel},
    };
    use quarry::{
        Column, DataSet, Dialect, QueryError, Session, Value, col, count, table_of,
    };

    fn session() -> Session {
        init_logs();
        Session::new(Dialect::mysql())
    }

    #[test]
    fn join_on() {
        let t1 = table_of::<TestModel>().alias("t1");
        let t2 = table_of::<PhoneModel>();
        let query = session()
            .select::<TestModel>()
            .from(t1.clone().join(t2.clone()).on([t1.c("id").eq(t2.c("user_id"))]))
            .build()
            .unwrap();
        assert_eq!(
            query.sql,
            "SELECT `id`,`first_name`,`age`,`last_name` FROM (`test_model` AS `t1` JOIN `phone_model` ON `t1`.`id`=`user_id`);"
        );
    }

    #[test]
    fn join_kinds() {
        let t1 = table_of::<TestModel>().alias("t1");
        let t2 = table_of::<PhoneModel>().alias("t2");
        let on = || [t1.c("id").eq(t2.c("user_id"))];
        for (join, keyword) in [
            (t1.clone().inner_join(t2.clone()).on(on()), "INNER JOIN"),
            (t1.clone().left_join(t2.clone()).on(on()), "LEFT JOIN"),
            (t1.clone().right_join(t2.clone()).on(on()), "RIGHT JOIN"),
        ] {
            let query = session()
                .select::<TestModel>()
                .select([t1.c("id"), t2.c("phone")])
                .from(join)
                .build()
                .unwrap();
            assert_eq!(
                query.sql,
                format!(
                    "SELECT `t1`.`id`,`t2`.`phone` FROM (`test_model` AS `t1` {keyword} `phone_model` AS `t2` ON `t1`.`id`=`t2`.`user_id`);"
                )
            );
        }
    }

    #[test]
    fn nested_joins() {
        let t1 = table_of::<TestModel>().alias("t1");
        let t2 = table_of::<PhoneModel>().alias("t2");
        let t3 = table_of::<TestModel>().alias("t3");
        let j1 = t1.clone().join(t2.clone()).on([t1.c("id").eq(t2.c("user_id"))]);
        let j2 = j1.join(t3.clone()).on([t2.c("user_id").eq(t3.c("id"))]);
        let query = session()
            .select::<TestModel>()
            .select([t3.c("first_name")])
            .from(j2)
            .filter([t1.c("age").gt(18)])
            .build()
            .unwrap();
        assert_eq!(
            query.sql,
            "SELECT `t3`.`first_name` FROM ((`test_model` AS `t1` JOIN `phone_model` AS `t2` ON `t1`.`id`=`t2`.`user_id`) JOIN `test_model` AS `t3` ON `t2`.`user_id`=`t3`.`id`) WHERE `t1`.`age`>?;"
        );
        assert_eq!(query.args, [Value::Int32(Some(18))]);
    }

    #[test]
    fn join_with_several_conditions() {
        let t1 = table_of::<TestModel>().alias("t1");
        let t2 = table_of::<PhoneModel>().alias("t2");
        let query = session()
            .select::<TestModel>()
            .select([t2.c("phone")])
            .from(
                t1.clone()
                    .left_join(t2.clone())
                    .on([t1.c("id").eq(t2.c("user_id")), t2.c("phone").like("1%")]),
            )
            .build()
            .unwrap();
        assert_eq!(
            query.sql,
            "SELECT `t2`.`phone` FROM (`test_model` AS `t1` LEFT JOIN `phone_model` AS `t2` ON (`t1`.`id`=`t2`.`user_id`) AND (`t2`.`phone` LIKE ?));"
        );
        assert_eq!(query.args, [Value::Varchar(Some("1%".into()))]);
    }

    #[test]
    fn join_using() {
        let t1 = table_of::<TestModel>().alias("t1");
        let t3 = table_of::<TestModel>().alias("t3");
        let query = session()
            .select::<TestModel>()
            .select([t1.c("id")])
            .from(t1.clone().join(t3).using(["first_name", "last_name"]))
            .build()
            .unwrap();
        assert_eq!(
            query.sql,
            "SELECT `t1`.`id` FROM (`test_model` AS `t1` JOIN `test_model` AS `t3` USING (`first_name`,`last_name`));"
        );

        let error = session()
            .select::<TestModel>()
            .from(t1.join(table_of::<PhoneModel>()).using(["Invalid"]))
            .build()
            .unwrap_err()
            .downcast::<QueryError>()
            .unwrap();
        assert_eq!(error, QueryError::InvalidField("Invalid".into()));
    }

    #[test]
    fn qualified_invalid_field() {
        let t1 = table_of::<TestModel>().alias("t1");
        let t2 = table_of::<PhoneModel>().alias("t2");
        let error = session()
            .select::<TestModel>()
            .select([t2.c("first_name")])
            .from(t1.clone().join(t2.clone()).on([t1.c("id").eq(t2.c("user_id"))]))
            .build()
            .unwrap_err()
            .downcast::<QueryError>()
            .unwrap();
        assert_eq!(error, QueryError::InvalidField("first_name".into()));
    }

    #[test]
    fn column_owned_by_join() {
        let t1 = table_of::<TestModel>().alias("t1");
        let t2 = table_of::<PhoneModel>().alias("t2");
        let join = t1.clone().join(t2.clone()).on([t1.c("id").eq(t2.c("user_id"))]);
        let error = session()
            .select::<TestModel>()
            .select([Column::owned_by(join.clone(), "id")])
            .from(join)
            .build()
            .unwrap_err()
            .downcast::<QueryError>()
            .unwrap();
        assert!(matches!(error, QueryError::UnsupportedExpression(..)), "{error}");
    }

    #[test]
    fn scalar_over_join() {
        let t1 = table_of::<TestModel>().alias("t1");
        let t2 = table_of::<PhoneModel>().alias("t2");
        let query = session()
            .select::<i64>()
            .select([count("id")])
            .from(t1.clone().join(t2.clone()).on([t1.c("id").eq(t2.c("user_id"))]))
            .filter([col("age").ge(18)])
            .build()
            .unwrap();
        assert_eq!(
            query.sql,
            "SELECT COUNT(`id`) FROM (`test_model` AS `t1` JOIN `phone_model` AS `t2` ON `t1`.`id`=`t2`.`user_id`) WHERE `age`>=?;"
        );
    }
}
