use quarry::Entity;

#[derive(Entity, Debug, Clone, PartialEq, Default)]
pub struct TestModel {
    #[quarry(primary_key, auto_increment)]
    pub id: i64,
    pub first_name: String,
    pub age: i8,
    pub last_name: Option<String>,
}

#[derive(Entity, Debug, Clone, PartialEq, Default)]
pub struct PhoneModel {
    pub user_id: i64,
    pub phone: String,
}

#[derive(Entity, Debug, Clone, PartialEq, Default)]
pub struct BaseEntity {
    pub create_time: u64,
    pub update_time: u64,
}

#[derive(Entity, Debug, Clone, PartialEq, Default)]
pub struct CombinedModel {
    #[quarry(embedded)]
    pub base: BaseEntity,
    pub id: i64,
    pub first_name: String,
    pub age: i8,
    pub last_name: Option<String>,
}

#[derive(Entity, Debug, Clone, PartialEq)]
#[quarry(name = "users")]
pub struct Renamed {
    #[quarry(primary_key)]
    pub id: i64,
    #[quarry(name = "nick")]
    pub name: String,
}

#[derive(Entity, Debug)]
pub struct WithTuple {
    pub id: i64,
    pub pair: (i32, i32),
}

#[derive(Entity, Debug)]
pub struct Clashing {
    pub first_name: String,
    #[quarry(name = "first_name")]
    pub alias_name: String,
}

#[derive(Entity, Debug)]
pub struct ClashingEmbedded {
    #[quarry(embedded)]
    pub base: BaseEntity,
    pub create_time: u64,
}

#[derive(Entity, Debug, Clone, PartialEq)]
pub struct Event {
    pub id: i64,
    pub happened_at: time::PrimitiveDateTime,
}

#[derive(Entity, Debug, Clone, PartialEq)]
pub struct Invoice {
    #[quarry(primary_key)]
    pub id: uuid::Uuid,
    pub amount: rust_decimal::Decimal,
    pub issued: time::Date,
    pub paid_at: Option<time::OffsetDateTime>,
}
