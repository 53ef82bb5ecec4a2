mod entity;
mod executor;
mod from_row;
mod query;

pub use entity::*;
pub use executor::*;
pub use from_row::*;
pub use query::*;
