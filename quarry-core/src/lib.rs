mod as_value;
mod error;
mod expression;
mod join;
mod metadata;
mod querier;
mod session;
mod statement;
mod table_ref;
mod util;
mod value;
pub mod writer;

pub use ::anyhow::Context;
pub use as_value::*;
pub use error::*;
pub use expression::*;
pub use join::*;
pub use metadata::*;
pub use querier::*;
pub use session::*;
pub use statement::*;
pub use table_ref::*;
pub use util::*;
pub use value::*;
pub use writer::{Dialect, Placeholder, SqlWriter};
pub mod stream {
    pub use ::futures::stream::*;
}

pub type Result<T, E = Error> = anyhow::Result<T, E>;
pub type Error = anyhow::Error;
