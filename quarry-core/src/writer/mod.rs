mod context;
mod dialect;
mod sql_writer;

pub use context::*;
pub use dialect::*;
pub use sql_writer::*;
