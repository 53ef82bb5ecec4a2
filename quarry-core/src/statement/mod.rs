mod builder;
mod select;

pub(crate) use builder::*;
pub use select::*;
