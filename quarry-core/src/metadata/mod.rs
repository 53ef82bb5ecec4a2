mod column;
mod registry;
mod shape;
mod table;

pub use column::*;
pub use registry::*;
pub use shape::*;
pub use table::*;
