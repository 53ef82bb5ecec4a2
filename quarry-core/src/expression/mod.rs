mod aggregate;
mod column;
mod ordered;
mod predicate;
mod raw;

pub use aggregate::*;
pub use column::*;
pub use ordered::*;
pub use predicate::*;
pub use raw::*;
