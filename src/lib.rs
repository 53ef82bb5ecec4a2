//! Quarry: typed `SELECT` generation and result mapping.
//!
//! Records derive [`Entity`], statements are built with a [`Selector`] obtained
//! from a [`Session`], and rows come back through any [`Executor`].
//!
//! ```rust,ignore
//! use quarry::*;
//!
//! #[derive(Entity)]
//! struct User {
//!     #[quarry(primary_key)]
//!     id: i64,
//!     name: String,
//!     age: Option<i32>,
//! }
//!
//! let session = Session::new(Dialect::mysql());
//! let query = session
//!     .select::<User>()
//!     .filter([col("age").ge(18)])
//!     .build()?;
//! assert_eq!(query.sql, "SELECT `id`,`name`,`age` FROM `user` WHERE `age`>=?;");
//! ```
pub use quarry_core::*;
pub use quarry_macros::Entity;
