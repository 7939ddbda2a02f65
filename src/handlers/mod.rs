//! HTTP handlers for entity CRUD and the catalog view.

pub mod entity;
pub mod schema;
pub use entity::*;
pub use schema::*;
