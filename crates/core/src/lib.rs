pub mod error;
pub mod schema;

pub use error::{DashError, Result, Rule, SchemaError, Violation};
pub use schema::{Kind, PropertySpec, Range, Schema};
