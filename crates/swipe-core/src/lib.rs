//! swipe-core
//!
//! Pure message model:
//! - typed 64-bit fields (`Field<T>`, `define_field!`)
//! - message schemas, static (`define_schema!`) and dynamic
//! - the marketplace's message kinds

pub mod field;
pub mod schema;
pub mod error;
pub mod messages;

pub use field::{Field, FieldTag, SenderId};
pub use schema::{DynamicSchema, HasField, Schema};
pub use error::SchemaError;

pub use messages::{BuyQuery, DiningHallBitfield, PriceCents};
