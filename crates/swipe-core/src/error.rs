//! Error types for schema construction and field lookup.
//!
//! Static schemas are checked by the compiler; these errors come from
//! [`DynamicSchema`](crate::DynamicSchema), whose definitions arrive at
//! runtime (typically from a configuration file).

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// Magic number 0 cannot be told apart from its byte-swapped form.
    #[error("schema `{schema}` has magic number 0; the byte-order check needs a non-zero value")]
    ZeroMagic { schema: String },

    #[error("schema name is empty")]
    EmptySchemaName,

    #[error("schema `{schema}` declares a field with an empty name")]
    EmptyFieldName { schema: String },

    /// The same field appears twice in one schema.
    #[error("schema `{schema}` declares field `{field}` more than once")]
    DuplicateField { schema: String, field: String },

    /// The sender id is implicit in every message.
    #[error("schema `{schema}` declares reserved field `{field}`; the sender id is always taken from the header")]
    ReservedField { schema: String, field: String },

    /// Lookup of a field the schema does not declare.
    #[error("schema `{schema}` has no field `{field}`")]
    UnknownField { schema: String, field: String },
}
