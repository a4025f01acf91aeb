//! Decoding against schemas known only at runtime.
//!
//! Same wire rules as [`DecodedMessage`](crate::DecodedMessage); fields
//! are looked up by name instead of by tag type, and a lookup for an
//! undeclared name is an error rather than a default.

use std::borrow::Cow;

use swipe_core::{DynamicSchema, SchemaError};
use tracing::trace;

use crate::binary_codec::decode_frame;
use crate::error::DecodeError;
use crate::validator::SecretValidator;
use crate::wire_types::ByteOrder;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DynamicMessage {
    schema: DynamicSchema,
    values: Vec<u64>,
    sender_id: u64,
    text: Vec<u8>,
    byte_order: ByteOrder,
}

impl DynamicMessage {
    /// Decode `buf` against `schema`, calling `validator` on its header.
    pub fn decode<V>(schema: &DynamicSchema, buf: &[u8], validator: &V) -> Result<Self, DecodeError>
    where
        V: SecretValidator + ?Sized,
    {
        let frame = decode_frame(schema.magic(), schema.field_count(), buf, validator)?;
        trace!(
            schema = schema.name(),
            sender_id = frame.sender_id,
            text_len = frame.text.len(),
            "decoded message"
        );
        Ok(DynamicMessage {
            schema: schema.clone(),
            values: frame.slots,
            sender_id: frame.sender_id,
            text: frame.text,
            byte_order: frame.byte_order,
        })
    }

    pub fn schema(&self) -> &DynamicSchema {
        &self.schema
    }

    /// Value of `field`, or `UnknownField` if the schema lacks it.
    pub fn get(&self, field: &str) -> Result<u64, SchemaError> {
        let slot = self.schema.slot_of(field)?;
        Ok(self.values[slot])
    }

    pub fn sender_id(&self) -> u64 {
        self.sender_id
    }

    /// `(name, value)` pairs in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, u64)> + '_ {
        self.schema
            .fields()
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }

    pub fn values(&self) -> &[u64] {
        &self.values
    }

    pub fn text(&self) -> &[u8] {
        &self.text
    }

    pub fn text_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.text)
    }

    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }
}
