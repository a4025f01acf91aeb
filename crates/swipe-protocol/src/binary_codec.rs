//! Binary encoding/decoding for schema-described messages.
//!
//! Framing model (single-message buffer):
//!
//! ```text
//! [0..8]        sender_id     (u64, producer byte order)
//! [8..72]       secret        (64 opaque bytes, never swapped)
//! [72..80]      magic_number  (u64, = schema magic, possibly swapped)
//! [80+8k..88+8k] field[k]     (u64, one per declared field)
//! [80+8n..]     text          (raw bytes, never swapped)
//! ```
//!
//! Decode order:
//! 1. header length check (`TooShortForHeader`)
//! 2. secret validator, on the header as read (`ValidationRejected`)
//! 3. magic check, native then swapped (`WrongMagicNumber`)
//! 4. message length check (`TooShortForMessage`)
//! 5. field extraction and text tail
//!
//! NOTE: This module decodes **one message per buffer**. Transports
//! provide their own framing and hand over complete buffers.

use std::borrow::Cow;
use std::fmt;
use std::marker::PhantomData;

use swipe_core::{Field, FieldTag, HasField, Schema, SenderId};
use tracing::{debug, trace};

use crate::error::{DecodeError, EncodeError};
use crate::validator::SecretValidator;
use crate::wire_types::{minimum_len, ByteOrder, WireHeader, FIELD_WIDTH, HEADER_LEN, SECRET_LEN};

/// Schema-independent result of a successful decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Frame {
    pub sender_id: u64,
    pub slots: Vec<u64>,
    pub text: Vec<u8>,
    pub byte_order: ByteOrder,
}

/// Decode `buf` against a schema given by its magic number and payload
/// field count.
pub(crate) fn decode_frame<V>(
    magic: u32,
    field_count: usize,
    buf: &[u8],
    validator: &V,
) -> Result<Frame, DecodeError>
where
    V: SecretValidator + ?Sized,
{
    let header = WireHeader::read(buf)?;

    validator.validate(&header).map_err(|rejection| {
        debug!(sender_id = header.sender_id, reason = rejection.reason(), "secret rejected");
        DecodeError::ValidationRejected {
            sender_id: header.sender_id,
            reason: rejection.into_reason(),
        }
    })?;

    let byte_order = ByteOrder::detect(magic, header.magic_number).ok_or_else(|| {
        debug!(expected = magic, actual = header.magic_number, "wrong magic number");
        DecodeError::WrongMagicNumber {
            expected: magic,
            actual: header.magic_number,
        }
    })?;
    if byte_order.is_swapped() {
        trace!(magic, "producer byte order is swapped");
    }

    let need = minimum_len(field_count);
    if buf.len() < need {
        debug!(magic, need, got = buf.len(), "message truncated");
        return Err(DecodeError::TooShortForMessage {
            magic,
            need,
            got: buf.len(),
        });
    }

    let slots = buf[HEADER_LEN..need]
        .chunks_exact(FIELD_WIDTH)
        .map(|chunk| {
            let mut raw = [0u8; FIELD_WIDTH];
            raw.copy_from_slice(chunk);
            byte_order.apply(u64::from_ne_bytes(raw))
        })
        .collect();

    Ok(Frame {
        sender_id: byte_order.apply(header.sender_id),
        slots,
        text: buf[need..].to_vec(),
        byte_order,
    })
}

/// A message decoded against schema `S`.
///
/// Fields are read by tag:
///
/// ```
/// use swipe_core::{BuyQuery, PriceCents};
/// use swipe_protocol::{AcceptAll, ByteOrder, DecodedMessage, MessageBuilder};
///
/// let bytes = MessageBuilder::<BuyQuery>::new(7)
///     .set::<PriceCents>(450)
///     .to_bytes(ByteOrder::Native);
///
/// let msg = DecodedMessage::<BuyQuery>::decode(&bytes, &AcceptAll).unwrap();
/// assert_eq!(msg.value::<PriceCents>(), 450);
/// assert_eq!(msg.sender_id().get(), 7);
/// ```
///
/// Asking for a tag the schema does not declare is a compile error.
pub struct DecodedMessage<S: Schema> {
    slots: Box<[u64]>,
    sender_id: Field<SenderId>,
    text: Vec<u8>,
    byte_order: ByteOrder,
    schema: PhantomData<fn() -> S>,
}

impl<S: Schema> DecodedMessage<S> {
    /// Decode `buf` as an `S` message, calling `validator` on its header.
    pub fn decode<V>(buf: &[u8], validator: &V) -> Result<Self, DecodeError>
    where
        V: SecretValidator + ?Sized,
    {
        let frame = decode_frame(S::MAGIC, S::FIELD_COUNT, buf, validator)?;
        trace!(
            schema = S::NAME,
            sender_id = frame.sender_id,
            text_len = frame.text.len(),
            "decoded message"
        );
        Ok(DecodedMessage {
            slots: frame.slots.into_boxed_slice(),
            sender_id: Field::new(frame.sender_id),
            text: frame.text,
            byte_order: frame.byte_order,
            schema: PhantomData,
        })
    }

    pub fn get<T: FieldTag>(&self) -> &Field<T>
    where
        S: HasField<T>,
    {
        Field::from_slot(&self.slots[<S as HasField<T>>::SLOT])
    }

    pub fn get_mut<T: FieldTag>(&mut self) -> &mut Field<T>
    where
        S: HasField<T>,
    {
        Field::from_slot_mut(&mut self.slots[<S as HasField<T>>::SLOT])
    }

    /// Shorthand for `get::<T>().get()`.
    pub fn value<T: FieldTag>(&self) -> u64
    where
        S: HasField<T>,
    {
        self.get::<T>().get()
    }

    /// Sender id from the header, in host byte order.
    pub fn sender_id(&self) -> Field<SenderId> {
        self.sender_id
    }

    /// Payload values in declaration order, host byte order.
    pub fn values(&self) -> &[u64] {
        &self.slots
    }

    /// Trailing bytes after the last field.
    pub fn text(&self) -> &[u8] {
        &self.text
    }

    /// Trailing bytes as text, with invalid UTF-8 replaced.
    pub fn text_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.text)
    }

    pub fn into_text(self) -> Vec<u8> {
        self.text
    }

    /// Byte order the producer used.
    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }
}

impl<S: Schema> Clone for DecodedMessage<S> {
    fn clone(&self) -> Self {
        DecodedMessage {
            slots: self.slots.clone(),
            sender_id: self.sender_id,
            text: self.text.clone(),
            byte_order: self.byte_order,
            schema: PhantomData,
        }
    }
}

impl<S: Schema> PartialEq for DecodedMessage<S> {
    fn eq(&self, other: &Self) -> bool {
        self.slots == other.slots
            && self.sender_id == other.sender_id
            && self.text == other.text
            && self.byte_order == other.byte_order
    }
}

impl<S: Schema> Eq for DecodedMessage<S> {}

impl<S: Schema> fmt::Debug for DecodedMessage<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct(S::NAME);
        for (name, value) in S::FIELD_NAMES.iter().zip(self.slots.iter()) {
            s.field(name, value);
        }
        s.field(SenderId::NAME, &self.sender_id.get())
            .field("text", &self.text_lossy())
            .field("byte_order", &self.byte_order)
            .finish()
    }
}

/// Builds the wire bytes of an `S` message.
///
/// Unset fields encode as zero. The secret is zero-padded to
/// [`SECRET_LEN`] bytes.
pub struct MessageBuilder<S: Schema> {
    sender_id: u64,
    secret: [u8; SECRET_LEN],
    slots: Vec<u64>,
    text: Vec<u8>,
    schema: PhantomData<fn() -> S>,
}

impl<S: Schema> MessageBuilder<S> {
    pub fn new(sender_id: u64) -> Self {
        MessageBuilder {
            sender_id,
            secret: [0; SECRET_LEN],
            slots: vec![0; S::FIELD_COUNT],
            text: Vec::new(),
            schema: PhantomData,
        }
    }

    /// Set the secret block. Fails if `secret` exceeds [`SECRET_LEN`].
    pub fn secret(mut self, secret: &[u8]) -> Result<Self, EncodeError> {
        if secret.len() > SECRET_LEN {
            return Err(EncodeError::SecretTooLong {
                len: secret.len(),
                max: SECRET_LEN,
            });
        }
        self.secret = [0; SECRET_LEN];
        self.secret[..secret.len()].copy_from_slice(secret);
        Ok(self)
    }

    pub fn set<T: FieldTag>(mut self, value: u64) -> Self
    where
        S: HasField<T>,
    {
        self.slots[<S as HasField<T>>::SLOT] = value;
        self
    }

    pub fn text(mut self, text: impl Into<Vec<u8>>) -> Self {
        self.text = text.into();
        self
    }

    /// Append the encoded message to `out`.
    ///
    /// With [`ByteOrder::Swapped`] every integer (sender id, magic,
    /// fields) is written byte-reversed, as a host of the opposite
    /// endianness would have written it. Secret and text are untouched.
    pub fn encode_into(&self, byte_order: ByteOrder, out: &mut Vec<u8>) {
        out.reserve(minimum_len(S::FIELD_COUNT) + self.text.len());

        WireHeader {
            sender_id: byte_order.apply(self.sender_id),
            secret: self.secret,
            magic_number: byte_order.apply(S::magic_number()),
        }
        .write(out);

        for &value in &self.slots {
            out.extend_from_slice(&byte_order.apply(value).to_ne_bytes());
        }
        out.extend_from_slice(&self.text);
    }

    pub fn to_bytes(&self, byte_order: ByteOrder) -> Vec<u8> {
        let mut out = Vec::new();
        self.encode_into(byte_order, &mut out);
        out
    }
}

impl<S: Schema> fmt::Debug for MessageBuilder<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageBuilder")
            .field("schema", &S::NAME)
            .field("sender_id", &self.sender_id)
            .field("slots", &self.slots)
            .field("text_len", &self.text.len())
            .finish()
    }
}
