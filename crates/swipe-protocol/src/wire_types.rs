//! Low-level wire types and constants.
//!
//! This module defines:
//! - the fixed 80-byte message header,
//! - byte-order detection from the header's magic number,
//! - layout helpers (offsets, minimum lengths).
//!
//! The actual encode/decode logic lives in `binary_codec`.

use std::fmt;

use bytemuck::{Pod, Zeroable};

use crate::error::DecodeError;

/// Width of every numeric value on the wire.
pub const FIELD_WIDTH: usize = 8;

/// Size of the secret block carried in every header.
pub const SECRET_LEN: usize = 64;

/// Byte offset of the sender id.
pub const SENDER_ID_OFFSET: usize = 0;

/// Byte offset of the secret block.
pub const SECRET_OFFSET: usize = SENDER_ID_OFFSET + FIELD_WIDTH;

/// Byte offset of the magic number.
pub const MAGIC_OFFSET: usize = SECRET_OFFSET + SECRET_LEN;

/// Size of the header; also the offset of the first payload field.
pub const HEADER_LEN: usize = MAGIC_OFFSET + FIELD_WIDTH;

const _: () = assert!(HEADER_LEN == 80);
const _: () = assert!(std::mem::size_of::<WireHeader>() == HEADER_LEN);

/// Fixed prefix of every serial message.
///
/// Integers are kept exactly as read, in the producer's byte order.
/// Use [`ByteOrder::apply`] to normalise them.
#[repr(C)]
#[derive(Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct WireHeader {
    pub sender_id: u64,
    pub secret: [u8; SECRET_LEN],
    pub magic_number: u64,
}

impl WireHeader {
    /// Copy the header out of the front of `buf`.
    ///
    /// `buf` may start at any address; nothing about its alignment is
    /// assumed.
    pub fn read(buf: &[u8]) -> Result<Self, DecodeError> {
        let bytes = buf.get(..HEADER_LEN).ok_or(DecodeError::TooShortForHeader {
            need: HEADER_LEN,
            got: buf.len(),
        })?;
        Ok(bytemuck::pod_read_unaligned(bytes))
    }

    /// Append the header's bytes, as stored, to `out`.
    pub fn write(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(bytemuck::bytes_of(self));
    }

    /// Secret block with trailing zero padding removed.
    pub fn secret_trimmed(&self) -> &[u8] {
        let end = self
            .secret
            .iter()
            .rposition(|&b| b != 0)
            .map_or(0, |i| i + 1);
        &self.secret[..end]
    }
}

impl fmt::Debug for WireHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WireHeader")
            .field("sender_id", &self.sender_id)
            .field("secret", &"<redacted>")
            .field("magic_number", &format_args!("{:#018x}", self.magic_number))
            .finish()
    }
}

/// Producer byte order relative to this host.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ByteOrder {
    /// Same as the host.
    Native,
    /// Reversed relative to the host.
    Swapped,
}

impl ByteOrder {
    /// Work out the producer's byte order from the header's magic.
    ///
    /// `expected` is non-zero and fits in 32 bits, so its 64-bit form has
    /// an all-zero high half and a non-zero low half. Swapping moves the
    /// non-zero bytes into the other half, so `observed` can never match
    /// both forms.
    pub fn detect(expected: u32, observed: u64) -> Option<ByteOrder> {
        let expected = u64::from(expected);
        if observed == expected {
            Some(ByteOrder::Native)
        } else if observed.swap_bytes() == expected {
            Some(ByteOrder::Swapped)
        } else {
            None
        }
    }

    /// Normalise a value read in this byte order to host order (and back:
    /// the operation is its own inverse).
    #[inline]
    pub fn apply(self, value: u64) -> u64 {
        match self {
            ByteOrder::Native => value,
            ByteOrder::Swapped => value.swap_bytes(),
        }
    }

    pub fn is_swapped(self) -> bool {
        self == ByteOrder::Swapped
    }
}

/// Smallest buffer holding a header plus `field_count` payload fields.
///
/// The sender id lives in the header and is not counted again here.
pub const fn minimum_len(field_count: usize) -> usize {
    HEADER_LEN + field_count * FIELD_WIDTH
}

/// Byte offset of payload slot `slot`.
pub const fn field_offset(slot: usize) -> usize {
    HEADER_LEN + slot * FIELD_WIDTH
}
