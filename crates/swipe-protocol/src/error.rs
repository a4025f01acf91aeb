//! Errors raised while encoding, decoding and loading schemas.

use std::path::PathBuf;

use swipe_core::SchemaError;
use thiserror::Error;

/// Reasons a buffer cannot be decoded.
///
/// Every variant aborts the decode; no partial message is produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Buffer cannot even hold the fixed header.
    #[error("serial message too short for header: need {need} bytes, got {got}")]
    TooShortForHeader { need: usize, got: usize },

    /// Header magic matches neither the expected version nor its
    /// byte-swapped form.
    #[error("wrong magic number: expected {expected}, got {actual:#018x}")]
    WrongMagicNumber { expected: u32, actual: u64 },

    /// Version matched but the payload is truncated.
    #[error("serial message too short for message with magic number {magic}: need {need} bytes, got {got}")]
    TooShortForMessage { magic: u32, need: usize, got: usize },

    /// The secret validator declined the header.
    #[error("secret validation rejected sender {sender_id}: {reason}")]
    ValidationRejected { sender_id: u64, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error("secret is {len} bytes; the header holds at most {max}")]
    SecretTooLong { len: usize, max: usize },
}

/// Errors from building or using a [`SchemaRegistry`](crate::SchemaRegistry).
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("schema name `{0}` is registered twice")]
    DuplicateName(String),

    #[error("magic number {magic} is claimed by both `{first}` and `{second}`")]
    DuplicateMagic {
        magic: u32,
        first: String,
        second: String,
    },

    #[error("no schema named `{0}`")]
    UnknownSchema(String),

    /// No registered schema accepts the header's magic, forwards or
    /// swapped.
    #[error("no schema registered for magic number {0:#018x}")]
    UnknownMagic(u64),

    #[error("invalid schema configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("cannot read schema configuration {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Decode(#[from] DecodeError),
}
