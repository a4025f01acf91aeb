//! swipe-protocol
//!
//! Wire-level decoding/encoding for swipe marketplace messages.
//!
//! Every message is an 80-byte header (sender id, 64-byte secret, magic
//! number) followed by one 8-byte slot per schema field and a free-form
//! text tail. The magic number identifies the message kind and, by
//! whether it reads forwards or byte-swapped, the producer's byte order.
//!
//! - [`wire_types`]   : header layout, byte-order detection
//! - [`binary_codec`] : typed decode ([`DecodedMessage`]) and encode ([`MessageBuilder`])
//! - [`dynamic`]      : decode against runtime schemas
//! - [`registry`]     : schema registry loaded from [`config`]
//! - [`validator`]    : the secret validation hook

pub mod wire_types;
pub mod binary_codec;
pub mod dynamic;
pub mod validator;
pub mod config;
pub mod registry;
pub mod error;

pub use wire_types::{ByteOrder, WireHeader, HEADER_LEN, SECRET_LEN};
pub use binary_codec::{DecodedMessage, MessageBuilder};
pub use dynamic::DynamicMessage;
pub use validator::{AcceptAll, Rejection, SecretValidator};
pub use config::{MessageConfig, RegistryConfig};
pub use registry::SchemaRegistry;
pub use error::{DecodeError, EncodeError, RegistryError};
