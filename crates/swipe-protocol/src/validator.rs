//! Secret validation hook.
//!
//! The decoder calls a [`SecretValidator`] once per decode attempt, right
//! after the header has been copied out and *before* the magic number is
//! checked. The validator therefore sees the header exactly as it was
//! read: its integers are still in the producer's byte order, which is
//! not known yet at that point.
//!
//! What counts as a valid secret is up to the caller. [`AcceptAll`] is the
//! pass-through policy; any `Fn(&WireHeader) -> bool` also works.

use std::fmt;

use crate::wire_types::WireHeader;

/// A validator's refusal, with a human-readable reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    reason: String,
}

impl Rejection {
    pub fn new(reason: impl Into<String>) -> Self {
        Rejection {
            reason: reason.into(),
        }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub fn into_reason(self) -> String {
        self.reason
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.reason)
    }
}

/// Accept or reject a message header based on its sender and secret.
pub trait SecretValidator {
    fn validate(&self, header: &WireHeader) -> Result<(), Rejection>;
}

/// Accepts every header.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AcceptAll;

impl SecretValidator for AcceptAll {
    fn validate(&self, _header: &WireHeader) -> Result<(), Rejection> {
        Ok(())
    }
}

impl<F> SecretValidator for F
where
    F: Fn(&WireHeader) -> bool,
{
    fn validate(&self, header: &WireHeader) -> Result<(), Rejection> {
        if self(header) {
            Ok(())
        } else {
            Err(Rejection::new("secret rejected"))
        }
    }
}
