//! Message kinds exchanged by the swipe marketplace.
//!
//! These are **wire-agnostic** descriptions: field tags and schemas only.
//! Decoding lives in the `swipe-protocol` crate.

use crate::{define_field, define_schema};

define_field! {
    /// Bid price in cents.
    pub PriceCents,

    /// Dining halls the bidder accepts, one bit per hall.
    pub DiningHallBitfield,
}

define_schema! {
    /// A bidder looking to buy a swipe.
    ///
    /// ```text
    /// header (sender, secret, magic = 88)
    /// [0] PriceCents
    /// [1] DiningHallBitfield
    /// text: free-form note
    /// ```
    pub BuyQuery = 88 {
        PriceCents,
        DiningHallBitfield,
    }
}
