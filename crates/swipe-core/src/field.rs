//! Strongly-typed 64-bit message fields.
//!
//! Every numeric value carried by a message is a `u64` on the wire, but
//! each one means something different (a price, a bitfield, a sender).
//! [`Field<T>`] wraps the raw value and tags it with a zero-sized marker
//! type `T`, so a `Field<PriceCents>` can never be passed where a
//! `Field<DiningHallBitfield>` is expected even though both are just
//! eight bytes.
//!
//! Tags are declared with [`define_field!`](crate::define_field):
//!
//! ```
//! use swipe_core::{define_field, Field, FieldTag};
//!
//! define_field! {
//!     /// Quantity in whole units.
//!     pub Quantity
//! }
//!
//! let q = Field::<Quantity>::new(12);
//! assert_eq!(q.get(), 12);
//! assert_eq!(Quantity::NAME, "Quantity");
//! ```

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use bytemuck::TransparentWrapper;

/// Marker trait implemented by every field-name tag.
///
/// Tags are uninhabited types; they only exist at the type level.
pub trait FieldTag: 'static {
    /// Field name used in diagnostics and runtime schemas.
    const NAME: &'static str;
}

/// A `u64` tagged with the field it belongs to.
#[repr(transparent)]
pub struct Field<T: FieldTag> {
    value: u64,
    tag: PhantomData<fn() -> T>,
}

// SAFETY: `Field<T>` is `repr(transparent)` over `u64`; the only other
// member is a `PhantomData`, which is a 1-ZST.
unsafe impl<T: FieldTag> TransparentWrapper<u64> for Field<T> {}

impl<T: FieldTag> Field<T> {
    pub const fn new(value: u64) -> Self {
        Field {
            value,
            tag: PhantomData,
        }
    }

    /// Plain integer value.
    #[inline]
    pub const fn get(self) -> u64 {
        self.value
    }

    /// Overwrite the stored value.
    #[inline]
    pub fn set(&mut self, value: u64) {
        self.value = value;
    }

    /// Reverse the byte order of the stored value in place.
    ///
    /// Used once per field while decoding a message produced on a host
    /// of the opposite endianness.
    #[inline]
    pub fn swap_endian(&mut self) {
        self.value = self.value.swap_bytes();
    }

    /// View a raw slot as a typed field.
    #[inline]
    pub fn from_slot(slot: &u64) -> &Self {
        Self::wrap_ref(slot)
    }

    /// Mutable view of a raw slot as a typed field.
    #[inline]
    pub fn from_slot_mut(slot: &mut u64) -> &mut Self {
        Self::wrap_mut(slot)
    }

    /// Field name of the tag.
    pub fn name(&self) -> &'static str {
        T::NAME
    }
}

impl<T: FieldTag> Default for Field<T> {
    fn default() -> Self {
        Field::new(0)
    }
}

// Manual impls: deriving would put bounds on `T`, which is uninhabited.

impl<T: FieldTag> Clone for Field<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: FieldTag> Copy for Field<T> {}

impl<T: FieldTag> PartialEq for Field<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T: FieldTag> Eq for Field<T> {}

impl<T: FieldTag> PartialOrd for Field<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: FieldTag> Ord for Field<T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.value.cmp(&other.value)
    }
}

impl<T: FieldTag> Hash for Field<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<T: FieldTag> fmt::Debug for Field<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", T::NAME, self.value)
    }
}

impl<T: FieldTag> fmt::Display for Field<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.value, f)
    }
}

impl<T: FieldTag> From<u64> for Field<T> {
    fn from(value: u64) -> Self {
        Field::new(value)
    }
}

impl<T: FieldTag> From<Field<T>> for u64 {
    fn from(field: Field<T>) -> Self {
        field.value
    }
}

/// Declare one or more field-name tags.
///
/// Each tag becomes an uninhabited `enum` implementing [`FieldTag`],
/// with `NAME` set to the identifier.
#[macro_export]
macro_rules! define_field {
    ($($(#[$meta:meta])* $vis:vis $name:ident),+ $(,)?) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
            $vis enum $name {}

            impl $crate::FieldTag for $name {
                const NAME: &'static str = stringify!($name);
            }
        )+
    };
}

define_field! {
    /// Identifier of the message's sender.
    ///
    /// Always taken from the wire header, never from the payload, so it
    /// is present in every message and may not be declared by a schema.
    pub SenderId
}
