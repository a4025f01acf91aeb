//! Message schemas.
//!
//! A schema is a message kind: a non-zero 32-bit magic number plus an
//! ordered list of field tags. The magic number doubles as a byte-order
//! probe (see the `swipe-protocol` crate), which is why it must be
//! non-zero and confined to 32 bits.
//!
//! Schemas come in two flavours:
//!
//! - **static**, declared with [`define_schema!`](crate::define_schema).
//!   Field access is checked by the compiler through [`HasField`].
//! - **dynamic** ([`DynamicSchema`]), built at runtime from configuration.
//!   Field access is by name and fails loudly on unknown names.
//!
//! A static schema may not declare the same tag twice:
//!
//! ```compile_fail
//! use swipe_core::{define_field, define_schema};
//!
//! define_field!(pub Price);
//!
//! define_schema! {
//!     pub Broken = 5 { Price, Price }
//! }
//! ```
//!
//! Nor may it declare the implicit sender id:
//!
//! ```compile_fail
//! use swipe_core::{define_field, define_schema, SenderId};
//!
//! define_field!(pub Price);
//!
//! define_schema! {
//!     pub Broken = 5 { Price, SenderId }
//! }
//! ```
//!
//! And the magic number must be non-zero:
//!
//! ```compile_fail
//! use swipe_core::{define_field, define_schema};
//!
//! define_field!(pub Price);
//!
//! define_schema! {
//!     pub Broken = 0 { Price }
//! }
//! ```

use std::fmt;

use crate::error::SchemaError;
use crate::field::{FieldTag, SenderId};

/// Compile-time description of a message kind.
///
/// Implemented by [`define_schema!`](crate::define_schema); implementing
/// it by hand skips the uniqueness and non-zero checks.
pub trait Schema: fmt::Debug + Copy + Eq + Send + Sync + 'static {
    /// Message kind name, for diagnostics.
    const NAME: &'static str;

    /// Version identifier. Non-zero.
    const MAGIC: u32;

    /// Declared payload field names, in wire order. Excludes the sender id.
    const FIELD_NAMES: &'static [&'static str];

    /// Number of declared payload fields.
    const FIELD_COUNT: usize = Self::FIELD_NAMES.len();

    /// The magic number as it appears in the 64-bit header slot.
    fn magic_number() -> u64 {
        u64::from(Self::MAGIC)
    }
}

/// Schema `Self` declares exactly one field tagged `T`, at payload slot
/// `SLOT`.
pub trait HasField<T: FieldTag>: Schema {
    const SLOT: usize;
}

/// Const-context string equality.
pub const fn str_eq(a: &str, b: &str) -> bool {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    let mut i = 0;
    while i < a.len() {
        if a[i] != b[i] {
            return false;
        }
        i += 1;
    }
    true
}

/// Const-context membership test.
pub const fn contains_name(names: &[&str], needle: &str) -> bool {
    let mut i = 0;
    while i < names.len() {
        if str_eq(names[i], needle) {
            return true;
        }
        i += 1;
    }
    false
}

/// Const-context duplicate detection.
pub const fn has_duplicate_names(names: &[&str]) -> bool {
    let mut i = 0;
    while i < names.len() {
        let mut j = i + 1;
        while j < names.len() {
            if str_eq(names[i], names[j]) {
                return true;
            }
            j += 1;
        }
        i += 1;
    }
    false
}

/// Declare a message schema.
///
/// ```
/// use swipe_core::{define_field, define_schema, HasField, Schema};
///
/// define_field!(pub Price, pub Flags);
///
/// define_schema! {
///     /// A quote request.
///     pub Quote = 12 { Price, Flags }
/// }
///
/// assert_eq!(Quote::MAGIC, 12);
/// assert_eq!(Quote::FIELD_NAMES, &["Price", "Flags"]);
/// assert_eq!(<Quote as HasField<Flags>>::SLOT, 1);
/// ```
///
/// The magic number is typed `u32`, so literals that do not fit are
/// rejected by the compiler. Zero magic, repeated tags and a declared
/// [`SenderId`](crate::SenderId) fail to compile.
#[macro_export]
macro_rules! define_schema {
    ($(#[$meta:meta])* $vis:vis $name:ident = $magic:literal { $($field:ty),* $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {}

        impl $crate::Schema for $name {
            const NAME: &'static str = stringify!($name);
            const MAGIC: u32 = $magic;
            const FIELD_NAMES: &'static [&'static str] =
                &[$(<$field as $crate::FieldTag>::NAME),*];
        }

        const _: () = {
            assert!(
                <$name as $crate::Schema>::MAGIC != 0,
                "schema magic number must be non-zero"
            );
            assert!(
                !$crate::schema::has_duplicate_names(<$name as $crate::Schema>::FIELD_NAMES),
                "schema declares the same field twice"
            );
            assert!(
                !$crate::schema::contains_name(
                    <$name as $crate::Schema>::FIELD_NAMES,
                    <$crate::SenderId as $crate::FieldTag>::NAME,
                ),
                "the sender id is implicit and may not be declared"
            );
        };

        $crate::__schema_slots!($name; 0usize; $($field),*);
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __schema_slots {
    ($name:ident; $slot:expr; ) => {};
    ($name:ident; $slot:expr; $head:ty $(, $tail:ty)*) => {
        impl $crate::HasField<$head> for $name {
            const SLOT: usize = $slot;
        }
        $crate::__schema_slots!($name; $slot + 1usize; $($tail),*);
    };
}

/// A schema described at runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DynamicSchema {
    name: String,
    magic: u32,
    fields: Vec<String>,
}

impl DynamicSchema {
    /// Build a schema, rejecting zero magic, blank names, duplicate
    /// fields and a declared sender id.
    pub fn new<I, F>(name: impl Into<String>, magic: u32, fields: I) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = F>,
        F: Into<String>,
    {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(SchemaError::EmptySchemaName);
        }
        if magic == 0 {
            return Err(SchemaError::ZeroMagic { schema: name });
        }

        let mut declared: Vec<String> = Vec::new();
        for field in fields {
            let field = field.into();
            if field.trim().is_empty() {
                return Err(SchemaError::EmptyFieldName { schema: name });
            }
            if field == SenderId::NAME {
                return Err(SchemaError::ReservedField {
                    schema: name,
                    field,
                });
            }
            if declared.contains(&field) {
                return Err(SchemaError::DuplicateField {
                    schema: name,
                    field,
                });
            }
            declared.push(field);
        }

        Ok(DynamicSchema {
            name,
            magic,
            fields: declared,
        })
    }

    /// Runtime copy of a static schema.
    pub fn of<S: Schema>() -> Self {
        DynamicSchema {
            name: S::NAME.to_string(),
            magic: S::MAGIC,
            fields: S::FIELD_NAMES.iter().map(|f| f.to_string()).collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn magic(&self) -> u32 {
        self.magic
    }

    pub fn magic_number(&self) -> u64 {
        u64::from(self.magic)
    }

    /// Declared payload field names, in wire order.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Payload slot of `field`, or `UnknownField`.
    pub fn slot_of(&self, field: &str) -> Result<usize, SchemaError> {
        self.fields
            .iter()
            .position(|f| f == field)
            .ok_or_else(|| SchemaError::UnknownField {
                schema: self.name.clone(),
                field: field.to_string(),
            })
    }
}
