//! Registry of runtime schemas.
//!
//! Holds every configured message kind, keyed by name and by magic
//! number, and routes an incoming buffer to the schema whose magic it
//! carries. Immutable once built; share it behind an `Arc`.

use std::collections::HashMap;
use std::path::Path;

use swipe_core::{DynamicSchema, Schema};
use tracing::{debug, info};

use crate::config::RegistryConfig;
use crate::dynamic::DynamicMessage;
use crate::error::RegistryError;
use crate::validator::SecretValidator;
use crate::wire_types::WireHeader;

#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: Vec<DynamicSchema>,
    by_name: HashMap<String, usize>,
    by_magic: HashMap<u32, usize>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a schema. Names and magic numbers must be unique.
    pub fn register(&mut self, schema: DynamicSchema) -> Result<(), RegistryError> {
        if self.by_name.contains_key(schema.name()) {
            return Err(RegistryError::DuplicateName(schema.name().to_string()));
        }
        if let Some(&idx) = self.by_magic.get(&schema.magic()) {
            return Err(RegistryError::DuplicateMagic {
                magic: schema.magic(),
                first: self.schemas[idx].name().to_string(),
                second: schema.name().to_string(),
            });
        }

        debug!(
            schema = schema.name(),
            magic = schema.magic(),
            fields = schema.field_count(),
            "registered schema"
        );
        let idx = self.schemas.len();
        self.by_name.insert(schema.name().to_string(), idx);
        self.by_magic.insert(schema.magic(), idx);
        self.schemas.push(schema);
        Ok(())
    }

    /// Add a compile-time schema.
    pub fn register_static<S: Schema>(&mut self) -> Result<(), RegistryError> {
        self.register(DynamicSchema::of::<S>())
    }

    pub fn from_config(config: &RegistryConfig) -> Result<Self, RegistryError> {
        let mut registry = SchemaRegistry::new();
        for message in &config.messages {
            registry.register(message.to_schema()?)?;
        }
        info!(schemas = registry.len(), "schema registry loaded");
        Ok(registry)
    }

    pub fn from_toml_str(src: &str) -> Result<Self, RegistryError> {
        Self::from_config(&RegistryConfig::from_toml_str(src)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        Self::from_config(&RegistryConfig::load(path)?)
    }

    pub fn from_env() -> Result<Self, RegistryError> {
        Self::from_config(&RegistryConfig::from_env()?)
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    pub fn schemas(&self) -> &[DynamicSchema] {
        &self.schemas
    }

    pub fn get(&self, name: &str) -> Option<&DynamicSchema> {
        self.by_name.get(name).map(|&idx| &self.schemas[idx])
    }

    pub fn by_magic(&self, magic: u32) -> Option<&DynamicSchema> {
        self.by_magic.get(&magic).map(|&idx| &self.schemas[idx])
    }

    /// Schema whose magic equals `observed`, as written or byte-swapped.
    pub fn identify(&self, observed: u64) -> Option<&DynamicSchema> {
        [observed, observed.swap_bytes()]
            .into_iter()
            .filter_map(|candidate| u32::try_from(candidate).ok())
            .find_map(|magic| self.by_magic(magic))
    }

    /// Decode `buf` against the schema named `name`.
    pub fn decode_as<V>(
        &self,
        name: &str,
        buf: &[u8],
        validator: &V,
    ) -> Result<DynamicMessage, RegistryError>
    where
        V: SecretValidator + ?Sized,
    {
        let schema = self
            .get(name)
            .ok_or_else(|| RegistryError::UnknownSchema(name.to_string()))?;
        Ok(DynamicMessage::decode(schema, buf, validator)?)
    }

    /// Decode `buf` against whichever registered schema its magic names.
    ///
    /// The header is peeked first to pick the schema, so the validator
    /// only runs for buffers carrying a registered magic number.
    pub fn decode<V>(&self, buf: &[u8], validator: &V) -> Result<DynamicMessage, RegistryError>
    where
        V: SecretValidator + ?Sized,
    {
        let header = WireHeader::read(buf)?;
        let schema = self.identify(header.magic_number).ok_or_else(|| {
            debug!(magic = header.magic_number, "no schema for magic number");
            RegistryError::UnknownMagic(header.magic_number)
        })?;
        Ok(DynamicMessage::decode(schema, buf, validator)?)
    }
}
