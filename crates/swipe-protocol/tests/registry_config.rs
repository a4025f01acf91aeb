// crates/swipe-protocol/tests/registry_config.rs
use std::io::Write;

use swipe_core::{BuyQuery, DiningHallBitfield, PriceCents, SchemaError};
use swipe_protocol::config::SCHEMA_FILE_ENV;
use swipe_protocol::{
    AcceptAll, ByteOrder, DecodeError, DecodedMessage, MessageBuilder, RegistryError,
    SchemaRegistry,
};

const SCHEMAS: &str = r#"
# Swipe marketplace message kinds.

[[message]]
name = "BuyQuery"
magic = 88
fields = ["PriceCents", "DiningHallBitfield"]

[[message]]
name = "Heartbeat"
magic = 16777216
"#;

fn buy_query_bytes(order: ByteOrder) -> Vec<u8> {
    MessageBuilder::<BuyQuery>::new(100)
        .set::<PriceCents>(1)
        .set::<DiningHallBitfield>(3)
        .text("Hello, text!\n")
        .to_bytes(order)
}

#[test]
fn registry_decode_matches_static_decode() {
    let registry = SchemaRegistry::from_toml_str(SCHEMAS).unwrap();
    assert_eq!(registry.len(), 2);

    for order in [ByteOrder::Native, ByteOrder::Swapped] {
        let bytes = buy_query_bytes(order);
        let dynamic = registry.decode(&bytes, &AcceptAll).unwrap();
        let typed = DecodedMessage::<BuyQuery>::decode(&bytes, &AcceptAll).unwrap();

        assert_eq!(dynamic.schema().name(), "BuyQuery");
        assert_eq!(dynamic.values(), typed.values());
        assert_eq!(dynamic.sender_id(), typed.sender_id().get());
        assert_eq!(dynamic.text(), typed.text());
        assert_eq!(dynamic.byte_order(), order);
    }
}

#[test]
fn registry_decode_by_name() {
    let registry = SchemaRegistry::from_toml_str(SCHEMAS).unwrap();
    let bytes = buy_query_bytes(ByteOrder::Native);

    let msg = registry.decode_as("BuyQuery", &bytes, &AcceptAll).unwrap();
    assert_eq!(msg.get("DiningHallBitfield"), Ok(3));

    // Right bytes, wrong schema: the Heartbeat magic does not match.
    let err = registry.decode_as("Heartbeat", &bytes, &AcceptAll).unwrap_err();
    assert!(matches!(
        err,
        RegistryError::Decode(DecodeError::WrongMagicNumber {
            expected: 16777216,
            ..
        })
    ));

    let err = registry.decode_as("SellOffer", &bytes, &AcceptAll).unwrap_err();
    assert!(matches!(err, RegistryError::UnknownSchema(name) if name == "SellOffer"));
}

#[test]
fn registry_rejects_unknown_magic_and_short_buffers() {
    let registry = SchemaRegistry::from_toml_str(SCHEMAS).unwrap();

    let mut bytes = buy_query_bytes(ByteOrder::Native);
    bytes[72..80].copy_from_slice(&1234u64.to_ne_bytes());
    let err = registry.decode(&bytes, &AcceptAll).unwrap_err();
    assert!(matches!(err, RegistryError::UnknownMagic(1234)));

    let err = registry.decode(&bytes[..40], &AcceptAll).unwrap_err();
    assert!(matches!(
        err,
        RegistryError::Decode(DecodeError::TooShortForHeader { got: 40, .. })
    ));
}

#[test]
fn invalid_configurations_are_rejected() {
    let err = SchemaRegistry::from_toml_str(
        r#"
        [[message]]
        name = "A"
        magic = 5

        [[message]]
        name = "B"
        magic = 5
        "#,
    )
    .unwrap_err();
    assert!(matches!(err, RegistryError::DuplicateMagic { magic: 5, .. }));

    let err = SchemaRegistry::from_toml_str(
        r#"
        [[message]]
        name = "A"
        magic = 0
        "#,
    )
    .unwrap_err();
    assert!(matches!(err, RegistryError::Schema(SchemaError::ZeroMagic { .. })));

    let err = SchemaRegistry::from_toml_str(
        r#"
        [[message]]
        name = "A"
        magic = 6
        fields = ["SenderId"]
        "#,
    )
    .unwrap_err();
    assert!(matches!(err, RegistryError::Schema(SchemaError::ReservedField { .. })));
}

#[test]
fn loads_from_file_and_environment() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(SCHEMAS.as_bytes()).unwrap();
    file.flush().unwrap();

    let registry = SchemaRegistry::load(file.path()).unwrap();
    assert!(registry.get("Heartbeat").is_some());

    // Only test in this binary that touches the environment.
    std::env::set_var(SCHEMA_FILE_ENV, file.path());
    let registry = SchemaRegistry::from_env().unwrap();
    std::env::remove_var(SCHEMA_FILE_ENV);

    assert_eq!(registry.by_magic(88).map(|s| s.field_count()), Some(2));
}
