use cache_status::{CacheStatusConfig, Error, IdentifierKind};
use pretty_assertions::assert_eq;

#[test]
fn test_config_deserialize_minimal() {
    let yaml = r#"
served_by: "cache-01"
"#;

    let config: CacheStatusConfig = serde_saphyr::from_str(yaml).expect("failed to deserialize");

    assert_eq!(config, CacheStatusConfig::new("cache-01"));
    assert_eq!(config.identifier, IdentifierKind::String);
    assert_eq!(
        config.build().unwrap().to_wire_value().unwrap(),
        r#""cache-01";hit"#
    );
}

#[test]
fn test_config_deserialize_full() {
    let yaml = r#"
served_by: ExampleCDN
identifier: Token
detail: "edge pop ams"
detail_kind: String
ttl: 120
default_forward_status: 200
"#;

    let config: CacheStatusConfig = serde_saphyr::from_str(yaml).expect("failed to deserialize");

    assert_eq!(config.identifier, IdentifierKind::Token);
    assert_eq!(config.default_forward_status, Some(200));
    assert_eq!(
        config.build().unwrap().to_wire_value().unwrap(),
        r#"ExampleCDN;hit;ttl=120;detail="edge pop ams""#
    );

    let parsed = config.parse("ExampleCDN;fwd=uri-miss").unwrap();
    assert_eq!(parsed.forward().and_then(|f| f.status_code()), Some(200));
}

#[test]
fn test_config_serialize_roundtrip() {
    let config = CacheStatusConfig {
        identifier: IdentifierKind::Token,
        detail: Some("memory".into()),
        detail_kind: IdentifierKind::Token,
        ..CacheStatusConfig::new("edge")
    };

    let yaml = serde_saphyr::to_string(&config).expect("failed to serialize");
    let deserialized: CacheStatusConfig =
        serde_saphyr::from_str(&yaml).expect("failed to deserialize");

    assert_eq!(config, deserialized);
}

#[test]
fn test_config_with_invalid_token_identifier_fails_to_build() {
    let yaml = r#"
served_by: "has spaces"
identifier: Token
"#;

    let config: CacheStatusConfig = serde_saphyr::from_str(yaml).expect("failed to deserialize");

    assert!(matches!(config.build(), Err(Error::InvalidValue { .. })));
}
