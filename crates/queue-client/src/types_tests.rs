//! Tests for shared value types.

use super::*;

#[test]
fn test_auto_value_correlation_ids_are_unique() {
    let first = CorrelationId::auto_value();
    let second = CorrelationId::auto_value();

    assert_ne!(first, second);
    assert!(first.is_auto_value());
    assert!(first.numeric().is_none());
}

#[test]
fn test_correlation_id_accessors() {
    let numeric = CorrelationId::Numeric(-7);
    assert_eq!(numeric.numeric(), Some(-7));
    assert!(numeric.pointer().is_none());

    let state = 5u32;
    let pointer = CorrelationId::from_pointer(&state as *const u32);
    assert!(pointer.is_pointer());
    assert_eq!(pointer.pointer(), Some(&state as *const u32 as usize));
}

#[test]
fn test_message_guid_hex_round_trip() {
    let guid = MessageGuid::from_hex("0000050000AF3F0C5A1D3B4C2E1F0A99").unwrap();
    assert_eq!(guid.to_string(), "0000050000AF3F0C5A1D3B4C2E1F0A99");
    assert_eq!(guid.as_bytes()[4], 0x00);
    assert_eq!(guid.as_bytes()[5], 0xAF);
    assert!(!guid.is_unset());
    assert!(MessageGuid::UNSET.is_unset());
}

#[test]
fn test_message_guid_rejects_bad_hex() {
    assert!(MessageGuid::from_hex("xyz").is_err());
    assert!(MessageGuid::from_hex("00").is_err());
    assert!("0000050000AF3F0C5A1D3B4C2E1F0A9".parse::<MessageGuid>().is_err());
}

#[test]
fn test_message_guid_serializes_as_hex() {
    let guid = MessageGuid::from_bytes([0xAB; MESSAGE_GUID_LENGTH]);
    let json = serde_json::to_string(&guid).unwrap();
    assert_eq!(json, format!("\"{}\"", "AB".repeat(16)));

    let parsed: MessageGuid = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, guid);
}

#[test]
fn test_subscription_handle_defaults() {
    let handle = SubscriptionHandle::default();
    assert_eq!(handle.id(), SubscriptionHandle::DEFAULT_ID);
    assert!(handle.correlation_id().is_none());

    let handle = SubscriptionHandle::new(9).with_correlation_id(CorrelationId::Numeric(1));
    assert_eq!(handle.id(), 9);
    assert_eq!(handle.correlation_id(), Some(&CorrelationId::Numeric(1)));
}

#[test]
fn test_uri_parsing() {
    let uri = Uri::parse("bmq://bmq.test.mem.priority/orders?id=billing").unwrap();
    assert_eq!(uri.domain(), "bmq.test.mem.priority");
    assert_eq!(uri.queue(), "orders");
    assert_eq!(uri.app_id(), Some("billing".to_string()));
    assert_eq!(uri.canonical(), "bmq://bmq.test.mem.priority/orders");

    let uri: Uri = "bmq://domain/queue".parse().unwrap();
    assert!(uri.app_id().is_none());
}

#[test]
fn test_uri_validation() {
    assert!(Uri::parse("").is_err());
    assert!(Uri::parse("http://domain/queue").is_err());
    assert!(Uri::parse("bmq://domain").is_err());
    assert!(Uri::parse("bmq://domain/").is_err());
    assert!(Uri::parse("bmq://domain/a/b").is_err());
    assert!(Uri::parse("bmq://domain/queue?foo=bar").is_err());
}

#[test]
fn test_queue_flags() {
    let flags = QueueFlags::READ | QueueFlags::ACK;
    assert!(flags.is_reader());
    assert!(!flags.is_writer());
    assert!(flags.contains(QueueFlags::ACK));
    assert_eq!(flags.bits(), 0b1010);
    assert_eq!(flags.to_string(), "READ,ACK");

    assert!(QueueFlags::empty().is_empty());
    assert_eq!(QueueFlags::from_bits(0b0110), Some(QueueFlags::READ | QueueFlags::WRITE));
    assert!(QueueFlags::from_bits(1 << 10).is_none());
}

#[test]
fn test_queue_options_builder() {
    let options = QueueOptions::new()
        .with_max_unconfirmed_messages(10)
        .with_max_unconfirmed_bytes(1024)
        .with_consumer_priority(2)
        .with_suspends_on_bad_host_health(true);

    assert_eq!(options.max_unconfirmed_messages, 10);
    assert_eq!(options.max_unconfirmed_bytes, 1024);
    assert_eq!(options.consumer_priority, 2);
    assert!(options.suspends_on_bad_host_health);
    assert_eq!(QueueOptions::default().max_unconfirmed_messages, 1000);
}

#[test]
fn test_ack_result_codes() {
    for status in [
        AckResult::Success,
        AckResult::Timeout,
        AckResult::LimitMessages,
        AckResult::LimitBytes,
        AckResult::StorageFailure,
    ] {
        assert_eq!(AckResult::from_code(status.code()), status);
    }

    assert_eq!(AckResult::from_code(12345), AckResult::Unknown);
    assert!(AckResult::LimitBytes.is_limit_exceeded());
    assert!(!AckResult::Timeout.is_success());
    assert_eq!(AckResult::Timeout.to_string(), "TIMEOUT");
}

#[test]
fn test_compression_codes() {
    assert_eq!(CompressionAlgorithmType::default(), CompressionAlgorithmType::None);
    assert_eq!(
        CompressionAlgorithmType::from_code(1),
        Some(CompressionAlgorithmType::Zlib)
    );
    assert!(CompressionAlgorithmType::from_code(7).is_none());
}

#[test]
fn test_group_id_validation() {
    assert!(GroupId::new("gid:1").is_ok());
    assert!(GroupId::new("").is_err());
    assert!(GroupId::new("g".repeat(MAX_GROUP_ID_LENGTH)).is_ok());
    assert!(GroupId::new("g".repeat(MAX_GROUP_ID_LENGTH + 1)).is_err());
}

#[test]
fn test_message_properties() {
    let properties = MessageProperties::new()
        .with_property("encoding", "json")
        .with_property("tenant", "acme");

    assert_eq!(properties.num_properties(), 2);
    assert_eq!(properties.property("tenant"), Some("acme"));
    assert!(properties.property("missing").is_none());
    assert!(MessageProperties::new().is_empty());
}
