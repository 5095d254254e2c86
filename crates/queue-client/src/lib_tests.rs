//! Tests for the queue-client library module.

use super::*;

#[test]
fn test_root_reexports_cover_confirm_flow() {
    let mut queue_id = QueueId::from_numeric(42);
    queue_id.bind(
        Uri::parse("bmq://bmq.test.mem.priority/orders").unwrap(),
        QueueOptions::default(),
        QueueFlags::READ | QueueFlags::ACK,
    );

    let guid = MessageGuid::from_hex("40000000000000000000000000000001").unwrap();
    let message = Message::received(queue_id, guid, SubscriptionHandle::default());

    let mut builder = ConfirmEventBuilder::new();
    builder.add_message_confirmation(&message).unwrap();

    let decoded = ConfirmBlob::decode(&builder.blob().unwrap()).unwrap();
    assert_eq!(decoded.records[0].message_guid, guid);
}

#[test]
fn test_default_capacity_is_wire_limit() {
    assert_eq!(
        ConfirmEventBuilder::new().capacity(),
        MAX_CONFIRMATIONS_PER_BATCH
    );
    assert_eq!(
        ConfirmBuilderConfig::default().max_confirmations,
        MAX_CONFIRMATIONS_PER_BATCH
    );
}

#[test]
fn test_open_status_defaults_to_success() {
    let status = OpenQueueStatus::default();
    assert!(status.to_bool());
    assert_eq!(status.result_kind(), OpenQueueResult::Success);
}
