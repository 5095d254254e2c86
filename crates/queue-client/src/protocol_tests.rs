//! Tests for the confirm event wire format.

use super::*;
use crate::queue_id::QueueId;
use crate::types::SubscriptionHandle;

fn cookie(queue_id: QueueId, last: u8, subscription_id: u32) -> MessageConfirmationCookie {
    let mut guid = [0u8; 16];
    guid[0] = 0xA0;
    guid[15] = last;
    MessageConfirmationCookie::new(
        queue_id,
        MessageGuid::from_bytes(guid),
        SubscriptionHandle::new(subscription_id),
    )
}

#[test]
fn test_limits_are_consistent() {
    assert_eq!(EMPTY_CONFIRM_EVENT_SIZE, 12);
    assert!(confirm_event_size(MAX_CONFIRMATIONS_PER_BATCH) <= MAX_EVENT_SIZE);
    assert!(confirm_event_size(MAX_CONFIRMATIONS_PER_BATCH + 1) > MAX_EVENT_SIZE);
}

#[test]
fn test_empty_event_layout() {
    let blob = encode_confirm_event(&[]).unwrap();

    assert_eq!(
        blob.as_ref(),
        &[0, 0, 0, 12, 0x44, 2, 0, 0, 0x18, 0, 0, 0][..]
    );
}

#[test]
fn test_single_record_layout() {
    let blob = encode_confirm_event(&[cookie(QueueId::from_numeric(42), 7, 3)]).unwrap();

    assert_eq!(blob.len(), 44);
    assert_eq!(&blob[0..4], &[0, 0, 0, 44]);

    let record = &blob[EMPTY_CONFIRM_EVENT_SIZE..];
    assert_eq!(record[0], IdentityKind::Numeric.code());
    assert_eq!(&record[1..4], &[0, 0, 0]);
    assert_eq!(&record[4..8], &[0, 0, 0, 3]);
    assert_eq!(&record[8..16], &[0, 0, 0, 0, 0, 0, 0, 42]);
    assert_eq!(record[16], 0xA0);
    assert_eq!(record[31], 7);
}

#[test]
fn test_negative_numeric_identity_survives_decoding() {
    let queue_id = QueueId::from_correlation_id(CorrelationId::Numeric(-5));
    let blob = encode_confirm_event(&[cookie(queue_id.clone(), 1, 0)]).unwrap();

    let decoded = ConfirmBlob::decode(&blob).unwrap();
    assert_eq!(decoded.records[0].identity_kind, IdentityKind::CorrelationNumeric);
    assert_eq!(&decoded.records[0].queue_identity(), queue_id.identity());
}

#[test]
fn test_decode_preserves_order() {
    let cookies: Vec<_> = (1..=5)
        .map(|i| cookie(QueueId::from_numeric(i as i64), i, i as u32))
        .collect();
    let blob = encode_confirm_event(&cookies).unwrap();

    let decoded = ConfirmBlob::decode(&blob).unwrap();
    assert_eq!(decoded.len(), 5);
    for (record, cookie) in decoded.records.iter().zip(&cookies) {
        assert_eq!(&record.message_guid, cookie.message_guid());
        assert_eq!(record.subscription_id, cookie.subscription_handle().id());
        assert_eq!(&record.queue_identity(), cookie.queue_id().identity());
    }
}

#[test]
fn test_records_decode_independently() {
    let cookies = vec![
        cookie(QueueId::from_numeric(1), 1, 0),
        cookie(QueueId::from_pointer(0x1000 as *const u8), 2, 0),
    ];
    let blob = encode_confirm_event(&cookies).unwrap();

    let second = &blob[EMPTY_CONFIRM_EVENT_SIZE + CONFIRM_RECORD_SIZE..];
    let record = ConfirmRecord::decode(second).unwrap();
    assert_eq!(record.identity_kind, IdentityKind::Pointer);
    assert_eq!(record.identity_value, 0x1000);
}

#[test]
fn test_identity_round_trip_all_kinds() {
    let identities = [
        QueueIdentity::CorrelationId(CorrelationId::Numeric(i64::MIN)),
        QueueIdentity::CorrelationId(CorrelationId::Pointer(0xdead_beef)),
        QueueIdentity::CorrelationId(CorrelationId::AutoValue(99)),
        QueueIdentity::Numeric(-1),
        QueueIdentity::Pointer(0x10),
    ];

    for identity in identities {
        let (kind, value) = encode_identity(&identity);
        assert_eq!(IdentityKind::from_code(kind.code()).unwrap(), kind);
        assert_eq!(decode_identity(kind, value), identity);
    }
}

#[test]
fn test_decode_rejects_truncated_blob() {
    assert!(matches!(
        ConfirmBlob::decode(&[0, 0, 0]),
        Err(SerializationError::Truncated { .. })
    ));

    let blob = encode_confirm_event(&[cookie(QueueId::from_numeric(1), 1, 0)]).unwrap();
    assert!(matches!(
        ConfirmBlob::decode(&blob[..blob.len() - 1]),
        Err(SerializationError::LengthMismatch { .. })
    ));
}

#[test]
fn test_decode_rejects_bad_headers() {
    let blob = encode_confirm_event(&[]).unwrap();

    let mut fragmented = blob.to_vec();
    fragmented[0] |= 0x80;
    assert_eq!(
        ConfirmBlob::decode(&fragmented),
        Err(SerializationError::Fragmented)
    );

    let mut wrong_type = blob.to_vec();
    wrong_type[4] = (PROTOCOL_VERSION << 6) | 2;
    assert_eq!(
        ConfirmBlob::decode(&wrong_type),
        Err(SerializationError::UnexpectedEventType(2))
    );

    let mut wrong_version = blob.to_vec();
    wrong_version[4] = (2 << 6) | EVENT_TYPE_CONFIRM;
    assert_eq!(
        ConfirmBlob::decode(&wrong_version),
        Err(SerializationError::UnsupportedVersion(2))
    );

    let mut wrong_layout = blob.to_vec();
    wrong_layout[8] = 0x17;
    assert!(matches!(
        ConfirmBlob::decode(&wrong_layout),
        Err(SerializationError::InvalidHeader { .. })
    ));
}

#[test]
fn test_decode_rejects_partial_record() {
    let mut blob = encode_confirm_event(&[]).unwrap().to_vec();
    blob.extend_from_slice(&[4u8; 10]);
    let length = blob.len() as u32;
    blob[0..4].copy_from_slice(&length.to_be_bytes());

    assert!(matches!(
        ConfirmBlob::decode(&blob),
        Err(SerializationError::Truncated { needed: 32, available: 10 })
    ));
}

#[test]
fn test_decode_rejects_unknown_identity_kind() {
    let mut blob = encode_confirm_event(&[cookie(QueueId::from_numeric(1), 1, 0)])
        .unwrap()
        .to_vec();
    blob[EMPTY_CONFIRM_EVENT_SIZE] = 77;

    assert_eq!(
        ConfirmBlob::decode(&blob),
        Err(SerializationError::UnknownIdentityKind(77))
    );
}
