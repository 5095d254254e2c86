//! Tests for queue identities.

use super::*;
use std::collections::HashSet;

fn test_uri() -> Uri {
    Uri::parse("bmq://bmq.test.mem.priority/orders").unwrap()
}

#[test]
fn test_numeric_round_trip() {
    let queue_id = QueueId::from_numeric(42);

    assert_eq!(queue_id.numeric(), Some(42));
    assert!(queue_id.correlation_id().is_none());
    assert!(queue_id.pointer().is_none());
    assert_eq!(queue_id.identity(), &QueueIdentity::Numeric(42));
}

#[test]
fn test_correlation_id_round_trip() {
    let correlation_id = CorrelationId::auto_value();
    let queue_id = QueueId::from_correlation_id(correlation_id);

    assert_eq!(queue_id.correlation_id(), Some(&correlation_id));
    assert!(queue_id.numeric().is_none());
}

#[test]
fn test_pointer_round_trip() {
    let state = String::from("consumer state");
    let queue_id = QueueId::from_pointer(&state as *const String);

    assert_eq!(queue_id.pointer(), Some(&state as *const String as usize));
}

#[test]
fn test_unbound_accessors_are_empty() {
    let queue_id = QueueId::from_numeric(1);

    assert!(!queue_id.is_bound());
    assert!(!queue_id.is_valid());
    assert!(queue_id.flags().is_empty());
    assert!(queue_id.uri().is_none());
    assert!(queue_id.options().is_none());
}

#[test]
fn test_bind_makes_queue_id_valid() {
    let mut queue_id = QueueId::from_numeric(42);
    queue_id.bind(
        test_uri(),
        QueueOptions::default(),
        QueueFlags::READ | QueueFlags::ACK,
    );

    assert!(queue_id.is_bound());
    assert!(queue_id.is_valid());
    assert_eq!(queue_id.uri(), Some(&test_uri()));
    assert_eq!(queue_id.flags(), QueueFlags::READ | QueueFlags::ACK);
    assert_eq!(queue_id.options(), Some(&QueueOptions::default()));
}

#[test]
fn test_unbind_clears_all_metadata() {
    let mut queue_id = QueueId::from_numeric(42);
    queue_id.bind(test_uri(), QueueOptions::default(), QueueFlags::READ);

    let binding = queue_id.unbind().unwrap();
    assert_eq!(binding.uri, test_uri());
    assert!(!queue_id.is_bound());
    assert!(queue_id.uri().is_none());
    assert!(queue_id.flags().is_empty());
}

#[test]
fn test_null_pointer_is_never_valid() {
    let mut queue_id = QueueId::from_pointer(std::ptr::null::<u8>());
    queue_id.bind(test_uri(), QueueOptions::default(), QueueFlags::READ);

    assert!(queue_id.is_bound());
    assert!(!queue_id.is_valid());
}

#[test]
fn test_clone_copies_binding() {
    let mut queue_id = QueueId::from_numeric(3);
    let unbound_copy = queue_id.clone();

    queue_id.bind(test_uri(), QueueOptions::default(), QueueFlags::WRITE);
    let bound_copy = queue_id.clone();

    assert!(!unbound_copy.is_bound());
    assert!(bound_copy.is_bound());
    assert_eq!(bound_copy.binding(), queue_id.binding());
}

#[test]
fn test_equality_ignores_binding() {
    let correlation_id = CorrelationId::Numeric(11);
    let unbound = QueueId::from_correlation_id(correlation_id);
    let mut bound = QueueId::from_correlation_id(correlation_id);
    bound.bind(test_uri(), QueueOptions::default(), QueueFlags::READ);

    assert_eq!(unbound, bound);

    let mut set = HashSet::new();
    set.insert(unbound);
    assert!(set.contains(&bound));
}

#[test]
fn test_different_forms_are_not_equal() {
    assert_ne!(
        QueueId::from_numeric(5),
        QueueId::from_correlation_id(CorrelationId::Numeric(5))
    );
}

#[test]
fn test_display() {
    let mut queue_id = QueueId::from_numeric(42);
    assert_eq!(queue_id.to_string(), "[ identity = [ numeric = 42 ] ]");

    queue_id.bind(test_uri(), QueueOptions::default(), QueueFlags::READ);
    assert_eq!(
        queue_id.to_string(),
        "[ identity = [ numeric = 42 ] uri = bmq://bmq.test.mem.priority/orders flags = \"READ\" ]"
    );
}
