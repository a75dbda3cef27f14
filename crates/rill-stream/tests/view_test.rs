//! Unit tests for view folding.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::{json, Value};

use rill_causal::{CausalSorter, VectorClock};
use rill_core::ids::{EventId, OriginKey, SiteId, StreamId};
use rill_stream::{Event, EventKind, FieldChange, Payload, View};

fn origin(site: &str) -> OriginKey {
    OriginKey::new(SiteId::from(site), StreamId::from("users"))
}

fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
}

fn payload_of(fields: &[(&str, Value)]) -> Payload {
    fields
        .iter()
        .map(|(name, value)| (name.to_string(), FieldChange::Set(value.clone())))
        .collect()
}

fn event_with(id: &str, clock: &[(&str, u64)], offset_secs: i64, payload: Payload) -> Event {
    Event::from_parts(
        EventId::from(id),
        StreamId::from("users"),
        EventKind::Updated,
        clock.iter().map(|&(site, counter)| (origin(site), counter)).collect(),
        base_time() + Duration::seconds(offset_secs),
        payload,
    )
}

#[test]
fn apply_writes_fields_and_merges_the_clock() {
    let mut view = View::new(StreamId::from("users"));
    let event = event_with(
        "1",
        &[("A", 1)],
        0,
        payload_of(&[("username", json!("johndoe")), ("email", json!("john@example.com"))]),
    );

    view.apply(&event);

    assert_eq!(view.get("username"), Some(&json!("johndoe")));
    assert_eq!(view.get("email"), Some(&json!("john@example.com")));
    assert_eq!(view.clock().get(&origin("A")), 1);
}

#[test]
fn unset_marker_deletes_the_field() {
    let mut view = View::new(StreamId::from("users"));
    view.apply(&event_with("1", &[("A", 1)], 0, payload_of(&[("email", json!("a@b.c"))])));

    let mut deletion: Payload = BTreeMap::new();
    deletion.insert("email".to_string(), FieldChange::Unset);
    view.apply(&event_with("2", &[("A", 2)], 1, deletion));

    assert_eq!(view.get("email"), None);
    assert!(view.snapshot().is_empty());
}

#[test]
fn unsetting_an_absent_field_is_harmless() {
    let mut view = View::new(StreamId::from("users"));
    let mut deletion: Payload = BTreeMap::new();
    deletion.insert("ghost".to_string(), FieldChange::Unset);

    view.apply(&event_with("1", &[("A", 1)], 0, deletion));
    assert!(view.snapshot().is_empty());
    assert_eq!(view.clock().get(&origin("A")), 1);
}

#[test]
fn reapplying_an_absorbed_event_leaves_the_clock_unchanged() {
    let mut view = View::new(StreamId::from("users"));
    let event = event_with("1", &[("A", 2), ("B", 1)], 0, payload_of(&[("x", json!(1))]));

    view.apply(&event);
    let clock_after_first = view.clock().clone();

    view.apply(&event);
    assert_eq!(view.clock(), &clock_after_first);
}

#[test]
fn later_applied_event_wins_each_contested_field() {
    let mut view = View::new(StreamId::from("users"));
    view.apply(&event_with("1", &[("A", 1)], 0, payload_of(&[("email", json!("old@example.com"))])));
    view.apply(&event_with("2", &[("A", 2)], 1, payload_of(&[("email", json!("new@example.com"))])));

    assert_eq!(view.get("email"), Some(&json!("new@example.com")));
}

#[test]
fn concurrent_writes_resolve_by_sorter_order_not_insertion_order() {
    // Two concurrent events touch the same field. Whatever order they were
    // created or submitted in, the deterministic sorter order decides.
    let early = event_with("1", &[("A", 1)], 0, payload_of(&[("email", json!("from-a"))]));
    let late = event_with("2", &[("B", 1)], 1, payload_of(&[("email", json!("from-b"))]));

    let sorted = CausalSorter::sort(vec![late, early]).unwrap();
    let winner = sorted.last().unwrap();
    assert_eq!(winner.id(), &EventId::from("2"));

    let mut view = View::new(StreamId::from("users"));
    for event in &sorted {
        view.apply(event);
    }
    assert_eq!(view.get("email"), Some(&json!("from-b")));
}

#[test]
fn view_clock_stays_pointwise_above_every_absorbed_clock() {
    let mut view = View::new(StreamId::from("users"));
    let events = vec![
        event_with("1", &[("A", 1)], 0, payload_of(&[("x", json!(1))])),
        event_with("2", &[("B", 3)], 1, payload_of(&[("y", json!(2))])),
        event_with("3", &[("A", 2), ("C", 1)], 2, payload_of(&[("z", json!(3))])),
    ];

    for event in &events {
        view.apply(event);
    }
    for event in &events {
        let absorbed = view.clock().clone();
        assert_eq!(absorbed.merge(event.clock()), absorbed);
    }
    assert_eq!(view.clock(), &VectorClock::try_from_entries([
        (origin("A"), 2),
        (origin("B"), 3),
        (origin("C"), 1),
    ]).unwrap());
}
