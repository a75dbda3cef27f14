//! Property tests for the clock algebra and the sorter.

use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;

use rill_causal::{CausalItem, CausalSorter, VectorClock};
use rill_core::ids::{EventId, OriginKey, SiteId, StreamId};

fn origin_for(index: usize) -> OriginKey {
    OriginKey::new(SiteId::from(format!("site-{index}")), StreamId::from("users"))
}

fn arb_clock() -> impl Strategy<Value = VectorClock> {
    prop::collection::btree_map(0usize..5, 1u64..30, 0..5).prop_map(|entries| {
        entries
            .into_iter()
            .map(|(index, counter)| (origin_for(index), counter))
            .collect()
    })
}

#[derive(Debug, Clone)]
struct StubEvent {
    id: EventId,
    clock: VectorClock,
    timestamp: DateTime<Utc>,
}

impl CausalItem for StubEvent {
    fn id(&self) -> &EventId {
        &self.id
    }

    fn clock(&self) -> &VectorClock {
        &self.clock
    }

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

fn arb_events() -> impl Strategy<Value = Vec<StubEvent>> {
    prop::collection::vec((arb_clock(), 0i64..120), 1..12).prop_map(|entries| {
        let base = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        entries
            .into_iter()
            .enumerate()
            .map(|(index, (clock, offset_secs))| StubEvent {
                id: EventId::from(format!("event-{index:02}")),
                clock,
                timestamp: base + Duration::seconds(offset_secs),
            })
            .collect()
    })
}

fn sorted_ids(events: Vec<StubEvent>) -> Vec<EventId> {
    CausalSorter::sort(events)
        .expect("clock-derived dependencies are acyclic")
        .into_iter()
        .map(|event| event.id)
        .collect()
}

proptest! {
    #[test]
    fn merge_is_commutative(a in arb_clock(), b in arb_clock()) {
        prop_assert_eq!(a.merge(&b), b.merge(&a));
    }

    #[test]
    fn merge_is_associative(a in arb_clock(), b in arb_clock(), c in arb_clock()) {
        prop_assert_eq!(a.merge(&b.merge(&c)), a.merge(&b).merge(&c));
    }

    #[test]
    fn merge_is_idempotent(a in arb_clock()) {
        prop_assert_eq!(a.merge(&a), a);
    }

    #[test]
    fn merge_never_decreases_any_counter(a in arb_clock(), b in arb_clock()) {
        let merged = a.merge(&b);
        for (origin, counter) in a.entries() {
            prop_assert!(merged.get(origin) >= counter);
        }
        for (origin, counter) in b.entries() {
            prop_assert!(merged.get(origin) >= counter);
        }
    }

    #[test]
    fn increment_bumps_only_the_named_origin(a in arb_clock(), index in 0usize..5) {
        let target = origin_for(index);
        let bumped = a.increment(&target);

        prop_assert_eq!(bumped.get(&target), a.get(&target) + 1);
        for (origin, counter) in a.entries() {
            if *origin != target {
                prop_assert_eq!(bumped.get(origin), counter);
            }
        }
    }

    #[test]
    fn happened_before_is_irreflexive(a in arb_clock()) {
        prop_assert!(!a.happened_before(&a));
    }

    #[test]
    fn happened_before_is_antisymmetric(a in arb_clock(), b in arb_clock()) {
        if a.happened_before(&b) {
            prop_assert!(!b.happened_before(&a));
        }
    }

    #[test]
    fn a_clock_precedes_its_increment(a in arb_clock(), index in 0usize..5) {
        prop_assert!(a.happened_before(&a.increment(&origin_for(index))));
    }

    #[test]
    fn sort_respects_causality(events in arb_events()) {
        let ordered = CausalSorter::sort(events).expect("acyclic");
        for earlier_pos in 0..ordered.len() {
            for later_pos in earlier_pos + 1..ordered.len() {
                prop_assert!(
                    !ordered[later_pos].clock.happened_before(&ordered[earlier_pos].clock),
                    "event at {} causally precedes event at {}",
                    later_pos,
                    earlier_pos,
                );
            }
        }
    }

    #[test]
    fn sort_is_deterministic_under_permutation(
        (events, shuffled) in arb_events()
            .prop_flat_map(|events| (Just(events.clone()), Just(events).prop_shuffle()))
    ) {
        prop_assert_eq!(sorted_ids(events), sorted_ids(shuffled));
    }

    #[test]
    fn sort_preserves_the_event_set(events in arb_events()) {
        let input_len = events.len();
        let mut ids = sorted_ids(events);
        ids.sort();
        ids.dedup();
        prop_assert_eq!(ids.len(), input_len);
    }
}
