//! The materialized snapshot for one stream.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use rill_causal::VectorClock;
use rill_core::ids::StreamId;

use crate::event::{Event, FieldChange};

/// Current state of one stream: a field → value snapshot plus the merged
/// clock summarizing every event folded into it.
///
/// The clock invariant: after a fold, the view's clock is pointwise ≥ the
/// clock of every event it has absorbed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct View {
    stream_id: StreamId,
    snapshot: BTreeMap<String, Value>,
    clock: VectorClock,
}

impl View {
    /// An empty view for the given stream.
    pub fn new(stream_id: StreamId) -> Self {
        Self {
            stream_id,
            snapshot: BTreeMap::new(),
            clock: VectorClock::new(),
        }
    }

    /// Rebuild a view from persisted state.
    pub(crate) fn from_parts(
        stream_id: StreamId,
        snapshot: BTreeMap<String, Value>,
        clock: VectorClock,
    ) -> Self {
        Self {
            stream_id,
            snapshot,
            clock,
        }
    }

    /// The stream this view materializes.
    pub fn stream_id(&self) -> &StreamId {
        &self.stream_id
    }

    /// The full field → value snapshot.
    pub fn snapshot(&self) -> &BTreeMap<String, Value> {
        &self.snapshot
    }

    /// One field's current value, if set.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.snapshot.get(field)
    }

    /// The merged clock over every absorbed event.
    pub fn clock(&self) -> &VectorClock {
        &self.clock
    }

    /// Fold one event into the snapshot and merge its clock.
    ///
    /// Set fields are written, unset fields are deleted; the last applied
    /// event wins per field. Idempotent on the clock (re-merging an
    /// absorbed clock changes nothing) but NOT on the snapshot if events
    /// arrive out of causal order: callers must apply events in the order
    /// produced by the causal sorter. That ordering requirement is the
    /// central correctness contract of the engine.
    pub fn apply(&mut self, event: &Event) {
        for (field, change) in event.payload() {
            match change {
                FieldChange::Set(value) => {
                    self.snapshot.insert(field.clone(), value.clone());
                }
                FieldChange::Unset => {
                    self.snapshot.remove(field);
                }
            }
        }
        self.clock = self.clock.merge(event.clock());
    }

    /// Fold the stamped clock back in after the owning stream re-clocks an
    /// event, keeping the view's clock ≥ every stored event clock.
    pub(crate) fn absorb_clock(&mut self, clock: &VectorClock) {
        self.clock = self.clock.merge(clock);
    }
}
