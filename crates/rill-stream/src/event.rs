//! Events: immutable facts produced at a site, carrying a clock snapshot.
//!
//! An event is created with a provisional clock (whatever the producer had
//! observed), and is re-clocked exactly once when a stream folds it in: the
//! provisional clock is replaced by merge-and-increment against the
//! destination view's clock, atomically with the fold. After that the event
//! is immutable and retained for audit/replay.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use rill_causal::{CausalItem, VectorClock};
use rill_core::ids::{EventId, StreamId};

/// What kind of fact an event records. Apply semantics are uniform across
/// kinds; the tag exists for payload-validation hooks and audit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// The first fact about an entity on this stream.
    Created,
    /// A later change to the entity's fields.
    Updated,
    /// An out-of-band replay or import, possibly carrying a pre-assigned
    /// position.
    Imported,
}

/// One field's change inside an event payload. `Unset` is the explicit
/// absent marker: folding it deletes the field from the snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldChange {
    Set(Value),
    Unset,
}

/// Ordered field-name → change mapping.
pub type Payload = BTreeMap<String, FieldChange>;

/// An immutable fact on one stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    id: EventId,
    stream_id: StreamId,
    kind: EventKind,
    clock: VectorClock,
    timestamp: DateTime<Utc>,
    payload: Payload,
    position: Option<u64>,
}

impl Event {
    /// Create a new event with a fresh id and the current wall-clock time.
    /// The clock is the producer's provisional snapshot.
    pub fn new(stream_id: StreamId, kind: EventKind, clock: VectorClock, payload: Payload) -> Self {
        Self::from_parts(EventId::random(), stream_id, kind, clock, Utc::now(), payload)
    }

    /// Rebuild an event from explicit parts, e.g. when replaying from
    /// storage or constructing deterministic fixtures.
    pub fn from_parts(
        id: EventId,
        stream_id: StreamId,
        kind: EventKind,
        clock: VectorClock,
        timestamp: DateTime<Utc>,
        payload: Payload,
    ) -> Self {
        Self {
            id,
            stream_id,
            kind,
            clock,
            timestamp,
            payload,
            position: None,
        }
    }

    /// Pre-assign a position larger than the destination stream's counter
    /// (the out-of-band replay/import override). The stream honors it and
    /// raises its high-water mark accordingly.
    pub fn with_position(mut self, position: u64) -> Self {
        self.position = Some(position);
        self
    }

    /// The event's unique, totally ordered identifier.
    pub fn id(&self) -> &EventId {
        &self.id
    }

    /// The stream this event belongs to.
    pub fn stream_id(&self) -> &StreamId {
        &self.stream_id
    }

    /// The event-kind tag.
    pub fn kind(&self) -> EventKind {
        self.kind
    }

    /// The clock snapshot: provisional before folding, final afterwards.
    pub fn clock(&self) -> &VectorClock {
        &self.clock
    }

    /// Wall-clock creation time. Tie-break input only, never causal.
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// The field changes this event carries.
    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// The assigned position, once a stream has folded this event (or the
    /// pre-set override before that).
    pub fn position(&self) -> Option<u64> {
        self.position
    }

    /// The one clock-and-position rewrite performed during folding.
    pub(crate) fn stamp(&mut self, clock: VectorClock, position: u64) {
        self.clock = clock;
        self.position = Some(position);
    }
}

impl CausalItem for Event {
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
