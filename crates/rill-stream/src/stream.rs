//! Stream orchestration: position assignment and batch folds.

use serde::{Deserialize, Serialize};
use tracing::debug;

use rill_causal::{CausalSorter, VectorClock};
use rill_core::errors::RillResult;
use rill_core::ids::{OriginKey, SiteId, StreamId};

use crate::event::Event;
use crate::view::View;

/// One causal history and its materialized view.
///
/// Owns the monotonic position counter (strictly increasing, never reused)
/// and exactly one [`View`]. The `&mut self` receivers serialize folds per
/// stream; distinct streams are fully independent.
///
/// [`record`](Self::record) / [`from_record`](Self::from_record) are the
/// persistence form; the struct itself is not serialized directly.
#[derive(Debug)]
pub struct Stream {
    id: StreamId,
    name: String,
    event_counter: u64,
    latest_merged_position: u64,
    view: View,
}

/// Persistable snapshot of a stream after a fold: the counters plus the
/// view state the durable-storage hook writes out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamRecord {
    pub stream_id: StreamId,
    pub name: String,
    pub event_counter: u64,
    pub latest_merged_position: u64,
    pub snapshot: std::collections::BTreeMap<String, serde_json::Value>,
    pub clock: VectorClock,
}

/// Result of folding a batch: the stamped events in fold order and the
/// stream's final position and clock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoldOutcome {
    pub final_position: u64,
    pub final_clock: VectorClock,
    pub events: Vec<Event>,
}

impl Stream {
    /// A new stream with a random id and an empty view.
    pub fn new(name: &str) -> Self {
        Self::with_id(StreamId::random(), name)
    }

    /// A new stream with a caller-chosen id (replays, tests).
    pub fn with_id(id: StreamId, name: &str) -> Self {
        Self {
            view: View::new(id.clone()),
            id,
            name: name.to_string(),
            event_counter: 0,
            latest_merged_position: 0,
        }
    }

    /// Rebuild a stream from a persisted record.
    pub fn from_record(record: StreamRecord) -> Self {
        Self {
            view: View::from_parts(record.stream_id.clone(), record.snapshot, record.clock),
            id: record.stream_id,
            name: record.name,
            event_counter: record.event_counter,
            latest_merged_position: record.latest_merged_position,
        }
    }

    /// The stream's identity.
    pub fn id(&self) -> &StreamId {
        &self.id
    }

    /// Human-readable stream name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of locally assigned positions so far.
    pub fn event_counter(&self) -> u64 {
        self.event_counter
    }

    /// Highest position folded so far. May run ahead of the counter when
    /// an out-of-band event carried a manually higher position.
    pub fn latest_merged_position(&self) -> u64 {
        self.latest_merged_position
    }

    /// The stream's materialized view.
    pub fn view(&self) -> &View {
        &self.view
    }

    /// Persistable snapshot of counters and view state.
    pub fn record(&self) -> StreamRecord {
        StreamRecord {
            stream_id: self.id.clone(),
            name: self.name.clone(),
            event_counter: self.event_counter,
            latest_merged_position: self.latest_merged_position,
            snapshot: self.view.snapshot().clone(),
            clock: self.view.clock().clone(),
        }
    }

    /// Fold one event into the view and stamp it.
    ///
    /// Assigns `position = event_counter + 1` unless the event carries a
    /// pre-set position (which is honored), advances the counter, folds
    /// the payload and provisional clock into the view, then replaces the
    /// event's clock with merge-and-increment against the view's clock at
    /// origin `(site, stream)` and folds that stamped clock back into the
    /// view. `latest_merged_position` tracks the maximum position seen,
    /// not the local counter.
    ///
    /// Callers folding more than one event must go through
    /// [`update_with_events`](Self::update_with_events) so the batch is
    /// causally ordered first.
    pub fn apply_event(&mut self, event: &mut Event, site: &SiteId) -> RillResult<(u64, VectorClock)> {
        self.event_counter += 1;
        let position = event.position().unwrap_or(self.event_counter);

        self.view.apply(event);

        let origin = OriginKey::new(site.clone(), self.id.clone());
        let stamped = event.clock().merge_and_increment(self.view.clock(), &origin);
        self.view.absorb_clock(&stamped);
        event.stamp(stamped.clone(), position);

        self.latest_merged_position = self.latest_merged_position.max(position);
        debug!(
            stream = %self.id,
            event = %event.id(),
            position,
            "folded event into view"
        );
        Ok((position, stamped))
    }

    /// Causally order a batch and fold it, all-or-nothing.
    ///
    /// The sorter runs before any state mutation, so a detected cycle
    /// aborts the whole batch with counters and view untouched; after a
    /// successful sort every fold is a total operation. An empty batch is
    /// a no-op returning the current high-water mark and clock.
    pub fn update_with_events(&mut self, events: Vec<Event>, site: &SiteId) -> RillResult<FoldOutcome> {
        let batch_len = events.len();
        let sorted = CausalSorter::sort(events)?;

        let mut folded = Vec::with_capacity(sorted.len());
        for mut event in sorted {
            self.apply_event(&mut event, site)?;
            folded.push(event);
        }

        debug!(stream = %self.id, batch_len, "folded batch");
        Ok(FoldOutcome {
            final_position: self.latest_merged_position,
            final_clock: self.view.clock().clone(),
            events: folded,
        })
    }
}
