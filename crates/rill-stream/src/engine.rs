//! ViewEngine — multi-stream coordinator over the fold core.
//!
//! Each stream sits behind its own lock, so folds against one stream are
//! serialized while distinct streams fold concurrently. The engine owns
//! the local site identity and the injected boundary hooks (payload
//! validation, durable storage, outbound sinks) as explicit dependencies,
//! not process-wide singletons.

use std::sync::{Arc, Mutex};

use dashmap::DashMap;
use tracing::debug;

use rill_causal::VectorClock;
use rill_core::config::EngineConfig;
use rill_core::errors::{RillResult, StreamError};
use rill_core::ids::{SiteId, StreamId};

use crate::event::Event;
use crate::stream::{FoldOutcome, Stream, StreamRecord};
use crate::traits::{EventSink, EventSource, EventStore, PayloadValidator};

/// Multi-stream fold coordinator.
pub struct ViewEngine {
    site: SiteId,
    config: EngineConfig,
    streams: DashMap<StreamId, Mutex<Stream>>,
    validator: Option<Arc<dyn PayloadValidator>>,
    store: Option<Arc<dyn EventStore>>,
    sinks: Vec<Arc<dyn EventSink>>,
}

impl ViewEngine {
    /// Create an engine with the given config. The site identity comes
    /// from the config or is generated at random.
    pub fn new(config: EngineConfig) -> Self {
        let site = config
            .site_id
            .as_deref()
            .map(SiteId::from)
            .unwrap_or_else(SiteId::random);
        Self {
            site,
            config,
            streams: DashMap::new(),
            validator: None,
            store: None,
            sinks: Vec::new(),
        }
    }

    /// Attach a payload-validation hook.
    pub fn with_validator(mut self, validator: Arc<dyn PayloadValidator>) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Attach a durable-storage hook.
    pub fn with_store(mut self, store: Arc<dyn EventStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Subscribe an outbound sink; folded events are forwarded to it.
    pub fn with_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    /// This engine's site identity.
    pub fn site(&self) -> &SiteId {
        &self.site
    }

    /// Create and register an empty stream, returning its id.
    pub fn create_stream(&self, name: &str) -> StreamId {
        self.register_stream(Stream::new(name))
    }

    /// Register an existing stream (e.g. rebuilt from storage).
    pub fn register_stream(&self, stream: Stream) -> StreamId {
        let stream_id = stream.id().clone();
        debug!(stream = %stream_id, name = stream.name(), "registered stream");
        self.streams.insert(stream_id.clone(), Mutex::new(stream));
        stream_id
    }

    /// Rebuild a stream from the storage hook's record, if one exists.
    pub fn restore_stream(&self, stream_id: &StreamId) -> RillResult<bool> {
        let Some(store) = &self.store else {
            return Ok(false);
        };
        match store.load_stream(stream_id)? {
            Some(record) => {
                self.register_stream(Stream::from_record(record));
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// The current snapshot of one stream's view.
    pub fn snapshot(
        &self,
        stream_id: &StreamId,
    ) -> RillResult<std::collections::BTreeMap<String, serde_json::Value>> {
        self.with_stream(stream_id, |stream| stream.view().snapshot().clone())
    }

    /// The current merged clock of one stream's view, usable by external
    /// reconciliation logic (e.g. deciding whether to pull a remote view).
    pub fn clock(&self, stream_id: &StreamId) -> RillResult<VectorClock> {
        self.with_stream(stream_id, |stream| stream.view().clock().clone())
    }

    /// The persistable record of one stream.
    pub fn record(&self, stream_id: &StreamId) -> RillResult<StreamRecord> {
        self.with_stream(stream_id, |stream| stream.record())
    }

    /// Fold a single event into a stream. Shorthand for a one-event batch
    /// with the same validation, persistence, and forwarding behavior.
    pub fn submit_event(
        &self,
        stream_id: &StreamId,
        event: Event,
    ) -> RillResult<(u64, VectorClock)> {
        let outcome = self.submit(stream_id, vec![event])?;
        Ok((outcome.final_position, outcome.final_clock))
    }

    /// Causally order and fold a batch into one stream.
    ///
    /// Enforces the configured batch bound, runs the payload-validation
    /// hook over every event (a rejection blocks the whole batch before
    /// any clock or ordering work), then locks the target stream and
    /// delegates to [`Stream::update_with_events`]. After a successful
    /// fold the stamped events and the stream record go to the storage
    /// hook (while the lock is held, so the persisted state is the folded
    /// state), and the stamped events are forwarded to any subscribed
    /// sinks.
    pub fn submit(&self, stream_id: &StreamId, events: Vec<Event>) -> RillResult<FoldOutcome> {
        if events.len() > self.config.max_batch_len {
            return Err(StreamError::BatchTooLarge {
                len: events.len(),
                max: self.config.max_batch_len,
            }
            .into());
        }

        if let Some(validator) = &self.validator {
            for event in &events {
                validator.validate(event).map_err(|reason| StreamError::PayloadRejected {
                    event_id: event.id().to_string(),
                    reason,
                })?;
            }
        }

        debug!(stream = %stream_id, batch_len = events.len(), "submitting batch");
        let outcome = {
            let entry = self
                .streams
                .get(stream_id)
                .ok_or_else(|| StreamError::UnknownStream(stream_id.clone()))?;
            let mut stream = entry.lock().expect("stream lock poisoned");
            let outcome = stream.update_with_events(events, &self.site)?;

            if let Some(store) = &self.store {
                for event in &outcome.events {
                    store.persist_event(stream_id, event)?;
                }
                store.persist_stream(&stream.record())?;
            }
            outcome
        };

        for event in &outcome.events {
            self.send_event(event)?;
        }
        Ok(outcome)
    }

    fn with_stream<T>(
        &self,
        stream_id: &StreamId,
        read: impl FnOnce(&Stream) -> T,
    ) -> RillResult<T> {
        let entry = self
            .streams
            .get(stream_id)
            .ok_or_else(|| StreamError::UnknownStream(stream_id.clone()))?;
        let stream = entry.lock().expect("stream lock poisoned");
        Ok(read(&stream))
    }
}

impl EventSource for ViewEngine {
    /// Forward one event to every subscribed sink.
    fn send_event(&self, event: &Event) -> RillResult<()> {
        for sink in &self.sinks {
            sink.receive_event(event.clone())?;
        }
        Ok(())
    }
}

impl EventSink for ViewEngine {
    /// Accept an event from another node and fold it into the stream it
    /// names, under this engine's site identity.
    fn receive_event(&self, event: Event) -> RillResult<()> {
        let stream_id = event.stream_id().clone();
        self.submit_event(&stream_id, event).map(|_| ())
    }
}
