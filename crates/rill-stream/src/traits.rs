//! Boundary seams: storage, validation, and transport hooks.
//!
//! Implementations live outside this repository. The engine assumes the
//! storage side is transactional; it does not manage commit or rollback of
//! external state.

use rill_core::errors::RillResult;
use rill_core::ids::StreamId;

use crate::event::Event;
use crate::stream::StreamRecord;

/// Durable-storage hook, invoked after a successful fold while the stream
/// lock is still held: each stamped event (final clock and position), then
/// the stream record (counters + snapshot + clock).
pub trait EventStore: Send + Sync {
    /// Persist one folded event.
    fn persist_event(&self, stream_id: &StreamId, event: &Event) -> RillResult<()>;

    /// Persist the stream's post-fold record.
    fn persist_stream(&self, record: &StreamRecord) -> RillResult<()>;

    /// Load a previously persisted stream record, if any.
    fn load_stream(&self, stream_id: &StreamId) -> RillResult<Option<StreamRecord>>;
}

/// Payload-validation hook, invoked before an event is accepted. A
/// rejected event never reaches the clock or ordering logic. The returned
/// string is the rejection reason.
pub trait PayloadValidator: Send + Sync {
    fn validate(&self, event: &Event) -> Result<(), String>;
}

/// Outbound transport seam: something that sends folded events to other
/// nodes. No wire format is implied.
pub trait EventSource: Send + Sync {
    fn send_event(&self, event: &Event) -> RillResult<()>;
}

/// Inbound transport seam: something that receives events from other
/// nodes and feeds them into a local engine.
pub trait EventSink: Send + Sync {
    fn receive_event(&self, event: Event) -> RillResult<()>;
}
