//! # rill-stream
//!
//! Event streams and materialized views over the rill causal core.
//!
//! - [`Event`] — an immutable fact with a vector-clock snapshot and a
//!   field-change payload
//! - [`View`] — the materialized snapshot for one stream, folding ordered
//!   events into a key/value state plus a merged clock
//! - [`Stream`] — position assignment and fold orchestration over one view
//! - [`ViewEngine`] — multi-stream coordinator wiring in the injected
//!   payload-validation and durable-storage hooks
//!
//! The ordering contract: events reach [`View::apply`] only in the order
//! produced by the causal sorter. The engine and stream enforce this;
//! callers driving a view directly must uphold it themselves.

pub mod engine;
pub mod event;
pub mod stream;
pub mod traits;
pub mod view;

// Re-export public API
pub use engine::ViewEngine;
pub use event::{Event, EventKind, FieldChange, Payload};
pub use stream::{FoldOutcome, Stream, StreamRecord};
pub use traits::{EventSink, EventSource, EventStore, PayloadValidator};
pub use view::View;
