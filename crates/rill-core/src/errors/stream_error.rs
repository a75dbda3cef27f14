use crate::ids::StreamId;

/// Stream- and engine-boundary errors.
#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    /// No stream with this id is registered with the engine.
    #[error("unknown stream: {0}")]
    UnknownStream(StreamId),

    /// The submitted batch exceeds the configured bound. The sorter is
    /// quadratic in batch size; batches are expected to stay small.
    #[error("batch of {len} events exceeds configured maximum of {max}")]
    BatchTooLarge { len: usize, max: usize },

    /// The payload-validation hook rejected an event. The event never
    /// reaches the clock or ordering logic.
    #[error("payload rejected for event {event_id}: {reason}")]
    PayloadRejected { event_id: String, reason: String },
}
