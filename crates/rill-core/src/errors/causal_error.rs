use crate::ids::EventId;

/// Causal-ordering errors.
#[derive(Debug, thiserror::Error)]
pub enum CausalError {
    /// The sorter could not emit every event: the remainder form a cycle.
    /// Impossible for correctly maintained vector clocks, so this is a
    /// data-integrity alarm, not a recoverable condition.
    #[error("Cyclic causal dependencies detected among events: {unresolved:?}")]
    CyclicCausality { unresolved: Vec<EventId> },

    /// A clock carried a negative counter or a malformed origin key.
    /// Rejected before any merge or comparison is attempted.
    #[error("invalid vector clock: {reason}")]
    InvalidClock { reason: String },
}
