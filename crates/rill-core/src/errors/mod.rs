//! Error taxonomy for the engine.
//!
//! One enum per domain, all wrapped by [`RillError`]. Every fallible
//! operation in the workspace returns [`RillResult`].

mod causal_error;
mod storage_error;
mod stream_error;

pub use causal_error::CausalError;
pub use storage_error::StorageError;
pub use stream_error::StreamError;

/// Top-level error for all engine operations.
#[derive(Debug, thiserror::Error)]
pub enum RillError {
    #[error(transparent)]
    Causal(#[from] CausalError),

    #[error(transparent)]
    Stream(#[from] StreamError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Result alias used across the workspace.
pub type RillResult<T> = Result<T, RillError>;
