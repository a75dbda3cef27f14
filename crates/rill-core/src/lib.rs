//! # rill-core
//!
//! Foundation crate for the rill view-materialization engine.
//! Defines identifiers, the error taxonomy, and engine configuration.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod errors;
pub mod ids;

// Re-export the most commonly used types at the crate root.
pub use config::EngineConfig;
pub use errors::{RillError, RillResult};
pub use ids::{EventId, OriginKey, SiteId, StreamId};
