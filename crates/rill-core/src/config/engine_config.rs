//! Configuration for the view-materialization engine.
//!
//! # Examples
//!
//! ```
//! use rill_core::config::EngineConfig;
//!
//! let config = EngineConfig::default();
//! assert!(config.site_id.is_none());
//! assert_eq!(config.max_batch_len, 10_000);
//! ```

use serde::{Deserialize, Serialize};

/// Configuration for the multi-stream view engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Fixed site identity for this engine. Default: `None`, meaning a
    /// random site id is generated at engine construction.
    pub site_id: Option<String>,
    /// Maximum number of events in one fold batch. Default: 10_000.
    pub max_batch_len: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            site_id: None,
            max_batch_len: 10_000,
        }
    }
}
