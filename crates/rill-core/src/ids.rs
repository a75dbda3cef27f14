//! Identifiers for sites, streams, events, and vector-clock origins.
//!
//! Sites and streams carry UUIDv4-backed string ids, so origin keys are
//! globally unique by construction without any coordination between sites.
//!
//! # Examples
//!
//! ```
//! use rill_core::ids::{OriginKey, SiteId, StreamId};
//!
//! let origin = OriginKey::new(SiteId::from("site-a"), StreamId::from("users"));
//! assert_eq!(origin.encode(), "site-a:users");
//!
//! let parsed = OriginKey::parse("site-a:users").unwrap();
//! assert_eq!(parsed, origin);
//! ```

use std::fmt;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

use crate::errors::CausalError;

/// Identifies the process/actor that produced a vector-clock increment.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SiteId(String);

impl SiteId {
    /// Generate a random site identity (UUIDv4 string).
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SiteId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for SiteId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for SiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifies one causal history (one stream of events and its view).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StreamId(String);

impl StreamId {
    /// Generate a random stream identity (UUIDv4 string).
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for StreamId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for StreamId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for StreamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifies a single event. Totally ordered (lexicographic over the
/// UUIDv4 string) so ids are comparable across sites; the sorter uses
/// `(timestamp, id)` as its deterministic tie-break key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(String);

impl EventId {
    /// Generate a random event identity (UUIDv4 string).
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for EventId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for EventId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The `(site, stream)` pair that owns one vector-clock counter.
///
/// Serialized as the canonical string `"{site}:{stream}"` so clocks can be
/// stored and transported as an ordered mapping from origin key to integer.
/// The site portion must not contain `:`; UUIDv4-backed ids never do.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OriginKey {
    site: SiteId,
    stream: StreamId,
}

impl OriginKey {
    /// Build an origin key from its two halves.
    pub fn new(site: SiteId, stream: StreamId) -> Self {
        Self { site, stream }
    }

    /// The site that advanced the counter.
    pub fn site(&self) -> &SiteId {
        &self.site
    }

    /// The stream the counter belongs to.
    pub fn stream(&self) -> &StreamId {
        &self.stream
    }

    /// Canonical string encoding: `"{site}:{stream}"`.
    pub fn encode(&self) -> String {
        format!("{}:{}", self.site, self.stream)
    }

    /// Parse the canonical encoding. A missing separator or an empty side
    /// is a malformed origin key.
    pub fn parse(encoded: &str) -> Result<Self, CausalError> {
        let (site, stream) = encoded.split_once(':').ok_or_else(|| CausalError::InvalidClock {
            reason: format!("malformed origin key {encoded:?}: missing ':' separator"),
        })?;
        if site.is_empty() || stream.is_empty() {
            return Err(CausalError::InvalidClock {
                reason: format!("malformed origin key {encoded:?}: empty site or stream"),
            });
        }
        Ok(Self {
            site: SiteId::from(site),
            stream: StreamId::from(stream),
        })
    }
}

impl fmt::Display for OriginKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.site, self.stream)
    }
}

impl Serialize for OriginKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.encode())
    }
}

impl<'de> Deserialize<'de> for OriginKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        Self::parse(&encoded).map_err(D::Error::custom)
    }
}
