//! Vector clock for causal ordering.
//!
//! Each `(site, stream)` origin owns its own counter. Every operation
//! returns a new clock value; clocks already embedded in committed events
//! are never retroactively altered.
//!
//! # Examples
//!
//! ```
//! use rill_causal::VectorClock;
//! use rill_core::ids::{OriginKey, SiteId, StreamId};
//!
//! let o1 = OriginKey::new(SiteId::from("site-a"), StreamId::from("users"));
//! let o2 = OriginKey::new(SiteId::from("site-b"), StreamId::from("users"));
//!
//! let a = VectorClock::new().increment(&o1).increment(&o1);
//! let b = VectorClock::new().increment(&o2);
//!
//! assert!(a.concurrent_with(&b));
//!
//! let merged = a.merge(&b);
//! assert_eq!(merged.get(&o1), 2);
//! assert_eq!(merged.get(&o2), 1);
//! assert!(a.happened_before(&merged));
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use rill_core::errors::CausalError;
use rill_core::ids::OriginKey;

/// A vector clock mapping origin keys to logical counters.
///
/// Absent origins read as 0, so clocks with disjoint origin sets compare
/// and merge without error. The backing map is ordered, which makes the
/// serialized form an ordered mapping from origin key to integer.
///
/// Zero-valued entries are never stored: `{A:0}` and `{}` are the same
/// clock value and compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VectorClock {
    entries: BTreeMap<OriginKey, u64>,
}

impl VectorClock {
    /// Create an empty vector clock.
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Boundary constructor over signed counters, as they arrive from
    /// storage or transport. A negative counter is an invalid clock.
    /// Zero counters are dropped (absent means 0).
    pub fn try_from_entries<I>(entries: I) -> Result<Self, CausalError>
    where
        I: IntoIterator<Item = (OriginKey, i64)>,
    {
        let mut clock = Self::new();
        for (origin, counter) in entries {
            if counter < 0 {
                return Err(CausalError::InvalidClock {
                    reason: format!("negative counter {counter} for origin {origin}"),
                });
            }
            if counter > 0 {
                clock.entries.insert(origin, counter as u64);
            }
        }
        Ok(clock)
    }

    /// The counter for an origin (0 if absent).
    pub fn get(&self, origin: &OriginKey) -> u64 {
        self.entries.get(origin).copied().unwrap_or(0)
    }

    /// Pointwise maximum of the two clocks: the lattice join.
    ///
    /// Commutative, associative, idempotent. Counters never decrease.
    pub fn merge(&self, other: &Self) -> Self {
        let mut merged = self.clone();
        for (origin, &counter) in &other.entries {
            let entry = merged.entries.entry(origin.clone()).or_insert(0);
            *entry = (*entry).max(counter);
        }
        merged
    }

    /// A copy of this clock with exactly one coordinate bumped by 1.
    pub fn increment(&self, origin: &OriginKey) -> Self {
        let mut incremented = self.clone();
        *incremented.entries.entry(origin.clone()).or_insert(0) += 1;
        incremented
    }

    /// `increment(merge(self, other), origin)` — the clock a view stamps
    /// onto an event it absorbs: the event's provisional clock joined with
    /// the view's accumulated clock, then the absorbing origin bumped.
    pub fn merge_and_increment(&self, other: &Self, origin: &OriginKey) -> Self {
        self.merge(other).increment(origin)
    }

    /// Returns true if `self` happened before `other`.
    ///
    /// Every coordinate of `self` is ≤ the corresponding coordinate of
    /// `other`, and at least one is strictly less. Irreflexive: equal
    /// clocks are not ordered.
    pub fn happened_before(&self, other: &Self) -> bool {
        let mut strictly_less = false;

        for (origin, &counter) in &self.entries {
            let other_counter = other.get(origin);
            if counter > other_counter {
                return false;
            }
            if counter < other_counter {
                strictly_less = true;
            }
        }

        // Origins present only in `other` count as a strict increase over
        // our implicit 0.
        for (origin, &other_counter) in &other.entries {
            if other_counter > 0 && !self.entries.contains_key(origin) {
                strictly_less = true;
            }
        }

        strictly_less
    }

    /// Returns true if neither clock happened before the other and they
    /// are not equal: the two histories are concurrent.
    pub fn concurrent_with(&self, other: &Self) -> bool {
        self != other && !self.happened_before(other) && !other.happened_before(self)
    }

    /// Returns true if `self` dominates `other` (the inverse orientation
    /// of [`happened_before`](Self::happened_before)).
    pub fn dominates(&self, other: &Self) -> bool {
        other.happened_before(self)
    }

    /// Iterate over `(origin, counter)` entries in origin order.
    pub fn entries(&self) -> impl Iterator<Item = (&OriginKey, u64)> {
        self.entries.iter().map(|(origin, &counter)| (origin, counter))
    }

    /// Iterate over the origins tracked by this clock.
    pub fn origins(&self) -> impl Iterator<Item = &OriginKey> {
        self.entries.keys()
    }

    /// Number of origins tracked by this clock.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the clock has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(OriginKey, u64)> for VectorClock {
    fn from_iter<I: IntoIterator<Item = (OriginKey, u64)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().filter(|&(_, counter)| counter > 0).collect(),
        }
    }
}
