//! Deterministic total ordering of events under the causal partial order.
//!
//! The sorter builds a happened-before dependency graph over a finite event
//! set and runs a Kahn-style traversal that always emits the ready event
//! with the smallest `(timestamp, id)` key. The output never violates a
//! happened-before edge, and two runs over the same set, in any input
//! order, produce identical sequences.
//!
//! Wall-clock timestamps are only the tie-break among causally concurrent
//! events, never a causal decision.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};

use chrono::{DateTime, Utc};

use rill_core::errors::CausalError;
use rill_core::ids::EventId;

use crate::clock::VectorClock;

/// Anything the sorter can order: an id (globally comparable across
/// sites), a clock, and a wall-clock timestamp.
pub trait CausalItem {
    /// The item's unique, totally ordered identifier.
    fn id(&self) -> &EventId;
    /// The item's vector-clock snapshot.
    fn clock(&self) -> &VectorClock;
    /// Wall-clock creation time, used only for concurrent tie-break.
    fn timestamp(&self) -> DateTime<Utc>;
}

/// Stateless sorter over causally related items.
pub struct CausalSorter;

impl CausalSorter {
    /// Produce one deterministic total order consistent with the
    /// happened-before partial order on the items' clocks.
    ///
    /// Dependency edges are derived by pairwise clock comparison; cycles
    /// are impossible for correctly maintained clocks, so a detected cycle
    /// is reported as [`CausalError::CyclicCausality`] and the batch must
    /// be abandoned. Ids are assumed unique; a duplicated id degenerates
    /// into a self-dependency and is reported the same way.
    pub fn sort<T: CausalItem>(items: Vec<T>) -> Result<Vec<T>, CausalError> {
        let mut dependencies = Vec::new();
        for (earlier_index, earlier) in items.iter().enumerate() {
            for (later_index, later) in items.iter().enumerate() {
                if earlier_index != later_index
                    && earlier.clock().happened_before(later.clock())
                {
                    dependencies.push((earlier.id().clone(), later.id().clone()));
                }
            }
        }
        Self::sort_with_dependencies(items, &dependencies)
    }

    /// The traversal underneath [`sort`](Self::sort), over an explicit
    /// dependency edge list (`(before, after)` pairs).
    ///
    /// Exposed for callers that already know the dependency structure.
    /// Duplicate edges count once; edges naming unknown ids are ignored.
    pub fn sort_with_dependencies<T: CausalItem>(
        items: Vec<T>,
        dependencies: &[(EventId, EventId)],
    ) -> Result<Vec<T>, CausalError> {
        let item_count = items.len();
        let index_of: HashMap<EventId, usize> = items
            .iter()
            .enumerate()
            .map(|(index, item)| (item.id().clone(), index))
            .collect();

        let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); item_count];
        let mut in_degree = vec![0usize; item_count];
        let mut seen_edges = HashSet::new();
        for (before, after) in dependencies {
            let (Some(&from), Some(&to)) = (index_of.get(before), index_of.get(after)) else {
                continue;
            };
            if seen_edges.insert((from, to)) {
                adjacency[from].push(to);
                in_degree[to] += 1;
            }
        }

        // Ready set keyed by (timestamp, id): the deterministic tie-break
        // among causally concurrent items.
        let mut ready: BinaryHeap<Reverse<(DateTime<Utc>, EventId, usize)>> = items
            .iter()
            .enumerate()
            .filter(|&(index, _)| in_degree[index] == 0)
            .map(|(index, item)| Reverse((item.timestamp(), item.id().clone(), index)))
            .collect();

        let mut emitted = Vec::with_capacity(item_count);
        let mut resolved = vec![false; item_count];
        while let Some(Reverse((_, _, index))) = ready.pop() {
            emitted.push(index);
            resolved[index] = true;
            for &dependent in &adjacency[index] {
                in_degree[dependent] -= 1;
                if in_degree[dependent] == 0 {
                    let item = &items[dependent];
                    ready.push(Reverse((item.timestamp(), item.id().clone(), dependent)));
                }
            }
        }

        if emitted.len() != item_count {
            let unresolved = items
                .iter()
                .enumerate()
                .filter(|&(index, _)| !resolved[index])
                .map(|(_, item)| item.id().clone())
                .collect();
            return Err(CausalError::CyclicCausality { unresolved });
        }

        let mut rank = vec![0usize; item_count];
        for (position, &index) in emitted.iter().enumerate() {
            rank[index] = position;
        }
        let mut ordered: Vec<(usize, T)> = items.into_iter().enumerate().collect();
        ordered.sort_by_key(|&(index, _)| rank[index]);
        Ok(ordered.into_iter().map(|(_, item)| item).collect())
    }
}
