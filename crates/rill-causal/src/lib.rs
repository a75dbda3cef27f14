//! # rill-causal
//!
//! Causal-ordering primitives for the rill view-materialization engine.
//!
//! - [`VectorClock`] — immutable-value clock algebra (merge, increment,
//!   happened-before, concurrency detection)
//! - [`CausalSorter`] — deterministic total order over a finite event set,
//!   consistent with the happened-before partial order
//! - [`CausalItem`] — the seam between the sorter and the event model
//!
//! ## Mathematical guarantees
//!
//! Clock merge is the lattice join and satisfies:
//! 1. **Commutativity**: `merge(a, b) == merge(b, a)`
//! 2. **Associativity**: `merge(a, merge(b, c)) == merge(merge(a, b), c)`
//! 3. **Idempotency**: `merge(a, a) == a`
//!
//! The sorter's output never violates a happened-before edge, and is
//! byte-identical across runs regardless of input order.

pub mod clock;
pub mod sorter;

// Re-export public API
pub use clock::VectorClock;
pub use sorter::{CausalItem, CausalSorter};
