//! Parallel local search over community assignments.
//!
//! Given a community assignment, the engine repeatedly moves individual
//! nodes to their preferred communities until no improving single-node move
//! remains, then computes the final cut cost. Every phase is data-parallel
//! over degree-balanced node partitions; correctness under concurrency rests
//! on a lock-free tri-state swap protocol rather than locks. See
//! [`LocalSearch`] for the details.

mod engine;

pub use engine::LocalSearch;
