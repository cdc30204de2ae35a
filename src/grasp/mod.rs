//! GRASP orchestration of the approximate k-cut computation.
//!
//! Each iteration constructs a uniformly random community assignment and
//! refines it — with plain local search, or with Variable Neighborhood
//! Search when a maximum neighborhood order is configured — keeping the best
//! solution seen across iterations.
//!
//! # Reference
//!
//! Festa, P., Pardalos, P. M., Resende, M. G. C. & Ribeiro, C. C. (2002).
//! "Randomized heuristics for the MAX-CUT problem", *Optimization Methods
//! and Software* 17(6), 1033-1058.

mod config;
mod placement;
mod runner;
mod types;
mod vns;

pub use config::KCutConfig;
pub use runner::{GraspRunner, KCutResult};
pub use types::Direction;
