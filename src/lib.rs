//! Approximate maximum/minimum k-cut of weighted graphs.
//!
//! Partitions all nodes of a graph into `k` labeled communities so that the
//! total weight of edges crossing between different communities is maximized
//! (or minimized), optionally subject to per-community minimum sizes. The
//! problem is NP-hard; this crate implements a parallelized GRASP
//! metaheuristic — repeated randomized construction followed by local-search
//! refinement, keeping the best solution found — optionally strengthened
//! with Variable Neighborhood Search (VNS).
//!
//! - **[`grasp`]**: the orchestrator ([`grasp::GraspRunner`]), its
//!   configuration ([`grasp::KCutConfig`]) and result type, the random
//!   construction step, and the VNS wrapper.
//! - **[`local_search`]**: the parallel refinement engine. Each round
//!   recomputes a node-to-community weight table and then attempts
//!   single-node community swaps under a lock-free tri-state claim protocol.
//! - **[`graph`]**: immutable CSR graph storage with cheap per-task
//!   traversal cursors.
//! - **[`partition`]**, **[`sync`]**, **[`progress`]**: degree-balanced work
//!   partitioning, an atomic `f64` accumulator, and the progress-reporting
//!   seam.
//!
//! # Example
//!
//! ```
//! use approx_kcut::graph::CsrGraph;
//! use approx_kcut::grasp::{GraspRunner, KCutConfig};
//!
//! // Undirected square with a diagonal, one stored orientation per edge.
//! let graph = CsrGraph::from_edges(4, &[(0, 1, 1.0), (1, 2, 1.0), (0, 2, 1.0), (2, 3, 1.0)]);
//! let config = KCutConfig::default()
//!     .with_use_edge_weights(true)
//!     .with_seed(42)
//!     .with_concurrency(1);
//! let result = GraspRunner::run(&graph, &config);
//! assert_eq!(result.assignment.len(), 4);
//! ```
//!
//! # References
//!
//! - Festa, P. et al. (2002). "Randomized heuristics for the MAX-CUT
//!   problem", *Optimization Methods and Software* 17(6), 1033-1058.
//! - Dunning, I., Gupta, S. & Silberholz, J. (2018). "What works best when?
//!   A systematic evaluation of heuristics for Max-Cut and QUBO",
//!   *INFORMS Journal on Computing* 30(3).

pub mod graph;
pub mod grasp;
pub mod local_search;
pub mod partition;
pub mod progress;
pub mod sync;
