//! GRASP loop execution.
//!
//! [`GraspRunner`] drives the full computation: per iteration it constructs
//! a fresh random candidate, refines it with local search (or VNS), and
//! keeps whichever of the current and best solutions wins under the
//! configured direction. The two solution buffers are pre-allocated once and
//! their roles are exchanged by swapping indices — an O(1) operation —
//! never by copying assignment contents.

use super::config::KCutConfig;
use super::placement::place_nodes_randomly;
use super::types::Candidate;
use super::vns::variable_neighborhood_search;
use crate::graph::CsrGraph;
use crate::local_search::LocalSearch;
use crate::partition::{degree_partition, range_partition};
use crate::progress::{NoProgress, Progress};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

/// Result of a k-cut run.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KCutResult {
    /// Value at index `i` is the community of node `i`.
    pub assignment: Vec<u8>,

    /// Total weight of edges crossing between different communities.
    pub cut_cost: f64,

    /// Number of GRASP iterations that ran to completion.
    ///
    /// When this is 0 the run was cancelled before producing anything;
    /// `assignment` and `cut_cost` are then not a valid result.
    pub iterations: usize,

    /// Whether the run was cancelled externally.
    pub cancelled: bool,

    /// Best cut cost after each completed iteration. Non-worsening in the
    /// configured direction.
    pub cost_history: Vec<f64>,
}

impl KCutResult {
    /// The community of `node`; the per-node projection of the cut.
    pub fn community(&self, node: usize) -> u8 {
        self.assignment[node]
    }

    /// Number of nodes in the assignment.
    pub fn node_count(&self) -> usize {
        self.assignment.len()
    }
}

/// Executes the GRASP (+VNS) k-cut approximation.
///
/// # Usage
///
/// ```
/// use approx_kcut::graph::CsrGraph;
/// use approx_kcut::grasp::{GraspRunner, KCutConfig};
///
/// let graph = CsrGraph::from_unweighted_edges(3, &[(0, 1), (1, 2)]);
/// let config = KCutConfig::default().with_seed(42).with_concurrency(1);
/// let result = GraspRunner::run(&graph, &config);
/// assert_eq!(result.iterations, config.iterations);
/// ```
pub struct GraspRunner;

impl GraspRunner {
    /// Runs the computation to completion.
    ///
    /// # Panics
    /// Panics if the configuration is invalid (call [`KCutConfig::validate`]
    /// first to get a descriptive error), or if the configured minimum
    /// community sizes sum to more than the graph's node count.
    pub fn run(graph: &CsrGraph, config: &KCutConfig) -> KCutResult {
        Self::run_with_cancel(graph, config, None)
    }

    /// Runs with an optional cancellation token.
    ///
    /// Setting the flag stops the run cooperatively: dispatched partition
    /// tasks finish, no new round or iteration starts, and the best solution
    /// of the iterations completed so far is returned.
    pub fn run_with_cancel(
        graph: &CsrGraph,
        config: &KCutConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> KCutResult {
        Self::run_with_progress(graph, config, cancel, &NoProgress)
    }

    /// Runs with a cancellation token and a progress listener.
    pub fn run_with_progress(
        graph: &CsrGraph,
        config: &KCutConfig,
        cancel: Option<Arc<AtomicBool>>,
        progress: &dyn Progress,
    ) -> KCutResult {
        config.validate().expect("invalid KCutConfig");

        let node_count = graph.node_count();
        let k = config.k as usize;
        let direction = config.direction();
        let min_community_sizes = config.resolved_min_community_sizes();
        assert!(
            min_community_sizes.iter().sum::<usize>() <= node_count,
            "minimum community sizes sum to more than the node count"
        );

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(rand::random()),
        };

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.concurrency)
            .build()
            .expect("failed to build worker thread pool");
        let search_partitions = degree_partition(graph, config.concurrency, config.min_batch_size);
        let placement_partitions =
            range_partition(node_count, config.concurrency, config.min_batch_size);

        // Weights can only be used if the graph was built with them.
        let use_edge_weights = config.use_edge_weights && graph.has_edge_weights();
        let engine = LocalSearch::new(
            graph,
            direction,
            k,
            min_community_sizes.clone(),
            use_edge_weights,
            &pool,
            &search_partitions,
        );

        // Two candidate buffers whose roles alternate, plus VNS scratch.
        let mut candidates = [
            Candidate::new(node_count, direction.worst()),
            Candidate::new(node_count, direction.worst()),
        ];
        let cardinalities: Vec<AtomicUsize> = (0..k).map(|_| AtomicUsize::new(0)).collect();
        let (mut vns_scratch, vns_cardinalities) = if config.vns_max_neighborhood_order > 0 {
            (
                Some(Candidate::new(node_count, direction.worst())),
                (0..k).map(|_| AtomicUsize::new(0)).collect(),
            )
        } else {
            (None, Vec::new())
        };

        let cancel_flag = cancel.as_deref();
        let running = move || cancel_flag.is_none_or(|flag| !flag.load(Ordering::Relaxed));

        let (mut curr_idx, mut best_idx) = (0usize, 1usize);
        let mut completed = 0usize;
        let mut cancelled = false;
        let mut cost_history = Vec::with_capacity(config.iterations);

        log::debug!(
            "grasp k-cut: {node_count} nodes, k={k}, {} iterations, {:?}",
            config.iterations,
            direction
        );

        for iteration in 1..=config.iterations {
            if !running() {
                cancelled = true;
                break;
            }

            let construction = format!("iteration {iteration}: place nodes randomly");
            progress.begin_task(&construction);
            place_nodes_randomly(
                k,
                &min_community_sizes,
                &candidates[curr_idx].assignment,
                &cardinalities,
                &placement_partitions,
                &pool,
                &mut rng,
            );
            progress.end_task(&construction);

            if !running() {
                cancelled = true;
                break;
            }

            if config.vns_max_neighborhood_order > 0 {
                let refinement = format!("iteration {iteration}: variable neighborhood search");
                progress.begin_task(&refinement);
                variable_neighborhood_search(
                    &engine,
                    direction,
                    config.vns_max_neighborhood_order,
                    &min_community_sizes,
                    &mut candidates[curr_idx],
                    vns_scratch.as_mut().expect("scratch allocated with VNS on"),
                    &cardinalities,
                    &vns_cardinalities,
                    &mut rng,
                    &running,
                    progress,
                );
                progress.end_task(&refinement);
            } else {
                let refinement = format!("iteration {iteration}: local search");
                progress.begin_task(&refinement);
                engine.compute(
                    &candidates[curr_idx].assignment,
                    &candidates[curr_idx].cost,
                    &cardinalities,
                    &running,
                    progress,
                );
                progress.end_task(&refinement);
            }

            if !running() {
                // The interrupted iteration's partial candidate is discarded.
                cancelled = true;
                break;
            }

            completed += 1;
            let curr_cost = candidates[curr_idx].cost.load();
            if direction.improves(candidates[best_idx].cost.load(), curr_cost) {
                std::mem::swap(&mut curr_idx, &mut best_idx);
            }
            cost_history.push(candidates[best_idx].cost.load());
            log::trace!(
                "iteration {iteration}: cost {curr_cost}, best {}",
                candidates[best_idx].cost.load()
            );
        }

        let best = &candidates[best_idx];
        log::debug!(
            "grasp k-cut finished: best cost {} after {completed} iterations{}",
            best.cost.load(),
            if cancelled { " (cancelled)" } else { "" }
        );

        KCutResult {
            assignment: best.snapshot_assignment(),
            cut_cost: best.cost.load(),
            iterations: completed,
            cancelled,
            cost_history,
        }
    }
}
