//! The parallel local-search refinement engine.

use crate::graph::CsrGraph;
use crate::grasp::Direction;
use crate::partition::Partition;
use crate::progress::Progress;
use crate::sync::AtomicF64;
use rayon::prelude::*;
use rayon::ThreadPool;
use std::sync::atomic::{AtomicBool, AtomicU8, AtomicUsize, Ordering};

// Per-node swap status, reset every round.
//
// No thread has touched the node.
const UNTOUCHED: u8 = 0;
// A thread is mid-swap on the node, or has swapped it.
const SWAPPING: u8 = 1;
// An incoming neighbor swapped (or tried to), so the node's cached
// improvement weights may be stale.
const NEIGHBOR: u8 = 2;

/// Refines a community assignment by parallel single-node swaps until no
/// improving swap is found, then computes the final cut cost.
///
/// Each round runs two fully parallel phases separated by full barriers:
/// first the node-to-community weight table is recomputed from scratch, then
/// every node attempts to move to its preferred community under a lock-free
/// tri-state claim protocol. Rather than recomputing weights after every
/// single swap, a whole round of moves is applied against one weight
/// snapshot; any node whose weights could be invalidated by a concurrent
/// neighbor's move is blocked from moving in the same round, which bounds
/// the staleness.
pub struct LocalSearch<'a> {
    graph: &'a CsrGraph,
    pool: &'a ThreadPool,
    partitions: &'a [Partition],
    k: usize,
    /// Community preference of a single node; the cut direction flipped.
    placement_direction: Direction,
    min_community_sizes: Vec<usize>,
    use_edge_weights: bool,
    /// Dense N×k table; entry `(node, community)` is the edge weight `node`
    /// has into `community` under the current assignment of all other nodes.
    node_to_community_weights: Vec<AtomicF64>,
    swap_status: Vec<AtomicU8>,
}

impl<'a> LocalSearch<'a> {
    /// Creates an engine for `graph`, allocating the weight table and swap
    /// status once; both are reused across all rounds and invocations.
    pub fn new(
        graph: &'a CsrGraph,
        direction: Direction,
        k: usize,
        min_community_sizes: Vec<usize>,
        use_edge_weights: bool,
        pool: &'a ThreadPool,
        partitions: &'a [Partition],
    ) -> Self {
        assert!(k >= 2, "k must be at least 2");
        assert_eq!(
            min_community_sizes.len(),
            k,
            "one minimum size per community required"
        );
        let node_count = graph.node_count();
        Self {
            graph,
            pool,
            partitions,
            k,
            placement_direction: direction.flip(),
            min_community_sizes,
            use_edge_weights,
            node_to_community_weights: (0..node_count * k).map(|_| AtomicF64::default()).collect(),
            swap_status: (0..node_count).map(|_| AtomicU8::new(UNTOUCHED)).collect(),
        }
    }

    /// Runs swap rounds until a fixed point (or `running` turns false), then
    /// writes the assignment's cut cost into `cost`.
    ///
    /// `cardinalities` must hold the per-community node counts of
    /// `assignment` on entry; they are kept consistent through every
    /// committed swap.
    pub fn compute<R: Fn() -> bool + Sync>(
        &self,
        assignment: &[AtomicU8],
        cost: &AtomicF64,
        cardinalities: &[AtomicUsize],
        running: &R,
        progress: &dyn Progress,
    ) {
        assert_eq!(assignment.len(), self.graph.node_count());
        assert_eq!(cardinalities.len(), self.k);

        let change = AtomicBool::new(true);

        progress.begin_task("local search");
        while change.load(Ordering::Relaxed) && running() {
            self.reset_weights();
            progress.begin_task("compute node to community weights");
            self.pool.install(|| {
                self.partitions.par_iter().for_each(|partition| {
                    self.compute_node_to_community_weights(*partition, assignment, running, progress);
                });
            });
            progress.end_task("compute node to community weights");

            for status in &self.swap_status {
                status.store(UNTOUCHED, Ordering::Relaxed);
            }
            change.store(false, Ordering::Relaxed);
            progress.begin_task("swap for local improvements");
            self.pool.install(|| {
                self.partitions.par_iter().for_each(|partition| {
                    self.swap_for_local_improvements(
                        *partition,
                        assignment,
                        cardinalities,
                        &change,
                        running,
                        progress,
                    );
                });
            });
            progress.end_task("swap for local improvements");
        }

        cost.store(0.0);
        progress.begin_task("compute cut cost");
        self.pool.install(|| {
            self.partitions.par_iter().for_each(|partition| {
                self.compute_cost(*partition, assignment, cost, running, progress);
            });
        });
        progress.end_task("compute cut cost");
        progress.end_task("local search");
    }

    fn edge_weight(&self, weight: f64) -> f64 {
        if self.use_edge_weights {
            weight
        } else {
            1.0
        }
    }

    fn reset_weights(&self) {
        self.pool.install(|| {
            self.node_to_community_weights
                .par_iter()
                .for_each(|weight| weight.store(0.0));
        });
    }

    /// Phase A: rebuild the node-to-community weight table.
    ///
    /// Each edge contributes to both endpoints' tables even though it is
    /// traversed in one direction only, because its weight affects both
    /// endpoints' swap decisions. A node's own outgoing contributions are
    /// gathered in a private k-sized buffer and flushed once, keeping the
    /// common case off the contended atomic adds; the contribution to the
    /// other endpoint goes straight to the shared table.
    fn compute_node_to_community_weights<R: Fn() -> bool + Sync>(
        &self,
        partition: Partition,
        assignment: &[AtomicU8],
        running: &R,
        progress: &dyn Progress,
    ) {
        if !running() {
            return;
        }
        let cursor = self.graph.cursor();
        let mut outgoing = vec![0.0f64; self.k];

        for node in partition.nodes() {
            outgoing.fill(0.0);
            let node_community = assignment[node].load(Ordering::Relaxed) as usize;
            debug_assert!(node_community < self.k, "community id out of range");

            cursor.for_each_edge(node, |target, weight| {
                // Loops don't affect the cut cost.
                if target == node {
                    return true;
                }
                let weight = self.edge_weight(weight);
                outgoing[assignment[target].load(Ordering::Relaxed) as usize] += weight;
                // The same edge as seen from the target's side.
                self.node_to_community_weights[target * self.k + node_community].fetch_add(weight);
                true
            });

            for community in 0..self.k {
                self.node_to_community_weights[node * self.k + community]
                    .fetch_add(outgoing[community]);
            }
        }
        progress.log_progress(partition.node_count);
    }

    /// Phase B: attempt to move each node of the partition to its preferred
    /// community.
    fn swap_for_local_improvements<R: Fn() -> bool + Sync>(
        &self,
        partition: Partition,
        assignment: &[AtomicU8],
        cardinalities: &[AtomicUsize],
        change: &AtomicBool,
        running: &R,
        progress: &dyn Progress,
    ) {
        if !running() {
            return;
        }
        let cursor = self.graph.cursor();
        let mut local_change = false;

        for node in partition.nodes() {
            let curr_community = assignment[node].load(Ordering::Relaxed) as usize;
            let best_community = self.best_community(node, curr_community);
            if best_community == curr_community {
                continue;
            }

            // Leave the current community only if that keeps it at or above
            // its minimum size.
            let floor = self.min_community_sizes[curr_community];
            if cardinalities[curr_community]
                .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |count| {
                    (count > floor).then(|| count - 1)
                })
                .is_err()
            {
                continue;
            }

            local_change = true;

            // Claim the node, unless an incoming neighbor already marked it.
            if self.swap_status[node]
                .compare_exchange(UNTOUCHED, SWAPPING, Ordering::AcqRel, Ordering::Acquire)
                .is_err()
            {
                cardinalities[curr_community].fetch_add(1, Ordering::Relaxed);
                continue;
            }

            // Mark every outgoing neighbor so it won't swap on weights our
            // own move would invalidate. A neighbor that is itself SWAPPING
            // invalidates *our* weights instead, so the move is abandoned.
            let mut conflicting_neighbor = false;
            cursor.for_each_edge(node, |target, _| {
                if target == node {
                    return true;
                }
                if let Err(actual) = self.swap_status[target].compare_exchange(
                    UNTOUCHED,
                    NEIGHBOR,
                    Ordering::AcqRel,
                    Ordering::Acquire,
                ) {
                    if actual == SWAPPING {
                        conflicting_neighbor = true;
                        return false;
                    }
                }
                true
            });

            if conflicting_neighbor {
                // Downgrade to NEIGHBOR (not UNTOUCHED) so the node stays
                // blocked for the rest of the round, and undo the decrement.
                self.swap_status[node].store(NEIGHBOR, Ordering::Release);
                cardinalities[curr_community].fetch_add(1, Ordering::Relaxed);
                continue;
            }

            assignment[node].store(best_community as u8, Ordering::Relaxed);
            cardinalities[best_community].fetch_add(1, Ordering::Relaxed);
        }

        if local_change {
            change.store(true, Ordering::Relaxed);
        }
        progress.log_progress(partition.node_count);
    }

    /// The community this node prefers under the current weight table.
    ///
    /// The scan starts from community 0 with the node's current community as
    /// the initial incumbent, and only a strict improvement replaces the
    /// incumbent, so the first best-or-tied community (lowest id) wins.
    fn best_community(&self, node: usize, curr_community: usize) -> usize {
        let offset = node * self.k;
        let mut best = curr_community;
        let mut best_weight = self.node_to_community_weights[offset + curr_community].load();

        for community in 0..self.k {
            let weight = self.node_to_community_weights[offset + community].load();
            if self.placement_direction.improves(best_weight, weight) {
                best = community;
                best_weight = weight;
            }
        }
        best
    }

    /// Phase C: sum the weights of edges whose endpoints ended up in
    /// different communities. Per-partition subtotals are combined with one
    /// atomic add each.
    fn compute_cost<R: Fn() -> bool + Sync>(
        &self,
        partition: Partition,
        assignment: &[AtomicU8],
        cost: &AtomicF64,
        running: &R,
        progress: &dyn Progress,
    ) {
        if !running() {
            return;
        }
        let cursor = self.graph.cursor();
        let mut subtotal = 0.0;

        for node in partition.nodes() {
            let node_community = assignment[node].load(Ordering::Relaxed);
            cursor.for_each_edge(node, |target, weight| {
                if assignment[target].load(Ordering::Relaxed) != node_community {
                    subtotal += self.edge_weight(weight);
                }
                true
            });
        }
        cost.fetch_add(subtotal);
        progress.log_progress(partition.node_count);
    }
}
