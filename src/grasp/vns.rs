//! Variable Neighborhood Search around the local-search engine.
//!
//! When simple local search stalls in a local optimum, VNS perturbs the
//! incumbent by moving `order` random nodes to random other communities
//! (shaking) and refines the perturbed copy with local search. Improvement
//! resets the order to 1; otherwise the order grows, widening the
//! neighborhood, up to the configured maximum.
//!
//! # Reference
//!
//! Mladenović, N. & Hansen, P. (1997). "Variable neighborhood search",
//! *Computers & Operations Research* 24(11), 1097-1100.

use super::types::{Candidate, Direction};
use crate::local_search::LocalSearch;
use crate::progress::Progress;
use rand::rngs::StdRng;
use rand::Rng;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Refines `curr` in place with VNS, using `scratch` buffers of the same
/// shape for the perturbed copies.
///
/// On return `curr` holds the best assignment found and `cardinalities` its
/// per-community counts. Buffers are exchanged by `mem::swap`, never by
/// copying an adopted assignment back.
#[allow(clippy::too_many_arguments)]
pub(crate) fn variable_neighborhood_search<R: Fn() -> bool + Sync>(
    engine: &LocalSearch<'_>,
    direction: Direction,
    max_neighborhood_order: usize,
    min_community_sizes: &[usize],
    curr: &mut Candidate,
    scratch: &mut Candidate,
    cardinalities: &[AtomicUsize],
    scratch_cardinalities: &[AtomicUsize],
    rng: &mut StdRng,
    running: &R,
    progress: &dyn Progress,
) {
    let k = cardinalities.len();
    let node_count = curr.assignment.len();

    // Refine the fresh candidate before shaking around it.
    engine.compute(&curr.assignment, &curr.cost, cardinalities, running, progress);
    if node_count == 0 {
        return;
    }

    let mut order = 1;
    while order <= max_neighborhood_order && running() {
        scratch.copy_assignment_from(curr);
        for community in 0..k {
            scratch_cardinalities[community].store(
                cardinalities[community].load(Ordering::Relaxed),
                Ordering::Relaxed,
            );
        }

        shake(
            order,
            min_community_sizes,
            scratch,
            scratch_cardinalities,
            rng,
        );

        engine.compute(
            &scratch.assignment,
            &scratch.cost,
            scratch_cardinalities,
            running,
            progress,
        );
        if !running() {
            // The interrupted refinement may be incomplete; never adopt it.
            break;
        }

        if direction.improves(curr.cost.load(), scratch.cost.load()) {
            std::mem::swap(&mut curr.assignment, &mut scratch.assignment);
            std::mem::swap(&mut curr.cost, &mut scratch.cost);
            for community in 0..k {
                cardinalities[community].store(
                    scratch_cardinalities[community].load(Ordering::Relaxed),
                    Ordering::Relaxed,
                );
            }
            order = 1;
        } else {
            order += 1;
        }
    }
}

/// Moves `order` random nodes to random other communities, skipping nodes
/// whose community sits at its minimum size.
fn shake(
    order: usize,
    min_community_sizes: &[usize],
    scratch: &mut Candidate,
    scratch_cardinalities: &[AtomicUsize],
    rng: &mut StdRng,
) {
    let k = scratch_cardinalities.len();
    let node_count = scratch.assignment.len();

    // Bounded attempts: with tight minimum sizes there may be fewer movable
    // nodes than the requested order.
    let mut moved = 0;
    let mut attempts = 0;
    while moved < order && attempts < node_count * 2 + order {
        attempts += 1;
        let node = rng.random_range(0..node_count);
        let from = scratch.assignment[node].load(Ordering::Relaxed) as usize;
        if scratch_cardinalities[from].load(Ordering::Relaxed) <= min_community_sizes[from] {
            continue;
        }
        let to = (from + rng.random_range(1..k)) % k;
        scratch.assignment[node].store(to as u8, Ordering::Relaxed);
        scratch_cardinalities[from].fetch_sub(1, Ordering::Relaxed);
        scratch_cardinalities[to].fetch_add(1, Ordering::Relaxed);
        moved += 1;
    }
}
