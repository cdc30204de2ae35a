//! Construction step: random initial community assignment.
//!
//! Each GRASP iteration overwrites the current candidate buffer with a fresh
//! uniformly random assignment and recounts the community cardinalities,
//! then repairs any community left below its configured minimum size by
//! reassigning nodes from communities with surplus.

use crate::partition::Partition;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use rayon::ThreadPool;
use std::sync::atomic::{AtomicU8, AtomicUsize, Ordering};

/// Fills `assignment` with random communities and `cardinalities` with the
/// resulting counts, honoring `min_community_sizes`.
///
/// Each partition task gets its own sub-generator seeded from the master RNG,
/// so for a fixed seed and partitioning the constructed assignment does not
/// depend on thread scheduling.
///
/// The caller must guarantee `sum(min_community_sizes) <= node_count`.
pub(crate) fn place_nodes_randomly(
    k: usize,
    min_community_sizes: &[usize],
    assignment: &[AtomicU8],
    cardinalities: &[AtomicUsize],
    partitions: &[Partition],
    pool: &ThreadPool,
    rng: &mut StdRng,
) {
    let node_count = assignment.len();
    debug_assert_eq!(cardinalities.len(), k);
    debug_assert_eq!(min_community_sizes.len(), k);

    for count in cardinalities {
        count.store(0, Ordering::Relaxed);
    }

    let sub_seeds: Vec<u64> = partitions.iter().map(|_| rng.random()).collect();
    pool.install(|| {
        partitions
            .par_iter()
            .zip(sub_seeds)
            .for_each(|(partition, sub_seed)| {
                let mut rng = StdRng::seed_from_u64(sub_seed);
                for node in partition.nodes() {
                    let community = rng.random_range(0..k);
                    assignment[node].store(community as u8, Ordering::Relaxed);
                    cardinalities[community].fetch_add(1, Ordering::Relaxed);
                }
            });
    });

    // Repair pass: top up communities below their minimum from communities
    // holding surplus. A feasible repair always exists when the minimums sum
    // to at most the node count.
    for community in 0..k {
        let mut deficit =
            min_community_sizes[community].saturating_sub(cardinalities[community].load(Ordering::Relaxed));
        if deficit == 0 {
            continue;
        }
        for node in 0..node_count {
            if deficit == 0 {
                break;
            }
            let current = assignment[node].load(Ordering::Relaxed) as usize;
            if current == community
                || cardinalities[current].load(Ordering::Relaxed) <= min_community_sizes[current]
            {
                continue;
            }
            assignment[node].store(community as u8, Ordering::Relaxed);
            cardinalities[current].fetch_sub(1, Ordering::Relaxed);
            cardinalities[community].fetch_add(1, Ordering::Relaxed);
            deficit -= 1;
        }
        assert_eq!(
            deficit, 0,
            "minimum community sizes are infeasible for this node count"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::partition::range_partition;
    use rand::SeedableRng;

    fn fixture(node_count: usize) -> (Vec<AtomicU8>, ThreadPool) {
        let assignment = (0..node_count).map(|_| AtomicU8::new(0)).collect();
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(2)
            .build()
            .unwrap();
        (assignment, pool)
    }

    fn counts(assignment: &[AtomicU8], k: usize) -> Vec<usize> {
        let mut counts = vec![0usize; k];
        for slot in assignment {
            counts[slot.load(Ordering::Relaxed) as usize] += 1;
        }
        counts
    }

    #[test]
    fn test_cardinalities_match_assignment() {
        let (assignment, pool) = fixture(100);
        let cardinalities: Vec<AtomicUsize> = (0..3).map(|_| AtomicUsize::new(0)).collect();
        let partitions = range_partition(100, 2, 1);
        let mut rng = StdRng::seed_from_u64(42);

        place_nodes_randomly(
            3,
            &[0, 0, 0],
            &assignment,
            &cardinalities,
            &partitions,
            &pool,
            &mut rng,
        );

        let counts = counts(&assignment, 3);
        for (community, &count) in counts.iter().enumerate() {
            assert_eq!(cardinalities[community].load(Ordering::Relaxed), count);
        }
        assert_eq!(counts.iter().sum::<usize>(), 100);
    }

    #[test]
    fn test_minimum_sizes_are_met() {
        let (assignment, pool) = fixture(10);
        let cardinalities: Vec<AtomicUsize> = (0..2).map(|_| AtomicUsize::new(0)).collect();
        let partitions = range_partition(10, 1, 1);

        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            place_nodes_randomly(
                2,
                &[4, 4],
                &assignment,
                &cardinalities,
                &partitions,
                &pool,
                &mut rng,
            );
            let counts = counts(&assignment, 2);
            assert!(counts[0] >= 4 && counts[1] >= 4, "seed {seed}: {counts:?}");
        }
    }

    #[test]
    fn test_exact_split_when_minimums_cover_all_nodes() {
        let (assignment, pool) = fixture(6);
        let cardinalities: Vec<AtomicUsize> = (0..2).map(|_| AtomicUsize::new(0)).collect();
        let partitions = range_partition(6, 1, 1);
        let mut rng = StdRng::seed_from_u64(1);

        place_nodes_randomly(
            2,
            &[3, 3],
            &assignment,
            &cardinalities,
            &partitions,
            &pool,
            &mut rng,
        );
        assert_eq!(counts(&assignment, 2), vec![3, 3]);
    }

    #[test]
    fn test_deterministic_under_fixed_seed_and_partitioning() {
        let (assignment_a, pool) = fixture(50);
        let (assignment_b, _) = fixture(50);
        let cardinalities: Vec<AtomicUsize> = (0..2).map(|_| AtomicUsize::new(0)).collect();
        // Several partitions dispatched in parallel; per-partition
        // sub-generators keep the outcome independent of scheduling.
        let partitions = range_partition(50, 4, 1);

        let mut rng = StdRng::seed_from_u64(99);
        place_nodes_randomly(
            2,
            &[0, 0],
            &assignment_a,
            &cardinalities,
            &partitions,
            &pool,
            &mut rng,
        );
        let mut rng = StdRng::seed_from_u64(99);
        place_nodes_randomly(
            2,
            &[0, 0],
            &assignment_b,
            &cardinalities,
            &partitions,
            &pool,
            &mut rng,
        );

        let a: Vec<u8> = assignment_a.iter().map(|s| s.load(Ordering::Relaxed)).collect();
        let b: Vec<u8> = assignment_b.iter().map(|s| s.load(Ordering::Relaxed)).collect();
        assert_eq!(a, b);
    }
}
