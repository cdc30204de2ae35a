//! Shared types for the GRASP orchestrator and the local-search engine.

use crate::sync::AtomicF64;
use std::sync::atomic::{AtomicU8, Ordering};

/// Whether "better" means a larger or a smaller total cut weight.
///
/// Used everywhere two costs are compared. Note that the *placement*
/// preference of a single node is the cut direction flipped: when maximizing
/// the cut, a node belongs in the community where its connection weight is
/// smallest, so that as much edge weight as possible crosses the cut.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Smaller cut cost is better.
    Minimize,
    /// Larger cut cost is better.
    Maximize,
}

impl Direction {
    /// Maps the `minimize` configuration flag to a direction.
    pub fn from_minimize(minimize: bool) -> Self {
        if minimize {
            Self::Minimize
        } else {
            Self::Maximize
        }
    }

    /// Whether `candidate` is strictly better than `incumbent`.
    pub fn improves(&self, incumbent: f64, candidate: f64) -> bool {
        match self {
            Self::Minimize => candidate < incumbent,
            Self::Maximize => candidate > incumbent,
        }
    }

    /// The opposite direction.
    pub fn flip(&self) -> Self {
        match self {
            Self::Minimize => Self::Maximize,
            Self::Maximize => Self::Minimize,
        }
    }

    /// The worst possible cost, used as the incumbent before any iteration
    /// completes so that the first completed candidate always wins.
    pub fn worst(&self) -> f64 {
        match self {
            Self::Minimize => f64::INFINITY,
            Self::Maximize => f64::NEG_INFINITY,
        }
    }
}

/// One of the orchestrator's pre-allocated solution buffers: a community
/// assignment plus its cut cost.
///
/// All fields are interior-mutable so worker threads can share a candidate
/// during refinement; the orchestrator swaps buffer *roles* by index, never
/// by copying assignment contents.
pub(crate) struct Candidate {
    pub(crate) assignment: Vec<AtomicU8>,
    pub(crate) cost: AtomicF64,
}

impl Candidate {
    pub(crate) fn new(node_count: usize, initial_cost: f64) -> Self {
        Self {
            assignment: (0..node_count).map(|_| AtomicU8::new(0)).collect(),
            cost: AtomicF64::new(initial_cost),
        }
    }

    /// Copies the other candidate's assignment values into this buffer.
    pub(crate) fn copy_assignment_from(&self, other: &Candidate) {
        debug_assert_eq!(self.assignment.len(), other.assignment.len());
        for (dst, src) in self.assignment.iter().zip(&other.assignment) {
            dst.store(src.load(Ordering::Relaxed), Ordering::Relaxed);
        }
    }

    /// Materializes the assignment as a plain vector.
    pub(crate) fn snapshot_assignment(&self) -> Vec<u8> {
        self.assignment
            .iter()
            .map(|community| community.load(Ordering::Relaxed))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_improves() {
        assert!(Direction::Minimize.improves(5.0, 4.0));
        assert!(!Direction::Minimize.improves(5.0, 5.0));
        assert!(!Direction::Minimize.improves(5.0, 6.0));

        assert!(Direction::Maximize.improves(5.0, 6.0));
        assert!(!Direction::Maximize.improves(5.0, 5.0));
        assert!(!Direction::Maximize.improves(5.0, 4.0));
    }

    #[test]
    fn test_direction_worst_always_loses() {
        for direction in [Direction::Minimize, Direction::Maximize] {
            assert!(direction.improves(direction.worst(), 0.0));
            assert!(!direction.improves(0.0, direction.worst()));
        }
    }

    #[test]
    fn test_direction_flip() {
        assert_eq!(Direction::Minimize.flip(), Direction::Maximize);
        assert_eq!(Direction::Maximize.flip(), Direction::Minimize);
    }

    #[test]
    fn test_candidate_copy_and_snapshot() {
        let a = Candidate::new(3, 0.0);
        let b = Candidate::new(3, 0.0);
        for (i, slot) in a.assignment.iter().enumerate() {
            slot.store(i as u8, Ordering::Relaxed);
        }
        b.copy_assignment_from(&a);
        assert_eq!(b.snapshot_assignment(), vec![0, 1, 2]);
    }
}
