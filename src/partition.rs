//! Static partitioning of the node id space across worker tasks.
//!
//! Partitions are computed once per run and assigned one-to-one to
//! data-parallel tasks. [`range_partition`] balances node counts;
//! [`degree_partition`] balances edge-traversal work by splitting on
//! cumulative out-degree, so that partitions of a skewed graph cost roughly
//! the same to process.

use crate::graph::CsrGraph;
use std::ops::Range;

/// A contiguous range of node ids processed by one worker task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Partition {
    /// First node id in the partition.
    pub start: usize,
    /// Number of nodes in the partition.
    pub node_count: usize,
}

impl Partition {
    /// The node ids covered by this partition.
    pub fn nodes(&self) -> Range<usize> {
        self.start..self.start + self.node_count
    }
}

/// Splits `0..node_count` into at most `concurrency` equally sized ranges,
/// each holding at least `min_batch_size` nodes (except possibly the last).
pub fn range_partition(
    node_count: usize,
    concurrency: usize,
    min_batch_size: usize,
) -> Vec<Partition> {
    assert!(concurrency > 0, "concurrency must be positive");
    let batch = node_count.div_ceil(concurrency).max(min_batch_size).max(1);

    let mut partitions = Vec::new();
    let mut start = 0;
    while start < node_count {
        let len = batch.min(node_count - start);
        partitions.push(Partition {
            start,
            node_count: len,
        });
        start += len;
    }
    partitions
}

/// Splits the node id space into contiguous ranges of roughly equal
/// cumulative degree.
///
/// Each node contributes `degree + 1` so that long runs of isolated nodes
/// still advance a partition. `min_batch_size` is a floor on that cumulative
/// amount per partition, keeping per-task overhead bounded on small graphs.
pub fn degree_partition(
    graph: &CsrGraph,
    concurrency: usize,
    min_batch_size: usize,
) -> Vec<Partition> {
    assert!(concurrency > 0, "concurrency must be positive");
    let node_count = graph.node_count();
    let total = graph.edge_count() + node_count;
    let batch = total.div_ceil(concurrency).max(min_batch_size).max(1);

    let mut partitions = Vec::new();
    let mut start = 0;
    let mut acc = 0usize;
    for node in 0..node_count {
        acc += graph.degree(node) + 1;
        if acc >= batch {
            partitions.push(Partition {
                start,
                node_count: node + 1 - start,
            });
            start = node + 1;
            acc = 0;
        }
    }
    if start < node_count {
        partitions.push(Partition {
            start,
            node_count: node_count - start,
        });
    }
    partitions
}
