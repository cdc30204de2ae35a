//! Immutable CSR graph storage.
//!
//! The k-cut algorithms only need read access: node count, per-node
//! out-degree, and weighted out-neighbor iteration. The graph is stored in
//! compressed sparse row form and shared by reference between worker
//! threads; each task obtains its own lightweight [`GraphCursor`] for
//! traversal.
//!
//! Edges are directed. An undirected input graph is expressed by storing one
//! orientation per edge; the cut cost then counts each undirected edge once,
//! and the symmetric weight updates in the local-search engine account for
//! both endpoints. Self-loops and parallel edges are allowed.

/// A weighted directed multigraph in compressed sparse row form.
#[derive(Debug, Clone)]
pub struct CsrGraph {
    offsets: Vec<usize>,
    targets: Vec<usize>,
    weights: Vec<f64>,
    has_edge_weights: bool,
}

impl CsrGraph {
    /// Builds a graph from a directed, weighted edge list.
    ///
    /// # Panics
    /// Panics if any endpoint is `>= node_count`.
    pub fn from_edges(node_count: usize, edges: &[(usize, usize, f64)]) -> Self {
        Self::build(node_count, edges, true)
    }

    /// Builds a graph from a directed edge list, giving every edge weight 1.0.
    pub fn from_unweighted_edges(node_count: usize, edges: &[(usize, usize)]) -> Self {
        let weighted: Vec<(usize, usize, f64)> =
            edges.iter().map(|&(s, t)| (s, t, 1.0)).collect();
        Self::build(node_count, &weighted, false)
    }

    fn build(node_count: usize, edges: &[(usize, usize, f64)], has_edge_weights: bool) -> Self {
        let mut degrees = vec![0usize; node_count];
        for &(source, target, _) in edges {
            assert!(
                source < node_count && target < node_count,
                "edge ({source}, {target}) out of range for {node_count} nodes"
            );
            degrees[source] += 1;
        }

        let mut offsets = Vec::with_capacity(node_count + 1);
        let mut acc = 0usize;
        offsets.push(0);
        for &d in &degrees {
            acc += d;
            offsets.push(acc);
        }

        // Counting sort into CSR slots.
        let mut cursor = offsets[..node_count].to_vec();
        let mut targets = vec![0usize; edges.len()];
        let mut weights = vec![0.0f64; edges.len()];
        for &(source, target, weight) in edges {
            let slot = cursor[source];
            targets[slot] = target;
            weights[slot] = weight;
            cursor[source] += 1;
        }

        Self {
            offsets,
            targets,
            weights,
            has_edge_weights,
        }
    }

    /// Number of nodes. Node ids are dense in `0..node_count()`.
    pub fn node_count(&self) -> usize {
        self.offsets.len() - 1
    }

    /// Out-degree of `node`.
    pub fn degree(&self, node: usize) -> usize {
        self.offsets[node + 1] - self.offsets[node]
    }

    /// Total number of stored (directed) edges.
    pub fn edge_count(&self) -> usize {
        self.targets.len()
    }

    /// Whether the graph was built with explicit edge weights.
    pub fn has_edge_weights(&self) -> bool {
        self.has_edge_weights
    }

    /// A cheap traversal handle for use by one worker task.
    pub fn cursor(&self) -> GraphCursor<'_> {
        GraphCursor { graph: self }
    }
}

/// Per-task traversal handle over a [`CsrGraph`].
///
/// Creating one is free; tasks should not share a cursor.
#[derive(Debug, Clone, Copy)]
pub struct GraphCursor<'a> {
    graph: &'a CsrGraph,
}

impl GraphCursor<'_> {
    /// Calls `f(target, weight)` for every outgoing edge of `node`.
    ///
    /// Iteration stops early when `f` returns `false`.
    pub fn for_each_edge(&self, node: usize, mut f: impl FnMut(usize, f64) -> bool) {
        let start = self.graph.offsets[node];
        let end = self.graph.offsets[node + 1];
        for i in start..end {
            if !f(self.graph.targets[i], self.graph.weights[i]) {
                break;
            }
        }
    }
}
