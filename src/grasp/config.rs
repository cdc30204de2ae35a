//! k-cut configuration.
//!
//! [`KCutConfig`] holds every recognized option of the GRASP k-cut
//! computation.

use super::types::Direction;

/// Configuration for the approximate k-cut computation.
///
/// # Defaults
///
/// ```
/// use approx_kcut::grasp::KCutConfig;
///
/// let config = KCutConfig::default();
/// assert_eq!(config.k, 2);
/// assert_eq!(config.iterations, 8);
/// assert!(!config.minimize);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use approx_kcut::grasp::KCutConfig;
///
/// let config = KCutConfig::default()
///     .with_k(3)
///     .with_iterations(20)
///     .with_minimize(true)
///     .with_seed(42);
/// assert_eq!(config.k, 3);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KCutConfig {
    /// Number of communities to cut the graph into.
    pub k: u8,

    /// Number of GRASP iterations (construction + refinement cycles).
    pub iterations: usize,

    /// Whether a smaller total cut weight is better. Defaults to `false`,
    /// i.e. maximize the cut.
    pub minimize: bool,

    /// Minimum number of nodes each community must keep.
    ///
    /// Either empty (no minimums) or exactly `k` entries. Their sum must not
    /// exceed the node count of the graph the computation runs on.
    pub min_community_sizes: Vec<usize>,

    /// Maximum VNS neighborhood order; `0` disables VNS and refines with
    /// plain local search.
    pub vns_max_neighborhood_order: usize,

    /// Random seed. `None` draws one from system entropy.
    pub seed: Option<u64>,

    /// Number of worker threads.
    pub concurrency: usize,

    /// Minimum amount of work (nodes plus out-degrees) per partition task.
    pub min_batch_size: usize,

    /// Whether edge weights participate in the cut cost. When `false`, or
    /// when the graph was built without explicit weights, every edge is
    /// treated as weight 1.0.
    pub use_edge_weights: bool,
}

impl Default for KCutConfig {
    fn default() -> Self {
        Self {
            k: 2,
            iterations: 8,
            minimize: false,
            min_community_sizes: Vec::new(),
            vns_max_neighborhood_order: 0,
            seed: None,
            concurrency: 4,
            min_batch_size: 10_000,
            use_edge_weights: false,
        }
    }
}

impl KCutConfig {
    /// Sets the number of communities.
    pub fn with_k(mut self, k: u8) -> Self {
        self.k = k;
        self
    }

    /// Sets the number of GRASP iterations.
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Chooses between minimizing and maximizing the cut.
    pub fn with_minimize(mut self, minimize: bool) -> Self {
        self.minimize = minimize;
        self
    }

    /// Sets per-community minimum sizes (one entry per community).
    pub fn with_min_community_sizes(mut self, sizes: Vec<usize>) -> Self {
        self.min_community_sizes = sizes;
        self
    }

    /// Sets the maximum VNS neighborhood order (`0` disables VNS).
    pub fn with_vns_max_neighborhood_order(mut self, order: usize) -> Self {
        self.vns_max_neighborhood_order = order;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the number of worker threads.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Sets the minimum work per partition task.
    pub fn with_min_batch_size(mut self, min_batch_size: usize) -> Self {
        self.min_batch_size = min_batch_size;
        self
    }

    /// Enables or disables the use of edge weights.
    pub fn with_use_edge_weights(mut self, use_edge_weights: bool) -> Self {
        self.use_edge_weights = use_edge_weights;
        self
    }

    /// The comparison direction implied by [`minimize`](Self::minimize).
    pub fn direction(&self) -> Direction {
        Direction::from_minimize(self.minimize)
    }

    /// Minimum sizes with the "no minimums" shorthand expanded to zeros.
    pub(crate) fn resolved_min_community_sizes(&self) -> Vec<usize> {
        if self.min_community_sizes.is_empty() {
            vec![0; self.k as usize]
        } else {
            self.min_community_sizes.clone()
        }
    }

    /// Validates the configuration.
    ///
    /// Returns `Err` with a description if any parameter is invalid.
    /// Graph-dependent constraints (minimum sizes versus node count) are
    /// checked when a run starts.
    pub fn validate(&self) -> Result<(), String> {
        if self.k < 2 {
            return Err("k must be at least 2".into());
        }
        if self.iterations == 0 {
            return Err("iterations must be at least 1".into());
        }
        if self.concurrency == 0 {
            return Err("concurrency must be at least 1".into());
        }
        if self.min_batch_size == 0 {
            return Err("min_batch_size must be at least 1".into());
        }
        if !self.min_community_sizes.is_empty()
            && self.min_community_sizes.len() != self.k as usize
        {
            return Err(format!(
                "min_community_sizes must have exactly k = {} entries, got {}",
                self.k,
                self.min_community_sizes.len()
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = KCutConfig::default();
        assert_eq!(config.k, 2);
        assert_eq!(config.iterations, 8);
        assert!(!config.minimize);
        assert!(config.min_community_sizes.is_empty());
        assert_eq!(config.vns_max_neighborhood_order, 0);
        assert!(config.seed.is_none());
        assert_eq!(config.concurrency, 4);
        assert_eq!(config.min_batch_size, 10_000);
        assert!(!config.use_edge_weights);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = KCutConfig::default()
            .with_k(4)
            .with_iterations(50)
            .with_minimize(true)
            .with_min_community_sizes(vec![1, 1, 1, 1])
            .with_vns_max_neighborhood_order(3)
            .with_seed(7)
            .with_concurrency(8)
            .with_min_batch_size(100)
            .with_use_edge_weights(true);

        assert_eq!(config.k, 4);
        assert_eq!(config.iterations, 50);
        assert!(config.minimize);
        assert_eq!(config.min_community_sizes, vec![1, 1, 1, 1]);
        assert_eq!(config.vns_max_neighborhood_order, 3);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.concurrency, 8);
        assert_eq!(config.min_batch_size, 100);
        assert!(config.use_edge_weights);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_k_too_small() {
        assert!(KCutConfig::default().with_k(1).validate().is_err());
        assert!(KCutConfig::default().with_k(0).validate().is_err());
    }

    #[test]
    fn test_validate_zero_iterations() {
        assert!(KCutConfig::default().with_iterations(0).validate().is_err());
    }

    #[test]
    fn test_validate_zero_concurrency() {
        assert!(KCutConfig::default().with_concurrency(0).validate().is_err());
    }

    #[test]
    fn test_validate_min_sizes_length_mismatch() {
        let config = KCutConfig::default()
            .with_k(3)
            .with_min_community_sizes(vec![1, 1]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_resolved_min_sizes_defaults_to_zeros() {
        let config = KCutConfig::default().with_k(3);
        assert_eq!(config.resolved_min_community_sizes(), vec![0, 0, 0]);

        let config = config.with_min_community_sizes(vec![2, 0, 1]);
        assert_eq!(config.resolved_min_community_sizes(), vec![2, 0, 1]);
    }

    #[test]
    fn test_direction_follows_minimize_flag() {
        assert_eq!(
            KCutConfig::default().direction(),
            Direction::Maximize
        );
        assert_eq!(
            KCutConfig::default().with_minimize(true).direction(),
            Direction::Minimize
        );
    }
}
