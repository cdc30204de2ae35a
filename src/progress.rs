//! Progress-reporting seam.
//!
//! The runners call into a [`Progress`] implementation at well-defined
//! checkpoints (start/end of construction, of each weight-computation pass,
//! each swap pass, and each cost pass, plus per-partition increments) but
//! never make decisions based on it.

/// Receives progress checkpoints from a running computation.
///
/// All methods have no-op defaults, so implementors only override what they
/// care about.
pub trait Progress: Sync {
    /// A named sub-task begins.
    fn begin_task(&self, _name: &str) {}

    /// The most recently begun sub-task with this name finishes.
    fn end_task(&self, _name: &str) {}

    /// A worker finished processing `node_count` nodes of the current task.
    fn log_progress(&self, _node_count: usize) {}
}

/// Discards all progress events.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl Progress for NoProgress {}

/// Forwards progress events to the [`log`] facade at debug/trace level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogProgress;

impl Progress for LogProgress {
    fn begin_task(&self, name: &str) {
        log::debug!("{name} :: start");
    }

    fn end_task(&self, name: &str) {
        log::debug!("{name} :: finished");
    }

    fn log_progress(&self, node_count: usize) {
        log::trace!("processed {node_count} nodes");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingProgress {
        tasks: AtomicUsize,
        nodes: AtomicUsize,
    }

    impl Progress for CountingProgress {
        fn begin_task(&self, _name: &str) {
            self.tasks.fetch_add(1, Ordering::Relaxed);
        }

        fn log_progress(&self, node_count: usize) {
            self.nodes.fetch_add(node_count, Ordering::Relaxed);
        }
    }

    #[test]
    fn test_log_progress_forwards_to_log_facade() {
        // RUST_LOG=debug makes the checkpoint messages visible.
        let _ = env_logger::builder().is_test(true).try_init();
        let p = LogProgress;
        p.begin_task("refinement");
        p.log_progress(5);
        p.end_task("refinement");
    }

    #[test]
    fn test_default_methods_are_noops() {
        let p = NoProgress;
        p.begin_task("anything");
        p.end_task("anything");
        p.log_progress(10);
    }

    #[test]
    fn test_custom_impl_receives_events() {
        let p = CountingProgress::default();
        p.begin_task("a");
        p.begin_task("b");
        p.log_progress(3);
        p.log_progress(4);
        assert_eq!(p.tasks.load(Ordering::Relaxed), 2);
        assert_eq!(p.nodes.load(Ordering::Relaxed), 7);
    }
}
