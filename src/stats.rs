//! Reconcile statistics for debugging and performance analysis.
//!
//! Enable with the `reconcile-stats` feature:
//! ```bash
//! RUST_LOG=info cargo run --example greeting --features reconcile-stats
//! ```
//!
//! Without the feature every recorder compiles to nothing and
//! [`get_stats`] returns zeros.

/// Snapshot of accumulated reconcile statistics.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct StatsSnapshot {
    /// Subtrees mounted into an empty (or cleared) container
    pub mounts: u64,
    /// Updates that cleared the container and mounted again
    pub remounts: u64,
    /// Updates applied in place
    pub patches: u64,
    /// Individual props set or removed by in-place updates
    pub props_patched: u64,
    /// Updates that emptied the container
    pub removals: u64,
    /// Updates that found nothing to do
    pub noops: u64,
}

#[cfg(feature = "reconcile-stats")]
mod inner {
    use super::StatsSnapshot;
    use std::cell::RefCell;

    thread_local! {
        static STATS: RefCell<StatsSnapshot> = RefCell::new(StatsSnapshot::default());
    }

    #[inline]
    pub fn record_mount() {
        STATS.with(|s| s.borrow_mut().mounts += 1);
    }

    #[inline]
    pub fn record_remount() {
        STATS.with(|s| s.borrow_mut().remounts += 1);
    }

    /// Record an in-place update that touched `props` props.
    #[inline]
    pub fn record_patch(props: usize) {
        STATS.with(|s| {
            let mut stats = s.borrow_mut();
            stats.patches += 1;
            stats.props_patched += props as u64;
        });
    }

    #[inline]
    pub fn record_removal() {
        STATS.with(|s| s.borrow_mut().removals += 1);
    }

    #[inline]
    pub fn record_noop() {
        STATS.with(|s| s.borrow_mut().noops += 1);
    }

    /// Return a snapshot of the current stats.
    pub fn get_stats() -> StatsSnapshot {
        STATS.with(|s| s.borrow().clone())
    }

    /// Reset all stats to zero (for test isolation).
    pub fn reset_stats() {
        STATS.with(|s| *s.borrow_mut() = StatsSnapshot::default());
    }

    /// Report the current counters through `log`.
    pub fn log_summary() {
        let stats = get_stats();
        let updates = stats.remounts + stats.patches + stats.removals + stats.noops;
        let patch_rate = if updates > 0 {
            (stats.patches as f64 / updates as f64) * 100.0
        } else {
            0.0
        };
        log::info!(
            "[Reconcile Stats] mounts={} updates={} remounts={} patches={} ({:.1}%) props={} removals={} noops={}",
            stats.mounts,
            updates,
            stats.remounts,
            stats.patches,
            patch_rate,
            stats.props_patched,
            stats.removals,
            stats.noops
        );
    }
}

#[cfg(feature = "reconcile-stats")]
pub use inner::*;

// No-op implementations when feature is disabled

#[cfg(not(feature = "reconcile-stats"))]
#[inline(always)]
pub fn get_stats() -> StatsSnapshot {
    StatsSnapshot::default()
}

#[cfg(not(feature = "reconcile-stats"))]
#[inline(always)]
pub fn reset_stats() {}

#[cfg(not(feature = "reconcile-stats"))]
#[inline(always)]
pub fn record_mount() {}

#[cfg(not(feature = "reconcile-stats"))]
#[inline(always)]
pub fn record_remount() {}

#[cfg(not(feature = "reconcile-stats"))]
#[inline(always)]
pub fn record_patch(_props: usize) {}

#[cfg(not(feature = "reconcile-stats"))]
#[inline(always)]
pub fn record_removal() {}

#[cfg(not(feature = "reconcile-stats"))]
#[inline(always)]
pub fn record_noop() {}

#[cfg(not(feature = "reconcile-stats"))]
#[inline(always)]
pub fn log_summary() {}
