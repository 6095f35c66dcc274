//! # Synchronization Metrics
//!
//! Counters that tell targeted patches apart from full rebuilds, and
//! ordinary rebuilds apart from fallback rebuilds caused by a stale id or a
//! missing parent. A rising fallback count points at a caller that emits
//! payloads for nodes the scene never saw.
//!
//! ## Usage
//!
//! ```
//! use archgraph::performance::SyncMetrics;
//!
//! let mut metrics = SyncMetrics::default();
//! let timer = metrics.begin_rebuild();
//! // ... rebuild ...
//! metrics.end_rebuild(timer, 13, false);
//! assert_eq!(metrics.rebuilds, 1);
//! ```

use std::time::{Duration, Instant};

/// Running counters kept by the scene synchronizer
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncMetrics {
    /// Full rebuilds of any cause
    pub rebuilds: u64,
    /// Rebuilds taken because a targeted patch could not be applied
    pub fallback_rebuilds: u64,
    /// `node-updated` payloads applied in place
    pub patches: u64,
    /// Objects attached by `node-added`
    pub additions: u64,
    /// Objects detached by `node-removed`, descendants included
    pub removals: u64,
    /// Wall time of the most recent rebuild
    pub last_rebuild: Duration,
    /// Objects created by the most recent rebuild
    pub last_rebuild_objects: usize,
}

/// Start mark handed out by [`SyncMetrics::begin_rebuild`]
#[derive(Debug, Clone, Copy)]
pub struct RebuildTimer(Instant);

impl SyncMetrics {
    pub fn begin_rebuild(&self) -> RebuildTimer {
        RebuildTimer(Instant::now())
    }

    pub fn end_rebuild(&mut self, timer: RebuildTimer, objects: usize, fallback: bool) {
        self.rebuilds += 1;
        if fallback {
            self.fallback_rebuilds += 1;
        }
        self.last_rebuild = timer.0.elapsed();
        self.last_rebuild_objects = objects;
    }

    /// One-line summary for logging
    pub fn summary(&self) -> String {
        format!(
            "rebuilds={} (fallback={}) patches={} additions={} removals={} last_rebuild={:.3}ms/{} objects",
            self.rebuilds,
            self.fallback_rebuilds,
            self.patches,
            self.additions,
            self.removals,
            self.last_rebuild.as_secs_f64() * 1000.0,
            self.last_rebuild_objects,
        )
    }
}
