// Engine metrics
//
// Lock-free counters shared between the tab controller and the thumbnail
// workers, logged on shutdown or on demand.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

/// Counters for scans, thumbnails, and selection traffic.
///
/// Uses atomic operations so decode threads can record results without
/// taking a lock. Shared as `Arc<Metrics>`.
#[derive(Debug)]
pub struct Metrics {
    /// Scans launched (including ones later superseded)
    pub scans_started: AtomicUsize,

    /// Scans that ended in a surfaced `ScanError`
    pub scans_failed: AtomicUsize,

    /// Thumbnails decoded successfully
    pub thumbnails_loaded: AtomicUsize,

    /// Thumbnails that failed to decode
    pub thumbnails_failed: AtomicUsize,

    /// Total decode + resize time in milliseconds
    pub total_decode_time_ms: AtomicU64,

    /// Worker results dropped because their generation was superseded
    pub stale_results_discarded: AtomicU64,

    /// Selection-changed notifications applied to a gallery
    pub selection_events: AtomicU64,

    start_time: Instant,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            scans_started: AtomicUsize::new(0),
            scans_failed: AtomicUsize::new(0),
            thumbnails_loaded: AtomicUsize::new(0),
            thumbnails_failed: AtomicUsize::new(0),
            total_decode_time_ms: AtomicU64::new(0),
            stale_results_discarded: AtomicU64::new(0),
            selection_events: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn record_scan_started(&self) {
        self.scans_started.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_scan_failed(&self) {
        self.scans_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_thumbnail_loaded(&self) {
        self.thumbnails_loaded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_thumbnail_failed(&self) {
        self.thumbnails_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_decode_time(&self, duration: Duration) {
        self.total_decode_time_ms
            .fetch_add(duration.as_millis() as u64, Ordering::Relaxed);
    }

    pub fn record_stale_result(&self) {
        self.stale_results_discarded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_selection_event(&self) {
        self.selection_events.fetch_add(1, Ordering::Relaxed);
    }

    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Average decode time per processed thumbnail in milliseconds
    pub fn avg_decode_time_ms(&self) -> f64 {
        let total = self.total_decode_time_ms.load(Ordering::Relaxed);
        let count = self.thumbnails_loaded.load(Ordering::Relaxed)
            + self.thumbnails_failed.load(Ordering::Relaxed);
        if count > 0 {
            total as f64 / count as f64
        } else {
            0.0
        }
    }

    pub fn log_summary(&self) {
        tracing::info!("=== Gallery Metrics Summary ===");
        tracing::info!("Uptime: {:.2}s", self.uptime().as_secs_f64());
        tracing::info!(
            "Scans: {} started, {} failed",
            self.scans_started.load(Ordering::Relaxed),
            self.scans_failed.load(Ordering::Relaxed)
        );
        tracing::info!(
            "Thumbnails: {} loaded, {} failed (avg: {:.2}ms)",
            self.thumbnails_loaded.load(Ordering::Relaxed),
            self.thumbnails_failed.load(Ordering::Relaxed),
            self.avg_decode_time_ms()
        );
        tracing::info!(
            "Stale results discarded: {}, selection events: {}",
            self.stale_results_discarded.load(Ordering::Relaxed),
            self.selection_events.load(Ordering::Relaxed)
        );
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
