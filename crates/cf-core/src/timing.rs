//! Lightweight per-stage timing for the time-marching pipeline.
//!
//! Disabled by default. Enable with the `CF_TIMING` environment variable or
//! [`enable_timing`]; when disabled, timers skip recording.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Instant;

static ENABLED: AtomicBool = AtomicBool::new(false);

/// Enable performance timing globally.
pub fn enable_timing() {
    ENABLED.store(true, Ordering::Relaxed);
}

/// Check if timing is enabled.
pub fn is_enabled() -> bool {
    ENABLED.load(Ordering::Relaxed) || std::env::var("CF_TIMING").is_ok()
}

/// A simple timer that measures elapsed time.
pub struct Timer {
    label: &'static str,
    start: Instant,
    enabled: bool,
}

impl Timer {
    /// Create and start a new timer with the given label.
    pub fn start(label: &'static str) -> Self {
        Self {
            label,
            start: Instant::now(),
            enabled: is_enabled(),
        }
    }

    /// Stop the timer and return elapsed time in seconds.
    /// If timing is disabled, returns None.
    pub fn stop(self) -> Option<f64> {
        if self.enabled {
            Some(self.start.elapsed().as_secs_f64())
        } else {
            None
        }
    }

    /// Stop the timer and add the elapsed time to `acc`.
    pub fn stop_into(self, acc: &AccumulatingTimer) {
        let label = self.label;
        if let Some(elapsed) = self.stop() {
            tracing::trace!(stage = label, elapsed_s = elapsed, "stage timed");
            acc.record(elapsed);
        }
    }
}

/// Accumulating timer for tracking total time across multiple calls.
pub struct AccumulatingTimer {
    total_ns: AtomicU64,
    count: AtomicU64,
}

impl Default for AccumulatingTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl AccumulatingTimer {
    /// Create a new accumulating timer.
    pub const fn new() -> Self {
        Self {
            total_ns: AtomicU64::new(0),
            count: AtomicU64::new(0),
        }
    }

    /// Record a timing measurement.
    pub fn record(&self, duration_s: f64) {
        let nanos = (duration_s * 1e9) as u64;
        self.total_ns.fetch_add(nanos, Ordering::Relaxed);
        self.count.fetch_add(1, Ordering::Relaxed);
    }

    /// Get total time spent (in seconds).
    pub fn total_seconds(&self) -> f64 {
        self.total_ns.load(Ordering::Relaxed) as f64 / 1e9
    }

    /// Get number of calls.
    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    /// Get average time per call (in seconds).
    pub fn average_seconds(&self) -> f64 {
        let count = self.count();
        if count > 0 {
            self.total_seconds() / count as f64
        } else {
            0.0
        }
    }

    /// Reset the timer.
    pub fn reset(&self) {
        self.total_ns.store(0, Ordering::Relaxed);
        self.count.store(0, Ordering::Relaxed);
    }
}

/// Pipeline stage timers.
pub mod stage_timing {
    use super::AccumulatingTimer;

    /// Explicit advection-diffusion update
    pub static ADVECTION: AccumulatingTimer = AccumulatingTimer::new();
    /// Divergence evaluation (pre-solve and diagnostics)
    pub static DIVERGENCE: AccumulatingTimer = AccumulatingTimer::new();
    /// Poisson assembly + factorization (cache misses only)
    pub static FACTORIZATION: AccumulatingTimer = AccumulatingTimer::new();
    /// Triangular solves against the cached factorization
    pub static PRESSURE_SOLVE: AccumulatingTimer = AccumulatingTimer::new();
    /// Pressure-gradient correction
    pub static PROJECTION: AccumulatingTimer = AccumulatingTimer::new();

    fn all() -> [(&'static str, &'static AccumulatingTimer); 5] {
        [
            ("advection", &ADVECTION),
            ("divergence", &DIVERGENCE),
            ("factorization", &FACTORIZATION),
            ("pressure solve", &PRESSURE_SOLVE),
            ("projection", &PROJECTION),
        ]
    }

    /// One formatted line per stage that recorded at least one call.
    pub fn summary_lines() -> Vec<String> {
        all()
            .into_iter()
            .filter(|(_, timer)| timer.count() > 0)
            .map(|(label, timer)| {
                format!(
                    "{:<16} {} calls, {:.3}s total, {:.4}ms avg",
                    format!("{label}:"),
                    timer.count(),
                    timer.total_seconds(),
                    timer.average_seconds() * 1000.0
                )
            })
            .collect()
    }

    /// Print stage timing summary.
    pub fn print_summary() {
        if !super::is_enabled() {
            return;
        }

        println!("\n=== Stage Timing Breakdown ===");
        for line in summary_lines() {
            println!("{line}");
        }
        println!("==============================\n");
    }
}
