//! RAII timing for build phases.
//!
//! ```rust,ignore
//! use srcbundle_util::timing::TimingGuard;
//!
//! let _timing = TimingGuard::phase("read");
//! // ... read files ...
//! // duration is logged when `_timing` is dropped
//! ```

use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Measures an operation and logs its duration on drop.
pub struct TimingGuard {
    /// Kind of operation (e.g. "phase", "command").
    operation_type: &'static str,
    /// Name of the operation (e.g. "enumerate", "diff").
    operation_name: String,
    start: Instant,
    /// At or above this many milliseconds the duration is logged at info.
    info_threshold_ms: u64,
    /// At or above this many milliseconds the duration is logged at warn.
    warn_threshold_ms: u64,
}

impl TimingGuard {
    pub fn new(operation_type: &'static str, operation_name: impl Into<String>) -> Self {
        let operation_name = operation_name.into();
        debug!(
            operation_type = operation_type,
            operation_name = %operation_name,
            "Starting operation"
        );
        Self {
            operation_type,
            operation_name,
            start: Instant::now(),
            info_threshold_ms: 250,
            warn_threshold_ms: 10_000,
        }
    }

    /// Timing guard for one phase of a bundle build.
    pub fn phase(name: impl Into<String>) -> Self {
        Self::new("phase", name)
    }

    /// Timing guard for a whole CLI command.
    pub fn command(name: impl Into<String>) -> Self {
        Self::new("command", name)
    }
}

/// Render a duration as `850ms`, `1.25s` or `2m 3.0s`.
pub fn format_duration(duration: Duration) -> String {
    let ms = duration.as_millis();
    if ms < 1000 {
        format!("{ms}ms")
    } else if ms < 60_000 {
        format!("{:.2}s", ms as f64 / 1000.0)
    } else {
        let mins = ms / 60_000;
        let secs = (ms % 60_000) as f64 / 1000.0;
        format!("{mins}m {secs:.1}s")
    }
}

impl Drop for TimingGuard {
    fn drop(&mut self) {
        let duration = self.start.elapsed();
        let duration_ms = duration.as_millis() as u64;
        let duration_str = format_duration(duration);

        if duration_ms >= self.warn_threshold_ms {
            warn!(
                operation_type = self.operation_type,
                operation_name = %self.operation_name,
                duration_ms,
                duration = %duration_str,
                "Slow operation completed"
            );
        } else if duration_ms >= self.info_threshold_ms {
            info!(
                operation_type = self.operation_type,
                operation_name = %self.operation_name,
                duration_ms,
                duration = %duration_str,
                "Operation completed"
            );
        } else {
            debug!(
                operation_type = self.operation_type,
                operation_name = %self.operation_name,
                duration_ms,
                duration = %duration_str,
                "Operation completed"
            );
        }
    }
}
