//! # Tick Timing
//!
//! Keeps a ring buffer of recent iteration times so the frame loop can report
//! how much of its tick budget the compute, render and readback work consumes.
//!
//! ## Usage
//!
//! ```rust
//! use hexlife::performance::PerformanceMonitor;
//! use std::time::Duration;
//!
//! let mut monitor = PerformanceMonitor::new();
//!
//! monitor.begin_frame();
//! // ... advance one generation ...
//! let elapsed = monitor.end_frame();
//! assert!(elapsed <= monitor.metrics().max_frame_time + Duration::from_millis(1));
//! ```

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Summary over the sampled window
#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceMetrics {
    pub samples: usize,
    pub average_frame_time: Duration,
    pub min_frame_time: Duration,
    pub max_frame_time: Duration,
    /// Frames that used up the whole tick budget since the monitor was created
    pub overruns: u32,
}

impl Default for PerformanceMetrics {
    fn default() -> Self {
        Self {
            samples: 0,
            average_frame_time: Duration::ZERO,
            min_frame_time: Duration::ZERO,
            max_frame_time: Duration::ZERO,
            overruns: 0,
        }
    }
}

pub struct PerformanceMonitor {
    frame_times: VecDeque<Duration>,
    max_samples: usize,
    frame_start: Option<Instant>,
    budget: Option<Duration>,
    overruns: u32,
}

impl PerformanceMonitor {
    pub fn new() -> Self {
        Self::with_config(20, None)
    }

    /// Monitor keeping `max_samples` frames, counting frames longer than `budget`
    pub fn with_config(max_samples: usize, budget: Option<Duration>) -> Self {
        Self {
            frame_times: VecDeque::with_capacity(max_samples),
            max_samples: max_samples.max(1),
            frame_start: None,
            budget,
            overruns: 0,
        }
    }

    /// Mark the beginning of a frame
    pub fn begin_frame(&mut self) {
        self.frame_start = Some(Instant::now());
    }

    /// Mark the end of a frame, returning its duration
    pub fn end_frame(&mut self) -> Duration {
        let frame_time = self
            .frame_start
            .take()
            .map(|start| start.elapsed())
            .unwrap_or_default();
        self.record(frame_time);
        frame_time
    }

    /// Add a frame time sample
    pub fn record(&mut self, frame_time: Duration) {
        if self.frame_times.len() >= self.max_samples {
            self.frame_times.pop_front();
        }
        self.frame_times.push_back(frame_time);

        if self.budget.is_some_and(|budget| frame_time >= budget) {
            self.overruns += 1;
        }
    }

    pub fn metrics(&self) -> PerformanceMetrics {
        if self.frame_times.is_empty() {
            return PerformanceMetrics {
                overruns: self.overruns,
                ..PerformanceMetrics::default()
            };
        }

        let total: Duration = self.frame_times.iter().sum();
        PerformanceMetrics {
            samples: self.frame_times.len(),
            average_frame_time: total / self.frame_times.len() as u32,
            min_frame_time: self.frame_times.iter().min().copied().unwrap_or_default(),
            max_frame_time: self.frame_times.iter().max().copied().unwrap_or_default(),
            overruns: self.overruns,
        }
    }

    /// Frame times in milliseconds, oldest first
    pub fn frame_time_history(&self) -> Vec<f32> {
        self.frame_times
            .iter()
            .map(|duration| duration.as_secs_f32() * 1000.0)
            .collect()
    }

    pub fn reset(&mut self) {
        self.frame_times.clear();
        self.frame_start = None;
        self.overruns = 0;
    }
}

impl Default for PerformanceMonitor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_over_window() {
        let mut monitor = PerformanceMonitor::with_config(3, Some(Duration::from_millis(500)));
        for ms in [100, 200, 300, 600] {
            monitor.record(Duration::from_millis(ms));
        }

        let metrics = monitor.metrics();
        // oldest sample (100ms) fell out of the window
        assert_eq!(metrics.samples, 3);
        assert_eq!(metrics.min_frame_time, Duration::from_millis(200));
        assert_eq!(metrics.max_frame_time, Duration::from_millis(600));
        assert_eq!(
            metrics.average_frame_time,
            Duration::from_millis(1100) / 3
        );
        assert_eq!(metrics.overruns, 1);
        let history = monitor.frame_time_history();
        assert_eq!(history.len(), 3);
        for (sample, expected) in history.iter().zip([200.0, 300.0, 600.0]) {
            assert!((sample - expected).abs() < 1e-3);
        }
    }

    #[test]
    fn test_empty_monitor() {
        let monitor = PerformanceMonitor::new();
        assert_eq!(monitor.metrics(), PerformanceMetrics::default());
    }

    #[test]
    fn test_end_frame_without_begin_records_zero() {
        let mut monitor = PerformanceMonitor::new();
        assert_eq!(monitor.end_frame(), Duration::ZERO);
        assert_eq!(monitor.metrics().samples, 1);

        monitor.reset();
        assert_eq!(monitor.metrics().samples, 0);
    }
}
