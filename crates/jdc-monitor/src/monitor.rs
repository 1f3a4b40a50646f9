//! `PerformanceMonitor` (C11): fixed-capacity ring buffers of resolution,
//! diagnostic-generation, and dispatch-lookup samples plus cache hit/miss
//! counters, checked against the fixed thresholds in §4.11.
//!
//! Single-writer: the monitor is not meant to be queried concurrently with
//! mutation, unlike the relaxed-atomic `call_frequency` counters in
//! `jdc-dispatch` (§4.11 implementation note).

use std::collections::VecDeque;
use std::time::Duration;

use jdc_common::limits::PERF_SAMPLE_WINDOW;

use crate::sample::{PerfSample, SampleKind};

/// §4.11: resolution must average under 1 ms/call.
pub const RESOLUTION_BUDGET_NANOS: u64 = 1_000_000;
/// §4.11: diagnostic generation must average under 10 ms/call.
pub const DIAGNOSTIC_BUDGET_NANOS: u64 = 10_000_000;
/// §4.11: resolver cache hit-rate must exceed 80%.
pub const MIN_CACHE_HIT_RATE: f64 = 0.80;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PerformanceReport {
    pub mean_resolution_nanos: Option<f64>,
    pub mean_diagnostic_nanos: Option<f64>,
    pub mean_dispatch_lookup_nanos: Option<f64>,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub cache_hit_rate: Option<f64>,
    pub resolution_within_budget: bool,
    pub diagnostic_within_budget: bool,
    pub cache_hit_rate_within_budget: bool,
}

impl PerformanceReport {
    /// §4.11: "a boolean all targets met". A budget with no samples yet is
    /// vacuously met — there is nothing to have violated.
    #[must_use]
    pub fn all_targets_met(&self) -> bool {
        self.resolution_within_budget && self.diagnostic_within_budget && self.cache_hit_rate_within_budget
    }

    #[must_use]
    pub fn human_readable(&self) -> String {
        let fmt_nanos = |v: Option<f64>| v.map_or_else(|| "n/a".to_string(), |n| format!("{n:.0} ns"));
        let fmt_rate = |v: Option<f64>| v.map_or_else(|| "n/a".to_string(), |r| format!("{:.1}%", r * 100.0));
        format!(
            "resolution: {} ({}) | diagnostics: {} ({}) | dispatch lookup: {} | cache hit rate: {} ({}) | all targets met: {}",
            fmt_nanos(self.mean_resolution_nanos),
            if self.resolution_within_budget { "ok" } else { "over budget" },
            fmt_nanos(self.mean_diagnostic_nanos),
            if self.diagnostic_within_budget { "ok" } else { "over budget" },
            fmt_nanos(self.mean_dispatch_lookup_nanos),
            fmt_rate(self.cache_hit_rate),
            if self.cache_hit_rate_within_budget { "ok" } else { "under target" },
            self.all_targets_met(),
        )
    }
}

pub struct PerformanceMonitor {
    resolution_samples: VecDeque<PerfSample>,
    diagnostic_samples: VecDeque<PerfSample>,
    dispatch_lookup_samples: VecDeque<PerfSample>,
    cache_hits: u64,
    cache_misses: u64,
    capacity: usize,
}

impl PerformanceMonitor {
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(PERF_SAMPLE_WINDOW)
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            resolution_samples: VecDeque::with_capacity(capacity),
            diagnostic_samples: VecDeque::with_capacity(capacity),
            dispatch_lookup_samples: VecDeque::with_capacity(capacity),
            cache_hits: 0,
            cache_misses: 0,
            capacity,
        }
    }

    pub fn record_resolution(&mut self, duration: Duration) {
        self.push(SampleKind::Resolution, duration);
    }

    pub fn record_diagnostic_gen(&mut self, duration: Duration) {
        self.push(SampleKind::DiagnosticGen, duration);
    }

    pub fn record_dispatch_lookup(&mut self, duration: Duration) {
        self.push(SampleKind::DispatchLookup, duration);
    }

    pub fn record_cache_hit(&mut self) {
        self.cache_hits += 1;
    }

    pub fn record_cache_miss(&mut self) {
        self.cache_misses += 1;
    }

    fn push(&mut self, kind: SampleKind, duration: Duration) {
        let sample = PerfSample::new(kind, duration.as_nanos().min(u64::MAX as u128) as u64);
        let buffer = match kind {
            SampleKind::Resolution => &mut self.resolution_samples,
            SampleKind::DiagnosticGen => &mut self.diagnostic_samples,
            SampleKind::DispatchLookup => &mut self.dispatch_lookup_samples,
        };
        if buffer.len() == self.capacity {
            buffer.pop_front();
        }
        buffer.push_back(sample);
    }

    fn mean_nanos(buffer: &VecDeque<PerfSample>) -> Option<f64> {
        if buffer.is_empty() {
            return None;
        }
        let total: u64 = buffer.iter().map(|s| s.duration_nanos).sum();
        Some(total as f64 / buffer.len() as f64)
    }

    /// Evaluate current samples and counters against the fixed thresholds
    /// (§4.11) and produce a human-readable summary.
    #[must_use]
    pub fn report(&self) -> PerformanceReport {
        let mean_resolution_nanos = Self::mean_nanos(&self.resolution_samples);
        let mean_diagnostic_nanos = Self::mean_nanos(&self.diagnostic_samples);
        let mean_dispatch_lookup_nanos = Self::mean_nanos(&self.dispatch_lookup_samples);

        let total_cache_samples = self.cache_hits + self.cache_misses;
        let cache_hit_rate = if total_cache_samples == 0 {
            None
        } else {
            Some(self.cache_hits as f64 / total_cache_samples as f64)
        };

        let resolution_within_budget = mean_resolution_nanos.is_none_or(|n| n < RESOLUTION_BUDGET_NANOS as f64);
        let diagnostic_within_budget = mean_diagnostic_nanos.is_none_or(|n| n < DIAGNOSTIC_BUDGET_NANOS as f64);
        let cache_hit_rate_within_budget = cache_hit_rate.is_none_or(|r| r > MIN_CACHE_HIT_RATE);

        if !resolution_within_budget {
            tracing::warn!(mean_resolution_nanos, "resolution exceeded its per-call budget");
        }
        if !diagnostic_within_budget {
            tracing::warn!(mean_diagnostic_nanos, "diagnostic generation exceeded its per-call budget");
        }
        if !cache_hit_rate_within_budget {
            tracing::warn!(?cache_hit_rate, "resolver cache hit-rate fell below target");
        }

        PerformanceReport {
            mean_resolution_nanos,
            mean_diagnostic_nanos,
            mean_dispatch_lookup_nanos,
            cache_hits: self.cache_hits,
            cache_misses: self.cache_misses,
            cache_hit_rate,
            resolution_within_budget,
            diagnostic_within_budget,
            cache_hit_rate_within_budget,
        }
    }
}

impl Default for PerformanceMonitor {
    fn default() -> Self {
        Self::new()
    }
}
