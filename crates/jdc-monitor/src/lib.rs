//! Runtime performance monitoring (C11): ring buffers of resolution,
//! diagnostic-generation, and dispatch-lookup samples, cache hit/miss
//! counters, and threshold-checked reporting.

mod monitor;
mod sample;

pub use monitor::{PerformanceMonitor, PerformanceReport, DIAGNOSTIC_BUDGET_NANOS, MIN_CACHE_HIT_RATE, RESOLUTION_BUDGET_NANOS};
pub use sample::{PerfSample, SampleKind};
