//! `PerfSample` (§3.1): one timestamped observation fed into a
//! `PerformanceMonitor` ring buffer.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SampleKind {
    Resolution,
    DiagnosticGen,
    DispatchLookup,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PerfSample {
    pub kind: SampleKind,
    pub duration_nanos: u64,
}

impl PerfSample {
    #[must_use]
    pub fn new(kind: SampleKind, duration_nanos: u64) -> Self {
        Self { kind, duration_nanos }
    }
}
