//! Dispatch table construction and strategy selection/codegen (C8, C9).

mod builder;
mod entry;
mod strategy;
mod table;
mod tree;

pub use builder::{BenchmarkResult, BuilderError, DispatchTableBuilder, LookupStrategy};
pub use entry::{DispatchEntry, EntryFlags};
pub use strategy::{AuditRecord, DispatchArtifact, DispatchStrategy, StrategyError, StrategySelector};
pub use table::{DispatchStats, DispatchTable};
pub use tree::DecisionTreeNode;
