//! Candidate collection, signature analysis, and semantic resolution
//! (C4, C5, C6): the middle of the dispatch pipeline between scope
//! resolution (`jdc-scope`) and diagnostics/codegen (`jdc-diagnostics`,
//! `jdc-dispatch`).

mod candidate;
mod implementation;
mod resolver;

pub use candidate::{Candidate, CandidateCollector, CandidateSet, RejectionReason};
pub use implementation::{FunctionId, Implementation, SignatureAnalyzer};
pub use resolver::{CallSite, CompatibleCandidate, ResolveOutcome, ResolverOptions, SemanticResolver, TieBreakMode};
