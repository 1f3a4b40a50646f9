//! Multiple-dispatch resolution and code-generation subsystem for the
//! Janus compiler.
//!
//! `CompileSession` is the single entry point a hosting compiler driver
//! uses: it owns the type/conversion/scope registries for the lifetime of
//! one compile and exposes `resolve_call_site`/`build_family` to glue the
//! candidate-collection, resolution, diagnostic, and codegen/cache stages
//! together. The fixture builders in `fixtures` are the documented way to
//! hand it a scope view without a real parser.

mod fixtures;
mod session;

pub use fixtures::{FunctionDeclBuilder, ScopeGraphBuilder};
pub use session::{BuildFamilyError, CompileSession};

pub use jdc_cache::{BuildCache, BuildHash, CacheStats};
pub use jdc_diagnostics::{codes, render_plain_text, Diagnostic, DiagnosticCategory, DiagnosticEngine, Fix, FixKind};
pub use jdc_dispatch::{AuditRecord, DispatchArtifact, DispatchStrategy, DispatchTable, DispatchTableBuilder};
pub use jdc_monitor::{PerfSample, PerformanceMonitor, PerformanceReport, SampleKind};
pub use jdc_resolve::{CallSite, Candidate, CandidateCollector, CandidateSet, CompatibleCandidate, FunctionId, Implementation, RejectionReason, ResolveOutcome, ResolverOptions, SemanticResolver, SignatureAnalyzer, TieBreakMode};
pub use jdc_scope::{FunctionDecl, Scope, ScopeGraph, ScopeId, Visibility};
pub use jdc_types::{Conversion, ConversionPath, ConversionRegistry, Type, TypeId, TypeKind, TypeRegistry};
