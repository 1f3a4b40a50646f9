//! `CompileSession`: owns the process-wide registries (§5: "created at
//! compile start and torn down at end") and exposes the single
//! `resolve_call_site` / `build_family` entry point a hosting compiler
//! driver uses, gluing C1 through C10 together.

use std::path::PathBuf;
use std::time::Instant;

use jdc_cache::{BuildCache, BuildHash};
use jdc_diagnostics::{Diagnostic, DiagnosticEngine};
use jdc_dispatch::{AuditRecord, BuilderError, DispatchArtifact, DispatchStrategy, DispatchTable, DispatchTableBuilder, StrategyError, StrategySelector};
use jdc_resolve::{CallSite, CandidateCollector, Implementation, ResolveOutcome, ResolverOptions, SemanticResolver, SignatureAnalyzer};
use jdc_scope::{ScopeError, ScopeGraph, ScopeId};
use jdc_types::{ConversionRegistry, TypeRegistry};
use jdc_monitor::PerformanceMonitor;

/// Failure building a dispatch table's codegen strategy (§4.8/§4.9), kept
/// distinct from `ScopeError`/resolver outcomes since it only arises once a
/// call site's resolution has already succeeded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BuildFamilyError {
    Builder(BuilderError),
    Strategy(StrategyError),
}

impl From<BuilderError> for BuildFamilyError {
    fn from(value: BuilderError) -> Self {
        Self::Builder(value)
    }
}

impl From<StrategyError> for BuildFamilyError {
    fn from(value: StrategyError) -> Self {
        Self::Strategy(value)
    }
}

pub struct CompileSession {
    pub type_registry: TypeRegistry,
    pub conversion_registry: ConversionRegistry,
    pub scope_graph: ScopeGraph,
    signature_analyzer: SignatureAnalyzer,
    candidate_collector: CandidateCollector,
    resolver: SemanticResolver,
    table_builder: DispatchTableBuilder,
    strategy_selector: StrategySelector,
    options: ResolverOptions,
    monitor: PerformanceMonitor,
    cache: Option<BuildCache>,
}

impl CompileSession {
    #[must_use]
    pub fn new(options: ResolverOptions) -> Self {
        Self {
            type_registry: TypeRegistry::new(),
            conversion_registry: ConversionRegistry::new(),
            scope_graph: ScopeGraph::new(),
            signature_analyzer: SignatureAnalyzer::new(),
            candidate_collector: CandidateCollector::new(),
            resolver: SemanticResolver::new(options),
            table_builder: DispatchTableBuilder::new(options.decision_tree_threshold),
            strategy_selector: StrategySelector::new(options.perfect_hash_attempts),
            options,
            monitor: PerformanceMonitor::new(),
            cache: None,
        }
    }

    /// Enable on-disk caching of built dispatch tables (C10) under
    /// `directory`. Without a call to this, `cache_family`/`load_family` are
    /// no-ops/always-miss — caching is an optional acceleration, not a
    /// required part of resolving calls.
    #[must_use]
    pub fn with_cache(mut self, directory: impl Into<PathBuf>) -> Self {
        self.cache = Some(BuildCache::new(directory));
        self
    }

    /// Resolve one call site against the session's current scope graph,
    /// type registry, and conversion registry (C4 → C6). Any `ScopeError`
    /// (a corrupted scope graph) is logged and reported as a `NoMatch` with
    /// no rejected candidates, rather than widening this method's signature
    /// for a failure mode that indicates caller misuse, not a resolution
    /// outcome.
    pub fn resolve_call_site(&mut self, scope: ScopeId, call: &CallSite) -> ResolveOutcome {
        let started = Instant::now();
        let outcome = self.resolve_call_site_inner(scope, call);
        self.monitor.record_resolution(started.elapsed());
        outcome
    }

    fn resolve_call_site_inner(&mut self, scope: ScopeId, call: &CallSite) -> ResolveOutcome {
        let set = match self.candidate_collector.collect(&self.scope_graph, scope, &call.function_name, call.argument_types.len()) {
            Ok(set) => set,
            Err(ScopeError::Unreachable) => {
                tracing::warn!(scope = scope.0, "scope graph unreachable while collecting candidates");
                return ResolveOutcome::NoMatch {
                    call_site: call.clone(),
                    rejected: Vec::new(),
                };
            }
        };

        let implementations: Vec<Implementation> = set
            .viable
            .iter()
            .map(|candidate| self.signature_analyzer.analyze(&candidate.function, &self.type_registry))
            .collect();

        self.resolver.resolve(call, &set.viable, &implementations, &self.conversion_registry, set.rejected)
    }

    /// Render diagnostics and fix suggestions for a failed resolution (C7).
    /// `Resolved` outcomes produce no diagnostic. Typo-correction candidates
    /// are drawn from every function name declared anywhere in the current
    /// scope graph.
    pub fn diagnose(&mut self, outcome: &ResolveOutcome) -> Option<Diagnostic> {
        let started = Instant::now();
        let engine = DiagnosticEngine::new(self.known_function_names());
        let diagnostic = engine.diagnose(outcome);
        self.monitor.record_diagnostic_gen(started.elapsed());
        diagnostic
    }

    fn known_function_names(&self) -> Vec<String> {
        let mut names = Vec::new();
        for scope_id in self.scope_graph.scope_ids() {
            let Ok(scope) = self.scope_graph.scope(scope_id) else {
                continue;
            };
            names.extend(scope.function_names().map(str::to_string));
        }
        names
    }

    /// Build a `DispatchTable` for a `(name, arity)` family and select its
    /// codegen strategy (C8 → C9). `implementations` is normally the
    /// aggregate of every `Resolved` winner seen for this family across all
    /// of its call sites.
    pub fn build_family(
        &self,
        signature_name: &str,
        implementations: &[Implementation],
    ) -> Result<(DispatchTable, DispatchStrategy, DispatchArtifact, AuditRecord), BuildFamilyError> {
        let table = self.table_builder.build(signature_name, implementations)?;
        let (strategy, artifact, audit) = self.strategy_selector.select(&table)?;
        Ok((table, strategy, artifact, audit))
    }

    /// Persist `table` to the configured cache (C10). A no-op success if no
    /// cache directory was configured via `with_cache`.
    pub fn cache_family(&self, name: &str, table: &DispatchTable, build_hash: BuildHash) -> anyhow::Result<()> {
        match &self.cache {
            Some(cache) => cache.cache(name, table, build_hash),
            None => Ok(()),
        }
    }

    /// Load a previously cached table, if caching is configured and the
    /// entry is present and valid for `build_hash`.
    #[must_use]
    pub fn load_cached_family(&self, name: &str, build_hash: BuildHash) -> Option<DispatchTable> {
        self.cache.as_ref().and_then(|cache| cache.load(name, build_hash))
    }

    pub fn record_cache_hit(&mut self) {
        self.monitor.record_cache_hit();
    }

    pub fn record_cache_miss(&mut self) {
        self.monitor.record_cache_miss();
    }

    pub fn record_dispatch_lookup(&mut self, duration: std::time::Duration) {
        self.monitor.record_dispatch_lookup(duration);
    }

    #[must_use]
    pub fn performance_report(&self) -> jdc_monitor::PerformanceReport {
        self.monitor.report()
    }

    #[must_use]
    pub fn options(&self) -> ResolverOptions {
        self.options
    }
}
