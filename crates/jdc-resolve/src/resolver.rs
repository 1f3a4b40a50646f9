//! `SemanticResolver` (C6): ranks viable candidates and selects a unique
//! winner, or reports ambiguity / no-match.

use jdc_common::Span;
use jdc_types::{ConversionPath, ConversionRegistry, TypeId};

use crate::candidate::{Candidate, RejectionReason};
use crate::implementation::Implementation;

/// `{function_name, argument_types[], source_span}` (§3).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallSite {
    pub function_name: String,
    pub argument_types: Vec<TypeId>,
    pub source_span: Span,
}

/// A viable `Candidate` augmented with the `Implementation` C5 produced for
/// it and the `ConversionPath` C6 computed (§3).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompatibleCandidate {
    pub candidate: Candidate,
    pub implementation: Implementation,
    pub path: ConversionPath,
}

/// Resolution tie-break policy. `Strict` is the only supported mode: a tie on
/// `(total_cost, max_lossiness, specificity_rank)` always yields `Ambiguous`,
/// regardless of source span (§4.6 — span ordering is for deterministic
/// diagnostic output only, never for silent disambiguation).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TieBreakMode {
    #[default]
    Strict,
}

/// `{tie_break, allow_lossy_conversions, decision_tree_threshold, perfect_hash_attempts}`.
#[derive(Clone, Copy, Debug)]
pub struct ResolverOptions {
    pub tie_break: TieBreakMode,
    pub allow_lossy_conversions: bool,
    pub decision_tree_threshold: usize,
    pub perfect_hash_attempts: u32,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            tie_break: TieBreakMode::Strict,
            allow_lossy_conversions: true,
            decision_tree_threshold: jdc_common::limits::DEFAULT_DECISION_TREE_THRESHOLD,
            perfect_hash_attempts: 8,
        }
    }
}

/// Outcome of resolving one call site (§4.6).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResolveOutcome {
    Resolved(Box<CompatibleCandidate>),
    Ambiguous {
        call_site: CallSite,
        candidates: Vec<CompatibleCandidate>,
    },
    NoMatch {
        call_site: CallSite,
        rejected: Vec<Candidate>,
    },
}

/// The rank key used to order `CompatibleCandidate`s (§4.6): ascending cost,
/// ascending lossiness, descending specificity, ascending span. `Ord` derives
/// the correct lexicographic comparison field-by-field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct RankKey {
    total_cost: u32,
    max_lossiness: bool,
    negated_specificity: i64,
    source_span: Span,
}

#[derive(Default)]
pub struct SemanticResolver {
    options: ResolverOptions,
}

impl SemanticResolver {
    #[must_use]
    pub fn new(options: ResolverOptions) -> Self {
        Self { options }
    }

    /// Resolve `call_site` against `set`'s viable candidates, each paired
    /// with its already-lowered `Implementation` (§4.6).
    ///
    /// `implementations` must be the same length as `candidates` and
    /// pointwise correspond to them — callers (typically `CompileSession`)
    /// run `SignatureAnalyzer::analyze` over `set.viable` before calling
    /// this.
    pub fn resolve(
        &self,
        call_site: &CallSite,
        candidates: &[Candidate],
        implementations: &[Implementation],
        conversions: &ConversionRegistry,
        mut rejected: Vec<Candidate>,
    ) -> ResolveOutcome {
        debug_assert_eq!(candidates.len(), implementations.len());

        let mut compatible = Vec::with_capacity(candidates.len());
        for (candidate, implementation) in candidates.iter().zip(implementations) {
            match conversions.path(&call_site.argument_types, &implementation.param_type_ids) {
                Some(path) if self.options.allow_lossy_conversions || !path.max_lossiness => {
                    compatible.push(CompatibleCandidate {
                        candidate: candidate.clone(),
                        implementation: implementation.clone(),
                        path,
                    });
                }
                _ => {
                    let mut demoted = candidate.clone();
                    demoted.rejection_reason = Some(RejectionReason::TypeMismatch {
                        argument_types: call_site.argument_types.clone(),
                        parameter_types: implementation.param_type_ids.clone(),
                    });
                    rejected.push(demoted);
                }
            }
        }

        if compatible.is_empty() {
            return ResolveOutcome::NoMatch {
                call_site: call_site.clone(),
                rejected,
            };
        }

        let mut ranked: Vec<(RankKey, CompatibleCandidate)> = compatible
            .into_iter()
            .map(|c| (Self::rank_key(&c), c))
            .collect();
        ranked.sort_by(|a, b| a.0.cmp(&b.0));

        let best_key = ranked[0].0;
        let best_key_excluding_span = (best_key.total_cost, best_key.max_lossiness, best_key.negated_specificity);
        let tied: Vec<CompatibleCandidate> = ranked
            .into_iter()
            .filter(|(key, _)| {
                (key.total_cost, key.max_lossiness, key.negated_specificity) == best_key_excluding_span
            })
            .map(|(_, c)| c)
            .collect();

        if tied.len() == 1 {
            ResolveOutcome::Resolved(Box::new(tied.into_iter().next().expect("checked len == 1")))
        } else {
            ResolveOutcome::Ambiguous {
                call_site: call_site.clone(),
                candidates: tied,
            }
        }
    }

    fn rank_key(candidate: &CompatibleCandidate) -> RankKey {
        RankKey {
            total_cost: candidate.path.total_cost,
            max_lossiness: candidate.path.max_lossiness,
            negated_specificity: -(i64::from(candidate.implementation.specificity_rank)),
            source_span: candidate.candidate.function.source_span,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::implementation::{FunctionId, SignatureAnalyzer};
    use jdc_scope::Visibility;
    use jdc_types::{Conversion, TypeKind, TypeRegistry};

    fn candidate(name: &str, params: Vec<TypeId>, span: Span) -> Candidate {
        Candidate {
            function: jdc_scope::FunctionDecl::new(name, params, TypeId::I32, Visibility::Public, "m", span),
            source_scope: jdc_scope::ScopeId(0),
            import_path: None,
            visibility_level: Visibility::Public,
            rejection_reason: None,
        }
    }

    fn implementation_for(candidate: &Candidate, registry: &TypeRegistry) -> Implementation {
        let mut analyzer = SignatureAnalyzer::new();
        analyzer.analyze(&candidate.function, registry)
    }

    #[test]
    fn exact_match_resolves_uniquely() {
        let registry = TypeRegistry::new();
        let conversions = ConversionRegistry::new();
        let c = candidate("f", vec![TypeId::I32], Span::new(0, 1));
        let imp = implementation_for(&c, &registry);
        let resolver = SemanticResolver::new(ResolverOptions::default());
        let call = CallSite { function_name: "f".into(), argument_types: vec![TypeId::I32], source_span: Span::new(10, 11) };

        let outcome = resolver.resolve(&call, &[c], &[imp], &conversions, Vec::new());
        assert!(matches!(outcome, ResolveOutcome::Resolved(_)));
    }

    #[test]
    fn equal_cost_equal_specificity_is_ambiguous_not_span_broken() {
        let mut registry = TypeRegistry::new();
        let t1 = registry.register("T1", TypeKind::Struct, Vec::new());
        let t2 = registry.register("T2", TypeKind::Struct, Vec::new());
        let a = registry.register("A", TypeKind::Struct, Vec::new());

        let mut conversions = ConversionRegistry::new();
        conversions.register(Conversion { from: a, to: t1, cost: 1, is_lossy: false });
        conversions.register(Conversion { from: a, to: t2, cost: 1, is_lossy: false });

        let c1 = candidate("g", vec![t1], Span::new(0, 1));
        let c2 = candidate("g", vec![t2], Span::new(5, 6));
        let i1 = implementation_for(&c1, &registry);
        let i2 = implementation_for(&c2, &registry);

        let resolver = SemanticResolver::new(ResolverOptions::default());
        let call = CallSite { function_name: "g".into(), argument_types: vec![a], source_span: Span::new(20, 21) };
        let outcome = resolver.resolve(&call, &[c1, c2], &[i1, i2], &conversions, Vec::new());
        match outcome {
            ResolveOutcome::Ambiguous { candidates, .. } => assert_eq!(candidates.len(), 2),
            other => panic!("expected Ambiguous, got {other:?}"),
        }
    }

    #[test]
    fn lower_cost_candidate_beats_higher_cost_candidate() {
        let registry = TypeRegistry::new();
        let mut conversions = ConversionRegistry::new();
        conversions.register(Conversion { from: TypeId::I32, to: TypeId::F64, cost: 5, is_lossy: false });

        let exact = candidate("f", vec![TypeId::I32], Span::new(0, 1));
        let via_conversion = candidate("f", vec![TypeId::F64], Span::new(5, 6));
        let i_exact = implementation_for(&exact, &registry);
        let i_conv = implementation_for(&via_conversion, &registry);

        let resolver = SemanticResolver::new(ResolverOptions::default());
        let call = CallSite { function_name: "f".into(), argument_types: vec![TypeId::I32], source_span: Span::new(20, 21) };
        let outcome = resolver.resolve(&call, &[exact, via_conversion], &[i_exact, i_conv], &conversions, Vec::new());
        match outcome {
            ResolveOutcome::Resolved(winner) => {
                assert_eq!(winner.implementation.function_id, FunctionId { name: "f".into(), module: "m".into(), disambiguator: 0 });
            }
            other => panic!("expected Resolved, got {other:?}"),
        }
    }

    #[test]
    fn no_compatible_candidates_is_no_match() {
        let registry = TypeRegistry::new();
        let conversions = ConversionRegistry::new();
        let c = candidate("f", vec![TypeId::BOOL], Span::new(0, 1));
        let imp = implementation_for(&c, &registry);
        let resolver = SemanticResolver::new(ResolverOptions::default());
        let call = CallSite { function_name: "f".into(), argument_types: vec![TypeId::STRING], source_span: Span::new(20, 21) };
        let outcome = resolver.resolve(&call, &[c], &[imp], &conversions, Vec::new());
        assert!(matches!(outcome, ResolveOutcome::NoMatch { .. }));
    }
}
