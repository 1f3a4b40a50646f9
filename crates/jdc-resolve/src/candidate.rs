//! `CandidateCollector` (C4): enumerates name-matching declarations visible
//! at a call site and records rejection reasons.

use jdc_scope::{FunctionDecl, ScopeGraph, ScopeId, Visibility};

/// Why a `Candidate` failed to be viable (§4.4). The first filter a
/// candidate fails wins; later filters never overwrite it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RejectionReason {
    VisibilityViolation {
        required: Visibility,
        actual: Visibility,
        module_context: String,
    },
    ArityMismatch {
        expected: usize,
        actual: usize,
    },
    NotFound {
        name: String,
        searched_scopes: Vec<String>,
    },
    /// A viable candidate demoted by `SemanticResolver` (§4.6) when no
    /// conversion path exists from the call site's argument types to its
    /// parameter types. Not produced by `CandidateCollector` itself.
    TypeMismatch {
        argument_types: Vec<jdc_types::TypeId>,
        parameter_types: Vec<jdc_types::TypeId>,
    },
}

/// `{function, source_scope, import_path?, visibility_level, rejection_reason?}` (§3).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Candidate {
    pub function: FunctionDecl,
    pub source_scope: ScopeId,
    pub import_path: Option<String>,
    pub visibility_level: Visibility,
    pub rejection_reason: Option<RejectionReason>,
}

impl Candidate {
    #[must_use]
    pub fn is_viable(&self) -> bool {
        self.rejection_reason.is_none()
    }
}

/// `{function_name, call_arity, all[], viable[], rejected[]}` (§3). `viable`
/// and `rejected` are populated by `finalize`, a single idempotent pass over
/// `all`.
#[derive(Clone, Debug, Default)]
pub struct CandidateSet {
    pub function_name: String,
    pub call_arity: usize,
    pub all: Vec<Candidate>,
    pub viable: Vec<Candidate>,
    pub rejected: Vec<Candidate>,
}

impl CandidateSet {
    #[must_use]
    pub fn new(function_name: impl Into<String>, call_arity: usize) -> Self {
        Self {
            function_name: function_name.into(),
            call_arity,
            all: Vec::new(),
            viable: Vec::new(),
            rejected: Vec::new(),
        }
    }

    /// Partition `all` into `viable`/`rejected`. Idempotent: calling twice
    /// without mutating `all` leaves the same partition (§8).
    pub fn finalize(&mut self) {
        self.viable.clear();
        self.rejected.clear();
        for candidate in &self.all {
            if candidate.is_viable() {
                self.viable.push(candidate.clone());
            } else {
                self.rejected.push(candidate.clone());
            }
        }
    }

    #[must_use]
    pub fn is_ambiguous_pending_resolution(&self) -> bool {
        self.viable.len() > 1
    }
}

/// Walks accessible scopes for `(name, arity)` and builds a `CandidateSet`
/// (§4.4). Collection order matches §5's ordering guarantee: declaration
/// order within a scope, nearest-scope-first across scopes.
#[derive(Default)]
pub struct CandidateCollector;

impl CandidateCollector {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    pub fn collect(
        &self,
        graph: &ScopeGraph,
        from_scope: ScopeId,
        name: &str,
        call_arity: usize,
    ) -> Result<CandidateSet, jdc_scope::ScopeError> {
        let mut set = CandidateSet::new(name, call_arity);
        let mut searched_scopes = Vec::new();

        let from_module = graph.scope(from_scope)?.module_path.clone();

        for scope_id in graph.accessible_scopes(from_scope)? {
            let scope = graph.scope(scope_id)?;
            searched_scopes.push(scope.name.clone());
            let import_path = if scope.module_path == from_module {
                None
            } else {
                Some(scope.module_path.clone())
            };

            for decl in scope.overloads(name) {
                let rejection_reason = self
                    .visibility_rejection(graph, decl, scope_id, from_scope, &from_module)?
                    .or_else(|| self.arity_rejection(decl, call_arity));

                set.all.push(Candidate {
                    function: decl.clone(),
                    source_scope: scope_id,
                    import_path: import_path.clone(),
                    visibility_level: decl.visibility,
                    rejection_reason,
                });
            }
        }

        if set.all.is_empty() {
            set.all.push(Candidate {
                function: FunctionDecl::new(
                    name,
                    Vec::new(),
                    jdc_types::TypeId::INVALID,
                    Visibility::Private,
                    String::new(),
                    jdc_common::Span::dummy(),
                ),
                source_scope: from_scope,
                import_path: None,
                visibility_level: Visibility::Private,
                rejection_reason: Some(RejectionReason::NotFound {
                    name: name.to_string(),
                    searched_scopes,
                }),
            });
        }

        set.finalize();
        Ok(set)
    }

    fn visibility_rejection(
        &self,
        graph: &ScopeGraph,
        decl: &FunctionDecl,
        declaring_scope: ScopeId,
        from_scope: ScopeId,
        from_module: &str,
    ) -> Result<Option<RejectionReason>, jdc_scope::ScopeError> {
        if graph.is_visible(decl, declaring_scope, from_scope)? {
            Ok(None)
        } else {
            Ok(Some(RejectionReason::VisibilityViolation {
                required: Visibility::Public,
                actual: decl.visibility,
                module_context: from_module.to_string(),
            }))
        }
    }

    fn arity_rejection(&self, decl: &FunctionDecl, call_arity: usize) -> Option<RejectionReason> {
        if decl.arity() == call_arity {
            None
        } else {
            Some(RejectionReason::ArityMismatch {
                expected: call_arity,
                actual: decl.arity(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jdc_common::Span;
    use jdc_types::TypeId;

    fn decl(name: &str, arity: usize, vis: Visibility, module: &str) -> FunctionDecl {
        let params = vec![TypeId::I32; arity];
        FunctionDecl::new(name, params, TypeId::I32, vis, module, Span::dummy())
    }

    #[test]
    fn arity_mismatch_records_expected_as_call_arity_and_actual_as_declared_arity() {
        let mut graph = ScopeGraph::new();
        let scope = graph.create_scope("root", "root", None);
        graph.scope_mut(scope).unwrap().declare("add", decl("add", 2, Visibility::Public, "root"));

        let collector = CandidateCollector::new();
        let set = collector.collect(&graph, scope, "add", 3).unwrap();

        assert_eq!(set.viable.len(), 0);
        assert_eq!(set.rejected.len(), 1);
        match &set.rejected[0].rejection_reason {
            Some(RejectionReason::ArityMismatch { expected, actual }) => {
                assert_eq!(*expected, 3);
                assert_eq!(*actual, 2);
            }
            other => panic!("expected ArityMismatch, got {other:?}"),
        }
    }

    #[test]
    fn not_found_is_synthesized_when_no_declaration_exists() {
        let mut graph = ScopeGraph::new();
        let scope = graph.create_scope("root", "root", None);

        let collector = CandidateCollector::new();
        let set = collector.collect(&graph, scope, "missing", 1).unwrap();

        assert_eq!(set.all.len(), 1);
        assert!(matches!(
            set.all[0].rejection_reason,
            Some(RejectionReason::NotFound { .. })
        ));
    }

    #[test]
    fn visibility_rejection_keeps_first_reason_and_does_not_also_check_arity() {
        let mut graph = ScopeGraph::new();
        let outer = graph.create_scope("outer", "mod", None);
        let caller = graph.create_scope("caller", "other_mod", None);
        graph
            .scope_mut(outer)
            .unwrap()
            .declare("f", decl("f", 1, Visibility::Private, "mod"));
        graph.add_import(caller, outer);

        let collector = CandidateCollector::new();
        // caller is unrelated to outer (visibility fails) and arity also
        // mismatches (0 vs 1); the recorded reason must be the first filter
        // applied, visibility, not arity.
        let set = collector.collect(&graph, caller, "f", 0).unwrap();
        assert_eq!(set.all.len(), 1);
        assert!(matches!(
            set.all[0].rejection_reason,
            Some(RejectionReason::VisibilityViolation { .. })
        ));
    }

    #[test]
    fn finalize_is_idempotent() {
        let mut graph = ScopeGraph::new();
        let scope = graph.create_scope("root", "root", None);
        graph.scope_mut(scope).unwrap().declare("f", decl("f", 1, Visibility::Public, "root"));
        let collector = CandidateCollector::new();
        let mut set = collector.collect(&graph, scope, "f", 1).unwrap();
        let before = (set.viable.len(), set.rejected.len());
        set.finalize();
        assert_eq!(before, (set.viable.len(), set.rejected.len()));
    }
}
