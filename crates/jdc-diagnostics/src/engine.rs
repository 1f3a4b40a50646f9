//! `DiagnosticEngine` (C7): turns a `ResolveOutcome` into rendered
//! diagnostics with fix suggestions.

use jdc_resolve::{CallSite, Candidate, RejectionReason, ResolveOutcome};

use crate::codes;
use crate::diagnostic::{Diagnostic, DiagnosticCategory};
use crate::fix::Fix;
use crate::levenshtein::levenshtein_distance;

/// A short, fixed list of modules considered for the "speculative import"
/// fix class (§4.7) — intentionally small; this is a suggestion heuristic,
/// not a project-wide module index.
const SPECULATIVE_IMPORT_WHITELIST: &[&str] = &["std.core", "std.collections", "std.text"];

pub struct DiagnosticEngine {
    /// Names of functions declared anywhere reachable, used as the
    /// candidate pool for typo-correction suggestions.
    known_function_names: Vec<String>,
}

impl DiagnosticEngine {
    #[must_use]
    pub fn new(known_function_names: Vec<String>) -> Self {
        Self { known_function_names }
    }

    /// Build the diagnostic for a resolved call site's failure. `Resolved`
    /// outcomes have no diagnostic (§4.6/§4.7: diagnostics only flow from
    /// `Ambiguous` and `NoMatch`).
    #[must_use]
    pub fn diagnose(&self, outcome: &ResolveOutcome) -> Option<Diagnostic> {
        match outcome {
            ResolveOutcome::Resolved(_) => None,
            ResolveOutcome::Ambiguous { call_site, candidates } => {
                Some(self.diagnose_ambiguous(call_site, candidates))
            }
            ResolveOutcome::NoMatch { call_site, rejected } => {
                Some(self.diagnose_no_match(call_site, rejected))
            }
        }
    }

    fn diagnose_ambiguous(&self, call_site: &CallSite, candidates: &[jdc_resolve::CompatibleCandidate]) -> Diagnostic {
        let shown = candidates.len().min(jdc_common::limits::MAX_AMBIGUITY_CANDIDATES_SHOWN);
        let hidden = candidates.len() - shown;

        let mut message = format!("call to '{}' is ambiguous among {} candidates", call_site.function_name, candidates.len());
        if hidden > 0 {
            message.push_str(&format!(" (showing {shown}, and {hidden} more)"));
        }

        let mut diag = Diagnostic::new(DiagnosticCategory::Error, codes::AMBIGUOUS, message, call_site.source_span);

        for candidate in &candidates[..shown] {
            diag = diag.with_related_span(candidate.candidate.function.source_span);

            if !candidate.candidate.import_path.as_deref().unwrap_or("").is_empty() {
                let path = candidate.candidate.import_path.clone().unwrap_or_default();
                diag.fixes.push(Fix::use_qualified_name(path));
            }

            for (index, conversion) in candidate.path.conversions.iter().enumerate() {
                if !conversion.is_exact() {
                    diag.fixes.push(Fix::cast_argument(index, format!("type#{}", conversion.to.0), conversion.is_lossy));
                }
            }
        }

        diag.sort_fixes_by_confidence();
        diag
    }

    fn diagnose_no_match(&self, call_site: &CallSite, rejected: &[Candidate]) -> Diagnostic {
        let mut diag = Diagnostic::new(
            DiagnosticCategory::Error,
            codes::NO_MATCH,
            format!("no matching candidate for call to '{}'", call_site.function_name),
            call_site.source_span,
        );

        let mut arity_seen = false;
        for candidate in rejected {
            diag = diag.with_related_span(candidate.function.source_span);
            if let Some(reason) = &candidate.rejection_reason {
                if let RejectionReason::ArityMismatch { .. } = reason {
                    arity_seen = true;
                }
            }
        }

        if arity_seen {
            diag.fixes.push(Fix::define_function(format!(
                "{} with inferred signature",
                call_site.function_name
            )));
        }

        if let Some((suggestion, distance)) = self.best_typo_match(&call_site.function_name) {
            diag.fixes.push(Fix::typo_correction(suggestion, distance));
        }

        for &module in SPECULATIVE_IMPORT_WHITELIST {
            diag.fixes.push(Fix::speculative_import(module));
        }

        diag.sort_fixes_by_confidence();
        diag
    }

    /// Closest known function name within `MAX_TYPO_DISTANCE`, per §4.7.
    fn best_typo_match(&self, name: &str) -> Option<(String, usize)> {
        self.known_function_names
            .iter()
            .map(|candidate| (candidate.clone(), levenshtein_distance(name, candidate)))
            .filter(|(_, distance)| *distance > 0 && *distance <= jdc_common::limits::MAX_TYPO_DISTANCE)
            .min_by_key(|(_, distance)| *distance)
    }
}
