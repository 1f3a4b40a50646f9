//! Centralized limits and thresholds for the dispatch subsystem.
//!
//! Centralizing these values prevents duplicate definitions with inconsistent
//! values and documents the rationale for each limit in one place.

/// Maximum number of ancestor scopes `ScopeManager::accessible_scopes` will walk
/// before concluding the scope tree is corrupted (and returning `Unreachable`).
///
/// A well-formed program has at most a few dozen nested scopes; this is a
/// guard against a cyclic parent chain in a malformed `ScopeGraph`, not a
/// realistic ceiling.
pub const MAX_SCOPE_WALK_DEPTH: usize = 10_000;

/// Default entry-count threshold at or above which `DispatchTableBuilder`
/// attempts to build a `DecisionTree` instead of relying on linear/binary scan
/// (§4.8). Configurable via `ResolverOptions::decision_tree_threshold`.
pub const DEFAULT_DECISION_TREE_THRESHOLD: usize = 8;

/// Arguments beyond this count fall back to heap-allocated conversion paths;
/// below it, `ConversionPath` and argument-type buffers stay on the stack via
/// `SmallVec`. Chosen to cover the overwhelming majority of call sites.
pub const INLINE_ARG_CAPACITY: usize = 4;

/// Maximum Levenshtein edit distance considered for a typo-correction fix
/// suggestion (§4.7). Distances beyond this produce too many false positives
/// to be a useful suggestion.
pub const MAX_TYPO_DISTANCE: usize = 2;

/// Maximum number of candidates included in an `Ambiguous` diagnostic's
/// `related_spans` before the remainder are summarized as "and N more".
pub const MAX_AMBIGUITY_CANDIDATES_SHOWN: usize = 8;

/// Ring-buffer capacity for each `PerformanceMonitor` sample series (§4.11).
/// Older samples are evicted once this capacity is reached.
pub const PERF_SAMPLE_WINDOW: usize = 4_096;
