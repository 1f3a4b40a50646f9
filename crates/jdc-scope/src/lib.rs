//! Scope manager (C3).
//!
//! Scopes live in an arena (`ScopeGraph`) indexed by `ScopeId`, per the
//! Design Notes in the spec: `Scope -> FunctionDecl -> source_scope` is not
//! an ownership cycle, so rather than have `FunctionDecl` own or reference
//! its scope, declarations are stored inside their owning `Scope` and the
//! arena index is threaded through explicitly wherever a "declaring scope"
//! is needed (e.g. `ScopeGraph::is_visible`, and — one layer up — the
//! `(ScopeId, DeclId)` pairs `jdc-resolve`'s `Candidate` holds).

mod decl;
mod graph;

pub use decl::{FunctionDecl, Visibility};
pub use graph::{AccessibleScopes, Scope, ScopeError, ScopeGraph, ScopeId};
