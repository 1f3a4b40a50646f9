//! `ScopeGraph` (C3): an arena of `Scope`s plus visibility queries.

use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;

use jdc_common::limits::MAX_SCOPE_WALK_DEPTH;

use crate::decl::{FunctionDecl, Visibility};

/// Arena index for a `Scope`. Stable for the lifetime of one compile (§5).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScopeId(pub u32);

/// `{name, module_path, parent?, imports[], functions: name -> list<FunctionDecl>}` (§3).
///
/// The `functions` map is unordered as a map, but each `Vec<FunctionDecl>` it
/// contains preserves declaration order — that order is exactly what
/// `CandidateCollector` (C4) relies on for "candidate enumeration order
/// within a single scope is declaration order" (§5).
pub struct Scope {
    pub name: String,
    pub module_path: String,
    pub parent: Option<ScopeId>,
    pub imports: Vec<ScopeId>,
    functions: FxHashMap<String, Vec<FunctionDecl>>,
}

impl Scope {
    #[must_use]
    pub fn new(name: impl Into<String>, module_path: impl Into<String>, parent: Option<ScopeId>) -> Self {
        Self {
            name: name.into(),
            module_path: module_path.into(),
            parent,
            imports: Vec::new(),
            functions: FxHashMap::default(),
        }
    }

    /// Append a declaration under `name`, preserving insertion order among
    /// overloads of that name.
    pub fn declare(&mut self, name: impl Into<String>, decl: FunctionDecl) {
        self.functions.entry(name.into()).or_default().push(decl);
    }

    /// All overloads declared under `name` in this scope, in declaration order.
    #[must_use]
    pub fn overloads(&self, name: &str) -> &[FunctionDecl] {
        self.functions.get(name).map_or(&[], Vec::as_slice)
    }

    /// Every name declared in this scope, for diagnostics' typo-correction
    /// candidate pool (§4.7). No particular order is guaranteed.
    pub fn function_names(&self) -> impl Iterator<Item = &str> {
        self.functions.keys().map(String::as_str)
    }
}

/// Errors from `ScopeGraph` queries. Per §4.3, visibility *denial* is not an
/// error — only a corrupted scope graph (an unknown id, or a parent chain
/// that cycles past `MAX_SCOPE_WALK_DEPTH`) produces `Unreachable`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScopeError {
    Unreachable,
}

/// An arena of `Scope`s indexed by `ScopeId` (§9 Design Notes).
#[derive(Default)]
pub struct ScopeGraph {
    scopes: Vec<Scope>,
}

impl ScopeGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a new scope and return its id.
    pub fn create_scope(&mut self, name: impl Into<String>, module_path: impl Into<String>, parent: Option<ScopeId>) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(Scope::new(name, module_path, parent));
        id
    }

    /// Record that `importer` imports `imported` (order of import is
    /// preserved — it determines the order `accessible_scopes` visits them).
    pub fn add_import(&mut self, importer: ScopeId, imported: ScopeId) {
        if let Some(scope) = self.scopes.get_mut(importer.0 as usize) {
            scope.imports.push(imported);
        }
    }

    pub fn scope(&self, id: ScopeId) -> Result<&Scope, ScopeError> {
        self.scopes.get(id.0 as usize).ok_or(ScopeError::Unreachable)
    }

    pub fn scope_mut(&mut self, id: ScopeId) -> Result<&mut Scope, ScopeError> {
        self.scopes.get_mut(id.0 as usize).ok_or(ScopeError::Unreachable)
    }

    /// Every scope id in the graph, in allocation order. Used by callers
    /// (e.g. `CompileSession`) that need to enumerate every declared
    /// function across the whole program rather than from one call site.
    pub fn scope_ids(&self) -> impl Iterator<Item = ScopeId> + '_ {
        (0..self.scopes.len() as u32).map(ScopeId)
    }

    /// Yields `from`, its ancestors (nearest first), and imported modules, in
    /// that order, deduplicated by identity (§4.3). Imports are collected
    /// from every scope visited on the ancestor walk (a module sees its own
    /// imports and its enclosing modules' imports).
    pub fn accessible_scopes(&self, from: ScopeId) -> Result<AccessibleScopes, ScopeError> {
        let mut ordered = SmallVec::<[ScopeId; 8]>::new();
        let mut seen = FxHashSet::default();

        let mut current = Some(from);
        let mut steps = 0usize;
        while let Some(id) = current {
            steps += 1;
            if steps > MAX_SCOPE_WALK_DEPTH {
                return Err(ScopeError::Unreachable);
            }
            if seen.insert(id) {
                ordered.push(id);
            }
            current = self.scope(id)?.parent;
        }

        // Imports are appended after the full ancestor chain, nearest-scope
        // imports first, preserving each scope's import declaration order.
        let ancestor_count = ordered.len();
        for i in 0..ancestor_count {
            let scope = self.scope(ordered[i])?;
            for &imported in &scope.imports {
                if seen.insert(imported) {
                    ordered.push(imported);
                }
            }
        }

        Ok(AccessibleScopes {
            ordered: ordered.into_vec(),
            next: 0,
        })
    }

    /// Visibility check (§4.3). `declaring_scope` is the scope the
    /// declaration was found in (tracked by the caller, typically
    /// `CandidateCollector`, since `FunctionDecl` itself does not store it).
    pub fn is_visible(
        &self,
        decl: &FunctionDecl,
        declaring_scope: ScopeId,
        from_scope: ScopeId,
    ) -> Result<bool, ScopeError> {
        match decl.visibility {
            Visibility::Public => Ok(true),
            Visibility::Module => {
                let from_module = &self.scope(from_scope)?.module_path;
                Ok(*from_module == decl.module_path)
            }
            Visibility::Private => self.is_same_or_descendant(from_scope, declaring_scope),
        }
    }

    /// Is `scope` equal to `ancestor`, or does it descend from it through
    /// the parent chain? Used for private-visibility checks: a private
    /// declaration is visible from its declaring scope or any descendant.
    fn is_same_or_descendant(&self, scope: ScopeId, ancestor: ScopeId) -> Result<bool, ScopeError> {
        let mut current = Some(scope);
        let mut steps = 0usize;
        while let Some(id) = current {
            steps += 1;
            if steps > MAX_SCOPE_WALK_DEPTH {
                return Err(ScopeError::Unreachable);
            }
            if id == ancestor {
                return Ok(true);
            }
            current = self.scope(id)?.parent;
        }
        Ok(false)
    }
}

/// Iterator over the scopes accessible from a call site, in the order
/// documented on `ScopeGraph::accessible_scopes`.
pub struct AccessibleScopes {
    ordered: Vec<ScopeId>,
    next: usize,
}

impl Iterator for AccessibleScopes {
    type Item = ScopeId;

    fn next(&mut self) -> Option<ScopeId> {
        let item = self.ordered.get(self.next).copied();
        self.next += 1;
        item
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jdc_common::Span;
    use jdc_types::TypeId;

    fn decl(vis: Visibility, module: &str) -> FunctionDecl {
        FunctionDecl::new("f", vec![TypeId::I32], TypeId::I32, vis, module, Span::dummy())
    }

    #[test]
    fn accessible_scopes_visits_self_then_ancestors_then_imports() {
        let mut graph = ScopeGraph::new();
        let root = graph.create_scope("root", "root", None);
        let module = graph.create_scope("mod", "mod", Some(root));
        let block = graph.create_scope("block", "mod", Some(module));
        let imported = graph.create_scope("imported", "imported", None);
        graph.add_import(block, imported);

        let order: Vec<_> = graph.accessible_scopes(block).unwrap().collect();
        assert_eq!(order, vec![block, module, root, imported]);
    }

    #[test]
    fn accessible_scopes_dedups_by_identity() {
        let mut graph = ScopeGraph::new();
        let root = graph.create_scope("root", "root", None);
        let module = graph.create_scope("mod", "mod", Some(root));
        // Importing an ancestor must not duplicate it in the walk.
        graph.add_import(module, root);

        let order: Vec<_> = graph.accessible_scopes(module).unwrap().collect();
        assert_eq!(order, vec![module, root]);
    }

    #[test]
    fn public_is_always_visible() {
        let mut graph = ScopeGraph::new();
        let a = graph.create_scope("a", "mod_a", None);
        let b = graph.create_scope("b", "mod_b", None);
        let d = decl(Visibility::Public, "mod_a");
        assert!(graph.is_visible(&d, a, b).unwrap());
    }

    #[test]
    fn module_private_only_visible_within_declaring_module() {
        let mut graph = ScopeGraph::new();
        let a = graph.create_scope("a", "mod_a", None);
        let b = graph.create_scope("b", "mod_b", None);
        let same_module = graph.create_scope("a2", "mod_a", None);
        let d = decl(Visibility::Module, "mod_a");
        assert!(graph.is_visible(&d, a, same_module).unwrap());
        assert!(!graph.is_visible(&d, a, b).unwrap());
    }

    #[test]
    fn private_visible_only_within_declaring_scope_or_descendants() {
        let mut graph = ScopeGraph::new();
        let outer = graph.create_scope("outer", "mod", None);
        let inner = graph.create_scope("inner", "mod", Some(outer));
        let sibling = graph.create_scope("sibling", "mod", None);
        let d = decl(Visibility::Private, "mod");
        assert!(graph.is_visible(&d, outer, outer).unwrap());
        assert!(graph.is_visible(&d, outer, inner).unwrap());
        assert!(!graph.is_visible(&d, outer, sibling).unwrap());
    }

    #[test]
    fn unknown_scope_id_is_unreachable_not_a_panic() {
        let graph = ScopeGraph::new();
        assert_eq!(graph.scope(ScopeId(42)), Err(ScopeError::Unreachable));
    }
}
