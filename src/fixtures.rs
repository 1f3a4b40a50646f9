//! In-memory builders for `Scope`/`FunctionDecl`/`CallSite` graphs (§2.1):
//! the documented way to hand `CompileSession` a scope view without a real
//! parser — parsing itself stays out of scope.

use jdc_common::Span;
use jdc_scope::{FunctionDecl, ScopeGraph, ScopeId, Visibility};
use jdc_types::TypeId;

/// Builds a `FunctionDecl` field-by-field, defaulting anything the caller
/// doesn't care about for a given fixture.
pub struct FunctionDeclBuilder {
    name: String,
    parameter_types: Vec<TypeId>,
    return_type: TypeId,
    visibility: Visibility,
    module_path: String,
    source_span: Span,
}

impl FunctionDeclBuilder {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameter_types: Vec::new(),
            return_type: TypeId::I32,
            visibility: Visibility::Public,
            module_path: String::new(),
            source_span: Span::dummy(),
        }
    }

    #[must_use]
    pub fn params(mut self, parameter_types: Vec<TypeId>) -> Self {
        self.parameter_types = parameter_types;
        self
    }

    #[must_use]
    pub fn returns(mut self, return_type: TypeId) -> Self {
        self.return_type = return_type;
        self
    }

    #[must_use]
    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    #[must_use]
    pub fn module(mut self, module_path: impl Into<String>) -> Self {
        self.module_path = module_path.into();
        self
    }

    #[must_use]
    pub fn span(mut self, span: Span) -> Self {
        self.source_span = span;
        self
    }

    #[must_use]
    pub fn build(self) -> FunctionDecl {
        FunctionDecl::new(self.name, self.parameter_types, self.return_type, self.visibility, self.module_path, self.source_span)
    }
}

/// Builds a `ScopeGraph` by name rather than by juggling `ScopeId`s at every
/// call site; scopes are still addressed by the `ScopeId` this builder
/// hands back, matching how a real driver would thread scope identity
/// through the rest of the pipeline.
#[derive(Default)]
pub struct ScopeGraphBuilder {
    graph: ScopeGraph,
}

impl ScopeGraphBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scope(&mut self, name: impl Into<String>, module_path: impl Into<String>, parent: Option<ScopeId>) -> ScopeId {
        self.graph.create_scope(name, module_path, parent)
    }

    pub fn declare(&mut self, scope: ScopeId, decl: FunctionDecl) -> &mut Self {
        let name = decl.name.clone();
        if let Ok(s) = self.graph.scope_mut(scope) {
            s.declare(name, decl);
        }
        self
    }

    pub fn import(&mut self, importer: ScopeId, imported: ScopeId) -> &mut Self {
        self.graph.add_import(importer, imported);
        self
    }

    #[must_use]
    pub fn build(self) -> ScopeGraph {
        self.graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_declares_functions_findable_by_scope_graph() {
        let mut builder = ScopeGraphBuilder::new();
        let root = builder.scope("root", "root", None);
        builder.declare(root, FunctionDeclBuilder::new("add").params(vec![TypeId::I32, TypeId::I32]).module("root").build());
        let graph = builder.build();
        assert_eq!(graph.scope(root).unwrap().overloads("add").len(), 1);
    }
}
