//! `FunctionDecl` — a raw function declaration as seen by the binder/scope
//! view, before `SignatureAnalyzer` (C5) canonicalizes it into an
//! `Implementation`.

use jdc_common::Span;
use jdc_types::TypeId;

/// Declaration-site visibility (§3). Ordered from least to most permissive
/// is intentionally *not* implied by derive order here — visibility
/// monotonicity (§8) is a property of `ScopeGraph::is_visible`, not of this
/// enum's `Ord`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Visibility {
    Public,
    Module,
    Private,
}

/// `{name, parameter_types, return_type, visibility, module_path, source_span}` (§3).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FunctionDecl {
    pub name: String,
    pub parameter_types: Vec<TypeId>,
    pub return_type: TypeId,
    pub visibility: Visibility,
    pub module_path: String,
    pub source_span: Span,
}

impl FunctionDecl {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        parameter_types: Vec<TypeId>,
        return_type: TypeId,
        visibility: Visibility,
        module_path: impl Into<String>,
        source_span: Span,
    ) -> Self {
        Self {
            name: name.into(),
            parameter_types,
            return_type,
            visibility,
            module_path: module_path.into(),
            source_span,
        }
    }

    #[must_use]
    pub fn arity(&self) -> usize {
        self.parameter_types.len()
    }
}
