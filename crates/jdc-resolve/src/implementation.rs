//! `SignatureAnalyzer` (C5): lowers a `FunctionDecl` to an `Implementation`.

use rustc_hash::FxHashMap;

use jdc_common::Span;
use jdc_scope::FunctionDecl;
use jdc_types::{TypeId, TypeRegistry};

/// `(name, module, disambiguator)` — stable even when two modules declare an
/// identical signature under the same name (§4.5).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FunctionId {
    pub name: String,
    pub module: String,
    pub disambiguator: u32,
}

/// Canonicalized form of a `FunctionDecl` used by the resolver (§3).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Implementation {
    pub function_id: FunctionId,
    pub param_type_ids: Vec<TypeId>,
    pub return_type_id: TypeId,
    /// Informational only per §9: effect sets never affect ranking.
    pub effects: Vec<String>,
    pub specificity_rank: u32,
    pub source_span: Span,
}

/// Lowers `FunctionDecl`s into `Implementation`s, assigning each
/// `(name, module)` pair a monotonically increasing disambiguator.
#[derive(Default)]
pub struct SignatureAnalyzer {
    next_disambiguator: FxHashMap<(String, String), u32>,
}

impl SignatureAnalyzer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Lower `decl` to an `Implementation` against `registry`.
    ///
    /// Specificity rank sums each parameter's specificity (dominant term)
    /// plus a secondary bonus from the return type's specificity, so that
    /// two candidates with identical parameter specificities still order by
    /// "more-specific return types win" rather than tying outright.
    pub fn analyze(&mut self, decl: &FunctionDecl, registry: &TypeRegistry) -> Implementation {
        let param_specificity: u32 = decl
            .parameter_types
            .iter()
            .map(|&t| registry.specificity(t))
            .sum();
        let return_specificity = registry.specificity(decl.return_type);
        let specificity_rank = param_specificity * 1000 + return_specificity;

        let function_id = FunctionId {
            name: decl.name.clone(),
            module: decl.module_path.clone(),
            disambiguator: self.next_disambiguator(&decl.name, &decl.module_path),
        };

        Implementation {
            function_id,
            param_type_ids: decl.parameter_types.clone(),
            return_type_id: decl.return_type,
            effects: Vec::new(),
            specificity_rank,
            source_span: decl.source_span,
        }
    }

    fn next_disambiguator(&mut self, name: &str, module: &str) -> u32 {
        let key = (name.to_string(), module.to_string());
        let counter = self.next_disambiguator.entry(key).or_insert(0);
        let value = *counter;
        *counter += 1;
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jdc_scope::Visibility;
    use jdc_types::TypeKind;

    fn decl(name: &str, params: Vec<TypeId>, ret: TypeId, module: &str) -> FunctionDecl {
        FunctionDecl::new(name, params, ret, Visibility::Public, module, Span::dummy())
    }

    #[test]
    fn distinct_modules_get_distinct_function_ids_for_identical_signatures() {
        let registry = TypeRegistry::new();
        let mut analyzer = SignatureAnalyzer::new();
        let a = analyzer.analyze(&decl("f", vec![TypeId::I32], TypeId::I32, "mod_a"), &registry);
        let b = analyzer.analyze(&decl("f", vec![TypeId::I32], TypeId::I32, "mod_b"), &registry);
        assert_ne!(a.function_id, b.function_id);
    }

    #[test]
    fn repeated_overloads_in_same_module_get_increasing_disambiguators() {
        let registry = TypeRegistry::new();
        let mut analyzer = SignatureAnalyzer::new();
        let a = analyzer.analyze(&decl("f", vec![TypeId::I32], TypeId::I32, "m"), &registry);
        let b = analyzer.analyze(&decl("f", vec![TypeId::F64], TypeId::F64, "m"), &registry);
        assert_eq!(a.function_id.disambiguator, 0);
        assert_eq!(b.function_id.disambiguator, 1);
    }

    #[test]
    fn struct_parameter_outranks_primitive_parameter() {
        let mut registry = TypeRegistry::new();
        let point = registry.register("Point", TypeKind::Struct, Vec::new());
        let mut analyzer = SignatureAnalyzer::new();
        let specific = analyzer.analyze(&decl("f", vec![point], TypeId::I32, "m"), &registry);
        let general = analyzer.analyze(&decl("f", vec![TypeId::I32], TypeId::I32, "m"), &registry);
        assert!(specific.specificity_rank > general.specificity_rank);
    }

    #[test]
    fn return_type_specificity_is_a_secondary_tie_breaker() {
        let mut registry = TypeRegistry::new();
        let point = registry.register("Point", TypeKind::Struct, Vec::new());
        let mut analyzer = SignatureAnalyzer::new();
        let specific_return = analyzer.analyze(&decl("f", vec![TypeId::I32], point, "m"), &registry);
        let plain_return = analyzer.analyze(&decl("f", vec![TypeId::I32], TypeId::I32, "m"), &registry);
        assert!(specific_return.specificity_rank > plain_return.specificity_rank);
    }
}
