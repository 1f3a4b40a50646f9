//! Fix suggestions (§4.7). Suggestions only — the compiler never applies
//! them; `CompileSession` just hands the list to whatever renders
//! diagnostics.

/// The six fix classes from §4.7, each carrying the data needed to render a
/// suggestion message without re-deriving it from the originating
/// diagnostic.
#[derive(Clone, Debug, PartialEq)]
pub enum FixKind {
    CastArgument { index: usize, target_type_name: String, lossy: bool },
    UseQualifiedName { import_path: String },
    AnnotateArgument { variable: String, suggested_type_name: String },
    DefineFunction { signature: String },
    TypoCorrection { suggestion: String, distance: usize },
    SpeculativeImport { module: String },
}

/// A suggested fix with a confidence used only to order suggestions (§4.7).
#[derive(Clone, Debug, PartialEq)]
pub struct Fix {
    pub kind: FixKind,
    pub confidence: f64,
    pub message: String,
}

impl Fix {
    #[must_use]
    pub fn cast_argument(index: usize, target_type_name: impl Into<String>, lossy: bool) -> Self {
        let target_type_name = target_type_name.into();
        let confidence = if lossy { 0.7 } else { 0.9 };
        let message = format!("Cast argument {index} to {target_type_name}");
        Self { kind: FixKind::CastArgument { index, target_type_name, lossy }, confidence, message }
    }

    #[must_use]
    pub fn use_qualified_name(import_path: impl Into<String>) -> Self {
        let import_path = import_path.into();
        let message = format!("Use qualified name {import_path}");
        Self { kind: FixKind::UseQualifiedName { import_path }, confidence: 0.7, message }
    }

    #[must_use]
    pub fn annotate_argument(variable: impl Into<String>, suggested_type_name: impl Into<String>) -> Self {
        let variable = variable.into();
        let suggested_type_name = suggested_type_name.into();
        let message = format!("Annotate {variable} as {suggested_type_name}");
        Self { kind: FixKind::AnnotateArgument { variable, suggested_type_name }, confidence: 0.5, message }
    }

    #[must_use]
    pub fn define_function(signature: impl Into<String>) -> Self {
        let signature = signature.into();
        let message = format!("Define function {signature} with inferred signature");
        Self { kind: FixKind::DefineFunction { signature }, confidence: 0.6, message }
    }

    /// Confidence is `1 - distance/3`, per §4.7. `distance` must be ≤
    /// `jdc_common::limits::MAX_TYPO_DISTANCE` for this fix to have been
    /// generated at all.
    #[must_use]
    pub fn typo_correction(suggestion: impl Into<String>, distance: usize) -> Self {
        let suggestion = suggestion.into();
        let confidence = 1.0 - (distance as f64 / 3.0);
        let message = format!("Did you mean '{suggestion}'?");
        Self { kind: FixKind::TypoCorrection { suggestion, distance }, confidence, message }
    }

    #[must_use]
    pub fn speculative_import(module: impl Into<String>) -> Self {
        let module = module.into();
        let message = format!("Import {module}?");
        Self { kind: FixKind::SpeculativeImport { module }, confidence: 0.3, message }
    }
}
