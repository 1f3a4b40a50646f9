use jdc_common::Span;

use crate::fix::Fix;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DiagnosticCategory {
    Error,
    Warning,
    Suggestion,
    Message,
}

/// `{severity, code, message, primary_span, related_spans[], fixes[]}` (§4.7).
#[derive(Clone, Debug, PartialEq)]
pub struct Diagnostic {
    pub severity: DiagnosticCategory,
    pub code: u32,
    pub message: String,
    pub primary_span: Span,
    pub related_spans: Vec<Span>,
    pub fixes: Vec<Fix>,
}

impl Diagnostic {
    #[must_use]
    pub fn new(severity: DiagnosticCategory, code: u32, message: impl Into<String>, primary_span: Span) -> Self {
        Self {
            severity,
            code,
            message: message.into(),
            primary_span,
            related_spans: Vec::new(),
            fixes: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_related_span(mut self, span: Span) -> Self {
        self.related_spans.push(span);
        self
    }

    #[must_use]
    pub fn with_fix(mut self, fix: Fix) -> Self {
        self.fixes.push(fix);
        self
    }

    /// Fixes in descending confidence order, ties broken by insertion order
    /// (stable sort) — the display order the spec's confidence field exists
    /// to drive (§4.7).
    pub fn sort_fixes_by_confidence(&mut self) {
        self.fixes.sort_by(|a, b| b.confidence.partial_cmp(&a.confidence).unwrap_or(std::cmp::Ordering::Equal));
    }
}
