//! Plain-text diagnostic rendering — no color/terminal dependency, since the
//! host driver (not this subsystem) owns the user-facing CLI surface.

use crate::codes::display_code;
use crate::diagnostic::{Diagnostic, DiagnosticCategory};

fn severity_label(category: DiagnosticCategory) -> &'static str {
    match category {
        DiagnosticCategory::Error => "error",
        DiagnosticCategory::Warning => "warning",
        DiagnosticCategory::Suggestion => "suggestion",
        DiagnosticCategory::Message => "message",
    }
}

/// Render a `Diagnostic` as plain text: `severity[code]: message`, one
/// related span per line, then fixes ordered by confidence.
#[must_use]
pub fn render_plain_text(diagnostic: &Diagnostic) -> String {
    let mut out = format!(
        "{}[{}]: {} (at {}..{})",
        severity_label(diagnostic.severity),
        display_code(diagnostic.code),
        diagnostic.message,
        diagnostic.primary_span.start,
        diagnostic.primary_span.end,
    );

    for span in &diagnostic.related_spans {
        out.push_str(&format!("\n  related: {}..{}", span.start, span.end));
    }

    for fix in &diagnostic.fixes {
        out.push_str(&format!("\n  fix ({:.2}): {}", fix.confidence, fix.message));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use jdc_common::Span;

    #[test]
    fn renders_severity_code_and_message() {
        let diag = Diagnostic::new(DiagnosticCategory::Error, 2001, "call is ambiguous", Span::new(3, 9));
        let text = render_plain_text(&diag);
        assert!(text.starts_with("error[JD2001]: call is ambiguous (at 3..9)"));
    }
}
