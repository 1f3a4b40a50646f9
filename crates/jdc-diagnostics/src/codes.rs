//! Stable numeric diagnostic codes, displayed with a `JD` prefix (e.g.
//! `JD2001`). Grouped by the component that raises them; gaps are left
//! between groups for future codes.

/// C6 ranking outcomes.
pub const AMBIGUOUS: u32 = 2001;
pub const NO_MATCH: u32 = 2002;

/// C4 rejection reasons, surfaced verbatim when they are the sole reason for
/// a `NoMatch`.
pub const ARITY_MISMATCH: u32 = 2010;
pub const VISIBILITY_VIOLATION: u32 = 2011;
pub const NOT_FOUND: u32 = 2012;

/// C6 type-mismatch demotion.
pub const TYPE_MISMATCH: u32 = 2020;

/// C9 codegen failures (not raised by this crate, but reserved here so the
/// numbering stays centralized).
pub const INVALID_DISPATCH_FAMILY: u32 = 2030;
pub const CONTRACT_VIOLATION: u32 = 2031;

#[must_use]
pub fn display_code(code: u32) -> String {
    format!("JD{code}")
}
