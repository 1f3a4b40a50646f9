//! Position and location utilities for rendering diagnostics.
//!
//! The resolver and diagnostic engine work in byte offsets (`Span`); humans
//! read line/column. This module bridges the two.

use serde::{Deserialize, Serialize};

/// A position in a source file (0-indexed line and column).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    /// 0-indexed line number
    pub line: u32,
    /// 0-indexed column (byte offset within the line)
    pub character: u32,
}

impl Position {
    #[must_use]
    pub fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

/// A range in a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    #[must_use]
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }
}

/// A location in a source file (module path + range).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub module_path: String,
    pub range: Range,
}

/// Source location with both offset and line/column info.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLocation {
    /// Byte offset from start of file
    pub offset: u32,
    /// 0-indexed line number
    pub line: u32,
    /// 0-indexed column
    pub character: u32,
}

impl SourceLocation {
    #[must_use]
    pub fn new(offset: u32, line: u32, character: u32) -> Self {
        Self {
            offset,
            line,
            character,
        }
    }
}

/// Line map for efficient offset <-> position conversion.
///
/// Stores the starting byte offset of each line so that converting a byte
/// offset to a `Position` is a binary search rather than a linear scan.
#[derive(Debug, Clone)]
pub struct LineMap {
    /// Starting offset of each line (`line_starts[0]` is always 0).
    line_starts: Vec<u32>,
}

impl LineMap {
    /// Build a line map from source text.
    #[must_use]
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0u32];
        for (i, b) in source.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push((i + 1) as u32);
            }
        }
        Self { line_starts }
    }

    /// Convert a byte offset into a `Position`.
    #[must_use]
    pub fn position_at(&self, offset: u32) -> Position {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(idx) => idx,
            Err(idx) => idx.saturating_sub(1),
        };
        let line_start = self.line_starts[line];
        Position::new(line as u32, offset.saturating_sub(line_start))
    }

    /// Number of lines tracked by this map.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_at_finds_correct_line() {
        let map = LineMap::new("abc\ndef\nghi");
        assert_eq!(map.position_at(0), Position::new(0, 0));
        assert_eq!(map.position_at(4), Position::new(1, 0));
        assert_eq!(map.position_at(5), Position::new(1, 1));
        assert_eq!(map.position_at(8), Position::new(2, 0));
    }

    #[test]
    fn single_line_source_has_one_line_start() {
        let map = LineMap::new("no newlines here");
        assert_eq!(map.line_count(), 1);
    }
}
