//! Common types shared by every crate in the Janus dispatch subsystem.
//!
//! This crate provides:
//! - `Span` / `Position` / `SourceLocation` - source location tracking
//! - `LineMap` - byte offset <-> line/column conversion
//! - `limits` - shared capacity constants

pub mod limits;
pub mod position;
pub mod span;

pub use position::{Location, LineMap, Position, Range, SourceLocation};
pub use span::Span;
