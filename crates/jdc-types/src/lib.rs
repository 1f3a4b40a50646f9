//! Type registry (C1) and conversion registry (C2).
//!
//! This crate provides:
//! - `TypeId` / `Type` / `TypeKind` - stable type identifiers and their metadata
//! - `TypeRegistry` - equality, subtype, and specificity queries over types
//! - `Conversion` / `ConversionRegistry` - implicit-conversion cataloging and
//!   per-argument conversion paths

mod conversion;
mod registry;
mod ty;

pub use conversion::{Conversion, ConversionPath, ConversionRegistry};
pub use registry::{RegistryError, TypeRegistry};
pub use ty::{Type, TypeId, TypeKind};
