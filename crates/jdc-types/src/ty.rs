//! `TypeId` and `Type` — the data model underlying the type registry (§3 of the spec).

use serde::{Deserialize, Serialize};

/// Opaque, stable type identifier.
///
/// IDs are dense, allocated sequentially by `TypeRegistry::register`, and
/// stable within one build. A reserved range (0..=4) names the built-in
/// primitives so downstream crates can refer to them as constants without a
/// registry lookup.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TypeId(pub u32);

impl TypeId {
    /// Reserved: the error/recovery type. Never a valid resolution target.
    pub const INVALID: TypeId = TypeId(0);
    pub const I32: TypeId = TypeId(1);
    pub const F64: TypeId = TypeId(2);
    pub const BOOL: TypeId = TypeId(3);
    pub const STRING: TypeId = TypeId(4);

    /// First id available for user-registered types.
    pub const FIRST_USER_ID: u32 = 5;

    #[inline]
    #[must_use]
    pub const fn is_reserved(self) -> bool {
        self.0 < Self::FIRST_USER_ID
    }
}

/// The kind of a registered type. Drives the specificity score (§3) and
/// selects which fields of `Type` are meaningful.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeKind {
    Primitive,
    Struct,
    Enum,
    Function,
    GenericParam,
    GenericInstance,
}

impl TypeKind {
    /// Base specificity score for this kind, per §3 of the spec. Higher is
    /// more specific and wins ties in `SemanticResolver` ranking.
    #[must_use]
    pub const fn specificity(self) -> u32 {
        match self {
            TypeKind::GenericParam => 50,
            TypeKind::Primitive => 100,
            TypeKind::Enum => 150,
            TypeKind::Struct => 200,
            TypeKind::GenericInstance => 250,
            TypeKind::Function => 300,
        }
    }
}

/// A registered type: `{id, name, kind, generic_params}` (§3).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Type {
    pub id: TypeId,
    pub name: String,
    pub kind: TypeKind,
    pub generic_params: Vec<TypeId>,
}

impl Type {
    #[must_use]
    pub fn new(id: TypeId, name: impl Into<String>, kind: TypeKind, generic_params: Vec<TypeId>) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            generic_params,
        }
    }

    /// Specificity score for this type (§3): the kind's base score. Ranking
    /// in `SemanticResolver` additionally sums per-parameter specificity, but
    /// that composition lives in `jdc-resolve`, not here.
    #[must_use]
    pub fn specificity(&self) -> u32 {
        self.kind.specificity()
    }
}
