//! `TypeRegistry` (C1): assigns stable type identifiers and answers
//! equality/subtype/specificity queries.

use rustc_hash::FxHashMap;

use crate::ty::{Type, TypeId, TypeKind};

/// Errors surfaced by `TypeRegistry` lookups (§7: recovered locally, never
/// fatal to the compile).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegistryError {
    /// No type with that id or name has been registered.
    UnknownType,
}

/// Registers and queries `Type`s by stable `TypeId`.
///
/// `register` is idempotent on name (re-registering an existing name returns
/// the prior id) but monotonic on id: ids are handed out in allocation order
/// and never reused. `is_subtype_of` is currently identity-only; it is an
/// explicit extension point (§9 open question) for a future nominal
/// hierarchy, kept as a stub method rather than folded into `equals` so that
/// adding real subtyping later does not change either method's signature.
pub struct TypeRegistry {
    by_name: FxHashMap<String, TypeId>,
    by_id: Vec<Type>,
}

impl TypeRegistry {
    /// Construct a registry with the five reserved primitives pre-registered
    /// at their fixed ids (§3): invalid, i32, f64, bool, string.
    #[must_use]
    pub fn new() -> Self {
        let mut registry = Self {
            by_name: FxHashMap::default(),
            by_id: Vec::new(),
        };
        let reserved = [
            ("<invalid>", TypeId::INVALID),
            ("i32", TypeId::I32),
            ("f64", TypeId::F64),
            ("bool", TypeId::BOOL),
            ("string", TypeId::STRING),
        ];
        for (name, expected_id) in reserved {
            let id = registry.register(name, TypeKind::Primitive, Vec::new());
            debug_assert_eq!(id, expected_id, "reserved primitive registered out of order");
        }
        registry
    }

    /// Register a type, returning its `TypeId`.
    ///
    /// Idempotent on `name`: a second call with the same name returns the id
    /// assigned the first time, regardless of `kind`/`generic_params` passed
    /// this time. Monotonic on id: a freshly allocated id is always one past
    /// the previous highest id.
    pub fn register(&mut self, name: &str, kind: TypeKind, generic_params: Vec<TypeId>) -> TypeId {
        if let Some(&existing) = self.by_name.get(name) {
            return existing;
        }
        let id = TypeId(self.by_id.len() as u32);
        self.by_name.insert(name.to_string(), id);
        self.by_id.push(Type::new(id, name, kind, generic_params));
        id
    }

    /// Look up a type's metadata by id.
    pub fn get_type(&self, id: TypeId) -> Result<&Type, RegistryError> {
        self.by_id
            .get(id.0 as usize)
            .ok_or(RegistryError::UnknownType)
    }

    /// Look up a `TypeId` by registered name.
    pub fn get_by_name(&self, name: &str) -> Result<TypeId, RegistryError> {
        self.by_name
            .get(name)
            .copied()
            .ok_or(RegistryError::UnknownType)
    }

    /// Two types are equal iff their ids match, and for generic instances,
    /// their parameter lists are pointwise equal (§3). Id equality alone
    /// already implies this for correctly-canonicalized registrations; the
    /// explicit parameter comparison guards against a registry that was
    /// populated by hand (e.g. in tests) without going through `register`.
    #[must_use]
    pub fn equals(&self, a: TypeId, b: TypeId) -> bool {
        if a == b {
            return true;
        }
        let (Ok(ty_a), Ok(ty_b)) = (self.get_type(a), self.get_type(b)) else {
            return false;
        };
        ty_a.kind == TypeKind::GenericInstance
            && ty_b.kind == TypeKind::GenericInstance
            && ty_a.name == ty_b.name
            && ty_a.generic_params == ty_b.generic_params
    }

    /// Subtype query. Currently identity only: `a` is a subtype of `b` iff
    /// `equals(a, b)`. Left as a method (rather than inlined at call sites)
    /// so a future nominal-hierarchy pass only needs to change this body.
    #[must_use]
    pub fn is_subtype_of(&self, a: TypeId, b: TypeId) -> bool {
        self.equals(a, b)
    }

    /// Specificity score for a type, used by `SemanticResolver` ranking (§3,
    /// §4.6). Unknown ids score as the least specific kind rather than
    /// panicking, since specificity is advisory ranking input, not a
    /// validity check.
    #[must_use]
    pub fn specificity(&self, id: TypeId) -> u32 {
        self.get_type(id).map(Type::specificity).unwrap_or(0)
    }

    /// Number of types currently registered, including the five reserved
    /// primitives.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_primitives_land_at_fixed_ids() {
        let registry = TypeRegistry::new();
        assert_eq!(registry.get_by_name("i32").unwrap(), TypeId::I32);
        assert_eq!(registry.get_by_name("f64").unwrap(), TypeId::F64);
        assert_eq!(registry.get_by_name("bool").unwrap(), TypeId::BOOL);
        assert_eq!(registry.get_by_name("string").unwrap(), TypeId::STRING);
    }

    #[test]
    fn register_is_idempotent_on_name_but_monotonic_on_id() {
        let mut registry = TypeRegistry::new();
        let first = registry.register("Point", TypeKind::Struct, Vec::new());
        let next_id_before_repeat = registry.len() as u32;
        let second = registry.register("Point", TypeKind::Struct, Vec::new());
        assert_eq!(first, second, "re-registering the same name must return the prior id");
        assert_eq!(registry.len() as u32, next_id_before_repeat, "a repeat register must not allocate a new id");

        let third = registry.register("Other", TypeKind::Struct, Vec::new());
        assert!(third.0 > first.0, "a genuinely new name must get a strictly greater id");
    }

    #[test]
    fn unknown_type_lookup_is_an_error_not_a_panic() {
        let registry = TypeRegistry::new();
        assert_eq!(registry.get_type(TypeId(9999)), Err(RegistryError::UnknownType));
        assert_eq!(registry.get_by_name("DoesNotExist"), Err(RegistryError::UnknownType));
    }

    #[test]
    fn specificity_follows_kind() {
        let mut registry = TypeRegistry::new();
        let s = registry.register("Point", TypeKind::Struct, Vec::new());
        let e = registry.register("Color", TypeKind::Enum, Vec::new());
        assert!(registry.specificity(s) > registry.specificity(e));
        assert!(registry.specificity(TypeId::I32) < registry.specificity(s));
    }

    #[test]
    fn subtyping_is_identity_only() {
        let mut registry = TypeRegistry::new();
        let a = registry.register("A", TypeKind::Struct, Vec::new());
        let b = registry.register("B", TypeKind::Struct, Vec::new());
        assert!(registry.is_subtype_of(a, a));
        assert!(!registry.is_subtype_of(a, b));
    }
}
