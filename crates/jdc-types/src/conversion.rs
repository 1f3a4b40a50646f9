//! `ConversionRegistry` (C2): catalogs implicit conversions and answers
//! per-argument conversion-path queries.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::ty::TypeId;

/// An implicit conversion from one type to another, with an associated cost
/// used for ranking (§4.6) and a lossy flag surfaced uniformly to the ranker
/// (§9 open question: lossy conversions are not disallowed, only surfaced).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Conversion {
    pub from: TypeId,
    pub to: TypeId,
    pub cost: u32,
    pub is_lossy: bool,
}

impl Conversion {
    /// The zero-cost, non-lossy "conversion" of a type to itself.
    #[must_use]
    pub const fn exact(ty: TypeId) -> Self {
        Conversion {
            from: ty,
            to: ty,
            cost: 0,
            is_lossy: false,
        }
    }

    #[must_use]
    pub const fn is_exact(&self) -> bool {
        self.cost == 0 && !self.is_lossy
    }
}

/// A per-argument `ConversionPath` chosen by `SemanticResolver` (§3):
/// `{conversions[N_args], total_cost, max_lossiness}`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConversionPath {
    pub conversions: SmallVec<[Conversion; jdc_common::limits::INLINE_ARG_CAPACITY]>,
    pub total_cost: u32,
    pub max_lossiness: bool,
}

impl ConversionPath {
    #[must_use]
    pub fn from_conversions(conversions: SmallVec<[Conversion; jdc_common::limits::INLINE_ARG_CAPACITY]>) -> Self {
        let total_cost = conversions.iter().map(|c| c.cost).sum();
        let max_lossiness = conversions.iter().any(|c| c.is_lossy);
        Self {
            conversions,
            total_cost,
            max_lossiness,
        }
    }
}

/// Catalogs `(from, to) -> Conversion` entries.
///
/// No transitive closure is performed (§4.2): the absence of a direct entry
/// means "no conversion", even if one could be composed through an
/// intermediate type.
#[derive(Default)]
pub struct ConversionRegistry {
    table: FxHashMap<(TypeId, TypeId), Conversion>,
}

impl ConversionRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a conversion. Re-registering the same `(from, to)` pair
    /// overwrites the prior entry; callers are expected to register each
    /// pair once during setup.
    pub fn register(&mut self, conversion: Conversion) {
        self.table.insert((conversion.from, conversion.to), conversion);
    }

    /// Find a conversion from `from` to `to`. Identical types always yield
    /// `Conversion::exact`, synthesized rather than stored, so registering
    /// `T -> T` explicitly is never required.
    #[must_use]
    pub fn find(&self, from: TypeId, to: TypeId) -> Option<Conversion> {
        if from == to {
            return Some(Conversion::exact(from));
        }
        self.table.get(&(from, to)).copied()
    }

    /// Compute a per-argument conversion path from `from_seq` to `to_seq`.
    ///
    /// Returns `None` if the sequences differ in length, or if any position
    /// has no conversion and the types at that position differ — the
    /// resolver demotes such a candidate to `rejected` with `type_mismatch`
    /// rather than accepting a partial path.
    #[must_use]
    pub fn path(&self, from_seq: &[TypeId], to_seq: &[TypeId]) -> Option<ConversionPath> {
        if from_seq.len() != to_seq.len() {
            return None;
        }
        let mut conversions = SmallVec::with_capacity(from_seq.len());
        for (&from, &to) in from_seq.iter().zip(to_seq.iter()) {
            conversions.push(self.find(from, to)?);
        }
        Some(ConversionPath::from_conversions(conversions))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_types_are_exact_without_registration() {
        let registry = ConversionRegistry::new();
        let conv = registry.find(TypeId::I32, TypeId::I32).unwrap();
        assert!(conv.is_exact());
    }

    #[test]
    fn absence_of_direct_entry_means_no_conversion() {
        let registry = ConversionRegistry::new();
        assert_eq!(registry.find(TypeId::I32, TypeId::F64), None);
    }

    #[test]
    fn no_transitive_closure_is_performed() {
        let mut registry = ConversionRegistry::new();
        registry.register(Conversion { from: TypeId::I32, to: TypeId::F64, cost: 1, is_lossy: false });
        registry.register(Conversion { from: TypeId::F64, to: TypeId::BOOL, cost: 1, is_lossy: true });
        // i32 -> bool is not registered directly, so it must be absent even
        // though i32 -> f64 -> bool exists as a chain.
        assert_eq!(registry.find(TypeId::I32, TypeId::BOOL), None);
    }

    #[test]
    fn path_fails_entirely_if_any_position_lacks_a_conversion() {
        let mut registry = ConversionRegistry::new();
        registry.register(Conversion { from: TypeId::I32, to: TypeId::F64, cost: 1, is_lossy: false });
        let from_seq = [TypeId::I32, TypeId::BOOL];
        let to_seq = [TypeId::F64, TypeId::STRING];
        assert!(registry.path(&from_seq, &to_seq).is_none());
    }

    #[test]
    fn path_sums_cost_and_ors_lossiness() {
        let mut registry = ConversionRegistry::new();
        registry.register(Conversion { from: TypeId::I32, to: TypeId::F64, cost: 2, is_lossy: false });
        registry.register(Conversion { from: TypeId::F64, to: TypeId::BOOL, cost: 3, is_lossy: true });
        let from_seq = [TypeId::I32, TypeId::F64];
        let to_seq = [TypeId::F64, TypeId::BOOL];
        let path = registry.path(&from_seq, &to_seq).unwrap();
        assert_eq!(path.total_cost, 5);
        assert!(path.max_lossiness);
    }
}
