//! `DispatchTable` (§3): the per-family artifact produced by C8 and
//! consumed by C9/C10.

use jdc_types::TypeId;

use crate::builder::LookupStrategy;
use crate::entry::DispatchEntry;
use crate::strategy::DispatchStrategy;
use crate::tree::DecisionTreeNode;

/// Snapshot bookkeeping for a table: whether layout optimization has run and
/// the last benchmark outcome, if any.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DispatchStats {
    pub layout_optimized: bool,
    pub last_benchmark_nanos_per_lookup: Option<f64>,
}

/// `{signature_name, parameter-count, type_signature[], entries[], entry_count, decision_tree?, strategy, stats}` (§3).
pub struct DispatchTable {
    pub signature_name: String,
    pub parameter_count: usize,
    pub type_signature: Vec<TypeId>,
    pub entries: Vec<DispatchEntry>,
    pub entry_count: usize,
    pub decision_tree: Option<DecisionTreeNode>,
    pub strategy: DispatchStrategy,
    pub stats: DispatchStats,
}

impl DispatchTable {
    /// Per-family argument-type signature of the winning implementation at
    /// `entry_index`, identified by its entry's position — used by callers
    /// that need to report *which* entry a lookup landed on.
    #[must_use]
    pub fn entry(&self, index: usize) -> Option<&DispatchEntry> {
        self.entries.get(index)
    }

    /// Linear scan for the entry whose `type_signature_key` matches
    /// `argument_types`' hash. Always correct; used as the fallback and
    /// benchmark baseline.
    #[must_use]
    pub fn lookup_linear(&self, key: u64) -> Option<usize> {
        self.entries.iter().position(|e| e.type_signature_key == key)
    }

    /// Binary search, valid only when `entries` is sorted by
    /// `type_signature_key`. No stage of this pipeline establishes that sort
    /// today — `optimize_layout` sorts by `call_frequency` instead — so
    /// calling this against a table straight out of `DispatchTableBuilder`
    /// returns nonsense. Callers must sort a table by `type_signature_key`
    /// themselves first; `DispatchTableBuilder::benchmark` does not exercise
    /// this method for exactly that reason.
    #[must_use]
    pub fn lookup_binary(&self, key: u64) -> Option<usize> {
        self.entries.binary_search_by(|e| e.type_signature_key.cmp(&key)).ok()
    }

    /// Walk the decision tree, if one exists, following `argument_types`.
    #[must_use]
    pub fn lookup_decision_tree(&self, argument_types: &[TypeId]) -> Option<usize> {
        let mut node = self.decision_tree.as_ref()?;
        loop {
            if let Some(index) = node.terminal {
                return Some(index as usize);
            }
            let (Some(param_index), Some(pivot)) = (node.discriminator_type_index, node.discriminator_type_id) else {
                // Degenerate leaf: no single entry identified by discriminators
                // alone, so linear-scan the partition by full type signature.
                let key = crate::builder::signature_key(argument_types);
                return node
                    .fallback_indices
                    .iter()
                    .find(|&&index| self.entries.get(index as usize).is_some_and(|e| e.type_signature_key == key))
                    .map(|&index| index as usize);
            };
            let matches = argument_types.get(param_index).copied() == Some(pivot);
            let next = if matches { node.left.as_ref() } else { node.right.as_ref() };
            node = next?;
        }
    }

    /// Dispatch a lookup through a specific strategy, for benchmarking
    /// (§4.8). `key` is used by the linear/binary strategies;
    /// `argument_types` by the decision-tree strategy.
    #[must_use]
    pub(crate) fn lookup_with_strategy(&self, argument_types: &[TypeId], strategy: LookupStrategy) -> Option<usize> {
        match strategy {
            LookupStrategy::Linear => {
                let key = crate::builder::signature_key(argument_types);
                self.lookup_linear(key)
            }
            LookupStrategy::BinaryOnSortedTypeIds => {
                let key = crate::builder::signature_key(argument_types);
                self.lookup_binary(key)
            }
            LookupStrategy::DecisionTree => self.lookup_decision_tree(argument_types),
        }
    }
}
