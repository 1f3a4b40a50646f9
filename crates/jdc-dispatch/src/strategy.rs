//! `StrategySelector` (C9): picks one of the four dispatch strategies per
//! the §4.9 contract table and emits the corresponding artifact plus an
//! audit record.

use rustc_hash::FxHashSet;

use crate::table::DispatchTable;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StrategyError {
    /// §4.9: codegen was asked to build an artifact for an empty family.
    InvalidDispatchFamily,
}

/// The four strategies of §4.9's contract table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DispatchStrategy {
    StaticDirect,
    SwitchTable,
    PerfectHash { seed: u64 },
    InlineCache,
}

/// The emitted artifact. This subsystem stops at describing *what* codegen
/// should produce (entry order, hash parameters, cache shape) — emitting
/// actual machine code is the host compiler driver's job, out of scope here
/// (§1 Non-goals: "lowering non-call AST").
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DispatchArtifact {
    StaticDirect { implementation_index: u32 },
    SwitchTable { entry_order: Vec<u32> },
    PerfectHash { seed: u64, slots: Vec<Option<u32>> },
    InlineCache { fallback_order: Vec<u32> },
}

/// `{selected_strategy, predicted cycles saved, memory delta, confidence,
/// source->emitted entity map}` (§4.9).
#[derive(Clone, Debug, PartialEq)]
pub struct AuditRecord {
    pub selected_strategy: DispatchStrategy,
    pub predicted_cycles_saved: i64,
    pub predicted_memory_delta_bytes: i64,
    pub confidence: f64,
    /// `(FunctionId display name, emitted entity label)` pairs, for
    /// downstream debug info (§4.9).
    pub entity_map: Vec<(String, String)>,
    /// §7: set when no strategy met its budget and the selector fell back
    /// to `switch_table` — a warning, never fatal to the compile.
    pub contract_violation: bool,
}

/// Budget the frequency of the hottest entry must exceed, relative to the
/// family's average frequency, before `inline_cache` is considered over
/// `switch_table` (§4.9 "hot path with long-tail distribution").
const HOT_PATH_RATIO: f64 = 4.0;

pub struct StrategySelector {
    pub perfect_hash_attempts: u32,
}

impl Default for StrategySelector {
    fn default() -> Self {
        Self { perfect_hash_attempts: 8 }
    }
}

impl StrategySelector {
    #[must_use]
    pub fn new(perfect_hash_attempts: u32) -> Self {
        Self { perfect_hash_attempts }
    }

    pub fn select(&self, table: &DispatchTable) -> Result<(DispatchStrategy, DispatchArtifact, AuditRecord), StrategyError> {
        if table.entry_count == 0 {
            return Err(StrategyError::InvalidDispatchFamily);
        }

        let entity_map = self.entity_map(table);

        if table.entry_count == 1 {
            return Ok((
                DispatchStrategy::StaticDirect,
                DispatchArtifact::StaticDirect { implementation_index: table.entries[0].implementation_index },
                AuditRecord {
                    selected_strategy: DispatchStrategy::StaticDirect,
                    predicted_cycles_saved: 0,
                    predicted_memory_delta_bytes: 0,
                    confidence: 1.0,
                    entity_map,
                    contract_violation: false,
                },
            ));
        }

        if table.entry_count <= 7 {
            let order: Vec<u32> = table.entries.iter().map(|e| e.implementation_index).collect();
            return Ok((
                DispatchStrategy::SwitchTable,
                DispatchArtifact::SwitchTable { entry_order: order.clone() },
                AuditRecord {
                    selected_strategy: DispatchStrategy::SwitchTable,
                    predicted_cycles_saved: 2,
                    predicted_memory_delta_bytes: (order.len() * std::mem::size_of::<u32>()) as i64,
                    confidence: 0.9,
                    entity_map,
                    contract_violation: false,
                },
            ));
        }

        if self.is_hot_path(table) {
            let fallback_order: Vec<u32> = table.entries.iter().map(|e| e.implementation_index).collect();
            return Ok((
                DispatchStrategy::InlineCache,
                DispatchArtifact::InlineCache { fallback_order },
                AuditRecord {
                    selected_strategy: DispatchStrategy::InlineCache,
                    predicted_cycles_saved: 8,
                    predicted_memory_delta_bytes: 64,
                    confidence: 0.85,
                    entity_map,
                    contract_violation: false,
                },
            ));
        }

        if let Some((seed, slots)) = self.try_perfect_hash(table) {
            return Ok((
                DispatchStrategy::PerfectHash { seed },
                DispatchArtifact::PerfectHash { seed, slots },
                AuditRecord {
                    selected_strategy: DispatchStrategy::PerfectHash { seed },
                    predicted_cycles_saved: 10,
                    predicted_memory_delta_bytes: (table.entry_count * 12) as i64,
                    confidence: 0.8,
                    entity_map,
                    contract_violation: false,
                },
            ));
        }

        // §7: no strategy met its budget on this family; fall back to
        // switch_table with a recorded contract violation, not a fatal error.
        tracing::warn!(signature = %table.signature_name, "no dispatch strategy met its budget, falling back to switch_table");
        let order: Vec<u32> = table.entries.iter().map(|e| e.implementation_index).collect();
        Ok((
            DispatchStrategy::SwitchTable,
            DispatchArtifact::SwitchTable { entry_order: order.clone() },
            AuditRecord {
                selected_strategy: DispatchStrategy::SwitchTable,
                predicted_cycles_saved: 0,
                predicted_memory_delta_bytes: (order.len() * std::mem::size_of::<u32>()) as i64,
                confidence: 0.3,
                entity_map,
                contract_violation: true,
            },
        ))
    }

    fn entity_map(&self, table: &DispatchTable) -> Vec<(String, String)> {
        table
            .entries
            .iter()
            .map(|e| (format!("{}#{}", table.signature_name, e.implementation_index), format!("entry@{:#x}", e.type_signature_key)))
            .collect()
    }

    fn is_hot_path(&self, table: &DispatchTable) -> bool {
        if table.entries.is_empty() {
            return false;
        }
        let total: u64 = table.entries.iter().map(crate::entry::DispatchEntry::frequency).sum();
        if total == 0 {
            return false;
        }
        let average = total as f64 / table.entries.len() as f64;
        let max = table.entries.iter().map(crate::entry::DispatchEntry::frequency).max().unwrap_or(0) as f64;
        average > 0.0 && max / average >= HOT_PATH_RATIO
    }

    /// Attempt to find a collision-free multiplicative hash over the
    /// family's `type_signature_key`s within `perfect_hash_attempts` tries.
    fn try_perfect_hash(&self, table: &DispatchTable) -> Option<(u64, Vec<Option<u32>>)> {
        let slot_count = (table.entry_count * 2).next_power_of_two().max(4) as u64;
        for attempt in 0..self.perfect_hash_attempts {
            let seed = u64::from(attempt).wrapping_mul(0x9E37_79B9_7F4A_7C15).wrapping_add(1);
            let mut slots: Vec<Option<u32>> = vec![None; slot_count as usize];
            let mut used = FxHashSet::default();
            let mut collided = false;
            for entry in &table.entries {
                let slot = (entry.type_signature_key ^ seed).wrapping_mul(0x9E37_79B9_7F4A_7C15) % slot_count;
                if !used.insert(slot) {
                    collided = true;
                    break;
                }
                slots[slot as usize] = Some(entry.implementation_index);
            }
            if !collided {
                return Some((seed, slots));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::DispatchTableBuilder;
    use crate::entry::DispatchEntry;
    use jdc_resolve::{FunctionId, Implementation};
    use jdc_common::Span;
    use jdc_types::TypeId;

    fn implementation(params: Vec<TypeId>) -> Implementation {
        Implementation {
            function_id: FunctionId { name: "f".into(), module: "m".into(), disambiguator: 0 },
            param_type_ids: params,
            return_type_id: TypeId::I32,
            effects: Vec::new(),
            specificity_rank: 100,
            source_span: Span::dummy(),
        }
    }

    #[test]
    fn single_implementation_selects_static_direct_with_zero_budget() {
        let builder = DispatchTableBuilder::new(8);
        let table = builder.build("h", &[implementation(vec![TypeId::STRING])]).unwrap();
        let selector = StrategySelector::default();
        let (strategy, _, audit) = selector.select(&table).unwrap();
        assert_eq!(strategy, DispatchStrategy::StaticDirect);
        assert_eq!(audit.predicted_memory_delta_bytes, 0);
    }

    #[test]
    fn small_family_selects_switch_table() {
        let builder = DispatchTableBuilder::new(8);
        let implementations = vec![implementation(vec![TypeId::I32]), implementation(vec![TypeId::F64])];
        let table = builder.build("f", &implementations).unwrap();
        let selector = StrategySelector::default();
        let (strategy, _, _) = selector.select(&table).unwrap();
        assert_eq!(strategy, DispatchStrategy::SwitchTable);
    }

    #[test]
    fn empty_family_is_invalid_dispatch_family() {
        let table = crate::table::DispatchTable {
            signature_name: "f".into(),
            parameter_count: 0,
            type_signature: Vec::new(),
            entries: Vec::new(),
            entry_count: 0,
            decision_tree: None,
            strategy: DispatchStrategy::StaticDirect,
            stats: crate::table::DispatchStats::default(),
        };
        let selector = StrategySelector::default();
        assert_eq!(selector.select(&table), Err(StrategyError::InvalidDispatchFamily));
    }

    #[test]
    fn hot_entry_selects_inline_cache_over_perfect_hash() {
        let builder = DispatchTableBuilder::new(8);
        let implementations: Vec<_> = (0..10).map(|i| implementation(vec![TypeId(i + 5)])).collect();
        let table = builder.build("f", &implementations).unwrap();
        for _ in 0..100 {
            table.entries[0].record_call();
        }
        let selector = StrategySelector::default();
        let (strategy, _, _) = selector.select(&table).unwrap();
        assert_eq!(strategy, DispatchStrategy::InlineCache);
    }
}
