//! `DispatchEntry` (§3): a cache-line-aligned (64-byte) record so hot
//! `call_frequency` counters never false-share a cache line with a
//! neighboring entry.

use std::sync::atomic::{AtomicU64, Ordering};

use bitflags::bitflags;

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct EntryFlags: u32 {
        /// Entries in this table have been through `optimize_layout` at
        /// least once; `entries[0..entry_count]` is sorted descending by
        /// `call_frequency` as of the snapshot taken then.
        const SORTED = 0b0000_0001;
    }
}

/// `{type_signature_key, implementation_pointer, call_frequency, specificity_rank, flags}` (§3).
///
/// `implementation_pointer` is replaced by a plain index into the owning
/// family's implementation list (§9 "Serialization of interior pointers"):
/// an index survives serialization and rehydration against the registry,
/// where a raw pointer would not.
///
/// Field order here is chosen for layout, not for the order above:
/// `call_frequency` follows `type_signature_key` directly so the 8-byte
/// `AtomicU64` never forces hidden padding ahead of it, keeping the whole
/// record at exactly one cache line.
#[repr(C)]
#[repr(align(64))]
pub struct DispatchEntry {
    pub type_signature_key: u64,
    pub call_frequency: AtomicU64,
    pub implementation_index: u32,
    pub specificity_rank: u32,
    pub flags: EntryFlags,
    _padding: [u8; 36],
}

impl DispatchEntry {
    #[must_use]
    pub fn new(type_signature_key: u64, implementation_index: u32, specificity_rank: u32) -> Self {
        Self {
            type_signature_key,
            call_frequency: AtomicU64::new(0),
            implementation_index,
            specificity_rank,
            flags: EntryFlags::empty(),
            _padding: [0; 36],
        }
    }

    /// Advisory increment (§5): loss of individual increments under
    /// concurrent access is acceptable, so `Relaxed` is sufficient.
    pub fn record_call(&self) {
        self.call_frequency.fetch_add(1, Ordering::Relaxed);
    }

    #[must_use]
    pub fn frequency(&self) -> u64 {
        self.call_frequency.load(Ordering::Relaxed)
    }
}

impl Clone for DispatchEntry {
    fn clone(&self) -> Self {
        Self {
            type_signature_key: self.type_signature_key,
            call_frequency: AtomicU64::new(self.frequency()),
            implementation_index: self.implementation_index,
            specificity_rank: self.specificity_rank,
            flags: self.flags,
            _padding: [0; 36],
        }
    }
}

impl std::fmt::Debug for DispatchEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DispatchEntry")
            .field("type_signature_key", &self.type_signature_key)
            .field("implementation_index", &self.implementation_index)
            .field("call_frequency", &self.frequency())
            .field("specificity_rank", &self.specificity_rank)
            .field("flags", &self.flags)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_is_exactly_one_cache_line() {
        assert_eq!(std::mem::size_of::<DispatchEntry>(), 64);
        assert_eq!(std::mem::align_of::<DispatchEntry>(), 64);
    }

    #[test]
    fn record_call_increments_frequency() {
        let entry = DispatchEntry::new(1, 0, 100);
        entry.record_call();
        entry.record_call();
        assert_eq!(entry.frequency(), 2);
    }
}
