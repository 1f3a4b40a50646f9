//! `dispatch_cache_index.json` sidecar (§6): `{version, build_hash, entries: [{name, path, mtime, size}]}`.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IndexVersion {
    pub major: u16,
    pub minor: u16,
    pub patch: u16,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IndexEntry {
    pub name: String,
    pub path: String,
    pub mtime: u64,
    pub size: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CacheIndex {
    pub version: IndexVersion,
    pub build_hash: u64,
    pub entries: Vec<IndexEntry>,
}

impl CacheIndex {
    #[must_use]
    pub fn new(version: IndexVersion, build_hash: u64) -> Self {
        Self { version, build_hash, entries: Vec::new() }
    }

    pub fn upsert(&mut self, entry: IndexEntry) {
        if let Some(existing) = self.entries.iter_mut().find(|e| e.name == entry.name) {
            *existing = entry;
        } else {
            self.entries.push(entry);
        }
    }

    pub fn remove(&mut self, name: &str) {
        self.entries.retain(|e| e.name != name);
    }
}
