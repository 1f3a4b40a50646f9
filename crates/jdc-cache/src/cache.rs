//! `BuildCache` (C10): `cache`/`load`/`invalidate`/`invalidate_all`/`stats`.
//!
//! A missing or corrupt file is a miss, never an error (§4.10); the only
//! fallible operation is `cache`'s write, which is where I/O errors are
//! allowed to bubble to the driver (§7) via `anyhow`.

use std::fs;
use std::path::{Path, PathBuf};

use jdc_dispatch::DispatchTable;

use crate::build_hash::BuildHash;
use crate::format::{ByteReader, ByteWriter};
use crate::index::{CacheIndex, IndexEntry, IndexVersion};
use crate::table_codec::{read_table, write_table};

const MAGIC: &[u8; 4] = b"JDSC";
const VERSION: (u16, u16, u16) = (1, 0, 0);
const INDEX_FILE_NAME: &str = "dispatch_cache_index.json";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub total: usize,
    pub size: u64,
    pub valid: usize,
    pub invalid: usize,
}

pub struct BuildCache {
    directory: PathBuf,
}

impl BuildCache {
    #[must_use]
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self { directory: directory.into() }
    }

    fn table_path(&self, name: &str) -> PathBuf {
        self.directory.join(format!("{name}.jdsc"))
    }

    fn index_path(&self) -> PathBuf {
        self.directory.join(INDEX_FILE_NAME)
    }

    /// Write `table` to disk under `name`, keyed by `build_hash`. The only
    /// operation in this subsystem allowed to return an I/O error (§7).
    pub fn cache(&self, name: &str, table: &DispatchTable, build_hash: BuildHash) -> anyhow::Result<()> {
        fs::create_dir_all(&self.directory)?;

        let mut writer = ByteWriter::new();
        writer.write_bytes(MAGIC);
        writer.write_u16(VERSION.0);
        writer.write_u16(VERSION.1);
        writer.write_u16(VERSION.2);
        writer.write_u32(1); // table_count: one table per file
        writer.write_u64(0); // total_size placeholder, patched below
        writer.write_u64(build_hash.0);
        write_table(&mut writer, table);

        let mut bytes = writer.into_bytes();
        let total_size = bytes.len() as u64;
        bytes[16..24].copy_from_slice(&total_size.to_le_bytes());

        let path = self.table_path(name);
        fs::write(&path, &bytes)?;

        self.update_index(name, &path, build_hash, bytes.len() as u64)?;
        Ok(())
    }

    fn update_index(&self, name: &str, path: &Path, build_hash: BuildHash, size: u64) -> anyhow::Result<()> {
        let mut index = self.read_index(build_hash);
        index.build_hash = build_hash.0;
        let mtime = fs::metadata(path).and_then(|m| m.modified()).ok().and_then(|t| t.duration_since(std::time::UNIX_EPOCH).ok()).map(|d| d.as_secs()).unwrap_or(0);
        index.upsert(IndexEntry { name: name.to_string(), path: path.display().to_string(), mtime, size });
        let json = serde_json::to_string_pretty(&index)?;
        fs::write(self.index_path(), json)?;
        Ok(())
    }

    fn read_index(&self, build_hash: BuildHash) -> CacheIndex {
        fs::read_to_string(self.index_path())
            .ok()
            .and_then(|s| serde_json::from_str(&s).ok())
            .unwrap_or_else(|| CacheIndex::new(IndexVersion { major: VERSION.0, minor: VERSION.1, patch: VERSION.2 }, build_hash.0))
    }

    /// Load `name`'s cached table, validating magic, version, and
    /// `build_hash` (§4.10). Any mismatch, missing file, or malformed bytes
    /// is a miss: `None`, not an error.
    #[must_use]
    pub fn load(&self, name: &str, build_hash: BuildHash) -> Option<DispatchTable> {
        let bytes = fs::read(self.table_path(name)).ok()?;
        let mut reader = ByteReader::new(&bytes);

        reader.expect_magic(MAGIC).ok()?;
        let major = reader.read_u16().ok()?;
        let minor = reader.read_u16().ok()?;
        let _patch = reader.read_u16().ok()?;
        if major != VERSION.0 || minor > VERSION.1 {
            tracing::debug!(name, major, minor, "cache entry version mismatch, treating as miss");
            return None;
        }

        let _table_count = reader.read_u32().ok()?;
        let _total_size = reader.read_u64().ok()?;
        let stored_hash = reader.read_u64().ok()?;
        if stored_hash != build_hash.0 {
            tracing::debug!(name, "cache entry build hash mismatch, treating as miss");
            return None;
        }

        read_table(&mut reader).ok()
    }

    /// Remove `name`'s cache entry, if present. Never errors: removing a
    /// file that doesn't exist is not a failure (§4.10 "missing ... is a
    /// miss, not an error").
    pub fn invalidate(&self, name: &str) {
        let _ = fs::remove_file(self.table_path(name));
        let mut index = self.read_index(BuildHash::default());
        index.remove(name);
        if let Ok(json) = serde_json::to_string_pretty(&index) {
            let _ = fs::write(self.index_path(), json);
        }
    }

    /// Remove every cache entry. After this, `load` must return a miss for
    /// every key (§8 cache safety).
    pub fn invalidate_all(&self) {
        if let Ok(read_dir) = fs::read_dir(&self.directory) {
            for entry in read_dir.flatten() {
                let path = entry.path();
                if path.extension().and_then(|e| e.to_str()) == Some("jdsc") {
                    let _ = fs::remove_file(path);
                }
            }
        }
        let _ = fs::remove_file(self.index_path());
    }

    /// `{total, size, valid, invalid}` over every `.jdsc` file currently on
    /// disk (§4.10).
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        let mut stats = CacheStats::default();
        let Ok(read_dir) = fs::read_dir(&self.directory) else {
            return stats;
        };

        for entry in read_dir.flatten() {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("jdsc") {
                continue;
            }
            stats.total += 1;
            let Ok(bytes) = fs::read(&path) else {
                stats.invalid += 1;
                continue;
            };
            stats.size += bytes.len() as u64;

            let mut reader = ByteReader::new(&bytes);
            let parses = reader.expect_magic(MAGIC).is_ok()
                && reader.read_u16().is_ok()
                && reader.read_u16().is_ok()
                && reader.read_u16().is_ok();
            if parses {
                stats.valid += 1;
            } else {
                stats.invalid += 1;
            }
        }

        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jdc_dispatch::DispatchTableBuilder;
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
    fn cache_then_load_round_trips_entry_count_and_name() {
        let dir = tempfile::tempdir().unwrap();
        let cache = BuildCache::new(dir.path());
        let builder = DispatchTableBuilder::new(8);
        let table = builder.build("f", &[implementation(vec![TypeId::I32]), implementation(vec![TypeId::F64])]).unwrap();
        let hash = BuildHash(42);

        cache.cache("f", &table, hash).unwrap();
        let loaded = cache.load("f", hash).unwrap();
        assert_eq!(loaded.signature_name, table.signature_name);
        assert_eq!(loaded.entry_count, table.entry_count);
    }

    #[test]
    fn mismatched_build_hash_is_a_miss() {
        let dir = tempfile::tempdir().unwrap();
        let cache = BuildCache::new(dir.path());
        let builder = DispatchTableBuilder::new(8);
        let table = builder.build("f", &[implementation(vec![TypeId::I32])]).unwrap();

        cache.cache("f", &table, BuildHash(1)).unwrap();
        assert!(cache.load("f", BuildHash(2)).is_none());
    }

    #[test]
    fn missing_file_is_a_miss_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let cache = BuildCache::new(dir.path());
        assert!(cache.load("never-cached", BuildHash(1)).is_none());
    }

    #[test]
    fn invalidate_all_makes_every_key_miss() {
        let dir = tempfile::tempdir().unwrap();
        let cache = BuildCache::new(dir.path());
        let builder = DispatchTableBuilder::new(8);
        let table = builder.build("f", &[implementation(vec![TypeId::I32])]).unwrap();
        cache.cache("f", &table, BuildHash(1)).unwrap();

        cache.invalidate_all();
        assert!(cache.load("f", BuildHash(1)).is_none());
        assert_eq!(cache.stats().total, 0);
    }
}
