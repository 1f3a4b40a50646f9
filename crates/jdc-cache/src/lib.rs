//! Serialization and build cache (C10): a deterministic on-disk format for
//! `DispatchTable`s, keyed by build hash for incremental recompilation.
//!
//! Hand-rolled little-endian reader/writer, no external binary-serialization
//! crate — this mirrors how a bitstream-format parser reads a magic-numbered
//! container byte-by-byte rather than pulling in a serialization framework
//! for a format this small. The optional index sidecar uses `serde_json`,
//! consistent with how structured (non-binary) data is serialized elsewhere.

mod build_hash;
mod cache;
mod format;
mod index;
mod table_codec;

pub use build_hash::BuildHash;
pub use cache::{BuildCache, CacheStats};
