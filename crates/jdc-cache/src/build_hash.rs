//! `BuildHash` (§4.10, GLOSSARY): a deterministic 64-bit digest of input
//! source identities and mtimes, gating cache validity.

/// Wyhash-style 64-bit mix over `(source_path, mtime)` pairs across all
/// input sources. Sources are sorted by path before folding so the result
/// does not depend on the order the caller happened to enumerate them in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct BuildHash(pub u64);

impl BuildHash {
    const SEED: u64 = 0xA076_1D64_78BD_642F;

    #[must_use]
    pub fn compute(sources: &[(String, u64)]) -> Self {
        let mut sorted: Vec<&(String, u64)> = sources.iter().collect();
        sorted.sort_by(|a, b| a.0.cmp(&b.0));

        let mut state = Self::SEED;
        for (path, mtime) in sorted {
            state = Self::mix(state, Self::hash_bytes(path.as_bytes()));
            state = Self::mix(state, *mtime);
        }
        Self(state)
    }

    /// Wyhash's core trick: a 128-bit product, folded back to 64 bits by
    /// xor-ing the high and low halves.
    fn mix(a: u64, b: u64) -> u64 {
        let product = u128::from(a ^ Self::SEED) * u128::from(b ^ 0xE703_7ED1_A0B4_28DB);
        ((product >> 64) as u64) ^ (product as u64)
    }

    fn hash_bytes(bytes: &[u8]) -> u64 {
        let mut state = Self::SEED ^ bytes.len() as u64;
        for chunk in bytes.chunks(8) {
            let mut buf = [0u8; 8];
            buf[..chunk.len()].copy_from_slice(chunk);
            state = Self::mix(state, u64::from_le_bytes(buf));
        }
        state
    }
}
