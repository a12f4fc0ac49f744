//! The canonical `Header` entity and its retargeter input (§3).
//!
//! Field order and names follow §3's table exactly; it is also the order the
//! canonical binary codec (`codec.rs`) encodes them in, mirroring how the
//! teacher's `WrappedHeader` wraps a single `bitcoin::BlockHeader` (here there
//! is no foreign struct to wrap, so the fields live directly on `Header`).

use header_relay_common::bytes::{Address16, Hash32};
use primitive_types::U256;
use serde::{Deserialize, Serialize};

/// A verified (or about-to-be-verified) Starcoin-like block header.
///
/// `difficulty` is stored expanded (I5): both the JSON ingest form
/// (`codec::parse_json`) and the canonical binary form carry it as a plain
/// big-endian integer — variable-length hex on the wire, a fixed 32-byte
/// array in binary. Neither form is the Bitcoin-style compact
/// exponent+mantissa encoding (`bigtarget::Compact`); that encoding is used
/// only for the `MAX_TARGET` configuration constant and the retargeter's
/// internal target math, never for a header's own `difficulty` field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub parent_hash: Hash32,
    pub timestamp: u64,
    pub number: u64,
    pub author: Address16,
    pub author_auth_key: Option<Hash32>,
    pub txn_accumulator_root: Hash32,
    pub block_accumulator_root: Hash32,
    pub state_root: Hash32,
    pub gas_used: u64,
    #[serde(with = "u256_serde")]
    pub difficulty: U256,
    pub body_hash: Hash32,
    pub chain_id: u8,
    pub nonce: u32,
    pub extra: Vec<u8>,
}

/// The maximum length of `Header::extra`, per §3.
pub const MAX_EXTRA_LEN: usize = 32;

impl Header {
    /// `true` if this header is well-formed independent of any chain state
    /// (`extra` within bound, `author_auth_key` is either absent or a full
    /// 32 bytes — the latter is structural and enforced by the type itself).
    pub fn is_well_formed(&self) -> bool {
        self.extra.len() <= MAX_EXTRA_LEN
    }
}

/// Serializes/deserializes a `U256` as a fixed 32-byte big-endian array for
/// the canonical binary form (bcs encodes `[u8; 32]` with no length prefix,
/// matching "hashes ... are stored raw" — the same treatment `difficulty`
/// gets once expanded).
mod u256_serde {
    use primitive_types::U256;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(value: &U256, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut bytes = [0u8; 32];
        value.to_big_endian(&mut bytes);
        bytes.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<U256, D::Error>
    where
        D: Deserializer<'de>,
    {
        let bytes = <[u8; 32]>::deserialize(deserializer)?;
        Ok(U256::from_big_endian(&bytes))
    }
}

/// `(timestamp_ms, difficulty)` — the retargeter's only per-ancestor input
/// (§3, §4.4).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockDiffInfo {
    pub timestamp_ms: u64,
    pub difficulty: U256,
}

impl BlockDiffInfo {
    pub fn new(timestamp_ms: u64, difficulty: U256) -> Self {
        Self {
            timestamp_ms,
            difficulty,
        }
    }

    pub fn from_header(header: &Header) -> Self {
        Self::new(header.timestamp, header.difficulty)
    }
}
