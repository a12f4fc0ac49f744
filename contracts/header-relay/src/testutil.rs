//! Test doubles for `Storage`/`HostEnv` (§6), in the spirit of the teacher's
//! `src/tests/helper.rs` mock app — here a plain in-memory map and a
//! deterministic SHA3-based hasher stand in for the native-service runtime,
//! since there is no CosmWasm `App` to boot.

use std::collections::BTreeMap;

use header_relay_common::bytes::Hash32;
use header_relay_common::error::CoreError;
use header_relay_common::host::{HostEnv, Storage};
use primitive_types::U256;
use sha3::{Digest, Sha3_256};

/// A `BTreeMap`-backed `Storage` with no wrap/unwrap envelope games of its
/// own; kept separate from `TestHostEnv` because the real host's storage and
/// hashing are two independently swappable collaborators (§6).
#[derive(Default)]
pub struct MemoryStorage {
    entries: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl Storage for MemoryStorage {
    fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &[u8], value: &[u8]) {
        self.entries.insert(key.to_vec(), value.to_vec());
    }

    fn remove(&mut self, key: &[u8]) {
        self.entries.remove(key);
    }
}

/// A `HostEnv` whose `wrap`/`unwrap` is a one-byte length-tag envelope (the
/// simplest implementation of §6's "opaque" contract that is still testable
/// for corruption), whose `hash` is domain-tagged SHA3-256, and whose
/// `check_witness` is configurable per test.
pub struct TestHostEnv {
    pub authorized: bool,
}

impl Default for TestHostEnv {
    fn default() -> Self {
        Self { authorized: true }
    }
}

impl HostEnv for TestHostEnv {
    fn check_witness(&self, _address: &[u8]) -> bool {
        self.authorized
    }

    fn wrap(&self, value: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(value.len() + 1);
        out.push(0x01);
        out.extend_from_slice(value);
        out
    }

    fn unwrap(&self, raw: &[u8]) -> Result<Vec<u8>, CoreError> {
        match raw.split_first() {
            Some((0x01, rest)) => Ok(rest.to_vec()),
            _ => Err(CoreError::Other("malformed storage envelope".into())),
        }
    }

    fn hash(&self, domain_tag: &'static [u8], data: &[u8]) -> Hash32 {
        let mut hasher = Sha3_256::new();
        hasher.update(domain_tag);
        hasher.update(data);
        Hash32::from_slice(&hasher.finalize()).expect("sha3-256 output is 32 bytes")
    }
}

fn zero_hash_hex() -> String {
    format!("0x{}", "00".repeat(Hash32::LEN))
}

fn zero_address_hex() -> String {
    format!("0x{}", "00".repeat(header_relay_common::bytes::Address16::LEN))
}

/// Builds the JSON ingest form (§4.2) of a header whose opaque fields
/// (author, roots, body_hash) are all-zero and whose PoW-relevant fields are
/// caller-chosen. `difficulty_hex` must be a `0x`-prefixed big-endian hex
/// integer (the wire form; no compact encoding involved).
pub fn build_header_json(
    number: u64,
    parent_hash: Hash32,
    difficulty_hex: &str,
    timestamp: u64,
    nonce: u32,
) -> Vec<u8> {
    format!(
        r#"{{
            "parent_hash": "{parent}",
            "timestamp": "{timestamp}",
            "number": {number},
            "author": "{addr}",
            "author_auth_key": null,
            "txn_accumulator_root": "{root}",
            "block_accumulator_root": "{root}",
            "state_root": "{root}",
            "gas_used": 0,
            "difficulty": "{difficulty}",
            "body_hash": "{root}",
            "chain_id": 1,
            "nonce": {nonce},
            "extra": "0x00000000"
        }}"#,
        parent = parent_hash.to_hex(),
        timestamp = timestamp,
        number = number,
        addr = zero_address_hex(),
        root = zero_hash_hex(),
        difficulty = difficulty_hex,
        nonce = nonce,
    )
    .into_bytes()
}

/// A header with nonce fixed at 0; suitable only where PoW is never checked
/// (genesis headers, §4.5 step list has no seal-hash check).
pub fn sample_header_json(
    number: u64,
    parent_hash: Hash32,
    difficulty_hex: &str,
    timestamp: u64,
) -> Vec<u8> {
    build_header_json(number, parent_hash, difficulty_hex, timestamp, 0)
}

/// A header whose nonce is searched until its seal hash satisfies
/// `difficulty_hex`'s target, for scenarios that exercise `SyncBlockHeader`'s
/// PoW check (§4.5 step 5). Search is bounded; an easy (large) target finds
/// a passing nonce in a handful of iterations.
pub fn mined_header_json(
    host: &dyn HostEnv,
    number: u64,
    parent_hash: Hash32,
    difficulty_hex: &str,
    timestamp: u64,
) -> Vec<u8> {
    for nonce in 0u32..1_000_000 {
        let json = build_header_json(number, parent_hash, difficulty_hex, timestamp, nonce);
        let header = header_relay_core::parse_json(&json).expect("valid test header json");
        let seal = header_relay_core::seal_hash(&header, host).expect("seal hash");
        let seal_as_u256 = U256::from_big_endian(seal.as_bytes());
        let target =
            header_relay_core::difficulty_to_target(header.difficulty).expect("nonzero difficulty");
        if header_relay_core::pow_passes(seal_as_u256, target) {
            return json;
        }
    }
    panic!("failed to mine a passing nonce within the test search budget");
}

/// The wire hex encoding of a `difficulty` value, for tests that need to
/// assert a header's declared difficulty against a retargeter-computed
/// expectation.
pub fn difficulty_hex(difficulty: U256) -> String {
    let mut bytes = [0u8; 32];
    difficulty.to_big_endian(&mut bytes);
    let trimmed = match bytes.iter().position(|&b| b != 0) {
        Some(i) => &bytes[i..],
        None => &bytes[31..],
    };
    format!("0x{}", hex::encode(trimmed))
}
