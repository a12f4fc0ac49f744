//! `HeaderStore` (§4.3): the triple KV index, namespaced by a fixed
//! contract-address prefix and keyed by chain-id.
//!
//! The teacher's `state.rs` reaches for `cw_storage_plus::Item` over
//! `cosmwasm_std::Storage`; there is no such typed-key layer available to a
//! generic `header_relay_common::Storage` handle, so key bytes are built by
//! hand exactly as §4.3 specifies — the same concatenation style
//! `operation.go`'s `ConcatKey`/`GetUint64Bytes` helpers use in the original
//! service.

use header_relay_common::bytes::{Address20, Hash32};
use header_relay_common::error::CoreResult;
use header_relay_common::host::{HostEnv, Storage};

const CURRENT_HEIGHT_TAG: &[u8] = b"currentHeaderHeight";
const HEIGHT_INDEX_TAG: &[u8] = b"mainChain";
const HASH_INDEX_TAG: &[u8] = b"headerIndex";

fn current_height_key(contract_addr: Address20, chain_id: u64) -> Vec<u8> {
    let mut key = Vec::with_capacity(Address20::LEN + CURRENT_HEIGHT_TAG.len() + 8);
    key.extend_from_slice(contract_addr.as_bytes());
    key.extend_from_slice(CURRENT_HEIGHT_TAG);
    key.extend_from_slice(&chain_id.to_le_bytes());
    key
}

fn height_index_key(contract_addr: Address20, chain_id: u64, height: u64) -> Vec<u8> {
    let mut key = Vec::with_capacity(Address20::LEN + HEIGHT_INDEX_TAG.len() + 16);
    key.extend_from_slice(contract_addr.as_bytes());
    key.extend_from_slice(HEIGHT_INDEX_TAG);
    key.extend_from_slice(&chain_id.to_le_bytes());
    key.extend_from_slice(&height.to_le_bytes());
    key
}

fn hash_index_key(contract_addr: Address20, chain_id: u64, hash: Hash32) -> Vec<u8> {
    let mut key = Vec::with_capacity(Address20::LEN + HASH_INDEX_TAG.len() + 8 + Hash32::LEN);
    key.extend_from_slice(contract_addr.as_bytes());
    key.extend_from_slice(HASH_INDEX_TAG);
    key.extend_from_slice(&chain_id.to_le_bytes());
    key.extend_from_slice(hash.as_bytes());
    key
}

/// The persisted per-chain header index (§4.3): current height, height→hash,
/// hash→canonical-binary-header. Every read strips the host's wrap envelope;
/// every write applies it.
pub struct HeaderStore<'a> {
    pub contract_addr: Address20,
    pub storage: &'a mut dyn Storage,
    pub host: &'a dyn HostEnv,
}

impl<'a> HeaderStore<'a> {
    pub fn new(contract_addr: Address20, storage: &'a mut dyn Storage, host: &'a dyn HostEnv) -> Self {
        Self {
            contract_addr,
            storage,
            host,
        }
    }

    /// `true` once a genesis header has been committed for `chain_id` (I4).
    pub fn chain_initialized(&self, chain_id: u64) -> bool {
        self.storage
            .get(&current_height_key(self.contract_addr, chain_id))
            .is_some()
    }

    pub fn get_current_height(&self, chain_id: u64) -> CoreResult<Option<u64>> {
        let Some(raw) = self.storage.get(&current_height_key(self.contract_addr, chain_id)) else {
            return Ok(None);
        };
        let unwrapped = self.host.unwrap(&raw)?;
        let bytes: [u8; 8] = unwrapped
            .try_into()
            .map_err(|_| header_relay_common::error::CoreError::Other("corrupt current-height value".into()))?;
        Ok(Some(u64::from_le_bytes(bytes)))
    }

    pub fn set_current_height(&mut self, chain_id: u64, height: u64) {
        let key = current_height_key(self.contract_addr, chain_id);
        let value = self.host.wrap(&height.to_le_bytes());
        self.storage.set(&key, &value);
    }

    pub fn get_hash_by_height(&self, chain_id: u64, height: u64) -> CoreResult<Option<Hash32>> {
        let Some(raw) = self
            .storage
            .get(&height_index_key(self.contract_addr, chain_id, height))
        else {
            return Ok(None);
        };
        let unwrapped = self.host.unwrap(&raw)?;
        Hash32::from_slice(&unwrapped)
            .map(Some)
            .ok_or_else(|| header_relay_common::error::CoreError::Other("corrupt height-index value".into()))
    }

    pub fn get_header_bytes_by_hash(&self, chain_id: u64, hash: Hash32) -> CoreResult<Option<Vec<u8>>> {
        let Some(raw) = self
            .storage
            .get(&hash_index_key(self.contract_addr, chain_id, hash))
        else {
            return Ok(None);
        };
        Ok(Some(self.host.unwrap(&raw)?))
    }

    /// Persists `header_bytes` (the canonical binary form) under `hash`, and
    /// indexes it by `height` (§4.3). Does not touch `current_height`; the
    /// caller (Verifier) decides whether the tip advances.
    pub fn put_header(&mut self, chain_id: u64, height: u64, hash: Hash32, header_bytes: &[u8]) {
        let height_key = height_index_key(self.contract_addr, chain_id, height);
        self.storage
            .set(&height_key, &self.host.wrap(hash.as_bytes()));

        let hash_key = hash_index_key(self.contract_addr, chain_id, hash);
        self.storage.set(&hash_key, &self.host.wrap(header_bytes));
    }
}
