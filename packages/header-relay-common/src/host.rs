//! Traits standing in for the native-service runtime (§6): the KV store
//! handle, the raw-storage envelope, witness/authorization checks, and the
//! domain-separated hash function. §1 keeps all of these out of scope as
//! "external collaborators, interfaces only" — this module is exactly that
//! set of interfaces, the same role `cosmwasm_std::Storage` /
//! `cosmwasm_std::Api` play for the teacher, generalized away from any one
//! host framework.

use crate::bytes::Hash32;

/// A synchronous key-value handle over the host's transactional store
/// (§4.3, §5). Implementations are expected to be cheap, non-blocking, and
/// scoped to a single host transaction; this crate never retains one across
/// calls.
pub trait Storage {
    /// Reads the raw (envelope-wrapped) bytes at `key`, or `None` if absent.
    fn get(&self, key: &[u8]) -> Option<Vec<u8>>;

    /// Writes the raw (envelope-wrapped) bytes at `key`, replacing any prior
    /// value.
    fn set(&mut self, key: &[u8], value: &[u8]);

    /// Removes any value at `key`. A no-op if absent.
    fn remove(&mut self, key: &[u8]);
}

/// The non-storage host services: witness/authorization checks (used only by
/// `SyncGenesisHeader`, §4.5), the raw-storage envelope wrap/unwrap (§6), and
/// the domain-separated hash function (§6) used for both `block_hash` and
/// the PoW seal hash.
pub trait HostEnv {
    /// `host.check_witness(address)` (§6) — true if the caller has
    /// authorized the given address.
    fn check_witness(&self, address: &[u8]) -> bool;

    /// Wraps a value before writing it to storage. Opaque to this crate; the
    /// host's own format (a one-byte kind tag + varint length per §6).
    fn wrap(&self, value: &[u8]) -> Vec<u8>;

    /// Strips the host's wrap envelope off a stored value, failing if the
    /// envelope is malformed.
    fn unwrap(&self, raw: &[u8]) -> Result<Vec<u8>, crate::error::CoreError>;

    /// Computes the domain-separated hash of `data` under `domain_tag`. Two
    /// domain tags are used by this crate (block hashing vs. PoW sealing,
    /// §6) but both are fixed configuration constants, never caller-chosen.
    fn hash(&self, domain_tag: &'static [u8], data: &[u8]) -> Hash32;
}
