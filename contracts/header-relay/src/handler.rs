//! The Handler (§4.6): decodes the framed wire parameters and dispatches to
//! the Verifier, translating its outcome into the host's success/failure
//! convention. Mirrors the teacher's `entrypoints::execute` functions —
//! thin, `Response`-shaped wrappers around the real logic — generalized from
//! `cosmwasm_std::Response::add_attribute` to a host-agnostic `Outcome` with
//! the same "action" + key/value attribute shape, and logged the way the
//! rest of this workspace logs: one `tracing` event per dispatch, carrying
//! the same fields as the attributes.

use header_relay_common::bytes::Hash32;
use header_relay_common::error::CoreResult;
use header_relay_common::host::HostEnv;

use crate::config::ChainConfig;
use crate::state::HeaderStore;
use crate::verifier::{self, SyncedHeader};
use crate::wire::{SyncBlockHeaderParam, SyncGenesisHeaderParam};

/// The result of one dispatch, in the teacher's `Response::add_attribute`
/// idiom generalized away from CosmWasm: an action tag plus the synced
/// headers it produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Outcome {
    pub action: &'static str,
    pub chain_id: u64,
    pub synced: Vec<SyncedHeader>,
}

impl Outcome {
    /// The final tip height this outcome left the chain at, if any header
    /// was committed.
    pub fn tip_height(&self) -> Option<u64> {
        self.synced.last().map(|s| s.height)
    }

    pub fn tip_hash(&self) -> Option<Hash32> {
        self.synced.last().map(|s| s.block_hash)
    }
}

/// Dispatches a `SyncGenesisHeader` call. `caller` is the ambient signer the
/// host supplies alongside the framed parameter bytes (§4.6).
pub fn sync_genesis_header(
    store: &mut HeaderStore,
    host: &dyn HostEnv,
    caller: &[u8],
    param_bytes: &[u8],
) -> CoreResult<Outcome> {
    let param = SyncGenesisHeaderParam::decode(param_bytes)?;
    tracing::info!(chain_id = param.chain_id, "dispatching SyncGenesisHeader");

    match verifier::sync_genesis_header(store, host, param.chain_id, caller, &param.genesis_header) {
        Ok(synced) => {
            tracing::info!(
                chain_id = param.chain_id,
                height = synced.height,
                block_hash = %synced.block_hash,
                "genesis header committed"
            );
            Ok(Outcome {
                action: "sync_genesis_header",
                chain_id: param.chain_id,
                synced: vec![synced],
            })
        }
        Err(err) => {
            tracing::warn!(chain_id = param.chain_id, error = %err, "SyncGenesisHeader failed");
            Err(err)
        }
    }
}

/// Dispatches a `SyncBlockHeader` call. `param.address` identifies the
/// relayer for host-side bookkeeping (§4.6); it plays no role in
/// verification (§4.5's witness check is genesis-only).
pub fn sync_block_header(
    store: &mut HeaderStore,
    host: &dyn HostEnv,
    config: &ChainConfig,
    param_bytes: &[u8],
) -> CoreResult<Outcome> {
    let param = SyncBlockHeaderParam::decode(param_bytes)?;
    tracing::info!(
        chain_id = param.chain_id,
        relayer = %param.address,
        count = param.headers.len(),
        "dispatching SyncBlockHeader"
    );

    match verifier::sync_block_header(store, host, config, param.chain_id, &param.headers) {
        Ok(synced) => {
            tracing::info!(
                chain_id = param.chain_id,
                committed = synced.len(),
                tip = synced.last().map(|s| s.height),
                "header batch committed"
            );
            Ok(Outcome {
                action: "sync_block_header",
                chain_id: param.chain_id,
                synced,
            })
        }
        Err(err) => {
            tracing::warn!(chain_id = param.chain_id, error = %err, "SyncBlockHeader failed");
            Err(err)
        }
    }
}
