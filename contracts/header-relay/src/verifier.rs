//! The Verifier state machine (§4.5): `SyncGenesisHeader` and
//! `SyncBlockHeader`, built directly on the pure `header-relay-core`
//! functions and the `HeaderStore` (§4.3). No teacher file plays quite this
//! role — `light_client_bitcoin::header::HeaderQueue::add` is the closest
//! analogue (batch-verify-then-commit over a `VecDeque`-backed queue with
//! abort-on-first-failure) — so the control flow here (decode, look up
//! parent, check difficulty, check PoW, commit) is modeled on that method's
//! shape, generalized from a sliding queue to the two-index `HeaderStore`.

use header_relay_common::bytes::Hash32;
use header_relay_common::error::{CoreError, CoreResult};
use header_relay_common::host::HostEnv;
use header_relay_core::header::{BlockDiffInfo, Header};
use primitive_types::U256;

use crate::config::{ChainConfig, MinHistoryPolicy};
use crate::state::HeaderStore;

/// The outcome of committing one header, returned in submission order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SyncedHeader {
    pub height: u64,
    pub block_hash: Hash32,
}

/// `SyncGenesisHeader(bytes)` (§4.5). `caller` is the ambient transaction
/// signer the host call convention supplies out-of-band — it is not a field
/// of the wire parameter (§4.6's `SyncGenesisHeaderParam` has none), the same
/// way `cosmwasm_std::MessageInfo::sender` rides alongside a decoded message
/// body rather than inside it.
pub fn sync_genesis_header(
    store: &mut HeaderStore,
    host: &dyn HostEnv,
    chain_id: u64,
    caller: &[u8],
    genesis_header_json: &[u8],
) -> CoreResult<SyncedHeader> {
    if !host.check_witness(caller) {
        return Err(CoreError::OperatorError);
    }

    let header = header_relay_core::parse_json(genesis_header_json)
        .map_err(|e| CoreError::GenesisParamError(e.to_string()))?;
    check_chain_id(chain_id, &header)?;

    if store.chain_initialized(chain_id) {
        return Err(CoreError::GenesisInitialized(chain_id));
    }

    let block_hash = header_relay_core::block_hash(&header, host)?;
    let encoded = header_relay_core::to_binary(&header)?;
    store.put_header(chain_id, header.number, block_hash, &encoded);
    store.set_current_height(chain_id, header.number);

    Ok(SyncedHeader {
        height: header.number,
        block_hash,
    })
}

/// `SyncBlockHeader(bytes[])` (§4.5): processes `header_blobs` strictly in
/// order, aborting on the first failure (the reference "all-or-nothing per
/// header, batch aborts on first error" behavior) — headers already
/// committed earlier in this same call remain committed.
pub fn sync_block_header(
    store: &mut HeaderStore,
    host: &dyn HostEnv,
    config: &ChainConfig,
    chain_id: u64,
    header_blobs: &[Vec<u8>],
) -> CoreResult<Vec<SyncedHeader>> {
    let mut committed = Vec::with_capacity(header_blobs.len());

    for blob in header_blobs {
        let header = header_relay_core::parse_json(blob)
            .map_err(|e| CoreError::SyncBlockParamError(e.to_string()))?;
        check_chain_id(chain_id, &header)?;

        if store
            .get_header_bytes_by_hash(chain_id, header.parent_hash)?
            .is_none()
        {
            return Err(CoreError::SyncBlockOrphan(format!("{:x}", header.parent_hash)));
        }

        let window = collect_window(store, chain_id, &header, config.retarget.window_size)?;
        check_difficulty(&header, &window, config)?;
        check_proof_of_work(&header, host)?;

        let block_hash = header_relay_core::block_hash(&header, host)?;
        let encoded = header_relay_core::to_binary(&header)?;
        store.put_header(chain_id, header.number, block_hash, &encoded);

        let current = store.get_current_height(chain_id)?.unwrap_or(header.number);
        if header.number > current {
            store.set_current_height(chain_id, header.number);
        }

        committed.push(SyncedHeader {
            height: header.number,
            block_hash,
        });
    }

    Ok(committed)
}

/// Only the chain-id from the dispatch parameter is trusted for store
/// keying (§4.6); a header claiming a different `chain_id` fails rather than
/// being silently accepted or re-keyed.
fn check_chain_id(param_chain_id: u64, header: &Header) -> CoreResult<()> {
    if u64::from(header.chain_id) != param_chain_id {
        return Err(CoreError::ChainIdMismatch {
            param: param_chain_id,
            header: u64::from(header.chain_id),
        });
    }
    Ok(())
}

/// Walks `header`'s parent, grandparent, … collecting up to `window_size`
/// `(timestamp, difficulty)` pairs in descending order (§4.5 step 3). Shorter
/// than `window_size` only when fewer ancestors are in the store yet.
fn collect_window(
    store: &HeaderStore,
    chain_id: u64,
    header: &Header,
    window_size: usize,
) -> CoreResult<Vec<BlockDiffInfo>> {
    let mut window = Vec::with_capacity(window_size);
    let mut ancestor_hash = header.parent_hash;

    for _ in 0..window_size {
        let Some(bytes) = store.get_header_bytes_by_hash(chain_id, ancestor_hash)? else {
            break;
        };
        let ancestor = header_relay_core::from_binary(&bytes)?;
        ancestor_hash = ancestor.parent_hash;
        window.push(BlockDiffInfo::from_header(&ancestor));
    }

    Ok(window)
}

/// §4.5 step 4: compare `header.difficulty` against the retargeter's
/// expected output, honoring the configured [`MinHistoryPolicy`] when the
/// window isn't full yet.
fn check_difficulty(header: &Header, window: &[BlockDiffInfo], config: &ChainConfig) -> CoreResult<()> {
    if window.len() < config.retarget.window_size {
        return match config.min_history {
            MinHistoryPolicy::SkipUntilFull => Ok(()),
            MinHistoryPolicy::RequireFull => Err(CoreError::InsufficientHistory {
                have: window.len(),
                need: config.retarget.window_size,
            }),
        };
    }

    let expected_target = header_relay_core::compute_next_target(window, &config.retarget)?;
    let expected_difficulty = header_relay_core::target_to_difficulty(expected_target)?;

    if header.difficulty != expected_difficulty {
        return Err(CoreError::DifficultyError {
            expected: format!("{expected_difficulty:#x}"),
            got: format!("{:#x}", header.difficulty),
        });
    }

    Ok(())
}

/// §4.5 step 5: `seal_hash` (interpreted big-endian as a `U256`) must be
/// strictly below the target implied by `header.difficulty`.
fn check_proof_of_work(header: &Header, host: &dyn HostEnv) -> CoreResult<()> {
    let seal = header_relay_core::seal_hash(header, host)?;
    let seal_as_u256 = U256::from_big_endian(seal.as_bytes());
    let target = header_relay_core::difficulty_to_target(header.difficulty)?;

    if header_relay_core::pow_passes(seal_as_u256, target) {
        Ok(())
    } else {
        Err(CoreError::NonceError)
    }
}
