//! Compile-time configuration constants (§6).
//!
//! Mirrors `light_client_bitcoin::constants` / `interface::HeaderConfig`:
//! the pure, storage-free knobs live as crate constants and a small `Copy`
//! config struct rather than package-level mutable statics (§9's "implicit
//! global state" redesign flag pushes the mutable half — chain-id, contract
//! address — into `header-relay`'s `ChainConfig` instead).

use crate::bigtarget::Compact;

/// The retarget window size `N` (§4.4).
pub const WINDOW_SIZE: usize = 24;

/// The minimum non-positive-delta floor applied to block-time deltas (§4.4
/// step 2).
pub const MIN_TIME_MS: u64 = 1;

/// The default chain-id used when none is configured explicitly (§6).
pub const CHAIN_MAIN_ID: u8 = 1;

/// `MAX_TARGET` in its wire (compact) form: `0x207fffff` (§6).
pub const MAX_TARGET_COMPACT: Compact = [0x20, 0x7f, 0xff, 0xff];

/// Domain-separation tag for `block_hash = H(domain || to_binary(header))`
/// (§6). A fixed configuration constant, never caller-chosen (§9's open
/// question on domain separation, resolved in DESIGN.md).
pub const BLOCK_HASH_DOMAIN: &[u8] = b"starcoin::block_hash::v1";

/// Domain-separation tag for the PoW seal hash preimage (§4.5 step 5, §6).
/// Distinct from `BLOCK_HASH_DOMAIN` so a valid seal can never be replayed as
/// a block hash or vice versa.
pub const SEAL_HASH_DOMAIN: &[u8] = b"starcoin::pow_seal::v1";

/// Retargeter configuration: the window size and the caller-supplied time
/// plan (§4.4). `window_size` is fixed at [`WINDOW_SIZE`] by default but kept
/// configurable for tests exercising shorter windows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetargetConfig {
    pub window_size: usize,
    pub time_plan_ms: u64,
    pub max_target_compact: Compact,
}

impl RetargetConfig {
    pub const fn new(window_size: usize, time_plan_ms: u64) -> Self {
        Self {
            window_size,
            time_plan_ms,
            max_target_compact: MAX_TARGET_COMPACT,
        }
    }
}

impl Default for RetargetConfig {
    fn default() -> Self {
        // 5918ms is the time plan used by the reference retarget corpus
        // (§8 scenario 4).
        Self::new(WINDOW_SIZE, 5918)
    }
}
