//! Per-deployment configuration (§6, §9): the values that vary by host
//! deployment rather than by compile-time constant — the contract-address
//! prefix and the retarget time-plan. Kept as an explicit, caller-supplied
//! struct rather than module-level mutable state, per §9's "no implicit
//! global configuration" redesign guidance and mirroring how the teacher
//! threads `light_client_bitcoin::interface::HeaderConfig` through
//! `HeaderQueue::configure` instead of reading a static.

use header_relay_common::bytes::Address20;
use header_relay_core::config::RetargetConfig;

/// How the Verifier handles a retarget window shorter than `WINDOW_SIZE`
/// (§4.5 step 3's open question). The reference behavior is
/// [`MinHistoryPolicy::SkipUntilFull`]; see DESIGN.md for why that was
/// chosen over failing fast.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MinHistoryPolicy {
    /// Skip the difficulty check entirely until `window_size` ancestors
    /// exist; the submitted header's own declared difficulty is trusted.
    SkipUntilFull,
    /// Fail every `SyncBlockHeader` call with `InsufficientHistory` until
    /// `window_size` ancestors exist.
    RequireFull,
}

/// The configuration a single chain-id's Verifier/HeaderStore pair is
/// instantiated with.
#[derive(Clone, Debug)]
pub struct ChainConfig {
    pub contract_addr: Address20,
    pub retarget: RetargetConfig,
    pub min_history: MinHistoryPolicy,
}

impl ChainConfig {
    pub fn new(contract_addr: Address20, retarget: RetargetConfig) -> Self {
        Self {
            contract_addr,
            retarget,
            min_history: MinHistoryPolicy::SkipUntilFull,
        }
    }
}
