//! The tagged error type shared by every header-relay crate.
//!
//! Mirrors `common_bitcoin::error::ContractError`: one flat `thiserror` enum
//! that every component returns through, rather than each module inventing
//! its own error type. §7 additionally requires a handful of variants to
//! surface through the host boundary as specific, stable substrings; those
//! are enumerated in [`ErrorKind`] and reachable via [`CoreError::kind`].

/// The eight host-facing error kinds from §7, in matching order. Downstream
/// classifiers match on the stable substring, not the Rust variant name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    GenesisInitialized,
    GenesisParamError,
    SyncBlockParamError,
    SyncBlockOrphan,
    DifficultyError,
    NonceError,
    OperatorError,
    Unknown,
}

impl ErrorKind {
    /// The fixed stable substring a host-side classifier matches against.
    pub const fn substring(self) -> &'static str {
        match self {
            ErrorKind::GenesisInitialized => "genesis header had been initialized",
            ErrorKind::GenesisParamError => "getGenesisHeader, deserialize header err",
            ErrorKind::SyncBlockParamError => "SyncBlockHeader, deserialize header err",
            ErrorKind::SyncBlockOrphan => "SyncBlockHeader, get the parent block failed",
            ErrorKind::DifficultyError => "SyncBlockHeader, invalid difficulty",
            ErrorKind::NonceError => "SyncBlockHeader, verify header error",
            ErrorKind::OperatorError => "SyncGenesisHeader, checkWitness error",
            ErrorKind::Unknown => "unknown error",
        }
    }
}

/// The single error type returned by every header-relay component.
#[derive(thiserror::Error, Debug)]
pub enum CoreError {
    /// A compact target's exponent/mantissa pair does not fit in 256 bits
    /// (§4.1).
    #[error("compact target overflows 256 bits: {0:#010x}")]
    CompactOverflow(u32),

    /// A target used as a divisor in a difficulty conversion was zero
    /// (§4.1).
    #[error("target must be non-zero")]
    ZeroTarget,

    /// The JSON ingest form was malformed: a required field was missing, a
    /// hex field had the wrong length, or an integer field was out of range
    /// (§4.2).
    #[error("getGenesisHeader, deserialize header err: {0}")]
    GenesisParamError(String),

    /// Same decode failure as `GenesisParamError`, but raised while decoding
    /// one of a `SyncBlockHeader` batch (§4.5 step 1).
    #[error("SyncBlockHeader, deserialize header err: {0}")]
    SyncBlockParamError(String),

    /// `SyncGenesisHeader` was called for a chain-id that already has a
    /// committed genesis header (I4).
    #[error("genesis header had been initialized, chain_id={0}")]
    GenesisInitialized(u64),

    /// A submitted header's `parent_hash` is not present in the store for
    /// this chain-id (§4.5 step 2).
    #[error("SyncBlockHeader, get the parent block failed. parent_hash={0}")]
    SyncBlockOrphan(String),

    /// The retarget window could not be assembled because fewer than
    /// `MIN_HISTORY` ancestors exist yet (§4.4 step 1, §4.5 step 3).
    #[error("insufficient ancestor history: have {have}, need {need}")]
    InsufficientHistory { have: usize, need: usize },

    /// A submitted header's `difficulty` does not match the retargeter's
    /// expected output (§4.5 step 4).
    #[error("SyncBlockHeader, invalid difficulty: expected {expected}, got {got}")]
    DifficultyError { expected: String, got: String },

    /// A submitted header's proof-of-work does not satisfy its target
    /// (§4.5 step 5).
    #[error("SyncBlockHeader, verify header error: seal hash does not satisfy target")]
    NonceError,

    /// The caller failed the host's witness/authorization check (§4.5
    /// `SyncGenesisHeader` step 1).
    #[error("SyncGenesisHeader, checkWitness error: caller is not authorized")]
    OperatorError,

    /// A submitted header batch referenced a different `chain_id` than the
    /// one the caller authenticated under (§4.6).
    #[error("chain_id mismatch: param={param}, header={header}")]
    ChainIdMismatch { param: u64, header: u64 },

    /// The framed wire parameter blob was truncated or malformed (§6).
    #[error("malformed wire parameter: {0}")]
    WireDecodeError(String),

    /// Canonical binary (BCS) encode/decode failed; should not occur for any
    /// `Header` produced by this crate (§4.2's round-trip contract).
    #[error("canonical binary codec error: {0}")]
    BinaryCodecError(String),

    /// Catch-all, surfaced as `ErrorKind::Unknown`.
    #[error("{0}")]
    Other(String),
}

impl CoreError {
    /// Classifies this error per §7, for host-boundary string matching.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::GenesisInitialized(_) => ErrorKind::GenesisInitialized,
            CoreError::GenesisParamError(_) => ErrorKind::GenesisParamError,
            CoreError::SyncBlockParamError(_) => ErrorKind::SyncBlockParamError,
            CoreError::SyncBlockOrphan(_) => ErrorKind::SyncBlockOrphan,
            CoreError::DifficultyError { .. } => ErrorKind::DifficultyError,
            CoreError::NonceError => ErrorKind::NonceError,
            CoreError::OperatorError => ErrorKind::OperatorError,
            _ => ErrorKind::Unknown,
        }
    }

    /// The stable substring a downstream classifier should match against
    /// this error's `to_string()`.
    pub fn stable_substring(&self) -> &'static str {
        self.kind().substring()
    }
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;
