//! Pure Starcoin header-relay domain logic (§4): target arithmetic, the
//! header codec, and the difficulty retargeter. Nothing in this crate reads
//! or writes storage — that lives one layer up, in `header-relay`'s
//! `HeaderStore`/`Verifier` (§4.3, §4.5), mirroring how `light_client_bitcoin`
//! keeps `WrappedHeader`/header math free of `cosmwasm_std::Storage`.

pub mod bigtarget;
pub mod codec;
pub mod config;
pub mod header;
pub mod retarget;

pub use bigtarget::{compact_to_target, difficulty_to_target, pow_passes, target_to_compact, target_to_difficulty, Compact};
pub use codec::{block_hash, from_binary, parse_json, seal_hash, to_binary};
pub use header::{BlockDiffInfo, Header};
pub use retarget::compute_next_target;
