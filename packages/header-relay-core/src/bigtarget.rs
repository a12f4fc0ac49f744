//! 256-bit unsigned PoW target arithmetic (§4.1).
//!
//! The teacher (`light_client_bitcoin::header::WrappedHeader`) leans on
//! `bitcoin::util::uint::Uint256` and the `bitcoin` crate's own
//! `u256_from_compact_target` / `compact_target_from_u256` for exactly this
//! job. We carry the same shape of API over `primitive_types::U256`, the
//! ecosystem's general-purpose checked 256-bit integer (§9: "a dedicated
//! 256-bit unsigned type with checked arithmetic; silent wrap is a
//! correctness bug").

use header_relay_common::error::{CoreError, CoreResult};
use primitive_types::U256;

/// The exponent/mantissa pair packed into Bitcoin-style "compact" 4 bytes
/// (§4.1, §glossary). Used here only for the `MAX_TARGET` configuration
/// constant (§6) — see DESIGN.md for why header-wire `difficulty` is not
/// compact-encoded.
pub type Compact = [u8; 4];

/// Unpacks a compact target into its expanded 256-bit form.
///
/// The top byte is an exponent `e` in `[0, 32]`; the low three bytes are an
/// unsigned mantissa `m`. The expanded target is `m << 8*(e-3)` when `e >= 3`,
/// else `m >> 8*(3-e)`.
pub fn compact_to_target(compact: Compact) -> CoreResult<U256> {
    let word = u32::from_be_bytes(compact);
    let exponent = word >> 24;
    let mantissa = word & 0x00ff_ffff;

    if exponent > 32 {
        return Err(CoreError::CompactOverflow(word));
    }

    if mantissa == 0 {
        return Ok(U256::zero());
    }

    let mantissa_bits = 32 - mantissa.leading_zeros();

    if exponent >= 3 {
        let shift = 8 * (exponent - 3);
        if shift + mantissa_bits > 256 {
            return Err(CoreError::CompactOverflow(word));
        }
        Ok(U256::from(mantissa) << (shift as usize))
    } else {
        let shift = 8 * (3 - exponent);
        Ok(U256::from(mantissa) >> (shift as usize))
    }
}

/// Packs an expanded 256-bit target into its canonical compact form: the
/// smallest exponent such that the mantissa fits in 24 bits with the top bit
/// clear, shifting down a byte (and bumping the exponent) when the top bit
/// would otherwise be set. Matches the Bitcoin-family "nBits" encoding.
pub fn target_to_compact(target: U256) -> Compact {
    if target.is_zero() {
        return [0, 0, 0, 0];
    }

    let mut size = ((target.bits() + 7) / 8) as u32;
    let mut compact: u64 = if size <= 3 {
        target.low_u64() << (8 * (3 - size))
    } else {
        (target >> (8 * (size - 3)) as usize).low_u64()
    };

    // top bit of the 3-byte mantissa doubles as a sign bit in this family of
    // encodings; shift down a byte and bump the exponent to keep it clear.
    if compact & 0x0080_0000 != 0 {
        compact >>= 8;
        size += 1;
    }

    let word = (compact as u32) | (size << 24);
    word.to_be_bytes()
}

/// `difficulty = U256_MAX / target` (integer division). `target` must be
/// non-zero.
pub fn target_to_difficulty(target: U256) -> CoreResult<U256> {
    if target.is_zero() {
        return Err(CoreError::ZeroTarget);
    }
    Ok(U256::MAX / target)
}

/// The symmetric inverse of [`target_to_difficulty`]: `target = U256_MAX /
/// difficulty`. `difficulty` must be non-zero.
pub fn difficulty_to_target(difficulty: U256) -> CoreResult<U256> {
    if difficulty.is_zero() {
        return Err(CoreError::ZeroTarget);
    }
    Ok(U256::MAX / difficulty)
}

/// `hash < target` — the PoW acceptance rule (§4.1, §4.5 step 5).
pub fn pow_passes(hash: U256, target: U256) -> bool {
    hash < target
}
