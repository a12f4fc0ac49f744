//! `Header` JSON ingest and the canonical binary codec (§4.2).
//!
//! The teacher decodes `bitcoin::BlockHeader` off the wire with
//! `bitcoin::consensus::encode::deserialize` and wraps it in
//! `WrappedHeader`. There is no foreign wire type here to lean on, so JSON
//! ingest is hand-rolled against `serde_json::Value` (the derived
//! `Header: Deserialize` impl in `header.rs` is the *binary*-form shape —
//! fixed-size byte arrays and a fixed 32-byte `difficulty`, not the flexible
//! decimal-or-hex wire strings `parse_json` must accept). The canonical
//! binary form, in contrast, is exactly `Header`'s derived `Serialize` shape,
//! so `to_binary`/`from_binary` delegate straight to `bcs`.

use header_relay_common::bytes::{Address16, Hash32};
use header_relay_common::error::{CoreError, CoreResult};
use header_relay_common::host::HostEnv;
use primitive_types::U256;
use serde_json::Value;

use crate::config::{BLOCK_HASH_DOMAIN, SEAL_HASH_DOMAIN};
use crate::header::Header;

/// Parses the JSON ingest form (§4.2) into a `Header`.
///
/// Decimal-or-string integers (`timestamp`, `number`, `gas_used`, `nonce`)
/// accept either a JSON number or a decimal string; `extra`, `difficulty`,
/// and the 32-byte roots are `0x`-prefixed hex strings; `author_auth_key`
/// may be JSON `null` or absent. `difficulty` is a variable-length
/// big-endian hex integer, the same treatment `extra` gets — not a
/// fixed-width Bitcoin-style compact word (the corpus's own genesis header
/// carries a 3-byte `difficulty`, which a 4-byte compact decode would
/// reject outright).
pub fn parse_json(bytes: &[u8]) -> CoreResult<Header> {
    let value: Value = serde_json::from_slice(bytes)
        .map_err(|e| CoreError::WireDecodeError(format!("invalid JSON: {e}")))?;
    let obj = value
        .as_object()
        .ok_or_else(|| CoreError::WireDecodeError("header JSON must be an object".into()))?;

    let field = |name: &str| -> CoreResult<&Value> {
        obj.get(name)
            .ok_or_else(|| CoreError::WireDecodeError(format!("missing field `{name}`")))
    };

    let parent_hash = hex_hash32(field("parent_hash")?, "parent_hash")?;
    let timestamp = flex_u64(field("timestamp")?, "timestamp")?;
    let number = flex_u64(field("number")?, "number")?;
    let author = hex_address16(field("author")?, "author")?;
    let author_auth_key = match obj.get("author_auth_key") {
        None | Some(Value::Null) => None,
        Some(v) => Some(hex_hash32(v, "author_auth_key")?),
    };
    let txn_accumulator_root = hex_hash32(field("txn_accumulator_root")?, "txn_accumulator_root")?;
    let block_accumulator_root =
        hex_hash32(field("block_accumulator_root")?, "block_accumulator_root")?;
    let state_root = hex_hash32(field("state_root")?, "state_root")?;
    let gas_used = flex_u64(field("gas_used")?, "gas_used")?;
    let difficulty = hex_u256(field("difficulty")?, "difficulty")?;
    let body_hash = hex_hash32(field("body_hash")?, "body_hash")?;
    let chain_id = flex_u64(field("chain_id")?, "chain_id")?;
    let chain_id = u8::try_from(chain_id)
        .map_err(|_| CoreError::WireDecodeError("chain_id out of range".into()))?;
    let nonce = flex_u64(field("nonce")?, "nonce")?;
    let nonce = u32::try_from(nonce)
        .map_err(|_| CoreError::WireDecodeError("nonce out of range".into()))?;
    let extra = match obj.get("extra") {
        None => Vec::new(),
        Some(v) => hex_bytes(v, "extra")?,
    };

    let header = Header {
        parent_hash,
        timestamp,
        number,
        author,
        author_auth_key,
        txn_accumulator_root,
        block_accumulator_root,
        state_root,
        gas_used,
        difficulty,
        body_hash,
        chain_id,
        nonce,
        extra,
    };

    if !header.is_well_formed() {
        return Err(CoreError::WireDecodeError(
            "extra exceeds the maximum allowed length".into(),
        ));
    }

    Ok(header)
}

fn flex_u64(value: &Value, field: &str) -> CoreResult<u64> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .ok_or_else(|| CoreError::WireDecodeError(format!("`{field}` out of range"))),
        Value::String(s) => s
            .parse::<u64>()
            .map_err(|_| CoreError::WireDecodeError(format!("`{field}` is not a decimal string"))),
        _ => Err(CoreError::WireDecodeError(format!(
            "`{field}` must be a number or decimal string"
        ))),
    }
}

fn hex_str<'a>(value: &'a Value, field: &str) -> CoreResult<&'a str> {
    value
        .as_str()
        .ok_or_else(|| CoreError::WireDecodeError(format!("`{field}` must be a hex string")))?
        .strip_prefix("0x")
        .ok_or_else(|| CoreError::WireDecodeError(format!("`{field}` must be `0x`-prefixed")))
}

fn hex_bytes(value: &Value, field: &str) -> CoreResult<Vec<u8>> {
    let s = hex_str(value, field)?;
    hex::decode(s).map_err(|e| CoreError::WireDecodeError(format!("`{field}`: {e}")))
}

fn hex_hash32(value: &Value, field: &str) -> CoreResult<Hash32> {
    let bytes = hex_bytes(value, field)?;
    Hash32::from_slice(&bytes)
        .ok_or_else(|| CoreError::WireDecodeError(format!("`{field}` must be 32 bytes")))
}

fn hex_address16(value: &Value, field: &str) -> CoreResult<Address16> {
    let bytes = hex_bytes(value, field)?;
    Address16::from_slice(&bytes)
        .ok_or_else(|| CoreError::WireDecodeError(format!("`{field}` must be 16 bytes")))
}

/// Reads a variable-length big-endian hex integer, rejecting anything wider
/// than 32 bytes (would not fit `U256`).
fn hex_u256(value: &Value, field: &str) -> CoreResult<U256> {
    let bytes = hex_bytes(value, field)?;
    if bytes.len() > 32 {
        return Err(CoreError::WireDecodeError(format!(
            "`{field}` exceeds 32 bytes"
        )));
    }
    Ok(U256::from_big_endian(&bytes))
}

/// Encodes `header` into the canonical binary form (§4.2): fixed-width
/// little-endian integers, ULEB128-length-prefixed byte vectors, a one-byte
/// presence flag ahead of `author_auth_key`. Field order matches §3.
pub fn to_binary(header: &Header) -> CoreResult<Vec<u8>> {
    bcs::to_bytes(header).map_err(|e| CoreError::BinaryCodecError(e.to_string()))
}

/// The inverse of [`to_binary`]; fails on truncated or trailing-byte input.
pub fn from_binary(bytes: &[u8]) -> CoreResult<Header> {
    bcs::from_bytes(bytes).map_err(|e| CoreError::BinaryCodecError(e.to_string()))
}

/// `block_hash = H(BLOCK_HASH_DOMAIN || to_binary(header))` (§4.2, §6). Pure
/// over the canonical binary form: two equal headers hash identically.
pub fn block_hash(header: &Header, host: &dyn HostEnv) -> CoreResult<Hash32> {
    let encoded = to_binary(header)?;
    Ok(host.hash(BLOCK_HASH_DOMAIN, &encoded))
}

/// The PoW seal hash (§4.5 step 5): `H(SEAL_HASH_DOMAIN || to_binary(header
/// with nonce and extra zeroed) || nonce_le || extra)`. `nonce` and `extra`
/// are excluded from the base encoding and appended raw so that grinding the
/// nonce never needs to re-serialize the rest of the header.
pub fn seal_hash(header: &Header, host: &dyn HostEnv) -> CoreResult<Hash32> {
    let mut base = header.clone();
    base.nonce = 0;
    base.extra = Vec::new();
    let mut preimage = to_binary(&base)?;
    preimage.extend_from_slice(&header.nonce.to_le_bytes());
    preimage.extend_from_slice(&header.extra);
    Ok(host.hash(SEAL_HASH_DOMAIN, &preimage))
}
