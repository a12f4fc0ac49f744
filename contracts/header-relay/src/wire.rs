//! Parameter wire framing (§4.6, §6): ULEB128 varints, length-prefixed byte
//! fields, and the two dispatch parameter structs the native-service runtime
//! hands to the `Handler`.
//!
//! No teacher file speaks this exact framing — `light_client_bitcoin`'s
//! entrypoints take already-typed CosmWasm messages off a deserialized JSON
//! envelope — so this module is grounded directly on §6's "length-prefixed
//! byte stream (zero-copy sink style)" description, with the ULEB128 varint
//! shape borrowed from the same family BCS uses for its own byte-vector
//! length prefixes (`bcs`, already a workspace dependency via
//! `header-relay-core`).

use header_relay_common::bytes::Address16;
use header_relay_common::error::{CoreError, CoreResult};

/// Appends `value` to `buf` as an unsigned LEB128 varint.
pub fn write_uleb(buf: &mut Vec<u8>, mut value: u64) {
    loop {
        let byte = (value & 0x7f) as u8;
        value >>= 7;
        if value != 0 {
            buf.push(byte | 0x80);
        } else {
            buf.push(byte);
            break;
        }
    }
}

/// Reads a ULEB128 varint starting at `*pos`, advancing `*pos` past it.
pub fn read_uleb(bytes: &[u8], pos: &mut usize) -> CoreResult<u64> {
    let mut value: u64 = 0;
    let mut shift = 0u32;
    loop {
        let byte = *bytes
            .get(*pos)
            .ok_or_else(|| CoreError::WireDecodeError("truncated varint".into()))?;
        *pos += 1;
        if shift >= 64 {
            return Err(CoreError::WireDecodeError("varint overflows u64".into()));
        }
        value |= u64::from(byte & 0x7f) << shift;
        if byte & 0x80 == 0 {
            return Ok(value);
        }
        shift += 7;
    }
}

fn read_exact<'a>(bytes: &'a [u8], pos: &mut usize, len: usize) -> CoreResult<&'a [u8]> {
    let end = pos
        .checked_add(len)
        .ok_or_else(|| CoreError::WireDecodeError("length overflow".into()))?;
    let slice = bytes
        .get(*pos..end)
        .ok_or_else(|| CoreError::WireDecodeError("truncated field".into()))?;
    *pos = end;
    Ok(slice)
}

fn read_u64_le(bytes: &[u8], pos: &mut usize) -> CoreResult<u64> {
    let slice = read_exact(bytes, pos, 8)?;
    Ok(u64::from_le_bytes(slice.try_into().unwrap()))
}

fn write_bytes_uleb(buf: &mut Vec<u8>, value: &[u8]) {
    write_uleb(buf, value.len() as u64);
    buf.extend_from_slice(value);
}

fn read_bytes_uleb(bytes: &[u8], pos: &mut usize) -> CoreResult<Vec<u8>> {
    let len = read_uleb(bytes, pos)? as usize;
    Ok(read_exact(bytes, pos, len)?.to_vec())
}

/// The decoded parameter for `SyncGenesisHeader` (§4.6).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SyncGenesisHeaderParam {
    pub chain_id: u64,
    pub genesis_header: Vec<u8>,
}

impl SyncGenesisHeaderParam {
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.extend_from_slice(&self.chain_id.to_le_bytes());
        write_bytes_uleb(&mut buf, &self.genesis_header);
        buf
    }

    pub fn decode(bytes: &[u8]) -> CoreResult<Self> {
        let mut pos = 0;
        let chain_id = read_u64_le(bytes, &mut pos)?;
        let genesis_header = read_bytes_uleb(bytes, &mut pos)?;
        Ok(Self {
            chain_id,
            genesis_header,
        })
    }
}

/// The decoded parameter for `SyncBlockHeader` (§4.6).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SyncBlockHeaderParam {
    pub chain_id: u64,
    pub address: Address16,
    pub headers: Vec<Vec<u8>>,
}

impl SyncBlockHeaderParam {
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.extend_from_slice(&self.chain_id.to_le_bytes());
        buf.extend_from_slice(self.address.as_bytes());
        write_uleb(&mut buf, self.headers.len() as u64);
        for header in &self.headers {
            write_bytes_uleb(&mut buf, header);
        }
        buf
    }

    pub fn decode(bytes: &[u8]) -> CoreResult<Self> {
        let mut pos = 0;
        let chain_id = read_u64_le(bytes, &mut pos)?;
        let address_bytes = read_exact(bytes, &mut pos, Address16::LEN)?;
        let address = Address16::from_slice(address_bytes)
            .expect("read_exact guarantees the correct length");
        let count = read_uleb(bytes, &mut pos)?;
        let mut headers = Vec::with_capacity(count as usize);
        for _ in 0..count {
            headers.push(read_bytes_uleb(bytes, &mut pos)?);
        }
        Ok(Self {
            chain_id,
            address,
            headers,
        })
    }
}
