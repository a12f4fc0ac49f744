//! Fixed-width byte newtypes used throughout the header relay.
//!
//! Bitcoin-bridge teachers such as `common_bitcoin::adapter::Adapter` wrap
//! foreign library types to give them serde/json-schema impls; here there is
//! no foreign type to wrap, but the same motivation applies per §9's redesign
//! guidance ("opaque byte slices for hashes and addresses should be
//! fixed-width value types to prevent length confusion").

use std::fmt;
use std::ops::Deref;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

macro_rules! fixed_bytes {
    ($name:ident, $len:expr, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
        pub struct $name(pub [u8; $len]);

        impl $name {
            pub const LEN: usize = $len;

            pub const fn zero() -> Self {
                Self([0u8; $len])
            }

            pub fn from_slice(bytes: &[u8]) -> Option<Self> {
                if bytes.len() != $len {
                    return None;
                }
                let mut out = [0u8; $len];
                out.copy_from_slice(bytes);
                Some(Self(out))
            }

            pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
                let s = s.strip_prefix("0x").unwrap_or(s);
                let mut out = [0u8; $len];
                hex::decode_to_slice(s, &mut out)?;
                Ok(Self(out))
            }

            pub fn to_hex(&self) -> String {
                format!("0x{}", hex::encode(self.0))
            }

            pub fn as_bytes(&self) -> &[u8] {
                &self.0
            }
        }

        impl Deref for $name {
            type Target = [u8; $len];

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }

        impl From<[u8; $len]> for $name {
            fn from(bytes: [u8; $len]) -> Self {
                Self(bytes)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.to_hex())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.to_hex())
            }
        }

        impl Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: Serializer,
            {
                self.0.serialize(serializer)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                let bytes = <[u8; $len]>::deserialize(deserializer)?;
                Ok(Self(bytes))
            }
        }
    };
}

fixed_bytes!(Hash32, 32, "A 32-byte hash (block hash, parent hash, roots, body hash).");
fixed_bytes!(Address16, 16, "A 16-byte chain-native address (e.g. a header's `author`).");
fixed_bytes!(
    Address20,
    20,
    "A 20-byte contract address used to namespace storage keys (§4.3, §6)."
);

impl fmt::LowerHex for Hash32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

/// Parses a `0x`-prefixed or bare hex string into raw bytes, failing if the
/// decoded length doesn't match `expected_len`. Used by the JSON codec for
/// variable-length fields such as `extra`.
pub fn decode_hex_exact(s: &str, expected_len: Option<usize>) -> Result<Vec<u8>, hex::FromHexError> {
    let s = s.strip_prefix("0x").unwrap_or(s);
    let bytes = hex::decode(s)?;
    if let Some(len) = expected_len {
        if bytes.len() != len {
            // FromHexError has no "wrong length" variant; reuse OddLength as the
            // closest built-in signal and let callers format their own message.
            return Err(hex::FromHexError::InvalidStringLength);
        }
    }
    Ok(bytes)
}
