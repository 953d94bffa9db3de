//! Ethereum addresses derived from secp256k1 public keys

use crate::error::{DripError, DripResult};
use alloy_primitives::Address;
use k256::ecdsa::VerifyingKey;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;


/// A 20-byte account address. `Display` renders the EIP-55 checksummed form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EthAddress(Address);

impl EthAddress {

    /// Last 20 bytes of Keccak-256 over the uncompressed point, 0x04 tag dropped.
    pub fn from_public_key(public_key: &VerifyingKey) -> Self {
        Self(Address::from_public_key(public_key))
    }

    pub fn to_checksum(&self) -> String {
        self.0.to_checksum(None)
    }
}

impl fmt::Display for EthAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_checksum())
    }
}

impl FromStr for EthAddress {
    type Err = DripError;

    fn from_str(s: &str) -> DripResult<Self> {
        let address = Address::from_str(s)
            .map_err(|e| DripError::Config(format!("Invalid address {}: {}", s, e)))?;

        // Single-case input carries no checksum.
        let digits = s.strip_prefix("0x").unwrap_or(s);
        let mixed_case = digits.chars().any(|c| c.is_ascii_lowercase())
            && digits.chars().any(|c| c.is_ascii_uppercase());
        if mixed_case && address.to_checksum(None)[2..] != *digits {
            return Err(DripError::Config(format!("Address checksum mismatch: {}", s)));
        }

        Ok(Self(address))
    }
}

impl Serialize for EthAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for EthAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
