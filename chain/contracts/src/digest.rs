//! Commitment digests
//!
//! A commitment is the SHA-256 digest of whatever payload the submitter
//! chooses to hide. The contract never interprets the digest; it only
//! recomputes it at reveal time and compares.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

/// Fixed-width commitment digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CommitmentHash([u8; 32]);

impl CommitmentHash {
    pub const LEN: usize = 32;

    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Hex encoding with a `0x` prefix.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Whether `payload` hashes to this commitment.
    pub fn matches(&self, payload: &[u8]) -> bool {
        digest(payload) == *self
    }
}

impl fmt::Display for CommitmentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for CommitmentHash {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let stripped = s.strip_prefix("0x").unwrap_or(s);
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(stripped, &mut bytes)?;
        Ok(Self(bytes))
    }
}

impl Serialize for CommitmentHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for CommitmentHash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Compute the commitment digest of a payload.
pub fn digest(payload: &[u8]) -> CommitmentHash {
    let mut hasher = Sha256::new();
    hasher.update(payload);
    CommitmentHash(hasher.finalize().into())
}

/// Build the `"<text> {<salt>}"` payload form used by the reference client.
///
/// The salt only makes short predictions harder to brute force; it is the
/// caller's job to generate it and keep it.
pub fn salted_payload(text: &str, salt: &str) -> Vec<u8> {
    format!("{} {{{}}}", text, salt).into_bytes()
}
