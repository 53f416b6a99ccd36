//! Content fingerprints.
//!
//! A fingerprint is the lowercase-hex SHA-256 of a region's visible text. It
//! is stored in the beats meta payload and recomputed to detect hand edits,
//! and doubles as the content address for stored assets.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A lowercase-hex SHA-256 digest.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Fingerprints a text value.
    pub fn of_text(text: &str) -> Self {
        Self::of_bytes(text.as_bytes())
    }

    /// Fingerprints raw bytes.
    pub fn of_bytes(bytes: &[u8]) -> Self {
        Self(hex::encode(Sha256::digest(bytes)))
    }

    /// Validates an externally supplied hex digest.
    pub fn parse(input: &str) -> Option<Self> {
        let valid = input.len() == 64
            && input
                .bytes()
                .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'));
        valid.then(|| Self(input.to_owned()))
    }

    /// Returns the digest as a hex string slice.
    pub fn as_hex(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
