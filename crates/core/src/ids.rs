//! Record identifiers and sharded-path derivation.
//!
//! StoryXcel stores records under sharded directories derived from a UUID. To
//! keep path derivation deterministic, identifiers use a canonical form of
//! **32 lowercase hexadecimal characters** (no hyphens), the same value
//! `Uuid::new_v4().simple()` produces.
//!
//! For a canonical id `u`, a record lives under
//! `parent_dir/<u[0..2]>/<u[2..4]>/<u>/`, which bounds per-directory fan-out.
//!
//! Externally supplied identifiers (CLI arguments, API path segments) must
//! already be canonical; [`RecordId::parse`] rejects hyphenated, uppercase or
//! otherwise non-canonical forms rather than normalising them.

use crate::{StoryError, StoryResult};
use std::fmt;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// A validated record identifier in canonical 32-hex form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RecordId(Uuid);

impl RecordId {
    /// Generates a fresh identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Validates an externally supplied identifier.
    ///
    /// # Errors
    ///
    /// Returns [`StoryError::InvalidInput`] unless `input` is exactly 32
    /// lowercase hex characters.
    pub fn parse(input: &str) -> StoryResult<Self> {
        if !Self::is_canonical(input) {
            return Err(StoryError::InvalidInput(format!(
                "record id must be 32 lowercase hex characters without hyphens, got: '{input}'"
            )));
        }
        let uuid = Uuid::parse_str(input).map_err(|e| {
            StoryError::InvalidInput(format!("record id failed to parse as UUID: {e}"))
        })?;
        Ok(Self(uuid))
    }

    /// Purely syntactic canonical-form check.
    pub fn is_canonical(input: &str) -> bool {
        input.len() == 32
            && input
                .bytes()
                .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
    }

    /// Returns the canonical 32-hex string.
    pub fn canonical(&self) -> String {
        self.0.simple().to_string()
    }

    /// Derives the sharded directory for this id under `parent_dir`.
    ///
    /// Layout: `parent_dir/<hex[0..2]>/<hex[2..4]>/<hex>`.
    pub fn sharded_dir(&self, parent_dir: &Path) -> PathBuf {
        let hex = self.canonical();
        parent_dir.join(&hex[0..2]).join(&hex[2..4]).join(&hex)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

impl serde::Serialize for RecordId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.canonical())
    }
}

impl<'de> serde::Deserialize<'de> for RecordId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        RecordId::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_canonical() {
        let id = RecordId::generate();
        assert!(RecordId::is_canonical(&id.canonical()));
    }

    #[test]
    fn parse_accepts_canonical_form() {
        let id = RecordId::parse("550e8400e29b41d4a716446655440000").unwrap();
        assert_eq!(id.canonical(), "550e8400e29b41d4a716446655440000");
    }

    #[test]
    fn parse_rejects_non_canonical_forms() {
        assert!(RecordId::parse("550e8400-e29b-41d4-a716-446655440000").is_err());
        assert!(RecordId::parse("550E8400E29B41D4A716446655440000").is_err());
        assert!(RecordId::parse("abc").is_err());
        assert!(RecordId::parse("").is_err());
    }

    #[test]
    fn sharded_dir_uses_two_level_prefix() {
        let id = RecordId::parse("550e8400e29b41d4a716446655440000").unwrap();
        let dir = id.sharded_dir(Path::new("data/projects"));
        assert_eq!(
            dir,
            Path::new("data/projects/55/0e/550e8400e29b41d4a716446655440000")
        );
    }

    #[test]
    fn serde_round_trip() {
        let id = RecordId::generate();
        let json = serde_json::to_string(&id).unwrap();
        let back: RecordId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
