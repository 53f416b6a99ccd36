//! Per-user friend lists.
//!
//! Each user's friend list is a JSON file under
//! `<data_dir>/users/<username>/friends.json`. A friend request writes a
//! pending entry into both users' lists; accepting flips both to accepted;
//! removal deletes both sides. Usernames are validated before ever becoming
//! path components.

use crate::config::CoreConfig;
use crate::constants::FRIENDS_JSON_FILENAME;
use crate::repositories::helpers::{read_json, write_json};
use crate::validation::validate_username;
use crate::{StoryError, StoryResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

/// State of a friend relationship, as seen from one user's list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FriendStatus {
    /// This user sent a request that has not been accepted yet.
    Requested,
    /// The other user sent a request awaiting this user's decision.
    Incoming,
    /// Both sides accepted.
    Accepted,
}

/// One entry in a user's friend list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FriendEntry {
    pub user: String,
    pub status: FriendStatus,
    pub since: DateTime<Utc>,
}

/// File-backed friend list operations.
#[derive(Clone)]
pub struct FriendService {
    cfg: Arc<CoreConfig>,
}

impl FriendService {
    pub fn new(cfg: Arc<CoreConfig>) -> Self {
        Self { cfg }
    }

    fn list_path(&self, username: &str) -> PathBuf {
        self.cfg
            .users_dir()
            .join(username)
            .join(FRIENDS_JSON_FILENAME)
    }

    fn load(&self, username: &str) -> StoryResult<Vec<FriendEntry>> {
        let path = self.list_path(username);
        if !path.is_file() {
            return Ok(Vec::new());
        }
        read_json(&path)
    }

    fn store(&self, username: &str, entries: &[FriendEntry]) -> StoryResult<()> {
        let path = self.list_path(username);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(StoryError::StorageDirCreation)?;
        }
        write_json(&path, &entries.to_vec())
    }

    fn upsert_entry(
        &self,
        username: &str,
        other: &str,
        status: FriendStatus,
    ) -> StoryResult<()> {
        let mut entries = self.load(username)?;
        match entries.iter_mut().find(|e| e.user == other) {
            Some(entry) => entry.status = status,
            None => entries.push(FriendEntry {
                user: other.to_owned(),
                status,
                since: Utc::now(),
            }),
        }
        self.store(username, &entries)
    }

    /// Lists a user's friends and pending requests.
    pub fn list(&self, username: &str) -> StoryResult<Vec<FriendEntry>> {
        validate_username(username)?;
        self.load(username)
    }

    /// Sends a friend request from `from` to `to`.
    pub fn request(&self, from: &str, to: &str) -> StoryResult<()> {
        validate_username(from)?;
        validate_username(to)?;
        if from == to {
            return Err(StoryError::InvalidInput(
                "cannot send a friend request to yourself".into(),
            ));
        }
        self.upsert_entry(from, to, FriendStatus::Requested)?;
        self.upsert_entry(to, from, FriendStatus::Incoming)?;
        tracing::info!(from, to, "friend request sent");
        Ok(())
    }

    /// Accepts an incoming request from `other`.
    ///
    /// # Errors
    ///
    /// Returns [`StoryError::InvalidInput`] if there is no incoming request
    /// from `other`.
    pub fn accept(&self, username: &str, other: &str) -> StoryResult<()> {
        validate_username(username)?;
        validate_username(other)?;
        let entries = self.load(username)?;
        let incoming = entries
            .iter()
            .any(|e| e.user == other && e.status == FriendStatus::Incoming);
        if !incoming {
            return Err(StoryError::InvalidInput(format!(
                "no pending friend request from {other}"
            )));
        }
        self.upsert_entry(username, other, FriendStatus::Accepted)?;
        self.upsert_entry(other, username, FriendStatus::Accepted)?;
        Ok(())
    }

    /// Removes a friendship or pending request, both sides.
    pub fn remove(&self, username: &str, other: &str) -> StoryResult<()> {
        validate_username(username)?;
        validate_username(other)?;
        for (owner, gone) in [(username, other), (other, username)] {
            let mut entries = self.load(owner)?;
            entries.retain(|e| e.user != gone);
            self.store(owner, &entries)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> (tempfile::TempDir, FriendService) {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = Arc::new(CoreConfig::new(tmp.path().to_path_buf()).unwrap());
        cfg.ensure_layout().unwrap();
        (tmp, FriendService::new(cfg))
    }

    #[test]
    fn request_creates_mirrored_entries() {
        let (_tmp, service) = service();
        service.request("alice", "bob").unwrap();

        let alice = service.list("alice").unwrap();
        assert_eq!(alice.len(), 1);
        assert_eq!(alice[0].user, "bob");
        assert_eq!(alice[0].status, FriendStatus::Requested);

        let bob = service.list("bob").unwrap();
        assert_eq!(bob[0].user, "alice");
        assert_eq!(bob[0].status, FriendStatus::Incoming);
    }

    #[test]
    fn accept_flips_both_sides() {
        let (_tmp, service) = service();
        service.request("alice", "bob").unwrap();
        service.accept("bob", "alice").unwrap();

        assert_eq!(
            service.list("alice").unwrap()[0].status,
            FriendStatus::Accepted
        );
        assert_eq!(
            service.list("bob").unwrap()[0].status,
            FriendStatus::Accepted
        );
    }

    #[test]
    fn accept_without_request_fails() {
        let (_tmp, service) = service();
        assert!(service.accept("bob", "alice").is_err());
        // The requester cannot accept their own request.
        service.request("alice", "bob").unwrap();
        assert!(service.accept("alice", "bob").is_err());
    }

    #[test]
    fn remove_clears_both_lists() {
        let (_tmp, service) = service();
        service.request("alice", "bob").unwrap();
        service.accept("bob", "alice").unwrap();
        service.remove("alice", "bob").unwrap();
        assert!(service.list("alice").unwrap().is_empty());
        assert!(service.list("bob").unwrap().is_empty());
    }

    #[test]
    fn self_request_and_bad_usernames_rejected() {
        let (_tmp, service) = service();
        assert!(service.request("alice", "alice").is_err());
        assert!(service.request("alice", "../bob").is_err());
        assert!(service.list("has space").is_err());
    }

    #[test]
    fn empty_list_for_unknown_user() {
        let (_tmp, service) = service();
        assert!(service.list("nobody").unwrap().is_empty());
    }
}
