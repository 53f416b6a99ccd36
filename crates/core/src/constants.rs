//! Constants used throughout the StoryXcel core crate.
//!
//! All path, filename and document constants live here so the on-disk layout
//! and the document seed are defined in exactly one place.

use std::time::Duration;

/// Default directory for StoryXcel data when no explicit directory is configured.
pub const DEFAULT_DATA_DIR: &str = "storyxcel_data";

/// Directory name for project records storage.
pub const PROJECTS_DIR_NAME: &str = "projects";

/// Directory name for per-user records storage.
pub const USERS_DIR_NAME: &str = "users";

/// Filename for project JSON records.
pub const PROJECT_JSON_FILENAME: &str = "project.json";

/// Filename for a user's friend list.
pub const FRIENDS_JSON_FILENAME: &str = "friends.json";

/// Filename for a project's asset metadata ledger.
pub const ASSETS_JSON_FILENAME: &str = "assets.json";

/// Directory name for a project's content-addressed asset files.
pub const ASSET_FILES_DIR_NAME: &str = "assets";

/// Filename for a project's external-tool integration records.
pub const INTEGRATIONS_JSON_FILENAME: &str = "integrations.json";

/// Placeholder paragraph appended when a document is seeded or reset.
pub const PLACEHOLDER_PARAGRAPH: &str = "<p>Your story begins here...</p>";

/// Delay used to coalesce overview field edits before rewriting the region.
pub const OVERVIEW_DEBOUNCE: Duration = Duration::from_millis(250);
