//! Input validation utilities.
//!
//! Usernames become path components under the users directory and integration
//! URLs are stored and re-rendered verbatim, so both get conservative
//! character-set checks at the boundary.

use crate::{StoryError, StoryResult};

/// Validates that a username is safe to use as a storage path component.
///
/// - Rejects empty or whitespace-only strings
/// - Bounds the length to avoid pathological inputs
/// - Restricts characters to a conservative ASCII set (no separators, no
///   dots), which rules out path traversal
///
/// # Errors
///
/// Returns [`StoryError::InvalidInput`] if the username is invalid.
pub fn validate_username(username: &str) -> StoryResult<()> {
    const MAX_USERNAME_LEN: usize = 64;

    if username.trim().is_empty() {
        return Err(StoryError::InvalidInput("username cannot be empty".into()));
    }

    if username.len() > MAX_USERNAME_LEN {
        return Err(StoryError::InvalidInput(format!(
            "username exceeds maximum length of {MAX_USERNAME_LEN} characters"
        )));
    }

    let ok = username
        .bytes()
        .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'z' | b'A'..=b'Z' | b'-' | b'_'));

    if !ok {
        return Err(StoryError::InvalidInput(
            "username contains invalid characters (only alphanumeric, '-', '_' allowed)".into(),
        ));
    }

    Ok(())
}

/// Validates an external-tool integration URL.
///
/// Only `https://` URLs with a conservative ASCII character set are accepted.
///
/// # Errors
///
/// Returns [`StoryError::InvalidInput`] if the URL is invalid.
pub fn validate_integration_url(url: &str) -> StoryResult<()> {
    const MAX_URL_LEN: usize = 2048;

    if !url.starts_with("https://") {
        return Err(StoryError::InvalidInput(
            "integration URL must start with https://".into(),
        ));
    }

    if url.len() > MAX_URL_LEN {
        return Err(StoryError::InvalidInput(format!(
            "integration URL exceeds maximum length of {MAX_URL_LEN} characters"
        )));
    }

    let ok = url.bytes().all(|b| {
        matches!(b,
            b'0'..=b'9' | b'a'..=b'z' | b'A'..=b'Z'
            | b'.' | b'-' | b'_' | b'~' | b'/' | b':' | b'?' | b'=' | b'&' | b'%' | b'#' | b'+')
    });

    if !ok {
        return Err(StoryError::InvalidInput(
            "integration URL contains invalid characters".into(),
        ));
    }

    Ok(())
}
