//! Item name validation.
//!
//! Every storage operation runs its target name through [`validate`] before
//! touching the content store. The policy is deliberately stricter than any
//! filesystem: it is the only line of defense against path traversal and key
//! injection, so it must hold regardless of what the backend would accept.

use crate::error::StorageError;

/// Maximum accepted item name length in bytes.
pub const MAX_NAME_LEN: usize = 64;

/// Checks a candidate item name against the naming policy.
///
/// A name is valid iff it is 1 to 64 characters long and every character is
/// an ASCII letter, digit, underscore, or hyphen. Anything else, including
/// path separators, dots, spaces, and non-ASCII characters, is rejected.
///
/// Pure and deterministic; performs no I/O.
pub fn validate(name: &str) -> Result<(), StorageError> {
    if name.is_empty() || name.len() > MAX_NAME_LEN {
        return Err(StorageError::invalid_name(name));
    }

    if !name
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
    {
        return Err(StorageError::invalid_name(name));
    }

    Ok(())
}
