//! Derives a migration's identity from the path of its defining file.
//!
//! Migration files are named `<version>_<description>.<ext>`, e.g.
//! `1_create_index.rs` or `migrations/042_backfill_owner_ids.rs`. The
//! leading digit run is the version, everything after the first underscore
//! (extension stripped) is the description, underscores preserved.

use std::path::Path;

use crate::error::MigrateError;

/// Parse `(version, description)` out of a migration source path.
///
/// A malformed name is an error; it never silently defaults to version 0.
pub fn version_description(path: &str) -> Result<(u64, String), MigrateError> {
    let stem = Path::new(path)
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| bad(path, "no file name"))?;

    let (digits, description) = stem
        .split_once('_')
        .ok_or_else(|| bad(path, "missing '_' separator"))?;

    if digits.is_empty() {
        return Err(bad(path, "empty version prefix"));
    }
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(bad(path, "version prefix is not numeric"));
    }
    let version = digits
        .parse::<u64>()
        .map_err(|_| bad(path, "version does not fit in u64"))?;

    Ok((version, description.to_string()))
}

fn bad(path: &str, reason: &'static str) -> MigrateError {
    MigrateError::BadSourcePath {
        path: path.to_string(),
        reason,
    }
}
