//! Argument checks run at the top of every file utility, before any I/O.
//!
//! The compiler already guarantees that a path argument is path-like and a
//! list argument is a list.  What remains are shape problems the type system
//! cannot see: empty paths, paths with interior NUL bytes, and values that
//! serialize to something other than a mapping.

use std::path::Path;

use serde_json::Value;

use crate::domain::config_box::value_kind;
use crate::error::{Result, UtilsError};

/// Rejects empty paths and paths containing a NUL byte.
///
/// # Errors
///
/// Returns [`UtilsError::TypeMismatch`] naming `param`.
pub fn ensure_path(path: &Path, param: &'static str) -> Result<()> {
    let raw = path.as_os_str();
    let found = if raw.is_empty() {
        "an empty path"
    } else if raw.to_string_lossy().contains('\0') {
        "a path containing a NUL byte"
    } else {
        return Ok(());
    };
    Err(UtilsError::TypeMismatch {
        param: param.to_string(),
        expected: "a non-empty file system path",
        found: found.to_string(),
    })
}

/// Applies [`ensure_path`] to every element; the first bad one wins.
///
/// # Errors
///
/// Returns [`UtilsError::TypeMismatch`] with the element index in `param`.
pub fn ensure_paths<P: AsRef<Path>>(paths: &[P], param: &'static str) -> Result<()> {
    for (i, path) in paths.iter().enumerate() {
        ensure_path(path.as_ref(), param).map_err(|err| match err {
            UtilsError::TypeMismatch {
                expected, found, ..
            } => UtilsError::TypeMismatch {
                param: format!("{param}[{i}]"),
                expected,
                found,
            },
            other => other,
        })?;
    }
    Ok(())
}

/// Requires a JSON object.
///
/// # Errors
///
/// Returns [`UtilsError::TypeMismatch`] naming `param`.
pub fn ensure_mapping(value: &Value, param: &'static str) -> Result<()> {
    if value.is_object() {
        return Ok(());
    }
    Err(UtilsError::TypeMismatch {
        param: param.to_string(),
        expected: "a mapping",
        found: value_kind(value).to_string(),
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
