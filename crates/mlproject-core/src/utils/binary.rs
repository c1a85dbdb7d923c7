//! Envelope format for binary artifacts (trained models, intermediate results).
//!
//! File layout:
//! ```text
//! [magic:4 = "MLPB"][version:1][reserved:1][CBOR payload:N]
//! ```
//!
//! The payload is CBOR written by `ciborium`.  CBOR is self-describing, so
//! values whose `Deserialize` impl asks for `deserialize_any` (a
//! [`crate::ConfigBox`], `serde_json::Value`, untagged or internally tagged
//! enums, `#[serde(flatten)]` fields) come back exactly as they were stored.
//! Non-finite floats survive the round trip as well.
//!
//! The header lets [`decode_artifact`] reject files from another writer (or
//! another format version) instead of misreading them.  Version 1 files
//! carried a bincode payload and are rejected as unsupported.

use std::io;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

/// File signature at the start of every artifact.
pub const MAGIC: [u8; 4] = *b"MLPB";

/// Current envelope version.
pub const FORMAT_VERSION: u8 = 2;

/// Total header size in bytes.
pub const HEADER_SIZE: usize = 6;

/// Errors from encoding or decoding an artifact's bytes.
#[derive(Debug, Error)]
pub enum ArtifactError {
    /// The header is missing, truncated, or from an unknown writer/version.
    #[error("{0}")]
    Header(String),

    /// The value could not be written as CBOR.
    #[error(transparent)]
    Encode(#[from] ciborium::ser::Error<io::Error>),

    /// The payload is not valid CBOR for the requested type.
    #[error(transparent)]
    Decode(#[from] ciborium::de::Error<io::Error>),
}

/// Serializes `value` behind the artifact header.
///
/// # Errors
///
/// [`ArtifactError::Encode`] if `value` cannot be serialized.
pub fn encode_artifact<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, ArtifactError> {
    let mut buf = Vec::with_capacity(HEADER_SIZE + 64);
    buf.extend_from_slice(&MAGIC);
    buf.push(FORMAT_VERSION);
    buf.push(0x00); // reserved
    ciborium::ser::into_writer(value, &mut buf)?;
    Ok(buf)
}

/// Checks the header and deserializes the payload.
///
/// # Errors
///
/// [`ArtifactError::Header`] for foreign or truncated files,
/// [`ArtifactError::Decode`] when the payload does not decode as `T`.
pub fn decode_artifact<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, ArtifactError> {
    if bytes.len() < HEADER_SIZE {
        return Err(ArtifactError::Header(format!(
            "file is {} bytes, shorter than the {HEADER_SIZE}-byte header",
            bytes.len()
        )));
    }
    if bytes[..4] != MAGIC {
        return Err(ArtifactError::Header(
            "missing MLPB signature (not written by save_bin)".to_string(),
        ));
    }
    if bytes[4] != FORMAT_VERSION {
        return Err(ArtifactError::Header(format!(
            "unsupported format version {} (expected {FORMAT_VERSION})",
            bytes[4]
        )));
    }
    Ok(ciborium::de::from_reader(&bytes[HEADER_SIZE..])?)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
