//! File utilities: YAML/JSON configuration, binary artifacts, directories
//! and file sizes.
//!
//! - `common`   – [`FileUtils`], the operations pipeline stages call.
//! - `binary`   – the `MLPB` envelope wrapped around CBOR payloads.
//! - `validate` – argument checks performed before any I/O.

pub mod binary;
pub mod common;
pub mod validate;

pub use common::FileUtils;
