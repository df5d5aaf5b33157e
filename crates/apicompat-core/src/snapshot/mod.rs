//! Snapshot loading boundary.
//!
//! ## Responsibilities
//!
//! - Decode JSON snapshot documents into validated [`SnapshotBundle`]s
//! - Encode bundles back into documents
//!
//! ## Non-Responsibilities
//!
//! - Extracting declarations from source code (done by an external front-end)
//! - Comparison (handled by `compare` and `diff`)
//!
//! [`SnapshotBundle`]: crate::model::SnapshotBundle

pub mod codec;

pub use codec::{
    encode_snapshot, from_document, parse_snapshot_bytes, parse_snapshot_file, to_document,
    PackageDocument, SnapshotDocument, TypeDocument, SCHEMA_VERSION,
};
