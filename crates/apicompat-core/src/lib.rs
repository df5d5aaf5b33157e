//! apicompat core - API compatibility classification engine
//!
//! This crate decides whether the exported surface of a package changed in a
//! way that breaks callers. It provides:
//! - An immutable type model for exported declarations (functions, types, values)
//! - Structural type, signature and value comparators
//! - A snapshot differ that classifies every declaration as unchanged, added,
//!   removed, compatible or breaking
//! - A JSON snapshot codec with eager validation (the loader boundary)
//! - A compatibility policy loadable from TOML
//! - A plain-text renderer using the `+ - = * !` marks
//!
//! The comparison engine is total: none of the `compare` or `diff` functions
//! can fail. Only decoding, configuration and I/O return [`ExError`].

pub mod compare;
pub mod config;
pub mod diff;
pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod snapshot;

pub use apicompat_core_types as core_types;

// Re-export commonly used types
pub use compare::{compare_types, Compatibility, TypeComparer};
pub use config::{CompatConfig, CompatPolicy};
pub use diff::{diff_bundles, diff_snapshots, BundleChanges, ChangeKind, PackageChanges};
pub use errors::{ApiCompatError, ExError, ExErrorKind, Result};
pub use model::{
    Declaration, Field, FunctionDecl, Signature, Snapshot, SnapshotBundle, TypeDecl, TypeShape,
    ValueDecl,
};
