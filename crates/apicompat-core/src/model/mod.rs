pub mod decl;
pub mod snapshot;
pub mod types;

pub use decl::{Category, Declaration, FunctionDecl, TypeDecl, ValueDecl};
pub use snapshot::{Snapshot, SnapshotBuilder, SnapshotBundle};
pub use types::{is_exported, BasicKind, ChanDir, Field, Signature, TypeShape};
