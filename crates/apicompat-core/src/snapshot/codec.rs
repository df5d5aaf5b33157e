//! JSON snapshot documents.
//!
//! The document is the contract with whatever front-end extracted the
//! exported declarations. Decoding validates eagerly: a document either
//! yields fully built snapshots or an error, never a partial bundle.

use crate::errors::{ApiCompatError, ExError, ExErrorKind, Result};
use crate::model::{FunctionDecl, Snapshot, SnapshotBundle, TypeDecl, TypeShape, ValueDecl};
use crate::{log_op_end, log_op_error, log_op_start};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;
use std::path::Path;

/// The only document version this build reads and writes.
pub const SCHEMA_VERSION: u32 = 1;

/// Top-level snapshot document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotDocument {
    pub schema_version: u32,
    #[serde(default)]
    pub packages: Vec<PackageDocument>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageDocument {
    pub path: String,
    #[serde(default)]
    pub functions: Vec<FunctionDecl>,
    #[serde(default)]
    pub types: Vec<TypeDocument>,
    #[serde(default)]
    pub values: Vec<ValueDecl>,
}

/// Types list their members as arrays; maps are built while decoding so
/// repeated member names can be rejected instead of silently overwritten.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDocument {
    pub name: String,
    pub underlying: TypeShape,
    #[serde(default)]
    pub methods: Vec<FunctionDecl>,
    #[serde(default)]
    pub free_funcs: Vec<FunctionDecl>,
}

/// Decode and validate a snapshot document.
///
/// # Errors
///
/// - `InvalidSnapshot`: not UTF-8, not JSON, wrong shape, or a non-integer
///   `schema_version`
/// - `UnsupportedSchema`: `schema_version` is not [`SCHEMA_VERSION`]
/// - `DuplicateDeclaration`: repeated names within a category, a type's
///   member list, or the package list
/// - `InvalidDeclaration`: dotted names or malformed variadic signatures
pub fn parse_snapshot_bytes(bytes: &[u8]) -> Result<SnapshotBundle> {
    log_op_start!("parse_snapshot_bytes", byte_len = bytes.len());
    let start = std::time::Instant::now();

    let bundle = parse_snapshot_bytes_impl(bytes).map_err(|e| {
        log_op_error!(
            "parse_snapshot_bytes",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64
        );
        e
    })?;

    log_op_end!(
        "parse_snapshot_bytes",
        duration_ms = start.elapsed().as_millis() as u64,
        package_count = bundle.len()
    );
    Ok(bundle)
}

fn parse_snapshot_bytes_impl(bytes: &[u8]) -> Result<SnapshotBundle> {
    let text = std::str::from_utf8(bytes).map_err(|e| {
        invalid_snapshot(format!("snapshot is not valid UTF-8: {}", e))
    })?;

    let raw: Value = serde_json::from_str(text)
        .map_err(|e| invalid_snapshot(format!("snapshot is not valid JSON: {}", e)))?;

    let obj = raw
        .as_object()
        .ok_or_else(|| invalid_snapshot("snapshot JSON root must be an object"))?;

    let version = match obj.get("schema_version") {
        None => return Err(invalid_snapshot("required field `schema_version` is absent")),
        Some(v) => v.as_u64().ok_or_else(|| {
            invalid_snapshot(format!("`schema_version` must be an unsigned integer, got: {}", v))
        })?,
    };
    if version != u64::from(SCHEMA_VERSION) {
        let found = u32::try_from(version).unwrap_or(u32::MAX);
        return Err(ExError::from(ApiCompatError::UnsupportedSchema {
            found,
            expected: SCHEMA_VERSION,
        })
        .with_op("parse_snapshot_bytes"));
    }

    let document: SnapshotDocument = serde_json::from_value(raw)
        .map_err(|e| invalid_snapshot(format!("failed to deserialize snapshot: {}", e)))?;

    from_document(document).map_err(|e| e.with_op("parse_snapshot_bytes"))
}

/// Read and decode a snapshot file.
///
/// # Errors
///
/// `Io` if the file cannot be read, otherwise as [`parse_snapshot_bytes`].
pub fn parse_snapshot_file(path: &Path) -> Result<SnapshotBundle> {
    let bytes = std::fs::read(path).map_err(|e| {
        ExError::new(ExErrorKind::Io)
            .with_op("parse_snapshot_file")
            .with_message(format!("cannot read {}: {}", path.display(), e))
    })?;
    parse_snapshot_bytes(&bytes).map_err(|e| {
        let kind = e.kind();
        ExError::new(kind)
            .with_op("parse_snapshot_file")
            .with_message(format!("in {}", path.display()))
            .with_source(e)
    })
}

/// Build validated snapshots from a decoded document.
///
/// # Errors
///
/// Same validation errors as [`parse_snapshot_bytes`].
pub fn from_document(document: SnapshotDocument) -> Result<SnapshotBundle> {
    let mut bundle = SnapshotBundle::new();
    for package in document.packages {
        let path = package.path;
        let mut builder = Snapshot::builder(path.clone());
        for func in package.functions {
            builder = builder.function(func);
        }
        for ty in package.types {
            builder = builder.type_decl(type_from_document(&path, ty)?);
        }
        for value in package.values {
            builder = builder.value(value);
        }
        bundle.insert(builder.build()?)?;
    }
    Ok(bundle)
}

fn type_from_document(path: &str, doc: TypeDocument) -> Result<TypeDecl> {
    check_unique_members(path, &doc.name, "method", &doc.methods)?;
    check_unique_members(path, &doc.name, "function", &doc.free_funcs)?;

    let mut decl = TypeDecl::new(doc.name, doc.underlying);
    for method in doc.methods {
        decl = decl.with_method(method);
    }
    for func in doc.free_funcs {
        decl = decl.with_free_func(func);
    }
    Ok(decl)
}

fn check_unique_members(
    path: &str,
    type_name: &str,
    category: &'static str,
    members: &[FunctionDecl],
) -> Result<()> {
    let mut seen = BTreeSet::new();
    for member in members {
        if !seen.insert(member.name.as_str()) {
            return Err(ApiCompatError::DuplicateDeclaration {
                package: path.to_string(),
                category,
                name: format!("{}.{}", type_name, member.name),
            }
            .into());
        }
    }
    Ok(())
}

/// Document form of a bundle. Members come out sorted by name.
pub fn to_document(bundle: &SnapshotBundle) -> SnapshotDocument {
    let packages = bundle
        .packages()
        .values()
        .map(|snapshot| PackageDocument {
            path: snapshot.path().to_string(),
            functions: snapshot.functions().values().cloned().collect(),
            types: snapshot
                .types()
                .values()
                .map(|t| TypeDocument {
                    name: t.name.clone(),
                    underlying: t.underlying.clone(),
                    methods: t.methods.values().cloned().collect(),
                    free_funcs: t.free_funcs.values().cloned().collect(),
                })
                .collect(),
            values: snapshot.values().values().cloned().collect(),
        })
        .collect();
    SnapshotDocument {
        schema_version: SCHEMA_VERSION,
        packages,
    }
}

/// Encode a bundle as pretty-printed JSON.
///
/// # Errors
///
/// `Serialization` if encoding fails.
pub fn encode_snapshot(bundle: &SnapshotBundle) -> Result<Vec<u8>> {
    serde_json::to_vec_pretty(&to_document(bundle)).map_err(|e| {
        ExError::from(ApiCompatError::from(e)).with_op("encode_snapshot")
    })
}

fn invalid_snapshot(message: impl Into<String>) -> ExError {
    ExError::new(ExErrorKind::InvalidSnapshot)
        .with_op("parse_snapshot_bytes")
        .with_message(message)
}
