//! Immutable snapshots of a package's exported surface.
//!
//! Snapshots are built eagerly through [`SnapshotBuilder`], which validates
//! every declaration before the snapshot exists. Comparators only ever see
//! fully built values.

use crate::errors::{ApiCompatError, ExError, Result};
use crate::model::decl::{Category, FunctionDecl, TypeDecl, ValueDecl};
use crate::model::types::TypeShape;
use serde::Serialize;
use sha2::{Digest as _, Sha256};
use std::collections::BTreeMap;

/// The exported declarations of one package at one revision.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    path: String,
    functions: BTreeMap<String, FunctionDecl>,
    types: BTreeMap<String, TypeDecl>,
    values: BTreeMap<String, ValueDecl>,
}

impl Snapshot {
    /// A snapshot with no declarations.
    pub fn empty(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn builder(path: impl Into<String>) -> SnapshotBuilder {
        SnapshotBuilder::new(path)
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn functions(&self) -> &BTreeMap<String, FunctionDecl> {
        &self.functions
    }

    pub fn types(&self) -> &BTreeMap<String, TypeDecl> {
        &self.types
    }

    pub fn values(&self) -> &BTreeMap<String, ValueDecl> {
        &self.values
    }

    pub fn function(&self, name: &str) -> Option<&FunctionDecl> {
        self.functions.get(name)
    }

    pub fn type_decl(&self, name: &str) -> Option<&TypeDecl> {
        self.types.get(name)
    }

    pub fn value(&self, name: &str) -> Option<&ValueDecl> {
        self.values.get(name)
    }

    /// Underlying shape of a type declared in this snapshot.
    pub fn underlying_of(&self, name: &str) -> Option<&TypeShape> {
        self.types.get(name).map(|t| &t.underlying)
    }

    /// Number of top-level declarations.
    pub fn len(&self) -> usize {
        self.functions.len() + self.types.len() + self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// SHA-256 (hex) of the canonical JSON encoding.
    ///
    /// # Errors
    ///
    /// `Serialization` if the snapshot cannot be encoded.
    pub fn digest(&self) -> Result<String> {
        let canonical = serde_json::to_vec(self).map_err(ApiCompatError::from)?;
        let mut hasher = Sha256::new();
        hasher.update(&canonical);
        Ok(hex::encode(hasher.finalize()))
    }
}

/// Collects declarations and validates them into a [`Snapshot`].
#[derive(Debug, Clone)]
pub struct SnapshotBuilder {
    path: String,
    functions: Vec<FunctionDecl>,
    types: Vec<TypeDecl>,
    values: Vec<ValueDecl>,
}

impl SnapshotBuilder {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            functions: Vec::new(),
            types: Vec::new(),
            values: Vec::new(),
        }
    }

    pub fn function(mut self, decl: FunctionDecl) -> Self {
        self.functions.push(decl);
        self
    }

    pub fn type_decl(mut self, decl: TypeDecl) -> Self {
        self.types.push(decl);
        self
    }

    pub fn value(mut self, decl: ValueDecl) -> Self {
        self.values.push(decl);
        self
    }

    /// Validate and freeze.
    ///
    /// # Errors
    ///
    /// - `DuplicateDeclaration`: a name repeats within a category, or a type
    ///   has a method and a free function with the same name
    /// - `InvalidDeclaration`: a dotted name or a malformed variadic signature
    pub fn build(self) -> Result<Snapshot> {
        let path = self.path;

        let mut functions = BTreeMap::new();
        for decl in self.functions {
            check_function(&path, &decl.name, &decl)?;
            insert_unique(&path, Category::Function, &mut functions, decl.name.clone(), decl)?;
        }

        let mut types = BTreeMap::new();
        for decl in self.types {
            check_name(&path, &decl.name)?;
            for (member, method) in &decl.methods {
                check_function(&path, &format!("{}.{}", decl.name, member), method)?;
            }
            for (member, func) in &decl.free_funcs {
                check_function(&path, &format!("{}.{}", decl.name, member), func)?;
                if decl.methods.contains_key(member) {
                    return Err(ApiCompatError::MemberNameClash {
                        package: path.clone(),
                        type_name: decl.name.clone(),
                        member: member.clone(),
                    }
                    .into());
                }
            }
            insert_unique(&path, Category::Type, &mut types, decl.name.clone(), decl)?;
        }

        let mut values = BTreeMap::new();
        for decl in self.values {
            check_name(&path, &decl.name)?;
            insert_unique(&path, Category::Value, &mut values, decl.name.clone(), decl)?;
        }

        Ok(Snapshot {
            path,
            functions,
            types,
            values,
        })
    }
}

fn insert_unique<D>(
    path: &str,
    category: Category,
    map: &mut BTreeMap<String, D>,
    name: String,
    decl: D,
) -> Result<()> {
    if map.contains_key(&name) {
        return Err(ApiCompatError::DuplicateDeclaration {
            package: path.to_string(),
            category: category.as_str(),
            name,
        }
        .into());
    }
    map.insert(name, decl);
    Ok(())
}

fn check_name(path: &str, name: &str) -> Result<()> {
    if name.is_empty() || name.contains('.') {
        return Err(ApiCompatError::InvalidName {
            package: path.to_string(),
            name: name.to_string(),
        }
        .into());
    }
    Ok(())
}

fn check_function(path: &str, display_name: &str, decl: &FunctionDecl) -> Result<()> {
    check_name(path, &decl.name)?;
    if !decl.signature.is_well_formed() {
        return Err(ApiCompatError::InvalidVariadic {
            package: path.to_string(),
            name: display_name.to_string(),
        }
        .into());
    }
    Ok(())
}

/// Snapshots of several packages at the same revision, keyed by path.
///
/// Package digests are taken on insert, so the bundle digest is always
/// available without re-encoding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SnapshotBundle {
    packages: BTreeMap<String, Snapshot>,
    #[serde(skip)]
    digests: BTreeMap<String, String>,
}

impl SnapshotBundle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a package.
    ///
    /// # Errors
    ///
    /// `DuplicateDeclaration` if the path is already present,
    /// `Serialization` if the snapshot cannot be digested.
    pub fn insert(&mut self, snapshot: Snapshot) -> Result<()> {
        if self.packages.contains_key(snapshot.path()) {
            return Err(ApiCompatError::DuplicatePackage {
                package: snapshot.path().to_string(),
            }
            .into());
        }
        let digest = snapshot.digest()?;
        self.digests.insert(snapshot.path().to_string(), digest);
        self.packages.insert(snapshot.path().to_string(), snapshot);
        Ok(())
    }

    pub fn get(&self, path: &str) -> Option<&Snapshot> {
        self.packages.get(path)
    }

    pub fn packages(&self) -> &BTreeMap<String, Snapshot> {
        &self.packages
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// SHA-256 (hex) over all package paths and their digests.
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        for (path, digest) in &self.digests {
            hasher.update(path.as_bytes());
            hasher.update([0u8]);
            hasher.update(digest.as_bytes());
            hasher.update([b'\n']);
        }
        hex::encode(hasher.finalize())
    }
}

impl TryFrom<Snapshot> for SnapshotBundle {
    type Error = ExError;

    fn try_from(snapshot: Snapshot) -> Result<Self> {
        let mut bundle = SnapshotBundle::new();
        bundle.insert(snapshot)?;
        Ok(bundle)
    }
}
