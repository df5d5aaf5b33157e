//! Type shapes of exported declarations.
//!
//! A [`TypeShape`] is an immutable value tree. Its `Display` output is the
//! canonical textual form used for identity checks, so two shapes that
//! print the same are treated as the same type.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Value-class bits used for untyped-constant matching.
pub(crate) const IS_BOOLEAN: u8 = 1 << 0;
pub(crate) const IS_INTEGER: u8 = 1 << 1;
pub(crate) const IS_UNSIGNED: u8 = 1 << 2;
pub(crate) const IS_FLOAT: u8 = 1 << 3;
pub(crate) const IS_COMPLEX: u8 = 1 << 4;
pub(crate) const IS_STRING: u8 = 1 << 5;
pub(crate) const IS_POINTER: u8 = 1 << 6;

/// Predeclared basic kinds.
///
/// `Byte` and `Rune` are spelled differently from `Uint8` and `Int32` but
/// share their machine representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BasicKind {
    Bool,
    Int,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Uintptr,
    Float32,
    Float64,
    Complex64,
    Complex128,
    String,
    Byte,
    Rune,
    UnsafePointer,
    Nil,
}

impl BasicKind {
    /// Spelling of the typed kind.
    pub fn name(self) -> &'static str {
        match self {
            BasicKind::Bool => "bool",
            BasicKind::Int => "int",
            BasicKind::Int8 => "int8",
            BasicKind::Int16 => "int16",
            BasicKind::Int32 => "int32",
            BasicKind::Int64 => "int64",
            BasicKind::Uint => "uint",
            BasicKind::Uint8 => "uint8",
            BasicKind::Uint16 => "uint16",
            BasicKind::Uint32 => "uint32",
            BasicKind::Uint64 => "uint64",
            BasicKind::Uintptr => "uintptr",
            BasicKind::Float32 => "float32",
            BasicKind::Float64 => "float64",
            BasicKind::Complex64 => "complex64",
            BasicKind::Complex128 => "complex128",
            BasicKind::String => "string",
            BasicKind::Byte => "byte",
            BasicKind::Rune => "rune",
            BasicKind::UnsafePointer => "unsafe.Pointer",
            BasicKind::Nil => "nil",
        }
    }

    /// Spelling of the untyped constant kind with the same value class.
    fn untyped_name(self) -> &'static str {
        match self {
            BasicKind::Bool => "untyped bool",
            BasicKind::Rune | BasicKind::Int32 => "untyped rune",
            BasicKind::Float32 | BasicKind::Float64 => "untyped float",
            BasicKind::Complex64 | BasicKind::Complex128 => "untyped complex",
            BasicKind::String => "untyped string",
            BasicKind::Nil | BasicKind::UnsafePointer => "untyped nil",
            _ => "untyped int",
        }
    }

    /// Value-class bits of this kind.
    pub(crate) fn value_class(self) -> u8 {
        match self {
            BasicKind::Bool => IS_BOOLEAN,
            BasicKind::Int
            | BasicKind::Int8
            | BasicKind::Int16
            | BasicKind::Int32
            | BasicKind::Int64
            | BasicKind::Rune => IS_INTEGER,
            BasicKind::Uint
            | BasicKind::Uint8
            | BasicKind::Uint16
            | BasicKind::Uint32
            | BasicKind::Uint64
            | BasicKind::Uintptr
            | BasicKind::Byte => IS_INTEGER | IS_UNSIGNED,
            BasicKind::Float32 | BasicKind::Float64 => IS_FLOAT,
            BasicKind::Complex64 | BasicKind::Complex128 => IS_COMPLEX,
            BasicKind::String => IS_STRING,
            BasicKind::UnsafePointer | BasicKind::Nil => IS_POINTER,
        }
    }

    /// Machine representation, collapsing the `byte`/`rune` spellings.
    pub fn representation(self) -> BasicKind {
        match self {
            BasicKind::Byte => BasicKind::Uint8,
            BasicKind::Rune => BasicKind::Int32,
            other => other,
        }
    }
}

/// Channel direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChanDir {
    #[default]
    Both,
    Send,
    Recv,
}

/// One struct field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeShape,
    pub exported: bool,
}

impl Field {
    /// Build a field, deriving visibility from the leading character.
    pub fn new(name: impl Into<String>, ty: TypeShape) -> Self {
        let name = name.into();
        let exported = is_exported(&name);
        Self { name, ty, exported }
    }
}

/// Whether an identifier is part of the public surface (leading uppercase).
pub fn is_exported(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase)
}

/// A function signature: parameter types, variadic flag and result types.
///
/// Parameter names are not part of the model. When `variadic` is set the
/// last parameter holds the slice type of the repeated argument.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Signature {
    #[serde(default)]
    pub params: Vec<TypeShape>,
    #[serde(default)]
    pub variadic: bool,
    #[serde(default)]
    pub results: Vec<TypeShape>,
}

impl Signature {
    pub fn new(params: Vec<TypeShape>, results: Vec<TypeShape>) -> Self {
        Self {
            params,
            variadic: false,
            results,
        }
    }

    /// Variadic signature; `rest` is the element type of the trailing parameter.
    pub fn variadic(mut params: Vec<TypeShape>, rest: TypeShape, results: Vec<TypeShape>) -> Self {
        params.push(TypeShape::slice(rest));
        Self {
            params,
            variadic: true,
            results,
        }
    }

    /// A variadic signature must end in a slice parameter.
    pub fn is_well_formed(&self) -> bool {
        !self.variadic || matches!(self.params.last(), Some(TypeShape::Slice { .. }))
    }

    /// `(int, ...string) error` part of the signature text.
    pub(crate) fn fmt_params_results(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        let last = self.params.len().saturating_sub(1);
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            match param {
                TypeShape::Slice { elem } if self.variadic && i == last => {
                    write!(f, "...{}", elem)?
                }
                _ => write!(f, "{}", param)?,
            }
        }
        f.write_str(")")?;
        match self.results.as_slice() {
            [] => Ok(()),
            [single] => write!(f, " {}", single),
            many => {
                f.write_str(" (")?;
                for (i, result) in many.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", result)?;
                }
                f.write_str(")")
            }
        }
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("func")?;
        self.fmt_params_results(f)
    }
}

/// Structural shape of a type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeShape {
    Basic {
        basic: BasicKind,
        #[serde(default)]
        untyped: bool,
    },
    /// A declared type. `underlying` may be omitted for types declared in the
    /// same snapshot; comparators then resolve it through the snapshot.
    Named {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        underlying: Option<Box<TypeShape>>,
    },
    Struct {
        #[serde(default)]
        fields: Vec<Field>,
    },
    Pointer {
        elem: Box<TypeShape>,
    },
    Slice {
        elem: Box<TypeShape>,
    },
    Array {
        len: u64,
        elem: Box<TypeShape>,
    },
    Chan {
        #[serde(default)]
        dir: ChanDir,
        elem: Box<TypeShape>,
    },
    Map {
        key: Box<TypeShape>,
        value: Box<TypeShape>,
    },
    Interface {
        #[serde(default)]
        methods: BTreeMap<String, Signature>,
    },
    Signature(Signature),
}

impl TypeShape {
    pub fn basic(basic: BasicKind) -> Self {
        TypeShape::Basic {
            basic,
            untyped: false,
        }
    }

    pub fn untyped(basic: BasicKind) -> Self {
        TypeShape::Basic {
            basic,
            untyped: true,
        }
    }

    pub fn int() -> Self {
        Self::basic(BasicKind::Int)
    }

    pub fn string() -> Self {
        Self::basic(BasicKind::String)
    }

    pub fn bool() -> Self {
        Self::basic(BasicKind::Bool)
    }

    pub fn byte() -> Self {
        Self::basic(BasicKind::Byte)
    }

    /// The predeclared `error` interface.
    pub fn error() -> Self {
        let mut methods = BTreeMap::new();
        methods.insert(
            "Error".to_string(),
            Signature::new(vec![], vec![TypeShape::string()]),
        );
        Self::named_with("error", TypeShape::Interface { methods })
    }

    /// Reference to a type declared in the same snapshot.
    pub fn named(name: impl Into<String>) -> Self {
        TypeShape::Named {
            name: name.into(),
            underlying: None,
        }
    }

    pub fn named_with(name: impl Into<String>, underlying: TypeShape) -> Self {
        TypeShape::Named {
            name: name.into(),
            underlying: Some(Box::new(underlying)),
        }
    }

    pub fn pointer(elem: TypeShape) -> Self {
        TypeShape::Pointer {
            elem: Box::new(elem),
        }
    }

    pub fn slice(elem: TypeShape) -> Self {
        TypeShape::Slice {
            elem: Box::new(elem),
        }
    }

    pub fn array(len: u64, elem: TypeShape) -> Self {
        TypeShape::Array {
            len,
            elem: Box::new(elem),
        }
    }

    pub fn chan(dir: ChanDir, elem: TypeShape) -> Self {
        TypeShape::Chan {
            dir,
            elem: Box::new(elem),
        }
    }

    pub fn map(key: TypeShape, value: TypeShape) -> Self {
        TypeShape::Map {
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    pub fn struct_of(fields: Vec<Field>) -> Self {
        TypeShape::Struct { fields }
    }

    pub fn interface(methods: BTreeMap<String, Signature>) -> Self {
        TypeShape::Interface { methods }
    }

    pub fn func(signature: Signature) -> Self {
        TypeShape::Signature(signature)
    }

    /// Canonical textual form.
    pub fn canonical(&self) -> String {
        self.to_string()
    }

    /// Whether the two shapes print identically.
    pub fn same_text(&self, other: &TypeShape) -> bool {
        // Cheap structural check first; equal values always print equally.
        self == other || self.canonical() == other.canonical()
    }
}

impl fmt::Display for TypeShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeShape::Basic { basic, untyped } => {
                if *untyped {
                    f.write_str(basic.untyped_name())
                } else {
                    f.write_str(basic.name())
                }
            }
            TypeShape::Named { name, .. } => f.write_str(name),
            TypeShape::Struct { fields } => {
                f.write_str("struct{")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str("; ")?;
                    }
                    write!(f, "{} {}", field.name, field.ty)?;
                }
                f.write_str("}")
            }
            TypeShape::Pointer { elem } => write!(f, "*{}", elem),
            TypeShape::Slice { elem } => write!(f, "[]{}", elem),
            TypeShape::Array { len, elem } => write!(f, "[{}]{}", len, elem),
            TypeShape::Chan { dir, elem } => match dir {
                ChanDir::Both => write!(f, "chan {}", elem),
                ChanDir::Send => write!(f, "chan<- {}", elem),
                ChanDir::Recv => write!(f, "<-chan {}", elem),
            },
            TypeShape::Map { key, value } => write!(f, "map[{}]{}", key, value),
            TypeShape::Interface { methods } => {
                f.write_str("interface{")?;
                for (i, (name, sig)) in methods.iter().enumerate() {
                    if i > 0 {
                        f.write_str("; ")?;
                    }
                    f.write_str(name)?;
                    sig.fmt_params_results(f)?;
                }
                f.write_str("}")
            }
            TypeShape::Signature(sig) => write!(f, "{}", sig),
        }
    }
}
