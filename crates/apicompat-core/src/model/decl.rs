//! Exported declarations: functions, types and named values.

use crate::model::types::{Signature, TypeShape};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// An exported function, method, or function associated with a type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionDecl {
    pub name: String,
    pub signature: Signature,
    /// Receiver spelling (`T` or `*T`) for methods; only used for display.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receiver: Option<String>,
}

impl FunctionDecl {
    pub fn new(name: impl Into<String>, signature: Signature) -> Self {
        Self {
            name: name.into(),
            signature,
            receiver: None,
        }
    }

    pub fn method(receiver: impl Into<String>, name: impl Into<String>, signature: Signature) -> Self {
        Self {
            name: name.into(),
            signature,
            receiver: Some(receiver.into()),
        }
    }
}

impl fmt::Display for FunctionDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.receiver {
            Some(recv) => write!(f, "func ({}) {}", recv, self.name)?,
            None => write!(f, "func {}", self.name)?,
        }
        self.signature.fmt_params_results(f)
    }
}

/// An exported type declaration together with its methods and the
/// functions that construct or otherwise belong to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDecl {
    pub name: String,
    pub underlying: TypeShape,
    #[serde(default)]
    pub methods: BTreeMap<String, FunctionDecl>,
    #[serde(default)]
    pub free_funcs: BTreeMap<String, FunctionDecl>,
}

impl TypeDecl {
    pub fn new(name: impl Into<String>, underlying: TypeShape) -> Self {
        Self {
            name: name.into(),
            underlying,
            methods: BTreeMap::new(),
            free_funcs: BTreeMap::new(),
        }
    }

    /// Attach a method; a missing receiver defaults to the type name.
    pub fn with_method(mut self, mut method: FunctionDecl) -> Self {
        if method.receiver.is_none() {
            method.receiver = Some(self.name.clone());
        }
        self.methods.insert(method.name.clone(), method);
        self
    }

    /// Attach a package-level function that belongs to this type.
    pub fn with_free_func(mut self, func: FunctionDecl) -> Self {
        self.free_funcs.insert(func.name.clone(), func);
        self
    }

    /// `type Name <underlying>` form used for the identity check.
    pub fn canonical(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for TypeDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "type {} {}", self.name, self.underlying)
    }
}

/// An exported constant or variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueDecl {
    pub name: String,
    pub is_constant: bool,
    #[serde(rename = "type")]
    pub ty: TypeShape,
}

impl ValueDecl {
    pub fn constant(name: impl Into<String>, ty: TypeShape) -> Self {
        Self {
            name: name.into(),
            is_constant: true,
            ty,
        }
    }

    pub fn variable(name: impl Into<String>, ty: TypeShape) -> Self {
        Self {
            name: name.into(),
            is_constant: false,
            ty,
        }
    }
}

impl fmt::Display for ValueDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keyword = if self.is_constant { "const" } else { "var" };
        write!(f, "{} {} {}", keyword, self.name, self.ty)
    }
}

/// Declaration category, also the section order of rendered output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Function,
    Type,
    Value,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Function => "function",
            Category::Type => "type",
            Category::Value => "value",
        }
    }
}

/// Any one exported declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum Declaration {
    Function(FunctionDecl),
    Type(TypeDecl),
    Value(ValueDecl),
}

impl Declaration {
    pub fn name(&self) -> &str {
        match self {
            Declaration::Function(d) => &d.name,
            Declaration::Type(d) => &d.name,
            Declaration::Value(d) => &d.name,
        }
    }

    pub fn category(&self) -> Category {
        match self {
            Declaration::Function(_) => Category::Function,
            Declaration::Type(_) => Category::Type,
            Declaration::Value(_) => Category::Value,
        }
    }
}

impl fmt::Display for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Declaration::Function(d) => d.fmt(f),
            Declaration::Type(d) => d.fmt(f),
            Declaration::Value(d) => d.fmt(f),
        }
    }
}

impl From<FunctionDecl> for Declaration {
    fn from(d: FunctionDecl) -> Self {
        Declaration::Function(d)
    }
}

impl From<TypeDecl> for Declaration {
    fn from(d: TypeDecl) -> Self {
        Declaration::Type(d)
    }
}

impl From<ValueDecl> for Declaration {
    fn from(d: ValueDecl) -> Self {
        Declaration::Value(d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::types::{BasicKind, Field};

    #[test]
    fn test_function_forms() {
        let f = FunctionDecl::new(
            "Compatible1",
            Signature::variadic(vec![TypeShape::int()], TypeShape::string(), vec![]),
        );
        assert_eq!(f.to_string(), "func Compatible1(int, ...string)");

        let m = FunctionDecl::method(
            "*Client",
            "Do",
            Signature::new(vec![], vec![TypeShape::error()]),
        );
        assert_eq!(m.to_string(), "func (*Client) Do() error");
    }

    #[test]
    fn test_with_method_defaults_receiver() {
        let t = TypeDecl::new("T", TypeShape::int())
            .with_method(FunctionDecl::new("String", Signature::new(vec![], vec![TypeShape::string()])));
        assert_eq!(t.methods["String"].receiver.as_deref(), Some("T"));
        assert_eq!(t.methods["String"].to_string(), "func (T) String() string");
    }

    #[test]
    fn test_type_and_value_forms() {
        let t = TypeDecl::new(
            "UnchangedT2",
            TypeShape::struct_of(vec![Field::new("Foo", TypeShape::string())]),
        );
        assert_eq!(t.canonical(), "type UnchangedT2 struct{Foo string}");

        let c = ValueDecl::constant("X", TypeShape::untyped(BasicKind::String));
        assert_eq!(c.to_string(), "const X untyped string");
        let v = ValueDecl::variable("Y", TypeShape::bool());
        assert_eq!(v.to_string(), "var Y bool");
    }

    #[test]
    fn test_declaration_enum_delegates() {
        let d: Declaration = ValueDecl::variable("Y", TypeShape::bool()).into();
        assert_eq!(d.name(), "Y");
        assert_eq!(d.category(), Category::Value);
        assert_eq!(d.to_string(), "var Y bool");
    }
}
