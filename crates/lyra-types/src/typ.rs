use std::fmt;

use lyra_core::TypeName;
use serde::{Deserialize, Serialize};

/// Width of an integer type.
///
/// `boolean` and `char` are carried as integer kinds, matching how the
/// front end lowers them. Note that the `byte` and `short` source keywords
/// both resolve to [`IntKind::Short`]; see [`crate::java::resolve_type`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IntKind {
    Bool,
    Char,
    Short,
    Int,
    Long,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FloatKind {
    Float,
    Double,
}

/// A type reference.
///
/// `Struct` embeds the full definition by value; `Named` is the unexpanded
/// flyweight that breaks reference cycles. A class whose field is of its own
/// type (or of a mutually-recursive type) must be stored with `Named` field
/// types, otherwise the value would not be finite. [`crate::TypeEnv::define`]
/// enforces this for the `fields` group, and [`crate::TypeEnv::expand`]
/// resolves a `Named` reference back to `Struct` one level at a time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Typ {
    Void,
    Int(IntKind),
    Float(FloatKind),
    /// One level of pointer/reference indirection.
    Ptr(Box<Typ>),
    /// An array, with a static length when one is known.
    Array {
        elem: Box<Typ>,
        length: Option<u64>,
    },
    /// A fully-expanded struct reference. Carries its name so it can be
    /// collapsed back to [`Typ::Named`].
    Struct {
        name: TypeName,
        def: Box<StructType>,
    },
    /// A named reference whose definition has not been expanded.
    Named(TypeName),
}

impl Typ {
    pub fn ptr(inner: Typ) -> Typ {
        Typ::Ptr(Box::new(inner))
    }

    /// An array with no static length.
    pub fn array(elem: Typ) -> Typ {
        Typ::Array {
            elem: Box::new(elem),
            length: None,
        }
    }

    pub fn sized_array(elem: Typ, length: u64) -> Typ {
        Typ::Array {
            elem: Box::new(elem),
            length: Some(length),
        }
    }

    pub fn named(name: impl Into<TypeName>) -> Typ {
        Typ::Named(name.into())
    }
}

impl fmt::Display for Typ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Typ::Void => f.write_str("void"),
            Typ::Int(IntKind::Bool) => f.write_str("boolean"),
            Typ::Int(IntKind::Char) => f.write_str("char"),
            Typ::Int(IntKind::Short) => f.write_str("short"),
            Typ::Int(IntKind::Int) => f.write_str("int"),
            Typ::Int(IntKind::Long) => f.write_str("long"),
            Typ::Float(FloatKind::Float) => f.write_str("float"),
            Typ::Float(FloatKind::Double) => f.write_str("double"),
            Typ::Ptr(inner) => write!(f, "{inner}*"),
            Typ::Array {
                elem,
                length: Some(length),
            } => write!(f, "{elem}[{length}]"),
            Typ::Array { elem, length: None } => write!(f, "{elem}[]"),
            Typ::Struct { name, .. } => write!(f, "class {name}"),
            Typ::Named(name) => write!(f, "{name}"),
        }
    }
}

/// An annotation marker, e.g. `java.lang.Deprecated`, with its textual
/// parameters when it has any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    pub class_name: String,
    pub params: Vec<String>,
}

impl Annotation {
    /// A parameterless marker annotation.
    pub fn marker(class_name: impl Into<String>) -> Self {
        Annotation {
            class_name: class_name.into(),
            params: Vec::new(),
        }
    }
}

/// One declared (instance or static) field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDecl {
    pub name: String,
    pub typ: Typ,
    pub annotations: Vec<Annotation>,
}

impl FieldDecl {
    pub fn new(name: impl Into<String>, typ: Typ) -> Self {
        FieldDecl {
            name: name.into(),
            typ,
            annotations: Vec::new(),
        }
    }
}

/// Identity of one declared method: declaring class, simple name, and the
/// textual parameter/return types of its source signature.
///
/// The return type is kept in source form and resolved on demand through
/// [`crate::java::method_return_type`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodSig {
    /// Fully-qualified name of the declaring class.
    pub owner: TypeName,
    /// Simple method name, e.g. `equals`.
    pub name: String,
    pub params: Vec<String>,
    pub return_type: Option<String>,
}

impl MethodSig {
    pub fn new(owner: impl Into<TypeName>, name: impl Into<String>) -> Self {
        MethodSig {
            owner: owner.into(),
            name: name.into(),
            params: Vec::new(),
            return_type: None,
        }
    }

    #[must_use]
    pub fn with_params(mut self, params: Vec<String>) -> Self {
        self.params = params;
        self
    }

    #[must_use]
    pub fn with_return_type(mut self, return_type: impl Into<String>) -> Self {
        self.return_type = Some(return_type.into());
        self
    }
}

/// Structural definition of one class-like type.
///
/// All five groups are independently optional; `StructType::default()` is a
/// valid "declared but shapeless" placeholder, useful for forward-declaring a
/// name before its body is known. Sequence order is declaration order and is
/// semantically meaningful. `supers` keeps duplicates as written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructType {
    pub fields: Vec<FieldDecl>,
    pub statics: Vec<FieldDecl>,
    pub methods: Vec<MethodSig>,
    pub supers: Vec<TypeName>,
    pub annotations: Vec<Annotation>,
}
