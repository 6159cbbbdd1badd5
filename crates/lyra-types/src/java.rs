//! Resolution of Java textual type names against a [`TypeEnv`].
//!
//! These helpers are read-only with respect to the environment. Every failure
//! mode (unknown keyword, unregistered class, malformed array suffix) is a
//! plain `None`; callers distinguish cases only by which helper they called.

use lyra_core::TypeName;

use crate::{FloatKind, IntKind, MethodSig, StructType, Typ, TypeEnv};

/// Resolve a fully-qualified class name to its registered definition.
pub fn resolve_class<'e>(env: &'e TypeEnv, name: &str) -> Option<&'e StructType> {
    env.get(&TypeName::new(name))
}

/// Resolve the textual form of a Java type.
///
/// Handles `void` (also written as the empty string), the primitive
/// keywords, any depth of trailing `[]`, and otherwise treats the text as a
/// fully-qualified class name. An array resolves to a pointer to an array of
/// the element type, matching how the front end lowers Java reference
/// semantics.
///
/// `byte` and `short` both resolve to the short-width kind. Downstream
/// consumers rely on the merged width, so keep them in step.
pub fn resolve_type(env: &TypeEnv, text: &str) -> Option<Typ> {
    match text {
        "" | "void" => Some(Typ::Void),
        "int" => Some(Typ::Int(IntKind::Int)),
        "byte" | "short" => Some(Typ::Int(IntKind::Short)),
        "boolean" => Some(Typ::Int(IntKind::Bool)),
        "char" => Some(Typ::Int(IntKind::Char)),
        "long" => Some(Typ::Int(IntKind::Long)),
        "float" => Some(Typ::Float(FloatKind::Float)),
        "double" => Some(Typ::Float(FloatKind::Double)),
        _ => {
            if let Some(elem_text) = text.strip_suffix("[]") {
                let elem = resolve_type(env, elem_text)?;
                Some(Typ::ptr(Typ::array(elem)))
            } else {
                let def = resolve_class(env, text)?;
                Some(Typ::Struct {
                    name: TypeName::new(text),
                    def: Box::new(def.clone()),
                })
            }
        }
    }
}

/// Resolve a method's textual return type. An absent return type reads as
/// `void`.
pub fn method_return_type(env: &TypeEnv, sig: &MethodSig) -> Option<Typ> {
    resolve_type(env, sig.return_type.as_deref().unwrap_or(""))
}
