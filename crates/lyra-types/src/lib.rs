//! Type model and type environment for the Lyra analysis front end.
//!
//! The [`TypeEnv`] is a process-wide registry mapping fully-qualified type
//! names to their structural definitions ([`StructType`]): fields, static
//! fields, methods, direct supers and annotations. Front ends populate it
//! incrementally while parsing; later passes resolve type references through
//! it ([`TypeEnv::expand`], [`java::resolve_type`]) and compute virtual
//! dispatch targets over it ([`find_overridden_method`]).
//!
//! Recursive and mutually-recursive class graphs stay finite because stored
//! field types always use the named, unexpanded form ([`Typ::Named`]);
//! expansion back to a full definition is a deliberate single-level step.

mod dispatch;
mod env;
pub mod java;
mod typ;

pub use lyra_core::TypeName;

pub use dispatch::find_overridden_method;
pub use env::TypeEnv;
pub use typ::{Annotation, FieldDecl, FloatKind, IntKind, MethodSig, StructType, Typ};
