use std::collections::HashMap;
use std::fmt;

use lyra_core::TypeName;
use serde::{Deserialize, Serialize};

use crate::{StructType, Typ};

/// The type environment: every type name the front end has seen, mapped to
/// its structural definition.
///
/// The table is populated incrementally while source units are parsed, so a
/// definition may name supers that are not registered yet; forward references
/// are a legal steady state. Redefining a name replaces the prior definition
/// silently (last writer wins). There is no removal operation.
///
/// `TypeEnv` is a plain single-threaded value with no internal locking.
/// Callers that share one across threads must serialize access themselves.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeEnv {
    classes: HashMap<TypeName, StructType>,
}

impl TypeEnv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the definition for `name`.
    ///
    /// Overwriting is a normal, silent operation; the previous definition is
    /// dropped.
    pub fn insert(&mut self, name: TypeName, def: StructType) {
        if self.classes.contains_key(&name) {
            tracing::debug!(target: "lyra.types", name = %name, "replacing type definition");
        }
        self.classes.insert(name, def);
    }

    #[must_use]
    pub fn contains(&self, name: &TypeName) -> bool {
        self.classes.contains_key(name)
    }

    /// The current definition of `name`, or `None` if it was never
    /// registered.
    #[must_use]
    pub fn get(&self, name: &TypeName) -> Option<&StructType> {
        self.classes.get(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Visits every live entry exactly once, in hash-table order.
    ///
    /// The order is not stable across runs or insertion histories; consumers
    /// that need deterministic output must sort by name (see
    /// [`TypeEnv::dump`]).
    pub fn iter(&self) -> impl Iterator<Item = (&TypeName, &StructType)> {
        self.classes.iter()
    }

    /// Define (or redefine) `name`, returning the stored definition.
    ///
    /// Field types that arrive fully expanded are collapsed to named
    /// references before storage, so a class whose field is of its own type
    /// (or participates in a reference cycle) stays finite. Only the `fields`
    /// group is rewritten; `statics`, `methods` and `supers` are stored as
    /// given.
    pub fn define(&mut self, name: TypeName, mut def: StructType) -> StructType {
        for field in &mut def.fields {
            if let Typ::Struct { name: n, .. } = &field.typ {
                field.typ = Typ::Named(n.clone());
            }
        }
        self.insert(name, def.clone());
        def
    }

    /// Resolve a named reference one level, if its definition is registered.
    ///
    /// Best-effort: an unregistered name, and any non-`Named` shape, comes
    /// back unchanged. Named references nested inside the result are left
    /// unexpanded.
    #[must_use]
    pub fn expand(&self, typ: &Typ) -> Typ {
        match typ {
            Typ::Named(name) => match self.get(name) {
                Some(def) => Typ::Struct {
                    name: name.clone(),
                    def: Box::new(def.clone()),
                },
                None => typ.clone(),
            },
            other => other.clone(),
        }
    }

    /// [`expand`](Self::expand) applied through one level of pointer
    /// indirection.
    #[must_use]
    pub fn expand_through_ptr(&self, typ: &Typ) -> Typ {
        match typ {
            Typ::Ptr(inner) => Typ::Ptr(Box::new(self.expand(inner))),
            other => self.expand(other),
        }
    }

    /// Write every definition to `out`, sorted by name.
    ///
    /// Iteration order of the underlying table is unstable, so diagnostic
    /// output sorts explicitly.
    pub fn dump(&self, out: &mut impl fmt::Write) -> fmt::Result {
        let mut entries: Vec<_> = self.classes.iter().collect();
        entries.sort_by(|(a, _), (b, _)| a.as_str().cmp(b.as_str()));

        for (name, def) in entries {
            writeln!(out, "{name}:")?;
            for sup in &def.supers {
                writeln!(out, "  extends {sup}")?;
            }
            for field in &def.fields {
                writeln!(out, "  {} {}", field.typ, field.name)?;
            }
            for field in &def.statics {
                writeln!(out, "  static {} {}", field.typ, field.name)?;
            }
            for method in &def.methods {
                writeln!(out, "  {}({})", method.name, method.params.join(", "))?;
            }
        }
        Ok(())
    }
}
