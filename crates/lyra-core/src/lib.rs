//! Core shared identifiers for Lyra.
//!
//! This crate is intentionally small and nearly dependency-free.

use std::fmt;

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// A fully-qualified type name in source form, e.g. `java.lang.Object`.
///
/// `TypeName` is the key of the type environment: one name denotes exactly one
/// logical type for the lifetime of the process. Equality and hashing are
/// structural over the name text, so they are stable across processes and
/// survive serialization round-trips.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeName(SmolStr);

impl TypeName {
    pub fn new(name: impl AsRef<str>) -> Self {
        TypeName(SmolStr::new(name))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The segment after the last `.`, e.g. `Object` for `java.lang.Object`.
    #[must_use]
    pub fn simple_name(&self) -> &str {
        match self.0.rfind('.') {
            Some(idx) => &self.0[idx + 1..],
            None => &self.0,
        }
    }

    /// The segments before the last `.`; empty for unqualified names.
    #[must_use]
    pub fn package_name(&self) -> &str {
        match self.0.rfind('.') {
            Some(idx) => &self.0[..idx],
            None => "",
        }
    }
}

impl fmt::Debug for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeName({})", self.0)
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeName {
    fn from(name: &str) -> Self {
        TypeName::new(name)
    }
}

impl From<String> for TypeName {
    fn from(name: String) -> Self {
        TypeName(SmolStr::new(name))
    }
}
