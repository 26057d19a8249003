//! Identity of the class being rewritten.

use crate::model::{AccessFlags, ModuleHeader};

/// Whether the class being rewritten is a class or an interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum AggregateKind {
    /// A class, including enums and abstract classes
    Class,
    /// An interface or annotation type
    Interface,
}

impl AggregateKind {
    /// Derive the kind from class access flags
    #[must_use]
    pub fn from_access(access: AccessFlags) -> Self {
        if access.is_interface() {
            AggregateKind::Interface
        } else {
            AggregateKind::Class
        }
    }
}

/// The identity of the class being rewritten, captured from its header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleContext {
    /// Class access flags
    pub access: AccessFlags,
    /// Internal name of the class
    pub name: String,
    /// Class or interface
    pub kind: AggregateKind,
}

impl ModuleContext {
    /// Create a context for a class with the given access flags and internal name
    pub fn new(access: AccessFlags, name: impl Into<String>) -> Self {
        ModuleContext {
            access,
            name: name.into(),
            kind: AggregateKind::from_access(access),
        }
    }

    /// Capture the context from a class header
    #[must_use]
    pub fn from_header(header: &ModuleHeader) -> Self {
        Self::new(header.access, header.name.clone())
    }

    /// Returns true if the class is an interface
    #[must_use]
    pub fn is_interface(&self) -> bool {
        self.kind == AggregateKind::Interface
    }

    /// The package part of the class name; empty for the default package
    #[must_use]
    pub fn package(&self) -> &str {
        package_of(&self.name)
    }
}

/// The package part of an internal class name, i.e. everything before the last `/`
#[must_use]
pub fn package_of(internal_name: &str) -> &str {
    internal_name
        .rfind('/')
        .map_or("", |slash| &internal_name[..slash])
}
