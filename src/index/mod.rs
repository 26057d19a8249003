//! Declared-method index over a closed set of classes.
//!
//! The rewrite engine has to know the access flags of lambda implementation methods, both in
//! the class being rewritten and in other classes of the input. [`ClassIndex`] is built once
//! ahead of the batch and only read afterwards, so it can be shared by any number of
//! concurrently rewritten classes.
//!
//! # Example
//!
//! ```rust
//! use lambdascope::{
//!     index::{ClassIndex, MethodIndex},
//!     model::{AccessFlags, Module, ModuleHeader},
//! };
//!
//! let module = Module::new(ModuleHeader::new(52 << 16, AccessFlags::PUBLIC, "a/B"));
//! let index = ClassIndex::from_modules(&[module]);
//! assert!(index.contains("a/B"));
//! assert!(index.methods("a/B").is_empty());
//! assert!(index.methods("a/C").is_empty());
//! ```

use dashmap::DashMap;
use rayon::prelude::*;

use crate::{
    lambda::{RuntimeType, TypeLoader},
    model::{MethodInfo, MethodSignature, Module},
    Error, Result,
};

/// Read-only view of the methods declared by each class of the input set.
///
/// Implementations must be safe for unsynchronized concurrent reads.
pub trait MethodIndex: Send + Sync {
    /// All methods declared by `owner`, empty if the class is unknown
    fn methods(&self, owner: &str) -> Vec<MethodInfo>;

    /// The declared method of `owner` matching `signature`
    fn find(&self, owner: &str, signature: &MethodSignature) -> Option<MethodInfo> {
        self.methods(owner)
            .into_iter()
            .find(|method| &method.signature == signature)
    }
}

/// [`MethodIndex`] backed by a concurrent map from internal class name to declared methods.
///
/// The index doubles as a [`TypeLoader`] for the same closed set: a class loads if and only if
/// it was indexed.
#[derive(Debug, Default)]
pub struct ClassIndex {
    classes: DashMap<String, Vec<MethodInfo>>,
}

impl ClassIndex {
    /// Create an empty index
    #[must_use]
    pub fn new() -> Self {
        ClassIndex {
            classes: DashMap::new(),
        }
    }

    /// Index every class of `modules`, scanning them in parallel
    #[must_use]
    pub fn from_modules(modules: &[Module]) -> Self {
        let index = ClassIndex::new();
        modules.par_iter().for_each(|module| index.insert(module));
        index
    }

    /// Add or replace the entry for one class
    pub fn insert(&self, module: &Module) {
        let methods = module
            .methods
            .iter()
            .map(|method| MethodInfo {
                signature: method.header.method_signature(),
                access: method.header.access,
            })
            .collect();
        self.insert_methods(module.name(), methods);
    }

    /// Add or replace the declared methods of `owner`
    pub fn insert_methods(&self, owner: impl Into<String>, methods: Vec<MethodInfo>) {
        self.classes.insert(owner.into(), methods);
    }

    /// Returns true if `owner` has been indexed
    #[must_use]
    pub fn contains(&self, owner: &str) -> bool {
        self.classes.contains_key(owner)
    }

    /// Number of indexed classes
    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Returns true if nothing has been indexed
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl MethodIndex for ClassIndex {
    fn methods(&self, owner: &str) -> Vec<MethodInfo> {
        self.classes
            .get(owner)
            .map(|entry| entry.value().clone())
            .unwrap_or_default()
    }
}

impl TypeLoader for ClassIndex {
    fn load(&self, internal_name: &str) -> Result<RuntimeType> {
        if self.contains(internal_name) {
            Ok(RuntimeType::new(internal_name))
        } else {
            Err(Error::ClassLoad {
                name: RuntimeType::new(internal_name).binary_name(),
                reason: "class is not part of the indexed input".to_string(),
            })
        }
    }
}
