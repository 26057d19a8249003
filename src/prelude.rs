//! # lambdascope Prelude
//!
//! This module provides a convenient prelude for the most commonly used types and traits
//! from the lambdascope library. Import this module to get quick access to everything needed
//! to set up and run a lambda backport.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all lambdascope operations
pub use crate::Error;

/// The result type used throughout lambdascope
pub use crate::Result;

/// Configuration of the backport pass
pub use crate::BackportConfig;

// ================================================================================================
// Class File Model
// ================================================================================================

/// In-memory classes and the streaming sink interface
pub use crate::model::{Method, MethodHeader, Module, ModuleHeader, ModuleSink, ModuleWriter};

/// Instructions and call sites
pub use crate::model::{BootstrapArg, CallSite, Instruction, Opcode};

/// Method references and descriptors
pub use crate::model::{
    AccessFlags, FieldType, MethodDescriptor, MethodRef, MethodSignature, ReferenceKind,
};

// ================================================================================================
// Method Index
// ================================================================================================

/// Declared-method lookup
pub use crate::index::{ClassIndex, MethodIndex};

// ================================================================================================
// Lambda Rewriting
// ================================================================================================

/// Rewrite stages and drivers
pub use crate::lambda::{rewrite_module, rewrite_modules, RewriteEngine, RewriteStats};

/// External collaborators
pub use crate::lambda::{
    AtomicSequence, DelegateEmitter, FactoryMethod, ForwardingEmitter, NoSequence, Reifier,
    ReifyRequest, RewriteServices, RuntimeType, SequenceCounter, TypeLoader,
};
