//! Class file model consumed and produced by the rewrite engine.
//!
//! The model is deliberately symbolic: instructions name their owners, members and
//! descriptors directly, and a class is exchanged between processing stages as a stream of
//! events through [`ModuleSink`]. Reading a class from disk and serializing it back are left
//! to the embedding tool.
//!
//! # Key Types
//! - [`Module`], [`Method`] - An in-memory class and its methods
//! - [`ModuleSink`], [`ModuleWriter`] - Streaming event interface and the validating terminal sink
//! - [`Instruction`], [`CallSite`], [`Opcode`] - Method body instructions
//! - [`MethodRef`], [`ReferenceKind`], [`BootstrapArg`] - Method handles and bootstrap arguments
//! - [`MethodDescriptor`], [`FieldType`] - Parsed type descriptors
//! - [`AccessFlags`] - Class and method access flags

mod descriptor;
mod flags;
mod handle;
mod instruction;
mod module;
mod opcodes;
mod sink;

pub use descriptor::{FieldType, MethodDescriptor, ReturnType};
pub use flags::AccessFlags;
pub use handle::{BootstrapArg, MethodInfo, MethodRef, MethodSignature, ReferenceKind};
pub use instruction::{CallSite, Instruction, Label};
pub use module::{Method, Module, ModuleWriter};
pub use opcodes::Opcode;
pub use sink::{MethodHeader, ModuleHeader, ModuleSink};
