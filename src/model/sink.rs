//! Streaming access to a class.
//!
//! A class is read as a flat sequence of events:
//!
//! ```text
//! visit_header
//!   ( visit_method  visit_instruction*  visit_method_end )*
//! visit_end
//! ```
//!
//! Processing stages implement [`ModuleSink`] and forward the events they do not change to
//! the next sink, so a rewrite is a chain of small stages ending in a [`crate::model::ModuleWriter`].

use crate::{
    model::{AccessFlags, Instruction, MethodDescriptor, MethodSignature},
    Result,
};

/// Class-level header information
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleHeader {
    /// Class file version, major in the high 16 bits and minor in the low 16 bits
    pub version: u32,
    /// Class access flags
    pub access: AccessFlags,
    /// Internal name, e.g. `com/example/Foo`
    pub name: String,
    /// Generic signature, if any
    pub signature: Option<String>,
    /// Internal name of the superclass; `None` only for `java/lang/Object`
    pub super_name: Option<String>,
    /// Internal names of the directly implemented interfaces
    pub interfaces: Vec<String>,
}

impl ModuleHeader {
    /// A header for a class or interface with `java/lang/Object` as its superclass
    pub fn new(version: u32, access: AccessFlags, name: impl Into<String>) -> Self {
        ModuleHeader {
            version,
            access,
            name: name.into(),
            signature: None,
            super_name: Some("java/lang/Object".to_string()),
            interfaces: Vec::new(),
        }
    }
}

/// Method-level header information
#[derive(Debug, Clone, PartialEq)]
pub struct MethodHeader {
    /// Method access flags
    pub access: AccessFlags,
    /// Method name
    pub name: String,
    /// Method descriptor
    pub descriptor: MethodDescriptor,
    /// Generic signature, if any
    pub signature: Option<String>,
    /// Internal names of declared exceptions
    pub exceptions: Vec<String>,
}

impl MethodHeader {
    /// A header with no generic signature and no declared exceptions
    pub fn new(access: AccessFlags, name: impl Into<String>, descriptor: MethodDescriptor) -> Self {
        MethodHeader {
            access,
            name: name.into(),
            descriptor,
            signature: None,
            exceptions: Vec::new(),
        }
    }

    /// The name and descriptor of this method
    #[must_use]
    pub fn method_signature(&self) -> MethodSignature {
        MethodSignature::new(self.name.clone(), self.descriptor.clone())
    }
}

/// Receiver of the streamed events of one class.
///
/// # Errors
///
/// Every callback may fail. A sink reports protocol violations (events out of order,
/// duplicate methods) as [`crate::Error::Malformed`].
pub trait ModuleSink {
    /// Start of the class
    fn visit_header(&mut self, header: &ModuleHeader) -> Result<()>;

    /// Start of a method.
    ///
    /// Returns `false` if the sink drops the method. The caller must then skip the
    /// method's instructions and must not call [`ModuleSink::visit_method_end`] for it.
    fn visit_method(&mut self, method: &MethodHeader) -> Result<bool>;

    /// One instruction of the current method
    fn visit_instruction(&mut self, instruction: Instruction) -> Result<()>;

    /// End of the current method
    fn visit_method_end(&mut self) -> Result<()>;

    /// End of the class
    fn visit_end(&mut self) -> Result<()>;
}

impl<S: ModuleSink + ?Sized> ModuleSink for &mut S {
    fn visit_header(&mut self, header: &ModuleHeader) -> Result<()> {
        (**self).visit_header(header)
    }

    fn visit_method(&mut self, method: &MethodHeader) -> Result<bool> {
        (**self).visit_method(method)
    }

    fn visit_instruction(&mut self, instruction: Instruction) -> Result<()> {
        (**self).visit_instruction(instruction)
    }

    fn visit_method_end(&mut self) -> Result<()> {
        (**self).visit_method_end()
    }

    fn visit_end(&mut self) -> Result<()> {
        (**self).visit_end()
    }
}
