//! Method references, method handles and bootstrap arguments.

use std::fmt;

use crate::{
    model::{AccessFlags, MethodDescriptor, Opcode},
    Result,
};

/// How a method reference is invoked.
///
/// The three instance variants share the same accessor treatment (the receiver becomes an
/// explicit leading parameter); they differ only in the opcode used to call the method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum ReferenceKind {
    /// `REF_invokeStatic`
    Static,
    /// `REF_newInvokeSpecial`, a constructor call
    Constructor,
    /// `REF_invokeVirtual`
    Virtual,
    /// `REF_invokeSpecial`, a private or super call
    Special,
    /// `REF_invokeInterface`
    Interface,
}

impl ReferenceKind {
    /// Map a `CONSTANT_MethodHandle` reference kind onto a method reference kind
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Malformed`] for field handles (tags 1 to 4) and unknown tags.
    pub fn from_tag(tag: u8) -> Result<Self> {
        match tag {
            5 => Ok(ReferenceKind::Virtual),
            6 => Ok(ReferenceKind::Static),
            7 => Ok(ReferenceKind::Special),
            8 => Ok(ReferenceKind::Constructor),
            9 => Ok(ReferenceKind::Interface),
            1..=4 => Err(malformed_error!(
                "Field handle tag {} cannot reference a method",
                tag
            )),
            _ => Err(malformed_error!("Unknown method handle tag {}", tag)),
        }
    }

    /// The `CONSTANT_MethodHandle` reference kind
    #[must_use]
    pub fn tag(&self) -> u8 {
        match self {
            ReferenceKind::Virtual => 5,
            ReferenceKind::Static => 6,
            ReferenceKind::Special => 7,
            ReferenceKind::Constructor => 8,
            ReferenceKind::Interface => 9,
        }
    }

    /// Returns true if the method is called on a receiver
    #[must_use]
    pub fn is_instance(&self) -> bool {
        matches!(
            self,
            ReferenceKind::Virtual | ReferenceKind::Special | ReferenceKind::Interface
        )
    }

    /// The opcode that performs a direct call of this kind
    #[must_use]
    pub fn invoke_opcode(&self) -> Opcode {
        match self {
            ReferenceKind::Static => Opcode::Invokestatic,
            ReferenceKind::Constructor | ReferenceKind::Special => Opcode::Invokespecial,
            ReferenceKind::Virtual => Opcode::Invokevirtual,
            ReferenceKind::Interface => Opcode::Invokeinterface,
        }
    }
}

/// A method referenced by a method handle.
///
/// Equality and hashing cover all four fields, so two references to the same method with
/// different kinds are distinct.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodRef {
    /// Internal name of the declaring class
    pub owner: String,
    /// Method name
    pub name: String,
    /// Method descriptor
    pub descriptor: MethodDescriptor,
    /// How the method is invoked
    pub kind: ReferenceKind,
}

impl MethodRef {
    /// Create a new method reference
    pub fn new(
        kind: ReferenceKind,
        owner: impl Into<String>,
        name: impl Into<String>,
        descriptor: MethodDescriptor,
    ) -> Self {
        MethodRef {
            owner: owner.into(),
            name: name.into(),
            descriptor,
            kind,
        }
    }

    /// Create a new method reference, parsing the descriptor text
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Malformed`] if `descriptor` is not a valid method descriptor.
    pub fn parse(
        kind: ReferenceKind,
        owner: impl Into<String>,
        name: impl Into<String>,
        descriptor: &str,
    ) -> Result<Self> {
        Ok(Self::new(
            kind,
            owner,
            name,
            MethodDescriptor::parse(descriptor)?,
        ))
    }

    /// The name and descriptor, as used for index lookups
    #[must_use]
    pub fn signature(&self) -> MethodSignature {
        MethodSignature {
            name: self.name.clone(),
            descriptor: self.descriptor.clone(),
        }
    }
}

impl fmt::Display for MethodRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}{} ({})",
            self.owner, self.name, self.descriptor, self.kind
        )
    }
}

/// A method identity within one class: name plus descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodSignature {
    /// Method name
    pub name: String,
    /// Method descriptor
    pub descriptor: MethodDescriptor,
}

impl MethodSignature {
    /// Create a new method signature
    pub fn new(name: impl Into<String>, descriptor: MethodDescriptor) -> Self {
        MethodSignature {
            name: name.into(),
            descriptor,
        }
    }
}

impl fmt::Display for MethodSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.name, self.descriptor)
    }
}

/// A declared method as recorded by the method index
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodInfo {
    /// Name and descriptor
    pub signature: MethodSignature,
    /// Declared access flags
    pub access: AccessFlags,
}

/// A static argument passed to a bootstrap method.
#[derive(Debug, Clone, PartialEq)]
pub enum BootstrapArg {
    /// `CONSTANT_Integer`
    Int(i32),
    /// `CONSTANT_Long`
    Long(i64),
    /// `CONSTANT_Float`
    Float(f32),
    /// `CONSTANT_Double`
    Double(f64),
    /// `CONSTANT_String`
    String(String),
    /// `CONSTANT_Class`, as an internal name
    Class(String),
    /// `CONSTANT_MethodType`
    MethodType(MethodDescriptor),
    /// `CONSTANT_MethodHandle`
    Handle(MethodRef),
}

impl BootstrapArg {
    /// The referenced method if this argument is a method handle
    #[must_use]
    pub fn as_handle(&self) -> Option<&MethodRef> {
        match self {
            BootstrapArg::Handle(handle) => Some(handle),
            _ => None,
        }
    }
}
