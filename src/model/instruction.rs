//! Instruction representation for method bodies.
//!
//! Instructions carry symbolic operands (class names, descriptors, constants) rather than
//! constant pool indices, so a rewrite can replace one instruction with another without
//! touching any shared table.

use std::fmt;

use crate::model::{BootstrapArg, FieldType, MethodDescriptor, MethodRef, Opcode, ReferenceKind};

/// A branch target within one method body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Label(pub u32);

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}", self.0)
    }
}

/// The operands of an `invokedynamic` instruction.
#[derive(Debug, Clone, PartialEq)]
pub struct CallSite {
    /// Invoked name, e.g. the functional interface method name
    pub name: String,
    /// Invoked type: captured arguments in, functional interface instance out
    pub descriptor: MethodDescriptor,
    /// The bootstrap method that links the call site
    pub bootstrap: MethodRef,
    /// Static arguments for the bootstrap method
    pub bootstrap_args: Vec<BootstrapArg>,
}

/// A single instruction of a method body.
///
/// # Examples
///
/// ```rust
/// use lambdascope::model::{Instruction, MethodRef, Opcode, ReferenceKind};
///
/// let target = MethodRef::parse(ReferenceKind::Static, "a/B", "run", "()V")?;
/// let call = Instruction::call(&target);
/// assert_eq!(call.opcode(), Some(Opcode::Invokestatic));
/// assert_eq!(call.to_string(), "invokestatic a/B.run()V");
/// # Ok::<(), lambdascope::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    /// An instruction without operands (`dup`, `areturn`, `iadd`, ...)
    Simple(Opcode),
    /// `bipush`, `sipush` or `newarray`
    Int {
        /// The opcode
        opcode: Opcode,
        /// The immediate operand
        operand: i32,
    },
    /// A local variable load or store
    Var {
        /// The opcode
        opcode: Opcode,
        /// Local variable slot
        index: u16,
    },
    /// `iinc`
    Iinc {
        /// Local variable slot
        index: u16,
        /// Signed increment
        delta: i16,
    },
    /// `new`, `anewarray`, `checkcast` or `instanceof`
    Type {
        /// The opcode
        opcode: Opcode,
        /// Internal name or array descriptor of the type
        type_name: String,
    },
    /// A field access
    Field {
        /// The opcode
        opcode: Opcode,
        /// Internal name of the declaring class
        owner: String,
        /// Field name
        name: String,
        /// Field type
        descriptor: FieldType,
    },
    /// `invokevirtual`, `invokespecial`, `invokestatic` or `invokeinterface`
    Method {
        /// The opcode
        opcode: Opcode,
        /// Internal name of the declaring class
        owner: String,
        /// Method name
        name: String,
        /// Method descriptor
        descriptor: MethodDescriptor,
        /// Whether the owner is an interface
        interface: bool,
    },
    /// `invokedynamic`
    InvokeDynamic(CallSite),
    /// `ldc` of a loadable constant
    Ldc(BootstrapArg),
    /// A conditional or unconditional branch
    Jump {
        /// The opcode
        opcode: Opcode,
        /// Branch target
        target: Label,
    },
    /// Marks a branch target position
    Label(Label),
    /// Any other instruction, kept as raw bytes
    Opaque {
        /// Raw opcode byte
        opcode: u8,
        /// Raw operand bytes
        operands: Vec<u8>,
    },
}

impl Instruction {
    /// A direct call to `target` using the opcode its reference kind implies
    #[must_use]
    pub fn call(target: &MethodRef) -> Self {
        Instruction::Method {
            opcode: target.kind.invoke_opcode(),
            owner: target.owner.clone(),
            name: target.name.clone(),
            descriptor: target.descriptor.clone(),
            interface: target.kind == ReferenceKind::Interface,
        }
    }

    /// The opcode, if this is a real instruction with a named opcode
    #[must_use]
    pub fn opcode(&self) -> Option<Opcode> {
        match self {
            Instruction::Simple(opcode)
            | Instruction::Int { opcode, .. }
            | Instruction::Var { opcode, .. }
            | Instruction::Type { opcode, .. }
            | Instruction::Field { opcode, .. }
            | Instruction::Method { opcode, .. }
            | Instruction::Jump { opcode, .. } => Some(*opcode),
            Instruction::Iinc { .. } => Some(Opcode::Iinc),
            Instruction::InvokeDynamic(_) => Some(Opcode::Invokedynamic),
            Instruction::Ldc(_) => Some(Opcode::Ldc),
            Instruction::Label(_) => None,
            Instruction::Opaque { opcode, .. } => Opcode::from_byte(*opcode),
        }
    }

    /// The call site, if this is an `invokedynamic`
    #[must_use]
    pub fn as_call_site(&self) -> Option<&CallSite> {
        match self {
            Instruction::InvokeDynamic(site) => Some(site),
            _ => None,
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Simple(opcode) => write!(f, "{opcode}"),
            Instruction::Int { opcode, operand } => write!(f, "{opcode} {operand}"),
            Instruction::Var { opcode, index } => write!(f, "{opcode} {index}"),
            Instruction::Iinc { index, delta } => write!(f, "iinc {index} {delta}"),
            Instruction::Type { opcode, type_name } => write!(f, "{opcode} {type_name}"),
            Instruction::Field {
                opcode,
                owner,
                name,
                descriptor,
            } => write!(f, "{opcode} {owner}.{name}:{descriptor}"),
            Instruction::Method {
                opcode,
                owner,
                name,
                descriptor,
                ..
            } => write!(f, "{opcode} {owner}.{name}{descriptor}"),
            Instruction::InvokeDynamic(site) => write!(
                f,
                "invokedynamic {}{} [{}.{}]",
                site.name, site.descriptor, site.bootstrap.owner, site.bootstrap.name
            ),
            Instruction::Ldc(constant) => write!(f, "ldc {constant:?}"),
            Instruction::Jump { opcode, target } => write!(f, "{opcode} {target}"),
            Instruction::Label(label) => write!(f, "{label}:"),
            Instruction::Opaque { opcode, operands } => {
                write!(f, "0x{opcode:02x}")?;
                for byte in operands {
                    write!(f, " {byte:02x}")?;
                }
                Ok(())
            }
        }
    }
}
