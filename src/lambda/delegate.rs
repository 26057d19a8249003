//! Bodies for synthetic accessor methods.

use crate::{
    model::{AccessFlags, Instruction, MethodHeader, MethodRef, ModuleSink, Opcode, ReferenceKind},
    Result,
};

/// Writes one forwarding method into a class.
pub trait DelegateEmitter: Send + Sync {
    /// Add a method named and typed like `accessor`, with the given access flags, whose body
    /// calls `implementation` with all of its arguments and returns the result.
    ///
    /// # Errors
    ///
    /// Propagates errors from `sink`.
    fn emit(
        &self,
        sink: &mut dyn ModuleSink,
        access: AccessFlags,
        accessor: &MethodRef,
        implementation: &MethodRef,
    ) -> Result<()>;
}

/// The standard [`DelegateEmitter`].
///
/// The generated body loads every accessor parameter in order and calls the implementation
/// with the opcode its reference kind implies. Constructors are wrapped in `new`/`dup` so the
/// accessor returns the new instance. Instance methods take their receiver from the first
/// parameter.
///
/// # Examples
///
/// ```rust
/// use lambdascope::{
///     lambda::forwarding_body,
///     model::{Instruction, MethodRef, Opcode, ReferenceKind},
/// };
///
/// let implementation = MethodRef::parse(ReferenceKind::Special, "a/M", "bar", "()V")?;
/// let accessor = MethodRef::parse(ReferenceKind::Static, "a/M", "access$lambda$0", "(La/M;)V")?;
///
/// let body = forwarding_body(&accessor, &implementation);
/// assert_eq!(body.len(), 3);
/// assert_eq!(body[2], Instruction::Simple(Opcode::Return));
/// # Ok::<(), lambdascope::Error>(())
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct ForwardingEmitter;

impl DelegateEmitter for ForwardingEmitter {
    fn emit(
        &self,
        sink: &mut dyn ModuleSink,
        access: AccessFlags,
        accessor: &MethodRef,
        implementation: &MethodRef,
    ) -> Result<()> {
        let header = MethodHeader::new(access, accessor.name.clone(), accessor.descriptor.clone());
        if !sink.visit_method(&header)? {
            return Ok(());
        }
        for instruction in forwarding_body(accessor, implementation) {
            sink.visit_instruction(instruction)?;
        }
        sink.visit_method_end()
    }
}

/// Instructions of a static method with `accessor`'s descriptor that forwards to
/// `implementation`
#[must_use]
pub fn forwarding_body(accessor: &MethodRef, implementation: &MethodRef) -> Vec<Instruction> {
    let params = accessor.descriptor.params();
    let mut body = Vec::with_capacity(params.len() + 4);

    if implementation.kind == ReferenceKind::Constructor {
        body.push(Instruction::Type {
            opcode: Opcode::New,
            type_name: implementation.owner.clone(),
        });
        body.push(Instruction::Simple(Opcode::Dup));
    }

    let mut slot = 0;
    for param in params {
        body.push(Instruction::Var {
            opcode: param.load_opcode(),
            index: slot,
        });
        slot += param.slots();
    }

    body.push(Instruction::call(implementation));
    body.push(Instruction::Simple(
        accessor.descriptor.return_type().return_opcode(),
    ));
    body
}
