//! Per-method stage: replaces lambda call sites with calls to static factories.

use crate::{
    lambda::{
        is_deserialization_hook, AccessorTable, ModuleContext, ReifyRequest, RewriteServices,
    },
    model::{BootstrapArg, CallSite, Instruction, MethodHeader, ModuleSink, Opcode},
    Result,
};

/// Position of the implementation handle among the metafactory's static arguments
const IMPLEMENTATION_ARG: usize = 1;

/// Class-level state a method rewrite reads and updates.
pub struct RewriteScope<'a> {
    /// The class containing the method
    pub context: &'a ModuleContext,
    /// Accessors created so far for this class
    pub table: &'a mut AccessorTable,
    /// External collaborators
    pub services: &'a RewriteServices<'a>,
    /// Bootstrap class whose call sites are rewritten
    pub factory_owner: &'a str,
}

/// Rewrites the instructions of one method.
///
/// A rewriter only exists for methods that are kept; see [`InstructionRewriter::for_method`].
/// Instructions other than lambda call sites are forwarded exactly as received.
#[derive(Debug, Default)]
pub struct InstructionRewriter {
    rewritten: usize,
}

impl InstructionRewriter {
    /// A rewriter for `method`, or `None` if the method must be removed from the class.
    ///
    /// The only removed method is the compiler's `$deserializeLambda$` hook: backported lambdas
    /// are serialized as plain instances, so the hook has nothing left to do.
    #[must_use]
    pub fn for_method(method: &MethodHeader) -> Option<Self> {
        if is_deserialization_hook(method) {
            log::trace!("Dropping {}{}", method.name, method.descriptor);
            return None;
        }
        Some(InstructionRewriter { rewritten: 0 })
    }

    /// Number of call sites replaced so far
    #[must_use]
    pub fn rewritten(&self) -> usize {
        self.rewritten
    }

    /// Process one instruction, writing the result to `next`
    ///
    /// # Errors
    ///
    /// Returns an error if a lambda call site is malformed, or if resolving its accessor, loading
    /// the class or reifying the lambda fails. Errors from `next` are propagated.
    pub fn visit_instruction(
        &mut self,
        instruction: Instruction,
        scope: &mut RewriteScope<'_>,
        next: &mut dyn ModuleSink,
    ) -> Result<()> {
        match instruction {
            Instruction::InvokeDynamic(site) if site.bootstrap.owner == scope.factory_owner => {
                self.backport_lambda(&site, scope, next)
            }
            other => next.visit_instruction(other),
        }
    }

    fn backport_lambda(
        &mut self,
        site: &CallSite,
        scope: &mut RewriteScope<'_>,
        next: &mut dyn ModuleSink,
    ) -> Result<()> {
        let invoker = scope.services.loader.load(&scope.context.name)?;

        let implementation = site
            .bootstrap_args
            .get(IMPLEMENTATION_ARG)
            .and_then(BootstrapArg::as_handle)
            .ok_or_else(|| {
                malformed_error!(
                    "Lambda call site {}{} in {} has no implementation method handle",
                    site.name,
                    site.descriptor,
                    scope.context.name
                )
            })?;
        let accessor = scope
            .table
            .resolve(implementation, scope.context, scope.services.index)?;

        let factory = scope.services.reifier.reify(&ReifyRequest {
            implementation,
            accessor: &accessor,
            invoker: &invoker,
            invoked_name: &site.name,
            invoked_type: &site.descriptor,
            bootstrap: &site.bootstrap,
            bootstrap_args: &site.bootstrap_args,
        })?;
        log::trace!(
            "{}: {} -> {}.{}{}",
            scope.context.name,
            implementation,
            factory.owner,
            factory.name,
            factory.descriptor
        );

        self.rewritten += 1;
        next.visit_instruction(Instruction::Method {
            opcode: Opcode::Invokestatic,
            owner: factory.owner,
            name: factory.name,
            descriptor: factory.descriptor,
            interface: false,
        })
    }
}
