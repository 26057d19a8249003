//! Per-class stage of the lambda backport.

use crate::{
    config::BackportConfig,
    lambda::{AccessorTable, InstructionRewriter, ModuleContext, RewriteScope, RewriteServices},
    model::{AccessFlags, Instruction, MethodHeader, ModuleHeader, ModuleSink},
    Result,
};

/// What the engine changed in one class
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RewriteStats {
    /// Lambda call sites replaced by factory calls
    pub call_sites_rewritten: usize,
    /// Synthetic accessor methods added
    pub accessors_emitted: usize,
    /// Deserialization hooks removed
    pub hooks_removed: usize,
}

/// Rewrites the lambda call sites of one class while streaming it to `next`.
///
/// The engine sits in front of another [`ModuleSink`] and forwards every event, except that
///
/// - the lambda deserialization hook is dropped,
/// - every metafactory `invokedynamic` becomes an `invokestatic` of the factory returned by
///   the reifier,
/// - accessors created along the way are appended as static synthetic methods right before
///   the class end.
///
/// One engine handles exactly one class; its accessor table is never shared.
///
/// # Examples
///
/// ```rust,ignore
/// let mut engine = RewriteEngine::new(ModuleWriter::new(), services, &config);
/// module.accept(&mut engine)?;
/// let stats = *engine.stats();
/// let rewritten = engine.into_inner().finish()?;
/// ```
pub struct RewriteEngine<'a, S: ModuleSink> {
    next: S,
    services: RewriteServices<'a>,
    config: &'a BackportConfig,
    context: Option<ModuleContext>,
    table: AccessorTable,
    current: Option<InstructionRewriter>,
    stats: RewriteStats,
}

impl<'a, S: ModuleSink> RewriteEngine<'a, S> {
    /// Create an engine that writes to `next`
    pub fn new(next: S, services: RewriteServices<'a>, config: &'a BackportConfig) -> Self {
        RewriteEngine {
            next,
            services,
            config,
            context: None,
            table: AccessorTable::new(),
            current: None,
            stats: RewriteStats::default(),
        }
    }

    /// The class identity, once the header has been visited
    #[must_use]
    pub fn context(&self) -> Option<&ModuleContext> {
        self.context.as_ref()
    }

    /// Changes made so far
    #[must_use]
    pub fn stats(&self) -> &RewriteStats {
        &self.stats
    }

    /// Give back the downstream sink
    pub fn into_inner(self) -> S {
        self.next
    }

    fn reset_sequence(&self) {
        if let Err(err) = self.services.counter.reset() {
            log::warn!(
                "Failed to start lambda class numbering from zero. This is cosmetic, generated \
                 class names may differ between runs: {err}"
            );
        }
    }
}

impl<S: ModuleSink> ModuleSink for RewriteEngine<'_, S> {
    fn visit_header(&mut self, header: &ModuleHeader) -> Result<()> {
        if self.config.reset_sequence {
            self.reset_sequence();
        }
        self.context = Some(ModuleContext::from_header(header));
        self.table = AccessorTable::new();
        self.next.visit_header(header)
    }

    fn visit_method(&mut self, method: &MethodHeader) -> Result<bool> {
        let Some(rewriter) = InstructionRewriter::for_method(method) else {
            self.stats.hooks_removed += 1;
            return Ok(false);
        };
        if !self.next.visit_method(method)? {
            return Ok(false);
        }
        self.current = Some(rewriter);
        Ok(true)
    }

    fn visit_instruction(&mut self, instruction: Instruction) -> Result<()> {
        let (Some(context), Some(rewriter)) = (self.context.as_ref(), self.current.as_mut()) else {
            return Err(malformed_error!("Instruction {} outside of a method", instruction));
        };

        let mut scope = RewriteScope {
            context,
            table: &mut self.table,
            services: &self.services,
            factory_owner: &self.config.factory_owner,
        };
        rewriter.visit_instruction(instruction, &mut scope, &mut self.next)
    }

    fn visit_method_end(&mut self) -> Result<()> {
        if let Some(rewriter) = self.current.take() {
            self.stats.call_sites_rewritten += rewriter.rewritten();
        }
        self.next.visit_method_end()
    }

    fn visit_end(&mut self) -> Result<()> {
        for (accessor, implementation) in self.table.take() {
            self.services.emitter.emit(
                &mut self.next,
                AccessFlags::STATIC | AccessFlags::SYNTHETIC,
                &accessor,
                &implementation,
            )?;
            self.stats.accessors_emitted += 1;
        }

        if let Some(context) = &self.context {
            log::debug!(
                "{}: {} lambda call sites, {} accessors, {} hooks removed",
                context.name,
                self.stats.call_sites_rewritten,
                self.stats.accessors_emitted,
                self.stats.hooks_removed
            );
        }
        self.next.visit_end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        lambda::{
            AtomicSequence, ForwardingEmitter, NoSequence, SequenceCounter,
            DESERIALIZATION_HOOK_DESC, DESERIALIZATION_HOOK_NAME,
        },
        model::{MethodRef, Module, ModuleWriter, Opcode, ReferenceKind},
        test::{lambda_site, method, Fixture, RecordingReifier},
        Error,
    };

    struct BrokenCounter;

    impl SequenceCounter for BrokenCounter {
        fn reset(&self) -> Result<()> {
            Err(Error::SequenceReset("counter field is inaccessible".to_string()))
        }
    }

    fn rewrite(
        module: &Module,
        fixture: &Fixture,
        reifier: &RecordingReifier,
        counter: &dyn SequenceCounter,
    ) -> Result<(Module, RewriteStats)> {
        let config = BackportConfig::default();
        let services = RewriteServices {
            index: &fixture.index,
            loader: &fixture.index,
            reifier,
            counter,
            emitter: &ForwardingEmitter,
        };
        let mut engine = RewriteEngine::new(ModuleWriter::new(), services, &config);
        module.accept(&mut engine)?;
        let stats = *engine.stats();
        Ok((engine.into_inner().finish()?, stats))
    }

    fn main_module(fixture: &Fixture) -> Module {
        fixture.module("app/Main").unwrap().clone()
    }

    #[test]
    fn test_private_instance_lambda_gets_accessor() {
        let fixture = Fixture::sample();
        let reifier = RecordingReifier::default();
        let (module, stats) =
            rewrite(&main_module(&fixture), &fixture, &reifier, &NoSequence).unwrap();

        let accessor = module.method_named("access$lambda$0").unwrap();
        assert_eq!(
            accessor.header.access,
            AccessFlags::STATIC | AccessFlags::SYNTHETIC
        );
        assert_eq!(accessor.header.descriptor.to_string(), "(Lapp/Main;)V");
        assert_eq!(stats.accessors_emitted, 1);
        assert_eq!(stats.call_sites_rewritten, 2);
        assert_eq!(stats.hooks_removed, 1);

        // Accessors come after the methods of the input class
        assert_eq!(
            module.methods.last().unwrap().header.name,
            "access$lambda$0"
        );
    }

    #[test]
    fn test_hook_is_removed() {
        let fixture = Fixture::sample();
        let reifier = RecordingReifier::default();
        let (module, _) =
            rewrite(&main_module(&fixture), &fixture, &reifier, &NoSequence).unwrap();

        assert!(module.method_named(DESERIALIZATION_HOOK_NAME).is_none());
        assert!(module
            .methods
            .iter()
            .all(|m| m.header.descriptor.to_string() != DESERIALIZATION_HOOK_DESC));
    }

    #[test]
    fn test_no_invokedynamic_left_for_metafactory() {
        let fixture = Fixture::sample();
        let reifier = RecordingReifier::default();
        let (module, _) =
            rewrite(&main_module(&fixture), &fixture, &reifier, &NoSequence).unwrap();

        let remaining = module
            .methods
            .iter()
            .flat_map(|m| m.code.iter())
            .filter_map(Instruction::as_call_site)
            .filter(|site| site.bootstrap.owner == crate::lambda::LAMBDA_METAFACTORY)
            .count();
        assert_eq!(remaining, 0);
    }

    #[test]
    fn test_counter_is_reset_per_class() {
        let fixture = Fixture::sample();
        let reifier = RecordingReifier::default();
        let counter = AtomicSequence::new();
        counter.next();
        counter.next();

        rewrite(&main_module(&fixture), &fixture, &reifier, &counter).unwrap();
        assert_eq!(counter.current(), 0);
    }

    #[test]
    fn test_counter_failure_is_not_fatal() {
        let fixture = Fixture::sample();
        let reifier = RecordingReifier::default();
        let (module, stats) =
            rewrite(&main_module(&fixture), &fixture, &reifier, &BrokenCounter).unwrap();
        assert_eq!(stats.call_sites_rewritten, 2);
        assert!(module.method_named("access$lambda$0").is_some());
    }

    #[test]
    fn test_counter_reset_can_be_disabled() {
        let fixture = Fixture::sample();
        let reifier = RecordingReifier::default();
        let counter = AtomicSequence::new();
        counter.next();

        let config = BackportConfig::new().with_reset_sequence(false);
        let services = RewriteServices {
            index: &fixture.index,
            loader: &fixture.index,
            reifier: &reifier,
            counter: &counter,
            emitter: &ForwardingEmitter,
        };
        let mut engine = RewriteEngine::new(ModuleWriter::new(), services, &config);
        main_module(&fixture).accept(&mut engine).unwrap();
        assert_eq!(counter.current(), 1);
    }

    #[test]
    fn test_not_analyzed_owned_method_stops_the_class() {
        let fixture = Fixture::sample();
        let reifier = RecordingReifier::default();
        let ghost =
            MethodRef::parse(ReferenceKind::Static, "app/Main", "lambda$ghost$7", "()V").unwrap();
        let mut module = main_module(&fixture);
        module.methods.push(method(
            AccessFlags::PUBLIC,
            "haunt",
            "()V",
            vec![
                lambda_site("run", "()Ljava/lang/Runnable;", &ghost),
                Instruction::Simple(Opcode::Return),
            ],
        ));

        match rewrite(&module, &fixture, &reifier, &NoSequence) {
            Err(Error::NotAnalyzed(method)) => assert_eq!(method, ghost),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_instruction_outside_method_is_rejected() {
        let fixture = Fixture::sample();
        let reifier = RecordingReifier::default();
        let config = BackportConfig::default();
        let services = RewriteServices {
            index: &fixture.index,
            loader: &fixture.index,
            reifier: &reifier,
            counter: &NoSequence,
            emitter: &ForwardingEmitter,
        };
        let mut engine = RewriteEngine::new(ModuleWriter::new(), services, &config);
        engine
            .visit_header(&fixture.module("app/Main").unwrap().header)
            .unwrap();
        assert!(engine.context().is_some());
        assert!(matches!(
            engine.visit_instruction(Instruction::Simple(Opcode::Nop)),
            Err(Error::Malformed { .. })
        ));
    }

    #[test]
    fn test_class_without_lambdas_is_unchanged() {
        let fixture = Fixture::sample();
        let reifier = RecordingReifier::default();
        let plain = Module {
            header: fixture.module("app/Main").unwrap().header.clone(),
            methods: vec![method(
                AccessFlags::PUBLIC,
                "size",
                "()I",
                vec![
                    Instruction::Simple(Opcode::Iconst0),
                    Instruction::Simple(Opcode::Ireturn),
                ],
            )],
        };

        let (module, stats) = rewrite(&plain, &fixture, &reifier, &NoSequence).unwrap();
        assert_eq!(module, plain);
        assert_eq!(stats, RewriteStats::default());
    }
}
