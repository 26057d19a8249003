//! Collaborators the rewrite engine calls out to.
//!
//! None of these are implemented by the engine itself: lambda class generation, class loading
//! and the process-wide lambda class counter all belong to the embedding tool. The engine only
//! depends on the traits below, bundled together in [`RewriteServices`].

use std::sync::atomic::{AtomicU32, Ordering};

use crate::{
    index::MethodIndex,
    lambda::DelegateEmitter,
    model::{BootstrapArg, MethodDescriptor, MethodRef},
    Result,
};

/// Handle to a class resolved by a [`TypeLoader`]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RuntimeType {
    internal_name: String,
}

impl RuntimeType {
    /// Create a handle for the class with the given internal name
    pub fn new(internal_name: impl Into<String>) -> Self {
        RuntimeType {
            internal_name: internal_name.into(),
        }
    }

    /// Internal name, e.g. `com/example/Foo`
    #[must_use]
    pub fn internal_name(&self) -> &str {
        &self.internal_name
    }

    /// Binary name, e.g. `com.example.Foo`
    #[must_use]
    pub fn binary_name(&self) -> String {
        self.internal_name.replace('/', ".")
    }
}

/// Resolves classes in the active class loading context.
pub trait TypeLoader: Send + Sync {
    /// Resolve the class with the given internal name
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::ClassLoad`] if the class cannot be resolved.
    fn load(&self, internal_name: &str) -> Result<RuntimeType>;
}

/// Everything the reifier needs to know about one lambda call site.
#[derive(Debug, Clone, Copy)]
pub struct ReifyRequest<'a> {
    /// The lambda body as referenced by the call site
    pub implementation: &'a MethodRef,
    /// What the generated lambda class should call instead: the implementation itself or its
    /// synthetic accessor
    pub accessor: &'a MethodRef,
    /// The class containing the call site
    pub invoker: &'a RuntimeType,
    /// Name of the functional interface method
    pub invoked_name: &'a str,
    /// Captured argument types in, functional interface out
    pub invoked_type: &'a MethodDescriptor,
    /// The metafactory method
    pub bootstrap: &'a MethodRef,
    /// All static bootstrap arguments, unmodified
    pub bootstrap_args: &'a [BootstrapArg],
}

/// The static factory that creates lambda instances in place of a call site.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FactoryMethod {
    /// Internal name of the generated lambda class
    pub owner: String,
    /// Factory method name
    pub name: String,
    /// Same as the invoked type of the call site it replaces
    pub descriptor: MethodDescriptor,
}

/// Generates the class implementing a lambda and reports its factory method.
pub trait Reifier: Send + Sync {
    /// Reify the lambda of one call site
    ///
    /// # Errors
    ///
    /// Any error is fatal for the class being rewritten and is propagated unchanged.
    fn reify(&self, request: &ReifyRequest<'_>) -> Result<FactoryMethod>;
}

/// The process-wide counter used to number generated lambda classes.
///
/// Resetting it keeps generated class names stable across runs. The reset is cosmetic:
/// failures are logged and ignored by the engine.
pub trait SequenceCounter: Send + Sync {
    /// Restart numbering
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::SequenceReset`] if the counter is unavailable.
    fn reset(&self) -> Result<()>;
}

/// A [`SequenceCounter`] for runtimes that have no such counter
#[derive(Debug, Default, Clone, Copy)]
pub struct NoSequence;

impl SequenceCounter for NoSequence {
    fn reset(&self) -> Result<()> {
        Ok(())
    }
}

/// A [`SequenceCounter`] backed by an atomic integer.
///
/// Access is relaxed: concurrent rewrites may interleave resets and increments, which only
/// affects the numbers handed out, never correctness.
#[derive(Debug, Default)]
pub struct AtomicSequence {
    counter: AtomicU32,
}

impl AtomicSequence {
    /// Create a counter starting at zero
    #[must_use]
    pub fn new() -> Self {
        AtomicSequence {
            counter: AtomicU32::new(0),
        }
    }

    /// Hand out the next number
    pub fn next(&self) -> u32 {
        self.counter.fetch_add(1, Ordering::Relaxed)
    }

    /// The number the next call to [`AtomicSequence::next`] would return
    #[must_use]
    pub fn current(&self) -> u32 {
        self.counter.load(Ordering::Relaxed)
    }
}

impl SequenceCounter for AtomicSequence {
    fn reset(&self) -> Result<()> {
        self.counter.store(0, Ordering::Relaxed);
        Ok(())
    }
}

/// The collaborators shared by every class of a batch.
///
/// All members are read-only for the duration of the pass, so one `RewriteServices` may be
/// used by many concurrently running engines.
#[derive(Clone, Copy)]
pub struct RewriteServices<'a> {
    /// Declared methods of every class in the input
    pub index: &'a dyn MethodIndex,
    /// Resolves the class being rewritten for the reifier
    pub loader: &'a dyn TypeLoader,
    /// Builds lambda classes
    pub reifier: &'a dyn Reifier,
    /// Lambda class numbering
    pub counter: &'a dyn SequenceCounter,
    /// Writes accessor bodies
    pub emitter: &'a dyn DelegateEmitter,
}
