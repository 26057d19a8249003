//! Lambda backport: replaces lambda call sites with calls to pre-generated factory classes.
//!
//! Bytecode for newer runtimes creates lambda instances with an `invokedynamic` instruction
//! linked by `java/lang/invoke/LambdaMetafactory`. Older runtimes have neither the instruction
//! nor the factory. This module rewrites each such call site into an `invokestatic` of a
//! factory method on a lambda class generated ahead of time.
//!
//! # Architecture
//!
//! The rewrite is a streaming stage in front of any [`crate::model::ModuleSink`]:
//!
//! - [`RewriteEngine`] handles one class. It removes the deserialization hook, starts an
//!   [`InstructionRewriter`] for every kept method and appends synthetic accessors at the end.
//! - [`InstructionRewriter`] handles one method. Every metafactory call site is resolved,
//!   reified and replaced.
//! - [`AccessorTable`] decides, with [`needs_accessor`], whether the generated lambda class can
//!   call the implementation method directly, and allocates `access$lambda$<k>` forwarders
//!   when it cannot.
//!
//! Lambda class generation, class loading and the lambda class counter are external and
//! reached through the traits bundled in [`RewriteServices`].
//!
//! # Key Components
//!
//! ## Stages
//! - [`crate::lambda::RewriteEngine`] - Per-class stage, reports [`crate::lambda::RewriteStats`]
//! - [`crate::lambda::InstructionRewriter`] - Per-method stage
//! - [`crate::lambda::rewrite_module`], [`crate::lambda::rewrite_modules`] - In-memory drivers
//!
//! ## Accessors
//! - [`crate::lambda::AccessorTable`] - Per-class accessor allocation
//! - [`crate::lambda::DelegateEmitter`], [`crate::lambda::ForwardingEmitter`] - Accessor bodies
//!
//! ## Services
//! - [`crate::lambda::Reifier`] - Generates lambda classes
//! - [`crate::lambda::TypeLoader`] - Resolves the class containing a call site
//! - [`crate::lambda::SequenceCounter`] - Lambda class numbering
//!
//! # Usage Examples
//!
//! ```rust,ignore
//! use lambdascope::prelude::*;
//!
//! let index = ClassIndex::from_modules(&modules);
//! let services = RewriteServices {
//!     index: &index,
//!     loader: &index,
//!     reifier: &my_reifier,
//!     counter: &NoSequence,
//!     emitter: &ForwardingEmitter,
//! };
//! let rewritten = rewrite_modules(&modules, &services, &BackportConfig::default())?;
//! ```

mod accessor;
mod batch;
mod context;
mod delegate;
mod engine;
mod naming;
mod rewriter;
mod services;
mod visibility;

pub use accessor::{accessor_descriptor, AccessorTable};
pub use batch::{rewrite_module, rewrite_modules};
pub use context::{package_of, AggregateKind, ModuleContext};
pub use delegate::{forwarding_body, DelegateEmitter, ForwardingEmitter};
pub use engine::{RewriteEngine, RewriteStats};
pub use naming::{
    accessor_name, is_deserialization_hook, ACCESSOR_PREFIX, DESERIALIZATION_HOOK_DESC,
    DESERIALIZATION_HOOK_NAME, LAMBDA_METAFACTORY,
};
pub use rewriter::{InstructionRewriter, RewriteScope};
pub use services::{
    AtomicSequence, FactoryMethod, NoSequence, Reifier, ReifyRequest, RewriteServices,
    RuntimeType, SequenceCounter, TypeLoader,
};
pub use visibility::needs_accessor;
