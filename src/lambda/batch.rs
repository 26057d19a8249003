//! Rewriting whole classes and sets of classes held in memory.

use rayon::prelude::*;

use crate::{
    config::BackportConfig,
    lambda::{RewriteEngine, RewriteServices},
    model::{Module, ModuleWriter},
    Result,
};

/// Run one class through a [`RewriteEngine`] and collect the result.
///
/// # Errors
///
/// Returns the first error raised while rewriting; the partially written class is discarded.
pub fn rewrite_module(
    module: &Module,
    services: &RewriteServices<'_>,
    config: &BackportConfig,
) -> Result<Module> {
    let mut engine = RewriteEngine::new(ModuleWriter::new(), *services, config);
    module.accept(&mut engine)?;
    engine.into_inner().finish()
}

/// Rewrite every class of `modules`, keeping their order.
///
/// Classes are processed in parallel when [`BackportConfig::parallel`] is set. Each class gets
/// its own engine and accessor table; the services are shared.
///
/// # Errors
///
/// Fails if any class fails. With parallel processing, which of several failures is reported
/// is unspecified.
pub fn rewrite_modules(
    modules: &[Module],
    services: &RewriteServices<'_>,
    config: &BackportConfig,
) -> Result<Vec<Module>> {
    log::debug!(
        "Rewriting {} classes ({})",
        modules.len(),
        if config.parallel { "parallel" } else { "sequential" }
    );

    if config.parallel {
        modules
            .par_iter()
            .map(|module| rewrite_module(module, services, config))
            .collect()
    } else {
        modules
            .iter()
            .map(|module| rewrite_module(module, services, config))
            .collect()
    }
}
