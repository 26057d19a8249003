//! Configuration for the lambda backport pass.

use crate::lambda::LAMBDA_METAFACTORY;

/// Configuration for the rewrite engine and batch driver.
///
/// # Examples
///
/// ```rust
/// use lambdascope::BackportConfig;
///
/// let config = BackportConfig::new().with_parallel(false);
/// assert!(config.reset_sequence);
/// assert_eq!(config.factory_owner, "java/lang/invoke/LambdaMetafactory");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackportConfig {
    /// Internal name of the bootstrap class whose call sites are rewritten
    /// (default: `java/lang/invoke/LambdaMetafactory`).
    pub factory_owner: String,

    /// Reset the lambda class counter at the start of every class (default: true).
    pub reset_sequence: bool,

    /// Rewrite the classes of a batch in parallel (default: true).
    pub parallel: bool,
}

impl Default for BackportConfig {
    fn default() -> Self {
        Self {
            factory_owner: LAMBDA_METAFACTORY.to_string(),
            reset_sequence: true,
            parallel: true,
        }
    }
}

impl BackportConfig {
    /// Creates a new configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a configuration for reproducible single-threaded runs.
    ///
    /// Classes are rewritten one after the other, so the counter resets never interleave and
    /// generated lambda class names are identical from run to run.
    #[must_use]
    pub fn deterministic() -> Self {
        Self {
            parallel: false,
            ..Self::default()
        }
    }

    /// Sets the bootstrap class whose call sites are rewritten.
    ///
    /// # Arguments
    ///
    /// * `owner` - Internal name of the bootstrap class.
    ///
    /// # Returns
    ///
    /// The modified configuration (builder pattern).
    #[must_use]
    pub fn with_factory_owner(mut self, owner: impl Into<String>) -> Self {
        self.factory_owner = owner.into();
        self
    }

    /// Enables or disables resetting the lambda class counter.
    #[must_use]
    pub fn with_reset_sequence(mut self, enabled: bool) -> Self {
        self.reset_sequence = enabled;
        self
    }

    /// Enables or disables parallel batch rewriting.
    #[must_use]
    pub fn with_parallel(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }
}
