use thiserror::Error;

use crate::model::MethodRef;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// # Error Categories
///
/// ## Structural Errors
/// - [`Error::Malformed`] - Invalid descriptors, unexpected bootstrap arguments, or a sink
///   protocol violation that would produce an invalid class file
///
/// ## Consistency Errors
/// - [`Error::NotAnalyzed`] - A method owned by the class being rewritten is missing from
///   the method index, meaning the index was not built over the full input set
///
/// ## Collaborator Errors
/// - [`Error::ClassLoad`] - The runtime type loader could not resolve a class
/// - [`Error::Reification`] - The lambda reifier failed to produce a factory method
/// - [`Error::SequenceReset`] - The lambda class counter could not be reset (never fatal)
///
/// # Examples
///
/// ```rust
/// use lambdascope::Error;
///
/// fn describe(err: &Error) -> &'static str {
///     match err {
///         Error::NotAnalyzed(_) => "index is incomplete",
///         Error::ClassLoad { .. } => "class could not be loaded",
///         Error::Malformed { .. } => "malformed input",
///         _ => "other",
///     }
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// The input is damaged, or an edit would leave the output structurally invalid.
    ///
    /// # Fields
    ///
    /// * `message` - Detailed description of what was malformed
    /// * `file` - Source file where the error was detected
    /// * `line` - Source line where the error was detected
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// A lambda implementation method declared by the class being rewritten is not in the
    /// method index.
    ///
    /// The index is expected to cover every class of the input set, so this always
    /// indicates an internal inconsistency and is never recovered.
    #[error("Non-analyzed method {0}. Report this as a bug.")]
    NotAnalyzed(MethodRef),

    /// The runtime type loader failed to resolve a class.
    #[error("Failed to load class {name} - {reason}")]
    ClassLoad {
        /// Binary name of the class that failed to load
        name: String,
        /// Why the loader gave up
        reason: String,
    },

    /// The lambda reifier failed.
    #[error("Lambda reification failed - {0}")]
    Reification(String),

    /// The process-wide lambda class counter could not be reset.
    ///
    /// Only reported to the rewrite engine, which logs it and carries on.
    #[error("Failed to reset lambda class numbering - {0}")]
    SequenceReset(String),
}
