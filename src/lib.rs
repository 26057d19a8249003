// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![deny(unsafe_code)]

//! # lambdascope
//!
//! Ahead-of-time lambda backporting for JVM class files.
//!
//! Class files compiled for Java 8 and later create lambda instances through an
//! `invokedynamic` instruction bootstrapped by `java/lang/invoke/LambdaMetafactory`. Runtimes
//! that predate the metafactory cannot link these call sites. `lambdascope` rewrites every such
//! call site into a plain `invokestatic` of a factory method on a lambda class generated ahead
//! of time, and adds the synthetic accessor methods the generated classes need to reach
//! private implementation methods.
//!
//! ## Features
//!
//! - **Streaming rewrite** - Classes flow through [`model::ModuleSink`] stages, no whole-program
//!   state is kept besides a read-only method index
//! - **Accessor synthesis** - Private and inaccessible protected implementation methods get
//!   `access$lambda$<k>` forwarders with correctly reshaped descriptors
//! - **Pluggable generation** - Lambda class generation, class loading and lambda class
//!   numbering are traits implemented by the embedding tool
//! - **Parallel batches** - Independent classes are rewritten concurrently with `rayon`
//!
//! ## Quick Start
//!
//! ### Using the Prelude
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
//! let rewritten = rewrite_modules(&modules, &services, &BackportConfig::deterministic())?;
//! ```
//!
//! ### Streaming
//!
//! [`lambda::RewriteEngine`] can sit in front of any sink, including a class writer of the
//! embedding tool:
//!
//! ```rust,ignore
//! let mut engine = RewriteEngine::new(my_writer, services, &config);
//! my_reader.accept(&mut engine)?;
//! log::info!("{:?}", engine.stats());
//! ```
//!
//! ## Error Handling
//!
//! All fallible operations return [`Result<T>`] with the crate-wide [`Error`] type. A failure
//! while rewriting a class is fatal for that class and is propagated unchanged; failing to
//! reset the lambda class counter only produces a warning through the `log` facade.

#[macro_use]
pub(crate) mod error;
mod config;

/// Shared functionality which is used in unit-tests
#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types and traits.
///
/// # Example
///
/// ```rust
/// use lambdascope::prelude::*;
///
/// let config = BackportConfig::deterministic();
/// assert!(!config.parallel);
/// ```
pub mod prelude;

/// Symbolic class file model and the streaming sink interface
pub mod model;

/// Declared-method index over the classes of one batch
pub mod index;

/// Lambda call site rewriting
pub mod lambda;

/// `lambdascope` Result type
///
/// A type alias for `std::result::Result<T, Error>` where the error type is always [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// `lambdascope` Error type
///
/// The main error type for all operations in this crate.
pub use error::Error;

/// Configuration of the backport pass
pub use config::BackportConfig;
