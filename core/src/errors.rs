// Copyright 2026 the antview developers and collaborators
// Licensed under the MIT License.

/*!
The core error type used by antview crates.

Format-specific crates define their own error enums and wrap this one where
they lean on the helpers in this crate.
*/

use thiserror::Error;

/// The generic error type.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum CoreError {
    /// An error that occurs when a flat buffer does not have the number of
    /// elements implied by an array shape.
    #[error("expected {expected} elements to fill a {shape:?} array but found {actual}")]
    DimensionMismatch {
        shape: Vec<usize>,
        expected: usize,
        actual: usize,
    },
}

/// A `Result` whose error type defaults to `CoreError`.
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
