// Copyright 2026 the antview developers and collaborators
// Licensed under the MIT License.

/*!
Error types for reading PCV grids.

Problems split into two kinds. A `StructuralFormatError` means the skeleton of
the input (the `ANT:`, `ZEN:` and `AZI:` lines) does not follow the format,
and nothing after it can be trusted. A `SampleFormatError` means one
antenna's block of values is bad; callers may report it and move on to the
next antenna.
*/

use antview_core::CoreError;
use std::io;
use thiserror::Error;

use crate::AxisKind;

/// The skeleton of the input does not follow the PCV grid format.
#[derive(Error, Debug)]
pub enum StructuralFormatError {
    #[error("failed to find a new antenna: skipped {budget} lines without an `ANT:` header (through line {line})")]
    HeaderNotFound { budget: usize, line: u64 },

    #[error("invalid `ANT:` line at line {line}: [{text}]")]
    InvalidHeader { line: u64, text: String },

    #[error("invalid `{}` line at line {line}: [{text}]", .kind.tag())]
    InvalidAxis {
        kind: AxisKind,
        line: u64,
        text: String,
    },

    #[error("{kind} axis from {start} to {stop} by {step} (line {line}) holds no grid points")]
    EmptyAxis {
        kind: AxisKind,
        line: u64,
        start: f64,
        stop: f64,
        step: f64,
    },

    #[error("grid of {zenith} by {azimuth} points (line {line}) is too large to read")]
    GridTooLarge {
        line: u64,
        zenith: usize,
        azimuth: usize,
    },

    #[error("input ended after line {line} while expecting a `{}` line", .kind.tag())]
    UnexpectedEof { kind: AxisKind, line: u64 },
}

/// One antenna's block of PCV values is unusable.
#[derive(Error, Debug)]
pub enum SampleFormatError {
    #[error("invalid PCV line at line {line} (sample {index} of {expected}): [{text}]")]
    InvalidSample {
        line: u64,
        index: usize,
        expected: usize,
        text: String,
    },

    #[error("input ended after {read} of {expected} PCV samples")]
    Truncated { read: usize, expected: usize },

    #[error("PCV samples do not fit the declared grid")]
    Shape(#[from] CoreError),
}

/// Any error that can arise while reading PCV grids.
#[derive(Error, Debug)]
pub enum PcvError {
    #[error(transparent)]
    Structural(#[from] StructuralFormatError),

    #[error(transparent)]
    Sample(#[from] SampleFormatError),

    #[error("failed to read PCV grid input")]
    Io(#[from] io::Error),
}

impl PcvError {
    /// Whether this error leaves the input in a state where reading cannot
    /// meaningfully continue.
    ///
    /// Only sample errors are recoverable.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, PcvError::Sample(_))
    }
}
