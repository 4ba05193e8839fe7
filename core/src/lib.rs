// Copyright 2026 the antview developers and collaborators
// Licensed under the MIT License.

//! Core types and helpers for the antview tools.
//!
//! This crate holds the pieces shared by the PCV grid reader and the
//! command-line program: a small error type, line-oriented I/O helpers,
//! numerics for stepped axes, and (with the `notifications` feature) the
//! framework used to tell the user what is going on.

pub mod errors;
pub mod io;
#[cfg(feature = "notifications")]
pub mod notify;
pub mod num;

pub use errors::{CoreError, Result};
