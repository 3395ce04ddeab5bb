//! Error types and diagnostic collection for semantic analysis.
//!
//! This module defines:
//!
//! - `ErrorImpl`, one variant per semantic error kind, whose display text is
//!   the diagnostic message
//! - `Error`, an error kind paired with the position it was found at
//! - `DiagnosticSink`, the ordered append-only list the checker reports to
//! - `SemantError`, the outcome of a phase that found at least one error

pub mod errors;
