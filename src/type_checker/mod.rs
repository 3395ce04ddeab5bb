//! Type checking and semantic analysis module.
//!
//! This module validates a parsed program and decorates its expression tree:
//!
//! - Building the class table from the built-in and user classes
//! - Rejecting duplicate classes, bad parents and inheritance cycles
//! - Checking every class's features, including method overrides
//! - Assigning a static type to every expression node
//!
//! Each class is checked with its own scope environment and diagnostic sink
//! against the frozen class table; the driver in [`type_checker`] merges the
//! results.

pub mod builtins;
pub mod class;
pub mod class_table;
pub mod environment;
pub mod expr;
pub mod type_checker;
