//! Identifier and type-name interning.
//!
//! Every class, feature and variable name flowing through the analysis is
//! an interned [`symbol::Symbol`]. The table is process-wide and only ever
//! grows; the names the built-in classes need are seeded up front so they
//! can be matched on as constants.

pub mod symbol;
