#![allow(clippy::module_inception)]

//! Semantic analysis for a small class-based, single-inheritance language.
//!
//! The crate takes an already parsed [`ast::ast::Program`], validates its
//! class hierarchy, type-checks every feature body and annotates each
//! expression node with its static type.

use std::fmt::Display;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::symbol::symbol::{Symbol, BASIC_CLASS_FILE};

pub mod ast;
pub mod errors;
pub mod symbol;
pub mod type_checker;

/// A source location: line number plus the interned name of the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Position(pub u32, pub Symbol);

impl Position {
    /// Location attached to synthesized built-in classes.
    pub fn null() -> Self {
        Position(0, BASIC_CLASS_FILE)
    }

    pub fn line(&self) -> u32 {
        self.0
    }

    pub fn file(&self) -> Symbol {
        self.1
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.1, self.0)
    }
}
