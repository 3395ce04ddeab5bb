use std::{
    collections::HashMap,
    fmt::{Debug, Display},
    sync::{Arc, Mutex},
};

use lazy_static::lazy_static;
#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Names seeded into the table in this exact order. The constants below
/// index into it.
const PREDEFINED: &[&str] = &[
    "Object",
    "IO",
    "Int",
    "Bool",
    "String",
    "SELF_TYPE",
    "self",
    "_no_class",
    "_no_type",
    "_prim_slot",
    "abort",
    "type_name",
    "copy",
    "out_string",
    "out_int",
    "in_string",
    "in_int",
    "length",
    "concat",
    "substr",
    "arg",
    "arg2",
    "_val",
    "_str_field",
    "Main",
    "main",
    "<basic class>",
];

pub const OBJECT: Symbol = Symbol(0);
pub const IO: Symbol = Symbol(1);
pub const INT: Symbol = Symbol(2);
pub const BOOL: Symbol = Symbol(3);
pub const STRING: Symbol = Symbol(4);
pub const SELF_TYPE: Symbol = Symbol(5);
pub const SELF: Symbol = Symbol(6);
/// Parent of the root class. Can never name a user class.
pub const NO_CLASS: Symbol = Symbol(7);
/// Printed in place of an expression that has no type.
pub const NO_TYPE: Symbol = Symbol(8);
pub const PRIM_SLOT: Symbol = Symbol(9);
pub const ABORT: Symbol = Symbol(10);
pub const TYPE_NAME: Symbol = Symbol(11);
pub const COPY: Symbol = Symbol(12);
pub const OUT_STRING: Symbol = Symbol(13);
pub const OUT_INT: Symbol = Symbol(14);
pub const IN_STRING: Symbol = Symbol(15);
pub const IN_INT: Symbol = Symbol(16);
pub const LENGTH: Symbol = Symbol(17);
pub const CONCAT: Symbol = Symbol(18);
pub const SUBSTR: Symbol = Symbol(19);
pub const ARG: Symbol = Symbol(20);
pub const ARG2: Symbol = Symbol(21);
pub const VAL: Symbol = Symbol(22);
pub const STR_FIELD: Symbol = Symbol(23);
pub const MAIN: Symbol = Symbol(24);
pub const MAIN_METHOD: Symbol = Symbol(25);
pub const BASIC_CLASS_FILE: Symbol = Symbol(26);

lazy_static! {
    static ref SYMBOL_TABLE: Mutex<SymbolTable> = Mutex::new(SymbolTable::with_predefined());
}

/// Backing storage for [`Symbol`]. Insert-only.
#[derive(Debug, Default)]
struct SymbolTable {
    names: Vec<Arc<str>>,
    lookup: HashMap<Arc<str>, Symbol>,
}

impl SymbolTable {
    fn with_predefined() -> Self {
        let mut table = SymbolTable::default();
        for name in PREDEFINED {
            table.get_or_insert(name);
        }
        table
    }

    fn get_or_insert(&mut self, name: &str) -> Symbol {
        if let Some(symbol) = self.lookup.get(name) {
            return *symbol;
        }

        let symbol = Symbol(self.names.len() as u32);
        let name: Arc<str> = Arc::from(name);
        self.names.push(Arc::clone(&name));
        self.lookup.insert(name, symbol);
        symbol
    }

    fn get(&self, name: &str) -> Option<Symbol> {
        self.lookup.get(name).copied()
    }

    fn name(&self, symbol: Symbol) -> Arc<str> {
        Arc::clone(&self.names[symbol.0 as usize])
    }
}

fn table() -> std::sync::MutexGuard<'static, SymbolTable> {
    // The table is never left half-updated, so a poisoned lock is still usable.
    SYMBOL_TABLE
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Canonical handle for an identifier or type name.
///
/// Two symbols are equal exactly when their strings are equal, so names can
/// be compared and hashed without touching the text.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol(u32);

impl Symbol {
    /// Returns the handle for `name`, registering it if this is the first
    /// time it has been seen.
    pub fn intern(name: &str) -> Symbol {
        table().get_or_insert(name)
    }

    /// Looks a name up without registering it.
    pub fn lookup(name: &str) -> Option<Symbol> {
        table().get(name)
    }

    pub fn as_str(&self) -> Arc<str> {
        table().name(*self)
    }

    pub fn index(&self) -> u32 {
        self.0
    }

    /// True for the three value classes that cannot be inherited from or
    /// compared against a different type.
    pub fn is_basic_value(&self) -> bool {
        matches!(*self, INT | BOOL | STRING)
    }
}

impl From<&str> for Symbol {
    fn from(name: &str) -> Self {
        Symbol::intern(name)
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Debug for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Symbol({:?})", self.as_str())
    }
}

// Symbols travel as plain strings and are re-interned on the way in.
#[cfg(feature = "serde")]
impl Serialize for Symbol {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.as_str())
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for Symbol {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        Ok(Symbol::intern(&name))
    }
}
