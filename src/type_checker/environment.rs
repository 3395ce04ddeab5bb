use std::collections::HashMap;

use crate::symbol::symbol::Symbol;

/// Environment
///
/// Identifier bindings for the body of one class, as a stack of frames. The
/// innermost binding of a name shadows outer ones. Bound types are stored
/// already resolved, so SELF_TYPE never appears as a value here.
#[derive(Debug)]
pub struct Environment {
    frames: Vec<HashMap<Symbol, Symbol>>,
}

impl Environment {
    /// Starts with a single, outermost frame.
    pub fn new() -> Self {
        Environment {
            frames: vec![HashMap::new()],
        }
    }

    pub fn enter_scope(&mut self) {
        self.frames.push(HashMap::new());
    }

    /// Pops the innermost frame. The outermost frame is never popped.
    pub fn exit_scope(&mut self) {
        if self.frames.len() > 1 {
            self.frames.pop();
        }
    }

    /// Binds `name` in the innermost frame, replacing any binding it already
    /// had there.
    pub fn bind(&mut self, name: Symbol, type_decl: Symbol) {
        if let Some(frame) = self.frames.last_mut() {
            frame.insert(name, type_decl);
        }
    }

    pub fn lookup(&self, name: Symbol) -> Option<Symbol> {
        self.frames
            .iter()
            .rev()
            .find_map(|frame| frame.get(&name).copied())
    }

    /// Looks only at the innermost frame.
    pub fn probe(&self, name: Symbol) -> Option<Symbol> {
        self.frames.last().and_then(|frame| frame.get(&name).copied())
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}
