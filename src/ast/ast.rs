#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    errors::errors::{DiagnosticSink, ErrorImpl},
    symbol::symbol::Symbol,
    Position,
};

use super::expressions::{ExprArena, ExprId};

/// Program
///
/// The full parse result: every user class plus the arena that owns all
/// expression nodes referenced by their features.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Program {
    pub classes: Vec<Class>,
    pub exprs: ExprArena,
}

impl Program {
    pub fn new(classes: Vec<Class>, exprs: ExprArena) -> Self {
        Program { classes, exprs }
    }

    /// Checks that the features' expression ids form a forest over the
    /// arena: every id in range, every node owned by exactly one parent.
    /// A cycle reachable from a feature shows up as a shared node.
    /// Returns whether the arena is safe to check.
    pub fn validate(&self, diagnostics: &mut DiagnosticSink) -> bool {
        let len = self.exprs.len();
        let mut claimed = vec![false; len];
        let mut sound = true;

        for class in &self.classes {
            let roots = class.features.iter().filter_map(|feature| {
                let root = match feature {
                    Feature::Method(method) => method.body,
                    Feature::Attribute(attribute) => attribute.init,
                };
                root.map(|id| (id, feature.get_line()))
            });

            let mut to_visit: Vec<(ExprId, u32)> = roots.collect();
            to_visit.reverse();
            while let Some((id, line)) = to_visit.pop() {
                let Some(expr) = self.exprs.get(id) else {
                    diagnostics.report(
                        ErrorImpl::DanglingExpression { id: id.0, len },
                        class.position_at(line),
                    );
                    sound = false;
                    continue;
                };
                if claimed[id.index()] {
                    diagnostics.report(
                        ErrorImpl::SharedExpression { id: id.0 },
                        class.position_at(line),
                    );
                    sound = false;
                    continue;
                }
                claimed[id.index()] = true;
                to_visit.extend(
                    expr.kind
                        .children()
                        .into_iter()
                        .rev()
                        .map(|child| (child, expr.line)),
                );
            }
        }

        sound
    }
}

/// Class Declaration
///
/// `parent` is [`crate::symbol::symbol::NO_CLASS`] only for the root class.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Class {
    pub name: Symbol,
    pub parent: Symbol,
    pub features: Vec<Feature>,
    pub filename: Symbol,
    pub line: u32,
}

impl Class {
    pub fn new(name: Symbol, parent: Symbol, filename: Symbol, line: u32) -> Self {
        Class {
            name,
            parent,
            features: vec![],
            filename,
            line,
        }
    }

    pub fn with_feature(mut self, feature: Feature) -> Self {
        self.features.push(feature);
        self
    }

    pub fn get_position(&self) -> Position {
        Position(self.line, self.filename)
    }

    /// Position of some node inside this class's body.
    pub fn position_at(&self, line: u32) -> Position {
        Position(line, self.filename)
    }

    pub fn methods(&self) -> impl Iterator<Item = &Method> {
        self.features.iter().filter_map(|feature| match feature {
            Feature::Method(method) => Some(method),
            Feature::Attribute(_) => None,
        })
    }

    pub fn attributes(&self) -> impl Iterator<Item = &Attribute> {
        self.features.iter().filter_map(|feature| match feature {
            Feature::Attribute(attribute) => Some(attribute),
            Feature::Method(_) => None,
        })
    }

    /// First method declared under `name` in this class only.
    pub fn get_method(&self, name: Symbol) -> Option<&Method> {
        self.methods().find(|method| method.name == name)
    }
}

/// Feature
///
/// Methods and attributes live in separate namespaces.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Feature {
    Method(Method),
    Attribute(Attribute),
}

impl Feature {
    pub fn get_name(&self) -> Symbol {
        match self {
            Feature::Method(method) => method.name,
            Feature::Attribute(attribute) => attribute.name,
        }
    }

    pub fn get_line(&self) -> u32 {
        match self {
            Feature::Method(method) => method.line,
            Feature::Attribute(attribute) => attribute.line,
        }
    }
}

/// Method Declaration
///
/// A `None` body marks a native method of a built-in class.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Method {
    pub name: Symbol,
    pub formals: Vec<Formal>,
    pub return_type: Symbol,
    pub body: Option<ExprId>,
    pub line: u32,
}

/// Attribute Declaration
///
/// `init` is `None` when the declaration has no initializer.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Attribute {
    pub name: Symbol,
    pub type_decl: Symbol,
    pub init: Option<ExprId>,
    pub line: u32,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Formal {
    pub name: Symbol,
    pub type_decl: Symbol,
    pub line: u32,
}

impl Formal {
    pub fn new(name: Symbol, type_decl: Symbol, line: u32) -> Self {
        Formal {
            name,
            type_decl,
            line,
        }
    }
}
