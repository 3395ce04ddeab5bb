use std::{fmt::Display, ops::Index};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::symbol::symbol::Symbol;

/// Expression Id
/// Stable index of a node inside its [`ExprArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct ExprId(pub u32);

impl ExprId {
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

/// Expression
/// A single node. `static_type` stays `None` until the type checker has run,
/// and stays `None` afterwards for nodes that legitimately have no type.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Expr {
    pub kind: ExprKind,
    pub line: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub static_type: Option<Symbol>,
}

/// Arithmetic operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ArithOp {
    Plus,
    Sub,
    Mul,
    Div,
}

impl Display for ArithOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let op = match self {
            ArithOp::Plus => "+",
            ArithOp::Sub => "-",
            ArithOp::Mul => "*",
            ArithOp::Div => "/",
        };
        write!(f, "{}", op)
    }
}

/// Ordering comparisons. Equality has its own rule and its own kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CompareOp {
    Lt,
    Le,
}

impl Display for CompareOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompareOp::Lt => write!(f, "<"),
            CompareOp::Le => write!(f, "<="),
        }
    }
}

/// One `name : Type => expr` arm of a case expression.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CaseBranch {
    pub name: Symbol,
    pub type_decl: Symbol,
    pub expr: ExprId,
    pub line: u32,
}

/// Expression Kinds
///
/// Defines the various kinds of expressions in the AST.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ExprKind {
    Assign {
        name: Symbol,
        value: ExprId,
    },
    /// `receiver@type_name.method(args)`
    StaticDispatch {
        receiver: ExprId,
        type_name: Symbol,
        method: Symbol,
        args: Vec<ExprId>,
    },
    /// `receiver.method(args)`
    Dispatch {
        receiver: ExprId,
        method: Symbol,
        args: Vec<ExprId>,
    },
    Cond {
        pred: ExprId,
        then_branch: ExprId,
        else_branch: ExprId,
    },
    Loop {
        pred: ExprId,
        body: ExprId,
    },
    Case {
        scrutinee: ExprId,
        branches: Vec<CaseBranch>,
    },
    Block {
        body: Vec<ExprId>,
    },
    Let {
        name: Symbol,
        type_decl: Symbol,
        init: ExprId,
        body: ExprId,
    },
    Arith {
        op: ArithOp,
        left: ExprId,
        right: ExprId,
    },
    Compare {
        op: CompareOp,
        left: ExprId,
        right: ExprId,
    },
    Eq {
        left: ExprId,
        right: ExprId,
    },
    /// `~e`
    Neg(ExprId),
    /// `not e`
    Not(ExprId),
    IntConst(i32),
    BoolConst(bool),
    StringConst(String),
    New(Symbol),
    IsVoid(ExprId),
    /// Placeholder for an omitted initializer.
    NoExpr,
    /// A reference to an identifier.
    Object(Symbol),
}

impl ExprKind {
    /// Direct subexpressions, left to right.
    pub fn children(&self) -> Vec<ExprId> {
        match self {
            ExprKind::Assign { value, .. } => vec![*value],
            ExprKind::StaticDispatch { receiver, args, .. }
            | ExprKind::Dispatch { receiver, args, .. } => {
                std::iter::once(*receiver).chain(args.iter().copied()).collect()
            }
            ExprKind::Cond {
                pred,
                then_branch,
                else_branch,
            } => vec![*pred, *then_branch, *else_branch],
            ExprKind::Loop { pred, body } => vec![*pred, *body],
            ExprKind::Case {
                scrutinee,
                branches,
            } => std::iter::once(*scrutinee)
                .chain(branches.iter().map(|branch| branch.expr))
                .collect(),
            ExprKind::Block { body } => body.clone(),
            ExprKind::Let { init, body, .. } => vec![*init, *body],
            ExprKind::Arith { left, right, .. }
            | ExprKind::Compare { left, right, .. }
            | ExprKind::Eq { left, right } => vec![*left, *right],
            ExprKind::Neg(operand) | ExprKind::Not(operand) | ExprKind::IsVoid(operand) => {
                vec![*operand]
            }
            ExprKind::IntConst(_)
            | ExprKind::BoolConst(_)
            | ExprKind::StringConst(_)
            | ExprKind::New(_)
            | ExprKind::NoExpr
            | ExprKind::Object(_) => vec![],
        }
    }
}

/// Expression Arena
///
/// Owns every expression node of a program. Nodes are only ever appended,
/// so an [`ExprId`] stays valid for the arena's whole lifetime.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct ExprArena {
    nodes: Vec<Expr>,
}

impl ExprArena {
    pub fn new() -> Self {
        ExprArena { nodes: vec![] }
    }

    pub fn alloc(&mut self, kind: ExprKind, line: u32) -> ExprId {
        self.nodes.push(Expr {
            kind,
            line,
            static_type: None,
        });
        ExprId((self.nodes.len() - 1) as u32)
    }

    pub fn get(&self, id: ExprId) -> Option<&Expr> {
        self.nodes.get(id.index())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ExprId, &Expr)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(index, expr)| (ExprId(index as u32), expr))
    }

    /// Returns the inferred type of a node, once annotated.
    pub fn type_of(&self, id: ExprId) -> Option<Symbol> {
        self.nodes.get(id.index()).and_then(|node| node.static_type)
    }

    /// Writes the checker's results into the nodes' type slots.
    pub fn annotate(&mut self, types: &TypeTable) {
        for (node, static_type) in self.nodes.iter_mut().zip(types.slots.iter()) {
            node.static_type = *static_type;
        }
    }
}

impl Index<ExprId> for ExprArena {
    type Output = Expr;

    fn index(&self, id: ExprId) -> &Self::Output {
        &self.nodes[id.index()]
    }
}

/// Type Table
///
/// Inferred types kept alongside the arena, one slot per node, so the
/// checker only needs shared access to the tree itself.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypeTable {
    slots: Vec<Option<Symbol>>,
}

impl TypeTable {
    pub fn for_arena(arena: &ExprArena) -> Self {
        TypeTable {
            slots: vec![None; arena.len()],
        }
    }

    pub fn set(&mut self, id: ExprId, static_type: Option<Symbol>) {
        if let Some(slot) = self.slots.get_mut(id.index()) {
            *slot = static_type;
        }
    }

    pub fn get(&self, id: ExprId) -> Option<Symbol> {
        self.slots.get(id.index()).copied().flatten()
    }
}
