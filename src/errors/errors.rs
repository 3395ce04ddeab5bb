use std::fmt::Display;

use thiserror::Error;

use crate::{symbol::symbol::Symbol, Position};

#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    internal_error: ErrorImpl,
    position: Position,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            internal_error: error_impl,
            position,
        }
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn get_kind(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn get_message(&self) -> String {
        self.internal_error.to_string()
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::DanglingExpression { .. } => "DanglingExpression",
            ErrorImpl::SharedExpression { .. } => "SharedExpression",
            ErrorImpl::ClassRedefined { .. } => "ClassRedefined",
            ErrorImpl::UndefinedParent { .. } => "UndefinedParent",
            ErrorImpl::IllegalInheritance { .. } => "IllegalInheritance",
            ErrorImpl::InheritanceCycle { .. } => "InheritanceCycle",
            ErrorImpl::MethodRedefined { .. } => "MethodRedefined",
            ErrorImpl::AttributeRedefined { .. } => "AttributeRedefined",
            ErrorImpl::InheritedAttributeRedefined { .. } => "InheritedAttributeRedefined",
            ErrorImpl::SelfAttribute => "SelfAttribute",
            ErrorImpl::OverrideReturnType { .. } => "OverrideReturnType",
            ErrorImpl::OverrideArity { .. } => "OverrideArity",
            ErrorImpl::OverrideParameterType { .. } => "OverrideParameterType",
            ErrorImpl::UndefinedAttributeType { .. } => "UndefinedAttributeType",
            ErrorImpl::AttributeInitMismatch { .. } => "AttributeInitMismatch",
            ErrorImpl::UndefinedFormalType { .. } => "UndefinedFormalType",
            ErrorImpl::FormalRedefined { .. } => "FormalRedefined",
            ErrorImpl::SelfFormal => "SelfFormal",
            ErrorImpl::UndefinedReturnType { .. } => "UndefinedReturnType",
            ErrorImpl::ReturnTypeMismatch { .. } => "ReturnTypeMismatch",
            ErrorImpl::UndeclaredAssignee { .. } => "UndeclaredAssignee",
            ErrorImpl::AssignToSelf => "AssignToSelf",
            ErrorImpl::AssignMismatch { .. } => "AssignMismatch",
            ErrorImpl::StaticDispatchToSelfType => "StaticDispatchToSelfType",
            ErrorImpl::StaticDispatchMismatch { .. } => "StaticDispatchMismatch",
            ErrorImpl::UndefinedStaticMethod { .. } => "UndefinedStaticMethod",
            ErrorImpl::UndefinedMethod { .. } => "UndefinedMethod",
            ErrorImpl::WrongArgumentCount { .. } => "WrongArgumentCount",
            ErrorImpl::ArgumentMismatch { .. } => "ArgumentMismatch",
            ErrorImpl::IfPredicate => "IfPredicate",
            ErrorImpl::LoopPredicate => "LoopPredicate",
            ErrorImpl::UndefinedBranchType { .. } => "UndefinedBranchType",
            ErrorImpl::DuplicateBranch { .. } => "DuplicateBranch",
            ErrorImpl::SelfInCase => "SelfInCase",
            ErrorImpl::UndefinedLetType { .. } => "UndefinedLetType",
            ErrorImpl::SelfInLet => "SelfInLet",
            ErrorImpl::LetInitMismatch { .. } => "LetInitMismatch",
            ErrorImpl::NonIntArguments { .. } => "NonIntArguments",
            ErrorImpl::NegArgument { .. } => "NegArgument",
            ErrorImpl::IllegalBasicComparison => "IllegalBasicComparison",
            ErrorImpl::NotArgument { .. } => "NotArgument",
            ErrorImpl::NewUndefined { .. } => "NewUndefined",
            ErrorImpl::UndeclaredIdentifier { .. } => "UndeclaredIdentifier",
        }
    }
}

/// Renders the `<file>:<line>: <message>` diagnostic line, without the
/// trailing newline.
impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.position, self.internal_error)
    }
}

impl std::error::Error for Error {}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    // Input
    #[error("Expression {id} is outside the expression arena of {len} nodes.")]
    DanglingExpression { id: u32, len: usize },
    #[error("Expression {id} is reachable along more than one path.")]
    SharedExpression { id: u32 },

    // Hierarchy
    #[error("Class {class} was previously defined.")]
    ClassRedefined { class: Symbol },
    #[error("Class {class} inherits from an undefined class {parent}.")]
    UndefinedParent { class: Symbol, parent: Symbol },
    #[error("Class {class} cannot inherit class {parent}.")]
    IllegalInheritance { class: Symbol, parent: Symbol },
    #[error("Class {class}, or an ancestor of {class}, is involved in an inheritance cycle.")]
    InheritanceCycle { class: Symbol },

    // Features
    #[error("Method {method} is multiply defined.")]
    MethodRedefined { method: Symbol },
    #[error("Attribute {attribute} is multiply defined.")]
    AttributeRedefined { attribute: Symbol },
    #[error("Attribute {attribute} is an attribute of an inherited class.")]
    InheritedAttributeRedefined { attribute: Symbol },
    #[error("'self' cannot be the name of an attribute.")]
    SelfAttribute,
    #[error("In redefined method {method}, return type {found} is different from original return type {original}.")]
    OverrideReturnType {
        method: Symbol,
        found: Symbol,
        original: Symbol,
    },
    #[error("Incompatible number of formal parameters in redefined method {method}.")]
    OverrideArity { method: Symbol },
    #[error("In redefined method {method}, parameter type {found} is different from original type {original}.")]
    OverrideParameterType {
        method: Symbol,
        found: Symbol,
        original: Symbol,
    },
    #[error("Class {type_decl} of attribute {attribute} is undefined.")]
    UndefinedAttributeType { type_decl: Symbol, attribute: Symbol },
    #[error("Inferred type {actual} of initialization of attribute {attribute} does not conform to declared type {declared}.")]
    AttributeInitMismatch {
        actual: Symbol,
        attribute: Symbol,
        declared: Symbol,
    },
    #[error("Class {type_decl} of formal parameter {formal} is undefined.")]
    UndefinedFormalType { type_decl: Symbol, formal: Symbol },
    #[error("Formal parameter {formal} is multiply defined.")]
    FormalRedefined { formal: Symbol },
    #[error("'self' cannot be the name of a formal parameter.")]
    SelfFormal,
    #[error("Undefined return type {return_type} in method {method}.")]
    UndefinedReturnType { return_type: Symbol, method: Symbol },
    #[error("Inferred return type {actual} of method {method} does not conform to declared return type {declared}.")]
    ReturnTypeMismatch {
        actual: Symbol,
        method: Symbol,
        declared: Symbol,
    },

    // Expressions
    #[error("Assignment to undeclared variable {name}.")]
    UndeclaredAssignee { name: Symbol },
    #[error("Cannot assign to 'self'.")]
    AssignToSelf,
    #[error("Type {actual} of assigned expression does not conform to declared type {declared} of identifier {name}.")]
    AssignMismatch {
        actual: Symbol,
        declared: Symbol,
        name: Symbol,
    },
    #[error("Static dispatch to SELF_TYPE.")]
    StaticDispatchToSelfType,
    #[error("Expression type {actual} does not conform to declared static dispatch type {static_type}.")]
    StaticDispatchMismatch { actual: Symbol, static_type: Symbol },
    #[error("Static dispatch to undefined method {method}.")]
    UndefinedStaticMethod { method: Symbol },
    #[error("Dispatch to undefined method {method}.")]
    UndefinedMethod { method: Symbol },
    #[error("Method {method} called with wrong number of arguments.")]
    WrongArgumentCount { method: Symbol },
    #[error("In call of method {method}, type {actual} of parameter {formal} does not conform to declared type {declared}.")]
    ArgumentMismatch {
        method: Symbol,
        actual: Symbol,
        formal: Symbol,
        declared: Symbol,
    },
    #[error("Predicate of 'if' does not have type Bool.")]
    IfPredicate,
    #[error("Loop condition does not have type Bool.")]
    LoopPredicate,
    #[error("Class {type_decl} of case branch {name} is undefined.")]
    UndefinedBranchType { type_decl: Symbol, name: Symbol },
    #[error("Duplicate branch {type_decl} in case statement.")]
    DuplicateBranch { type_decl: Symbol },
    #[error("'self' bound in 'case'.")]
    SelfInCase,
    #[error("Class {type_decl} of let-bound identifier {name} is undefined.")]
    UndefinedLetType { type_decl: Symbol, name: Symbol },
    #[error("'self' cannot be bound in a 'let' expression.")]
    SelfInLet,
    #[error("Inferred type {actual} of initialization of {name} does not conform to identifier's declared type {declared}.")]
    LetInitMismatch {
        actual: Symbol,
        name: Symbol,
        declared: Symbol,
    },
    #[error("non-Int arguments: {left} {op} {right}")]
    NonIntArguments {
        left: Symbol,
        op: String,
        right: Symbol,
    },
    #[error("Argument of '~' has type {actual} instead of Int.")]
    NegArgument { actual: Symbol },
    #[error("Illegal comparison with a basic type.")]
    IllegalBasicComparison,
    #[error("Argument of 'not' has type {actual} instead of Bool.")]
    NotArgument { actual: Symbol },
    #[error("'new' used with undefined class {type_name}.")]
    NewUndefined { type_name: Symbol },
    #[error("Undeclared identifier {name}.")]
    UndeclaredIdentifier { name: Symbol },
}

/// Diagnostic Sink
///
/// Errors in the order they were discovered. Reporting never stops the
/// analysis; the driver inspects the sink at the end of each phase.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticSink {
    errors: Vec<Error>,
}

impl DiagnosticSink {
    pub fn new() -> Self {
        DiagnosticSink { errors: vec![] }
    }

    pub fn report(&mut self, error_impl: ErrorImpl, position: Position) {
        let error = Error::new(error_impl, position);
        log::trace!("semantic error: {}", error);
        self.errors.push(error);
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn errors(&self) -> &[Error] {
        &self.errors
    }

    /// Appends another sink's errors after this one's, keeping both orders.
    pub fn extend(&mut self, other: DiagnosticSink) {
        self.errors.extend(other.errors);
    }

    pub fn into_errors(self) -> Vec<Error> {
        self.errors
    }
}

/// The phase a [`SemantError`] halted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Structural validation of the expression arena.
    Input,
    /// Class table construction and inheritance validation.
    Hierarchy,
    /// Per-class feature and expression checking.
    Classes,
}

impl Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Input => write!(f, "input"),
            Phase::Hierarchy => write!(f, "hierarchy"),
            Phase::Classes => write!(f, "classes"),
        }
    }
}

/// Returned when a phase ends with at least one error. Carries every
/// diagnostic found so far; whoever called the analysis decides how to exit.
#[derive(Error, Debug, Clone)]
#[error("Compilation halted due to static semantic errors.")]
pub struct SemantError {
    pub phase: Phase,
    pub errors: Vec<Error>,
}

impl SemantError {
    pub fn new(phase: Phase, sink: DiagnosticSink) -> Self {
        SemantError {
            phase,
            errors: sink.into_errors(),
        }
    }

    /// All diagnostics, one `<file>:<line>: <message>\n` line each.
    pub fn render(&self) -> String {
        self.errors
            .iter()
            .map(|error| format!("{}\n", error))
            .collect()
    }
}
