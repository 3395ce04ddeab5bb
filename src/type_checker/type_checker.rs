use crate::{
    ast::{
        ast::{Class, Program},
        expressions::{ExprArena, TypeTable},
    },
    errors::errors::{DiagnosticSink, ErrorImpl, Phase, SemantError},
    symbol::symbol::{Symbol, NO_TYPE, SELF_TYPE},
};

use super::{class_table::ClassTable, environment::Environment};

/// Outcome of checking one expression.
///
/// `static_type` is `None` only for nodes that carry no type at all, which
/// every conformance check treats as passing. `ok` is false when this node or
/// any node below it reported an error; the type is then a recovery type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Inferred {
    pub static_type: Option<Symbol>,
    pub ok: bool,
}

impl Inferred {
    pub fn ok(static_type: Symbol) -> Self {
        Inferred {
            static_type: Some(static_type),
            ok: true,
        }
    }

    pub fn untyped() -> Self {
        Inferred {
            static_type: None,
            ok: true,
        }
    }

    pub fn failed(recovery: Symbol) -> Self {
        Inferred {
            static_type: Some(recovery),
            ok: false,
        }
    }

    pub fn new(static_type: Option<Symbol>, ok: bool) -> Self {
        Inferred { static_type, ok }
    }
}

/// Type Checker
///
/// Checks the features of a single class. Each class gets its own checker,
/// environment and sink; only the type table is shared, and every class
/// writes a disjoint set of its slots.
#[derive(Debug)]
pub struct TypeChecker<'a> {
    pub(super) class_table: &'a ClassTable,
    pub(super) exprs: &'a ExprArena,
    pub(super) current_class: &'a Class,
    pub(super) environment: Environment,
    pub(super) types: &'a mut TypeTable,
    pub(super) diagnostics: DiagnosticSink,
}

impl<'a> TypeChecker<'a> {
    pub fn new(
        class_table: &'a ClassTable,
        exprs: &'a ExprArena,
        current_class: &'a Class,
        types: &'a mut TypeTable,
    ) -> Self {
        TypeChecker {
            class_table,
            exprs,
            current_class,
            environment: Environment::new(),
            types,
            diagnostics: DiagnosticSink::new(),
        }
    }

    /// Runs `f` inside a fresh innermost frame.
    pub(super) fn with_scope<F, R>(&mut self, f: F) -> R
    where
        F: FnOnce(&mut Self) -> R,
    {
        self.environment.enter_scope();
        let result = f(self);
        self.environment.exit_scope();
        result
    }

    pub(super) fn report(&mut self, error: ErrorImpl, line: u32) {
        let position = self.current_class.position_at(line);
        self.diagnostics.report(error, position);
    }

    /// SELF_TYPE stands for the class being checked.
    pub(super) fn resolve_self_type(&self, type_name: Symbol) -> Symbol {
        if type_name == SELF_TYPE {
            self.current_class.name
        } else {
            type_name
        }
    }

    pub(super) fn is_defined(&self, type_name: Symbol) -> bool {
        self.class_table
            .contains(self.resolve_self_type(type_name))
    }

    /// Conformance after resolving SELF_TYPE on both sides. An untyped
    /// expression conforms to anything.
    pub(super) fn conforms(&self, actual: Option<Symbol>, declared: Symbol) -> bool {
        match actual {
            None => true,
            Some(actual) => self.class_table.conforms_to(
                self.resolve_self_type(actual),
                self.resolve_self_type(declared),
            ),
        }
    }

    /// Exact type test. An untyped expression passes.
    pub(super) fn is_type(&self, actual: Option<Symbol>, expected: Symbol) -> bool {
        actual.map_or(true, |actual| actual == expected)
    }

    /// Least upper bound of two optional types, ignoring a missing side.
    pub(super) fn join(&self, a: Option<Symbol>, b: Option<Symbol>) -> Option<Symbol> {
        match (a, b) {
            (Some(a), Some(b)) => Some(self.class_table.least_upper_bound(a, b)),
            (a, None) => a,
            (None, b) => b,
        }
    }
}

/// Name used for an untyped expression in messages.
pub(super) fn name_of(static_type: Option<Symbol>) -> Symbol {
    static_type.unwrap_or(NO_TYPE)
}

/// Runs the whole analysis over `program`.
///
/// Expression ids are validated against the arena first and a malformed
/// tree stops the analysis before any class is looked at. The hierarchy is
/// then built and validated; if that reports anything the
/// analysis stops there. Otherwise every user class is checked and each
/// expression node is annotated with its static type, whether or not errors
/// were found. Returns the frozen class table on success.
pub fn type_check(program: &mut Program) -> Result<ClassTable, SemantError> {
    let mut diagnostics = DiagnosticSink::new();

    if !program.validate(&mut diagnostics) {
        log::debug!(
            "halting after {} phase with {} errors",
            Phase::Input,
            diagnostics.len()
        );
        return Err(SemantError::new(Phase::Input, diagnostics));
    }

    let class_table = ClassTable::build(&program.classes, &mut diagnostics);
    if !diagnostics.has_errors() {
        class_table.validate_acyclic(&mut diagnostics);
    }
    if diagnostics.has_errors() {
        log::debug!(
            "halting after {} phase with {} errors",
            Phase::Hierarchy,
            diagnostics.len()
        );
        return Err(SemantError::new(Phase::Hierarchy, diagnostics));
    }

    let mut types = TypeTable::for_arena(&program.exprs);
    for class in class_table.user_classes() {
        let checker = TypeChecker::new(&class_table, &program.exprs, class, &mut types);
        diagnostics.extend(checker.check_class());
    }
    program.exprs.annotate(&types);

    if diagnostics.has_errors() {
        log::debug!(
            "halting after {} phase with {} errors",
            Phase::Classes,
            diagnostics.len()
        );
        return Err(SemantError::new(Phase::Classes, diagnostics));
    }

    log::debug!("{} classes checked", class_table.user_classes().len());
    Ok(class_table)
}
