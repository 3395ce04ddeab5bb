//! Unit tests for the program tree and expression arena.

use crate::{
    errors::errors::DiagnosticSink,
    symbol::symbol::{Symbol, INT, OBJECT},
};

use super::{
    ast::{Attribute, Class, Feature, Formal, Method, Program},
    expressions::{ArithOp, CaseBranch, CompareOp, ExprArena, ExprId, ExprKind, TypeTable},
};

/// `class Main { main() : Object { <body> } }` declared in `main.cl`.
fn program_with_body(exprs: ExprArena, body: ExprId) -> Program {
    let main = Class::new(Symbol::intern("Main"), OBJECT, Symbol::intern("main.cl"), 1)
        .with_feature(Feature::Method(Method {
            name: Symbol::intern("main"),
            formals: vec![],
            return_type: OBJECT,
            body: Some(body),
            line: 2,
        }));
    Program::new(vec![main], exprs)
}

fn validation_messages(program: &Program) -> (bool, Vec<String>) {
    let mut diagnostics = DiagnosticSink::new();
    let sound = program.validate(&mut diagnostics);
    let messages = diagnostics.errors().iter().map(|e| e.to_string()).collect();
    (sound, messages)
}

#[test]
fn test_arena_ids_are_sequential() {
    let mut arena = ExprArena::new();
    let first = arena.alloc(ExprKind::IntConst(1), 3);
    let second = arena.alloc(ExprKind::BoolConst(true), 4);

    assert_eq!(first, ExprId(0));
    assert_eq!(second, ExprId(1));
    assert_eq!(arena.len(), 2);
    assert_eq!(arena[second].line, 4);
    assert!(arena[first].static_type.is_none());
}

#[test]
fn test_annotate_writes_type_slots() {
    let mut arena = ExprArena::new();
    let one = arena.alloc(ExprKind::IntConst(1), 1);
    let empty = arena.alloc(ExprKind::NoExpr, 1);

    let mut types = TypeTable::for_arena(&arena);
    types.set(one, Some(INT));
    arena.annotate(&types);

    assert_eq!(arena.type_of(one), Some(INT));
    assert_eq!(arena.type_of(empty), None);
}

#[test]
fn test_operator_display() {
    assert_eq!(ArithOp::Plus.to_string(), "+");
    assert_eq!(ArithOp::Div.to_string(), "/");
    assert_eq!(CompareOp::Le.to_string(), "<=");
}

#[test]
fn test_class_feature_views() {
    let class = Class::new(Symbol::intern("Point"), OBJECT, Symbol::intern("point.cl"), 2)
        .with_feature(Feature::Attribute(Attribute {
            name: Symbol::intern("x"),
            type_decl: INT,
            init: None,
            line: 3,
        }))
        .with_feature(Feature::Method(Method {
            name: Symbol::intern("move"),
            formals: vec![Formal::new(Symbol::intern("dx"), INT, 4)],
            return_type: Symbol::intern("SELF_TYPE"),
            body: None,
            line: 4,
        }));

    assert_eq!(class.attributes().count(), 1);
    assert_eq!(class.methods().count(), 1);
    assert!(class.get_method(Symbol::intern("move")).is_some());
    assert!(class.get_method(Symbol::intern("x")).is_none());
    assert_eq!(class.position_at(4).to_string(), "point.cl:4");
}

#[test]
fn test_children_in_source_order() {
    let mut arena = ExprArena::new();
    let receiver = arena.alloc(ExprKind::Object(Symbol::intern("self")), 1);
    let arg = arena.alloc(ExprKind::IntConst(1), 1);
    let call = arena.alloc(
        ExprKind::Dispatch { receiver, method: Symbol::intern("f"), args: vec![arg] },
        1,
    );
    let branch = arena.alloc(ExprKind::IntConst(2), 2);
    let case = arena.alloc(
        ExprKind::Case {
            scrutinee: call,
            branches: vec![CaseBranch {
                name: Symbol::intern("n"),
                type_decl: INT,
                expr: branch,
                line: 2,
            }],
        },
        1,
    );

    assert_eq!(arena[call].kind.children(), vec![receiver, arg]);
    assert_eq!(arena[case].kind.children(), vec![call, branch]);
    assert!(arena[arg].kind.children().is_empty());
}

#[test]
fn test_out_of_range_ids_are_ignored() {
    let mut arena = ExprArena::new();
    let one = arena.alloc(ExprKind::IntConst(1), 1);
    let beyond = ExprId(5);

    let mut types = TypeTable::for_arena(&arena);
    types.set(beyond, Some(INT));
    types.set(one, Some(INT));
    arena.annotate(&types);

    assert!(arena.get(beyond).is_none());
    assert_eq!(arena.type_of(beyond), None);
    assert_eq!(types.get(beyond), None);
    assert_eq!(arena.type_of(one), Some(INT));
}

#[test]
fn test_validate_accepts_tree() {
    let mut arena = ExprArena::new();
    let one = arena.alloc(ExprKind::IntConst(1), 3);
    let two = arena.alloc(ExprKind::IntConst(2), 3);
    let sum = arena.alloc(ExprKind::Arith { op: ArithOp::Plus, left: one, right: two }, 3);

    let (sound, messages) = validation_messages(&program_with_body(arena, sum));
    assert!(sound);
    assert!(messages.is_empty());
}

#[test]
fn test_validate_reports_dangling_ids() {
    let mut arena = ExprArena::new();
    let one = arena.alloc(ExprKind::IntConst(1), 3);
    let neg = arena.alloc(ExprKind::Neg(ExprId(9)), 3);
    let block = arena.alloc(ExprKind::Block { body: vec![one, neg] }, 3);

    let (sound, messages) = validation_messages(&program_with_body(arena, block));
    assert!(!sound);
    assert_eq!(
        messages,
        vec!["main.cl:3: Expression 9 is outside the expression arena of 3 nodes."]
    );

    let (sound, messages) = validation_messages(&program_with_body(ExprArena::new(), ExprId(0)));
    assert!(!sound);
    assert_eq!(
        messages,
        vec!["main.cl:2: Expression 0 is outside the expression arena of 0 nodes."]
    );
}

#[test]
fn test_validate_reports_shared_and_cyclic_nodes() {
    let mut arena = ExprArena::new();
    let one = arena.alloc(ExprKind::IntConst(1), 4);
    let sum = arena.alloc(ExprKind::Arith { op: ArithOp::Plus, left: one, right: one }, 4);
    let (sound, messages) = validation_messages(&program_with_body(arena, sum));
    assert!(!sound);
    assert_eq!(
        messages,
        vec!["main.cl:4: Expression 0 is reachable along more than one path."]
    );

    // A block whose only statement is itself.
    let mut arena = ExprArena::new();
    let block = arena.alloc(ExprKind::Block { body: vec![ExprId(0)] }, 5);
    let (sound, messages) = validation_messages(&program_with_body(arena, block));
    assert!(!sound);
    assert_eq!(
        messages,
        vec!["main.cl:5: Expression 0 is reachable along more than one path."]
    );
}
