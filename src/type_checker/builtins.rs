//! The five classes every program implicitly contains.
//!
//! Their methods are implemented by the runtime, so none of them carries a
//! body. They are installed ahead of user classes and never produce
//! diagnostics of their own.

use crate::{
    ast::ast::{Attribute, Class, Feature, Formal, Method},
    symbol::symbol::*,
    Position,
};

fn native_method(name: Symbol, formals: Vec<(Symbol, Symbol)>, return_type: Symbol) -> Feature {
    Feature::Method(Method {
        name,
        formals: formals
            .into_iter()
            .map(|(name, type_decl)| Formal::new(name, type_decl, 0))
            .collect(),
        return_type,
        body: None,
        line: 0,
    })
}

fn slot(name: Symbol, type_decl: Symbol) -> Feature {
    Feature::Attribute(Attribute {
        name,
        type_decl,
        init: None,
        line: 0,
    })
}

fn basic_class(name: Symbol, parent: Symbol, features: Vec<Feature>) -> Class {
    let position = Position::null();
    Class {
        name,
        parent,
        features,
        filename: position.file(),
        line: position.line(),
    }
}

/// Builds `Object`, `IO`, `Int`, `Bool` and `String`, root first.
pub fn install_basic_classes() -> Vec<Class> {
    // abort() : Object, type_name() : String, copy() : SELF_TYPE
    let object = basic_class(
        OBJECT,
        NO_CLASS,
        vec![
            native_method(ABORT, vec![], OBJECT),
            native_method(TYPE_NAME, vec![], STRING),
            native_method(COPY, vec![], SELF_TYPE),
        ],
    );

    let io = basic_class(
        IO,
        OBJECT,
        vec![
            native_method(OUT_STRING, vec![(ARG, STRING)], SELF_TYPE),
            native_method(OUT_INT, vec![(ARG, INT)], SELF_TYPE),
            native_method(IN_STRING, vec![], STRING),
            native_method(IN_INT, vec![], INT),
        ],
    );

    let int = basic_class(INT, OBJECT, vec![slot(VAL, PRIM_SLOT)]);

    let boolean = basic_class(BOOL, OBJECT, vec![slot(VAL, PRIM_SLOT)]);

    // _val holds the length, _str_field the characters.
    let string = basic_class(
        STRING,
        OBJECT,
        vec![
            slot(VAL, INT),
            slot(STR_FIELD, PRIM_SLOT),
            native_method(LENGTH, vec![], INT),
            native_method(CONCAT, vec![(ARG, STRING)], STRING),
            native_method(SUBSTR, vec![(ARG, INT), (ARG2, INT)], STRING),
        ],
    );

    vec![object, io, int, boolean, string]
}
