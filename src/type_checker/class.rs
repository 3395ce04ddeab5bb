use std::collections::HashSet;

use crate::{
    ast::ast::{Attribute, Feature, Method},
    errors::errors::{DiagnosticSink, ErrorImpl},
    symbol::symbol::{Symbol, SELF},
};

use super::type_checker::{name_of, TypeChecker};

impl<'a> TypeChecker<'a> {
    /// Checks every feature of the current class and hands back what was
    /// reported.
    pub fn check_class(mut self) -> DiagnosticSink {
        let class = self.current_class;
        log::debug!("checking class {}", class.name);

        self.environment.bind(SELF, class.name);
        let inherited = self.bind_inherited_attributes();
        self.register_features(&inherited);

        for feature in &class.features {
            match feature {
                Feature::Method(method) => {
                    self.check_override(method);
                    self.check_method(method);
                }
                Feature::Attribute(attribute) => self.check_attribute(attribute),
            }
        }

        self.diagnostics
    }

    /// Binds every ancestor attribute in the outermost frame, nearest
    /// ancestor last so its declaration wins.
    fn bind_inherited_attributes(&mut self) -> HashSet<Symbol> {
        let class_table = self.class_table;
        let mut inherited = HashSet::new();

        let ancestors = class_table.ancestors(self.current_class.name);
        for ancestor in ancestors.iter().skip(1).rev() {
            let Some(ancestor) = class_table.lookup(*ancestor) else {
                continue;
            };
            for attribute in ancestor.attributes() {
                // Already reported on the ancestor; `self` stays this class.
                if attribute.name == SELF {
                    continue;
                }
                let type_decl = self.resolve_self_type(attribute.type_decl);
                self.environment.bind(attribute.name, type_decl);
                inherited.insert(attribute.name);
            }
        }

        inherited
    }

    fn register_features(&mut self, inherited: &HashSet<Symbol>) {
        let class = self.current_class;
        let mut methods = HashSet::new();
        let mut attributes = HashSet::new();

        for feature in &class.features {
            match feature {
                Feature::Method(method) => {
                    if !methods.insert(method.name) {
                        self.report(
                            ErrorImpl::MethodRedefined {
                                method: method.name,
                            },
                            method.line,
                        );
                    }
                }
                Feature::Attribute(attribute) => {
                    if attribute.name == SELF {
                        self.report(ErrorImpl::SelfAttribute, attribute.line);
                    } else if !attributes.insert(attribute.name) {
                        self.report(
                            ErrorImpl::AttributeRedefined {
                                attribute: attribute.name,
                            },
                            attribute.line,
                        );
                    } else if inherited.contains(&attribute.name) {
                        self.report(
                            ErrorImpl::InheritedAttributeRedefined {
                                attribute: attribute.name,
                            },
                            attribute.line,
                        );
                    } else {
                        let type_decl = self.resolve_self_type(attribute.type_decl);
                        self.environment.bind(attribute.name, type_decl);
                    }
                }
            }
        }
    }

    /// A redefinition must repeat the inherited signature exactly. At most
    /// one mismatch is reported per method.
    fn check_override(&mut self, method: &Method) {
        let class_table = self.class_table;
        let Some(original) = class_table.find_method(self.current_class.parent, method.name)
        else {
            return;
        };

        if method.return_type != original.return_type {
            self.report(
                ErrorImpl::OverrideReturnType {
                    method: method.name,
                    found: method.return_type,
                    original: original.return_type,
                },
                method.line,
            );
            return;
        }

        if method.formals.len() != original.formals.len() {
            self.report(
                ErrorImpl::OverrideArity {
                    method: method.name,
                },
                method.line,
            );
            return;
        }

        let mismatch = method
            .formals
            .iter()
            .zip(original.formals.iter())
            .find(|(formal, inherited)| formal.type_decl != inherited.type_decl);
        if let Some((formal, inherited)) = mismatch {
            self.report(
                ErrorImpl::OverrideParameterType {
                    method: method.name,
                    found: formal.type_decl,
                    original: inherited.type_decl,
                },
                method.line,
            );
        }
    }

    fn check_attribute(&mut self, attribute: &Attribute) {
        let declared_defined = self.is_defined(attribute.type_decl);
        if !declared_defined {
            self.report(
                ErrorImpl::UndefinedAttributeType {
                    type_decl: attribute.type_decl,
                    attribute: attribute.name,
                },
                attribute.line,
            );
        }

        let Some(init) = attribute.init else {
            return;
        };
        let inferred = self.check_expr(init);
        if inferred.ok
            && declared_defined
            && !self.conforms(inferred.static_type, attribute.type_decl)
        {
            self.report(
                ErrorImpl::AttributeInitMismatch {
                    actual: name_of(inferred.static_type),
                    attribute: attribute.name,
                    declared: attribute.type_decl,
                },
                attribute.line,
            );
        }
    }

    fn check_method(&mut self, method: &Method) {
        self.with_scope(|checker| {
            for formal in &method.formals {
                if formal.name == SELF {
                    checker.report(ErrorImpl::SelfFormal, formal.line);
                    continue;
                }
                if checker.environment.probe(formal.name).is_some() {
                    checker.report(
                        ErrorImpl::FormalRedefined {
                            formal: formal.name,
                        },
                        formal.line,
                    );
                    continue;
                }
                if !checker.is_defined(formal.type_decl) {
                    checker.report(
                        ErrorImpl::UndefinedFormalType {
                            type_decl: formal.type_decl,
                            formal: formal.name,
                        },
                        formal.line,
                    );
                }
                let type_decl = checker.resolve_self_type(formal.type_decl);
                checker.environment.bind(formal.name, type_decl);
            }

            let return_defined = checker.is_defined(method.return_type);
            if !return_defined {
                checker.report(
                    ErrorImpl::UndefinedReturnType {
                        return_type: method.return_type,
                        method: method.name,
                    },
                    method.line,
                );
            }

            let Some(body) = method.body else {
                return;
            };
            let inferred = checker.check_expr(body);
            if return_defined
                && !checker.conforms(inferred.static_type, method.return_type)
            {
                checker.report(
                    ErrorImpl::ReturnTypeMismatch {
                        actual: name_of(inferred.static_type),
                        method: method.name,
                        declared: method.return_type,
                    },
                    method.line,
                );
            }
        });
    }
}
