use std::collections::HashSet;

use crate::{
    ast::{
        ast::Method,
        expressions::{CaseBranch, ExprId, ExprKind},
    },
    errors::errors::ErrorImpl,
    symbol::symbol::{Symbol, BOOL, INT, OBJECT, SELF, SELF_TYPE, STRING},
};

use super::type_checker::{name_of, Inferred, TypeChecker};

impl<'a> TypeChecker<'a> {
    /// Types `id` and everything below it, records the result in the type
    /// table and returns it. Children are always visited, even after an
    /// error, so every error in the subtree gets reported.
    pub fn check_expr(&mut self, id: ExprId) -> Inferred {
        let exprs = self.exprs;
        let expr = &exprs[id];
        let line = expr.line;

        let inferred = match &expr.kind {
            ExprKind::Assign { name, value } => self.check_assign(*name, *value, line),
            ExprKind::StaticDispatch {
                receiver,
                type_name,
                method,
                args,
            } => self.check_static_dispatch(*receiver, *type_name, *method, args, line),
            ExprKind::Dispatch {
                receiver,
                method,
                args,
            } => self.check_dispatch(*receiver, *method, args, line),
            ExprKind::Cond {
                pred,
                then_branch,
                else_branch,
            } => {
                let pred = self.check_expr(*pred);
                let then_branch = self.check_expr(*then_branch);
                let else_branch = self.check_expr(*else_branch);
                let mut ok = pred.ok && then_branch.ok && else_branch.ok;
                if !self.is_type(pred.static_type, BOOL) {
                    self.report(ErrorImpl::IfPredicate, line);
                    ok = false;
                }
                Inferred::new(self.join(then_branch.static_type, else_branch.static_type), ok)
            }
            ExprKind::Loop { pred, body } => {
                let pred = self.check_expr(*pred);
                let body = self.check_expr(*body);
                let mut ok = pred.ok && body.ok;
                if !self.is_type(pred.static_type, BOOL) {
                    self.report(ErrorImpl::LoopPredicate, line);
                    ok = false;
                }
                Inferred::new(body.static_type, ok)
            }
            ExprKind::Case {
                scrutinee,
                branches,
            } => self.check_case(*scrutinee, branches),
            ExprKind::Block { body } => {
                let mut result = Inferred::untyped();
                let mut ok = true;
                for statement in body {
                    result = self.check_expr(*statement);
                    ok &= result.ok;
                }
                Inferred::new(result.static_type, ok)
            }
            ExprKind::Let {
                name,
                type_decl,
                init,
                body,
            } => self.check_let(*name, *type_decl, *init, *body, line),
            ExprKind::Arith { op, left, right } => {
                self.check_int_operands(&op.to_string(), *left, *right, INT, line)
            }
            ExprKind::Compare { op, left, right } => {
                self.check_int_operands(&op.to_string(), *left, *right, BOOL, line)
            }
            ExprKind::Eq { left, right } => {
                let left = self.check_expr(*left);
                let right = self.check_expr(*right);
                let mut ok = left.ok && right.ok;
                if let (Some(l), Some(r)) = (left.static_type, right.static_type) {
                    if (l.is_basic_value() || r.is_basic_value()) && l != r {
                        self.report(ErrorImpl::IllegalBasicComparison, line);
                        ok = false;
                    }
                }
                Inferred::new(Some(BOOL), ok)
            }
            ExprKind::Neg(operand) => {
                let operand = self.check_expr(*operand);
                if self.is_type(operand.static_type, INT) {
                    Inferred::new(Some(INT), operand.ok)
                } else {
                    self.report(
                        ErrorImpl::NegArgument {
                            actual: name_of(operand.static_type),
                        },
                        line,
                    );
                    Inferred::failed(INT)
                }
            }
            ExprKind::Not(operand) => {
                let operand = self.check_expr(*operand);
                if self.is_type(operand.static_type, BOOL) {
                    Inferred::new(Some(BOOL), operand.ok)
                } else {
                    self.report(
                        ErrorImpl::NotArgument {
                            actual: name_of(operand.static_type),
                        },
                        line,
                    );
                    Inferred::failed(BOOL)
                }
            }
            ExprKind::IntConst(_) => Inferred::ok(INT),
            ExprKind::BoolConst(_) => Inferred::ok(BOOL),
            ExprKind::StringConst(_) => Inferred::ok(STRING),
            ExprKind::New(type_name) => {
                let resolved = self.resolve_self_type(*type_name);
                if self.class_table.contains(resolved) {
                    Inferred::ok(resolved)
                } else {
                    self.report(
                        ErrorImpl::NewUndefined {
                            type_name: *type_name,
                        },
                        line,
                    );
                    Inferred::failed(OBJECT)
                }
            }
            ExprKind::IsVoid(operand) => {
                let operand = self.check_expr(*operand);
                Inferred::new(Some(BOOL), operand.ok)
            }
            ExprKind::NoExpr => Inferred::untyped(),
            ExprKind::Object(name) => match self.environment.lookup(*name) {
                Some(type_decl) => Inferred::ok(type_decl),
                None => {
                    self.report(ErrorImpl::UndeclaredIdentifier { name: *name }, line);
                    Inferred::failed(OBJECT)
                }
            },
        };

        log::trace!(
            "{}:{} expression {} typed {}",
            self.current_class.name,
            line,
            id.index(),
            name_of(inferred.static_type)
        );
        self.types.set(id, inferred.static_type);
        inferred
    }

    fn check_assign(&mut self, name: Symbol, value: ExprId, line: u32) -> Inferred {
        let value = self.check_expr(value);

        if name == SELF {
            self.report(ErrorImpl::AssignToSelf, line);
            return Inferred::failed(OBJECT);
        }

        let Some(declared) = self.environment.lookup(name) else {
            self.report(ErrorImpl::UndeclaredAssignee { name }, line);
            return Inferred::failed(OBJECT);
        };

        // An undefined declared type has already been reported where it was
        // declared.
        if self.is_defined(declared) && !self.conforms(value.static_type, declared) {
            self.report(
                ErrorImpl::AssignMismatch {
                    actual: name_of(value.static_type),
                    declared,
                    name,
                },
                line,
            );
            return Inferred::failed(OBJECT);
        }

        Inferred::new(Some(declared), value.ok)
    }

    fn check_static_dispatch(
        &mut self,
        receiver: ExprId,
        type_name: Symbol,
        method_name: Symbol,
        args: &[ExprId],
        line: u32,
    ) -> Inferred {
        let receiver = self.check_expr(receiver);
        let args: Vec<Inferred> = args.iter().map(|arg| self.check_expr(*arg)).collect();
        let mut ok = receiver.ok && args.iter().all(|arg| arg.ok);

        if type_name == SELF_TYPE {
            self.report(ErrorImpl::StaticDispatchToSelfType, line);
            return Inferred::failed(OBJECT);
        }

        if !self.conforms(receiver.static_type, type_name) {
            self.report(
                ErrorImpl::StaticDispatchMismatch {
                    actual: name_of(receiver.static_type),
                    static_type: type_name,
                },
                line,
            );
            ok = false;
        }

        let class_table = self.class_table;
        let Some(method) = class_table.find_method(type_name, method_name) else {
            self.report(
                ErrorImpl::UndefinedStaticMethod {
                    method: method_name,
                },
                line,
            );
            return Inferred::failed(OBJECT);
        };

        ok &= self.check_arguments(method, &args, line);
        let return_type = if method.return_type == SELF_TYPE {
            type_name
        } else {
            method.return_type
        };
        Inferred::new(Some(return_type), ok)
    }

    fn check_dispatch(
        &mut self,
        receiver: ExprId,
        method_name: Symbol,
        args: &[ExprId],
        line: u32,
    ) -> Inferred {
        let receiver = self.check_expr(receiver);
        let args: Vec<Inferred> = args.iter().map(|arg| self.check_expr(*arg)).collect();
        let ok = receiver.ok && args.iter().all(|arg| arg.ok);

        let receiver_type = self.resolve_self_type(name_of(receiver.static_type));
        let class_table = self.class_table;
        let Some(method) = class_table.find_method(receiver_type, method_name) else {
            self.report(
                ErrorImpl::UndefinedMethod {
                    method: method_name,
                },
                line,
            );
            return Inferred::failed(OBJECT);
        };

        let ok = self.check_arguments(method, &args, line) && ok;
        let return_type = if method.return_type == SELF_TYPE {
            receiver_type
        } else {
            method.return_type
        };
        Inferred::new(Some(return_type), ok)
    }

    /// Arity first; only a call with the right arity has its arguments
    /// matched against the formals, all of them.
    fn check_arguments(&mut self, method: &Method, args: &[Inferred], line: u32) -> bool {
        if args.len() != method.formals.len() {
            self.report(
                ErrorImpl::WrongArgumentCount {
                    method: method.name,
                },
                line,
            );
            return false;
        }

        let mut ok = true;
        for (arg, formal) in args.iter().zip(method.formals.iter()) {
            if !self.conforms(arg.static_type, formal.type_decl) {
                self.report(
                    ErrorImpl::ArgumentMismatch {
                        method: method.name,
                        actual: name_of(arg.static_type),
                        formal: formal.name,
                        declared: formal.type_decl,
                    },
                    line,
                );
                ok = false;
            }
        }
        ok
    }

    /// Each branch binds its variable in a scope of its own. The result is the
    /// running least upper bound of the branch bodies, seeded by the first.
    fn check_case(&mut self, scrutinee: ExprId, branches: &[CaseBranch]) -> Inferred {
        let scrutinee = self.check_expr(scrutinee);
        let mut ok = scrutinee.ok;
        let mut result: Option<Symbol> = None;
        let mut seen = HashSet::new();

        for branch in branches {
            let declared = self.resolve_self_type(branch.type_decl);

            if !self.class_table.contains(declared) {
                self.report(
                    ErrorImpl::UndefinedBranchType {
                        type_decl: branch.type_decl,
                        name: branch.name,
                    },
                    branch.line,
                );
                ok = false;
            }
            if !seen.insert(declared) {
                self.report(
                    ErrorImpl::DuplicateBranch {
                        type_decl: branch.type_decl,
                    },
                    branch.line,
                );
                ok = false;
            }

            let body = self.with_scope(|checker| {
                if branch.name == SELF {
                    checker.report(ErrorImpl::SelfInCase, branch.line);
                } else {
                    checker.environment.bind(branch.name, declared);
                }
                checker.check_expr(branch.expr)
            });

            ok &= body.ok && branch.name != SELF;
            result = match result {
                None => body.static_type,
                Some(_) => self.join(result, body.static_type),
            };
        }

        Inferred::new(result, ok)
    }

    fn check_let(
        &mut self,
        name: Symbol,
        type_decl: Symbol,
        init: ExprId,
        body: ExprId,
        line: u32,
    ) -> Inferred {
        let init = self.check_expr(init);
        let mut ok = init.ok;
        let declared = self.resolve_self_type(type_decl);

        if !self.class_table.contains(declared) {
            self.report(ErrorImpl::UndefinedLetType { type_decl, name }, line);
            ok = false;
        } else if !self.conforms(init.static_type, declared) {
            self.report(
                ErrorImpl::LetInitMismatch {
                    actual: name_of(init.static_type),
                    name,
                    declared: type_decl,
                },
                line,
            );
            ok = false;
        }

        let body = self.with_scope(|checker| {
            if name == SELF {
                checker.report(ErrorImpl::SelfInLet, line);
            } else {
                checker.environment.bind(name, declared);
            }
            checker.check_expr(body)
        });

        Inferred::new(body.static_type, ok && body.ok && name != SELF)
    }

    /// Shared rule of arithmetic and ordering operators: both operands must be
    /// Int, the result is `result` either way.
    fn check_int_operands(
        &mut self,
        op: &str,
        left: ExprId,
        right: ExprId,
        result: Symbol,
        line: u32,
    ) -> Inferred {
        let left = self.check_expr(left);
        let right = self.check_expr(right);

        if self.is_type(left.static_type, INT) && self.is_type(right.static_type, INT) {
            return Inferred::new(Some(result), left.ok && right.ok);
        }

        self.report(
            ErrorImpl::NonIntArguments {
                left: name_of(left.static_type),
                op: op.to_string(),
                right: name_of(right.static_type),
            },
            line,
        );
        Inferred::failed(result)
    }
}
