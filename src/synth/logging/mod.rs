//! Error-logging decorator.
//!
//! Every method whose last result is an `error` logs the method name and
//! the error when the delegate fails. Methods that take a leading
//! `context.Context` also ask the user-supplied fields provider for
//! extra fields. Backends only decide how fields are built and how the
//! logger is called.

mod go_kit;
mod zap;

use super::{forward, Concern, ConcernKind, Target};
use crate::emit::{Expr, Stmt};
use crate::imports::{ImportTable, CONTEXT_PATH};
use crate::model::{Field, InterfaceDecl, Method, Signature, TypeDescriptor};

pub use go_kit::GoKitLog;
pub use zap::Zap;

pub const BACKENDS: &[&str] = &["go_kit_log", "zap"];

/// Field construction and logger invocation for one logging library.
pub trait LogBackend {
    fn register_imports(&mut self, imports: &mut ImportTable);

    fn logger_type(&self) -> TypeDescriptor;

    /// Element type of a field list.
    fn field_type(&self) -> TypeDescriptor;

    /// Fields every failure is logged with.
    fn base_fields(&self, method: &str, error: &str) -> Vec<Expr>;

    /// Log `_fields` through `logger`.
    fn log_call(&self, logger: Expr, method: &str) -> Expr;
}

pub(crate) fn backend(name: &str) -> Option<Box<dyn LogBackend>> {
    match name {
        "go_kit_log" => Some(Box::new(GoKitLog::default())),
        "zap" => Some(Box::new(Zap::default())),
        _ => None,
    }
}

const FIELDS: &str = "_fields";
const MORE: &str = "_more";

pub struct Logging {
    backend: Box<dyn LogBackend>,
    context: String,
}

impl Logging {
    pub fn new(backend: Box<dyn LogBackend>) -> Self {
        Self {
            backend,
            context: String::new(),
        }
    }

    /// `(context.Context, error) []F`
    fn provider_signature(&self) -> Signature {
        Signature {
            params: vec![
                Field::anonymous(TypeDescriptor::qualified(self.context.clone(), "Context")),
                Field::anonymous(TypeDescriptor::ident("error")),
            ],
            results: vec![Field::anonymous(TypeDescriptor::slice(
                self.backend.field_type(),
            ))],
        }
    }

    fn provider_type(&self) -> TypeDescriptor {
        TypeDescriptor::Function(self.provider_signature())
    }

    fn log_failure(&self, receiver: &str, method: &Method, error: &str, imports: &ImportTable) -> Stmt {
        let mut body = vec![Stmt::Define {
            lhs: vec![FIELDS.to_string()],
            rhs: vec![Expr::Composite {
                ty: TypeDescriptor::slice(self.backend.field_type()),
                elems: self.backend.base_fields(&method.name, error),
            }],
        }];

        if let Some(ctx) = method.context_param(imports) {
            body.push(Stmt::Define {
                lhs: vec![MORE.to_string()],
                rhs: vec![Expr::ident(receiver)
                    .dot("fields")
                    .call(vec![Expr::ident(ctx.name.clone()), Expr::ident(error)])],
            });
            body.push(Stmt::If {
                cond: Expr::ident("len")
                    .call(vec![Expr::ident(MORE)])
                    .binary(">", Expr::Int(0)),
                body: vec![Stmt::Assign {
                    lhs: vec![Expr::ident(FIELDS)],
                    rhs: vec![Expr::ident("append")
                        .call_spread(vec![Expr::ident(FIELDS), Expr::ident(MORE)])],
                }],
            });
        }

        body.push(Stmt::Expr(
            self.backend
                .log_call(Expr::ident(receiver).dot("logger"), &method.name),
        ));

        Stmt::If {
            cond: Expr::ident(error).not_nil(),
            body,
        }
    }
}

impl Concern for Logging {
    fn kind(&self) -> ConcernKind {
        ConcernKind::Logging
    }

    fn register_imports(&mut self, _decl: &InterfaceDecl, imports: &mut ImportTable) {
        self.context = imports.add(CONTEXT_PATH);
        self.backend.register_imports(imports);
    }

    fn fields(&self) -> Vec<(String, TypeDescriptor)> {
        vec![
            ("logger".to_string(), self.backend.logger_type()),
            ("fields".to_string(), self.provider_type()),
        ]
    }

    fn constructor_params(&self) -> Vec<Field> {
        vec![
            Field::named("logger", self.backend.logger_type()),
            Field::named(
                "fields",
                TypeDescriptor::Variadic(Box::new(self.provider_type())),
            ),
        ]
    }

    fn constructor_body(&self, target: &Target<'_>) -> Vec<Stmt> {
        let noop = Expr::FuncLit {
            sig: self.provider_signature(),
            body: vec![Stmt::Return(vec![Expr::nil()])],
        };
        vec![
            Stmt::Define {
                lhs: vec!["f".to_string()],
                rhs: vec![noop],
            },
            Stmt::If {
                cond: Expr::ident("len")
                    .call(vec![Expr::ident("fields")])
                    .binary(">", Expr::Int(0)),
                body: vec![Stmt::Assign {
                    lhs: vec![Expr::ident("f")],
                    rhs: vec![Expr::ident("fields").index(Expr::Int(0))],
                }],
            },
            Stmt::Return(vec![Expr::Composite {
                ty: TypeDescriptor::ident(target.struct_name.clone()),
                elems: vec![
                    Expr::key_value("next", Expr::ident("next")),
                    Expr::key_value("logger", Expr::ident("logger")),
                    Expr::key_value("fields", Expr::ident("f")),
                ],
            }
            .addr_of()]),
        ]
    }

    fn method_body(
        &self,
        _target: &Target<'_>,
        method: &Method,
        receiver: &str,
        imports: &ImportTable,
    ) -> Vec<Stmt> {
        let mut body = vec![forward::capture(receiver, method)];
        if let Some(error) = method.error_result() {
            body.push(self.log_failure(receiver, method, &error.name, imports));
        }
        body.extend(forward::return_results(method));
        body
    }
}
