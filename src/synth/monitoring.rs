//! Monitoring decorator backed by go-kit metrics.
//!
//! Counts every call, observes its duration in seconds and counts
//! failures of methods that return an `error`. Each observation is
//! labelled with the snake_case method name.

use super::{forward, Concern, ConcernKind, Target};
use crate::emit::{Expr, Stmt};
use crate::imports::ImportTable;
use crate::model::{Field, InterfaceDecl, Method, TypeDescriptor};
use crate::utils::to_snake_case;

pub const BACKENDS: &[&str] = &["go_kit_metrics"];

const METRICS_PATH: &str = "github.com/go-kit/kit/metrics";
const TIME_PATH: &str = "time";
const START: &str = "_start";

pub struct Monitoring {
    label: String,
    metrics: String,
    time: String,
}

impl Monitoring {
    /// `label` is the key every observation is tagged with.
    pub fn new(label: String) -> Self {
        Self {
            label,
            metrics: String::new(),
            time: String::new(),
        }
    }

    fn counter(&self) -> TypeDescriptor {
        TypeDescriptor::qualified(self.metrics.clone(), "Counter")
    }

    fn histogram(&self) -> TypeDescriptor {
        TypeDescriptor::qualified(self.metrics.clone(), "Histogram")
    }

    /// `recv.<metric>.With("<label>", "<operation>")`
    fn labelled(&self, receiver: &str, metric: &str, operation: &str) -> Expr {
        Expr::ident(receiver)
            .dot(metric)
            .dot("With")
            .call(vec![Expr::str(self.label.clone()), Expr::str(operation)])
    }

    fn metric_fields(&self) -> [(&'static str, TypeDescriptor); 3] {
        [
            ("totalOps", self.counter()),
            ("failedOps", self.counter()),
            ("opsDuration", self.histogram()),
        ]
    }
}

impl Concern for Monitoring {
    fn kind(&self) -> ConcernKind {
        ConcernKind::Monitoring
    }

    fn register_imports(&mut self, decl: &InterfaceDecl, imports: &mut ImportTable) {
        self.metrics = imports.add(METRICS_PATH);
        // An interface without methods never reads the clock.
        if !decl.methods.is_empty() {
            self.time = imports.add(TIME_PATH);
        }
    }

    fn fields(&self) -> Vec<(String, TypeDescriptor)> {
        self.metric_fields()
            .into_iter()
            .map(|(name, ty)| (name.to_string(), ty))
            .collect()
    }

    fn constructor_params(&self) -> Vec<Field> {
        self.metric_fields()
            .into_iter()
            .map(|(name, ty)| Field::named(name, ty))
            .collect()
    }

    fn constructor_body(&self, target: &Target<'_>) -> Vec<Stmt> {
        let mut elems = vec![Expr::ident("next")];
        elems.extend(self.metric_fields().into_iter().map(|(name, _)| Expr::ident(name)));
        vec![Stmt::Return(vec![Expr::Composite {
            ty: TypeDescriptor::ident(target.struct_name.clone()),
            elems,
        }
        .addr_of()])]
    }

    fn method_body(
        &self,
        _target: &Target<'_>,
        method: &Method,
        receiver: &str,
        _imports: &ImportTable,
    ) -> Vec<Stmt> {
        let operation = to_snake_case(&method.name);
        let time = || Expr::ident(self.time.clone());

        let mut body = vec![
            Stmt::Expr(
                self.labelled(receiver, "totalOps", &operation)
                    .dot("Add")
                    .call(vec![Expr::Int(1)]),
            ),
            Stmt::Define {
                lhs: vec![START.to_string()],
                rhs: vec![time().dot("Now").call(Vec::new())],
            },
            forward::capture(receiver, method),
            Stmt::Expr(
                self.labelled(receiver, "opsDuration", &operation)
                    .dot("Observe")
                    .call(vec![time()
                        .dot("Since")
                        .call(vec![Expr::ident(START)])
                        .dot("Seconds")
                        .call(Vec::new())]),
            ),
        ];

        if let Some(error) = method.error_result() {
            body.push(Stmt::If {
                cond: Expr::ident(error.name.clone()).not_nil(),
                body: vec![Stmt::Expr(
                    self.labelled(receiver, "failedOps", &operation)
                        .dot("Add")
                        .call(vec![Expr::Int(1)]),
                )],
            });
        }

        body.extend(forward::return_results(method));
        body
    }
}
