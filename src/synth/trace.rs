//! Tracing decorator.
//!
//! Methods with a leading `context.Context` run inside a span named
//! `<import path>.<Interface>.<Method>`; the context parameter is
//! rebound to the span's context before the call is forwarded. Methods
//! without one are forwarded untouched.

use super::{forward, Concern, ConcernKind, Target};
use crate::emit::{Expr, Stmt};
use crate::imports::ImportTable;
use crate::model::{Field, InterfaceDecl, Method, TypeDescriptor};

pub const BACKENDS: &[&str] = &["opencensus", "opentelemetry"];

const SPAN: &str = "_span";

/// How a span is started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceBackend {
    /// `trace.StartSpan(ctx, name)` from `go.opencensus.io/trace`.
    OpenCensus,
    /// `otel.Tracer(pkg).Start(ctx, name)` from `go.opentelemetry.io/otel`.
    OpenTelemetry,
}

impl TraceBackend {
    fn import_path(self) -> &'static str {
        match self {
            TraceBackend::OpenCensus => "go.opencensus.io/trace",
            TraceBackend::OpenTelemetry => "go.opentelemetry.io/otel",
        }
    }
}

pub(crate) fn backend(name: &str) -> Option<TraceBackend> {
    match name {
        "opencensus" => Some(TraceBackend::OpenCensus),
        "opentelemetry" => Some(TraceBackend::OpenTelemetry),
        _ => None,
    }
}

pub struct Tracing {
    backend: TraceBackend,
    alias: String,
}

impl Tracing {
    pub fn new(backend: TraceBackend) -> Self {
        Self {
            backend,
            alias: String::new(),
        }
    }

    fn start_span(&self, target: &Target<'_>, ctx: &str, method: &str) -> Expr {
        let span_name = Expr::str(format!(
            "{}.{}.{}",
            target.decl.package_path, target.decl.name, method
        ));
        let pkg = Expr::ident(self.alias.clone());
        match self.backend {
            TraceBackend::OpenCensus => pkg
                .dot("StartSpan")
                .call(vec![Expr::ident(ctx), span_name]),
            TraceBackend::OpenTelemetry => pkg
                .dot("Tracer")
                .call(vec![Expr::str(target.decl.package_path.clone())])
                .dot("Start")
                .call(vec![Expr::ident(ctx), span_name]),
        }
    }
}

impl Concern for Tracing {
    fn kind(&self) -> ConcernKind {
        ConcernKind::Tracing
    }

    fn register_imports(&mut self, decl: &InterfaceDecl, imports: &mut ImportTable) {
        // Only spans reference the tracing package.
        if decl.methods.iter().any(|m| m.context_param(&*imports).is_some()) {
            self.alias = imports.add(self.backend.import_path());
        }
    }

    fn fields(&self) -> Vec<(String, TypeDescriptor)> {
        Vec::new()
    }

    fn constructor_params(&self) -> Vec<Field> {
        Vec::new()
    }

    fn constructor_body(&self, target: &Target<'_>) -> Vec<Stmt> {
        vec![Stmt::Return(vec![Expr::Composite {
            ty: TypeDescriptor::ident(target.struct_name.clone()),
            elems: vec![Expr::ident("next")],
        }
        .addr_of()])]
    }

    fn method_body(
        &self,
        target: &Target<'_>,
        method: &Method,
        receiver: &str,
        imports: &ImportTable,
    ) -> Vec<Stmt> {
        let mut body = Vec::new();
        if let Some(ctx) = method.context_param(imports) {
            body.push(Stmt::Define {
                lhs: vec![ctx.name.clone(), SPAN.to_string()],
                rhs: vec![self.start_span(target, &ctx.name, &method.name)],
            });
            body.push(Stmt::Defer(Expr::ident(SPAN).dot("End").call(Vec::new())));
        }
        body.push(forward::return_call(receiver, method));
        body
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emit::render;
    use crate::imports::CONTEXT_PATH;
    use crate::model::Signature;
    use crate::synth::synthesize;

    fn generate(backend: TraceBackend) -> (String, ImportTable) {
        let mut imports = ImportTable::new();
        imports.add("example.com/acme/svc");
        let ctx = imports.add(CONTEXT_PATH);
        let traced = Signature {
            params: vec![Field::named("ctx", TypeDescriptor::qualified(ctx, "Context"))],
            results: vec![
                Field::anonymous(TypeDescriptor::ident("int")),
                Field::anonymous(TypeDescriptor::ident("error")),
            ],
        };
        let plain = Signature {
            params: vec![Field::named("id", TypeDescriptor::ident("string"))],
            results: Vec::new(),
        };
        let decl = InterfaceDecl {
            package_path: "example.com/acme/svc".to_string(),
            name: "Worker".to_string(),
            methods: vec![
                Method::from_signature("Run", &traced),
                Method::from_signature("Forget", &plain),
            ],
        };
        let mut concern = Tracing::new(backend);
        let text = render(&synthesize(&decl, &mut concern, &mut imports, "svcmws"));
        (text, imports)
    }

    #[test]
    fn test_opencensus_span_around_context_methods() {
        let (text, imports) = generate(TraceBackend::OpenCensus);
        assert_eq!(imports.alias_of("go.opencensus.io/trace"), Some("alias3"));
        assert!(text.contains(
            "func (m *tracingWorker) Run(ctx alias2.Context) (int, error) {\n\
             \tctx, _span := alias3.StartSpan(ctx, \"example.com/acme/svc.Worker.Run\")\n\
             \tdefer _span.End()\n\
             \treturn m.next.Run(ctx)\n\
             }\n"
        ));
        assert!(text.contains(
            "func (m *tracingWorker) Forget(id string) {\n\tm.next.Forget(id)\n}\n"
        ));
        assert!(text.contains(
            "func NewTracingWorker(next alias1.Worker) alias1.Worker {\n\treturn &tracingWorker{next}\n}\n"
        ));
    }

    #[test]
    fn test_opentelemetry_tracer() {
        let (text, _) = generate(TraceBackend::OpenTelemetry);
        assert!(text.contains(
            "\tctx, _span := alias3.Tracer(\"example.com/acme/svc\").Start(ctx, \"example.com/acme/svc.Worker.Run\")\n"
        ));
        assert!(text.contains("\talias3 \"go.opentelemetry.io/otel\"\n"));
    }

    #[test]
    fn test_no_trace_import_without_context() {
        let mut imports = ImportTable::new();
        let decl = InterfaceDecl {
            package_path: "example.com/acme/svc".to_string(),
            name: "Clock".to_string(),
            methods: vec![Method::from_signature("Tick", &Signature::default())],
        };
        let mut concern = Tracing::new(TraceBackend::OpenCensus);
        let text = render(&synthesize(&decl, &mut concern, &mut imports, "svcmws"));
        assert!(!text.contains("opencensus"));
        assert_eq!(imports.len(), 1);
    }
}
