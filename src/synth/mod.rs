//! Decorator synthesis.
//!
//! A [`Concern`] contributes the imports, struct fields, constructor and
//! per-method body of one decorator type. [`synthesize`] arranges those
//! pieces around the shared skeleton: a struct holding `next`, a
//! `New...` constructor, and one method per interface method.

pub mod forward;
pub mod logging;
pub mod monitoring;
pub mod trace;

use tracing::debug;

use crate::config::Config;
use crate::emit::{Decl, FuncDecl, GoFile, Stmt, StructDecl};
use crate::imports::ImportTable;
use crate::model::{Field, InterfaceDecl, Method, Signature, TypeDescriptor};

pub use logging::Logging;
pub use monitoring::Monitoring;
pub use trace::Tracing;

/// Which decorator a generator produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConcernKind {
    Logging,
    Monitoring,
    Tracing,
}

impl ConcernKind {
    /// Name of the generator binary.
    pub fn generator(self) -> &'static str {
        match self {
            ConcernKind::Logging => "logen",
            ConcernKind::Monitoring => "mongen",
            ConcernKind::Tracing => "tracegen",
        }
    }

    /// Supported backends; the first is the default.
    pub fn backends(self) -> &'static [&'static str] {
        match self {
            ConcernKind::Logging => logging::BACKENDS,
            ConcernKind::Monitoring => monitoring::BACKENDS,
            ConcernKind::Tracing => trace::BACKENDS,
        }
    }

    /// Prefix of the generated type name.
    pub fn type_prefix(self) -> &'static str {
        match self {
            ConcernKind::Logging => "errorLogging",
            ConcernKind::Monitoring => "monitoring",
            ConcernKind::Tracing => "tracing",
        }
    }

    /// Prefix of the generated file name.
    pub fn file_prefix(self) -> &'static str {
        match self {
            ConcernKind::Logging => "logging",
            ConcernKind::Monitoring => "monitoring",
            ConcernKind::Tracing => "tracing",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ConcernKind::Logging => "error logging",
            ConcernKind::Monitoring => "monitoring",
            ConcernKind::Tracing => "tracing",
        }
    }

    pub fn banner(self) -> String {
        format!("Code generated by {}. DO NOT EDIT.", self.generator())
    }
}

/// A backend name the generator does not know.
#[derive(Debug, thiserror::Error)]
#[error("unsupported {} backend {value:?} (supported: {})", .concern.description(), .supported.join(", "))]
pub struct UnsupportedSelector {
    pub concern: ConcernKind,
    pub value: String,
    pub supported: &'static [&'static str],
}

/// Names shared by every part of one decorator.
#[derive(Debug, Clone)]
pub struct Target<'a> {
    pub decl: &'a InterfaceDecl,
    /// The wrapped interface, as referenced from generated code.
    pub iface: TypeDescriptor,
    pub struct_name: String,
}

/// One decorator concern.
pub trait Concern {
    fn kind(&self) -> ConcernKind;

    /// Register the concern's own packages. Called once, after
    /// resolution has registered the interface's packages.
    fn register_imports(&mut self, decl: &InterfaceDecl, imports: &mut ImportTable);

    /// Struct fields after `next`.
    fn fields(&self) -> Vec<(String, TypeDescriptor)>;

    /// Constructor parameters after `next`.
    fn constructor_params(&self) -> Vec<Field>;

    fn constructor_body(&self, target: &Target<'_>) -> Vec<Stmt>;

    fn method_body(
        &self,
        target: &Target<'_>,
        method: &Method,
        receiver: &str,
        imports: &ImportTable,
    ) -> Vec<Stmt>;
}

/// Build the concern for `kind`, honouring an explicit backend.
pub fn select(
    kind: ConcernKind,
    backend: Option<&str>,
    config: &Config,
) -> Result<Box<dyn Concern>, UnsupportedSelector> {
    let supported = kind.backends();
    let backend = backend.unwrap_or(supported[0]);
    let unsupported = || UnsupportedSelector {
        concern: kind,
        value: backend.to_string(),
        supported,
    };

    debug!(generator = kind.generator(), backend, "selected backend");
    let concern: Box<dyn Concern> = match kind {
        ConcernKind::Logging => Box::new(Logging::new(
            logging::backend(backend).ok_or_else(unsupported)?,
        )),
        ConcernKind::Monitoring => {
            if !supported.contains(&backend) {
                return Err(unsupported());
            }
            Box::new(Monitoring::new(config.monitoring.label.clone()))
        }
        ConcernKind::Tracing => Box::new(Tracing::new(
            trace::backend(backend).ok_or_else(unsupported)?,
        )),
    };
    Ok(concern)
}

/// Build the decorator file for `decl`.
pub fn synthesize(
    decl: &InterfaceDecl,
    concern: &mut dyn Concern,
    imports: &mut ImportTable,
    package: &str,
) -> GoFile {
    let kind = concern.kind();
    let iface = TypeDescriptor::qualified(imports.add(&decl.package_path), decl.name.clone());
    concern.register_imports(decl, imports);

    let target = Target {
        decl,
        iface,
        struct_name: format!("{}{}", kind.type_prefix(), decl.name),
    };

    let mut fields = vec![("next".to_string(), target.iface.clone())];
    fields.extend(concern.fields());

    let mut decls = vec![
        Decl::Struct(StructDecl {
            name: target.struct_name.clone(),
            fields,
        }),
        Decl::Func(constructor(kind, concern, &target)),
    ];

    for method in &decl.methods {
        let receiver = receiver_name(method);
        decls.push(Decl::Func(FuncDecl {
            doc: None,
            receiver: Some(Field::named(
                receiver.clone(),
                TypeDescriptor::pointer(TypeDescriptor::ident(target.struct_name.clone())),
            )),
            name: method.name.clone(),
            sig: forward::method_signature(method),
            body: concern.method_body(&target, method, &receiver, imports),
        }));
    }

    GoFile {
        banner: kind.banner(),
        package: package.to_string(),
        imports: imports
            .sorted()
            .into_iter()
            .map(|(alias, path)| (alias.to_string(), path.to_string()))
            .collect(),
        decls,
    }
}

fn constructor(kind: ConcernKind, concern: &dyn Concern, target: &Target<'_>) -> FuncDecl {
    let name = format!("New{}{}", upper_first(kind.type_prefix()), target.decl.name);
    let mut params = vec![Field::named("next", target.iface.clone())];
    params.extend(concern.constructor_params());
    FuncDecl {
        doc: Some(format!("{} creates new {} middleware.", name, kind.description())),
        receiver: None,
        name,
        sig: Signature {
            params,
            results: vec![Field::anonymous(target.iface.clone())],
        },
        body: concern.constructor_body(target),
    }
}

/// `m`, unless a parameter or result already uses it. Then `mw`, `_m`,
/// `__m` and so on.
fn receiver_name(method: &Method) -> String {
    let free = |candidate: &str| method.names().all(|n| n != candidate);
    if let Some(name) = ["m", "mw"].into_iter().find(|c| free(*c)) {
        return name.to_string();
    }
    let mut name = "_m".to_string();
    while !free(&name) {
        name.insert(0, '_');
    }
    name
}

fn upper_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
