//! Structural type descriptors.
//!
//! A [`TypeDescriptor`] carries just enough of a Go type expression to
//! re-emit it verbatim and to pattern-match the special roles the
//! synthesizer cares about. Qualified references hold the package
//! qualifier as written in source until the resolver rewrites it to an
//! import alias.

use std::fmt;

/// Channel direction of a `chan` type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChanDir {
    /// `chan T`
    Both,
    /// `chan<- T`
    Send,
    /// `<-chan T`
    Recv,
}

/// A named or anonymous entry of a parameter or result list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: Option<String>,
    pub ty: TypeDescriptor,
}

impl Field {
    pub fn named(name: impl Into<String>, ty: TypeDescriptor) -> Self {
        Self {
            name: Some(name.into()),
            ty,
        }
    }

    pub fn anonymous(ty: TypeDescriptor) -> Self {
        Self { name: None, ty }
    }
}

/// Parameters and results of a function type or method.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Signature {
    pub params: Vec<Field>,
    pub results: Vec<Field>,
}

/// Field of an inline struct type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructField {
    /// `None` for embedded fields.
    pub name: Option<String>,
    pub ty: TypeDescriptor,
    /// Raw tag literal, quotes included.
    pub tag: Option<String>,
}

/// One term of a type-set union, e.g. `~int`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeTerm {
    pub tilde: bool,
    pub ty: TypeDescriptor,
}

/// Element of an interface body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterfaceElem {
    Method { name: String, sig: Signature },
    Embed(TypeDescriptor),
    TypeSet(Vec<TypeTerm>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeDescriptor {
    Identifier(String),
    Qualified {
        package: String,
        name: String,
    },
    Pointer(Box<TypeDescriptor>),
    /// `len == None` is a slice.
    Array {
        len: Option<String>,
        elem: Box<TypeDescriptor>,
    },
    Variadic(Box<TypeDescriptor>),
    Function(Signature),
    Map {
        key: Box<TypeDescriptor>,
        value: Box<TypeDescriptor>,
    },
    Chan {
        dir: ChanDir,
        elem: Box<TypeDescriptor>,
    },
    Generic {
        base: Box<TypeDescriptor>,
        args: Vec<TypeDescriptor>,
    },
    Interface(Vec<InterfaceElem>),
    Struct(Vec<StructField>),
}

impl TypeDescriptor {
    pub fn ident(name: impl Into<String>) -> Self {
        TypeDescriptor::Identifier(name.into())
    }

    pub fn qualified(package: impl Into<String>, name: impl Into<String>) -> Self {
        TypeDescriptor::Qualified {
            package: package.into(),
            name: name.into(),
        }
    }

    pub fn pointer(inner: TypeDescriptor) -> Self {
        TypeDescriptor::Pointer(Box::new(inner))
    }

    pub fn slice(elem: TypeDescriptor) -> Self {
        TypeDescriptor::Array {
            len: None,
            elem: Box::new(elem),
        }
    }

    /// The empty interface, rendered as `interface{}`.
    pub fn empty_interface() -> Self {
        TypeDescriptor::Interface(Vec::new())
    }

    pub fn is_variadic(&self) -> bool {
        matches!(self, TypeDescriptor::Variadic(_))
    }

    /// True for `<package>.<name>` exactly.
    pub fn is_qualified_as(&self, package: &str, name: &str) -> bool {
        match self {
            TypeDescriptor::Qualified {
                package: p,
                name: n,
            } => p == package && n == name,
            _ => false,
        }
    }

    /// True for the predeclared `error` type.
    pub fn is_error(&self) -> bool {
        matches!(self, TypeDescriptor::Identifier(name) if name == "error")
    }

    /// Short description used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            TypeDescriptor::Identifier(_) | TypeDescriptor::Qualified { .. } => "named type",
            TypeDescriptor::Pointer(_) => "pointer type",
            TypeDescriptor::Array { len: None, .. } => "slice type",
            TypeDescriptor::Array { .. } => "array type",
            TypeDescriptor::Variadic(_) => "variadic type",
            TypeDescriptor::Function(_) => "function type",
            TypeDescriptor::Map { .. } => "map type",
            TypeDescriptor::Chan { .. } => "channel type",
            TypeDescriptor::Generic { .. } => "generic instantiation",
            TypeDescriptor::Interface(_) => "interface type",
            TypeDescriptor::Struct(_) => "struct type",
        }
    }
}

fn write_fields(f: &mut fmt::Formatter<'_>, fields: &[Field]) -> fmt::Result {
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        match &field.name {
            Some(name) => write!(f, "{} {}", name, field.ty)?,
            None => write!(f, "{}", field.ty)?,
        }
    }
    Ok(())
}

/// Writes `(params) results` without the `func` keyword.
pub(crate) fn write_signature(f: &mut fmt::Formatter<'_>, sig: &Signature) -> fmt::Result {
    f.write_str("(")?;
    write_fields(f, &sig.params)?;
    f.write_str(")")?;
    match sig.results.as_slice() {
        [] => Ok(()),
        [single] if single.name.is_none() => write!(f, " {}", single.ty),
        results => {
            f.write_str(" (")?;
            write_fields(f, results)?;
            f.write_str(")")
        }
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_signature(f, self)
    }
}

impl fmt::Display for InterfaceElem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InterfaceElem::Method { name, sig } => {
                f.write_str(name)?;
                write_signature(f, sig)
            }
            InterfaceElem::Embed(ty) => write!(f, "{}", ty),
            InterfaceElem::TypeSet(terms) => {
                for (i, term) in terms.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" | ")?;
                    }
                    if term.tilde {
                        f.write_str("~")?;
                    }
                    write!(f, "{}", term.ty)?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDescriptor::Identifier(name) => f.write_str(name),
            TypeDescriptor::Qualified { package, name } => write!(f, "{}.{}", package, name),
            TypeDescriptor::Pointer(inner) => write!(f, "*{}", inner),
            TypeDescriptor::Array { len: None, elem } => write!(f, "[]{}", elem),
            TypeDescriptor::Array {
                len: Some(len),
                elem,
            } => write!(f, "[{}]{}", len, elem),
            TypeDescriptor::Variadic(elem) => write!(f, "...{}", elem),
            TypeDescriptor::Function(sig) => {
                f.write_str("func")?;
                write_signature(f, sig)
            }
            TypeDescriptor::Map { key, value } => write!(f, "map[{}]{}", key, value),
            TypeDescriptor::Chan { dir, elem } => {
                // `chan <-chan T` would bind as `chan<- (chan T)`.
                let recv_elem = matches!(
                    **elem,
                    TypeDescriptor::Chan {
                        dir: ChanDir::Recv,
                        ..
                    }
                );
                match dir {
                    ChanDir::Both if recv_elem => write!(f, "chan ({})", elem),
                    ChanDir::Both => write!(f, "chan {}", elem),
                    ChanDir::Send if recv_elem => write!(f, "chan<- ({})", elem),
                    ChanDir::Send => write!(f, "chan<- {}", elem),
                    ChanDir::Recv => write!(f, "<-chan {}", elem),
                }
            }
            TypeDescriptor::Generic { base, args } => {
                write!(f, "{}[", base)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                f.write_str("]")
            }
            TypeDescriptor::Interface(elems) if elems.is_empty() => f.write_str("interface{}"),
            TypeDescriptor::Interface(elems) => {
                f.write_str("interface{ ")?;
                for (i, elem) in elems.iter().enumerate() {
                    if i > 0 {
                        f.write_str("; ")?;
                    }
                    write!(f, "{}", elem)?;
                }
                f.write_str(" }")
            }
            TypeDescriptor::Struct(fields) if fields.is_empty() => f.write_str("struct{}"),
            TypeDescriptor::Struct(fields) => {
                f.write_str("struct{ ")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str("; ")?;
                    }
                    match &field.name {
                        Some(name) => write!(f, "{} {}", name, field.ty)?,
                        None => write!(f, "{}", field.ty)?,
                    }
                    if let Some(tag) = &field.tag {
                        write!(f, " {}", tag)?;
                    }
                }
                f.write_str(" }")
            }
        }
    }
}
