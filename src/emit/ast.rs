//! Output syntax tree.
//!
//! Only the statement and expression forms the decorators need. Types
//! are carried as [`TypeDescriptor`]s and printed through their
//! `Display` impl.

use crate::model::{Field, Signature, TypeDescriptor};

/// A complete generated file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoFile {
    /// Leading comment line, without the `//`.
    pub banner: String,
    pub package: String,
    /// (alias, path), in the order they are written.
    pub imports: Vec<(String, String)>,
    pub decls: Vec<Decl>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decl {
    Struct(StructDecl),
    Func(FuncDecl),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructDecl {
    pub name: String,
    pub fields: Vec<(String, TypeDescriptor)>,
}

/// A function or, with a receiver, a method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuncDecl {
    /// Doc comment text, without the `//`.
    pub doc: Option<String>,
    pub receiver: Option<Field>,
    pub name: String,
    pub sig: Signature,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
    /// `a, b := x, y`
    Define { lhs: Vec<String>, rhs: Vec<Expr> },
    /// `a = x`
    Assign { lhs: Vec<Expr>, rhs: Vec<Expr> },
    Expr(Expr),
    If { cond: Expr, body: Vec<Stmt> },
    Return(Vec<Expr>),
    Defer(Expr),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Ident(String),
    /// `x.name`
    Selector(Box<Expr>, String),
    /// `f(args)`, `f(args...)` when `spread` is set.
    Call {
        func: Box<Expr>,
        args: Vec<Expr>,
        spread: bool,
    },
    /// String literal, unquoted.
    Str(String),
    Int(i64),
    Binary {
        left: Box<Expr>,
        op: &'static str,
        right: Box<Expr>,
    },
    /// `T{elems}`
    Composite { ty: TypeDescriptor, elems: Vec<Expr> },
    /// `key: value` inside a composite literal.
    KeyValue(Box<Expr>, Box<Expr>),
    /// `&x`
    AddrOf(Box<Expr>),
    FuncLit { sig: Signature, body: Vec<Stmt> },
    /// `x[i]`
    Index(Box<Expr>, Box<Expr>),
}

impl Expr {
    pub fn ident(name: impl Into<String>) -> Self {
        Expr::Ident(name.into())
    }

    pub fn str(value: impl Into<String>) -> Self {
        Expr::Str(value.into())
    }

    pub fn nil() -> Self {
        Expr::ident("nil")
    }

    /// `self.name`
    pub fn dot(self, name: impl Into<String>) -> Self {
        Expr::Selector(Box::new(self), name.into())
    }

    /// `self(args)`
    pub fn call(self, args: Vec<Expr>) -> Self {
        Expr::Call {
            func: Box::new(self),
            args,
            spread: false,
        }
    }

    /// `self(args...)`
    pub fn call_spread(self, args: Vec<Expr>) -> Self {
        Expr::Call {
            func: Box::new(self),
            args,
            spread: true,
        }
    }

    pub fn binary(self, op: &'static str, right: Expr) -> Self {
        Expr::Binary {
            left: Box::new(self),
            op,
            right: Box::new(right),
        }
    }

    pub fn index(self, index: Expr) -> Self {
        Expr::Index(Box::new(self), Box::new(index))
    }

    pub fn addr_of(self) -> Self {
        Expr::AddrOf(Box::new(self))
    }

    pub fn key_value(key: impl Into<String>, value: Expr) -> Self {
        Expr::KeyValue(Box::new(Expr::ident(key)), Box::new(value))
    }

    /// `x != nil`
    pub fn not_nil(self) -> Self {
        self.binary("!=", Expr::nil())
    }
}
