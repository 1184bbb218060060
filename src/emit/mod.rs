//! Go output: a small syntax tree and its printer.

mod ast;
mod printer;

pub use ast::{Decl, Expr, FuncDecl, GoFile, Stmt, StructDecl};
pub use printer::{quote, render};
