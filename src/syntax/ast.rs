//! File-level declarations.

use std::path::PathBuf;

use super::token::Token;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSpec {
    /// Explicit name, including `_` and `.`.
    pub name: Option<String>,
    pub path: String,
}

/// A type declaration whose right-hand side is kept as tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeSpec {
    pub name: String,
    /// `type A = B`
    pub alias: bool,
    /// Declared with a type parameter list.
    pub generic: bool,
    /// Tokens of the type expression, terminated by `Eof`.
    pub body: Vec<Token>,
    pub line: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    pub package: String,
    pub imports: Vec<ImportSpec>,
    pub types: Vec<TypeSpec>,
}

impl SourceFile {
    pub fn find_type(&self, name: &str) -> Option<&TypeSpec> {
        self.types.iter().find(|t| t.name == name)
    }
}
