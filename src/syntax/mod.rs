//! Go front end.
//!
//! Just enough of Go to find type declarations: files are parsed down to
//! their package clause, imports and type specs; every other declaration
//! is skipped by bracket matching. Type expressions are parsed on demand
//! from the tokens each spec keeps.

mod ast;
mod lexer;
mod parser;
mod token;
mod types;

pub use ast::{ImportSpec, SourceFile, TypeSpec};
pub use lexer::Lexer;
pub use parser::parse_file;
pub use token::{unquote, Token, TokenKind};
pub use types::{parse_type_tokens, TypeParser};

/// Lexing or parsing failure, positioned by line.
#[derive(Debug, thiserror::Error)]
pub enum SyntaxError {
    #[error("line {line}: unexpected character {ch:?}")]
    UnexpectedChar { line: u32, ch: char },

    #[error("line {line}: unterminated {what}")]
    Unterminated { line: u32, what: &'static str },

    #[error("line {line}: expected {expected}, found {found:?}")]
    Expected {
        line: u32,
        expected: &'static str,
        found: String,
    },

    #[error("line {line}: {message}")]
    Invalid { line: u32, message: String },
}
