//! Go tokens.

/// Token kinds. Keywords the parser never inspects lex as identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    // Literals
    Ident,
    Str,
    Char,
    Number,

    // Keywords
    KwPackage,
    KwImport,
    KwType,
    KwFunc,
    KwVar,
    KwConst,
    KwInterface,
    KwStruct,
    KwMap,
    KwChan,

    // Delimiters
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Comma,
    Semicolon,
    Colon,
    Dot,
    Ellipsis,

    // Operators the type grammar uses
    Star,
    Pipe,
    Tilde,
    Arrow, // <-
    Assign,
    /// Any other operator.
    Op,

    Eof,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Source text. Inserted semicolons carry `"\n"`.
    pub text: String,
    pub line: u32,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, line: u32) -> Self {
        Self {
            kind,
            text: text.into(),
            line,
        }
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}

pub(crate) fn keyword(ident: &str) -> Option<TokenKind> {
    Some(match ident {
        "package" => TokenKind::KwPackage,
        "import" => TokenKind::KwImport,
        "type" => TokenKind::KwType,
        "func" => TokenKind::KwFunc,
        "var" => TokenKind::KwVar,
        "const" => TokenKind::KwConst,
        "interface" => TokenKind::KwInterface,
        "struct" => TokenKind::KwStruct,
        "map" => TokenKind::KwMap,
        "chan" => TokenKind::KwChan,
        _ => return None,
    })
}

/// Decode an interpreted or raw string literal. Escapes outside the
/// common set are kept verbatim; import paths never use them.
pub fn unquote(literal: &str) -> String {
    if let Some(raw) = literal.strip_prefix('`').and_then(|s| s.strip_suffix('`')) {
        return raw.to_string();
    }
    let inner = literal
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(literal);
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unquote() {
        assert_eq!(unquote("\"github.com/acme/svc\""), "github.com/acme/svc");
        assert_eq!(unquote("`raw\\n`"), "raw\\n");
        assert_eq!(unquote("\"a\\\"b\""), "a\"b");
    }

    #[test]
    fn test_keywords() {
        assert_eq!(keyword("interface"), Some(TokenKind::KwInterface));
        assert_eq!(keyword("return"), None);
    }
}
