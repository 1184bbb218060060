//! File parser: package clause, imports and type declarations.

use std::path::PathBuf;

use super::ast::{ImportSpec, SourceFile, TypeSpec};
use super::lexer::Lexer;
use super::token::{unquote, Token, TokenKind};
use super::SyntaxError;

/// Parse a Go source file.
pub fn parse_file(path: impl Into<PathBuf>, source: &str) -> Result<SourceFile, SyntaxError> {
    let tokens = Lexer::new(source).tokenize()?;
    FileParser { tokens, pos: 0 }.parse(path.into())
}

struct FileParser {
    tokens: Vec<Token>,
    pos: usize,
}

impl FileParser {
    fn parse(mut self, path: PathBuf) -> Result<SourceFile, SyntaxError> {
        self.skip_semicolons();
        self.expect(TokenKind::KwPackage, "package clause")?;
        let package = self.expect(TokenKind::Ident, "package name")?.text;

        let mut imports = Vec::new();
        loop {
            self.skip_semicolons();
            if !self.eat(TokenKind::KwImport) {
                break;
            }
            if self.eat(TokenKind::LParen) {
                loop {
                    self.skip_semicolons();
                    if self.eat(TokenKind::RParen) {
                        break;
                    }
                    imports.push(self.import_spec()?);
                }
            } else {
                imports.push(self.import_spec()?);
            }
        }

        let mut types = Vec::new();
        loop {
            self.skip_semicolons();
            match self.peek().kind {
                TokenKind::Eof => break,
                TokenKind::KwType => {
                    self.advance();
                    if self.eat(TokenKind::LParen) {
                        loop {
                            self.skip_semicolons();
                            if self.eat(TokenKind::RParen) {
                                break;
                            }
                            types.push(self.type_spec(true)?);
                        }
                    } else {
                        types.push(self.type_spec(false)?);
                    }
                }
                _ => self.skip_declaration()?,
            }
        }

        Ok(SourceFile {
            path,
            package,
            imports,
            types,
        })
    }

    fn peek(&self) -> &Token {
        self.peek_at(0)
    }

    fn peek_at(&self, offset: usize) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[(self.pos + offset).min(last)]
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if !token.is(TokenKind::Eof) {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.peek().is(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind, expected: &'static str) -> Result<Token, SyntaxError> {
        if self.peek().is(kind) {
            Ok(self.advance())
        } else {
            let found = self.peek();
            Err(SyntaxError::Expected {
                line: found.line,
                expected,
                found: found.text.clone(),
            })
        }
    }

    fn skip_semicolons(&mut self) {
        while self.eat(TokenKind::Semicolon) {}
    }

    fn import_spec(&mut self) -> Result<ImportSpec, SyntaxError> {
        let name = match self.peek().kind {
            TokenKind::Ident => Some(self.advance().text),
            TokenKind::Dot => {
                self.advance();
                Some(".".to_string())
            }
            _ => None,
        };
        let path = self.expect(TokenKind::Str, "import path")?;
        Ok(ImportSpec {
            name,
            path: unquote(&path.text),
        })
    }

    fn type_spec(&mut self, grouped: bool) -> Result<TypeSpec, SyntaxError> {
        let name = self.expect(TokenKind::Ident, "type name")?;
        let mut generic = false;
        if self.peek().is(TokenKind::LBracket) && self.at_type_params() {
            self.skip_balanced()?;
            generic = true;
        }
        let alias = self.eat(TokenKind::Assign);

        let mut body = Vec::new();
        let mut depth = 0usize;
        loop {
            let token = self.peek();
            match token.kind {
                TokenKind::Eof => break,
                TokenKind::Semicolon if depth == 0 => break,
                TokenKind::RParen if depth == 0 && grouped => break,
                TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => depth += 1,
                TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace => {
                    depth = depth.saturating_sub(1)
                }
                _ => {}
            }
            body.push(self.advance());
        }
        if body.is_empty() {
            let found = self.peek();
            return Err(SyntaxError::Expected {
                line: found.line,
                expected: "type",
                found: found.text.clone(),
            });
        }
        let end_line = body.last().map_or(name.line, |t| t.line);
        body.push(Token::new(TokenKind::Eof, "", end_line));

        Ok(TypeSpec {
            name: name.text,
            alias,
            generic,
            body,
            line: name.line,
        })
    }

    /// At `[` after a type name: distinguish `type S[T any] ...` from
    /// `type A [N]int`.
    fn at_type_params(&self) -> bool {
        self.peek_at(1).is(TokenKind::Ident)
            && matches!(
                self.peek_at(2).kind,
                TokenKind::Ident
                    | TokenKind::Comma
                    | TokenKind::Tilde
                    | TokenKind::LBracket
                    | TokenKind::KwInterface
                    | TokenKind::KwFunc
                    | TokenKind::KwMap
                    | TokenKind::KwChan
                    | TokenKind::KwStruct
            )
    }

    /// Skip from an opening bracket to its matching close.
    fn skip_balanced(&mut self) -> Result<(), SyntaxError> {
        let open = self.advance();
        let mut depth = 1usize;
        while depth > 0 {
            let token = self.advance();
            match token.kind {
                TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => depth += 1,
                TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace => depth -= 1,
                TokenKind::Eof => {
                    return Err(SyntaxError::Unterminated {
                        line: open.line,
                        what: "bracket",
                    })
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Skip a `func`, `var` or `const` declaration up to the terminating
    /// semicolon at bracket depth zero.
    fn skip_declaration(&mut self) -> Result<(), SyntaxError> {
        let start = self.peek().line;
        let mut depth = 0usize;
        loop {
            let token = self.advance();
            match token.kind {
                TokenKind::Eof if depth > 0 => {
                    return Err(SyntaxError::Unterminated {
                        line: start,
                        what: "declaration",
                    })
                }
                TokenKind::Eof => return Ok(()),
                TokenKind::Semicolon if depth == 0 => return Ok(()),
                TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => depth += 1,
                TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace => {
                    depth = depth.saturating_sub(1)
                }
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = r#"
// Package svc does things.
package svc

import (
	"context"
	kitlog "github.com/go-kit/kit/log"
	_ "embed"
)

import "io"

type Worker interface {
	Do(ctx context.Context, n int) (string, error)
}

func helper(a, b int) int {
	if a > b {
		return a
	}
	return b
}

var defaults = map[string]int{"a": 1}

type (
	ID    string
	Alias = Worker
	Pair[K comparable, V any] struct {
		Key K
		Val V
	}
	Buffer [16]byte
)
"#;

    #[test]
    fn test_parse_package_and_imports() {
        let file = parse_file("svc.go", SOURCE).unwrap();
        assert_eq!(file.package, "svc");
        assert_eq!(
            file.imports,
            vec![
                ImportSpec {
                    name: None,
                    path: "context".to_string()
                },
                ImportSpec {
                    name: Some("kitlog".to_string()),
                    path: "github.com/go-kit/kit/log".to_string()
                },
                ImportSpec {
                    name: Some("_".to_string()),
                    path: "embed".to_string()
                },
                ImportSpec {
                    name: None,
                    path: "io".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_parse_type_specs_skipping_other_decls() {
        let file = parse_file("svc.go", SOURCE).unwrap();
        let names: Vec<_> = file.types.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Worker", "ID", "Alias", "Pair", "Buffer"]);

        let alias = file.find_type("Alias").unwrap();
        assert!(alias.alias);
        assert!(!alias.generic);

        assert!(file.find_type("Pair").unwrap().generic);
        assert!(!file.find_type("Buffer").unwrap().generic);
        assert_eq!(file.find_type("Buffer").unwrap().body[0].kind, TokenKind::LBracket);
    }

    #[test]
    fn test_type_body_tokens_end_with_eof() {
        let file = parse_file("svc.go", SOURCE).unwrap();
        let worker = file.find_type("Worker").unwrap();
        assert_eq!(worker.body.first().unwrap().kind, TokenKind::KwInterface);
        assert_eq!(worker.body.last().unwrap().kind, TokenKind::Eof);
        assert_eq!(worker.line, 13);
    }

    #[test]
    fn test_missing_package_clause() {
        let err = parse_file("bad.go", "type A int\n").unwrap_err();
        assert!(matches!(err, SyntaxError::Expected { expected: "package clause", .. }));
    }

    #[test]
    fn test_single_line_group() {
        let file = parse_file("a.go", "package a\ntype ( A int; B string )\n").unwrap();
        assert_eq!(file.types.len(), 2);
        assert_eq!(file.types[1].body.len(), 2);
    }
}
