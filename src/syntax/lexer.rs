//! Go lexer with automatic semicolon insertion.

use super::token::{keyword, Token, TokenKind};
use super::SyntaxError;

pub struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: u32,
    /// Whether a newline here terminates a statement.
    insert_semi: bool,
    tokens: Vec<Token>,
}

impl Lexer {
    pub fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
            insert_semi: false,
            tokens: Vec::new(),
        }
    }

    /// Lex the whole input. The result always ends with `Eof`.
    pub fn tokenize(mut self) -> Result<Vec<Token>, SyntaxError> {
        loop {
            let Some(c) = self.peek() else {
                self.auto_semicolon();
                let line = self.line;
                self.tokens.push(Token::new(TokenKind::Eof, "", line));
                return Ok(self.tokens);
            };

            match c {
                ' ' | '\t' | '\r' => {
                    self.pos += 1;
                }
                '\n' => {
                    self.auto_semicolon();
                    self.pos += 1;
                    self.line += 1;
                }
                '/' if self.peek_at(1) == Some('/') => self.line_comment(),
                '/' if self.peek_at(1) == Some('*') => self.block_comment()?,
                c if c.is_alphabetic() || c == '_' => self.ident(),
                c if c.is_ascii_digit() => self.number(),
                '.' if self.peek_at(1).is_some_and(|d| d.is_ascii_digit()) => self.number(),
                '"' => self.interpreted_string()?,
                '`' => self.raw_string()?,
                '\'' => self.rune()?,
                _ => self.punct(c)?,
            }
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn auto_semicolon(&mut self) {
        if self.insert_semi {
            self.tokens
                .push(Token::new(TokenKind::Semicolon, "\n", self.line));
            self.insert_semi = false;
        }
    }

    fn push(&mut self, kind: TokenKind, start: usize, insert_semi: bool) {
        let text: String = self.chars[start..self.pos].iter().collect();
        self.tokens.push(Token::new(kind, text, self.line));
        self.insert_semi = insert_semi;
    }

    fn line_comment(&mut self) {
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            self.pos += 1;
        }
    }

    fn block_comment(&mut self) -> Result<(), SyntaxError> {
        let start_line = self.line;
        self.pos += 2;
        let mut saw_newline = false;
        loop {
            match self.peek() {
                None => {
                    return Err(SyntaxError::Unterminated {
                        line: start_line,
                        what: "block comment",
                    })
                }
                Some('*') if self.peek_at(1) == Some('/') => {
                    self.pos += 2;
                    break;
                }
                Some('\n') => {
                    saw_newline = true;
                    self.line += 1;
                    self.pos += 1;
                }
                Some(_) => self.pos += 1,
            }
        }
        if saw_newline {
            self.auto_semicolon();
        }
        Ok(())
    }

    fn ident(&mut self) {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_alphanumeric() || c == '_')
        {
            self.pos += 1;
        }
        let text: String = self.chars[start..self.pos].iter().collect();
        match keyword(&text) {
            Some(kind) => self.push(kind, start, false),
            None => {
                let ends_statement = !matches!(
                    text.as_str(),
                    "case" | "default" | "defer" | "else" | "for" | "go" | "goto" | "if"
                        | "range" | "select" | "switch"
                );
                self.push(TokenKind::Ident, start, ends_statement);
            }
        }
    }

    fn number(&mut self) {
        let start = self.pos;
        let hex = matches!(self.chars[start..], ['0', 'x' | 'X', ..]);
        while let Some(c) = self.peek() {
            let prev = if self.pos > start {
                self.chars[self.pos - 1]
            } else {
                ' '
            };
            let exponent_sign = (c == '+' || c == '-')
                && (matches!(prev, 'p' | 'P') || (!hex && matches!(prev, 'e' | 'E')));
            if c.is_ascii_alphanumeric() || c == '_' || c == '.' || exponent_sign {
                self.pos += 1;
            } else {
                break;
            }
        }
        self.push(TokenKind::Number, start, true);
    }

    fn interpreted_string(&mut self) -> Result<(), SyntaxError> {
        self.quoted('"', TokenKind::Str, "string literal")
    }

    fn rune(&mut self) -> Result<(), SyntaxError> {
        self.quoted('\'', TokenKind::Char, "rune literal")
    }

    fn quoted(
        &mut self,
        quote: char,
        kind: TokenKind,
        what: &'static str,
    ) -> Result<(), SyntaxError> {
        let start = self.pos;
        self.pos += 1;
        loop {
            match self.peek() {
                None | Some('\n') => {
                    return Err(SyntaxError::Unterminated {
                        line: self.line,
                        what,
                    })
                }
                Some('\\') => self.pos += 2,
                Some(c) if c == quote => {
                    self.pos += 1;
                    break;
                }
                Some(_) => self.pos += 1,
            }
        }
        self.push(kind, start, true);
        Ok(())
    }

    fn raw_string(&mut self) -> Result<(), SyntaxError> {
        let start = self.pos;
        let start_line = self.line;
        self.pos += 1;
        loop {
            match self.peek() {
                None => {
                    return Err(SyntaxError::Unterminated {
                        line: start_line,
                        what: "raw string literal",
                    })
                }
                Some('`') => {
                    self.pos += 1;
                    break;
                }
                Some('\n') => {
                    self.line += 1;
                    self.pos += 1;
                }
                Some(_) => self.pos += 1,
            }
        }
        let text: String = self.chars[start..self.pos].iter().collect();
        self.tokens.push(Token::new(TokenKind::Str, text, start_line));
        self.insert_semi = true;
        Ok(())
    }

    fn punct(&mut self, c: char) -> Result<(), SyntaxError> {
        let start = self.pos;
        let next = self.peek_at(1);
        let (kind, len, ends_statement) = match c {
            '(' => (TokenKind::LParen, 1, false),
            ')' => (TokenKind::RParen, 1, true),
            '[' => (TokenKind::LBracket, 1, false),
            ']' => (TokenKind::RBracket, 1, true),
            '{' => (TokenKind::LBrace, 1, false),
            '}' => (TokenKind::RBrace, 1, true),
            ',' => (TokenKind::Comma, 1, false),
            ';' => (TokenKind::Semicolon, 1, false),
            '.' if next == Some('.') && self.peek_at(2) == Some('.') => {
                (TokenKind::Ellipsis, 3, false)
            }
            '.' => (TokenKind::Dot, 1, false),
            '~' => (TokenKind::Tilde, 1, false),
            ':' if next == Some('=') => (TokenKind::Op, 2, false),
            ':' => (TokenKind::Colon, 1, false),
            '*' if next == Some('=') => (TokenKind::Op, 2, false),
            '*' => (TokenKind::Star, 1, false),
            '|' if matches!(next, Some('|') | Some('=')) => (TokenKind::Op, 2, false),
            '|' => (TokenKind::Pipe, 1, false),
            '<' if next == Some('-') => (TokenKind::Arrow, 2, false),
            '<' if next == Some('<') && self.peek_at(2) == Some('=') => (TokenKind::Op, 3, false),
            '<' if matches!(next, Some('<') | Some('=')) => (TokenKind::Op, 2, false),
            '>' if next == Some('>') && self.peek_at(2) == Some('=') => (TokenKind::Op, 3, false),
            '>' if matches!(next, Some('>') | Some('=')) => (TokenKind::Op, 2, false),
            '&' if next == Some('^') && self.peek_at(2) == Some('=') => (TokenKind::Op, 3, false),
            '&' if matches!(next, Some('&') | Some('^') | Some('=')) => (TokenKind::Op, 2, false),
            '+' if next == Some('+') => (TokenKind::Op, 2, true),
            '-' if next == Some('-') => (TokenKind::Op, 2, true),
            '=' if next == Some('=') => (TokenKind::Op, 2, false),
            '=' => (TokenKind::Assign, 1, false),
            '!' | '+' | '-' | '/' | '%' | '^' if next == Some('=') => (TokenKind::Op, 2, false),
            '!' | '+' | '-' | '/' | '%' | '^' | '<' | '>' | '&' => (TokenKind::Op, 1, false),
            other => {
                return Err(SyntaxError::UnexpectedChar {
                    line: self.line,
                    ch: other,
                })
            }
        };
        self.pos += len;
        self.push(kind, start, ends_statement);
        Ok(())
    }
}
