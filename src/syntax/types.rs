//! Type expression parser.

use super::token::{Token, TokenKind};
use super::SyntaxError;
use crate::model::{
    ChanDir, Field, InterfaceElem, Signature, StructField, TypeDescriptor, TypeTerm,
};

/// Parse a complete type expression from the tokens of a type spec.
pub fn parse_type_tokens(tokens: &[Token]) -> Result<TypeDescriptor, SyntaxError> {
    let mut parser = TypeParser::new(tokens);
    let ty = parser.parse_type()?;
    parser.expect_end()?;
    Ok(ty)
}

/// Recursive-descent parser over an `Eof`-terminated token slice.
pub struct TypeParser<'t> {
    tokens: &'t [Token],
    pos: usize,
}

/// A parameter-list entry before Go's grouping rule is applied.
enum Entry {
    /// A lone identifier: a name or a type, decided by its neighbours.
    Bare(String),
    Named(String, TypeDescriptor),
    Type(TypeDescriptor),
}

impl<'t> TypeParser<'t> {
    pub fn new(tokens: &'t [Token]) -> Self {
        Self { tokens, pos: 0 }
    }

    fn peek(&self) -> &'t Token {
        self.peek_at(0)
    }

    fn peek_at(&self, offset: usize) -> &'t Token {
        let last = self.tokens.len().saturating_sub(1);
        &self.tokens[(self.pos + offset).min(last)]
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.peek().is(kind)
    }

    fn advance(&mut self) -> &'t Token {
        let token = self.peek();
        if !token.is(TokenKind::Eof) {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind, expected: &'static str) -> Result<&'t Token, SyntaxError> {
        if self.at(kind) {
            Ok(self.advance())
        } else {
            Err(self.error(expected))
        }
    }

    fn error(&self, expected: &'static str) -> SyntaxError {
        let found = self.peek();
        SyntaxError::Expected {
            line: found.line,
            expected,
            found: found.text.clone(),
        }
    }

    fn skip_semicolons(&mut self) {
        while self.eat(TokenKind::Semicolon) {}
    }

    pub fn expect_end(&mut self) -> Result<(), SyntaxError> {
        self.skip_semicolons();
        if self.at(TokenKind::Eof) {
            Ok(())
        } else {
            Err(self.error("end of type"))
        }
    }

    /// Whether the next token can begin a type.
    fn starts_type(&self) -> bool {
        matches!(
            self.peek().kind,
            TokenKind::Ident
                | TokenKind::Star
                | TokenKind::LBracket
                | TokenKind::LParen
                | TokenKind::Arrow
                | TokenKind::KwFunc
                | TokenKind::KwMap
                | TokenKind::KwChan
                | TokenKind::KwInterface
                | TokenKind::KwStruct
        )
    }

    pub fn parse_type(&mut self) -> Result<TypeDescriptor, SyntaxError> {
        match self.peek().kind {
            TokenKind::Ident => self.named_type(),
            TokenKind::Star => {
                self.advance();
                Ok(TypeDescriptor::pointer(self.parse_type()?))
            }
            TokenKind::LBracket => self.array_type(),
            TokenKind::Ellipsis => {
                self.advance();
                Ok(TypeDescriptor::Variadic(Box::new(self.parse_type()?)))
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_type()?;
                self.expect(TokenKind::RParen, "')'")?;
                Ok(inner)
            }
            TokenKind::KwFunc => {
                self.advance();
                Ok(TypeDescriptor::Function(self.signature()?))
            }
            TokenKind::KwMap => {
                self.advance();
                self.expect(TokenKind::LBracket, "'['")?;
                let key = self.parse_type()?;
                self.expect(TokenKind::RBracket, "']'")?;
                let value = self.parse_type()?;
                Ok(TypeDescriptor::Map {
                    key: Box::new(key),
                    value: Box::new(value),
                })
            }
            TokenKind::KwChan => {
                self.advance();
                let dir = if self.eat(TokenKind::Arrow) {
                    ChanDir::Send
                } else {
                    ChanDir::Both
                };
                Ok(TypeDescriptor::Chan {
                    dir,
                    elem: Box::new(self.parse_type()?),
                })
            }
            TokenKind::Arrow => {
                self.advance();
                self.expect(TokenKind::KwChan, "'chan'")?;
                Ok(TypeDescriptor::Chan {
                    dir: ChanDir::Recv,
                    elem: Box::new(self.parse_type()?),
                })
            }
            TokenKind::KwInterface => self.interface_type(),
            TokenKind::KwStruct => self.struct_type(),
            _ => Err(self.error("type")),
        }
    }

    fn named_type(&mut self) -> Result<TypeDescriptor, SyntaxError> {
        let first = self.advance().text.clone();
        let base = if self.eat(TokenKind::Dot) {
            let name = self.expect(TokenKind::Ident, "qualified type name")?;
            TypeDescriptor::qualified(first, name.text.clone())
        } else {
            TypeDescriptor::Identifier(first)
        };
        if !self.at(TokenKind::LBracket) {
            return Ok(base);
        }
        self.advance();
        let mut args = vec![self.parse_type()?];
        while self.eat(TokenKind::Comma) {
            if self.at(TokenKind::RBracket) {
                break;
            }
            args.push(self.parse_type()?);
        }
        self.expect(TokenKind::RBracket, "']'")?;
        Ok(TypeDescriptor::Generic {
            base: Box::new(base),
            args,
        })
    }

    fn array_type(&mut self) -> Result<TypeDescriptor, SyntaxError> {
        self.advance();
        if self.eat(TokenKind::RBracket) {
            return Ok(TypeDescriptor::slice(self.parse_type()?));
        }
        let mut len = String::new();
        let mut depth = 0usize;
        loop {
            let token = self.advance();
            match token.kind {
                TokenKind::RBracket if depth == 0 => break,
                TokenKind::Eof => return Err(self.error("']'")),
                TokenKind::LBracket | TokenKind::LParen => depth += 1,
                TokenKind::RBracket | TokenKind::RParen => depth = depth.saturating_sub(1),
                _ => {}
            }
            len.push_str(&token.text);
        }
        Ok(TypeDescriptor::Array {
            len: Some(len),
            elem: Box::new(self.parse_type()?),
        })
    }

    /// Parameters and optional results, starting at `(`.
    pub fn signature(&mut self) -> Result<Signature, SyntaxError> {
        let params = self.parameter_list()?;
        let results = if self.at(TokenKind::LParen) {
            self.parameter_list()?
        } else if self.starts_type() {
            vec![Field::anonymous(self.parse_type()?)]
        } else {
            Vec::new()
        };
        Ok(Signature { params, results })
    }

    fn parameter_list(&mut self) -> Result<Vec<Field>, SyntaxError> {
        let open = self.expect(TokenKind::LParen, "'('")?;
        let mut entries = Vec::new();
        loop {
            self.skip_semicolons();
            if self.eat(TokenKind::RParen) {
                break;
            }
            entries.push(self.parameter_entry()?);
            self.skip_semicolons();
            if !self.eat(TokenKind::Comma) {
                self.skip_semicolons();
                self.expect(TokenKind::RParen, "',' or ')'")?;
                break;
            }
        }
        group_parameters(entries, open.line)
    }

    fn parameter_entry(&mut self) -> Result<Entry, SyntaxError> {
        if !self.at(TokenKind::Ident) {
            return Ok(Entry::Type(self.parse_type()?));
        }
        let next = self.peek_at(1).kind;
        match next {
            TokenKind::Comma | TokenKind::RParen | TokenKind::Semicolon => {
                Ok(Entry::Bare(self.advance().text.clone()))
            }
            TokenKind::Dot => Ok(Entry::Type(self.parse_type()?)),
            // `a []T` and `a [4]T` name a parameter; `T[int]` instantiates.
            TokenKind::LBracket
                if !matches!(
                    self.peek_at(2).kind,
                    TokenKind::RBracket | TokenKind::Number | TokenKind::Ellipsis
                ) =>
            {
                Ok(Entry::Type(self.parse_type()?))
            }
            _ => {
                let name = self.advance().text.clone();
                Ok(Entry::Named(name, self.parse_type()?))
            }
        }
    }

    fn interface_type(&mut self) -> Result<TypeDescriptor, SyntaxError> {
        self.advance();
        self.expect(TokenKind::LBrace, "'{'")?;
        let mut elems = Vec::new();
        loop {
            self.skip_semicolons();
            if self.eat(TokenKind::RBrace) {
                break;
            }
            elems.push(self.interface_elem()?);
        }
        Ok(TypeDescriptor::Interface(elems))
    }

    fn interface_elem(&mut self) -> Result<InterfaceElem, SyntaxError> {
        if self.at(TokenKind::Ident) && self.peek_at(1).is(TokenKind::LParen) {
            let name = self.advance().text.clone();
            let sig = self.signature()?;
            return Ok(InterfaceElem::Method { name, sig });
        }

        let first = self.type_term()?;
        if !self.at(TokenKind::Pipe) && !first.tilde {
            return Ok(InterfaceElem::Embed(first.ty));
        }
        let mut terms = vec![first];
        while self.eat(TokenKind::Pipe) {
            terms.push(self.type_term()?);
        }
        Ok(InterfaceElem::TypeSet(terms))
    }

    fn type_term(&mut self) -> Result<TypeTerm, SyntaxError> {
        let tilde = self.eat(TokenKind::Tilde);
        Ok(TypeTerm {
            tilde,
            ty: self.parse_type()?,
        })
    }

    fn struct_type(&mut self) -> Result<TypeDescriptor, SyntaxError> {
        self.advance();
        self.expect(TokenKind::LBrace, "'{'")?;
        let mut fields = Vec::new();
        loop {
            self.skip_semicolons();
            if self.eat(TokenKind::RBrace) {
                break;
            }
            let embedded = self.at(TokenKind::Star)
                || (self.at(TokenKind::Ident)
                    && matches!(
                        self.peek_at(1).kind,
                        TokenKind::Dot | TokenKind::Semicolon | TokenKind::RBrace | TokenKind::Str
                    ));
            if embedded {
                let ty = self.parse_type()?;
                let tag = self.struct_tag();
                fields.push(StructField {
                    name: None,
                    ty,
                    tag,
                });
                continue;
            }

            let mut names = vec![self.expect(TokenKind::Ident, "field name")?.text.clone()];
            while self.eat(TokenKind::Comma) {
                names.push(self.expect(TokenKind::Ident, "field name")?.text.clone());
            }
            let ty = self.parse_type()?;
            let tag = self.struct_tag();
            for name in names {
                fields.push(StructField {
                    name: Some(name),
                    ty: ty.clone(),
                    tag: tag.clone(),
                });
            }
        }
        Ok(TypeDescriptor::Struct(fields))
    }

    fn struct_tag(&mut self) -> Option<String> {
        if self.at(TokenKind::Str) {
            Some(self.advance().text.clone())
        } else {
            None
        }
    }
}

/// Apply Go's parameter grouping: either every entry is named (`a, b int`
/// shares one type across the run of bare names) or none is.
fn group_parameters(entries: Vec<Entry>, line: u32) -> Result<Vec<Field>, SyntaxError> {
    let any_named = entries.iter().any(|e| matches!(e, Entry::Named(..)));
    if !any_named {
        return Ok(entries
            .into_iter()
            .map(|entry| match entry {
                Entry::Bare(name) => Field::anonymous(TypeDescriptor::Identifier(name)),
                Entry::Type(ty) | Entry::Named(_, ty) => Field::anonymous(ty),
            })
            .collect());
    }

    let mut fields = Vec::with_capacity(entries.len());
    let mut pending = Vec::new();
    for entry in entries {
        match entry {
            Entry::Bare(name) => pending.push(name),
            Entry::Named(name, ty) => {
                for bare in pending.drain(..) {
                    fields.push(Field::named(bare, ty.clone()));
                }
                fields.push(Field::named(name, ty));
            }
            Entry::Type(ty) => {
                return Err(SyntaxError::Invalid {
                    line,
                    message: format!("mixed named and unnamed parameters near {}", ty),
                })
            }
        }
    }
    if let Some(name) = pending.first() {
        return Err(SyntaxError::Invalid {
            line,
            message: format!("parameter {} has no type", name),
        });
    }
    Ok(fields)
}
