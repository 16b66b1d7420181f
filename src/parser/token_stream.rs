// Copyright (c) Chris Gunn.
// Licensed under the MIT license.

#[cfg(test)]
mod tests;

use crate::error::SyntaxError;

use super::lexer::{Token, TokenKind};

/// Cursor over the tokens of one template. Always ends with an `Eof` token.
pub struct TokenStream {
    tokens: Vec<Token>,
    current: usize,
}

impl TokenStream {
    pub fn new(mut tokens: Vec<Token>) -> TokenStream {
        if !matches!(tokens.last(), Some(Token { kind: TokenKind::Eof, .. })) {
            let line = tokens.last().map_or(1, |token| token.line);
            tokens.push(Token {
                kind: TokenKind::Eof,
                line,
            });
        }
        TokenStream { tokens, current: 0 }
    }

    pub fn current(&self) -> &Token {
        &self.tokens[self.current]
    }

    /// Consumes the current token and returns it. Stays on `Eof`.
    pub fn next(&mut self) -> Token {
        let token = self.tokens[self.current].clone();
        if self.current + 1 < self.tokens.len() {
            self.current += 1;
        }
        token
    }

    pub fn test(&self, kind: &TokenKind) -> bool {
        &self.current().kind == kind
    }

    pub fn test_name(&self, name: &str) -> bool {
        self.current().test_name(name)
    }

    pub fn is_eof(&self) -> bool {
        self.test(&TokenKind::Eof)
    }

    pub fn expect(&mut self, kind: TokenKind) -> Result<Token, SyntaxError> {
        if self.test(&kind) {
            return Ok(self.next());
        }
        Err(self.unexpected(&kind.to_string()))
    }

    pub fn expect_name(&mut self) -> Result<String, SyntaxError> {
        match &self.current().kind {
            TokenKind::Name(name) => {
                let name = name.clone();
                self.next();
                Ok(name)
            }
            _ => Err(self.unexpected("name")),
        }
    }

    pub fn expect_keyword(&mut self, keyword: &str) -> Result<Token, SyntaxError> {
        if self.test_name(keyword) {
            return Ok(self.next());
        }
        Err(self.unexpected(keyword))
    }

    /// Tokens from the current one up to and including `Eof`.
    pub fn remaining(&self) -> &[Token] {
        &self.tokens[self.current..]
    }

    pub fn skip(&mut self, count: usize) {
        self.current = (self.current + count).min(self.tokens.len() - 1);
    }

    fn unexpected(&self, expected: &str) -> SyntaxError {
        let token = self.current();
        let message = match &token.kind {
            TokenKind::Eof => "Unexpected end of template.".to_string(),
            found => format!("Unexpected token \"{}\" (expected \"{}\").", found, expected),
        };
        SyntaxError::at(message, token.line)
    }
}
