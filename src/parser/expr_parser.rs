// Copyright (c) Chris Gunn.
// Licensed under the MIT license.


use std::ops::Range;

use chumsky::{prelude::*, Stream};

use crate::{
    ast::{Expr, ExprArray, ExprAttribute, ExprIndex, ExprOpBinary, ExprString},
    error::SyntaxError,
};

use super::lexer::{Token, TokenKind};

pub struct ExprParser {
    parser: Box<dyn Parser<TokenKind, (Expr, Range<usize>), Error = Simple<TokenKind>>>,
}

impl ExprParser {
    pub fn new() -> ExprParser {
        let parser = gen_expression_parser();
        ExprParser {
            parser: Box::new(parser),
        }
    }

    /// Parses one expression from the start of `tokens`.
    ///
    /// Returns the expression and the number of tokens it was built from. The
    /// tokens after it are left for the caller.
    pub fn parse(&self, tokens: &[Token]) -> Result<(Expr, usize), SyntaxError> {
        // Spans are token indices.
        let eoi = tokens.len()..tokens.len() + 1;
        let stream = Stream::from_iter(
            eoi,
            tokens.iter().enumerate().map(|(i, token)| (token.kind.clone(), i..i + 1)),
        );

        let errs = match self.parser.parse(stream) {
            Ok((expr, span)) => return Ok((expr, span.end)),
            Err(errs) => errs,
        };

        for err in &errs {
            tracing::debug!(error = %err, "expression parse error");
        }

        let line_of = |index: usize| {
            tokens
                .get(index)
                .or_else(|| tokens.last())
                .map_or(1, |token| token.line)
        };
        let err = match errs.into_iter().next() {
            Some(err) => SyntaxError::at(err.to_string(), line_of(err.span().start)),
            None => SyntaxError::at("invalid expression", line_of(0)),
        };
        Err(err)
    }
}

impl Default for ExprParser {
    fn default() -> Self {
        ExprParser::new()
    }
}

fn gen_expression_parser() -> impl Parser<TokenKind, (Expr, Range<usize>), Error = Simple<TokenKind>> {
    let expr = recursive(|expr| {
        let value = select! {
            TokenKind::String(value) => Expr::String(ExprString { value }),
            TokenKind::Integer(value) => Expr::Integer(value),
            TokenKind::Real(value) => Expr::Real(value),
            TokenKind::Name(name) if name == "true" => Expr::Bool(true),
            TokenKind::Name(name) if name == "false" => Expr::Bool(false),
            TokenKind::Name(name) if name == "null" || name == "none" => Expr::Null,
        }
        .labelled("value");

        let name = select! { TokenKind::Name(name) => name }.labelled("name");

        let list = expr
            .clone()
            .separated_by(just(TokenKind::Comma))
            .allow_trailing()
            .delimited_by(just(TokenKind::LBracket), just(TokenKind::RBracket))
            .map(|values| Expr::Array(ExprArray::from_values(values)));

        let hash_key = select! {
            TokenKind::Name(name) => Expr::String(ExprString { value: name }),
            TokenKind::String(value) => Expr::String(ExprString { value }),
            TokenKind::Integer(value) => Expr::Integer(value),
        }
        .or(expr.clone().delimited_by(just(TokenKind::LParen), just(TokenKind::RParen)))
        .labelled("hash key");

        let hash = hash_key
            .then_ignore(just(TokenKind::Colon))
            .then(expr.clone())
            .separated_by(just(TokenKind::Comma))
            .allow_trailing()
            .delimited_by(just(TokenKind::LBrace), just(TokenKind::RBrace))
            .map(|pairs| Expr::Array(ExprArray::from_pairs(pairs)));

        enum Postfix {
            Attribute(String),
            Index(Expr),
        }

        let postfix_attribute = just(TokenKind::Dot).ignore_then(name.clone()).map(Postfix::Attribute);

        let postfix_index = expr
            .clone()
            .delimited_by(just(TokenKind::LBracket), just(TokenKind::RBracket))
            .map(Postfix::Index);

        let postfix = postfix_attribute.or(postfix_index);

        let paren = expr.clone().delimited_by(just(TokenKind::LParen), just(TokenKind::RParen));

        // Only names and parenthesized expressions take postfix operators, so a
        // literal followed by a list literal stays two separate expressions.
        let reference = name
            .map(Expr::Name)
            .or(paren)
            .then(postfix.repeated())
            .foldl(|object, postfix| match postfix {
                Postfix::Attribute(name) => Expr::Attribute(ExprAttribute {
                    object: Box::new(object),
                    name,
                }),
                Postfix::Index(index) => Expr::Index(ExprIndex {
                    object: Box::new(object),
                    index: Box::new(index),
                }),
            });

        let atom = value.or(list).or(hash).or(reference);

        let compare_op = just(TokenKind::Eq).or(just(TokenKind::Ne));

        let compare = atom
            .clone()
            .then(compare_op.then(atom).repeated())
            .foldl(|left, (token, right)| {
                let op = ExprOpBinary {
                    left: Box::new(left),
                    right: Box::new(right),
                };
                match token {
                    TokenKind::Ne => Expr::Ne(op),
                    _ => Expr::Eq(op),
                }
            });

        compare
    });

    expr.map_with_span(|expr, span| (expr, span))
}
