// Copyright (c) Chris Gunn.
// Licensed under the MIT license.

mod expr_parser;
pub mod lexer;
mod token_stream;


use std::collections::HashMap;

use crate::{
    ast::{DocumentAttributes, Expr, Node, NodeFor, NodeIf, NodeList, NodeMacro, NodePrint, NodeText, Template},
    directive::Directive,
    elements::element_directives,
    error::SyntaxError,
};

use expr_parser::ExprParser;
use lexer::{Lexer, Token, TokenKind};

pub use token_stream::TokenStream;

/// Predicate over the tag name token of a block, used to stop a subparse.
pub type SubparseTest<'t> = &'t dyn Fn(&Token) -> bool;

/// Template parser: the host tags (`if`, `for`, `macro`) plus a registry of
/// directives keyed by their tag.
pub struct Parser {
    lexer: Lexer,
    expr_parser: ExprParser,
    directives: HashMap<String, Box<dyn Directive>>,
}

impl Parser {
    /// A parser that knows the spreadsheet element directives.
    pub fn new() -> Parser {
        Parser::with_document_attributes(DocumentAttributes::new())
    }

    pub fn with_document_attributes(attributes: DocumentAttributes) -> Parser {
        let mut parser = Parser::host_only();
        for directive in element_directives(attributes) {
            parser.register(directive);
        }
        parser
    }

    /// A parser without any directives.
    pub fn host_only() -> Parser {
        Parser {
            lexer: Lexer::new(),
            expr_parser: ExprParser::new(),
            directives: HashMap::new(),
        }
    }

    /// Adds a directive, replacing any directive registered for the same tag.
    pub fn with_directive(mut self, directive: impl Directive + 'static) -> Parser {
        self.register(Box::new(directive));
        self
    }

    pub fn directive(&self, tag: &str) -> Option<&dyn Directive> {
        self.directives.get(tag).map(|directive| directive.as_ref())
    }

    pub fn parse(&self, filename: &str, source: &str) -> Result<Template, SyntaxError> {
        let body = self.parse_body(source).map_err(|err| err.with_filename(filename))?;
        let template = Template {
            filename: filename.to_string(),
            body,
        };
        Ok(template)
    }

    fn parse_body(&self, source: &str) -> Result<Node, SyntaxError> {
        let tokens = self.lexer.tokenize(source)?;
        let mut run = ParserRun::new(self, TokenStream::new(tokens));
        run.subparse(None, false)
    }

    fn register(&mut self, directive: Box<dyn Directive>) {
        let tag = directive.tag().to_string();
        if self.directives.insert(tag.clone(), directive).is_some() {
            tracing::debug!(tag = %tag, "directive replaced");
        }
    }
}

impl Default for Parser {
    fn default() -> Self {
        Parser::new()
    }
}

/// State of one parse: the token stream of a single template.
pub struct ParserRun<'a> {
    parser: &'a Parser,
    stream: TokenStream,
}

impl<'a> ParserRun<'a> {
    pub fn new(parser: &'a Parser, stream: TokenStream) -> ParserRun<'a> {
        ParserRun { parser, stream }
    }

    pub fn stream(&mut self) -> &mut TokenStream {
        &mut self.stream
    }

    pub fn parse_expression(&mut self) -> Result<Expr, SyntaxError> {
        let (expr, consumed) = self.parser.expr_parser.parse(self.stream.remaining())?;
        self.stream.skip(consumed);
        Ok(expr)
    }

    /// Parses nodes until a block whose tag token satisfies `test`, or until the
    /// end of the template when there is no test.
    ///
    /// The stream is left on the matching tag token, or just after it when
    /// `drop_needle` is set.
    pub fn subparse(&mut self, test: Option<SubparseTest<'_>>, drop_needle: bool) -> Result<Node, SyntaxError> {
        let line = self.stream.current().line;
        let mut nodes = Vec::new();

        loop {
            let token = self.stream.current().clone();
            match &token.kind {
                TokenKind::Eof => break,
                TokenKind::Text(value) => {
                    self.stream.next();
                    nodes.push(Node::Text(NodeText {
                        line: token.line,
                        value: value.clone(),
                    }));
                }
                TokenKind::VarStart => {
                    self.stream.next();
                    let expr = self.parse_expression()?;
                    self.stream.expect(TokenKind::VarEnd)?;
                    nodes.push(Node::Print(NodePrint { line: token.line, expr }));
                }
                TokenKind::BlockStart => {
                    self.stream.next();
                    let tag_token = self.stream.current().clone();
                    let TokenKind::Name(tag) = &tag_token.kind else {
                        return Err(SyntaxError::at("A block must start with a tag name.", tag_token.line));
                    };

                    if let Some(test) = test {
                        if test(&tag_token) {
                            if drop_needle {
                                self.stream.next();
                            }
                            return Ok(Node::List(NodeList { line, nodes }));
                        }
                    }

                    self.stream.next();
                    let node = self.parse_tag(tag, &tag_token)?;
                    nodes.push(node);
                }
                found => {
                    return Err(SyntaxError::at(format!("Unexpected token \"{}\".", found), token.line));
                }
            }
        }

        if test.is_some() {
            return Err(SyntaxError::at("Unexpected end of template.", self.stream.current().line));
        }

        Ok(Node::List(NodeList { line, nodes }))
    }

    fn parse_tag(&mut self, tag: &str, token: &Token) -> Result<Node, SyntaxError> {
        match tag {
            "if" => return self.parse_if(token),
            "for" => return self.parse_for(token),
            "macro" => return self.parse_macro(token),
            _ => {}
        }

        let parser = self.parser;
        let Some(directive) = parser.directive(tag) else {
            let message = if tag.starts_with("end") || tag == "else" {
                format!("Unexpected \"{}\" tag.", tag)
            } else {
                format!("Unknown \"{}\" tag.", tag)
            };
            return Err(SyntaxError::at(message, token.line));
        };

        tracing::trace!(tag, line = token.line, "parsing directive");
        directive.parse(token, self).map_err(|err| err.with_line(token.line))
    }

    // {% if condition %} ... [{% else %} ...] {% endif %}
    fn parse_if(&mut self, token: &Token) -> Result<Node, SyntaxError> {
        let condition = self.parse_expression()?;
        self.stream.expect(TokenKind::BlockEnd)?;

        let then_body = self.subparse(Some(&|t: &Token| t.test_name("else") || t.test_name("endif")), false)?;

        let mut else_body = None;
        if self.stream.test_name("else") {
            self.stream.next();
            self.stream.expect(TokenKind::BlockEnd)?;
            let body = self.subparse(Some(&|t: &Token| t.test_name("endif")), false)?;
            else_body = Some(Box::new(body));
        }

        self.stream.expect_keyword("endif")?;
        self.stream.expect(TokenKind::BlockEnd)?;

        Ok(Node::If(NodeIf {
            line: token.line,
            condition,
            then_body: Box::new(then_body),
            else_body,
        }))
    }

    // {% for binding in iterable %} ... {% endfor %}
    fn parse_for(&mut self, token: &Token) -> Result<Node, SyntaxError> {
        let binding = self.stream.expect_name()?;
        self.stream.expect_keyword("in")?;
        let iterable = self.parse_expression()?;
        self.stream.expect(TokenKind::BlockEnd)?;

        let body = self.subparse(Some(&|t: &Token| t.test_name("endfor")), true)?;
        self.stream.expect(TokenKind::BlockEnd)?;

        Ok(Node::For(NodeFor {
            line: token.line,
            binding,
            iterable,
            body: Box::new(body),
        }))
    }

    // {% macro name(arg, ...) %} ... {% endmacro %}
    fn parse_macro(&mut self, token: &Token) -> Result<Node, SyntaxError> {
        let name = self.stream.expect_name()?;

        self.stream.expect(TokenKind::LParen)?;
        let mut arguments = Vec::new();
        while !self.stream.test(&TokenKind::RParen) {
            if !arguments.is_empty() {
                self.stream.expect(TokenKind::Comma)?;
            }
            arguments.push(self.stream.expect_name()?);
        }
        self.stream.expect(TokenKind::RParen)?;
        self.stream.expect(TokenKind::BlockEnd)?;

        let body = self.subparse(Some(&|t: &Token| t.test_name("endmacro")), true)?;
        self.stream.expect(TokenKind::BlockEnd)?;

        Ok(Node::Macro(NodeMacro {
            line: token.line,
            name,
            arguments,
            body: Box::new(body),
        }))
    }
}
