// Copyright (c) Chris Gunn.
// Licensed under the MIT license.

#[cfg(test)]
mod tests;

use crate::{
    ast::{Node, Parameters},
    error::SyntaxError,
    parameters::{bind_parameters, ParameterSchema},
    parser::{lexer::Token, lexer::TokenKind, ParserRun},
};

/// What a directive's parser collected: its bound parameters and, for
/// directives with a body, the nodes up to the matching end tag.
#[derive(Clone, Debug, PartialEq)]
pub struct DirectiveNodes {
    pub parameters: Parameters,
    pub body: Option<Node>,
}

/// A custom template keyword, parsed into a single AST node.
///
/// Implementors describe their parameters and whether they have a body. The
/// provided [`Directive::parse`] drives the token stream and hands the result
/// to [`Directive::create_node`].
pub trait Directive {
    /// The keyword that opens the directive. Its end tag is `"end" + tag`.
    fn tag(&self) -> &str;

    fn configure_parameters(&self, _token: &Token) -> ParameterSchema {
        ParameterSchema::new()
    }

    fn has_body(&self) -> bool {
        true
    }

    fn create_node(&self, nodes: DirectiveNodes, line: usize) -> Node;

    /// Parses the directive, starting right after its keyword token.
    fn parse(&self, token: &Token, run: &mut ParserRun<'_>) -> Result<Node, SyntaxError> {
        let schema = self.configure_parameters(token);
        let parameters = parse_parameters(run, &schema)?;

        let body = if self.has_body() {
            Some(parse_body(self.tag(), run)?)
        } else {
            None
        };

        let nodes = DirectiveNodes { parameters, body };
        Ok(self.create_node(nodes, token.line))
    }
}

fn parse_parameters(run: &mut ParserRun<'_>, schema: &ParameterSchema) -> Result<Parameters, SyntaxError> {
    // Parse expressions.
    let mut expressions = Vec::new();
    while !run.stream().test(&TokenKind::BlockEnd) {
        let expr = run.parse_expression()?;
        expressions.push(expr);
    }

    // End of expressions.
    run.stream().expect(TokenKind::BlockEnd)?;

    bind_parameters(schema, expressions)
}

fn parse_body(tag: &str, run: &mut ParserRun<'_>) -> Result<Node, SyntaxError> {
    // Parse until the matching end tag is found.
    let end_tag = format!("end{}", tag);
    let body = run.subparse(Some(&|token: &Token| token.test_name(&end_tag)), true)?;
    run.stream().expect(TokenKind::BlockEnd)?;
    Ok(body)
}
