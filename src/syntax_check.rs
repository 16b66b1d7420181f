// Copyright (c) Chris Gunn.
// Licensed under the MIT license.

#[cfg(test)]
mod tests;

use crate::{
    ast::{ElementKind, Node, NodeElement, NodeKind, Template},
    error::SyntaxError,
};

/// Kinds of the nodes currently open during a walk, outermost first.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AstPath {
    kinds: Vec<NodeKind>,
}

impl AstPath {
    pub fn new() -> AstPath {
        AstPath::default()
    }

    pub fn push(&mut self, kind: NodeKind) {
        self.kinds.push(kind);
    }

    pub fn pop(&mut self) -> Option<NodeKind> {
        self.kinds.pop()
    }

    pub fn clear(&mut self) {
        self.kinds.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    /// The innermost open element, skipping host nodes.
    pub fn nearest_element(&self) -> Option<ElementKind> {
        self.kinds.iter().rev().find_map(|kind| match kind {
            NodeKind::Element(element) => Some(*element),
            _ => None,
        })
    }
}

/// Checks where element nodes sit in a parsed template.
///
/// Elements must be nested inside one of their allowed parent elements, unless
/// there is no element around them at all (a macro body, for instance). Text
/// and a document root may never be siblings.
#[derive(Debug, Default)]
pub struct SyntaxCheck {
    path: AstPath,
}

impl SyntaxCheck {
    pub fn new() -> SyntaxCheck {
        SyntaxCheck::default()
    }

    pub fn path(&self) -> &AstPath {
        &self.path
    }

    /// Walks `node` and everything below it.
    ///
    /// After an error the path is cleared rather than unwound; it only means
    /// something again once the next check starts.
    pub fn check(&mut self, node: &Node) -> Result<(), SyntaxError> {
        self.enter(node)?;
        for child in node.children() {
            self.check(child)?;
        }
        self.leave(node);
        Ok(())
    }

    fn enter(&mut self, node: &Node) -> Result<(), SyntaxError> {
        let res = match node {
            Node::Element(element) => self.check_allowed_parents(element),
            _ => check_allowed_children(node),
        };

        if let Err(err) = res {
            // Leave isn't called after an error.
            self.path.clear();
            return Err(err);
        }

        tracing::trace!(kind = %node.kind(), depth = self.path.len(), "enter");
        self.path.push(node.kind());
        Ok(())
    }

    fn leave(&mut self, node: &Node) {
        tracing::trace!(kind = %node.kind(), "leave");
        self.path.pop();
    }

    fn check_allowed_parents(&self, element: &NodeElement) -> Result<(), SyntaxError> {
        // No element parent (e.g. macros).
        let Some(parent) = self.path.nearest_element() else {
            return Ok(());
        };

        if element.kind.allowed_parents().contains(&parent) {
            return Ok(());
        }

        let message = format!(
            "Node \"{}\" is not allowed inside of Node \"{}\".",
            element.kind, parent
        );
        Err(SyntaxError::at(message, element.line))
    }
}

fn check_allowed_children(node: &Node) -> Result<(), SyntaxError> {
    let mut has_document_root = false;
    let mut has_text = false;

    for child in node.children() {
        match child {
            Node::Text(text) => {
                if has_document_root {
                    let message = format!(
                        "Node \"{}\" is not allowed after Node \"{}\".",
                        NodeKind::Text,
                        NodeKind::DocumentRoot
                    );
                    return Err(SyntaxError::at(message, text.line));
                }
                has_text = true;
            }
            Node::DocumentRoot(root) => {
                // Reported as misplaced text as well.
                if has_text {
                    let message = format!(
                        "Node \"{}\" is not allowed before Node \"{}\".",
                        NodeKind::Text,
                        NodeKind::DocumentRoot
                    );
                    return Err(SyntaxError::at(message, root.line));
                }
                has_document_root = true;
            }
            _ => {}
        }
    }

    Ok(())
}

/// Checks a whole template, handing it back unchanged when it is valid.
pub fn check_template(template: Template) -> Result<Template, SyntaxError> {
    let mut syntax_check = SyntaxCheck::new();
    syntax_check
        .check(&template.body)
        .map_err(|err| err.with_filename(&template.filename))?;
    Ok(template)
}
