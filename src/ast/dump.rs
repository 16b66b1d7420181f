// Copyright (c) Chris Gunn.
// Licensed under the MIT license.

// Indented, one-node-per-line rendering of a template's AST.

use std::fmt::Write;

use super::{Node, Template};

pub fn dump_template(template: &Template) -> String {
    let mut string = String::new();
    dump_node(&mut string, &template.body, 0);
    string
}

fn dump_node(string: &mut String, node: &Node, depth: usize) {
    for _ in 0..depth {
        string.push_str("  ");
    }

    // Writing into a String can't fail.
    let _ = write!(string, "{} @{}", node.kind(), node.line());

    match node {
        Node::List(_) => {}
        Node::Text(text) => {
            let _ = write!(string, " {:?}", text.value);
        }
        Node::Print(print) => {
            let _ = write!(string, " {}", print.expr);
        }
        Node::If(node_if) => {
            let _ = write!(string, " {}", node_if.condition);
        }
        Node::For(node_for) => {
            let _ = write!(string, " {} in {}", node_for.binding, node_for.iterable);
        }
        Node::Macro(node_macro) => {
            let _ = write!(string, " {}({})", node_macro.name, node_macro.arguments.join(", "));
        }
        Node::DocumentRoot(root) => {
            for (key, value) in &root.attributes {
                let _ = write!(string, " {}={:?}", key, value);
            }
        }
        Node::Element(element) => {
            for (name, value) in &element.parameters {
                let _ = write!(string, " {}={}", name, value);
            }
        }
    }

    string.push('\n');

    for child in node.children() {
        dump_node(string, child, depth + 1);
    }
}
