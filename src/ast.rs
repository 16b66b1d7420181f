// Copyright (c) Chris Gunn.
// Licensed under the MIT license.

mod dump;

use std::fmt;

use hashlink::LinkedHashMap;

pub use dump::dump_template;

/// Expressions bound to a directive's parameters, in schema order.
pub type Parameters = LinkedHashMap<String, Expr>;

/// Attributes handed to the workbook directive by configuration.
pub type DocumentAttributes = LinkedHashMap<String, String>;

#[derive(Clone, Debug, PartialEq)]
pub struct Template {
    pub filename: String,
    pub body: Node,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    List(NodeList),
    Text(NodeText),
    Print(NodePrint),
    If(NodeIf),
    For(NodeFor),
    Macro(NodeMacro),
    DocumentRoot(NodeDocumentRoot),
    Element(NodeElement),
}

#[derive(Clone, Debug, PartialEq)]
pub struct NodeList {
    pub line: usize,
    pub nodes: Vec<Node>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NodeText {
    pub line: usize,
    pub value: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NodePrint {
    pub line: usize,
    pub expr: Expr,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NodeIf {
    pub line: usize,
    pub condition: Expr,
    pub then_body: Box<Node>,
    pub else_body: Option<Box<Node>>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NodeFor {
    pub line: usize,
    pub binding: String,
    pub iterable: Expr,
    pub body: Box<Node>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NodeMacro {
    pub line: usize,
    pub name: String,
    pub arguments: Vec<String>,
    pub body: Box<Node>,
}

/// Marks the start of the structured spreadsheet content of a template.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeDocumentRoot {
    pub line: usize,
    pub attributes: DocumentAttributes,
    pub workbook: Box<Node>,
}

/// A node created by one of the spreadsheet directives.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeElement {
    pub kind: ElementKind,
    pub line: usize,
    pub parameters: Parameters,
    pub body: Option<Box<Node>>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    List,
    Text,
    Print,
    If,
    For,
    Macro,
    DocumentRoot,
    Element(ElementKind),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Workbook,
    Sheet,
    Row,
    Cell,
    Header,
    Footer,
    Drawing,
    Left,
    Center,
    Right,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    String(ExprString),
    Integer(i64),
    // Numbers that don't fit in an i64 (e.g. floating point).
    Real(String),
    Bool(bool),
    Null,
    Name(String),
    Array(ExprArray),
    Attribute(ExprAttribute),
    Index(ExprIndex),
    Eq(ExprOpBinary),
    Ne(ExprOpBinary),
}

#[derive(Clone, Debug, PartialEq)]
pub struct ExprString {
    pub value: String,
}

/// Both `[a, b]` and `{k: v}` literals. Entries of the list form have no key.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExprArray {
    pub entries: Vec<ExprArrayEntry>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ExprArrayEntry {
    pub key: Option<Expr>,
    pub value: Expr,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ExprAttribute {
    pub object: Box<Expr>,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ExprIndex {
    pub object: Box<Expr>,
    pub index: Box<Expr>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ExprOpBinary {
    pub left: Box<Expr>,
    pub right: Box<Expr>,
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::List(_) => NodeKind::List,
            Node::Text(_) => NodeKind::Text,
            Node::Print(_) => NodeKind::Print,
            Node::If(_) => NodeKind::If,
            Node::For(_) => NodeKind::For,
            Node::Macro(_) => NodeKind::Macro,
            Node::DocumentRoot(_) => NodeKind::DocumentRoot,
            Node::Element(element) => NodeKind::Element(element.kind),
        }
    }

    pub fn line(&self) -> usize {
        match self {
            Node::List(NodeList { line, .. })
            | Node::Text(NodeText { line, .. })
            | Node::Print(NodePrint { line, .. })
            | Node::If(NodeIf { line, .. })
            | Node::For(NodeFor { line, .. })
            | Node::Macro(NodeMacro { line, .. })
            | Node::DocumentRoot(NodeDocumentRoot { line, .. })
            | Node::Element(NodeElement { line, .. }) => *line,
        }
    }

    /// Direct child nodes, in source order.
    pub fn children(&self) -> Vec<&Node> {
        match self {
            Node::List(list) => list.nodes.iter().collect(),
            Node::Text(_) | Node::Print(_) => Vec::new(),
            Node::If(node_if) => {
                let mut children = vec![node_if.then_body.as_ref()];
                if let Some(else_body) = &node_if.else_body {
                    children.push(else_body.as_ref());
                }
                children
            }
            Node::For(node_for) => vec![node_for.body.as_ref()],
            Node::Macro(node_macro) => vec![node_macro.body.as_ref()],
            Node::DocumentRoot(root) => vec![root.workbook.as_ref()],
            Node::Element(element) => element.body.iter().map(|body| body.as_ref()).collect(),
        }
    }
}

impl ElementKind {
    pub const ALL: [ElementKind; 10] = [
        ElementKind::Workbook,
        ElementKind::Sheet,
        ElementKind::Row,
        ElementKind::Cell,
        ElementKind::Header,
        ElementKind::Footer,
        ElementKind::Drawing,
        ElementKind::Left,
        ElementKind::Center,
        ElementKind::Right,
    ];

    /// The directive keyword that opens an element of this kind.
    pub fn tag(self) -> &'static str {
        match self {
            ElementKind::Workbook => "workbook",
            ElementKind::Sheet => "sheet",
            ElementKind::Row => "row",
            ElementKind::Cell => "cell",
            ElementKind::Header => "header",
            ElementKind::Footer => "footer",
            ElementKind::Drawing => "drawing",
            ElementKind::Left => "left",
            ElementKind::Center => "center",
            ElementKind::Right => "right",
        }
    }

    /// Element kinds that may be the nearest element ancestor of this kind.
    /// An element with no element ancestor at all is always accepted.
    pub fn allowed_parents(self) -> &'static [ElementKind] {
        use ElementKind::*;

        match self {
            Workbook => &[],
            Sheet => &[Workbook],
            Row => &[Sheet],
            Cell => &[Row],
            Header | Footer => &[Sheet],
            Left | Center | Right => &[Header, Footer],
            Drawing => &[Sheet, Left, Center, Right],
        }
    }
}

impl Expr {
    pub fn string(value: impl Into<String>) -> Expr {
        Expr::String(ExprString { value: value.into() })
    }

    pub fn empty_array() -> Expr {
        Expr::Array(ExprArray::default())
    }

    pub fn is_array_literal(&self) -> bool {
        matches!(self, Expr::Array(_))
    }
}

impl ExprArray {
    pub fn from_values(values: Vec<Expr>) -> ExprArray {
        let entries = values.into_iter().map(|value| ExprArrayEntry { key: None, value }).collect();
        ExprArray { entries }
    }

    pub fn from_pairs(pairs: Vec<(Expr, Expr)>) -> ExprArray {
        let entries = pairs
            .into_iter()
            .map(|(key, value)| ExprArrayEntry { key: Some(key), value })
            .collect();
        ExprArray { entries }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            NodeKind::List => f.write_str("list"),
            NodeKind::Text => f.write_str("text"),
            NodeKind::Print => f.write_str("print"),
            NodeKind::If => f.write_str("if"),
            NodeKind::For => f.write_str("for"),
            NodeKind::Macro => f.write_str("macro"),
            NodeKind::DocumentRoot => f.write_str("document-root"),
            NodeKind::Element(kind) => write!(f, "{}", kind),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expr::String(string) => write!(f, "{:?}", string.value),
            Expr::Integer(value) => write!(f, "{}", value),
            Expr::Real(value) => f.write_str(value),
            Expr::Bool(value) => write!(f, "{}", value),
            Expr::Null => f.write_str("null"),
            Expr::Name(name) => f.write_str(name),
            Expr::Array(array) => write!(f, "{}", array),
            Expr::Attribute(attr) => write!(f, "{}.{}", attr.object, attr.name),
            Expr::Index(index) => write!(f, "{}[{}]", index.object, index.index),
            Expr::Eq(op) => write!(f, "({} == {})", op.left, op.right),
            Expr::Ne(op) => write!(f, "({} != {})", op.left, op.right),
        }
    }
}

impl fmt::Display for ExprArray {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        // An empty literal, or one whose first entry has no key, prints in list form.
        let is_hash = matches!(self.entries.first(), Some(ExprArrayEntry { key: Some(_), .. }));
        f.write_str(if is_hash { "{" } else { "[" })?;
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            match &entry.key {
                Some(key) => write!(f, "{}: {}", key, entry.value)?,
                None => write!(f, "{}", entry.value)?,
            }
        }
        f.write_str(if is_hash { "}" } else { "]" })
    }
}
