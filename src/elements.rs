// Copyright (c) Chris Gunn.
// Licensed under the MIT license.

// Directives for the spreadsheet elements.

use crate::{
    ast::{DocumentAttributes, ElementKind, Expr, Node, NodeDocumentRoot, NodeElement},
    directive::{Directive, DirectiveNodes},
    parameters::ParameterSchema,
    parser::lexer::Token,
};

/// All element directives, with the given workbook attributes.
pub fn element_directives(attributes: DocumentAttributes) -> Vec<Box<dyn Directive>> {
    vec![
        Box::new(WorkbookDirective { attributes }),
        Box::new(SheetDirective),
        Box::new(RowDirective),
        Box::new(CellDirective),
        Box::new(HeaderFooterDirective(ElementKind::Header)),
        Box::new(HeaderFooterDirective(ElementKind::Footer)),
        Box::new(DrawingDirective),
        Box::new(AlignmentDirective(ElementKind::Left)),
        Box::new(AlignmentDirective(ElementKind::Center)),
        Box::new(AlignmentDirective(ElementKind::Right)),
    ]
}

fn element_node(kind: ElementKind, nodes: DirectiveNodes, line: usize) -> Node {
    Node::Element(NodeElement {
        kind,
        line,
        parameters: nodes.parameters,
        body: nodes.body.map(Box::new),
    })
}

/// `{% workbook [properties] %}`, the outermost element. The node it creates
/// is wrapped in a document root that also carries the configured attributes.
pub struct WorkbookDirective {
    pub attributes: DocumentAttributes,
}

impl Directive for WorkbookDirective {
    fn tag(&self) -> &str {
        ElementKind::Workbook.tag()
    }

    fn configure_parameters(&self, _token: &Token) -> ParameterSchema {
        ParameterSchema::new().array("properties", Expr::empty_array())
    }

    fn create_node(&self, nodes: DirectiveNodes, line: usize) -> Node {
        let workbook = element_node(ElementKind::Workbook, nodes, line);
        Node::DocumentRoot(NodeDocumentRoot {
            line,
            attributes: self.attributes.clone(),
            workbook: Box::new(workbook),
        })
    }
}

/// `{% sheet index [properties] %}`
pub struct SheetDirective;

impl Directive for SheetDirective {
    fn tag(&self) -> &str {
        ElementKind::Sheet.tag()
    }

    fn configure_parameters(&self, _token: &Token) -> ParameterSchema {
        ParameterSchema::new()
            .required_value("index")
            .array("properties", Expr::empty_array())
    }

    fn create_node(&self, nodes: DirectiveNodes, line: usize) -> Node {
        element_node(ElementKind::Sheet, nodes, line)
    }
}

/// `{% row [index] %}`
pub struct RowDirective;

impl Directive for RowDirective {
    fn tag(&self) -> &str {
        ElementKind::Row.tag()
    }

    fn configure_parameters(&self, _token: &Token) -> ParameterSchema {
        ParameterSchema::new().value("index", Expr::Null)
    }

    fn create_node(&self, nodes: DirectiveNodes, line: usize) -> Node {
        element_node(ElementKind::Row, nodes, line)
    }
}

/// `{% cell [index] [properties] %}`
pub struct CellDirective;

impl Directive for CellDirective {
    fn tag(&self) -> &str {
        ElementKind::Cell.tag()
    }

    fn configure_parameters(&self, _token: &Token) -> ParameterSchema {
        ParameterSchema::new()
            .value("index", Expr::Null)
            .array("properties", Expr::empty_array())
    }

    fn create_node(&self, nodes: DirectiveNodes, line: usize) -> Node {
        element_node(ElementKind::Cell, nodes, line)
    }
}

/// `{% header [type] [properties] %}` and `{% footer ... %}`
pub struct HeaderFooterDirective(pub ElementKind);

impl Directive for HeaderFooterDirective {
    fn tag(&self) -> &str {
        self.0.tag()
    }

    fn configure_parameters(&self, _token: &Token) -> ParameterSchema {
        ParameterSchema::new()
            .value("type", Expr::Null)
            .array("properties", Expr::empty_array())
    }

    fn create_node(&self, nodes: DirectiveNodes, line: usize) -> Node {
        element_node(self.0, nodes, line)
    }
}

/// `{% drawing path [properties] %}`. Has no body and no end tag.
pub struct DrawingDirective;

impl Directive for DrawingDirective {
    fn tag(&self) -> &str {
        ElementKind::Drawing.tag()
    }

    fn configure_parameters(&self, _token: &Token) -> ParameterSchema {
        ParameterSchema::new()
            .required_value("path")
            .array("properties", Expr::empty_array())
    }

    fn has_body(&self) -> bool {
        false
    }

    fn create_node(&self, nodes: DirectiveNodes, line: usize) -> Node {
        element_node(ElementKind::Drawing, nodes, line)
    }
}

/// `{% left %}`, `{% center %}` and `{% right %}` inside headers and footers.
pub struct AlignmentDirective(pub ElementKind);

impl Directive for AlignmentDirective {
    fn tag(&self) -> &str {
        self.0.tag()
    }

    fn create_node(&self, nodes: DirectiveNodes, line: usize) -> Node {
        element_node(self.0, nodes, line)
    }
}
