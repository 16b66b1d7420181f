use super::*;

use crate::{
    ast::{ElementKind, Expr, ExprArray, NodeElement, NodeList, NodeText},
    parser::Parser,
};

// A body directive with all the defaults.
struct PlainDirective;

impl Directive for PlainDirective {
    fn tag(&self) -> &str {
        "plain"
    }

    fn create_node(&self, nodes: DirectiveNodes, line: usize) -> Node {
        element(ElementKind::Left, nodes, line)
    }
}

// `{% table [rows] name %}`
struct TableDirective;

impl Directive for TableDirective {
    fn tag(&self) -> &str {
        "table"
    }

    fn configure_parameters(&self, _token: &Token) -> ParameterSchema {
        ParameterSchema::new()
            .array("rows", Expr::empty_array())
            .required_value("name")
    }

    fn has_body(&self) -> bool {
        false
    }

    fn create_node(&self, nodes: DirectiveNodes, line: usize) -> Node {
        element(ElementKind::Cell, nodes, line)
    }
}

fn element(kind: ElementKind, nodes: DirectiveNodes, line: usize) -> Node {
    Node::Element(NodeElement {
        kind,
        line,
        parameters: nodes.parameters,
        body: nodes.body.map(Box::new),
    })
}

fn parse(source: &str) -> Result<Node, SyntaxError> {
    let parser = Parser::host_only()
        .with_directive(PlainDirective)
        .with_directive(TableDirective);
    let template = parser.parse("test.tpl", source)?;

    // The single node of the template.
    match template.body {
        Node::List(NodeList { mut nodes, .. }) if nodes.len() == 1 => Ok(nodes.remove(0)),
        body => panic!("unexpected body: {:?}", body),
    }
}

fn parse_element(source: &str) -> NodeElement {
    match parse(source).unwrap() {
        Node::Element(element) => element,
        node => panic!("not an element: {:?}", node),
    }
}

#[test]
fn default_directive_has_body_and_no_parameters() {
    let element = parse_element("{% plain %}hi{% endplain %}");

    assert!(element.parameters.is_empty());
    assert_eq!(element.line, 1);
    let body = element.body.unwrap();
    assert_eq!(
        *body,
        Node::List(NodeList {
            line: 1,
            nodes: vec![Node::Text(NodeText {
                line: 1,
                value: "hi".to_string(),
            })],
        })
    );
}

#[test]
fn default_directive_rejects_expressions() {
    let err = parse("{% plain 1 %}{% endplain %}").unwrap_err();
    assert_eq!(err.message, "Too many parameters");
    assert_eq!(err.line, Some(1));
}

#[test]
fn missing_required_parameter() {
    let err = parse("\n{% table %}").unwrap_err();
    assert_eq!(err.to_string(), "test.tpl:2: A required parameter is missing");
}

#[test]
fn scalar_only() {
    let element = parse_element("{% table \"title\" %}");

    assert_eq!(element.parameters.get("rows"), Some(&Expr::empty_array()));
    assert_eq!(element.parameters.get("name"), Some(&Expr::string("title")));
    assert_eq!(element.body, None);
}

#[test]
fn array_then_scalar() {
    let element = parse_element("{% table [1, 2] \"title\" %}");

    let rows = Expr::Array(ExprArray::from_values(vec![Expr::Integer(1), Expr::Integer(2)]));
    assert_eq!(element.parameters.get("rows"), Some(&rows));
    assert_eq!(element.parameters.get("name"), Some(&Expr::string("title")));
}

#[test]
fn extra_expression() {
    let err = parse("{% table [1, 2] \"title\" \"extra\" %}").unwrap_err();
    assert_eq!(err.message, "Too many parameters");
}

#[test]
fn missing_end_tag() {
    let err = parse("{% plain %}\nhi\n").unwrap_err();
    assert_eq!(err.message, "Unexpected end of template.");
}

#[test]
fn nested_error_keeps_its_line() {
    let err = parse("{% plain %}\n\n{% bogus %}{% endplain %}").unwrap_err();
    assert_eq!(err.to_string(), "test.tpl:3: Unknown \"bogus\" tag.");
}
