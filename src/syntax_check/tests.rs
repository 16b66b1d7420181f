use super::*;

use crate::ast::{DocumentAttributes, Expr, NodeDocumentRoot, NodeList, NodePrint, NodeText, Parameters};

fn element(kind: ElementKind, line: usize, body: Vec<Node>) -> Node {
    Node::Element(NodeElement {
        kind,
        line,
        parameters: Parameters::new(),
        body: Some(Box::new(list(line, body))),
    })
}

fn list(line: usize, nodes: Vec<Node>) -> Node {
    Node::List(NodeList { line, nodes })
}

fn text(line: usize) -> Node {
    Node::Text(NodeText {
        line,
        value: "x".to_string(),
    })
}

fn root(line: usize) -> Node {
    Node::DocumentRoot(NodeDocumentRoot {
        line,
        attributes: DocumentAttributes::new(),
        workbook: Box::new(element(ElementKind::Workbook, line, Vec::new())),
    })
}

fn print(line: usize) -> Node {
    Node::Print(NodePrint { line, expr: Expr::Null })
}

#[test]
fn cell_inside_row() {
    let tree = element(
        ElementKind::Sheet,
        1,
        vec![element(ElementKind::Row, 2, vec![element(ElementKind::Cell, 3, Vec::new())])],
    );
    SyntaxCheck::new().check(&tree).unwrap();
}

#[test]
fn row_needs_sheet_parent() {
    let tree = element(ElementKind::Workbook, 1, vec![element(ElementKind::Row, 2, Vec::new())]);

    let err = SyntaxCheck::new().check(&tree).unwrap_err();
    assert_eq!(err.message, "Node \"row\" is not allowed inside of Node \"workbook\".");
    assert_eq!(err.line, Some(2));
}

#[test]
fn no_element_ancestor_is_accepted() {
    // A cell at the top level, as inside a macro body.
    let tree = list(1, vec![element(ElementKind::Cell, 1, Vec::new())]);
    SyntaxCheck::new().check(&tree).unwrap();
}

#[test]
fn host_nodes_are_skipped() {
    let for_node = Node::For(crate::ast::NodeFor {
        line: 2,
        binding: "item".to_string(),
        iterable: Expr::Name("items".to_string()),
        body: Box::new(list(3, vec![element(ElementKind::Cell, 3, Vec::new())])),
    });
    let tree = element(ElementKind::Row, 1, vec![for_node]);
    SyntaxCheck::new().check(&tree).unwrap();
}

#[test]
fn text_after_document_root() {
    let tree = list(1, vec![root(1), text(3)]);

    let err = SyntaxCheck::new().check(&tree).unwrap_err();
    assert_eq!(err.message, "Node \"text\" is not allowed after Node \"document-root\".");
    assert_eq!(err.line, Some(3));
}

#[test]
fn text_before_document_root() {
    let tree = list(1, vec![text(1), root(2)]);

    let err = SyntaxCheck::new().check(&tree).unwrap_err();
    assert_eq!(err.message, "Node \"text\" is not allowed before Node \"document-root\".");
    assert_eq!(err.line, Some(2));
}

#[test]
fn text_before_document_root_with_other_node_between() {
    let tree = list(1, vec![text(1), print(2), root(3)]);

    let err = SyntaxCheck::new().check(&tree).unwrap_err();
    assert_eq!(err.line, Some(3));
}

#[test]
fn same_kind_siblings_are_fine() {
    SyntaxCheck::new().check(&list(1, vec![text(1), text(2)])).unwrap();
    SyntaxCheck::new().check(&list(1, vec![root(1), root(2)])).unwrap();
}

#[test]
fn path_unwinds_after_success() {
    let tree = element(ElementKind::Sheet, 1, vec![element(ElementKind::Row, 2, Vec::new())]);

    let mut syntax_check = SyntaxCheck::new();
    assert!(syntax_check.path().is_empty());
    syntax_check.check(&tree).unwrap();
    assert!(syntax_check.path().is_empty());

    // Checking again gives the same result.
    syntax_check.check(&tree).unwrap();
    assert!(syntax_check.path().is_empty());
}

#[test]
fn path_cleared_after_error() {
    let tree = element(
        ElementKind::Workbook,
        1,
        vec![element(ElementKind::Sheet, 2, vec![element(ElementKind::Cell, 3, Vec::new())])],
    );

    let mut syntax_check = SyntaxCheck::new();
    syntax_check.check(&tree).unwrap_err();
    assert!(syntax_check.path().is_empty());
}

#[test]
fn nearest_element_skips_host_kinds() {
    let mut path = AstPath::new();
    assert_eq!(path.nearest_element(), None);

    path.push(NodeKind::Element(ElementKind::Sheet));
    path.push(NodeKind::List);
    path.push(NodeKind::If);
    assert_eq!(path.nearest_element(), Some(ElementKind::Sheet));
    assert_eq!(path.len(), 3);

    path.clear();
    assert!(path.is_empty());
}

#[test]
fn allowed_parents_table() {
    use ElementKind::*;

    assert!(Workbook.allowed_parents().is_empty());
    assert_eq!(Sheet.allowed_parents(), [Workbook]);
    assert_eq!(Cell.allowed_parents(), [Row]);
    assert_eq!(Footer.allowed_parents(), [Sheet]);
    assert_eq!(Right.allowed_parents(), [Header, Footer]);
    assert_eq!(Drawing.allowed_parents(), [Sheet, Left, Center, Right]);

    // Every kind but the workbook has a parent to live in.
    for kind in ElementKind::ALL {
        assert_eq!(kind.allowed_parents().is_empty(), kind == Workbook, "{}", kind);
    }
}

#[test]
fn check_template_adds_filename() {
    let template = Template {
        filename: "report.tpl".to_string(),
        body: list(1, vec![text(1), root(2)]),
    };

    let err = check_template(template).unwrap_err();
    assert_eq!(
        err.to_string(),
        "report.tpl:2: Node \"text\" is not allowed before Node \"document-root\"."
    );
}
