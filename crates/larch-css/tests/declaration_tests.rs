//! Integration tests for standalone declaration and value parsing.

use larch_css::{parse_declaration, parse_value, Node, NodeKind};

fn value_kinds(text: &str) -> Vec<NodeKind> {
    let tree = parse_value(text);
    assert_eq!(tree.root().kind(), NodeKind::Value);
    tree.root().children().map(|child| child.kind()).collect()
}

#[test]
fn test_simple_declaration() {
    let tree = parse_declaration("color: red");
    let declaration = tree.root();
    assert_eq!(declaration.kind(), NodeKind::Declaration);
    assert_eq!(declaration.name(), Some("color"));
    assert_eq!(declaration.value(), Some("red"));
    assert!(!declaration.important());
}

#[test]
fn test_declaration_with_important() {
    let tree = parse_declaration("margin: 0 auto !important");
    let declaration = tree.root();
    assert!(declaration.important());
    // The value range excludes the annotation.
    assert_eq!(declaration.value(), Some("0 auto"));
}

#[test]
fn test_important_with_odd_spacing_and_case() {
    let tree = parse_declaration("color: red ! IMPORTANT");
    let declaration = tree.root();
    assert!(declaration.important());
    assert_eq!(declaration.value(), Some("red"));
}

#[test]
fn test_important_followed_by_more_value_does_not_count() {
    let tree = parse_declaration("content: '!' important url(x)");
    let declaration = tree.root();
    assert!(!declaration.important());
}

#[test]
fn test_missing_colon_yields_no_declaration() {
    let tree = parse_declaration("color red");
    assert_eq!(tree.root().kind(), NodeKind::Stylesheet);
    assert!(tree.root().is_empty());
}

#[test]
fn test_value_stops_at_unbalanced_semicolon_only() {
    // A `;` inside parentheses does not end the value.
    let tree = parse_declaration("background: url(data:image/png;base64,x) no-repeat; rest");
    let declaration = tree.root();
    assert_eq!(
        declaration.value(),
        Some("url(data:image/png;base64,x) no-repeat")
    );
}

#[test]
fn test_value_ends_at_open_brace() {
    let tree = parse_declaration("width: 10px { junk }");
    let declaration = tree.root();
    assert_eq!(declaration.value(), Some("10px"));
}

#[test]
fn test_value_components() {
    assert_eq!(
        value_kinds("1px solid #ccc"),
        vec![
            NodeKind::Dimension,
            NodeKind::Whitespace,
            NodeKind::Identifier,
            NodeKind::Whitespace,
            NodeKind::HexColor
        ]
    );
}

#[test]
fn test_value_operators_and_percentages() {
    assert_eq!(
        value_kinds("50% / 2, -3"),
        vec![
            NodeKind::Percentage,
            NodeKind::Whitespace,
            NodeKind::Operator,
            NodeKind::Whitespace,
            NodeKind::Number,
            NodeKind::Operator,
            NodeKind::Whitespace,
            NodeKind::Number
        ]
    );
}

#[test]
fn test_value_function_nests_components() {
    let tree = parse_value("calc(100% - 2px)");
    let function = tree.root().first_child().expect("function");
    assert_eq!(function.kind(), NodeKind::Function);
    assert_eq!(function.name(), Some("calc"));
    assert_eq!(function.text(), "calc(100% - 2px)");
    let kinds: Vec<NodeKind> = function.children().map(|child| child.kind()).collect();
    assert_eq!(
        kinds,
        vec![
            NodeKind::Percentage,
            NodeKind::Whitespace,
            NodeKind::Operator,
            NodeKind::Whitespace,
            NodeKind::Dimension
        ]
    );
}

#[test]
fn test_value_url_node_exposes_address() {
    let tree = parse_value("url( image.png )");
    let url = tree.root().first_child().expect("url node");
    assert_eq!(url.kind(), NodeKind::Url);
    assert_eq!(url.value(), Some("image.png"));
}

#[test]
fn test_value_hex_color_name() {
    let tree = parse_value("#a0b1c2");
    let color = tree.root().first_child().expect("hex color");
    assert_eq!(color.kind(), NodeKind::HexColor);
    assert_eq!(color.name(), Some("a0b1c2"));
}

#[test]
fn test_value_parentheses_and_brackets() {
    assert_eq!(
        value_kinds("(a) [b]"),
        vec![
            NodeKind::Parentheses,
            NodeKind::Whitespace,
            NodeKind::Brackets
        ]
    );
}

#[test]
fn test_value_string_and_bad_string_are_opaque() {
    assert_eq!(value_kinds("\"ok\""), vec![NodeKind::String]);
    // A bad string is kept as an opaque String node.
    assert_eq!(value_kinds("'broken\nrest'"), vec![NodeKind::String]);
}

#[test]
fn test_unterminated_function_spans_to_end() {
    let tree = parse_value("linear-gradient(red, blue");
    let function = tree.root().first_child().expect("function");
    assert_eq!(function.kind(), NodeKind::Function);
    assert_eq!(function.end(), "linear-gradient(red, blue".len());
    let kinds: Vec<NodeKind> = function.children().map(|child| child.kind()).collect();
    assert_eq!(
        kinds,
        vec![
            NodeKind::Identifier,
            NodeKind::Operator,
            NodeKind::Whitespace,
            NodeKind::Identifier
        ]
    );
}

#[test]
fn test_declaration_trims_trailing_whitespace_from_value() {
    let tree = parse_declaration("color: red   ");
    assert_eq!(tree.root().value(), Some("red"));
}

#[test]
fn test_empty_value() {
    let tree = parse_declaration("color:");
    let declaration = tree.root();
    assert_eq!(declaration.kind(), NodeKind::Declaration);
    assert_eq!(declaration.value(), None);
    assert!(declaration.is_empty());
    // The span still covers the name and the colon.
    assert_eq!(declaration.text(), "color:");
}

#[test]
fn test_whitespace_preserved_between_significant_tokens_only() {
    let tree = parse_value("  a  b  ");
    let kinds: Vec<NodeKind> = tree.root().children().map(|child| child.kind()).collect();
    assert_eq!(
        kinds,
        vec![
            NodeKind::Identifier,
            NodeKind::Whitespace,
            NodeKind::Identifier
        ]
    );
    let ws = tree.root().children().nth(1).unwrap();
    assert_eq!(ws.text(), "  ");
}

fn collect_kinds(node: Node<'_>) -> Vec<NodeKind> {
    node.children().map(|child| child.kind()).collect()
}

#[test]
fn test_nested_function_in_function() {
    let tree = parse_value("max(min(1px, 2px), 3px)");
    let outer = tree.root().first_child().expect("outer function");
    assert_eq!(outer.name(), Some("max"));
    let kinds = collect_kinds(outer);
    assert_eq!(
        kinds,
        vec![
            NodeKind::Function,
            NodeKind::Operator,
            NodeKind::Whitespace,
            NodeKind::Dimension
        ]
    );
    let inner = outer.first_child().unwrap();
    assert_eq!(inner.name(), Some("min"));
    assert_eq!(inner.text(), "min(1px, 2px)");
}
