//! Integration tests for the stylesheet parser: rule shapes, nesting,
//! at-rule classification, and recovery on malformed input.

use larch_css::{parse, walk, Node, NodeKind, ParseOptions, Visit};

fn child_kinds(node: Node<'_>) -> Vec<NodeKind> {
    node.children().map(|child| child.kind()).collect()
}

fn nth_child<'a>(node: Node<'a>, index: usize) -> Node<'a> {
    node.children().nth(index).expect("child must exist")
}

#[test]
fn test_empty_input_yields_an_empty_stylesheet() {
    let options = ParseOptions::default();
    let tree = parse("", &options);
    let root = tree.root();
    assert_eq!(root.kind(), NodeKind::Stylesheet);
    assert!(root.is_empty());

    let mut visited = Vec::new();
    let _ = walk(root, &mut |node, _| {
        visited.push(node.kind());
        Visit::Continue
    });
    assert_eq!(visited, vec![NodeKind::Stylesheet]);
}

#[test]
fn test_simple_style_rule_shape() {
    let source = "body { color: red; }";
    let options = ParseOptions::default();
    let tree = parse(source, &options);
    let root = tree.root();

    let rule = root.first_child().expect("one rule");
    assert_eq!(rule.kind(), NodeKind::StyleRule);
    assert_eq!(rule.text(), source);
    assert!(rule.has_block());

    let selectors = rule.first_child().expect("selector list");
    assert_eq!(selectors.kind(), NodeKind::SelectorList);
    assert_eq!(selectors.text(), "body");

    let block = selectors.next_sibling().expect("block");
    assert_eq!(block.kind(), NodeKind::Block);
    // The block's span excludes the closing brace.
    assert_eq!(block.text(), "{ color: red; ");

    let declaration = block.first_child().expect("declaration");
    assert_eq!(declaration.kind(), NodeKind::Declaration);
    assert_eq!(declaration.name(), Some("color"));
    assert_eq!(declaration.value(), Some("red"));

    let value = declaration.first_child().expect("value");
    assert_eq!(value.kind(), NodeKind::Value);
    assert_eq!(child_kinds(value), vec![NodeKind::Identifier]);
    assert_eq!(value.first_child().unwrap().text(), "red");
}

#[test]
fn test_media_at_rule_shape() {
    let source = "@media (min-width: 768px) { body { color: red; } }";
    let options = ParseOptions::default();
    let tree = parse(source, &options);

    let at_rule = tree.root().first_child().expect("at-rule");
    assert_eq!(at_rule.kind(), NodeKind::AtRule);
    assert_eq!(at_rule.name(), Some("media"));
    assert_eq!(at_rule.value(), Some("(min-width: 768px)"));
    assert_eq!(
        child_kinds(at_rule),
        vec![NodeKind::AtRulePrelude, NodeKind::Block]
    );

    let prelude = at_rule.first_child().unwrap();
    assert_eq!(prelude.text(), "(min-width: 768px)");
    let feature = prelude.first_child().expect("feature query");
    assert_eq!(feature.kind(), NodeKind::Parentheses);
    assert_eq!(
        child_kinds(feature),
        vec![NodeKind::Identifier, NodeKind::Operator, NodeKind::Dimension]
    );

    let block = nth_child(at_rule, 1);
    let inner = block.first_child().expect("nested style rule");
    assert_eq!(inner.kind(), NodeKind::StyleRule);
    let inner_decl = nth_child(inner, 1).first_child().expect("declaration");
    assert_eq!(inner_decl.name(), Some("color"));
}

#[test]
fn test_css_nesting_three_levels_deep() {
    let source = ".a { .b { .c { color: red; } } }";
    let options = ParseOptions::default();
    let tree = parse(source, &options);

    let outer = tree.root().first_child().expect("outer rule");
    assert_eq!(outer.kind(), NodeKind::StyleRule);
    let middle = nth_child(outer, 1).first_child().expect("middle rule");
    assert_eq!(middle.kind(), NodeKind::StyleRule);
    assert_eq!(middle.first_child().unwrap().kind(), NodeKind::SelectorList);
    let inner = nth_child(middle, 1).first_child().expect("inner rule");
    assert_eq!(inner.kind(), NodeKind::StyleRule);

    let declaration = nth_child(inner, 1).first_child().expect("declaration");
    assert_eq!(declaration.kind(), NodeKind::Declaration);
    assert_eq!(declaration.name(), Some("color"));
}

#[test]
fn test_unterminated_block_spans_to_eof() {
    let source = "body { color: red";
    let options = ParseOptions::default();
    let tree = parse(source, &options);

    let rule = tree.root().first_child().expect("rule");
    assert_eq!(rule.end(), source.len());
    let block = nth_child(rule, 1);
    assert_eq!(block.kind(), NodeKind::Block);
    assert_eq!(block.end(), source.len());

    let declaration = block.first_child().expect("declaration");
    assert_eq!(declaration.name(), Some("color"));
    assert_eq!(declaration.value(), Some("red"));
}

#[test]
fn test_important_flag() {
    let source = ".override { color: red !important; }";
    let options = ParseOptions::default();
    let tree = parse(source, &options);

    let rule = tree.root().first_child().expect("rule");
    let declaration = nth_child(rule, 1).first_child().expect("declaration");
    assert!(declaration.important());
    assert_eq!(declaration.name(), Some("color"));
    assert_eq!(declaration.value(), Some("red"));
}

#[test]
fn test_statement_at_rule_includes_semicolon() {
    let source = "@import url(\"a.css\") screen;\nbody { margin: 0; }";
    let options = ParseOptions::default();
    let tree = parse(source, &options);
    let root = tree.root();

    let import = root.first_child().expect("import");
    assert_eq!(import.kind(), NodeKind::AtRule);
    assert_eq!(import.name(), Some("import"));
    assert!(!import.has_block());
    assert_eq!(import.text(), "@import url(\"a.css\") screen;");

    let body = import.next_sibling().expect("style rule after import");
    assert_eq!(body.kind(), NodeKind::StyleRule);
}

#[test]
fn test_unknown_at_rule_keeps_raw_prelude_and_parses_rules() {
    let source = "@-custom-thing one two { a { color: red; } }";
    let options = ParseOptions::default();
    let tree = parse(source, &options);

    let at_rule = tree.root().first_child().expect("at-rule");
    assert_eq!(at_rule.name(), Some("-custom-thing"));
    // Unknown names produce no prelude nodes; the raw text stays
    // reachable through the value range.
    assert_eq!(at_rule.value(), Some("one two"));
    assert_eq!(child_kinds(at_rule), vec![NodeKind::Block]);

    let block = at_rule.first_child().unwrap();
    assert_eq!(block.first_child().unwrap().kind(), NodeKind::StyleRule);
}

#[test]
fn test_font_face_block_parses_declarations_only() {
    let source = "@font-face { font-family: Mono; src: url(mono.woff2); }";
    let options = ParseOptions::default();
    let tree = parse(source, &options);

    let at_rule = tree.root().first_child().expect("at-rule");
    let block = at_rule.first_child().expect("block");
    assert_eq!(block.kind(), NodeKind::Block);
    assert_eq!(
        child_kinds(block),
        vec![NodeKind::Declaration, NodeKind::Declaration]
    );
    assert_eq!(block.first_child().unwrap().name(), Some("font-family"));
}

#[test]
fn test_keyframes_percentage_selectors() {
    let source = "@keyframes spin { from { opacity: 0; } 50% { opacity: 1; } }";
    let options = ParseOptions::default();
    let tree = parse(source, &options);

    let at_rule = tree.root().first_child().expect("at-rule");
    assert_eq!(at_rule.name(), Some("keyframes"));
    let prelude = at_rule.first_child().unwrap();
    assert_eq!(prelude.kind(), NodeKind::AtRulePrelude);
    assert_eq!(child_kinds(prelude), vec![NodeKind::Identifier]);
    assert_eq!(prelude.first_child().unwrap().text(), "spin");

    let block = nth_child(at_rule, 1);
    let frames: Vec<Node<'_>> = block.children().collect();
    assert_eq!(frames.len(), 2);
    let from_selector = frames[0].first_child().unwrap().first_child().unwrap();
    assert_eq!(from_selector.first_child().unwrap().kind(), NodeKind::TypeSelector);
    let mid_selector = frames[1].first_child().unwrap().first_child().unwrap();
    assert_eq!(mid_selector.first_child().unwrap().kind(), NodeKind::Percentage);
    assert_eq!(mid_selector.first_child().unwrap().text(), "50%");
}

#[test]
fn test_conditional_at_rule_mixes_declarations_and_rules() {
    // CSS Nesting: conditional at-rules may contain declarations directly.
    let source = "@media screen { color: red; a { color: blue; } }";
    let options = ParseOptions::default();
    let tree = parse(source, &options);

    let block = nth_child(tree.root().first_child().unwrap(), 1);
    assert_eq!(
        child_kinds(block),
        vec![NodeKind::Declaration, NodeKind::StyleRule]
    );
}

#[test]
fn test_declaration_without_colon_recovers_as_nothing() {
    let source = "a { color red; background: blue; }";
    let options = ParseOptions::default();
    let tree = parse(source, &options);

    let block = nth_child(tree.root().first_child().unwrap(), 1);
    let declarations: Vec<Node<'_>> = block.children().collect();
    assert_eq!(declarations.len(), 1);
    assert_eq!(declarations[0].name(), Some("background"));
}

#[test]
fn test_custom_property_keeps_raw_value() {
    let source = ":root { --main-color: #fff url(x) anything; }";
    let options = ParseOptions::default();
    let tree = parse(source, &options);

    let block = nth_child(tree.root().first_child().unwrap(), 1);
    let declaration = block.first_child().expect("declaration");
    assert!(declaration.is_custom_property());
    assert_eq!(declaration.name(), Some("--main-color"));
    assert_eq!(declaration.value(), Some("#fff url(x) anything"));
    // The raw value is kept as one span without component children.
    let value = declaration.first_child().expect("value node");
    assert_eq!(value.kind(), NodeKind::Value);
    assert!(value.is_empty());
}

#[test]
fn test_vendor_prefix_flag() {
    let source = "a { -webkit-transform: none; transform: none; }";
    let options = ParseOptions::default();
    let tree = parse(source, &options);

    let block = nth_child(tree.root().first_child().unwrap(), 1);
    let declarations: Vec<Node<'_>> = block.children().collect();
    assert!(declarations[0].is_vendor_prefixed());
    assert!(!declarations[1].is_vendor_prefixed());
}

#[test]
fn test_star_hack_property() {
    let source = "a { *zoom: 1; }";
    let options = ParseOptions::default();
    let tree = parse(source, &options);

    let block = nth_child(tree.root().first_child().unwrap(), 1);
    let declaration = block.first_child().expect("declaration");
    assert_eq!(declaration.name(), Some("*zoom"));
    assert_eq!(declaration.value(), Some("1"));
}

#[test]
fn test_cdo_cdc_skipped_at_top_level() {
    let source = "<!-- a { color: red; } -->";
    let options = ParseOptions::default();
    let tree = parse(source, &options);
    let root = tree.root();
    assert_eq!(child_kinds(root), vec![NodeKind::StyleRule]);
}

#[test]
fn test_selectors_off_yields_bare_selector_list() {
    let source = "div > span { color: red; }";
    let options = ParseOptions {
        parse_selectors: false,
        ..ParseOptions::default()
    };
    let tree = parse(source, &options);

    let selectors = tree.root().first_child().unwrap().first_child().unwrap();
    assert_eq!(selectors.kind(), NodeKind::SelectorList);
    assert_eq!(selectors.text(), "div > span");
    assert!(selectors.is_empty());
}

#[test]
fn test_values_off_yields_no_value_children() {
    let source = "a { color: red; }";
    let options = ParseOptions {
        parse_values: false,
        ..ParseOptions::default()
    };
    let tree = parse(source, &options);

    let declaration = nth_child(tree.root().first_child().unwrap(), 1)
        .first_child()
        .expect("declaration");
    assert!(declaration.is_empty());
    assert_eq!(declaration.value(), Some("red"));
}

#[test]
fn test_preludes_off_keeps_raw_text_only() {
    let source = "@media (min-width: 10px) { }";
    let options = ParseOptions {
        parse_atrule_preludes: false,
        ..ParseOptions::default()
    };
    let tree = parse(source, &options);

    let at_rule = tree.root().first_child().expect("at-rule");
    assert_eq!(child_kinds(at_rule), vec![NodeKind::Block]);
    assert_eq!(at_rule.value(), Some("(min-width: 10px)"));
}

#[test]
fn test_malformed_at_rule_without_block_or_semicolon() {
    let source = "@media screen";
    let options = ParseOptions::default();
    let tree = parse(source, &options);

    let at_rule = tree.root().first_child().expect("at-rule");
    assert_eq!(at_rule.name(), Some("media"));
    assert!(!at_rule.has_block());
    assert_eq!(at_rule.end(), source.len());
}

#[test]
fn test_stray_tokens_never_panic() {
    let options = ParseOptions::default();
    for source in [
        "}",
        ";;;",
        "@",
        "123",
        "a { } }",
        "{ color: red }",
        "a { { } }",
        "@media ( {",
        "'open string",
        "url(bad url",
    ] {
        let tree = parse(source, &options);
        assert_eq!(tree.root().kind(), NodeKind::Stylesheet);
    }
}

#[test]
fn test_positions_on_nodes() {
    let source = "a {\n  color: red;\n}";
    let options = ParseOptions::default();
    let tree = parse(source, &options);

    let rule = tree.root().first_child().expect("rule");
    assert_eq!((rule.line(), rule.column()), (1, 1));
    let declaration = nth_child(rule, 1).first_child().expect("declaration");
    assert_eq!((declaration.line(), declaration.column()), (2, 3));
}
