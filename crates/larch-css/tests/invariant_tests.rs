//! Property tests over a corpus of stylesheets: span coverage, containment,
//! sibling ordering, zero-copy slicing, round-trip reconstruction, walker
//! completeness, and enter/leave symmetry.

use larch_css::{parse, traverse, walk, Node, NodeId, NodeKind, ParseOptions, Traverser, Visit};

const CORPUS: &[&str] = &[
    "",
    "body { color: red; }",
    "@media (min-width: 768px) { body { color: red; } }",
    ".a { .b { .c { color: red; } } }",
    "body { color: red",
    ".override { color: red !important; }",
    "a, b.c #d [e=f] { margin: 0 auto; padding: calc(100% - 2px); }",
    "@import url(\"a.css\") screen;\n@layer base, ui;\n@charset \"utf-8\";",
    "@keyframes spin { from { transform: rotate(0) } to { transform: rotate(1turn) } }",
    "@supports (display: grid) { @media screen { a { b: c } } }",
    "/* leading */ a /* mid */ { /* in block */ color: /* in value */ red; }",
    "a { background: url(img.png) no-repeat 'str' #fff; }",
    "a { color red; background: blue; } 123 ; x { }",
    "broken { 'string\nacross lines'; url(bad url); }",
    "@font-face { font-family: \"Fira Sans\"; src: url(fira.woff2) format(\"woff2\"); }",
    ":root { --x: token } a::before { content: var(--x) }",
    "h\\e9 llo { col\\6Fr: red }",
    "a{b:c}d{e:f}",
];

fn parse_options() -> Vec<ParseOptions> {
    vec![
        ParseOptions::default(),
        ParseOptions {
            skip_comments: false,
            ..ParseOptions::default()
        },
        ParseOptions {
            parse_values: false,
            parse_selectors: false,
            parse_atrule_preludes: false,
            ..ParseOptions::default()
        },
    ]
}

#[test]
fn test_span_coverage_and_zero_copy_slicing() {
    for source in CORPUS {
        for options in parse_options() {
            let tree = parse(source, &options);
            let _ = walk(tree.root(), &mut |node, _| {
                assert!(node.start() <= node.end(), "span inverted in {source:?}");
                assert!(node.end() <= source.len(), "span escapes {source:?}");
                assert_eq!(
                    node.text(),
                    &source[node.start()..node.end()],
                    "slicing mismatch in {source:?}"
                );
                Visit::Continue
            });
        }
    }
}

#[test]
fn test_containment_within_parent() {
    for source in CORPUS {
        for options in parse_options() {
            let tree = parse(source, &options);
            let _ = walk(tree.root(), &mut |node, _| {
                if let Some(parent) = node.parent() {
                    assert!(
                        parent.start() <= node.start() && node.end() <= parent.end(),
                        "node {:?} escapes parent {:?} in {source:?}",
                        node.kind(),
                        parent.kind(),
                    );
                }
                Visit::Continue
            });
        }
    }
}

#[test]
fn test_sibling_ordering_follows_source_order() {
    for source in CORPUS {
        for options in parse_options() {
            let tree = parse(source, &options);
            let _ = walk(tree.root(), &mut |node, _| {
                let mut previous_end: Option<usize> = None;
                for child in node.children() {
                    if let Some(end) = previous_end {
                        assert!(
                            end <= child.start(),
                            "siblings overlap or regress in {source:?}"
                        );
                    }
                    previous_end = Some(child.end());
                }
                Visit::Continue
            });
        }
    }
}

#[test]
fn test_round_trip_reconstruction() {
    for source in CORPUS {
        let options = ParseOptions::default();
        let tree = parse(source, &options);
        let mut rebuilt = String::new();
        let mut cursor = 0;
        for child in tree.root().children() {
            rebuilt.push_str(&source[cursor..child.start()]);
            rebuilt.push_str(child.text());
            cursor = child.end();
        }
        rebuilt.push_str(&source[cursor..]);
        assert_eq!(&rebuilt, source);
    }
}

#[test]
fn test_top_level_children_are_rules() {
    for source in CORPUS {
        let options = ParseOptions::default();
        let tree = parse(source, &options);
        for child in tree.root().children() {
            assert!(
                matches!(child.kind(), NodeKind::StyleRule | NodeKind::AtRule),
                "unexpected top-level {:?} in {source:?}",
                child.kind()
            );
        }
    }
}

#[test]
fn test_style_rule_shape_invariant() {
    for source in CORPUS {
        let options = ParseOptions::default();
        let tree = parse(source, &options);
        let _ = walk(tree.root(), &mut |node, _| {
            if node.kind() == NodeKind::StyleRule {
                let first = node.first_child().expect("style rules have children");
                assert_eq!(first.kind(), NodeKind::SelectorList);
                if let Some(second) = first.next_sibling() {
                    assert_eq!(second.kind(), NodeKind::Block);
                }
            }
            if node.kind() == NodeKind::AtRule {
                let kinds: Vec<NodeKind> = node.children().map(|child| child.kind()).collect();
                match kinds.as_slice() {
                    []
                    | [NodeKind::Block]
                    | [NodeKind::AtRulePrelude]
                    | [NodeKind::AtRulePrelude, NodeKind::Block] => {}
                    other => panic!("bad at-rule children {other:?} in {source:?}"),
                }
            }
            Visit::Continue
        });
    }
}

#[test]
fn test_walker_completeness_matches_link_closure() {
    for source in CORPUS {
        let options = ParseOptions::default();
        let tree = parse(source, &options);

        let mut walked: Vec<NodeId> = Vec::new();
        let _ = walk(tree.root(), &mut |node, _| {
            walked.push(node.id());
            Visit::Continue
        });

        let mut closure: Vec<NodeId> = Vec::new();
        let mut stack = vec![tree.root().id()];
        while let Some(id) = stack.pop() {
            closure.push(id);
            let node = tree.node(id).expect("linked ids are valid");
            let mut children: Vec<NodeId> = node.children().map(|child| child.id()).collect();
            children.reverse();
            stack.extend(children);
        }
        assert_eq!(walked, closure, "walk mismatch in {source:?}");
    }
}

#[derive(Default)]
struct Symmetry {
    order: Vec<(bool, NodeId)>,
}

impl<'a> Traverser<'a> for Symmetry {
    fn enter(&mut self, node: Node<'a>) -> Visit {
        self.order.push((true, node.id()));
        Visit::Continue
    }

    fn leave(&mut self, node: Node<'a>) -> Visit {
        self.order.push((false, node.id()));
        Visit::Continue
    }
}

#[test]
fn test_enter_leave_symmetry() {
    for source in CORPUS {
        let options = ParseOptions::default();
        let tree = parse(source, &options);
        let mut symmetry = Symmetry::default();
        let _ = traverse(tree.root(), &mut symmetry);

        // Balanced like parentheses: every enter has a matching later
        // leave, and leaves close in reverse order of entry.
        let mut open: Vec<NodeId> = Vec::new();
        for (entering, id) in &symmetry.order {
            if *entering {
                open.push(*id);
            } else {
                assert_eq!(open.pop(), Some(*id), "unbalanced leave in {source:?}");
            }
        }
        assert!(open.is_empty(), "unleft nodes in {source:?}");
    }
}

#[test]
fn test_parse_never_panics_on_truncations() {
    // Every prefix of a gnarly stylesheet parses to a valid tree.
    let source = "@media (x: 1) { a.b:hover { c: url(d) 'e' !important; @layer f { g: h } } }";
    let options = ParseOptions::default();
    for end in 0..=source.len() {
        if !source.is_char_boundary(end) {
            continue;
        }
        let tree = parse(&source[..end], &options);
        assert_eq!(tree.root().kind(), NodeKind::Stylesheet);
    }
}
