//! At-rule prelude parsing, dispatched on the rule name.
//!
//! The prelude is everything between the at-keyword and its `{` or `;`
//! ([§ 5.4.2 Consume an at-rule](https://www.w3.org/TR/css-syntax-3/#consume-at-rule)).
//! Known names get structured children; unknown names produce no nodes and
//! the raw prelude text stays reachable through the at-rule's value range.

use larch_tree::{Arena, NodeId, NodeKind};

use crate::tokenizer::{Lexer, TokenKind};

use super::values;

/// Parse the prelude range of an at-rule named `name` (with `@` stripped).
///
/// Returns the child nodes for an `AtRulePrelude` wrapper; empty for
/// unknown names or preludes that produce nothing.
pub(crate) fn parse(
    arena: &mut Arena,
    source: &str,
    name: &str,
    start: usize,
    end: usize,
    line: u32,
    column: u32,
) -> Vec<NodeId> {
    let name = strip_vendor_prefix(name);
    let mut lexer = Lexer::at(source, start, line, column, end, true);

    // [Media Queries 4](https://www.w3.org/TR/mediaqueries-4/),
    // [css-conditional](https://www.w3.org/TR/css-conditional-3/),
    // [css-contain](https://www.w3.org/TR/css-contain-3/):
    // condition expressions of keywords (`not`, `and`, `or`, media types)
    // and parenthesized feature queries / sub-conditions.
    if eq(name, "media") || eq(name, "supports") || eq(name, "container") {
        return values::read_components(&mut lexer, arena, None, false);
    }

    // [css-animations § @keyframes](https://www.w3.org/TR/css-animations-1/#keyframes):
    // a single identifier or string naming the animation.
    if eq(name, "keyframes") {
        return match lexer.kind() {
            TokenKind::Ident => vec![token_node(&mut lexer, arena, NodeKind::Identifier)],
            TokenKind::String => vec![token_node(&mut lexer, arena, NodeKind::String)],
            _ => Vec::new(),
        };
    }

    // [css-cascade-5 § @layer](https://www.w3.org/TR/css-cascade-5/#at-layer):
    // a comma-separated list of dotted layer names.
    if eq(name, "layer") {
        return parse_layer_names(&mut lexer, arena);
    }

    // [css-cascade § @import](https://www.w3.org/TR/css-cascade-5/#at-import):
    // a URL, then optional layer(…), supports(…), and a media query list.
    // The generic component reader covers all of those shapes.
    if eq(name, "import") {
        return values::read_components(&mut lexer, arena, None, false);
    }

    Vec::new()
}

/// One dotted layer name (`outer.inner`) per node, commas as operators.
fn parse_layer_names(lexer: &mut Lexer<'_>, arena: &mut Arena) -> Vec<NodeId> {
    let mut nodes = Vec::new();
    loop {
        match lexer.kind() {
            TokenKind::Eof => return nodes,
            TokenKind::Comma => nodes.push(token_node(lexer, arena, NodeKind::Operator)),
            TokenKind::Ident => {
                let start = lexer.start();
                let line = lexer.line();
                let column = lexer.column();
                let mut end = lexer.end();
                lexer.next_token();
                // Extend across `.` segments as long as the tokens touch.
                while lexer.kind() == TokenKind::Delim
                    && lexer.first_byte() == Some(b'.')
                    && lexer.start() == end
                {
                    let dot_end = lexer.end();
                    lexer.next_token();
                    if lexer.kind() == TokenKind::Ident && lexer.start() == dot_end {
                        end = lexer.end();
                        lexer.next_token();
                    } else {
                        end = dot_end;
                        break;
                    }
                }
                let id = arena.create_node(NodeKind::Identifier, start, end - start, line, column);
                nodes.push(id);
            }
            _ => lexer.next_token(),
        }
    }
}

/// Create a node spanning the current token and advance past it.
fn token_node(lexer: &mut Lexer<'_>, arena: &mut Arena, kind: NodeKind) -> NodeId {
    let id = arena.create_node(
        kind,
        lexer.start(),
        lexer.end() - lexer.start(),
        lexer.line(),
        lexer.column(),
    );
    lexer.next_token();
    id
}

/// Strip a `-vendor-` prefix from an at-rule name, so `-webkit-keyframes`
/// dispatches and classifies like `keyframes`.
pub(crate) fn strip_vendor_prefix(name: &str) -> &str {
    if let Some(rest) = name.strip_prefix('-') {
        if let Some(index) = rest.find('-') {
            if index > 0 {
                return &rest[index + 1..];
            }
        }
    }
    name
}

fn eq(name: &str, expected: &str) -> bool {
    name.eq_ignore_ascii_case(expected)
}
