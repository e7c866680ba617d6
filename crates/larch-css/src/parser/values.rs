//! [§ 5.4.7 Consume a component value](https://www.w3.org/TR/css-syntax-3/#consume-component-value)
//!
//! The shared component reader: re-tokenizes a bounded source range into
//! value-level nodes. The declaration parser uses it for `parse_values`,
//! and the at-rule prelude parser uses it for media/supports/container
//! conditions and `@import` preludes, where the same token-to-node mapping
//! applies but whitespace is not preserved.

use larch_tree::{Arena, NodeId, NodeKind};

use crate::tokenizer::{Lexer, TokenKind};

/// Parse a declaration value range into a `Value` node with component
/// children.
pub(crate) fn parse_value(
    arena: &mut Arena,
    source: &str,
    start: usize,
    end: usize,
    line: u32,
    column: u32,
    skip_comments: bool,
) -> NodeId {
    let value = arena.create_node(NodeKind::Value, start, end.saturating_sub(start), line, column);
    let mut lexer = Lexer::at(source, start, line, column, end, skip_comments);
    let children = read_components(&mut lexer, arena, None, true);
    arena.append_children(value, &children);
    value
}

/// Read components until `closer` (left unconsumed) or end of input.
///
/// With `keep_whitespace`, whitespace runs between two significant
/// components become `Whitespace` nodes; leading and trailing runs are
/// always dropped.
pub(crate) fn read_components(
    lexer: &mut Lexer<'_>,
    arena: &mut Arena,
    closer: Option<TokenKind>,
    keep_whitespace: bool,
) -> Vec<NodeId> {
    let mut nodes = Vec::new();
    // A whitespace run seen since the last significant component, as
    // (start, end, line, column).
    let mut pending_ws: Option<(usize, usize, u32, u32)> = None;

    loop {
        let kind = lexer.kind();
        if kind == TokenKind::Eof || Some(kind) == closer {
            return nodes;
        }

        if kind == TokenKind::Whitespace {
            if !nodes.is_empty() {
                pending_ws = Some((lexer.start(), lexer.end(), lexer.line(), lexer.column()));
            }
            lexer.next_token();
            continue;
        }

        let mapped = match kind {
            TokenKind::Ident => Some(NodeKind::Identifier),
            TokenKind::Number => Some(NodeKind::Number),
            TokenKind::Dimension => Some(NodeKind::Dimension),
            TokenKind::Percentage => Some(NodeKind::Percentage),
            TokenKind::String | TokenKind::BadString => Some(NodeKind::String),
            TokenKind::Url | TokenKind::BadUrl => Some(NodeKind::Url),
            TokenKind::Hash => Some(NodeKind::HexColor),
            TokenKind::Comment => Some(NodeKind::Comment),
            TokenKind::Comma | TokenKind::Colon => Some(NodeKind::Operator),
            TokenKind::Delim => match lexer.first_byte() {
                Some(b'/' | b'+' | b'-' | b'*') => Some(NodeKind::Operator),
                _ => None,
            },
            TokenKind::Function => {
                flush_whitespace(arena, &mut nodes, &mut pending_ws, keep_whitespace);
                nodes.push(read_container(lexer, arena, NodeKind::Function, keep_whitespace));
                continue;
            }
            TokenKind::LeftParen => {
                flush_whitespace(arena, &mut nodes, &mut pending_ws, keep_whitespace);
                nodes.push(read_container(
                    lexer,
                    arena,
                    NodeKind::Parentheses,
                    keep_whitespace,
                ));
                continue;
            }
            TokenKind::LeftBracket => {
                flush_whitespace(arena, &mut nodes, &mut pending_ws, keep_whitespace);
                nodes.push(read_container(lexer, arena, NodeKind::Brackets, keep_whitespace));
                continue;
            }
            _ => None,
        };

        match mapped {
            Some(node_kind) => {
                flush_whitespace(arena, &mut nodes, &mut pending_ws, keep_whitespace);
                nodes.push(leaf(lexer, arena, node_kind));
            }
            // Tokens with no value-level meaning are dropped.
            None => lexer.next_token(),
        }
    }
}

fn flush_whitespace(
    arena: &mut Arena,
    nodes: &mut Vec<NodeId>,
    pending_ws: &mut Option<(usize, usize, u32, u32)>,
    keep_whitespace: bool,
) {
    if let Some((start, end, line, column)) = pending_ws.take() {
        if keep_whitespace {
            nodes.push(arena.create_node(NodeKind::Whitespace, start, end - start, line, column));
        }
    }
}

/// Create a node spanning the current token and advance past it.
fn leaf(lexer: &mut Lexer<'_>, arena: &mut Arena, kind: NodeKind) -> NodeId {
    let start = lexer.start();
    let end = lexer.end();
    let id = arena.create_node(kind, start, end - start, lexer.line(), lexer.column());
    match kind {
        // name() of a hex color is the digits after `#`.
        NodeKind::HexColor if end > start + 1 => {
            arena.set_content_delta(id, 1);
            arena.set_content_length(id, end - start - 1);
        }
        // value() of a url node is the address inside `url( … )`.
        NodeKind::Url => set_url_value(lexer.source(), arena, id, start, end),
        _ => {}
    }
    lexer.next_token();
    id
}

/// Store the inner address of a `url(…)` token as the node's value range.
fn set_url_value(source: &str, arena: &mut Arena, id: NodeId, start: usize, end: usize) {
    let bytes = source.as_bytes();
    // "url(" is 4 bytes in any case mix.
    let mut inner_start = (start + 4).min(end);
    let mut inner_end = end;
    if inner_end > inner_start && bytes[inner_end - 1] == b')' {
        inner_end -= 1;
    }
    while inner_start < inner_end && bytes[inner_start].is_ascii_whitespace() {
        inner_start += 1;
    }
    while inner_end > inner_start && bytes[inner_end - 1].is_ascii_whitespace() {
        inner_end -= 1;
    }
    if inner_end > inner_start {
        arena.set_value_delta(id, inner_start - start);
        arena.set_value_length(id, inner_end - inner_start);
    }
}

/// Read a `Function`, `Parentheses`, or `Brackets` container: the opener is
/// the current token; children are read up to the matching closer, which is
/// consumed and included in the container's span.
fn read_container(
    lexer: &mut Lexer<'_>,
    arena: &mut Arena,
    kind: NodeKind,
    keep_whitespace: bool,
) -> NodeId {
    let start = lexer.start();
    let opener_end = lexer.end();
    let id = arena.create_node(kind, start, 0, lexer.line(), lexer.column());
    if kind == NodeKind::Function && opener_end > start + 1 {
        // name() is the identifier without the trailing `(`.
        arena.set_content_length(id, opener_end - start - 1);
    }

    let closer = if lexer.kind() == TokenKind::LeftBracket {
        TokenKind::RightBracket
    } else {
        TokenKind::RightParen
    };
    lexer.next_token();

    let children = read_components(lexer, arena, Some(closer), keep_whitespace);
    let end = if lexer.kind() == closer {
        let end = lexer.end();
        lexer.next_token();
        end
    } else {
        // Unterminated container: span runs to wherever input stopped.
        lexer.start()
    };
    arena.set_length(id, end - start);
    arena.append_children(id, &children);
    id
}
