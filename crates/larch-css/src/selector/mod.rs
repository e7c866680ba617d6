//! CSS selector parsing per [Selectors Level 4](https://www.w3.org/TR/selectors-4/).
//!
//! The selector parser re-tokenizes an already-bounded source range with a
//! fresh lexer (comments skipped) and writes arena nodes: a `SelectorList`
//! of `Selector` children, each an ordered run of simple selectors and
//! combinators.
//!
//! Recovery is per-selector: an unexpected token accumulates the rest of
//! the current selector into a best-effort `TypeSelector` spanning the run,
//! and parsing resumes at the next comma.

use larch_tree::{Arena, AttrCase, AttrOperator, NodeId, NodeKind};

use crate::tokenizer::{Lexer, TokenKind};

/// Parse `source[start..end]` as a selector list, seeded with the
/// line/column of `start`. Always returns a `SelectorList` node; malformed
/// input yields best-effort children rather than a failure.
pub(crate) fn parse_selector_list(
    arena: &mut Arena,
    source: &str,
    start: usize,
    end: usize,
    line: u32,
    column: u32,
) -> NodeId {
    let list = arena.create_node(
        NodeKind::SelectorList,
        start,
        end.saturating_sub(start),
        line,
        column,
    );
    let mut lexer = Lexer::at(source, start, line, column, end, true);
    let mut selectors = Vec::new();

    loop {
        while lexer.kind() == TokenKind::Whitespace {
            lexer.next_token();
        }
        match lexer.kind() {
            TokenKind::Eof => break,
            // An empty segment between commas produces no selector.
            TokenKind::Comma => lexer.next_token(),
            _ => {
                if let Some(selector) = parse_complex(&mut lexer, arena) {
                    selectors.push(selector);
                }
            }
        }
    }

    arena.append_children(list, &selectors);
    list
}

/// [§ 4.3 Complex selectors](https://www.w3.org/TR/selectors-4/#complex)
///
/// One comma-delimited selector: compound selectors separated by
/// combinators. Stops at a comma (unconsumed) or end of range.
fn parse_complex(lexer: &mut Lexer<'_>, arena: &mut Arena) -> Option<NodeId> {
    let start = lexer.start();
    let line = lexer.line();
    let column = lexer.column();
    let mut children: Vec<NodeId> = Vec::new();
    let mut last_end = start;
    // A whitespace run since the last simple selector, as
    // (start, end, line, column). Becomes a descendant combinator when a
    // simple selector follows with no explicit combinator in between.
    let mut pending_ws: Option<(usize, usize, u32, u32)> = None;

    loop {
        match lexer.kind() {
            TokenKind::Eof | TokenKind::Comma => break,

            TokenKind::Whitespace => {
                pending_ws = Some((lexer.start(), lexer.end(), lexer.line(), lexer.column()));
                lexer.next_token();
            }

            // [§ 16 Combinators](https://www.w3.org/TR/selectors-4/#combinators)
            // `>`, `+`, `~`, and the column combinator `||`. Whitespace
            // around an explicit combinator is absorbed.
            TokenKind::Delim
                if matches!(lexer.first_byte(), Some(b'>' | b'+' | b'~')) =>
            {
                pending_ws = None;
                let id = arena.create_node(
                    NodeKind::Combinator,
                    lexer.start(),
                    lexer.end() - lexer.start(),
                    lexer.line(),
                    lexer.column(),
                );
                children.push(id);
                last_end = lexer.end();
                lexer.next_token();
            }

            TokenKind::Delim if lexer.first_byte() == Some(b'|') => {
                pending_ws = None;
                let bar_start = lexer.start();
                let bar_line = lexer.line();
                let bar_column = lexer.column();
                let bar_end = lexer.end();
                lexer.next_token();
                if lexer.kind() == TokenKind::Delim
                    && lexer.first_byte() == Some(b'|')
                    && lexer.start() == bar_end
                {
                    let id = arena.create_node(
                        NodeKind::Combinator,
                        bar_start,
                        lexer.end() - bar_start,
                        bar_line,
                        bar_column,
                    );
                    children.push(id);
                    last_end = lexer.end();
                    lexer.next_token();
                } else {
                    // A lone `|` has no meaning here; absorb the rest of
                    // the selector as a best-effort node.
                    let id = recover(lexer, arena, bar_start, bar_line, bar_column);
                    last_end = node_end(arena, id);
                    children.push(id);
                }
            }

            _ => {
                let token_start = lexer.start();
                let token_line = lexer.line();
                let token_column = lexer.column();

                // A run of whitespace between two simple selectors is the
                // descendant combinator.
                if let Some((ws_start, ws_end, ws_line, ws_column)) = pending_ws.take() {
                    if last_child_is_simple(arena, &children) {
                        let id = arena.create_node(
                            NodeKind::Combinator,
                            ws_start,
                            ws_end - ws_start,
                            ws_line,
                            ws_column,
                        );
                        children.push(id);
                    }
                }

                let id = parse_simple(lexer, arena).unwrap_or_else(|| {
                    recover(lexer, arena, token_start, token_line, token_column)
                });
                last_end = node_end(arena, id);
                children.push(id);
            }
        }
    }

    if children.is_empty() {
        return None;
    }
    let selector = arena.create_node(NodeKind::Selector, start, last_end - start, line, column);
    arena.append_children(selector, &children);
    Some(selector)
}

fn last_child_is_simple(arena: &Arena, children: &[NodeId]) -> bool {
    children
        .last()
        .and_then(|&id| arena.get(id))
        .is_some_and(|data| data.kind != NodeKind::Combinator)
}

fn node_end(arena: &Arena, id: NodeId) -> usize {
    arena
        .get(id)
        .map_or(0, |data| (data.start + data.length) as usize)
}

/// One simple selector at the current token, or `None` for a token that
/// cannot start one (the caller then recovers).
fn parse_simple(lexer: &mut Lexer<'_>, arena: &mut Arena) -> Option<NodeId> {
    match lexer.kind() {
        // [§ 5.1 Type selectors](https://www.w3.org/TR/selectors-4/#type-selectors)
        // and [§ 5.2 Universal selector](https://www.w3.org/TR/selectors-4/#universal-selector)
        TokenKind::Ident => Some(token_node(lexer, arena, NodeKind::TypeSelector)),
        TokenKind::Delim if lexer.first_byte() == Some(b'*') => {
            Some(token_node(lexer, arena, NodeKind::TypeSelector))
        }

        // [css-nesting § 2](https://www.w3.org/TR/css-nesting-1/#nest-selector)
        // "The nesting selector ... represents the elements matched by the
        // parent rule."
        TokenKind::Delim if lexer.first_byte() == Some(b'&') => {
            Some(token_node(lexer, arena, NodeKind::NestingSelector))
        }

        // [§ 6.7 ID selectors](https://www.w3.org/TR/selectors-4/#id-selectors)
        TokenKind::Hash => {
            let id = token_node(lexer, arena, NodeKind::IdSelector);
            arena.set_content_delta(id, 1);
            arena.set_content_length(id, node_end(arena, id) - node_start(arena, id) - 1);
            Some(id)
        }

        // Keyframe selectors (`0%`, `100%`) parse as part of a nested
        // style rule inside `@keyframes`.
        TokenKind::Percentage => Some(token_node(lexer, arena, NodeKind::Percentage)),

        // [§ 6.6 Class selectors](https://www.w3.org/TR/selectors-4/#class-html)
        // "...a full stop (. U+002E) immediately followed by an identifier."
        TokenKind::Delim if lexer.first_byte() == Some(b'.') => parse_class(lexer, arena),

        // [§ 4 Pseudo-classes](https://www.w3.org/TR/selectors-4/#pseudo-classes)
        // and [§ 14 Pseudo-elements](https://www.w3.org/TR/selectors-4/#pseudo-elements)
        TokenKind::Colon => parse_pseudo(lexer, arena),

        // [§ 6 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
        TokenKind::LeftBracket => Some(parse_attribute(lexer, arena)),

        _ => None,
    }
}

fn parse_class(lexer: &mut Lexer<'_>, arena: &mut Arena) -> Option<NodeId> {
    let start = lexer.start();
    let line = lexer.line();
    let column = lexer.column();
    let dot_end = lexer.end();
    lexer.next_token();

    if lexer.kind() == TokenKind::Ident && lexer.start() == dot_end {
        let end = lexer.end();
        let id = arena.create_node(NodeKind::ClassSelector, start, end - start, line, column);
        arena.set_content_delta(id, 1);
        arena.set_content_length(id, end - dot_end);
        lexer.next_token();
        Some(id)
    } else {
        None
    }
}

fn parse_pseudo(lexer: &mut Lexer<'_>, arena: &mut Arena) -> Option<NodeId> {
    let start = lexer.start();
    let line = lexer.line();
    let column = lexer.column();
    let colon_end = lexer.end();
    lexer.next_token();

    // `::` introduces a pseudo-element.
    if lexer.kind() == TokenKind::Colon && lexer.start() == colon_end {
        let second_end = lexer.end();
        lexer.next_token();
        return finish_pseudo(
            lexer,
            arena,
            NodeKind::PseudoElementSelector,
            start,
            line,
            column,
            second_end,
        );
    }

    finish_pseudo(
        lexer,
        arena,
        NodeKind::PseudoClassSelector,
        start,
        line,
        column,
        colon_end,
    )
}

/// The name (or functional form) after `:` or `::`. `name_offset` is where
/// the name must begin for the tokens to belong together.
fn finish_pseudo(
    lexer: &mut Lexer<'_>,
    arena: &mut Arena,
    kind: NodeKind,
    start: usize,
    line: u32,
    column: u32,
    name_offset: usize,
) -> Option<NodeId> {
    match lexer.kind() {
        TokenKind::Ident if lexer.start() == name_offset => {
            let end = lexer.end();
            let id = arena.create_node(kind, start, end - start, line, column);
            arena.set_content_delta(id, name_offset - start);
            arena.set_content_length(id, end - name_offset);
            lexer.next_token();
            Some(id)
        }
        // A functional pseudo (`:nth-child(2n)`, `:is(...)`): the argument
        // tokens are kept raw inside the node's span.
        TokenKind::Function if lexer.start() == name_offset => {
            let name_len = lexer.end() - name_offset - 1;
            let end = consume_balanced(lexer);
            let id = arena.create_node(kind, start, end - start, line, column);
            arena.set_content_delta(id, name_offset - start);
            arena.set_content_length(id, name_len);
            Some(id)
        }
        _ => None,
    }
}

/// Consume from a `Function` token through its matching `)`, returning the
/// end offset. Unterminated input ends at the range limit.
fn consume_balanced(lexer: &mut Lexer<'_>) -> usize {
    let mut depth = 1usize;
    let mut end = lexer.end();
    lexer.next_token();
    loop {
        match lexer.kind() {
            TokenKind::Eof => return end,
            TokenKind::Function | TokenKind::LeftParen => depth += 1,
            TokenKind::RightParen => {
                depth -= 1;
                if depth == 0 {
                    let close = lexer.end();
                    lexer.next_token();
                    return close;
                }
            }
            _ => {}
        }
        end = lexer.end();
        lexer.next_token();
    }
}

/// `[attr]`, `[attr op value]`, `[attr op value i|s]`. The operator and
/// case flag are packed into the node's flag word; the attribute name and
/// value are the node's name and value ranges.
fn parse_attribute(lexer: &mut Lexer<'_>, arena: &mut Arena) -> NodeId {
    let start = lexer.start();
    let line = lexer.line();
    let column = lexer.column();
    let node = arena.create_node(NodeKind::AttributeSelector, start, 0, line, column);
    lexer.next_token();
    skip_whitespace(lexer);

    if lexer.kind() == TokenKind::Ident {
        arena.set_content_delta(node, lexer.start() - start);
        arena.set_content_length(node, lexer.end() - lexer.start());
        lexer.next_token();
    }
    skip_whitespace(lexer);

    let operator = parse_attr_operator(lexer);
    if operator != AttrOperator::None {
        skip_whitespace(lexer);
        if matches!(lexer.kind(), TokenKind::String | TokenKind::Ident) {
            arena.set_value_delta(node, lexer.start() - start);
            arena.set_value_length(node, lexer.end() - lexer.start());
            lexer.next_token();
        }
        skip_whitespace(lexer);
    }

    let mut case = AttrCase::None;
    if lexer.kind() == TokenKind::Ident {
        case = match lexer.text() {
            "i" | "I" => AttrCase::Insensitive,
            "s" | "S" => AttrCase::Sensitive,
            _ => AttrCase::None,
        };
        if case != AttrCase::None {
            lexer.next_token();
            skip_whitespace(lexer);
        }
    }

    let end = if lexer.kind() == TokenKind::RightBracket {
        let end = lexer.end();
        lexer.next_token();
        end
    } else {
        // Malformed: scan forward to the closing bracket, but never past a
        // comma or the end of the range.
        let mut end = lexer.start();
        loop {
            match lexer.kind() {
                TokenKind::Eof | TokenKind::Comma => break,
                TokenKind::RightBracket => {
                    end = lexer.end();
                    lexer.next_token();
                    break;
                }
                _ => {
                    end = lexer.end();
                    lexer.next_token();
                }
            }
        }
        end
    };

    arena.set_flag(node, operator.to_flags() | case.to_flags());
    arena.set_length(node, end - start);
    node
}

fn parse_attr_operator(lexer: &mut Lexer<'_>) -> AttrOperator {
    if lexer.kind() != TokenKind::Delim {
        return AttrOperator::None;
    }
    match lexer.first_byte() {
        Some(b'=') => {
            lexer.next_token();
            AttrOperator::Equals
        }
        Some(byte @ (b'~' | b'|' | b'^' | b'$' | b'*')) => {
            let mid_end = lexer.end();
            lexer.next_token();
            if lexer.kind() == TokenKind::Delim
                && lexer.first_byte() == Some(b'=')
                && lexer.start() == mid_end
            {
                lexer.next_token();
                match byte {
                    b'~' => AttrOperator::Includes,
                    b'|' => AttrOperator::DashMatch,
                    b'^' => AttrOperator::PrefixMatch,
                    b'$' => AttrOperator::SuffixMatch,
                    _ => AttrOperator::SubstringMatch,
                }
            } else {
                AttrOperator::None
            }
        }
        _ => AttrOperator::None,
    }
}

/// Best-effort recovery: absorb everything up to the next comma or the end
/// of the range into one `TypeSelector` node starting at `start`.
fn recover(
    lexer: &mut Lexer<'_>,
    arena: &mut Arena,
    start: usize,
    line: u32,
    column: u32,
) -> NodeId {
    let mut end = start.max(lexer.start());
    while !matches!(lexer.kind(), TokenKind::Eof | TokenKind::Comma) {
        end = lexer.end();
        lexer.next_token();
    }
    arena.create_node(NodeKind::TypeSelector, start, end - start, line, column)
}

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

fn node_start(arena: &Arena, id: NodeId) -> usize {
    arena.get(id).map_or(0, |data| data.start as usize)
}

fn skip_whitespace(lexer: &mut Lexer<'_>) {
    while lexer.kind() == TokenKind::Whitespace {
        lexer.next_token();
    }
}
