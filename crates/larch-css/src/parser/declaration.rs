//! [§ 5.4.6 Consume a declaration](https://www.w3.org/TR/css-syntax-3/#consume-declaration)
//!
//! The declaration parser runs against the main lexer, positioned at the
//! candidate property token. It returns `None` — with the lexer rewound to
//! where it started — when the tokens turn out not to be a declaration
//! (most commonly a missing `:`, which is how nested style rules are told
//! apart from declarations under CSS Nesting).

use larch_tree::{flags, Arena, NodeId, NodeKind};

use crate::tokenizer::{Lexer, TokenKind};
use crate::ParseOptions;

use super::values;

/// Try to parse one declaration at the lexer's current token.
///
/// On success the lexer rests on the token after the value (`;`, `}`, or
/// EOF, none of them consumed). On failure the lexer is rewound to the
/// state it had on entry.
pub(crate) fn parse(
    lexer: &mut Lexer<'_>,
    arena: &mut Arena,
    source: &str,
    options: &ParseOptions,
) -> Option<NodeId> {
    let saved = lexer.state();
    let id = parse_inner(lexer, arena, source, options);
    if id.is_none() {
        lexer.restore(saved);
    }
    id
}

/// Whether the current token may open a declaration at all.
///
/// Delimiters that are selector combinators (`.`, `>`, `+`, `~`, `&`) are
/// never declaration starts; the caller falls through to rule parsing for
/// those without a rewind round-trip.
pub(crate) fn may_start(lexer: &Lexer<'_>) -> bool {
    match lexer.kind() {
        TokenKind::Ident | TokenKind::AtKeyword => true,
        TokenKind::Delim => matches!(lexer.first_byte(), Some(b'*' | b'$')),
        _ => false,
    }
}

fn parse_inner(
    lexer: &mut Lexer<'_>,
    arena: &mut Arena,
    source: &str,
    options: &ParseOptions,
) -> Option<NodeId> {
    let decl_start = lexer.start();
    let line = lexer.line();
    let column = lexer.column();

    // Optional one-character browser-hack prefix (`*color`, `$color`).
    // An `_` hack is a name-start code point, so `_color` arrives as a
    // plain ident and needs no special case.
    if lexer.kind() == TokenKind::Delim {
        if !matches!(lexer.first_byte(), Some(b'*' | b'$')) {
            return None;
        }
        lexer.next_token();
        if lexer.start() != decl_start + 1 {
            // Whitespace after the hack character: not a declaration.
            return None;
        }
    }

    // Property name; at-keywords are accepted for custom hacks.
    if !matches!(lexer.kind(), TokenKind::Ident | TokenKind::AtKeyword) {
        return None;
    }
    let name_end = lexer.end();
    let name = source.get(decl_start..name_end).unwrap_or("");
    let custom = name.starts_with("--");
    let vendor = is_vendor_prefixed(name);
    lexer.next_token();

    skip_trivia(lexer);
    if lexer.kind() != TokenKind::Colon {
        // "If the next input token is anything other than a
        // <colon-token>, this is a parse error. Return nothing."
        return None;
    }
    let colon_end = lexer.end();
    lexer.next_token();
    skip_trivia(lexer);

    // Value: tokens up to the next unbalanced `;`, `}`, or end of input.
    let value_start = lexer.start();
    let value_line = lexer.line();
    let value_column = lexer.column();
    let mut depth = 0usize;
    let mut last_end = value_start;
    // `!important` tracking: the annotation only counts when nothing
    // significant follows it.
    let mut important = false;
    let mut bang_pending = false;
    let mut value_end_before_bang = value_start;

    loop {
        match lexer.kind() {
            TokenKind::Eof => break,
            TokenKind::Semicolon if depth == 0 => break,
            // An unbalanced `}` ends both the value and the enclosing
            // block; a `{` in a value is a parse error that ends the value.
            TokenKind::RightBrace | TokenKind::LeftBrace => break,
            TokenKind::RightParen | TokenKind::RightBracket if depth == 0 => break,

            TokenKind::Whitespace | TokenKind::Comment => {
                lexer.next_token();
                continue;
            }

            TokenKind::LeftParen | TokenKind::LeftBracket | TokenKind::Function => {
                depth += 1;
            }
            TokenKind::RightParen | TokenKind::RightBracket => {
                depth -= 1;
            }
            _ => {}
        }

        if depth == 0 && lexer.kind() == TokenKind::Delim && lexer.first_byte() == Some(b'!') {
            value_end_before_bang = last_end;
            bang_pending = true;
            important = false;
        } else if bang_pending
            && !important
            && lexer.kind() == TokenKind::Ident
            && lexer.text().eq_ignore_ascii_case("important")
        {
            important = true;
        } else {
            bang_pending = false;
            important = false;
        }

        last_end = lexer.end();
        lexer.next_token();
    }

    let value_end = if important { value_end_before_bang } else { last_end };
    let decl_end = if value_end > value_start {
        value_end
    } else {
        colon_end
    };

    let declaration = arena.create_node(
        NodeKind::Declaration,
        decl_start,
        decl_end - decl_start,
        line,
        column,
    );
    arena.set_content_length(declaration, name_end - decl_start);
    if value_end > value_start {
        arena.set_value_delta(declaration, value_start - decl_start);
        arena.set_value_length(declaration, value_end - value_start);
    }
    if important {
        arena.set_flag(declaration, flags::IMPORTANT);
    }
    if custom {
        arena.set_flag(declaration, flags::CUSTOM_PROPERTY);
    }
    if vendor {
        arena.set_flag(declaration, flags::VENDOR_PREFIX);
    }

    if options.parse_values && value_end > value_start {
        let value = if custom {
            // Custom property values are arbitrary token soup; keep the
            // raw span without component children.
            arena.create_node(
                NodeKind::Value,
                value_start,
                value_end - value_start,
                value_line,
                value_column,
            )
        } else {
            values::parse_value(
                arena,
                source,
                value_start,
                value_end,
                value_line,
                value_column,
                options.skip_comments,
            )
        };
        arena.append_children(declaration, &[value]);
    }

    Some(declaration)
}

/// Skip whitespace and comment tokens.
pub(crate) fn skip_trivia(lexer: &mut Lexer<'_>) {
    while lexer.kind().is_trivia() {
        lexer.next_token();
    }
}

/// Whether a property name is `-vendor-` prefixed (and not a `--custom`).
fn is_vendor_prefixed(name: &str) -> bool {
    let Some(rest) = name.strip_prefix('-') else {
        return false;
    };
    if rest.starts_with('-') {
        return false;
    }
    rest.find('-').is_some_and(|index| index > 0)
}
