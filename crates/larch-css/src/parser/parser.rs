//! CSS parser per [§ 5 Parsing](https://www.w3.org/TR/css-syntax-3/#parsing).
//!
//! The recursive-descent driver: reads tokens from the lexer, delegates
//! bounded ranges to the selector / prelude / declaration sub-parsers, and
//! writes the resulting nodes into the arena. Parsing is forgiving by
//! contract — malformed constructs yield truncated nodes or no node, and
//! the driver resynchronizes at `;`, `}`, or end of input; it never fails.

use larch_tree::{flags, Arena, NodeId, NodeKind, SyntaxTree};

use crate::selector;
use crate::tokenizer::{Lexer, TokenKind};
use crate::ParseOptions;

use super::{declaration, prelude};

/// What a `{ … }` block is allowed to contain, decided by the construct
/// that owns the block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockMode {
    /// Declarations only (`@font-face`, `@page`, …).
    Declarations,
    /// Declarations, nested style rules, and nested at-rules — style rule
    /// bodies and conditional at-rules under CSS Nesting.
    Mixed,
    /// Rules only (`@keyframes` and unknown at-rules).
    Rules,
}

/// [§ 5.4.1 Consume a list of rules](https://www.w3.org/TR/css-syntax-3/#consume-list-of-rules)
///
/// Classification of a block-bearing at-rule, driving its block mode.
fn classify_at_rule(name: &str) -> BlockMode {
    let name = prelude::strip_vendor_prefix(name);
    let declaration_bearing = [
        "font-face",
        "font-feature-values",
        "page",
        "property",
        "counter-style",
    ];
    let conditional = ["media", "supports", "container", "layer", "nest"];

    if declaration_bearing
        .iter()
        .any(|known| name.eq_ignore_ascii_case(known))
    {
        BlockMode::Declarations
    } else if conditional
        .iter()
        .any(|known| name.eq_ignore_ascii_case(known))
    {
        BlockMode::Mixed
    } else {
        BlockMode::Rules
    }
}

/// Parse a complete stylesheet.
pub(crate) fn parse<'src>(source: &'src str, options: &ParseOptions) -> SyntaxTree<'src> {
    let mut parser = Parser {
        lexer: Lexer::new(source, options.skip_comments),
        arena: Arena::for_source(source.len()),
        source,
        options: options.clone(),
    };
    let root = parser.parse_stylesheet();
    SyntaxTree::new(parser.arena, source, root)
}

struct Parser<'src> {
    lexer: Lexer<'src>,
    arena: Arena,
    source: &'src str,
    options: ParseOptions,
}

impl Parser<'_> {
    /// [§ 5.3.3 Parse a stylesheet](https://www.w3.org/TR/css-syntax-3/#parse-stylesheet)
    ///
    /// "Consume a list of rules from input, with the top-level flag set."
    fn parse_stylesheet(&mut self) -> NodeId {
        let root = self
            .arena
            .create_node(NodeKind::Stylesheet, 0, self.source.len(), 1, 1);
        let mut children = Vec::new();

        loop {
            match self.lexer.kind() {
                TokenKind::Eof => break,

                // "<CDO-token> / <CDC-token>: Do nothing." Whitespace,
                // stray semicolons, and unmatched `}` are likewise skipped
                // at the top level.
                TokenKind::Whitespace
                | TokenKind::Comment
                | TokenKind::Cdo
                | TokenKind::Cdc
                | TokenKind::Semicolon
                | TokenKind::RightBrace => self.lexer.next_token(),

                TokenKind::AtKeyword => {
                    if let Some(rule) = self.parse_at_rule() {
                        children.push(rule);
                    }
                }

                _ => {
                    if let Some(rule) = self.parse_style_rule(false) {
                        children.push(rule);
                    }
                }
            }
        }

        self.arena.append_children(root, &children);
        root
    }

    /// [§ 5.4.3 Consume a qualified rule](https://www.w3.org/TR/css-syntax-3/#consume-qualified-rule)
    ///
    /// Selector prelude up to `{`, then a block. A `nested` rule also
    /// gives up at `;` (consumed) or `}` (left for the enclosing block).
    fn parse_style_rule(&mut self, nested: bool) -> Option<NodeId> {
        let rule_start = self.lexer.start();
        let rule_line = self.lexer.line();
        let rule_column = self.lexer.column();

        // Scan the selector range, remembering the trimmed extent.
        let mut first_significant: Option<(usize, u32, u32)> = None;
        let mut selector_end = rule_start;
        loop {
            match self.lexer.kind() {
                TokenKind::LeftBrace => break,
                // "<EOF-token>: This is a parse error. Return nothing."
                TokenKind::Eof => return None,
                TokenKind::Semicolon if nested => {
                    self.lexer.next_token();
                    return None;
                }
                TokenKind::RightBrace if nested => return None,
                TokenKind::Whitespace | TokenKind::Comment => self.lexer.next_token(),
                _ => {
                    if first_significant.is_none() {
                        first_significant =
                            Some((self.lexer.start(), self.lexer.line(), self.lexer.column()));
                    }
                    selector_end = self.lexer.end();
                    self.lexer.next_token();
                }
            }
        }

        let rule = self.arena.create_node(
            NodeKind::StyleRule,
            rule_start,
            0,
            rule_line,
            rule_column,
        );

        let (selector_start, selector_line, selector_column) =
            first_significant.unwrap_or((rule_start, rule_line, rule_column));
        let selector_end = selector_end.max(selector_start);
        let selector_list = if self.options.parse_selectors {
            selector::parse_selector_list(
                &mut self.arena,
                self.source,
                selector_start,
                selector_end,
                selector_line,
                selector_column,
            )
        } else {
            // Raw mode: a bare SelectorList spanning the trimmed prelude.
            self.arena.create_node(
                NodeKind::SelectorList,
                selector_start,
                selector_end - selector_start,
                selector_line,
                selector_column,
            )
        };

        let (block, rule_end) = self.parse_block(BlockMode::Mixed);
        self.arena.set_flag(rule, flags::HAS_BLOCK);
        self.arena.set_length(rule, rule_end - rule_start);
        self.arena.append_children(rule, &[selector_list, block]);
        Some(rule)
    }

    /// [§ 5.4.2 Consume an at-rule](https://www.w3.org/TR/css-syntax-3/#consume-at-rule)
    fn parse_at_rule(&mut self) -> Option<NodeId> {
        let rule_start = self.lexer.start();
        let rule_line = self.lexer.line();
        let rule_column = self.lexer.column();
        let name_end = self.lexer.end();

        let rule = self
            .arena
            .create_node(NodeKind::AtRule, rule_start, 0, rule_line, rule_column);
        // name() is the identifier without `@`.
        self.arena.set_content_delta(rule, 1);
        self.arena.set_content_length(rule, name_end - rule_start - 1);
        let source = self.source;
        let name = source.get(rule_start + 1..name_end).unwrap_or("");
        self.lexer.next_token();

        // Prelude: tokens up to `{`, `;`, or end of input; a stray `}`
        // also stops it when the at-rule sits inside a block.
        let mut first_significant: Option<(usize, u32, u32)> = None;
        let mut prelude_end = name_end;
        loop {
            match self.lexer.kind() {
                TokenKind::LeftBrace
                | TokenKind::Semicolon
                | TokenKind::RightBrace
                | TokenKind::Eof => break,
                TokenKind::Whitespace | TokenKind::Comment => self.lexer.next_token(),
                _ => {
                    if first_significant.is_none() {
                        first_significant =
                            Some((self.lexer.start(), self.lexer.line(), self.lexer.column()));
                    }
                    prelude_end = self.lexer.end();
                    self.lexer.next_token();
                }
            }
        }

        let mut children = Vec::new();
        if let Some((prelude_start, prelude_line, prelude_column)) = first_significant {
            // The trimmed prelude text is always reachable through the
            // at-rule's value range, parsed or not.
            self.arena.set_value_delta(rule, prelude_start - rule_start);
            self.arena.set_value_length(rule, prelude_end - prelude_start);

            if self.options.parse_atrule_preludes {
                let nodes = prelude::parse(
                    &mut self.arena,
                    self.source,
                    name,
                    prelude_start,
                    prelude_end,
                    prelude_line,
                    prelude_column,
                );
                if !nodes.is_empty() {
                    let wrapper = self.arena.create_node(
                        NodeKind::AtRulePrelude,
                        prelude_start,
                        prelude_end - prelude_start,
                        prelude_line,
                        prelude_column,
                    );
                    self.arena.append_children(wrapper, &nodes);
                    children.push(wrapper);
                }
            }
        }

        let rule_end = match self.lexer.kind() {
            TokenKind::LeftBrace => {
                let (block, end) = self.parse_block(classify_at_rule(name));
                self.arena.set_flag(rule, flags::HAS_BLOCK);
                children.push(block);
                end
            }
            TokenKind::Semicolon => {
                // Statement at-rule (`@import …;`); the span includes `;`.
                let end = self.lexer.end();
                self.lexer.next_token();
                end
            }
            // Malformed: close at the current position with no block.
            _ => prelude_end,
        };

        self.arena.set_length(rule, rule_end - rule_start);
        self.arena.append_children(rule, &children);
        Some(rule)
    }

    /// [§ 5.4.7 Consume a simple block](https://www.w3.org/TR/css-syntax-3/#consume-simple-block)
    ///
    /// The current token is `{`. Returns the Block node and the end offset
    /// of the construct including the closing `}` (or the end of input for
    /// an unterminated block). The Block's own span excludes the `}`.
    fn parse_block(&mut self, mode: BlockMode) -> (NodeId, usize) {
        let block_start = self.lexer.start();
        let block_line = self.lexer.line();
        let block_column = self.lexer.column();
        let block = self
            .arena
            .create_node(NodeKind::Block, block_start, 0, block_line, block_column);
        self.lexer.next_token();

        let children = self.parse_block_contents(mode);

        let (content_end, outer_end) = if self.lexer.kind() == TokenKind::RightBrace {
            let ends = (self.lexer.start(), self.lexer.end());
            self.lexer.next_token();
            ends
        } else {
            // Unterminated block: both spans run to end of input.
            let end = self.lexer.start();
            (end, end)
        };

        self.arena.set_length(block, content_end - block_start);
        if children
            .iter()
            .any(|&id| self.arena.get(id).is_some_and(|d| d.kind == NodeKind::Declaration))
        {
            self.arena.set_flag(block, flags::HAS_DECLARATIONS);
        }
        self.arena.append_children(block, &children);
        (block, outer_end)
    }

    /// [§ 5.4.4 Consume a style block's contents](https://www.w3.org/TR/css-syntax-3/#consume-style-block)
    ///
    /// The shared block loop. Which constructs are attempted depends on
    /// the block mode; unrecognized tokens are skipped one at a time.
    fn parse_block_contents(&mut self, mode: BlockMode) -> Vec<NodeId> {
        let mut children = Vec::new();
        loop {
            match self.lexer.kind() {
                TokenKind::RightBrace | TokenKind::Eof => return children,

                TokenKind::Whitespace
                | TokenKind::Comment
                | TokenKind::Semicolon
                | TokenKind::Cdo
                | TokenKind::Cdc => self.lexer.next_token(),

                TokenKind::AtKeyword if mode != BlockMode::Declarations => {
                    if let Some(rule) = self.parse_at_rule() {
                        children.push(rule);
                    }
                }

                _ => {
                    // CSS Nesting: try a declaration first (the declaration
                    // parser rewinds on a missing `:`), then a nested style
                    // rule, then skip the stray token.
                    if mode != BlockMode::Rules && declaration::may_start(&self.lexer) {
                        if let Some(decl) = declaration::parse(
                            &mut self.lexer,
                            &mut self.arena,
                            self.source,
                            &self.options,
                        ) {
                            children.push(decl);
                            continue;
                        }
                    }
                    if mode == BlockMode::Declarations {
                        self.lexer.next_token();
                        continue;
                    }
                    if let Some(rule) = self.parse_style_rule(true) {
                        children.push(rule);
                    }
                }
            }
        }
    }
}
