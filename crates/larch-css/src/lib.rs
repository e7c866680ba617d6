//! Forgiving, zero-copy CSS parser producing a flat arena syntax tree.
//!
//! # Scope
//!
//! This crate implements:
//! - **CSS Tokenizer** ([§ 4 Tokenization](https://www.w3.org/TR/css-syntax-3/#tokenization))
//!   - All token types: ident, function, at-keyword, hash, string, url,
//!     number, dimension, percentage, etc.
//!   - Escape sequences, comment handling, bad-string/bad-url recovery
//!   - Zero-copy: tokens are byte ranges into the source, updated in place
//! - **CSS Parser** ([§ 5 Parsing](https://www.w3.org/TR/css-syntax-3/#parsing))
//!   - Stylesheets, style rules, at-rules, declarations
//!   - CSS Nesting ([css-nesting-1](https://www.w3.org/TR/css-nesting-1/))
//!   - At-rule classification: declaration-bearing, conditional, rule-bearing
//! - **CSS Selectors** ([Selectors Level 4](https://www.w3.org/TR/selectors-4/))
//!   - Type, class, id, universal, attribute, pseudo-class/element,
//!     nesting selectors; combinators including `||`
//! - **At-rule preludes**
//!   - Media/supports/container conditions, keyframes names, layer lists,
//!     import preludes
//!
//! # Error handling
//!
//! The parser is forgiving by contract: it never fails on malformed CSS.
//! Tokenization errors surface as `bad-string`/`bad-url` tokens, structural
//! errors yield truncated nodes or none, and the driver resynchronizes at
//! `;`, `}`, or end of input. Every parse returns a usable
//! [`SyntaxTree`].
//!
//! # Not implemented
//!
//! - Serialization back to CSS text
//! - Semantic validation of properties and values
//! - `@import` resolution, cascade, or specificity computation

/// Selector parsing per [Selectors Level 4](https://www.w3.org/TR/selectors-4/).
mod selector;

/// CSS parser per [§ 5 Parsing](https://www.w3.org/TR/css-syntax-3/#parsing).
mod parser;

/// CSS tokenizer per [§ 4 Tokenization](https://www.w3.org/TR/css-syntax-3/#tokenization).
pub mod tokenizer;

// Re-exports for convenience
pub use larch_tree::{
    flags, traverse, traverse_with_context, walk, Arena, AttrCase, AttrOperator, Children,
    ContextTraverser, Node, NodeData, NodeId, NodeKind, SyntaxTree, Traverser, Visit, WalkContext,
};
pub use tokenizer::{Lexer, Token, TokenKind, Tokens};

/// Options recognized by [`parse`]. All default to `true`.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Drop comment tokens inside the tokenizer.
    pub skip_comments: bool,
    /// Tokenize declaration values into `Value` trees.
    pub parse_values: bool,
    /// Parse selectors into structured trees.
    pub parse_selectors: bool,
    /// Parse at-rule preludes into structured children.
    pub parse_atrule_preludes: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            skip_comments: true,
            parse_values: true,
            parse_selectors: true,
            parse_atrule_preludes: true,
        }
    }
}

/// Parse a stylesheet.
///
/// Always succeeds; malformed segments appear as gaps or truncated nodes in
/// the returned tree (whose root is a [`NodeKind::Stylesheet`]).
#[must_use]
pub fn parse<'src>(source: &'src str, options: &ParseOptions) -> SyntaxTree<'src> {
    parser::parser::parse(source, options)
}

/// Parse standalone text as a selector list.
///
/// The returned tree's root is a [`NodeKind::SelectorList`].
#[must_use]
pub fn parse_selector(text: &str) -> SyntaxTree<'_> {
    let mut arena = Arena::for_source(text.len());
    let root = selector::parse_selector_list(&mut arena, text, 0, text.len(), 1, 1);
    SyntaxTree::new(arena, text, root)
}

/// Parse standalone text as the prelude of an at-rule named `name` (without
/// the `@`).
///
/// The returned tree's root is a [`NodeKind::AtRulePrelude`] whose children
/// are the parsed prelude nodes — none for an unknown name.
#[must_use]
pub fn parse_atrule_prelude<'src>(name: &str, text: &'src str) -> SyntaxTree<'src> {
    let mut arena = Arena::for_source(text.len());
    let children = parser::prelude::parse(&mut arena, text, name, 0, text.len(), 1, 1);
    let root = arena.create_node(NodeKind::AtRulePrelude, 0, text.len(), 1, 1);
    arena.append_children(root, &children);
    SyntaxTree::new(arena, text, root)
}

/// Parse standalone text as a single declaration.
///
/// The returned tree's root is a [`NodeKind::Declaration`] when the text
/// parses as one, or an empty [`NodeKind::Stylesheet`] when it does not.
#[must_use]
pub fn parse_declaration(text: &str) -> SyntaxTree<'_> {
    let options = ParseOptions::default();
    let mut arena = Arena::for_source(text.len());
    let mut lexer = Lexer::new(text, true);
    parser::declaration::skip_trivia(&mut lexer);
    let root = parser::declaration::parse(&mut lexer, &mut arena, text, &options)
        .unwrap_or_else(|| arena.create_node(NodeKind::Stylesheet, 0, 0, 1, 1));
    SyntaxTree::new(arena, text, root)
}

/// Parse standalone text as a declaration value.
///
/// The returned tree's root is a [`NodeKind::Value`] with component
/// children.
#[must_use]
pub fn parse_value(text: &str) -> SyntaxTree<'_> {
    let mut arena = Arena::for_source(text.len());
    let root = parser::values::parse_value(&mut arena, text, 0, text.len(), 1, 1, true);
    SyntaxTree::new(arena, text, root)
}

/// Tokenize a source into a finite, lazy token stream ending with one
/// [`TokenKind::Eof`] token. The stream is not restartable.
#[must_use]
pub fn tokenize(source: &str, skip_comments: bool) -> Tokens<'_> {
    Tokens::new(source, skip_comments)
}
