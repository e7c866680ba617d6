//! Node kind tags and per-node flag encodings.
//!
//! Kind tags are a closed set of small integers, stable for the lifetime of
//! the process and exported via [`NodeKind::as_u8`] for consumers that store
//! or compare raw tags. Attribute-selector operators and case flags are
//! packed into the node's 16-bit flag word (see [`flags`]).

use serde::Serialize;
use strum_macros::Display;

/// The kind tag of a syntax tree node.
///
/// Structure kinds come first, then value-level leaf kinds, then selector
/// kinds. Discriminants are explicit and stable; [`NodeKind::from_u8`] is the
/// inverse of [`NodeKind::as_u8`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize)]
#[repr(u8)]
pub enum NodeKind {
    /// The root of a parsed stylesheet.
    Stylesheet = 1,
    /// A selector list followed by a declaration block.
    StyleRule = 2,
    /// An `@`-rule, with or without a block.
    AtRule = 3,
    /// Parsed prelude contents of an at-rule (between the name and `{`/`;`).
    AtRulePrelude = 4,
    /// A `{ … }` block; its span excludes the closing `}`.
    Block = 5,
    /// A `property: value` declaration.
    Declaration = 6,
    /// A declaration value; children are present when value parsing is on.
    Value = 7,
    /// A comma-separated list of selectors.
    SelectorList = 8,
    /// One complex selector within a selector list.
    Selector = 9,

    /// An identifier (keyword) inside a value or prelude.
    Identifier = 10,
    /// A unitless number.
    Number = 11,
    /// A number with a unit, e.g. `16px`.
    Dimension = 12,
    /// A number followed by `%`.
    Percentage = 13,
    /// A quoted string.
    String = 14,
    /// A `url(…)` token or an unterminated URL recovered as opaque text.
    Url = 15,
    /// A `#rgb`-style hash inside a value.
    HexColor = 16,
    /// An identifier immediately followed by `( … )`.
    Function = 17,
    /// A standalone operator: `/`, `,`, `+`, `-`, or `:` in a feature query.
    Operator = 18,
    /// A parenthesized group not attached to a function name.
    Parentheses = 19,
    /// A `[ … ]` group inside a value.
    Brackets = 20,
    /// Preserved whitespace between significant value nodes.
    Whitespace = 21,
    /// A `/* … */` comment, only produced inside values when comments are
    /// retained.
    Comment = 22,

    /// A type (element) selector, the universal selector `*`, or a
    /// best-effort run recovered from unexpected selector input.
    TypeSelector = 23,
    /// A `.class` selector.
    ClassSelector = 24,
    /// An `#id` selector.
    IdSelector = 25,
    /// An `[attr]` / `[attr=value]` selector; operator and case flag are
    /// encoded in the node's flag word.
    AttributeSelector = 26,
    /// A `:name` or `:name(…)` pseudo-class selector.
    PseudoClassSelector = 27,
    /// A `::name` pseudo-element selector.
    PseudoElementSelector = 28,
    /// A combinator between compound selectors: whitespace, `>`, `+`, `~`,
    /// or `||`.
    Combinator = 29,
    /// The nesting selector `&`.
    NestingSelector = 30,
}

impl NodeKind {
    /// The stable integer tag of this kind.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Decode a raw tag back into a kind.
    #[must_use]
    pub const fn from_u8(raw: u8) -> Option<Self> {
        Some(match raw {
            1 => Self::Stylesheet,
            2 => Self::StyleRule,
            3 => Self::AtRule,
            4 => Self::AtRulePrelude,
            5 => Self::Block,
            6 => Self::Declaration,
            7 => Self::Value,
            8 => Self::SelectorList,
            9 => Self::Selector,
            10 => Self::Identifier,
            11 => Self::Number,
            12 => Self::Dimension,
            13 => Self::Percentage,
            14 => Self::String,
            15 => Self::Url,
            16 => Self::HexColor,
            17 => Self::Function,
            18 => Self::Operator,
            19 => Self::Parentheses,
            20 => Self::Brackets,
            21 => Self::Whitespace,
            22 => Self::Comment,
            23 => Self::TypeSelector,
            24 => Self::ClassSelector,
            25 => Self::IdSelector,
            26 => Self::AttributeSelector,
            27 => Self::PseudoClassSelector,
            28 => Self::PseudoElementSelector,
            29 => Self::Combinator,
            30 => Self::NestingSelector,
            _ => return None,
        })
    }

    /// Whether this kind is one of the simple-selector kinds.
    #[must_use]
    pub const fn is_simple_selector(self) -> bool {
        matches!(
            self,
            Self::TypeSelector
                | Self::ClassSelector
                | Self::IdSelector
                | Self::AttributeSelector
                | Self::PseudoClassSelector
                | Self::PseudoElementSelector
                | Self::NestingSelector
        )
    }
}

/// Bit assignments inside a node's 16-bit flag word.
///
/// The low byte holds boolean facts about the node; bits 8–12 pack the
/// attribute-selector operator and case-flag codes (see [`AttrOperator`] and
/// [`AttrCase`]).
pub mod flags {
    /// The rule or at-rule owns a `{ … }` block.
    pub const HAS_BLOCK: u16 = 1 << 0;
    /// The block directly contains at least one declaration.
    pub const HAS_DECLARATIONS: u16 = 1 << 1;
    /// The declaration ends with a valid `!important`.
    pub const IMPORTANT: u16 = 1 << 2;
    /// The declaration property starts with `--`.
    pub const CUSTOM_PROPERTY: u16 = 1 << 3;
    /// The declaration property starts with `-vendor-`.
    pub const VENDOR_PREFIX: u16 = 1 << 4;

    /// Shift of the attribute-selector operator code.
    pub const ATTR_OPERATOR_SHIFT: u16 = 8;
    /// Mask of the attribute-selector operator code.
    pub const ATTR_OPERATOR_MASK: u16 = 0b111 << ATTR_OPERATOR_SHIFT;
    /// Shift of the attribute-selector case-flag code.
    pub const ATTR_CASE_SHIFT: u16 = 11;
    /// Mask of the attribute-selector case-flag code.
    pub const ATTR_CASE_MASK: u16 = 0b11 << ATTR_CASE_SHIFT;
}

/// [§ 6 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
///
/// The match operator of an attribute selector, encoded into the node flag
/// word. `None` is a bare `[attr]` presence test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[repr(u8)]
pub enum AttrOperator {
    /// `[attr]` — presence test, no operator.
    None = 0,
    /// `[attr=value]` — exact match.
    Equals = 1,
    /// `[attr~=value]` — whitespace-separated word match.
    Includes = 2,
    /// `[attr|=value]` — exact or dash-prefixed match.
    DashMatch = 3,
    /// `[attr^=value]` — prefix match.
    PrefixMatch = 4,
    /// `[attr$=value]` — suffix match.
    SuffixMatch = 5,
    /// `[attr*=value]` — substring match.
    SubstringMatch = 6,
}

impl AttrOperator {
    /// Encode this operator into a node flag word.
    #[must_use]
    pub const fn to_flags(self) -> u16 {
        (self as u16) << flags::ATTR_OPERATOR_SHIFT
    }

    /// Decode the operator stored in a node flag word.
    #[must_use]
    pub const fn from_flags(word: u16) -> Self {
        match (word & flags::ATTR_OPERATOR_MASK) >> flags::ATTR_OPERATOR_SHIFT {
            1 => Self::Equals,
            2 => Self::Includes,
            3 => Self::DashMatch,
            4 => Self::PrefixMatch,
            5 => Self::SuffixMatch,
            6 => Self::SubstringMatch,
            _ => Self::None,
        }
    }

    /// The operator as written in source, empty for the presence test.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::None => "",
            Self::Equals => "=",
            Self::Includes => "~=",
            Self::DashMatch => "|=",
            Self::PrefixMatch => "^=",
            Self::SuffixMatch => "$=",
            Self::SubstringMatch => "*=",
        }
    }
}

/// [§ 6.3 Case-sensitivity](https://www.w3.org/TR/selectors-4/#attribute-case)
///
/// The trailing case flag of an attribute selector: `[attr=value i]` forces
/// case-insensitive matching, `[attr=value s]` forces case-sensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[repr(u8)]
pub enum AttrCase {
    /// No flag written; matching follows the document language.
    None = 0,
    /// The `i` flag.
    Insensitive = 1,
    /// The `s` flag.
    Sensitive = 2,
}

impl AttrCase {
    /// Encode this case flag into a node flag word.
    #[must_use]
    pub const fn to_flags(self) -> u16 {
        (self as u16) << flags::ATTR_CASE_SHIFT
    }

    /// Decode the case flag stored in a node flag word.
    #[must_use]
    pub const fn from_flags(word: u16) -> Self {
        match (word & flags::ATTR_CASE_MASK) >> flags::ATTR_CASE_SHIFT {
            1 => Self::Insensitive,
            2 => Self::Sensitive,
            _ => Self::None,
        }
    }
}
