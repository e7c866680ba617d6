//! CSS token types per [CSS Syntax Level 3 § 4](https://www.w3.org/TR/css-syntax-3/#tokenization).
//!
//! Tokens here are zero-copy: a token is a kind tag plus a byte range into
//! the source and the 1-based line/column of its first byte. Token text,
//! numeric values, and unescaped names are all derived by the consumer from
//! the range; the tokenizer itself never allocates.

use core::fmt;

use serde::Serialize;
use strum_macros::Display;

/// [§ 4 Tokenization](https://www.w3.org/TR/css-syntax-3/#tokenization)
///
/// "The output of the tokenization step is a stream of zero or more of the
/// following tokens: <ident-token>, <function-token>, <at-keyword-token>,
/// <hash-token>, <string-token>, <bad-string-token>, <url-token>,
/// <bad-url-token>, <delim-token>, <number-token>, <percentage-token>,
/// <dimension-token>, <whitespace-token>, <CDO-token>, <CDC-token>,
/// <colon-token>, <semicolon-token>, <comma-token>, <[-token>, <]-token>,
/// <(-token>, <)-token>, <{-token>, and <}-token>."
///
/// `Comment` and `Eof` are additions: comments are real tokens when comment
/// skipping is off, and `Eof` marks the end of the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize)]
pub enum TokenKind {
    /// "<ident-token>"
    Ident,
    /// "<function-token>" — an identifier plus the `(` that follows it.
    Function,
    /// "<at-keyword-token>" — `@` plus an identifier.
    AtKeyword,
    /// "<hash-token>" — `#` plus name code points. The id-type flag lives
    /// on [`Token::id_hash`].
    Hash,
    /// "<string-token>"
    String,
    /// "<bad-string-token>" — "represents a parsing error"
    BadString,
    /// "<url-token>" — `url(` through the matching `)`.
    Url,
    /// "<bad-url-token>" — "represents a parsing error"
    BadUrl,
    /// "<delim-token>" — a single code point; the code point is the token's
    /// source text.
    Delim,
    /// "<number-token>"
    Number,
    /// "<percentage-token>"
    Percentage,
    /// "<dimension-token>" — a number plus a unit identifier.
    Dimension,
    /// "<whitespace-token>" — one or more whitespace code points.
    Whitespace,
    /// "<CDO-token>" — `<!--`.
    Cdo,
    /// "<CDC-token>" — `-->`.
    Cdc,
    /// "<colon-token>"
    Colon,
    /// "<semicolon-token>"
    Semicolon,
    /// "<comma-token>"
    Comma,
    /// "<[-token>"
    LeftBracket,
    /// "<]-token>"
    RightBracket,
    /// "<(-token>"
    LeftParen,
    /// "<)-token>"
    RightParen,
    /// "<{-token>"
    LeftBrace,
    /// "<}-token>"
    RightBrace,
    /// A `/* … */` comment, surfaced only when comment skipping is off.
    Comment,
    /// End of input. `start == end == source length`.
    Eof,
}

impl TokenKind {
    /// Whether this is the end-of-input marker.
    #[must_use]
    pub const fn is_eof(self) -> bool {
        matches!(self, Self::Eof)
    }

    /// Whether this token never carries meaning of its own inside rules:
    /// whitespace or a comment.
    #[must_use]
    pub const fn is_trivia(self) -> bool {
        matches!(self, Self::Whitespace | Self::Comment)
    }
}

/// One token as a value: kind, half-open byte range, and position.
///
/// Tokens are snapshots of the lexer's in-place current-token fields; they
/// do not borrow the lexer and are plain `Copy` data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Token {
    /// The token kind.
    pub kind: TokenKind,
    /// Byte offset of the token's first byte.
    pub start: usize,
    /// Half-open byte offset just past the token.
    pub end: usize,
    /// 1-based line of the token's first byte.
    pub line: u32,
    /// 1-based byte column of the token's first byte.
    pub column: u32,
    /// For [`TokenKind::Hash`]: whether the name after `#` would start an
    /// ident sequence ("type flag set to 'id'"). Always false otherwise.
    pub id_hash: bool,
}

impl Token {
    /// The token's source text.
    #[must_use]
    pub fn text<'src>(&self, source: &'src str) -> &'src str {
        source.get(self.start..self.end).unwrap_or("")
    }

    /// Byte length of the token.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the token is zero-length (only `Eof`).
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}:{}..{}>", self.kind, self.start, self.end)
    }
}
