//! [§ 4.3 Tokenizer Algorithms](https://www.w3.org/TR/css-syntax-3/#tokenizer-algorithms)
//!
//! A single-pass, non-allocating CSS lexer. The "current token" is a set of
//! fields updated in place by [`Lexer::next_token`]; callers snapshot it as
//! a [`Token`] value when they need it to outlive the next advance.
//!
//! The lexer can be seeded at an arbitrary byte offset with a line/column
//! hint and bounded by a hard `limit`, which is how the selector, prelude,
//! and value sub-parsers re-tokenize ranges of the same source without
//! copying. Its complete scan state can be saved and restored, which is how
//! the declaration parser rewinds after a failed attempt.

use super::chars;
use super::token::{Token, TokenKind};

/// A restorable snapshot of the lexer's scan state and current token.
#[derive(Debug, Clone, Copy)]
pub struct LexerState {
    pos: usize,
    line: u32,
    line_start: usize,
    kind: TokenKind,
    token_start: usize,
    token_line: u32,
    token_column: u32,
    id_hash: bool,
}

/// The CSS tokenizer.
#[derive(Debug)]
pub struct Lexer<'src> {
    source: &'src str,
    /// Hard end of the scanned range; everything past it reads as EOF.
    limit: usize,
    /// Next byte to scan. Doubles as the end of the current token.
    pos: usize,
    /// 1-based line at `pos`, advanced on every consumed line feed.
    line: u32,
    /// Byte offset where the line containing `pos` starts.
    line_start: usize,
    skip_comments: bool,

    // Current token, updated in place by `next_token`.
    kind: TokenKind,
    token_start: usize,
    token_line: u32,
    token_column: u32,
    id_hash: bool,
}

impl<'src> Lexer<'src> {
    /// Tokenizer over a whole source, positioned at its first token.
    #[must_use]
    pub fn new(source: &'src str, skip_comments: bool) -> Self {
        Self::at(source, 0, 1, 1, source.len(), skip_comments)
    }

    /// Tokenizer over `source[start..limit]`, seeded with the line/column
    /// of `start`, positioned at its first token.
    ///
    /// Byte offsets in emitted tokens are offsets into the full `source`,
    /// so nodes built from a re-tokenized range still index the original
    /// text.
    #[must_use]
    pub fn at(
        source: &'src str,
        start: usize,
        line: u32,
        column: u32,
        limit: usize,
        skip_comments: bool,
    ) -> Self {
        let limit = limit.min(source.len());
        let start = start.min(limit);
        let mut lexer = Self {
            source,
            limit,
            pos: start,
            line,
            line_start: start.saturating_sub(column.max(1) as usize - 1),
            skip_comments,
            kind: TokenKind::Eof,
            token_start: start,
            token_line: line,
            token_column: column,
            id_hash: false,
        };
        lexer.next_token();
        lexer
    }

    /// The source this lexer scans.
    #[must_use]
    pub const fn source(&self) -> &'src str {
        self.source
    }

    /// Kind of the current token.
    #[must_use]
    pub const fn kind(&self) -> TokenKind {
        self.kind
    }

    /// Byte offset of the current token's first byte.
    #[must_use]
    pub const fn start(&self) -> usize {
        self.token_start
    }

    /// Half-open byte offset just past the current token.
    #[must_use]
    pub const fn end(&self) -> usize {
        self.pos
    }

    /// 1-based line of the current token.
    #[must_use]
    pub const fn line(&self) -> u32 {
        self.token_line
    }

    /// 1-based byte column of the current token.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.token_column
    }

    /// For a `Hash` token: whether its name would start an ident sequence.
    #[must_use]
    pub const fn id_hash(&self) -> bool {
        self.id_hash
    }

    /// The current token's source text.
    #[must_use]
    pub fn text(&self) -> &'src str {
        self.source.get(self.token_start..self.end()).unwrap_or("")
    }

    /// First byte of the current token, the code point of a `Delim` token.
    #[must_use]
    pub fn first_byte(&self) -> Option<u8> {
        self.source.as_bytes().get(self.token_start).copied()
    }

    /// Snapshot the current token as a value.
    #[must_use]
    pub const fn token(&self) -> Token {
        Token {
            kind: self.kind,
            start: self.token_start,
            end: self.end(),
            line: self.token_line,
            column: self.token_column,
            id_hash: self.id_hash,
        }
    }

    /// Save the complete scan state for a later [`Lexer::restore`].
    #[must_use]
    pub const fn state(&self) -> LexerState {
        LexerState {
            pos: self.pos,
            line: self.line,
            line_start: self.line_start,
            kind: self.kind,
            token_start: self.token_start,
            token_line: self.token_line,
            token_column: self.token_column,
            id_hash: self.id_hash,
        }
    }

    /// Rewind to a previously saved state.
    pub fn restore(&mut self, state: LexerState) {
        self.pos = state.pos;
        self.line = state.line;
        self.line_start = state.line_start;
        self.kind = state.kind;
        self.token_start = state.token_start;
        self.token_line = state.token_line;
        self.token_column = state.token_column;
        self.id_hash = state.id_hash;
    }

    // ── Low-level scanning ────────────────────────────────────────────

    fn peek(&self) -> Option<u8> {
        self.peek_at(0)
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        let index = self.pos + offset;
        if index < self.limit {
            Some(self.source.as_bytes()[index])
        } else {
            None
        }
    }

    /// Consume and return the next byte, counting line feeds.
    fn bump(&mut self) -> Option<u8> {
        let byte = self.peek()?;
        self.pos += 1;
        if byte == b'\n' {
            self.line += 1;
            self.line_start = self.pos;
        }
        Some(byte)
    }

    /// Put back the last consumed byte. Only valid for bytes that are not
    /// line feeds; the dispatcher never reconsumes a newline.
    fn reconsume(&mut self) {
        self.pos -= 1;
    }

    // ── Token dispatch ────────────────────────────────────────────────

    /// [§ 4.3.1 Consume a token](https://www.w3.org/TR/css-syntax-3/#consume-token)
    ///
    /// Advance the current-token fields one token forward. At end of input
    /// the token becomes `Eof` and stays there. When comment skipping is
    /// on, comment tokens are consumed internally and never surfaced.
    pub fn next_token(&mut self) {
        loop {
            self.token_start = self.pos;
            self.token_line = self.line;
            self.token_column = (self.pos - self.line_start + 1) as u32;
            self.id_hash = false;

            let Some(byte) = self.bump() else {
                self.kind = TokenKind::Eof;
                return;
            };

            self.kind = match byte {
                // "Consume comments."
                b'/' if self.peek() == Some(b'*') => {
                    self.consume_comment();
                    if self.skip_comments {
                        continue;
                    }
                    TokenKind::Comment
                }

                // "whitespace: Consume as much whitespace as possible.
                // Return a <whitespace-token>."
                byte if chars::is_whitespace(byte) => {
                    self.consume_whitespace();
                    TokenKind::Whitespace
                }

                // "U+0022 QUOTATION MARK (\") / U+0027 APOSTROPHE (')
                // Consume a string token and return it."
                quote @ (b'"' | b'\'') => self.consume_string(quote),

                // "U+0023 NUMBER SIGN (#)"
                b'#' => {
                    // "If the next input code point is an ident code point
                    // or the next two input code points are a valid
                    // escape..."
                    if self.peek().is_some_and(chars::is_name)
                        || chars::is_valid_escape(self.peek(), self.peek_at(1))
                    {
                        // "If the next 3 input code points would start an
                        // ident sequence, set the <hash-token>'s type flag
                        // to 'id'."
                        self.id_hash = chars::starts_identifier(
                            self.peek(),
                            self.peek_at(1),
                            self.peek_at(2),
                        );
                        self.consume_name();
                        TokenKind::Hash
                    } else {
                        TokenKind::Delim
                    }
                }

                b'(' => TokenKind::LeftParen,
                b')' => TokenKind::RightParen,
                b'[' => TokenKind::LeftBracket,
                b']' => TokenKind::RightBracket,
                b'{' => TokenKind::LeftBrace,
                b'}' => TokenKind::RightBrace,
                b',' => TokenKind::Comma,
                b':' => TokenKind::Colon,
                b';' => TokenKind::Semicolon,

                // "U+002B PLUS SIGN (+): If the input stream starts with a
                // number, reconsume and consume a numeric token."
                b'+' => {
                    if chars::starts_number(Some(b'+'), self.peek(), self.peek_at(1)) {
                        self.reconsume();
                        self.consume_numeric()
                    } else {
                        TokenKind::Delim
                    }
                }

                // "U+002D HYPHEN-MINUS (-)"
                b'-' => {
                    if chars::starts_number(Some(b'-'), self.peek(), self.peek_at(1)) {
                        self.reconsume();
                        self.consume_numeric()
                    } else if self.peek() == Some(b'-') && self.peek_at(1) == Some(b'>') {
                        // "If the next 2 input code points are
                        // U+002D U+003E (->), consume them. Return a
                        // <CDC-token>."
                        let _ = self.bump();
                        let _ = self.bump();
                        TokenKind::Cdc
                    } else if chars::starts_identifier(Some(b'-'), self.peek(), self.peek_at(1)) {
                        self.reconsume();
                        self.consume_ident_like()
                    } else {
                        TokenKind::Delim
                    }
                }

                // "U+002E FULL STOP (.)"
                b'.' => {
                    if chars::starts_number(Some(b'.'), self.peek(), self.peek_at(1)) {
                        self.reconsume();
                        self.consume_numeric()
                    } else {
                        TokenKind::Delim
                    }
                }

                // "U+003C LESS-THAN SIGN (<): If the next 3 input code
                // points are U+0021 U+002D U+002D (!--), consume them.
                // Return a <CDO-token>."
                b'<' => {
                    if self.peek() == Some(b'!')
                        && self.peek_at(1) == Some(b'-')
                        && self.peek_at(2) == Some(b'-')
                    {
                        let _ = self.bump();
                        let _ = self.bump();
                        let _ = self.bump();
                        TokenKind::Cdo
                    } else {
                        TokenKind::Delim
                    }
                }

                // "U+0040 COMMERCIAL AT (@): If the next 3 input code
                // points would start an ident sequence, consume an ident
                // sequence. Return an <at-keyword-token>."
                b'@' => {
                    if chars::starts_identifier(self.peek(), self.peek_at(1), self.peek_at(2)) {
                        self.consume_name();
                        TokenKind::AtKeyword
                    } else {
                        TokenKind::Delim
                    }
                }

                // "U+005C REVERSE SOLIDUS (\\): If the input stream starts
                // with a valid escape, reconsume and consume an ident-like
                // token."
                b'\\' => {
                    if chars::is_valid_escape(Some(b'\\'), self.peek()) {
                        self.reconsume();
                        self.consume_ident_like()
                    } else {
                        // "This is a parse error."
                        TokenKind::Delim
                    }
                }

                // "digit: Reconsume. Consume a numeric token."
                byte if chars::is_digit(byte) => {
                    self.reconsume();
                    self.consume_numeric()
                }

                // "ident-start code point: Reconsume. Consume an ident-like
                // token."
                byte if chars::is_name_start(byte) => {
                    self.reconsume();
                    self.consume_ident_like()
                }

                // "anything else: Return a <delim-token>."
                _ => TokenKind::Delim,
            };
            return;
        }
    }

    // ── Per-state consumers ───────────────────────────────────────────

    /// [§ 4.3.2 Consume comments](https://www.w3.org/TR/css-syntax-3/#consume-comment)
    ///
    /// Entered with `/` consumed and `*` pending. Consumes through the
    /// closing `*/`, or to end of input for an unterminated comment.
    fn consume_comment(&mut self) {
        let _ = self.bump(); // *
        while let Some(byte) = self.bump() {
            if byte == b'*' && self.peek() == Some(b'/') {
                let _ = self.bump();
                return;
            }
        }
    }

    /// Consume a run of whitespace.
    fn consume_whitespace(&mut self) {
        while self.peek().is_some_and(chars::is_whitespace) {
            let _ = self.bump();
        }
    }

    /// [§ 4.3.5 Consume a string token](https://www.w3.org/TR/css-syntax-3/#consume-string-token)
    ///
    /// Entered with the opening quote consumed.
    fn consume_string(&mut self, quote: u8) -> TokenKind {
        loop {
            match self.peek() {
                // "EOF: This is a parse error. Return the <string-token>."
                None => return TokenKind::String,

                // "ending code point: Return the <string-token>."
                Some(byte) if byte == quote => {
                    let _ = self.bump();
                    return TokenKind::String;
                }

                // "newline: This is a parse error." Recover by scanning
                // through the closing quote on a later line, or to end of
                // input, and surface the whole run as <bad-string-token>.
                Some(byte) if chars::is_newline(byte) => return self.consume_bad_string(quote),

                // "U+005C REVERSE SOLIDUS (\\)"
                Some(b'\\') => {
                    let _ = self.bump();
                    match self.peek() {
                        // "If the next input code point is EOF, do nothing."
                        None => {}
                        // "Otherwise, if the next input code point is a
                        // newline, consume it." (An escaped newline
                        // continues the string.)
                        Some(b'\r') => {
                            let _ = self.bump();
                            if self.peek() == Some(b'\n') {
                                let _ = self.bump();
                            }
                        }
                        Some(byte) if chars::is_newline(byte) => {
                            let _ = self.bump();
                        }
                        // "Otherwise, consume an escaped code point."
                        Some(_) => self.consume_escaped(),
                    }
                }

                Some(_) => {
                    let _ = self.bump();
                }
            }
        }
    }

    /// Recovery tail of a string with a raw newline in it: consume up to
    /// and including the next unescaped `quote`, or to end of input.
    fn consume_bad_string(&mut self, quote: u8) -> TokenKind {
        while let Some(byte) = self.bump() {
            if byte == quote {
                break;
            }
            if byte == b'\\' {
                let _ = self.bump();
            }
        }
        TokenKind::BadString
    }

    /// [§ 4.3.7 Consume an escaped code point](https://www.w3.org/TR/css-syntax-3/#consume-escaped-code-point)
    ///
    /// Entered with `\` consumed and a non-newline code point pending.
    /// Positions only: the escape's source bytes stay in the token; text
    /// extraction of escaped names is the caller's concern.
    fn consume_escaped(&mut self) {
        match self.peek() {
            // "hex digit: Consume as many hex digits as possible, but no
            // more than 5 [more]. If the next input code point is
            // whitespace, consume it as well."
            Some(byte) if chars::is_hex_digit(byte) => {
                let mut digits = 0;
                while digits < 6 && self.peek().is_some_and(chars::is_hex_digit) {
                    let _ = self.bump();
                    digits += 1;
                }
                match self.peek() {
                    // A \r\n pair after the hex digits is one whitespace.
                    Some(b'\r') => {
                        let _ = self.bump();
                        if self.peek() == Some(b'\n') {
                            let _ = self.bump();
                        }
                    }
                    Some(byte) if chars::is_whitespace(byte) => {
                        let _ = self.bump();
                    }
                    _ => {}
                }
            }
            // "anything else: Return the current input code point." Consume
            // the whole code point, continuation bytes included.
            Some(_) => {
                let _ = self.bump();
                while self.peek().is_some_and(|byte| byte & 0xC0 == 0x80) {
                    let _ = self.bump();
                }
            }
            None => {}
        }
    }

    /// [§ 4.3.11 Consume an ident sequence](https://www.w3.org/TR/css-syntax-3/#consume-name)
    fn consume_name(&mut self) {
        loop {
            match self.peek() {
                Some(byte) if chars::is_name(byte) => {
                    let _ = self.bump();
                }
                Some(b'\\') if chars::is_valid_escape(Some(b'\\'), self.peek_at(1)) => {
                    let _ = self.bump();
                    self.consume_escaped();
                }
                _ => return,
            }
        }
    }

    /// [§ 4.3.4 Consume an ident-like token](https://www.w3.org/TR/css-syntax-3/#consume-ident-like-token)
    fn consume_ident_like(&mut self) -> TokenKind {
        let name_start = self.pos;
        self.consume_name();
        let name = self.source.get(name_start..self.pos).unwrap_or("");

        // "If string's value is an ASCII case-insensitive match for 'url',
        // and the next input code point is U+0028 LEFT PARENTHESIS (()..."
        if name.eq_ignore_ascii_case("url") && self.peek() == Some(b'(') {
            let _ = self.bump();

            // "If the next one or two input code points are [whitespace
            // followed by] U+0022 QUOTATION MARK or U+0027 APOSTROPHE,
            // return a <function-token>." The whitespace stays unconsumed;
            // the string becomes its own token inside the function.
            let mut ahead = 0;
            while self.peek_at(ahead).is_some_and(chars::is_whitespace) {
                ahead += 1;
            }
            if matches!(self.peek_at(ahead), Some(b'"' | b'\'')) {
                TokenKind::Function
            } else {
                // "Otherwise, consume a url token."
                self.consume_url()
            }
        } else if self.peek() == Some(b'(') {
            let _ = self.bump();
            TokenKind::Function
        } else {
            TokenKind::Ident
        }
    }

    /// [§ 4.3.6 Consume a url token](https://www.w3.org/TR/css-syntax-3/#consume-url-token)
    ///
    /// Entered with `url(` consumed.
    fn consume_url(&mut self) -> TokenKind {
        // "Consume as much whitespace as possible."
        self.consume_whitespace();

        loop {
            match self.peek() {
                // "EOF: This is a parse error. Return the <url-token>."
                None => return TokenKind::Url,

                // "U+0029 RIGHT PARENTHESIS ()): Return the <url-token>."
                Some(b')') => {
                    let _ = self.bump();
                    return TokenKind::Url;
                }

                // "whitespace: Consume as much whitespace as possible. If
                // the next input code point is U+0029 or EOF, consume it
                // and return the <url-token>; otherwise consume the
                // remnants of a bad url."
                Some(byte) if chars::is_whitespace(byte) => {
                    self.consume_whitespace();
                    match self.peek() {
                        Some(b')') => {
                            let _ = self.bump();
                            return TokenKind::Url;
                        }
                        None => return TokenKind::Url,
                        Some(_) => return self.consume_bad_url(),
                    }
                }

                // "U+0022, U+0027, U+0028, non-printable code point: This
                // is a parse error. Consume the remnants of a bad url."
                Some(b'"' | b'\'' | b'(') => return self.consume_bad_url(),
                Some(byte) if chars::is_non_printable(byte) => return self.consume_bad_url(),

                // "U+005C REVERSE SOLIDUS (\\): If the stream starts with a
                // valid escape, consume an escaped code point. Otherwise,
                // this is a parse error; consume the remnants of a bad
                // url."
                Some(b'\\') => {
                    if chars::is_valid_escape(Some(b'\\'), self.peek_at(1)) {
                        let _ = self.bump();
                        self.consume_escaped();
                    } else {
                        return self.consume_bad_url();
                    }
                }

                Some(_) => {
                    let _ = self.bump();
                }
            }
        }
    }

    /// [§ 4.3.14 Consume the remnants of a bad url](https://www.w3.org/TR/css-syntax-3/#consume-remnants-of-bad-url)
    ///
    /// "Consume code points up to the next U+0029 RIGHT PARENTHESIS ()) or
    /// EOF, consuming escaped code points so an escaped right parenthesis
    /// does not end the token."
    fn consume_bad_url(&mut self) -> TokenKind {
        loop {
            match self.bump() {
                None | Some(b')') => return TokenKind::BadUrl,
                Some(b'\\') => {
                    if self.peek().is_some() {
                        self.consume_escaped();
                    }
                }
                Some(_) => {}
            }
        }
    }

    /// [§ 4.3.3 Consume a numeric token](https://www.w3.org/TR/css-syntax-3/#consume-numeric-token)
    fn consume_numeric(&mut self) -> TokenKind {
        self.consume_number();

        // "If the next 3 input code points would start an ident sequence,
        // consume it: the result is a <dimension-token>."
        if chars::starts_identifier(self.peek(), self.peek_at(1), self.peek_at(2)) {
            self.consume_name();
            TokenKind::Dimension
        } else if self.peek() == Some(b'%') {
            let _ = self.bump();
            TokenKind::Percentage
        } else {
            TokenKind::Number
        }
    }

    /// [§ 4.3.12 Consume a number](https://www.w3.org/TR/css-syntax-3/#consume-number)
    ///
    /// Sign, integer part, optional fraction, optional exponent. Positions
    /// only; numeric conversion is the consumer's concern.
    fn consume_number(&mut self) {
        if matches!(self.peek(), Some(b'+' | b'-')) {
            let _ = self.bump();
        }
        self.consume_digits();

        if self.peek() == Some(b'.') && self.peek_at(1).is_some_and(chars::is_digit) {
            let _ = self.bump();
            let _ = self.bump();
            self.consume_digits();
        }

        if matches!(self.peek(), Some(b'e' | b'E')) {
            let after_sign = match self.peek_at(1) {
                Some(b'+' | b'-') => 2,
                _ => 1,
            };
            if self.peek_at(after_sign).is_some_and(chars::is_digit) {
                for _ in 0..=after_sign {
                    let _ = self.bump();
                }
                self.consume_digits();
            }
        }
    }

    fn consume_digits(&mut self) {
        while self.peek().is_some_and(chars::is_digit) {
            let _ = self.bump();
        }
    }
}
