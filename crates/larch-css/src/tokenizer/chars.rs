//! [§ 4.2 Definitions](https://www.w3.org/TR/css-syntax-3/#tokenizer-definitions)
//!
//! Code-point classification for the tokenizer, as pure byte predicates.
//!
//! The lexer scans raw UTF-8 bytes. This is safe because CSS gives every
//! code point at or above U+0080 the same classification (a name code
//! point), and UTF-8 continuation bytes all fall in `0x80..=0xBF`: a
//! multi-byte sequence is consumed as an unbroken run of name bytes, so a
//! token boundary can never split a code point.

/// [§ 4.2 Definitions - whitespace](https://www.w3.org/TR/css-syntax-3/#whitespace)
///
/// "A newline, U+0009 CHARACTER TABULATION, or U+0020 SPACE."
#[inline]
#[must_use]
pub const fn is_whitespace(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\r' | 0x0C)
}

/// [§ 4.2 Definitions - newline](https://www.w3.org/TR/css-syntax-3/#newline)
///
/// "U+000A LINE FEED. Note that U+000D CARRIAGE RETURN and U+000C FORM FEED
/// are not included in this definition, as they are converted to U+000A
/// during preprocessing." This lexer does not preprocess, so it classifies
/// all three directly.
#[inline]
#[must_use]
pub const fn is_newline(byte: u8) -> bool {
    matches!(byte, b'\n' | b'\r' | 0x0C)
}

/// [§ 4.2 Definitions - digit](https://www.w3.org/TR/css-syntax-3/#digit)
#[inline]
#[must_use]
pub const fn is_digit(byte: u8) -> bool {
    byte.is_ascii_digit()
}

/// [§ 4.2 Definitions - hex digit](https://www.w3.org/TR/css-syntax-3/#hex-digit)
#[inline]
#[must_use]
pub const fn is_hex_digit(byte: u8) -> bool {
    byte.is_ascii_hexdigit()
}

/// [§ 4.2 Definitions - ident-start code point](https://www.w3.org/TR/css-syntax-3/#ident-start-code-point)
///
/// "A letter, a non-ASCII code point, or U+005F LOW LINE (_)."
#[inline]
#[must_use]
pub const fn is_name_start(byte: u8) -> bool {
    byte.is_ascii_alphabetic() || byte == b'_' || byte >= 0x80
}

/// [§ 4.2 Definitions - ident code point](https://www.w3.org/TR/css-syntax-3/#ident-code-point)
///
/// "An ident-start code point, a digit, or U+002D HYPHEN-MINUS (-)."
#[inline]
#[must_use]
pub const fn is_name(byte: u8) -> bool {
    is_name_start(byte) || byte.is_ascii_digit() || byte == b'-'
}

/// [§ 4.2 Definitions - non-printable code point](https://www.w3.org/TR/css-syntax-3/#non-printable-code-point)
///
/// "A code point between U+0000 NULL and U+0008 BACKSPACE inclusive, or
/// U+000B LINE TABULATION, or a code point between U+000E SHIFT OUT and
/// U+001F INFORMATION SEPARATOR ONE inclusive, or U+007F DELETE."
#[inline]
#[must_use]
pub const fn is_non_printable(byte: u8) -> bool {
    matches!(byte, 0x00..=0x08 | 0x0B | 0x0E..=0x1F | 0x7F)
}

/// [§ 4.3.8 Check if two code points are a valid escape](https://www.w3.org/TR/css-syntax-3/#starts-with-a-valid-escape)
///
/// "If the first code point is not U+005C REVERSE SOLIDUS (\\), return
/// false. Otherwise, if the second code point is a newline, return false.
/// Otherwise, return true."
#[inline]
#[must_use]
pub const fn is_valid_escape(first: Option<u8>, second: Option<u8>) -> bool {
    match first {
        Some(b'\\') => match second {
            Some(byte) => !is_newline(byte),
            None => true,
        },
        _ => false,
    }
}

/// [§ 4.3.9 Check if three code points would start an ident sequence](https://www.w3.org/TR/css-syntax-3/#would-start-an-identifier)
#[must_use]
pub const fn starts_identifier(first: Option<u8>, second: Option<u8>, third: Option<u8>) -> bool {
    match first {
        // "U+002D HYPHEN-MINUS: If the second code point is an ident-start
        // code point or a U+002D HYPHEN-MINUS, or the second and third code
        // points are a valid escape, return true."
        Some(b'-') => match second {
            Some(b'-') => true,
            Some(byte) if is_name_start(byte) => true,
            _ => is_valid_escape(second, third),
        },
        // "ident-start code point: Return true."
        Some(byte) if is_name_start(byte) => true,
        // "U+005C REVERSE SOLIDUS (\\): If the first and second code points
        // are a valid escape, return true."
        Some(b'\\') => is_valid_escape(first, second),
        // "anything else: Return false."
        _ => false,
    }
}

/// [§ 4.3.10 Check if three code points would start a number](https://www.w3.org/TR/css-syntax-3/#starts-with-a-number)
#[must_use]
pub const fn starts_number(first: Option<u8>, second: Option<u8>, third: Option<u8>) -> bool {
    match first {
        // "U+002B PLUS SIGN (+) or U+002D HYPHEN-MINUS (-): If the second
        // code point is a digit, return true. Otherwise, if the second code
        // point is U+002E FULL STOP (.) and the third code point is a
        // digit, return true."
        Some(b'+' | b'-') => match second {
            Some(byte) if byte.is_ascii_digit() => true,
            Some(b'.') => matches!(third, Some(byte) if byte.is_ascii_digit()),
            _ => false,
        },
        // "U+002E FULL STOP (.): If the second code point is a digit,
        // return true."
        Some(b'.') => matches!(second, Some(byte) if byte.is_ascii_digit()),
        // "digit: Return true."
        Some(byte) => byte.is_ascii_digit(),
        None => false,
    }
}
