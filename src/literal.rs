// Literal decoding
//
// Turns literal token text into values:
// - Integers: decimal, hex (0x), binary (0b), octal (0o and legacy leading 0)
// - Floats: standard f64 parsing of the numeral text
// - Strings: quote stripping plus the two escapes that affect quote matching
//
// Double-quoted strings only resolve `\"` and `\\`. Every other backslash
// sequence is kept verbatim for the evaluator, which owns the full escape
// table.

use crate::{
    Span,
    error::{Error, Result},
};

//==============================================================================
// Numbers
//==============================================================================

/// Decode an integer literal into an i64.
///
/// A leading `0` followed only by octal digits is octal (`017` is 15); if any
/// digit is 8 or 9 the literal is decimal (`019` is 19). Overflow and
/// malformed digits fail with `InvalidLiteral`.
pub fn parse_integer(text: &str, span: Span) -> Result<i64> {
    let invalid = || Error::invalid_literal(span, "integer", text);

    let (digits, radix) = if let Some(hex) = strip_prefix_ci(text, "0x") {
        (hex, 16)
    } else if let Some(bin) = strip_prefix_ci(text, "0b") {
        (bin, 2)
    } else if let Some(oct) = strip_prefix_ci(text, "0o") {
        (oct, 8)
    } else if text.len() > 1
        && text.starts_with('0')
        && text.bytes().all(|b| matches!(b, b'0'..=b'7'))
    {
        (&text[1..], 8)
    } else {
        (text, 10)
    };

    // from_str_radix accepts a leading sign, the grammar never produces one
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_alphanumeric()) {
        return Err(invalid());
    }
    i64::from_str_radix(digits, radix).map_err(|_| invalid())
}

/// Decode a float literal.
///
/// A literal too large for `f64` is rejected rather than rounded to infinity,
/// which has no source form.
pub fn parse_float(text: &str, span: Span) -> Result<f64> {
    text.parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| Error::invalid_literal(span, "float", text))
}

fn strip_prefix_ci<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let head = text.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &text[prefix.len()..])
}

//==============================================================================
// Strings
//==============================================================================

/// Decode a quoted string literal, including its quotes.
///
/// Returns `None` if `text` is not wrapped in matching `"` or `'` quotes.
pub fn decode_string(text: &str) -> Option<String> {
    if let Some(body) = text.strip_prefix('"').and_then(|t| t.strip_suffix('"')) {
        Some(unescape_double_quoted(body))
    } else {
        text.strip_prefix('\'')
            .and_then(|t| t.strip_suffix('\''))
            .map(unescape_single_quoted)
    }
}

/// Resolve `\"` and `\\` in the body of a double-quoted string, in one pass.
pub fn unescape_double_quoted(body: &str) -> String {
    // Fast path: no escapes
    if !body.contains('\\') {
        return body.to_string();
    }

    let mut result = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            if let Some(&next @ ('"' | '\\')) = chars.peek() {
                result.push(next);
                chars.next();
                continue;
            }
        }
        result.push(ch);
    }
    result
}

/// Resolve `''` in the body of a single-quoted string.
pub fn unescape_single_quoted(body: &str) -> String {
    body.replace("''", "'")
}

/// Whether `text` can stand as a key after `.` or in `#{...}`.
pub fn is_literal_dict_key(text: &str) -> bool {
    !text.is_empty()
        && text
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(text: &str) -> Result<i64> {
        parse_integer(text, Span::new(0, text.len()))
    }

    macro_rules! test_cases {
        ($($name:ident: $text:expr => $expected:expr),* $(,)?) => {
            $(
                #[test]
                fn $name() {
                    assert_eq!(int($text).ok(), $expected);
                }
            )*
        };
    }

    test_cases! {
        test_decimal: "42" => Some(42),
        test_zero: "0" => Some(0),
        test_hex: "0x1F" => Some(31),
        test_hex_upper_prefix: "0XfF" => Some(255),
        test_binary: "0b1011" => Some(11),
        test_octal_prefixed: "0o17" => Some(15),
        test_octal_legacy: "017" => Some(15),
        test_legacy_octal_with_nine_is_decimal: "019" => Some(19),
        test_max: "9223372036854775807" => Some(i64::MAX),
        test_overflow: "9223372036854775808" => None,
        test_hex_overflow: "0x10000000000000000" => None,
        test_empty_hex: "0x" => None,
        test_bad_binary_digit: "0b102" => None,
        test_signed_digits: "0x-1" => None,
    }

    #[test]
    fn invalid_integer_reports_text_and_span() {
        match parse_integer("0x", Span::new(3, 5)) {
            Err(Error::InvalidLiteral { span, kind, text }) => {
                assert_eq!(span, Span::new(3, 5));
                assert_eq!(kind, "integer");
                assert_eq!(text, "0x");
            }
            other => panic!("expected invalid literal, got {other:?}"),
        }
    }

    #[test]
    fn floats() {
        let span = Span::default();
        assert_eq!(parse_float("2.5", span).ok(), Some(2.5));
        assert_eq!(parse_float("1.5e-3", span).ok(), Some(0.0015));
        assert_eq!(parse_float("2.0E2", span).ok(), Some(200.0));
        assert!(parse_float("1.2.3", span).is_err());
        assert!(matches!(
            parse_float("1.0e999", span),
            Err(Error::InvalidLiteral { kind: "float", .. })
        ));
        assert_eq!(parse_float("1.0e-999", span).ok(), Some(0.0));
    }

    #[test]
    fn double_quoted_escapes_resolve_once() {
        assert_eq!(unescape_double_quoted(r#"say \"hi\""#), r#"say "hi""#);
        assert_eq!(unescape_double_quoted(r"a\\b"), r"a\b");
        // `\\\"` is an escaped backslash then an escaped quote
        assert_eq!(unescape_double_quoted(r#"\\\""#), r#"\""#);
        // `\\n` is an escaped backslash followed by a plain n
        assert_eq!(unescape_double_quoted(r"\\n"), r"\n");
    }

    #[test]
    fn other_escapes_stay_verbatim() {
        assert_eq!(unescape_double_quoted(r"tab\there\n"), r"tab\there\n");
        assert_eq!(unescape_double_quoted(r"\<CR>"), r"\<CR>");
        assert_eq!(unescape_double_quoted("trailing\\"), "trailing\\");
    }

    #[test]
    fn decoded_text_without_escapes_is_unchanged() {
        for text in ["plain", "it's", "", "ünïcödé"] {
            assert_eq!(unescape_double_quoted(text), text);
            assert_eq!(unescape_single_quoted(text), text);
        }
    }

    #[test]
    fn single_quoted_doubles_collapse_once() {
        assert_eq!(unescape_single_quoted("it''s"), "it's");
        assert_eq!(unescape_single_quoted("''''"), "''");
        assert_eq!(unescape_single_quoted(r"no\escapes"), r"no\escapes");
    }

    #[test]
    fn decode_string_dispatches_on_quote() {
        assert_eq!(decode_string(r#""a\"b""#).as_deref(), Some(r#"a"b"#));
        assert_eq!(decode_string("'a''b'").as_deref(), Some("a'b"));
        assert_eq!(decode_string("''").as_deref(), Some(""));
        assert_eq!(decode_string("noquotes"), None);
        assert_eq!(decode_string("\"mismatched'"), None);
    }

    #[test]
    fn literal_dict_keys() {
        assert!(is_literal_dict_key("key"));
        assert!(is_literal_dict_key("one-two_3"));
        assert!(is_literal_dict_key("42"));
        assert!(!is_literal_dict_key(""));
        assert!(!is_literal_dict_key("a b"));
        assert!(!is_literal_dict_key("f(1)"));
        assert!(!is_literal_dict_key("g:x"));
    }
}
