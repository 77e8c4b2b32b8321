//! Decode the text of literal tokens into values.
//!
//! Numerals are accepted in these shapes, where `W` is a decimal width:
//!
//! | Literal | Example | Value |
//! |---|---|---|
//! | integer | `-123`, `0x7f`, `0o17`, `0b101` | [`Value::Int`] |
//! | word | `12'0x7f`, `12'-1` | [`Value::Word`] |
//! | array | `W'(1 2)`, `W'0x(ff 0)`, `W'"text"` | [`Value::Array`] |
//! | character | `'a'`, `8''\x41'` | [`Value::Int`] or [`Value::Word`] |
use num_bigint::{BigInt, BigUint};

use crate::error::ErrorKind;
use crate::escape::unescape;
use crate::value::{self, Array, Value, Word};

/// Parses the digits of a number in the given radix.
///
/// Decimal numbers may only start with `0` if they are exactly `0`.
fn parse_digits(digits: &str, radix: u32) -> Result<BigUint, ErrorKind> {
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        let leading_zero = radix == 10
            && digits.len() > 1
            && digits.starts_with('0')
            && digits.bytes().all(|b| b.is_ascii_digit());
        return Err(if leading_zero {
            ErrorKind::LeadingZeroDecimal
        } else {
            ErrorKind::InvalidNumericLiteral
        });
    }
    if radix == 10 && digits.len() > 1 && digits.starts_with('0') {
        return Err(ErrorKind::LeadingZeroDecimal);
    }
    BigUint::parse_bytes(digits.as_bytes(), radix).ok_or(ErrorKind::InvalidNumericLiteral)
}

/// Decodes an integer literal: an optional `-`, then a decimal number or
/// a `0x`, `0o` or `0b` prefixed one.
pub fn decode_int(text: &str) -> Result<BigInt, ErrorKind> {
    let (negative, unsigned) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };

    let (radix, digits) = match unsigned.get(..2) {
        Some("0x") => (16, &unsigned[2..]),
        Some("0o") => (8, &unsigned[2..]),
        Some("0b") => (2, &unsigned[2..]),
        _ => (10, unsigned),
    };

    let magnitude = BigInt::from(parse_digits(digits, radix)?);
    Ok(if negative { -magnitude } else { magnitude })
}

/// Decodes the width of a word or array. Leading zeros are allowed.
pub fn decode_width(text: &str) -> Result<usize, ErrorKind> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ErrorKind::InvalidWidth);
    }
    match text.parse::<usize>() {
        Ok(0) | Err(_) => Err(ErrorKind::InvalidWidth),
        Ok(width) => Ok(width),
    }
}

/// Applies the width range rule to a signed value.
fn word(width: usize, value: &BigInt) -> Result<Word, ErrorKind> {
    Word::from_signed(width, value).ok_or(ErrorKind::IntegerOutOfWidthRange)
}

/// Decodes a word literal such as `12'-0x123`.
pub fn decode_word(text: &str) -> Result<Word, ErrorKind> {
    let (width, number) = text
        .split_once('\'')
        .ok_or(ErrorKind::InvalidNumericLiteral)?;
    let width = decode_width(width)?;
    word(width, &decode_int(number)?)
}

/// Decodes one element of an array literal written in `radix`.
///
/// Elements are unsigned; the width range rule still applies.
pub fn decode_array_item(width: usize, radix: u32, text: &str) -> Result<BigUint, ErrorKind> {
    if text.starts_with('-') {
        return Err(ErrorKind::InvalidNumericLiteral);
    }
    let item = BigInt::from(parse_digits(text, radix)?);
    value::reduce(width, &item).ok_or(ErrorKind::IntegerOutOfWidthRange)
}

/// Builds an array from the code points of a decoded string.
pub fn decode_string_array(width: usize, text: &str) -> Result<Array, ErrorKind> {
    Array::from_str_codes(width, text).ok_or(ErrorKind::CodePointExceedsWidth)
}

/// Decodes a character literal, `'c'` or `W''c'`.
pub fn decode_char(text: &str) -> Result<Value, ErrorKind> {
    let (width, quoted) = match text.strip_prefix('\'') {
        Some(rest) => (None, rest),
        None => {
            let (width, rest) = text
                .split_once("''")
                .ok_or(ErrorKind::InvalidCharLiteral)?;
            (Some(width), rest)
        }
    };
    let body = quoted
        .strip_suffix('\'')
        .ok_or(ErrorKind::InvalidCharLiteral)?;

    let decoded = unescape(body)?;
    let mut chars = decoded.chars();
    let (Some(c), None) = (chars.next(), chars.next()) else {
        return Err(ErrorKind::InvalidCharLiteral);
    };

    let code = BigInt::from(c as u32);
    match width {
        Some(width) => Ok(Value::Word(word(decode_width(width)?, &code)?)),
        None => Ok(Value::Int(code)),
    }
}

#[cfg(test)]
mod test {
    use super::{decode_array_item, decode_char, decode_int, decode_width, decode_word};
    use crate::error::ErrorKind;
    use crate::value::{Value, Word};
    use num_bigint::{BigInt, BigUint};
    use rstest::rstest;

    #[rstest]
    #[case("0", 0)]
    #[case("-0", 0)]
    #[case("123", 123)]
    #[case("-123", -123)]
    #[case("0x123", 0x123)]
    #[case("0o123", 0o123)]
    #[case("0b101", 0b101)]
    #[case("-0xabcd", -43981)]
    #[case("-0o123", -0o123)]
    #[case("-0b101", -0b101)]
    #[case("0o01234567", 0o1234567)]
    #[case("0xDeadBeef", 0xdeadbeef)]
    fn test_decode_int(#[case] text: &str, #[case] expected: i64) {
        assert_eq!(Ok(BigInt::from(expected)), decode_int(text));
    }

    #[test]
    fn decode_int_is_unbounded() {
        let expected = BigInt::parse_bytes(b"123456789abcdefabcdef0123456789", 16).unwrap();
        assert_eq!(Ok(expected), decode_int("0x123456789ABCDEFabcdef0123456789"));
    }

    #[rstest]
    #[case("00", ErrorKind::LeadingZeroDecimal)]
    #[case("01", ErrorKind::LeadingZeroDecimal)]
    #[case("-0123", ErrorKind::LeadingZeroDecimal)]
    #[case("1abc", ErrorKind::InvalidNumericLiteral)]
    #[case("123l", ErrorKind::InvalidNumericLiteral)]
    #[case("0x", ErrorKind::InvalidNumericLiteral)]
    #[case("0b102", ErrorKind::InvalidNumericLiteral)]
    #[case("0o8", ErrorKind::InvalidNumericLiteral)]
    #[case("0X10", ErrorKind::InvalidNumericLiteral)]
    #[case("--1", ErrorKind::InvalidNumericLiteral)]
    #[case("", ErrorKind::InvalidNumericLiteral)]
    fn test_decode_int_fails(#[case] text: &str, #[case] kind: ErrorKind) {
        assert_eq!(Err(kind), decode_int(text));
    }

    #[rstest]
    #[case("12'0x123", 12, 0x123)]
    #[case("12'0o1234", 12, 0o1234)]
    #[case("12'1234", 12, 1234)]
    #[case("3'0b101", 3, 0b101)]
    #[case("12'-0x123", 12, 0xedd)]
    #[case("3'-0b101", 3, 0b011)]
    #[case("3'0b111", 3, 0b111)]
    #[case("3'-0b1000", 3, 0)]
    #[case("012'5", 12, 5)]
    #[case("32'0xdeadbeef", 32, 0xdeadbeef)]
    #[case("12'123", 12, 123)]
    #[case("12'0x07b", 12, 123)]
    #[case("12'0o0173", 12, 123)]
    #[case("12'0b01111011", 12, 123)]
    #[case("1125899906842624'5", 1 << 50, 5)]
    fn test_decode_word(#[case] text: &str, #[case] width: usize, #[case] value: u64) {
        assert_eq!(Word::new(width, value), decode_word(text).ok());
    }

    #[rstest]
    #[case("3'0b1000", ErrorKind::IntegerOutOfWidthRange)]
    #[case("3'-0b1001", ErrorKind::IntegerOutOfWidthRange)]
    #[case("8'256", ErrorKind::IntegerOutOfWidthRange)]
    #[case("0'0", ErrorKind::InvalidWidth)]
    #[case("99999999999999999999999'0", ErrorKind::InvalidWidth)]
    #[case("12'", ErrorKind::InvalidNumericLiteral)]
    #[case("12'0123", ErrorKind::LeadingZeroDecimal)]
    #[case("12'-", ErrorKind::InvalidNumericLiteral)]
    fn test_decode_word_fails(#[case] text: &str, #[case] kind: ErrorKind) {
        assert_eq!(Err(kind), decode_word(text));
    }

    #[rstest]
    #[case("1", Ok(1))]
    #[case("0012", Ok(12))]
    #[case("64", Ok(64))]
    #[case("0", Err(ErrorKind::InvalidWidth))]
    #[case("", Err(ErrorKind::InvalidWidth))]
    #[case("1a", Err(ErrorKind::InvalidWidth))]
    fn test_decode_width(#[case] text: &str, #[case] expected: Result<usize, ErrorKind>) {
        assert_eq!(expected, decode_width(text));
    }

    #[rstest]
    #[case(12, 16, "fff", Ok(0xfff))]
    #[case(12, 16, "1000", Err(ErrorKind::IntegerOutOfWidthRange))]
    #[case(12, 16, "-1", Err(ErrorKind::InvalidNumericLiteral))]
    #[case(12, 16, "12z", Err(ErrorKind::InvalidNumericLiteral))]
    #[case(12, 10, "0123", Err(ErrorKind::LeadingZeroDecimal))]
    #[case(12, 10, "0", Ok(0))]
    #[case(5, 2, "10101", Ok(0x15))]
    #[case(6, 8, "23", Ok(0o23))]
    fn test_decode_array_item(
        #[case] width: usize,
        #[case] radix: u32,
        #[case] text: &str,
        #[case] expected: Result<u32, ErrorKind>,
    ) {
        assert_eq!(
            expected.map(BigUint::from),
            decode_array_item(width, radix, text)
        );
    }

    #[rstest]
    #[case("'a'", Value::from(0x61))]
    #[case(r"'\n'", Value::from(0x0a))]
    #[case(r"'\U01F60A'", Value::from(0x1f60a))]
    #[case("'\"'", Value::from(0x22))]
    #[case(r"8''\x41'", Value::Word(Word::new(8, 0x41u32).unwrap()))]
    fn test_decode_char(#[case] text: &str, #[case] expected: Value) {
        assert_eq!(Ok(expected), decode_char(text));
    }

    #[rstest]
    #[case(r"'\bad'", ErrorKind::InvalidCharLiteral)]
    #[case(r"'\q'", ErrorKind::InvalidEscapeSequence)]
    #[case("6''a'", ErrorKind::IntegerOutOfWidthRange)]
    #[case(r"'\''", ErrorKind::InvalidEscapeSequence)]
    fn test_decode_char_fails(#[case] text: &str, #[case] kind: ErrorKind) {
        assert_eq!(Err(kind), decode_char(text));
    }
}
