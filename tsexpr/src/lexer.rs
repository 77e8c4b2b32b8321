//! Split source text into tokens.
use delegate::delegate;
use logos::Logos;

use crate::error::{ErrorKind, Result, SyntaxError};
use crate::escape::scan_string;
use crate::location::Span;

#[derive(Debug, Clone, PartialEq, Logos)]
#[logos(skip r"([ \t\r\n\f]+|# [^\n]*)+")]
enum LexerToken {
    #[token("(")]
    OpenList,
    #[token(")")]
    CloseList,
    #[token("##")]
    Discard,
    #[token("@nil")]
    Nil,
    #[token("@true", |_| true)]
    #[token("@false", |_| false)]
    Bool(bool),
    #[regex(r"-?[0-9][0-9a-zA-Z]*")]
    Numeral,
    #[regex(r"[0-9]+'[0-9a-zA-Z-]*")]
    WordNumeral,
    #[regex(r"([0-9]+')?'([^\\'\n]|\\[^\n][0-9a-fA-F]*)'")]
    Char,
    #[regex(r#"([0-9]+')?""#)]
    OpenString,
    #[regex(r"[0-9]+'(0[box])?\(")]
    OpenArray,
    #[regex(r"[a-zA-Z*+=<>!?/.$%_][0-9a-zA-Z*+=<>!?/.$%_-]*")]
    #[token("-")]
    Symbol,
}

/// Lexer token inside the parens of an array literal.
#[derive(Debug, Clone, PartialEq, Logos)]
#[logos(skip r"([ \t\r\n\f]+|# [^\n]*)+")]
enum ArrayToken {
    #[token(")")]
    CloseArray,
    #[regex(r"-?[0-9a-zA-Z]+")]
    Item,
}

/// Characters that are set aside for future extensions of the syntax.
pub const RESERVED: &[char] = &[
    ':', '~', '`', '\'', ',', '^', '&', '|', '\\', '[', ']', '{', '}', ';',
];

/// A token produced by the [`Scanner`].
///
/// Numeric tokens carry their raw text; the [`literal`](crate::literal)
/// decoder classifies them.
#[derive(Debug, Clone, PartialEq)]
pub enum Token<'a> {
    OpenList,
    CloseList,
    Discard,
    Nil,
    Bool(bool),
    /// `123`, `-0x7f`, ...
    Numeral(&'a str),
    /// `12'0x7f`, ...
    WordNumeral(&'a str),
    /// `'a'` or `8''a'`.
    Char(&'a str),
    /// A decoded string, with the width prefix if it is an array literal.
    String {
        width: Option<&'a str>,
        text: String,
    },
    /// The raw elements of an array literal and their spans.
    Array {
        width: &'a str,
        radix: u32,
        items: Vec<(&'a str, Span)>,
    },
    Symbol(&'a str),
}

/// Cursor that produces tokens from source text, one at a time.
#[derive(Clone)]
pub struct Scanner<'a> {
    lexer: logos::Lexer<'a, LexerToken>,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Self {
        Scanner {
            lexer: LexerToken::lexer(source),
        }
    }

    delegate! {
        to self.lexer {
            /// The full source text.
            pub fn source(&self) -> &'a str;
            fn remainder(&self) -> &'a str;
            fn bump(&mut self, n: usize);
        }
    }

    /// Byte offset of the cursor.
    pub fn offset(&self) -> usize {
        self.source().len() - self.remainder().len()
    }

    fn error(&self, kind: ErrorKind, span: Span) -> SyntaxError {
        SyntaxError::new(kind, span, self.source())
    }

    /// Scans the next token, returning `None` at the end of the input.
    pub fn next_token(&mut self) -> Result<Option<(Token<'a>, Span)>> {
        let Some(token) = self.lexer.next() else {
            return Ok(None);
        };
        let span = self.lexer.span();
        let slice = self.lexer.slice();

        let Ok(token) = token else {
            return Err(self.unexpected(slice, span.start));
        };

        let (token, span) = match token {
            LexerToken::OpenList => return Ok(Some((Token::OpenList, span))),
            LexerToken::Discard => return Ok(Some((Token::Discard, span))),
            LexerToken::CloseList => (Token::CloseList, span),
            LexerToken::Nil => (Token::Nil, span),
            LexerToken::Bool(value) => (Token::Bool(value), span),
            LexerToken::Numeral => (Token::Numeral(slice), span),
            LexerToken::WordNumeral => (Token::WordNumeral(slice), span),
            LexerToken::Char => (Token::Char(slice), span),
            LexerToken::Symbol => (Token::Symbol(slice), span),
            LexerToken::OpenString => self.string(slice, span)?,
            LexerToken::OpenArray => self.array(slice, span)?,
        };

        self.expect_separator()?;
        Ok(Some((token, span)))
    }

    /// Scans the rest of a string whose opening quote was just lexed.
    fn string(&mut self, open: &'a str, span: Span) -> Result<(Token<'a>, Span)> {
        let base = span.end;
        let scanned = scan_string(self.remainder())
            .map_err(|(kind, at)| self.error(kind, base + at.start..base + at.end))?;
        self.bump(scanned.len);

        let width = open.strip_suffix("\"").and_then(|open| open.strip_suffix('\''));
        let token = Token::String {
            width,
            text: scanned.text,
        };
        Ok((token, span.start..base + scanned.len))
    }

    /// Scans the items of an array whose opening paren was just lexed.
    fn array(&mut self, open: &'a str, span: Span) -> Result<(Token<'a>, Span)> {
        let (width, prefix) = open.split_once('\'').unwrap_or((open, "("));
        let radix = match prefix {
            "0b(" => 2,
            "0o(" => 8,
            "0x(" => 16,
            _ => 10,
        };

        let base = span.end;
        let body = self.remainder();
        let mut lexer = ArrayToken::lexer(body);
        let mut items = Vec::new();

        let end = loop {
            let Some(token) = lexer.next() else {
                return Err(self.error(
                    ErrorKind::UnexpectedEndOfInput,
                    base + body.len()..base + body.len(),
                ));
            };
            let item_span = base + lexer.span().start..base + lexer.span().end;

            match token {
                Ok(ArrayToken::CloseArray) => break lexer.span().end,
                Ok(ArrayToken::Item) => {
                    items.push((lexer.slice(), item_span.clone()));
                    if !is_separator(lexer.remainder()) {
                        return Err(self.missing_separator(lexer.remainder(), item_span.end));
                    }
                }
                Err(()) => return Err(self.unexpected(lexer.slice(), item_span.start)),
            }
        };

        self.bump(end);
        let token = Token::Array {
            width,
            radix,
            items,
        };
        Ok((token, span.start..base + end))
    }

    fn expect_separator(&self) -> Result<()> {
        if is_separator(self.remainder()) {
            Ok(())
        } else {
            Err(self.missing_separator(self.remainder(), self.offset()))
        }
    }

    /// Error for text at `at` that does not start any token.
    fn unexpected(&self, rest: &str, at: usize) -> SyntaxError {
        match rest.chars().next() {
            Some(c) if RESERVED.contains(&c) => {
                self.error(ErrorKind::ReservedCharacter(c), at..at + c.len_utf8())
            }
            Some(c) => self.error(ErrorKind::UnknownToken, at..at + c.len_utf8()),
            None => self.error(ErrorKind::UnknownToken, at..at),
        }
    }

    /// Error for a token at `at` that runs into the text `rest`.
    fn missing_separator(&self, rest: &str, at: usize) -> SyntaxError {
        match rest.chars().next() {
            Some(c) if RESERVED.contains(&c) => {
                self.error(ErrorKind::ReservedCharacter(c), at..at + c.len_utf8())
            }
            c => {
                let len = c.map_or(0, char::len_utf8);
                self.error(ErrorKind::MissingSeparator, at..at + len)
            }
        }
    }
}

/// Whether `rest` starts with whitespace or `)`, or is empty.
fn is_separator(rest: &str) -> bool {
    match rest.chars().next() {
        None => true,
        Some(c) => matches!(c, ' ' | '\t' | '\r' | '\n' | '\x0c' | ')'),
    }
}

#[cfg(test)]
mod test {
    use super::{Scanner, Token};
    use crate::error::ErrorKind;
    use rstest::rstest;

    fn tokens(source: &str) -> Vec<Token<'_>> {
        let mut scanner = Scanner::new(source);
        let mut tokens = Vec::new();
        while let Some((token, _)) = scanner.next_token().unwrap() {
            tokens.push(token);
        }
        tokens
    }

    fn error(source: &str) -> (ErrorKind, usize) {
        let mut scanner = Scanner::new(source);
        loop {
            match scanner.next_token() {
                Ok(Some(_)) => continue,
                Ok(None) => panic!("expected an error for {source:?}"),
                Err(error) => return (error.kind().clone(), error.span().start),
            }
        }
    }

    #[rstest]
    #[case("abcDEF", Token::Symbol("abcDEF"))]
    #[case("-", Token::Symbol("-"))]
    #[case("+", Token::Symbol("+"))]
    #[case(">=", Token::Symbol(">="))]
    #[case("a.b/c$", Token::Symbol("a.b/c$"))]
    #[case("@nil", Token::Nil)]
    #[case("@true", Token::Bool(true))]
    #[case("@false", Token::Bool(false))]
    #[case("-0x123", Token::Numeral("-0x123"))]
    #[case("0123", Token::Numeral("0123"))]
    #[case("1abc", Token::Numeral("1abc"))]
    #[case("12'-0o17", Token::WordNumeral("12'-0o17"))]
    #[case("12'", Token::WordNumeral("12'"))]
    #[case("'a'", Token::Char("'a'"))]
    #[case(r"8''\x41'", Token::Char(r"8''\x41'"))]
    #[case("##", Token::Discard)]
    fn test_single_token(#[case] source: &str, #[case] expected: Token) {
        assert_eq!(vec![expected], tokens(source));
    }

    #[test]
    fn test_strings() {
        assert_eq!(
            vec![
                Token::String {
                    width: None,
                    text: "a\"b".into()
                },
                Token::String {
                    width: Some("7"),
                    text: "abc".into()
                },
            ],
            tokens(r#""a\"b" 7'"abc""#)
        );
    }

    #[test]
    fn test_array_items() {
        let source = "(12'0x(fff # meh )\n 1) x)";
        let mut scanner = Scanner::new(source);
        assert_eq!(Token::OpenList, scanner.next_token().unwrap().unwrap().0);
        let (token, span) = scanner.next_token().unwrap().unwrap();
        assert_eq!(
            Token::Array {
                width: "12",
                radix: 16,
                items: vec![("fff", 7..10), ("1", 20..21)],
            },
            token
        );
        assert_eq!(1..22, span);
        assert_eq!(Token::Symbol("x"), scanner.next_token().unwrap().unwrap().0);
        assert_eq!(Token::CloseList, scanner.next_token().unwrap().unwrap().0);
        assert_eq!(None, scanner.next_token().unwrap());
    }

    #[test]
    fn test_comments_and_whitespace() {
        let source = "(abc # def )\n\t(ghi)\r\n) # tail";
        assert_eq!(
            vec![
                Token::OpenList,
                Token::Symbol("abc"),
                Token::OpenList,
                Token::Symbol("ghi"),
                Token::CloseList,
                Token::CloseList,
            ],
            tokens(source)
        );
    }

    #[rstest]
    #[case("@nilx", ErrorKind::MissingSeparator, 4)]
    #[case("@true@true", ErrorKind::MissingSeparator, 5)]
    #[case("@truer", ErrorKind::MissingSeparator, 5)]
    #[case("@dunno", ErrorKind::UnknownToken, 0)]
    #[case("@tru", ErrorKind::UnknownToken, 0)]
    #[case("--", ErrorKind::MissingSeparator, 1)]
    #[case("-abc", ErrorKind::MissingSeparator, 1)]
    #[case("()()", ErrorKind::MissingSeparator, 2)]
    #[case("abc#", ErrorKind::MissingSeparator, 3)]
    #[case("#abc", ErrorKind::UnknownToken, 0)]
    #[case("[1]", ErrorKind::ReservedCharacter('['), 0)]
    #[case("a ;b", ErrorKind::ReservedCharacter(';'), 2)]
    #[case("'abc", ErrorKind::ReservedCharacter('\''), 0)]
    #[case("a:b", ErrorKind::ReservedCharacter(':'), 1)]
    #[case("1,2", ErrorKind::ReservedCharacter(','), 1)]
    #[case("\"abc", ErrorKind::UnterminatedString, 4)]
    #[case("(\"a\\qb\")", ErrorKind::InvalidEscapeSequence, 3)]
    #[case("\"abc\"def", ErrorKind::MissingSeparator, 5)]
    #[case("12'0x(", ErrorKind::UnexpectedEndOfInput, 6)]
    #[case("12'0x(123", ErrorKind::UnexpectedEndOfInput, 9)]
    #[case("12'0x(-123-456)", ErrorKind::MissingSeparator, 10)]
    #[case("12'(@true)", ErrorKind::UnknownToken, 4)]
    #[case("12'(1 [2])", ErrorKind::ReservedCharacter('['), 6)]
    #[case("12'(1)x", ErrorKind::MissingSeparator, 6)]
    fn test_errors(#[case] source: &str, #[case] kind: ErrorKind, #[case] at: usize) {
        assert_eq!((kind, at), error(source));
    }
}
