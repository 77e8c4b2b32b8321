//! Decode the bodies of string and character literals.
use logos::Logos;

use crate::error::ErrorKind;
use crate::location::Span;

/// Lexer token for the body of a string, after its opening quote.
#[derive(Debug, Clone, PartialEq, Logos)]
enum StringToken {
    #[token("\"")]
    Quote,

    #[token(r"\\", |_| '\\')]
    #[token(r#"\""#, |_| '"')]
    #[token(r"\a", |_| '\x07')]
    #[token(r"\b", |_| '\x08')]
    #[token(r"\t", |_| '\t')]
    #[token(r"\n", |_| '\n')]
    #[token(r"\f", |_| '\x0c')]
    #[token(r"\r", |_| '\r')]
    #[token(r"\e", |_| '\x1b')]
    Escaped(char),

    #[regex(r"\\x[0-9a-fA-F][0-9a-fA-F]", parse_code)]
    #[regex(r"\\u[0-9a-fA-F][0-9a-fA-F][0-9a-fA-F][0-9a-fA-F]", parse_code)]
    #[regex(
        r"\\U[0-9a-fA-F][0-9a-fA-F][0-9a-fA-F][0-9a-fA-F][0-9a-fA-F][0-9a-fA-F]",
        parse_code
    )]
    Code(u32),

    #[regex(r#"[^"\\]+"#)]
    Literal,
}

/// Parses the hex digits of a `\xHH`, `\uHHHH` or `\UHHHHHH` escape.
fn parse_code(lex: &mut logos::Lexer<StringToken>) -> Option<u32> {
    u32::from_str_radix(lex.slice().get(2..)?, 16).ok()
}

/// A string body that was scanned up to and including its closing quote.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ScannedString {
    pub text: String,
    /// Number of bytes consumed, closing quote included.
    pub len: usize,
}

/// Scans and decodes a string body that starts right after the opening
/// quote. Error spans are relative to the start of `body`.
pub(crate) fn scan_string(body: &str) -> Result<ScannedString, (ErrorKind, Span)> {
    let mut lexer = StringToken::lexer(body);
    let mut text = String::new();

    while let Some(token) = lexer.next() {
        let span = lexer.span();
        let token = token.map_err(|()| (ErrorKind::InvalidEscapeSequence, span.clone()))?;

        match token {
            StringToken::Quote => {
                return Ok(ScannedString {
                    text,
                    len: span.end,
                })
            }
            StringToken::Escaped(c) => text.push(c),
            StringToken::Code(code) => {
                let c = char::from_u32(code).ok_or((ErrorKind::InvalidCodePoint, span))?;
                text.push(c);
            }
            StringToken::Literal => text.push_str(lexer.slice()),
        }
    }

    Err((ErrorKind::UnterminatedString, body.len()..body.len()))
}

/// Replaces escape sequences with their corresponding characters.
pub(crate) fn unescape(str: &str) -> Result<String, ErrorKind> {
    let mut lexer = StringToken::lexer(str);
    let mut output = String::with_capacity(str.len());

    while let Some(token) = lexer.next() {
        match token.map_err(|()| ErrorKind::InvalidEscapeSequence)? {
            StringToken::Quote => output.push('"'),
            StringToken::Escaped(c) => output.push(c),
            StringToken::Code(code) => {
                output.push(char::from_u32(code).ok_or(ErrorKind::InvalidCodePoint)?)
            }
            StringToken::Literal => output.push_str(lexer.slice()),
        }
    }

    Ok(output)
}
