//! Parse values from s-expressions.
use delegate::delegate;
use num_bigint::BigUint;
use smol_str::SmolStr;

use crate::error::{ErrorKind, Result, SyntaxError, DEFAULT_FILENAME};
use crate::lexer::{Scanner, Token};
use crate::literal;
use crate::location::{LineIndex, Location, Span};
use crate::value::{Array, Node, Symbol, Value};

/// An unfinished construct on the parser stack.
#[derive(Debug)]
enum Frame {
    /// A list whose `(` is at `start`.
    List { start: usize, items: Vec<Node> },
    /// A `##` waiting for the value it drops. The span is only kept to
    /// report a `)` that closes the list before that value.
    Discard { span: Span },
}

/// Parser that yields the top-level values of a source one at a time.
///
/// Nesting is tracked with an explicit stack, so deeply nested input does
/// not grow the call stack. After the first error the parser is exhausted.
pub struct Parser<'a> {
    scanner: Scanner<'a>,
    stack: Vec<Frame>,
    filename: SmolStr,
    failed: bool,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str) -> Self {
        Parser {
            scanner: Scanner::new(source),
            stack: Vec::new(),
            filename: SmolStr::new_inline(DEFAULT_FILENAME),
            failed: false,
        }
    }

    delegate! {
        to self.scanner {
            /// The full source text.
            pub fn source(&self) -> &'a str;
            /// Byte offset up to which the source has been consumed.
            pub fn offset(&self) -> usize;
        }
    }

    fn error(&self, kind: ErrorKind, span: Span) -> SyntaxError {
        SyntaxError::new(kind, span, self.source())
    }

    fn end_of_input(&self) -> Span {
        let end = self.source().len();
        end..end
    }

    /// Parses the next complete top-level value, or returns `None` at the
    /// end of the input.
    pub fn next_node(&mut self) -> Result<Option<Node>> {
        if self.failed {
            return Ok(None);
        }
        self.step().map_err(|error| {
            self.failed = true;
            self.stack.clear();
            error.with_filename(&self.filename)
        })
    }

    fn step(&mut self) -> Result<Option<Node>> {
        loop {
            let Some((token, span)) = self.scanner.next_token()? else {
                return match self.stack.last() {
                    None => Ok(None),
                    Some(Frame::List { .. }) => {
                        Err(self.error(ErrorKind::UnterminatedList, self.end_of_input()))
                    }
                    Some(Frame::Discard { .. }) => {
                        Err(self.error(ErrorKind::UnexpectedEndOfInput, self.end_of_input()))
                    }
                };
            };

            let node = match token {
                Token::OpenList => {
                    self.stack.push(Frame::List {
                        start: span.start,
                        items: Vec::new(),
                    });
                    continue;
                }
                Token::Discard => {
                    self.stack.push(Frame::Discard { span });
                    continue;
                }
                Token::CloseList => match self.stack.pop() {
                    Some(Frame::List { start, items }) => Node::list(items, start..span.end),
                    Some(Frame::Discard { span }) => {
                        return Err(self.error(ErrorKind::DanglingDiscard, span))
                    }
                    None => return Err(self.error(ErrorKind::UnmatchedCloseParen, span)),
                },
                token => Node::atom(self.atom(token, &span)?, span),
            };

            match self.stack.last_mut() {
                None => return Ok(Some(node)),
                Some(Frame::List { items, .. }) => items.push(node),
                Some(Frame::Discard { .. }) => {
                    self.stack.pop();
                }
            }
        }
    }

    /// Decodes an atom token into a value.
    fn atom(&self, token: Token<'a>, span: &Span) -> Result<Value> {
        let at = |kind| self.error(kind, span.clone());

        let value = match token {
            Token::Nil => Value::Nil,
            Token::Bool(value) => Value::Bool(value),
            Token::Symbol(name) => Value::Symbol(Symbol::new(name)),
            Token::Numeral(text) => Value::Int(literal::decode_int(text).map_err(at)?),
            Token::WordNumeral(text) => Value::Word(literal::decode_word(text).map_err(at)?),
            Token::Char(text) => literal::decode_char(text).map_err(at)?,
            Token::String { width: None, text } => Value::String(text),
            Token::String {
                width: Some(width),
                text,
            } => {
                let width = literal::decode_width(width).map_err(at)?;
                Value::Array(literal::decode_string_array(width, &text).map_err(at)?)
            }
            Token::Array {
                width,
                radix,
                items,
            } => {
                let width = literal::decode_width(width).map_err(at)?;
                let items = items
                    .into_iter()
                    .map(|(text, span)| {
                        literal::decode_array_item(width, radix, text)
                            .map_err(|kind| self.error(kind, span))
                    })
                    .collect::<Result<Vec<BigUint>>>()?;
                let array = Array::new(width, items)
                    .ok_or_else(|| at(ErrorKind::IntegerOutOfWidthRange))?;
                Value::Array(array)
            }
            Token::OpenList | Token::CloseList | Token::Discard => {
                return Err(at(ErrorKind::UnknownToken))
            }
        };

        Ok(value)
    }
}

impl<'a> Iterator for Parser<'a> {
    type Item = Result<Node>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_node().transpose()
    }
}

impl std::iter::FusedIterator for Parser<'_> {}

/// Reader settings.
#[derive(Debug, Clone)]
pub struct Reader {
    filename: SmolStr,
}

impl Default for Reader {
    fn default() -> Self {
        Reader {
            filename: SmolStr::new_inline(DEFAULT_FILENAME),
        }
    }
}

impl Reader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the file name reported in errors.
    pub fn with_filename(mut self, filename: impl Into<SmolStr>) -> Self {
        self.filename = filename.into();
        self
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Creates a parser over `source` with these settings.
    pub fn parser<'a>(&self, source: &'a str) -> Parser<'a> {
        Parser {
            filename: self.filename.clone(),
            ..Parser::new(source)
        }
    }

    /// Reads all top-level values of `source`, keeping their spans.
    pub fn read_nodes(&self, source: &str) -> Result<Vec<Node>> {
        self.parser(source).collect()
    }

    /// Reads all top-level values of `source`.
    pub fn read(&self, source: &str) -> Result<Vec<Value>> {
        self.parser(source)
            .map(|node| node.map(Node::into_value))
            .collect()
    }

    /// Reads exactly one value. Whitespace and comments may follow it.
    pub fn read_one(&self, source: &str) -> Result<Value> {
        let mut parser = self.parser(source);
        let Some(node) = parser.next_node()? else {
            let end = source.len();
            return Err(parser
                .error(ErrorKind::UnexpectedEndOfInput, end..end)
                .with_filename(&self.filename));
        };

        match parser.next_node()? {
            None => Ok(node.into_value()),
            Some(extra) => Err(parser
                .error(ErrorKind::TrailingInput, extra.span.clone())
                .with_filename(&self.filename)),
        }
    }

    /// Resolves the line and column range of a node read from `source`.
    pub fn locate(&self, source: &str, node: &Node) -> Location {
        LineIndex::new(source).location(&node.span)
    }
}

/// Reads all top-level values of an s-expression string.
pub fn read_str(source: &str) -> Result<Vec<Value>> {
    Reader::new().read(source)
}

/// Reads exactly one value from an s-expression string.
pub fn read_one(source: &str) -> Result<Value> {
    Reader::new().read_one(source)
}
