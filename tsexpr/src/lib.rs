//! Typed s-expressions as a data format.
//!
//! # Syntax
//!
//! - **Lists** are sequences of values, delimited on the outside by `(` and `)`
//!   and separated by whitespace.
//!
//! - **Constants** are `@nil`, `@true` and `@false`.
//!
//! - **Integers** have arbitrary precision and are written in decimal (`-123`),
//!   hexadecimal (`0x7b`), octal (`0o173`) or binary (`0b1111011`).
//!   Decimal integers other than `0` may not start with a zero.
//!
//! - **Words** are fixed-width binary values, written as a width in bits,
//!   an apostrophe and an integer: `12'0x7b`. Negative values wrap around,
//!   so `8'-1` is the same word as `8'255`. Values must lie in
//!   `-2^width..2^width`. [`Word`] supports wrapping arithmetic, bitwise
//!   operators and bit-field helpers such as [`Word::extract`].
//!
//! - **Arrays** are sequences of words of one width: `8'0x(61 62 63)`,
//!   `8'(97 98 99)`, `8'0o(...)`, `8'0b(...)`, or `8'"abc"` to take the code
//!   points of a string.
//!
//! - **Strings** are enclosed within double quotes. Within strings, the
//!   following escaping rules apply:
//!
//!    - `\"` and `\\` are used to escape `"` and `\`.
//!    - `\a`, `\b`, `\t`, `\n`, `\f`, `\r` and `\e` stand for the bell,
//!      backspace, tab, newline, form feed, carriage return and escape characters.
//!    - `\xHH`, `\uHHHH` and `\UHHHHHH` stand for the unicode character with
//!      the given hexadecimal code point.
//!
//! - **Characters** such as `'a'` or `'\n'` are read as the integer code point;
//!   with a width prefix (`8''a'`) they are read as a word.
//!
//! - **Symbols** are bare names such as `abc`, `>=` or `set!`.
//!
//! - **Comments** begin with `# ` and extend to the end of the line.
//!   `##` comments out the value that follows it, which must still be
//!   well-formed: `(a ## (b c) d)` reads as `(a d)`.
//!
//! Every atom and every `)` must be followed by whitespace, `)` or the end of
//! the input. The characters ``: ~ ` ' , ^ & | \ [ ] { } ;`` are reserved.
//!
//! # Example
//!
//! ```
//! use tsexpr::{read_str, Value, Word};
//!
//! let values = read_str("(width 32'0xdeadbeef) ## ignored @true").unwrap();
//! let word = Word::new(32, 0xdeadbeefu32).unwrap();
//! assert_eq!(
//!     values,
//!     vec![
//!         Value::List(vec![Value::Symbol("width".into()), Value::Word(word)]),
//!         Value::Bool(true),
//!     ]
//! );
//! ```
pub mod error;
pub(crate) mod escape;
pub mod lexer;
pub mod literal;
pub mod location;
pub mod parser;
pub mod value;

pub use error::{ErrorKind, Result, SyntaxError};
pub use location::{LineIndex, Location, Position, Span};
pub use parser::{read_one, read_str, Parser, Reader};
pub use value::{Array, Node, NodeKind, Symbol, Value, Word};
