//! The values produced by the reader.
use std::cmp::Ordering;

use num_bigint::{BigInt, BigUint, Sign};
use num_traits::{One, Zero};
use proptest::arbitrary::Arbitrary;
use smol_str::SmolStr;

use crate::location::Span;

/// An s-expression represented as a recursive enum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Nil,
    Bool(bool),
    Int(BigInt),
    Word(Word),
    String(String),
    Array(Array),
    List(Vec<Value>),
    Symbol(Symbol),
}

impl Value {
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_symbol(&self) -> Option<&Symbol> {
        match self {
            Value::Symbol(symbol) => Some(symbol),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<&BigInt> {
        match self {
            Value::Int(int) => Some(int),
            _ => None,
        }
    }

    pub fn as_word(&self) -> Option<&Word> {
        match self {
            Value::Word(word) => Some(word),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Value::Array(array) => Some(array),
            _ => None,
        }
    }

    /// Takes the items out of a list value.
    pub fn into_list(mut self) -> Option<Vec<Value>> {
        match &mut self {
            Value::List(items) => Some(std::mem::take(items)),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(string) => Some(string),
            _ => None,
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }
}

impl Drop for Value {
    fn drop(&mut self) {
        let Value::List(items) = self else {
            return;
        };
        let mut pending = std::mem::take(items);
        while let Some(mut value) = pending.pop() {
            if let Value::List(items) = &mut value {
                pending.append(items);
            }
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value.into())
    }
}

impl From<BigInt> for Value {
    fn from(value: BigInt) -> Self {
        Self::Int(value)
    }
}

impl From<Word> for Value {
    fn from(value: Word) -> Self {
        Self::Word(value)
    }
}

impl From<Array> for Value {
    fn from(value: Array) -> Self {
        Self::Array(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.into())
    }
}

impl From<Symbol> for Value {
    fn from(value: Symbol) -> Self {
        Self::Symbol(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Self::List(value)
    }
}

/// A symbol name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol(SmolStr);

impl Symbol {
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Symbol(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Symbol {
    fn from(name: &str) -> Self {
        Symbol(name.into())
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The exclusive upper bound `2^width` of a word.
fn modulus(width: usize) -> BigUint {
    BigUint::one() << width
}

/// `2^width - 1`, the low `width` bits set.
fn mask(width: usize) -> BigUint {
    modulus(width) - 1u32
}

/// Whether `value < 2^width`, without building `2^width`.
fn fits(width: usize, value: &BigUint) -> bool {
    value.bits() <= width as u64
}

/// Whether `value == 2^width`.
fn is_modulus(width: usize, value: &BigUint) -> bool {
    value.trailing_zeros() == Some(width as u64) && value.bits() - 1 == width as u64
}

/// Applies the literal range rule: `-2^width <= value < 2^width`, reduced
/// modulo `2^width`.
pub(crate) fn reduce(width: usize, value: &BigInt) -> Option<BigUint> {
    let magnitude = value.magnitude();
    match value.sign() {
        Sign::Minus if fits(width, magnitude) => Some(modulus(width) - magnitude),
        Sign::Minus if is_modulus(width, magnitude) => Some(BigUint::zero()),
        Sign::Minus => None,
        _ => fits(width, magnitude).then(|| magnitude.clone()),
    }
}

/// Keeps the low `width` bits of `value`.
fn truncate(width: usize, value: BigUint) -> Word {
    let value = if fits(width, &value) {
        value
    } else {
        value & mask(width)
    };
    Word { width, value }
}

/// Reduces any integer modulo `2^width`.
fn wrap(width: usize, value: &BigInt) -> Word {
    let Word { value: low, .. } = truncate(width, value.magnitude().clone());
    let value = if value.sign() == Sign::Minus && !low.is_zero() {
        modulus(width) - low
    } else {
        low
    };
    Word { width, value }
}

/// A fixed-width binary word, stored as its unsigned value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Word {
    width: usize,
    value: BigUint,
}

impl Word {
    /// Creates a word from an unsigned value, which must be below `2^width`.
    pub fn new(width: usize, value: impl Into<BigUint>) -> Option<Self> {
        let value = value.into();
        (width > 0 && fits(width, &value)).then_some(Word { width, value })
    }

    /// Creates a word from a signed value in `-2^width..2^width`, wrapping
    /// negative values around.
    pub fn from_signed(width: usize, value: &BigInt) -> Option<Self> {
        if width == 0 {
            return None;
        }
        reduce(width, value).map(|value| Word { width, value })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// The value as an unsigned integer.
    pub fn value(&self) -> &BigUint {
        &self.value
    }

    /// The value as a two's complement signed integer.
    pub fn to_signed(&self) -> BigInt {
        let value = BigInt::from(self.value.clone());
        if self.value.bit(self.width as u64 - 1) {
            value - BigInt::from(modulus(self.width))
        } else {
            value
        }
    }

    /// Extracts `width` bits starting at bit `pos`, bit 0 being the least
    /// significant.
    pub fn extract(&self, pos: usize, width: usize) -> Option<Word> {
        let end = pos.checked_add(width)?;
        (width > 0 && end <= self.width).then(|| truncate(width, &self.value >> pos))
    }

    /// Sign-extends to a width no smaller than the current one.
    pub fn sext(&self, width: usize) -> Option<Word> {
        (width >= self.width).then(|| wrap(width, &self.to_signed()))
    }

    /// Zero-extends to a width no smaller than the current one.
    pub fn zext(&self, width: usize) -> Option<Word> {
        (width >= self.width).then(|| Word {
            width,
            value: self.value.clone(),
        })
    }

    /// Replaces the bits `pos..pos + word.width()` with `word`.
    pub fn deposit(&self, pos: usize, word: &Word) -> Option<Word> {
        let end = pos.checked_add(word.width)?;
        if end > self.width {
            return None;
        }
        let field = (&self.value >> pos) & mask(word.width);
        let cleared = &self.value ^ &(field << pos);
        Some(Word {
            width: self.width,
            value: cleared | (&word.value << pos),
        })
    }

    /// Concatenates words, the first one ending up in the lowest bits.
    pub fn concat<'a>(words: impl IntoIterator<Item = &'a Word>) -> Option<Word> {
        let mut width = 0usize;
        let mut value = BigUint::zero();
        for word in words {
            value |= &word.value << width;
            width = width.checked_add(word.width)?;
        }
        (width > 0).then_some(Word { width, value })
    }

    /// Arithmetic right shift, filling with copies of the top bit.
    pub fn sar(&self, count: usize) -> Word {
        wrap(self.width, &(self.to_signed() >> count.min(self.width)))
    }

    /// Compares two words of equal width as signed integers.
    pub fn signed_cmp(&self, other: &Word) -> Option<Ordering> {
        (self.width == other.width).then(|| self.to_signed().cmp(&other.to_signed()))
    }

    fn check_width(&self, other: &Word) {
        assert_eq!(
            self.width, other.width,
            "mismatched widths in word operation"
        );
    }
}

/// Words of equal width compare as unsigned integers.
impl PartialOrd for Word {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        (self.width == other.width).then(|| self.value.cmp(&other.value))
    }
}

// Binary operators wrap modulo `2^width` and panic when the widths differ.
macro_rules! word_binop {
    ($trait:ident, $method:ident, |$a:ident, $b:ident, $width:ident| $body:expr) => {
        impl std::ops::$trait<&Word> for &Word {
            type Output = Word;

            fn $method(self, other: &Word) -> Word {
                self.check_width(other);
                let ($a, $b, $width) = (&self.value, &other.value, self.width);
                $body
            }
        }

        impl std::ops::$trait for Word {
            type Output = Word;

            fn $method(self, other: Word) -> Word {
                std::ops::$trait::$method(&self, &other)
            }
        }
    };
}

word_binop!(Add, add, |a, b, width| truncate(width, a + b));
word_binop!(Sub, sub, |a, b, width| if a >= b {
    Word {
        width,
        value: a - b,
    }
} else {
    Word {
        width,
        value: modulus(width) - (b - a),
    }
});
word_binop!(Mul, mul, |a, b, width| truncate(width, a * b));
word_binop!(BitAnd, bitand, |a, b, width| Word { width, value: a & b });
word_binop!(BitOr, bitor, |a, b, width| Word { width, value: a | b });
word_binop!(BitXor, bitxor, |a, b, width| Word { width, value: a ^ b });

impl std::ops::Neg for &Word {
    type Output = Word;

    fn neg(self) -> Word {
        if self.value.is_zero() {
            self.clone()
        } else {
            Word {
                width: self.width,
                value: modulus(self.width) - &self.value,
            }
        }
    }
}

impl std::ops::Neg for Word {
    type Output = Word;

    fn neg(self) -> Word {
        -&self
    }
}

impl std::ops::Not for &Word {
    type Output = Word;

    fn not(self) -> Word {
        Word {
            width: self.width,
            value: &self.value ^ &mask(self.width),
        }
    }
}

impl std::ops::Not for Word {
    type Output = Word;

    fn not(self) -> Word {
        !&self
    }
}

/// Shifts out of the word are lost; counts past the width give zero.
impl std::ops::Shl<usize> for &Word {
    type Output = Word;

    fn shl(self, count: usize) -> Word {
        if count >= self.width {
            Word {
                width: self.width,
                value: BigUint::zero(),
            }
        } else {
            truncate(self.width, &self.value << count)
        }
    }
}

/// Logical right shift.
impl std::ops::Shr<usize> for &Word {
    type Output = Word;

    fn shr(self, count: usize) -> Word {
        Word {
            width: self.width,
            value: &self.value >> count,
        }
    }
}

impl Arbitrary for Word {
    type Parameters = ();
    type Strategy = proptest::strategy::BoxedStrategy<Self>;

    fn arbitrary_with(_args: Self::Parameters) -> Self::Strategy {
        use proptest::prelude::*;

        (1..=128usize)
            .prop_flat_map(|width| {
                let digits = (width + 31) / 32;
                proptest::collection::vec(any::<u32>(), digits).prop_map(move |digits| {
                    let value = BigUint::new(digits) % modulus(width);
                    Word { width, value }
                })
            })
            .boxed()
    }
}

/// An array of equal-width words.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Array {
    width: usize,
    items: Vec<BigUint>,
}

impl Array {
    /// Creates an array, checking that every item is below `2^width`.
    pub fn new(width: usize, items: Vec<BigUint>) -> Option<Self> {
        if width == 0 {
            return None;
        }
        items
            .iter()
            .all(|item| fits(width, item))
            .then_some(Array { width, items })
    }

    /// Creates an array holding the code points of `string`.
    pub fn from_str_codes(width: usize, string: &str) -> Option<Self> {
        Array::new(width, string.chars().map(|c| BigUint::from(c as u32)).collect())
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn items(&self) -> &[BigUint] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Word> {
        self.items.get(index).map(|value| Word {
            width: self.width,
            value: value.clone(),
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = Word> + '_ {
        (0..self.len()).filter_map(|index| self.get(index))
    }
}

/// A value together with the source span it was read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub kind: NodeKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// Any value other than a list.
    Atom(Value),
    List(Vec<Node>),
}

impl Node {
    pub fn atom(value: Value, span: Span) -> Self {
        Node {
            kind: NodeKind::Atom(value),
            span,
        }
    }

    pub fn list(items: Vec<Node>, span: Span) -> Self {
        Node {
            kind: NodeKind::List(items),
            span,
        }
    }

    pub fn items(&self) -> Option<&[Node]> {
        match &self.kind {
            NodeKind::List(items) => Some(items),
            NodeKind::Atom(_) => None,
        }
    }

    /// Drops the spans, converting into a plain [`Value`].
    ///
    /// Works with an explicit stack, like the parser, so deeply nested
    /// trees convert without deep recursion.
    pub fn into_value(self) -> Value {
        enum Work {
            Visit(Node),
            Collect(usize),
        }

        let mut work = vec![Work::Visit(self)];
        let mut done = Vec::new();

        while let Some(next) = work.pop() {
            match next {
                Work::Visit(mut node) => {
                    match std::mem::replace(&mut node.kind, NodeKind::List(Vec::new())) {
                        NodeKind::Atom(value) => done.push(value),
                        NodeKind::List(items) => {
                            work.push(Work::Collect(items.len()));
                            work.extend(items.into_iter().rev().map(Work::Visit));
                        }
                    }
                }
                Work::Collect(len) => {
                    let items = done.split_off(done.len() - len);
                    done.push(Value::List(items));
                }
            }
        }

        done.pop().unwrap_or(Value::Nil)
    }
}

impl Drop for Node {
    fn drop(&mut self) {
        let NodeKind::List(items) = &mut self.kind else {
            return;
        };
        let mut pending = std::mem::take(items);
        while let Some(mut node) = pending.pop() {
            if let NodeKind::List(items) = &mut node.kind {
                pending.append(items);
            }
        }
    }
}

impl From<Node> for Value {
    fn from(node: Node) -> Self {
        node.into_value()
    }
}
