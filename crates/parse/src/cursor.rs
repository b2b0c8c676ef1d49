//! Low-level Lunar tokeniser.

/// Returns `true` if the given byte is considered a whitespace.
#[inline]
pub const fn is_whitespace_byte(c: u8) -> bool {
    matches!(c, b' ' | b'\t' | b'\n' | b'\r')
}

/// Returns `true` if the given byte can appear in an atom: anything that is
/// not whitespace or one of the three structural characters.
#[inline]
pub const fn is_atom_byte(c: u8) -> bool {
    !is_whitespace_byte(c) && !matches!(c, b'(' | b')' | b'\'')
}

/// A raw token produced by the [`Cursor`]: its kind and byte length.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RawToken {
    /// Kind of the token.
    pub kind: RawTokenKind,
    /// Byte length of the token.
    pub len: u32,
}

impl RawToken {
    /// The end-of-stream sentinel.
    pub const EOF: Self = Self { kind: RawTokenKind::Eof, len: 0 };

    pub(crate) const fn new(kind: RawTokenKind, len: u32) -> Self {
        Self { kind, len }
    }
}

/// The kind of a raw token.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RawTokenKind {
    /// `(`
    OpenParen,
    /// `)`
    CloseParen,
    /// `'`
    Quote,
    /// A whitespace run.
    Whitespace,
    /// A maximal run of atom bytes: a symbol or a number literal.
    Atom,
    /// End of input.
    Eof,
}

/// Iterator over the raw tokens of a source string.
///
/// Next bytes can be peeked via `first`, and the position shifted forward
/// via `bump`.
#[derive(Clone, Debug)]
pub struct Cursor<'a> {
    bytes: std::slice::Iter<'a, u8>,
}

impl<'a> Cursor<'a> {
    /// Creates a new cursor over the given input string slice.
    #[inline]
    pub fn new(input: &'a str) -> Self {
        Self { bytes: input.as_bytes().iter() }
    }

    /// Parses a token from the input string.
    pub fn advance_token(&mut self) -> RawToken {
        let start = self.len_remaining();
        let Some(first) = self.bump() else { return RawToken::EOF };
        let kind = match first {
            b'(' => RawTokenKind::OpenParen,
            b')' => RawTokenKind::CloseParen,
            b'\'' => RawTokenKind::Quote,
            c if is_whitespace_byte(c) => {
                self.eat_while(is_whitespace_byte);
                RawTokenKind::Whitespace
            }
            _ => {
                self.eat_while(is_atom_byte);
                RawTokenKind::Atom
            }
        };
        RawToken::new(kind, (start - self.len_remaining()) as u32)
    }

    /// Peeks the next byte without consuming it. Returns `0` at end of input.
    #[inline]
    fn first(&self) -> u8 {
        self.bytes.clone().next().copied().unwrap_or(0)
    }

    #[inline]
    fn bump(&mut self) -> Option<u8> {
        self.bytes.next().copied()
    }

    #[inline]
    fn len_remaining(&self) -> usize {
        self.bytes.len()
    }

    fn eat_while(&mut self, mut predicate: impl FnMut(u8) -> bool) {
        while self.len_remaining() > 0 && predicate(self.first()) {
            self.bump();
        }
    }
}

impl Iterator for Cursor<'_> {
    type Item = RawToken;

    #[inline]
    fn next(&mut self) -> Option<RawToken> {
        let token = self.advance_token();
        if token.kind == RawTokenKind::Eof { None } else { Some(token) }
    }
}

impl std::iter::FusedIterator for Cursor<'_> {}
