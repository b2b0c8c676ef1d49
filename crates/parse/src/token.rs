use crate::cursor::{Cursor, RawTokenKind};
use lunar_interface::num;
use std::borrow::Cow;

/// A surface token: the cooked form of a [`RawToken`](crate::RawToken).
///
/// Numeric atoms are canonicalised on extraction (trailing fractional zeros
/// stripped) so that `2` and `2.0` intern into the same symbol slot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Token<'src> {
    /// `(`
    Open,
    /// `)`
    Close,
    /// `'`
    Quote,
    /// A symbol or number literal.
    Atom(Cow<'src, str>),
    /// End of input.
    Eof,
}

impl Token<'_> {
    /// The token's surface text.
    pub fn text(&self) -> &str {
        match self {
            Self::Open => "(",
            Self::Close => ")",
            Self::Quote => "'",
            Self::Atom(text) => text,
            Self::Eof => "end of input",
        }
    }
}

/// Token stream over preprocessed source text, skipping whitespace.
#[derive(Clone, Debug)]
pub struct Tokens<'src> {
    cursor: Cursor<'src>,
    src: &'src str,
    pos: usize,
}

impl<'src> Tokens<'src> {
    /// Creates a new token stream over `src`.
    pub fn new(src: &'src str) -> Self {
        Self { cursor: Cursor::new(src), src, pos: 0 }
    }

    /// Returns the next token, advancing the stream.
    pub fn next_token(&mut self) -> Token<'src> {
        loop {
            let raw = self.cursor.advance_token();
            let start = self.pos;
            self.pos += raw.len as usize;
            return match raw.kind {
                RawTokenKind::Whitespace => continue,
                RawTokenKind::OpenParen => Token::Open,
                RawTokenKind::CloseParen => Token::Close,
                RawTokenKind::Quote => Token::Quote,
                RawTokenKind::Atom => {
                    Token::Atom(num::canonicalize(&self.src[start..self.pos]))
                }
                RawTokenKind::Eof => Token::Eof,
            };
        }
    }
}

impl<'src> Iterator for Tokens<'src> {
    type Item = Token<'src>;

    #[inline]
    fn next(&mut self) -> Option<Token<'src>> {
        match self.next_token() {
            Token::Eof => None,
            token => Some(token),
        }
    }
}

impl std::iter::FusedIterator for Tokens<'_> {}
