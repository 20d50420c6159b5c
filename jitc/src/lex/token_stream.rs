//! Finished stream of tokens.
use std::fmt;

use crate::{
    seq::{Sequence, Storage},
    tokens::Token,
};

/// Tokens of a whole lexing pass, in lexical order.
///
/// The stream is handed off by the lexer as a whole and is read-only from
/// then on. The last token is always [`TokenKind::EOF`](crate::tokens::TokenKind::EOF).
pub struct TokenStream {
    tokens: Box<dyn Sequence<Token>>,
    storage: Storage,
}

impl TokenStream {
    pub(crate) fn new(tokens: Box<dyn Sequence<Token>>, storage: Storage) -> Self {
        Self { tokens, storage }
    }

    /// Storage strategy backing the stream.
    #[inline]
    pub fn storage(&self) -> Storage {
        self.storage
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Iterate the tokens in lexical order.
    pub fn iter(&self) -> impl Iterator<Item = &Token> + '_ {
        self.tokens.iter()
    }

    /// Iterate the error tokens in lexical order.
    pub fn errors(&self) -> impl Iterator<Item = &Token> + '_ {
        self.iter().filter(|token| token.is_error())
    }

    #[inline]
    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    /// Give up the stream and take the underlying sequence.
    pub fn into_inner(self) -> Box<dyn Sequence<Token>> {
        self.tokens
    }
}

/// Streams are equal when their tokens are, regardless of storage.
impl PartialEq for TokenStream {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl Eq for TokenStream {}

impl fmt::Debug for TokenStream {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// One pretty printed token per line.
impl fmt::Display for TokenStream {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for token in self.iter() {
            writeln!(f, "{token}")?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a TokenStream {
    type Item = &'a Token;
    type IntoIter = Box<dyn Iterator<Item = &'a Token> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::tokens::TokenKind;

    fn stream(storage: Storage) -> TokenStream {
        let mut tokens = storage.build();
        tokens.push(Token::new(1, 1, TokenKind::Ident, "x"));
        tokens.push(Token::new(1, 2, TokenKind::Error, "oops"));
        tokens.push(Token::new(1, 3, TokenKind::EOF, ""));
        TokenStream::new(tokens, storage)
    }

    #[test]
    fn test_equal_across_storage() {
        assert_eq!(stream(Storage::Array), stream(Storage::Stack));
    }

    #[test]
    fn test_errors() {
        let stream = stream(Storage::Stack);
        let errors = stream.errors().map(Token::text).collect::<Vec<_>>();
        assert_eq!(errors, vec!["oops"]);
        assert!(stream.has_errors());
    }

    #[test]
    fn test_display() {
        let text = stream(Storage::Array).to_string();
        assert_eq!(text, "identifier (1:1) x\nerror (1:2) oops\nend of file (1:3) \n");
    }
}
