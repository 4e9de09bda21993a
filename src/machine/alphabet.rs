use smallvec::SmallVec;

use super::error::Error;
use super::token::Token;

/// Inclusive token range `[first, last]` accepted by an automaton.
///
/// The width of the range is the number of columns in every row of the
/// transition table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Alphabet<T: Token> {
    first: T,
    last: T,
    width: usize,
}

impl<T: Token> Alphabet<T> {
    /// Creates an alphabet spanning `first..=last`.
    ///
    /// A single-token alphabet (`first == last`) is allowed here.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidAlphabet`] if `last < first`, or if the width
    /// of the range does not fit in `usize`. Whether a transition table of
    /// this width can be allocated is checked when the trie is created.
    pub fn new(first: T, last: T) -> Result<Self, Error<T>> {
        let invalid = || Error::InvalidAlphabet { first, last };
        if last < first {
            return Err(invalid());
        }
        let span = usize::try_from(last.ordinal() - first.ordinal()).map_err(|_| invalid())?;
        let width = span.checked_add(1).ok_or_else(invalid)?;
        Ok(Alphabet { first, last, width })
    }

    /// Creates an alphabet of at least two tokens.
    ///
    /// This is the check applied when a machine is constructed together with
    /// its dictionary.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidAlphabet`] if `last <= first`.
    pub fn strict(first: T, last: T) -> Result<Self, Error<T>> {
        if last <= first {
            return Err(Error::InvalidAlphabet { first, last });
        }
        Self::new(first, last)
    }

    /// The first (smallest) token of the alphabet.
    #[inline]
    pub fn first(&self) -> T {
        self.first
    }

    /// The last (largest) token of the alphabet.
    #[inline]
    pub fn last(&self) -> T {
        self.last
    }

    /// Number of tokens in the alphabet.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// True if `token` lies within `[first, last]`.
    #[inline]
    pub fn contains(&self, token: T) -> bool {
        self.first <= token && token <= self.last
    }

    /// Returns the transition table column of `token`, or None if the token is
    /// outside the alphabet.
    #[inline]
    pub fn column(&self, token: T) -> Option<usize> {
        self.contains(token)
            .then(|| (token.ordinal() - self.first.ordinal()) as usize)
    }

    /// Maps every token of `tokens` to its column.
    ///
    /// The whole sequence is checked before anything is returned, so callers
    /// can validate a word before touching any table.
    pub(crate) fn columns_of(&self, tokens: &[T]) -> Result<SmallVec<[usize; 32]>, Error<T>> {
        tokens
            .iter()
            .enumerate()
            .map(|(index, &token)| {
                self.column(token)
                    .ok_or_else(|| self.invalid_token(token, index))
            })
            .collect()
    }

    /// Returns the position and value of the first token outside the alphabet.
    pub(crate) fn check(&self, tokens: &[T]) -> Result<(), Error<T>> {
        match tokens.iter().position(|&t| !self.contains(t)) {
            Some(index) => Err(self.invalid_token(tokens[index], index)),
            None => Ok(()),
        }
    }

    fn invalid_token(&self, token: T, index: usize) -> Error<T> {
        Error::InvalidToken {
            token,
            index,
            first: self.first,
            last: self.last,
        }
    }
}
