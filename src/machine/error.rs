use super::token::Token;

/// Errors that can occur when building or scanning with an automaton.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error<T: Token> {
    /// The alphabet bounds are out of order, or too wide to index.
    ///
    /// The multi-word constructors additionally reject a one-token alphabet.
    #[error("invalid alphabet [{first:?}, {last:?}]")]
    InvalidAlphabet {
        /// First token of the rejected alphabet.
        first: T,
        /// Last token of the rejected alphabet.
        last: T,
    },
    /// A word or haystack contains a token outside the alphabet.
    #[error("token {token:?} at index {index} is outside the alphabet [{first:?}, {last:?}]")]
    InvalidToken {
        /// The offending token.
        token: T,
        /// Index of the offending token in the word or haystack.
        index: usize,
        /// First token of the alphabet.
        first: T,
        /// Last token of the alphabet.
        last: T,
    },
    /// Empty words cannot be added to the dictionary.
    #[error("cannot add an empty word")]
    EmptyWord,
    /// The transition table would exceed its size limit, or could not be
    /// allocated.
    #[error("transition table of {states} states with {width} columns is too large")]
    CapacityOverflow {
        /// Number of states the table would hold.
        states: usize,
        /// Number of columns per state.
        width: usize,
    },
    /// The word would grow the automaton past the largest representable state.
    #[error("automaton cannot hold more than {max} states")]
    TooManyStates {
        /// The maximum number of states.
        max: usize,
    },
}
