/// Alphabet bounds and token-to-column mapping.
pub mod alphabet;
/// Compiled automaton and the match scanner.
pub mod automaton;
/// Builder that compiles failure links and output sets.
pub mod builder;
/// Error type shared by construction and scanning.
pub mod error;
/// Trait for types that can serve as automaton tokens.
pub mod token;
/// Goto function: the trie and its transition table.
pub mod trie;

pub use alphabet::Alphabet;
pub use automaton::{Automaton, FindIter, Match};
pub use builder::{Builder, OutputInheritance};
pub use error::Error;
pub use token::Token;
pub use trie::{IntoWord, StateId};
