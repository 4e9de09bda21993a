//! # libahocorasick
//!
//! Multi-pattern exact matching with an [Aho–Corasick](https://en.wikipedia.org/wiki/Aho%E2%80%93Corasick_algorithm)
//! automaton.
//!
//! The automaton finds every occurrence of every dictionary word in a
//! haystack in one left-to-right pass, overlapping and nested occurrences
//! included. It follows the construction in Aho & Corasick (1975): a trie
//! (goto function), failure links computed breadth first, and output sets
//! aggregated along the failure links.
//!
//! ## Features
//!
//! - **Generic over token type**: works with `char`, `u8`, `u16` and `u32`, or
//!   any type implementing [`Token`](machine::Token)
//! - **Dense tables**: one flat `states × alphabet width` transition table,
//!   sized by the inclusive alphabet bounds given at construction
//! - **Explicit compile step**: add words to a [`Builder`](machine::Builder)
//!   and compile once into an immutable [`Automaton`](machine::Automaton)
//!
//! ## Quick Start
//!
//! ```
//! use libahocorasick::machine::Automaton;
//!
//! let automaton = Automaton::with_words(["he", "she", "his", "hers"], 'a', 'z').unwrap();
//! let found: Vec<(usize, usize)> = automaton
//!     .find("ushers")
//!     .unwrap()
//!     .iter()
//!     .map(|m| (m.start(), m.end()))
//!     .collect();
//! assert_eq!(found, [(2, 4), (1, 4), (2, 6)]);
//! ```
//!
//! Tokens outside the alphabet are rejected rather than skipped:
//!
//! ```
//! use libahocorasick::machine::{Automaton, Error};
//!
//! let automaton = Automaton::with_words(["he"], 'a', 'z').unwrap();
//! assert!(matches!(automaton.find("HE"), Err(Error::InvalidToken { token: 'H', index: 0, .. })));
//! ```
//!
//! ## Generic Usage
//!
//! ```
//! use libahocorasick::machine::builder::Builder;
//!
//! let mut builder = Builder::<u8>::new(0, 15).unwrap();
//! builder.add_word([1, 2, 3]).unwrap();
//! builder.add_word([2, 3]).unwrap();
//! let automaton = builder.build();
//!
//! let starts: Vec<usize> = automaton.find_iter(&[1, 2, 3]).unwrap().map(|m| m.start()).collect();
//! assert_eq!(starts, [0, 1]);
//! ```

#![warn(missing_docs)]

/// Core automaton: alphabet, trie, builder and scanner.
pub mod machine;
