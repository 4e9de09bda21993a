use smallvec::SmallVec;

use super::alphabet::Alphabet;
use super::error::Error;
use super::token::Token;

/// Trait for types that can be used as a word or a haystack.
///
/// Implemented for common string and sequence types so that
/// [`Builder::add_word`](super::builder::Builder::add_word) and
/// [`Automaton::find`](super::automaton::Automaton::find) accept them
/// directly without manual conversion.
pub trait IntoWord<T: Token> {
    /// Collects this word into a token buffer.
    fn collect_word(self) -> SmallVec<[T; 32]>;
}

// String types → char

impl IntoWord<char> for &str {
    fn collect_word(self) -> SmallVec<[char; 32]> {
        self.chars().collect()
    }
}

impl IntoWord<char> for &&str {
    fn collect_word(self) -> SmallVec<[char; 32]> {
        self.chars().collect()
    }
}

impl IntoWord<char> for String {
    fn collect_word(self) -> SmallVec<[char; 32]> {
        self.chars().collect()
    }
}

impl IntoWord<char> for &String {
    fn collect_word(self) -> SmallVec<[char; 32]> {
        self.chars().collect()
    }
}

// Generic sequence types → T

impl<T: Token> IntoWord<T> for &[T] {
    fn collect_word(self) -> SmallVec<[T; 32]> {
        self.iter().copied().collect()
    }
}

impl<T: Token> IntoWord<T> for Vec<T> {
    fn collect_word(self) -> SmallVec<[T; 32]> {
        self.into_iter().collect()
    }
}

impl<T: Token> IntoWord<T> for &Vec<T> {
    fn collect_word(self) -> SmallVec<[T; 32]> {
        self.iter().copied().collect()
    }
}

impl<T: Token, const N: usize> IntoWord<T> for [T; N] {
    fn collect_word(self) -> SmallVec<[T; 32]> {
        self.into_iter().collect()
    }
}

impl<T: Token, const N: usize> IntoWord<T> for &[T; N] {
    fn collect_word(self) -> SmallVec<[T; 32]> {
        self.iter().copied().collect()
    }
}

/// Dense index of an automaton state. The root is always state 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StateId(u32);

impl StateId {
    /// The root state, representing the empty prefix.
    pub const ROOT: StateId = StateId(0);

    /// Largest number of states an automaton can hold.
    pub const LIMIT: usize = u32::MAX as usize;

    /// Returns this state as an index into per-state tables.
    #[inline]
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub(crate) fn from_usize(index: usize) -> StateId {
        debug_assert!(index < Self::LIMIT);
        StateId(index as u32)
    }
}

/// Dense index of a distinct dictionary word, in insertion order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct WordId(u32);

impl WordId {
    #[inline]
    pub(crate) fn as_usize(self) -> usize {
        self.0 as usize
    }
}

/// One cell of the transition table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum Transition {
    /// No goto edge for this (state, token) pair.
    #[default]
    Unset,
    /// Goto edge to the given state.
    Next(StateId),
}

/// The goto function: a trie over the dictionary stored as one flat
/// `states × width` table.
#[derive(Clone, Debug)]
pub(crate) struct Trie<T: Token> {
    alphabet: Alphabet<T>,
    transitions: Vec<Transition>,
    depth: Vec<u32>,
    /// The word spelled by the root-to-state path, if it was inserted.
    terminal: Vec<Option<WordId>>,
    words: Vec<Box<[T]>>,
}

impl<T: Token> Trie<T> {
    /// Creates a trie holding only the root state.
    ///
    /// Fails with [`Error::CapacityOverflow`] if even the root row cannot be
    /// allocated.
    pub(crate) fn new(alphabet: Alphabet<T>) -> Result<Self, Error<T>> {
        let mut transitions = Vec::new();
        reserve_cells(&mut transitions, 1, alphabet.width())?;
        transitions.resize(alphabet.width(), Transition::Unset);
        Ok(Trie {
            alphabet,
            transitions,
            depth: vec![0],
            terminal: vec![None],
            words: Vec::new(),
        })
    }

    #[inline]
    pub(crate) fn alphabet(&self) -> &Alphabet<T> {
        &self.alphabet
    }

    #[inline]
    pub(crate) fn state_count(&self) -> usize {
        self.depth.len()
    }

    #[inline]
    pub(crate) fn depth(&self, state: StateId) -> u32 {
        self.depth[state.as_usize()]
    }

    #[inline]
    pub(crate) fn terminal(&self, state: StateId) -> Option<WordId> {
        self.terminal[state.as_usize()]
    }

    #[inline]
    pub(crate) fn word(&self, id: WordId) -> &[T] {
        &self.words[id.as_usize()]
    }

    #[inline]
    pub(crate) fn words(&self) -> &[Box<[T]>] {
        &self.words
    }

    /// The raw trie edge, without resolving the root's missing edges.
    #[inline]
    pub(crate) fn edge(&self, state: StateId, column: usize) -> Transition {
        self.transitions[state.as_usize() * self.alphabet.width() + column]
    }

    /// The goto function. Every column of the root resolves: a missing root
    /// edge loops back to the root.
    #[inline]
    pub(crate) fn goto(&self, state: StateId, column: usize) -> Transition {
        match self.edge(state, column) {
            Transition::Unset if state == StateId::ROOT => Transition::Next(StateId::ROOT),
            t => t,
        }
    }

    /// Follows `word`'s path from the root. Returns None if the path leaves
    /// the trie or a token is outside the alphabet.
    pub(crate) fn walk(&self, word: &[T]) -> Option<StateId> {
        word.iter().try_fold(StateId::ROOT, |state, &token| {
            match self.edge(state, self.alphabet.column(token)?) {
                Transition::Next(next) => Some(next),
                Transition::Unset => None,
            }
        })
    }

    /// Adds `word` to the trie, reusing states for any prefix already present.
    ///
    /// Returns false if the word was already in the dictionary. Nothing is
    /// mutated when an error is returned.
    pub(crate) fn insert(&mut self, word: &[T]) -> Result<bool, Error<T>> {
        if word.is_empty() {
            return Err(Error::EmptyWord);
        }
        let columns = self.alphabet.columns_of(word)?;

        let (mut state, matched) = self.longest_prefix(&columns);
        let new_states = columns.len() - matched;
        let too_many = self.state_count() + new_states > StateId::LIMIT;
        if too_many || self.words.len() >= u32::MAX as usize {
            return Err(Error::TooManyStates { max: StateId::LIMIT });
        }
        reserve_cells(&mut self.transitions, new_states, self.alphabet.width())?;

        for &column in &columns[matched..] {
            let next = self.alloc_state(self.depth(state) + 1);
            let cell = state.as_usize() * self.alphabet.width() + column;
            self.transitions[cell] = Transition::Next(next);
            state = next;
        }

        let terminal = &mut self.terminal[state.as_usize()];
        if terminal.is_some() {
            return Ok(false);
        }
        *terminal = Some(WordId(self.words.len() as u32));
        self.words.push(word.into());
        log::trace!("added word {word:?} ending at state {}", state.as_usize());
        Ok(true)
    }

    /// Returns the deepest existing state on the path of `columns`, and the
    /// number of columns consumed to reach it.
    fn longest_prefix(&self, columns: &[usize]) -> (StateId, usize) {
        let mut state = StateId::ROOT;
        for (matched, &column) in columns.iter().enumerate() {
            match self.edge(state, column) {
                Transition::Next(next) => state = next,
                Transition::Unset => return (state, matched),
            }
        }
        (state, columns.len())
    }

    /// Appends an all-unset row. Room for it must already be reserved.
    fn alloc_state(&mut self, depth: u32) -> StateId {
        let id = StateId::from_usize(self.state_count());
        self.transitions
            .resize(self.transitions.len() + self.alphabet.width(), Transition::Unset);
        self.depth.push(depth);
        self.terminal.push(None);
        id
    }
}

/// Largest transition table, in cells.
pub(crate) const MAX_CELLS: usize = u32::MAX as usize;

/// Number of cells in a table of `states` rows of `width` columns, or None
/// if that exceeds [`MAX_CELLS`].
pub(crate) fn table_cells(states: usize, width: usize) -> Option<usize> {
    states.checked_mul(width).filter(|&cells| cells <= MAX_CELLS)
}

/// Reserves room for `new_states` more rows in `transitions`.
fn reserve_cells<T: Token>(
    transitions: &mut Vec<Transition>,
    new_states: usize,
    width: usize,
) -> Result<(), Error<T>> {
    let states = transitions.len() / width + new_states;
    let overflow = || Error::CapacityOverflow { states, width };
    let total = table_cells(states, width).ok_or_else(overflow)?;
    transitions
        .try_reserve_exact(total - transitions.len())
        .map_err(|_| overflow())
}
