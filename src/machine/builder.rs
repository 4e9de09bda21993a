use std::collections::VecDeque;

use smallvec::SmallVec;

use super::alphabet::Alphabet;
use super::automaton::Automaton;
use super::error::Error;
use super::token::Token;
use super::trie::{IntoWord, StateId, Transition, Trie, WordId};

/// How a state's output set absorbs the output set of its failure target.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum OutputInheritance {
    /// Every state inherits the output set of its failure target. A state is
    /// accepting if any state on its failure chain ends a word, so every
    /// occurrence of every word is reported.
    #[default]
    Full,
    /// A state inherits its failure target's outputs only if both the state
    /// itself ends a word and the failure target is accepting.
    ///
    /// Words that occur only as a suffix of a non-accepting state's prefix are
    /// then not reported there: with `{"bc", "abcd"}`, scanning `"abcd"`
    /// reports `"abcd"` but not `"bc"`.
    AcceptingOnly,
}

/// Failure links and aggregated outputs for every state of a trie.
#[derive(Clone, Debug)]
pub(crate) struct Tables {
    pub(crate) fail: Vec<StateId>,
    pub(crate) outputs: Vec<SmallVec<[WordId; 2]>>,
    pub(crate) accepting: Vec<bool>,
}

/// Computes the failure function and output sets with one breadth-first pass
/// from the root.
pub(crate) fn compile<T: Token>(trie: &Trie<T>, inheritance: OutputInheritance) -> Tables {
    let state_count = trie.state_count();
    let width = trie.alphabet().width();

    let mut fail = vec![StateId::ROOT; state_count];
    let mut outputs: Vec<SmallVec<[WordId; 2]>> = (0..state_count)
        .map(|i| trie.terminal(StateId::from_usize(i)).into_iter().collect())
        .collect();
    let mut queue = VecDeque::with_capacity(state_count);

    // Depth one: every child of the root fails to the root.
    for column in 0..width {
        if let Transition::Next(child) = trie.edge(StateId::ROOT, column) {
            queue.push_back(child);
        }
    }

    while let Some(parent) = queue.pop_front() {
        for column in 0..width {
            let Transition::Next(child) = trie.edge(parent, column) else {
                continue;
            };
            queue.push_back(child);

            let mut state = fail[parent.as_usize()];
            let target = loop {
                match trie.goto(state, column) {
                    Transition::Next(next) => break next,
                    Transition::Unset => state = fail[state.as_usize()],
                }
            };
            debug_assert!(trie.depth(target) < trie.depth(child));
            fail[child.as_usize()] = target;

            let inherit = match inheritance {
                OutputInheritance::Full => true,
                OutputInheritance::AcceptingOnly => !outputs[child.as_usize()].is_empty(),
            };
            if inherit && !outputs[target.as_usize()].is_empty() {
                let inherited = outputs[target.as_usize()].clone();
                merge_outputs(trie, &mut outputs[child.as_usize()], &inherited);
            }
        }
    }

    let accepting = outputs.iter().map(|words| !words.is_empty()).collect();
    Tables {
        fail,
        outputs,
        accepting,
    }
}

/// Adds `inherited` to `own`, keeping the set sorted by word and free of
/// duplicates.
fn merge_outputs<T: Token>(trie: &Trie<T>, own: &mut SmallVec<[WordId; 2]>, inherited: &[WordId]) {
    own.extend_from_slice(inherited);
    own.sort_unstable_by(|&a, &b| trie.word(a).cmp(trie.word(b)));
    own.dedup();
}

/// A builder for constructing an [`Automaton`] from a dictionary.
///
/// Words may be added in any order. Adding words only grows the trie; the
/// failure function and output sets are computed once, by [`build`](Builder::build)
/// or [`into_automaton`](Builder::into_automaton).
///
/// # Examples
///
/// ```
/// use libahocorasick::machine::builder::Builder;
///
/// let mut builder = Builder::new('a', 'z').unwrap();
/// for word in ["he", "she", "his", "hers"] {
///     builder.add_word(word).unwrap();
/// }
/// let automaton = builder.build();
///
/// let found: Vec<(usize, String)> = automaton
///     .find("ushers")
///     .unwrap()
///     .into_iter()
///     .map(|m| (m.start(), m.word().iter().collect()))
///     .collect();
/// assert_eq!(
///     found,
///     [(2, "he".to_string()), (1, "she".to_string()), (2, "hers".to_string())]
/// );
/// ```
#[derive(Clone, Debug)]
pub struct Builder<T: Token> {
    trie: Trie<T>,
    inheritance: OutputInheritance,
}

impl<T: Token> Builder<T> {
    /// Creates a builder for the alphabet `first..=last`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidAlphabet`] if `last < first`, or
    /// [`Error::CapacityOverflow`] if the alphabet is too wide for a transition
    /// table.
    pub fn new(first: T, last: T) -> Result<Self, Error<T>> {
        Self::with_alphabet(Alphabet::new(first, last)?)
    }

    /// Creates a builder for an existing alphabet.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityOverflow`] if the root row of the transition
    /// table cannot be allocated for an alphabet this wide.
    pub fn with_alphabet(alphabet: Alphabet<T>) -> Result<Self, Error<T>> {
        Ok(Builder {
            trie: Trie::new(alphabet)?,
            inheritance: OutputInheritance::default(),
        })
    }

    /// Sets how output sets are aggregated along failure links.
    pub fn output_inheritance(&mut self, inheritance: OutputInheritance) -> &mut Self {
        self.inheritance = inheritance;
        self
    }

    /// Adds a word to the dictionary.
    ///
    /// Returns `false` if the word was already present, in which case nothing
    /// changes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidToken`] if any token of the word is outside the
    /// alphabet, [`Error::EmptyWord`] for an empty word and
    /// [`Error::TooManyStates`] or [`Error::CapacityOverflow`] if the state
    /// space or transition table would overflow. The builder is left unchanged
    /// on error.
    pub fn add_word(&mut self, word: impl IntoWord<T>) -> Result<bool, Error<T>> {
        self.trie.insert(&word.collect_word())
    }

    /// Adds every word of `words`, stopping at the first error.
    ///
    /// Words added before the failing one stay in the dictionary.
    pub fn add_words<W: IntoWord<T>>(
        &mut self,
        words: impl IntoIterator<Item = W>,
    ) -> Result<(), Error<T>> {
        for word in words {
            self.add_word(word)?;
        }
        Ok(())
    }

    /// The alphabet of the automaton being built.
    pub fn alphabet(&self) -> &Alphabet<T> {
        self.trie.alphabet()
    }

    /// Number of trie states allocated so far, including the root.
    pub fn state_count(&self) -> usize {
        self.trie.state_count()
    }

    /// Number of distinct words added so far.
    pub fn word_count(&self) -> usize {
        self.trie.words().len()
    }

    /// Compiles the current dictionary into an automaton.
    ///
    /// The builder stays usable; words added afterwards only affect automata
    /// built later.
    pub fn build(&self) -> Automaton<T> {
        Automaton::compile(self.trie.clone(), self.inheritance)
    }

    /// Compiles the dictionary, consuming the builder.
    pub fn into_automaton(self) -> Automaton<T> {
        Automaton::compile(self.trie, self.inheritance)
    }
}

/// Builds an automaton over `first..=last` from an iterator of words.
///
/// The alphabet must hold at least two tokens. Words can be given in any
/// order and may repeat.
///
/// # Examples
///
/// ```
/// use libahocorasick::machine::builder::build_automaton;
///
/// let automaton = build_automaton([[1u8, 2], [2, 3]], 0, 9).unwrap();
/// let starts: Vec<usize> = automaton
///     .find_iter(&[1, 2, 3, 1, 2])
///     .unwrap()
///     .map(|m| m.start())
///     .collect();
/// assert_eq!(starts, [0, 1, 3]);
/// ```
///
/// # Errors
///
/// Returns [`Error::InvalidAlphabet`] if `last <= first`,
/// [`Error::CapacityOverflow`] if the alphabet is too wide for a transition
/// table, or any error of [`Builder::add_word`].
pub fn build_automaton<T, W>(
    words: impl IntoIterator<Item = W>,
    first: T,
    last: T,
) -> Result<Automaton<T>, Error<T>>
where
    T: Token,
    W: IntoWord<T>,
{
    let mut builder = Builder::with_alphabet(Alphabet::strict(first, last)?)?;
    builder.add_words(words)?;
    Ok(builder.into_automaton())
}
