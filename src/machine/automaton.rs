use std::ops::Range;
use std::slice;

use smallvec::SmallVec;

use super::alphabet::Alphabet;
use super::builder::{self, Builder, OutputInheritance, Tables};
use super::error::Error;
use super::token::Token;
use super::trie::{IntoWord, StateId, Transition, Trie, WordId};

/// A compiled Aho–Corasick automaton.
///
/// Scanning is a read-only walk over the goto, failure and output tables, so
/// an `Automaton` can be shared between threads. [`add_word`](Automaton::add_word)
/// takes `&mut self` and recompiles the whole automaton.
///
/// # Examples
///
/// ```
/// use libahocorasick::machine::Automaton;
///
/// let automaton = Automaton::with_words(["he", "she", "his", "hers"], 'a', 'z').unwrap();
///
/// let mut found: Vec<(usize, String)> = automaton
///     .find("ushers")
///     .unwrap()
///     .into_iter()
///     .map(|m| (m.start(), m.word().iter().collect()))
///     .collect();
/// found.sort();
/// assert_eq!(
///     found,
///     [(1, "she".to_string()), (2, "he".to_string()), (2, "hers".to_string())]
/// );
/// ```
#[derive(Clone, Debug)]
pub struct Automaton<T: Token> {
    trie: Trie<T>,
    inheritance: OutputInheritance,
    fail: Vec<StateId>,
    outputs: Vec<SmallVec<[WordId; 2]>>,
    accepting: Vec<bool>,
}

impl<T: Token> Automaton<T> {
    /// Creates an automaton with an empty dictionary over `first..=last`.
    ///
    /// A single-token alphabet is allowed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidAlphabet`] if `last < first`, or
    /// [`Error::CapacityOverflow`] if the alphabet is too wide for a transition
    /// table.
    pub fn new(first: T, last: T) -> Result<Self, Error<T>> {
        Ok(Builder::new(first, last)?.into_automaton())
    }

    /// Creates an automaton recognizing `words` over `first..=last`.
    ///
    /// Equivalent to [`build_automaton`](builder::build_automaton).
    pub fn with_words<W: IntoWord<T>>(
        words: impl IntoIterator<Item = W>,
        first: T,
        last: T,
    ) -> Result<Self, Error<T>> {
        builder::build_automaton(words, first, last)
    }

    pub(crate) fn compile(trie: Trie<T>, inheritance: OutputInheritance) -> Self {
        let Tables {
            fail,
            outputs,
            accepting,
        } = builder::compile(&trie, inheritance);
        log::debug!(
            "compiled automaton: {} states, {} words, alphabet width {}",
            trie.state_count(),
            trie.words().len(),
            trie.alphabet().width()
        );
        Automaton {
            trie,
            inheritance,
            fail,
            outputs,
            accepting,
        }
    }

    /// Adds a word and recompiles the failure function and output sets.
    ///
    /// Every call pays for a full pass over the automaton; to add many words,
    /// prefer a [`Builder`] and compile once.
    ///
    /// Returns `false`, without recompiling, if the word was already present.
    ///
    /// # Errors
    ///
    /// Same as [`Builder::add_word`]. The automaton is unchanged on error.
    pub fn add_word(&mut self, word: impl IntoWord<T>) -> Result<bool, Error<T>> {
        let added = self.trie.insert(&word.collect_word())?;
        if added {
            let Tables {
                fail,
                outputs,
                accepting,
            } = builder::compile(&self.trie, self.inheritance);
            self.fail = fail;
            self.outputs = outputs;
            self.accepting = accepting;
        }
        Ok(added)
    }

    /// Returns every occurrence of every dictionary word in `haystack`.
    ///
    /// Matches are ordered by end position, and by word within one position.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidToken`] if the haystack contains a token outside
    /// the alphabet.
    pub fn find(&self, haystack: impl IntoWord<T>) -> Result<Vec<Match<'_, T>>, Error<T>> {
        let haystack = haystack.collect_word();
        Ok(self.find_iter(&haystack)?.collect())
    }

    /// Appends every match in `haystack` to `sink`.
    ///
    /// Returns the number of matches appended.
    ///
    /// # Errors
    ///
    /// Same as [`find`](Automaton::find); nothing is appended on error.
    pub fn find_into<'a, E>(
        &'a self,
        haystack: impl IntoWord<T>,
        sink: &mut E,
    ) -> Result<usize, Error<T>>
    where
        E: Extend<Match<'a, T>>,
    {
        let haystack = haystack.collect_word();
        let mut count = 0;
        sink.extend(self.find_iter(&haystack)?.inspect(|_| count += 1));
        Ok(count)
    }

    /// Returns a lazy iterator over the matches in `haystack`.
    ///
    /// The haystack is checked against the alphabet before the iterator is
    /// created. Each iterator scans from the root state.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidToken`] if the haystack contains a token outside
    /// the alphabet.
    pub fn find_iter<'a, 'h>(&'a self, haystack: &'h [T]) -> Result<FindIter<'a, 'h, T>, Error<T>> {
        self.trie.alphabet().check(haystack)?;
        Ok(FindIter {
            automaton: self,
            haystack,
            state: StateId::ROOT,
            pos: 0,
            pending: Default::default(),
        })
    }

    /// True if any dictionary word occurs in `haystack`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidToken`] if the haystack contains a token outside
    /// the alphabet.
    pub fn is_match(&self, haystack: impl IntoWord<T>) -> Result<bool, Error<T>> {
        let haystack = haystack.collect_word();
        Ok(self.find_iter(&haystack)?.next().is_some())
    }

    /// True if `word` was added to the dictionary.
    pub fn contains_word(&self, word: impl IntoWord<T>) -> bool {
        self.trie
            .walk(&word.collect_word())
            .is_some_and(|state| self.trie.terminal(state).is_some())
    }

    /// Returns the distinct dictionary words in insertion order.
    pub fn words(&self) -> impl ExactSizeIterator<Item = &[T]> + '_ {
        self.trie.words().iter().map(|word| &word[..])
    }

    /// Number of distinct dictionary words.
    pub fn word_count(&self) -> usize {
        self.trie.words().len()
    }

    /// Number of states, including the root.
    pub fn state_count(&self) -> usize {
        self.trie.state_count()
    }

    /// The alphabet of this automaton.
    pub fn alphabet(&self) -> &Alphabet<T> {
        self.trie.alphabet()
    }

    /// How output sets were aggregated along failure links.
    pub fn output_inheritance(&self) -> OutputInheritance {
        self.inheritance
    }

    /// Returns the state reached by following `prefix` from the root along
    /// goto edges, or None if `prefix` is not a prefix of any word.
    pub fn state(&self, prefix: impl IntoWord<T>) -> Option<StateId> {
        self.trie.walk(&prefix.collect_word())
    }

    /// Returns the failure link of `state`, or None for the root.
    ///
    /// # Panics
    ///
    /// Panics if `state` does not belong to this automaton.
    pub fn failure(&self, state: StateId) -> Option<StateId> {
        let target = self.fail[state.as_usize()];
        (state != StateId::ROOT).then_some(target)
    }

    /// Length of the prefix that `state` represents.
    ///
    /// # Panics
    ///
    /// Panics if `state` does not belong to this automaton.
    pub fn depth(&self, state: StateId) -> usize {
        self.trie.depth(state) as usize
    }

    /// True if reaching `state` reports at least one word.
    ///
    /// # Panics
    ///
    /// Panics if `state` does not belong to this automaton.
    #[inline]
    pub fn is_accepting(&self, state: StateId) -> bool {
        self.accepting[state.as_usize()]
    }

    /// Returns the words reported when the scan reaches `state`, in
    /// lexicographic order.
    ///
    /// # Panics
    ///
    /// Panics if `state` does not belong to this automaton.
    pub fn outputs(&self, state: StateId) -> impl ExactSizeIterator<Item = &[T]> + '_ {
        self.outputs[state.as_usize()]
            .iter()
            .map(|&id| self.trie.word(id))
    }

    /// Takes one step of the scan: follows failure links until a goto edge
    /// for `column` exists. Terminates because every root column resolves.
    #[inline]
    fn next_state(&self, mut state: StateId, column: usize) -> StateId {
        loop {
            match self.trie.goto(state, column) {
                Transition::Next(next) => return next,
                Transition::Unset => state = self.fail[state.as_usize()],
            }
        }
    }
}

/// An occurrence of a dictionary word in a haystack.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Match<'a, T: Token> {
    start: usize,
    word: &'a [T],
}

impl<'a, T: Token> Match<'a, T> {
    /// Index of the first token of the occurrence.
    #[inline]
    pub fn start(&self) -> usize {
        self.start
    }

    /// Index one past the last token of the occurrence.
    #[inline]
    pub fn end(&self) -> usize {
        self.start + self.word.len()
    }

    /// Number of tokens in the occurrence.
    #[inline]
    pub fn len(&self) -> usize {
        self.word.len()
    }

    /// True if the occurrence covers no tokens. Dictionary words are never
    /// empty, so this is always false for matches reported by a scan.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.word.is_empty()
    }

    /// The haystack range covered by the occurrence.
    #[inline]
    pub fn range(&self) -> Range<usize> {
        self.start..self.end()
    }

    /// The matched dictionary word.
    #[inline]
    pub fn word(&self) -> &'a [T] {
        self.word
    }
}

/// Lazy iterator over the matches of an [`Automaton`] in a haystack.
///
/// Created by [`Automaton::find_iter`].
#[derive(Clone, Debug)]
pub struct FindIter<'a, 'h, T: Token> {
    automaton: &'a Automaton<T>,
    haystack: &'h [T],
    state: StateId,
    /// Number of haystack tokens consumed so far.
    pos: usize,
    /// Outputs of `state` not yet reported.
    pending: slice::Iter<'a, WordId>,
}

impl<'a, T: Token> Iterator for FindIter<'a, '_, T> {
    type Item = Match<'a, T>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(&id) = self.pending.next() {
                let word = self.automaton.trie.word(id);
                let m = Match {
                    start: self.pos - word.len(),
                    word,
                };
                debug_assert_eq!(&self.haystack[m.range()], word);
                return Some(m);
            }

            let &token = self.haystack.get(self.pos)?;
            // Checked by find_iter.
            let column = self.automaton.trie.alphabet().column(token)?;
            self.state = self.automaton.next_state(self.state, column);
            self.pos += 1;
            if self.automaton.is_accepting(self.state) {
                self.pending = self.automaton.outputs[self.state.as_usize()].iter();
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.pending.len(), None)
    }
}

impl<T: Token> std::iter::FusedIterator for FindIter<'_, '_, T> {}

#[cfg(test)]
mod test {
    use super::*;

    fn pairs(matches: &[Match<'_, char>]) -> Vec<(usize, String)> {
        matches
            .iter()
            .map(|m| (m.start(), m.word().iter().collect()))
            .collect()
    }

    fn classic() -> Automaton<char> {
        Automaton::with_words(["he", "she", "his", "hers"], 'a', 'z').unwrap()
    }

    #[test]
    fn ushers() {
        let automaton = classic();
        let found = automaton.find("ushers").unwrap();
        assert_eq!(
            pairs(&found),
            [(2, "he".to_string()), (1, "she".to_string()), (2, "hers".to_string())]
        );
    }

    #[test]
    fn overlapping_and_nested_occurrences() {
        let automaton = Automaton::with_words(["aa", "a", "aaa"], 'a', 'b').unwrap();
        let found = automaton.find("aaaa").unwrap();
        assert_eq!(
            pairs(&found),
            [
                (0, "a".to_string()),
                (1, "a".to_string()),
                (0, "aa".to_string()),
                (2, "a".to_string()),
                (1, "aa".to_string()),
                (0, "aaa".to_string()),
                (3, "a".to_string()),
                (2, "aa".to_string()),
                (1, "aaa".to_string()),
            ]
        );
    }

    #[test]
    fn match_accessors() {
        let automaton = classic();
        let found = automaton.find("xhersx").unwrap();
        let hers = found.iter().find(|m| m.word().len() == 4).unwrap();
        assert_eq!(hers.start(), 1);
        assert_eq!(hers.end(), 5);
        assert_eq!(hers.range(), 1..5);
        assert_eq!(hers.len(), 4);
        assert!(found.iter().all(|m| !m.is_empty() && m.len() == m.end() - m.start()));
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn full_u32_alphabet_is_rejected() {
        let expected = Error::CapacityOverflow {
            states: 1,
            width: 1 << 32,
        };
        assert_eq!(Automaton::<u32>::new(0, u32::MAX).unwrap_err(), expected);
        assert_eq!(Builder::<u32>::new(0, u32::MAX).unwrap_err(), expected);
        assert_eq!(
            Automaton::with_words([[1u32, 2]], 0, u32::MAX).unwrap_err(),
            expected
        );
    }

    #[test]
    fn empty_dictionary_and_empty_haystack() {
        let automaton = Automaton::<char>::new('a', 'z').unwrap();
        assert!(automaton.find("anything").unwrap().is_empty());
        assert!(classic().find("").unwrap().is_empty());
        assert!(classic().find("xyzzy").unwrap().is_empty());
    }

    #[test]
    fn out_of_alphabet_haystack_is_rejected() {
        let automaton = classic();
        assert_eq!(
            automaton.find("us hers").unwrap_err(),
            Error::InvalidToken {
                token: ' ',
                index: 2,
                first: 'a',
                last: 'z'
            }
        );
        assert!(automaton.find_iter(&['H']).is_err());
        assert!(automaton.is_match("SHE").is_err());
        // Still usable afterwards.
        assert_eq!(automaton.find("she").unwrap().len(), 2);
    }

    #[test]
    fn find_into_appends() {
        let automaton = classic();
        let mut sink = vec![];
        assert_eq!(automaton.find_into("ushers", &mut sink), Ok(3));
        assert_eq!(automaton.find_into("his", &mut sink), Ok(1));
        assert_eq!(sink.len(), 4);
        assert_eq!(sink[3].start(), 0);
        assert!(automaton.find_into("HIS", &mut sink).is_err());
        assert_eq!(sink.len(), 4);
    }

    #[test]
    fn find_iter_is_lazy_and_restartable() {
        let automaton = classic();
        let haystack: Vec<char> = "ushers".chars().collect();
        let mut iter = automaton.find_iter(&haystack).unwrap();
        let first = iter.next().unwrap();
        assert_eq!(first.start(), 2);
        assert_eq!(iter.clone().count(), 2);
        assert_eq!(iter.count(), 2);
        let again: Vec<_> = automaton.find_iter(&haystack).unwrap().collect();
        assert_eq!(again, automaton.find("ushers").unwrap());
    }

    #[test]
    fn is_match() {
        let automaton = classic();
        assert_eq!(automaton.is_match("ahisb"), Ok(true));
        assert_eq!(automaton.is_match("hxs"), Ok(false));
    }

    #[test]
    fn add_word_recompiles() {
        let mut automaton = classic();
        assert!(automaton.find("sherd").unwrap().iter().all(|m| m.word().len() != 5));
        assert_eq!(automaton.add_word("sherd"), Ok(true));
        assert_eq!(automaton.add_word("sherd"), Ok(false));
        let found = automaton.find("sherd").unwrap();
        assert!(found.iter().any(|m| m.start() == 0 && m.word().len() == 5));
        assert_eq!(automaton.word_count(), 5);
    }

    #[test]
    fn add_word_error_leaves_automaton_usable() {
        let mut automaton = classic();
        let states = automaton.state_count();
        assert!(automaton.add_word("sHe").is_err());
        assert_eq!(automaton.state_count(), states);
        assert_eq!(pairs(&automaton.find("ushers").unwrap()).len(), 3);
    }

    #[test]
    fn empty_automaton_grows() {
        let mut automaton = Automaton::new('a', 'a').unwrap();
        assert!(automaton.find("aaa").unwrap().is_empty());
        automaton.add_word("a").unwrap();
        assert_eq!(automaton.find("aaa").unwrap().len(), 3);
    }

    #[test]
    fn introspection() {
        let automaton = classic();
        assert_eq!(automaton.failure(StateId::ROOT), None);
        assert_eq!(automaton.depth(StateId::ROOT), 0);
        let she = automaton.state("she").unwrap();
        let he = automaton.state("he").unwrap();
        assert_eq!(automaton.failure(she), Some(he));
        assert_eq!(automaton.depth(she), 3);
        assert!(automaton.is_accepting(she));
        assert!(!automaton.is_accepting(automaton.state("sh").unwrap()));
        let outputs: Vec<String> = automaton.outputs(she).map(|w| w.iter().collect()).collect();
        assert_eq!(outputs, ["he", "she"]);
        assert_eq!(automaton.state("hex"), None);
        assert_eq!(automaton.state_count(), 10);
        assert_eq!(automaton.alphabet().width(), 26);
    }

    #[test]
    fn contains_and_lists_words() {
        let automaton = classic();
        assert!(automaton.contains_word("hers"));
        assert!(!automaton.contains_word("her"));
        assert!(!automaton.contains_word("HERS"));
        let words: Vec<String> = automaton.words().map(|w| w.iter().collect()).collect();
        assert_eq!(words, ["he", "she", "his", "hers"]);
    }

    #[test]
    fn accepting_only_misses_suffix_of_non_accepting_state() {
        let mut builder = Builder::new('a', 'z').unwrap();
        builder
            .output_inheritance(OutputInheritance::AcceptingOnly)
            .add_words(["bc", "abcd"])
            .unwrap();
        let reference = builder.build();
        let found = pairs(&reference.find("abcd").unwrap());
        assert_eq!(found, [(0, "abcd".to_string())]);

        builder.output_inheritance(OutputInheritance::Full);
        let full = builder.build();
        let found = pairs(&full.find("abcd").unwrap());
        assert_eq!(found, [(1, "bc".to_string()), (0, "abcd".to_string())]);
    }

    #[test]
    fn generic_u8_tokens() {
        let automaton =
            Automaton::with_words([vec![0u8, 255], vec![255]], u8::MIN, u8::MAX).unwrap();
        let found = automaton.find([255u8, 0, 255, 255]).unwrap();
        let spans: Vec<Range<usize>> = found.iter().map(|m| m.range()).collect();
        assert_eq!(spans, [0..1, 1..3, 2..3, 3..4]);
    }

    #[test]
    fn automaton_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Automaton<char>>();
        assert_send_sync::<Automaton<u8>>();
    }
}
