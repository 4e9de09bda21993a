use std::fmt::Debug;
use std::hash::Hash;

/// Trait for types that can serve as tokens of an automaton's alphabet.
///
/// - `Copy`: transitions are looked up by value
/// - `Eq + Ord`: bounds checks and lexicographic ordering of matched words
/// - `Hash`: callers may key sets of words or matches by token sequences
/// - `Debug`: error messages and debug printing
///
/// `ordinal` must agree with `Ord`: `a < b` if and only if
/// `a.ordinal() < b.ordinal()`. The column of a token in the transition
/// table is its ordinal minus the ordinal of the alphabet's first token.
pub trait Token: Copy + Eq + Ord + Hash + Debug {
    /// Returns the position of this token in the token type's total order.
    fn ordinal(self) -> u32;
}

macro_rules! impl_token {
    ($($ty:ty),*) => {
        $(
            impl Token for $ty {
                #[inline]
                fn ordinal(self) -> u32 {
                    u32::from(self)
                }
            }
        )*
    };
}

impl_token!(u8, u16, u32, char);

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn ordinal_agrees_with_ord() {
        assert!('a'.ordinal() < 'z'.ordinal());
        assert_eq!('a'.ordinal(), 97);
        assert_eq!(200u8.ordinal(), 200);
        assert_eq!(u16::MAX.ordinal(), 65535);
        assert_eq!('授'.ordinal(), '授' as u32);
    }
}
