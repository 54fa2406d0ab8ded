use std::collections::BTreeSet;

use itertools::Itertools;

/// The symbols of a [`CharAlphabet`] are single characters.
pub type Symbol = char;

/// Represents an alphabet where a [`Symbol`] is just a single `char`.
///
/// The symbols are stored in sorted order and without duplicates, iterating over the
/// alphabet through [`CharAlphabet::universe`] therefore always yields the symbols in
/// their canonical order.
///
/// # Example
/// ```
/// use dfasim::prelude::*;
///
/// let alphabet = CharAlphabet::from_iter(['b', 'a', 'b']);
/// assert_eq!(alphabet.size(), 2);
/// assert_eq!(alphabet.universe().collect::<Vec<_>>(), vec!['a', 'b']);
/// ```
#[derive(Clone, Hash, PartialEq, Eq, Debug, PartialOrd, Ord, Default)]
pub struct CharAlphabet(BTreeSet<Symbol>);

impl CharAlphabet {
    /// Creates a new [`CharAlphabet`] alphabet of the given size. The symbols are just the first `size` letters
    /// of the alphabet, i.e. 'a' to 'z'.
    pub fn of_size(size: usize) -> Self {
        assert!(size <= 26, "Alphabet is too large");
        Self((0..size).map(|i| (b'a' + i as u8) as char).collect())
    }

    /// Returns the number of symbols in the alphabet.
    pub fn size(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the alphabet contains no symbols at all.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Checks whether `symbol` belongs to the alphabet.
    pub fn contains(&self, symbol: Symbol) -> bool {
        self.0.contains(&symbol)
    }

    /// Iterates over all symbols in sorted order.
    pub fn universe(&self) -> impl Iterator<Item = Symbol> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<Symbol> for CharAlphabet {
    fn from_iter<T: IntoIterator<Item = Symbol>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl std::fmt::Display for CharAlphabet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.universe().join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::CharAlphabet;

    #[test]
    fn alphabet_of_size() {
        let alphabet = CharAlphabet::of_size(3);
        assert!(alphabet.contains('c'));
        assert!(!alphabet.contains('d'));
        assert_eq!(alphabet.to_string(), "a b c");
        assert!(CharAlphabet::of_size(0).is_empty());
    }
}
