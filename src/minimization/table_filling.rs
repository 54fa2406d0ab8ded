use bit_set::BitSet;
use tracing::{debug, trace};

use crate::{math::Map, prelude::*};

/// The table of the table-filling algorithm. States are numbered by their position in the
/// canonical order and every unordered pair `{i, j}` with `i < j` occupies one bit in a
/// triangular layout, a set bit means that the two states are distinguishable.
#[derive(Debug, Clone)]
pub(crate) struct PairTable<'a> {
    states: Vec<&'a State>,
    marked: BitSet,
}

/// Position of the pair `{i, j}` in the triangular layout, requires `i < j`.
fn pair_index(i: usize, j: usize) -> usize {
    debug_assert!(i < j);
    j * (j - 1) / 2 + i
}

/// Position of the pair `{i, j}` regardless of the order of its components, requires `i != j`.
fn unordered_pair_index(i: usize, j: usize) -> usize {
    if i < j {
        pair_index(i, j)
    } else {
        pair_index(j, i)
    }
}

impl<'a> PairTable<'a> {
    /// Runs the table-filling algorithm on `dfa`, which must be complete and must not have
    /// transitions leading outside of its states.
    pub(crate) fn fill(dfa: &'a DFA) -> Self {
        let states: Vec<&State> = dfa.states().iter().collect();
        let position: Map<&State, usize> = states.iter().enumerate().map(|(i, q)| (*q, i)).collect();
        let successors: Vec<Vec<usize>> = states
            .iter()
            .map(|q| {
                dfa.alphabet()
                    .universe()
                    .map(|a| {
                        let p = dfa
                            .successor(q, a)
                            .expect("table filling requires a complete automaton");
                        *position
                            .get(p)
                            .expect("transition leads outside of the automaton")
                    })
                    .collect()
            })
            .collect();

        let n = states.len();
        let pairs = n * n.saturating_sub(1) / 2;
        debug!("filling table for {n} states with {pairs} pairs");

        let mut marked = BitSet::with_capacity(pairs);
        for j in 0..n {
            for i in 0..j {
                if dfa.is_final(states[i]) != dfa.is_final(states[j]) {
                    marked.insert(pair_index(i, j));
                }
            }
        }
        trace!("{} pairs are distinguished by the empty word", marked.len());

        let mut round = 0;
        loop {
            round += 1;
            let mut fresh = vec![];
            for j in 0..n {
                for i in 0..j {
                    let idx = pair_index(i, j);
                    if marked.contains(idx) {
                        continue;
                    }
                    let separated = successors[i]
                        .iter()
                        .zip(successors[j].iter())
                        .any(|(&p, &q)| p != q && marked.contains(unordered_pair_index(p, q)));
                    if separated {
                        fresh.push(idx);
                    }
                }
            }
            trace!("round {round} marked {} new pairs", fresh.len());
            if fresh.is_empty() {
                break;
            }
            marked.extend(fresh);
        }
        debug!(
            "table filling stabilized after {round} rounds with {} of {pairs} pairs marked",
            marked.len()
        );

        Self { states, marked }
    }

    /// The states in their canonical order, the position in this slice is the number of a state.
    pub(crate) fn states(&self) -> &[&'a State] {
        &self.states
    }

    /// Returns `true` if the states with numbers `i` and `j` are distinguishable.
    pub(crate) fn is_marked(&self, i: usize, j: usize) -> bool {
        i != j && self.marked.contains(unordered_pair_index(i, j))
    }

    /// Iterates over all unordered pairs `(i, j)` with `i < j` that were never marked, i.e. the
    /// pairs of equivalent states.
    pub(crate) fn unmarked_pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.states.len())
            .flat_map(|j| (0..j).map(move |i| (i, j)))
            .filter(|&(i, j)| !self.is_marked(i, j))
    }

    /// Iterates over all marked pairs, each given as a pair of states where the first
    /// component is the smaller one.
    pub(crate) fn marked_pairs(&self) -> impl Iterator<Item = (&'a State, &'a State)> + '_ {
        (0..self.states.len())
            .flat_map(|j| (0..j).map(move |i| (i, j)))
            .filter(|&(i, j)| self.is_marked(i, j))
            .map(|(i, j)| (self.states[i], self.states[j]))
    }
}

#[cfg(test)]
mod tests {
    use super::{pair_index, PairTable};
    use crate::tests::double_zero_dfa;

    #[test]
    fn triangular_layout_is_dense() {
        let indices: Vec<usize> = (0..5)
            .flat_map(|j| (0..j).map(move |i| pair_index(i, j)))
            .collect();
        assert_eq!(indices, (0..10).collect::<Vec<_>>());
    }

    #[test_log::test]
    fn all_pairs_distinguishable() {
        let dfa = double_zero_dfa();
        let table = PairTable::fill(&dfa);
        assert_eq!(table.unmarked_pairs().count(), 0);
        assert_eq!(table.marked_pairs().count(), 3);
        assert!(table.is_marked(2, 0));
        assert!(!table.is_marked(1, 1));
    }
}
