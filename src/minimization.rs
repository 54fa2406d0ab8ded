use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, trace};

use crate::{math::Partition, prelude::*};

mod table_filling;
use table_filling::PairTable;

mod union_find;
use union_find::UnionFind;

/// Assigns to every state of an automaton the representative of its equivalence class. Two states
/// have the same representative if and only if they accept the same language, the representative
/// of a class is its lexicographically least member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatePartition {
    representatives: BTreeMap<State, State>,
}

impl StatePartition {
    fn from_table(table: &PairTable<'_>) -> Self {
        let states = table.states();
        let mut classes = UnionFind::new(states.len());
        for (i, j) in table.unmarked_pairs() {
            if classes.union(i, j) {
                trace!("merging classes of {} and {}", states[i], states[j]);
            }
        }

        let representatives = (0..states.len())
            .map(|i| (states[i].clone(), states[classes.least(i)].clone()))
            .collect();
        Self { representatives }
    }

    /// Returns the representative of `state`, or `None` if `state` is not covered by the partition.
    pub fn representative(&self, state: &State) -> Option<&State> {
        self.representatives.get(state)
    }

    /// Returns `true` if `left` and `right` are covered by the partition and are equivalent.
    pub fn equivalent(&self, left: &State, right: &State) -> bool {
        match (self.representative(left), self.representative(right)) {
            (Some(l), Some(r)) => l == r,
            _ => false,
        }
    }

    /// Returns the distinct representatives in their canonical order.
    pub fn representatives(&self) -> BTreeSet<&State> {
        self.representatives.values().collect()
    }

    /// Returns the number of classes.
    pub fn size(&self) -> usize {
        self.representatives().len()
    }

    /// Iterates over all covered states together with their representative.
    pub fn iter(&self) -> impl Iterator<Item = (&State, &State)> + '_ {
        self.representatives.iter()
    }

    /// Groups the covered states into their classes.
    pub fn classes(&self) -> Partition<State> {
        let mut classes: BTreeMap<&State, Vec<State>> = BTreeMap::new();
        for (q, rep) in &self.representatives {
            classes.entry(rep).or_default().push(q.clone());
        }
        Partition::new(classes.into_values())
    }
}

/// Completes `dfa` and removes its unreachable states, which is the automaton that the
/// table-filling algorithm operates on.
fn prepare(dfa: &DFA) -> DFA {
    dfa.complete().restrict_to_reachable()
}

/// Computes the pairs of distinguishable states of the completed and trimmed version of `dfa`
/// (see [`DFA::complete`] and [`DFA::restrict_to_reachable`]). Each pair is stored only once,
/// with the lexicographically smaller state first.
pub fn distinguishable_pairs(dfa: &DFA) -> BTreeSet<(State, State)> {
    let prepared = prepare(dfa);
    let table = PairTable::fill(&prepared);
    table
        .marked_pairs()
        .map(|(l, r)| (l.clone(), r.clone()))
        .collect()
}

/// Computes the partition of the reachable states of the completed version of `dfa` into classes of
/// equivalent states. Unreachable states are not covered by the partition, the dead state is
/// covered whenever completion introduced it and it is reachable.
pub fn state_partition(dfa: &DFA) -> StatePartition {
    let prepared = prepare(dfa);
    StatePartition::from_table(&PairTable::fill(&prepared))
}

/// Builds the quotient of `dfa` with respect to `partition`, which must cover every state of `dfa`.
fn quotient(dfa: &DFA, partition: &StatePartition) -> DFA {
    let rep = |q: &State| {
        partition
            .representative(q)
            .cloned()
            .expect("partition must cover every state")
    };

    let states: BTreeSet<State> = partition.representatives().into_iter().cloned().collect();
    let finals: BTreeSet<State> = dfa.finals().iter().map(rep).collect();
    let mut transitions: BTreeMap<State, BTreeMap<Symbol, State>> = BTreeMap::new();
    for (origin, symbol, target) in dfa.transitions() {
        transitions
            .entry(rep(origin))
            .or_default()
            .insert(symbol, rep(target));
    }

    DFA::from_parts(
        dfa.alphabet().clone(),
        states,
        rep(dfa.initial()),
        finals,
        transitions,
    )
}

impl DFA {
    /// Computes the minimal automaton that accepts the same language as `self`, using the table-filling
    /// method. The automaton is first completed (see [`DFA::complete`]) and all unreachable states are
    /// removed. Then all pairs of states that are distinguished by some word are marked: first the pairs
    /// in which exactly one state is final, then, until nothing changes anymore, all pairs that reach an
    /// already marked pair on some symbol. States that are never distinguished are merged into the
    /// lexicographically least member of their class.
    ///
    /// The result is complete and reproducible, minimizing the same automaton twice yields equal results.
    ///
    /// # Example
    /// ```
    /// use dfasim::prelude::*;
    ///
    /// let dfa = DFABuilder::default()
    ///     .with_alphabet(['a'])
    ///     .with_states(["p", "q", "r"])
    ///     .with_initial("p")
    ///     .with_finals(["q", "r"])
    ///     .with_transitions([("p", 'a', "q"), ("q", 'a', "r"), ("r", 'a', "q")])
    ///     .build()
    ///     .unwrap();
    /// let minimized = dfa.minimize();
    /// assert_eq!(minimized.size(), 2);
    /// assert!(!minimized.states().contains(&State::from("r")));
    /// ```
    pub fn minimize(&self) -> DFA {
        let prepared = prepare(self);
        let table = PairTable::fill(&prepared);
        let partition = StatePartition::from_table(&table);
        let minimized = quotient(&prepared, &partition);
        debug!(
            "minimized automaton with {} states to {} states",
            self.size(),
            minimized.size()
        );
        minimized
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;
    use crate::tests::{double_zero_dfa, partial_ab_dfa, words_up_to};

    fn assert_minimal(dfa: &DFA) {
        for p in dfa.states() {
            for q in dfa.states().iter().filter(|q| *q > p) {
                assert!(
                    dfa.separate(p, q).is_some(),
                    "{p} and {q} are equivalent in\n{dfa}"
                );
            }
        }
    }

    fn assert_same_language(left: &DFA, right: &DFA, max_len: usize) {
        for word in words_up_to(left.alphabet(), max_len) {
            assert_eq!(
                left.accepts(word.iter().copied()),
                right.accepts(word.iter().copied()),
                "disagreement on {}",
                word.show()
            );
        }
    }

    #[test_log::test]
    fn already_minimal() {
        let dfa = double_zero_dfa();
        assert_eq!(dfa.minimize(), dfa);
        assert_eq!(distinguishable_pairs(&dfa).len(), 3);
    }

    #[test_log::test]
    fn equivalent_states_are_merged() {
        // B and C are both non-final and have identical transitions
        let dfa = DFABuilder::default()
            .with_alphabet(['a', 'b'])
            .with_states(["A", "B", "C", "D"])
            .with_initial("A")
            .with_finals(["D"])
            .with_transitions([
                ("A", 'a', "B"),
                ("A", 'b', "C"),
                ("B", 'a', "D"),
                ("B", 'b', "D"),
                ("C", 'a', "D"),
                ("C", 'b', "D"),
                ("D", 'a', "D"),
                ("D", 'b', "D"),
            ])
            .build()
            .unwrap();
        let partition = state_partition(&dfa);
        assert!(partition.equivalent(&State::from("B"), &State::from("C")));
        assert_eq!(partition.representative(&State::from("C")), Some(&State::from("B")));

        let minimized = dfa.minimize();
        assert_eq!(minimized.size(), 3);
        assert_eq!(
            minimized.successor(&State::from("A"), 'b'),
            Some(&State::from("B"))
        );
        assert_minimal(&minimized);
        assert_same_language(&dfa, &minimized, 5);
    }

    #[test_log::test]
    fn unreachable_states_disappear() {
        let dfa = DFABuilder::default()
            .with_alphabet(['0', '1'])
            .with_states(["A", "B", "C", "D"])
            .with_initial("A")
            .with_finals(["C", "D"])
            .with_transitions([
                ("A", '0', "B"),
                ("A", '1', "A"),
                ("B", '0', "C"),
                ("B", '1', "A"),
                ("C", '0', "C"),
                ("C", '1', "C"),
                ("D", '0', "C"),
                ("D", '1', "D"),
            ])
            .build()
            .unwrap();
        let minimized = dfa.minimize();
        assert!(!minimized.states().contains(&State::from("D")));
        assert!(state_partition(&dfa).representative(&State::from("D")).is_none());
        assert_eq!(minimized, double_zero_dfa());
    }

    #[test_log::test]
    fn partial_automaton_is_completed() {
        let dfa = partial_ab_dfa();
        let minimized = dfa.minimize();
        assert!(minimized.is_complete());
        assert_eq!(minimized.size(), 4);
        assert!(minimized.states().contains(&State::from(DEAD_STATE_NAME)));
        assert_minimal(&minimized);
        assert_same_language(&dfa, &minimized, 5);
    }

    #[test_log::test]
    fn empty_language_collapses_to_one_state() {
        let dfa = DFABuilder::default()
            .with_alphabet(['a', 'b'])
            .with_states(["x", "y"])
            .with_initial("y")
            .with_transitions([("y", 'a', "x"), ("x", 'b', "y")])
            .build()
            .unwrap();
        let minimized = dfa.minimize();
        assert_eq!(minimized.size(), 1);
        assert_eq!(minimized.initial(), &State::from(DEAD_STATE_NAME));
        assert!(minimized.finals().is_empty());
        assert!(minimized.is_complete());
        assert_eq!(state_partition(&dfa).classes().size(), 1);
    }

    #[test]
    fn representative_is_least_member() {
        // all of z, y and x accept every word, the class is represented by x
        let dfa = DFABuilder::default()
            .with_alphabet(['a'])
            .with_states(["x", "y", "z"])
            .with_initial("z")
            .with_finals(["x", "y", "z"])
            .with_transitions([("z", 'a', "y"), ("y", 'a', "x"), ("x", 'a', "z")])
            .build()
            .unwrap();
        let minimized = dfa.minimize();
        assert_eq!(minimized.size(), 1);
        assert_eq!(minimized.initial(), &State::from("x"));
        assert_eq!(minimized.successor(&State::from("x"), 'a'), Some(&State::from("x")));
        assert_eq!(
            state_partition(&dfa).classes().first().map(|c| c.len()),
            Some(3)
        );
    }

    #[test_log::test]
    fn redundant_description() {
        let dfa: DFA = include_str!("../demos/redundant.dfa").parse().unwrap();
        let minimized = dfa.minimize();
        assert_eq!(
            minimized.states().iter().map(State::label).collect::<Vec<_>>(),
            vec!["2", "A", "B", "q_dead"]
        );
        assert_eq!(
            table::render(&minimized),
            "Estado\ta\tb\n2\tq_dead\tq_dead\nA\tB\tB\nB\t2\tq_dead\nq_dead\tq_dead\tq_dead\n"
        );
        assert!(minimized.accepts("ba".chars()));
        assert!(!minimized.accepts("bb".chars()));
    }

    #[test]
    fn minimization_is_idempotent_and_deterministic() {
        for dfa in [double_zero_dfa(), partial_ab_dfa()] {
            let once = dfa.minimize();
            assert_eq!(once.minimize(), once);
            assert_eq!(dfa.minimize(), once);
        }
    }

    #[cfg(feature = "random")]
    #[test_log::test]
    fn random_automata() {
        fastrand::seed(0x5eed);
        for size in 1..8 {
            for _ in 0..20 {
                let dfa = crate::random::generate_random_dfa(2, size);
                let minimized = dfa.minimize();
                assert!(minimized.is_complete());
                assert!(minimized.size() <= dfa.size() + 1);
                assert_minimal(&minimized);
                assert_same_language(&dfa, &minimized, 6);
                assert_eq!(minimized.minimize(), minimized);
            }
        }
    }
}
