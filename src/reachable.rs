use std::collections::{BTreeMap, BTreeSet, VecDeque};

use tracing::trace;

use crate::{math::Set, prelude::*};

/// Computes the set of states that can be reached from the initial state of `dfa` by reading
/// some word. This is done by a breadth-first search over the defined transitions, targets
/// which are not states of the automaton are not followed.
pub fn reachable_states(dfa: &DFA) -> BTreeSet<State> {
    let mut seen: Set<&State> = Set::default();
    seen.insert(dfa.initial());
    let mut queue = VecDeque::from([dfa.initial()]);

    while let Some(q) = queue.pop_front() {
        for a in dfa.alphabet().universe() {
            if let Some(p) = dfa.successor(q, a) {
                if dfa.states().contains(p) && seen.insert(p) {
                    queue.push_back(p);
                }
            }
        }
    }

    seen.into_iter().cloned().collect()
}

impl DFA {
    /// Returns a new automaton in which all states that can not be reached from the initial
    /// state are removed, together with their outgoing transitions. The final states are
    /// restricted accordingly.
    pub fn restrict_to_reachable(&self) -> DFA {
        let reachable = reachable_states(self);
        trace!(
            "{} of {} states are reachable",
            reachable.len(),
            self.size()
        );

        let finals: BTreeSet<State> = self.finals().intersection(&reachable).cloned().collect();
        let transitions: BTreeMap<State, BTreeMap<Symbol, State>> = reachable
            .iter()
            .map(|q| {
                let row: BTreeMap<Symbol, State> = self
                    .alphabet()
                    .universe()
                    .filter_map(|a| self.successor(q, a).map(|p| (a, p.clone())))
                    .collect();
                (q.clone(), row)
            })
            .collect();

        DFA::from_parts(
            self.alphabet().clone(),
            reachable,
            self.initial().clone(),
            finals,
            transitions,
        )
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;
    use crate::tests::{double_zero_dfa, partial_ab_dfa};

    #[test]
    fn all_states_reachable() {
        let dfa = double_zero_dfa();
        assert_eq!(&reachable_states(&dfa), dfa.states());
        assert_eq!(dfa.restrict_to_reachable(), dfa);
    }

    #[test]
    fn unreachable_states_are_removed() {
        let dfa = DFABuilder::default()
            .with_alphabet(['a'])
            .with_states(["p", "q", "r"])
            .with_initial("p")
            .with_finals(["p", "r"])
            .with_transitions([("p", 'a', "q"), ("q", 'a', "p"), ("r", 'a', "p")])
            .build()
            .unwrap();
        let trimmed = dfa.restrict_to_reachable();
        assert_eq!(trimmed.size(), 2);
        assert!(!trimmed.states().contains(&State::from("r")));
        assert_eq!(trimmed.finals().len(), 1);
        assert_eq!(trimmed.transition_count(), 2);
    }

    #[test]
    fn dangling_targets_are_not_followed() {
        let dfa = DFA::new(
            CharAlphabet::from_iter(['a', 'b']),
            ["p"],
            "p",
            ["p"],
            [("p", 'a', "gone")],
        )
        .unwrap();
        assert_eq!(reachable_states(&dfa).len(), 1);
        assert_eq!(dfa.restrict_to_reachable(), dfa);
        assert_eq!(reachable_states(&partial_ab_dfa()).len(), 3);
    }
}
