use std::collections::BTreeMap;

use tracing::{debug, trace, warn};

use crate::prelude::*;

/// The label that the dead state receives, unless a state with that label already exists.
pub const DEAD_STATE_NAME: &str = "q_dead";

/// Appended to [`DEAD_STATE_NAME`] until the label is not taken by any state.
const DISAMBIGUATION_MARKER: char = '_';

/// Produces a label for the dead state that does not collide with any of the given states.
/// The label is derived deterministically from [`DEAD_STATE_NAME`].
pub fn fresh_dead_state<'a, I: IntoIterator<Item = &'a State>>(states: I) -> State {
    let taken: crate::math::Set<&str> = states.into_iter().map(|q| q.label()).collect();
    let mut label = DEAD_STATE_NAME.to_string();
    while taken.contains(label.as_str()) {
        label.push(DISAMBIGUATION_MARKER);
    }
    State::new(label)
}

impl DFA {
    /// Turns the transition function into a total one. A fresh, non-accepting dead state is added,
    /// every undefined transition is redirected into it and all transitions of the dead state
    /// loop back to it. Defined transitions are kept as they are, with the exception of transitions
    /// whose target is not a state of the automaton: as such a target is neither accepting nor has
    /// outgoing transitions, it behaves exactly like the dead state and is replaced by it.
    ///
    /// An automaton that is complete already is returned unchanged, no dead state is added in that
    /// case. This makes completion idempotent, `dfa.complete().complete() == dfa.complete()`.
    ///
    /// # Example
    /// ```
    /// use dfasim::prelude::*;
    ///
    /// let dfa: DFA = "alphabet: a b\nstates: p\ninitial: p\nfinals: p\np a -> p".parse().unwrap();
    /// let complete = dfa.complete();
    /// assert!(complete.is_complete());
    /// assert_eq!(complete.size(), 2);
    /// assert_eq!(
    ///     complete.successor(&State::from("p"), 'b'),
    ///     Some(&State::from(DEAD_STATE_NAME))
    /// );
    /// ```
    pub fn complete(&self) -> DFA {
        if self.is_complete() {
            trace!("automaton is complete already");
            return self.clone();
        }

        let dead = fresh_dead_state(self.states());
        debug!(
            "completing automaton with {} states using dead state {dead}",
            self.size()
        );

        let mut transitions: BTreeMap<State, BTreeMap<Symbol, State>> = BTreeMap::new();
        for q in self.states() {
            let row = transitions.entry(q.clone()).or_default();
            for a in self.alphabet().universe() {
                let target = match self.successor(q, a) {
                    Some(p) if self.states().contains(p) => p.clone(),
                    Some(p) => {
                        warn!("δ({q}, {a}) = {p} leads outside of the automaton, redirecting to {dead}");
                        dead.clone()
                    }
                    None => dead.clone(),
                };
                row.insert(a, target);
            }
        }
        transitions.insert(
            dead.clone(),
            self.alphabet()
                .universe()
                .map(|a| (a, dead.clone()))
                .collect(),
        );

        let mut states = self.states().clone();
        states.insert(dead);

        DFA::from_parts(
            self.alphabet().clone(),
            states,
            self.initial().clone(),
            self.finals().clone(),
            transitions,
        )
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;
    use crate::tests::{double_zero_dfa, partial_ab_dfa, words_up_to};

    use super::fresh_dead_state;

    #[test]
    fn dead_state_does_not_collide() {
        let states = [State::from("q_dead"), State::from("q_dead_"), State::from("x")];
        assert_eq!(fresh_dead_state(&states), State::from("q_dead__"));
        assert_eq!(
            fresh_dead_state(std::iter::empty()),
            State::from(DEAD_STATE_NAME)
        );
    }

    #[test_log::test]
    fn completion_is_total() {
        let dfa = partial_ab_dfa();
        let complete = dfa.complete();
        assert!(complete.is_complete());
        assert_eq!(complete.size(), dfa.size() + 1);
        assert_eq!(complete.initial(), dfa.initial());
        assert_eq!(complete.finals(), dfa.finals());
        let dead = State::from(DEAD_STATE_NAME);
        assert!(!complete.is_final(&dead));
        for a in complete.alphabet().universe() {
            assert_eq!(complete.successor(&dead, a), Some(&dead));
        }
    }

    #[test]
    fn complete_automaton_is_unchanged() {
        let dfa = double_zero_dfa();
        assert_eq!(dfa.complete(), dfa);
        assert!(!dfa
            .complete()
            .states()
            .contains(&State::from(DEAD_STATE_NAME)));
    }

    #[test]
    fn completion_keeps_defined_transitions() {
        let dfa = partial_ab_dfa();
        let complete = dfa.complete();
        for (p, a, q) in dfa.transitions() {
            assert_eq!(complete.successor(p, a), Some(q));
        }
        assert_eq!(
            complete.successor(&State::from("2"), 'a'),
            Some(&State::from(DEAD_STATE_NAME))
        );
    }

    #[test]
    fn completion_is_idempotent() {
        let once = partial_ab_dfa().complete();
        assert_eq!(once.complete(), once);
    }

    #[test_log::test]
    fn completion_preserves_language() {
        let dangling = DFA::new(
            CharAlphabet::from_iter(['a', 'b']),
            ["p", "q"],
            "p",
            ["q"],
            [("p", 'a', "q"), ("q", 'b', "nowhere"), ("q", 'a', "p")],
        )
        .unwrap();
        for dfa in [partial_ab_dfa(), dangling] {
            let complete = dfa.complete();
            assert!(complete.is_complete());
            for word in words_up_to(dfa.alphabet(), 5) {
                assert_eq!(dfa.accepts(word.iter().copied()), complete.accepts(word));
            }
        }
    }
}
