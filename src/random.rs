use tracing::trace;

use crate::prelude::*;

/// Probability with which a transition is drawn for a pair of state and symbol.
const TRANSITION_PROBABILITY: f64 = 0.8;

/// Generate a random, possibly partial [`DFA`] with `size` states over the first `symbols` letters of the
/// alphabet. The algorithm is as follows:
/// 1. Start with the states `q0` to `q{size - 1}`, where `q0` is initial, and flip a coin for every state
///    to decide whether it is final.
/// 2. For each state and each symbol, with a fixed probability draw a target state uniformly and add the
///    corresponding transition, otherwise leave the transition undefined.
///
/// Note that there may be unreachable states.
pub fn generate_random_dfa(symbols: usize, size: usize) -> DFA {
    assert!(size > 0, "an automaton needs at least one state");
    let alphabet = CharAlphabet::of_size(symbols);
    let states: Vec<State> = (0..size).map(|i| State::new(format!("q{i}"))).collect();

    let finals = states.iter().filter(|_| fastrand::bool()).cloned().collect::<Vec<_>>();
    let mut transitions = vec![];
    for q in &states {
        for a in alphabet.universe() {
            if fastrand::f64() < TRANSITION_PROBABILITY {
                let target = states[fastrand::usize(..size)].clone();
                transitions.push((q.clone(), a, target));
            }
        }
    }
    trace!(
        "drew {} transitions and {} final states",
        transitions.len(),
        finals.len()
    );

    DFA::new(alphabet, states.clone(), states[0].clone(), finals, transitions)
        .expect("randomly drawn components are consistent")
}

#[cfg(test)]
mod tests {
    use super::generate_random_dfa;

    #[test]
    fn random_dfa_shape() {
        for size in 1..10 {
            let dfa = generate_random_dfa(3, size);
            assert_eq!(dfa.size(), size);
            assert_eq!(dfa.alphabet().size(), 3);
            assert!(dfa.transition_count() <= 3 * size);
        }
    }
}
