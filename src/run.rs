use std::fmt::Display;

use itertools::Itertools;
use tracing::debug;

use crate::prelude::*;

/// A single step of a simulation, as recorded in the trace of a [`RunOutcome`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceEntry {
    /// The run starts in the given state.
    Initial(State),
    /// The transition `δ(origin, symbol) = target` was taken.
    Transition {
        /// The state before reading the symbol.
        origin: State,
        /// The symbol that was read.
        symbol: Symbol,
        /// The state after reading the symbol.
        target: State,
    },
    /// The word contains a symbol which is not in the alphabet, the run stops here.
    UnknownSymbol(Symbol),
    /// There is no transition for the current state and symbol, the run stops here.
    MissingTransition {
        /// The state the run is stuck in.
        state: State,
        /// The symbol for which no transition exists.
        symbol: Symbol,
    },
    /// The whole word was read, the entry states whether it was accepted.
    Verdict {
        /// The word that was read.
        word: Vec<Symbol>,
        /// Whether the run ended in a final state.
        accepted: bool,
    },
}

impl TraceEntry {
    /// Returns `true` if the entry reports a problem that stopped the run.
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            TraceEntry::UnknownSymbol(_) | TraceEntry::MissingTransition { .. }
        )
    }
}

impl Display for TraceEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TraceEntry::Initial(q) => write!(f, "initial state: {q}"),
            TraceEntry::Transition {
                origin,
                symbol,
                target,
            } => write!(f, "transition: δ({origin}, {symbol}) = {target}"),
            TraceEntry::UnknownSymbol(symbol) => {
                write!(f, "error: symbol '{symbol}' does not belong to the alphabet")
            }
            TraceEntry::MissingTransition { state, symbol } => {
                write!(f, "error: no transition defined for δ({state}, {symbol})")
            }
            TraceEntry::Verdict { word, accepted } => write!(
                f,
                "the word '{}' is {} by the automaton",
                word.show(),
                if *accepted { "accepted" } else { "rejected" }
            ),
        }
    }
}

/// The result of running a word on a [`DFA`]: whether the word was accepted, together with
/// a trace that records every step of the run. The trace always starts with
/// [`TraceEntry::Initial`] and ends either with an error entry or with a [`TraceEntry::Verdict`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    /// Whether the word was accepted.
    pub accepted: bool,
    /// The steps of the run, in order.
    pub trace: Vec<TraceEntry>,
}

impl RunOutcome {
    /// Returns the trace as a sequence of human readable lines.
    pub fn trace_lines(&self) -> Vec<String> {
        self.trace.iter().map(ToString::to_string).collect()
    }

    /// Returns the states that were visited, starting with the initial state.
    pub fn visited_states(&self) -> Vec<&State> {
        self.trace
            .iter()
            .filter_map(|entry| match entry {
                TraceEntry::Initial(q) => Some(q),
                TraceEntry::Transition { target, .. } => Some(target),
                _ => None,
            })
            .collect()
    }

    /// Returns `true` if the run was stopped by an unknown symbol or a missing transition.
    pub fn stopped_early(&self) -> bool {
        self.trace.last().is_some_and(TraceEntry::is_error)
    }
}

impl Display for RunOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.trace.iter().join("\n"))
    }
}

impl DFA {
    /// Runs `word` through the automaton, starting in the initial state and reading one symbol
    /// at a time. The run stops as soon as a symbol outside of the alphabet is read or no
    /// transition is defined, in which case the word is rejected. Both situations are reported
    /// in the trace of the returned [`RunOutcome`], they are not errors.
    ///
    /// # Example
    /// ```
    /// use dfasim::prelude::*;
    ///
    /// let dfa: DFA = "alphabet: a\nstates: p q\ninitial: p\nfinals: q\np a -> q".parse().unwrap();
    /// let outcome = dfa.run("a".chars());
    /// assert!(outcome.accepted);
    /// assert_eq!(
    ///     outcome.trace_lines(),
    ///     vec![
    ///         "initial state: p",
    ///         "transition: δ(p, a) = q",
    ///         "the word 'a' is accepted by the automaton",
    ///     ]
    /// );
    /// ```
    pub fn run<W: IntoIterator<Item = Symbol>>(&self, word: W) -> RunOutcome {
        let mut current = self.initial();
        let mut trace = vec![TraceEntry::Initial(current.clone())];
        let mut read = vec![];

        for symbol in word {
            if !self.alphabet().contains(symbol) {
                debug!("symbol {symbol} does not belong to the alphabet, rejecting");
                trace.push(TraceEntry::UnknownSymbol(symbol));
                return RunOutcome {
                    accepted: false,
                    trace,
                };
            }

            let Some(next) = self.successor(current, symbol) else {
                debug!("no transition from {current} on {symbol}, rejecting");
                trace.push(TraceEntry::MissingTransition {
                    state: current.clone(),
                    symbol,
                });
                return RunOutcome {
                    accepted: false,
                    trace,
                };
            };

            trace.push(TraceEntry::Transition {
                origin: current.clone(),
                symbol,
                target: next.clone(),
            });
            read.push(symbol);
            current = next;
        }

        let accepted = self.is_final(current);
        debug!("run ended in {current}, accepted: {accepted}");
        trace.push(TraceEntry::Verdict {
            word: read,
            accepted,
        });
        RunOutcome { accepted, trace }
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;
    use crate::tests::{double_zero_dfa, partial_ab_dfa};

    fn labels(outcome: &RunOutcome) -> Vec<&str> {
        outcome
            .visited_states()
            .into_iter()
            .map(|q| q.label())
            .collect()
    }

    #[test_log::test]
    fn accepted_run() {
        let outcome = double_zero_dfa().run("0101".chars());
        assert!(outcome.accepted);
        assert!(!outcome.stopped_early());
        assert_eq!(labels(&outcome), vec!["A", "B", "A", "B", "C"]);
        assert_eq!(outcome.trace.len(), 6);
        assert_eq!(
            outcome.trace_lines().last().unwrap(),
            "the word '0101' is accepted by the automaton"
        );
    }

    #[test_log::test]
    fn rejected_run() {
        let outcome = double_zero_dfa().run("01".chars());
        assert!(!outcome.accepted);
        assert_eq!(labels(&outcome), vec!["A", "B", "A"]);
        assert_eq!(
            outcome.trace_lines(),
            vec![
                "initial state: A",
                "transition: δ(A, 0) = B",
                "transition: δ(B, 1) = A",
                "the word '01' is rejected by the automaton",
            ]
        );
    }

    #[test]
    fn empty_word() {
        let outcome = double_zero_dfa().run("".chars());
        assert!(!outcome.accepted);
        assert_eq!(outcome.trace.len(), 2);
    }

    #[test_log::test]
    fn unknown_symbol_stops_the_run() {
        let outcome = double_zero_dfa().run("0x0".chars());
        assert!(!outcome.accepted);
        assert!(outcome.stopped_early());
        assert_eq!(
            outcome.trace.last(),
            Some(&TraceEntry::UnknownSymbol('x'))
        );
        // the second 0 is never read
        assert_eq!(outcome.trace.len(), 3);
        assert_eq!(
            outcome.trace_lines()[2],
            "error: symbol 'x' does not belong to the alphabet"
        );
    }

    #[test_log::test]
    fn missing_transition_stops_the_run() {
        let outcome = partial_ab_dfa().run("bab".chars());
        assert!(!outcome.accepted);
        assert_eq!(
            outcome.trace_lines(),
            vec![
                "initial state: 0",
                "error: no transition defined for δ(0, b)"
            ]
        );
        assert!(partial_ab_dfa().run("ab".chars()).accepted);
    }

    #[test]
    fn run_agrees_with_accepts() {
        let dfa = partial_ab_dfa();
        for word in crate::tests::words_up_to(dfa.alphabet(), 4) {
            assert_eq!(dfa.run(word.iter().copied()).accepted, dfa.accepts(word));
        }
    }
}
