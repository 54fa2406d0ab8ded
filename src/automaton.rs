use std::collections::{BTreeMap, BTreeSet, VecDeque};

use thiserror::Error;
use tracing::trace;

use crate::{math::Set, prelude::*};

/// Contains the [`builder::DFABuilder`], which allows assembling a [`DFA`] step by step.
pub mod builder;

/// Line oriented textual description of a [`DFA`], which can be parsed and written back.
pub mod description;

/// Errors that can occur when a [`DFA`] is constructed from its components.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConstructionError {
    /// The designated initial state is not among the states.
    #[error("initial state {0} is not a state of the automaton")]
    UnknownInitial(State),
    /// A final state is not among the states.
    #[error("final state {0} is not a state of the automaton")]
    UnknownFinal(State),
    /// A transition leaves a state that does not exist.
    #[error("transition on '{symbol}' leaves {origin}, which is not a state of the automaton")]
    UnknownOrigin {
        /// The state the transition leaves.
        origin: State,
        /// The symbol the transition is labeled with.
        symbol: Symbol,
    },
    /// A transition is labeled with a symbol outside of the alphabet.
    #[error("transition from {origin} is labeled with '{symbol}', which is not in the alphabet")]
    UnknownSymbol {
        /// The state the transition leaves.
        origin: State,
        /// The symbol the transition is labeled with.
        symbol: Symbol,
    },
    /// Two transitions with the same origin and symbol lead to different targets.
    #[error("δ({origin}, {symbol}) is given twice with different targets {first} and {second}")]
    Nondeterministic {
        /// The state the transitions leave.
        origin: State,
        /// The symbol both transitions are labeled with.
        symbol: Symbol,
        /// The target of the transition that was given first.
        first: State,
        /// The conflicting target.
        second: State,
    },
}

/// A deterministic finite automaton (DFA) with a possibly partial transition function. It accepts a
/// finite word if reading the word from the initial state is possible and ends in a final state.
///
/// A `DFA` is immutable, every transformation ([`DFA::complete`], [`DFA::restrict_to_reachable`],
/// [`DFA::minimize`]) produces a new value.
///
/// # Example
/// ```
/// use dfasim::prelude::*;
///
/// let dfa = DFA::new(
///     CharAlphabet::from_iter(['a', 'b']),
///     ["0", "1"],
///     "0",
///     ["1"],
///     [("0", 'a', "1"), ("1", 'b', "0")],
/// )
/// .unwrap();
/// assert!(dfa.accepts("aba".chars()));
/// assert!(!dfa.accepts("ab".chars()));
/// assert!(!dfa.is_complete());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DFA {
    alphabet: CharAlphabet,
    states: BTreeSet<State>,
    initial: State,
    finals: BTreeSet<State>,
    transitions: BTreeMap<State, BTreeMap<Symbol, State>>,
}

impl DFA {
    /// Creates a new automaton from its five components. The construction fails if the initial state
    /// or one of the final states is not a state of the automaton, if a transition leaves a state that
    /// does not exist or is labeled with a symbol outside of the alphabet, or if the same pair of state
    /// and symbol is given two different targets.
    ///
    /// The target of a transition is not checked, it may name a state outside of `states`. Reading
    /// such a transition leads into a state from which no further transition is defined and which is
    /// not accepting.
    pub fn new<Q, I, F, O, T>(
        alphabet: CharAlphabet,
        states: impl IntoIterator<Item = Q>,
        initial: I,
        finals: impl IntoIterator<Item = F>,
        transitions: impl IntoIterator<Item = (O, Symbol, T)>,
    ) -> Result<Self, ConstructionError>
    where
        Q: Into<State>,
        I: Into<State>,
        F: Into<State>,
        O: Into<State>,
        T: Into<State>,
    {
        let states: BTreeSet<State> = states.into_iter().map(Into::into).collect();

        let initial = initial.into();
        if !states.contains(&initial) {
            return Err(ConstructionError::UnknownInitial(initial));
        }

        let finals: BTreeSet<State> = finals.into_iter().map(Into::into).collect();
        if let Some(unknown) = finals.iter().find(|q| !states.contains(*q)) {
            return Err(ConstructionError::UnknownFinal(unknown.clone()));
        }

        let mut delta: BTreeMap<State, BTreeMap<Symbol, State>> = BTreeMap::new();
        for (origin, symbol, target) in transitions {
            let (origin, target) = (origin.into(), target.into());
            if !states.contains(&origin) {
                return Err(ConstructionError::UnknownOrigin { origin, symbol });
            }
            if !alphabet.contains(symbol) {
                return Err(ConstructionError::UnknownSymbol { origin, symbol });
            }
            let row = delta.entry(origin.clone()).or_default();
            if let Some(first) = row.get(&symbol) {
                if first != &target {
                    return Err(ConstructionError::Nondeterministic {
                        origin,
                        symbol,
                        first: first.clone(),
                        second: target,
                    });
                }
            }
            row.insert(symbol, target);
        }

        trace!(
            "constructed automaton with {} states and {} symbols",
            states.len(),
            alphabet.size()
        );
        Ok(Self::from_parts(alphabet, states, initial, finals, delta))
    }

    /// Assembles an automaton from parts that are already known to be consistent. Empty rows of the
    /// transition map are dropped so that structurally equal automata compare equal.
    pub(crate) fn from_parts(
        alphabet: CharAlphabet,
        states: BTreeSet<State>,
        initial: State,
        finals: BTreeSet<State>,
        mut transitions: BTreeMap<State, BTreeMap<Symbol, State>>,
    ) -> Self {
        debug_assert!(states.contains(&initial));
        debug_assert!(finals.is_subset(&states));
        transitions.retain(|_, row| !row.is_empty());
        Self {
            alphabet,
            states,
            initial,
            finals,
            transitions,
        }
    }

    /// Returns a builder for assembling an automaton step by step.
    pub fn builder() -> DFABuilder {
        DFABuilder::default()
    }

    /// Returns a reference to the alphabet.
    pub fn alphabet(&self) -> &CharAlphabet {
        &self.alphabet
    }

    /// Returns the states in their canonical (lexicographic) order.
    pub fn states(&self) -> &BTreeSet<State> {
        &self.states
    }

    /// Returns the initial state.
    pub fn initial(&self) -> &State {
        &self.initial
    }

    /// Returns the final states in their canonical order.
    pub fn finals(&self) -> &BTreeSet<State> {
        &self.finals
    }

    /// Checks whether `state` is a final state.
    pub fn is_final(&self, state: &State) -> bool {
        self.finals.contains(state)
    }

    /// Returns the number of states.
    pub fn size(&self) -> usize {
        self.states.len()
    }

    /// Looks up the transition that leaves `state` on `symbol`. Returns `None` if no such
    /// transition is defined.
    pub fn successor(&self, state: &State, symbol: Symbol) -> Option<&State> {
        self.transitions.get(state)?.get(&symbol)
    }

    /// Iterates over all defined transitions as triples of origin, symbol and target. The triples
    /// are ordered by origin first and symbol second.
    pub fn transitions(&self) -> impl Iterator<Item = (&State, Symbol, &State)> + '_ {
        self.transitions
            .iter()
            .flat_map(|(q, row)| row.iter().map(move |(a, p)| (q, *a, p)))
    }

    /// Returns the number of defined transitions.
    pub fn transition_count(&self) -> usize {
        self.transitions.values().map(|row| row.len()).sum()
    }

    /// Returns `true` if a transition is defined for every state and every symbol and every
    /// transition leads to a state of the automaton.
    pub fn is_complete(&self) -> bool {
        self.states.iter().all(|q| {
            self.alphabet.universe().all(|a| {
                self.successor(q, a)
                    .is_some_and(|p| self.states.contains(p))
            })
        })
    }

    /// Returns `true` if reading `word` from the initial state ends in a final state.
    pub fn accepts<W: IntoIterator<Item = Symbol>>(&self, word: W) -> bool {
        self.accepts_from(&self.initial, word)
    }

    /// Returns `true` if reading `word` from `origin` ends in a final state.
    pub fn accepts_from<W: IntoIterator<Item = Symbol>>(&self, origin: &State, word: W) -> bool {
        let mut current = origin;
        for symbol in word {
            match self.successor(current, symbol) {
                Some(next) => current = next,
                None => return false,
            }
        }
        self.is_final(current)
    }

    /// Attempts to separate the state `left` from the state `right` by finding a word that is accepted
    /// from one of them but not from the other. The returned word is one of minimal length, `None` is
    /// returned if the two states are equivalent. Missing transitions are treated as leading into a
    /// rejecting sink.
    pub fn separate(&self, left: &State, right: &State) -> Option<Vec<Symbol>> {
        let accepting = |q: Option<&State>| q.is_some_and(|q| self.is_final(q));
        let step = |q: Option<&State>, a: Symbol| q.and_then(|q| self.successor(q, a));

        let start = (Some(left), Some(right));
        let mut seen = Set::default();
        seen.insert(start);
        let mut queue = VecDeque::from([(start, vec![])]);

        while let Some(((l, r), word)) = queue.pop_front() {
            if accepting(l) != accepting(r) {
                return Some(word);
            }
            for a in self.alphabet.universe() {
                let next = (step(l, a), step(r, a));
                if seen.insert(next) {
                    let mut extended = word.clone();
                    extended.push(a);
                    queue.push_back((next, extended));
                }
            }
        }
        None
    }
}
