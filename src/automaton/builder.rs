use crate::prelude::*;

/// Helper struct for the construction of a [`DFA`]. It collects the alphabet, the states, the initial state,
/// the final states and the transitions and hands them to [`DFA::new`] once [`DFABuilder::build`] is called.
///
/// Symbols that only appear on transitions are *not* added to the alphabet, they have to be given
/// through [`DFABuilder::with_alphabet`]. Likewise states have to be listed with [`DFABuilder::with_states`].
///
/// # Example
///
/// We want to create a DFA with two states `p` and `q` over the alphabet `['a', 'b']`, which accepts all
/// words that end with `b`.
/// ```
/// use dfasim::prelude::*;
///
/// let dfa = DFABuilder::default()
///     .with_alphabet(['a', 'b'])
///     .with_states(["p", "q"])
///     .with_initial("p")
///     .with_finals(["q"])
///     .with_transitions([("p", 'a', "p"), ("p", 'b', "q"), ("q", 'a', "p"), ("q", 'b', "q")])
///     .build()
///     .unwrap();
/// assert!(dfa.accepts("aab".chars()));
/// ```
#[derive(Debug, Clone, Default)]
pub struct DFABuilder {
    symbols: Vec<Symbol>,
    states: Vec<State>,
    initial: Option<State>,
    finals: Vec<State>,
    transitions: Vec<(State, Symbol, State)>,
}

impl DFABuilder {
    /// Adds the given symbols to the alphabet.
    pub fn with_alphabet<I: IntoIterator<Item = Symbol>>(mut self, symbols: I) -> Self {
        self.symbols.extend(symbols);
        self
    }

    /// Adds the given states.
    pub fn with_states<S, I>(mut self, states: I) -> Self
    where
        S: Into<State>,
        I: IntoIterator<Item = S>,
    {
        self.states.extend(states.into_iter().map(Into::into));
        self
    }

    /// Designates the initial state. If it is called multiple times, the last call wins.
    pub fn with_initial<S: Into<State>>(mut self, initial: S) -> Self {
        self.initial = Some(initial.into());
        self
    }

    /// Marks the given states as final.
    pub fn with_finals<S, I>(mut self, finals: I) -> Self
    where
        S: Into<State>,
        I: IntoIterator<Item = S>,
    {
        self.finals.extend(finals.into_iter().map(Into::into));
        self
    }

    /// Adds a list of transitions, each given as a triple of origin, symbol and target.
    pub fn with_transitions<S, T, I>(mut self, transitions: I) -> Self
    where
        S: Into<State>,
        T: Into<State>,
        I: IntoIterator<Item = (S, Symbol, T)>,
    {
        self.transitions.extend(
            transitions
                .into_iter()
                .map(|(p, a, q)| (p.into(), a, q.into())),
        );
        self
    }

    /// Adds a single transition.
    pub fn with_transition<S: Into<State>, T: Into<State>>(
        self,
        origin: S,
        symbol: Symbol,
        target: T,
    ) -> Self {
        self.with_transitions([(origin.into(), symbol, target.into())])
    }

    /// Builds the automaton. If no initial state was given, the least state (in the canonical order)
    /// is used, an automaton without any states can not be built.
    pub fn build(self) -> Result<DFA, ConstructionError> {
        let initial = match self.initial {
            Some(initial) => initial,
            None => self
                .states
                .iter()
                .min()
                .cloned()
                .ok_or_else(|| ConstructionError::UnknownInitial(State::from("")))?,
        };
        DFA::new(
            CharAlphabet::from_iter(self.symbols),
            self.states,
            initial,
            self.finals,
            self.transitions,
        )
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    #[test]
    fn builder_defaults_to_least_state() {
        let dfa = DFABuilder::default()
            .with_alphabet(['x'])
            .with_states(["s1", "s0"])
            .with_transition("s0", 'x', "s1")
            .build()
            .unwrap();
        assert_eq!(dfa.initial(), &State::from("s0"));
        assert!(dfa.finals().is_empty());
    }

    #[test]
    fn builder_without_states_fails() {
        assert!(matches!(
            DFABuilder::default().with_alphabet(['x']).build(),
            Err(ConstructionError::UnknownInitial(_))
        ));
    }

    #[test]
    fn symbols_are_not_inferred() {
        let result = DFABuilder::default()
            .with_states(["p"])
            .with_transition("p", 'a', "p")
            .build();
        assert!(matches!(
            result,
            Err(ConstructionError::UnknownSymbol { symbol: 'a', .. })
        ));
    }
}
