//! Library for defining, running and minimizing deterministic finite automata in Rust.
//!
//! A deterministic finite automaton (DFA) consists of a finite alphabet $\Sigma$, a finite set of states $Q$, a
//! designated initial state $q_0 \in Q$, a set of final states $F \subseteq Q$ and a transition function
//! $\delta : Q \times \Sigma \to Q$. In this crate, the transition function is allowed to be *partial*, that
//! is, for some pairs of state and symbol there may be no transition at all. An absent transition is something
//! different from a transition that happens to lead somewhere, which is why lookups through [`DFA::successor`]
//! return an [`Option`].
//!
//! A [`DFA`] is created once (either through [`DFA::new`], the [`automaton::builder::DFABuilder`] or by parsing a textual
//! description) and is never mutated afterwards. All transformations consume a reference and return a new value:
//! - [`DFA::complete`] adds a fresh, non-accepting dead state which absorbs every missing transition, so that
//!   the resulting transition function is total.
//! - [`DFA::restrict_to_reachable`] drops all states that can not be reached from the initial state.
//! - [`DFA::minimize`] completes the automaton, removes unreachable states, computes the pairs of
//!   distinguishable states with the table-filling method and finally builds the quotient automaton.
//!
//! Words are run through an automaton with [`DFA::run`], which produces a [`RunOutcome`] consisting of a verdict
//! and a human readable trace of every step. Problems such as symbols that are not part of the alphabet or
//! missing transitions are reported as part of that trace rather than as errors.
//!
//! Finally, [`table::render`] produces the transition table of an automaton and the [`dot::Dottable`] trait
//! produces a Graphviz representation, which can be rendered to a PNG if the `graphviz` feature is enabled.
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

/// The prelude is supposed to make using this package easier. Including everything, i.e.
/// `use dfasim::prelude::*;` should be enough to use the package.
pub mod prelude {
    pub use super::{
        alphabet::{CharAlphabet, Symbol},
        automaton::{builder::DFABuilder, description::ParseError, ConstructionError, DFA},
        completion::DEAD_STATE_NAME,
        dot::Dottable,
        math,
        reachable::reachable_states,
        run::{RunOutcome, TraceEntry},
        state::State,
        table, Show,
    };

    #[cfg(feature = "minimize")]
    pub use super::minimization::{distinguishable_pairs, state_partition, StatePartition};
}

/// Contains the type aliases for sets and maps as well as the partition of a set into classes.
pub mod math;

/// Module that contains definitions for dealing with alphabets.
pub mod alphabet;
pub use alphabet::CharAlphabet;

/// Defines the identifiers of states.
pub mod state;
pub use state::State;

/// Defines the [`DFA`] itself, together with its builder and its textual description.
#[allow(clippy::upper_case_acronyms)]
pub mod automaton;
pub use automaton::DFA;

/// Simulation of words on a [`DFA`].
pub mod run;
pub use run::{RunOutcome, TraceEntry};

/// Turns a partial transition function into a total one.
pub mod completion;

/// Computes the states that are reachable from the initial state.
pub mod reachable;

/// Contains the table-filling minimization algorithm. This is feature gated behind the `minimize` feature.
#[cfg(feature = "minimize")]
pub mod minimization;

/// Rendering of transition tables.
pub mod table;

/// Output of automata in the DOT format of graphviz.
pub mod dot;

/// Implements the generation of random automata.
#[cfg(feature = "random")]
pub mod random;

use itertools::Itertools;

/// Helper trait which can be used to display states, symbols, words and such.
pub trait Show {
    /// Returns a human readable representation of `self`, for a state that is simply its label,
    /// for a word it is the concatenation of its symbols.
    fn show(&self) -> String;

    /// Show a collection of the thing, for a collection of states this should be {q0, q1, q2, ...}.
    fn show_collection<'a, I>(iter: I) -> String
    where
        Self: 'a,
        I: IntoIterator<Item = &'a Self>,
    {
        format!("{{{}}}", iter.into_iter().map(|x| x.show()).join(", "))
    }
}

impl Show for char {
    fn show(&self) -> String {
        self.to_string()
    }

    fn show_collection<'a, I: IntoIterator<Item = &'a Self>>(iter: I) -> String
    where
        Self: 'a,
    {
        iter.into_iter().collect()
    }
}

impl<S: Show> Show for [S] {
    fn show(&self) -> String {
        S::show_collection(self.iter())
    }
}

impl<S: Show> Show for Vec<S> {
    fn show(&self) -> String {
        S::show_collection(self.iter())
    }
}

impl<S: Show, T: Show> Show for (S, T) {
    fn show(&self) -> String {
        format!("({}, {})", self.0.show(), self.1.show())
    }
}

impl<S: Show + ?Sized> Show for &S {
    fn show(&self) -> String {
        S::show(*self)
    }
}
