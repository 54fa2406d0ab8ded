use crate::Show;

/// Identifies a state of a [`crate::DFA`] by its label. States are compared and ordered
/// lexicographically by their label, which is what all canonical orderings in this crate
/// (table rows, pair enumeration, choice of representatives) are based on.
#[derive(Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct State(String);

impl State {
    /// Creates a new state with the given label.
    pub fn new<S: Into<String>>(label: S) -> Self {
        Self(label.into())
    }

    /// Returns the label of the state.
    pub fn label(&self) -> &str {
        &self.0
    }
}

impl From<&str> for State {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for State {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&State> for State {
    fn from(value: &State) -> Self {
        value.clone()
    }
}

impl std::fmt::Debug for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::fmt::Display for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Show for State {
    fn show(&self) -> String {
        self.0.clone()
    }
}
