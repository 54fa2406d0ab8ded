use itertools::Itertools;

use crate::prelude::*;

/// Shown in place of a transition that is not defined.
pub const EMPTY_TRANSITION: &str = "∅";

/// Heading of the column that lists the states.
pub const STATE_HEADING: &str = "Estado";

/// Title shown above the boxed transition table.
pub const TABLE_TITLE: &str = "Tabela de Transições:";

/// The cells of the transition table, row by row and starting with the header. `label` produces the
/// text of the first cell in each row.
fn cells<F: Fn(&State) -> String>(dfa: &DFA, label: F) -> Vec<Vec<String>> {
    let header = std::iter::once(STATE_HEADING.to_string())
        .chain(dfa.alphabet().universe().map(|a| a.to_string()))
        .collect();

    std::iter::once(header)
        .chain(dfa.states().iter().map(|q| {
            std::iter::once(label(q))
                .chain(dfa.alphabet().universe().map(|a| {
                    dfa.successor(q, a)
                        .map_or_else(|| EMPTY_TRANSITION.to_string(), ToString::to_string)
                }))
                .collect()
        }))
        .collect()
}

/// Returns the transition table of `dfa` as tab separated text. The first line holds the heading
/// [`STATE_HEADING`] followed by the symbols in sorted order, then there is one line for each state
/// in sorted order, listing the target of the transition on each symbol or [`EMPTY_TRANSITION`] if
/// no transition is defined. Every line ends with a newline.
///
/// # Example
/// ```
/// use dfasim::prelude::*;
///
/// let dfa: DFA = "alphabet: b a\nstates: q p\ninitial: p\np a -> q\nq b -> p".parse().unwrap();
/// assert_eq!(table::render(&dfa), "Estado\ta\tb\np\tq\t∅\nq\t∅\tp\n");
/// ```
pub fn render(dfa: &DFA) -> String {
    cells(dfa, State::to_string)
        .into_iter()
        .map(|row| format!("{}\n", row.join("\t")))
        .collect()
}

/// Returns the transition table of `dfa` drawn as a box. In contrast to [`render`], the state labels
/// are decorated: the initial state is prefixed with `→` and final states are prefixed with `*`.
/// The first row of the box holds [`TABLE_TITLE`].
pub fn render_boxed(dfa: &DFA) -> String {
    let mut builder = tabled::builder::Builder::default();
    for row in cells(dfa, |q| {
        let initial = if q == dfa.initial() { "→" } else { "" };
        let accepting = if dfa.is_final(q) { "*" } else { "" };
        format!("{initial}{accepting}{q}")
    }) {
        builder.push_record(row);
    }

    builder
        .build()
        .with(tabled::settings::Panel::header(TABLE_TITLE))
        .with(tabled::settings::Style::rounded())
        .to_string()
}

/// Returns the final states as a comma separated list, which is handy as a caption of a table.
pub fn finals_caption(dfa: &DFA) -> String {
    format!("F = {{{}}}", dfa.finals().iter().join(", "))
}
