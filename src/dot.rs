#![allow(missing_docs)]

use std::fmt::Display;

use itertools::Itertools;
use thiserror::Error;

use crate::prelude::*;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("could not run graphviz: \"{0}\"")]
    Io(#[from] std::io::Error),
    #[error("Child process had non-zero exit status \"{0}\"")]
    NonZeroExit(std::process::ExitStatus),
}

/// Name of the invisible node from which the edge into the initial state starts.
const START_NODE: &str = "__start";

pub trait Dottable {
    /// Compute the graphviz representation, for more information on the DOT format,
    /// see the [graphviz documentation](https://graphviz.org/doc/info/lang.html).
    fn dot_representation(&self) -> String {
        let header = std::iter::once(format!(
            "digraph {} {{",
            quote(&self.dot_name().unwrap_or("A".to_string()))
        ))
        .chain(self.dot_header_statements());

        let states = self.dot_states().into_iter().map(|(ident, attributes)| {
            format!(
                "{} [{}]",
                quote(&ident),
                attributes.into_iter().map(|attr| attr.to_string()).join(", ")
            )
        });

        let transitions = self
            .dot_transitions()
            .into_iter()
            .map(|(origin, target, attributes)| {
                format!(
                    "{} -> {} [{}]",
                    quote(&origin),
                    quote(&target),
                    attributes.into_iter().map(|attr| attr.to_string()).join(", ")
                )
            });

        let mut lines = header
            .chain(states)
            .chain(transitions)
            .chain(std::iter::once("}".to_string()));
        lines.join("\n")
    }

    fn dot_header_statements(&self) -> impl IntoIterator<Item = String> {
        []
    }

    fn dot_name(&self) -> Option<String>;

    /// The nodes of the graph, each given by its identifier and its attributes.
    fn dot_states(&self) -> Vec<(String, Vec<DotStateAttribute>)>;

    /// The edges of the graph, each given by the identifiers of its endpoints and its attributes.
    fn dot_transitions(&self) -> Vec<(String, String, Vec<DotTransitionAttribute>)>;

    /// Renders the object to the file `{stem}.png` and returns the path of that file. This method
    /// is only available on the `graphviz` crate feature and makes use of temporary files.
    #[cfg(feature = "graphviz")]
    fn render_to_file_name(&self, stem: &str) -> Result<std::path::PathBuf, RenderError> {
        use std::io::Write;
        use tracing::{info, trace};

        trace!("Outputting dot and rendering to png");
        let dot = self.dot_representation();
        let mut tempfile = tempfile::NamedTempFile::new()?;

        tempfile.write_all(dot.as_bytes())?;
        let tempfile_name = tempfile.path();

        let filename = std::path::PathBuf::from(format!("{stem}.png"));
        let status = std::process::Command::new("dot")
            .arg("-Tpng")
            .arg("-o")
            .arg(&filename)
            .arg(tempfile_name)
            .status()?;
        if !status.success() {
            return Err(RenderError::NonZeroExit(status));
        }
        info!("rendered automaton to {}", filename.display());
        Ok(filename)
    }
}

impl Dottable for DFA {
    fn dot_name(&self) -> Option<String> {
        Some("DFA".into())
    }

    fn dot_header_statements(&self) -> impl IntoIterator<Item = String> {
        ["rankdir=LR".to_string()]
    }

    fn dot_states(&self) -> Vec<(String, Vec<DotStateAttribute>)> {
        let start = std::iter::once((
            start_node(self),
            vec![
                DotStateAttribute::Shape("point".into()),
                DotStateAttribute::Label(String::new()),
            ],
        ));
        start
            .chain(self.states().iter().map(|q| {
                let shape = if self.is_final(q) {
                    "doublecircle"
                } else {
                    "circle"
                };
                (
                    q.to_string(),
                    vec![
                        DotStateAttribute::Shape(shape.into()),
                        DotStateAttribute::Label(q.to_string()),
                    ],
                )
            }))
            .collect()
    }

    fn dot_transitions(&self) -> Vec<(String, String, Vec<DotTransitionAttribute>)> {
        std::iter::once((start_node(self), self.initial().to_string(), vec![]))
            .chain(self.transitions().map(|(p, a, q)| {
                (
                    p.to_string(),
                    q.to_string(),
                    vec![DotTransitionAttribute::Label(a.show())],
                )
            }))
            .collect()
    }
}

/// Identifier of the start node that differs from all state labels.
fn start_node(dfa: &DFA) -> String {
    let mut name = START_NODE.to_string();
    while dfa.states().iter().any(|q| q.label() == name) {
        name.push('_');
    }
    name
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum DotStateAttribute {
    /// The label of a node
    Label(String),
    /// The shape of a node
    Shape(String),
}

impl Display for DotStateAttribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DotStateAttribute::Label(s) => write!(f, "label={}", quote(s)),
            DotStateAttribute::Shape(s) => write!(f, "shape={}", quote(s)),
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum DotTransitionAttribute {
    Label(String),
}

impl Display for DotTransitionAttribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DotTransitionAttribute::Label(lbl) => write!(f, "label={}", quote(lbl)),
        }
    }
}

/// Turns `name` into a quoted DOT identifier, so state labels may contain arbitrary characters.
fn quote(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 2);
    out.push('"');
    for chr in name.chars() {
        if chr == '"' || chr == '\\' {
            out.push('\\');
        }
        out.push(chr);
    }
    out.push('"');
    out
}
