//! The description format lists the components of an automaton line by line:
//!
//! ```text
//! alphabet: 0 1
//! states: A B C
//! initial: A
//! finals: C
//! A 0 -> B
//! A 1 -> A
//! ```
//!
//! Every line that does not start with one of the four keys is a transition of the form
//! `origin symbol -> target`. A transition whose target is missing, `-` or `∅` stands for
//! "no transition" and is skipped. Empty lines and lines starting with `#` are ignored.
//!
//! Labels and symbols that would otherwise be misread (empty labels, whitespace, `:`, `"`, `\`,
//! a leading `#` or one of the markers above) are written in double quotes, where `\\`, `\"`,
//! `\n` and `\r` are escapes. A quoted token is always taken literally.
use std::{fmt::Display, str::FromStr};

use itertools::Itertools;
use thiserror::Error;
use tracing::trace;

use crate::prelude::*;

/// Marks an explicitly undefined transition in a description.
const UNDEFINED_MARKERS: [&str; 2] = ["-", "∅"];

/// Errors that can occur while parsing the description of a [`DFA`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A required field (`alphabet`, `states` or `initial`) is absent.
    #[error("the description has no `{0}` line")]
    MissingField(&'static str),
    /// A field appears more than once.
    #[error("line {line}: field `{field}` is given more than once")]
    DuplicateField {
        /// The (one-based) line number.
        line: usize,
        /// The name of the field.
        field: &'static str,
    },
    /// A token that should be a symbol does not consist of exactly one character.
    #[error("line {line}: \"{token}\" is not a single symbol")]
    InvalidSymbol {
        /// The (one-based) line number.
        line: usize,
        /// The offending token.
        token: String,
    },
    /// The `initial` line does not name exactly one state.
    #[error("line {line}: expected exactly one initial state")]
    InvalidInitial {
        /// The (one-based) line number.
        line: usize,
    },
    /// A line is neither a field nor a transition of the form `origin symbol -> target`.
    #[error("line {line}: could not parse transition \"{content}\"")]
    MalformedTransition {
        /// The (one-based) line number.
        line: usize,
        /// The content of the line.
        content: String,
    },
    /// A quoted token is not terminated, contains an unknown escape or is directly followed by
    /// another character.
    #[error("line {line}: invalid quoted token")]
    InvalidQuoting {
        /// The (one-based) line number.
        line: usize,
    },
    /// The components could be read but do not form a valid automaton.
    #[error(transparent)]
    Construction(#[from] ConstructionError),
}

/// A whitespace separated token of a line. Quoted tokens are never read as markers.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Token {
    text: String,
    quoted: bool,
}

impl Token {
    fn is_bare(&self, text: &str) -> bool {
        !self.quoted && self.text == text
    }
}

fn tokenize(line: usize, content: &str) -> Result<Vec<Token>, ParseError> {
    let invalid = || ParseError::InvalidQuoting { line };
    let mut tokens = vec![];
    let mut chars = content.chars().peekable();
    while let Some(&chr) = chars.peek() {
        if chr.is_whitespace() {
            chars.next();
            continue;
        }

        let mut text = String::new();
        if chr != '"' {
            while let Some(&c) = chars.peek() {
                if c.is_whitespace() {
                    break;
                }
                text.push(c);
                chars.next();
            }
            tokens.push(Token {
                text,
                quoted: false,
            });
            continue;
        }

        chars.next();
        loop {
            match chars.next().ok_or_else(invalid)? {
                '"' => break,
                '\\' => match chars.next().ok_or_else(invalid)? {
                    'n' => text.push('\n'),
                    'r' => text.push('\r'),
                    c @ ('"' | '\\') => text.push(c),
                    _ => return Err(invalid()),
                },
                c => text.push(c),
            }
        }
        if chars.peek().is_some_and(|c| !c.is_whitespace()) {
            return Err(invalid());
        }
        tokens.push(Token { text, quoted: true });
    }
    Ok(tokens)
}

/// Writes `token` such that [`tokenize`] reads it back as a single token with the same text.
fn quote_token(token: &str) -> String {
    let plain = !token.is_empty()
        && !token.starts_with('#')
        && token != "->"
        && !UNDEFINED_MARKERS.contains(&token)
        && !token
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '"' | '\\' | ':'));
    if plain {
        return token.to_string();
    }

    let mut out = String::with_capacity(token.len() + 2);
    out.push('"');
    for chr in token.chars() {
        match chr {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

fn parse_symbol(line: usize, token: &Token) -> Result<Symbol, ParseError> {
    token
        .text
        .chars()
        .exactly_one()
        .map_err(|_| ParseError::InvalidSymbol {
            line,
            token: token.text.clone(),
        })
}

fn labels(tokens: Vec<Token>) -> Vec<State> {
    tokens.into_iter().map(|t| State::from(t.text)).collect()
}

fn set_once<T>(
    slot: &mut Option<T>,
    value: T,
    line: usize,
    field: &'static str,
) -> Result<(), ParseError> {
    if slot.replace(value).is_some() {
        return Err(ParseError::DuplicateField { line, field });
    }
    Ok(())
}

impl FromStr for DFA {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut alphabet: Option<Vec<Symbol>> = None;
        let mut states: Option<Vec<State>> = None;
        let mut initial: Option<State> = None;
        let mut finals: Option<Vec<State>> = None;
        let mut transitions = vec![];

        for (idx, raw) in s.lines().enumerate() {
            let line = idx + 1;
            let content = raw.trim();
            if content.is_empty() || content.starts_with('#') {
                continue;
            }

            match content.split_once(':').map(|(k, v)| (k.trim(), v)) {
                Some(("alphabet", rest)) => {
                    let symbols = tokenize(line, rest)?
                        .iter()
                        .map(|token| parse_symbol(line, token))
                        .collect::<Result<Vec<_>, _>>()?;
                    set_once(&mut alphabet, symbols, line, "alphabet")?;
                }
                Some(("states", rest)) => {
                    set_once(&mut states, labels(tokenize(line, rest)?), line, "states")?;
                }
                Some(("initial", rest)) => {
                    let state = labels(tokenize(line, rest)?)
                        .into_iter()
                        .exactly_one()
                        .map_err(|_| ParseError::InvalidInitial { line })?;
                    set_once(&mut initial, state, line, "initial")?;
                }
                Some(("finals", rest)) => {
                    set_once(&mut finals, labels(tokenize(line, rest)?), line, "finals")?;
                }
                _ => {
                    let tokens = tokenize(line, content)?;
                    let target = match tokens.as_slice() {
                        [_, _, arrow] if arrow.is_bare("->") => None,
                        [_, _, arrow, target]
                            if arrow.is_bare("->")
                                && UNDEFINED_MARKERS.iter().any(|m| target.is_bare(m)) =>
                        {
                            None
                        }
                        [_, _, arrow, target] if arrow.is_bare("->") => {
                            Some(State::from(target.text.as_str()))
                        }
                        _ => {
                            return Err(ParseError::MalformedTransition {
                                line,
                                content: content.to_string(),
                            })
                        }
                    };
                    let symbol = parse_symbol(line, &tokens[1])?;
                    if let Some(target) = target {
                        transitions.push((State::from(tokens[0].text.as_str()), symbol, target));
                    } else {
                        trace!("line {line}: skipping undefined transition");
                    }
                }
            }
        }

        let dfa = DFA::new(
            CharAlphabet::from_iter(alphabet.ok_or(ParseError::MissingField("alphabet"))?),
            states.ok_or(ParseError::MissingField("states"))?,
            initial.ok_or(ParseError::MissingField("initial"))?,
            finals.unwrap_or_default(),
            transitions,
        )?;
        Ok(dfa)
    }
}

impl Display for DFA {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = |q: &State| quote_token(q.label());
        let symbol = |a: Symbol| quote_token(&a.to_string());

        writeln!(
            f,
            "alphabet: {}",
            self.alphabet().universe().map(symbol).join(" ")
        )?;
        writeln!(f, "states: {}", self.states().iter().map(label).join(" "))?;
        writeln!(f, "initial: {}", label(self.initial()))?;
        writeln!(f, "finals: {}", self.finals().iter().map(label).join(" "))?;
        for (origin, a, target) in self.transitions() {
            writeln!(f, "{} {} -> {}", label(origin), symbol(a), label(target))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::ParseError;
    use crate::prelude::*;
    use crate::tests::{double_zero_dfa, partial_ab_dfa};

    #[test]
    fn parse_description() {
        let dfa: DFA = "
            # contains 00
            alphabet: 0 1
            states: A B C
            initial: A
            finals: C
            A 0 -> B
            A 1 -> A
            B 0 -> C
            B 1 -> A
            C 0 -> C
            C 1 -> C
        "
        .parse()
        .unwrap();
        assert_eq!(dfa, double_zero_dfa());
    }

    #[test]
    fn undefined_transitions_are_skipped() {
        let dfa: DFA = "alphabet: a b\nstates: 0 1 2\ninitial: 0\nfinals: 2\n0 a -> 1\n0 b ->\n1 a -> ∅\n1 b -> 2\n2 a -> -\n"
            .parse()
            .unwrap();
        assert_eq!(dfa, partial_ab_dfa());
    }

    #[test]
    fn display_is_parsed_back() {
        for dfa in [double_zero_dfa(), partial_ab_dfa(), partial_ab_dfa().complete()] {
            let written = dfa.to_string();
            assert_eq!(written.parse::<DFA>().unwrap(), dfa);
        }
        assert_eq!(
            partial_ab_dfa().to_string(),
            "alphabet: a b\nstates: 0 1 2\ninitial: 0\nfinals: 2\n0 a -> 1\n1 b -> 2\n"
        );
    }

    fn two_state_dfa(label: &str) -> DFA {
        DFA::new(
            CharAlphabet::from_iter(['a']),
            ["p", label],
            "p",
            [label],
            [("p", 'a', label), (label, 'a', "p")],
        )
        .unwrap()
    }

    #[test]
    fn unusual_labels_are_quoted() {
        for label in ["-", "∅", "->", "#1", "", "a b", "x:y", "states:", "\"q\\", "two\nlines"] {
            let dfa = two_state_dfa(label);
            let written = dfa.to_string();
            assert_eq!(written.parse::<DFA>(), Ok(dfa), "label {label:?} in\n{written}");
        }
        assert_eq!(
            two_state_dfa("-").to_string(),
            "alphabet: a\nstates: \"-\" p\ninitial: p\nfinals: \"-\"\n\"-\" a -> p\np a -> \"-\"\n"
        );
    }

    #[test]
    fn unusual_symbols_are_quoted() {
        let symbols = [' ', ':', '"', '\\', '#', '-', '\n'];
        let dfa = DFA::new(
            CharAlphabet::from_iter(symbols),
            ["alphabet", "states"],
            "alphabet",
            ["states"],
            symbols.map(|a| ("alphabet", a, "states")),
        )
        .unwrap();
        let written = dfa.to_string();
        assert_eq!(written.parse::<DFA>(), Ok(dfa), "\n{written}");
    }

    #[test]
    fn quoted_markers_are_states() {
        let dfa: DFA = "alphabet: a\nstates: p \"-\"\ninitial: p\np a -> \"-\"\n\"-\" a -> -"
            .parse()
            .unwrap();
        assert_eq!(dfa.successor(&State::from("p"), 'a'), Some(&State::from("-")));
        assert_eq!(dfa.successor(&State::from("-"), 'a'), None);
    }

    #[test]
    fn parse_errors() {
        assert_eq!(
            "alphabet: a\nstates: \"p\ninitial: p".parse::<DFA>(),
            Err(ParseError::InvalidQuoting { line: 2 })
        );
        assert_eq!(
            "alphabet: a\nstates: \"p\"q\ninitial: p".parse::<DFA>(),
            Err(ParseError::InvalidQuoting { line: 2 })
        );
        assert_eq!(
            "states: p\ninitial: p".parse::<DFA>(),
            Err(ParseError::MissingField("alphabet"))
        );
        assert_eq!(
            "alphabet: ab\nstates: p\ninitial: p".parse::<DFA>(),
            Err(ParseError::InvalidSymbol {
                line: 1,
                token: "ab".into()
            })
        );
        assert_eq!(
            "alphabet: a\nalphabet: b".parse::<DFA>(),
            Err(ParseError::DuplicateField {
                line: 2,
                field: "alphabet"
            })
        );
        assert_eq!(
            "alphabet: a\nstates: p q\ninitial: p q".parse::<DFA>(),
            Err(ParseError::InvalidInitial { line: 3 })
        );
        assert!(matches!(
            "alphabet: a\nstates: p\ninitial: p\np a p".parse::<DFA>(),
            Err(ParseError::MalformedTransition { line: 4, .. })
        ));
        assert_eq!(
            "alphabet: a\nstates: p\ninitial: q".parse::<DFA>(),
            Err(ParseError::Construction(ConstructionError::UnknownInitial(
                State::from("q")
            )))
        );
    }
}
