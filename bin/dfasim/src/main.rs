use std::process::ExitCode;

use dfasim::{dot::RenderError, prelude::*};
use owo_colors::OwoColorize;
use thiserror::Error;
use tracing::{debug, info, trace};
use tracing_subscriber::{filter, prelude::*};

use clap::{Arg, ArgAction, ArgMatches, Command};

#[derive(Error, Debug)]
enum CliError {
    #[error("could not read \"{path}\": {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("could not parse \"{path}\": {source}")]
    Parse { path: String, source: ParseError },
    #[error(transparent)]
    Render(#[from] RenderError),
}

fn file_arg() -> Arg {
    Arg::new("file")
        .required(true)
        .help("description of the automaton, use - to read from stdin")
}

fn cli() -> clap::Command {
    Command::new("dfasim")
    .about("Simulation, completion and minimization of deterministic finite automata")
    .subcommand_required(true)
    .arg(
        Arg::new("verbosity")
        .short('v')
        .long("verbosity")
        .global(true)
        .num_args(0..=1)
        .require_equals(true)
        .value_parser(["info", "debug", "trace"])
        .default_missing_value("info")
    )
    .subcommand(
        Command::new("run")
        .about("runs a word on the automaton and prints every step, exits with 1 if the word is rejected")
        .arg(file_arg())
        .arg(Arg::new("word").help("the word to run, the empty word if omitted"))
    )
    .subcommand(
        Command::new("table")
        .about("prints the transition table")
        .arg(file_arg())
        .arg(Arg::new("boxed").long("boxed").action(ArgAction::SetTrue).help("draw the table as a box"))
    )
    .subcommand(
        Command::new("complete")
        .about("adds a dead state for all missing transitions and prints the resulting automaton")
        .arg(file_arg())
    )
    .subcommand(
        Command::new("minimize")
        .about("prints the minimal automaton accepting the same language")
        .arg(file_arg())
    )
    .subcommand(
        Command::new("dot")
        .about("prints the automaton in the DOT format of graphviz")
        .arg(file_arg())
    )
    .subcommand(
        Command::new("render")
        .about("renders the automaton to <stem>.png using graphviz")
        .arg(file_arg())
        .arg(Arg::new("stem").default_value("afd").help("file name without extension"))
    )
}

fn setup_logging(matches: &ArgMatches) {
    let level = match matches
        .try_get_one::<String>("verbosity")
        .ok()
        .flatten()
        .map(|m| m.as_str())
    {
        Some("trace") => filter::LevelFilter::TRACE,
        Some("debug") => filter::LevelFilter::DEBUG,
        Some("info") => filter::LevelFilter::INFO,
        _ => filter::LevelFilter::WARN,
    };

    let stderr_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(stderr_log.with_filter(level))
        .init();

    trace!("setup {level} logging");
}

fn read_automaton(matches: &ArgMatches) -> Result<DFA, CliError> {
    let path = matches
        .get_one::<String>("file")
        .expect("file is a required argument")
        .clone();
    debug!("reading automaton from {path}");

    let contents = if path == "-" {
        std::io::read_to_string(std::io::stdin().lock())
    } else {
        std::fs::read_to_string(&path)
    }
    .map_err(|source| CliError::Read {
        path: path.clone(),
        source,
    })?;

    let dfa: DFA = contents
        .parse()
        .map_err(|source| CliError::Parse { path, source })?;
    info!(
        "read automaton with {} states over {} symbols",
        dfa.size(),
        dfa.alphabet().size()
    );
    Ok(dfa)
}

fn execute(matches: &ArgMatches) -> Result<ExitCode, CliError> {
    match matches.subcommand() {
        Some(("run", sub)) => {
            let dfa = read_automaton(sub)?;
            let word = sub
                .get_one::<String>("word")
                .map(String::as_str)
                .unwrap_or_default();
            let outcome = dfa.run(word.chars());
            for entry in &outcome.trace {
                if entry.is_error() {
                    println!("{}", entry.red());
                } else if let TraceEntry::Verdict { accepted: true, .. } = entry {
                    println!("{}", entry.green());
                } else if let TraceEntry::Verdict { accepted: false, .. } = entry {
                    println!("{}", entry.yellow());
                } else {
                    println!("{entry}");
                }
            }
            Ok(if outcome.accepted {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Some(("table", sub)) => {
            let dfa = read_automaton(sub)?;
            if sub.get_flag("boxed") {
                println!("{}", table::render_boxed(&dfa));
                println!("{}", table::finals_caption(&dfa));
            } else {
                print!("{}", table::render(&dfa));
            }
            Ok(ExitCode::SUCCESS)
        }
        Some(("complete", sub)) => {
            let dfa = read_automaton(sub)?;
            print!("{}", dfa.complete());
            Ok(ExitCode::SUCCESS)
        }
        Some(("minimize", sub)) => {
            let dfa = read_automaton(sub)?;
            let start = std::time::Instant::now();
            let minimized = dfa.minimize();
            info!(
                "minimization from {} to {} states took {}µs",
                dfa.size(),
                minimized.size(),
                start.elapsed().as_micros()
            );
            print!("{minimized}");
            Ok(ExitCode::SUCCESS)
        }
        Some(("dot", sub)) => {
            let dfa = read_automaton(sub)?;
            println!("{}", dfa.dot_representation());
            Ok(ExitCode::SUCCESS)
        }
        Some(("render", sub)) => {
            let dfa = read_automaton(sub)?;
            let stem = sub
                .get_one::<String>("stem")
                .expect("stem has a default value");
            let path = dfa.render_to_file_name(stem)?;
            println!("rendered automaton to {}", path.display());
            Ok(ExitCode::SUCCESS)
        }
        _ => unreachable!(),
    }
}

pub fn main() -> ExitCode {
    let matches = cli().get_matches();

    setup_logging(&matches);

    match execute(&matches) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}", e.red());
            ExitCode::from(2)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::cli;

    #[test]
    fn cli_is_consistent() {
        cli().debug_assert();
    }

    #[test]
    fn parses_run_arguments() {
        let matches = cli()
            .try_get_matches_from(["dfasim", "-v=debug", "run", "afd.txt", "0101"])
            .unwrap();
        let (name, sub) = matches.subcommand().unwrap();
        assert_eq!(name, "run");
        assert_eq!(sub.get_one::<String>("word").map(String::as_str), Some("0101"));
    }
}
