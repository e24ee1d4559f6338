//! CLI entry point for the `tokeval` tool.
//!
//! Evaluates expressions, pretty-prints JSON documents and solves average
//! formulas. Set `RUST_LOG=debug` to see what the parsers are doing.

use std::io::{self, Write};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use log::{error, warn};
use thiserror::Error;
use tokeval::grade::{ExpressionCalculator, GradeError};
use tokeval::json::open_document;
use tokeval::{Error, Expression, SourceResolver, SyntaxError};

/// Tokenize and evaluate expressions, JSON documents and grade formulas.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Evaluate an arithmetic expression such as `3x + root(9)`.
    Eval {
        expression: String,

        /// Bind a variable before evaluating, as `name=value`.
        #[arg(long = "var", value_parser = parse_binding)]
        vars: Vec<(String, f64)>,
    },
    /// Read a JSON document from a path or `file://` URL and print it.
    Json {
        location: String,

        /// Indent nested values with tabs.
        #[arg(short, long)]
        pretty: bool,
    },
    /// Inspect an average formula such as `(SE1 + 2*SE2 + PW)/4`.
    Grade {
        formula: String,

        /// Record a grade, as `name=value`.
        #[arg(long = "set", value_parser = parse_binding)]
        grades: Vec<(String, f64)>,

        /// Report the value this grade needs to reach `--average`.
        #[arg(long, requires = "average")]
        solve: Option<String>,

        /// Target average for `--solve`.
        #[arg(long, requires = "solve")]
        average: Option<f64>,
    },
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Input(#[from] Error),
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    #[error(transparent)]
    Grade(#[from] GradeError),
    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),
}

fn parse_binding(arg: &str) -> Result<(String, f64), String> {
    let (name, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got '{arg}'"))?;
    let value = value
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("invalid value for '{name}': {e}"))?;
    Ok((name.trim().to_owned(), value))
}

fn eval(out: &mut impl Write, src: &str, vars: &[(String, f64)]) -> Result<(), CliError> {
    let mut expr = Expression::parse(src)?;
    for (name, value) in vars {
        if !expr.set_variable(name, *value) {
            warn!("variable '{name}' does not occur in the expression");
        }
    }
    writeln!(out, "{}", expr.value()?)?;
    Ok(())
}

fn json(out: &mut impl Write, location: &str, pretty: bool) -> Result<(), CliError> {
    let doc = open_document(location, &SourceResolver::new())?;
    if pretty {
        writeln!(out, "{}", doc.pretty())?;
    } else {
        writeln!(out, "{doc}")?;
    }
    Ok(())
}

fn grade(
    out: &mut impl Write,
    formula: &str,
    grades: &[(String, f64)],
    solve: Option<(&str, f64)>,
) -> Result<(), CliError> {
    let mut calc = ExpressionCalculator::parse(formula)?;
    let calculator = calc.calculator_mut();
    for (name, value) in grades {
        calculator.set(name, *value)?;
    }

    if let Some((name, target)) = solve {
        writeln!(out, "{}", calculator.required_grade(name, target)?)?;
        return Ok(());
    }

    for g in calculator.grades() {
        match g.value() {
            Some(v) => writeln!(out, "{}\t{}\t{v}", g.name(), g.weighting())?,
            None => writeln!(out, "{}\t{}\t-", g.name(), g.weighting())?,
        }
    }
    writeln!(out, "average\t{}", calculator.average())?;
    Ok(())
}

fn run(cli: Cli) -> Result<(), CliError> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match cli.command {
        Command::Eval { expression, vars } => eval(&mut out, &expression, &vars),
        Command::Json { location, pretty } => json(&mut out, &location, pretty),
        Command::Grade {
            formula,
            grades,
            solve,
            average,
        } => {
            let solve = solve.as_deref().zip(average);
            grade(&mut out, &formula, &grades, solve)
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            let _ = writeln!(io::stderr(), "tokeval: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn output(f: impl FnOnce(&mut Vec<u8>) -> Result<(), CliError>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap_or_else(|e| panic!("{e}"));
        String::from_utf8(buf).unwrap_or_else(|e| panic!("{e}"))
    }

    #[rstest]
    #[case("x=2", Ok(("x".to_owned(), 2.0)))]
    #[case(" y = -1.5", Ok(("y".to_owned(), -1.5)))]
    #[case("z", Err("expected name=value, got 'z'".to_owned()))]
    fn bindings(#[case] arg: &str, #[case] expected: Result<(String, f64), String>) {
        assert_eq!(parse_binding(arg), expected);
    }

    #[test]
    fn eval_prints_value() {
        let vars = [("x".to_owned(), 4.0)];
        let text = output(|out| eval(out, "3x + 2", &vars));
        assert_eq!(text, "14\n");
    }

    #[test]
    fn grade_solves_for_target() {
        let grades = [("SE1".to_owned(), 6.0), ("SE2".to_owned(), 9.0)];
        let text = output(|out| grade(out, "(SE1 + 2*SE2 + PW)/4", &grades, Some(("PW", 7.5))));
        assert_eq!(text, "6\n");
    }

    #[test]
    fn grade_lists_weightings() {
        let text = output(|out| grade(out, "(A + B)/2", &[], None));
        assert_eq!(text, "A\t1\t-\nB\t1\t-\naverage\t0\n");
    }

    #[test]
    fn cli_parses_subcommand() {
        let cli = Cli::try_parse_from(["tokeval", "eval", "x", "--var", "x=1"])
            .unwrap_or_else(|e| panic!("{e}"));
        assert!(matches!(cli.command, Command::Eval { ref vars, .. } if vars.len() == 1));
    }
}
