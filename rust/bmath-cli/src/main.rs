//! BMath CLI — the `bm` binary.
//!
//! Modes: evaluate a direct expression argument, evaluate a file, format
//! or dump a file's AST, or drop into the interactive REPL.

mod diagnostics;
mod fmt;
mod repl;
mod sexp;

use clap::{Parser as ClapParser, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;

use bmath_compiler::OptLevel;
use bmath_rt::Engine;

// ANSI color helpers
fn red(s: &str) -> String {
    format!("\x1b[31m{}\x1b[0m", s)
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{}\x1b[0m", s)
}
fn gray(s: &str) -> String {
    format!("\x1b[90m{}\x1b[0m", s)
}

#[derive(ClapParser)]
#[command(
    name = "bm",
    version,
    about = "BMath — an expression-oriented language for interactive numeric computation",
    after_help = "Examples:\n  \
        bm                       Start the interactive REPL\n  \
        bm \"2 + 3 * 4\"           Evaluate one expression\n  \
        bm -f script.bm          Evaluate a file\n  \
        bm --format script.bm    Pretty-print a file\n  \
        bm --sexp script.bm      Print the AST as S-expressions"
)]
struct Cli {
    /// Expression to evaluate
    expr: Option<String>,

    /// Evaluate a script file
    #[arg(short = 'f', long = "file", value_name = "PATH")]
    file: Option<PathBuf>,

    /// Force the interactive REPL
    #[arg(short = 'i', long = "interactive")]
    interactive: bool,

    /// Optimization level
    #[arg(short = 'O', long = "optimize", value_enum, default_value_t = OptArg::Full)]
    optimize: OptArg,

    /// Pretty-print a source file instead of evaluating it
    #[arg(long = "format", value_name = "PATH")]
    format: Option<PathBuf>,

    /// Where --format writes its output (stdout by default)
    #[arg(short = 'o', long = "output", value_name = "OUT")]
    output: Option<PathBuf>,

    /// Print a source file's AST as S-expressions
    #[arg(long = "sexp", value_name = "PATH")]
    sexp: Option<PathBuf>,

    /// One line per expression in --sexp output
    #[arg(long = "compact")]
    compact: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OptArg {
    None,
    Basic,
    Full,
}

impl From<OptArg> for OptLevel {
    fn from(arg: OptArg) -> Self {
        match arg {
            OptArg::None => OptLevel::None,
            OptArg::Basic => OptLevel::Basic,
            OptArg::Full => OptLevel::Full,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let level = OptLevel::from(cli.optimize);

    if let Some(path) = &cli.format {
        return fmt::run(path, cli.output.as_deref());
    }
    if let Some(path) = &cli.sexp {
        return sexp::run(path, level, cli.compact);
    }
    if let Some(path) = &cli.file {
        return match std::fs::read_to_string(path) {
            Ok(source) => run_source(&source, level),
            Err(err) => {
                eprintln!("{} cannot read {}: {}", red("error:"), path.display(), err);
                ExitCode::FAILURE
            }
        };
    }
    if let (Some(expr), false) = (&cli.expr, cli.interactive) {
        return run_source(expr, level);
    }
    repl::run(level)
}

/// Evaluate a whole source, printing one result line per expression.
fn run_source(source: &str, level: OptLevel) -> ExitCode {
    let mut engine = Engine::new(level);
    for result in engine.run(source) {
        match result {
            Ok(labeled) => println!("{}", labeled),
            Err(err) => {
                diagnostics::report(&err, Some(source));
                return ExitCode::FAILURE;
            }
        }
    }
    ExitCode::SUCCESS
}
