//! Interactive REPL.
//!
//! Lines accumulate in a buffer while the lexer reports `IncompleteInput`
//! (an unclosed bracket, block, or `if`), shown by the `... ` continuation
//! prompt. Any other error is reported and the session keeps going.

use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};
use std::process::ExitCode;

use bmath_compiler::OptLevel;
use bmath_core::env::Environment;
use bmath_core::error::ErrorKind;
use bmath_rt::Engine;

use crate::{cyan, diagnostics, gray, red};

/// Language keywords for tab completion.
const KEYWORDS: &[&str] = &["if", "elif", "else", "local", "true", "false", "is"];

/// Standard-library names for tab completion.
const BUILTINS: &[&str] = &[
    "sqrt", "abs", "floor", "ceil", "round", "exp", "log", "pow", "re", "im",
    "sin", "cos", "tan", "cot", "sec", "csc",
    "asin", "acos", "atan", "sinh", "cosh", "tanh",
    "vec", "dot", "first", "last", "len", "nth", "at", "merge", "slice", "set",
    "seq", "collect", "skip", "take", "hasNext", "next",
    "map", "filter", "reduce", "sum", "any", "all", "zip", "min", "max",
    "exit", "try_or", "try_catch", "print",
    "pi", "e", "i",
];

/// Builtin type names for tab completion.
const TYPES: &[&str] = &[
    "Any", "Number", "Integer", "Real", "Complex", "Boolean", "Vector",
    "Sequence", "Function", "Type", "String", "Error",
];

/// REPL commands for tab completion.
const COMMANDS: &[&str] = &[":help", ":quit", ":reset", ":env"];

/// Completer over commands, keywords, builtins, and type names.
struct BmHelper;

impl Completer for BmHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let start = line[..pos]
            .rfind(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == ':'))
            .map(|i| i + 1)
            .unwrap_or(0);
        let word = &line[start..pos];
        if word.is_empty() {
            return Ok((start, Vec::new()));
        }
        let mut candidates = Vec::new();
        for name in COMMANDS
            .iter()
            .chain(BUILTINS)
            .chain(KEYWORDS)
            .chain(TYPES)
        {
            if name.starts_with(word) {
                candidates.push(Pair {
                    display: name.to_string(),
                    replacement: name.to_string(),
                });
            }
        }
        Ok((start, candidates))
    }
}

impl Hinter for BmHelper {
    type Hint = String;
}

impl Highlighter for BmHelper {}
impl Validator for BmHelper {}
impl Helper for BmHelper {}

pub fn run(level: OptLevel) -> ExitCode {
    let mut rl = match Editor::<BmHelper, DefaultHistory>::new() {
        Ok(editor) => editor,
        Err(err) => {
            eprintln!("{} cannot start the line editor: {}", red("error:"), err);
            return ExitCode::FAILURE;
        }
    };
    rl.set_helper(Some(BmHelper));
    let mut engine = Engine::new(level);
    let mut buffer = String::new();

    println!("{}", cyan("BMath — type :help for commands, :quit to exit"));
    loop {
        let prompt = if buffer.is_empty() { "bm> " } else { "... " };
        match rl.readline(prompt) {
            Ok(line) => {
                if buffer.is_empty() {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    match handle_command(trimmed, &mut engine, level) {
                        Command::Quit => return ExitCode::SUCCESS,
                        Command::Handled => continue,
                        Command::NotACommand => {}
                    }
                }
                let _ = rl.add_history_entry(&line);
                // Join with a newline between lines but none at the end,
                // so a trailing backslash still reads as incomplete.
                if !buffer.is_empty() {
                    buffer.push('\n');
                }
                buffer.push_str(&line);

                let mut incomplete = false;
                for result in engine.run(&buffer) {
                    match result {
                        Ok(labeled) => println!("{}", labeled),
                        Err(err) if err.kind == ErrorKind::IncompleteInput => {
                            incomplete = true;
                        }
                        Err(err) => diagnostics::report(&err, Some(&buffer)),
                    }
                }
                if !incomplete {
                    buffer.clear();
                }
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl-C abandons the pending input, not the session.
                buffer.clear();
            }
            Err(ReadlineError::Eof) => return ExitCode::SUCCESS,
            Err(err) => {
                eprintln!("{} {}", red("error:"), err);
                return ExitCode::FAILURE;
            }
        }
    }
}

enum Command {
    Quit,
    Handled,
    NotACommand,
}

fn handle_command(line: &str, engine: &mut Engine, level: OptLevel) -> Command {
    match line {
        ":quit" | ":q" => Command::Quit,
        ":help" | ":h" => {
            println!("{}", cyan("Commands:"));
            println!("  :help   show this help");
            println!("  :env    list your bindings");
            println!("  :reset  forget all bindings");
            println!("  :quit   leave the REPL");
            Command::Handled
        }
        ":reset" => {
            *engine = Engine::new(level);
            println!("{}", gray("Session state reset."));
            Command::Handled
        }
        ":env" => {
            let bindings = Environment::user_bindings(engine.interpreter().globals());
            if bindings.is_empty() {
                println!("{}", gray("No bindings yet."));
            }
            for (name, value) in bindings {
                println!("  {} = {}", name, value);
            }
            Command::Handled
        }
        _ => Command::NotACommand,
    }
}
