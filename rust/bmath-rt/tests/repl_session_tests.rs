//! Session behavior as the REPL driver sees it: line-at-a-time input,
//! continuation on `IncompleteInput`, recovery after errors, and state
//! that persists across inputs.

use bmath_compiler::OptLevel;
use bmath_core::error::ErrorKind;
use bmath_rt::Engine;

/// Feed lines the way the REPL does: accumulate while the engine reports
/// `IncompleteInput`, otherwise evaluate and reset the buffer. Returns
/// everything printed, one entry per value or error kind.
fn session(lines: &[&str]) -> Vec<String> {
    let mut engine = Engine::new(OptLevel::Full);
    let mut buffer = String::new();
    let mut printed = Vec::new();
    for line in lines {
        // Join with newlines between lines, none at the end, so that a
        // trailing backslash still reads as incomplete input.
        if !buffer.is_empty() {
            buffer.push('\n');
        }
        buffer.push_str(line);
        let mut incomplete = false;
        for result in engine.run(&buffer) {
            match result {
                Ok(labeled) => printed.push(labeled.value.to_string()),
                Err(err) if err.kind == ErrorKind::IncompleteInput => incomplete = true,
                Err(err) => printed.push(format!("error:{}", err.kind.name())),
            }
        }
        if !incomplete {
            buffer.clear();
        }
    }
    printed
}

#[test]
fn test_block_continuation() {
    // `{` alone asks for more input; the closing line completes the block.
    assert_eq!(session(&["{", "1+1}"]), vec!["2"]);
}

#[test]
fn test_if_continuation() {
    assert_eq!(session(&["if(1 < 2) 10", "else 20"]), vec!["10"]);
}

#[test]
fn test_vector_continuation() {
    assert_eq!(session(&["[1,", "2,", "3]"]), vec!["[1, 2, 3]"]);
}

#[test]
fn test_backslash_continuation() {
    assert_eq!(session(&["1 + \\", "2"]), vec!["3"]);
}

#[test]
fn test_state_persists_across_inputs() {
    assert_eq!(
        session(&["x = 2", "f = |n| n * x", "f(10)"]),
        vec!["2", "|n| -> Any", "20"]
    );
}

#[test]
fn test_recursion_defined_across_the_session() {
    assert_eq!(
        session(&["fact = |n| if(n<=1) 1 else n*fact(n-1)", "fact(5)"]),
        vec!["|n| -> Any", "120"]
    );
}

#[test]
fn test_errors_recover_without_losing_state() {
    assert_eq!(
        session(&["x = 7", "pow = 5", "x"]),
        vec!["7", "error:ReservedName", "7"]
    );
    assert_eq!(
        session(&["nope", "1 + 1"]),
        vec!["error:UndefinedVariable", "2"]
    );
}

#[test]
fn test_sequences_stay_consumed_across_inputs() {
    assert_eq!(
        session(&["s = Sequence([1, 2])", "next(s)", "next(s)", "next(s)"]),
        vec!["seq(...)", "1", "2", "error:SequenceExhausted"]
    );
}

#[test]
fn test_closure_sees_later_rebinding() {
    assert_eq!(
        session(&["x = 1", "f = || x", "x = 42", "f()"]),
        vec!["1", "|| -> Any", "42", "42"]
    );
}
