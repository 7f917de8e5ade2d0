//! Folding soundness: for closed, effect-free programs, evaluating the
//! optimized tree and the unoptimized tree must produce the same value —
//! or fail with the same error kind.

use bmath_compiler::OptLevel;
use bmath_core::error::ErrorKind;
use bmath_rt::Engine;

fn outcome(src: &str, level: OptLevel) -> Result<Vec<String>, ErrorKind> {
    let mut engine = Engine::new(level);
    let mut values = Vec::new();
    for result in engine.run(src) {
        match result {
            Ok(labeled) => values.push(labeled.value.to_string()),
            Err(err) => return Err(err.kind),
        }
    }
    Ok(values)
}

fn assert_levels_agree(src: &str) {
    let none = outcome(src, OptLevel::None);
    let basic = outcome(src, OptLevel::Basic);
    let full = outcome(src, OptLevel::Full);
    assert_eq!(none, basic, "basic folding changed {:?}", src);
    assert_eq!(none, full, "full folding changed {:?}", src);
}

#[test]
fn test_arithmetic_folding_is_sound() {
    for src in [
        "2 + 3 * 4",
        "2 ^ 3 ^ 2",
        "10 - 3 - 2",
        "1 / 2",
        "7 % 3",
        "7.5 % 2",
        "2 ^ -2",
        "-(4 + 1)",
        "(2 + 3) * (4 - 1)",
        "2i * 2i",
        "(1 + 2i) + (1 - 2i)",
        "1.5e2 + .5",
    ] {
        assert_levels_agree(src);
    }
}

#[test]
fn test_arithmetic_error_kinds_are_preserved() {
    for src in ["1 / 0", "1 % 0", "2i % 2", "5 / (2 - 2)"] {
        assert_levels_agree(src);
    }
}

#[test]
fn test_boolean_and_comparison_folding_is_sound() {
    for src in [
        "!true",
        "true & false",
        "false | true",
        "true & true & false",
        "1 < 2",
        "2 >= 2",
        "3 != 3.0",
        "2 == 2.0",
        "1 < 2 & 3 < 4",
    ] {
        assert_levels_agree(src);
    }
}

#[test]
fn test_conditional_folding_is_sound() {
    for src in [
        "if(1 < 0) 10 elif(2 == 2) 20 else 30",
        "if(true) 1 else 2",
        "if(false) 1 else 2",
        "if(false) 1 elif(false) 2 else 3",
        "if(1 <= 1) if(false) 1 else 2 else 3",
    ] {
        assert_levels_agree(src);
    }
}

#[test]
fn test_type_check_folding_is_sound() {
    for src in ["1 is Any", "true is Any", "2i is Any", "[1] is Any", "3 is Number"] {
        assert_levels_agree(src);
    }
}

#[test]
fn test_folding_through_whole_programs() {
    for src in [
        "f = |x| x * (2 + 3)\nf(4)",
        "v = [1 + 1, 2 * 2, 9 - 3]\nsum(v)",
        "g = |n| if(false) 0 else n\ng(8)",
        "collect(map([1, 2], |x| x + 2 * 3))",
    ] {
        assert_levels_agree(src);
    }
}
