//! Broad input ⇒ output sweep over the language surface. Each entry is a
//! complete program; the expectation is the printed form of its last
//! value.

use bmath_compiler::OptLevel;
use bmath_rt::Engine;

fn check(src: &str, expected: &str) {
    let mut engine = Engine::new(OptLevel::Full);
    let results: Result<Vec<_>, _> = engine.run(src).collect();
    let results = results.unwrap_or_else(|e| panic!("{:?} failed: {}", src, e));
    let last = results.last().unwrap_or_else(|| panic!("{:?} was empty", src));
    assert_eq!(last.value.to_string(), expected, "for {:?}", src);
}

#[test]
fn test_arithmetic_sweep() {
    for (src, expected) in [
        ("1 + 2", "3"),
        ("2 + 3 * 4", "14"),
        ("(2 + 3) * 4", "20"),
        ("10 / 4", "2.5"),
        ("4 / 2", "2"),
        ("10 % 3", "1"),
        ("2 ^ 8", "256"),
        ("2 ^ -1", "0.5"),
        ("-5 + 3", "-2"),
        ("7 - -2", "9"),
        ("1.5 + 1.5", "3"),
        ("1e2", "100"),
        (".5 * 4", "2"),
        ("1e-1 * 5", "0.5"),
    ] {
        check(src, expected);
    }
}

#[test]
fn test_complex_number_sweep() {
    for (src, expected) in [
        ("2i + 3", "3+2i"),
        ("2i - 2i", "0"),
        ("i * i", "-1"),
        ("sqrt(-9)", "3i"),
        ("abs(3 + 4i)", "5"),
        ("re(5 + 3i)", "5"),
        ("im(5 + 3i)", "3"),
        ("(2 + 2i) * (2 - 2i)", "8"),
    ] {
        check(src, expected);
    }
}

#[test]
fn test_math_native_sweep() {
    for (src, expected) in [
        ("sqrt(16)", "4"),
        ("sqrt(2)", "1.4142135623730951"),
        ("abs(-7)", "7"),
        ("abs(-2.5)", "2.5"),
        ("floor(3.9)", "3"),
        ("ceil(3.1)", "4"),
        ("round(3.5)", "4"),
        ("exp(0)", "1"),
        ("log(100, 10)", "2"),
        ("pow(3, 3)", "27"),
        ("sin(0)", "0"),
        ("cos(0)", "1"),
        ("atan(0)", "0"),
        ("asin(1)", "1.5707963267948966"),
        ("acos(1)", "0"),
        ("sinh(0)", "0"),
        ("cosh(0)", "1"),
        ("tanh(0)", "0"),
    ] {
        check(src, expected);
    }
}

#[test]
fn test_comparison_and_logic_sweep() {
    for (src, expected) in [
        ("1 < 2", "true"),
        ("2 <= 2", "true"),
        ("3 > 4", "false"),
        ("1 == 1.0", "true"),
        ("1 != 2", "true"),
        ("[1, 2] == [1, 2]", "true"),
        ("[1, 2] == [2, 1]", "false"),
        ("true & true", "true"),
        ("false | false", "false"),
        ("!false", "true"),
        ("1 < 2 & 2 < 3", "true"),
        ("3 is Integer", "true"),
        ("3.5 is Number", "true"),
        ("sqrt is Function", "true"),
        ("[1] is Vector", "true"),
    ] {
        check(src, expected);
    }
}

#[test]
fn test_functions_and_closures_sweep() {
    for (src, expected) in [
        ("x = 10\nx * x", "100"),
        ("local y = 4\ny + 1", "5"),
        ("sq = |x| x * x\nsq(9)", "81"),
        ("add = |a, b| a + b\nadd(2, 3)", "5"),
        ("apply = |f, x| f(x)\napply(|n| n + 1, 41)", "42"),
        (
            "make_adder = |n| |x| x + n\nadd5 = make_adder(5)\nadd5(10)",
            "15",
        ),
        ("twice = |f, x| f(f(x))\ntwice(|n| n * 3, 2)", "18"),
        ("fib = |n| if(n < 2) n else fib(n-1) + fib(n-2)\nfib(10)", "55"),
        ("sq = |x| x * x\n5 -> sq", "25"),
        ("inc = |x| x + 1\n1 -> inc -> inc -> inc", "4"),
    ] {
        check(src, expected);
    }
}

#[test]
fn test_vector_sweep() {
    for (src, expected) in [
        ("len([])", "0"),
        ("first([9, 8])", "9"),
        ("[1, 2, 3] + 1", "[2, 3, 4]"),
        ("[1, 1, 1] * [2, 2, 2]", "6"),
        ("merge([1], [2])", "[1, 2]"),
        ("vec(3, |i| i + 1)", "[1, 2, 3]"),
        ("slice([1, 2, 3, 4, 5], 1, 4)", "[2, 3, 4]"),
        ("dot([1, 2, 3], [1, 2, 3])", "14"),
        ("nth([[1], [2]], 1)", "[2]"),
        ("[[1, 2], [3, 4]]", "[[1, 2], [3, 4]]"),
    ] {
        check(src, expected);
    }
}

#[test]
fn test_sequence_sweep() {
    for (src, expected) in [
        ("sum(collect(take(seq(1000, |i| i), 4)))", "6"),
        ("collect(filter(seq(10, |i| i), |x| x > 6))", "[7, 8, 9]"),
        ("reduce([2, 3, 4], 1, |a, b| a * b)", "24"),
        ("min([4, 2, 9])", "2"),
        ("max(7, 3)", "7"),
        ("any(map([1, 2, 3], |x| x == 2))", "true"),
        ("all(map([1, 2, 3], |x| x < 10))", "true"),
        ("collect(zip(seq(3, |i| i), [7, 8, 9]))", "[[0, 7], [1, 8], [2, 9]]"),
        ("skip(Sequence([5, 6, 7]), 1)", "6"),
    ] {
        check(src, expected);
    }
}

#[test]
fn test_block_and_conditional_sweep() {
    for (src, expected) in [
        ("{1\n2\n3}", "3"),
        ("{x = 2\n y = 3\n x ^ y}", "8"),
        ("if(2 > 1) 1 else 0", "1"),
        ("abs2 = |x| if(x < 0) -x else x\nabs2(-5)", "5"),
        (
            "sign = |x| if(x > 0) 1 elif(x == 0) 0 else -1\nsign(-9)",
            "-1",
        ),
        ("if(1 == 1) {a = 2\n a + 1} else 0", "3"),
    ] {
        check(src, expected);
    }
}

#[test]
fn test_control_sweep() {
    for (src, expected) in [
        ("print(7)", "7"),
        ("try_or(|| missing, 0)", "0"),
        ("try_catch(|| missing, |e| 1)", "1"),
    ] {
        check(src, expected);
    }
}
