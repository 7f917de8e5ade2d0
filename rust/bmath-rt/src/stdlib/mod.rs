//! Standard library.
//!
//! Everything here is preloaded into the root environment frame. Names
//! bound in that frame — every native below plus the constants `pi`, `e`,
//! `i` and the builtin type values — are reserved: user code can shadow
//! them with `local`, never reassign them.

pub mod arith;
pub mod control;
pub mod hof;
pub mod math;
pub mod sequence;
pub mod vector;

use bmath_core::env::{Env, Environment};
use bmath_core::error::{ErrorKind, EvalError};
use bmath_core::number::Number;
use bmath_core::types::Type;
use bmath_core::values::{NativeFn, NativeImpl, Value};

/// Build the root environment with the whole standard library bound.
pub fn global_env() -> Env {
    let root = Environment::root();

    Environment::define(&root, "pi", Value::real(std::f64::consts::PI));
    Environment::define(&root, "e", Value::real(std::f64::consts::E));
    Environment::define(&root, "i", Value::Number(Number::complex(0.0, 1.0)));

    for name in [
        "Any", "Number", "Integer", "Real", "Complex", "Boolean", "Vector", "Sequence",
        "Function", "Type", "String", "Error",
    ] {
        let ty = Type::from_name(name).expect("builtin type name");
        Environment::define(&root, name, Value::TypeVal(ty));
    }

    math::register(&root);
    vector::register(&root);
    sequence::register(&root);
    hof::register(&root);
    control::register(&root);
    root
}

pub(crate) fn native(env: &Env, name: &'static str, func: NativeImpl) {
    Environment::define(env, name, Value::Native(NativeFn { name, func }));
}

// ── Argument helpers shared by the native implementations ──

pub(crate) fn expect_arity(name: &str, args: &[Value], n: usize) -> Result<(), EvalError> {
    if args.len() != n {
        return Err(EvalError::new(
            ErrorKind::InvalidArgument,
            format!("{} takes {} argument(s), got {}", name, n, args.len()),
        ));
    }
    Ok(())
}

pub(crate) fn expect_arity_range(
    name: &str,
    args: &[Value],
    min: usize,
    max: usize,
) -> Result<(), EvalError> {
    if args.len() < min || args.len() > max {
        return Err(EvalError::new(
            ErrorKind::InvalidArgument,
            format!(
                "{} takes {} to {} arguments, got {}",
                name,
                min,
                max,
                args.len()
            ),
        ));
    }
    Ok(())
}

pub(crate) fn number_arg(name: &str, args: &[Value], index: usize) -> Result<Number, EvalError> {
    match &args[index] {
        Value::Number(n) => Ok(*n),
        other => Err(EvalError::new(
            ErrorKind::UnsupportedType,
            format!(
                "{}: argument {} must be a number, got {}",
                name,
                index + 1,
                other.simple_type().name()
            ),
        )),
    }
}

pub(crate) fn int_arg(name: &str, args: &[Value], index: usize) -> Result<i64, EvalError> {
    match &args[index] {
        Value::Number(Number::Int(n)) => Ok(*n),
        other => Err(EvalError::new(
            ErrorKind::UnsupportedType,
            format!(
                "{}: argument {} must be an Integer, got {}",
                name,
                index + 1,
                other.simple_type().name()
            ),
        )),
    }
}

pub(crate) fn index_arg(name: &str, args: &[Value], index: usize) -> Result<usize, EvalError> {
    let n = int_arg(name, args, index)?;
    usize::try_from(n).map_err(|_| {
        EvalError::new(
            ErrorKind::InvalidArgument,
            format!("{}: argument {} must not be negative", name, index + 1),
        )
    })
}

pub(crate) fn callable_arg<'a>(
    name: &str,
    args: &'a [Value],
    index: usize,
) -> Result<&'a Value, EvalError> {
    let value = &args[index];
    match value {
        Value::Function(_) | Value::Native(_) => Ok(value),
        other => Err(EvalError::new(
            ErrorKind::UnsupportedType,
            format!(
                "{}: argument {} must be a function, got {}",
                name,
                index + 1,
                other.simple_type().name()
            ),
        )),
    }
}

pub(crate) fn vector_arg<'a>(
    name: &str,
    args: &'a [Value],
    index: usize,
) -> Result<&'a std::rc::Rc<std::cell::RefCell<Vec<Value>>>, EvalError> {
    match &args[index] {
        Value::Vector(items) => Ok(items),
        other => Err(EvalError::new(
            ErrorKind::UnsupportedType,
            format!(
                "{}: argument {} must be a Vector, got {}",
                name,
                index + 1,
                other.simple_type().name()
            ),
        )),
    }
}

pub(crate) fn sequence_arg<'a>(
    name: &str,
    args: &'a [Value],
    index: usize,
) -> Result<&'a std::rc::Rc<std::cell::RefCell<bmath_core::sequence::Sequence>>, EvalError> {
    match &args[index] {
        Value::Sequence(seq) => Ok(seq),
        other => Err(EvalError::new(
            ErrorKind::UnsupportedType,
            format!(
                "{}: argument {} must be a Sequence, got {}",
                name,
                index + 1,
                other.simple_type().name()
            ),
        )),
    }
}
