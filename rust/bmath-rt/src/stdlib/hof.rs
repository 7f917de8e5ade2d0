//! Higher-order functions over collections.
//!
//! `map`, `filter`, and `zip` accept a Vector or a Sequence and always
//! return a Sequence — mapping a vector wraps a snapshot of it, mapping a
//! sequence appends a transformer to that same sequence. The reducers
//! (`reduce`, `sum`, `any`, `all`, `min`, `max`) are eager and consume a
//! sequence argument.

use super::sequence::{VectorGenerator, ZipGenerator};
use super::{arith, callable_arg, expect_arity, native};
use bmath_core::env::Env;
use bmath_core::error::{ErrorKind, EvalError};
use bmath_core::sequence::{Sequence, Transformer};
use bmath_core::values::{Invoker, Value};
use std::cell::RefCell;
use std::rc::Rc;

/// View any collection argument as a shared sequence handle.
fn to_sequence(name: &str, value: &Value) -> Result<Rc<RefCell<Sequence>>, EvalError> {
    match value {
        Value::Sequence(seq) => Ok(seq.clone()),
        Value::Vector(items) => {
            let snapshot = items.borrow().clone();
            Ok(Rc::new(RefCell::new(Sequence::new(Box::new(
                VectorGenerator::new(snapshot),
            )))))
        }
        other => Err(collection_error(name, other)),
    }
}

/// Drain any collection argument into a plain Vec.
fn drain(name: &str, value: &Value) -> Result<Vec<Value>, EvalError> {
    match value {
        Value::Vector(items) => Ok(items.borrow().clone()),
        Value::Sequence(seq) => seq.borrow_mut().collect_remaining(),
        other => Err(collection_error(name, other)),
    }
}

fn collection_error(name: &str, value: &Value) -> EvalError {
    EvalError::new(
        ErrorKind::UnsupportedType,
        format!(
            "{} needs a Vector or Sequence, got {}",
            name,
            value.simple_type().name()
        ),
    )
}

fn transform_fn(func: Value, invoker: &Invoker) -> Box<dyn FnMut(Value) -> Result<Value, EvalError>> {
    let invoker = invoker.clone();
    Box::new(move |value| invoker(&func, vec![value]))
}

pub fn register(env: &Env) {
    native(env, "map", |args, invoker| {
        expect_arity("map", &args, 2)?;
        let func = callable_arg("map", &args, 1)?.clone();
        let seq = to_sequence("map", &args[0])?;
        seq.borrow_mut()
            .push_transformer(Transformer::Map(transform_fn(func, invoker)));
        Ok(Value::Sequence(seq))
    });

    native(env, "filter", |args, invoker| {
        expect_arity("filter", &args, 2)?;
        let pred = callable_arg("filter", &args, 1)?.clone();
        let seq = to_sequence("filter", &args[0])?;
        seq.borrow_mut()
            .push_transformer(Transformer::Filter(transform_fn(pred, invoker)));
        Ok(Value::Sequence(seq))
    });

    native(env, "zip", |args, _| {
        expect_arity("zip", &args, 2)?;
        let left = to_sequence("zip", &args[0])?;
        let right = to_sequence("zip", &args[1])?;
        Ok(Value::sequence(Sequence::new(Box::new(ZipGenerator::new(
            left, right,
        )))))
    });

    native(env, "reduce", |args, invoker| {
        expect_arity("reduce", &args, 3)?;
        let func = callable_arg("reduce", &args, 2)?.clone();
        let mut acc = args[1].clone();
        for item in drain("reduce", &args[0])? {
            acc = invoker(&func, vec![acc, item])?;
        }
        Ok(acc)
    });

    native(env, "sum", |args, _| {
        expect_arity("sum", &args, 1)?;
        let mut acc = Value::int(0);
        for item in drain("sum", &args[0])? {
            acc = arith::add(acc, item)?;
        }
        Ok(acc)
    });

    native(env, "any", |args, _| {
        expect_arity("any", &args, 1)?;
        for item in drain("any", &args[0])? {
            match item {
                Value::Bool(true) => return Ok(Value::Bool(true)),
                Value::Bool(false) => {}
                other => return Err(boolean_element_error("any", &other)),
            }
        }
        Ok(Value::Bool(false))
    });

    native(env, "all", |args, _| {
        expect_arity("all", &args, 1)?;
        for item in drain("all", &args[0])? {
            match item {
                Value::Bool(false) => return Ok(Value::Bool(false)),
                Value::Bool(true) => {}
                other => return Err(boolean_element_error("all", &other)),
            }
        }
        Ok(Value::Bool(true))
    });

    native(env, "min", |args, invoker| select(SelectMode::Min, args, invoker));
    native(env, "max", |args, invoker| select(SelectMode::Max, args, invoker));
}

fn boolean_element_error(name: &str, value: &Value) -> EvalError {
    EvalError::new(
        ErrorKind::UnsupportedType,
        format!(
            "{} needs Boolean elements, got {}",
            name,
            value.simple_type().name()
        ),
    )
}

#[derive(Clone, Copy)]
enum SelectMode {
    Min,
    Max,
}

impl SelectMode {
    fn name(&self) -> &'static str {
        match self {
            SelectMode::Min => "min",
            SelectMode::Max => "max",
        }
    }
}

/// `min`/`max` accept a vector, a sequence, or a variadic list of values,
/// optionally followed by a comparator `|a, b| bool` that returns true
/// when `a` orders before `b`.
fn select(mode: SelectMode, args: Vec<Value>, invoker: &Invoker) -> Result<Value, EvalError> {
    let name = mode.name();
    if args.is_empty() {
        return Err(EvalError::new(
            ErrorKind::InvalidArgument,
            format!("{} needs at least one value", name),
        ));
    }

    let (comparator, values) = match args.last() {
        Some(f @ (Value::Function(_) | Value::Native(_))) if args.len() >= 2 => {
            (Some(f.clone()), &args[..args.len() - 1])
        }
        _ => (None, &args[..]),
    };

    let candidates = match values {
        [single @ (Value::Vector(_) | Value::Sequence(_))] => drain(name, single)?,
        _ => values.to_vec(),
    };
    let mut iter = candidates.into_iter();
    let Some(mut best) = iter.next() else {
        return Err(EvalError::new(
            ErrorKind::InvalidArgument,
            format!("{} needs at least one value", name),
        ));
    };

    let orders_before = |a: &Value, b: &Value| -> Result<bool, EvalError> {
        match &comparator {
            Some(cmp) => match invoker(cmp, vec![a.clone(), b.clone()])? {
                Value::Bool(result) => Ok(result),
                other => Err(EvalError::new(
                    ErrorKind::UnsupportedType,
                    format!(
                        "{}: the comparator must return Boolean, got {}",
                        name,
                        other.simple_type().name()
                    ),
                )),
            },
            None => match (a, b) {
                (Value::Number(x), Value::Number(y)) => Ok(x.compare(*y)?.is_lt()),
                _ => Err(EvalError::new(
                    ErrorKind::UnsupportedType,
                    format!("{} without a comparator needs numbers", name),
                )),
            },
        }
    };

    for candidate in iter {
        let replace = match mode {
            SelectMode::Min => orders_before(&candidate, &best)?,
            SelectMode::Max => orders_before(&best, &candidate)?,
        };
        if replace {
            best = candidate;
        }
    }
    Ok(best)
}
