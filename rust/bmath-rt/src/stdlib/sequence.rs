//! Sequence generators and the sequence natives.
//!
//! Generators capture the state they advance over: a snapshot of a vector,
//! a counter driving a user function, a budget over another sequence. A
//! sequence built from `seq(n, f)` calls `f` only when an element is
//! actually pulled.

use super::{callable_arg, expect_arity, index_arg, int_arg, native, sequence_arg};
use bmath_core::env::Env;
use bmath_core::error::{ErrorKind, EvalError};
use bmath_core::sequence::{Generator, Sequence};
use bmath_core::values::{Invoker, Value};
use std::cell::RefCell;
use std::rc::Rc;

/// Yields the elements of a snapshot taken when the sequence was built.
pub struct VectorGenerator {
    items: Vec<Value>,
    index: usize,
}

impl VectorGenerator {
    pub fn new(items: Vec<Value>) -> Self {
        Self { items, index: 0 }
    }
}

impl Generator for VectorGenerator {
    fn next(&mut self, peek: bool) -> Result<Value, EvalError> {
        let value = self.items.get(self.index).cloned().ok_or_else(|| {
            EvalError::new(ErrorKind::SequenceExhausted, "sequence has no more elements")
        })?;
        if !peek {
            self.index += 1;
        }
        Ok(value)
    }

    fn at_end(&self) -> bool {
        self.index >= self.items.len()
    }
}

/// Yields `f(0), f(1), ..., f(n-1)` lazily.
pub struct FnGenerator {
    func: Value,
    invoker: Invoker,
    index: i64,
    count: i64,
}

impl FnGenerator {
    pub fn new(func: Value, invoker: Invoker, count: i64) -> Self {
        Self {
            func,
            invoker,
            index: 0,
            count,
        }
    }
}

impl Generator for FnGenerator {
    fn next(&mut self, peek: bool) -> Result<Value, EvalError> {
        let value = (self.invoker)(&self.func, vec![Value::int(self.index)])?;
        if !peek {
            self.index += 1;
        }
        Ok(value)
    }

    fn at_end(&self) -> bool {
        self.index >= self.count
    }
}

/// Pulls at most `remaining` elements from a shared source sequence.
pub struct TakeGenerator {
    source: Rc<RefCell<Sequence>>,
    remaining: usize,
}

impl TakeGenerator {
    pub fn new(source: Rc<RefCell<Sequence>>, remaining: usize) -> Self {
        Self { source, remaining }
    }
}

impl Generator for TakeGenerator {
    fn next(&mut self, _peek: bool) -> Result<Value, EvalError> {
        if self.remaining == 0 {
            return Err(EvalError::new(
                ErrorKind::SequenceExhausted,
                "sequence has no more elements",
            ));
        }
        self.remaining -= 1;
        self.source.borrow_mut().next()
    }

    fn at_end(&self) -> bool {
        // An error while probing the source surfaces on the next pull.
        self.remaining == 0 || !self.source.borrow_mut().has_next().unwrap_or(true)
    }
}

/// Pairs two sequences element by element; ends with the shorter one.
pub struct ZipGenerator {
    left: Rc<RefCell<Sequence>>,
    right: Rc<RefCell<Sequence>>,
}

impl ZipGenerator {
    pub fn new(left: Rc<RefCell<Sequence>>, right: Rc<RefCell<Sequence>>) -> Self {
        Self { left, right }
    }
}

impl Generator for ZipGenerator {
    fn next(&mut self, _peek: bool) -> Result<Value, EvalError> {
        let a = self.left.borrow_mut().next()?;
        let b = self.right.borrow_mut().next()?;
        Ok(Value::vector(vec![a, b]))
    }

    fn at_end(&self) -> bool {
        !self.left.borrow_mut().has_next().unwrap_or(true)
            || !self.right.borrow_mut().has_next().unwrap_or(true)
    }
}

pub fn register(env: &Env) {
    native(env, "seq", |args, invoker| {
        expect_arity("seq", &args, 2)?;
        let count = int_arg("seq", &args, 0)?;
        if count < 0 {
            return Err(EvalError::new(
                ErrorKind::InvalidArgument,
                "seq: length must not be negative",
            ));
        }
        let func = callable_arg("seq", &args, 1)?.clone();
        Ok(Value::sequence(Sequence::new(Box::new(FnGenerator::new(
            func,
            invoker.clone(),
            count,
        )))))
    });

    native(env, "collect", |args, _| {
        expect_arity("collect", &args, 1)?;
        let seq = sequence_arg("collect", &args, 0)?;
        let items = seq.borrow_mut().collect_remaining()?;
        Ok(Value::vector(items))
    });

    native(env, "skip", |args, _| {
        expect_arity("skip", &args, 2)?;
        let seq = sequence_arg("skip", &args, 0)?;
        let count = index_arg("skip", &args, 1)?;
        let mut seq = seq.borrow_mut();
        for _ in 0..count {
            seq.next()?;
        }
        seq.next()
    });

    native(env, "take", |args, _| {
        expect_arity("take", &args, 2)?;
        let seq = sequence_arg("take", &args, 0)?.clone();
        let count = index_arg("take", &args, 1)?;
        Ok(Value::sequence(Sequence::new(Box::new(
            TakeGenerator::new(seq, count),
        ))))
    });

    native(env, "hasNext", |args, _| {
        expect_arity("hasNext", &args, 1)?;
        let seq = sequence_arg("hasNext", &args, 0)?;
        let has = seq.borrow_mut().has_next()?;
        Ok(Value::Bool(has))
    });

    native(env, "next", |args, _| {
        expect_arity("next", &args, 1)?;
        let seq = sequence_arg("next", &args, 0)?;
        let value = seq.borrow_mut().next()?;
        Ok(value)
    });
}
