//! Lazy, single-pass sequences.
//!
//! A sequence wraps a [`Generator`] plus an ordered list of
//! [`Transformer`]s. Transformers run in registration order each time an
//! element is pulled; a `Filter` that rejects an element suppresses its
//! emission entirely, so a filter predicate runs exactly once per
//! underlying element. Sequences are not restartable: once drained, any
//! further pull raises `SequenceExhausted`.

use crate::error::{ErrorKind, EvalError};
use crate::values::Value;

/// The mutable element source behind a sequence.
///
/// `next(peek)` with `peek = true` must return the upcoming element
/// without advancing; generators that cannot peek cheaply may ignore the
/// flag because [`Sequence`] keeps its own one-element lookahead cache.
pub trait Generator {
    fn next(&mut self, peek: bool) -> Result<Value, EvalError>;
    fn at_end(&self) -> bool;
}

pub type TransformFn = Box<dyn FnMut(Value) -> Result<Value, EvalError>>;

pub enum Transformer {
    Map(TransformFn),
    Filter(TransformFn),
}

pub struct Sequence {
    generator: Box<dyn Generator>,
    transformers: Vec<Transformer>,
    peeked: Option<Value>,
    done: bool,
}

impl Sequence {
    pub fn new(generator: Box<dyn Generator>) -> Self {
        Self {
            generator,
            transformers: Vec::new(),
            peeked: None,
            done: false,
        }
    }

    /// Append a transformer; it applies after every previously registered
    /// one.
    pub fn push_transformer(&mut self, transformer: Transformer) {
        self.transformers.push(transformer);
    }

    /// Pull the next accepted element through the transformer chain, or
    /// None when the generator is drained.
    fn pump(&mut self) -> Result<Option<Value>, EvalError> {
        'outer: loop {
            if self.generator.at_end() {
                self.done = true;
                return Ok(None);
            }
            let mut value = self.generator.next(false)?;
            for transformer in &mut self.transformers {
                match transformer {
                    Transformer::Map(f) => value = f(value)?,
                    Transformer::Filter(pred) => match pred(value.clone())? {
                        Value::Bool(true) => {}
                        Value::Bool(false) => continue 'outer,
                        other => {
                            return Err(EvalError::new(
                                ErrorKind::UnsupportedType,
                                format!(
                                    "filter predicate must return Boolean, got {}",
                                    other.simple_type().name()
                                ),
                            ))
                        }
                    },
                }
            }
            return Ok(Some(value));
        }
    }

    pub fn next(&mut self) -> Result<Value, EvalError> {
        if let Some(value) = self.peeked.take() {
            return Ok(value);
        }
        self.pump()?.ok_or_else(Self::exhausted)
    }

    /// Whether another element is available. May advance the underlying
    /// generator past filter-rejected elements; the accepted element is
    /// cached for the next pull.
    pub fn has_next(&mut self) -> Result<bool, EvalError> {
        if self.peeked.is_none() && !self.done {
            self.peeked = self.pump()?;
        }
        Ok(self.peeked.is_some())
    }

    /// Drain every remaining element. Raises `SequenceExhausted` when the
    /// sequence was already consumed by an earlier drain.
    pub fn collect_remaining(&mut self) -> Result<Vec<Value>, EvalError> {
        if self.done && self.peeked.is_none() {
            return Err(Self::exhausted());
        }
        let mut out = Vec::new();
        while self.has_next()? {
            out.push(self.next()?);
        }
        Ok(out)
    }

    fn exhausted() -> EvalError {
        EvalError::new(ErrorKind::SequenceExhausted, "sequence has no more elements")
    }
}
