//! Lexical environments.
//!
//! An environment is one scope frame with an optional parent; lookup
//! walks the chain upward. The root frame holds the standard library and
//! is never written after initialization — every name bound there is
//! reserved, and only a `local` binding in an inner frame may shadow it.

use crate::error::{ErrorKind, EvalError};
use crate::values::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

pub type Env = Rc<RefCell<Environment>>;

pub struct Environment {
    vars: HashMap<String, Value>,
    parent: Option<Env>,
    is_root: bool,
}

impl Environment {
    /// The stdlib frame; populated once by the runtime, read-only after.
    pub fn root() -> Env {
        Rc::new(RefCell::new(Self {
            vars: HashMap::new(),
            parent: None,
            is_root: true,
        }))
    }

    pub fn child(parent: &Env) -> Env {
        Rc::new(RefCell::new(Self {
            vars: HashMap::new(),
            parent: Some(parent.clone()),
            is_root: false,
        }))
    }

    /// Bind directly in this frame, without the reserved-name check.
    /// Used for stdlib loading and parameter binding.
    pub fn define(env: &Env, name: impl Into<String>, value: Value) {
        env.borrow_mut().vars.insert(name.into(), value);
    }

    pub fn lookup(env: &Env, name: &str) -> Option<Value> {
        let frame = env.borrow();
        if let Some(value) = frame.vars.get(name) {
            return Some(value.clone());
        }
        match &frame.parent {
            Some(parent) => Self::lookup(parent, name),
            None => None,
        }
    }

    /// Assignment semantics: `local` always binds in the current frame;
    /// otherwise the nearest existing binding is updated, falling back to
    /// a fresh binding in the current frame. Updating a name owned by the
    /// root frame is refused.
    pub fn assign(
        env: &Env,
        name: &str,
        value: Value,
        is_local: bool,
    ) -> Result<(), EvalError> {
        if is_local {
            env.borrow_mut().vars.insert(name.to_string(), value);
            return Ok(());
        }
        let mut frame = env.clone();
        loop {
            let found = frame.borrow().vars.contains_key(name);
            if found {
                if frame.borrow().is_root {
                    return Err(EvalError::new(
                        ErrorKind::ReservedName,
                        format!(
                            "'{name}' is a reserved name; shadow it with 'local {name} = ...'"
                        ),
                    ));
                }
                frame.borrow_mut().vars.insert(name.to_string(), value);
                return Ok(());
            }
            let parent = frame.borrow().parent.clone();
            match parent {
                Some(p) => frame = p,
                None => break,
            }
        }
        env.borrow_mut().vars.insert(name.to_string(), value);
        Ok(())
    }

    /// Names bound in the user-visible frames (everything above the root),
    /// nearest frame first. Shadowed names appear once.
    pub fn user_bindings(env: &Env) -> Vec<(String, Value)> {
        let mut seen = HashMap::new();
        let mut order = Vec::new();
        let mut frame = env.clone();
        loop {
            {
                let borrowed = frame.borrow();
                if borrowed.is_root {
                    break;
                }
                for (name, value) in &borrowed.vars {
                    if seen.insert(name.clone(), ()).is_none() {
                        order.push((name.clone(), value.clone()));
                    }
                }
            }
            let parent = frame.borrow().parent.clone();
            match parent {
                Some(p) => frame = p,
                None => break,
            }
        }
        order.sort_by(|a, b| a.0.cmp(&b.0));
        order
    }
}
