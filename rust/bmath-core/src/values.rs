//! Runtime values.
//!
//! Values are cheap to clone: compound kinds hold `Rc` handles, so a
//! vector passed around the interpreter is one heap allocation shared by
//! every holder, and `set` mutates it in place through the `RefCell`.

use crate::ast::{Expr, Param};
use crate::env::Env;
use crate::error::EvalError;
use crate::number::Number;
use crate::sequence::Sequence;
use crate::types::{SimpleType, Type};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Callback handed to native functions so they can call back into the
/// interpreter with any function value, user-defined or native.
pub type Invoker = Rc<dyn Fn(&Value, Vec<Value>) -> Result<Value, EvalError>>;

pub type NativeImpl = fn(Vec<Value>, &Invoker) -> Result<Value, EvalError>;

/// A host function exposed in the global environment.
#[derive(Clone, Copy)]
pub struct NativeFn {
    pub name: &'static str,
    pub func: NativeImpl,
}

/// A user-defined function bundled with its defining environment.
/// Capture is by reference: assignments made after the definition are
/// visible inside the body, which is what makes plain recursion work.
pub struct Closure {
    pub params: Vec<Param>,
    pub body: Expr,
    pub env: Env,
    pub return_type: Type,
}

#[derive(Clone)]
pub enum Value {
    Number(Number),
    Bool(bool),
    Str(String),
    TypeVal(Type),
    Error(String),
    Vector(Rc<RefCell<Vec<Value>>>),
    Sequence(Rc<RefCell<Sequence>>),
    Function(Rc<Closure>),
    Native(NativeFn),
}

impl Value {
    pub fn vector(items: Vec<Value>) -> Self {
        Value::Vector(Rc::new(RefCell::new(items)))
    }

    pub fn sequence(seq: Sequence) -> Self {
        Value::Sequence(Rc::new(RefCell::new(seq)))
    }

    pub fn int(n: i64) -> Self {
        Value::Number(Number::Int(n))
    }

    pub fn real(f: f64) -> Self {
        Value::Number(Number::Real(f))
    }

    pub fn simple_type(&self) -> SimpleType {
        match self {
            Value::Number(n) => n.simple_type(),
            Value::Bool(_) => SimpleType::Boolean,
            Value::Str(_) => SimpleType::String,
            Value::TypeVal(_) => SimpleType::Type,
            Value::Error(_) => SimpleType::Error,
            Value::Vector(_) => SimpleType::Vector,
            Value::Sequence(_) => SimpleType::Sequence,
            Value::Function(_) | Value::Native(_) => SimpleType::Function,
        }
    }

    pub fn is_callable(&self) -> bool {
        matches!(
            self,
            Value::Function(_) | Value::Native(_) | Value::TypeVal(_)
        )
    }

    pub fn as_number(&self) -> Option<Number> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Structural equality. Numbers compare after promotion; vectors
    /// compare element-wise and only when lengths match; functions and
    /// sequences compare by identity. Any cross-kind comparison outside
    /// the numeric tower is `false`, never an error.
    pub fn equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a.equals(*b),
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::TypeVal(a), Value::TypeVal(b)) => a.identical(b),
            (Value::Error(a), Value::Error(b)) => a == b,
            (Value::Vector(a), Value::Vector(b)) => {
                if Rc::ptr_eq(a, b) {
                    return true;
                }
                let a = a.borrow();
                let b = b.borrow();
                a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x.equals(y))
            }
            (Value::Sequence(a), Value::Sequence(b)) => Rc::ptr_eq(a, b),
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            (Value::Native(a), Value::Native(b)) => a.name == b.name,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Str(s) => write!(f, "{}", s),
            Value::TypeVal(t) => write!(f, "{}", t),
            Value::Error(kind) => write!(f, "{}", kind),
            Value::Vector(items) => {
                write!(f, "[")?;
                for (i, item) in items.borrow().iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Sequence(_) => write!(f, "seq(...)"),
            Value::Function(c) => {
                write!(f, "|")?;
                for (i, p) in c.params.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", p.name)?;
                }
                write!(f, "| -> {}", c.return_type)
            }
            Value::Native(n) => write!(f, "builtin({})", n.name),
        }
    }
}

// Closures and generators have no structural debug form; render values
// the same way the REPL prints them.
impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// A top-level evaluation result; the label is the bound name when the
/// expression was an assignment.
#[derive(Debug, Clone)]
pub struct LabeledValue {
    pub label: String,
    pub value: Value,
}

impl LabeledValue {
    pub fn unlabeled(value: Value) -> Self {
        Self {
            label: String::new(),
            value,
        }
    }

    pub fn labeled(label: impl Into<String>, value: Value) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

impl fmt::Display for LabeledValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.label.is_empty() {
            write!(f, "{}", self.value)
        } else {
            write!(f, "{} = {}", self.label, self.value)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbers_compare_across_kinds() {
        assert!(Value::int(3).equals(&Value::real(3.0)));
        assert!(!Value::int(3).equals(&Value::Bool(true)));
    }

    #[test]
    fn test_vector_equality_is_elementwise() {
        let a = Value::vector(vec![Value::int(1), Value::int(2)]);
        let b = Value::vector(vec![Value::int(1), Value::real(2.0)]);
        let c = Value::vector(vec![Value::int(1)]);
        assert!(a.equals(&b));
        assert!(!a.equals(&c));
        // A vector never equals a non-vector; it does not raise.
        assert!(!a.equals(&Value::int(1)));
    }

    #[test]
    fn test_display() {
        let v = Value::vector(vec![Value::int(1), Value::int(99), Value::int(3)]);
        assert_eq!(v.to_string(), "[1, 99, 3]");
        assert_eq!(Value::Bool(true).to_string(), "true");
        assert_eq!(Value::TypeVal(Type::any()).to_string(), "Any");
    }
}
