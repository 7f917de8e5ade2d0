//! Vector natives. Vectors are fixed-length heap arrays shared by handle;
//! `set` is the single mutating entry point and returns the element it
//! replaced.

use super::{arith, expect_arity, expect_arity_range, index_arg, int_arg, native, vector_arg};
use bmath_core::env::Env;
use bmath_core::error::{ErrorKind, EvalError};
use bmath_core::values::Value;

pub fn register(env: &Env) {
    native(env, "vec", |args, invoker| {
        expect_arity("vec", &args, 2)?;
        let n = int_arg("vec", &args, 0)?;
        let n = usize::try_from(n).map_err(|_| {
            EvalError::new(ErrorKind::InvalidArgument, "vec: length must not be negative")
        })?;
        let mut items = Vec::with_capacity(n);
        match &args[1] {
            // A function of one parameter builds [f(0), f(1), ...].
            f @ (Value::Function(_) | Value::Native(_)) => {
                for i in 0..n {
                    items.push(invoker(f, vec![Value::int(i as i64)])?);
                }
            }
            value => {
                for _ in 0..n {
                    items.push(value.clone());
                }
            }
        }
        Ok(Value::vector(items))
    });

    native(env, "dot", |args, _| {
        expect_arity("dot", &args, 2)?;
        let u = vector_arg("dot", &args, 0)?.borrow().clone();
        let v = vector_arg("dot", &args, 1)?.borrow().clone();
        arith::dot_product(&u, &v)
    });

    native(env, "first", |args, _| {
        expect_arity("first", &args, 1)?;
        let items = vector_arg("first", &args, 0)?.borrow();
        items.first().cloned().ok_or_else(|| {
            EvalError::new(ErrorKind::InvalidArgument, "first: the vector is empty")
        })
    });

    native(env, "last", |args, _| {
        expect_arity("last", &args, 1)?;
        let items = vector_arg("last", &args, 0)?.borrow();
        items.last().cloned().ok_or_else(|| {
            EvalError::new(ErrorKind::InvalidArgument, "last: the vector is empty")
        })
    });

    native(env, "len", |args, _| {
        expect_arity("len", &args, 1)?;
        let items = vector_arg("len", &args, 0)?.borrow();
        Ok(Value::int(items.len() as i64))
    });

    native(env, "nth", nth);
    native(env, "at", nth);

    native(env, "merge", |args, _| {
        expect_arity("merge", &args, 2)?;
        let mut items = vector_arg("merge", &args, 0)?.borrow().clone();
        items.extend(vector_arg("merge", &args, 1)?.borrow().iter().cloned());
        Ok(Value::vector(items))
    });

    native(env, "slice", |args, _| {
        expect_arity_range("slice", &args, 2, 3)?;
        let items = vector_arg("slice", &args, 0)?.borrow();
        let (start, end) = if args.len() == 2 {
            (0, index_arg("slice", &args, 1)?)
        } else {
            (index_arg("slice", &args, 1)?, index_arg("slice", &args, 2)?)
        };
        if start > end || end > items.len() {
            return Err(EvalError::new(
                ErrorKind::InvalidArgument,
                format!(
                    "slice: range {}..{} is out of bounds for length {}",
                    start,
                    end,
                    items.len()
                ),
            ));
        }
        Ok(Value::vector(items[start..end].to_vec()))
    });

    native(env, "set", |args, _| {
        expect_arity("set", &args, 3)?;
        let items = vector_arg("set", &args, 0)?;
        let index = index_arg("set", &args, 1)?;
        let mut items = items.borrow_mut();
        if index >= items.len() {
            return Err(out_of_bounds("set", index, items.len()));
        }
        let previous = std::mem::replace(&mut items[index], args[2].clone());
        Ok(previous)
    });
}

fn nth(args: Vec<Value>, _: &bmath_core::values::Invoker) -> Result<Value, EvalError> {
    expect_arity("nth", &args, 2)?;
    let items = vector_arg("nth", &args, 0)?.borrow();
    let index = index_arg("nth", &args, 1)?;
    items
        .get(index)
        .cloned()
        .ok_or_else(|| out_of_bounds("nth", index, items.len()))
}

fn out_of_bounds(name: &str, index: usize, len: usize) -> EvalError {
    EvalError::new(
        ErrorKind::InvalidArgument,
        format!("{}: index {} is out of bounds for length {}", name, index, len),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::call_value;
    use bmath_core::env::Environment;

    fn call(name: &str, args: Vec<Value>) -> Result<Value, EvalError> {
        let env = Environment::root();
        register(&env);
        let f = Environment::lookup(&env, name).unwrap();
        call_value(&f, args)
    }

    fn vec123() -> Value {
        Value::vector(vec![Value::int(1), Value::int(2), Value::int(3)])
    }

    #[test]
    fn test_vec_constant() {
        let r = call("vec", vec![Value::int(3), Value::int(7)]).unwrap();
        assert!(r.equals(&Value::vector(vec![
            Value::int(7),
            Value::int(7),
            Value::int(7)
        ])));
    }

    #[test]
    fn test_set_mutates_and_returns_previous() {
        let v = vec123();
        let previous = call("set", vec![v.clone(), Value::int(1), Value::int(99)]).unwrap();
        assert!(previous.equals(&Value::int(2)));
        assert!(v.equals(&Value::vector(vec![
            Value::int(1),
            Value::int(99),
            Value::int(3)
        ])));
    }

    #[test]
    fn test_slice_forms() {
        let r = call("slice", vec![vec123(), Value::int(2)]).unwrap();
        assert!(r.equals(&Value::vector(vec![Value::int(1), Value::int(2)])));
        let r = call("slice", vec![vec123(), Value::int(1), Value::int(3)]).unwrap();
        assert!(r.equals(&Value::vector(vec![Value::int(2), Value::int(3)])));
        let err = call("slice", vec![vec123(), Value::int(5)]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_nth_bounds() {
        assert!(call("nth", vec![vec123(), Value::int(0)])
            .unwrap()
            .equals(&Value::int(1)));
        let err = call("nth", vec![vec123(), Value::int(3)]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_merge() {
        let r = call("merge", vec![vec123(), vec123()]).unwrap();
        match &r {
            Value::Vector(items) => assert_eq!(items.borrow().len(), 6),
            other => panic!("expected vector, got {:?}", other),
        }
    }
}
