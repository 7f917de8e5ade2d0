//! Operator dispatch for the binary operators, including the element-wise
//! vector rules: a Vector paired with a scalar applies the operation per
//! element; Vector with Vector of equal length is element-wise for `+` and
//! `-`, and the dot product for `*`.

use bmath_core::ast::BinOp;
use bmath_core::error::{ErrorKind, EvalError};
use bmath_core::number::Number;
use bmath_core::values::Value;

pub fn binary_op(op: BinOp, left: Value, right: Value) -> Result<Value, EvalError> {
    match op {
        BinOp::Add => add(left, right),
        BinOp::Sub => sub(left, right),
        BinOp::Mul => mul(left, right),
        BinOp::Div => scalar_pairing(left, right, "/", Number::div),
        BinOp::Mod => scalar_pairing(left, right, "%", Number::rem),
        BinOp::Pow => scalar_pairing(left, right, "^", |a, b| Ok(a.pow(b))),
        BinOp::Eq => Ok(Value::Bool(left.equals(&right))),
        BinOp::Ne => Ok(Value::Bool(!left.equals(&right))),
        BinOp::Lt => order(left, right, "<", |o| o.is_lt()),
        BinOp::Le => order(left, right, "<=", |o| o.is_le()),
        BinOp::Gt => order(left, right, ">", |o| o.is_gt()),
        BinOp::Ge => order(left, right, ">=", |o| o.is_ge()),
        // Short-circuiting and type tests never reach the value layer.
        BinOp::And | BinOp::Or | BinOp::Is => unreachable!("handled by the interpreter"),
    }
}

pub fn add(left: Value, right: Value) -> Result<Value, EvalError> {
    match (&left, &right) {
        (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a.add(*b))),
        (Value::Vector(u), Value::Vector(v)) => zip_elementwise(u, v, "+", add),
        (Value::Vector(_), Value::Number(_)) | (Value::Number(_), Value::Vector(_)) => {
            broadcast(left, right, add)
        }
        _ => Err(type_error("+", &left, &right)),
    }
}

pub fn sub(left: Value, right: Value) -> Result<Value, EvalError> {
    match (&left, &right) {
        (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a.sub(*b))),
        (Value::Vector(u), Value::Vector(v)) => zip_elementwise(u, v, "-", sub),
        (Value::Vector(_), Value::Number(_)) | (Value::Number(_), Value::Vector(_)) => {
            broadcast(left, right, sub)
        }
        _ => Err(type_error("-", &left, &right)),
    }
}

pub fn mul(left: Value, right: Value) -> Result<Value, EvalError> {
    match (&left, &right) {
        (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a.mul(*b))),
        (Value::Vector(u), Value::Vector(v)) => dot_product(&u.borrow(), &v.borrow()),
        (Value::Vector(_), Value::Number(_)) | (Value::Number(_), Value::Vector(_)) => {
            broadcast(left, right, mul)
        }
        _ => Err(type_error("*", &left, &right)),
    }
}

/// Division, modulo, and power pair a vector with a scalar element-wise
/// but have no vector-vector form.
fn scalar_pairing(
    left: Value,
    right: Value,
    op: &'static str,
    apply: fn(Number, Number) -> Result<Number, EvalError>,
) -> Result<Value, EvalError> {
    match (&left, &right) {
        (Value::Number(a), Value::Number(b)) => Ok(Value::Number(apply(*a, *b)?)),
        (Value::Vector(items), Value::Number(b)) => {
            let out = items
                .borrow()
                .iter()
                .map(|item| scalar_pairing(item.clone(), Value::Number(*b), op, apply))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Value::vector(out))
        }
        (Value::Number(a), Value::Vector(items)) => {
            let out = items
                .borrow()
                .iter()
                .map(|item| scalar_pairing(Value::Number(*a), item.clone(), op, apply))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Value::vector(out))
        }
        _ => Err(type_error(op, &left, &right)),
    }
}

fn order(
    left: Value,
    right: Value,
    op: &'static str,
    test: fn(std::cmp::Ordering) -> bool,
) -> Result<Value, EvalError> {
    match (&left, &right) {
        (Value::Number(a), Value::Number(b)) => Ok(Value::Bool(test(a.compare(*b)?))),
        _ => Err(type_error(op, &left, &right)),
    }
}

fn broadcast(
    left: Value,
    right: Value,
    apply: fn(Value, Value) -> Result<Value, EvalError>,
) -> Result<Value, EvalError> {
    match (&left, &right) {
        (Value::Vector(items), scalar @ Value::Number(_)) => {
            let out = items
                .borrow()
                .iter()
                .map(|item| apply(item.clone(), scalar.clone()))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Value::vector(out))
        }
        (scalar @ Value::Number(_), Value::Vector(items)) => {
            let out = items
                .borrow()
                .iter()
                .map(|item| apply(scalar.clone(), item.clone()))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Value::vector(out))
        }
        _ => unreachable!("broadcast called without a vector/scalar pair"),
    }
}

fn zip_elementwise(
    u: &std::rc::Rc<std::cell::RefCell<Vec<Value>>>,
    v: &std::rc::Rc<std::cell::RefCell<Vec<Value>>>,
    op: &'static str,
    apply: fn(Value, Value) -> Result<Value, EvalError>,
) -> Result<Value, EvalError> {
    let u = u.borrow();
    let v = v.borrow();
    if u.len() != v.len() {
        return Err(EvalError::new(
            ErrorKind::InvalidArgument,
            format!(
                "'{}' needs vectors of equal length, got {} and {}",
                op,
                u.len(),
                v.len()
            ),
        ));
    }
    let out = u
        .iter()
        .zip(v.iter())
        .map(|(a, b)| apply(a.clone(), b.clone()))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Value::vector(out))
}

pub fn dot_product(u: &[Value], v: &[Value]) -> Result<Value, EvalError> {
    if u.len() != v.len() {
        return Err(EvalError::new(
            ErrorKind::InvalidArgument,
            format!(
                "dot product needs vectors of equal length, got {} and {}",
                u.len(),
                v.len()
            ),
        ));
    }
    let mut acc = Value::int(0);
    for (a, b) in u.iter().zip(v.iter()) {
        acc = add(acc, mul(a.clone(), b.clone())?)?;
    }
    Ok(acc)
}

fn type_error(op: &str, left: &Value, right: &Value) -> EvalError {
    EvalError::new(
        ErrorKind::UnsupportedType,
        format!(
            "'{}' is not defined for {} and {}",
            op,
            left.simple_type().name(),
            right.simple_type().name()
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vec3(a: i64, b: i64, c: i64) -> Value {
        Value::vector(vec![Value::int(a), Value::int(b), Value::int(c)])
    }

    #[test]
    fn test_vector_plus_vector_is_elementwise() {
        let r = add(vec3(1, 2, 3), vec3(10, 20, 30)).unwrap();
        assert!(r.equals(&vec3(11, 22, 33)));
    }

    #[test]
    fn test_vector_times_vector_is_dot_product() {
        let r = mul(vec3(1, 2, 3), vec3(4, 5, 6)).unwrap();
        assert!(r.equals(&Value::int(32)));
    }

    #[test]
    fn test_vector_scalar_broadcast() {
        let r = mul(vec3(1, 2, 3), Value::int(2)).unwrap();
        assert!(r.equals(&vec3(2, 4, 6)));
        let r = add(Value::int(1), vec3(1, 2, 3)).unwrap();
        assert!(r.equals(&vec3(2, 3, 4)));
    }

    #[test]
    fn test_length_mismatch() {
        let err = add(vec3(1, 2, 3), Value::vector(vec![Value::int(1)])).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_vector_division_by_vector_is_unsupported() {
        let err = binary_op(BinOp::Div, vec3(1, 2, 3), vec3(1, 2, 3)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnsupportedType);
    }

    #[test]
    fn test_equality_between_kinds_is_false_not_an_error() {
        let r = binary_op(BinOp::Eq, vec3(1, 2, 3), Value::int(1)).unwrap();
        assert!(matches!(r, Value::Bool(false)));
    }

    #[test]
    fn test_order_comparison_needs_numbers() {
        let err = binary_op(BinOp::Lt, Value::Bool(true), Value::int(1)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnsupportedType);
    }

    #[test]
    fn test_complex_order_comparison_raises() {
        let c = Value::Number(Number::complex(0.0, 1.0));
        let err = binary_op(BinOp::Lt, c, Value::int(1)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::ComplexComparison);
    }
}
