//! Tree-walking interpreter.
//!
//! Evaluation is strict, left-to-right, depth-first. Every unwinding error
//! gets the current expression's position pushed onto its stack, so the
//! driver receives an innermost-first positional trace. The walker itself
//! is stateless — all mutability lives in the environment chain — which is
//! what lets native functions hold a `'static` callback into it.

use bmath_core::ast::{BinOp, BinaryExpr, Expr, ExprKind};
use bmath_core::env::{Env, Environment};
use bmath_core::error::{ErrorKind, EvalError};
use bmath_core::number::Number;
use bmath_core::sequence::Sequence;
use bmath_core::types::{SimpleType, Type};
use bmath_core::values::{Closure, Invoker, LabeledValue, Value};
use std::rc::Rc;

use crate::stdlib;
use crate::stdlib::sequence::VectorGenerator;

/// Owns the user-global frame; the root frame underneath holds the stdlib
/// and is shared read-only.
pub struct Interpreter {
    globals: Env,
}

impl Interpreter {
    pub fn new() -> Self {
        let root = stdlib::global_env();
        Self {
            globals: Environment::child(&root),
        }
    }

    pub fn globals(&self) -> &Env {
        &self.globals
    }

    /// Evaluate a top-level expression. The label is the bound name when
    /// the expression is an assignment, empty otherwise.
    pub fn eval(&self, expr: &Expr) -> Result<LabeledValue, EvalError> {
        self.eval_in(expr, &self.globals)
    }

    /// Evaluate against an injected environment (used by tools and tests).
    pub fn eval_in(&self, expr: &Expr, env: &Env) -> Result<LabeledValue, EvalError> {
        let value = eval_expr(expr, env)?;
        let label = match &expr.kind {
            ExprKind::Assign(assign) => assign.name.clone(),
            _ => String::new(),
        };
        Ok(LabeledValue { label, value })
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

/// Evaluate an expression, recording its position on any unwinding error.
pub fn eval_expr(expr: &Expr, env: &Env) -> Result<Value, EvalError> {
    eval_inner(expr, env).map_err(|mut err| {
        err.push_position(expr.position);
        err
    })
}

fn eval_inner(expr: &Expr, env: &Env) -> Result<Value, EvalError> {
    match &expr.kind {
        ExprKind::Number(n) => Ok(Value::Number(*n)),
        ExprKind::Bool(b) => Ok(Value::Bool(*b)),
        ExprKind::TypeLit(ty) => Ok(Value::TypeVal(ty.clone())),
        ExprKind::Group(inner) => eval_expr(inner, env),
        ExprKind::Neg(operand) => match eval_expr(operand, env)? {
            Value::Number(n) => Ok(Value::Number(n.neg())),
            other => Err(EvalError::new(
                ErrorKind::UnsupportedType,
                format!("cannot negate a {}", other.simple_type().name()),
            )),
        },
        ExprKind::Not(operand) => match eval_expr(operand, env)? {
            Value::Bool(b) => Ok(Value::Bool(!b)),
            other => Err(EvalError::new(
                ErrorKind::UnsupportedType,
                format!("'!' needs a Boolean, got {}", other.simple_type().name()),
            )),
        },
        ExprKind::Binary(binary) => eval_binary(binary, env),
        ExprKind::Vector(items) => {
            let values = items
                .iter()
                .map(|item| eval_expr(item, env))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Value::vector(values))
        }
        ExprKind::Ident(name) => Environment::lookup(env, name).ok_or_else(|| {
            EvalError::new(
                ErrorKind::UndefinedVariable,
                format!("undefined variable '{}'", name),
            )
        }),
        ExprKind::Assign(assign) => {
            let value = eval_expr(&assign.value, env)?;
            Environment::assign(env, &assign.name, value.clone(), assign.is_local)?;
            Ok(value)
        }
        ExprKind::Block(exprs) => {
            let frame = Environment::child(env);
            let mut last = Value::Bool(false);
            for e in exprs {
                last = eval_expr(e, &frame)?;
            }
            Ok(last)
        }
        ExprKind::FuncDef(def) => Ok(Value::Function(Rc::new(Closure {
            params: def.params.clone(),
            body: (*def.body).clone(),
            env: env.clone(),
            return_type: def.return_type.clone(),
        }))),
        ExprKind::FuncCall(call) => {
            let callee = eval_expr(&call.callee, env)?;
            let args = call
                .args
                .iter()
                .map(|arg| eval_expr(arg, env))
                .collect::<Result<Vec<_>, _>>()?;
            call_value(&callee, args)
        }
        ExprKind::If(if_expr) => {
            for branch in &if_expr.branches {
                match eval_expr(&branch.cond, env)? {
                    Value::Bool(true) => return eval_expr(&branch.then, env),
                    Value::Bool(false) => {}
                    other => {
                        return Err(EvalError::new(
                            ErrorKind::UnsupportedType,
                            format!(
                                "condition must be Boolean, got {}",
                                other.simple_type().name()
                            ),
                        ))
                    }
                }
            }
            eval_expr(&if_expr.else_branch, env)
        }
    }
}

fn eval_binary(binary: &BinaryExpr, env: &Env) -> Result<Value, EvalError> {
    match binary.op {
        // Logical operators short-circuit and demand Booleans on both the
        // sides they evaluate.
        BinOp::And => match eval_expr(&binary.left, env)? {
            Value::Bool(false) => Ok(Value::Bool(false)),
            Value::Bool(true) => expect_bool(eval_expr(&binary.right, env)?, "&"),
            other => logical_type_error(other, "&"),
        },
        BinOp::Or => match eval_expr(&binary.left, env)? {
            Value::Bool(true) => Ok(Value::Bool(true)),
            Value::Bool(false) => expect_bool(eval_expr(&binary.right, env)?, "|"),
            other => logical_type_error(other, "|"),
        },
        BinOp::Is => {
            let value = eval_expr(&binary.left, env)?;
            match eval_expr(&binary.right, env)? {
                Value::TypeVal(ty) => Ok(Value::Bool(ty.accepts(value.simple_type()))),
                other => Err(EvalError::new(
                    ErrorKind::UnsupportedType,
                    format!(
                        "the right side of 'is' must be a type, got {}",
                        other.simple_type().name()
                    ),
                )),
            }
        }
        op => {
            let left = eval_expr(&binary.left, env)?;
            let right = eval_expr(&binary.right, env)?;
            stdlib::arith::binary_op(op, left, right)
        }
    }
}

fn expect_bool(value: Value, op: &str) -> Result<Value, EvalError> {
    match value {
        Value::Bool(b) => Ok(Value::Bool(b)),
        other => logical_type_error(other, op),
    }
}

fn logical_type_error(value: Value, op: &str) -> Result<Value, EvalError> {
    Err(EvalError::new(
        ErrorKind::UnsupportedType,
        format!(
            "'{}' needs Boolean operands, got {}",
            op,
            value.simple_type().name()
        ),
    ))
}

/// Call any callable value: a user closure, a native function, or a type
/// (which casts its single argument). This is also the body of the
/// [`Invoker`] handed to natives.
pub fn call_value(callee: &Value, args: Vec<Value>) -> Result<Value, EvalError> {
    match callee {
        Value::TypeVal(ty) => {
            if args.len() != 1 {
                return Err(EvalError::new(
                    ErrorKind::InvalidArgument,
                    format!("a cast to {} takes exactly one argument", ty),
                ));
            }
            cast(ty, args.into_iter().next().unwrap())
        }
        Value::Native(native) => (native.func)(args, &invoker()),
        Value::Function(closure) => {
            if args.len() != closure.params.len() {
                return Err(EvalError::new(
                    ErrorKind::InvalidArgument,
                    format!(
                        "function takes {} argument(s), got {}",
                        closure.params.len(),
                        args.len()
                    ),
                ));
            }
            // The call frame parents at the closure's captured environment,
            // not the caller's.
            let frame = Environment::child(&closure.env);
            for (param, arg) in closure.params.iter().zip(args) {
                if !param.ty.accepts(arg.simple_type()) {
                    return Err(EvalError::new(
                        ErrorKind::InvalidArgument,
                        format!(
                            "parameter '{}' expects {}, got {}",
                            param.name,
                            param.ty,
                            arg.simple_type().name()
                        ),
                    ));
                }
                Environment::define(&frame, param.name.clone(), arg);
            }
            let result = eval_expr(&closure.body, &frame)?;
            if !closure.return_type.accepts(result.simple_type()) {
                return Err(EvalError::new(
                    ErrorKind::UnsupportedType,
                    format!(
                        "function declared to return {}, got {}",
                        closure.return_type,
                        result.simple_type().name()
                    ),
                ));
            }
            Ok(result)
        }
        other => Err(EvalError::new(
            ErrorKind::UnsupportedType,
            format!(
                "a value of type {} is not callable",
                other.simple_type().name()
            ),
        )),
    }
}

/// The callback natives use to re-enter the interpreter.
pub fn invoker() -> Invoker {
    Rc::new(|callee, args| call_value(callee, args))
}

/// Cast dispatch for a called `Type` value.
fn cast(target: &Type, value: Value) -> Result<Value, EvalError> {
    let Type::Simple(simple) = target else {
        return Err(EvalError::new(
            ErrorKind::InvalidArgument,
            format!("cannot cast to {}", target),
        ));
    };
    let cast_error = |value: &Value| {
        EvalError::new(
            ErrorKind::InvalidArgument,
            format!(
                "cannot cast {} to {}",
                value.simple_type().name(),
                simple.name()
            ),
        )
    };
    match simple {
        SimpleType::Real => match value {
            Value::Number(Number::Int(n)) => Ok(Value::real(n as f64)),
            Value::Number(Number::Real(f)) => Ok(Value::real(f)),
            // A Complex with zero imaginary part cannot exist (it is
            // normalized to Real at construction), so any Complex fails.
            other => Err(cast_error(&other)),
        },
        SimpleType::Integer => match value {
            Value::Number(Number::Int(n)) => Ok(Value::int(n)),
            // Truncation toward zero, not rounding.
            Value::Number(Number::Real(f)) => Ok(Value::int(f.trunc() as i64)),
            other => Err(cast_error(&other)),
        },
        SimpleType::Complex => match value {
            Value::Number(Number::Int(n)) => {
                Ok(Value::Number(Number::complex(n as f64, 0.0)))
            }
            Value::Number(Number::Real(f)) => Ok(Value::Number(Number::complex(f, 0.0))),
            Value::Number(c @ Number::Complex(_)) => Ok(Value::Number(c)),
            other => Err(cast_error(&other)),
        },
        SimpleType::Sequence => match value {
            Value::Sequence(_) => Ok(value),
            Value::Vector(items) => {
                let snapshot = items.borrow().clone();
                Ok(Value::sequence(Sequence::new(Box::new(
                    VectorGenerator::new(snapshot),
                ))))
            }
            other => Err(cast_error(&other)),
        },
        SimpleType::Vector => match value {
            Value::Vector(_) => Ok(value),
            Value::Sequence(seq) => {
                let items = seq.borrow_mut().collect_remaining()?;
                Ok(Value::vector(items))
            }
            other => Err(cast_error(&other)),
        },
        SimpleType::Boolean => match value {
            Value::Bool(_) => Ok(value),
            other => Err(cast_error(&other)),
        },
        SimpleType::Function => match value {
            Value::Function(_) | Value::Native(_) => Ok(value),
            other => Err(cast_error(&other)),
        },
        SimpleType::Type => Ok(Value::TypeVal(Type::Simple(value.simple_type()))),
        SimpleType::String | SimpleType::Error => Err(cast_error(&value)),
    }
}
