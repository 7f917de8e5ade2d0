//! Scalar math natives: roots, rounding, exponentials, trigonometry, and
//! the complex-number accessors. All of them delegate to [`Number`], which
//! owns the promotion and complex-domain rules.

use super::{expect_arity, expect_arity_range, native, number_arg};
use bmath_core::env::Env;
use bmath_core::values::Value;

pub fn register(env: &Env) {
    native(env, "sqrt", |args, _| {
        expect_arity("sqrt", &args, 1)?;
        Ok(Value::Number(number_arg("sqrt", &args, 0)?.sqrt()))
    });
    native(env, "abs", |args, _| {
        expect_arity("abs", &args, 1)?;
        Ok(Value::Number(number_arg("abs", &args, 0)?.abs()))
    });
    native(env, "floor", |args, _| {
        expect_arity("floor", &args, 1)?;
        Ok(Value::Number(number_arg("floor", &args, 0)?.floor()?))
    });
    native(env, "ceil", |args, _| {
        expect_arity("ceil", &args, 1)?;
        Ok(Value::Number(number_arg("ceil", &args, 0)?.ceil()?))
    });
    native(env, "round", |args, _| {
        expect_arity("round", &args, 1)?;
        Ok(Value::Number(number_arg("round", &args, 0)?.round()?))
    });
    native(env, "exp", |args, _| {
        expect_arity("exp", &args, 1)?;
        Ok(Value::Number(number_arg("exp", &args, 0)?.exp()))
    });
    native(env, "log", |args, _| {
        expect_arity_range("log", &args, 1, 2)?;
        let x = number_arg("log", &args, 0)?;
        if args.len() == 1 {
            return Ok(Value::Number(x.ln()));
        }
        let base = number_arg("log", &args, 1)?;
        Ok(Value::Number(x.log_base(base)?))
    });
    native(env, "pow", |args, _| {
        expect_arity("pow", &args, 2)?;
        let base = number_arg("pow", &args, 0)?;
        let exponent = number_arg("pow", &args, 1)?;
        Ok(Value::Number(base.pow(exponent)))
    });
    native(env, "re", |args, _| {
        expect_arity("re", &args, 1)?;
        Ok(Value::Number(number_arg("re", &args, 0)?.re()))
    });
    native(env, "im", |args, _| {
        expect_arity("im", &args, 1)?;
        Ok(Value::Number(number_arg("im", &args, 0)?.im()))
    });
    native(env, "sin", |args, _| {
        expect_arity("sin", &args, 1)?;
        Ok(Value::Number(number_arg("sin", &args, 0)?.sin()))
    });
    native(env, "cos", |args, _| {
        expect_arity("cos", &args, 1)?;
        Ok(Value::Number(number_arg("cos", &args, 0)?.cos()))
    });
    native(env, "tan", |args, _| {
        expect_arity("tan", &args, 1)?;
        Ok(Value::Number(number_arg("tan", &args, 0)?.tan()))
    });
    native(env, "cot", |args, _| {
        expect_arity("cot", &args, 1)?;
        Ok(Value::Number(number_arg("cot", &args, 0)?.cot()))
    });
    native(env, "sec", |args, _| {
        expect_arity("sec", &args, 1)?;
        Ok(Value::Number(number_arg("sec", &args, 0)?.sec()))
    });
    native(env, "csc", |args, _| {
        expect_arity("csc", &args, 1)?;
        Ok(Value::Number(number_arg("csc", &args, 0)?.csc()))
    });
    native(env, "asin", |args, _| {
        expect_arity("asin", &args, 1)?;
        Ok(Value::Number(number_arg("asin", &args, 0)?.asin()))
    });
    native(env, "acos", |args, _| {
        expect_arity("acos", &args, 1)?;
        Ok(Value::Number(number_arg("acos", &args, 0)?.acos()))
    });
    native(env, "atan", |args, _| {
        expect_arity("atan", &args, 1)?;
        Ok(Value::Number(number_arg("atan", &args, 0)?.atan()))
    });
    native(env, "sinh", |args, _| {
        expect_arity("sinh", &args, 1)?;
        Ok(Value::Number(number_arg("sinh", &args, 0)?.sinh()))
    });
    native(env, "cosh", |args, _| {
        expect_arity("cosh", &args, 1)?;
        Ok(Value::Number(number_arg("cosh", &args, 0)?.cosh()))
    });
    native(env, "tanh", |args, _| {
        expect_arity("tanh", &args, 1)?;
        Ok(Value::Number(number_arg("tanh", &args, 0)?.tanh()))
    });
}
