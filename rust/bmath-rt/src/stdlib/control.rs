//! Control natives: process exit, error recovery, and printing.

use super::{callable_arg, expect_arity, expect_arity_range, int_arg, native};
use bmath_core::env::Env;
use bmath_core::values::Value;

pub fn register(env: &Env) {
    native(env, "exit", |args, _| {
        expect_arity_range("exit", &args, 0, 1)?;
        let code = if args.is_empty() {
            0
        } else {
            int_arg("exit", &args, 0)?
        };
        std::process::exit(code as i32);
    });

    // try_or(|| body, default) — the default replaces any runtime error.
    native(env, "try_or", |args, invoker| {
        expect_arity("try_or", &args, 2)?;
        let body = callable_arg("try_or", &args, 0)?;
        match invoker(body, Vec::new()) {
            Ok(value) => Ok(value),
            Err(_) => Ok(args[1].clone()),
        }
    });

    // try_catch(|| body, |errType| handler) — the handler receives the
    // error kind name as an Error value.
    native(env, "try_catch", |args, invoker| {
        expect_arity("try_catch", &args, 2)?;
        let body = callable_arg("try_catch", &args, 0)?;
        let handler = callable_arg("try_catch", &args, 1)?;
        match invoker(body, Vec::new()) {
            Ok(value) => Ok(value),
            Err(err) => invoker(handler, vec![Value::Error(err.kind.name().to_string())]),
        }
    });

    native(env, "print", |args, _| {
        expect_arity("print", &args, 1)?;
        println!("{}", args[0]);
        Ok(args[0].clone())
    });
}
