use crate::error::{Error, Result};
use crate::value::Value;

use super::Interpreter;

impl<'a> Interpreter<'a> {
    /// Dispatch a builtin call. `None` means no builtin with that name.
    pub(crate) fn call_builtin(&mut self, name: &str, args: &[Value]) -> Option<Result<Value>> {
        let result = match name {
            "length" => builtin_length(args),
            "int" => math1("int", args, f64::trunc),
            "sqrt" => math1("sqrt", args, f64::sqrt),
            "exp" => math1("exp", args, f64::exp),
            "log" => math1("log", args, f64::ln),
            "sin" => math1("sin", args, f64::sin),
            "cos" => math1("cos", args, f64::cos),
            "atan2" => math2("atan2", args, f64::atan2),
            _ => return None,
        };
        Some(result)
    }
}

fn builtin_length(args: &[Value]) -> Result<Value> {
    check_arity("length", args, 1)?;
    // Arrays are allowed: their length is the number of entries.
    Ok(Value::Number(args[0].len() as f64))
}

fn math1(name: &str, args: &[Value], f: fn(f64) -> f64) -> Result<Value> {
    check_arity(name, args, 1)?;
    check_scalars(name, args)?;
    Ok(Value::Number(f(args[0].to_number())))
}

fn math2(name: &str, args: &[Value], f: fn(f64, f64) -> f64) -> Result<Value> {
    check_arity(name, args, 2)?;
    check_scalars(name, args)?;
    Ok(Value::Number(f(args[0].to_number(), args[1].to_number())))
}

fn check_arity(name: &str, args: &[Value], want: usize) -> Result<()> {
    if args.len() != want {
        return Err(Error::runtime(format!(
            "{name}: {want} != {}: argument count mismatch",
            args.len()
        )));
    }
    Ok(())
}

fn check_scalars(name: &str, args: &[Value]) -> Result<()> {
    if args.iter().any(|a| !a.is_scalar()) {
        return Err(Error::runtime(format!(
            "{name}: all arguments must be scalar values"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_length_of_string_and_array() {
        assert!(matches!(
            builtin_length(&[Value::from_string("hello")]),
            Ok(Value::Number(n)) if n == 5.0
        ));

        let mut entries = BTreeMap::new();
        entries.insert("0".to_string(), Value::Number(1.0));
        entries.insert("1".to_string(), Value::Number(2.0));
        assert!(matches!(
            builtin_length(&[Value::Array(entries)]),
            Ok(Value::Number(n)) if n == 2.0
        ));
    }

    #[test]
    fn test_arity_mismatch_message() {
        let err = math1("sin", &[Value::Number(1.0), Value::Number(2.0)], f64::sin)
            .unwrap_err()
            .to_string();
        assert!(err.contains("sin: 1 != 2: argument count mismatch"), "got {err}");
    }

    #[test]
    fn test_non_scalar_argument_message() {
        let err = math1("cos", &[Value::Array(BTreeMap::new())], f64::cos)
            .unwrap_err()
            .to_string();
        assert!(err.contains("cos: all arguments must be scalar values"), "got {err}");
    }
}
