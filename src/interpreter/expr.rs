use std::collections::{BTreeMap, HashMap};
use std::io::Write;

use crate::ast::*;
use crate::error::{Error, Result};
use crate::value::{Value, compare_values, int_mod, values_equal};

use super::Interpreter;

impl<'a> Interpreter<'a> {
    pub fn eval_expr<W: Write>(&mut self, expr: &Expr, output: &mut W) -> Result<Value> {
        match expr {
            Expr::Number(n, _) => Ok(Value::Number(*n)),

            Expr::Str(s, _) => Ok(Value::from_string(s.clone())),

            Expr::Bool(b, _) => Ok(Value::Bool(*b)),

            Expr::ArrayLit(elems, _) => {
                let mut entries = BTreeMap::new();
                for (i, elem) in elems.iter().enumerate() {
                    let v = self.eval_expr(elem, output)?;
                    entries.insert(Value::Number(i as f64).encode(), v);
                }
                Ok(Value::Array(entries))
            }

            Expr::Var(name, _) => Ok(self.get_variable(name)),

            Expr::Field(index, _) => {
                let v = self.eval_expr(index, output)?;
                if !v.is_scalar() {
                    return Err(Error::runtime(
                        "attempting to access a field using a non-scalar value",
                    ));
                }
                let n = v.to_number();
                if n < 0.0 {
                    return Err(Error::runtime(
                        "attempting to access a field using a negative index",
                    ));
                }
                Ok(Value::from_string(self.scanner.field(n as usize)))
            }

            Expr::Index { array, index, .. } => {
                let key = self.eval_expr(index, output)?.encode();
                self.get_index(array, &key)
            }

            Expr::Binary {
                left, op, right, ..
            } => self.eval_binary(*op, left, right, output),

            Expr::Unary { op, operand, .. } => {
                let v = self.eval_expr(operand, output)?;
                match op {
                    UnaryOp::Neg => {
                        if !v.is_scalar() {
                            return Err(Error::runtime(format!(
                                "invalid operand for unary -: {}",
                                v.type_name()
                            )));
                        }
                        Ok(Value::Number(-v.to_number()))
                    }
                    UnaryOp::Not => {
                        let b = self.truthy(&v)?;
                        Ok(Value::Bool(!b))
                    }
                }
            }

            Expr::Ternary {
                condition,
                then_expr,
                else_expr,
                ..
            } => {
                let cond = self.eval_expr(condition, output)?;
                if self.truthy(&cond)? {
                    self.eval_expr(then_expr, output)
                } else {
                    self.eval_expr(else_expr, output)
                }
            }

            Expr::Call { name, args, .. } => self.call_function(name, args, output),

            Expr::Match {
                expr,
                pattern,
                negated,
                ..
            } => {
                let subject = self.eval_expr(expr, output)?;
                let pat = self.eval_expr(pattern, output)?;
                let (Value::Str(subject), Value::Str(pat)) = (&subject, &pat) else {
                    return Err(Error::runtime(format!(
                        "invalid types for regexp matching: {} ~ {}",
                        subject.type_name(),
                        pat.type_name()
                    )));
                };
                let matched = self.get_regex(pat)?.is_match(subject);
                Ok(Value::Bool(matched != *negated))
            }
        }
    }

    fn eval_binary<W: Write>(
        &mut self,
        op: BinaryOp,
        left: &Expr,
        right: &Expr,
        output: &mut W,
    ) -> Result<Value> {
        // Logical operators short-circuit.
        if matches!(op, BinaryOp::And | BinaryOp::Or) {
            let l = self.eval_expr(left, output)?;
            let l = self.truthy(&l)?;
            return match (op, l) {
                (BinaryOp::And, false) => Ok(Value::Bool(false)),
                (BinaryOp::Or, true) => Ok(Value::Bool(true)),
                _ => {
                    let r = self.eval_expr(right, output)?;
                    Ok(Value::Bool(self.truthy(&r)?))
                }
            };
        }

        let l = self.eval_expr(left, output)?;
        let r = self.eval_expr(right, output)?;

        match op {
            BinaryOp::Eq => Ok(Value::Bool(values_equal(&l, &r))),
            BinaryOp::Ne => Ok(Value::Bool(!values_equal(&l, &r))),

            BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => {
                let Some(ord) = compare_values(&l, &r) else {
                    return Err(Error::runtime(format!(
                        "cannot compare {} and {} using <, >, <=, or >=",
                        l.type_name(),
                        r.type_name()
                    )));
                };
                let b = match op {
                    BinaryOp::Lt => ord.is_lt(),
                    BinaryOp::Le => ord.is_le(),
                    BinaryOp::Gt => ord.is_gt(),
                    BinaryOp::Ge => ord.is_ge(),
                    _ => unreachable!(),
                };
                Ok(Value::Bool(b))
            }

            _ => arith(op, &l, &r),
        }
    }

    /// Boolean image of a condition; arrays have none.
    pub(crate) fn truthy(&self, v: &Value) -> Result<bool> {
        v.truthy()
            .ok_or_else(|| Error::runtime("non-scalar value used as a condition"))
    }

    /// Call a user-defined function or a builtin.
    pub(crate) fn call_function<W: Write>(
        &mut self,
        name: &str,
        args: &[Expr],
        output: &mut W,
    ) -> Result<Value> {
        let mut values = Vec::with_capacity(args.len());
        for arg in args {
            values.push(self.eval_expr(arg, output)?);
        }

        if let Some(func) = self.functions.get(name).copied() {
            if values.len() != func.params.len() {
                return Err(Error::runtime(format!(
                    "{name}: {} != {}: argument count mismatch",
                    func.params.len(),
                    values.len()
                )));
            }
            let mut scope = HashMap::new();
            for (param, value) in func.params.iter().zip(values) {
                scope.insert(param.clone(), value);
            }
            self.locals.push(scope);
            let result = self.execute_block(&func.body, output);
            self.locals.pop();
            return match result? {
                super::StmtResult::Return(v) => Ok(v),
                _ => Ok(Value::Undefined),
            };
        }

        if let Some(result) = self.call_builtin(name, &values) {
            return result;
        }

        Err(Error::runtime(format!("unknown function: {name}")))
    }
}

/// Arithmetic on scalar values. `op` must be one of the arithmetic
/// operators.
pub(crate) fn arith(op: BinaryOp, left: &Value, right: &Value) -> Result<Value> {
    if !left.is_scalar() || !right.is_scalar() {
        return Err(Error::runtime(format!(
            "invalid types for arithmetic: {} {} {}",
            left.type_name(),
            op.symbol(),
            right.type_name()
        )));
    }
    let (a, b) = (left.to_number(), right.to_number());
    let n = match op {
        BinaryOp::Add => a + b,
        BinaryOp::Sub => a - b,
        BinaryOp::Mul => a * b,
        BinaryOp::Div => a / b,
        BinaryOp::Mod => int_mod(a, b),
        _ => unreachable!("non-arithmetic operator"),
    };
    Ok(Value::Number(n))
}
