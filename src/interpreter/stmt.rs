use std::io::Write;

use crate::ast::*;
use crate::error::{Error, Result};
use crate::value::Value;

use super::Interpreter;
use super::expr::arith;

/// Result of executing a statement
pub enum StmtResult {
    Normal,
    Break,
    Continue,
    Return(Value),
}

impl<'a> Interpreter<'a> {
    pub fn execute_block<W: Write>(&mut self, block: &Block, output: &mut W) -> Result<StmtResult> {
        for stmt in &block.statements {
            match self.execute_stmt(stmt, output)? {
                StmtResult::Normal => continue,
                other => return Ok(other),
            }
        }
        Ok(StmtResult::Normal)
    }

    pub fn execute_stmt<W: Write>(&mut self, stmt: &Stmt, output: &mut W) -> Result<StmtResult> {
        match stmt {
            Stmt::Empty => Ok(StmtResult::Normal),

            Stmt::Expr(expr) => {
                self.eval_expr(expr, output)?;
                Ok(StmtResult::Normal)
            }

            Stmt::Assign {
                target, op, value, ..
            } => {
                self.execute_assign(target, *op, value, output)?;
                Ok(StmtResult::Normal)
            }

            Stmt::Print { args, .. } => {
                self.execute_print(args, output)?;
                Ok(StmtResult::Normal)
            }

            Stmt::If {
                condition,
                then_branch,
                else_branch,
                ..
            } => {
                let cond = self.eval_expr(condition, output)?;
                if self.truthy(&cond)? {
                    self.execute_block(then_branch, output)
                } else if let Some(else_stmt) = else_branch {
                    self.execute_stmt(else_stmt, output)
                } else {
                    Ok(StmtResult::Normal)
                }
            }

            Stmt::For {
                init,
                condition,
                update,
                body,
                ..
            } => {
                if let Some(init_stmt) = init {
                    self.execute_stmt(init_stmt, output)?;
                }

                loop {
                    if let Some(cond_expr) = condition {
                        let cond = self.eval_expr(cond_expr, output)?;
                        if !self.truthy(&cond)? {
                            break;
                        }
                    }

                    match self.execute_block(body, output)? {
                        StmtResult::Normal | StmtResult::Continue => {}
                        StmtResult::Break => break,
                        StmtResult::Return(v) => return Ok(StmtResult::Return(v)),
                    }

                    if let Some(update_stmt) = update {
                        self.execute_stmt(update_stmt, output)?;
                    }
                }
                Ok(StmtResult::Normal)
            }

            Stmt::ForIn {
                var, array, body, ..
            } => {
                for key in self.array_keys(array)? {
                    self.set_variable(var, crate::value::decode_key(&key));
                    match self.execute_block(body, output)? {
                        StmtResult::Normal | StmtResult::Continue => {}
                        StmtResult::Break => break,
                        StmtResult::Return(v) => return Ok(StmtResult::Return(v)),
                    }
                }
                Ok(StmtResult::Normal)
            }

            Stmt::Block(block) => self.execute_block(block, output),

            Stmt::Break { .. } => Ok(StmtResult::Break),

            Stmt::Continue { .. } => Ok(StmtResult::Continue),

            Stmt::Return { value, .. } => {
                let v = match value {
                    Some(expr) => self.eval_expr(expr, output)?,
                    None => Value::Undefined,
                };
                Ok(StmtResult::Return(v))
            }
        }
    }

    fn execute_assign<W: Write>(
        &mut self,
        target: &AssignTarget,
        op: AssignOp,
        value: &Expr,
        output: &mut W,
    ) -> Result<()> {
        let rhs = self.eval_expr(value, output)?;

        match target {
            AssignTarget::Name(name) => {
                let new = match binary_for(op) {
                    None => rhs,
                    Some(bin) => {
                        let current = self.get_variable(name);
                        arith(bin, &current, &rhs)?
                    }
                };
                self.set_variable(name, new);
            }
            AssignTarget::Index(name, index) => {
                let key = self.eval_expr(index, output)?.encode();
                let new = match binary_for(op) {
                    None => rhs,
                    Some(bin) => {
                        let current = self.get_index(name, &key)?;
                        arith(bin, &current, &rhs)?
                    }
                };
                self.set_index(name, key, new)?;
            }
        }
        Ok(())
    }

    fn execute_print<W: Write>(&mut self, args: &[Expr], output: &mut W) -> Result<()> {
        if args.is_empty() {
            writeln!(output, "{}", self.scanner.field(0)).map_err(Error::Io)?;
            return Ok(());
        }
        let mut parts = Vec::with_capacity(args.len());
        for arg in args {
            parts.push(self.eval_expr(arg, output)?.to_string());
        }
        writeln!(output, "{}", parts.join(" ")).map_err(Error::Io)?;
        Ok(())
    }
}

/// The arithmetic behind a compound assignment; plain `=` has none.
fn binary_for(op: AssignOp) -> Option<BinaryOp> {
    match op {
        AssignOp::Assign => None,
        AssignOp::Add => Some(BinaryOp::Add),
        AssignOp::Sub => Some(BinaryOp::Sub),
        AssignOp::Mul => Some(BinaryOp::Mul),
        AssignOp::Div => Some(BinaryOp::Div),
        AssignOp::Mod => Some(BinaryOp::Mod),
    }
}
