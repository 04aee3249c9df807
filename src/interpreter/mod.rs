mod builtins;
mod expr;
pub mod stmt;

use std::collections::{BTreeMap, HashMap};
use std::io::Write;

use regex::Regex;

use crate::ast::*;
use crate::error::{Error, Result};
use crate::scan::{Scanner, Source};
use crate::value::Value;

pub use stmt::StmtResult;

/// The hawk interpreter runtime
pub struct Interpreter<'a> {
    /// The parsed program
    program: &'a Program,

    /// User-defined functions by name
    functions: HashMap<String, &'a FuncDecl>,

    /// Global variables
    globals: HashMap<String, Value>,

    /// Call scopes; a function body sees only its own locals
    locals: Vec<HashMap<String, Value>>,

    /// Record and field scanner; the magic variables read through it
    scanner: Scanner,

    /// Compiled regex cache for the match operator
    regex_cache: HashMap<String, Regex>,
}

impl<'a> Interpreter<'a> {
    pub fn new(program: &'a Program) -> Self {
        let mut functions = HashMap::new();
        for func in &program.functions {
            functions.insert(func.name.clone(), func);
        }

        Self {
            program,
            functions,
            globals: HashMap::new(),
            locals: Vec::new(),
            scanner: Scanner::new(),
            regex_cache: HashMap::new(),
        }
    }

    /// Set the field separator before execution (the `-F` flag)
    pub fn set_field_sep(&mut self, fs: &str) {
        self.scanner.set_field_sep(fs);
    }

    /// Set the record separator before execution (the `-r` flag)
    pub fn set_row_sep(&mut self, rs: &str) {
        self.scanner.set_row_sep(rs);
    }

    /// Run the program over the given input.
    ///
    /// BEGIN rules always run. The input is scanned, and END rules run, only
    /// when the program has pattern-action or END rules at all.
    pub fn run<W: Write>(&mut self, input: Box<dyn Source>, output: &mut W) -> Result<()> {
        for rule in &self.program.rules {
            if matches!(rule.pattern, Some(Pattern::Begin))
                && let Some(action) = &rule.action
            {
                self.execute_block(action, output)?;
            }
        }

        if self.any_pattern_actions() {
            self.scanner.set_source(input);
            while self.scanner.scan() {
                self.run_record(output)?;
            }
            if let Some(err) = self.scanner.err() {
                return Err(Error::runtime(err.to_string()));
            }

            for rule in &self.program.rules {
                if matches!(rule.pattern, Some(Pattern::End))
                    && let Some(action) = &rule.action
                {
                    self.execute_block(action, output)?;
                }
            }
        }

        Ok(())
    }

    fn any_pattern_actions(&self) -> bool {
        self.program
            .rules
            .iter()
            .any(|r| !matches!(r.pattern, Some(Pattern::Begin)))
    }

    /// Run every matching pattern-action rule against the current record.
    fn run_record<W: Write>(&mut self, output: &mut W) -> Result<()> {
        for rule in &self.program.rules {
            match &rule.pattern {
                Some(Pattern::Begin) | Some(Pattern::End) => continue,
                Some(Pattern::Expr(expr)) => {
                    let v = self.eval_expr(expr, output)?;
                    let matched = v
                        .truthy()
                        .ok_or_else(|| Error::runtime("pattern in an action must be a scalar value"))?;
                    if !matched {
                        continue;
                    }
                }
                None => {}
            }
            match &rule.action {
                Some(action) => {
                    self.execute_block(action, output)?;
                }
                // A pattern with no action prints the record.
                None => writeln!(output, "{}", self.scanner.field(0)).map_err(Error::Io)?,
            }
        }
        Ok(())
    }

    /// Read a variable. Function bodies see only their locals; at the top
    /// level user globals shadow the magic variables, which are live reads
    /// of the scanner.
    pub(crate) fn get_variable(&self, name: &str) -> Value {
        if let Some(scope) = self.locals.last() {
            return scope.get(name).cloned().unwrap_or_default();
        }
        if let Some(v) = self.globals.get(name) {
            return v.clone();
        }
        match name {
            "NR" => Value::Number(self.scanner.record_number() as f64),
            "NF" => Value::Number(self.scanner.field_count() as f64),
            "FNR" => Value::Number(self.scanner.file_record_number() as f64),
            "FILENAME" => Value::from_string(self.scanner.filename()),
            _ => Value::Undefined,
        }
    }

    /// Write a variable. Assigning FS or RS at the top level reconfigures
    /// the scanner instead of storing a value.
    pub(crate) fn set_variable(&mut self, name: &str, value: Value) {
        if let Some(scope) = self.locals.last_mut() {
            scope.insert(name.to_string(), value);
            return;
        }
        match name {
            "FS" => self.scanner.set_field_sep(&value.to_string()),
            "RS" => self.scanner.set_row_sep(&value.to_string()),
            _ => {
                self.globals.insert(name.to_string(), value);
            }
        }
    }

    /// Read one subscript of an array variable without cloning the array.
    pub(crate) fn get_index(&self, array: &str, key: &str) -> Result<Value> {
        let slot = match self.locals.last() {
            Some(scope) => scope.get(array),
            None => self.globals.get(array),
        };
        match slot {
            None | Some(Value::Undefined) => Ok(Value::Undefined),
            Some(Value::Array(entries)) => Ok(entries.get(key).cloned().unwrap_or_default()),
            Some(_) => Err(Error::runtime("attempting to index a scalar value")),
        }
    }

    /// Store into one subscript, creating the array on first use.
    pub(crate) fn set_index(&mut self, array: &str, key: String, value: Value) -> Result<()> {
        let scope = match self.locals.last_mut() {
            Some(scope) => scope,
            None => &mut self.globals,
        };
        let slot = scope
            .entry(array.to_string())
            .or_insert_with(|| Value::Array(BTreeMap::new()));
        if matches!(slot, Value::Undefined) {
            *slot = Value::Array(BTreeMap::new());
        }
        match slot {
            Value::Array(entries) => {
                entries.insert(key, value);
                Ok(())
            }
            _ => Err(Error::runtime(
                "assigning to a scalar value using index expression",
            )),
        }
    }

    /// Keys of an array variable, in subscript order.
    pub(crate) fn array_keys(&self, array: &str) -> Result<Vec<String>> {
        let slot = match self.locals.last() {
            Some(scope) => scope.get(array),
            None => self.globals.get(array),
        };
        match slot {
            None | Some(Value::Undefined) => Ok(Vec::new()),
            Some(Value::Array(entries)) => Ok(entries.keys().cloned().collect()),
            Some(_) => Err(Error::runtime("attempting to range over a scalar value")),
        }
    }

    pub(crate) fn get_regex(&mut self, pattern: &str) -> Result<&Regex> {
        if !self.regex_cache.contains_key(pattern) {
            let regex = Regex::new(pattern).map_err(Error::Regex)?;
            self.regex_cache.insert(pattern.to_string(), regex);
        }
        Ok(self.regex_cache.get(pattern).unwrap())
    }
}
