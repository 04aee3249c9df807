//! hawk - an AWK-family stream processor
//!
//! hawk reads a concatenation of named byte sources, splits the stream into
//! records and each record into fields using configurable regular-expression
//! separators, and runs a small script language of `BEGIN` / pattern-action /
//! `END` rules over the record stream. The magic variables `NR`, `NF`, `FNR`
//! and `FILENAME` are live reads of the scanner.
//!
//! # Example
//!
//! ```
//! use hawk::{Interpreter, Lexer, Parser};
//! use hawk::scan::NamedReader;
//! use std::io::Cursor;
//!
//! let source = r#"BEGIN { print "Hello, World!" }"#;
//! let tokens = Lexer::new(source).tokenize().unwrap();
//! let program = Parser::new(tokens).parse().unwrap();
//!
//! let mut interpreter = Interpreter::new(&program);
//! let mut output = Vec::new();
//! let input = Box::new(NamedReader::new("-", Cursor::new(Vec::new())));
//! interpreter.run(input, &mut output).unwrap();
//!
//! assert_eq!(String::from_utf8(output).unwrap(), "Hello, World!\n");
//! ```
//!
//! # Field Processing Example
//!
//! ```
//! use hawk::{Interpreter, Lexer, Parser};
//! use hawk::scan::NamedReader;
//! use std::io::Cursor;
//!
//! let source = r#"{ print $2, $1 }"#;
//! let tokens = Lexer::new(source).tokenize().unwrap();
//! let program = Parser::new(tokens).parse().unwrap();
//!
//! let mut interpreter = Interpreter::new(&program);
//! interpreter.set_field_sep(",");
//!
//! let input = Box::new(NamedReader::new("data", Cursor::new(b"a,b\nc,d\n".to_vec())));
//! let mut output = Vec::new();
//! interpreter.run(input, &mut output).unwrap();
//!
//! assert_eq!(String::from_utf8(output).unwrap(), "b a\nd c\n");
//! ```
//!
//! # Scanning Without the Language
//!
//! The record scanner is usable on its own; the separator may be any regex,
//! and matches that straddle read boundaries are handled.
//!
//! ```
//! use hawk::scan::{NamedReader, Scanner};
//! use std::io::Cursor;
//!
//! let mut sc = Scanner::new();
//! sc.set_row_sep("#+");
//! sc.set_source(Box::new(NamedReader::new("demo", Cursor::new(b"aa##bb#cc".to_vec()))));
//!
//! let mut records = Vec::new();
//! while sc.scan() {
//!     records.push(sc.field(0).to_string());
//! }
//! assert_eq!(records, ["aa", "bb", "cc"]);
//! assert!(sc.err().is_none());
//! ```

pub mod ast;
pub mod error;
pub mod interpreter;
pub mod lexer;
pub mod parser;
pub mod scan;
pub mod value;

pub use error::{Error, Result, SourceLocation};
pub use interpreter::Interpreter;
pub use lexer::{Lexer, Token, TokenKind};
pub use parser::Parser;
pub use scan::Scanner;
pub use value::Value;
