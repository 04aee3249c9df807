#![no_main]

use hawk::{Lexer, Parser};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    if data.len() > 10_000 {
        return;
    }

    let tokens = match Lexer::new(data).tokenize() {
        Ok(t) => t,
        Err(_) => return,
    };

    // Parsing arbitrary token streams must never panic
    let _ = Parser::new(tokens).parse();
});
