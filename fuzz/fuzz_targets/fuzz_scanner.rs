#![no_main]

use std::io::Cursor;

use hawk::scan::{NamedReader, Scanner};
use libfuzzer_sys::fuzz_target;

// A few separator shapes that stress the cross-buffer matcher: fixed
// strings, variable-width classes, and a pattern that can match empty.
const SEPARATORS: &[&str] = &["##", ";+", "\\s+", "a|bb", "x*y"];

fuzz_target!(|data: &[u8]| {
    let Some((&sel, input)) = data.split_first() else {
        return;
    };
    if input.len() > 100_000 {
        return;
    }

    let mut sc = Scanner::new();
    if sel % 2 == 0 {
        sc.set_field_sep(",");
    }
    sc.set_row_sep(SEPARATORS[sel as usize % SEPARATORS.len()]);
    sc.set_source(Box::new(NamedReader::new(
        "fuzz",
        Cursor::new(input.to_vec()),
    )));

    // Every byte is either consumed into a record or part of a separator;
    // the scan must terminate and never panic.
    while sc.scan() {
        let _ = sc.field(0);
        let _ = sc.field_count();
    }
    let _ = sc.err();
});
