//! End-to-end tests for hawk
//!
//! These tests run complete programs and verify the output matches expected
//! results.

use std::io::Cursor;

use hawk::scan::{MultiSource, NamedReader, Source};
use hawk::{Interpreter, Lexer, Parser};

/// Run a hawk program with the given input and return the output
fn run_hawk(program: &str, input: &str) -> Result<String, String> {
    run_hawk_files(program, &[("test", input)])
}

/// Run a hawk program over several named inputs concatenated in order
fn run_hawk_files(program: &str, files: &[(&str, &str)]) -> Result<String, String> {
    let tokens = Lexer::new(program).tokenize().map_err(|e| e.to_string())?;
    let ast = Parser::new(tokens).parse().map_err(|e| e.to_string())?;

    let sources: Vec<Box<dyn Source>> = files
        .iter()
        .map(|(name, data)| {
            Box::new(NamedReader::new(*name, Cursor::new(data.as_bytes().to_vec())))
                as Box<dyn Source>
        })
        .collect();

    let mut interpreter = Interpreter::new(&ast);
    let mut output = Vec::new();
    interpreter
        .run(Box::new(MultiSource::new(sources)), &mut output)
        .map_err(|e| e.to_string())?;

    String::from_utf8(output).map_err(|e| e.to_string())
}

// ============================================================================
// Basic Output Tests
// ============================================================================

#[test]
fn test_hello_world() {
    let output = run_hawk(r#"BEGIN { print "Hello, World!" }"#, "").unwrap();
    assert_eq!(output, "Hello, World!\n");
}

#[test]
fn test_print_number() {
    let output = run_hawk("BEGIN { print 42 }", "").unwrap();
    assert_eq!(output, "42\n");
}

#[test]
fn test_print_float() {
    let output = run_hawk("BEGIN { print 3.14159 }", "").unwrap();
    assert_eq!(output, "3.14159\n");
}

#[test]
fn test_print_multiple_values() {
    let output = run_hawk(r#"BEGIN { print "a", "b", "c" }"#, "").unwrap();
    assert_eq!(output, "a b c\n");
}

#[test]
fn test_number_display_has_eight_significant_digits() {
    let output = run_hawk("BEGIN { print 1 / 3 }", "").unwrap();
    assert_eq!(output, "0.33333333\n");
}

// ============================================================================
// Field Access Tests
// ============================================================================

#[test]
fn test_print_record() {
    let output = run_hawk("{ print $0 }", "hello world\n").unwrap();
    assert_eq!(output, "hello world\n");
}

#[test]
fn test_print_first_field() {
    let output = run_hawk("{ print $1 }", "one two three\n").unwrap();
    assert_eq!(output, "one\n");
}

#[test]
fn test_print_nf() {
    let output = run_hawk("{ print NF }", "one two three four\n").unwrap();
    assert_eq!(output, "4\n");
}

#[test]
fn test_print_last_field() {
    let output = run_hawk("{ print $NF }", "one two three four\n").unwrap();
    assert_eq!(output, "four\n");
}

#[test]
fn test_field_past_nf_is_empty() {
    let output = run_hawk(r#"{ print "[" $9 "]" }"#, "a b\n");
    // No concatenation operator; adjacency is a syntax error.
    assert!(output.is_err());

    let output = run_hawk("{ print $9 }", "a b\n").unwrap();
    assert_eq!(output, "\n");
}

#[test]
fn test_field_expression_index() {
    let output = run_hawk("{ print $(NF - 1) }", "a b c\n").unwrap();
    assert_eq!(output, "b\n");
}

// ============================================================================
// Pattern Tests
// ============================================================================

#[test]
fn test_expression_pattern() {
    let output = run_hawk("$1 > 2 { print $2 }", "1 a\n3 b\n5 c\n").unwrap();
    assert_eq!(output, "b\nc\n");
}

#[test]
fn test_bare_pattern_prints_record() {
    let output = run_hawk("$1 > 2", "1 a\n3 b\n").unwrap();
    assert_eq!(output, "3 b\n");
}

#[test]
fn test_match_pattern() {
    let output = run_hawk(
        r#"$0 ~ "error" { print "Found:", $0 }"#,
        "info: ok\nerror: failed\ninfo: done\n",
    )
    .unwrap();
    assert_eq!(output, "Found: error: failed\n");
}

#[test]
fn test_negated_match() {
    let output = run_hawk(r#"$0 !~ "^#" { print }"#, "# comment\ndata\n").unwrap();
    assert_eq!(output, "data\n");
}

#[test]
fn test_multiple_rules_run_in_order() {
    let output = run_hawk("{ print \"a:\", $1 }\n{ print \"b:\", $1 }", "x\n").unwrap();
    assert_eq!(output, "a: x\nb: x\n");
}

// ============================================================================
// Magic Variable Tests
// ============================================================================

#[test]
fn test_nr_counts_records() {
    let output = run_hawk("{ print NR, $0 }", "a\nb\nc\n").unwrap();
    assert_eq!(output, "1 a\n2 b\n3 c\n");
}

#[test]
fn test_fnr_and_filename_across_sources() {
    let output = run_hawk_files(
        "{ print FILENAME, FNR, NR }",
        &[("a.txt", "x\ny\n"), ("b.txt", "z\n")],
    )
    .unwrap();
    assert_eq!(output, "a.txt 1 1\na.txt 2 2\nb.txt 1 3\n");
}

#[test]
fn test_record_flushed_at_source_boundary() {
    // The first source has no trailing newline; its last record is closed
    // by the boundary and still counts against that source.
    let output = run_hawk_files(
        "{ print FILENAME, $0, FNR, NR }",
        &[("one", "ab"), ("two", "cd\n")],
    )
    .unwrap();
    assert_eq!(output, "one ab 1 1\ntwo cd 1 2\n");
}

#[test]
fn test_user_assignment_shadows_magic_variable() {
    let output = run_hawk("{ NR = 42; print NR }", "a\nb\n").unwrap();
    assert_eq!(output, "42\n42\n");
}

// ============================================================================
// Separator Tests
// ============================================================================

#[test]
fn test_fs_assignment_in_begin() {
    let output = run_hawk("BEGIN { FS = \",\" }\n{ print $2 }", "a,b,c\nd,e,f\n").unwrap();
    assert_eq!(output, "b\ne\n");
}

#[test]
fn test_fs_regex_trims_edge_matches() {
    let output = run_hawk(
        "BEGIN { FS = \"\\\\s*,\\\\s*\" }\n{ print NF, $1, $2 }",
        "a , b , \n",
    )
    .unwrap();
    assert_eq!(output, "2 a b\n");
}

#[test]
fn test_rs_assignment_in_begin() {
    let output = run_hawk("BEGIN { RS = \"##\" }\n{ print NR, $0 }", "aa##bb##cc").unwrap();
    assert_eq!(output, "1 aa\n2 bb\n3 cc\n");
}

#[test]
fn test_rs_change_mid_stream() {
    // The separator changes after the first record; buffered bytes carry
    // over into the regex reader.
    let output = run_hawk("NR == 1 { RS = \"#\" }\n{ print $0 }", "a\nb#c#d").unwrap();
    assert_eq!(output, "a\nb\nc\nd\n");
}

#[test]
fn test_bad_rs_is_reported() {
    let err = run_hawk("BEGIN { RS = \"(\" }\n{ print }", "x\n").unwrap_err();
    assert!(err.contains("setting RS:"), "got {err}");
}

// ============================================================================
// Statement and Expression Tests
// ============================================================================

#[test]
fn test_while_style_loop() {
    let output = run_hawk("BEGIN { n = 3; for n > 0 { print n; n -= 1 } }", "").unwrap();
    assert_eq!(output, "3\n2\n1\n");
}

#[test]
fn test_three_clause_loop_with_break_continue() {
    let output = run_hawk(
        "BEGIN { for i = 0; i < 10; i++ { if i % 2 == 0 { continue }; if i > 6 { break }; print i } }",
        "",
    )
    .unwrap();
    assert_eq!(output, "1\n3\n5\n");
}

#[test]
fn test_ternary() {
    let output = run_hawk(
        r#"{ print $1 > 5 ? "big" : "small" }"#,
        "3\n7\n",
    )
    .unwrap();
    assert_eq!(output, "small\nbig\n");
}

#[test]
fn test_logical_operators() {
    let output = run_hawk("$1 > 1 && $1 < 4 { print $1 }", "1\n2\n3\n4\n").unwrap();
    assert_eq!(output, "2\n3\n");
}

#[test]
fn test_mod_by_zero_is_nan() {
    let output = run_hawk("BEGIN { print 23 % 0 }", "").unwrap();
    assert_eq!(output, "NaN\n");
}

#[test]
fn test_string_comparison_is_lexicographic() {
    let output = run_hawk(r#"BEGIN { if "abc" < "abd" { print "yes" } }"#, "").unwrap();
    assert_eq!(output, "yes\n");
}

#[test]
fn test_mixed_comparison_is_numeric() {
    let output = run_hawk(r#"{ if $1 > 9 { print $1 } }"#, "10\n8\n").unwrap();
    assert_eq!(output, "10\n");
}

// ============================================================================
// Array Tests
// ============================================================================

#[test]
fn test_array_store_and_load() {
    let output = run_hawk("BEGIN { a = []; a[0] = 2; a[1] = 3; print a[0] + a[1] }", "").unwrap();
    assert_eq!(output, "5\n");
}

#[test]
fn test_array_literal_and_for_in() {
    let output = run_hawk(
        "BEGIN { a = [10, 20, 30]; for k in a { print k, a[k] } }",
        "",
    )
    .unwrap();
    assert_eq!(output, "0 10\n1 20\n2 30\n");
}

#[test]
fn test_string_and_number_subscripts_are_distinct() {
    let output = run_hawk(
        r#"BEGIN { a = []; a[1] = "num"; a["1"] = "str"; print a[1], a["1"], length(a) }"#,
        "",
    )
    .unwrap();
    assert_eq!(output, "num str 2\n");
}

#[test]
fn test_count_words_with_array() {
    let output = run_hawk(
        "{ for i = 1; i <= NF; i++ { count[$i] += 1 } }\nEND { for w in count { print w, count[w] } }",
        "b a\na b\na\n",
    )
    .unwrap();
    assert_eq!(output, "a 3\nb 2\n");
}

// ============================================================================
// Function Tests
// ============================================================================

#[test]
fn test_recursive_function() {
    let output = run_hawk(
        "func fact(n) { if n <= 1 { return 1 }; return n * fact(n - 1) }\nBEGIN { print fact(5) }",
        "",
    )
    .unwrap();
    assert_eq!(output, "120\n");
}

#[test]
fn test_function_without_return_yields_undefined() {
    let output = run_hawk(
        r#"func noop() { }
BEGIN { x = noop(); if x == 0 { print "undefined" } }"#,
        "",
    )
    .unwrap();
    assert_eq!(output, "undefined\n");
}

#[test]
fn test_builtin_math() {
    let output = run_hawk("BEGIN { print int(2.7), sqrt(16), atan2(0, 1) }", "").unwrap();
    assert_eq!(output, "2 4 0\n");
}

#[test]
fn test_length_builtin() {
    let output = run_hawk(r#"BEGIN { print length("hello") }"#, "").unwrap();
    assert_eq!(output, "5\n");
}

// ============================================================================
// Runtime Error Tests
// ============================================================================

// All programs are wrapped in 'BEGIN { }' before executing.
#[test]
fn test_runtime_errors() {
    let cases = [
        ("x = 0; x[0] = 2", "assigning to a scalar value using index expression"),
        ("a = []; if a { }", "non-scalar value used as a condition"),
        ("doesntexist()", "unknown function: doesntexist"),
        ("a = []; print $a", "attempting to access a field using a non-scalar value"),
        ("sin(a, b)", "sin: 1 != 2: argument count mismatch"),
        ("a = []; cos(a)", "cos: all arguments must be scalar values"),
        (r#"a = "scalar"; for x in a { }"#, "attempting to range over a scalar value"),
        (r#"x = [] < """#, "cannot compare array and string using <, >, <=, or >="),
        ("x = [] < 50", "cannot compare array and number using <, >, <=, or >="),
        (r#"x = "true" ~ true"#, "invalid types for regexp matching: string ~ bool"),
        (r#"x = "14" ~ 14"#, "invalid types for regexp matching: string ~ number"),
        ("print $-1", "attempting to access a field using a negative index"),
    ];
    for (prog, want) in cases {
        let err = run_hawk(&format!("BEGIN {{ {prog} }}"), "")
            .expect_err(&format!("program {prog:?} unexpectedly succeeded"));
        assert!(err.contains(want), "program {prog:?}: got {err:?}");
    }
}

#[test]
fn test_runtime_valid() {
    // These looked suspicious but are fine.
    for prog in ["FILENAME", "23 % 0", "x = -true"] {
        run_hawk(&format!("BEGIN {{ {prog} }}"), "")
            .unwrap_or_else(|e| panic!("program {prog:?}: unexpected error: {e}"));
    }
}

// ============================================================================
// Control Flow Between Rule Kinds
// ============================================================================

#[test]
fn test_begin_runs_without_input_rules() {
    // No pattern actions and no END: the input is never scanned.
    let output = run_hawk(r#"BEGIN { print "only" }"#, "ignored\n").unwrap();
    assert_eq!(output, "only\n");
}

#[test]
fn test_end_sees_final_counters() {
    let output = run_hawk("END { print NR }", "a\nb\nc\n").unwrap();
    assert_eq!(output, "3\n");
}

#[test]
fn test_sum_column() {
    let output = run_hawk("{ total += $2 }\nEND { print total }", "a 1\nb 2\nc 3\n").unwrap();
    assert_eq!(output, "6\n");
}

#[test]
fn test_empty_input_runs_end() {
    let output = run_hawk("END { print NR }", "").unwrap();
    assert_eq!(output, "0\n");
}
