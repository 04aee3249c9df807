//! CLI integration tests for hawk
//!
//! These tests run the hawk binary and verify command-line behavior.

use std::io::Write;
use std::process::Command;
use tempfile::NamedTempFile;

/// Run hawk with the given arguments and input, returning stdout
fn run_hawk(args: &[&str], input: Option<&str>) -> Result<String, String> {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_hawk"));
    cmd.args(args);

    cmd.stdin(std::process::Stdio::piped());
    cmd.stdout(std::process::Stdio::piped());
    cmd.stderr(std::process::Stdio::piped());

    let mut child = cmd.spawn().map_err(|e| e.to_string())?;

    if let Some(input_str) = input
        && let Some(mut stdin) = child.stdin.take()
    {
        stdin
            .write_all(input_str.as_bytes())
            .map_err(|e| e.to_string())?;
    }
    drop(child.stdin.take());

    let output = child.wait_with_output().map_err(|e| e.to_string())?;

    if output.status.success() {
        String::from_utf8(output.stdout).map_err(|e| e.to_string())
    } else {
        Err(String::from_utf8_lossy(&output.stderr).to_string())
    }
}

fn temp_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_cli_help() {
    let output = run_hawk(&["--help"], None).unwrap();
    assert!(output.contains("Usage:"));
    assert!(output.contains("hawk"));
}

#[test]
fn test_cli_version() {
    let output = run_hawk(&["--version"], None).unwrap();
    assert!(output.contains("hawk"));
}

#[test]
fn test_cli_begin_program() {
    let output = run_hawk(&["BEGIN { print \"hello\" }"], None).unwrap();
    assert_eq!(output, "hello\n");
}

#[test]
fn test_cli_with_stdin() {
    let output = run_hawk(&["{ print $1 }"], Some("a b c\n")).unwrap();
    assert_eq!(output, "a\n");
}

#[test]
fn test_cli_field_separator() {
    let output = run_hawk(&["-F:", "{ print $1 }"], Some("a:b:c\n")).unwrap();
    assert_eq!(output, "a\n");
}

#[test]
fn test_cli_field_separator_detached() {
    let output = run_hawk(&["-F", ",", "{ print $2 }"], Some("a,b,c\n")).unwrap();
    assert_eq!(output, "b\n");
}

#[test]
fn test_cli_record_separator() {
    let output = run_hawk(&["-r", "##", "{ print NR, $0 }"], Some("aa##bb")).unwrap();
    assert_eq!(output, "1 aa\n2 bb\n");
}

#[test]
fn test_cli_file_input() {
    let file = temp_file("one two\nthree four\n");
    let path = file.path().to_str().unwrap();

    let output = run_hawk(&["{ print $2 }", path], None).unwrap();
    assert_eq!(output, "two\nfour\n");
}

#[test]
fn test_cli_multiple_files_reset_fnr() {
    let a = temp_file("x\ny\n");
    let b = temp_file("z\n");
    let a_path = a.path().to_str().unwrap();
    let b_path = b.path().to_str().unwrap();

    let output = run_hawk(&["{ print FNR, NR }", a_path, b_path], None).unwrap();
    assert_eq!(output, "1 1\n2 2\n1 3\n");
}

#[test]
fn test_cli_filename_tracks_current_file() {
    let a = temp_file("x\n");
    let b = temp_file("y\n");
    let a_path = a.path().to_str().unwrap().to_string();
    let b_path = b.path().to_str().unwrap().to_string();

    let output = run_hawk(&["{ print FILENAME }", &a_path, &b_path], None).unwrap();
    assert_eq!(output, format!("{a_path}\n{b_path}\n"));
}

#[test]
fn test_cli_program_from_file() {
    let prog = temp_file("{ print NF }\n");
    let path = prog.path().to_str().unwrap();

    let output = run_hawk(&["-f", path], Some("a b c\n")).unwrap();
    assert_eq!(output, "3\n");
}

#[test]
fn test_cli_unknown_option() {
    let err = run_hawk(&["-Z", "{ print }"], None).unwrap_err();
    assert!(err.contains("unknown option"), "got {err}");
}

#[test]
fn test_cli_missing_program() {
    let err = run_hawk(&[], None).unwrap_err();
    assert!(err.contains("no program provided"), "got {err}");
}

#[test]
fn test_cli_syntax_error() {
    let err = run_hawk(&["BEGIN { x = }"], None).unwrap_err();
    assert!(err.contains("hawk:"), "got {err}");
    assert!(err.contains("parser error"), "got {err}");
}

#[test]
fn test_cli_bad_record_separator() {
    let err = run_hawk(&["-r", "(", "{ print }"], Some("x\n")).unwrap_err();
    assert!(err.contains("setting RS:"), "got {err}");
}
