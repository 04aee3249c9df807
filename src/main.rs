use std::env;
use std::fs::{self, File};
use std::io;
use std::process;

use hawk::scan::{MultiSource, NamedReader, Source};
use hawk::{Interpreter, Lexer, Parser};

fn main() {
    let args: Vec<String> = env::args().collect();

    if let Err(e) = run(&args[1..]) {
        eprintln!("hawk: {e}");
        process::exit(2);
    }
}

fn run(args: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    let mut field_sep: Option<String> = None;
    let mut row_sep: Option<String> = None;
    let mut program_source: Option<String> = None;
    let mut input_files: Vec<String> = Vec::new();

    let mut i = 0;
    while i < args.len() {
        let arg = &args[i];

        if arg == "--help" || arg == "-h" {
            print_help();
            return Ok(());
        }

        if arg == "--version" {
            println!("hawk {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }

        if arg == "-F" {
            i += 1;
            if i >= args.len() {
                return Err("option -F requires an argument".into());
            }
            field_sep = Some(args[i].clone());
        } else if let Some(sep) = arg.strip_prefix("-F") {
            field_sep = Some(sep.to_string());
        } else if arg == "-r" {
            i += 1;
            if i >= args.len() {
                return Err("option -r requires an argument".into());
            }
            row_sep = Some(args[i].clone());
        } else if let Some(sep) = arg.strip_prefix("-r") {
            row_sep = Some(sep.to_string());
        } else if arg == "-f" {
            i += 1;
            if i >= args.len() {
                return Err("option -f requires an argument".into());
            }
            program_source = Some(fs::read_to_string(&args[i])?);
        } else if arg == "--" {
            // End of options
            i += 1;
            input_files.extend(args[i..].iter().cloned());
            break;
        } else if arg.starts_with('-') && arg != "-" {
            return Err(format!("unknown option: {arg}").into());
        } else if program_source.is_none() {
            // First non-option argument is the program
            program_source = Some(arg.clone());
        } else {
            // Rest are input files
            input_files.push(arg.clone());
        }

        i += 1;
    }

    let program_source = program_source.ok_or("no program provided")?;

    let tokens = Lexer::new(&program_source).tokenize()?;
    let program = Parser::new(tokens).parse()?;

    let mut interpreter = Interpreter::new(&program);
    if let Some(sep) = &field_sep {
        interpreter.set_field_sep(sep);
    }
    if let Some(sep) = &row_sep {
        interpreter.set_row_sep(sep);
    }

    let stdout = io::stdout();
    let mut output = stdout.lock();

    let input = build_input(&input_files)?;
    interpreter.run(input, &mut output)?;

    Ok(())
}

/// Turn the operand list into one logical source. Several files become a
/// concatenation whose seams reset FNR and FILENAME.
fn build_input(files: &[String]) -> io::Result<Box<dyn Source>> {
    if files.is_empty() {
        return Ok(Box::new(NamedReader::new("-", io::stdin())));
    }
    let mut sources: Vec<Box<dyn Source>> = Vec::with_capacity(files.len());
    for name in files {
        if name == "-" {
            sources.push(Box::new(NamedReader::new("-", io::stdin())));
        } else {
            let file = File::open(name)?;
            sources.push(Box::new(NamedReader::new(name.clone(), file)));
        }
    }
    Ok(Box::new(MultiSource::new(sources)))
}

fn print_help() {
    println!(
        r#"Usage: hawk [OPTIONS] 'program' [file ...]
       hawk [OPTIONS] -f progfile [file ...]

An AWK-family stream processor with regex record separators.

Options:
  -F sep           Set the field separator regex
  -r sep           Set the record separator regex
  -f progfile      Read the program from a file
  --version        Print version information
  --help           Print this help message

A program is a list of rules:
  BEGIN {{ ... }}    runs before any input
  expr {{ ... }}     runs for records where expr holds; bare expr prints
  END {{ ... }}      runs after all input

Examples:
  hawk '{{ print $1 }}' file.txt
  hawk -F: '{{ print $1 }}' /etc/passwd
  hawk 'BEGIN {{ print "Hello" }}'
  hawk '$0 ~ "warn.*" {{ print NR, $0 }}' file.txt
"#
    );
}
