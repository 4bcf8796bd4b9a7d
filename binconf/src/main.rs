//! Command-line tool for validating and pretty-printing libconfig-style
//! configuration files.
//!
//! Usage: conf [OPTIONS] [FILE]
//!
//! Options:
//!   -I, --include-dir <DIR>  Directory for resolving @include paths
//!                            [default: FILE's parent directory]
//!   -o, --output <FILE>      Write output to specified file
//!       --check              Check if the input is valid (exit 0 if valid,
//!                            1 if invalid), printing nothing on success
//!   -h, --help               Print help
//!   -V, --version            Print version
//!
//! With no FILE (or with `-`), input is read from stdin and @include paths
//! resolve against the working directory unless -I is given. The parsed
//! document is re-emitted in canonical form on stdout.

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process;

use libconf::{parse_text_with_includes, serialize_group, Group};

fn main() {
    let args: Vec<String> = std::env::args().collect();

    let mut include_dir: Option<PathBuf> = None;
    let mut output_file: Option<PathBuf> = None;
    let mut check_only = false;
    let mut input_path: Option<PathBuf> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_help();
                return;
            }
            "-V" | "--version" => {
                println!("conf {}", env!("CARGO_PKG_VERSION"));
                return;
            }
            "-I" | "--include-dir" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: -I requires a directory argument");
                    process::exit(1);
                }
                include_dir = Some(PathBuf::from(&args[i]));
            }
            "-o" | "--output" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --output requires an argument");
                    process::exit(1);
                }
                output_file = Some(PathBuf::from(&args[i]));
            }
            "--check" => {
                check_only = true;
            }
            "-" => {
                // Explicit stdin; input_path stays None.
            }
            arg if arg.starts_with('-') => {
                eprintln!("Error: Unknown option: {arg}");
                process::exit(1);
            }
            arg => {
                if input_path.is_some() {
                    eprintln!("Error: More than one input file given");
                    process::exit(1);
                }
                input_path = Some(PathBuf::from(arg));
            }
        }
        i += 1;
    }

    let (text, source_name) = match read_input(input_path.as_deref()) {
        Ok(input) => input,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    let include_dir = include_dir.unwrap_or_else(|| default_include_dir(input_path.as_deref()));

    let root = match parse_text_with_includes(&text, &source_name, &include_dir) {
        Ok(root) => root,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    if check_only {
        return;
    }

    if let Err(e) = write_output(&root, output_file.as_deref()) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

/// Read the input file, or stdin when no file is given.
fn read_input(path: Option<&Path>) -> io::Result<(String, String)> {
    match path {
        Some(path) => Ok((
            fs::read_to_string(path)?,
            path.to_string_lossy().into_owned(),
        )),
        None => {
            let mut text = String::new();
            io::stdin().read_to_string(&mut text)?;
            Ok((text, "<stdin>".to_string()))
        }
    }
}

/// Includes resolve next to the input file by default.
fn default_include_dir(path: Option<&Path>) -> PathBuf {
    path.and_then(Path::parent)
        .map(Path::to_path_buf)
        .unwrap_or_default()
}

fn write_output(root: &Group, output_file: Option<&Path>) -> io::Result<()> {
    let text = serialize_group(root);
    match output_file {
        Some(path) => fs::write(path, text),
        None => io::stdout().write_all(text.as_bytes()),
    }
}

fn print_help() {
    println!("conf - validate and pretty-print libconfig-style files");
    println!();
    println!("Usage: conf [OPTIONS] [FILE]");
    println!();
    println!("Options:");
    println!("  -I, --include-dir <DIR>  Directory for resolving @include paths");
    println!("                           [default: FILE's parent directory]");
    println!("  -o, --output <FILE>      Write output to specified file");
    println!("      --check              Check validity only (exit 0/1)");
    println!("  -h, --help               Print help");
    println!("  -V, --version            Print version");
    println!();
    println!("With no FILE (or with '-'), input is read from stdin.");
}
