//! Command-line interface for dicecalc
//! This binary parses calculator scripts and prints their tokens, token tree or AST.
//!
//! Usage:
//!   dicecalc parse `<path>` [--format `<format>`] [--max-bytes `<n>`] [--max-depth `<n>`]
//!   dicecalc expr `<text>` [--format `<format>`] [--name `<name>`] [--max-depth `<n>`]
//!   dicecalc list-formats
//!
//! Processing runs on a worker thread with a large stack. `--max-depth` bounds how deeply
//! the input may nest; deeper input is reported as a parse error.

use clap::{value_parser, Arg, ArgMatches, Command};
use dicecalc::calc::processor::{
    available_formats, process_file, process_source_with_limits, ProcessingError,
    ProcessingLimits, ProcessingSpec,
};

/// Scripts larger than this (1 MiB) are refused unless `--max-bytes` says otherwise
const DEFAULT_MAX_BYTES: &str = "1048576";

/// Matches the library's default nesting limit
const DEFAULT_MAX_DEPTH: &str = "64";

/// Stack for the worker thread that parses and renders
const WORKER_STACK_BYTES: usize = 256 * 1024 * 1024;

fn format_arg() -> Arg {
    Arg::new("format")
        .long("format")
        .short('f')
        .help("Output format (e.g., 'ast-sexp', 'ast-treeviz', 'token-simple')")
        .default_value("ast-sexp")
}

fn max_depth_arg() -> Arg {
    Arg::new("max-depth")
        .long("max-depth")
        .help("Refuse input nested deeper than this (groups, prefix operators, operator chains)")
        .value_parser(value_parser!(usize))
        .default_value(DEFAULT_MAX_DEPTH)
}

fn main() {
    let matches = Command::new("dicecalc")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A tool for inspecting how calculator and dice expressions parse")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("parse")
                .about("Parse a script file")
                .arg(
                    Arg::new("path")
                        .help("Path to the script")
                        .required(true)
                        .index(1),
                )
                .arg(format_arg())
                .arg(
                    Arg::new("max-bytes")
                        .long("max-bytes")
                        .help("Refuse scripts larger than this many bytes")
                        .value_parser(value_parser!(u64))
                        .default_value(DEFAULT_MAX_BYTES),
                )
                .arg(max_depth_arg()),
        )
        .subcommand(
            Command::new("expr")
                .about("Parse an expression given on the command line")
                .arg(
                    Arg::new("text")
                        .help("The expression, e.g. '2d6 + 3'")
                        .required(true)
                        .index(1),
                )
                .arg(format_arg())
                .arg(
                    Arg::new("name")
                        .long("name")
                        .help("Source name to use in error messages"),
                )
                .arg(max_depth_arg()),
        )
        .subcommand(Command::new("list-formats").about("List available output formats"))
        .get_matches();

    match matches.subcommand() {
        Some(("parse", parse_matches)) => {
            let path = parse_matches.get_one::<String>("path").unwrap();
            let format = parse_matches.get_one::<String>("format").unwrap();
            let limits = ProcessingLimits {
                max_bytes: Some(*parse_matches.get_one::<u64>("max-bytes").unwrap()),
                max_depth: max_depth(parse_matches),
            };
            handle_parse_command(path, format, limits);
        }
        Some(("expr", expr_matches)) => {
            let text = expr_matches.get_one::<String>("text").unwrap();
            let format = expr_matches.get_one::<String>("format").unwrap();
            let name = expr_matches.get_one::<String>("name").cloned();
            let limits = ProcessingLimits {
                max_bytes: None,
                max_depth: max_depth(expr_matches),
            };
            handle_expr_command(text, format, name, limits);
        }
        Some(("list-formats", _)) => {
            handle_list_formats_command();
        }
        _ => unreachable!(),
    }
}

fn max_depth(matches: &ArgMatches) -> usize {
    *matches.get_one::<usize>("max-depth").unwrap()
}

fn spec_or_exit(format: &str) -> ProcessingSpec {
    ProcessingSpec::from_string(format).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        eprintln!("Run 'dicecalc list-formats' to see the available formats");
        std::process::exit(1);
    })
}

/// Run `work` on a thread with [`WORKER_STACK_BYTES`] of stack
fn on_worker<F>(work: F) -> Result<String, ProcessingError>
where
    F: FnOnce() -> Result<String, ProcessingError> + Send + 'static,
{
    let handle = std::thread::Builder::new()
        .name("dicecalc-worker".to_string())
        .stack_size(WORKER_STACK_BYTES)
        .spawn(work)
        .map_err(|e| ProcessingError::IoError(e.to_string()))?;
    handle.join().unwrap_or_else(|_| {
        eprintln!("Error: processing thread panicked");
        std::process::exit(1);
    })
}

/// Print the output, or the error (with a caret for parse errors) and exit
fn emit(result: Result<String, ProcessingError>) {
    match result {
        Ok(output) => {
            print!("{}", output);
            if !output.ends_with('\n') {
                println!();
            }
        }
        Err(ProcessingError::Parse(e)) => {
            eprintln!("{}", e.report());
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Handle the parse command
fn handle_parse_command(path: &str, format: &str, limits: ProcessingLimits) {
    let spec = spec_or_exit(format);
    let path = path.to_string();
    emit(on_worker(move || process_file(&path, &spec, &limits)));
}

/// Handle the expr command
fn handle_expr_command(text: &str, format: &str, name: Option<String>, limits: ProcessingLimits) {
    let spec = spec_or_exit(format);
    let text = text.to_string();
    emit(on_worker(move || {
        process_source_with_limits(&text, name.as_deref(), &spec, &limits)
    }));
}

/// Handle the list-formats command
fn handle_list_formats_command() {
    println!("Available formats:\n");
    for format in available_formats() {
        println!("  {}", format);
    }
}
