// glecheck: staged syntax validator for a minimal C-like language

use std::io::{self, Read};
use std::process::ExitCode;

use glecheck::{tokenize, validate, SUCCESS_MESSAGE};

fn usage(program_name: &str) {
    eprintln!("Usage: {} [--tokens] <file.c | ->", program_name);
    eprintln!();
    eprintln!("Validates the file and prints the first syntax error found.");
    eprintln!("Use '-' to read the program from stdin.");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --tokens    Print the token stream instead of validating");
}

fn read_source(path: &str) -> io::Result<String> {
    if path == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        std::fs::read_to_string(path)
    }
}

fn dump_tokens(source: &str) -> ExitCode {
    match tokenize(source) {
        Ok(tokens) => {
            for (i, token) in tokens.iter().enumerate() {
                println!(
                    "{:4}: {:<14} {:<10} @ {}:{}",
                    i,
                    format!("{:?}", token.kind),
                    token.lexeme,
                    token.location.line,
                    token.location.column
                );
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            println!("Lexical error: {}", e);
            ExitCode::from(1)
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let program_name = args.first().map(|s| s.as_str()).unwrap_or("glecheck");

    let mut show_tokens = false;
    let mut path = None;
    for arg in args.iter().skip(1) {
        match arg.as_str() {
            "--tokens" => show_tokens = true,
            "-h" | "--help" => {
                usage(program_name);
                return ExitCode::SUCCESS;
            }
            _ if path.is_none() => path = Some(arg.as_str()),
            _ => {
                eprintln!("Error: Unexpected argument '{}'", arg);
                usage(program_name);
                return ExitCode::from(2);
            }
        }
    }

    let Some(path) = path else {
        eprintln!("Error: No input file provided");
        eprintln!();
        usage(program_name);
        return ExitCode::from(2);
    };

    // Read failures are internal errors, never syntax diagnostics
    let source = match read_source(path) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Internal error: failed to read '{}': {}", path, e);
            return ExitCode::from(2);
        }
    };

    if show_tokens {
        return dump_tokens(&source);
    }

    log::debug!("validating {} ({} bytes)", path, source.len());
    match validate(&source) {
        Ok(()) => {
            println!("{}", SUCCESS_MESSAGE);
            ExitCode::SUCCESS
        }
        Err(e) => {
            println!("{}", e);
            ExitCode::from(1)
        }
    }
}
