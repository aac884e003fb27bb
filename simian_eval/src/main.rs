use simian_eval::{interpret::Interpreter, run, types::Value};
use std::{
    env, fs,
    io::{self, Read, Write},
    process::ExitCode,
};

fn main() -> ExitCode {
    pretty_env_logger::init();
    let args: Vec<String> = env::args().skip(1).collect();
    if args.len() > 1 {
        eprintln!("Too many arguments");
        eprintln!("Usage: simian [script]");
        return ExitCode::FAILURE;
    }

    let source = match args.first() {
        Some(path) => fs::read_to_string(path),
        None => read_stdin(),
    };
    match source {
        Ok(source) => run_source(&source),
        Err(e) => {
            eprintln!("Failed to read input: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Reads the whole of standard input as a single program.
fn read_stdin() -> io::Result<String> {
    let mut stdout = io::stdout();
    print!(">> ");
    stdout.flush()?;
    let mut source = String::default();
    io::stdin().read_to_string(&mut source)?;
    Ok(source)
}

fn run_source(source: &str) -> ExitCode {
    let interpreter = Interpreter::new();
    match run(source, &interpreter) {
        Ok(value @ Value::Error(_)) => {
            eprintln!("{value}");
            ExitCode::FAILURE
        }
        Ok(value) => {
            println!("{value}");
            ExitCode::SUCCESS
        }
        Err(errors) => {
            eprintln!("Failed to parse input:");
            errors.iter().for_each(|e| eprintln!("\t{e}"));
            ExitCode::FAILURE
        }
    }
}
