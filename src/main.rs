use std::{fs, path::Path, path::PathBuf, process::ExitCode};

use clap::Parser;
use plaintalk::{
    check_source,
    interpreter::evaluator::core::{Context, MAX_LOOP_ITERATIONS},
    repl, run_source,
};

/// plaintalk is a beginner-friendly programming language whose statements
/// read like plain English sentences.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to a script. Starts the interactive REPL when omitted.
    script: Option<PathBuf>,

    /// Check the script for syntax errors without executing it.
    #[arg(long, requires = "script")]
    check: bool,

    /// Safety limit on loop iterations before a loop counts as runaway.
    #[arg(long, default_value_t = MAX_LOOP_ITERATIONS,
          value_parser = clap::value_parser!(u64).range(1..))]
    max_loop_iterations: u64,
}

fn main() -> ExitCode {
    let args = Args::parse();

    match &args.script {
        Some(path) => run_file(path, args.check, args.max_loop_iterations),
        None => match repl::run(args.max_loop_iterations) {
            Ok(()) => ExitCode::SUCCESS,
            Err(error) => {
                eprintln!("{error}");
                ExitCode::FAILURE
            },
        },
    }
}

/// Runs (or just checks) a script file, mapping failures to exit code 1.
fn run_file(path: &Path, check_only: bool, max_loop_iterations: u64) -> ExitCode {
    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(_) => {
            eprintln!("I can't find '{}'. Perhaps this file does not exist?", path.display());
            return ExitCode::FAILURE;
        },
    };

    if check_only {
        return match check_source(&source) {
            Ok(_) => {
                println!("Looks good! '{}' has no syntax errors.", path.display());
                ExitCode::SUCCESS
            },
            Err(error) => {
                eprintln!("{error}");
                ExitCode::FAILURE
            },
        };
    }

    let mut context = Context::new(max_loop_iterations);
    match run_source(&source, &mut context) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{error}");
            ExitCode::FAILURE
        },
    }
}
