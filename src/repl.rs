use std::path::Path;

use rustyline::{DefaultEditor, error::ReadlineError};

use crate::{
    ast::Program,
    interpreter::{
        evaluator::{builtin::BUILTIN_NAMES, core::Context},
        lexer::tokenize,
        parser::core::Parser,
        value::Value,
    },
    run_source,
};

/// What became of the pending REPL buffer after a parse attempt.
enum BufferOutcome {
    /// The buffer parsed; run it and start fresh.
    Ready(Program),
    /// A block is still open; keep reading continuation lines.
    Incomplete,
    /// The buffer can never parse; report and start fresh.
    Failed(String),
}

/// Runs the interactive shell until the user leaves.
///
/// The prompt is `>>> ` at a statement boundary and `... ` while a block is
/// open. The global frame survives across submissions until `:reset`.
/// Ctrl-C clears the pending buffer; Ctrl-D (or `exit` / `quit`) ends the
/// session.
///
/// # Errors
/// Returns a readline error only if the terminal itself fails.
pub fn run(max_loop_iterations: u64) -> rustyline::Result<()> {
    println!("plaintalk REPL");
    println!("Type plaintalk lines. Use 'exit' or 'quit' to leave. Type ':help' for REPL commands.");

    let mut editor = DefaultEditor::new()?;
    let mut context = Context::new(max_loop_iterations);
    let mut buffer: Vec<String> = Vec::new();

    loop {
        let prompt = if buffer.is_empty() { ">>> " } else { "... " };
        match editor.readline(prompt) {
            Ok(line) => {
                let trimmed = line.trim();

                if buffer.is_empty() {
                    if trimmed.is_empty() {
                        continue;
                    }
                    if trimmed.eq_ignore_ascii_case("exit") || trimmed.eq_ignore_ascii_case("quit")
                    {
                        break;
                    }
                    if trimmed.starts_with(':') {
                        let _ = editor.add_history_entry(trimmed);
                        handle_meta(trimmed, &mut context, max_loop_iterations);
                        continue;
                    }
                }

                let _ = editor.add_history_entry(line.as_str());
                buffer.push(line);

                match parse_buffer(&buffer.join("\n")) {
                    BufferOutcome::Ready(program) => {
                        buffer.clear();
                        if let Err(error) = context.execute(&program) {
                            println!("{error}");
                        }
                    },
                    BufferOutcome::Incomplete => {},
                    BufferOutcome::Failed(message) => {
                        buffer.clear();
                        println!("{message}");
                    },
                }
            },

            Err(ReadlineError::Interrupted) => buffer.clear(),
            Err(ReadlineError::Eof) => break,
            Err(error) => {
                eprintln!("readline error: {error}");
                break;
            },
        }
    }

    Ok(())
}

/// Tries to parse the pending buffer, distinguishing "not done yet" from
/// "broken".
fn parse_buffer(source: &str) -> BufferOutcome {
    let tokens = match tokenize(source) {
        Ok(tokens) => tokens,
        Err(error) => return BufferOutcome::Failed(error.to_string()),
    };

    match Parser::new(tokens).parse() {
        Ok(program) => BufferOutcome::Ready(program),
        Err(error) if error.is_incomplete() => BufferOutcome::Incomplete,
        Err(error) => BufferOutcome::Failed(error.to_string()),
    }
}

/// Handles one `:`-prefixed meta command.
fn handle_meta(command: &str, context: &mut Context, max_loop_iterations: u64) {
    if command == ":help" {
        println!("REPL commands:");
        println!("  :help            Show this help");
        println!("  :vars            Show global variables");
        println!("  :reset           Clear all variables and functions");
        println!("  :load <file>     Run a script file in the current session");
        return;
    }

    if command == ":vars" {
        show_vars(context);
        return;
    }

    if command == ":reset" {
        *context = Context::new(max_loop_iterations);
        println!("Environment reset.");
        return;
    }

    if let Some(raw_path) = command.strip_prefix(":load ") {
        let raw_path = raw_path.trim().trim_matches('"');
        if raw_path.is_empty() {
            println!("Please provide a file path. Example: :load demos/hello.talk");
            return;
        }
        load_file(Path::new(raw_path), context);
        return;
    }

    println!("Unknown REPL command. Type ':help' to see available commands.");
}

/// Prints the user's global bindings, sorted by name.
///
/// The fixed builtin table is skipped so the listing shows what the session
/// actually created.
fn show_vars(context: &Context) {
    let mut names: Vec<&String> = context.globals()
                                         .keys()
                                         .filter(|name| !BUILTIN_NAMES.contains(&name.as_str()))
                                         .collect();
    names.sort();

    if names.is_empty() {
        println!("(no variables yet)");
        return;
    }

    for name in names {
        match &context.globals()[name] {
            Value::Text(text) => println!("{name} = \"{text}\""),
            value => println!("{name} = {value}"),
        }
    }
}

/// Runs a script file inside the current session for `:load`.
fn load_file(path: &Path, context: &mut Context) {
    let source = match std::fs::read_to_string(path) {
        Ok(source) => source,
        Err(_) => {
            println!("I can't find '{}'.", path.display());
            return;
        },
    };

    if let Err(error) = run_source(&source, context) {
        println!("{error}");
    }
}
