//! # plaintalk
//!
//! plaintalk is an interpreter for a small, line-oriented language whose
//! statements read like plain English: `set x to 10`, `if score is at least 5
//! then`, `repeat 5 times`. It parses source into a statement tree and walks
//! it directly, with a scope stack, an embedded expression sub-language, and
//! friendly errors that always carry a line number.

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
    //missing_docs,
)]
#![allow(clippy::missing_errors_doc)]

use crate::{
    ast::Program,
    interpreter::{evaluator::core::Context, lexer::tokenize, parser::core::Parser},
};

/// Defines the structure of parsed code.
///
/// This module declares the statement and expression types that represent
/// source code as a tree. Statement nodes are built by the line parser and
/// carry their expressions as raw text; expression nodes are built on demand
/// when a statement runs.
///
/// # Responsibilities
/// - Defines statement, condition, and expression types for all constructs.
/// - Attaches 1-based source lines to every statement for error reporting.
pub mod ast;
/// Provides unified error types for lexing, parsing, and evaluation.
///
/// This module defines the three error families a program can hit, each
/// carrying a 1-based line number and displaying as one friendly sentence.
/// There is no user-level catch surface: errors propagate to the driver.
///
/// # Responsibilities
/// - Defines error enums for all failure modes (lexer, parser, evaluator).
/// - Attaches line numbers and readable messages.
/// - Implements the standard error traits for easy propagation.
pub mod error;
/// Orchestrates the entire process of code execution.
///
/// This module ties together the line lexer, the statement parser, the
/// expression sub-language, the evaluator, and the value types to provide a
/// complete runtime. It exposes the entry points used by the CLI, the REPL,
/// and the integration tests.
///
/// # Responsibilities
/// - Coordinates all core components: lexer, parser, evaluator, values.
/// - Provides entry points for checking and running source text.
/// - Manages the flow of data and errors between phases.
pub mod interpreter;
/// The interactive REPL.
///
/// Line-oriented shell with continuation prompts for open blocks, meta
/// commands (`:help`, `:vars`, `:reset`, `:load`), and a global frame that
/// survives across submissions.
pub mod repl;
/// General utilities for safe numeric conversion and index arithmetic.
pub mod util;

/// Lexes and parses source without executing it.
///
/// This is the `--check` path: it reports the first lexical or parse error,
/// or returns the parsed program.
///
/// # Errors
/// Returns the first `LexicalError` or `ParseError` found in the source.
///
/// # Examples
/// ```
/// use plaintalk::check_source;
///
/// assert!(check_source("set x to 10\nsay x + 5").is_ok());
/// assert!(check_source("sey x").is_err());
/// ```
pub fn check_source(source: &str) -> Result<Program, Box<dyn std::error::Error>> {
    let tokens = tokenize(source)?;
    let program = Parser::new(tokens).parse()?;
    Ok(program)
}

/// Lexes, parses, and executes source against an existing context.
///
/// The context carries the global frame, so successive calls share state the
/// way REPL submissions do. Output goes wherever the context's output hook
/// points.
///
/// # Errors
/// Returns the first lexical, parse, or runtime error.
///
/// # Examples
/// ```
/// use plaintalk::{
///     interpreter::evaluator::core::{Context, MAX_LOOP_ITERATIONS},
///     run_source,
/// };
///
/// let mut context = Context::new(MAX_LOOP_ITERATIONS);
/// assert!(run_source("set x to 2\nset x to x * 3", &mut context).is_ok());
/// ```
pub fn run_source(source: &str,
                  context: &mut Context)
                  -> Result<(), Box<dyn std::error::Error>> {
    let program = check_source(source)?;
    context.execute(&program)?;
    Ok(())
}
