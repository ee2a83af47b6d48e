/// The evaluator module executes AST nodes against the runtime context.
///
/// The evaluator walks the statement tree, evaluates embedded expressions,
/// manages the scope stack, dispatches function calls, and enforces the
/// loop safety cap. It is the core execution engine of the interpreter.
///
/// # Responsibilities
/// - Executes statements in source order, recursing into blocks.
/// - Implements `return` / `stop` / `skip` as internal control signals.
/// - Reports runtime errors with the line of the offending statement.
pub mod evaluator;
/// Plumbing for the embedded expression sub-language.
///
/// Statements carry their expressions as raw text; this module lexes and
/// parses that text into small expression trees on demand. Keeping the
/// expression grammar separate from the line parser mirrors how the surface
/// language reads: sentences outside, ordinary expressions inside.
///
/// # Responsibilities
/// - Tokenizes expression text (numbers, text literals, operators, names).
/// - Parses tokens into `Expr` trees by recursive descent.
pub mod expression;
/// The lexer module classifies raw source into line tokens.
///
/// The language is line-oriented: each physical line is one token, classified
/// as a statement, a comment, or blank. The lexer does no further
/// tokenization; statement phrases are decomposed by the parser.
///
/// # Responsibilities
/// - Splits source on newlines with 1-based numbering, tolerating a BOM.
/// - Rejects embedded null characters.
/// - Keeps comment and blank tokens so later line numbers stay correct.
pub mod lexer;
/// The parser module builds the statement AST from line tokens.
///
/// The parser recognizes statement openers by their leading words, folds all
/// accepted phrasings onto canonical forms, parses nested blocks recursively
/// until their closing phrases, and produces friendly errors with typo
/// suggestions for near-miss keywords.
///
/// # Responsibilities
/// - Converts line tokens into structured statement nodes.
/// - Matches every block opener with its closer at parse time.
/// - Validates embedded expressions for balanced brackets and quotes.
pub mod parser;
/// The value module defines the runtime data types for evaluation.
///
/// This module declares the `Value` enum covering every type a program can
/// produce, plus the callable plumbing shared by builtins and host
/// functions.
///
/// # Responsibilities
/// - Defines the `Value` enum and its display forms.
/// - Provides conversion and truthiness helpers with friendly errors.
/// - Models lists as shared containers mutated in place.
pub mod value;
