/// The runtime context and the statement walker.
///
/// Declares [`core::Context`] (scope stack, configuration, I/O hooks), the
/// control-flow [`core::Flow`] signal type, and statement execution.
pub mod core;

/// Binary operator dispatch over value pairs.
pub mod binary;
/// The fixed builtin function table.
pub mod builtin;
/// Function call paths: user functions, builtins, host callables.
pub mod call;
/// Expression-tree evaluation and the plain-English expression rewrites.
pub mod expr;
/// Conditionals, loops, and the runaway-loop safeguard.
pub mod flow;
