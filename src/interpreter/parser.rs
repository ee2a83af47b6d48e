/// Block structure and the parsing cursor.
///
/// Holds the `Parser` type, its cursor over the line-token stream, the
/// recursive `parse_block` routine, and the folding table for closing
/// phrases (`end if`, `finish repeat`, `otherwise if ...`, and friends).
pub mod core;
/// Per-statement sub-parsers and the opener folding table.
///
/// Every statement form the language accepts is recognized here, with all of
/// its phrasings folded to one canonical handler before dispatch.
pub mod statement;

/// Condition phrasing folding.
///
/// Maps the English comparison phrases (`is at least`, `is bigger than`,
/// `does not contain`, ...) onto comparison operators, quote-aware so that
/// keywords inside text literals are never matched.
pub mod condition;
/// Typo suggestions for unknown statements.
///
/// Computes edit distances against the known opener phrases and offers a
/// complete example statement when the input is a near miss.
pub mod suggest;
/// Word scanning and list-splitting helpers shared by the sub-parsers.
pub mod utils;
