use crate::error::LexicalError;

/// The classification of one physical source line.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LineKind {
    /// A line holding a statement phrase.
    Statement,
    /// A line whose first non-blank character is `#`.
    Comment,
    /// A line that is empty or whitespace only.
    Blank,
}

/// A single source line with metadata for parser error reporting.
///
/// The language is line-oriented, so the lexer emits one token per physical
/// line. Comment and blank tokens stay in the stream so that every later
/// diagnostic can report the correct 1-based line number; the parser skips
/// them.
#[derive(Debug, Clone, PartialEq)]
pub struct LineToken {
    /// 1-based line number in the original source.
    pub line: usize,
    /// How the line is classified.
    pub kind: LineKind,
    /// The statement phrase (trimmed), the raw comment, or empty for blanks.
    pub text: String,
}

/// Converts raw source text into line tokens.
///
/// A leading byte-order mark is discarded. Lines are split on `\n` with a
/// trailing `\r` tolerated, numbered from 1. Each line is classified as a
/// statement, a comment, or blank; statements are stored trimmed and the
/// parser decomposes the phrase itself.
///
/// # Errors
/// Returns `LexicalError::NullCharacter` if any line contains `U+0000`.
///
/// # Example
/// ```
/// use plaintalk::interpreter::lexer::{LineKind, tokenize};
///
/// let tokens = tokenize("set x to 10\n\n# a comment").unwrap();
///
/// assert_eq!(tokens.len(), 3);
/// assert_eq!(tokens[0].kind, LineKind::Statement);
/// assert_eq!(tokens[1].kind, LineKind::Blank);
/// assert_eq!(tokens[2].kind, LineKind::Comment);
/// assert_eq!(tokens[2].line, 3);
/// ```
pub fn tokenize(source: &str) -> Result<Vec<LineToken>, LexicalError> {
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);

    let mut tokens = Vec::new();
    for (index, raw_line) in source.split('\n').enumerate() {
        let line = index + 1;
        let raw_line = raw_line.strip_suffix('\r').unwrap_or(raw_line);

        if raw_line.contains('\0') {
            return Err(LexicalError::NullCharacter { line });
        }

        let trimmed = raw_line.trim();
        let (kind, text) = if trimmed.is_empty() {
            (LineKind::Blank, String::new())
        } else if trimmed.starts_with('#') {
            (LineKind::Comment, raw_line.to_string())
        } else {
            (LineKind::Statement, trimmed.to_string())
        };

        tokens.push(LineToken { line, kind, text });
    }

    Ok(tokens)
}
