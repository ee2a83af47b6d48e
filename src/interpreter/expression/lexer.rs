use logos::Logos;

/// Represents a lexical token inside an expression.
///
/// Expressions are single-line by construction (they are embedded in line
/// statements), so tokens carry no position of their own; errors use the line
/// of the enclosing statement.
#[derive(Logos, Debug, PartialEq, Clone)]
pub enum Token {
    /// Floating-point literals such as `3.14`, `.5`, or `2.1e-10`.
    #[regex(r"[0-9]+\.[0-9]+([eE][+-]?[0-9]+)?", parse_real)]
    #[regex(r"\.[0-9]+([eE][+-]?[0-9]+)?", parse_real)]
    #[regex(r"[0-9]+[eE][+-]?[0-9]+", parse_real)]
    Real(f64),
    /// Integer literals such as `42`.
    #[regex(r"[0-9]+", parse_integer)]
    Integer(i64),
    /// Boolean literals, case-insensitive like the rest of the surface.
    #[token("true", parse_bool, ignore(ascii_case))]
    #[token("false", parse_bool, ignore(ascii_case))]
    Bool(bool),
    /// The `nothing` literal.
    #[token("nothing", ignore(ascii_case))]
    Nothing,
    /// `and`
    #[token("and", ignore(ascii_case))]
    And,
    /// `or`
    #[token("or", ignore(ascii_case))]
    Or,
    /// `not`
    #[token("not", ignore(ascii_case))]
    Not,
    /// Identifier tokens; variable or function names such as `x` or `score`.
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*", |lex| lex.slice().to_string())]
    Identifier(String),
    /// Text literals in double or single quotes, with `\"`-style escapes.
    #[regex(r#""([^"\\]|\\.)*""#, parse_text)]
    #[regex(r"'([^'\\]|\\.)*'", parse_text)]
    Text(String),
    /// `+`
    #[token("+")]
    Plus,
    /// `-`
    #[token("-")]
    Minus,
    /// `*`
    #[token("*")]
    Star,
    /// `/`
    #[token("/")]
    Slash,
    /// `%`
    #[token("%")]
    Percent,
    /// `(`
    #[token("(")]
    LParen,
    /// `)`
    #[token(")")]
    RParen,
    /// `[`
    #[token("[")]
    LBracket,
    /// `]`
    #[token("]")]
    RBracket,
    /// `,`
    #[token(",")]
    Comma,
    /// `:`
    #[token(":")]
    Colon,
    /// `==`
    #[token("==")]
    EqualEqual,
    /// `!=`
    #[token("!=")]
    BangEqual,
    /// `<=`
    #[token("<=")]
    LessEqual,
    /// `>=`
    #[token(">=")]
    GreaterEqual,
    /// `<`
    #[token("<")]
    Less,
    /// `>`
    #[token(">")]
    Greater,

    /// Spaces and tabs between tokens.
    #[regex(r"[ \t\f]+", logos::skip)]
    Ignored,
}

/// Parses a floating-point literal from the current token slice.
fn parse_real(lex: &logos::Lexer<Token>) -> Option<f64> {
    lex.slice().parse().ok()
}

/// Parses an integer literal from the current token slice.
///
/// Returns `None` (a lexer error) when the literal does not fit in `i64`.
fn parse_integer(lex: &logos::Lexer<Token>) -> Option<i64> {
    lex.slice().parse().ok()
}

/// Parses a boolean literal from the current token slice.
fn parse_bool(lex: &logos::Lexer<Token>) -> Option<bool> {
    match lex.slice().to_ascii_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// Strips the surrounding quotes from a text literal and resolves escapes.
///
/// Recognized escapes are `\n`, `\t`, `\r`, `\\`, `\"`, and `\'`; an
/// unrecognized escape keeps its character unchanged.
fn parse_text(lex: &logos::Lexer<Token>) -> Option<String> {
    let slice = lex.slice();
    let inner = &slice[1..slice.len() - 1];

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }

    Some(out)
}
