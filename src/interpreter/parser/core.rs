use crate::{
    ast::Program,
    error::ParseError,
    interpreter::{
        lexer::{LineKind, LineToken},
        parser::utils::canonical,
    },
};

/// Result type used throughout statement parsing.
pub type ParseResult<T> = Result<T, ParseError>;

/// Closing phrases in canonical form.
const CLOSING_PHRASES: &[&str] = &["otherwise", "end if", "end repeat", "end define", "end for"];

/// Closing phrases that carry a tail, matched by prefix.
const CLOSING_PREFIXES: &[&str] = &["otherwise if "];

/// Alias folding for exact closing phrases.
const CLOSING_ALIASES: &[(&str, &str)] = &[
    ("else", "otherwise"),
    ("finish if", "end if"),
    ("finish repeat", "end repeat"),
    ("finish for", "end for"),
    ("end function", "end define"),
    ("finish define", "end define"),
    ("finish function", "end define"),
];

/// Alias folding for prefixed closing phrases.
const CLOSING_PREFIX_ALIASES: &[(&str, &str)] = &[("or if ", "otherwise if ")];

/// A block terminator the parser just consumed.
///
/// `canonical` is the folded phrase used for matching; `raw` keeps the line
/// as written so that an `otherwise if ... then` header can re-read its
/// condition with the original casing.
#[derive(Debug, Clone)]
pub(crate) struct BlockEnd {
    /// The folded closing phrase (whole line, lowercased).
    pub canonical: String,
    /// The line exactly as the user wrote it.
    pub raw:       String,
    /// The line number of the closing phrase.
    pub line:      usize,
}

/// Parses line tokens into a `Program` AST.
///
/// The parser keeps a cursor over the token stream and parses blocks
/// recursively: each block-opening statement calls back into
/// [`Parser::parse_block`] with the closing phrases that may end it.
pub struct Parser {
    tokens:   Vec<LineToken>,
    position: usize,
}

impl Parser {
    /// Creates a parser over a token stream produced by the line lexer.
    #[must_use]
    pub fn new(tokens: Vec<LineToken>) -> Self {
        Self { tokens,
               position: 0 }
    }

    /// Parses the whole token stream into a program.
    ///
    /// # Errors
    /// Returns the first [`ParseError`] encountered; the parser never skips
    /// an unparsed line.
    ///
    /// # Example
    /// ```
    /// use plaintalk::interpreter::{lexer::tokenize, parser::core::Parser};
    ///
    /// let tokens = tokenize("set x to 10\nsay x").unwrap();
    /// let program = Parser::new(tokens).parse().unwrap();
    ///
    /// assert_eq!(program.statements.len(), 2);
    /// ```
    pub fn parse(mut self) -> ParseResult<Program> {
        let (statements, _) = self.parse_block(&[])?;
        Ok(Program { statements })
    }

    /// Parses statements until a terminator phrase or the end of input.
    ///
    /// `terminators` holds the canonical closing phrases that legally end the
    /// current block (`"otherwise if"` stands for the prefixed form). With no
    /// terminators this parses to the end of input. A closing phrase that is
    /// not a terminator of the current block is an `UnexpectedCloser`;
    /// reaching the end of input inside a block is a `MissingCloser`, which
    /// the REPL reads as "keep typing".
    pub(crate) fn parse_block(&mut self,
                              terminators: &[&str])
                              -> ParseResult<(Vec<crate::ast::Statement>, Option<BlockEnd>)> {
        let mut statements = Vec::new();

        while let Some(token) = self.advance() {
            if token.kind != LineKind::Statement {
                continue;
            }

            let folded = normalize_closer(&canonical(&token.text));
            if matches_any(&folded, terminators) {
                return Ok((statements,
                           Some(BlockEnd { canonical: folded,
                                           raw:       token.text.clone(),
                                           line:      token.line, })));
            }

            if is_closing_phrase(&folded) {
                return Err(ParseError::UnexpectedCloser { found:    token.text.clone(),
                                                          expected: expected_phrase(terminators),
                                                          line:     token.line, });
            }

            let statement = self.parse_statement(&token)?;
            statements.push(statement);
        }

        if terminators.is_empty() {
            return Ok((statements, None));
        }

        let line = self.tokens.last().map_or(1, |token| token.line);
        Err(ParseError::MissingCloser { expected: expected_phrase(terminators).unwrap_or_default(),
                                        line })
    }

    /// Returns the next token and moves the cursor past it.
    fn advance(&mut self) -> Option<LineToken> {
        let token = self.tokens.get(self.position).cloned();
        if token.is_some() {
            self.position += 1;
        }
        token
    }
}

/// Folds closing-phrase aliases onto their canonical form.
///
/// `finish repeat` becomes `end repeat`, `or if x then` becomes
/// `otherwise if x then`, and so on. Non-closing lines pass through
/// unchanged.
fn normalize_closer(folded: &str) -> String {
    let exact = CLOSING_ALIASES.iter()
                               .find(|(alias, _)| *alias == folded)
                               .map(|(_, target)| (*target).to_string());
    if let Some(target) = exact {
        return target;
    }

    for (alias, target) in CLOSING_PREFIX_ALIASES {
        if let Some(tail) = folded.strip_prefix(alias) {
            return format!("{target}{tail}");
        }
    }

    folded.to_string()
}

/// Tests whether a folded line matches one of the block's terminators.
fn matches_any(folded: &str, terminators: &[&str]) -> bool {
    terminators.iter().any(|terminator| {
                          folded == *terminator
                          || (*terminator == "otherwise if"
                              && folded.starts_with("otherwise if "))
                      })
}

/// Tests whether a folded line is any closing phrase at all.
fn is_closing_phrase(folded: &str) -> bool {
    CLOSING_PHRASES.contains(&folded)
    || CLOSING_PREFIXES.iter().any(|prefix| folded.starts_with(prefix))
}

/// Renders the accepted terminators for an error message.
fn expected_phrase(terminators: &[&str]) -> Option<String> {
    if terminators.is_empty() {
        return None;
    }

    let mut parts: Vec<String> = terminators.iter()
                                            .map(|t| {
                                                if *t == "otherwise if" {
                                                    "otherwise if ...".to_string()
                                                } else {
                                                    (*t).to_string()
                                                }
                                            })
                                            .collect();
    parts.sort();
    Some(parts.join(" or "))
}
