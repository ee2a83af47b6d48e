#[derive(Debug)]
/// Represents all errors that can occur while parsing line tokens into an AST.
pub enum ParseError {
    /// The line did not start with any known statement phrase.
    UnknownStatement {
        /// The offending line, trimmed.
        text:       String,
        /// An optional "Did you mean ..." example for near-miss keywords.
        suggestion: Option<String>,
        /// The source line where the error occurred.
        line:       usize,
    },
    /// The input ended while a block was still waiting for its closing phrase.
    ///
    /// The REPL treats this error as "keep typing" rather than a failure.
    MissingCloser {
        /// The closing phrase (or phrases) that would have ended the block.
        expected: String,
        /// The source line where the unterminated input ends.
        line:     usize,
    },
    /// A closing phrase appeared where no block (or no matching block) was
    /// open.
    UnexpectedCloser {
        /// The out-of-place phrase as written.
        found:    String,
        /// The closing phrases that would have been accepted here, if any.
        expected: Option<String>,
        /// The source line where the error occurred.
        line:     usize,
    },
    /// A `with ...` parameter list contained something that is not a name.
    BadParameterList {
        /// Description of the offending parameter.
        detail: String,
        /// The source line where the error occurred.
        line:   usize,
    },
    /// A `with ...` parameter list mixed commas and the word `and`.
    MixedParameterStyles {
        /// The source line where the error occurred.
        line: usize,
    },
    /// A condition was missing one of its sides.
    MalformedCondition {
        /// Description of what is missing.
        detail: String,
        /// The source line where the error occurred.
        line:   usize,
    },
    /// An embedded expression had unbalanced brackets or an unclosed quote.
    MalformedExpression {
        /// Description of the imbalance.
        detail: String,
        /// The source line where the error occurred.
        line:   usize,
    },
}

impl ParseError {
    /// Returns the source line the error points at.
    #[must_use]
    pub const fn line(&self) -> usize {
        match self {
            Self::UnknownStatement { line, .. }
            | Self::MissingCloser { line, .. }
            | Self::UnexpectedCloser { line, .. }
            | Self::BadParameterList { line, .. }
            | Self::MixedParameterStyles { line }
            | Self::MalformedCondition { line, .. }
            | Self::MalformedExpression { line, .. } => *line,
        }
    }

    /// Reports whether the error means the input simply stopped too early.
    ///
    /// The REPL keeps reading continuation lines while this is true.
    #[must_use]
    pub const fn is_incomplete(&self) -> bool {
        matches!(self, Self::MissingCloser { .. })
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownStatement { text, suggestion, line } => {
                write!(f, "Error on line {line}: I don't understand '{text}'.")?;
                match suggestion {
                    Some(hint) => write!(f, " {hint}"),
                    None => write!(f, " Try commands like 'set x to 10' or 'say \"Hello\"'."),
                }
            },

            Self::MissingCloser { expected, line } => write!(f,
                                                             "Error on line {line}: I reached the end of the input, but I'm still waiting for {expected}."),

            Self::UnexpectedCloser { found, expected, line } => {
                write!(f, "Error on line {line}: '{found}' is out of place.")?;
                match expected {
                    Some(expected) => write!(f, " I expected {expected} before this line."),
                    None => write!(f, " This closing word does not match any open block."),
                }
            },

            Self::BadParameterList { detail, line } => {
                write!(f, "Error on line {line}: {detail} Use names like 'x', 'total', or 'item_count'.")
            },

            Self::MixedParameterStyles { line } => write!(f,
                                                          "Error on line {line}: Please separate parameters with commas or with the word 'and', not both."),

            Self::MalformedCondition { detail, line } => {
                write!(f, "Error on line {line}: {detail}")
            },

            Self::MalformedExpression { detail, line } => {
                write!(f, "Error on line {line}: {detail}")
            },
        }
    }
}

impl std::error::Error for ParseError {}
