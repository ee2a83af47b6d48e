#[derive(Debug)]
/// Represents all errors that can occur while splitting source into lines.
pub enum LexicalError {
    /// The source contained a null character, which no text file should have.
    NullCharacter {
        /// The source line where the error occurred.
        line: usize,
    },
}

impl std::fmt::Display for LexicalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NullCharacter { line } => {
                write!(f, "Error on line {line}: I found an invalid null character.")
            },
        }
    }
}

impl std::error::Error for LexicalError {}
