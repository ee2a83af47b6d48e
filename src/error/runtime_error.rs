#[derive(Debug)]
/// Represents all errors that can occur during evaluation and runtime.
pub enum RuntimeError {
    /// Tried to use a variable that has not been set.
    UnknownVariable {
        /// The name of the variable.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// Called a function that has not been defined.
    UnknownFunction {
        /// The name of the function.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// Called a value that is not a function.
    NotCallable {
        /// The name of the value.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// A value had an unexpected or incompatible type.
    TypeError {
        /// Details about the type mismatch.
        details: String,
        /// The source line where the error occurred.
        line:    usize,
    },
    /// Attempted division (or remainder) by zero.
    DivisionByZero {
        /// The source line where the error occurred.
        line: usize,
    },
    /// Tried to remove a value that is not in the list.
    ItemNotFound {
        /// Display form of the missing value.
        item: String,
        /// The name of the list.
        list: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// The wrong number of arguments was supplied to a function.
    ArgumentCountMismatch {
        /// The name of the function.
        name:     String,
        /// The accepted argument count(s), already formatted.
        expected: String,
        /// The number of arguments actually supplied.
        found:    usize,
        /// The source line where the error occurred.
        line:     usize,
    },
    /// Tried to access an index outside a list or text.
    IndexOutOfBounds {
        /// The index that was requested.
        index: i64,
        /// The length of the sequence.
        len:   usize,
        /// The source line where the error occurred.
        line:  usize,
    },
    /// An expression could not be read at all.
    BadExpression {
        /// The expression text as written.
        text: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// An argument to a builtin was the right type but an unusable value.
    InvalidArgument {
        /// Details about why the argument is invalid.
        details: String,
        /// The source line where the error occurred.
        line:    usize,
    },
    /// Whole-number arithmetic overflowed.
    Overflow {
        /// The source line where the error occurred.
        line: usize,
    },
    /// `return` was used outside of a function body.
    ReturnOutsideFunction {
        /// The source line where the error occurred.
        line: usize,
    },
    /// `stop` was used outside of a loop body.
    StopOutsideLoop {
        /// The source line where the error occurred.
        line: usize,
    },
    /// `skip` was used outside of a loop body.
    SkipOutsideLoop {
        /// The source line where the error occurred.
        line: usize,
    },
    /// A loop ran past the configured iteration safety cap.
    RunawayLoop {
        /// The source line of the loop header.
        line: usize,
    },
}

impl RuntimeError {
    /// Returns the source line the error points at.
    #[must_use]
    pub const fn line(&self) -> usize {
        match self {
            Self::UnknownVariable { line, .. }
            | Self::UnknownFunction { line, .. }
            | Self::NotCallable { line, .. }
            | Self::TypeError { line, .. }
            | Self::DivisionByZero { line }
            | Self::ItemNotFound { line, .. }
            | Self::ArgumentCountMismatch { line, .. }
            | Self::IndexOutOfBounds { line, .. }
            | Self::BadExpression { line, .. }
            | Self::InvalidArgument { line, .. }
            | Self::Overflow { line }
            | Self::ReturnOutsideFunction { line }
            | Self::StopOutsideLoop { line }
            | Self::SkipOutsideLoop { line }
            | Self::RunawayLoop { line } => *line,
        }
    }
}

impl std::fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownVariable { name, line } => write!(f,
                                                           "Error on line {line}: I can't find '{name}'. Try 'set {name} to ...' first."),

            Self::UnknownFunction { name, line } => write!(f,
                                                           "Error on line {line}: I can't find '{name}'. Try defining it first."),

            Self::NotCallable { name, line } => {
                write!(f, "Error on line {line}: '{name}' is not a function.")
            },

            Self::TypeError { details, line } => {
                write!(f, "Error on line {line}: {details}.")
            },

            Self::DivisionByZero { line } => {
                write!(f, "Error on line {line}: Division by zero is not allowed.")
            },

            Self::ItemNotFound { item, list, line } => write!(f,
                                                              "Error on line {line}: I couldn't remove {item} because it is not in '{list}'."),

            Self::ArgumentCountMismatch { name,
                                          expected,
                                          found,
                                          line, } => write!(f,
                                                            "Error on line {line}: '{name}' expects {expected} argument(s), but got {found}."),

            Self::IndexOutOfBounds { index, len, line } => write!(f,
                                                                  "Error on line {line}: Index {index} is outside the sequence (length {len})."),

            Self::BadExpression { text, line } => {
                write!(f, "Error on line {line}: I couldn't read the expression '{text}'.")
            },

            Self::InvalidArgument { details, line } => {
                write!(f, "Error on line {line}: {details}.")
            },

            Self::Overflow { line } => write!(f,
                                              "Error on line {line}: That number grew too large for me to compute."),

            Self::ReturnOutsideFunction { line } => {
                write!(f, "Error on line {line}: I found 'return' outside of a function.")
            },

            Self::StopOutsideLoop { line } => {
                write!(f, "Error on line {line}: I found 'stop' outside of a loop.")
            },

            Self::SkipOutsideLoop { line } => {
                write!(f, "Error on line {line}: I found 'skip' outside of a loop.")
            },

            Self::RunawayLoop { line } => write!(f,
                                                 "Error on line {line}: This loop seems to be running forever. Consider adding a stop condition."),
        }
    }
}

impl std::error::Error for RuntimeError {}
