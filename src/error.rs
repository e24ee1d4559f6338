//! Error types shared by the tokenizer, literal grammar and expression
//! parser.
//!
//! A rule that simply does not match reports `Ok(None)` to its caller; the
//! types here are reserved for input that is genuinely malformed, or for a
//! constructor that was handed nothing to work with.

use thiserror::Error;

/// Malformed input detected once a grammar rule has committed to a
/// production.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxError {
    /// End of input was reached before the closing quote.
    #[error("unterminated string literal")]
    UnterminatedString,
    /// A numeric literal contained a second decimal point.
    #[error("multiple decimal points in numeric literal")]
    MultipleDecimalPoints,
    /// A literal started like `true`/`false` but spelled something else.
    #[error("expected '{expected}', found '{found}'")]
    InvalidBooleanLiteral { expected: bool, found: String },
    /// A character that no rule at this position accepts.
    #[error("unexpected character '{0}'")]
    UnexpectedCharacter(char),
    /// A required delimiter was missing.
    #[error("expected '{0}'")]
    ExpectedChar(char),
    /// A required syntactic element (such as a key or a value) was missing.
    #[error("expected {0}")]
    ExpectedToken(&'static str),
    /// A call named a function that is not registered.
    #[error("unknown function '{0}'")]
    UnknownFunction(String),
    /// A call passed too few or too many arguments.
    #[error("function '{name}' accepts {min}..={max} arguments, got {found}")]
    ArgumentCountOutOfRange {
        name: String,
        found: usize,
        min: usize,
        max: usize,
    },
    /// The divisor of a division was exactly zero.
    #[error("cannot divide by zero")]
    DivideByZero,
    /// Neither a number nor an identifier was found where a term was needed.
    #[error("expected a number, variable, function call or group")]
    MissingTerm,
}

/// Crate-level error for operations that open input as well as parse it.
#[derive(Debug, Error)]
pub enum Error {
    /// A required input (such as a readable character source) was missing.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// The input could be read but did not parse.
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
}
