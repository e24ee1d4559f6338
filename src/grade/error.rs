use thiserror::Error;

use crate::error::SyntaxError;
use crate::json::JsonError;

/// Failures of the grade solver.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GradeError {
    /// No grade has the requested name.
    #[error("unknown grade '{0}'")]
    UnknownGrade(String),
    /// The average formula parsed but is not a valid weighted average.
    #[error("invalid average expression: {0}")]
    InvalidExpression(String),
    /// A formula term had neither a sub-formula nor a variable name.
    #[error("a variable is needed here")]
    MissingVariable,
    /// The grade to solve for has zero weighting.
    #[error("grade '{0}' has zero weighting")]
    ZeroWeighting(String),
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    #[error(transparent)]
    Json(#[from] JsonError),
}
