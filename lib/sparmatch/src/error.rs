use oxmem::Variable;

/// An error raised while evaluating an expression against one solution.
///
/// Most expression errors are scoped to the solution they were raised for:
/// a `FILTER` or `BIND` that fails drops that solution and evaluation goes on.
/// Only [`ExpressionError::InvalidRegex`] is structural and aborts the query.
#[derive(Debug, Clone, thiserror::Error)]
#[non_exhaustive]
pub enum ExpressionError {
    /// The expression reads a variable the current solution does not bind.
    #[error("the variable {0} is not bound in the current solution")]
    UnresolvedVariable(Variable),
    /// The expression was applied to terms outside of its domain,
    /// like comparing an IRI with a number.
    #[error("the expression was applied to terms it is not defined for")]
    Type,
    /// The pattern argument of `REGEX` is not a valid regular expression.
    #[error("invalid regular expression: {0}")]
    InvalidRegex(#[from] regex::Error),
}

/// An error raised during query evaluation.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum QueryEvaluationError {
    /// A `REGEX` pattern failed to compile. Unlike per-solution expression
    /// errors this is a defect of the query itself and aborts evaluation.
    #[error("invalid regular expression: {0}")]
    InvalidRegex(regex::Error),
}

impl From<QueryEvaluationError> for ExpressionError {
    #[inline]
    fn from(error: QueryEvaluationError) -> Self {
        match error {
            QueryEvaluationError::InvalidRegex(e) => Self::InvalidRegex(e),
        }
    }
}
