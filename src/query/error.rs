//! Error type for path-query evaluation.
//!
//! Query errors are produced by the evaluator and propagated to callers
//! without translation by the model types.

/// Errors raised while evaluating a path expression against a data tree.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    /// A path step was applied to a node it cannot descend into
    #[error("step {step} cannot be applied to a {kind} node")]
    TypeMismatch {
        /// Description of the offending step
        step: String,
        /// Kind of node the step was applied to
        kind: &'static str,
    },

    /// An index step was applied to a node that is not a sequence
    #[error("index {index} applied to a {kind} node")]
    IndexOnNonSequence {
        /// The requested index
        index: usize,
        /// Kind of node the index was applied to
        kind: &'static str,
    },

    /// A predicate was attached to an expression with no record-shaped matches
    #[error("predicate references field '{field}' but matched nodes are not mappings")]
    PredicateOnScalar {
        /// Field the predicate refers to
        field: String,
    },
}

/// Result type for query evaluation
pub type QueryResult<T> = std::result::Result<T, QueryError>;
