//! Error types shared by the shape compiler, the scope rewriter and the
//! engine binding.

use crate::named_nodes::Vocabulary;
use thiserror::Error;

/// Result type for graphexpect operations
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The target store lacks the SHACL validation procedures.
    #[error("the DB does not have the n10s validation module installed")]
    MissingValidationModule,

    /// The deploy call reported zero shapes.
    #[error("there was a problem deploying the expectations to the DB: {deployed} shapes deployed from {triples} triples")]
    DeploymentFailed { deployed: usize, triples: usize },

    #[error("'{name}' is not a valid local name in the {vocabulary} vocabulary")]
    InvalidLocalName {
        vocabulary: Vocabulary,
        name: String,
    },

    #[error("selection query has no RETURN clause")]
    MissingReturnClause,

    #[error("selection query has {0} RETURN clauses, expected exactly one")]
    MultipleReturnClauses(usize),

    /// The RETURN clause does not project a single expression.
    #[error("unsupported projection: {0}")]
    UnsupportedProjection(String),

    #[error("failed to serialize constraint document: {0}")]
    Serialization(String),

    #[error("failed to parse constraint document: {0}")]
    Parse(String),

    /// Error raised by the validation engine, formatted at the boundary.
    #[error("validation engine error: {0}")]
    Engine(String),

    #[error("invalid suite definition: {0}")]
    Definition(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Definition(e.to_string())
    }
}
