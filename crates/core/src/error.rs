use crate::analyzer::ContentAnalyzerKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CheckerError {
    /// Bad binding or strategy configuration, caught before any query runs.
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("index error: {0}")]
    Index(#[from] index::IndexError),
    /// A request reached the checker without a paragraph. The core API
    /// takes `&str`, so this is raised by request-parsing layers.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
    /// One strategy's task failed during a parallel check; the whole query
    /// is aborted.
    #[error("strategy {kind} failed: {message}")]
    Strategy {
        kind: ContentAnalyzerKind,
        message: String,
    },
}
