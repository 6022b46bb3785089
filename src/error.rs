use std::path::PathBuf;
use thiserror::Error;

/// A stat string that is not a decimal numeral once commas and a `K`/`M`
/// suffix are stripped.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Malformed stat value: {input:?}")]
pub struct ParseError {
    pub input: String,
}

#[derive(Error, Debug)]
pub enum VoteError {
    #[error("Unknown candidate: {0}")]
    UnknownCandidate(String),

    #[error("Store error: {0}")]
    Store(#[from] sqlx::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Environment variable {0} is not set")]
    MissingVar(&'static str),

    #[error("Invalid {key} value: {reason}")]
    InvalidVar { key: &'static str, reason: String },

    #[error("Failed to read candidate file {path}: {source}")]
    CandidateFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Malformed candidate file: {0}")]
    CandidateJson(#[from] serde_json::Error),

    #[error("Candidate roster is empty")]
    EmptyRoster,

    #[error("Candidate roster has {count} entries, at most {max} fit on the dashboard")]
    TooManyCandidates { count: usize, max: usize },

    #[error("Duplicate candidate name: {0}")]
    DuplicateCandidate(String),
}
