// File: src/error.rs
// The four conditions that abort a parse or a check. Everything row-level
// (bad dates, unknown enum codes, duplicate links) is tallied into the
// result's `dq` counters instead of being raised.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Malformed XER grammar: a `%F` before any `%T`, or a `%R` before `%F`.
    #[error("XER structure error at line {line}: {message}")]
    ParseStructure { line: usize, message: String },

    /// The XML document could not be parsed at all.
    #[error("malformed P6 XML: {0}")]
    MalformedXml(String),

    /// The requested project id is absent from the PROJECT table.
    #[error("project {proj_id} not found in PROJECT table")]
    ProjectNotFound { proj_id: i64 },

    /// The PROJECT row has no parseable data-date candidate.
    #[error("project {proj_id} has no parseable data date")]
    InvalidDataDate { proj_id: i64 },

    /// Failure surfaced by an external table store implementation.
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
