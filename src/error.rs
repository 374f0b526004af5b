//! Error types shared by the API client and configuration.

use thiserror::Error;

/// Transport and decoding failures talking to the quiz server.
///
/// Business outcomes (`error` / `taken` fields in a well-formed body) are not
/// errors; they are decoded into the outcome enums in [`crate::models`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server responded with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("server rejected the request: {0}")]
    Rejected(String),
    #[error("invalid request url: {0}")]
    InvalidUrl(String),
}

/// Invalid command line or environment configuration.
#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("server url must start with http:// or https://, got {0:?}")]
    ServerUrl(String),
    #[error("time limit must be at least one second")]
    TimeLimit,
    #[error("max attempts must be at least one")]
    MaxAttempts,
    #[error("course path must look like /course/<id>, got {0:?}")]
    CoursePath(String),
    #[error("course id must not be empty")]
    EmptyCourse,
    #[error("--course and --course-path cannot be combined")]
    ConflictingCourse,
}
