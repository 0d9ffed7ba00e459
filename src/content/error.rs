//! Errors raised while reading notes

use thiserror::Error;

/// Failures the content layer reports to its callers
#[derive(Error, Debug)]
pub enum ContentError {
    #[error("Malformed front-matter: {0}")]
    MalformedFrontMatter(#[from] serde_yaml::Error),

    #[error("Path escapes the content root: {0}")]
    OutsideRoot(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
