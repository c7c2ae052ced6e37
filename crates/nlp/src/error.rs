//! NLP pipeline error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum NlpError {
    #[error("NLP worker error: {0}")]
    Worker(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, NlpError>;
