//! Error types for the trama pipeline.

use thiserror::Error;

/// Result type alias using trama's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for trama operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid input (unreadable transcript, empty text after cleaning)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration error (missing credential, bad threshold)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Linguistic analysis failed
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Inference/generation failed
    #[error("Inference error: {0}")]
    Inference(String),

    /// Relation extraction failed
    #[error("Extraction error: {0}")]
    Extraction(String),

    /// No concept survived frequency thresholding; a graph with zero nodes
    /// is not a valid output.
    #[error("No concepts survived thresholding (min_freq={min_freq}); relax --min-freq or --fuzzy-threshold")]
    NoConcepts {
        /// The minimum-frequency cutoff that was in effect.
        min_freq: u32,
    },

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// HTTP/network request failed
    #[error("Request error: {0}")]
    Request(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// File I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Request(e.to_string())
    }
}
