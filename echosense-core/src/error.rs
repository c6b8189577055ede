//! Error types for echosense-core

use thiserror::Error;

/// Main error type for the echosense-core library
#[derive(Error, Debug)]
pub enum Error {
    /// A backend request failed.
    ///
    /// Displays exactly the message: the backend's `detail`, `HTTP <status>`,
    /// or the transport/decode failure description.
    #[error("{0}")]
    Request(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Message carried by a request failure, or the display text otherwise
    pub fn message(&self) -> String {
        match self {
            Error::Request(msg) => msg.clone(),
            other => other.to_string(),
        }
    }
}

/// Result type alias for echosense-core
pub type Result<T> = std::result::Result<T, Error>;
