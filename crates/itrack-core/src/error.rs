//! Error types for itrack
//!
//! Domain variants render exactly as the `error` string clients receive.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("required field(s) missing")]
    RequiredFieldsMissing,

    #[error("missing _id")]
    MissingId,

    #[error("no update field(s) sent")]
    NoUpdateFields { id: String },

    #[error("could not update")]
    CouldNotUpdate { id: String },

    #[error("could not delete")]
    CouldNotDelete { id: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    Config(String),
}

impl Error {
    /// The issue id to echo back alongside the error, if any
    pub fn id(&self) -> Option<&str> {
        match self {
            Error::NoUpdateFields { id }
            | Error::CouldNotUpdate { id }
            | Error::CouldNotDelete { id } => Some(id),
            _ => None,
        }
    }

    /// Whether this is a request-level outcome rather than an internal failure
    pub fn is_domain(&self) -> bool {
        !matches!(self, Error::Io(_) | Error::Config(_))
    }
}
