//! Crate-level error type for startup and server paths
//!
//! Request handling has its own envelope-producing error,
//! [`ListError`](crate::listing::ListError); this type covers everything that
//! happens before and around the router.

use thiserror::Error;

use crate::store::StoreError;

/// Service errors
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(Box<figment::Error>),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Store error outside a request (e.g. seeding)
    #[error("{0}")]
    Store(#[from] StoreError),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Error::Config(Box::new(err))
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
