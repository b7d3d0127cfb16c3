//! Error handling for the WIP client

use std::fmt;
use thiserror::Error;

/// Unified error type for the WIP client
///
/// Expected failure modes (rejected credentials, validation failures,
/// unreachable backend) are all represented here as values; no operation in
/// this crate panics on them.
#[derive(Error, Debug)]
pub enum Error {
    /// The request never reached the server or the transport failed.
    ///
    /// The display form is deliberately generic; transport detail stays in
    /// `source()` and never becomes part of a user-facing message.
    #[error("connection error")]
    Connection(#[source] reqwest::Error),

    /// The backend answered with a non-2xx status. `message` is the response
    /// body text, passed through verbatim.
    #[error("{message}")]
    Api {
        status: reqwest::StatusCode,
        message: String,
    },

    /// Authentication errors, including contract violations in auth
    /// responses (e.g. a 200 body with no user id)
    #[error("authentication error: {0}")]
    Auth(String),

    /// Client-side validation failures, detected before any network call
    #[error("validation error: {0}")]
    Validation(String),

    /// JSON serialization or deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing errors
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// General errors
    #[error("{0}")]
    General(String),
}

impl Error {
    /// Create a new authentication error
    pub fn auth<T: fmt::Display>(msg: T) -> Self {
        Error::Auth(msg.to_string())
    }

    /// Create a new validation error
    pub fn validation<T: fmt::Display>(msg: T) -> Self {
        Error::Validation(msg.to_string())
    }

    /// Create a new general error
    pub fn general<T: fmt::Display>(msg: T) -> Self {
        Error::General(msg.to_string())
    }
}
