//! Configuration options for the WIP client

use std::time::Duration;

/// Configuration options for the WIP client
///
/// The backend base URL is a constructor argument on
/// [`WipClient`](crate::WipClient), not an option: there is no sensible
/// default for it.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Path prefix the backend mounts its API under
    pub api_prefix: String,

    /// Whether auth operations write the session through to the store
    pub persist_session: bool,

    /// The request timeout
    pub request_timeout: Option<Duration>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            api_prefix: "/api".to_string(),
            persist_session: true,
            request_timeout: Some(Duration::from_secs(30)),
        }
    }
}

impl ClientOptions {
    /// Set the API path prefix
    pub fn with_api_prefix(mut self, value: &str) -> Self {
        self.api_prefix = value.to_string();
        self
    }

    /// Set whether to persist the session
    pub fn with_persist_session(mut self, value: bool) -> Self {
        self.persist_session = value;
        self
    }

    /// Set the request timeout
    pub fn with_request_timeout(mut self, value: Option<Duration>) -> Self {
        self.request_timeout = value;
        self
    }
}
