//! WIP Rust Client Library
//!
//! A Rust client library for the WIP (Work In Progress) small-business
//! management backend, providing authentication and session lifecycle,
//! inventory tracking, supplier registration, order placement and profile
//! management over HTTP/JSON.

pub mod auth;
pub mod config;
pub mod error;
pub mod fetch;
pub mod guard;
pub mod orders;
pub mod products;
pub mod store;
pub mod suppliers;

use std::sync::Arc;

use reqwest::Client;

use crate::auth::{Auth, SessionContext};
use crate::config::ClientOptions;
use crate::error::Error;
use crate::guard::View;
use crate::orders::OrdersClient;
use crate::products::ProductsClient;
use crate::store::{KvStore, MemoryStore, SessionStore};
use crate::suppliers::SuppliersClient;

/// Environment variable holding the backend base URL
const API_URL_VAR: &str = "WIP_API_URL";

/// The main entry point for the WIP client.
///
/// Owns one HTTP client and the session state; the per-concern sub-clients
/// it hands out all share both. The session is restored from the store once,
/// at construction.
pub struct WipClient {
    /// The backend base URL
    url: String,

    /// HTTP client used for requests
    http_client: Client,

    /// Client options
    options: ClientOptions,

    /// Persistent session storage
    store: Arc<SessionStore>,

    /// The shared session state
    session: SessionContext,

    /// Auth client for sign-in, registration and profile management
    auth: Auth,
}

impl WipClient {
    /// Create a new client with an in-memory session store.
    ///
    /// # Example
    ///
    /// ```
    /// use wip_client::WipClient;
    ///
    /// let client = WipClient::new("http://localhost:8080");
    /// ```
    pub fn new(url: &str) -> Self {
        Self::new_with_options(url, ClientOptions::default())
    }

    /// Create a new client with custom options
    ///
    /// # Example
    ///
    /// ```
    /// use wip_client::{WipClient, config::ClientOptions};
    ///
    /// let options = ClientOptions::default().with_persist_session(false);
    /// let client = WipClient::new_with_options("http://localhost:8080", options);
    /// ```
    pub fn new_with_options(url: &str, options: ClientOptions) -> Self {
        Self::new_with_store(url, Box::new(MemoryStore::new()), options)
    }

    /// Create a new client over the given session storage medium.
    ///
    /// Any session the store already holds is restored here, before the
    /// constructor returns; there is no window in which the session reads
    /// as signed-out while a restore is still pending.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use wip_client::{WipClient, config::ClientOptions, store::FileStore};
    ///
    /// let store = FileStore::open("session.json");
    /// let client = WipClient::new_with_store(
    ///     "http://localhost:8080",
    ///     Box::new(store),
    ///     ClientOptions::default(),
    /// );
    /// ```
    pub fn new_with_store(url: &str, store: Box<dyn KvStore>, options: ClientOptions) -> Self {
        let url = url.trim_end_matches('/').to_string();

        let http_client = match options.request_timeout {
            Some(timeout) => Client::builder()
                .timeout(timeout)
                .build()
                .expect("failed to build HTTP client"),
            None => Client::new(),
        };

        let store = Arc::new(SessionStore::new(store));
        let session = SessionContext::new();
        if let Some(user) = store.load() {
            session.replace(user);
        }

        let auth = Auth::new(
            &url,
            http_client.clone(),
            session.clone(),
            store.clone(),
            options.clone(),
        );

        Self {
            url,
            http_client,
            options,
            store,
            session,
            auth,
        }
    }

    /// Create a new client from the `WIP_API_URL` environment variable
    pub fn from_env() -> Result<Self, Error> {
        let url = std::env::var(API_URL_VAR)
            .map_err(|_| Error::general(format!("{} is not set", API_URL_VAR)))?;

        Ok(Self::new(&url))
    }

    /// Get a reference to the auth client for sign-in, registration and
    /// profile management
    pub fn auth(&self) -> &Auth {
        &self.auth
    }

    /// Get a reference to the shared session context
    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    /// Get a reference to the persistent session store
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Create a new ProductsClient for inventory operations
    pub fn products(&self) -> ProductsClient {
        ProductsClient::new(&self.url, &self.options.api_prefix, self.http_client.clone())
    }

    /// Create a new SuppliersClient for supplier operations
    pub fn suppliers(&self) -> SuppliersClient {
        SuppliersClient::new(&self.url, &self.options.api_prefix, self.http_client.clone())
    }

    /// Create a new OrdersClient for order operations
    pub fn orders(&self) -> OrdersClient {
        OrdersClient::new(&self.url, &self.options.api_prefix, self.http_client.clone())
    }

    /// Resolve a navigation request against the current session.
    ///
    /// # Example
    ///
    /// ```
    /// use wip_client::{WipClient, guard::View};
    ///
    /// let client = WipClient::new("http://localhost:8080");
    /// assert_eq!(client.resolve_view(View::Stock), View::Landing);
    /// ```
    pub fn resolve_view(&self, requested: View) -> View {
        guard::resolve(requested, self.session.is_authenticated())
    }
}

/// A convenience module for common imports
pub mod prelude {
    pub use crate::WipClient;
    pub use crate::auth::User;
    pub use crate::config::ClientOptions;
    pub use crate::error::Error;
    pub use crate::guard::View;
}
