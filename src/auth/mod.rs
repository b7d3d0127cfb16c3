//! Authentication gateway and session lifecycle

mod registration;
mod session;
mod types;

use reqwest::{Client, multipart};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

use crate::config::ClientOptions;
use crate::error::Error;
use crate::fetch::Fetch;
use crate::store::SessionStore;

pub use registration::*;
pub use session::*;
pub use types::*;

/// Profile-update request body; the id is required by the route and is
/// always the session user's id.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ProfileUpdateBody<'a> {
    id: u64,
    #[serde(flatten)]
    update: &'a ProfileUpdate,
}

/// Client for authentication and profile management.
///
/// All operations normalize the backend's response into the canonical
/// [`User`] record and write it through to the session context and the
/// session store. Expected failures (rejected credentials, validation
/// rejections, an unreachable backend) come back as `Err` values with
/// displayable messages; nothing here panics on them.
pub struct Auth {
    /// The backend base URL
    url: String,

    /// HTTP client used for requests
    client: Client,

    /// The shared session state
    session: SessionContext,

    /// Persistent session storage
    store: Arc<SessionStore>,

    /// Client options
    options: ClientOptions,
}

impl Auth {
    /// Create a new Auth client
    pub(crate) fn new(
        url: &str,
        client: Client,
        session: SessionContext,
        store: Arc<SessionStore>,
        options: ClientOptions,
    ) -> Self {
        Self {
            url: url.to_string(),
            client,
            session,
            store,
            options,
        }
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}{}{}", self.url, self.options.api_prefix, path)
    }

    /// The shared session context
    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    /// Start a registration flow
    pub fn registration(&self) -> RegistrationFlow<'_> {
        RegistrationFlow::new(self)
    }

    /// Sign in with email and password.
    ///
    /// A 2xx response without a user id is a contract violation: it fails
    /// with a diagnostic naming the payload that did arrive, and the store
    /// is left untouched so no ghost session is ever persisted.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<User, Error> {
        let url = self.api_url("/auth/signin");

        let mut body = HashMap::new();
        body.insert("email".to_string(), email.to_string());
        body.insert("password".to_string(), password.to_string());

        let value: serde_json::Value = Fetch::post(&self.client, &url)
            .json(&body)?
            .execute()
            .await?;

        let response: AuthResponse = serde_json::from_value(value.clone())?;

        let id = match response.id {
            Some(id) => id,
            None => {
                return Err(Error::auth(format!(
                    "sign-in response carries no user id: {}",
                    value
                )));
            }
        };

        let user = response.canonical_user(id, email, "");
        self.persist(&user)?;

        Ok(user)
    }

    /// Register a new account.
    ///
    /// The id may arrive under `id` or `userId` depending on the backend
    /// code path; both are checked, and a response carrying neither fails
    /// with a diagnostic.
    pub async fn sign_up(&self, request: &SignUpRequest) -> Result<User, Error> {
        let url = self.api_url("/auth/signup");

        let value: serde_json::Value = Fetch::post(&self.client, &url)
            .json(request)?
            .execute()
            .await?;

        let response: AuthResponse = serde_json::from_value(value.clone())?;

        let id = match response.id.or(response.user_id) {
            Some(id) => id,
            None => {
                return Err(Error::auth(format!(
                    "sign-up response carries no user id: {}",
                    value
                )));
            }
        };

        let user = response.canonical_user(id, &request.email, "");
        self.persist(&user)?;

        Ok(user)
    }

    /// Request a verification code to be emailed to `email`
    pub async fn send_verification_code(&self, email: &str) -> Result<(), Error> {
        let url = self.api_url("/auth/send-verification");

        let mut body = HashMap::new();
        body.insert("email".to_string(), email.to_string());

        Fetch::post(&self.client, &url).json(&body)?.send().await?;

        Ok(())
    }

    /// Check a verification code against the backend
    pub async fn verify_code(&self, email: &str, code: &str) -> Result<(), Error> {
        let url = self.api_url("/auth/verify-code");

        let mut body = HashMap::new();
        body.insert("email".to_string(), email.to_string());
        body.insert("code".to_string(), code.to_string());

        Fetch::post(&self.client, &url).json(&body)?.send().await?;

        Ok(())
    }

    /// Update the current user's profile.
    ///
    /// Requires an authenticated session; fails without issuing the request
    /// otherwise. The returned user replaces the session, with the token
    /// preserved from the current session when the response omits it.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<User, Error> {
        let current = self
            .session
            .current_user()
            .ok_or_else(|| Error::auth("no authenticated session"))?;

        let url = self.api_url(&format!("/users/{}/profile", current.id));
        let body = ProfileUpdateBody {
            id: current.id,
            update,
        };

        let value: serde_json::Value = Fetch::put(&self.client, &url)
            .bearer_auth(&current.token)
            .json(&body)?
            .execute()
            .await?;

        let response: AuthResponse = serde_json::from_value(value)?;
        let id = response.id.unwrap_or(current.id);
        let user = response.canonical_user(id, &current.email, &current.token);
        self.persist(&user)?;

        Ok(user)
    }

    /// Upload a new profile picture.
    ///
    /// Sends a multipart body containing only the file; same precondition
    /// and write-back as [`update_profile`](Auth::update_profile).
    pub async fn upload_profile_picture(
        &self,
        file_name: &str,
        file_data: Vec<u8>,
    ) -> Result<User, Error> {
        let current = self
            .session
            .current_user()
            .ok_or_else(|| Error::auth("no authenticated session"))?;

        let url = self.api_url(&format!("/users/{}/profile-picture", current.id));

        let form = multipart::Form::new().part(
            "file",
            multipart::Part::bytes(file_data).file_name(file_name.to_string()),
        );

        log::debug!("PUT {}", url);

        let response = self
            .client
            .put(&url)
            .bearer_auth(&current.token)
            .multipart(form)
            .send()
            .await
            .map_err(Error::Connection)?;

        if !response.status().is_success() {
            let status = response.status();
            let message = response.text().await.map_err(Error::Connection)?;
            return Err(Error::Api { status, message });
        }

        let value: serde_json::Value = response.json().await.map_err(Error::Connection)?;
        let parsed: AuthResponse = serde_json::from_value(value)?;
        let id = parsed.id.unwrap_or(current.id);
        let user = parsed.canonical_user(id, &current.email, &current.token);
        self.persist(&user)?;

        Ok(user)
    }

    /// Unconditionally replace the session user and re-persist it.
    ///
    /// Not a merge: callers supply the complete record.
    pub fn update_user(&self, user: User) -> Result<(), Error> {
        self.persist(&user)
    }

    /// Sign out, clearing the session context and the store.
    ///
    /// Idempotent: signing out while already signed out still clears the
    /// store without error. Callers are expected to treat this as a full
    /// teardown and navigate back to the login view afterwards.
    pub fn sign_out(&self) {
        self.session.clear();
        self.store.clear();
    }

    fn persist(&self, user: &User) -> Result<(), Error> {
        if self.options.persist_session {
            self.store.save(user)?;
        }
        self.session.replace(user.clone());
        Ok(())
    }
}
