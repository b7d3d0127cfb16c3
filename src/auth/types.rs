//! Types for authentication and profile management

use serde::{Deserialize, Serialize};

/// The canonical user record.
///
/// This is the shape the auth gateway guarantees regardless of backend
/// response variance: every optional field is defaulted to an empty string
/// at the normalization boundary, so no consumer ever sees an absent field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// The backend-assigned user ID
    pub id: u64,

    /// Display name
    pub name: String,

    /// Email address, the login key
    pub email: String,

    /// Company name, empty when not provided
    pub company_name: String,

    /// Company founding date (not account creation), empty when not provided
    pub creation_date: String,

    /// Opaque reference to a server-held profile image, empty when not set
    pub profile_picture_path: String,

    /// Free-form preferences string, empty when not set
    pub preferences: String,

    /// Server-issued bearer token
    pub token: String,
}

/// Raw auth response as the backend sends it.
///
/// Every field is optional here; the backend is inconsistent about which
/// fields it includes (and the user id may arrive as `id` or `userId`).
/// [`canonical_user`](AuthResponse::canonical_user) normalizes this into a
/// [`User`] once the id has been established.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AuthResponse {
    pub id: Option<u64>,
    pub user_id: Option<u64>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub company_name: Option<String>,
    pub creation_date: Option<String>,
    pub profile_picture_path: Option<String>,
    pub preferences: Option<String>,
    pub token: Option<String>,
}

impl AuthResponse {
    /// Normalize into the canonical record, defaulting every absent field.
    ///
    /// The email falls back to the address the caller submitted and the
    /// token to the one already held, so a response that omits either never
    /// degrades the session.
    pub(crate) fn canonical_user(self, id: u64, fallback_email: &str, fallback_token: &str) -> User {
        User {
            id,
            name: self.name.unwrap_or_default(),
            email: self.email.unwrap_or_else(|| fallback_email.to_string()),
            company_name: self.company_name.unwrap_or_default(),
            creation_date: self.creation_date.unwrap_or_default(),
            profile_picture_path: self.profile_picture_path.unwrap_or_default(),
            preferences: self.preferences.unwrap_or_default(),
            token: self.token.unwrap_or_else(|| fallback_token.to_string()),
        }
    }
}

/// Registration request, carrying all six fields the backend expects
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    /// Display name
    pub name: String,

    /// Email address
    pub email: String,

    /// Password
    pub password: String,

    /// The 6-digit code previously verified against the backend
    pub verification_code: String,

    /// Company name
    pub company_name: String,

    /// Company founding date, `YYYY-MM-DD`
    pub creation_date: String,
}

/// Profile fields sent to the profile-update endpoint.
///
/// The user id is injected by the gateway from the current session; callers
/// only supply the editable fields.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    /// Display name
    pub name: String,

    /// Email address
    pub email: String,

    /// Company name
    pub company_name: String,

    /// Free-form preferences string
    pub preferences: String,

    /// New password, omitted from the request when not being changed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Company founding date
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creation_date: Option<String>,

    /// Opaque reference to a server-held profile image
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_picture_path: Option<String>,
}
