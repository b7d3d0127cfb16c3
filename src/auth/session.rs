//! In-memory session state shared across the client

use std::sync::{Arc, Mutex};

use super::types::User;

/// The single source of truth for "who is signed in".
///
/// A cheaply cloneable handle over shared state, so every sub-client and
/// the route guard observe the same session. Writable only through the auth
/// gateway operations and sign-out; every write replaces the whole user.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    current: Arc<Mutex<Option<User>>>,
}

impl SessionContext {
    /// Create an empty (signed-out) session
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the current user, if any
    pub fn current_user(&self) -> Option<User> {
        let current = self.current.lock().unwrap();
        current.clone()
    }

    /// Whether a user is signed in.
    ///
    /// Always derived from the presence of a current user, never stored
    /// separately.
    pub fn is_authenticated(&self) -> bool {
        let current = self.current.lock().unwrap();
        current.is_some()
    }

    /// Replace the current user
    pub(crate) fn replace(&self, user: User) {
        let mut current = self.current.lock().unwrap();
        *current = Some(user);
    }

    /// Drop the current user
    pub(crate) fn clear(&self) {
        let mut current = self.current.lock().unwrap();
        *current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: 1,
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            company_name: String::new(),
            creation_date: String::new(),
            profile_picture_path: String::new(),
            preferences: String::new(),
            token: "tok".to_string(),
        }
    }

    #[test]
    fn authenticated_tracks_current_user() {
        let session = SessionContext::new();
        assert!(!session.is_authenticated());
        assert_eq!(session.current_user(), None);

        session.replace(sample_user());
        assert!(session.is_authenticated());
        assert_eq!(session.current_user().map(|u| u.id), Some(1));

        session.clear();
        assert!(!session.is_authenticated());
        assert_eq!(session.current_user(), None);
    }

    #[test]
    fn clones_observe_the_same_session() {
        let session = SessionContext::new();
        let observer = session.clone();

        session.replace(sample_user());

        assert!(observer.is_authenticated());
    }
}
