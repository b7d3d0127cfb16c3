//! Multi-step registration flow

use crate::error::Error;

use super::types::{SignUpRequest, User};
use super::Auth;

/// Fields collected by the first registration step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicInfo {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Where a registration flow currently stands.
///
/// One variant per step, carrying exactly the data that step has collected,
/// so a half-filled registration is unrepresentable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationState {
    /// Collecting name, email and password
    CollectingBasicInfo,

    /// A verification code has been emailed and is awaited
    AwaitingVerificationCode { info: BasicInfo },

    /// The code checked out; collecting company name and founding date
    CollectingCompanyInfo { info: BasicInfo, code: String },

    /// Registration finished and the session is established
    Complete { user: User },
}

/// Drives a registration through its steps.
///
/// Each `submit_*` operation validates its step's input client-side before
/// any network call, advances the state on success, and fails without I/O
/// when called in the wrong state. Backward transitions via
/// [`back`](RegistrationFlow::back) are unrestricted.
pub struct RegistrationFlow<'a> {
    auth: &'a Auth,
    state: RegistrationState,
}

impl<'a> RegistrationFlow<'a> {
    pub(super) fn new(auth: &'a Auth) -> Self {
        Self {
            auth,
            state: RegistrationState::CollectingBasicInfo,
        }
    }

    /// The current step
    pub fn state(&self) -> &RegistrationState {
        &self.state
    }

    /// Submit the basic info, request a verification code, and advance.
    ///
    /// Name, email and password must be non-empty and the confirmation must
    /// match the password.
    pub async fn submit_basic_info(
        &mut self,
        name: &str,
        email: &str,
        password: &str,
        confirm_password: &str,
    ) -> Result<(), Error> {
        if !matches!(self.state, RegistrationState::CollectingBasicInfo) {
            return Err(Error::validation("basic info was already submitted"));
        }

        let name = name.trim();
        let email = email.trim();
        if name.is_empty() || email.is_empty() || password.trim().is_empty() {
            return Err(Error::validation("name, email and password are required"));
        }
        if password != confirm_password {
            return Err(Error::validation("passwords do not match"));
        }

        self.auth.send_verification_code(email).await?;

        self.state = RegistrationState::AwaitingVerificationCode {
            info: BasicInfo {
                name: name.to_string(),
                email: email.to_string(),
                password: password.to_string(),
            },
        };

        Ok(())
    }

    /// Submit the emailed verification code and advance.
    ///
    /// The code must be exactly 6 ASCII digits; anything else is rejected
    /// before the backend is asked. The verified code is carried forward,
    /// as the final registration posts it again.
    pub async fn submit_code(&mut self, code: &str) -> Result<(), Error> {
        let info = match &self.state {
            RegistrationState::AwaitingVerificationCode { info } => info.clone(),
            _ => return Err(Error::validation("not awaiting a verification code")),
        };

        let code = code.trim();
        if code.len() != 6 || !code.chars().all(|c| c.is_ascii_digit()) {
            return Err(Error::validation("verification code must be 6 digits"));
        }

        self.auth.verify_code(&info.email, code).await?;

        self.state = RegistrationState::CollectingCompanyInfo {
            info,
            code: code.to_string(),
        };

        Ok(())
    }

    /// Submit the company info and complete the registration.
    ///
    /// Issues exactly one sign-up request carrying all six collected fields;
    /// on success the session is established and the flow is complete.
    pub async fn submit_company_info(
        &mut self,
        company_name: &str,
        creation_date: &str,
    ) -> Result<User, Error> {
        let (info, code) = match &self.state {
            RegistrationState::CollectingCompanyInfo { info, code } => {
                (info.clone(), code.clone())
            }
            _ => return Err(Error::validation("not collecting company info")),
        };

        let company_name = company_name.trim();
        let creation_date = creation_date.trim();
        if company_name.is_empty() || creation_date.is_empty() {
            return Err(Error::validation(
                "company name and creation date are required",
            ));
        }

        let request = SignUpRequest {
            name: info.name,
            email: info.email,
            password: info.password,
            verification_code: code,
            company_name: company_name.to_string(),
            creation_date: creation_date.to_string(),
        };

        let user = self.auth.sign_up(&request).await?;
        self.state = RegistrationState::Complete { user: user.clone() };

        Ok(user)
    }

    /// Step back, keeping the data the earlier step had collected
    pub fn back(&mut self) {
        let state = std::mem::replace(&mut self.state, RegistrationState::CollectingBasicInfo);
        self.state = match state {
            RegistrationState::AwaitingVerificationCode { .. } => {
                RegistrationState::CollectingBasicInfo
            }
            RegistrationState::CollectingCompanyInfo { info, .. } => {
                RegistrationState::AwaitingVerificationCode { info }
            }
            other => other,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientOptions;
    use crate::store::{MemoryStore, SessionStore};
    use crate::auth::SessionContext;
    use std::sync::Arc;

    // Points at a closed port: any attempted request would surface as a
    // connection error, so a validation error proves no I/O happened.
    fn auth() -> Auth {
        Auth::new(
            "http://127.0.0.1:1",
            reqwest::Client::new(),
            SessionContext::new(),
            Arc::new(SessionStore::new(Box::new(MemoryStore::new()))),
            ClientOptions::default(),
        )
    }

    fn info() -> BasicInfo {
        BasicInfo {
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            password: "secret".to_string(),
        }
    }

    #[tokio::test]
    async fn empty_fields_are_rejected_before_any_request() {
        let auth = auth();
        let mut flow = auth.registration();

        let err = flow
            .submit_basic_info("", "ana@example.com", "secret", "secret")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(flow.state(), &RegistrationState::CollectingBasicInfo);
    }

    #[tokio::test]
    async fn mismatched_passwords_are_rejected() {
        let auth = auth();
        let mut flow = auth.registration();

        let err = flow
            .submit_basic_info("Ana", "ana@example.com", "secret", "other")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[tokio::test]
    async fn malformed_codes_are_rejected_before_any_request() {
        let auth = auth();
        let mut flow = auth.registration();
        flow.state = RegistrationState::AwaitingVerificationCode { info: info() };

        for code in ["12345", "1234567", "12a456", ""] {
            let err = flow.submit_code(code).await.unwrap_err();
            assert!(matches!(err, Error::Validation(_)), "code {:?}", code);
        }
    }

    #[tokio::test]
    async fn transitions_in_the_wrong_state_fail_without_io() {
        let auth = auth();
        let mut flow = auth.registration();

        let err = flow.submit_code("123456").await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        let err = flow
            .submit_company_info("Acme", "2020-01-01")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[tokio::test]
    async fn empty_company_info_is_rejected() {
        let auth = auth();
        let mut flow = auth.registration();
        flow.state = RegistrationState::CollectingCompanyInfo {
            info: info(),
            code: "123456".to_string(),
        };

        let err = flow.submit_company_info("", "2020-01-01").await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn back_preserves_data_the_earlier_step_carries() {
        let auth = auth();
        let mut flow = auth.registration();
        flow.state = RegistrationState::CollectingCompanyInfo {
            info: info(),
            code: "123456".to_string(),
        };

        flow.back();
        assert_eq!(
            flow.state(),
            &RegistrationState::AwaitingVerificationCode { info: info() }
        );

        flow.back();
        assert_eq!(flow.state(), &RegistrationState::CollectingBasicInfo);

        // Already at the first step: stays put
        flow.back();
        assert_eq!(flow.state(), &RegistrationState::CollectingBasicInfo);
    }
}
