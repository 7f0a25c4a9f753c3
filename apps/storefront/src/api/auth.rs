//! # Auth Endpoints
//!
//! `authAPI`: account creation, session lifecycle, profile and password
//! changes.
//!
//! Every user in a response has its password blanked.

use tracing::{debug, info};

use nutri_core::validation::{validate_new_password, validate_password_change};
use nutri_core::{NewUser, User, UserRole, UserUpdate};
use nutri_store::{StorageBackend, StoreError};

use super::{Api, ApiResponse, Latency};
use crate::error::{ApiError, ErrorCode};

/// Message of a failed login, the same for an unknown email and a wrong
/// password.
pub const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// `authAPI`.
pub struct AuthApi<'a, B: StorageBackend> {
    api: &'a Api<B>,
}

impl<'a, B: StorageBackend> AuthApi<'a, B> {
    pub(crate) fn new(api: &'a Api<B>) -> Self {
        AuthApi { api }
    }

    /// Creates a customer account and signs it in.
    pub async fn signup(&self, name: &str, email: &str, password: &str) -> ApiResponse<User> {
        let result = self
            .api
            .public(Latency::Standard, |db| {
                let user = db
                    .users()
                    .create(NewUser {
                        name: name.to_string(),
                        email: email.to_string(),
                        password: password.to_string(),
                        role: UserRole::Customer,
                    })
                    .map_err(|e| match e {
                        StoreError::Duplicate { .. } => {
                            ApiError::new(ErrorCode::Conflict, "Email already exists")
                        }
                        other => ApiError::from(other),
                    })?;
                db.set_current_user(Some(&user.id))?;
                Ok(user.redacted())
            })
            .await;

        ApiResponse::from_result(result, "User created successfully")
    }

    /// Signs in when the email exists and the password matches.
    ///
    /// A failed login leaves any existing session untouched.
    pub async fn login(&self, email: &str, password: &str) -> ApiResponse<User> {
        let result = self
            .api
            .public(Latency::Session, |db| {
                let user = db
                    .users()
                    .find_by_email(email)
                    .filter(|u| u.verify_password(password))
                    .ok_or_else(|| ApiError::new(ErrorCode::InvalidCredentials, INVALID_CREDENTIALS))?;

                db.set_current_user(Some(&user.id))?;
                info!(user_id = %user.id, "Logged in");
                Ok(user.redacted())
            })
            .await;

        ApiResponse::from_result(result, "Login successful")
    }

    pub async fn logout(&self) -> ApiResponse<()> {
        let result = self
            .api
            .public(Latency::Session, |db| {
                db.set_current_user(None)?;
                Ok(())
            })
            .await;

        ApiResponse::from_result(result, "Logged out successfully")
    }

    /// Always succeeds; `data` is `None` for an anonymous session.
    pub async fn get_current_user(&self) -> ApiResponse<Option<User>> {
        let result = self
            .api
            .public(Latency::Session, |db| Ok(db.current_user().map(|u| u.redacted())))
            .await;

        result.into()
    }

    /// Edits the session user's name and/or email.
    pub async fn update_profile(&self, update: UserUpdate) -> ApiResponse<User> {
        let result = self
            .api
            .signed_in(Latency::Standard, |db, user| {
                let updated = db
                    .users()
                    .update_profile(&user.id, update)?
                    .ok_or_else(|| ApiError::not_found("User"))?;
                Ok(updated.redacted())
            })
            .await;

        ApiResponse::from_result(result, "Profile updated successfully")
    }

    /// Changes the session user's password (profile page form).
    pub async fn change_password(
        &self,
        current: &str,
        new_password: &str,
        confirmation: &str,
    ) -> ApiResponse<()> {
        let result = self
            .api
            .signed_in(Latency::Standard, |db, user| {
                validate_password_change(current, new_password, confirmation)?;
                if !db.users().change_password(&user.id, current, new_password)? {
                    return Err(ApiError::validation("Current password is incorrect"));
                }
                Ok(())
            })
            .await;

        ApiResponse::from_result(result, "Password updated successfully")
    }

    /// Starts a password reset.
    ///
    /// Succeeds whether or not the email is known, so the response does not
    /// reveal which addresses have accounts. `data` holds the token that
    /// the reset email would carry, `None` for an unknown address.
    pub async fn request_password_reset(&self, email: &str) -> ApiResponse<Option<String>> {
        let result = self
            .api
            .public(Latency::Standard, |db| {
                let token = db.users().request_password_reset(email)?;
                debug!(issued = token.is_some(), "Password reset requested");
                Ok(token)
            })
            .await;

        ApiResponse::from_result(
            result,
            "If an account exists for that email, a reset link has been sent",
        )
    }

    /// Completes a reset from `/reset-password?token=…`.
    ///
    /// The new password needs 8+ characters with upper case, lower case and
    /// a digit, and must equal `confirmation`.
    pub async fn reset_password(
        &self,
        token: &str,
        new_password: &str,
        confirmation: &str,
    ) -> ApiResponse<()> {
        let result = self
            .api
            .public(Latency::Standard, |db| {
                validate_new_password(new_password, confirmation)?;
                db.users().reset_password(token, new_password)?;
                Ok(())
            })
            .await;

        ApiResponse::from_result(result, "Password reset successfully")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LatencyProfile;
    use nutri_store::{MemoryStorage, MockDatabase};

    fn api() -> Api<MemoryStorage> {
        let db = MockDatabase::open(MemoryStorage::new()).unwrap();
        Api::builder(db).latency(LatencyProfile::zero()).build()
    }

    #[tokio::test]
    async fn test_signup_signs_in_and_blanks_password() {
        let api = api();
        let response = api.auth().signup("Jane Doe", "jane@example.com", "secret1").await;

        assert!(response.success);
        assert_eq!(response.message.as_deref(), Some("User created successfully"));
        let user = response.data.unwrap();
        assert_eq!(user.password, "");
        assert_eq!(user.role, UserRole::Customer);

        let current = api.auth().get_current_user().await.data.flatten();
        assert_eq!(current.map(|u| u.id), Some(user.id));
    }

    #[tokio::test]
    async fn test_signup_duplicate_email() {
        let api = api();
        let response = api
            .auth()
            .signup("Someone", "admin@nutrihealth.com", "secret1")
            .await;

        assert!(!response.success);
        assert_eq!(response.message.as_deref(), Some("Email already exists"));
    }

    #[tokio::test]
    async fn test_login_unknown_email_sets_no_session() {
        let api = api();
        let response = api.auth().login("ghost@example.com", "whatever").await;

        assert!(!response.success);
        assert_eq!(response.message.as_deref(), Some(INVALID_CREDENTIALS));
        assert!(api.auth().get_current_user().await.data.flatten().is_none());
    }

    #[tokio::test]
    async fn test_login_checks_password() {
        let api = api();
        assert!(!api.auth().login("user@example.com", "wrong").await.success);

        let ok = api.auth().login("USER@example.com", "user123").await;
        assert!(ok.success);
        assert_eq!(ok.message.as_deref(), Some("Login successful"));
        assert_eq!(ok.data.unwrap().password, "");
    }

    #[tokio::test]
    async fn test_logout_clears_session() {
        let api = api();
        api.auth().login("user@example.com", "user123").await;

        let response = api.auth().logout().await;
        assert!(response.success);
        assert_eq!(response.message.as_deref(), Some("Logged out successfully"));
        assert!(api.auth().get_current_user().await.data.flatten().is_none());
    }

    #[tokio::test]
    async fn test_profile_requires_session() {
        let api = api();
        let response = api.auth().update_profile(UserUpdate::default()).await;
        assert_eq!(response.message.as_deref(), Some("Not authenticated"));

        api.auth().login("user@example.com", "user123").await;
        let response = api
            .auth()
            .update_profile(UserUpdate {
                name: Some("Rita".to_string()),
                email: None,
            })
            .await;
        assert_eq!(response.data.map(|u| u.name), Some("Rita".to_string()));
    }

    #[tokio::test]
    async fn test_change_password() {
        let api = api();
        api.auth().login("user@example.com", "user123").await;

        let wrong = api.auth().change_password("user124", "newpass99", "newpass99").await;
        assert_eq!(wrong.message.as_deref(), Some("Current password is incorrect"));

        let mismatch = api.auth().change_password("user123", "newpass99", "newpass98").await;
        assert!(!mismatch.success);

        let ok = api.auth().change_password("user123", "newpass99", "newpass99").await;
        assert!(ok.success);

        api.auth().logout().await;
        assert!(api.auth().login("user@example.com", "newpass99").await.success);
    }

    #[tokio::test]
    async fn test_password_reset_flow() {
        let api = api();
        let unknown = api.auth().request_password_reset("ghost@example.com").await;
        assert!(unknown.success);
        assert!(unknown.data.flatten().is_none());

        let token = api
            .auth()
            .request_password_reset("emma@example.com")
            .await
            .data
            .flatten()
            .unwrap();

        let weak = api.auth().reset_password(&token, "weakpass", "weakpass").await;
        assert!(!weak.success);

        let ok = api.auth().reset_password(&token, "Stronger9", "Stronger9").await;
        assert!(ok.success);
        assert!(api.auth().login("emma@example.com", "Stronger9").await.success);

        let again = api.auth().reset_password(&token, "Stronger9", "Stronger9").await;
        assert_eq!(again.message.as_deref(), Some("Invalid or expired reset token"));
    }
}
