//! # User Repository
//!
//! Accounts, profile edits and password resets.
//!
//! ## Password Reset Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  request_password_reset("sarah@example.com")                           │
//! │       │                                                                 │
//! │       ├── unknown email → Ok(None) (caller still says "email sent")    │
//! │       │                                                                 │
//! │       └── known email → token (uuid v4), valid for one hour            │
//! │                │                                                        │
//! │                ▼                                                        │
//! │  /reset-password?token=…                                               │
//! │                │                                                        │
//! │                ▼                                                        │
//! │  reset_password(token, "NewSecret1")                                   │
//! │       ├── unknown / expired token → InvalidResetToken                  │
//! │       └── ok → password replaced, every token of that user dropped     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{Duration, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use nutri_core::validation::{
    validate_password, validate_registration, validate_user_update, MIN_NEW_PASSWORD_LEN,
};
use nutri_core::{NewUser, User, UserUpdate, ValidationError};

use crate::backend::StorageBackend;
use crate::database::{MockDatabase, PasswordReset};
use crate::error::{StoreError, StoreResult};

/// How long a reset token stays valid.
const RESET_TOKEN_TTL_MINUTES: i64 = 60;

/// Repository for user accounts.
///
/// Emails compare case-insensitively, so `Admin@NutriHealth.com` and
/// `admin@nutrihealth.com` are the same account.
pub struct UserRepository<'a, B: StorageBackend> {
    db: &'a mut MockDatabase<B>,
}

impl<'a, B: StorageBackend> UserRepository<'a, B> {
    pub(crate) fn new(db: &'a mut MockDatabase<B>) -> Self {
        UserRepository { db }
    }

    /// Creates a user after validating the sign-up fields.
    ///
    /// ## Errors
    /// - `Validation` for a short name, malformed email or short password
    /// - `Duplicate` when the email is already registered
    pub fn create(&mut self, new_user: NewUser) -> StoreResult<User> {
        validate_registration(&new_user.name, &new_user.email, &new_user.password)?;

        let email = new_user.email.trim().to_string();
        if self.find_by_email(&email).is_some() {
            return Err(StoreError::duplicate("email", email));
        }

        let user = User {
            id: self.db.next_id(),
            name: new_user.name.trim().to_string(),
            email,
            password: new_user.password,
            role: new_user.role,
            created_at: Utc::now(),
        };

        self.db.tables.users.push(user.clone());
        self.db.persist()?;

        info!(user_id = %user.id, role = ?user.role, "User created");
        Ok(user)
    }

    pub fn find_by_email(&self, email: &str) -> Option<User> {
        let email = email.trim();
        self.db
            .tables
            .users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned()
    }

    pub fn find_by_id(&self, id: &str) -> Option<User> {
        self.db.tables.users.iter().find(|u| u.id == id).cloned()
    }

    /// All users in insertion order.
    pub fn list(&self) -> Vec<User> {
        self.db.tables.users.clone()
    }

    /// Users whose name or email contains `query` (case-insensitive).
    /// An empty query matches everyone.
    pub fn search(&self, query: &str) -> Vec<User> {
        let needle = query.trim().to_lowercase();
        self.db
            .tables
            .users
            .iter()
            .filter(|u| {
                needle.is_empty()
                    || u.name.to_lowercase().contains(&needle)
                    || u.email.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect()
    }

    /// Applies a profile edit. `Ok(None)` when the user does not exist.
    ///
    /// ## Errors
    /// - `Validation` for a short name or malformed email
    /// - `Duplicate` when the new email belongs to another account
    pub fn update_profile(&mut self, id: &str, update: UserUpdate) -> StoreResult<Option<User>> {
        validate_user_update(&update)?;

        if let Some(email) = &update.email {
            let taken = self
                .db
                .tables
                .users
                .iter()
                .any(|u| u.id != id && u.email.eq_ignore_ascii_case(email.trim()));
            if taken {
                return Err(StoreError::duplicate("email", email.trim()));
            }
        }

        let Some(user) = self.db.tables.users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };

        if let Some(name) = update.name {
            user.name = name.trim().to_string();
        }
        if let Some(email) = update.email {
            user.email = email.trim().to_string();
        }
        let updated = user.clone();

        self.db.persist()?;
        debug!(user_id = %id, "Profile updated");
        Ok(Some(updated))
    }

    /// Replaces the password when `current` matches the stored one.
    ///
    /// Returns `Ok(false)` when the user is unknown or `current` is wrong.
    pub fn change_password(&mut self, id: &str, current: &str, new_password: &str) -> StoreResult<bool> {
        check_new_password_len(new_password)?;

        let Some(user) = self.db.tables.users.iter_mut().find(|u| u.id == id) else {
            return Ok(false);
        };
        if !user.verify_password(current) {
            debug!(user_id = %id, "Password change rejected");
            return Ok(false);
        }

        user.password = new_password.to_string();
        self.db.persist()?;
        info!(user_id = %id, "Password changed");
        Ok(true)
    }

    // =========================================================================
    // Password Reset
    // =========================================================================

    /// Issues a reset token for `email`. `Ok(None)` when no account matches.
    pub fn request_password_reset(&mut self, email: &str) -> StoreResult<Option<String>> {
        let Some(user) = self.find_by_email(email) else {
            debug!("Password reset requested for unknown email");
            return Ok(None);
        };

        let now = Utc::now();
        self.db.tables.password_resets.retain(|r| r.expires_at > now);

        let token = Uuid::new_v4().to_string();
        self.db.tables.password_resets.push(PasswordReset {
            token: token.clone(),
            user_id: user.id.clone(),
            expires_at: now + Duration::minutes(RESET_TOKEN_TTL_MINUTES),
        });
        self.db.persist()?;

        info!(user_id = %user.id, "Password reset token issued");
        Ok(Some(token))
    }

    /// Consumes `token` and sets the new password.
    ///
    /// ## Errors
    /// - `InvalidResetToken` when the token is unknown, used or expired
    /// - `Validation` when the password is shorter than 8 characters
    pub fn reset_password(&mut self, token: &str, new_password: &str) -> StoreResult<()> {
        check_new_password_len(new_password)?;

        let now = Utc::now();
        let user_id = self
            .db
            .tables
            .password_resets
            .iter()
            .find(|r| r.token == token && r.expires_at > now)
            .map(|r| r.user_id.clone())
            .ok_or(StoreError::InvalidResetToken)?;

        let user = self
            .db
            .tables
            .users
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or(StoreError::InvalidResetToken)?;
        user.password = new_password.to_string();

        self.db
            .tables
            .password_resets
            .retain(|r| r.user_id != user_id && r.expires_at > now);
        self.db.persist()?;

        info!(user_id = %user_id, "Password reset");
        Ok(())
    }
}

fn check_new_password_len(password: &str) -> StoreResult<()> {
    validate_password(password)?;
    if password.chars().count() < MIN_NEW_PASSWORD_LEN {
        return Err(ValidationError::TooShort {
            field: "password".to_string(),
            min: MIN_NEW_PASSWORD_LEN,
        }
        .into());
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
