//! # Auth State
//!
//! The signed-in user as the UI sees it, persisted under the `user` key.
//!
//! Login and registration go through the facade, so the password is checked
//! the same way everywhere. The saved user has its password blanked.

use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, error, info};

use nutri_core::User;
use nutri_store::StorageBackend;

use super::{restore, save};
use crate::api::{Api, ApiResponse};

/// Storage key of the signed-in user.
pub const USER_KEY: &str = "user";

/// Shared session view. Clones share the same user.
#[derive(Clone)]
pub struct AuthState {
    user: Arc<Mutex<Option<User>>>,
    storage: Arc<dyn StorageBackend>,
}

impl AuthState {
    /// Restores the saved user. A missing or unreadable blob means no
    /// session.
    pub fn load(storage: Arc<dyn StorageBackend>) -> Self {
        let user: Option<User> = restore(storage.as_ref(), USER_KEY);
        debug!(restored = user.is_some(), "Auth state restored");
        AuthState {
            user: Arc::new(Mutex::new(user)),
            storage,
        }
    }

    pub fn current_user(&self) -> Option<User> {
        self.user.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.lock().unwrap_or_else(PoisonError::into_inner).is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.user
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(User::is_admin)
    }

    fn set_user(&self, user: Option<User>) {
        let mut slot = self.user.lock().unwrap_or_else(PoisonError::into_inner);
        match &user {
            Some(user) => save(self.storage.as_ref(), USER_KEY, &user.redacted()),
            None => {
                if let Err(e) = self.storage.remove_item(USER_KEY) {
                    error!(error = %e, "Could not clear saved user");
                }
            }
        }
        *slot = user.map(|u| u.redacted());
    }

    /// Signs in through the facade. A failed attempt keeps the current
    /// state.
    pub async fn login<B: StorageBackend>(
        &self,
        api: &Api<B>,
        email: &str,
        password: &str,
    ) -> ApiResponse<User> {
        let response = api.auth().login(email, password).await;
        if let Some(user) = response.data.as_ref().filter(|_| response.success) {
            info!(user_id = %user.id, "Session started");
            self.set_user(Some(user.clone()));
        }
        response
    }

    /// Creates a customer account and signs it in. Duplicate emails are
    /// rejected by the facade.
    pub async fn register<B: StorageBackend>(
        &self,
        api: &Api<B>,
        name: &str,
        email: &str,
        password: &str,
    ) -> ApiResponse<User> {
        let response = api.auth().signup(name, email, password).await;
        if let Some(user) = response.data.as_ref().filter(|_| response.success) {
            info!(user_id = %user.id, "Account registered");
            self.set_user(Some(user.clone()));
        }
        response
    }

    /// Ends the session in the store and forgets the saved user.
    pub async fn logout<B: StorageBackend>(&self, api: &Api<B>) -> ApiResponse<()> {
        let response = api.auth().logout().await;
        self.set_user(None);
        response
    }

    /// Replaces the saved user after a profile edit.
    pub fn refresh(&self, user: User) {
        self.set_user(Some(user));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LatencyProfile;
    use nutri_store::{MemoryStorage, MockDatabase};

    fn setup() -> (Api<MemoryStorage>, MemoryStorage) {
        let storage = MemoryStorage::new();
        let db = MockDatabase::open(storage.clone()).unwrap();
        let api = Api::builder(db).latency(LatencyProfile::zero()).build();
        (api, storage)
    }

    #[tokio::test]
    async fn test_login_persists_user() {
        let (api, storage) = setup();
        let auth = AuthState::load(Arc::new(storage.clone()));
        assert!(!auth.is_authenticated());

        let response = auth.login(&api, "admin@nutrihealth.com", "admin123").await;
        assert!(response.success);
        assert!(auth.is_authenticated());
        assert!(auth.is_admin());

        let restored = AuthState::load(Arc::new(storage));
        let user = restored.current_user().unwrap();
        assert_eq!(user.email, "admin@nutrihealth.com");
        assert_eq!(user.password, "");
    }

    #[tokio::test]
    async fn test_wrong_password_is_rejected() {
        let (api, storage) = setup();
        let auth = AuthState::load(Arc::new(storage));

        let response = auth.login(&api, "user@example.com", "nope").await;
        assert!(!response.success);
        assert_eq!(response.message.as_deref(), Some("Invalid email or password"));
        assert!(!auth.is_authenticated());
    }

    #[tokio::test]
    async fn test_register_and_logout() {
        let (api, storage) = setup();
        let auth = AuthState::load(Arc::new(storage.clone()));

        let duplicate = auth.register(&api, "Sarah", "sarah@example.com", "secret1").await;
        assert_eq!(duplicate.message.as_deref(), Some("Email already exists"));
        assert!(!auth.is_authenticated());

        let created = auth.register(&api, "Noah Park", "noah@example.com", "secret1").await;
        assert!(created.success);
        assert!(auth.is_authenticated());
        assert!(!auth.is_admin());

        auth.logout(&api).await;
        assert!(!auth.is_authenticated());
        assert!(storage.get_item(USER_KEY).unwrap().is_none());
        assert!(api.auth().get_current_user().await.data.flatten().is_none());
    }

    #[test]
    fn test_unreadable_user_blob_means_no_session() {
        let storage = MemoryStorage::new();
        storage.set_item(USER_KEY, "not-json").unwrap();

        let auth = AuthState::load(Arc::new(storage));
        assert!(!auth.is_authenticated());
        assert!(auth.current_user().is_none());
    }
}
