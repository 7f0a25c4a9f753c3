//! # State Module
//!
//! Client-side state containers: what the UI shows between facade calls.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │             Arc<dyn StorageBackend>  (one per profile)          │   │
//! │  │   "cart"        "wishlist"        "user"       "mockDatabase"   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │          ▲                  ▲                  ▲                        │
//! │          │                  │                  │                        │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────────┐              │
//! │  │  CartState   │  │WishlistState │  │    AuthState     │              │
//! │  │  Arc<Mutex<  │  │  Arc<Mutex<  │  │  Arc<Mutex<      │              │
//! │  │    Cart>>    │  │   Wishlist>> │  │   Option<User>>> │              │
//! │  └──────────────┘  └──────────────┘  └──────────────────┘              │
//! │                                                                         │
//! │  • Every change is written back to its key before the call returns     │
//! │  • An unreadable key is logged and treated as empty                    │
//! │  • Cart and wishlist hold whole products, separate from the store's    │
//! │    own cart and wishlist tables                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod auth;
mod cart;
mod wishlist;

pub use auth::{AuthState, USER_KEY};
pub use cart::{CartState, CART_KEY};
pub use wishlist::{WishlistState, WISHLIST_KEY};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{error, warn};

use nutri_store::StorageBackend;

/// Reads and parses `key`, falling back to `None` when it is missing,
/// unreadable or malformed.
pub(crate) fn restore<T: DeserializeOwned>(storage: &dyn StorageBackend, key: &str) -> Option<T> {
    let raw = match storage.get_item(key) {
        Ok(raw) => raw?,
        Err(e) => {
            warn!(key = %key, error = %e, "Could not read saved state");
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(key = %key, error = %e, "Saved state is unreadable, starting empty");
            None
        }
    }
}

/// Writes `value` under `key`. Failures are logged; the in-memory state
/// stays authoritative.
pub(crate) fn save<T: Serialize + ?Sized>(storage: &dyn StorageBackend, key: &str, value: &T) {
    let result = serde_json::to_string(value)
        .map_err(nutri_store::StoreError::from)
        .and_then(|json| storage.set_item(key, &json));

    if let Err(e) = result {
        error!(key = %key, error = %e, "Could not save state");
    }
}
