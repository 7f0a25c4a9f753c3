//! # Wishlist Endpoints
//!
//! `wishlistAPI`: the session user's saved products. Switched off entirely
//! when the store settings disable wishlists.

use serde::Serialize;

use nutri_core::{Product, WishlistItem};
use nutri_store::StorageBackend;

use super::{Api, ApiResponse, Latency};
use crate::error::{ApiError, ApiResult};

/// A wishlist row with its product resolved (`None` once deleted).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistItemWithProduct {
    #[serde(flatten)]
    pub item: WishlistItem,
    pub product: Option<Product>,
}

/// `wishlistAPI`.
pub struct WishlistApi<'a, B: StorageBackend> {
    api: &'a Api<B>,
}

impl<'a, B: StorageBackend> WishlistApi<'a, B> {
    pub(crate) fn new(api: &'a Api<B>) -> Self {
        WishlistApi { api }
    }

    async fn ensure_enabled(&self) -> ApiResult<()> {
        if self.api.settings.read().await.enable_wishlist {
            Ok(())
        } else {
            Err(ApiError::disabled("Wishlists"))
        }
    }

    pub async fn get_wishlist_items(&self) -> ApiResponse<Vec<WishlistItemWithProduct>> {
        if let Err(e) = self.ensure_enabled().await {
            return ApiResponse::fail(e);
        }

        let result: ApiResult<Vec<WishlistItemWithProduct>> = self
            .api
            .signed_in(Latency::Standard, |db, user| {
                let items = db.wishlist().items(&user.id);
                let products = db.products();
                Ok(items
                    .into_iter()
                    .map(|item| {
                        let product = products.get(&item.product_id);
                        WishlistItemWithProduct { item, product }
                    })
                    .collect())
            })
            .await;

        result.into()
    }

    /// Saves the product when absent, drops it when present. `data` says
    /// whether it is saved afterwards.
    pub async fn toggle_wishlist_item(&self, product_id: &str) -> ApiResponse<bool> {
        if let Err(e) = self.ensure_enabled().await {
            return ApiResponse::fail(e);
        }

        let result = self
            .api
            .signed_in(Latency::Standard, |db, user| {
                if !db.wishlist().contains(&user.id, product_id)
                    && db.products().get(product_id).is_none()
                {
                    return Err(ApiError::not_found("Product"));
                }
                Ok(db.wishlist().toggle(&user.id, product_id)?)
            })
            .await;

        match result {
            Ok(true) => ApiResponse::ok_with("Item added to wishlist", true),
            Ok(false) => ApiResponse::ok_with("Item removed from wishlist", false),
            Err(e) => ApiResponse::fail(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LatencyProfile, StoreSettings};
    use crate::error::ErrorCode;
    use nutri_store::{MemoryStorage, MockDatabase};

    async fn signed_in_api(settings: StoreSettings) -> Api<MemoryStorage> {
        let db = MockDatabase::open(MemoryStorage::new()).unwrap();
        let api = Api::builder(db)
            .latency(LatencyProfile::zero())
            .settings(settings)
            .build();
        api.auth().login("user@example.com", "user123").await;
        api
    }

    #[tokio::test]
    async fn test_toggle_twice_restores() {
        let api = signed_in_api(StoreSettings::default()).await;

        let added = api.wishlist().toggle_wishlist_item("4").await;
        assert_eq!(added.data, Some(true));
        assert_eq!(added.message.as_deref(), Some("Item added to wishlist"));

        let items = api.wishlist().get_wishlist_items().await.data.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].product.as_ref().map(|p| p.id.as_str()), Some("4"));

        let removed = api.wishlist().toggle_wishlist_item("4").await;
        assert_eq!(removed.data, Some(false));
        assert_eq!(removed.message.as_deref(), Some("Item removed from wishlist"));
        assert!(api.wishlist().get_wishlist_items().await.data.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_disabled_by_settings() {
        let settings = StoreSettings {
            enable_wishlist: false,
            ..StoreSettings::default()
        };
        let api = signed_in_api(settings).await;

        let response = api.wishlist().toggle_wishlist_item("4").await;
        assert!(!response.success);
        assert_eq!(response.error.map(|e| e.code), Some(ErrorCode::Disabled));
        assert_eq!(response.message.as_deref(), Some("Wishlists are disabled"));
    }

    #[tokio::test]
    async fn test_requires_session() {
        let api = signed_in_api(StoreSettings::default()).await;
        api.auth().logout().await;

        let response = api.wishlist().get_wishlist_items().await;
        assert_eq!(response.message.as_deref(), Some("Not authenticated"));
    }
}
