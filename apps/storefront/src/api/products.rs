//! # Product Endpoints
//!
//! `productAPI`: catalog listing and detail for everyone, CRUD for admins.

use tracing::debug;

use nutri_core::{NewProduct, Page, Product, ProductQuery, ProductUpdate};
use nutri_store::StorageBackend;

use super::{Api, ApiResponse, Latency};
use crate::error::ApiError;

/// `productAPI`.
pub struct ProductApi<'a, B: StorageBackend> {
    api: &'a Api<B>,
}

impl<'a, B: StorageBackend> ProductApi<'a, B> {
    pub(crate) fn new(api: &'a Api<B>) -> Self {
        ProductApi { api }
    }

    /// One page of the filtered catalog, returned bare as
    /// `{data, pagination}` without the success envelope.
    ///
    /// Products out of stock are left out when the store settings hide them.
    pub async fn get_products(&self, query: &ProductQuery) -> Page<Product> {
        self.api.delay(Latency::Standard).await;
        let hide_out_of_stock = !self.api.settings.read().await.show_out_of_stock;
        let mut db = self.api.database().lock().await;

        if hide_out_of_stock && !query.in_stock_only {
            db.products().list(&query.clone().in_stock_only(true))
        } else {
            db.products().list(query)
        }
    }

    pub async fn get_product_by_id(&self, id: &str) -> ApiResponse<Product> {
        let result = self
            .api
            .public(Latency::Standard, |db| {
                db.products().get(id).ok_or_else(|| ApiError::not_found("Product"))
            })
            .await;

        result.into()
    }

    /// Every category the storefront offers.
    pub async fn get_categories(&self) -> ApiResponse<Vec<String>> {
        let result = self
            .api
            .public(Latency::Standard, |db| Ok(db.products().categories()))
            .await;

        result.into()
    }

    /// Admin only.
    pub async fn create_product(&self, product: NewProduct) -> ApiResponse<Product> {
        let result = self
            .api
            .admin_only(Latency::Standard, |db, admin| {
                let created = db.products().create(product)?;
                debug!(admin_id = %admin.id, product_id = %created.id, "Admin created product");
                Ok(created)
            })
            .await;

        ApiResponse::from_result(result, "Product created successfully")
    }

    /// Admin only. The id never changes.
    pub async fn update_product(&self, id: &str, update: ProductUpdate) -> ApiResponse<Product> {
        let result = self
            .api
            .admin_only(Latency::Standard, |db, _admin| {
                db.products()
                    .update(id, update)?
                    .ok_or_else(|| ApiError::not_found("Product"))
            })
            .await;

        ApiResponse::from_result(result, "Product updated successfully")
    }

    /// Admin only. Cart, wishlist and order rows that reference the product
    /// are left as they are.
    pub async fn delete_product(&self, id: &str) -> ApiResponse<bool> {
        let result = self
            .api
            .admin_only(Latency::Standard, |db, _admin| {
                if db.products().delete(id)? {
                    Ok(true)
                } else {
                    Err(ApiError::not_found("Product"))
                }
            })
            .await;

        ApiResponse::from_result(result, "Product deleted successfully")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LatencyProfile, StoreSettings};
    use crate::error::ErrorCode;
    use nutri_store::{MemoryStorage, MockDatabase};

    fn api() -> Api<MemoryStorage> {
        let db = MockDatabase::open(MemoryStorage::new()).unwrap();
        Api::builder(db).latency(LatencyProfile::zero()).build()
    }

    fn zinc() -> NewProduct {
        NewProduct {
            name: "Zinc Picolinate".to_string(),
            description: "Zinc 50mg for immune support".to_string(),
            price: 12.99,
            category: "Minerals".to_string(),
            stock: 25,
            ..NewProduct::default()
        }
    }

    #[tokio::test]
    async fn test_listing_and_detail() {
        let api = api();
        let page = api
            .products()
            .get_products(&ProductQuery::from_query_string("category=Supplements"))
            .await;
        assert_eq!(page.pagination.total, 2);

        let found = api.products().get_product_by_id("6").await;
        assert_eq!(found.data.map(|p| p.name), Some("Magnesium Glycinate".to_string()));

        let missing = api.products().get_product_by_id("404").await;
        assert!(!missing.success);
        assert_eq!(missing.message.as_deref(), Some("Product not found"));
    }

    #[tokio::test]
    async fn test_create_requires_admin() {
        let api = api();
        let anonymous = api.products().create_product(zinc()).await;
        assert_eq!(anonymous.message.as_deref(), Some("Unauthorized"));

        api.auth().login("user@example.com", "user123").await;
        let customer = api.products().create_product(zinc()).await;
        assert_eq!(customer.error.map(|e| e.code), Some(ErrorCode::Unauthorized));

        api.auth().login("admin@nutrihealth.com", "admin123").await;
        let admin = api.products().create_product(zinc()).await;
        assert!(admin.success);
        assert_eq!(admin.message.as_deref(), Some("Product created successfully"));
    }

    #[tokio::test]
    async fn test_admin_update_and_delete() {
        let api = api();
        api.auth().login("admin@nutrihealth.com", "admin123").await;

        let update = ProductUpdate {
            stock: Some(0),
            ..ProductUpdate::default()
        };
        let updated = api.products().update_product("2", update).await;
        assert_eq!(updated.data.map(|p| p.stock), Some(0));

        assert!(api.products().delete_product("2").await.success);
        let again = api.products().delete_product("2").await;
        assert_eq!(again.message.as_deref(), Some("Product not found"));
    }

    #[tokio::test]
    async fn test_listing_hides_out_of_stock_when_configured() {
        let db = MockDatabase::open(MemoryStorage::new()).unwrap();
        let api = Api::builder(db)
            .latency(LatencyProfile::zero())
            .settings(StoreSettings {
                show_out_of_stock: false,
                ..StoreSettings::default()
            })
            .build();
        api.auth().login("admin@nutrihealth.com", "admin123").await;
        let sold_out = ProductUpdate {
            stock: Some(0),
            ..ProductUpdate::default()
        };
        api.products().update_product("2", sold_out).await;

        let vitamins = ProductQuery::new().category("Vitamins");
        assert_eq!(api.products().get_products(&vitamins).await.pagination.total, 0);
        assert!(api.products().get_product_by_id("2").await.success);

        let shown = api
            .admin()
            .update_settings(StoreSettings::default())
            .await;
        assert!(shown.success);
        assert_eq!(api.products().get_products(&vitamins).await.pagination.total, 1);
    }

    #[tokio::test]
    async fn test_free_product_can_be_created() {
        let api = api();
        api.auth().login("admin@nutrihealth.com", "admin123").await;

        let sample = NewProduct {
            price: 0.0,
            ..zinc()
        };
        let created = api.products().create_product(sample).await;
        assert!(created.success, "{:?}", created.message);
        assert_eq!(created.data.map(|p| p.price), Some(0.0));
    }

    #[tokio::test]
    async fn test_categories() {
        let api = api();
        let categories = api.products().get_categories().await.data.unwrap();
        assert!(categories.contains(&"Sports Nutrition".to_string()));
    }
}
