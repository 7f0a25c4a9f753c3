//! # Cart Endpoints
//!
//! `cartAPI`: the session user's cart rows in the mock store. Every
//! endpoint requires a session.

use serde::Serialize;

use nutri_core::{CartItem, Product};
use nutri_store::{MockDatabase, StorageBackend};

use super::{Api, ApiResponse, Latency};
use crate::error::ApiError;

/// A cart row with its product resolved.
///
/// `product` is `None` when the product was deleted after the row was
/// added.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemWithProduct {
    #[serde(flatten)]
    pub item: CartItem,
    pub product: Option<Product>,
}

/// `cartAPI`.
pub struct CartApi<'a, B: StorageBackend> {
    api: &'a Api<B>,
}

impl<'a, B: StorageBackend> CartApi<'a, B> {
    pub(crate) fn new(api: &'a Api<B>) -> Self {
        CartApi { api }
    }

    pub async fn get_cart_items(&self) -> ApiResponse<Vec<CartItemWithProduct>> {
        let result = self
            .api
            .signed_in(Latency::Standard, |db, user| {
                let items = db.cart().items(&user.id);
                Ok(with_products(db, items))
            })
            .await;

        result.into()
    }

    /// Adds `quantity` of a catalog product, merging with an existing row.
    pub async fn add_to_cart(&self, product_id: &str, quantity: i64) -> ApiResponse<CartItem> {
        let result = self
            .api
            .signed_in(Latency::Standard, |db, user| {
                if db.products().get(product_id).is_none() {
                    return Err(ApiError::not_found("Product"));
                }
                Ok(db.cart().add(&user.id, product_id, quantity)?)
            })
            .await;

        ApiResponse::from_result(result, "Item added to cart")
    }

    /// Sets a row's quantity. Zero or less removes the row and `data` is
    /// `None`.
    pub async fn update_quantity(
        &self,
        product_id: &str,
        quantity: i64,
    ) -> ApiResponse<Option<CartItem>> {
        let result = self
            .api
            .signed_in(Latency::Standard, |db, user| {
                Ok(db.cart().update_quantity(&user.id, product_id, quantity)?)
            })
            .await;

        ApiResponse::from_result(result, "Cart updated")
    }

    /// `data` says whether a row was removed. A missing row is not an error.
    pub async fn remove_from_cart(&self, product_id: &str) -> ApiResponse<bool> {
        let result = self
            .api
            .signed_in(Latency::Standard, |db, user| {
                Ok(db.cart().remove(&user.id, product_id)?)
            })
            .await;

        match result {
            Ok(true) => ApiResponse::ok_with("Item removed from cart", true),
            Ok(false) => ApiResponse::ok_with("Item not found", false),
            Err(e) => ApiResponse::fail(e),
        }
    }

    /// Empties the cart. `data` is the number of rows dropped.
    pub async fn clear_cart(&self) -> ApiResponse<usize> {
        let result = self
            .api
            .signed_in(Latency::Standard, |db, user| Ok(db.cart().clear(&user.id)?))
            .await;

        ApiResponse::from_result(result, "Cart cleared")
    }
}

fn with_products<B: StorageBackend>(
    db: &mut MockDatabase<B>,
    items: Vec<CartItem>,
) -> Vec<CartItemWithProduct> {
    let products = db.products();
    items
        .into_iter()
        .map(|item| {
            let product = products.get(&item.product_id);
            CartItemWithProduct { item, product }
        })
        .collect()
}
