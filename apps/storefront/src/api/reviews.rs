//! # Review Endpoints
//!
//! `reviewAPI`: reading a product's reviews and writing new ones. Both are
//! refused when the store settings disable reviews.

use serde::Serialize;

use nutri_core::{NewReview, Review};
use nutri_store::StorageBackend;

use super::{Api, ApiResponse, Latency};
use crate::error::{ApiError, ApiResult};

/// Shown for reviews whose author no longer exists.
pub const ANONYMOUS: &str = "Anonymous";

/// A review with its author's display name.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewWithUser {
    #[serde(flatten)]
    pub review: Review,
    pub user_name: String,
}

/// `reviewAPI`.
pub struct ReviewApi<'a, B: StorageBackend> {
    api: &'a Api<B>,
}

impl<'a, B: StorageBackend> ReviewApi<'a, B> {
    pub(crate) fn new(api: &'a Api<B>) -> Self {
        ReviewApi { api }
    }

    async fn ensure_enabled(&self) -> ApiResult<()> {
        if self.api.settings.read().await.enable_reviews {
            Ok(())
        } else {
            Err(ApiError::disabled("Reviews"))
        }
    }

    /// Newest first. No session required.
    pub async fn get_product_reviews(&self, product_id: &str) -> ApiResponse<Vec<ReviewWithUser>> {
        if let Err(e) = self.ensure_enabled().await {
            return ApiResponse::fail(e);
        }

        let result: ApiResult<Vec<ReviewWithUser>> = self
            .api
            .public(Latency::Standard, |db| {
                let reviews = db.reviews().by_product(product_id);
                let users = db.users();
                Ok(reviews
                    .into_iter()
                    .map(|review| {
                        let user_name = users
                            .find_by_id(&review.user_id)
                            .map(|u| u.name)
                            .unwrap_or_else(|| ANONYMOUS.to_string());
                        ReviewWithUser { review, user_name }
                    })
                    .collect())
            })
            .await;

        result.into()
    }

    /// Reviews a catalog product as the session user. The product rating is
    /// refreshed from all of its reviews.
    pub async fn create_review(
        &self,
        product_id: &str,
        rating: u8,
        comment: &str,
    ) -> ApiResponse<ReviewWithUser> {
        if let Err(e) = self.ensure_enabled().await {
            return ApiResponse::fail(e);
        }

        let result = self
            .api
            .signed_in(Latency::Standard, |db, user| {
                if db.products().get(product_id).is_none() {
                    return Err(ApiError::not_found("Product"));
                }
                let review = db.reviews().create(NewReview {
                    user_id: user.id.clone(),
                    product_id: product_id.to_string(),
                    rating,
                    comment: comment.to_string(),
                })?;
                Ok(ReviewWithUser {
                    review,
                    user_name: user.name.clone(),
                })
            })
            .await;

        ApiResponse::from_result(result, "Review added successfully")
    }
}
