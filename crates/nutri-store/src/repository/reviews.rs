//! # Review Repository
//!
//! Reviews are append-only. Adding one recomputes the product's rating as
//! the mean of its stored reviews, rounded to one decimal.

use chrono::Utc;
use tracing::{debug, info};

use nutri_core::validation::validate_review;
use nutri_core::{NewReview, Review};

use crate::backend::StorageBackend;
use crate::database::MockDatabase;
use crate::error::StoreResult;

/// Repository for the review table.
pub struct ReviewRepository<'a, B: StorageBackend> {
    db: &'a mut MockDatabase<B>,
}

impl<'a, B: StorageBackend> ReviewRepository<'a, B> {
    pub(crate) fn new(db: &'a mut MockDatabase<B>) -> Self {
        ReviewRepository { db }
    }

    /// Stores the review and refreshes the product rating.
    ///
    /// ## Errors
    /// `Validation` when the rating is outside 1..=5 or the comment is blank.
    pub fn create(&mut self, new_review: NewReview) -> StoreResult<Review> {
        validate_review(new_review.rating, &new_review.comment)?;

        let review = Review {
            id: self.db.next_id(),
            user_id: new_review.user_id,
            product_id: new_review.product_id,
            rating: new_review.rating,
            comment: new_review.comment.trim().to_string(),
            created_at: Utc::now(),
        };
        self.db.tables.reviews.push(review.clone());

        if let Some(rating) = self.average_rating(&review.product_id) {
            if let Some(product) = self
                .db
                .tables
                .products
                .iter_mut()
                .find(|p| p.id == review.product_id)
            {
                product.rating = rating;
                debug!(product_id = %product.id, rating, "Product rating refreshed");
            }
        }

        self.db.persist()?;
        info!(review_id = %review.id, product_id = %review.product_id, "Review created");
        Ok(review)
    }

    /// The product's reviews, newest first.
    pub fn by_product(&self, product_id: &str) -> Vec<Review> {
        let mut reviews: Vec<Review> = self
            .db
            .tables
            .reviews
            .iter()
            .filter(|r| r.product_id == product_id)
            .cloned()
            .collect();
        reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        reviews
    }

    /// Mean rating of the product's reviews, one decimal. `None` without
    /// reviews.
    pub fn average_rating(&self, product_id: &str) -> Option<f64> {
        let ratings: Vec<f64> = self
            .db
            .tables
            .reviews
            .iter()
            .filter(|r| r.product_id == product_id)
            .map(|r| f64::from(r.rating))
            .collect();

        if ratings.is_empty() {
            return None;
        }
        let mean = ratings.iter().sum::<f64>() / ratings.len() as f64;
        Some((mean * 10.0).round() / 10.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryStorage;
    use crate::error::StoreError;

    fn open() -> MockDatabase<MemoryStorage> {
        MockDatabase::open(MemoryStorage::new()).unwrap()
    }

    fn review(product_id: &str, rating: u8, comment: &str) -> NewReview {
        NewReview {
            user_id: "user2".to_string(),
            product_id: product_id.to_string(),
            rating,
            comment: comment.to_string(),
        }
    }

    #[test]
    fn test_seeded_reviews() {
        let mut db = open();
        assert_eq!(db.reviews().by_product("1").len(), 2);
        assert_eq!(db.reviews().by_product("2").len(), 1);
        assert!(db.reviews().by_product("8").is_empty());
        assert_eq!(db.reviews().average_rating("1"), Some(4.5));
    }

    #[test]
    fn test_create_refreshes_rating() {
        let mut db = open();
        let created = db.reviews().create(review("1", 3, " Decent. ")).unwrap();

        assert_eq!(created.comment, "Decent.");
        assert_eq!(db.reviews().by_product("1")[0].id, created.id);
        // (5 + 4 + 3) / 3
        assert_eq!(db.products().get("1").unwrap().rating, 4.0);
    }

    #[test]
    fn test_create_validates() {
        let mut db = open();
        let err = db.reviews().create(review("1", 6, "")).unwrap_err();

        match err {
            StoreError::Validation(errors) => assert_eq!(errors.len(), 2),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(db.reviews().by_product("1").len(), 2);
    }
}
