//! # Payment Simulator
//!
//! `paymentAPI.processPayment`: waits 2 seconds, then approves or declines.
//!
//! ## Decision
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  process_payment(97.18, credit-card)                                   │
//! │       │                                                                 │
//! │       ├── amount ≤ 0 or not finite ─────► "Invalid payment amount"      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  PaymentDecider::approve(amount)                                       │
//! │       ├── RandomDecider  uniform draw < success rate (default 0.9)     │
//! │       ├── FixedDecider   always the same answer (tests)                │
//! │       └── any Fn(f64) -> bool                                          │
//! │       │                                                                 │
//! │       ├── true  ──► receipt { txn_…, amount, method, "completed" }     │
//! │       └── false ──► "Payment failed. Please try again."                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing is retried: the customer presses the button again.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use ts_rs::TS;
use uuid::Uuid;

use nutri_core::PaymentMethod;
use nutri_store::StorageBackend;

use super::{Api, ApiResponse, Latency};
use crate::error::ApiError;

/// Message of a declined payment.
pub const PAYMENT_DECLINED: &str = "Payment failed. Please try again.";

/// Decides whether a simulated payment goes through.
pub trait PaymentDecider: Send + Sync {
    fn approve(&self, amount: f64) -> bool;
}

impl<F> PaymentDecider for F
where
    F: Fn(f64) -> bool + Send + Sync,
{
    fn approve(&self, amount: f64) -> bool {
        self(amount)
    }
}

/// Approves with probability `success_rate`, drawing anew on every call.
#[derive(Debug, Clone, Copy)]
pub struct RandomDecider {
    success_rate: f64,
}

impl RandomDecider {
    /// `success_rate` is clamped to `[0, 1]`.
    pub fn new(success_rate: f64) -> Self {
        RandomDecider {
            success_rate: success_rate.clamp(0.0, 1.0),
        }
    }
}

impl Default for RandomDecider {
    fn default() -> Self {
        RandomDecider::new(0.9)
    }
}

impl PaymentDecider for RandomDecider {
    fn approve(&self, _amount: f64) -> bool {
        rand::random::<f64>() < self.success_rate
    }
}

/// Always gives the same answer.
#[derive(Debug, Clone, Copy)]
pub struct FixedDecider(pub bool);

impl PaymentDecider for FixedDecider {
    fn approve(&self, _amount: f64) -> bool {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Completed,
}

/// Data of an approved payment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PaymentReceipt {
    /// `txn_` followed by 32 hex digits.
    pub transaction_id: String,
    pub amount: f64,
    pub payment_method: PaymentMethod,
    pub status: PaymentStatus,
}

/// `paymentAPI`.
pub struct PaymentApi<'a, B: StorageBackend> {
    api: &'a Api<B>,
}

impl<'a, B: StorageBackend> PaymentApi<'a, B> {
    pub(crate) fn new(api: &'a Api<B>) -> Self {
        PaymentApi { api }
    }

    /// Charges `amount` dollars. No session is required.
    pub async fn process_payment(
        &self,
        amount: f64,
        payment_method: PaymentMethod,
    ) -> ApiResponse<PaymentReceipt> {
        self.api.delay(Latency::Payment).await;

        if !amount.is_finite() || amount <= 0.0 {
            return ApiResponse::fail(ApiError::payment("Invalid payment amount"));
        }

        if !self.api.payments.approve(amount) {
            warn!(amount, method = %payment_method, "Payment declined");
            return ApiResponse::fail(ApiError::payment(PAYMENT_DECLINED));
        }

        let receipt = PaymentReceipt {
            transaction_id: format!("txn_{}", Uuid::new_v4().simple()),
            amount,
            payment_method,
            status: PaymentStatus::Completed,
        };
        info!(transaction_id = %receipt.transaction_id, amount, "Payment processed");
        ApiResponse::ok_with("Payment processed successfully", receipt)
    }
}
