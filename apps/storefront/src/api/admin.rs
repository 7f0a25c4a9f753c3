//! # Admin Endpoints
//!
//! The back office: dashboard, order management, customers and store
//! settings. Every endpoint requires an admin session.
//!
//! ## Dashboard
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Snapshot ──► DashboardStats::compute                                   │
//! │                 ├── total_revenue     Σ totals of non-cancelled orders  │
//! │                 ├── order_count       all orders                        │
//! │                 ├── customer_count    users with the customer role      │
//! │                 ├── product_count                                        │
//! │                 ├── orders_by_status  one entry per status, zeroes kept │
//! │                 ├── products_by_category  first-seen category order     │
//! │                 ├── low_stock         stock < LOW_STOCK_THRESHOLD       │
//! │                 └── recent_orders     newest five                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use tracing::info;
use ts_rs::TS;

use nutri_core::{catalog, Money, Order, OrderStatus, Product, User, UserRole, LOW_STOCK_THRESHOLD};
use nutri_store::{Snapshot, StorageBackend};

use super::{Api, ApiResponse, Latency};
use crate::config::StoreSettings;
use crate::error::{ApiError, ApiResult};

/// Orders shown in the dashboard's "recent orders" panel.
pub const RECENT_ORDERS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct StatusCount {
    pub status: OrderStatus,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

/// Figures of the admin dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    /// Dollars, cancelled orders excluded.
    pub total_revenue: f64,
    pub order_count: usize,
    pub customer_count: usize,
    pub product_count: usize,
    pub orders_by_status: Vec<StatusCount>,
    pub products_by_category: Vec<CategoryCount>,
    pub low_stock: Vec<Product>,
    pub recent_orders: Vec<Order>,
}

impl DashboardStats {
    pub fn compute(snapshot: &Snapshot) -> Self {
        let total_revenue = snapshot
            .orders
            .iter()
            .filter(|o| o.status != OrderStatus::Cancelled)
            .map(|o| Money::from_dollars(o.total_amount))
            .sum::<Money>()
            .to_dollars();

        let orders_by_status = OrderStatus::ALL
            .into_iter()
            .map(|status| StatusCount {
                status,
                count: snapshot.orders.iter().filter(|o| o.status == status).count(),
            })
            .collect();

        let products_by_category = catalog::categories(&snapshot.products)
            .into_iter()
            .map(|category| CategoryCount {
                count: snapshot
                    .products
                    .iter()
                    .filter(|p| p.category == category)
                    .count(),
                category,
            })
            .collect();

        let low_stock = snapshot
            .products
            .iter()
            .filter(|p| p.stock < LOW_STOCK_THRESHOLD)
            .cloned()
            .collect();

        let mut recent_orders = snapshot.orders.clone();
        recent_orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        recent_orders.truncate(RECENT_ORDERS);

        DashboardStats {
            total_revenue,
            order_count: snapshot.orders.len(),
            customer_count: snapshot
                .users
                .iter()
                .filter(|u| u.role == UserRole::Customer)
                .count(),
            product_count: snapshot.products.len(),
            orders_by_status,
            products_by_category,
            low_stock,
            recent_orders,
        }
    }
}

/// A row of the customers page.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CustomerSummary {
    /// Password blanked.
    pub user: User,
    pub order_count: usize,
    /// Dollars over every order, cancelled ones included.
    pub total_spent: f64,
}

/// Whether `order` matches the orders page search box: order id, or the
/// customer's name or email.
fn order_matches(order: &Order, customer: Option<&User>, needle: &str) -> bool {
    needle.is_empty()
        || order.id.to_lowercase().contains(needle)
        || customer.is_some_and(|u| {
            u.name.to_lowercase().contains(needle) || u.email.to_lowercase().contains(needle)
        })
}

/// Admin endpoint group.
pub struct AdminApi<'a, B: StorageBackend> {
    api: &'a Api<B>,
}

impl<'a, B: StorageBackend> AdminApi<'a, B> {
    pub(crate) fn new(api: &'a Api<B>) -> Self {
        AdminApi { api }
    }

    pub async fn dashboard(&self) -> ApiResponse<DashboardStats> {
        let result = self
            .api
            .admin_only(Latency::Standard, |db, _admin| {
                Ok(DashboardStats::compute(db.snapshot()))
            })
            .await;

        result.into()
    }

    /// Every order, newest first, optionally narrowed by a search string and
    /// a status.
    pub async fn list_orders(
        &self,
        search: Option<&str>,
        status: Option<OrderStatus>,
    ) -> ApiResponse<Vec<Order>> {
        let needle = search.unwrap_or_default().trim().to_lowercase();

        let result = self
            .api
            .admin_only(Latency::Standard, |db, _admin| {
                let users = db.users().list();
                let orders: Vec<Order> = db
                    .orders()
                    .all()
                    .into_iter()
                    .filter(|o| status.map_or(true, |s| o.status == s))
                    .filter(|o| {
                        let customer = users.iter().find(|u| u.id == o.user_id);
                        order_matches(o, customer, &needle)
                    })
                    .collect();
                Ok(orders)
            })
            .await;

        result.into()
    }

    /// Moves an order to any status; no transition rules apply.
    pub async fn update_order_status(&self, order_id: &str, status: OrderStatus) -> ApiResponse<Order> {
        let result = self
            .api
            .admin_only(Latency::Standard, |db, admin| {
                let order = db
                    .orders()
                    .update_status(order_id, status)?
                    .ok_or_else(|| ApiError::not_found("Order"))?;
                info!(admin_id = %admin.id, order_id = %order.id, status = %status, "Order status set by admin");
                Ok(order)
            })
            .await;

        ApiResponse::from_result(result, "Order status updated")
    }

    /// Customers matching `search` (name or email), with their order totals.
    pub async fn list_customers(&self, search: Option<&str>) -> ApiResponse<Vec<CustomerSummary>> {
        let result: ApiResult<Vec<CustomerSummary>> = self
            .api
            .admin_only(Latency::Standard, |db, _admin| {
                let customers = db.users().search(search.unwrap_or_default());
                let orders = db.orders().all();
                Ok(customers
                    .into_iter()
                    .filter(|u| u.role == UserRole::Customer)
                    .map(|user| {
                        let theirs: Vec<&Order> =
                            orders.iter().filter(|o| o.user_id == user.id).collect();
                        CustomerSummary {
                            order_count: theirs.len(),
                            total_spent: theirs
                                .iter()
                                .map(|o| Money::from_dollars(o.total_amount))
                                .sum::<Money>()
                                .to_dollars(),
                            user: user.redacted(),
                        }
                    })
                    .collect())
            })
            .await;

        result.into()
    }

    pub async fn get_settings(&self) -> ApiResponse<StoreSettings> {
        let result = self
            .api
            .admin_only(Latency::Standard, |_db, _admin| Ok(()))
            .await;

        match result {
            Ok(()) => ApiResponse::ok(self.api.settings().await),
            Err(e) => ApiResponse::fail(e),
        }
    }

    /// Replaces the store settings after checking the form. Applies to every
    /// clone of the [`Api`].
    pub async fn update_settings(&self, settings: StoreSettings) -> ApiResponse<StoreSettings> {
        let result = self
            .api
            .admin_only(Latency::Standard, |_db, admin| {
                settings.validate()?;
                info!(admin_id = %admin.id, store_name = %settings.store_name, "Store settings updated");
                Ok(settings)
            })
            .await;

        match result {
            Ok(settings) => {
                *self.api.settings.write().await = settings.clone();
                ApiResponse::ok_with("Settings saved successfully", settings)
            }
            Err(e) => ApiResponse::fail(e),
        }
    }
}
