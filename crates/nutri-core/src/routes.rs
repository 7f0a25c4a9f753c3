//! # Routes
//!
//! The client route table: parses a location (`/product/3`,
//! `/products?category=Vitamins`, ...) into a typed [`Route`].
//!
//! ```text
//!   /                        Home
//!   /products?search&category&bestseller
//!   /product/:id
//!   /checkout  /wishlist  /login  /signup  /forgot-password
//!   /reset-password?token=
//!   /profile                 (signed in)
//!   /admin[/products|/orders|/customers|/settings]   (admin)
//!   *                        NotFound
//! ```

use serde::{Deserialize, Serialize};

use crate::catalog::ProductQuery;
use crate::types::User;

/// Back-office pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdminSection {
    Dashboard,
    Products,
    Orders,
    Customers,
    Settings,
}

/// Who may open a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Access {
    Public,
    SignedIn,
    Admin,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Route {
    Home,
    Products(ProductQuery),
    Product { id: String },
    Checkout,
    Profile,
    Wishlist,
    Login,
    Signup,
    ForgotPassword,
    ResetPassword { token: Option<String> },
    Admin(AdminSection),
    NotFound(String),
}

impl Route {
    /// Parses a path with optional query string. Trailing slashes are ignored.
    ///
    /// ## Example
    /// ```rust
    /// use nutri_core::routes::{AdminSection, Route};
    ///
    /// assert_eq!(Route::parse("/product/7"), Route::Product { id: "7".to_string() });
    /// assert_eq!(Route::parse("/admin/orders/"), Route::Admin(AdminSection::Orders));
    /// assert!(matches!(Route::parse("/nope"), Route::NotFound(_)));
    /// ```
    pub fn parse(location: &str) -> Route {
        let (path, query) = location.split_once('?').unwrap_or((location, ""));
        let trimmed = path.trim_end_matches('/');
        let segments: Vec<&str> = trimmed.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Route::Home,
            ["products"] => Route::Products(ProductQuery::from_query_string(query)),
            ["product", id] => Route::Product { id: id.to_string() },
            ["checkout"] => Route::Checkout,
            ["profile"] => Route::Profile,
            ["wishlist"] => Route::Wishlist,
            ["login"] => Route::Login,
            ["signup"] => Route::Signup,
            ["forgot-password"] => Route::ForgotPassword,
            ["reset-password"] => Route::ResetPassword {
                token: url::form_urlencoded::parse(query.as_bytes())
                    .find(|(key, _)| key == "token")
                    .map(|(_, value)| value.into_owned())
                    .filter(|token| !token.is_empty()),
            },
            ["admin"] => Route::Admin(AdminSection::Dashboard),
            ["admin", "products"] => Route::Admin(AdminSection::Products),
            ["admin", "orders"] => Route::Admin(AdminSection::Orders),
            ["admin", "customers"] => Route::Admin(AdminSection::Customers),
            ["admin", "settings"] => Route::Admin(AdminSection::Settings),
            _ => Route::NotFound(path.to_string()),
        }
    }

    pub fn access(&self) -> Access {
        match self {
            Route::Profile => Access::SignedIn,
            Route::Admin(_) => Access::Admin,
            _ => Access::Public,
        }
    }

    pub fn requires_admin(&self) -> bool {
        self.access() == Access::Admin
    }

    /// Whether `user` (or an anonymous visitor) may open this route.
    pub fn is_allowed_for(&self, user: Option<&User>) -> bool {
        match self.access() {
            Access::Public => true,
            Access::SignedIn => user.is_some(),
            Access::Admin => user.is_some_and(User::is_admin),
        }
    }

    /// Canonical path (without query string).
    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Products(_) => "/products".to_string(),
            Route::Product { id } => format!("/product/{}", id),
            Route::Checkout => "/checkout".to_string(),
            Route::Profile => "/profile".to_string(),
            Route::Wishlist => "/wishlist".to_string(),
            Route::Login => "/login".to_string(),
            Route::Signup => "/signup".to_string(),
            Route::ForgotPassword => "/forgot-password".to_string(),
            Route::ResetPassword { .. } => "/reset-password".to_string(),
            Route::Admin(AdminSection::Dashboard) => "/admin".to_string(),
            Route::Admin(AdminSection::Products) => "/admin/products".to_string(),
            Route::Admin(AdminSection::Orders) => "/admin/orders".to_string(),
            Route::Admin(AdminSection::Customers) => "/admin/customers".to_string(),
            Route::Admin(AdminSection::Settings) => "/admin/settings".to_string(),
            Route::NotFound(path) => path.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::UserRole;
    use chrono::Utc;

    fn user(role: UserRole) -> User {
        User {
            id: "u1".to_string(),
            name: "Test".to_string(),
            email: "test@example.com".to_string(),
            password: String::new(),
            role,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_parse_products_query() {
        match Route::parse("/products?search=protein&bestseller=true") {
            Route::Products(q) => {
                assert_eq!(q.search.as_deref(), Some("protein"));
                assert!(q.bestseller);
            }
            other => panic!("unexpected route {:?}", other),
        }
    }

    #[test]
    fn test_parse_reset_token() {
        assert_eq!(
            Route::parse("/reset-password?token=abc-123"),
            Route::ResetPassword {
                token: Some("abc-123".to_string())
            }
        );
        assert_eq!(
            Route::parse("/reset-password"),
            Route::ResetPassword { token: None }
        );
    }

    #[test]
    fn test_parse_simple_routes() {
        assert_eq!(Route::parse("/"), Route::Home);
        assert_eq!(Route::parse(""), Route::Home);
        assert_eq!(Route::parse("/wishlist"), Route::Wishlist);
        assert_eq!(Route::parse("/forgot-password"), Route::ForgotPassword);
        assert_eq!(Route::parse("/admin"), Route::Admin(AdminSection::Dashboard));
        assert_eq!(
            Route::parse("/admin/settings"),
            Route::Admin(AdminSection::Settings)
        );
        assert_eq!(
            Route::parse("/product/1/reviews"),
            Route::NotFound("/product/1/reviews".to_string())
        );
    }

    #[test]
    fn test_access_rules() {
        let admin = user(UserRole::Admin);
        let customer = user(UserRole::Customer);

        let dashboard = Route::parse("/admin");
        assert!(dashboard.requires_admin());
        assert!(dashboard.is_allowed_for(Some(&admin)));
        assert!(!dashboard.is_allowed_for(Some(&customer)));
        assert!(!dashboard.is_allowed_for(None));

        let profile = Route::Profile;
        assert!(profile.is_allowed_for(Some(&customer)));
        assert!(!profile.is_allowed_for(None));

        assert!(Route::Checkout.is_allowed_for(None));
    }

    #[test]
    fn test_path_round_trips() {
        for path in [
            "/",
            "/products",
            "/product/42",
            "/checkout",
            "/profile",
            "/wishlist",
            "/login",
            "/signup",
            "/forgot-password",
            "/reset-password",
            "/admin",
            "/admin/products",
            "/admin/orders",
            "/admin/customers",
            "/admin/settings",
        ] {
            assert_eq!(Route::parse(path).path(), path);
        }
    }
}
