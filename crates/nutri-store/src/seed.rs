//! # Demo Seed Data
//!
//! The catalog, accounts and reviews a fresh store starts with.
//!
//! Each table is seeded only when it is empty, so a store whose products
//! were all deleted gets the demo catalog back on the next start, while
//! users and orders that exist are never touched.

use chrono::{DateTime, TimeZone, Utc};

use nutri_core::{NewProduct, Product, Review, User, UserRole};

use crate::database::Snapshot;

/// Demo login for the back office.
pub const ADMIN_EMAIL: &str = "admin@nutrihealth.com";
pub const ADMIN_PASSWORD: &str = "admin123";

/// Demo customer login.
pub const CUSTOMER_EMAIL: &str = "user@example.com";
pub const CUSTOMER_PASSWORD: &str = "user123";

/// Every category the storefront offers, including ones with no products yet.
pub const CATEGORIES: [&str; 8] = [
    "Supplements",
    "Vitamins",
    "Minerals",
    "Superfoods",
    "Digestive Health",
    "Beauty & Wellness",
    "Snacks",
    "Sports Nutrition",
];

fn date(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .unwrap_or_default()
}

fn unsplash(photo: &str) -> String {
    format!(
        "https://images.unsplash.com/{}?w=800&auto=format&fit=crop&q=80&ixlib=rb-4.0.3",
        photo
    )
}

struct DemoProduct {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    price: f64,
    discount: Option<f64>,
    rating: f64,
    stock: i64,
    category: &'static str,
    tags: [&'static str; 3],
    photos: [&'static str; 2],
    featured: bool,
    best_seller: bool,
    created: (i32, u32, u32),
}

const DEMO_PRODUCTS: [DemoProduct; 8] = [
    DemoProduct {
        id: "1",
        name: "Organic Whey Protein",
        description: "Premium grass-fed whey protein with natural flavor. No artificial ingredients or sweeteners. 24g protein per serving.",
        price: 49.99,
        discount: Some(10.0),
        rating: 4.8,
        stock: 50,
        category: "Supplements",
        tags: ["protein", "organic", "fitness"],
        photos: ["photo-1622818425825-1c89e9a4133c", "photo-1594302954323-575daefd3c9e"],
        featured: true,
        best_seller: true,
        created: (2023, 1, 15),
    },
    DemoProduct {
        id: "2",
        name: "Vitamin D3 + K2 Drops",
        description: "Superior bone and immune health support with 1000 IU of D3 and 100mcg of K2 per serving.",
        price: 29.99,
        discount: None,
        rating: 4.7,
        stock: 100,
        category: "Vitamins",
        tags: ["vitamin D", "immune", "bone health"],
        photos: ["photo-1584308666744-24d5c474f2ae", "photo-1471864190281-a93a3070b6de"],
        featured: true,
        best_seller: false,
        created: (2023, 2, 10),
    },
    DemoProduct {
        id: "3",
        name: "Omega-3 Fish Oil",
        description: "Ultra-pure, molecularly distilled fish oil with 1000mg Omega-3s per serving. Supports heart, brain, and joint health.",
        price: 34.99,
        discount: None,
        rating: 4.5,
        stock: 75,
        category: "Supplements",
        tags: ["omega-3", "heart health", "brain health"],
        photos: ["photo-1577563672807-0070a7a1b53e", "photo-1586014758171-c41d56ef6cf5"],
        featured: false,
        best_seller: true,
        created: (2023, 3, 5),
    },
    DemoProduct {
        id: "4",
        name: "Organic Green Superfood Powder",
        description: "Nutrient-dense blend of 40+ organic greens, fruits, and vegetables. Boosts energy and supports detoxification.",
        price: 59.99,
        discount: Some(15.0),
        rating: 4.6,
        stock: 30,
        category: "Superfoods",
        tags: ["greens", "detox", "energy"],
        photos: ["photo-1598733466878-41c586086e5f", "photo-1504858700536-882c978a3464"],
        featured: true,
        best_seller: true,
        created: (2023, 4, 20),
    },
    DemoProduct {
        id: "5",
        name: "Probiotic 50 Billion CFU",
        description: "Clinical-strength probiotic with 10 strains for digestive health and immune support. Shelf-stable and allergen-free.",
        price: 39.99,
        discount: None,
        rating: 4.9,
        stock: 60,
        category: "Digestive Health",
        tags: ["probiotics", "gut health", "immune support"],
        photos: ["photo-1587854680352-936b22b91030", "photo-1582711012124-a56cf82307a0"],
        featured: false,
        best_seller: false,
        created: (2023, 5, 12),
    },
    DemoProduct {
        id: "6",
        name: "Magnesium Glycinate",
        description: "Highly bioavailable form of magnesium that supports muscle relaxation, sleep quality, and stress management.",
        price: 24.99,
        discount: None,
        rating: 4.7,
        stock: 90,
        category: "Minerals",
        tags: ["magnesium", "sleep", "stress"],
        photos: ["photo-1616506329866-95eae3ca1b1e", "photo-1625330549373-6cc803daf254"],
        featured: false,
        best_seller: true,
        created: (2023, 6, 1),
    },
    DemoProduct {
        id: "7",
        name: "Plant-Based Protein Bars",
        description: "Delicious protein bars with 15g of clean plant protein. Perfect for on-the-go nutrition. Gluten-free and vegan.",
        price: 29.99,
        discount: Some(5.0),
        rating: 4.4,
        stock: 120,
        category: "Snacks",
        tags: ["protein", "vegan", "snack"],
        photos: ["photo-1569926656779-77d4f9ade1f8", "photo-1654638263368-86e3a1a4ce16"],
        featured: true,
        best_seller: false,
        created: (2023, 7, 8),
    },
    DemoProduct {
        id: "8",
        name: "Collagen Peptides",
        description: "Grass-fed collagen to support healthy skin, hair, nails, and joints. Unflavored and mixes easily with any liquid.",
        price: 44.99,
        discount: None,
        rating: 4.8,
        stock: 45,
        category: "Beauty & Wellness",
        tags: ["collagen", "skin health", "joint health"],
        photos: ["photo-1595348020949-87cdfbb44174", "photo-1500048993953-d23a436266cf"],
        featured: true,
        best_seller: true,
        created: (2023, 8, 15),
    },
];

/// The eight demo products.
pub fn demo_products() -> Vec<Product> {
    DEMO_PRODUCTS
        .iter()
        .map(|p| {
            let (y, m, d) = p.created;
            NewProduct {
                name: p.name.to_string(),
                slug: String::new(),
                description: p.description.to_string(),
                price: p.price,
                discount_percentage: p.discount,
                category: p.category.to_string(),
                tags: p.tags.iter().map(|t| t.to_string()).collect(),
                images: p.photos.iter().map(|photo| unsplash(photo)).collect(),
                stock: p.stock,
                rating: p.rating,
                featured: p.featured,
                best_seller: p.best_seller,
            }
            .into_product(p.id.to_string(), date(y, m, d))
        })
        .collect()
}

/// Back-office admin plus demo customers.
pub fn demo_users() -> Vec<User> {
    let user = |id: &str, name: &str, email: &str, password: &str, role, created| User {
        id: id.to_string(),
        name: name.to_string(),
        email: email.to_string(),
        password: password.to_string(),
        role,
        created_at: created,
    };

    vec![
        user("admin1", "Admin User", ADMIN_EMAIL, ADMIN_PASSWORD, UserRole::Admin, date(2023, 1, 1)),
        user("user1", "Sarah J.", "sarah@example.com", "sarah123", UserRole::Customer, date(2023, 1, 2)),
        user("user2", "Regular User", CUSTOMER_EMAIL, CUSTOMER_PASSWORD, UserRole::Customer, date(2023, 1, 2)),
        user("user3", "Emma K.", "emma@example.com", "emma123", UserRole::Customer, date(2023, 1, 3)),
    ]
}

/// Three reviews on the first two products.
pub fn demo_reviews() -> Vec<Review> {
    let review = |id: &str, product_id: &str, user_id: &str, rating, comment: &str, created| Review {
        id: id.to_string(),
        user_id: user_id.to_string(),
        product_id: product_id.to_string(),
        rating,
        comment: comment.to_string(),
        created_at: created,
    };

    vec![
        review(
            "1",
            "1",
            "user1",
            5,
            "Amazing protein powder! It mixes so well and tastes great without any artificial sweeteners. Will definitely purchase again.",
            date(2023, 3, 10),
        ),
        review(
            "2",
            "1",
            "user2",
            4,
            "Good quality protein, but I wish it had a bit more flavor. Still, love that it's all organic!",
            date(2023, 4, 15),
        ),
        review(
            "3",
            "2",
            "user3",
            5,
            "These vitamin drops are so easy to use! I've noticed a huge difference in my energy levels since I started taking them.",
            date(2023, 5, 20),
        ),
    ]
}

/// Fills the product, user and review tables that are empty.
///
/// Returns whether anything was inserted.
pub fn seed_empty_tables(tables: &mut Snapshot) -> bool {
    let mut seeded = false;

    if tables.products.is_empty() {
        tables.products = demo_products();
        seeded = true;
    }
    if tables.users.is_empty() {
        tables.users = demo_users();
        seeded = true;
    }
    if tables.reviews.is_empty() {
        tables.reviews = demo_reviews();
        seeded = true;
    }

    seeded
}
