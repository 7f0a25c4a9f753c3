//! # NutriHealth Storefront Entry Point
//!
//! Opens the store in the platform data directory (or `NUTRI_DATA_DIR`),
//! restores the saved client state and reports what it found.
//!
//! ## Startup Sequence
//! 1. Initialize tracing (logging)
//! 2. Load `nutri.toml` and `NUTRI_*` overrides
//! 3. Open the mock database, seeding empty tables
//! 4. Restore cart, wishlist and user
//! 5. Log a summary

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    match nutri_storefront::run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Storefront failed to start");
            eprintln!("nutri-storefront: {}", e);
            ExitCode::FAILURE
        }
    }
}
