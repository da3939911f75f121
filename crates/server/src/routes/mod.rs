//! HTTP route handlers for the marketplace API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                      - Liveness check
//! GET  /health/ready                - Readiness check (pings the database)
//!
//! # Auth
//! POST /api/auth/register           - Register a seller, returns a token
//! POST /api/auth/login              - Login, returns a token
//!
//! # Sellers (bearer token required)
//! GET  /api/sellers/{id}            - Seller summary
//! GET  /api/sellers/products?email= - Products of the seller with that email
//!
//! # Products
//! GET    /api/products              - Public catalog
//! POST   /api/products              - Create (token; owner = acting seller)
//! GET    /api/products/search?category= - Public category search
//! GET    /api/products/{id}         - Public product detail
//! PUT    /api/products/{id}         - Partial update (token + ownership)
//! DELETE /api/products/{id}         - Delete (token + ownership)
//!
//! # Media
//! GET  /media/{file}                - Uploaded product images
//! ```
//!
//! Every response uses one envelope: `{"data": ...}` on success,
//! `{"error": {"kind", "message"}}` on failure.

pub mod auth;
pub mod products;
pub mod sellers;

use axum::{
    Router,
    routing::{get, post},
};
use serde::Serialize;

use crate::error::AppError;
use crate::state::AppState;

/// Success envelope wrapping every response payload.
#[derive(Debug, Serialize)]
pub struct Data<T> {
    pub data: T,
}

impl<T> Data<T> {
    /// Wrap a payload.
    pub const fn new(data: T) -> Self {
        Self { data }
    }
}

/// Unwrap an optional request field, rejecting absent or blank values.
pub(crate) fn require(field: Option<String>, name: &str) -> Result<String, AppError> {
    match field {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(AppError::BadRequest(format!(
            "missing required field: {name}"
        ))),
    }
}

/// Create the auth routes router.
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
}

/// Create the seller routes router.
fn seller_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(sellers::products))
        .route("/{id}", get(sellers::show))
}

/// Create the product routes router.
fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index).post(products::create))
        .route("/search", get(products::search))
        .route(
            "/{id}",
            get(products::show)
                .put(products::update)
                .delete(products::destroy),
        )
}

/// Create all API routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api/auth", auth_routes())
        .nest("/api/sellers", seller_routes())
        .nest("/api/products", product_routes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_present() {
        assert_eq!(
            require(Some("value".to_owned()), "field").ok(),
            Some("value".to_owned())
        );
    }

    #[test]
    fn test_require_missing_or_blank() {
        assert!(require(None, "field").is_err());
        assert!(require(Some(String::new()), "field").is_err());
        assert!(require(Some("   ".to_owned()), "field").is_err());
    }
}
