//! Seller account handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::{Deserialize, Serialize};

use marketstall_core::{Email, SellerId};

use super::{Data, require};
use crate::db::{ProductRepository, SellerRepository};
use crate::error::AppError;
use crate::middleware::RequireSeller;
use crate::routes::products::ProductResponse;
use crate::state::AppState;

/// Public view of a seller account. The password hash never leaves the
/// store; [`crate::models::Seller`] does not carry it either.
#[derive(Debug, Serialize)]
pub struct SellerSummary {
    pub id: SellerId,
    pub username: String,
    pub email: Email,
}

/// Query parameters for the seller-products listing.
#[derive(Debug, Deserialize)]
pub struct SellerProductsQuery {
    pub email: Option<String>,
}

/// Fetch a seller summary by id.
///
/// GET /api/sellers/{id}
///
/// # Errors
///
/// Returns 401 without a valid token, 404 for an unknown seller.
pub async fn show(
    State(state): State<AppState>,
    RequireSeller(_): RequireSeller,
    Path(id): Path<i32>,
) -> Result<Json<Data<SellerSummary>>, AppError> {
    let id = SellerId::new(id);
    let seller = SellerRepository::new(state.pool())
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("no seller with id {id}")))?;

    Ok(Json(Data::new(SellerSummary {
        id: seller.id,
        username: seller.username,
        email: seller.email,
    })))
}

/// List the products belonging to the seller with the given email.
///
/// GET /api/sellers/products?email=...
///
/// # Errors
///
/// Returns 400 for a missing or malformed email, 401 without a valid
/// token, 404 when no seller has that email.
pub async fn products(
    State(state): State<AppState>,
    RequireSeller(_): RequireSeller,
    Query(query): Query<SellerProductsQuery>,
) -> Result<Json<Data<Vec<ProductResponse>>>, AppError> {
    let email = require(query.email, "email")?;
    let email = Email::parse(&email)
        .map_err(|err| AppError::BadRequest(format!("invalid email: {err}")))?;

    let seller = SellerRepository::new(state.pool())
        .get_by_email(&email)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("no seller with email {email}")))?;

    let products = ProductRepository::new(state.pool())
        .list_by_seller(seller.id)
        .await?;

    let base_url = &state.config().base_url;
    Ok(Json(Data::new(
        products
            .into_iter()
            .map(|p| ProductResponse::from_product(p, base_url))
            .collect(),
    )))
}
