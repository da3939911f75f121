//! Product catalog and listing-management handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::{Deserialize, Serialize};

use marketstall_core::{ProductId, SellerId};

use super::{Data, require};
use crate::error::AppError;
use crate::media::MediaStore;
use crate::middleware::RequireSeller;
use crate::models::Product;
use crate::services::{ListingChanges, ListingService, NewListing};
use crate::state::AppState;
use crate::text::title_case;

/// A product as served to clients: the stored filename is replaced by an
/// absolute URL into the media store.
#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub id: ProductId,
    pub title: String,
    pub price: f64,
    pub image: String,
    pub description: String,
    pub category: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub size: String,
    pub color: String,
    pub seller_id: SellerId,
}

impl ProductResponse {
    /// Convert a stored product, attaching the public image URL.
    #[must_use]
    pub fn from_product(product: Product, base_url: &str) -> Self {
        Self {
            id: product.id,
            title: product.title,
            price: product.price,
            image: MediaStore::url(base_url, &product.image),
            description: product.description,
            category: product.category,
            kind: product.kind,
            size: product.size,
            color: product.color,
            seller_id: product.seller_id,
        }
    }
}

/// Request body for creating a product. All fields are required; the image
/// travels as a base64 string plus its extension.
#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub title: Option<String>,
    pub price: Option<f64>,
    pub image: Option<String>,
    pub extension: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub size: Option<String>,
    pub color: Option<String>,
}

/// Request body for a partial update. Only supplied fields change; an empty
/// `image` string means "keep the current image".
#[derive(Debug, Deserialize)]
pub struct UpdateProductRequest {
    pub title: Option<String>,
    pub price: Option<f64>,
    pub image: Option<String>,
    pub extension: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub size: Option<String>,
    pub color: Option<String>,
}

/// Query parameters for category search.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub category: Option<String>,
}

/// List the whole catalog.
///
/// GET /api/products
///
/// # Errors
///
/// Returns 500 if the store is unavailable.
pub async fn index(
    State(state): State<AppState>,
) -> Result<Json<Data<Vec<ProductResponse>>>, AppError> {
    let products = crate::db::ProductRepository::new(state.pool())
        .list_all()
        .await?;

    Ok(Json(Data::new(present_all(products, &state))))
}

/// Fetch one product.
///
/// GET /api/products/{id}
///
/// # Errors
///
/// Returns 404 if no product has this id.
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Data<ProductResponse>>, AppError> {
    let id = ProductId::new(id);
    let product = crate::db::ProductRepository::new(state.pool())
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("no product with id {id}")))?;

    Ok(Json(Data::new(ProductResponse::from_product(
        product,
        &state.config().base_url,
    ))))
}

/// Search the catalog by category.
///
/// GET /api/products/search?category=...
///
/// The query is Title-Cased before the exact match, so `category=shoes`
/// finds products stored under `Shoes`. An unknown category yields
/// `{"data": []}` with status 200 - the same shape as a hit.
///
/// # Errors
///
/// Returns 400 when the category parameter is missing.
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Data<Vec<ProductResponse>>>, AppError> {
    let category = title_case(&require(query.category, "category")?);

    let products = crate::db::ProductRepository::new(state.pool())
        .search_by_category(&category)
        .await?;

    Ok(Json(Data::new(present_all(products, &state))))
}

/// Create a product owned by the authenticated seller.
///
/// POST /api/products
///
/// # Errors
///
/// Returns 400 for missing fields or a bad image payload, 401 without a
/// valid token.
pub async fn create(
    State(state): State<AppState>,
    RequireSeller(seller): RequireSeller,
    Json(req): Json<CreateProductRequest>,
) -> Result<Json<Data<ProductResponse>>, AppError> {
    let listing = NewListing {
        title: require(req.title, "title")?,
        price: req
            .price
            .ok_or_else(|| AppError::BadRequest("missing required field: price".to_owned()))?,
        image_base64: require(req.image, "image")?,
        extension: require(req.extension, "extension")?,
        description: require(req.description, "description")?,
        category: require(req.category, "category")?,
        kind: require(req.kind, "type")?,
        size: require(req.size, "size")?,
        color: require(req.color, "color")?,
    };

    let product = ListingService::new(state.pool(), state.media())
        .create(seller.id, listing)
        .await?;

    Ok(Json(Data::new(ProductResponse::from_product(
        product,
        &state.config().base_url,
    ))))
}

/// Apply a partial update to an owned product.
///
/// PUT /api/products/{id}
///
/// # Errors
///
/// Returns 404 for an unknown product, 403 when the acting seller does not
/// own it, 400 when a replacement image comes without an extension.
pub async fn update(
    State(state): State<AppState>,
    RequireSeller(seller): RequireSeller,
    Path(id): Path<i32>,
    Json(req): Json<UpdateProductRequest>,
) -> Result<Json<Data<ProductResponse>>, AppError> {
    // An empty image payload means "no change" (clients send "" to keep it).
    let image = match req.image {
        Some(payload) if !payload.is_empty() => {
            let extension = require(req.extension, "extension")?;
            Some((payload, extension))
        }
        _ => None,
    };

    let changes = ListingChanges {
        title: req.title,
        price: req.price,
        description: req.description,
        category: req.category,
        kind: req.kind,
        size: req.size,
        color: req.color,
        image,
    };

    let product = ListingService::new(state.pool(), state.media())
        .update(seller.id, ProductId::new(id), changes)
        .await?;

    Ok(Json(Data::new(ProductResponse::from_product(
        product,
        &state.config().base_url,
    ))))
}

/// Delete an owned product and its image file.
///
/// DELETE /api/products/{id}
///
/// # Errors
///
/// Returns 404 for an unknown product, 403 when the acting seller does not
/// own it.
pub async fn destroy(
    State(state): State<AppState>,
    RequireSeller(seller): RequireSeller,
    Path(id): Path<i32>,
) -> Result<Json<Data<DeleteResponse>>, AppError> {
    ListingService::new(state.pool(), state.media())
        .delete(seller.id, ProductId::new(id))
        .await?;

    Ok(Json(Data::new(DeleteResponse { deleted: true })))
}

/// Body of a successful delete.
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub deleted: bool,
}

/// Attach image URLs to a batch of products.
fn present_all(products: Vec<Product>, state: &AppState) -> Vec<ProductResponse> {
    let base_url = &state.config().base_url;
    products
        .into_iter()
        .map(|p| ProductResponse::from_product(p, base_url))
        .collect()
}
