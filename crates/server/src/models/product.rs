//! Product domain types.

use chrono::{DateTime, Utc};

use marketstall_core::{ProductId, SellerId};

/// A product listing owned by exactly one seller.
///
/// `image` is the bare filename inside the media store; absolute URLs are
/// attached at the response-serialization boundary.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Listing title (stored Title-Cased).
    pub title: String,
    /// Price in the shop currency.
    pub price: f64,
    /// Stored image filename in the media store.
    pub image: String,
    /// Free-text description (stored capitalized).
    pub description: String,
    /// Category used for search (stored Title-Cased).
    pub category: String,
    /// Product type, e.g. "Shirt" (stored Title-Cased).
    pub kind: String,
    /// Size label, e.g. "M" or "42".
    pub size: String,
    /// Color name (stored Title-Cased).
    pub color: String,
    /// Owning seller.
    pub seller_id: SellerId,
    /// When the listing was created.
    pub created_at: DateTime<Utc>,
}

/// Fields for creating a product.
///
/// The image has already been written to the media store; `image` is its
/// stored filename. Normalization (title-casing etc.) has already happened.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub title: String,
    pub price: f64,
    pub image: String,
    pub description: String,
    pub category: String,
    pub kind: String,
    pub size: String,
    pub color: String,
    pub seller_id: SellerId,
}

/// Partial update of a product.
///
/// `None` fields are left untouched by the store; only supplied fields are
/// overwritten.
#[derive(Debug, Clone, Default)]
pub struct ProductChanges {
    pub title: Option<String>,
    pub price: Option<f64>,
    pub image: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub kind: Option<String>,
    pub size: Option<String>,
    pub color: Option<String>,
}

impl ProductChanges {
    /// True when no field would change.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.price.is_none()
            && self.image.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.kind.is_none()
            && self.size.is_none()
            && self.color.is_none()
    }
}
