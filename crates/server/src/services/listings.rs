//! Listing service: product mutations that span the database and the media
//! store.
//!
//! The two stores are not covered by one transaction, so ordering carries the
//! consistency guarantee:
//! - create: write the file first, remove it again if the insert fails
//! - update: write the replacement file, commit the row, then delete the old
//!   file; a failed commit removes the replacement and keeps the old file
//! - delete: remove the row first, then the file; the record is the source of
//!   truth, so a leftover file is only worth a warning

use sqlx::SqlitePool;

use marketstall_core::{ProductId, SellerId};

use crate::db::{ProductRepository, RepositoryError};
use crate::error::AppError;
use crate::media::MediaStore;
use crate::models::{NewProduct, Product, ProductChanges};
use crate::text::{capitalize, title_case};

/// Input for creating a listing. The image travels as a base64 payload.
#[derive(Debug, Clone)]
pub struct NewListing {
    pub title: String,
    pub price: f64,
    pub image_base64: String,
    pub extension: String,
    pub description: String,
    pub category: String,
    pub kind: String,
    pub size: String,
    pub color: String,
}

/// Partial update of a listing. A replacement image, when present, is a
/// `(base64 payload, extension)` pair.
#[derive(Debug, Clone, Default)]
pub struct ListingChanges {
    pub title: Option<String>,
    pub price: Option<f64>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub kind: Option<String>,
    pub size: Option<String>,
    pub color: Option<String>,
    pub image: Option<(String, String)>,
}

/// Coordinates product rows and their image files.
pub struct ListingService<'a> {
    products: ProductRepository<'a>,
    media: &'a MediaStore,
}

impl<'a> ListingService<'a> {
    /// Create a new listing service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool, media: &'a MediaStore) -> Self {
        Self {
            products: ProductRepository::new(pool),
            media,
        }
    }

    /// Create a product owned by `seller_id`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the seller does not exist,
    /// `AppError::Media` for a bad image payload. A failed insert leaves no
    /// orphaned image file behind.
    pub async fn create(
        &self,
        seller_id: SellerId,
        listing: NewListing,
    ) -> Result<Product, AppError> {
        let filename = self
            .media
            .save(&listing.image_base64, &listing.extension)
            .await?;

        let new = NewProduct {
            title: title_case(&listing.title),
            price: listing.price,
            image: filename.clone(),
            description: capitalize(&listing.description),
            category: title_case(&listing.category),
            kind: title_case(&listing.kind),
            size: listing.size,
            color: title_case(&listing.color),
            seller_id,
        };

        match self.products.create(&new).await {
            Ok(product) => Ok(product),
            Err(e) => {
                self.discard(&filename).await;
                Err(match e {
                    RepositoryError::ForeignKey(_) => {
                        AppError::NotFound("seller does not exist".to_owned())
                    }
                    other => AppError::Database(other),
                })
            }
        }
    }

    /// Apply a partial update to a product owned by `seller_id`.
    ///
    /// Only supplied fields change. A replacement image is stored before the
    /// row commits; the old file is deleted only after the commit succeeds.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the product does not exist,
    /// `AppError::Forbidden` if `seller_id` does not own it.
    pub async fn update(
        &self,
        seller_id: SellerId,
        id: ProductId,
        changes: ListingChanges,
    ) -> Result<Product, AppError> {
        let existing = self.get_owned(seller_id, id).await?;

        let new_file = match &changes.image {
            Some((payload, extension)) => Some(self.media.save(payload, extension).await?),
            None => None,
        };

        let db_changes = ProductChanges {
            title: changes.title.map(|s| title_case(&s)),
            price: changes.price,
            image: new_file.clone(),
            description: changes.description.map(|s| capitalize(&s)),
            category: changes.category.map(|s| title_case(&s)),
            kind: changes.kind.map(|s| title_case(&s)),
            size: changes.size,
            color: changes.color.map(|s| title_case(&s)),
        };

        match self.products.update(id, &db_changes).await {
            Ok(Some(updated)) => {
                if new_file.is_some() {
                    self.discard(&existing.image).await;
                }
                Ok(updated)
            }
            Ok(None) => {
                if let Some(filename) = &new_file {
                    self.discard(filename).await;
                }
                Err(AppError::NotFound(format!("no product with id {id}")))
            }
            Err(e) => {
                if let Some(filename) = &new_file {
                    self.discard(filename).await;
                }
                Err(AppError::Database(e))
            }
        }
    }

    /// Delete a product owned by `seller_id`, then its image file.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the product does not exist,
    /// `AppError::Forbidden` if `seller_id` does not own it.
    pub async fn delete(&self, seller_id: SellerId, id: ProductId) -> Result<(), AppError> {
        let existing = self.get_owned(seller_id, id).await?;

        let deleted = self.products.delete(id).await?;
        if !deleted {
            return Err(AppError::NotFound(format!("no product with id {id}")));
        }

        self.discard(&existing.image).await;

        Ok(())
    }

    /// Fetch a product and verify ownership.
    async fn get_owned(&self, seller_id: SellerId, id: ProductId) -> Result<Product, AppError> {
        let product = self
            .products
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("no product with id {id}")))?;

        if product.seller_id != seller_id {
            return Err(AppError::Forbidden(
                "you do not own this product".to_owned(),
            ));
        }

        Ok(product)
    }

    /// Best-effort file removal; failures are logged, never surfaced.
    async fn discard(&self, filename: &str) {
        if let Err(e) = self.media.delete(filename).await {
            tracing::warn!(filename, error = %e, "failed to remove image file");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use base64::Engine;
    use base64::engine::general_purpose::STANDARD as BASE64;
    use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

    use marketstall_core::Email;

    use super::*;
    use crate::db::SellerRepository;

    async fn test_pool() -> SqlitePool {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .unwrap()
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .unwrap();
        crate::db::run_migrations(&pool).await.unwrap();
        pool
    }

    async fn test_seller(pool: &SqlitePool) -> SellerId {
        let email = Email::parse("seller@example.com").unwrap();
        SellerRepository::new(pool)
            .create("alice", &email, "$argon2id$fake")
            .await
            .unwrap()
            .id
    }

    fn listing() -> NewListing {
        NewListing {
            title: "denim jacket".to_owned(),
            price: 59.99,
            image_base64: BASE64.encode(b"image bytes"),
            extension: "png".to_owned(),
            description: "warm and sturdy".to_owned(),
            category: "jackets".to_owned(),
            kind: "outerwear".to_owned(),
            size: "M".to_owned(),
            color: "blue".to_owned(),
        }
    }

    fn media_files(store: &MediaStore) -> Vec<String> {
        std::fs::read_dir(store.dir())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect()
    }

    #[tokio::test]
    async fn test_create_normalizes_and_stores_image() {
        let pool = test_pool().await;
        let seller_id = test_seller(&pool).await;
        let dir = tempfile::tempdir().unwrap();
        let media = MediaStore::new(dir.path());
        let service = ListingService::new(&pool, &media);

        let product = service.create(seller_id, listing()).await.unwrap();

        assert_eq!(product.title, "Denim Jacket");
        assert_eq!(product.category, "Jackets");
        assert_eq!(product.kind, "Outerwear");
        assert_eq!(product.color, "Blue");
        assert_eq!(product.description, "Warm and sturdy");
        assert_eq!(product.size, "M");
        assert_eq!(media_files(&media), vec![product.image.clone()]);
    }

    #[tokio::test]
    async fn test_create_with_unknown_seller_leaves_no_orphan_file() {
        let pool = test_pool().await;
        let dir = tempfile::tempdir().unwrap();
        let media = MediaStore::new(dir.path());
        let service = ListingService::new(&pool, &media);

        let err = service
            .create(SellerId::new(999), listing())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
        assert!(media_files(&media).is_empty());
    }

    #[tokio::test]
    async fn test_update_replaces_image_and_removes_old_file() {
        let pool = test_pool().await;
        let seller_id = test_seller(&pool).await;
        let dir = tempfile::tempdir().unwrap();
        let media = MediaStore::new(dir.path());
        let service = ListingService::new(&pool, &media);

        let product = service.create(seller_id, listing()).await.unwrap();
        let old_image = product.image.clone();

        let updated = service
            .update(
                seller_id,
                product.id,
                ListingChanges {
                    image: Some((BASE64.encode(b"new bytes"), "jpeg".to_owned())),
                    ..ListingChanges::default()
                },
            )
            .await
            .unwrap();

        assert_ne!(updated.image, old_image);
        assert_eq!(media_files(&media), vec![updated.image.clone()]);
    }

    #[tokio::test]
    async fn test_update_partial_keeps_other_fields() {
        let pool = test_pool().await;
        let seller_id = test_seller(&pool).await;
        let dir = tempfile::tempdir().unwrap();
        let media = MediaStore::new(dir.path());
        let service = ListingService::new(&pool, &media);

        let product = service.create(seller_id, listing()).await.unwrap();

        let updated = service
            .update(
                seller_id,
                product.id,
                ListingChanges {
                    title: Some("wool coat".to_owned()),
                    ..ListingChanges::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.title, "Wool Coat");
        assert_eq!(updated.price, product.price);
        assert_eq!(updated.category, product.category);
        assert_eq!(updated.image, product.image);
        assert_eq!(updated.description, product.description);
    }

    #[tokio::test]
    async fn test_update_by_non_owner_is_forbidden() {
        let pool = test_pool().await;
        let seller_id = test_seller(&pool).await;
        let other = SellerRepository::new(&pool)
            .create(
                "bob",
                &Email::parse("bob@example.com").unwrap(),
                "$argon2id$fake",
            )
            .await
            .unwrap()
            .id;
        let dir = tempfile::tempdir().unwrap();
        let media = MediaStore::new(dir.path());
        let service = ListingService::new(&pool, &media);

        let product = service.create(seller_id, listing()).await.unwrap();

        let err = service
            .update(
                other,
                product.id,
                ListingChanges {
                    title: Some("stolen".to_owned()),
                    ..ListingChanges::default()
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_delete_removes_row_and_file() {
        let pool = test_pool().await;
        let seller_id = test_seller(&pool).await;
        let dir = tempfile::tempdir().unwrap();
        let media = MediaStore::new(dir.path());
        let service = ListingService::new(&pool, &media);

        let product = service.create(seller_id, listing()).await.unwrap();

        service.delete(seller_id, product.id).await.unwrap();

        assert!(media_files(&media).is_empty());
        assert!(
            ProductRepository::new(&pool)
                .get_by_id(product.id)
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_delete_missing_product_is_not_found() {
        let pool = test_pool().await;
        let seller_id = test_seller(&pool).await;
        let dir = tempfile::tempdir().unwrap();
        let media = MediaStore::new(dir.path());
        let service = ListingService::new(&pool, &media);

        let err = service
            .delete(seller_id, ProductId::new(12345))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
