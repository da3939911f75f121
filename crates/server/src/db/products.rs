//! Product repository for database operations.

use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use marketstall_core::{ProductId, SellerId};

use super::RepositoryError;
use crate::models::{NewProduct, Product, ProductChanges};

const SELECT_COLUMNS: &str =
    "id, title, price, image, description, category, kind, size, color, seller_id, created_at";

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::ForeignKey` if the owning seller does not
    /// exist. Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, new: &NewProduct) -> Result<Product, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(
            r"
            INSERT INTO product
                (title, price, image, description, category, kind, size, color, seller_id, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING id, title, price, image, description, category, kind, size, color, seller_id, created_at
            ",
        )
        .bind(&new.title)
        .bind(new.price)
        .bind(&new.image)
        .bind(&new.description)
        .bind(&new.category)
        .bind(&new.kind)
        .bind(&new.size)
        .bind(&new.color)
        .bind(new.seller_id)
        .bind(Utc::now())
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_foreign_key_violation()
            {
                return RepositoryError::ForeignKey("seller does not exist".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        Ok(product)
    }

    /// Get a product by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {SELECT_COLUMNS} FROM product WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(product)
    }

    /// List all products belonging to one seller, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_by_seller(
        &self,
        seller_id: SellerId,
    ) -> Result<Vec<Product>, RepositoryError> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {SELECT_COLUMNS} FROM product WHERE seller_id = ? ORDER BY id ASC"
        ))
        .bind(seller_id)
        .fetch_all(self.pool)
        .await?;

        Ok(products)
    }

    /// List every product in the catalog, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Product>, RepositoryError> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {SELECT_COLUMNS} FROM product ORDER BY id ASC"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(products)
    }

    /// Exact-match search on the (already normalized) category.
    ///
    /// An unknown category yields an empty vector, not an error.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn search_by_category(
        &self,
        category: &str,
    ) -> Result<Vec<Product>, RepositoryError> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {SELECT_COLUMNS} FROM product WHERE category = ? ORDER BY id ASC"
        ))
        .bind(category)
        .fetch_all(self.pool)
        .await?;

        Ok(products)
    }

    /// Apply a partial update; only supplied fields are overwritten.
    ///
    /// Returns the post-update row, or `None` if the product does not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn update(
        &self,
        id: ProductId,
        changes: &ProductChanges,
    ) -> Result<Option<Product>, RepositoryError> {
        if changes.is_empty() {
            return self.get_by_id(id).await;
        }

        let mut qb = QueryBuilder::<Sqlite>::new("UPDATE product SET ");
        {
            let mut set = qb.separated(", ");
            if let Some(title) = &changes.title {
                set.push("title = ");
                set.push_bind_unseparated(title.as_str());
            }
            if let Some(price) = changes.price {
                set.push("price = ");
                set.push_bind_unseparated(price);
            }
            if let Some(image) = &changes.image {
                set.push("image = ");
                set.push_bind_unseparated(image.as_str());
            }
            if let Some(description) = &changes.description {
                set.push("description = ");
                set.push_bind_unseparated(description.as_str());
            }
            if let Some(category) = &changes.category {
                set.push("category = ");
                set.push_bind_unseparated(category.as_str());
            }
            if let Some(kind) = &changes.kind {
                set.push("kind = ");
                set.push_bind_unseparated(kind.as_str());
            }
            if let Some(size) = &changes.size {
                set.push("size = ");
                set.push_bind_unseparated(size.as_str());
            }
            if let Some(color) = &changes.color {
                set.push("color = ");
                set.push_bind_unseparated(color.as_str());
            }
        }
        qb.push(" WHERE id = ");
        qb.push_bind(id);

        let result = qb.build().execute(self.pool).await?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get_by_id(id).await
    }

    /// Delete a product.
    ///
    /// # Returns
    ///
    /// Returns `true` if the product was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM product WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
