//! Seller repository for database operations.

use chrono::Utc;
use sqlx::SqlitePool;

use marketstall_core::{Email, SellerId};

use super::RepositoryError;
use crate::models::Seller;

/// Row shape for credential lookups: the seller plus its password hash.
#[derive(sqlx::FromRow)]
struct SellerAuthRow {
    #[sqlx(flatten)]
    seller: Seller,
    password_hash: String,
}

/// Repository for seller database operations.
pub struct SellerRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> SellerRepository<'a> {
    /// Create a new seller repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new seller with a hashed password.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        username: &str,
        email: &Email,
        password_hash: &str,
    ) -> Result<Seller, RepositoryError> {
        let seller = sqlx::query_as::<_, Seller>(
            r"
            INSERT INTO seller (username, email, password_hash, created_at)
            VALUES (?, ?, ?, ?)
            RETURNING id, username, email, created_at
            ",
        )
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .bind(Utc::now())
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("email already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        Ok(seller)
    }

    /// Get a seller by their ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: SellerId) -> Result<Option<Seller>, RepositoryError> {
        let seller = sqlx::query_as::<_, Seller>(
            r"
            SELECT id, username, email, created_at
            FROM seller
            WHERE id = ?
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(seller)
    }

    /// Get a seller by their email address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_email(&self, email: &Email) -> Result<Option<Seller>, RepositoryError> {
        let seller = sqlx::query_as::<_, Seller>(
            r"
            SELECT id, username, email, created_at
            FROM seller
            WHERE email = ?
            ",
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        Ok(seller)
    }

    /// Get a seller and their password hash by email.
    ///
    /// Returns `None` if no seller with this email exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_with_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(Seller, String)>, RepositoryError> {
        let row = sqlx::query_as::<_, SellerAuthRow>(
            r"
            SELECT id, username, email, created_at, password_hash
            FROM seller
            WHERE email = ?
            ",
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(|r| (r.seller, r.password_hash)))
    }
}
