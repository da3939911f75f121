//! Seller domain types.

use chrono::{DateTime, Utc};

use marketstall_core::{Email, SellerId};

/// A registered seller (affiliate).
///
/// The password hash is deliberately not part of the domain type; it is only
/// surfaced by the repository call that verifies credentials.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Seller {
    /// Unique seller ID.
    pub id: SellerId,
    /// Display name chosen at registration.
    pub username: String,
    /// Seller's email address (globally unique).
    pub email: Email,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}
