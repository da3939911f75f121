//! Authentication extractor.
//!
//! Protected routes take [`RequireSeller`] as an argument; it validates the
//! bearer token and resolves the acting seller, rejecting with the standard
//! error envelope otherwise.

use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;

use marketstall_core::Email;

use crate::db::SellerRepository;
use crate::error::AppError;
use crate::models::Seller;
use crate::state::AppState;

/// Extractor that requires a valid bearer token.
///
/// The token's subject (the seller's email) is resolved against the store, so
/// a token for a deleted or never-existing account does not authenticate.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireSeller(seller): RequireSeller,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", seller.username)
/// }
/// ```
pub struct RequireSeller(pub Seller);

impl FromRequestParts<AppState> for RequireSeller {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("missing bearer token".to_owned()))?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Unauthorized("malformed authorization header".to_owned()))?;

        let claims = state.tokens().verify(token)?;

        let email = Email::parse(&claims.sub)
            .map_err(|_| AppError::Unauthorized("invalid token subject".to_owned()))?;

        let seller = SellerRepository::new(state.pool())
            .get_by_email(&email)
            .await?
            .ok_or_else(|| AppError::Unauthorized("unknown token subject".to_owned()))?;

        Ok(Self(seller))
    }
}
