//! Registration and login handlers.

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};

use marketstall_core::{Email, SellerId};

use super::{Data, require};
use crate::error::AppError;
use crate::services::AuthService;
use crate::state::AppState;

/// Request body for registration.
///
/// Fields are optional at the serde level so absent fields surface as a 400
/// with the standard envelope instead of a deserialization rejection.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Seller summary plus a fresh bearer token.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub id: SellerId,
    pub username: String,
    pub email: Email,
    pub token: String,
}

/// Register a new seller.
///
/// POST /api/auth/register
///
/// # Errors
///
/// Returns 400 for missing fields or an invalid email, 409 for a duplicate
/// email.
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<Data<AuthResponse>>, AppError> {
    let username = require(req.username, "username")?;
    let email = require(req.email, "email")?;
    let password = require(req.password, "password")?;

    let seller = AuthService::new(state.pool())
        .register(&username, &email, &password)
        .await?;

    let token = state.tokens().issue(&seller.email)?;

    Ok(Json(Data::new(AuthResponse {
        id: seller.id,
        username: seller.username,
        email: seller.email,
        token,
    })))
}

/// Login an existing seller.
///
/// POST /api/auth/login
///
/// # Errors
///
/// Returns 400 for missing fields, 401 for an unknown email or wrong
/// password (indistinguishable by design).
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<Data<AuthResponse>>, AppError> {
    let email = require(req.email, "email")?;
    let password = require(req.password, "password")?;

    let seller = AuthService::new(state.pool())
        .login(&email, &password)
        .await?;

    let token = state.tokens().issue(&seller.email)?;

    Ok(Json(Data::new(AuthResponse {
        id: seller.id,
        username: seller.username,
        email: seller.email,
        token,
    })))
}
