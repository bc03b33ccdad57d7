/// Authentication endpoints
///
/// Signin exchanges a username/password pair for a token pair; refresh
/// exchanges a still-valid refresh token for a new pair. Both surface
/// every failure as the same uniform 403 (see `error.rs`).

use actix_web::{web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::auth::AuthService;
use crate::error::{AppError, AuthError};
use crate::validators::is_blank;

/// Signin request body
#[derive(Deserialize)]
pub struct SigninRequest {
    pub username: String,
    pub password: String,
}

/// Token pair response for signin and refresh
#[derive(Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// POST /auth/signin
///
/// Authenticates a user and returns an access/refresh token pair.
///
/// # Errors
/// - 403: blank fields, unknown user, or wrong password — one uniform
///   rejection for all of them
pub async fn signin(
    form: web::Json<SigninRequest>,
    auth: web::Data<AuthService>,
) -> Result<HttpResponse, AppError> {
    if is_blank(&form.username) || is_blank(&form.password) {
        return Err(AppError::Auth(AuthError::InvalidRequest));
    }

    let pair = auth.signin(&form.username, &form.password).await?;

    Ok(HttpResponse::Ok().json(TokenResponse {
        access_token: pair.access_token,
        refresh_token: pair.refresh_token,
        token_type: "Bearer".to_string(),
        expires_in: auth.jwt_settings().access_token_expiry,
    }))
}

/// PUT /auth/refresh/{username}
///
/// Exchanges the refresh token carried in the Authorization header for
/// a new token pair. The path username must match the token subject.
///
/// # Errors
/// - 403: blank/missing inputs, invalid or expired token, subject
///   mismatch, or vanished identity — one uniform rejection
pub async fn refresh(
    path: web::Path<String>,
    request: HttpRequest,
    auth: web::Data<AuthService>,
) -> Result<HttpResponse, AppError> {
    let username = path.into_inner();
    let token = bearer_value(&request);

    // Blank inputs short-circuit before any token work
    let token = match token {
        Some(t) if !is_blank(&username) && !is_blank(&t) => t,
        _ => return Err(AppError::Auth(AuthError::InvalidRequest)),
    };

    let pair = auth.refresh(&username, &token).await?;

    Ok(HttpResponse::Ok().json(TokenResponse {
        access_token: pair.access_token,
        refresh_token: pair.refresh_token,
        token_type: "Bearer".to_string(),
        expires_in: auth.jwt_settings().access_token_expiry,
    }))
}

/// Authorization header value with an optional `Bearer ` prefix stripped.
fn bearer_value(request: &HttpRequest) -> Option<String> {
    request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .map(|h| h.strip_prefix("Bearer ").unwrap_or(h).to_string())
}
