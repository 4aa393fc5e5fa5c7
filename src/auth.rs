// ABOUTME: JWT identity: claims, token issue/verify, and the authentication middleware
// ABOUTME: Tokens are accepted from the Authorization header, the token query param, or the jwt cookie
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CredVault Contributors

//! Authentication and identity.
//!
//! The middleware resolves a bearer token from one of three carriers,
//! verifies it once, and inserts a typed [`AuthenticatedUser`] as a request
//! extension. Handlers never re-parse claims; [`AuthenticatedUser::is_admin`]
//! is the only role-check primitive.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, Request};
use axum::middleware::Next;
use axum::response::Response;
use chrono::{Duration, Utc};
use credvault_core::models::{Role, User};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::errors::{AppError, AppResult};

/// JWT claim set carried by vault tokens.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// User id
    id: i64,
    /// Login name
    username: String,
    /// Role string, `admin` or `user`
    role: String,
    /// Expiration, unix seconds
    exp: i64,
}

/// The identity decoded from a verified token.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    /// User id from the `id` claim.
    pub id: i64,
    /// Login name from the `username` claim.
    pub username: String,
    /// Role from the `role` claim.
    pub role: Role,
}

impl AuthenticatedUser {
    /// Whether this identity may perform admin-only operations.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self.role, Role::Admin)
    }
}

/// Issues and verifies vault JWTs (HS256).
pub struct AuthManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl_secs: i64,
}

impl AuthManager {
    /// Creates a manager from the shared secret and token lifetime.
    #[must_use]
    pub fn new(secret: &[u8], ttl_secs: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            ttl_secs,
        }
    }

    /// Issues a signed token for the given user.
    ///
    /// # Errors
    ///
    /// Returns an error if signing fails.
    pub fn issue_token(&self, user: &User) -> AppResult<String> {
        let exp = Utc::now() + Duration::seconds(self.ttl_secs);
        let claims = Claims {
            id: user.id,
            username: user.username.clone(),
            role: user.role.as_str().to_owned(),
            exp: exp.timestamp(),
        };

        jsonwebtoken::encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::crypto(format!("Failed to sign token: {e}")))
    }

    /// Verifies a token and extracts the identity.
    ///
    /// # Errors
    ///
    /// Returns an authentication error if the signature is invalid, the
    /// token is expired, or the role claim is unrecognized.
    pub fn decode_token(&self, token: &str) -> AppResult<AuthenticatedUser> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map_err(|e| {
                tracing::debug!(error = %e, "Token verification failed");
                AppError::authentication("Invalid or expired token")
            })?;

        let role = Role::parse(&data.claims.role)
            .ok_or_else(|| AppError::authentication("Invalid role claim in token"))?;

        Ok(AuthenticatedUser {
            id: data.claims.id,
            username: data.claims.username,
            role,
        })
    }
}

/// Pulls the bearer token from the `Authorization` header, the `token`
/// query parameter, or the `jwt` cookie, in that order.
fn extract_token(request: &Request<Body>) -> Option<String> {
    if let Some(token) = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
    {
        return Some(token.to_owned());
    }

    if let Some(token) = request
        .uri()
        .query()
        .and_then(|query| query.split('&').find_map(|pair| pair.strip_prefix("token=")))
    {
        return Some(token.to_owned());
    }

    request
        .headers()
        .get(header::COOKIE)
        .and_then(|value| value.to_str().ok())
        .and_then(|cookies| {
            cookies
                .split(';')
                .map(str::trim)
                .find_map(|cookie| cookie.strip_prefix("jwt="))
        })
        .map(str::to_owned)
}

/// Requires a valid token and stores the decoded identity as an extension.
///
/// # Errors
///
/// Returns an authentication error when no token is presented or the token
/// fails verification.
pub async fn auth_middleware(
    State(auth): State<Arc<AuthManager>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_token(&request)
        .ok_or_else(|| AppError::authentication("Missing authentication token"))?;
    let user = auth.decode_token(&token)?;

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}
