// ABOUTME: Registration and login route handlers
// ABOUTME: Registration is open and audited; login verifies bcrypt credentials and issues the JWT
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CredVault Contributors

use std::sync::Arc;

use axum::{
    extract::State, http::StatusCode, response::IntoResponse, routing::post, Json, Router,
};
use credvault_core::models::{audit::actions, AuditStatus, NewUser};
use serde::{Deserialize, Serialize};
use tokio::task;
use tracing::{debug, info};

use crate::crypto;
use crate::errors::{AppError, AppResult};
use crate::server::ServerResources;

/// Login request payload.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Login name
    #[serde(default)]
    pub username: String,
    /// Plaintext password, verified against the stored hash
    #[serde(default)]
    pub password: String,
}

/// Login response payload.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Signed bearer token
    pub token: String,
}

/// Registration and login routes (Axum).
pub struct AuthRoutes;

impl AuthRoutes {
    /// Create the authentication routes.
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/register", post(Self::handle_register))
            .route("/login", post(Self::handle_login))
            .with_state(resources)
    }

    /// Handle user registration.
    ///
    /// Registration is unauthenticated, so the audit entry is tagged with
    /// the username being registered rather than a caller identity.
    #[tracing::instrument(skip(resources, payload), fields(route = "register"))]
    async fn handle_register(
        State(resources): State<Arc<ServerResources>>,
        Json(payload): Json<NewUser>,
    ) -> AppResult<impl IntoResponse> {
        info!("User registration attempt");

        let role = payload.validate()?;
        let password_hash = crypto::hash_password(&payload.password)?;

        match resources
            .database
            .create_user(&payload.username, &password_hash, role)
            .await
        {
            Ok(user) => {
                info!(user_id = user.id, "User registered successfully");
                resources
                    .audit
                    .record(
                        &user.username,
                        actions::USER_REGISTER,
                        AuditStatus::Ok,
                        &format!("id={}", user.id),
                    )
                    .await;
                Ok((StatusCode::CREATED, Json(user.summary())))
            }
            Err(e) => {
                resources
                    .audit
                    .record(
                        &payload.username,
                        actions::USER_REGISTER,
                        AuditStatus::Fail,
                        &e.to_string(),
                    )
                    .await;
                Err(e)
            }
        }
    }

    /// Handle user login.
    ///
    /// Login is neither mutating nor secret-revealing, so it writes no
    /// audit entry. Lookup misses and bad passwords share one response to
    /// avoid leaking which usernames exist.
    #[tracing::instrument(skip(resources, payload), fields(route = "login"))]
    async fn handle_login(
        State(resources): State<Arc<ServerResources>>,
        Json(payload): Json<LoginRequest>,
    ) -> AppResult<Json<LoginResponse>> {
        debug!("User login attempt");

        let user = resources
            .database
            .get_user_by_username(&payload.username)
            .await
            .map_err(|e| {
                debug!(username = %payload.username, error = %e, "Login failed: user lookup error");
                AppError::authentication("Invalid username or password")
            })?
            .ok_or_else(|| AppError::authentication("Invalid username or password"))?;

        // Verify password using spawn_blocking to avoid blocking async executor
        let password = payload.password;
        let password_hash = user.password_hash.clone();
        let password_valid =
            task::spawn_blocking(move || crypto::verify_password(&password, &password_hash))
                .await
                .map_err(|e| {
                    AppError::internal(format!("Password verification task failed: {e}"))
                })?;

        if !password_valid {
            return Err(AppError::authentication("Invalid username or password"));
        }

        let token = resources.auth_manager.issue_token(&user)?;
        info!(user_id = user.id, "User logged in successfully");

        Ok(Json(LoginResponse { token }))
    }
}
