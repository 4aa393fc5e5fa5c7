// ABOUTME: Token CRUD route handlers over the encrypting store with soft deletion
// ABOUTME: Every store outcome is audited; reads audit too because they reveal decrypted secrets
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CredVault Contributors

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
    Extension, Json, Router,
};
use credvault_core::models::{audit::actions, AuditStatus, NewToken, Token};
use tracing::info;

use crate::auth::AuthenticatedUser;
use crate::errors::{AppError, AppResult};
use crate::server::ServerResources;

/// Token management routes (Axum).
pub struct TokenRoutes;

impl TokenRoutes {
    /// Create the token management routes.
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/tokens", get(Self::handle_list_tokens))
            .route("/tokens", post(Self::handle_create_token))
            .route("/tokens/:id", get(Self::handle_get_token))
            .route("/tokens/:id", put(Self::handle_update_token))
            .route("/tokens/:id", delete(Self::handle_delete_token))
            .with_state(resources)
    }

    /// Handle token creation.
    #[tracing::instrument(skip(resources, payload), fields(route = "create_token"))]
    async fn handle_create_token(
        State(resources): State<Arc<ServerResources>>,
        Extension(user): Extension<AuthenticatedUser>,
        Json(payload): Json<NewToken>,
    ) -> AppResult<impl IntoResponse> {
        let expires_at = payload.validate()?;

        match resources.database.create_token(&payload, expires_at).await {
            Ok(token) => {
                info!(
                    token_id = token.id,
                    integration_id = token.integration_id,
                    "Token created"
                );
                resources
                    .audit
                    .record(
                        &user.username,
                        actions::TOKEN_CREATE,
                        AuditStatus::Ok,
                        &format!("id={} integration_id={}", token.id, token.integration_id),
                    )
                    .await;
                Ok((StatusCode::CREATED, Json(token)))
            }
            Err(e) => {
                resources
                    .audit
                    .record(
                        &user.username,
                        actions::TOKEN_CREATE,
                        AuditStatus::Fail,
                        &format!("integration_id={} erro={}", payload.integration_id, e),
                    )
                    .await;
                Err(e)
            }
        }
    }

    /// Handle token listing. Secrets arrive decrypted, so the read itself
    /// is audited.
    #[tracing::instrument(skip(resources), fields(route = "list_tokens"))]
    async fn handle_list_tokens(
        State(resources): State<Arc<ServerResources>>,
        Extension(user): Extension<AuthenticatedUser>,
    ) -> AppResult<Json<Vec<Token>>> {
        match resources.database.list_tokens().await {
            Ok(tokens) => {
                info!(total = tokens.len(), "Listed tokens");
                resources
                    .audit
                    .record(
                        &user.username,
                        actions::TOKEN_LIST,
                        AuditStatus::Ok,
                        &format!("total={}", tokens.len()),
                    )
                    .await;
                Ok(Json(tokens))
            }
            Err(e) => {
                resources
                    .audit
                    .record(&user.username, actions::TOKEN_LIST, AuditStatus::Fail, &e.to_string())
                    .await;
                Err(e)
            }
        }
    }

    /// Handle token lookup by id.
    #[tracing::instrument(skip(resources), fields(route = "get_token", token_id = id))]
    async fn handle_get_token(
        State(resources): State<Arc<ServerResources>>,
        Extension(user): Extension<AuthenticatedUser>,
        Path(id): Path<i64>,
    ) -> AppResult<Json<Token>> {
        match resources.database.get_token(id).await {
            Ok(token) => {
                resources
                    .audit
                    .record(
                        &user.username,
                        actions::TOKEN_GET,
                        AuditStatus::Ok,
                        &format!("id={id}"),
                    )
                    .await;
                Ok(Json(token))
            }
            Err(e) => {
                resources
                    .audit
                    .record(
                        &user.username,
                        actions::TOKEN_GET,
                        AuditStatus::Fail,
                        &format!("id={id} erro={e}"),
                    )
                    .await;
                Err(e)
            }
        }
    }

    /// Handle token update. The payload passes the same validation as
    /// creation before the store is touched.
    #[tracing::instrument(skip(resources, payload), fields(route = "update_token", token_id = id))]
    async fn handle_update_token(
        State(resources): State<Arc<ServerResources>>,
        Extension(user): Extension<AuthenticatedUser>,
        Path(id): Path<i64>,
        Json(payload): Json<NewToken>,
    ) -> AppResult<Json<Token>> {
        let expires_at = payload.validate()?;

        match resources.database.update_token(id, &payload, expires_at).await {
            Ok(token) => {
                info!(token_id = id, "Token updated");
                resources
                    .audit
                    .record(
                        &user.username,
                        actions::TOKEN_UPDATE,
                        AuditStatus::Ok,
                        &format!("id={id}"),
                    )
                    .await;
                Ok(Json(token))
            }
            Err(e) => {
                resources
                    .audit
                    .record(
                        &user.username,
                        actions::TOKEN_UPDATE,
                        AuditStatus::Fail,
                        &format!("id={id} erro={e}"),
                    )
                    .await;
                Err(e)
            }
        }
    }

    /// Handle token deletion (admin only). Deletion is soft: the row keeps
    /// its ciphertext but disappears from every read path.
    #[tracing::instrument(skip(resources), fields(route = "delete_token", token_id = id))]
    async fn handle_delete_token(
        State(resources): State<Arc<ServerResources>>,
        Extension(user): Extension<AuthenticatedUser>,
        Path(id): Path<i64>,
    ) -> AppResult<impl IntoResponse> {
        if !user.is_admin() {
            return Err(AppError::forbidden("Admin access required"));
        }

        match resources.database.delete_token(id).await {
            Ok(()) => {
                info!(token_id = id, "Token deleted");
                resources
                    .audit
                    .record(
                        &user.username,
                        actions::TOKEN_DELETE,
                        AuditStatus::Ok,
                        &format!("id={id}"),
                    )
                    .await;
                Ok(StatusCode::NO_CONTENT)
            }
            Err(e) => {
                resources
                    .audit
                    .record(
                        &user.username,
                        actions::TOKEN_DELETE,
                        AuditStatus::Fail,
                        &format!("id={id} erro={e}"),
                    )
                    .await;
                Err(e)
            }
        }
    }
}
