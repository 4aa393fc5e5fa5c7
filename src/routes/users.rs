// ABOUTME: User management route handlers: listing and admin-only deletion
// ABOUTME: Responses are sanitized summaries; password hashes never leave the store layer
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CredVault Contributors

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get},
    Extension, Json, Router,
};
use credvault_core::models::{audit::actions, AuditStatus, UserSummary};
use tracing::info;

use crate::auth::AuthenticatedUser;
use crate::errors::{AppError, AppResult};
use crate::server::ServerResources;

/// User management routes (Axum).
pub struct UserRoutes;

impl UserRoutes {
    /// Create the user management routes.
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/users", get(Self::handle_list_users))
            .route("/users/:id", delete(Self::handle_delete_user))
            .with_state(resources)
    }

    /// Handle user listing.
    ///
    /// Listing reveals no secrets but still audits, for traceability of
    /// identity-management actions.
    #[tracing::instrument(skip(resources), fields(route = "list_users"))]
    async fn handle_list_users(
        State(resources): State<Arc<ServerResources>>,
        Extension(user): Extension<AuthenticatedUser>,
    ) -> AppResult<Json<Vec<UserSummary>>> {
        match resources.database.list_users().await {
            Ok(users) => {
                let summaries: Vec<UserSummary> = users.iter().map(|u| u.summary()).collect();
                info!(total = summaries.len(), "Listed users");
                resources
                    .audit
                    .record(
                        &user.username,
                        actions::USER_LIST,
                        AuditStatus::Ok,
                        &format!("total={}", summaries.len()),
                    )
                    .await;
                Ok(Json(summaries))
            }
            Err(e) => {
                resources
                    .audit
                    .record(&user.username, actions::USER_LIST, AuditStatus::Fail, &e.to_string())
                    .await;
                Err(e)
            }
        }
    }

    /// Handle user deletion (admin only).
    ///
    /// The role check resolves before the store call; a denial is not
    /// audited. A miss on the given id is a FAIL entry like any other
    /// store failure.
    #[tracing::instrument(skip(resources), fields(route = "delete_user", user_id = id))]
    async fn handle_delete_user(
        State(resources): State<Arc<ServerResources>>,
        Extension(user): Extension<AuthenticatedUser>,
        Path(id): Path<i64>,
    ) -> AppResult<impl IntoResponse> {
        if !user.is_admin() {
            return Err(AppError::forbidden("Admin access required"));
        }

        match resources.database.delete_user(id).await {
            Ok(()) => {
                info!(user_id = id, "User deleted");
                resources
                    .audit
                    .record(
                        &user.username,
                        actions::USER_DELETE,
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
                        actions::USER_DELETE,
                        AuditStatus::Fail,
                        &format!("id={id} erro={e}"),
                    )
                    .await;
                Err(e)
            }
        }
    }
}
