// ABOUTME: Integration CRUD route handlers over the encrypting store
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
use credvault_core::models::{audit::actions, AuditStatus, Integration, NewIntegration};
use tracing::info;

use crate::auth::AuthenticatedUser;
use crate::errors::{AppError, AppResult};
use crate::server::ServerResources;

/// Integration management routes (Axum).
pub struct IntegrationRoutes;

impl IntegrationRoutes {
    /// Create the integration management routes.
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/integrations", get(Self::handle_list_integrations))
            .route("/integrations", post(Self::handle_create_integration))
            .route("/integrations/:id", get(Self::handle_get_integration))
            .route("/integrations/:id", put(Self::handle_update_integration))
            .route("/integrations/:id", delete(Self::handle_delete_integration))
            .with_state(resources)
    }

    /// Handle integration creation.
    #[tracing::instrument(skip(resources, payload), fields(route = "create_integration"))]
    async fn handle_create_integration(
        State(resources): State<Arc<ServerResources>>,
        Extension(user): Extension<AuthenticatedUser>,
        Json(payload): Json<NewIntegration>,
    ) -> AppResult<impl IntoResponse> {
        let auth_type = payload.validate()?;

        match resources
            .database
            .create_integration(&payload, auth_type)
            .await
        {
            Ok(integration) => {
                info!(
                    integration_id = integration.id,
                    name = %integration.name,
                    "Integration created"
                );
                resources
                    .audit
                    .record(
                        &user.username,
                        actions::INTEGRATION_CREATE,
                        AuditStatus::Ok,
                        &format!("name={} id={}", integration.name, integration.id),
                    )
                    .await;
                Ok((StatusCode::CREATED, Json(integration)))
            }
            Err(e) => {
                resources
                    .audit
                    .record(
                        &user.username,
                        actions::INTEGRATION_CREATE,
                        AuditStatus::Fail,
                        &format!("name={} erro={}", payload.name, e),
                    )
                    .await;
                Err(e)
            }
        }
    }

    /// Handle integration listing. Secrets arrive decrypted, so the read
    /// itself is audited.
    #[tracing::instrument(skip(resources), fields(route = "list_integrations"))]
    async fn handle_list_integrations(
        State(resources): State<Arc<ServerResources>>,
        Extension(user): Extension<AuthenticatedUser>,
    ) -> AppResult<Json<Vec<Integration>>> {
        match resources.database.list_integrations().await {
            Ok(integrations) => {
                info!(total = integrations.len(), "Listed integrations");
                resources
                    .audit
                    .record(
                        &user.username,
                        actions::INTEGRATION_LIST,
                        AuditStatus::Ok,
                        &format!("total={}", integrations.len()),
                    )
                    .await;
                Ok(Json(integrations))
            }
            Err(e) => {
                resources
                    .audit
                    .record(
                        &user.username,
                        actions::INTEGRATION_LIST,
                        AuditStatus::Fail,
                        &e.to_string(),
                    )
                    .await;
                Err(e)
            }
        }
    }

    /// Handle integration lookup by id.
    #[tracing::instrument(skip(resources), fields(route = "get_integration", integration_id = id))]
    async fn handle_get_integration(
        State(resources): State<Arc<ServerResources>>,
        Extension(user): Extension<AuthenticatedUser>,
        Path(id): Path<i64>,
    ) -> AppResult<Json<Integration>> {
        match resources.database.get_integration(id).await {
            Ok(integration) => {
                resources
                    .audit
                    .record(
                        &user.username,
                        actions::INTEGRATION_GET,
                        AuditStatus::Ok,
                        &format!("id={id}"),
                    )
                    .await;
                Ok(Json(integration))
            }
            Err(e) => {
                resources
                    .audit
                    .record(
                        &user.username,
                        actions::INTEGRATION_GET,
                        AuditStatus::Fail,
                        &format!("id={id} erro={e}"),
                    )
                    .await;
                Err(e)
            }
        }
    }

    /// Handle integration update. The payload passes the same validation
    /// as creation before the store is touched.
    #[tracing::instrument(skip(resources, payload), fields(route = "update_integration", integration_id = id))]
    async fn handle_update_integration(
        State(resources): State<Arc<ServerResources>>,
        Extension(user): Extension<AuthenticatedUser>,
        Path(id): Path<i64>,
        Json(payload): Json<NewIntegration>,
    ) -> AppResult<Json<Integration>> {
        let auth_type = payload.validate()?;

        match resources
            .database
            .update_integration(id, &payload, auth_type)
            .await
        {
            Ok(integration) => {
                info!(integration_id = id, "Integration updated");
                resources
                    .audit
                    .record(
                        &user.username,
                        actions::INTEGRATION_UPDATE,
                        AuditStatus::Ok,
                        &format!("id={id}"),
                    )
                    .await;
                Ok(Json(integration))
            }
            Err(e) => {
                resources
                    .audit
                    .record(
                        &user.username,
                        actions::INTEGRATION_UPDATE,
                        AuditStatus::Fail,
                        &format!("id={id} erro={e}"),
                    )
                    .await;
                Err(e)
            }
        }
    }

    /// Handle integration deletion (admin only).
    #[tracing::instrument(skip(resources), fields(route = "delete_integration", integration_id = id))]
    async fn handle_delete_integration(
        State(resources): State<Arc<ServerResources>>,
        Extension(user): Extension<AuthenticatedUser>,
        Path(id): Path<i64>,
    ) -> AppResult<impl IntoResponse> {
        if !user.is_admin() {
            return Err(AppError::forbidden("Admin access required"));
        }

        match resources.database.delete_integration(id).await {
            Ok(()) => {
                info!(integration_id = id, "Integration deleted");
                resources
                    .audit
                    .record(
                        &user.username,
                        actions::INTEGRATION_DELETE,
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
                        actions::INTEGRATION_DELETE,
                        AuditStatus::Fail,
                        &format!("id={id} erro={e}"),
                    )
                    .await;
                Err(e)
            }
        }
    }
}
