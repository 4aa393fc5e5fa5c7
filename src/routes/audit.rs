// ABOUTME: Audit trail query endpoint with conjunctive filters and pagination
// ABOUTME: Admin only; returns a page envelope of entries, newest first
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CredVault Contributors

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::auth::AuthenticatedUser;
use crate::database::{AuditLogFilter, AuditLogPage};
use crate::errors::{AppError, AppResult};
use crate::server::ServerResources;

/// Query parameters accepted by the audit trail endpoint.
#[derive(Debug, Deserialize)]
pub struct AuditLogQuery {
    /// Filter by the audited actor's username
    pub user: Option<String>,
    /// Filter by exact action name
    pub action: Option<String>,
    /// Filter by entry status, `OK` or `FAIL`
    pub status: Option<String>,
    /// Inclusive lower bound on the entry timestamp, RFC 3339
    pub start: Option<String>,
    /// Inclusive upper bound on the entry timestamp, RFC 3339
    pub end: Option<String>,
    /// 1-indexed page number
    pub page: Option<i64>,
    /// Page size; out-of-range values fall back to the default
    pub page_size: Option<i64>,
}

/// Audit trail query routes (Axum).
pub struct AuditRoutes;

impl AuditRoutes {
    /// Create the audit trail routes.
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/audit-logs", get(Self::handle_query_audit_logs))
            .with_state(resources)
    }

    /// Handle an audit trail query (admin only).
    ///
    /// Querying the trail reveals no vault secrets and writes no entry of
    /// its own.
    #[tracing::instrument(skip(resources), fields(route = "query_audit_logs"))]
    async fn handle_query_audit_logs(
        State(resources): State<Arc<ServerResources>>,
        Extension(user): Extension<AuthenticatedUser>,
        Query(params): Query<AuditLogQuery>,
    ) -> AppResult<Json<AuditLogPage>> {
        if !user.is_admin() {
            return Err(AppError::forbidden("Admin access required"));
        }

        let filter = AuditLogFilter {
            username: params.user,
            action: params.action,
            status: params.status,
            start: params.start.as_deref().and_then(parse_bound),
            end: params.end.as_deref().and_then(parse_bound),
            page: params.page.unwrap_or(1),
            page_size: params.page_size.unwrap_or(0),
        };

        let page = resources.database.query_audit_logs(&filter).await?;
        Ok(Json(page))
    }
}

/// Parses an RFC 3339 range bound. Malformed values are dropped rather
/// than rejected, so a bad bound widens the filter instead of failing
/// the query.
fn parse_bound(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
