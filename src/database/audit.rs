// ABOUTME: Append-only audit trail persistence and the filtered, paginated query
// ABOUTME: Page clamping lives here so every caller gets the same pagination law
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CredVault Contributors

use chrono::{DateTime, Utc};
use credvault_core::models::{AuditEntry, AuditStatus};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use super::Database;
use crate::errors::{AppError, AppResult};

/// Page size applied when the requested one is out of range.
const DEFAULT_PAGE_SIZE: i64 = 50;

/// Largest page size a query may request.
const MAX_PAGE_SIZE: i64 = 200;

/// Filters for the audit trail query. All filters are optional and combine
/// conjunctively.
///
/// `page` below 1 is clamped to 1; `page_size` below 1 or above 200 falls
/// back to 50, so the zero values from `Default` yield the first page at
/// the default size.
#[derive(Debug, Clone, Default)]
pub struct AuditLogFilter {
    /// Exact match on the acting username.
    pub username: Option<String>,
    /// Exact match on the action name.
    pub action: Option<String>,
    /// Exact match on the stored status (`OK` / `FAIL`). Matched verbatim;
    /// an unrecognized value simply matches no rows.
    pub status: Option<String>,
    /// Entries at or after this instant.
    pub start: Option<DateTime<Utc>>,
    /// Entries at or before this instant.
    pub end: Option<DateTime<Utc>>,
    /// 1-indexed page number.
    pub page: i64,
    /// Rows per page.
    pub page_size: i64,
}

/// One page of audit trail results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLogPage {
    /// Effective page number after clamping.
    pub page: i64,
    /// Effective page size after clamping.
    pub page_size: i64,
    /// Total rows matching the filters across all pages.
    pub total: i64,
    /// Matching entries, newest first.
    pub items: Vec<AuditEntry>,
}

impl Database {
    /// Appends one immutable audit entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn append_audit_log(
        &self,
        username: &str,
        action: &str,
        status: AuditStatus,
        details: &str,
    ) -> AppResult<()> {
        sqlx::query(
            r"
            INSERT INTO audit_logs (timestamp, username, action, status, details)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(Utc::now().to_rfc3339())
        .bind(username)
        .bind(action)
        .bind(status.as_str())
        .bind(details)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::storage(format!("Failed to append audit log: {e}")))?;

        Ok(())
    }

    /// Queries the audit trail, newest first.
    ///
    /// Returns the total match count alongside the requested page so callers
    /// can paginate without a second round trip.
    ///
    /// # Errors
    ///
    /// Returns an error if either the count or the page query fails.
    pub async fn query_audit_logs(&self, filter: &AuditLogFilter) -> AppResult<AuditLogPage> {
        let page = filter.page.max(1);
        let page_size = if (1..=MAX_PAGE_SIZE).contains(&filter.page_size) {
            filter.page_size
        } else {
            DEFAULT_PAGE_SIZE
        };
        let offset = (page - 1) * page_size;

        let mut where_clause = String::from(" FROM audit_logs WHERE 1=1");
        let mut bind_values: Vec<String> = vec![];

        if let Some(username) = &filter.username {
            where_clause.push_str(" AND username = ?");
            bind_values.push(username.clone());
        }

        if let Some(action) = &filter.action {
            where_clause.push_str(" AND action = ?");
            bind_values.push(action.clone());
        }

        if let Some(status) = &filter.status {
            where_clause.push_str(" AND status = ?");
            bind_values.push(status.clone());
        }

        if let Some(start) = filter.start {
            where_clause.push_str(" AND timestamp >= ?");
            bind_values.push(start.to_rfc3339());
        }

        if let Some(end) = filter.end {
            where_clause.push_str(" AND timestamp <= ?");
            bind_values.push(end.to_rfc3339());
        }

        let count_sql = format!("SELECT COUNT(*){where_clause}");
        let mut count_query = sqlx::query_scalar(&count_sql);
        for value in &bind_values {
            count_query = count_query.bind(value);
        }
        let total: i64 = count_query
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::storage(format!("Failed to count audit logs: {e}")))?;

        let select_sql = format!(
            "SELECT id, timestamp, username, action, status, details{where_clause} \
             ORDER BY timestamp DESC, id DESC LIMIT ? OFFSET ?"
        );
        let mut select_query = sqlx::query(&select_sql);
        for value in &bind_values {
            select_query = select_query.bind(value);
        }
        select_query = select_query.bind(page_size).bind(offset);

        let rows = select_query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::storage(format!("Failed to query audit logs: {e}")))?;

        let items = rows
            .iter()
            .map(Self::row_to_audit_entry)
            .collect::<AppResult<Vec<_>>>()?;

        Ok(AuditLogPage {
            page,
            page_size,
            total,
            items,
        })
    }

    /// Converts a database row to an [`AuditEntry`].
    fn row_to_audit_entry(row: &SqliteRow) -> AppResult<AuditEntry> {
        let status_str: String = row
            .try_get("status")
            .map_err(|e| AppError::storage(format!("Failed to get status: {e}")))?;
        let status = AuditStatus::parse(&status_str).ok_or_else(|| {
            AppError::storage(format!("Invalid audit status in database: {status_str}"))
        })?;

        Ok(AuditEntry {
            id: row
                .try_get("id")
                .map_err(|e| AppError::storage(format!("Failed to get id: {e}")))?,
            timestamp: row
                .try_get("timestamp")
                .map_err(|e| AppError::storage(format!("Failed to get timestamp: {e}")))?,
            username: row
                .try_get("username")
                .map_err(|e| AppError::storage(format!("Failed to get username: {e}")))?,
            action: row
                .try_get("action")
                .map_err(|e| AppError::storage(format!("Failed to get action: {e}")))?,
            status,
            details: row
                .try_get("details")
                .map_err(|e| AppError::storage(format!("Failed to get details: {e}")))?,
        })
    }
}
