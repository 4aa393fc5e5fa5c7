// ABOUTME: Best-effort audit recording service wrapping the append-only store
// ABOUTME: A failed append is warn-logged and swallowed; it never blocks the primary operation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CredVault Contributors

//! Audit trail recording.
//!
//! Route handlers call [`AuditLog::record`] after every mutating or
//! secret-revealing operation, once per request, success or failure. The
//! service is constructed once at startup and shared through
//! `ServerResources`; there is no global logger.

use std::sync::Arc;

use credvault_core::models::AuditStatus;
use tracing::{debug, warn};

use crate::database::Database;

/// Audit recorder for vault operations.
pub struct AuditLog {
    /// Database connection for storing audit entries
    database: Arc<Database>,
}

impl AuditLog {
    /// Creates a recorder over the given database.
    #[must_use]
    pub const fn new(database: Arc<Database>) -> Self {
        Self { database }
    }

    /// Records one audit entry, best-effort.
    ///
    /// The append never propagates its failure: the primary operation has
    /// already succeeded or failed on its own terms, and its outcome must
    /// not change because the trail write did. A failed append is logged at
    /// `warn` with the dropped entry's fields.
    pub async fn record(&self, username: &str, action: &str, status: AuditStatus, details: &str) {
        debug!(
            username,
            action,
            status = status.as_str(),
            details,
            "Recording audit entry"
        );

        if let Err(e) = self
            .database
            .append_audit_log(username, action, status, details)
            .await
        {
            warn!(
                username,
                action,
                status = status.as_str(),
                error = %e,
                "Failed to record audit entry"
            );
        }
    }
}
