// ABOUTME: Audit trail vocabulary: entry shape, OK/FAIL status, stable action names
// ABOUTME: Action strings are wire-visible through the query API filters; never rename them
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CredVault Contributors

//! Audit trail types.
//!
//! Every mutating or secret-revealing operation appends exactly one entry,
//! success or failure. Entries are immutable once written.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome recorded with an audit entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AuditStatus {
    /// The operation completed.
    Ok,
    /// The operation failed after passing validation and authorization.
    Fail,
}

impl AuditStatus {
    /// Stable uppercase form stored in the database and used in filters.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Fail => "FAIL",
        }
    }

    /// Parses the stored form; `None` for anything unrecognized.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "OK" => Some(Self::Ok),
            "FAIL" => Some(Self::Fail),
            _ => None,
        }
    }
}

/// One append-only audit trail row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Auto-increment rowid.
    pub id: i64,
    /// When the entry was recorded.
    pub timestamp: DateTime<Utc>,
    /// Acting username. Empty string for anonymous or system actors.
    pub username: String,
    /// Stable action name, one of [`actions`].
    pub action: String,
    /// Outcome of the operation.
    pub status: AuditStatus,
    /// Free-text context, e.g. `id=7` or `name=github id=3`.
    pub details: String,
}

/// Stable action names recorded in the audit trail.
///
/// These strings are part of the query API contract: clients filter on them
/// verbatim, so renaming one breaks existing consumers.
pub mod actions {
    /// A user account was registered.
    pub const USER_REGISTER: &str = "cadastro_usuario";
    /// The user list was read.
    pub const USER_LIST: &str = "listagem_usuarios";
    /// A user account was deleted.
    pub const USER_DELETE: &str = "delecao_usuario";
    /// An integration was created.
    pub const INTEGRATION_CREATE: &str = "cadastro_integracao";
    /// An integration was replaced via update.
    pub const INTEGRATION_UPDATE: &str = "atualizacao_integracao";
    /// An integration was deleted.
    pub const INTEGRATION_DELETE: &str = "delecao_integracao";
    /// The integration list was read, revealing secrets.
    pub const INTEGRATION_LIST: &str = "listagem_integracoes";
    /// A single integration was read by id, revealing its secret.
    pub const INTEGRATION_GET: &str = "consulta_integracao_id";
    /// A token was created.
    pub const TOKEN_CREATE: &str = "cadastro_token";
    /// A token was replaced via update.
    pub const TOKEN_UPDATE: &str = "atualizacao_token";
    /// A token was soft-deleted.
    pub const TOKEN_DELETE: &str = "delecao_token";
    /// The token list was read, revealing secrets.
    pub const TOKEN_LIST: &str = "listagem_tokens";
    /// A single token was read by id, revealing its secrets.
    pub const TOKEN_GET: &str = "consulta_token_id";
}
