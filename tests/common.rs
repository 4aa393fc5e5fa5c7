// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides common database, auth, and user creation helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CredVault Contributors
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]
#![allow(
    dead_code,
    clippy::wildcard_in_or_patterns,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::module_name_repetitions
)]
//! Shared test utilities for `credvault`
//!
//! This module provides common test setup functions to reduce duplication
//! across integration tests.

use std::env;
use std::sync::{Arc, Once};

use anyhow::Result;
use credvault::auth::AuthManager;
use credvault::config::environment::ServerConfig;
use credvault::crypto::FieldCipher;
use credvault::database::{AuditLogFilter, Database};
use credvault::server::ServerResources;
use credvault_core::models::{AuditEntry, Role, User};

static INIT_LOGGER: Once = Once::new();

/// Fixed 32-byte field-encryption key shared by all tests.
pub const TEST_ENCRYPTION_KEY: &[u8; 32] = b"0123456789abcdef0123456789abcdef";

/// JWT signing secret shared by all tests.
pub const TEST_JWT_SECRET: &str = "test_jwt_secret";

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        // Check for TEST_LOG environment variable to control test logging level
        let log_level = match env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            Ok("WARN" | "ERROR") | _ => tracing::Level::WARN, // Default to WARN for quiet tests
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Field cipher over the fixed test key.
pub fn test_cipher() -> FieldCipher {
    FieldCipher::new(Some(TEST_ENCRYPTION_KEY.to_vec()))
}

/// Standard test database setup
pub async fn create_test_database() -> Result<Arc<Database>> {
    init_test_logging();
    let database = Database::new("sqlite::memory:", test_cipher()).await?;
    Ok(Arc::new(database))
}

/// Test database setup with a custom cipher
pub async fn create_test_database_with_cipher(cipher: FieldCipher) -> Result<Arc<Database>> {
    init_test_logging();
    let database = Database::new("sqlite::memory:", cipher).await?;
    Ok(Arc::new(database))
}

/// Test database setup over an explicit URL (for file-backed databases)
pub async fn create_test_database_at(url: &str, cipher: FieldCipher) -> Result<Arc<Database>> {
    init_test_logging();
    let database = Database::new(url, cipher).await?;
    Ok(Arc::new(database))
}

/// Server configuration for tests; never read from the environment.
pub fn test_server_config() -> ServerConfig {
    ServerConfig {
        database_url: "sqlite::memory:".to_owned(),
        host: "127.0.0.1".to_owned(),
        http_port: 0,
        jwt_secret: TEST_JWT_SECRET.to_owned(),
        jwt_ttl_secs: 3600,
    }
}

/// Create test authentication manager
pub fn create_test_auth_manager() -> AuthManager {
    AuthManager::new(TEST_JWT_SECRET.as_bytes(), 3600)
}

/// Standard server resources over a fresh in-memory database
pub async fn create_test_resources() -> Result<Arc<ServerResources>> {
    let database = create_test_database().await?;
    Ok(Arc::new(ServerResources::new(
        (*database).clone(),
        create_test_auth_manager(),
        test_server_config(),
    )))
}

/// Server resources over an existing database handle
pub fn create_test_resources_with_database(database: &Arc<Database>) -> Arc<ServerResources> {
    Arc::new(ServerResources::new(
        (**database).clone(),
        create_test_auth_manager(),
        test_server_config(),
    ))
}

/// Create a user row directly in the store, bypassing the HTTP surface.
///
/// Cost 4 hashes: fixture credentials, not production work factors.
pub async fn create_test_user(
    resources: &ServerResources,
    username: &str,
    password: &str,
    role: Role,
) -> Result<User> {
    let password_hash = bcrypt::hash(password, 4)?;
    let user = resources
        .database
        .create_user(username, &password_hash, role)
        .await?;
    Ok(user)
}

/// Create a user and return it with a ready-to-send `Bearer` header value.
pub async fn create_authenticated_user(
    resources: &ServerResources,
    username: &str,
    role: Role,
) -> Result<(User, String)> {
    let user = create_test_user(resources, username, "password123", role).await?;
    let token = resources.auth_manager.issue_token(&user)?;
    Ok((user, format!("Bearer {token}")))
}

/// Every audit entry recorded for the given action, newest first.
pub async fn audit_entries_for_action(
    database: &Database,
    action: &str,
) -> Result<Vec<AuditEntry>> {
    let page = database
        .query_audit_logs(&AuditLogFilter {
            action: Some(action.to_owned()),
            ..Default::default()
        })
        .await?;
    Ok(page.items)
}

/// Total number of audit entries recorded so far.
pub async fn audit_entry_count(database: &Database) -> Result<i64> {
    let page = database
        .query_audit_logs(&AuditLogFilter::default())
        .await?;
    Ok(page.total)
}
