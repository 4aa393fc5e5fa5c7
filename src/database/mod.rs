// ABOUTME: Database pool setup, embedded migrations, and the fail-open secret reveal helper
// ABOUTME: Entity stores live in submodules and extend the Database struct defined here
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CredVault Contributors

/// Audit trail persistence and filtered queries
pub mod audit;
/// Integration storage with encrypted client secrets
pub mod integrations;
/// Token storage with encrypted token material and soft deletes
pub mod tokens;
/// User account storage
pub mod users;

pub use audit::{AuditLogFilter, AuditLogPage};

use sqlx::{Pool, Sqlite, SqlitePool};
use tracing::{info, warn};

use crate::crypto::FieldCipher;
use crate::errors::{AppError, AppResult};

/// Database connection pool with field encryption support.
#[derive(Clone)]
pub struct Database {
    pool: Pool<Sqlite>,
    cipher: FieldCipher,
}

impl Database {
    /// Creates a database connection and runs pending migrations.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Database URL is invalid or malformed
    /// - Database connection fails
    /// - `SQLite` file creation fails
    /// - Migration process fails
    pub async fn new(database_url: &str, cipher: FieldCipher) -> AppResult<Self> {
        // Ensure SQLite creates the database file if it doesn't exist
        let connection_options = if database_url.starts_with("sqlite:") {
            format!("{database_url}?mode=rwc")
        } else {
            database_url.to_owned()
        };

        let pool = SqlitePool::connect(&connection_options)
            .await
            .map_err(|e| AppError::storage(format!("Failed to connect to database: {e}")))?;

        let db = Self { pool, cipher };
        db.migrate().await?;

        Ok(db)
    }

    /// Reference to the underlying pool for advanced operations.
    #[must_use]
    pub const fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    /// Runs all pending migrations embedded at compile time from ./migrations.
    async fn migrate(&self) -> AppResult<()> {
        info!("Running database migrations...");

        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::storage(format!("Migration failed: {e}")))?;

        info!("Database migrations completed successfully");
        Ok(())
    }

    /// Decrypts a stored secret, falling open on failure.
    ///
    /// A value that cannot be decrypted (written under a different key, or
    /// predating encryption) is returned exactly as stored; the failure is
    /// logged at `warn`. This is the only place reads tolerate bad ciphertext.
    #[must_use]
    pub fn reveal_secret(&self, stored: &str) -> String {
        match self.cipher.decrypt(stored) {
            Ok(plaintext) => plaintext,
            Err(e) => {
                warn!(error = %e, "Failed to decrypt stored secret, returning stored form");
                stored.to_owned()
            }
        }
    }
}
