// ABOUTME: Token persistence with access/refresh material encrypted before every write
// ABOUTME: Deletes are soft; tombstoned rows are invisible to every read and update
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CredVault Contributors

use chrono::{DateTime, Utc};
use credvault_core::models::{NewToken, Token};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use super::Database;
use crate::errors::{AppError, AppResult};

impl Database {
    /// Creates a token, encrypting both secrets first.
    ///
    /// The returned value carries plaintext secrets; only the stored row
    /// holds ciphertext. The integration reference is not checked against
    /// the integrations table.
    ///
    /// # Errors
    ///
    /// Returns a key or crypto error if encryption fails, a storage error if
    /// the insert fails.
    pub async fn create_token(
        &self,
        payload: &NewToken,
        expires_at: DateTime<Utc>,
    ) -> AppResult<Token> {
        let encrypted_access = self.cipher.encrypt(&payload.access_token)?;
        let encrypted_refresh = self.cipher.encrypt(&payload.refresh_token)?;
        let now = Utc::now();

        let result = sqlx::query(
            r"
            INSERT INTO tokens (
                integration_id, access_token, refresh_token, expires_at,
                created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(payload.integration_id)
        .bind(&encrypted_access)
        .bind(&encrypted_refresh)
        .bind(expires_at)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::storage(format!("Failed to create token: {e}")))?;

        Ok(Token {
            id: result.last_insert_rowid(),
            integration_id: payload.integration_id,
            access_token: payload.access_token.clone(),
            refresh_token: payload.refresh_token.clone(),
            expires_at,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        })
    }

    /// Fetches a live token by id with its secrets decrypted.
    ///
    /// # Errors
    ///
    /// Returns a not-found error if no live row has that id, a storage error
    /// if the query fails.
    pub async fn get_token(&self, id: i64) -> AppResult<Token> {
        let row = sqlx::query(
            r"
            SELECT id, integration_id, access_token, refresh_token, expires_at,
                   created_at, updated_at, deleted_at
            FROM tokens WHERE id = $1 AND deleted_at IS NULL
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::storage(format!("Failed to get token: {e}")))?;

        row.as_ref().map_or_else(
            || Err(AppError::not_found(format!("Token with id: {id}"))),
            |row| self.row_to_token(row),
        )
    }

    /// Lists every live token with secrets decrypted, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_tokens(&self) -> AppResult<Vec<Token>> {
        let rows = sqlx::query(
            r"
            SELECT id, integration_id, access_token, refresh_token, expires_at,
                   created_at, updated_at, deleted_at
            FROM tokens WHERE deleted_at IS NULL ORDER BY id ASC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::storage(format!("Failed to list tokens: {e}")))?;

        rows.iter().map(|row| self.row_to_token(row)).collect()
    }

    /// Replaces every field of a live token, re-encrypting both secrets.
    ///
    /// Returns the stored state after the update, with secrets decrypted.
    ///
    /// # Errors
    ///
    /// Returns a not-found error if no live row has that id, a key or crypto
    /// error if encryption fails, a storage error if the update fails.
    pub async fn update_token(
        &self,
        id: i64,
        payload: &NewToken,
        expires_at: DateTime<Utc>,
    ) -> AppResult<Token> {
        let encrypted_access = self.cipher.encrypt(&payload.access_token)?;
        let encrypted_refresh = self.cipher.encrypt(&payload.refresh_token)?;
        let now = Utc::now();

        let result = sqlx::query(
            r"
            UPDATE tokens SET
                integration_id = $2,
                access_token = $3,
                refresh_token = $4,
                expires_at = $5,
                updated_at = $6
            WHERE id = $1 AND deleted_at IS NULL
            ",
        )
        .bind(id)
        .bind(payload.integration_id)
        .bind(&encrypted_access)
        .bind(&encrypted_refresh)
        .bind(expires_at)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::storage(format!("Failed to update token: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Token with id: {id}")));
        }

        self.get_token(id).await
    }

    /// Soft-deletes a live token by setting its tombstone.
    ///
    /// # Errors
    ///
    /// Returns a not-found error if no live row has that id (including rows
    /// already deleted), a storage error if the update fails.
    pub async fn delete_token(&self, id: i64) -> AppResult<()> {
        let result =
            sqlx::query("UPDATE tokens SET deleted_at = $2 WHERE id = $1 AND deleted_at IS NULL")
                .bind(id)
                .bind(Utc::now())
                .execute(&self.pool)
                .await
                .map_err(|e| AppError::storage(format!("Failed to delete token: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Token with id: {id}")));
        }
        Ok(())
    }

    /// Converts a database row to a [`Token`], decrypting both secrets.
    fn row_to_token(&self, row: &SqliteRow) -> AppResult<Token> {
        let stored_access: String = row
            .try_get("access_token")
            .map_err(|e| AppError::storage(format!("Failed to get access_token: {e}")))?;
        let stored_refresh: String = row
            .try_get("refresh_token")
            .map_err(|e| AppError::storage(format!("Failed to get refresh_token: {e}")))?;

        Ok(Token {
            id: row
                .try_get("id")
                .map_err(|e| AppError::storage(format!("Failed to get id: {e}")))?,
            integration_id: row
                .try_get("integration_id")
                .map_err(|e| AppError::storage(format!("Failed to get integration_id: {e}")))?,
            access_token: self.reveal_secret(&stored_access),
            refresh_token: self.reveal_secret(&stored_refresh),
            expires_at: row
                .try_get("expires_at")
                .map_err(|e| AppError::storage(format!("Failed to get expires_at: {e}")))?,
            created_at: row
                .try_get("created_at")
                .map_err(|e| AppError::storage(format!("Failed to get created_at: {e}")))?,
            updated_at: row
                .try_get("updated_at")
                .map_err(|e| AppError::storage(format!("Failed to get updated_at: {e}")))?,
            deleted_at: row
                .try_get("deleted_at")
                .map_err(|e| AppError::storage(format!("Failed to get deleted_at: {e}")))?,
        })
    }
}
