// ABOUTME: Integration persistence with client secrets encrypted before every write
// ABOUTME: Reads decrypt through reveal_secret, so undecryptable rows come back as stored
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CredVault Contributors

use chrono::Utc;
use credvault_core::models::{AuthType, Integration, NewIntegration};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use super::Database;
use crate::errors::{AppError, AppResult};

impl Database {
    /// Creates an integration, encrypting the client secret first.
    ///
    /// The returned value carries the plaintext secret; only the stored row
    /// holds ciphertext.
    ///
    /// # Errors
    ///
    /// Returns a key or crypto error if encryption fails, a storage error if
    /// the insert fails (including a duplicate name).
    pub async fn create_integration(
        &self,
        payload: &NewIntegration,
        auth_type: AuthType,
    ) -> AppResult<Integration> {
        let encrypted_secret = self.cipher.encrypt(&payload.client_secret)?;
        let now = Utc::now();

        let result = sqlx::query(
            r"
            INSERT INTO integrations (
                name, auth_type, client_id, client_secret, token_url,
                created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            ",
        )
        .bind(&payload.name)
        .bind(auth_type.as_str())
        .bind(&payload.client_id)
        .bind(&encrypted_secret)
        .bind(&payload.token_url)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::storage(format!("Failed to create integration: {e}")))?;

        Ok(Integration {
            id: result.last_insert_rowid(),
            name: payload.name.clone(),
            auth_type,
            client_id: payload.client_id.clone(),
            client_secret: payload.client_secret.clone(),
            token_url: payload.token_url.clone(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Fetches an integration by id with its secret decrypted.
    ///
    /// # Errors
    ///
    /// Returns a not-found error if no row has that id, a storage error if
    /// the query fails.
    pub async fn get_integration(&self, id: i64) -> AppResult<Integration> {
        let row = sqlx::query(
            r"
            SELECT id, name, auth_type, client_id, client_secret, token_url,
                   created_at, updated_at
            FROM integrations WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::storage(format!("Failed to get integration: {e}")))?;

        row.as_ref().map_or_else(
            || Err(AppError::not_found(format!("Integration with id: {id}"))),
            |row| self.row_to_integration(row),
        )
    }

    /// Lists every integration with secrets decrypted, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_integrations(&self) -> AppResult<Vec<Integration>> {
        let rows = sqlx::query(
            r"
            SELECT id, name, auth_type, client_id, client_secret, token_url,
                   created_at, updated_at
            FROM integrations ORDER BY id ASC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::storage(format!("Failed to list integrations: {e}")))?;

        rows.iter()
            .map(|row| self.row_to_integration(row))
            .collect()
    }

    /// Replaces every field of an integration, re-encrypting the secret.
    ///
    /// Returns the stored state after the update, with the secret decrypted.
    ///
    /// # Errors
    ///
    /// Returns a not-found error if no row has that id, a key or crypto error
    /// if encryption fails, a storage error if the update fails.
    pub async fn update_integration(
        &self,
        id: i64,
        payload: &NewIntegration,
        auth_type: AuthType,
    ) -> AppResult<Integration> {
        let encrypted_secret = self.cipher.encrypt(&payload.client_secret)?;
        let now = Utc::now();

        let result = sqlx::query(
            r"
            UPDATE integrations SET
                name = $2,
                auth_type = $3,
                client_id = $4,
                client_secret = $5,
                token_url = $6,
                updated_at = $7
            WHERE id = $1
            ",
        )
        .bind(id)
        .bind(&payload.name)
        .bind(auth_type.as_str())
        .bind(&payload.client_id)
        .bind(&encrypted_secret)
        .bind(&payload.token_url)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::storage(format!("Failed to update integration: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Integration with id: {id}")));
        }

        self.get_integration(id).await
    }

    /// Deletes an integration by id.
    ///
    /// Tokens referencing the integration are left in place; the reference
    /// is not an enforced foreign key.
    ///
    /// # Errors
    ///
    /// Returns a not-found error if no row has that id, a storage error if
    /// the delete fails.
    pub async fn delete_integration(&self, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM integrations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::storage(format!("Failed to delete integration: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Integration with id: {id}")));
        }
        Ok(())
    }

    /// Converts a database row to an [`Integration`], decrypting the secret.
    fn row_to_integration(&self, row: &SqliteRow) -> AppResult<Integration> {
        let auth_type_str: String = row
            .try_get("auth_type")
            .map_err(|e| AppError::storage(format!("Failed to get auth_type: {e}")))?;
        let auth_type = AuthType::parse(&auth_type_str).ok_or_else(|| {
            AppError::storage(format!("Invalid auth_type in database: {auth_type_str}"))
        })?;

        let stored_secret: String = row
            .try_get("client_secret")
            .map_err(|e| AppError::storage(format!("Failed to get client_secret: {e}")))?;

        Ok(Integration {
            id: row
                .try_get("id")
                .map_err(|e| AppError::storage(format!("Failed to get id: {e}")))?,
            name: row
                .try_get("name")
                .map_err(|e| AppError::storage(format!("Failed to get name: {e}")))?,
            auth_type,
            client_id: row
                .try_get("client_id")
                .map_err(|e| AppError::storage(format!("Failed to get client_id: {e}")))?,
            client_secret: self.reveal_secret(&stored_secret),
            token_url: row
                .try_get("token_url")
                .map_err(|e| AppError::storage(format!("Failed to get token_url: {e}")))?,
            created_at: row
                .try_get("created_at")
                .map_err(|e| AppError::storage(format!("Failed to get created_at: {e}")))?,
            updated_at: row
                .try_get("updated_at")
                .map_err(|e| AppError::storage(format!("Failed to get updated_at: {e}")))?,
        })
    }
}
