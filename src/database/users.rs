// ABOUTME: User account persistence: create, lookup by username, list, delete
// ABOUTME: Passwords arrive pre-hashed; this layer never sees plaintext credentials
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CredVault Contributors

use chrono::Utc;
use credvault_core::models::{Role, User};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use super::Database;
use crate::errors::{AppError, AppResult};

impl Database {
    /// Creates a user row and returns it with its assigned id.
    ///
    /// # Errors
    ///
    /// Returns an error if the username is already taken or the insert fails.
    pub async fn create_user(
        &self,
        username: &str,
        password_hash: &str,
        role: Role,
    ) -> AppResult<User> {
        let created_at = Utc::now();

        let result = sqlx::query(
            r"
            INSERT INTO users (username, password_hash, role, created_at)
            VALUES ($1, $2, $3, $4)
            ",
        )
        .bind(username)
        .bind(password_hash)
        .bind(role.as_str())
        .bind(created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::storage(format!("Failed to create user: {e}")))?;

        Ok(User {
            id: result.last_insert_rowid(),
            username: username.to_owned(),
            password_hash: password_hash.to_owned(),
            role,
            created_at,
        })
    }

    /// Fetches a user by login name.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn get_user_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let row = sqlx::query(
            r"
            SELECT id, username, password_hash, role, created_at
            FROM users WHERE username = $1
            ",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::storage(format!("Failed to get user by username: {e}")))?;

        row.as_ref().map(Self::row_to_user).transpose()
    }

    /// Lists every user, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_users(&self) -> AppResult<Vec<User>> {
        let rows = sqlx::query(
            r"
            SELECT id, username, password_hash, role, created_at
            FROM users ORDER BY id ASC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::storage(format!("Failed to list users: {e}")))?;

        rows.iter().map(Self::row_to_user).collect()
    }

    /// Deletes a user by id.
    ///
    /// # Errors
    ///
    /// Returns a not-found error if no row has that id, a storage error if
    /// the delete fails.
    pub async fn delete_user(&self, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::storage(format!("Failed to delete user: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("User with id: {id}")));
        }
        Ok(())
    }

    /// Converts a database row to a [`User`].
    fn row_to_user(row: &SqliteRow) -> AppResult<User> {
        let role_str: String = row
            .try_get("role")
            .map_err(|e| AppError::storage(format!("Failed to get role: {e}")))?;
        let role = Role::parse(&role_str)
            .ok_or_else(|| AppError::storage(format!("Invalid role in database: {role_str}")))?;

        Ok(User {
            id: row
                .try_get("id")
                .map_err(|e| AppError::storage(format!("Failed to get id: {e}")))?,
            username: row
                .try_get("username")
                .map_err(|e| AppError::storage(format!("Failed to get username: {e}")))?,
            password_hash: row
                .try_get("password_hash")
                .map_err(|e| AppError::storage(format!("Failed to get password_hash: {e}")))?,
            role,
            created_at: row
                .try_get("created_at")
                .map_err(|e| AppError::storage(format!("Failed to get created_at: {e}")))?,
        })
    }
}
