// ABOUTME: User management commands for credvault-cli
// ABOUTME: Bootstraps admin accounts so the first login does not depend on the open registration route
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CredVault Contributors

use credvault_core::models::NewUser;
use tracing::info;

use credvault::crypto;
use credvault::database::Database;
use credvault::errors::{AppError, AppResult};

/// Create an admin user directly in the database.
///
/// The payload passes the same validation the registration route applies,
/// so a CLI-created account is indistinguishable from a registered one.
pub async fn create_admin(database: &Database, username: &str, password: &str) -> AppResult<()> {
    let payload = NewUser {
        username: username.to_owned(),
        password: password.to_owned(),
        role: "admin".to_owned(),
    };
    let role = payload.validate()?;

    if database.get_user_by_username(username).await?.is_some() {
        return Err(AppError::validation(format!(
            "User '{username}' already exists"
        )));
    }

    let password_hash = crypto::hash_password(password)?;
    let user = database
        .create_user(&payload.username, &password_hash, role)
        .await?;

    info!(user_id = user.id, "Created admin user: {}", user.username);
    println!("Admin user '{}' is ready to use (id {})", user.username, user.id);

    Ok(())
}
