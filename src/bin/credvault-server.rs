// ABOUTME: Server binary: loads environment configuration and serves the vault HTTP API
// ABOUTME: A missing encryption key does not abort startup; crypto calls fail per-operation instead
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CredVault Contributors

use std::sync::Arc;

use tracing::info;

use credvault::auth::AuthManager;
use credvault::config::environment::ServerConfig;
use credvault::crypto::FieldCipher;
use credvault::database::Database;
use credvault::errors::AppResult;
use credvault::server::{ServerResources, VaultServer};

#[tokio::main]
async fn main() -> AppResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "credvault=info,tower_http=info".into()),
        )
        .init();

    let config = ServerConfig::from_env()?;
    info!(
        database_url = %config.database_url,
        http_port = config.http_port,
        "Starting credvault server"
    );

    let cipher = FieldCipher::from_env();
    let database = Database::new(&config.database_url, cipher).await?;
    let auth_manager = AuthManager::new(config.jwt_secret.as_bytes(), config.jwt_ttl_secs);

    let port = config.http_port;
    let resources = Arc::new(ServerResources::new(database, auth_manager, config));
    let server = VaultServer::new(resources);

    server.run(port).await
}
