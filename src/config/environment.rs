// ABOUTME: Server runtime configuration assembled from environment variables
// ABOUTME: Missing vars take documented defaults; only malformed explicit values abort startup
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CredVault Contributors

//! Environment-based server configuration.
//!
//! Two crypto variables are deliberately absent here: `DATA_ENCRYPTION_KEY`
//! is read by [`crate::crypto::FieldCipher::from_env`] and checked per call
//! so a keyless server still starts, and `BCRYPT_COST` is resolved on every
//! hash by [`crate::crypto::hash_password`].

use std::env;

use tracing::warn;

use crate::errors::{AppError, AppResult};

/// Database URL applied when `DATABASE_URL` is unset.
const DEFAULT_DATABASE_URL: &str = "sqlite:data/credvault.db";

/// Bind address applied when `HOST` is unset.
const DEFAULT_HOST: &str = "127.0.0.1";

/// Listen port applied when `HTTP_PORT` is unset.
const DEFAULT_HTTP_PORT: u16 = 8081;

/// Signing secret applied when `JWT_SECRET` is unset. Insecure; a warning
/// is logged whenever it is used.
const DEFAULT_JWT_SECRET: &str = "changeme";

/// Token lifetime applied when `JWT_TTL_SECS` is unset.
const DEFAULT_JWT_TTL_SECS: i64 = 3600;

/// Runtime configuration for the vault server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Database connection URL (`DATABASE_URL`).
    pub database_url: String,
    /// Bind address for the HTTP listener (`HOST`).
    pub host: String,
    /// HTTP listen port (`HTTP_PORT`).
    pub http_port: u16,
    /// JWT signing secret (`JWT_SECRET`).
    pub jwt_secret: String,
    /// Issued token lifetime in seconds (`JWT_TTL_SECS`).
    pub jwt_ttl_secs: i64,
}

impl ServerConfig {
    /// Loads configuration from the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if `HTTP_PORT` or `JWT_TTL_SECS` is set to a value
    /// that does not parse.
    pub fn from_env() -> AppResult<Self> {
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_owned());

        let host = env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_owned());

        let http_port = match env::var("HTTP_PORT") {
            Ok(value) => value
                .parse::<u16>()
                .map_err(|e| AppError::validation(format!("Invalid HTTP_PORT: {e}")))?,
            Err(_) => DEFAULT_HTTP_PORT,
        };

        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            warn!("JWT_SECRET is not set, falling back to an insecure default");
            DEFAULT_JWT_SECRET.to_owned()
        });

        let jwt_ttl_secs = match env::var("JWT_TTL_SECS") {
            Ok(value) => value
                .parse::<i64>()
                .map_err(|e| AppError::validation(format!("Invalid JWT_TTL_SECS: {e}")))?,
            Err(_) => DEFAULT_JWT_TTL_SECS,
        };

        Ok(Self {
            database_url,
            host,
            http_port,
            jwt_secret,
            jwt_ttl_secs,
        })
    }
}
