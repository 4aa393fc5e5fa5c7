// ABOUTME: Main library entry point for the CredVault credential vault server
// ABOUTME: Encrypted storage for OAuth integrations and tokens with a durable audit trail
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CredVault Contributors

#![deny(unsafe_code)]

//! # CredVault
//!
//! A credential vault for OAuth integration descriptors and their tokens.
//! Secret fields are encrypted at rest (AES-256-GCM) and served decrypted
//! to authenticated callers; every mutating or secret-revealing operation
//! leaves exactly one row in a durable audit trail.
//!
//! ## Features
//!
//! - **Field-level encryption**: client secrets and token material are
//!   sealed per-field with a fresh nonce on every write
//! - **Fail-open reads**: a field that no longer decrypts degrades to its
//!   stored ciphertext instead of failing the whole response
//! - **Durable audit trail**: append-only, filterable, paginated, admin-only
//! - **JWT identity**: HS256 bearer tokens accepted from header, query
//!   parameter, or cookie, decoded once into a typed identity
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use credvault::config::environment::ServerConfig;
//! use credvault::errors::AppResult;
//!
//! #[tokio::main]
//! async fn main() -> AppResult<()> {
//!     // Load configuration
//!     let config = ServerConfig::from_env()?;
//!
//!     println!("CredVault configured with port: HTTP={}", config.http_port);
//!
//!     Ok(())
//! }
//! ```

/// Best-effort audit trail recording
pub mod audit;

/// JWT identity: claims, token issue/verify, authentication middleware
pub mod auth;

/// Configuration management from environment variables
pub mod config;

/// Crypto engine: field encryption and password hashing
pub mod crypto;

/// Encrypting entity stores over `SQLite`
pub mod database;

/// Application error taxonomy and HTTP mapping
pub mod errors;

/// HTTP route handlers
pub mod routes;

/// Server wiring: shared resources, router assembly, serving
pub mod server;
