// ABOUTME: Route module organization for the CredVault HTTP API
// ABOUTME: Each domain module owns its route definitions and thin handlers over the entity stores
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CredVault Contributors

//! HTTP route modules.
//!
//! Each domain module contains only route definitions and thin handler
//! functions that delegate to the entity stores. The audit entry for an
//! operation is recorded here, next to the store call it documents, so
//! that every store outcome, success or failure, produces exactly one
//! trail row. Validation and role checks resolve before the store call
//! and are not audited.

/// Health check routes
pub mod health;

/// Registration and login routes
pub mod auth;

/// User management routes
pub mod users;

/// Integration management routes
pub mod integrations;

/// Token management routes
pub mod tokens;

/// Audit trail query routes
pub mod audit;

pub use audit::AuditRoutes;
pub use auth::AuthRoutes;
pub use health::HealthRoutes;
pub use integrations::IntegrationRoutes;
pub use tokens::TokenRoutes;
pub use users::UserRoutes;
