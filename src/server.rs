// ABOUTME: HTTP server orchestration: shared resources, router assembly, middleware layering
// ABOUTME: Protected route groups sit behind the JWT middleware; health, register, login stay public
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CredVault Contributors

//! Server wiring.
//!
//! [`ServerResources`] bundles every shared dependency behind one `Arc` so
//! handlers receive a single state type (dependency injection, no globals).
//! [`VaultServer`] assembles the router, layers request tracing and CORS,
//! and serves.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{middleware, Router};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tower_http::LatencyUnit;
use tracing::{info, Level};

use crate::audit::AuditLog;
use crate::auth::{auth_middleware, AuthManager};
use crate::config::environment::ServerConfig;
use crate::database::Database;
use crate::errors::{AppError, AppResult};
use crate::routes::{
    AuditRoutes, AuthRoutes, HealthRoutes, IntegrationRoutes, TokenRoutes, UserRoutes,
};

/// Shared dependencies for all route handlers.
pub struct ServerResources {
    /// Encrypting entity store
    pub database: Arc<Database>,
    /// Token issue/verify service
    pub auth_manager: Arc<AuthManager>,
    /// Best-effort audit recorder
    pub audit: AuditLog,
    /// Environment-derived settings
    pub config: ServerConfig,
}

impl ServerResources {
    /// Bundles the shared dependencies. The audit recorder is built here
    /// over the same database handle the stores use.
    #[must_use]
    pub fn new(database: Database, auth_manager: AuthManager, config: ServerConfig) -> Self {
        let database = Arc::new(database);
        let audit = AuditLog::new(database.clone());
        Self {
            database,
            auth_manager: Arc::new(auth_manager),
            audit,
            config,
        }
    }
}

/// Credential vault HTTP server.
#[derive(Clone)]
pub struct VaultServer {
    resources: Arc<ServerResources>,
}

impl VaultServer {
    /// Create a new server with pre-built resources (dependency injection)
    #[must_use]
    pub const fn new(resources: Arc<ServerResources>) -> Self {
        Self { resources }
    }

    /// Get shared reference to server resources
    #[must_use]
    pub fn resources(&self) -> Arc<ServerResources> {
        self.resources.clone()
    }

    /// Run the HTTP server.
    ///
    /// # Errors
    /// Returns an error if binding the listen address or serving fails.
    pub async fn run(&self, port: u16) -> AppResult<()> {
        info!("HTTP server starting on port {}", port);

        // Apply middleware layers (order matters - applied bottom-up)
        let app = router(&self.resources)
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(
                        DefaultMakeSpan::new()
                            .level(Level::INFO)
                            .include_headers(false),
                    )
                    .on_response(
                        DefaultOnResponse::new()
                            .level(Level::INFO)
                            .latency_unit(LatencyUnit::Millis),
                    ),
            )
            .layer(CorsLayer::permissive());

        let host = &self.resources.config.host;
        let addr: SocketAddr = format!("{host}:{port}")
            .parse()
            .unwrap_or_else(|_| SocketAddr::from(([127, 0, 0, 1], port)));
        info!("HTTP server listening on http://{}", addr);

        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| AppError::internal(format!("Transport error: {e}")))?;
        axum::serve(listener, app)
            .await
            .map_err(|e| AppError::internal(format!("Transport error: {e}")))?;

        Ok(())
    }
}

/// Assemble the full application router.
///
/// Health, registration, and login are public; every other group sits
/// behind the JWT middleware. Exposed so integration tests can drive the
/// router directly without binding a socket.
#[must_use]
pub fn router(resources: &Arc<ServerResources>) -> Router {
    let auth_manager = resources.auth_manager.clone();

    // Protected routes require a verified bearer token
    let user_routes = UserRoutes::routes(Arc::clone(resources)).layer(
        middleware::from_fn_with_state(auth_manager.clone(), auth_middleware),
    );

    let integration_routes = IntegrationRoutes::routes(Arc::clone(resources)).layer(
        middleware::from_fn_with_state(auth_manager.clone(), auth_middleware),
    );

    let token_routes = TokenRoutes::routes(Arc::clone(resources)).layer(
        middleware::from_fn_with_state(auth_manager.clone(), auth_middleware),
    );

    let audit_routes = AuditRoutes::routes(Arc::clone(resources)).layer(
        middleware::from_fn_with_state(auth_manager, auth_middleware),
    );

    Router::new()
        .merge(HealthRoutes::routes())
        .merge(AuthRoutes::routes(Arc::clone(resources)))
        .merge(user_routes)
        .merge(integration_routes)
        .merge(token_routes)
        .merge(audit_routes)
}
