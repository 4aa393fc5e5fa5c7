// ABOUTME: Health check endpoint for load balancers and deployment probes
// ABOUTME: Always unauthenticated; reports service identity and a static ok status
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CredVault Contributors

use axum::{routing::get, Json, Router};
use serde_json::{json, Value};

/// Health check routes (Axum).
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create the health routes.
    pub fn routes() -> Router {
        Router::new().route("/health", get(Self::handle_health))
    }

    async fn handle_health() -> Json<Value> {
        Json(json!({
            "status": "ok",
            "service": "credvault"
        }))
    }
}
