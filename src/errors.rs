// ABOUTME: Application error taxonomy and the HTTP mapping for every failure path
// ABOUTME: Constructor helpers keep call sites to one line; IntoResponse renders {"error": msg}
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CredVault Contributors

//! Error taxonomy for the vault server.
//!
//! One enum covers every failure the server reports. The `IntoResponse`
//! impl is the single place that decides HTTP status codes, so handlers
//! return [`AppResult`] and never touch `StatusCode` on the failure path.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use credvault_core::ValidationError;

/// Result alias used across the server.
pub type AppResult<T> = Result<T, AppError>;

/// Every failure the vault reports.
#[derive(Debug, Error)]
pub enum AppError {
    /// A payload failed a domain validation rule. Resolved before any
    /// persistence call and never audited.
    #[error("{0}")]
    Validation(String),

    /// Missing or unverifiable identity.
    #[error("{0}")]
    Authentication(String),

    /// Authenticated but not allowed to perform the operation.
    #[error("{0}")]
    Authorization(String),

    /// The addressed row does not exist or is soft-deleted.
    #[error("{0}")]
    NotFound(String),

    /// The field-encryption key is unset or has the wrong length.
    #[error("{0}")]
    Key(String),

    /// Hashing or AEAD failure: undecodable ciphertext, failed auth tag,
    /// non-UTF-8 plaintext.
    #[error("{0}")]
    Crypto(String),

    /// Database failure.
    #[error("{0}")]
    Storage(String),

    /// Infrastructure failure outside the vault taxonomy: transport
    /// binding, background task join. Never produced by the stores or
    /// the crypto engine.
    #[error("{0}")]
    Internal(String),
}

impl AppError {
    /// Validation failure (HTTP 400).
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Authentication failure (HTTP 401).
    #[must_use]
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication(message.into())
    }

    /// Authorization failure (HTTP 403).
    #[must_use]
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Authorization(message.into())
    }

    /// Missing resource (HTTP 404).
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Key material problem (HTTP 500).
    #[must_use]
    pub fn key(message: impl Into<String>) -> Self {
        Self::Key(message.into())
    }

    /// Cryptographic failure (HTTP 500).
    #[must_use]
    pub fn crypto(message: impl Into<String>) -> Self {
        Self::Crypto(message.into())
    }

    /// Database failure (HTTP 500).
    #[must_use]
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    /// Infrastructure failure (HTTP 500).
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// HTTP status this error renders as.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Authentication(_) => StatusCode::UNAUTHORIZED,
            Self::Authorization(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Key(_) | Self::Crypto(_) | Self::Storage(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err.message().to_owned())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
