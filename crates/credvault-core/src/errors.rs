// ABOUTME: Validation error type shared by all payload validators
// ABOUTME: Kept separate from transport errors so callers decide the HTTP mapping
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CredVault Contributors

//! Validation errors raised by [`crate::models`] payload checks.

use thiserror::Error;

/// A payload failed one of the domain validation rules.
///
/// The message is safe to return to API clients verbatim; it names the
/// offending field and the rule, never any secret material.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ValidationError(String);

impl ValidationError {
    /// Creates a validation error with the given client-facing message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    /// Returns the client-facing message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.0
    }
}
