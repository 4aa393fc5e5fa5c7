// ABOUTME: Vault entities (users, integrations, tokens) plus the payloads that create them
// ABOUTME: Payload validation runs before every create and update; rules are the wire contract
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CredVault Contributors

//! Entities stored by the vault and the request payloads that create or
//! replace them.
//!
//! Payload fields default to empty when absent from the JSON body so that
//! missing fields surface as validation errors (HTTP 400) instead of
//! deserialization failures. `validate()` returns the first violated rule
//! and, on success, the parsed form of the field that needed parsing.

pub mod audit;

pub use audit::{AuditEntry, AuditStatus};

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;

/// Minimum username length in bytes.
const USERNAME_MIN: usize = 3;
/// Maximum username length in bytes.
const USERNAME_MAX: usize = 32;
/// Minimum password length in bytes.
const PASSWORD_MIN: usize = 6;
/// Minimum integration name length in bytes.
const INTEGRATION_NAME_MIN: usize = 3;
/// Minimum client id / client secret length in bytes.
const CLIENT_CREDENTIAL_MIN: usize = 3;
/// Minimum token URL length in bytes.
const TOKEN_URL_MIN: usize = 10;
/// Minimum access/refresh token length in bytes.
const TOKEN_SECRET_MIN: usize = 6;

/// Role attached to a vault account.
///
/// Admin-only operations (deletes, the audit trail query) check this and
/// nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full access, including deletes and the audit trail.
    Admin,
    /// Regular access: manages integrations and tokens, cannot delete.
    User,
}

impl Role {
    /// Stable lowercase form stored in the database and carried in JWT claims.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
        }
    }

    /// Parses the stored or claimed form; `None` for anything unrecognized.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "admin" => Some(Self::Admin),
            "user" => Some(Self::User),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// OAuth grant flow an integration authenticates with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthType {
    /// Machine-to-machine client credentials grant.
    ClientCredentials,
    /// Browser-mediated authorization code grant.
    AuthorizationCode,
}

impl AuthType {
    /// Stable snake_case form stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ClientCredentials => "client_credentials",
            Self::AuthorizationCode => "authorization_code",
        }
    }

    /// Parses the stored form; `None` for anything unrecognized.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "client_credentials" => Some(Self::ClientCredentials),
            "authorization_code" => Some(Self::AuthorizationCode),
            _ => None,
        }
    }
}

impl fmt::Display for AuthType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A vault account as stored.
///
/// The bcrypt hash never leaves the server; HTTP responses carry
/// [`UserSummary`] instead.
#[derive(Debug, Clone)]
pub struct User {
    /// Auto-increment rowid.
    pub id: i64,
    /// Unique login name.
    pub username: String,
    /// bcrypt hash of the password, salt and cost embedded.
    pub password_hash: String,
    /// Account role.
    pub role: Role,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Client-safe view of this account, without the password hash.
    #[must_use]
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            username: self.username.clone(),
            role: self.role,
            created_at: self.created_at,
        }
    }
}

/// The user fields safe to return over HTTP.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSummary {
    /// Auto-increment rowid.
    pub id: i64,
    /// Unique login name.
    pub username: String,
    /// Account role.
    pub role: Role,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// Registration payload for a new vault account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    /// Requested login name.
    #[serde(default)]
    pub username: String,
    /// Plaintext password, hashed before storage.
    #[serde(default)]
    pub password: String,
    /// Requested role, validated against [`Role`].
    #[serde(default)]
    pub role: String,
}

impl NewUser {
    /// Checks the registration rules and parses the role.
    ///
    /// # Errors
    /// Returns the first violated rule: username length within
    /// [3, 32], password at least 6 bytes, role one of `admin` / `user`.
    pub fn validate(&self) -> Result<Role, ValidationError> {
        if self.username.len() < USERNAME_MIN || self.username.len() > USERNAME_MAX {
            return Err(ValidationError::new(format!(
                "username must be between {USERNAME_MIN} and {USERNAME_MAX} characters"
            )));
        }
        if self.password.len() < PASSWORD_MIN {
            return Err(ValidationError::new(format!(
                "password must be at least {PASSWORD_MIN} characters"
            )));
        }
        Role::parse(&self.role)
            .ok_or_else(|| ValidationError::new("role must be either \"admin\" or \"user\""))
    }
}

/// An OAuth integration definition.
///
/// `client_secret` is ciphertext at rest and plaintext in API responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Integration {
    /// Auto-increment rowid.
    pub id: i64,
    /// Unique integration name.
    pub name: String,
    /// Grant flow used against the provider.
    pub auth_type: AuthType,
    /// OAuth client identifier.
    pub client_id: String,
    /// OAuth client secret. Encrypted at rest.
    pub client_secret: String,
    /// Provider token endpoint.
    pub token_url: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
}

/// Create/update payload for an integration. Updates replace every field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewIntegration {
    /// Unique integration name.
    #[serde(default)]
    pub name: String,
    /// Grant flow, validated against [`AuthType`].
    #[serde(default)]
    pub auth_type: String,
    /// OAuth client identifier.
    #[serde(default)]
    pub client_id: String,
    /// OAuth client secret, encrypted before storage.
    #[serde(default)]
    pub client_secret: String,
    /// Provider token endpoint.
    #[serde(default)]
    pub token_url: String,
}

impl NewIntegration {
    /// Checks the integration rules and parses the auth type.
    ///
    /// # Errors
    /// Returns the first violated rule: name at least 3 bytes, auth_type one
    /// of the two grant flows, client_id and client_secret at least 3 bytes,
    /// token_url at least 10 bytes and starting with `http`.
    pub fn validate(&self) -> Result<AuthType, ValidationError> {
        if self.name.len() < INTEGRATION_NAME_MIN {
            return Err(ValidationError::new(format!(
                "name must be at least {INTEGRATION_NAME_MIN} characters"
            )));
        }
        let auth_type = AuthType::parse(&self.auth_type).ok_or_else(|| {
            ValidationError::new(
                "auth_type must be either \"client_credentials\" or \"authorization_code\"",
            )
        })?;
        if self.client_id.len() < CLIENT_CREDENTIAL_MIN {
            return Err(ValidationError::new(format!(
                "client_id must be at least {CLIENT_CREDENTIAL_MIN} characters"
            )));
        }
        if self.client_secret.len() < CLIENT_CREDENTIAL_MIN {
            return Err(ValidationError::new(format!(
                "client_secret must be at least {CLIENT_CREDENTIAL_MIN} characters"
            )));
        }
        if self.token_url.len() < TOKEN_URL_MIN || !self.token_url.starts_with("http") {
            return Err(ValidationError::new(format!(
                "token_url must be at least {TOKEN_URL_MIN} characters and start with http"
            )));
        }
        Ok(auth_type)
    }
}

/// An issued OAuth token pair held for an integration.
///
/// `access_token` and `refresh_token` are ciphertext at rest and plaintext
/// in API responses. Rows are soft-deleted, never removed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    /// Auto-increment rowid.
    pub id: i64,
    /// Owning integration id. A reference, not an enforced foreign key:
    /// deleting an integration leaves its tokens in place.
    pub integration_id: i64,
    /// OAuth access token. Encrypted at rest.
    pub access_token: String,
    /// OAuth refresh token. Encrypted at rest.
    pub refresh_token: String,
    /// Expiry of the access token.
    pub expires_at: DateTime<Utc>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
    /// Soft-delete tombstone. Set rows are invisible to reads and updates.
    #[serde(skip)]
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Create/update payload for a token. Updates replace every field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewToken {
    /// Owning integration id.
    #[serde(default)]
    pub integration_id: i64,
    /// OAuth access token, encrypted before storage.
    #[serde(default)]
    pub access_token: String,
    /// OAuth refresh token, encrypted before storage.
    #[serde(default)]
    pub refresh_token: String,
    /// Expiry of the access token.
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

impl NewToken {
    /// Checks the token rules and unwraps the expiry.
    ///
    /// # Errors
    /// Returns the first violated rule: integration_id positive, access and
    /// refresh tokens at least 6 bytes, expires_at present.
    pub fn validate(&self) -> Result<DateTime<Utc>, ValidationError> {
        if self.integration_id <= 0 {
            return Err(ValidationError::new(
                "integration_id must be a positive integer",
            ));
        }
        if self.access_token.len() < TOKEN_SECRET_MIN {
            return Err(ValidationError::new(format!(
                "access_token must be at least {TOKEN_SECRET_MIN} characters"
            )));
        }
        if self.refresh_token.len() < TOKEN_SECRET_MIN {
            return Err(ValidationError::new(format!(
                "refresh_token must be at least {TOKEN_SECRET_MIN} characters"
            )));
        }
        self.expires_at
            .ok_or_else(|| ValidationError::new("expires_at is required"))
    }
}
