// ABOUTME: Core domain crate for credvault: entities, request payloads, validation rules
// ABOUTME: Shared by the server, CLI, and tests; carries no storage or transport code
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CredVault Contributors

//! Core domain types for the credvault credential vault.
//!
//! This crate defines the entities the vault stores (users, OAuth
//! integrations, tokens), the request payloads used to create or update
//! them, the validation rules those payloads must satisfy, and the audit
//! trail vocabulary (actions, statuses, entries). It deliberately knows
//! nothing about SQL, HTTP, or encryption so that every other layer can
//! depend on it without dragging in their stacks.

pub mod errors;
pub mod models;

pub use errors::ValidationError;
pub use models::{
    AuditEntry, AuditStatus, AuthType, Integration, NewIntegration, NewToken, NewUser, Role,
    Token, User, UserSummary,
};
