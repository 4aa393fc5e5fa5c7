// ABOUTME: Command modules for credvault-cli
// ABOUTME: One module per command group
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CredVault Contributors

/// Encryption key commands
pub mod key;

/// User management commands
pub mod user;
