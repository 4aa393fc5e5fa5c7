// ABOUTME: Configuration management for the vault server
// ABOUTME: All runtime settings come from the environment; there is no config file
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CredVault Contributors

/// Environment variable loading and defaults
pub mod environment;

pub use environment::ServerConfig;
