// ABOUTME: Helper modules shared by the integration test suites
// ABOUTME: Currently just the in-process axum request builder
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CredVault Contributors
#![allow(dead_code)]

pub mod axum_test;
