// ABOUTME: Unit tests for token storage with encrypted secrets and soft deletes
// ABOUTME: Validates CRUD behavior, tombstone invisibility, and encryption at rest
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CredVault Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use chrono::{Duration, Utc};
use credvault::errors::AppError;
use credvault_core::models::NewToken;
use sqlx::Row;

fn sample_token() -> NewToken {
    NewToken {
        integration_id: 1,
        access_token: "access-token-value".to_owned(),
        refresh_token: "refresh-token-value".to_owned(),
        expires_at: Some(Utc::now() + Duration::hours(1)),
    }
}

#[tokio::test]
async fn test_create_and_get_token() {
    let db = common::create_test_database()
        .await
        .expect("Failed to create test database");

    let payload = sample_token();
    let expires_at = payload.expires_at.unwrap();
    let created = db
        .create_token(&payload, expires_at)
        .await
        .expect("Failed to create token");

    assert!(created.id > 0);
    assert_eq!(created.integration_id, 1);
    assert_eq!(created.access_token, "access-token-value");
    assert_eq!(created.refresh_token, "refresh-token-value");
    assert!(created.deleted_at.is_none());

    let retrieved = db.get_token(created.id).await.unwrap();
    assert_eq!(retrieved.access_token, "access-token-value");
    assert_eq!(retrieved.refresh_token, "refresh-token-value");
    assert_eq!(
        retrieved.expires_at.timestamp_millis(),
        expires_at.timestamp_millis()
    );
}

#[tokio::test]
async fn test_token_secrets_are_ciphertext_at_rest() {
    let db = common::create_test_database().await.unwrap();

    let payload = sample_token();
    let expires_at = payload.expires_at.unwrap();
    let created = db.create_token(&payload, expires_at).await.unwrap();

    let row = sqlx::query("SELECT access_token, refresh_token FROM tokens WHERE id = $1")
        .bind(created.id)
        .fetch_one(db.pool())
        .await
        .unwrap();
    let stored_access: String = row.get("access_token");
    let stored_refresh: String = row.get("refresh_token");

    assert_ne!(stored_access, "access-token-value");
    assert_ne!(stored_refresh, "refresh-token-value");
    assert_eq!(
        common::test_cipher().decrypt(&stored_access).unwrap(),
        "access-token-value"
    );
    assert_eq!(
        common::test_cipher().decrypt(&stored_refresh).unwrap(),
        "refresh-token-value"
    );
}

#[tokio::test]
async fn test_get_missing_token_is_not_found() {
    let db = common::create_test_database().await.unwrap();

    let err = db.get_token(404).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)), "got {err:?}");
}

#[tokio::test]
async fn test_list_tokens_excludes_soft_deleted() {
    let db = common::create_test_database().await.unwrap();

    let payload = sample_token();
    let expires_at = payload.expires_at.unwrap();
    let keep = db.create_token(&payload, expires_at).await.unwrap();
    let remove = db.create_token(&payload, expires_at).await.unwrap();

    db.delete_token(remove.id).await.unwrap();

    let tokens = db.list_tokens().await.unwrap();
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].id, keep.id);
}

#[tokio::test]
async fn test_update_replaces_every_field() {
    let db = common::create_test_database().await.unwrap();

    let payload = sample_token();
    let created = db
        .create_token(&payload, payload.expires_at.unwrap())
        .await
        .unwrap();

    let new_expiry = Utc::now() + Duration::days(30);
    let replacement = NewToken {
        integration_id: 2,
        access_token: "rotated-access".to_owned(),
        refresh_token: "rotated-refresh".to_owned(),
        expires_at: Some(new_expiry),
    };

    let updated = db
        .update_token(created.id, &replacement, new_expiry)
        .await
        .unwrap();

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.integration_id, 2);
    assert_eq!(updated.access_token, "rotated-access");
    assert_eq!(updated.refresh_token, "rotated-refresh");
    assert_eq!(
        updated.expires_at.timestamp_millis(),
        new_expiry.timestamp_millis()
    );
    assert!(updated.updated_at >= created.updated_at);
}

#[tokio::test]
async fn test_soft_delete_keeps_the_row() {
    let db = common::create_test_database().await.unwrap();

    let payload = sample_token();
    let created = db
        .create_token(&payload, payload.expires_at.unwrap())
        .await
        .unwrap();

    db.delete_token(created.id).await.unwrap();

    // Invisible to every read path.
    let err = db.get_token(created.id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)), "got {err:?}");

    // But the row and its ciphertext are still in the table.
    let row = sqlx::query("SELECT deleted_at, access_token FROM tokens WHERE id = $1")
        .bind(created.id)
        .fetch_one(db.pool())
        .await
        .unwrap();
    let deleted_at: Option<chrono::DateTime<Utc>> = row.get("deleted_at");
    assert!(deleted_at.is_some());
    let stored_access: String = row.get("access_token");
    assert_eq!(
        common::test_cipher().decrypt(&stored_access).unwrap(),
        "access-token-value"
    );
}

#[tokio::test]
async fn test_soft_deleted_token_rejects_update_and_second_delete() {
    let db = common::create_test_database().await.unwrap();

    let payload = sample_token();
    let created = db
        .create_token(&payload, payload.expires_at.unwrap())
        .await
        .unwrap();
    db.delete_token(created.id).await.unwrap();

    let err = db
        .update_token(created.id, &payload, payload.expires_at.unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)), "got {err:?}");

    let err = db.delete_token(created.id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)), "got {err:?}");
}

#[tokio::test]
async fn test_tokens_survive_integration_deletion() {
    let db = common::create_test_database().await.unwrap();

    let integration = db
        .create_integration(
            &credvault_core::models::NewIntegration {
                name: "ephemeral".to_owned(),
                auth_type: "client_credentials".to_owned(),
                client_id: "cid".to_owned(),
                client_secret: "csecret".to_owned(),
                token_url: "https://example.com/token".to_owned(),
            },
            credvault_core::models::AuthType::ClientCredentials,
        )
        .await
        .unwrap();

    let mut payload = sample_token();
    payload.integration_id = integration.id;
    let token = db
        .create_token(&payload, payload.expires_at.unwrap())
        .await
        .unwrap();

    db.delete_integration(integration.id).await.unwrap();

    // No foreign key: the token is still live and readable.
    let read = db.get_token(token.id).await.unwrap();
    assert_eq!(read.integration_id, integration.id);
}
