// ABOUTME: Unit tests for database users functionality
// ABOUTME: Validates user creation, lookup, listing, and deletion behavior
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CredVault Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use credvault::errors::AppError;
use credvault_core::models::Role;

#[tokio::test]
async fn test_create_and_get_user() {
    let db = common::create_test_database()
        .await
        .expect("Failed to create test database");

    let user = db
        .create_user("alice", "hashed_password", Role::User)
        .await
        .expect("Failed to create user");

    assert!(user.id > 0);
    assert_eq!(user.username, "alice");
    assert_eq!(user.password_hash, "hashed_password");
    assert_eq!(user.role, Role::User);

    let retrieved = db
        .get_user_by_username("alice")
        .await
        .expect("Failed to get user")
        .expect("User not found");
    assert_eq!(retrieved.id, user.id);
    assert_eq!(retrieved.username, "alice");
    assert_eq!(retrieved.password_hash, "hashed_password");
    assert_eq!(retrieved.role, Role::User);
}

#[tokio::test]
async fn test_get_unknown_user_is_none() {
    let db = common::create_test_database().await.unwrap();

    let result = db.get_user_by_username("nobody").await.unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn test_duplicate_username_is_rejected() {
    let db = common::create_test_database().await.unwrap();

    db.create_user("bob", "hash_one", Role::User).await.unwrap();
    let err = db
        .create_user("bob", "hash_two", Role::Admin)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Storage(_)), "got {err:?}");

    // The original row is untouched.
    let stored = db.get_user_by_username("bob").await.unwrap().unwrap();
    assert_eq!(stored.password_hash, "hash_one");
    assert_eq!(stored.role, Role::User);
}

#[tokio::test]
async fn test_list_users_ordered_by_id() {
    let db = common::create_test_database().await.unwrap();

    assert!(db.list_users().await.unwrap().is_empty());

    db.create_user("first", "h1", Role::Admin).await.unwrap();
    db.create_user("second", "h2", Role::User).await.unwrap();
    db.create_user("third", "h3", Role::User).await.unwrap();

    let users = db.list_users().await.unwrap();
    assert_eq!(users.len(), 3);
    let names: Vec<&str> = users.iter().map(|u| u.username.as_str()).collect();
    assert_eq!(names, vec!["first", "second", "third"]);
}

#[tokio::test]
async fn test_delete_user() {
    let db = common::create_test_database().await.unwrap();

    let user = db.create_user("doomed", "h", Role::User).await.unwrap();
    db.delete_user(user.id).await.expect("Failed to delete");

    assert!(db.get_user_by_username("doomed").await.unwrap().is_none());
}

#[tokio::test]
async fn test_delete_missing_user_is_not_found() {
    let db = common::create_test_database().await.unwrap();

    let err = db.delete_user(9999).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)), "got {err:?}");
}

#[tokio::test]
async fn test_user_summary_omits_password_hash() {
    let db = common::create_test_database().await.unwrap();

    let user = db
        .create_user("summary", "topsecret-hash", Role::Admin)
        .await
        .unwrap();

    let serialized = serde_json::to_string(&user.summary()).unwrap();
    assert!(!serialized.contains("topsecret-hash"));
    assert!(!serialized.contains("password"));
    assert!(serialized.contains("\"username\":\"summary\""));
    assert!(serialized.contains("\"role\":\"admin\""));
}
