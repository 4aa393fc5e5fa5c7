// ABOUTME: Unit tests for vault entities, payload validation, and the audit vocabulary
// ABOUTME: The action strings and serde forms are wire contracts; these tests pin them
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CredVault Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use chrono::Utc;
use credvault_core::models::{
    audit::actions, AuditStatus, AuthType, NewIntegration, NewToken, NewUser, Role,
};

#[test]
fn test_role_round_trips_through_its_stored_form() {
    assert_eq!(Role::parse("admin"), Some(Role::Admin));
    assert_eq!(Role::parse("user"), Some(Role::User));
    assert_eq!(Role::parse("ADMIN"), None);
    assert_eq!(Role::parse(""), None);

    assert_eq!(Role::Admin.as_str(), "admin");
    assert_eq!(Role::User.to_string(), "user");
    assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
}

#[test]
fn test_auth_type_round_trips_through_its_stored_form() {
    assert_eq!(
        AuthType::parse("client_credentials"),
        Some(AuthType::ClientCredentials)
    );
    assert_eq!(
        AuthType::parse("authorization_code"),
        Some(AuthType::AuthorizationCode)
    );
    assert_eq!(AuthType::parse("implicit"), None);

    assert_eq!(
        serde_json::to_string(&AuthType::ClientCredentials).unwrap(),
        "\"client_credentials\""
    );
}

#[test]
fn test_audit_status_round_trips_through_its_stored_form() {
    assert_eq!(AuditStatus::parse("OK"), Some(AuditStatus::Ok));
    assert_eq!(AuditStatus::parse("FAIL"), Some(AuditStatus::Fail));
    assert_eq!(AuditStatus::parse("ok"), None);

    assert_eq!(AuditStatus::Ok.as_str(), "OK");
    assert_eq!(serde_json::to_string(&AuditStatus::Fail).unwrap(), "\"FAIL\"");
}

#[test]
fn test_action_names_are_stable() {
    // Filterable via the query API; renaming any of these breaks clients.
    assert_eq!(actions::USER_REGISTER, "cadastro_usuario");
    assert_eq!(actions::USER_LIST, "listagem_usuarios");
    assert_eq!(actions::USER_DELETE, "delecao_usuario");
    assert_eq!(actions::INTEGRATION_CREATE, "cadastro_integracao");
    assert_eq!(actions::INTEGRATION_UPDATE, "atualizacao_integracao");
    assert_eq!(actions::INTEGRATION_DELETE, "delecao_integracao");
    assert_eq!(actions::INTEGRATION_LIST, "listagem_integracoes");
    assert_eq!(actions::INTEGRATION_GET, "consulta_integracao_id");
    assert_eq!(actions::TOKEN_CREATE, "cadastro_token");
    assert_eq!(actions::TOKEN_UPDATE, "atualizacao_token");
    assert_eq!(actions::TOKEN_DELETE, "delecao_token");
    assert_eq!(actions::TOKEN_LIST, "listagem_tokens");
    assert_eq!(actions::TOKEN_GET, "consulta_token_id");
}

#[test]
fn test_new_user_validation() {
    let valid = NewUser {
        username: "alice".to_owned(),
        password: "password123".to_owned(),
        role: "admin".to_owned(),
    };
    assert_eq!(valid.validate().unwrap(), Role::Admin);

    let mut bad = valid.clone();
    bad.username = "ab".to_owned();
    assert!(bad.validate().is_err());

    let mut bad = valid.clone();
    bad.password = "12345".to_owned();
    assert!(bad.validate().is_err());

    let mut bad = valid;
    bad.role = "root".to_owned();
    assert!(bad.validate().is_err());
}

#[test]
fn test_new_user_validation_reports_the_first_violation() {
    // Multiple rules broken: the username rule fires first.
    let payload = NewUser {
        username: String::new(),
        password: String::new(),
        role: String::new(),
    };
    let err = payload.validate().unwrap_err();
    assert!(err.message().contains("username"));
}

#[test]
fn test_new_integration_validation() {
    let valid = NewIntegration {
        name: "github".to_owned(),
        auth_type: "authorization_code".to_owned(),
        client_id: "cid".to_owned(),
        client_secret: "sec".to_owned(),
        token_url: "https://github.com/token".to_owned(),
    };
    assert_eq!(valid.validate().unwrap(), AuthType::AuthorizationCode);

    let mut bad = valid.clone();
    bad.token_url = "https://x".to_owned(); // long enough scheme, too short overall
    assert!(bad.validate().is_err());

    let mut bad = valid.clone();
    bad.token_url = "ftp://tokens.example.com/oauth".to_owned();
    assert!(bad.validate().is_err());

    let mut bad = valid;
    bad.auth_type = "password".to_owned();
    assert!(bad.validate().is_err());
}

#[test]
fn test_new_token_validation() {
    let valid = NewToken {
        integration_id: 3,
        access_token: "access-token".to_owned(),
        refresh_token: "refresh-token".to_owned(),
        expires_at: Some(Utc::now()),
    };
    assert!(valid.validate().is_ok());

    let mut bad = valid.clone();
    bad.integration_id = 0;
    assert!(bad.validate().is_err());

    let mut bad = valid.clone();
    bad.integration_id = -7;
    assert!(bad.validate().is_err());

    let mut bad = valid;
    bad.expires_at = None;
    let err = bad.validate().unwrap_err();
    assert_eq!(err.message(), "expires_at is required");
}

#[test]
fn test_payloads_default_missing_fields_to_empty() {
    // Absent JSON fields deserialize to defaults and surface as validation
    // errors rather than deserialization failures.
    let payload: NewUser = serde_json::from_str("{}").unwrap();
    assert!(payload.username.is_empty());
    assert!(payload.validate().is_err());

    let payload: NewToken = serde_json::from_str(r#"{"integration_id": 5}"#).unwrap();
    assert_eq!(payload.integration_id, 5);
    assert!(payload.expires_at.is_none());
}
