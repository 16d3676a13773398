// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod common;

use common::*;
use finboard::api::Api;
use finboard::error::ClientError;
use finboard::models::{LoginRequest, RegisterRequest, UserProfile};
use finboard::session::{Credentials, Session, SessionFile};
use reqwest::Method;
use serde_json::json;

fn creds() -> Credentials {
    Credentials {
        access: "acc".into(),
        refresh: "ref".into(),
        user: UserProfile {
            id: Some(1),
            username: "sam".into(),
            first_name: "Sam".into(),
            last_name: "Lee".into(),
            email: "sam@example.com".into(),
        },
    }
}

#[test]
fn session_file_round_trip_and_clear() {
    let dir = tempfile::tempdir().unwrap();
    let file = SessionFile::new(dir.path().join("nested").join("session.json"));
    assert!(file.load().unwrap().is_none());
    assert!(!file.open().unwrap().is_authenticated());

    file.save(&creds()).unwrap();
    let session = file.open().unwrap();
    assert_eq!(session.access_token().as_deref(), Some("acc"));
    assert_eq!(session.user().unwrap().display_name(), "Sam Lee");

    file.clear().unwrap();
    assert!(file.load().unwrap().is_none());
    // clearing twice is fine
    file.clear().unwrap();
}

#[test]
fn corrupt_session_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    std::fs::write(&path, "not json").unwrap();
    let err = SessionFile::new(&path).load().unwrap_err();
    assert!(matches!(err, ClientError::Session(_)));
}

#[test]
fn session_clones_share_tokens() {
    let session = Session::new();
    let other = session.clone();
    session.init(creds());
    assert!(other.is_authenticated());
    other.clear();
    assert!(session.access_token().is_none());
}

#[test]
fn display_name_falls_back_to_username() {
    let u = UserProfile {
        username: "jo".into(),
        ..Default::default()
    };
    assert_eq!(u.display_name(), "jo");
}

#[tokio::test]
async fn login_initialises_session() {
    let mock = MockTransport::new();
    mock.on(
        Method::POST,
        "login/",
        Reply::Json(json!({
            "access": "a1",
            "refresh": "r1",
            "user": {"id": 3, "username": "kim", "first_name": "Kim", "last_name": "", "email": ""}
        })),
    );
    let api = Api::new(mock.clone());
    let session = Session::new();
    let resp = api
        .login(
            &session,
            &LoginRequest {
                username: "kim".into(),
                password: "pw".into(),
            },
        )
        .await
        .unwrap();
    assert_eq!(resp.user.display_name(), "Kim");
    assert_eq!(session.access_token().as_deref(), Some("a1"));
    assert_eq!(
        mock.calls()[0].body,
        Some(json!({"username": "kim", "password": "pw"}))
    );
}

#[tokio::test]
async fn rejected_login_leaves_session_empty() {
    let mock = MockTransport::new();
    mock.on(
        Method::POST,
        "login/",
        Reply::Status(400, json!({"non_field_errors": ["Invalid credentials"]})),
    );
    let api = Api::new(mock.clone());
    let session = Session::new();
    let err = api
        .login(
            &session,
            &LoginRequest {
                username: "kim".into(),
                password: "bad".into(),
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.message(), "Invalid credentials");
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn register_checks_passwords_before_sending() {
    let mock = MockTransport::new();
    let api = Api::new(mock.clone());
    let session = Session::new();
    let req = RegisterRequest {
        username: "new".into(),
        first_name: String::new(),
        last_name: String::new(),
        email: "new@example.com".into(),
        password: "one".into(),
        password2: "two".into(),
    };
    let err = api.register(&session, &req).await.unwrap_err();
    assert!(matches!(err, ClientError::Validation(_)));
    assert!(mock.calls().is_empty());

    let blank = LoginRequest {
        username: " ".into(),
        password: "pw".into(),
    };
    assert!(api.login(&session, &blank).await.is_err());
    assert!(mock.calls().is_empty());
}
