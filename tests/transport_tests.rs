// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use finboard::error::ClientError;
use finboard::models::UserProfile;
use finboard::session::{Credentials, Session};
use finboard::transport::{HttpTransport, Transport};
use reqwest::Method;
use serde_json::{Value, json};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// Answer exactly one request with the given status line and body, handing
/// the raw request text back through the receiver.
async fn serve_once(
    status: &'static str,
    content_type: &'static str,
    body: &'static str,
) -> (String, oneshot::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
        let (mut sock, _) = listener.accept().await.unwrap();
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = sock.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                let head = String::from_utf8_lossy(&buf[..end]).to_lowercase();
                let len = head
                    .lines()
                    .find_map(|l| l.strip_prefix("content-length:"))
                    .map_or(0, |v| v.trim().parse::<usize>().unwrap());
                if buf.len() >= end + 4 + len {
                    break;
                }
            }
        }
        let resp = format!(
            "HTTP/1.1 {}\r\ncontent-type: {}\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
            status,
            content_type,
            body.len(),
            body
        );
        sock.write_all(resp.as_bytes()).await.unwrap();
        let _ = sock.shutdown().await;
        let _ = tx.send(String::from_utf8_lossy(&buf).into_owned());
    });
    (format!("http://{}/api/", addr), rx)
}

fn transport(base: &str, session: Session) -> HttpTransport {
    let client = reqwest::Client::builder().no_proxy().build().unwrap();
    HttpTransport::with_client(client, base, session)
}

fn signed_in() -> Session {
    Session::with_credentials(Credentials {
        access: "tok-123".into(),
        refresh: "ref-456".into(),
        user: UserProfile {
            username: "sam".into(),
            ..UserProfile::default()
        },
    })
}

#[tokio::test]
async fn sends_bearer_token_and_json_body() {
    let (base, rx) = serve_once("201 Created", "application/json", r#"{"id":1}"#).await;
    let t = transport(&base, signed_in());

    let v = t
        .request(Method::POST, "accounts/", Some(json!({"name": "Cash"})))
        .await
        .unwrap();
    assert_eq!(v, json!({"id": 1}));

    let raw = rx.await.unwrap();
    let req = raw.to_lowercase();
    assert!(req.starts_with("post /api/accounts/ http/1.1"), "{}", raw);
    assert!(req.contains("authorization: bearer tok-123"), "{}", raw);
    assert!(req.contains("accept: application/json"), "{}", raw);
    assert!(req.contains("content-type: application/json"), "{}", raw);
    assert!(raw.ends_with(r#"{"name":"Cash"}"#), "{}", raw);
}

#[tokio::test]
async fn anonymous_request_has_no_authorization_header() {
    let (base, rx) = serve_once("200 OK", "application/json", "[]").await;
    let t = transport(&base, Session::new());

    let v = t.request(Method::GET, "categories/", None).await.unwrap();
    assert_eq!(v, json!([]));

    let req = rx.await.unwrap().to_lowercase();
    assert!(req.starts_with("get /api/categories/ http/1.1"), "{}", req);
    assert!(!req.contains("authorization:"), "{}", req);
}

#[tokio::test]
async fn rejection_keeps_json_payload() {
    let (base, _rx) = serve_once(
        "400 Bad Request",
        "application/json",
        r#"{"amount":["Ensure this value is greater than 0."]}"#,
    )
    .await;
    let t = transport(&base, signed_in());

    let err = t
        .request(Method::POST, "transactions/", Some(json!({"amount": "0"})))
        .await
        .unwrap_err();
    match &err {
        ClientError::Http { status, payload } => {
            assert_eq!(*status, 400);
            assert_eq!(
                payload,
                &json!({"amount": ["Ensure this value is greater than 0."]})
            );
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(err.status(), Some(400));
}

#[tokio::test]
async fn non_json_error_body_becomes_null_payload() {
    let (base, _rx) = serve_once("502 Bad Gateway", "text/html", "<html>bad gateway</html>").await;
    let t = transport(&base, Session::new());

    let err = t.request(Method::GET, "budgets/", None).await.unwrap_err();
    match err {
        ClientError::Http { status, payload } => {
            assert_eq!(status, 502);
            assert_eq!(payload, Value::Null);
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn empty_success_body_is_null() {
    let (base, rx) = serve_once("200 OK", "application/json", "").await;
    let t = transport(&base, signed_in());

    let v = t
        .request(Method::DELETE, "savings-goals/3/", None)
        .await
        .unwrap();
    assert_eq!(v, Value::Null);
    let req = rx.await.unwrap().to_lowercase();
    assert!(req.starts_with("delete /api/savings-goals/3/ http/1.1"), "{}", req);
}

#[tokio::test]
async fn refused_connection_is_a_network_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let t = transport(&format!("http://{}/api", addr), Session::new());

    let err = t.request(Method::GET, "accounts/", None).await.unwrap_err();
    assert!(matches!(err, ClientError::Network(_)), "{:?}", err);
    assert_eq!(err.status(), None);
}
