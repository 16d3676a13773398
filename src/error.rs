// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use serde_json::Value;
use thiserror::Error;

/// Errors produced by the client library.
///
/// Transport and HTTP failures come back from the backend round trip,
/// `Validation` is raised before a request is ever sent.
#[derive(Debug, Error)]
pub enum ClientError {
    /// No response was received (connection refused, DNS, reset, ...).
    #[error("network error: {0}")]
    Network(String),

    /// The backend answered with a non-success status.
    #[error("{}", http_display(.status, .payload))]
    Http { status: u16, payload: Value },

    /// Client-side form guard failed; nothing was sent.
    #[error("validation error: {0}")]
    Validation(String),

    /// The response body did not have the expected shape.
    #[error("unexpected response: {0}")]
    Decode(String),

    #[error("session storage: {0}")]
    Session(String),
}

impl ClientError {
    pub fn validation(msg: impl Into<String>) -> Self {
        ClientError::Validation(msg.into())
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Short human readable message, suitable for an inline notice.
    pub fn message(&self) -> String {
        match self {
            ClientError::Http { status, payload } => describe_payload(*status, payload),
            ClientError::Network(m)
            | ClientError::Validation(m)
            | ClientError::Decode(m)
            | ClientError::Session(m) => m.clone(),
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        ClientError::Network(e.to_string())
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        ClientError::Decode(e.to_string())
    }
}

fn http_display(status: &u16, payload: &Value) -> String {
    let msg = describe_payload(*status, payload);
    if msg == format!("HTTP {}", status) {
        msg
    } else {
        format!("HTTP {}: {}", status, msg)
    }
}

/// Pull the most useful message out of a DRF-style error body.
fn describe_payload(status: u16, payload: &Value) -> String {
    let obj = match payload {
        Value::String(s) if !s.is_empty() => return s.clone(),
        Value::Object(map) => map,
        _ => return format!("HTTP {}", status),
    };
    for key in ["detail", "message", "non_field_errors"] {
        if let Some(v) = obj.get(key).and_then(first_text) {
            return v;
        }
    }
    for (field, v) in obj {
        if let Some(text) = first_text(v) {
            return format!("{}: {}", field, text);
        }
    }
    format!("HTTP {}", status)
}

fn first_text(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => items.iter().find_map(first_text),
        _ => None,
    }
}
