// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::ClientError;
use crate::session::Session;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Client, Method};
use serde_json::Value;
use std::time::Instant;

/// One JSON round trip against the backend.
///
/// Implementations never retry or queue; a failed call is reported once and
/// the caller decides what to do with it.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, ClientError>;
}

pub struct HttpTransport {
    client: Client,
    base_url: String,
    session: Session,
}

impl HttpTransport {
    pub fn new(base_url: &str, session: Session) -> Result<Self, ClientError> {
        Ok(Self::with_client(crate::utils::http_client()?, base_url, session))
    }

    pub fn with_client(client: Client, base_url: &str, session: Session) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
        }
    }

    pub fn url_for(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }
}

pub fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[async_trait]
impl Transport for HttpTransport {
    #[tracing::instrument(skip(self, body), fields(method = %method, path = %path))]
    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, ClientError> {
        let start = Instant::now();
        let mut req = self
            .client
            .request(method, self.url_for(path))
            .header(ACCEPT, "application/json");
        if let Some(token) = self.session.access_token() {
            req = req.header(AUTHORIZATION, format!("Bearer {}", token));
        }
        if let Some(b) = body {
            req = req.json(&b);
        }

        let resp = req.send().await.map_err(|e| {
            tracing::error!(error = %e, "request failed without a response");
            ClientError::Network(e.to_string())
        })?;
        let status = resp.status();
        let bytes = resp.bytes().await.map_err(|e| {
            tracing::error!(error = %e, "failed reading response body");
            ClientError::Network(e.to_string())
        })?;
        let payload = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|e| {
                tracing::debug!(error = %e, "response body is not JSON");
                Value::Null
            })
        };
        let elapsed = start.elapsed().as_millis();

        if status.is_success() {
            tracing::debug!(status = status.as_u16(), duration_ms = elapsed, "ok");
            Ok(payload)
        } else {
            tracing::warn!(status = status.as_u16(), duration_ms = elapsed, "backend rejected request");
            Err(ClientError::Http {
                status: status.as_u16(),
                payload,
            })
        }
    }
}
