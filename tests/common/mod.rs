// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::NaiveDate;
use finboard::app::App;
use finboard::config::Config;
use finboard::error::ClientError;
use finboard::models::{Account, Budget, Category, CategoryType, SavingsGoal, Transaction};
use finboard::session::Session;
use finboard::transport::Transport;
use parking_lot::Mutex;
use reqwest::Method;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tokio::sync::Notify;

#[derive(Clone)]
pub enum Reply {
    Json(Value),
    Status(u16, Value),
    Network,
    /// Wait for the gate to open before answering.
    Held(Arc<Notify>, Box<Reply>),
}

impl Reply {
    pub fn ok<T: Serialize>(v: &T) -> Self {
        Reply::Json(serde_json::to_value(v).unwrap())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

/// Scripted transport. Replies are queued per `(method, path)`; the last
/// reply in a queue keeps answering. Unscripted routes answer 404.
#[derive(Default)]
pub struct MockTransport {
    routes: Mutex<HashMap<(Method, String), VecDeque<Reply>>>,
    calls: Mutex<Vec<Call>>,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn on(&self, method: Method, path: &str, reply: Reply) -> &Self {
        self.routes
            .lock()
            .entry((method, path.to_string()))
            .or_default()
            .push_back(reply);
        self
    }

    /// Like [`on`](Self::on), but the reply waits until the returned gate
    /// is notified.
    pub fn hold(&self, method: Method, path: &str, reply: Reply) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.on(method, path, Reply::Held(Arc::clone(&gate), Box::new(reply)));
        gate
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn count(&self, method: &Method, path: &str) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|c| &c.method == method && c.path == path)
            .count()
    }

    fn next(&self, method: &Method, path: &str) -> Option<Reply> {
        let mut routes = self.routes.lock();
        let q = routes.get_mut(&(method.clone(), path.to_string()))?;
        if q.len() > 1 { q.pop_front() } else { q.front().cloned() }
    }
}

fn resolve(reply: Reply) -> Pin<Box<dyn Future<Output = Result<Value, ClientError>> + Send>> {
    Box::pin(async move {
        match reply {
            Reply::Json(v) => Ok(v),
            Reply::Status(status, payload) => Err(ClientError::Http { status, payload }),
            Reply::Network => Err(ClientError::Network("connection refused".into())),
            Reply::Held(gate, inner) => {
                gate.notified().await;
                resolve(*inner).await
            }
        }
    })
}

#[async_trait]
impl Transport for MockTransport {
    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, ClientError> {
        self.calls.lock().push(Call {
            method: method.clone(),
            path: path.to_string(),
            body,
        });
        match self.next(&method, path) {
            Some(reply) => resolve(reply).await,
            None => Err(ClientError::Http {
                status: 404,
                payload: serde_json::json!({"detail": "Not found."}),
            }),
        }
    }
}

pub fn app(mock: &Arc<MockTransport>) -> App {
    App::with_transport(Config::default(), Session::new(), mock.clone())
}

pub fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

pub fn account(id: i64, name: &str, balance: &str) -> Account {
    Account {
        id,
        name: name.to_string(),
        balance: dec(balance),
        created_at: None,
    }
}

pub fn category(id: i64, name: &str, kind: CategoryType) -> Category {
    Category {
        id,
        name: name.to_string(),
        kind,
    }
}

pub fn tx(id: i64, account: &Account, category: &Category, amount: &str, on: &str) -> Transaction {
    Transaction {
        id,
        account: account.clone(),
        category: category.clone(),
        budget: None,
        description: String::new(),
        date: date(on),
        amount: dec(amount),
        created_at: None,
    }
}

pub fn budget(id: i64, category: &Category, allocated: &str, remaining: &str) -> Budget {
    Budget {
        id,
        category: category.clone(),
        allocated_amount: dec(allocated),
        remaining_amount: dec(remaining),
    }
}

pub fn goal(id: i64, name: &str, current: &str, target: &str) -> SavingsGoal {
    SavingsGoal {
        id,
        name: name.to_string(),
        description: String::new(),
        current_amount: dec(current),
        target_amount: dec(target),
        created_at: None,
    }
}
