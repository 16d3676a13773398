// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod common;

use common::*;
use finboard::api::{Accounts, Api, Categories, SavingsGoals};
use finboard::models::CategoryType;
use finboard::store::Store;
use reqwest::Method;
use serde_json::json;

#[tokio::test]
async fn load_replaces_collection_in_server_order() {
    let mock = MockTransport::new();
    let a = vec![account(2, "Savings", "10.00"), account(1, "Checking", "5.50")];
    mock.on(Method::GET, "accounts/", Reply::ok(&a));
    let store: Store<Accounts> = Store::new(Api::new(mock.clone()));
    store.replace(vec![account(9, "Stale", "0")]);

    assert_eq!(store.load().await.unwrap(), 2);
    assert_eq!(store.ids(), vec![2, 1]);
    assert_eq!(store.get(1).unwrap().balance, dec("5.50"));
    assert!(store.error().is_none());
}

#[tokio::test]
async fn null_list_is_empty() {
    let mock = MockTransport::new();
    mock.on(Method::GET, "categories/", Reply::Json(json!(null)));
    let store: Store<Categories> = Store::new(Api::new(mock.clone()));
    assert_eq!(store.load().await.unwrap(), 0);
    assert!(store.is_empty());
}

#[tokio::test]
async fn failed_load_degrades_to_empty_with_banner() {
    let mock = MockTransport::new();
    mock.on(Method::GET, "savings-goals/", Reply::Network);
    let store: Store<SavingsGoals> = Store::new(Api::new(mock.clone()));
    store.replace(vec![goal(1, "Trip", "10", "100")]);

    assert!(store.load().await.is_err());
    assert!(store.is_empty());
    let banner = store.error().unwrap();
    assert!(banner.starts_with("Failed to load savings goals"), "{}", banner);
}

#[tokio::test]
async fn failed_load_is_recovered_by_next_success() {
    let mock = MockTransport::new();
    mock.on(Method::GET, "accounts/", Reply::Status(500, json!({"detail": "boom"})))
        .on(Method::GET, "accounts/", Reply::ok(&vec![account(1, "Cash", "1")]));
    let store: Store<Accounts> = Store::new(Api::new(mock.clone()));

    let err = store.load().await.unwrap_err();
    assert_eq!(err.status(), Some(500));
    assert_eq!(store.error().unwrap(), "Failed to load accounts: boom");

    store.load().await.unwrap();
    assert_eq!(store.len(), 1);
    assert!(store.error().is_none());
}

#[tokio::test]
async fn categories_decode_type_field() {
    let mock = MockTransport::new();
    mock.on(
        Method::GET,
        "categories/",
        Reply::Json(json!([
            {"id": 1, "name": "Salary", "type": "income"},
            {"id": 2, "name": "Food", "type": "expense"}
        ])),
    );
    let store: Store<Categories> = Store::new(Api::new(mock.clone()));
    store.load().await.unwrap();
    assert_eq!(store.get(1).unwrap().kind, CategoryType::Income);
    assert_eq!(store.get(2).unwrap().kind, CategoryType::Expense);
}

#[test]
fn upsert_replaces_or_prepends() {
    let mock = MockTransport::new();
    let store: Store<Accounts> = Store::new(Api::new(mock.clone()));
    store.replace(vec![account(1, "A", "1"), account(2, "B", "2")]);

    store.upsert(account(2, "B2", "20"));
    assert_eq!(store.ids(), vec![1, 2]);
    assert_eq!(store.get(2).unwrap().name, "B2");

    store.upsert(account(3, "C", "3"));
    assert_eq!(store.ids(), vec![3, 1, 2]);
}

#[test]
fn remove_is_idempotent() {
    let mock = MockTransport::new();
    let store: Store<Accounts> = Store::new(Api::new(mock.clone()));
    store.replace(vec![account(1, "A", "1"), account(2, "B", "2")]);

    let (pos, removed) = store.remove(2).unwrap();
    assert_eq!((pos, removed.id), (1, 2));
    assert!(store.remove(2).is_none());
    assert_eq!(store.ids(), vec![1]);
}

#[test]
fn restore_puts_back_only_the_snapshot_entry() {
    let mock = MockTransport::new();
    let store: Store<Accounts> = Store::new(Api::new(mock.clone()));
    store.replace(vec![account(1, "A", "1"), account(2, "B", "2"), account(3, "C", "3")]);
    let snap = store.snapshot(2);

    store.remove(2);
    assert!(store.modify(1, |a| a.name = "changed".into()));
    assert!(!store.modify(42, |a| a.name = "nope".into()));
    assert!(store.restore(&snap, None));

    assert_eq!(store.ids(), vec![1, 2, 3]);
    assert_eq!(store.get(1).unwrap().name, "changed");
    assert_eq!(store.get(2).unwrap().name, "B");
}

#[test]
fn restore_yields_to_a_newer_copy() {
    let mock = MockTransport::new();
    let store: Store<Accounts> = Store::new(Api::new(mock.clone()));
    store.replace(vec![account(1, "A", "1"), account(2, "B", "2")]);
    let snap = store.snapshot(1);
    store.modify(1, |a| a.balance = dec("9"));
    let applied = store.get(1);

    store.upsert(account(1, "A", "70"));
    assert!(!store.restore(&snap, applied.as_ref()));
    assert_eq!(store.get(1).unwrap().balance, dec("70"));
    assert_eq!(store.ids(), vec![1, 2]);
}

#[test]
fn restore_clamps_position_when_list_shrank() {
    let mock = MockTransport::new();
    let store: Store<Accounts> = Store::new(Api::new(mock.clone()));
    store.replace(vec![account(1, "A", "1"), account(2, "B", "2"), account(3, "C", "3")]);
    let snap = store.snapshot(3);
    store.remove(3);
    store.remove(1);

    assert!(store.restore(&snap, None));
    assert_eq!(store.ids(), vec![2, 3]);
}

#[tokio::test]
async fn cached_fetches_only_when_empty_and_sets_no_banner() {
    let mock = MockTransport::new();
    let store: Store<Categories> = Store::new(Api::new(mock.clone()));
    assert!(store.cached(false).await.is_empty());
    assert!(store.error().is_none());

    mock.on(
        Method::GET,
        "categories/",
        Reply::ok(&vec![category(1, "Food", CategoryType::Expense)]),
    );
    assert_eq!(store.cached(false).await.len(), 1);
    assert_eq!(store.cached(false).await.len(), 1);
    assert_eq!(mock.count(&Method::GET, "categories/"), 2);
    store.cached(true).await;
    assert_eq!(mock.count(&Method::GET, "categories/"), 3);
}

#[test]
fn clones_share_state() {
    let mock = MockTransport::new();
    let store: Store<Accounts> = Store::new(Api::new(mock.clone()));
    let other = store.clone();
    store.upsert(account(5, "E", "0"));
    assert_eq!(other.ids(), vec![5]);
}
