// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod common;

use common::*;
use finboard::api::{Accounts, Api};
use finboard::signal::{InvalidationBus, Signal};
use finboard::store::Store;
use reqwest::Method;
use std::time::Duration;

#[test]
fn emit_without_listeners_is_fine() {
    let bus = InvalidationBus::new();
    assert_eq!(bus.listener_count(), 0);
    bus.emit();
}

#[tokio::test]
async fn listener_reloads_on_every_signal() {
    let mock = MockTransport::new();
    mock.on(
        Method::GET,
        "accounts/",
        Reply::ok(&vec![account(1, "Checking", "10")]),
    );
    let store: Store<Accounts> = Store::new(Api::new(mock.clone()));
    let bus = InvalidationBus::new();
    let handle = bus.listen(store.clone());
    assert_eq!(bus.listener_count(), 1);

    bus.emit();
    tokio::task::yield_now().await;
    assert_eq!(store.ids(), vec![1]);

    bus.emit();
    bus.emit();
    for _ in 0..3 {
        tokio::task::yield_now().await;
    }
    assert_eq!(mock.count(&Method::GET, "accounts/"), 3);
    handle.abort();
}

#[tokio::test]
async fn listener_survives_failed_reload() {
    let mock = MockTransport::new();
    mock.on(Method::GET, "accounts/", Reply::Network).on(
        Method::GET,
        "accounts/",
        Reply::ok(&vec![account(2, "Cash", "1")]),
    );
    let store: Store<Accounts> = Store::new(Api::new(mock.clone()));
    let bus = InvalidationBus::new();
    let handle = bus.listen(store.clone());

    bus.emit();
    tokio::task::yield_now().await;
    assert!(store.error().is_some());

    bus.emit();
    tokio::task::yield_now().await;
    assert_eq!(store.ids(), vec![2]);
    assert!(!handle.is_finished());
    handle.abort();
}

#[tokio::test]
async fn listener_stops_when_bus_is_dropped() {
    let mock = MockTransport::new();
    let store: Store<Accounts> = Store::new(Api::new(mock.clone()));
    let bus = InvalidationBus::new();
    let handle = bus.listen(store);
    drop(bus);
    handle.await.unwrap();
    assert!(mock.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn poller_emits_once_per_period() {
    let bus = InvalidationBus::new();
    let mut rx = bus.subscribe();
    let poller = bus.spawn_poller(Duration::from_secs(15));

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert!(rx.try_recv().is_err());

    tokio::time::sleep(Duration::from_secs(15)).await;
    assert_eq!(rx.try_recv().unwrap(), Signal::ResourceChanged);
    assert!(rx.try_recv().is_err());

    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(rx.try_recv().unwrap(), Signal::ResourceChanged);
    assert_eq!(rx.try_recv().unwrap(), Signal::ResourceChanged);
    poller.abort();
}

#[tokio::test(start_paused = true)]
async fn watch_wires_three_listeners_and_poller() {
    let mock = MockTransport::new();
    let app = app(&mock);
    let tasks = app.watch();
    assert_eq!(tasks.len(), 4);
    assert_eq!(app.bus.listener_count(), 3);

    // first poll after the default 15s period
    tokio::time::sleep(Duration::from_secs(16)).await;
    for _ in 0..5 {
        tokio::task::yield_now().await;
    }
    assert_eq!(mock.count(&Method::GET, "accounts/"), 1);
    assert_eq!(mock.count(&Method::GET, "budgets/"), 1);
    assert_eq!(mock.count(&Method::GET, "transactions/"), 1);
    assert_eq!(mock.count(&Method::GET, "savings-goals/"), 0);
    for t in tasks {
        t.abort();
    }
}
