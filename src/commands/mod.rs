// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod accounts;
pub mod auth;
pub mod budgets;
pub mod categories;
pub mod dashboard;
pub mod goals;
pub mod transactions;
pub mod watch;

/// Print the load-failure banners, if any, above the output.
pub(crate) fn print_banners(app: &crate::app::App) {
    for b in app.banners() {
        eprintln!("! {}", b);
    }
}
