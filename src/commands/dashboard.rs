// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::app::App;
use crate::utils::{fmt_money, maybe_print_json, pretty_table};
use crate::views::{BUDGET_ALERT_THRESHOLD, Dashboard};
use anyhow::Result;
use chrono::Local;

pub async fn handle(app: &App, json: bool) -> Result<()> {
    app.load_all().await;
    super::print_banners(app);
    let dash = app.dashboard(Local::now().date_naive());
    if maybe_print_json(json, &dash)? {
        return Ok(());
    }
    let name = app
        .session
        .user()
        .map(|u| u.display_name())
        .unwrap_or_else(|| "there".to_string());
    println!("Welcome back, {}!", name);
    print(&dash);
    Ok(())
}

/// Render the dashboard as a handful of tables.
pub fn print(dash: &Dashboard) {
    println!(
        "{}",
        pretty_table(
            &["Total balance", "Income (month)", "Expenses (month)", "Budget left"],
            vec![vec![
                fmt_money(&dash.total_balance),
                fmt_money(&dash.this_month.income),
                fmt_money(&dash.this_month.expense),
                fmt_money(&dash.remaining_budget),
            ]],
        )
    );
    if dash.budget_alert {
        println!(
            "Warning: budget usage at {}, above {}%",
            dash.budget_usage, BUDGET_ALERT_THRESHOLD
        );
    }

    let monthly = dash
        .monthly
        .iter()
        .map(|f| {
            vec![
                f.month.clone(),
                fmt_money(&f.income),
                fmt_money(&f.expense),
                fmt_money(&(f.income - f.expense)),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Month", "Income", "Expense", "Net"], monthly)
    );

    if !dash.expense_by_category.is_empty() {
        let rows = dash
            .expense_by_category
            .iter()
            .map(|(name, total)| vec![name.clone(), fmt_money(total)])
            .collect();
        println!("{}", pretty_table(&["Category", "Spent"], rows));
    }

    println!(
        "Savings: {} of {}",
        fmt_money(&dash.savings.saved),
        fmt_money(&dash.savings.target)
    );

    if dash.recent.is_empty() {
        println!("No recent transactions");
    } else {
        println!("Recent transactions");
        println!("{}", super::transactions::table(&dash.recent));
    }
}
