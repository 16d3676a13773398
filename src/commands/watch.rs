// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::app::App;
use crate::utils::fmt_money;
use crate::views::{budget_summary, total_balance};
use anyhow::Result;
use chrono::Local;

fn summary_line(app: &App) -> String {
    let budgets = budget_summary(&app.budgets.store().items());
    format!(
        "[{}] {} accounts, balance {} | {} transactions | budget used {}{}",
        Local::now().format("%H:%M:%S"),
        app.accounts.store().len(),
        fmt_money(&total_balance(&app.accounts.store().items())),
        app.transactions.store().len(),
        budgets.usage,
        if budgets.alert() { " (!)" } else { "" }
    )
}

/// Keep the stores fresh until Ctrl-C, printing a line per refresh period.
pub async fn handle(app: &App) -> Result<()> {
    app.load_all().await;
    super::print_banners(app);
    let tasks = app.watch();
    let period = app.config.refresh_interval;
    tracing::info!(period_secs = period.as_secs(), "watching");
    println!("{}", summary_line(app));

    let mut ticker = tokio::time::interval(period);
    ticker.tick().await;
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                super::print_banners(app);
                println!("{}", summary_line(app));
            }
            res = tokio::signal::ctrl_c() => {
                res?;
                break;
            }
        }
    }
    for t in tasks {
        t.abort();
    }
    println!("Stopped");
    Ok(())
}
