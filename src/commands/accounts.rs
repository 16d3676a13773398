// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::app::App;
use crate::models::AccountInput;
use crate::utils::{fmt_money, maybe_print_json, parse_decimal, pretty_table};
use crate::views::total_balance;
use anyhow::{Context, Result, anyhow};

pub async fn handle(app: &App, m: &clap::ArgMatches, json: bool) -> Result<()> {
    match m.subcommand() {
        Some(("list", _)) => list(app, json).await?,
        Some(("add", sub)) => {
            let input = AccountInput {
                name: sub.get_one::<String>("name").cloned().unwrap_or_default(),
                balance: parse_decimal(sub.get_one::<String>("balance").map_or("0", |s| s.as_str()))?,
            };
            let a = app
                .accounts
                .create(&input)
                .await
                .context("Failed to save account")?;
            println!("Added account '{}' (id {})", a.name, a.id);
        }
        Some(("edit", sub)) => {
            let id = *sub.get_one::<i64>("id").ok_or_else(|| anyhow!("--id is required"))?;
            let store = app.accounts.store();
            let _ = store.load().await;
            let cur = store
                .get(id)
                .with_context(|| format!("Account {} not found", id))?;
            let input = AccountInput {
                name: sub.get_one::<String>("name").cloned().unwrap_or(cur.name),
                balance: match sub.get_one::<String>("balance") {
                    Some(b) => parse_decimal(b)?,
                    None => cur.balance,
                },
            };
            let a = app
                .accounts
                .update(id, &input)
                .await
                .context("Failed to save account")?;
            println!("Updated account '{}' (balance {})", a.name, fmt_money(&a.balance));
        }
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").ok_or_else(|| anyhow!("--id is required"))?;
            let _ = app.accounts.store().load().await;
            app.accounts
                .delete(id)
                .await
                .context("Failed to delete account")?;
            println!("Removed account {}", id);
        }
        _ => {}
    }
    Ok(())
}

async fn list(app: &App, json: bool) -> Result<()> {
    let store = app.accounts.store();
    let _ = store.load().await;
    super::print_banners(app);
    let accounts = store.items();
    if maybe_print_json(json, &accounts)? {
        return Ok(());
    }
    let rows = accounts
        .iter()
        .map(|a| {
            vec![
                a.id.to_string(),
                a.name.clone(),
                fmt_money(&a.balance),
                a.created_at
                    .map(|c| c.format("%Y-%m-%d").to_string())
                    .unwrap_or_default(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["ID", "Name", "Balance", "Created"], rows)
    );
    println!(
        "Total accounts: {}  Total balance: {}",
        accounts.len(),
        fmt_money(&total_balance(&accounts))
    );
    Ok(())
}
