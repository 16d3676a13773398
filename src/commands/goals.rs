// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::app::App;
use crate::models::GoalInput;
use crate::utils::{fmt_money, maybe_print_json, parse_decimal, pretty_table};
use crate::views::{savings_progress, savings_totals};
use anyhow::{Context, Result, anyhow};

pub async fn handle(app: &App, m: &clap::ArgMatches, json: bool) -> Result<()> {
    match m.subcommand() {
        Some(("list", _)) => list(app, json).await?,
        Some(("add", sub)) => {
            let input = GoalInput {
                name: sub.get_one::<String>("name").cloned().unwrap_or_default(),
                target_amount: parse_decimal(sub.get_one::<String>("target").map_or("", |s| s.as_str()))?,
                description: sub
                    .get_one::<String>("description")
                    .cloned()
                    .unwrap_or_default(),
            };
            let g = app
                .goals
                .create(&input)
                .await
                .context("Failed to create goal")?;
            println!("Created goal '{}' (id {})", g.name, g.id);
        }
        Some(("edit", sub)) => {
            let id = *sub.get_one::<i64>("id").ok_or_else(|| anyhow!("--id is required"))?;
            let store = app.goals.store();
            let _ = store.load().await;
            let cur = store
                .get(id)
                .with_context(|| format!("Goal {} not found", id))?;
            let input = GoalInput {
                name: sub.get_one::<String>("name").cloned().unwrap_or(cur.name),
                target_amount: match sub.get_one::<String>("target") {
                    Some(t) => parse_decimal(t)?,
                    None => cur.target_amount,
                },
                description: sub
                    .get_one::<String>("description")
                    .cloned()
                    .unwrap_or(cur.description),
            };
            let g = app
                .goals
                .update(id, &input)
                .await
                .context("Failed to update goal")?;
            println!("Updated goal '{}'", g.name);
        }
        Some(("deposit", sub)) => {
            let id = *sub.get_one::<i64>("id").ok_or_else(|| anyhow!("--id is required"))?;
            let amount = parse_decimal(sub.get_one::<String>("amount").map_or("", |s| s.as_str()))?;
            let _ = app.goals.store().load().await;
            let g = app
                .goals
                .deposit(id, amount)
                .await
                .context("Failed to add funds")?;
            println!(
                "'{}' now at {} of {} ({})",
                g.name,
                fmt_money(&g.current_amount),
                fmt_money(&g.target_amount),
                savings_progress(&g)
            );
        }
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").ok_or_else(|| anyhow!("--id is required"))?;
            let _ = app.goals.store().load().await;
            app.goals
                .delete(id)
                .await
                .context("Failed to delete goal")?;
            println!("Removed goal {}", id);
        }
        _ => {}
    }
    Ok(())
}

async fn list(app: &App, json: bool) -> Result<()> {
    let store = app.goals.store();
    let _ = store.load().await;
    super::print_banners(app);
    let goals = store.items();
    if maybe_print_json(json, &goals)? {
        return Ok(());
    }
    let rows = goals
        .iter()
        .map(|g| {
            vec![
                g.id.to_string(),
                g.name.clone(),
                fmt_money(&g.current_amount),
                fmt_money(&g.target_amount),
                savings_progress(g).to_string(),
                g.description.clone(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["ID", "Name", "Saved", "Target", "Progress", "Description"],
            rows
        )
    );
    let totals = savings_totals(&goals);
    println!(
        "Saved {} of {}",
        fmt_money(&totals.saved),
        fmt_money(&totals.target)
    );
    Ok(())
}
