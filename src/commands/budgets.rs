// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::app::App;
use crate::models::BudgetInput;
use crate::utils::{fmt_money, maybe_print_json, parse_decimal, pretty_table};
use crate::views::{BUDGET_ALERT_THRESHOLD, budget_summary, budget_usage};
use anyhow::{Context, Result, anyhow};
use serde::Serialize;

#[derive(Serialize)]
struct BudgetRow<'a> {
    #[serde(flatten)]
    budget: &'a crate::models::Budget,
    spent: rust_decimal::Decimal,
    usage: rust_decimal::Decimal,
}

pub async fn handle(app: &App, m: &clap::ArgMatches, json: bool) -> Result<()> {
    match m.subcommand() {
        Some(("list", _)) => list(app, json).await?,
        Some(("add", sub)) => {
            let input = BudgetInput {
                category_id: *sub
                    .get_one::<i64>("category")
                    .ok_or_else(|| anyhow!("--category is required"))?,
                allocated_amount: parse_decimal(
                    sub.get_one::<String>("amount").map_or("", |s| s.as_str()),
                )?,
            };
            let b = app
                .budgets
                .create(&input)
                .await
                .context("Failed to create budget")?;
            println!(
                "Budget {} for '{}': {}",
                b.id,
                b.category.name,
                fmt_money(&b.allocated_amount)
            );
        }
        Some(("edit", sub)) => {
            let id = *sub.get_one::<i64>("id").ok_or_else(|| anyhow!("--id is required"))?;
            let store = app.budgets.store();
            let _ = store.load().await;
            let cur = store
                .get(id)
                .with_context(|| format!("Budget {} not found", id))?;
            let input = BudgetInput {
                category_id: sub
                    .get_one::<i64>("category")
                    .copied()
                    .unwrap_or(cur.category.id),
                allocated_amount: match sub.get_one::<String>("amount") {
                    Some(a) => parse_decimal(a)?,
                    None => cur.allocated_amount,
                },
            };
            let b = app
                .budgets
                .update(id, &input)
                .await
                .context("Failed to update budget")?;
            println!(
                "Updated budget {} (planned {}, remaining {})",
                b.id,
                fmt_money(&b.allocated_amount),
                fmt_money(&b.remaining_amount)
            );
        }
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").ok_or_else(|| anyhow!("--id is required"))?;
            let _ = app.budgets.store().load().await;
            app.budgets
                .delete(id)
                .await
                .context("Failed to delete budget")?;
            println!("Removed budget {}", id);
        }
        _ => {}
    }
    Ok(())
}

async fn list(app: &App, json: bool) -> Result<()> {
    let store = app.budgets.store();
    let _ = store.load().await;
    super::print_banners(app);
    let budgets = store.items();
    if json {
        let rows: Vec<BudgetRow> = budgets
            .iter()
            .map(|b| BudgetRow {
                budget: b,
                spent: b.spent(),
                usage: budget_usage(b).display(),
            })
            .collect();
        maybe_print_json(true, &rows)?;
        return Ok(());
    }
    let rows = budgets
        .iter()
        .map(|b| {
            vec![
                b.id.to_string(),
                b.category.name.clone(),
                fmt_money(&b.allocated_amount),
                fmt_money(&b.spent()),
                fmt_money(&b.remaining_amount),
                budget_usage(b).to_string(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["ID", "Category", "Planned", "Spent", "Remaining", "Used"],
            rows
        )
    );
    let summary = budget_summary(&budgets);
    println!(
        "Budgeted {}  Spent {}  Remaining {}  ({})",
        fmt_money(&summary.total_budgeted),
        fmt_money(&summary.total_spent),
        fmt_money(&summary.total_remaining),
        summary.usage
    );
    if summary.alert() {
        println!(
            "Warning: you have used more than {}% of your total budget",
            BUDGET_ALERT_THRESHOLD
        );
    }
    Ok(())
}
