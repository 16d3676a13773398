// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::app::App;
use crate::models::{CategoryType, Transaction, TransactionInput};
use crate::utils::{fmt_money, maybe_print_json, parse_date, parse_decimal, pretty_table};
use crate::views::{TransactionFilter, page_count, paginate, sorted_by_date_desc};
use anyhow::{Context, Result, anyhow};
use chrono::Local;

pub async fn handle(app: &App, m: &clap::ArgMatches, json: bool) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => list(app, sub, json).await?,
        Some(("add", sub)) => add(app, sub).await?,
        Some(("edit", sub)) => edit(app, sub).await?,
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").ok_or_else(|| anyhow!("--id is required"))?;
            let _ = app.transactions.store().load().await;
            app.transactions
                .delete(id)
                .await
                .context("Failed to delete transaction")?;
            println!("Removed transaction {}", id);
        }
        _ => {}
    }
    Ok(())
}

/// Build the filter from `tx list` options.
pub fn filter_from(sub: &clap::ArgMatches) -> Result<TransactionFilter> {
    Ok(TransactionFilter {
        account: sub.get_one::<i64>("account").copied(),
        kind: sub
            .get_one::<String>("type")
            .map(|s| s.parse::<CategoryType>())
            .transpose()
            .map_err(|e| anyhow!(e))?,
        date_after: sub.get_one::<String>("from").map(|s| parse_date(s)).transpose()?,
        date_before: sub.get_one::<String>("to").map(|s| parse_date(s)).transpose()?,
    })
}

async fn list(app: &App, sub: &clap::ArgMatches, json: bool) -> Result<()> {
    let filter = filter_from(sub)?;
    let store = app.transactions.store();
    let _ = store.load().await;
    super::print_banners(app);
    let all = filter.apply(&sorted_by_date_desc(&store.items()));
    let per_page = app.config.page_size;
    let page = *sub.get_one::<usize>("page").unwrap_or(&1);
    let shown = if sub.get_flag("all") {
        all.clone()
    } else {
        paginate(&all, page, per_page)
    };
    if maybe_print_json(json, &shown)? {
        return Ok(());
    }
    println!("{}", table(&shown));
    if !sub.get_flag("all") {
        println!(
            "Page {} of {} ({} matching)",
            page,
            page_count(all.len(), per_page),
            all.len()
        );
    }
    Ok(())
}

pub fn table(rows: &[Transaction]) -> comfy_table::Table {
    let data = rows
        .iter()
        .map(|t| {
            vec![
                t.id.to_string(),
                t.date.to_string(),
                t.account.name.clone(),
                t.category.name.clone(),
                t.category.kind.as_str().to_string(),
                fmt_money(&t.amount),
                t.description.clone(),
            ]
        })
        .collect();
    pretty_table(
        &["ID", "Date", "Account", "Category", "Type", "Amount", "Description"],
        data,
    )
}

fn input_from(sub: &clap::ArgMatches, base: Option<&Transaction>) -> Result<TransactionInput> {
    let pick_id = |name: &str, fallback: Option<i64>| {
        sub.get_one::<i64>(name)
            .copied()
            .or(fallback)
            .ok_or_else(|| anyhow!("--{} is required", name))
    };
    let amount = match sub.get_one::<String>("amount") {
        Some(a) => parse_decimal(a)?,
        None => base.map(|t| t.amount).ok_or_else(|| anyhow!("--amount is required"))?,
    };
    let date = match sub.get_one::<String>("date") {
        Some(d) => parse_date(d)?,
        None => base
            .map(|t| t.date)
            .unwrap_or_else(|| Local::now().date_naive()),
    };
    Ok(TransactionInput {
        account_id: pick_id("account", base.map(|t| t.account.id))?,
        category_id: pick_id("category", base.map(|t| t.category.id))?,
        budget_id: sub
            .get_one::<i64>("budget")
            .copied()
            .or_else(|| base.and_then(|t| t.budget.as_ref().map(|b| b.id))),
        description: sub
            .get_one::<String>("description")
            .cloned()
            .or_else(|| base.map(|t| t.description.clone()))
            .unwrap_or_default(),
        date,
        amount,
    })
}

async fn add(app: &App, sub: &clap::ArgMatches) -> Result<()> {
    let input = input_from(sub, None)?;
    let t = app
        .transactions
        .create(&input)
        .await
        .context("Failed to create transaction")?;
    println!(
        "Recorded {} {} on {} (id {})",
        t.category.kind.as_str(),
        fmt_money(&t.amount),
        t.date,
        t.id
    );
    Ok(())
}

async fn edit(app: &App, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").ok_or_else(|| anyhow!("--id is required"))?;
    let store = app.transactions.store();
    let _ = store.load().await;
    let cur = store
        .get(id)
        .with_context(|| format!("Transaction {} not found", id))?;
    let input = input_from(sub, Some(&cur))?;
    let t = app
        .transactions
        .update(id, &input)
        .await
        .context("Failed to update transaction")?;
    println!("Updated transaction {} ({})", t.id, fmt_money(&t.amount));
    Ok(())
}
