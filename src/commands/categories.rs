// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::app::App;
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;

pub async fn handle(app: &App, m: &clap::ArgMatches, json: bool) -> Result<()> {
    if let Some(("list", _)) = m.subcommand() {
        // failure leaves an empty list and a banner
        let _ = app.categories.load().await;
        super::print_banners(app);
        let cats = app.categories.items();
        if !maybe_print_json(json, &cats)? {
            let rows = cats
                .iter()
                .map(|c| vec![c.id.to_string(), c.name.clone(), c.kind.as_str().to_string()])
                .collect();
            println!("{}", pretty_table(&["ID", "Category", "Type"], rows));
        }
    }
    Ok(())
}
