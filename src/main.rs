// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use finboard::app::App;
use finboard::config::Config;
use finboard::session::SessionFile;
use finboard::{cli, commands};

fn init_tracing(verbose: bool) {
    let default = if verbose { "finboard=debug" } else { "finboard=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let matches = cli::build_cli().get_matches();
    init_tracing(matches.get_flag("verbose"));
    let json = matches.get_flag("json");

    let mut config = Config::from_matches(&matches);
    match matches.subcommand() {
        Some(("dashboard", sub)) => {
            if let Some(n) = sub.get_one::<usize>("months") {
                config.months = *n;
            }
        }
        Some(("watch", sub)) => {
            if let Some(s) = sub.get_one::<u64>("interval") {
                config.refresh_interval = Duration::from_secs((*s).max(1));
            }
        }
        _ => {}
    }

    let file = SessionFile::new(config.session_path()?);
    let session = file.open()?;
    let app = App::new(config, session)?;

    let result = dispatch(&app, &file, &matches, json).await;
    if result.is_err() {
        for notice in app.notices.errors() {
            eprintln!("! {}", notice);
        }
    }
    result
}

async fn dispatch(
    app: &App,
    file: &SessionFile,
    matches: &clap::ArgMatches,
    json: bool,
) -> Result<()> {
    match matches.subcommand() {
        Some(("login", sub)) => commands::auth::login(app, file, sub).await?,
        Some(("register", sub)) => commands::auth::register(app, file, sub).await?,
        Some(("logout", _)) => commands::auth::logout(app, file)?,
        Some(("whoami", _)) => commands::auth::whoami(app)?,
        Some(("account", sub)) => commands::accounts::handle(app, sub, json).await?,
        Some(("category", sub)) => commands::categories::handle(app, sub, json).await?,
        Some(("tx", sub)) => commands::transactions::handle(app, sub, json).await?,
        Some(("budget", sub)) => commands::budgets::handle(app, sub, json).await?,
        Some(("goal", sub)) => commands::goals::handle(app, sub, json).await?,
        Some(("dashboard", _)) => commands::dashboard::handle(app, json).await?,
        Some(("watch", _)) => commands::watch::handle(app).await?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
