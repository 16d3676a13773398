// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::app::App;
use crate::models::{LoginRequest, RegisterRequest};
use crate::session::{Credentials, SessionFile};
use anyhow::{Context, Result};

fn arg(m: &clap::ArgMatches, name: &str) -> String {
    m.get_one::<String>(name).cloned().unwrap_or_default()
}

pub async fn login(app: &App, file: &SessionFile, m: &clap::ArgMatches) -> Result<()> {
    let req = LoginRequest {
        username: arg(m, "username").trim().to_string(),
        password: arg(m, "password"),
    };
    let resp = app
        .api
        .login(&app.session, &req)
        .await
        .context("Login failed")?;
    file.save(&Credentials::from(resp.clone()))?;
    println!("Logged in as {}", resp.user.display_name());
    Ok(())
}

pub async fn register(app: &App, file: &SessionFile, m: &clap::ArgMatches) -> Result<()> {
    let req = RegisterRequest {
        username: arg(m, "username").trim().to_string(),
        first_name: arg(m, "first-name"),
        last_name: arg(m, "last-name"),
        email: arg(m, "email"),
        password: arg(m, "password"),
        password2: arg(m, "password2"),
    };
    let resp = app
        .api
        .register(&app.session, &req)
        .await
        .context("Registration failed")?;
    file.save(&Credentials::from(resp.clone()))?;
    println!("Welcome, {}", resp.user.display_name());
    Ok(())
}

pub fn logout(app: &App, file: &SessionFile) -> Result<()> {
    app.session.clear();
    file.clear()?;
    println!("Logged out");
    Ok(())
}

pub fn whoami(app: &App) -> Result<()> {
    match app.session.user() {
        Some(u) => println!("Hello, {}", u.display_name()),
        None => println!("Not logged in"),
    }
    Ok(())
}
