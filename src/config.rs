// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::session::default_session_path;
use crate::signal::DEFAULT_REFRESH;
use crate::views::{DEFAULT_MONTHS, DEFAULT_PAGE_SIZE};
use anyhow::Result;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000/api";
pub const API_URL_ENV: &str = "FINBOARD_API_URL";

#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub refresh_interval: Duration,
    pub months: usize,
    pub page_size: usize,
    /// `None` uses the platform data dir.
    pub session_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            refresh_interval: DEFAULT_REFRESH,
            months: DEFAULT_MONTHS,
            page_size: DEFAULT_PAGE_SIZE,
            session_path: None,
        }
    }
}

impl Config {
    /// Read the global options; clap already resolved env fallbacks.
    pub fn from_matches(m: &clap::ArgMatches) -> Self {
        let mut cfg = Config::default();
        if let Some(url) = m.get_one::<String>("api-url") {
            cfg.api_url = url.trim().trim_end_matches('/').to_string();
        }
        if let Some(p) = m.get_one::<PathBuf>("session-file") {
            cfg.session_path = Some(p.clone());
        }
        cfg
    }

    pub fn session_path(&self) -> Result<PathBuf> {
        match &self.session_path {
            Some(p) => Ok(p.clone()),
            None => Ok(default_session_path()?),
        }
    }
}
