// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod api;
pub mod app;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod models;
pub mod mutation;
pub mod notice;
pub mod session;
pub mod signal;
pub mod store;
pub mod transport;
pub mod utils;
pub mod views;
