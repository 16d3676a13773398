// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::{API_URL_ENV, DEFAULT_API_URL};
use clap::{Arg, ArgAction, Command, value_parser};
use std::path::PathBuf;

fn id_arg() -> Arg {
    Arg::new("id")
        .long("id")
        .required(true)
        .value_parser(value_parser!(i64))
}

fn amount_arg(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name).long(name).required(true).help(help)
}

fn account_cmd() -> Command {
    Command::new("account")
        .about("Manage accounts")
        .subcommand_required(true)
        .subcommand(Command::new("list").about("List accounts and the total balance"))
        .subcommand(
            Command::new("add")
                .arg(Arg::new("name").long("name").required(true))
                .arg(Arg::new("balance").long("balance").default_value("0")),
        )
        .subcommand(
            Command::new("edit")
                .arg(id_arg())
                .arg(Arg::new("name").long("name"))
                .arg(Arg::new("balance").long("balance")),
        )
        .subcommand(Command::new("rm").arg(id_arg()))
}

fn tx_fields(cmd: Command, required: bool) -> Command {
    cmd.arg(
        Arg::new("account")
            .long("account")
            .required(required)
            .value_parser(value_parser!(i64))
            .help("Account id"),
    )
    .arg(
        Arg::new("category")
            .long("category")
            .required(required)
            .value_parser(value_parser!(i64))
            .help("Category id"),
    )
    .arg(Arg::new("amount").long("amount").required(required))
    .arg(Arg::new("date").long("date").help("YYYY-MM-DD, defaults to today"))
    .arg(Arg::new("description").long("description"))
    .arg(
        Arg::new("budget")
            .long("budget")
            .value_parser(value_parser!(i64))
            .help("Budget id; must match the category"),
    )
}

fn tx_cmd() -> Command {
    Command::new("tx")
        .about("Manage transactions")
        .subcommand_required(true)
        .subcommand(
            Command::new("list")
                .arg(
                    Arg::new("account")
                        .long("account")
                        .value_parser(value_parser!(i64)),
                )
                .arg(
                    Arg::new("type")
                        .long("type")
                        .value_parser(["income", "expense"]),
                )
                .arg(Arg::new("from").long("from").help("Inclusive start date"))
                .arg(Arg::new("to").long("to").help("Inclusive end date"))
                .arg(
                    Arg::new("page")
                        .long("page")
                        .default_value("1")
                        .value_parser(value_parser!(usize)),
                )
                .arg(
                    Arg::new("all")
                        .long("all")
                        .action(ArgAction::SetTrue)
                        .help("Show every match instead of one page"),
                ),
        )
        .subcommand(tx_fields(Command::new("add"), true))
        .subcommand(tx_fields(Command::new("edit").arg(id_arg()), false))
        .subcommand(Command::new("rm").arg(id_arg()))
}

fn budget_cmd() -> Command {
    Command::new("budget")
        .about("Manage budgets")
        .subcommand_required(true)
        .subcommand(Command::new("list").about("Budgets with usage"))
        .subcommand(
            Command::new("add")
                .arg(
                    Arg::new("category")
                        .long("category")
                        .required(true)
                        .value_parser(value_parser!(i64)),
                )
                .arg(amount_arg("amount", "Planned amount")),
        )
        .subcommand(
            Command::new("edit")
                .arg(id_arg())
                .arg(
                    Arg::new("category")
                        .long("category")
                        .value_parser(value_parser!(i64)),
                )
                .arg(Arg::new("amount").long("amount")),
        )
        .subcommand(Command::new("rm").arg(id_arg()))
}

fn goal_cmd() -> Command {
    Command::new("goal")
        .about("Manage savings goals")
        .subcommand_required(true)
        .subcommand(Command::new("list").about("Goals with progress"))
        .subcommand(
            Command::new("add")
                .arg(Arg::new("name").long("name").required(true))
                .arg(amount_arg("target", "Target amount"))
                .arg(Arg::new("description").long("description").default_value("")),
        )
        .subcommand(
            Command::new("edit")
                .arg(id_arg())
                .arg(Arg::new("name").long("name"))
                .arg(Arg::new("target").long("target"))
                .arg(Arg::new("description").long("description")),
        )
        .subcommand(
            Command::new("deposit")
                .arg(id_arg())
                .arg(amount_arg("amount", "Amount to add")),
        )
        .subcommand(Command::new("rm").arg(id_arg()))
}

pub fn build_cli() -> Command {
    Command::new("finboard")
        .version(clap::crate_version!())
        .about("Terminal client for your personal finance tracker")
        .arg(
            Arg::new("api-url")
                .long("api-url")
                .global(true)
                .env(API_URL_ENV)
                .default_value(DEFAULT_API_URL),
        )
        .arg(
            Arg::new("session-file")
                .long("session-file")
                .global(true)
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Print JSON instead of tables"),
        )
        .subcommand(
            Command::new("login")
                .arg(Arg::new("username").long("username").required(true))
                .arg(Arg::new("password").long("password").required(true)),
        )
        .subcommand(
            Command::new("register")
                .arg(Arg::new("username").long("username").required(true))
                .arg(Arg::new("email").long("email").default_value(""))
                .arg(Arg::new("first-name").long("first-name").default_value(""))
                .arg(Arg::new("last-name").long("last-name").default_value(""))
                .arg(Arg::new("password").long("password").required(true))
                .arg(Arg::new("password2").long("password2").required(true)),
        )
        .subcommand(Command::new("logout"))
        .subcommand(Command::new("whoami"))
        .subcommand(account_cmd())
        .subcommand(
            Command::new("category")
                .about("Read-only categories")
                .subcommand_required(true)
                .subcommand(Command::new("list")),
        )
        .subcommand(tx_cmd())
        .subcommand(budget_cmd())
        .subcommand(goal_cmd())
        .subcommand(
            Command::new("dashboard").arg(
                Arg::new("months")
                    .long("months")
                    .value_parser(value_parser!(usize)),
            ),
        )
        .subcommand(
            Command::new("watch")
                .about("Keep stores fresh and print a summary on every reload")
                .arg(
                    Arg::new("interval")
                        .long("interval")
                        .value_parser(value_parser!(u64))
                        .help("Polling period in seconds"),
                ),
        )
}
