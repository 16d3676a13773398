// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub type Id = i64;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Account {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub balance: Decimal, // server computed
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum CategoryType {
    Income,
    Expense,
}

impl CategoryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryType::Income => "income",
            CategoryType::Expense => "expense",
        }
    }
}

impl std::str::FromStr for CategoryType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(CategoryType::Income),
            "expense" => Ok(CategoryType::Expense),
            other => Err(format!("Unknown category type '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub id: Id,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: CategoryType,
}

/// Budget summary embedded in a transaction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BudgetRef {
    pub id: Id,
    #[serde(default)]
    pub category: Option<Id>,
    #[serde(default)]
    pub allocated_amount: Decimal,
    #[serde(default)]
    pub remaining_amount: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub id: Id,
    pub account: Account,
    pub category: Category,
    #[serde(default)]
    pub budget: Option<BudgetRef>,
    #[serde(default)]
    pub description: String,
    pub date: NaiveDate,
    pub amount: Decimal,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Transaction {
    pub fn account_id(&self) -> Id {
        self.account.id
    }

    pub fn is_income(&self) -> bool {
        self.category.kind == CategoryType::Income
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Budget {
    pub id: Id,
    pub category: Category,
    pub allocated_amount: Decimal,
    /// allocated minus spent, as reported by the backend
    pub remaining_amount: Decimal,
}

impl Budget {
    pub fn spent(&self) -> Decimal {
        self.allocated_amount - self.remaining_amount
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SavingsGoal {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub current_amount: Decimal,
    pub target_amount: Decimal,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

// ---- write payloads ----

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccountInput {
    pub name: String,
    pub balance: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransactionInput {
    pub account_id: Id,
    pub category_id: Id,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget_id: Option<Id>,
    pub description: String,
    pub date: NaiveDate,
    pub amount: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BudgetInput {
    pub category_id: Id,
    pub allocated_amount: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GoalInput {
    pub name: String,
    pub target_amount: Decimal,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DepositInput {
    pub amount: Decimal,
}

// ---- auth ----

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub password2: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    #[serde(default)]
    pub id: Option<Id>,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
}

impl UserProfile {
    pub fn display_name(&self) -> String {
        let full = [self.first_name.trim(), self.last_name.trim()]
            .iter()
            .filter(|s| !s.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(" ");
        if full.is_empty() {
            self.username.clone()
        } else {
            full
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access: String,
    pub refresh: String,
    pub user: UserProfile,
}
