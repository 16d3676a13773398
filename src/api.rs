// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Typed routes over the [`Transport`].
//!
//! Each resource is a zero-sized marker implementing [`Listable`] (and
//! [`Mutable`] when the backend allows writes).

use crate::error::ClientError;
use crate::models::{
    Account, AccountInput, AuthResponse, Budget, BudgetInput, Category, CategoryType,
    DepositInput, GoalInput, Id, LoginRequest, RegisterRequest, SavingsGoal, Transaction,
    TransactionInput,
};
use crate::session::Session;
use crate::transport::Transport;
use reqwest::Method;
use rust_decimal::Decimal;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

pub trait Entity: Clone + PartialEq + DeserializeOwned + Send + Sync + 'static {
    fn id(&self) -> Id;
}

impl Entity for Account {
    fn id(&self) -> Id {
        self.id
    }
}

impl Entity for Category {
    fn id(&self) -> Id {
        self.id
    }
}

impl Entity for Transaction {
    fn id(&self) -> Id {
        self.id
    }
}

impl Entity for Budget {
    fn id(&self) -> Id {
        self.id
    }
}

impl Entity for SavingsGoal {
    fn id(&self) -> Id {
        self.id
    }
}

pub trait Listable: Send + Sync + 'static {
    type Entity: Entity;
    /// Collection path, with trailing slash.
    const PATH: &'static str;
    const NAME: &'static str;

    fn item_path(id: Id) -> String {
        format!("{}{}/", Self::PATH, id)
    }
}

/// Which lookup lists a mutation consults.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RefNeeds {
    pub categories: bool,
    pub budgets: bool,
}

impl RefNeeds {
    pub fn any(&self) -> bool {
        self.categories || self.budgets
    }
}

/// Lookup lists handed to [`Mutable::check_refs`] and [`Mutable::patch`].
/// An empty list means "unknown": checks against it are skipped.
#[derive(Debug, Default, Clone)]
pub struct RefData {
    pub categories: Vec<Category>,
    pub budgets: Vec<Budget>,
}

pub trait Mutable: Listable {
    type Input: Serialize + Clone + Send + Sync + 'static;
    /// Whether a settled mutation must broadcast `resource-changed`.
    const INVALIDATES: bool;

    /// Form guard run before any request is sent.
    fn validate(input: &Self::Input) -> Result<(), ClientError>;

    fn ref_needs(_input: &Self::Input) -> RefNeeds {
        RefNeeds::default()
    }

    /// Cross-resource guard, run after [`validate`](Self::validate) and
    /// before any write is sent.
    fn check_refs(_input: &Self::Input, _refs: &RefData) -> Result<(), ClientError> {
        Ok(())
    }

    /// Apply `input` to the local copy for the optimistic phase.
    /// Server-computed fields are left alone.
    fn patch(entity: &mut Self::Entity, input: &Self::Input, refs: &RefData);
}

pub struct Accounts;
pub struct Categories;
pub struct Transactions;
pub struct Budgets;
pub struct SavingsGoals;

impl Listable for Accounts {
    type Entity = Account;
    const PATH: &'static str = "accounts/";
    const NAME: &'static str = "accounts";
}

impl Mutable for Accounts {
    type Input = AccountInput;
    // deleting an account cascades to its transactions
    const INVALIDATES: bool = true;

    fn validate(input: &AccountInput) -> Result<(), ClientError> {
        if input.name.trim().is_empty() {
            return Err(ClientError::validation("Enter account name"));
        }
        Ok(())
    }

    fn patch(entity: &mut Account, input: &AccountInput, _refs: &RefData) {
        entity.name = input.name.clone();
        entity.balance = input.balance;
    }
}

impl Listable for Categories {
    type Entity = Category;
    const PATH: &'static str = "categories/";
    const NAME: &'static str = "categories";
}

impl Listable for Transactions {
    type Entity = Transaction;
    const PATH: &'static str = "transactions/";
    const NAME: &'static str = "transactions";
}

impl Mutable for Transactions {
    type Input = TransactionInput;
    const INVALIDATES: bool = true;

    fn validate(input: &TransactionInput) -> Result<(), ClientError> {
        if input.amount <= Decimal::ZERO {
            return Err(ClientError::validation("Amount must be positive"));
        }
        Ok(())
    }

    fn ref_needs(input: &TransactionInput) -> RefNeeds {
        RefNeeds {
            categories: true,
            budgets: input.budget_id.is_some(),
        }
    }

    fn check_refs(input: &TransactionInput, refs: &RefData) -> Result<(), ClientError> {
        if input.budget_id.is_some() && !refs.budgets.is_empty() {
            check_budget_link(input, &refs.budgets)?;
        }
        Ok(())
    }

    fn patch(entity: &mut Transaction, input: &TransactionInput, refs: &RefData) {
        entity.amount = input.amount;
        entity.date = input.date;
        entity.description = input.description.clone();
        // the account name stays stale until the server copy arrives
        entity.account.id = input.account_id;
        if entity.category.id != input.category_id {
            entity.category = match refs.categories.iter().find(|c| c.id == input.category_id) {
                Some(c) => c.clone(),
                None => Category {
                    id: input.category_id,
                    ..entity.category.clone()
                },
            };
        }
        match input.budget_id {
            Some(bid) => {
                if entity.budget.as_ref().map(|b| b.id) != Some(bid) {
                    let known = refs.budgets.iter().find(|b| b.id == bid);
                    entity.budget = Some(crate::models::BudgetRef {
                        id: bid,
                        category: Some(input.category_id),
                        allocated_amount: known.map_or(Decimal::ZERO, |b| b.allocated_amount),
                        remaining_amount: known.map_or(Decimal::ZERO, |b| b.remaining_amount),
                    });
                }
            }
            None => entity.budget = None,
        }
    }
}

impl Listable for Budgets {
    type Entity = Budget;
    const PATH: &'static str = "budgets/";
    const NAME: &'static str = "budgets";
}

impl Mutable for Budgets {
    type Input = BudgetInput;
    // transactions carry an embedded budget summary
    const INVALIDATES: bool = true;

    fn validate(input: &BudgetInput) -> Result<(), ClientError> {
        if input.allocated_amount <= Decimal::ZERO {
            return Err(ClientError::validation("Enter a positive planned amount"));
        }
        Ok(())
    }

    fn ref_needs(_input: &BudgetInput) -> RefNeeds {
        RefNeeds {
            categories: true,
            budgets: false,
        }
    }

    fn check_refs(input: &BudgetInput, refs: &RefData) -> Result<(), ClientError> {
        if refs.categories.is_empty() {
            return Ok(());
        }
        check_budget_category(input, &refs.categories)
    }

    fn patch(entity: &mut Budget, input: &BudgetInput, refs: &RefData) {
        entity.allocated_amount = input.allocated_amount;
        if entity.category.id != input.category_id {
            entity.category = match refs.categories.iter().find(|c| c.id == input.category_id) {
                Some(c) => c.clone(),
                None => Category {
                    id: input.category_id,
                    ..entity.category.clone()
                },
            };
        }
    }
}

impl Listable for SavingsGoals {
    type Entity = SavingsGoal;
    const PATH: &'static str = "savings-goals/";
    const NAME: &'static str = "savings goals";
}

impl Mutable for SavingsGoals {
    type Input = GoalInput;
    const INVALIDATES: bool = false;

    fn validate(input: &GoalInput) -> Result<(), ClientError> {
        if input.name.trim().is_empty() {
            return Err(ClientError::validation("Enter a goal name"));
        }
        if input.target_amount <= Decimal::ZERO {
            return Err(ClientError::validation("Target amount must be positive"));
        }
        Ok(())
    }

    fn patch(entity: &mut SavingsGoal, input: &GoalInput, _refs: &RefData) {
        entity.name = input.name.clone();
        entity.target_amount = input.target_amount;
        entity.description = input.description.clone();
    }
}

/// A transaction's budget must belong to the transaction's category.
pub fn check_budget_link(input: &TransactionInput, budgets: &[Budget]) -> Result<(), ClientError> {
    let Some(bid) = input.budget_id else {
        return Ok(());
    };
    let budget = budgets
        .iter()
        .find(|b| b.id == bid)
        .ok_or_else(|| ClientError::validation(format!("Budget {} not found", bid)))?;
    if budget.category.id != input.category_id {
        return Err(ClientError::validation(format!(
            "Budget {} is for category '{}', not the transaction's category",
            bid, budget.category.name
        )));
    }
    Ok(())
}

/// Budgets may only track expense categories.
pub fn check_budget_category(
    input: &BudgetInput,
    categories: &[Category],
) -> Result<(), ClientError> {
    match categories.iter().find(|c| c.id == input.category_id) {
        None => Err(ClientError::validation("Select a category")),
        Some(c) if c.kind != CategoryType::Expense => Err(ClientError::validation(format!(
            "Category '{}' is not an expense category",
            c.name
        ))),
        Some(_) => Ok(()),
    }
}

/// Typed client for the finance backend.
#[derive(Clone)]
pub struct Api {
    transport: Arc<dyn Transport>,
}

impl Api {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<T, ClientError> {
        let v = self.transport.request(method, path, body).await?;
        serde_json::from_value(v).map_err(|e| {
            tracing::error!(path, error = %e, "response did not decode");
            ClientError::Decode(format!("{}: {}", path, e))
        })
    }

    pub async fn list<R: Listable>(&self) -> Result<Vec<R::Entity>, ClientError> {
        // DRF may answer with null for an empty collection
        let v = self.transport.request(Method::GET, R::PATH, None).await?;
        if v.is_null() {
            return Ok(Vec::new());
        }
        serde_json::from_value(v).map_err(|e| {
            tracing::error!(path = R::PATH, error = %e, "list did not decode");
            ClientError::Decode(format!("{}: {}", R::PATH, e))
        })
    }

    pub async fn create<R: Mutable>(&self, input: &R::Input) -> Result<R::Entity, ClientError> {
        let body = serde_json::to_value(input)?;
        self.call(Method::POST, R::PATH, Some(body)).await
    }

    pub async fn update<R: Mutable>(
        &self,
        id: Id,
        input: &R::Input,
    ) -> Result<R::Entity, ClientError> {
        let body = serde_json::to_value(input)?;
        self.call(Method::PUT, &R::item_path(id), Some(body)).await
    }

    pub async fn delete<R: Mutable>(&self, id: Id) -> Result<(), ClientError> {
        self.transport
            .request(Method::DELETE, &R::item_path(id), None)
            .await?;
        Ok(())
    }

    /// `POST /savings-goals/{id}/add/`
    pub async fn add_to_goal(&self, id: Id, amount: Decimal) -> Result<SavingsGoal, ClientError> {
        let body = serde_json::to_value(DepositInput { amount })?;
        let path = format!("{}add/", SavingsGoals::item_path(id));
        self.call(Method::POST, &path, Some(body)).await
    }

    pub async fn login(
        &self,
        session: &Session,
        req: &LoginRequest,
    ) -> Result<AuthResponse, ClientError> {
        if req.username.trim().is_empty() || req.password.is_empty() {
            return Err(ClientError::validation(
                "Must include 'username' and 'password'.",
            ));
        }
        let body = serde_json::to_value(req)?;
        let resp: AuthResponse = self.call(Method::POST, "login/", Some(body)).await?;
        session.init(resp.clone().into());
        tracing::info!(user = %resp.user.username, "logged in");
        Ok(resp)
    }

    pub async fn register(
        &self,
        session: &Session,
        req: &RegisterRequest,
    ) -> Result<AuthResponse, ClientError> {
        if req.username.trim().is_empty() {
            return Err(ClientError::validation("Username is required"));
        }
        if req.password != req.password2 {
            return Err(ClientError::validation("Password fields didn't match."));
        }
        let body = serde_json::to_value(req)?;
        let resp: AuthResponse = self.call(Method::POST, "register", Some(body)).await?;
        session.init(resp.clone().into());
        tracing::info!(user = %resp.user.username, "registered");
        Ok(resp)
    }
}
