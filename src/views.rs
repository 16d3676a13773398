// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Derived figures for the dashboard and list pages.
//!
//! Everything here is a pure reduction over store contents and is recomputed
//! on every render; nothing is cached or persisted.

use crate::models::{Account, Budget, CategoryType, Id, SavingsGoal, Transaction};
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

pub const DEFAULT_MONTHS: usize = 6;
pub const DEFAULT_PAGE_SIZE: usize = 5;
/// Aggregate budget usage above this (unclamped) percentage raises an alert.
pub const BUDGET_ALERT_THRESHOLD: Decimal = Decimal::from_parts(90, 0, 0, false, 0);

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// A percentage that keeps the raw ratio for comparisons and clamps only
/// when shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Percent {
    raw: Decimal,
}

impl Percent {
    pub const ZERO: Percent = Percent { raw: Decimal::ZERO };

    /// `part / whole * 100`, or zero when `whole` is zero. Ratios beyond
    /// the decimal range saturate at its bounds.
    pub fn of(part: Decimal, whole: Decimal) -> Self {
        if whole.is_zero() {
            return Self::ZERO;
        }
        let raw = part
            .checked_div(whole)
            .and_then(|r| r.checked_mul(HUNDRED))
            .unwrap_or(if part.is_sign_negative() == whole.is_sign_negative() {
                Decimal::MAX
            } else {
                Decimal::MIN
            });
        Percent { raw }
    }

    pub fn raw(&self) -> Decimal {
        self.raw
    }

    /// Clamped to [0, 100] for presentation.
    pub fn display(&self) -> Decimal {
        self.raw.clamp(Decimal::ZERO, HUNDRED)
    }

    pub fn exceeds(&self, threshold: Decimal) -> bool {
        self.raw > threshold
    }
}

impl std::fmt::Display for Percent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}%", self.display().round_dp(0))
    }
}

pub fn total_balance(accounts: &[Account]) -> Decimal {
    accounts.iter().map(|a| a.balance).sum()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthFlow {
    pub month: String, // YYYY-MM
    pub income: Decimal,
    pub expense: Decimal,
}

pub fn month_key(d: NaiveDate) -> String {
    d.format("%Y-%m").to_string()
}

/// The `n` calendar months ending with `today`'s month, oldest first.
pub fn trailing_months(today: NaiveDate, n: usize) -> Vec<String> {
    let mut y = today.year();
    let mut m = today.month();
    let mut out = Vec::with_capacity(n);
    for _ in 0..n {
        out.push(format!("{:04}-{:02}", y, m));
        if m == 1 {
            m = 12;
            y -= 1;
        } else {
            m -= 1;
        }
    }
    out.reverse();
    out
}

fn add_flow(flow: &mut MonthFlow, t: &Transaction) {
    match t.category.kind {
        CategoryType::Income => flow.income += t.amount,
        CategoryType::Expense => flow.expense += t.amount.abs(),
    }
}

/// Income and expense per month over the trailing `n` months.
/// Transactions outside the window are ignored; empty months report zero.
pub fn monthly_series(transactions: &[Transaction], today: NaiveDate, n: usize) -> Vec<MonthFlow> {
    let mut series: Vec<MonthFlow> = trailing_months(today, n)
        .into_iter()
        .map(|month| MonthFlow {
            month,
            income: Decimal::ZERO,
            expense: Decimal::ZERO,
        })
        .collect();
    for t in transactions {
        let key = month_key(t.date);
        if let Some(flow) = series.iter_mut().find(|f| f.month == key) {
            add_flow(flow, t);
        }
    }
    series
}

/// Income and expense for `today`'s month.
pub fn month_totals(transactions: &[Transaction], today: NaiveDate) -> MonthFlow {
    let key = month_key(today);
    let mut flow = MonthFlow {
        month: key.clone(),
        income: Decimal::ZERO,
        expense: Decimal::ZERO,
    };
    for t in transactions.iter().filter(|t| month_key(t.date) == key) {
        add_flow(&mut flow, t);
    }
    flow
}

/// Sum of income minus sum of absolute expenses.
pub fn net_flow(transactions: &[Transaction]) -> Decimal {
    transactions
        .iter()
        .map(|t| match t.category.kind {
            CategoryType::Income => t.amount,
            CategoryType::Expense => -t.amount.abs(),
        })
        .sum()
}

/// Absolute expense totals per category name, largest first.
pub fn expense_by_category(transactions: &[Transaction]) -> Vec<(String, Decimal)> {
    let mut agg: BTreeMap<String, Decimal> = BTreeMap::new();
    for t in transactions
        .iter()
        .filter(|t| t.category.kind == CategoryType::Expense)
    {
        *agg.entry(t.category.name.clone()).or_insert(Decimal::ZERO) += t.amount.abs();
    }
    let mut items: Vec<_> = agg.into_iter().filter(|(_, v)| !v.is_zero()).collect();
    items.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    items
}

pub fn budget_usage(budget: &Budget) -> Percent {
    Percent::of(budget.spent(), budget.allocated_amount)
}

pub fn savings_progress(goal: &SavingsGoal) -> Percent {
    Percent::of(goal.current_amount, goal.target_amount)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetSummary {
    pub total_budgeted: Decimal,
    pub total_spent: Decimal,
    pub total_remaining: Decimal,
    pub usage: Percent,
}

impl BudgetSummary {
    pub fn alert(&self) -> bool {
        self.usage.exceeds(BUDGET_ALERT_THRESHOLD)
    }
}

pub fn budget_summary(budgets: &[Budget]) -> BudgetSummary {
    let total_budgeted: Decimal = budgets.iter().map(|b| b.allocated_amount).sum();
    let total_remaining: Decimal = budgets.iter().map(|b| b.remaining_amount).sum();
    let total_spent = total_budgeted - total_remaining;
    BudgetSummary {
        total_budgeted,
        total_spent,
        total_remaining,
        usage: Percent::of(total_spent, total_budgeted),
    }
}

/// Aggregate spent over aggregate allocated, unclamped.
pub fn budget_alert(budgets: &[Budget]) -> Percent {
    budget_summary(budgets).usage
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SavingsTotals {
    pub saved: Decimal,
    pub target: Decimal,
}

pub fn savings_totals(goals: &[SavingsGoal]) -> SavingsTotals {
    SavingsTotals {
        saved: goals.iter().map(|g| g.current_amount).sum(),
        target: goals.iter().map(|g| g.target_amount).sum(),
    }
}

/// Transactions ordered by date descending, newest entry first on ties.
pub fn sorted_by_date_desc(transactions: &[Transaction]) -> Vec<Transaction> {
    let mut v = transactions.to_vec();
    v.sort_by(|a, b| {
        b.date
            .cmp(&a.date)
            .then_with(|| b.created_at.cmp(&a.created_at))
    });
    v
}

pub fn recent(transactions: &[Transaction], n: usize) -> Vec<Transaction> {
    let mut v = sorted_by_date_desc(transactions);
    v.truncate(n);
    v
}

/// Client-side transaction filter; every criterion that is set must hold.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionFilter {
    pub account: Option<Id>,
    pub kind: Option<CategoryType>,
    /// inclusive lower bound
    pub date_after: Option<NaiveDate>,
    /// inclusive upper bound
    pub date_before: Option<NaiveDate>,
}

impl TransactionFilter {
    pub fn matches(&self, t: &Transaction) -> bool {
        if self.account.is_some_and(|a| t.account.id != a) {
            return false;
        }
        if self.kind.is_some_and(|k| t.category.kind != k) {
            return false;
        }
        if self.date_after.is_some_and(|d| t.date < d) {
            return false;
        }
        if self.date_before.is_some_and(|d| t.date > d) {
            return false;
        }
        true
    }

    pub fn apply(&self, transactions: &[Transaction]) -> Vec<Transaction> {
        transactions
            .iter()
            .filter(|t| self.matches(t))
            .cloned()
            .collect()
    }
}

pub fn page_count(len: usize, per_page: usize) -> usize {
    if per_page == 0 {
        return 1;
    }
    len.div_ceil(per_page).max(1)
}

/// One-based page slice; out of range pages are empty.
pub fn paginate<T: Clone>(items: &[T], page: usize, per_page: usize) -> Vec<T> {
    if page == 0 || per_page == 0 {
        return Vec::new();
    }
    items
        .iter()
        .skip((page - 1) * per_page)
        .take(per_page)
        .cloned()
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub total_balance: Decimal,
    pub this_month: MonthFlow,
    pub remaining_budget: Decimal,
    pub budget_usage: Percent,
    pub budget_alert: bool,
    pub monthly: Vec<MonthFlow>,
    pub expense_by_category: Vec<(String, Decimal)>,
    pub savings: SavingsTotals,
    pub recent: Vec<Transaction>,
}

pub fn dashboard(
    accounts: &[Account],
    transactions: &[Transaction],
    budgets: &[Budget],
    goals: &[SavingsGoal],
    today: NaiveDate,
    months: usize,
) -> Dashboard {
    let summary = budget_summary(budgets);
    Dashboard {
        total_balance: total_balance(accounts),
        this_month: month_totals(transactions, today),
        remaining_budget: summary.total_remaining,
        budget_usage: summary.usage,
        budget_alert: summary.alert(),
        monthly: monthly_series(transactions, today, months),
        expense_by_category: expense_by_category(transactions),
        savings: savings_totals(goals),
        recent: recent(transactions, 3),
    }
}
