// Copyright (c) Vino contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{Budget, Category, MonthYear, Transaction};
use crate::normalize::normalize_period_key;
use serde::Serialize;

/// Total absolute expense attributable to `budget` within `month`.
///
/// A transaction counts when it is dated in that calendar month, is an expense
/// (negative amount), belongs to the budget's category and, for a
/// subcategory budget, carries exactly that subcategory. Undated transactions
/// never count.
pub fn calc_spent_from_transactions(
    budget: &Budget,
    transactions: &[Transaction],
    month: MonthYear,
) -> f64 {
    transactions
        .iter()
        .filter(|t| t.naive_date().is_some_and(|d| month.contains(d)))
        .filter(|t| t.amount < 0.0)
        .filter(|t| t.category_id == budget.category_id)
        .filter(|t| match &budget.subcategory_id {
            Some(sub) => t.subcategory_id.as_deref() == Some(sub.as_str()),
            None => true,
        })
        .map(|t| t.amount.abs())
        .sum()
}

pub fn usage_percentage(spent: f64, amount: f64) -> f64 {
    if amount > 0.0 { spent / amount * 100.0 } else { 0.0 }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetStatus {
    Ok,
    Near,
    Over,
}

impl BudgetStatus {
    pub fn from_percentage(pct: f64) -> Self {
        if pct > 100.0 {
            BudgetStatus::Over
        } else if pct > 80.0 {
            BudgetStatus::Near
        } else {
            BudgetStatus::Ok
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BudgetStatus::Ok => "ok",
            BudgetStatus::Near => "near",
            BudgetStatus::Over => "over",
        }
    }
}

pub fn budgets_for_period<'a>(budgets: &'a [Budget], period: &str) -> Vec<&'a Budget> {
    budgets
        .iter()
        .filter(|b| !b.period_key.is_empty() && normalize_period_key(&b.period_key) == period)
        .collect()
}

/// Whether a budget for this scope already exists in `period`. A budget with
/// no period blocks its scope in every month.
pub fn is_duplicate_budget(
    budgets: &[Budget],
    category_id: &str,
    subcategory_id: Option<&str>,
    period: &str,
) -> bool {
    budgets
        .iter()
        .filter(|b| b.period_key.trim().is_empty() || normalize_period_key(&b.period_key) == period)
        .any(|b| b.category_id == category_id && b.subcategory_id.as_deref() == subcategory_id)
}

#[derive(Debug, Clone, Serialize)]
pub struct BudgetProgress {
    pub budget: Budget,
    pub spent: f64,
    pub percentage: f64,
    pub remaining: f64,
    pub status: BudgetStatus,
}

impl BudgetProgress {
    pub fn new(budget: &Budget, transactions: &[Transaction], month: MonthYear) -> Self {
        let spent = calc_spent_from_transactions(budget, transactions, month);
        let percentage = usage_percentage(spent, budget.amount);
        Self {
            budget: budget.clone(),
            spent,
            percentage,
            remaining: budget.amount - spent,
            status: BudgetStatus::from_percentage(percentage),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryBudgets {
    pub category_id: String,
    pub category_name: String,
    pub whole_category: Vec<BudgetProgress>,
    pub subcategories: Vec<BudgetProgress>,
    pub amount: f64,
    pub spent: f64,
    pub percentage: f64,
    pub status: BudgetStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthReport {
    pub period: String,
    pub groups: Vec<CategoryBudgets>,
    pub amount: f64,
    pub spent: f64,
    pub percentage: f64,
    pub status: BudgetStatus,
}

impl MonthReport {
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Budgets of `month` with a positive amount, grouped by category in catalog
/// order. Budgets whose category is not in the catalog are left out of the
/// groups but still count toward the overall totals.
pub fn month_report(
    categories: &[Category],
    budgets: &[Budget],
    transactions: &[Transaction],
    month: MonthYear,
) -> MonthReport {
    let period = month.period_key();
    let progress: Vec<BudgetProgress> = budgets_for_period(budgets, &period)
        .into_iter()
        .filter(|b| b.amount > 0.0)
        .map(|b| BudgetProgress::new(b, transactions, month))
        .collect();

    let groups = categories
        .iter()
        .filter(|c| progress.iter().any(|p| p.budget.category_id == c.id))
        .map(|c| {
            let mine: Vec<&BudgetProgress> =
                progress.iter().filter(|p| p.budget.category_id == c.id).collect();
            let amount: f64 = mine.iter().map(|p| p.budget.amount).sum();
            let spent: f64 = mine.iter().map(|p| p.spent).sum();
            let percentage = usage_percentage(spent, amount);
            let (subs, whole): (Vec<&BudgetProgress>, Vec<&BudgetProgress>) =
                mine.into_iter().partition(|p| p.budget.subcategory_id.is_some());
            CategoryBudgets {
                category_id: c.id.clone(),
                category_name: c.name.clone(),
                whole_category: whole.into_iter().cloned().collect(),
                subcategories: subs.into_iter().cloned().collect(),
                amount,
                spent,
                percentage,
                status: BudgetStatus::from_percentage(percentage),
            }
        })
        .collect();

    let amount: f64 = progress.iter().map(|p| p.budget.amount).sum();
    let spent: f64 = progress.iter().map(|p| p.spent).sum();
    let percentage = usage_percentage(spent, amount);
    MonthReport {
        period,
        groups,
        amount,
        spent,
        percentage,
        status: BudgetStatus::from_percentage(percentage),
    }
}
