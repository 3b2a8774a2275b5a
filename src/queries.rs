// Copyright (c) Vino contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Read-side helpers over the in-memory lists held by the data store.

use crate::models::{Category, Merchant, MerchantRule, MonthYear, Transaction};
use chrono::NaiveDate;
use serde::Serialize;

/// All set conditions must hold. Amount bounds compare absolute values.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub month: Option<MonthYear>,
    pub search: Option<String>,
    pub category_id: Option<String>,
    pub subcategory_id: Option<String>,
    pub merchant_id: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub amount_min: Option<f64>,
    pub amount_max: Option<f64>,
    pub limit: Option<usize>,
}

impl TransactionFilter {
    pub fn matches(&self, t: &Transaction) -> bool {
        let date = t.naive_date();
        if let Some(m) = self.month {
            if !date.is_some_and(|d| m.contains(d)) {
                return false;
            }
        }
        if let Some(q) = self.search.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
            if !t.description.to_lowercase().contains(&q.to_lowercase()) {
                return false;
            }
        }
        if self.category_id.as_ref().is_some_and(|c| *c != t.category_id) {
            return false;
        }
        if let Some(sub) = &self.subcategory_id {
            if t.subcategory_id.as_ref() != Some(sub) {
                return false;
            }
        }
        if self.merchant_id.as_ref().is_some_and(|m| *m != t.merchant_id) {
            return false;
        }
        if let Some(from) = self.date_from {
            if !date.is_some_and(|d| d >= from) {
                return false;
            }
        }
        if let Some(to) = self.date_to {
            if !date.is_some_and(|d| d <= to) {
                return false;
            }
        }
        let abs = t.amount.abs();
        if self.amount_min.is_some_and(|min| abs < min) {
            return false;
        }
        if self.amount_max.is_some_and(|max| abs > max) {
            return false;
        }
        true
    }

    /// Matching transactions, newest first, truncated to `limit`.
    pub fn apply<'a>(&self, transactions: &'a [Transaction]) -> Vec<&'a Transaction> {
        let mut out: Vec<&Transaction> = transactions.iter().filter(|t| self.matches(t)).collect();
        out.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| b.id.cmp(&a.id)));
        if let Some(n) = self.limit {
            out.truncate(n);
        }
        out
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CategorySpending {
    pub category_id: String,
    pub name: String,
    pub color: String,
    pub total: f64,
}

/// Absolute spend per category in catalog order; categories with nothing
/// spent are omitted.
pub fn spending_by_category(categories: &[Category], transactions: &[Transaction]) -> Vec<CategorySpending> {
    categories
        .iter()
        .map(|c| CategorySpending {
            category_id: c.id.clone(),
            name: c.name.clone(),
            color: c.color.clone(),
            total: transactions
                .iter()
                .filter(|t| t.category_id == c.id)
                .map(|t| t.amount.abs())
                .sum(),
        })
        .filter(|s| s.total > 0.0)
        .collect()
}

pub fn top_transactions(transactions: &[Transaction], n: usize) -> Vec<&Transaction> {
    let mut out: Vec<&Transaction> = transactions.iter().collect();
    out.sort_by(|a, b| b.amount.abs().total_cmp(&a.amount.abs()));
    out.truncate(n);
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CategorySource {
    Rule,
    Default,
    None,
}

#[derive(Debug, Clone, Serialize)]
pub struct MerchantSummary {
    pub merchant_id: String,
    pub name: String,
    pub placeholder: bool,
    pub category_id: Option<String>,
    pub subcategory_id: Option<String>,
    pub source: CategorySource,
    pub transactions: usize,
    pub spent: f64,
}

/// Effective categorization and activity of one merchant. A rule wins over
/// the merchant's own default.
pub fn merchant_summary(
    merchant: &Merchant,
    rules: &[MerchantRule],
    transactions: &[Transaction],
) -> MerchantSummary {
    let rule = rules.iter().find(|r| r.merchant_id == merchant.id);
    let (category_id, subcategory_id, source) = match (rule, &merchant.default_category_id) {
        (Some(r), _) => (Some(r.category_id.clone()), r.subcategory_id.clone(), CategorySource::Rule),
        (None, Some(c)) => (
            Some(c.clone()),
            merchant.default_subcategory_id.clone(),
            CategorySource::Default,
        ),
        (None, None) => (None, None, CategorySource::None),
    };
    let mine: Vec<&Transaction> = transactions.iter().filter(|t| t.merchant_id == merchant.id).collect();
    MerchantSummary {
        merchant_id: merchant.id.clone(),
        name: merchant.name.clone(),
        placeholder: merchant.is_placeholder(),
        category_id,
        subcategory_id,
        source,
        transactions: mine.len(),
        spent: mine.iter().filter(|t| t.is_expense()).map(|t| t.amount.abs()).sum(),
    }
}
