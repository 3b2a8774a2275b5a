// Copyright (c) Vino contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{load, month_or_current};
use crate::models::Transaction;
use crate::normalize::{unknown_references, UnknownReferences};
use crate::queries::{spending_by_category, top_transactions, CategorySpending, TransactionFilter};
use crate::store::DataStore;
use crate::utils::{fmt_money, maybe_print_json, pretty_table};
use anyhow::Result;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Stats {
    pub period: String,
    pub expenses: f64,
    pub income: f64,
    pub movements: usize,
    pub by_category: Vec<CategorySpending>,
    pub top: Vec<Transaction>,
    pub unknown_categories: usize,
    pub unknown_merchants: usize,
}

pub fn compute(store: &DataStore, month: crate::models::MonthYear, top: usize) -> Stats {
    let filter = TransactionFilter {
        month: Some(month),
        ..Default::default()
    };
    let in_month: Vec<Transaction> = filter.apply(store.transactions()).into_iter().cloned().collect();
    let expenses: Vec<Transaction> = in_month.iter().filter(|t| t.is_expense()).cloned().collect();
    let UnknownReferences { categories, merchants } = unknown_references(&in_month);
    Stats {
        period: month.period_key(),
        expenses: expenses.iter().map(|t| t.amount.abs()).sum(),
        income: in_month.iter().filter(|t| !t.is_expense()).map(|t| t.amount).sum(),
        movements: in_month.len(),
        by_category: spending_by_category(store.categories(), &expenses),
        top: top_transactions(&expenses, top).into_iter().cloned().collect(),
        unknown_categories: categories,
        unknown_merchants: merchants,
    }
}

pub fn handle(store: &mut DataStore, m: &clap::ArgMatches) -> Result<()> {
    load(store)?;
    let Some(month) = month_or_current(m) else {
        return Ok(());
    };
    let top = m.get_one::<usize>("top").copied().unwrap_or(5);
    let stats = compute(store, month, top);
    if maybe_print_json(m.get_flag("json"), m.get_flag("jsonl"), &stats)? {
        return Ok(());
    }
    let ccy = &store.config().currency;
    println!(
        "{}: {} movements, spent {}, earned {}",
        stats.period,
        stats.movements,
        fmt_money(stats.expenses, ccy),
        fmt_money(stats.income, ccy)
    );
    let rows: Vec<Vec<String>> = stats
        .by_category
        .iter()
        .map(|c| vec![c.name.clone(), fmt_money(c.total, ccy)])
        .collect();
    println!("{}", pretty_table(&["Category", "Spent"], rows));
    let rows: Vec<Vec<String>> = stats
        .top
        .iter()
        .map(|t| vec![t.date.clone(), t.description.clone(), fmt_money(t.amount, ccy)])
        .collect();
    println!("{}", pretty_table(&["Date", "Description", "Amount"], rows));
    if stats.unknown_categories > 0 || stats.unknown_merchants > 0 {
        println!(
            "Uncategorized: {} movement(s) with no matching category, {} with no matching merchant",
            stats.unknown_categories, stats.unknown_merchants
        );
    }
    Ok(())
}
