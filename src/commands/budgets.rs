// Copyright (c) Vino contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{load, month_or_current, opt, req};
use crate::budget::{budgets_for_period, calc_spent_from_transactions, month_report, BudgetProgress};
use crate::models::{Budget, MonthYear};
use crate::store::{BudgetInput, BudgetUpdate, DataStore};
use crate::utils::{checked, fmt_money, fmt_pct, maybe_print_json, parse_month, parse_positive_amount, pretty_table, settle};
use anyhow::Result;
use serde::Serialize;

pub fn handle(store: &mut DataStore, m: &clap::ArgMatches) -> Result<()> {
    load(store)?;
    match m.subcommand() {
        Some(("set", sub)) => set(store, sub)?,
        Some(("edit", sub)) => edit(store, sub)?,
        Some(("rm", sub)) => {
            let id = req(sub, "id")?;
            if settle(store.delete_budget(id))?.is_some() {
                println!("Removed budget {}", id);
            }
        }
        Some(("list", sub)) => list(store, sub)?,
        Some(("status", sub)) => status(store, sub)?,
        _ => {}
    }
    Ok(())
}

fn set(store: &mut DataStore, sub: &clap::ArgMatches) -> Result<()> {
    let Some(month) = month_or_current(sub) else {
        return Ok(());
    };
    let Some(amount) = checked(parse_positive_amount(req(sub, "amount")?)) else {
        return Ok(());
    };
    let Some(cat) = checked(store.resolve_category(req(sub, "category")?).cloned()) else {
        return Ok(());
    };
    let subcategory_id = match opt(sub, "subcategory") {
        Some(key) => match checked(store.resolve_subcategory(&cat, key)) {
            Some(s) => Some(s.id.clone()),
            None => return Ok(()),
        },
        None => None,
    };
    let input = BudgetInput {
        category_id: cat.id.clone(),
        subcategory_id,
        period: month.period_key(),
        amount,
    };
    if settle(store.create_budget(&input))?.is_some() {
        println!(
            "Budget set for {} / {} = {}",
            input.period,
            cat.name,
            fmt_money(amount, &store.config().currency)
        );
    }
    Ok(())
}

fn edit(store: &mut DataStore, sub: &clap::ArgMatches) -> Result<()> {
    let id = req(sub, "id")?;
    let amount = match opt(sub, "amount") {
        Some(raw) => match checked(parse_positive_amount(raw)) {
            Some(v) => Some(v),
            None => return Ok(()),
        },
        None => None,
    };
    let period = match opt(sub, "month") {
        Some(raw) => match checked(parse_month(raw)) {
            Some(m) => Some(m.period_key()),
            None => return Ok(()),
        },
        None => None,
    };
    let update = BudgetUpdate {
        amount,
        period,
        ..Default::default()
    };
    if settle(store.update_budget(id, &update))?.is_some() {
        println!("Updated budget {}", id);
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct BudgetRow {
    pub id: String,
    pub period: String,
    pub category: String,
    pub subcategory: String,
    pub amount: f64,
    pub spent: f64,
}

/// Budgets (optionally one month's) with spend computed against that month.
pub fn query_rows(store: &DataStore, month: Option<MonthYear>) -> Vec<BudgetRow> {
    let selected: Vec<&Budget> = match month {
        Some(m) => budgets_for_period(store.budgets(), &m.period_key()),
        None => store.budgets().iter().collect(),
    };
    selected
        .into_iter()
        .map(|b| {
            let cat = store.category(&b.category_id);
            let spent = MonthYear::from_period_key(&b.period_key)
                .map(|m| calc_spent_from_transactions(b, store.transactions(), m))
                .unwrap_or(0.0);
            BudgetRow {
                id: b.id.clone(),
                period: b.period_key.clone(),
                category: cat.map(|c| c.name.clone()).unwrap_or_else(|| b.category_id.clone()),
                subcategory: b
                    .subcategory_id
                    .as_deref()
                    .map(|s| {
                        cat.and_then(|c| c.subcategory(s))
                            .map(|x| x.name.clone())
                            .unwrap_or_else(|| s.to_string())
                    })
                    .unwrap_or_default(),
                amount: b.amount,
                spent,
            }
        })
        .collect()
}

fn list(store: &DataStore, sub: &clap::ArgMatches) -> Result<()> {
    let month = match opt(sub, "month") {
        Some(raw) => match checked(parse_month(raw)) {
            Some(m) => Some(m),
            None => return Ok(()),
        },
        None => None,
    };
    let data = query_rows(store, month);
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let ccy = &store.config().currency;
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.id.clone(),
                    r.period.clone(),
                    r.category.clone(),
                    r.subcategory.clone(),
                    fmt_money(r.amount, ccy),
                    fmt_money(r.spent, ccy),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["ID", "Month", "Category", "Subcategory", "Budget", "Spent"], rows)
        );
    }
    Ok(())
}

fn status(store: &DataStore, sub: &clap::ArgMatches) -> Result<()> {
    let Some(month) = month_or_current(sub) else {
        return Ok(());
    };
    let report = month_report(store.categories(), store.budgets(), store.transactions(), month);
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &report)? {
        return Ok(());
    }
    if report.is_empty() {
        println!("No budgets for {}", report.period);
        return Ok(());
    }
    let ccy = &store.config().currency;
    let line = |label: String, p: &BudgetProgress| {
        vec![
            label,
            fmt_money(p.budget.amount, ccy),
            fmt_money(p.spent, ccy),
            fmt_money(p.remaining, ccy),
            fmt_pct(p.percentage),
            p.status.label().to_string(),
        ]
    };
    let mut rows = Vec::new();
    for g in &report.groups {
        rows.push(vec![
            g.category_name.clone(),
            fmt_money(g.amount, ccy),
            fmt_money(g.spent, ccy),
            fmt_money(g.amount - g.spent, ccy),
            fmt_pct(g.percentage),
            g.status.label().to_string(),
        ]);
        let cat = store.category(&g.category_id);
        for p in &g.whole_category {
            rows.push(line("  (whole category)".to_string(), p));
        }
        for p in &g.subcategories {
            let name = p
                .budget
                .subcategory_id
                .as_deref()
                .and_then(|s| cat.and_then(|c| c.subcategory(s)))
                .map(|s| s.name.clone())
                .unwrap_or_default();
            rows.push(line(format!("  {}", name), p));
        }
    }
    rows.push(vec![
        "Total".to_string(),
        fmt_money(report.amount, ccy),
        fmt_money(report.spent, ccy),
        fmt_money(report.amount - report.spent, ccy),
        fmt_pct(report.percentage),
        report.status.label().to_string(),
    ]);
    println!("Budgets for {}", report.period);
    println!(
        "{}",
        pretty_table(&["Budget", "Amount", "Spent", "Left", "Used", "Status"], rows)
    );
    Ok(())
}
