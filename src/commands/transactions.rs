// Copyright (c) Vino contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{load, opt, req};
use crate::error::ValidationError;
use crate::models::{Transaction, UNKNOWN_ID};
use crate::queries::TransactionFilter;
use crate::store::{DataStore, TransactionInput};
use crate::utils::{checked, fmt_money, maybe_print_json, parse_date, parse_month, parse_positive_amount, pretty_table, settle};
use anyhow::Result;
use serde::Serialize;

pub fn handle(store: &mut DataStore, m: &clap::ArgMatches) -> Result<()> {
    load(store)?;
    match m.subcommand() {
        Some(("list", sub)) => list(store, sub)?,
        Some(("add", sub)) => {
            let Some(input) = checked(tx_input(store, None, sub)) else {
                return Ok(());
            };
            if let Some(created) = settle(store.create_transaction(&input))? {
                match created {
                    Some(t) => println!(
                        "Recorded {} on {} at '{}' (id {})",
                        fmt_money(t.amount, &store.config().currency),
                        t.date,
                        t.description,
                        t.id
                    ),
                    None => println!("Recorded movement on {}", input.date),
                }
            }
        }
        Some(("edit", sub)) => {
            let id = req(sub, "id")?;
            let Some(current) = checked(
                store
                    .transactions()
                    .iter()
                    .find(|t| t.id == id)
                    .cloned()
                    .ok_or_else(|| ValidationError::NotFound { kind: "transaction", id: id.to_string() }),
            ) else {
                return Ok(());
            };
            let Some(input) = checked(tx_input(store, Some(&current), sub)) else {
                return Ok(());
            };
            if settle(store.update_transaction(id, &input))?.is_some() {
                println!("Updated movement {}", id);
            }
        }
        Some(("rm", sub)) => {
            let id = req(sub, "id")?;
            if settle(store.delete_transaction(id))?.is_some() {
                println!("Removed movement {}", id);
            }
        }
        _ => {}
    }
    Ok(())
}

/// Form values for add/edit. On edit, anything not given keeps the current value.
fn tx_input(
    store: &DataStore,
    current: Option<&Transaction>,
    sub: &clap::ArgMatches,
) -> Result<TransactionInput, ValidationError> {
    let date = match (opt(sub, "date"), current) {
        (Some(raw), _) => parse_date(raw)?,
        (None, Some(t)) => t
            .naive_date()
            .ok_or_else(|| ValidationError::InvalidDate(t.date.clone()))?,
        (None, None) => return Err(ValidationError::MissingField("date")),
    };
    let amount = match (opt(sub, "amount"), current) {
        (Some(raw), _) => parse_positive_amount(raw)?,
        (None, Some(t)) => t.amount.abs(),
        (None, None) => return Err(ValidationError::MissingField("amount")),
    };
    let merchant_id = match (opt(sub, "merchant"), current) {
        (Some(key), _) => store.resolve_merchant(key)?.id.clone(),
        (None, Some(t)) if t.merchant_id == UNKNOWN_ID => {
            return Err(ValidationError::UnresolvedReference("merchant"));
        }
        (None, Some(t)) => t.merchant_id.clone(),
        (None, None) => return Err(ValidationError::MissingField("merchant")),
    };
    let (category_id, subcategory_id) = match (opt(sub, "category"), current) {
        (Some(key), _) => {
            let cat = store.resolve_category(key)?;
            let subcategory = match opt(sub, "subcategory") {
                Some(s) => Some(store.resolve_subcategory(cat, s)?.id.clone()),
                None => None,
            };
            (cat.id.clone(), subcategory)
        }
        (None, Some(t)) if t.category_id == UNKNOWN_ID => {
            return Err(ValidationError::UnresolvedReference("category"));
        }
        (None, Some(t)) => {
            let subcategory = match opt(sub, "subcategory") {
                Some(s) => {
                    let cat = store.resolve_category(&t.category_id)?;
                    Some(store.resolve_subcategory(cat, s)?.id.clone())
                }
                None => t.subcategory_id.clone(),
            };
            (t.category_id.clone(), subcategory)
        }
        (None, None) => return Err(ValidationError::MissingField("category")),
    };
    let description = opt(sub, "description")
        .map(str::to_string)
        .or_else(|| current.map(|t| t.description.clone()))
        .unwrap_or_default();
    let income = if sub.get_flag("income") {
        true
    } else if sub.get_flag("expense") {
        false
    } else {
        current.is_some_and(|t| !t.is_expense())
    };
    Ok(TransactionInput {
        date,
        amount,
        income,
        description,
        merchant_id,
        category_id,
        subcategory_id,
    })
}

/// Builds the list filter from `tx list` arguments, resolving names to ids.
pub fn filter_from_args(store: &DataStore, sub: &clap::ArgMatches) -> Result<TransactionFilter, ValidationError> {
    let category = opt(sub, "category").map(|k| store.resolve_category(k)).transpose()?;
    let subcategory_id = match (opt(sub, "subcategory"), category) {
        (Some(key), Some(cat)) => Some(store.resolve_subcategory(cat, key)?.id.clone()),
        (Some(key), None) => Some(key.to_string()),
        (None, _) => None,
    };
    Ok(TransactionFilter {
        month: opt(sub, "month").map(parse_month).transpose()?,
        search: opt(sub, "search").map(str::to_string),
        category_id: category.map(|c| c.id.clone()),
        subcategory_id,
        merchant_id: opt(sub, "merchant")
            .map(|k| store.resolve_merchant(k).map(|m| m.id.clone()))
            .transpose()?,
        date_from: opt(sub, "from").map(parse_date).transpose()?,
        date_to: opt(sub, "to").map(parse_date).transpose()?,
        amount_min: sub.get_one::<f64>("min").copied(),
        amount_max: sub.get_one::<f64>("max").copied(),
        limit: sub.get_one::<usize>("limit").copied(),
    })
}

#[derive(Debug, Serialize)]
pub struct TransactionRow {
    pub id: String,
    pub date: String,
    pub description: String,
    pub amount: f64,
    pub category: String,
    pub subcategory: String,
    pub merchant: String,
}

pub fn query_rows(store: &DataStore, sub: &clap::ArgMatches) -> Result<Vec<TransactionRow>, ValidationError> {
    let filter = filter_from_args(store, sub)?;
    Ok(filter
        .apply(store.transactions())
        .into_iter()
        .map(|t| {
            let cat = store.category(&t.category_id);
            TransactionRow {
                id: t.id.clone(),
                date: t.date.clone(),
                description: t.description.clone(),
                amount: t.amount,
                category: cat.map(|c| c.name.clone()).unwrap_or_else(|| t.category_id.clone()),
                subcategory: t
                    .subcategory_id
                    .as_deref()
                    .and_then(|s| cat.and_then(|c| c.subcategory(s)))
                    .map(|s| s.name.clone())
                    .unwrap_or_default(),
                merchant: store
                    .merchant(&t.merchant_id)
                    .map(|m| m.name.clone())
                    .unwrap_or_else(|| t.merchant_id.clone()),
            }
        })
        .collect())
}

fn list(store: &DataStore, sub: &clap::ArgMatches) -> Result<()> {
    let Some(data) = checked(query_rows(store, sub)) else {
        return Ok(());
    };
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let ccy = &store.config().currency;
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.id.clone(),
                    r.date.clone(),
                    r.description.clone(),
                    fmt_money(r.amount, ccy),
                    r.category.clone(),
                    r.subcategory.clone(),
                    r.merchant.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Date", "Description", "Amount", "Category", "Subcategory", "Merchant"],
                rows,
            )
        );
    }
    Ok(())
}
