// Copyright (c) Vino contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{load, opt, req};
use crate::error::ValidationError;
use crate::models::MerchantRule;
use crate::store::{DataStore, RuleInput};
use crate::utils::{checked, maybe_print_json, pretty_table, settle};
use crate::wire::RuleBody;
use anyhow::Result;
use serde::Serialize;

pub fn handle(store: &mut DataStore, m: &clap::ArgMatches) -> Result<()> {
    load(store)?;
    match m.subcommand() {
        Some(("list", sub)) => {
            let data = rule_rows(store);
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
                let rows: Vec<Vec<String>> = data
                    .iter()
                    .map(|r| {
                        vec![
                            r.id.clone(),
                            r.merchant.clone(),
                            r.category.clone(),
                            r.subcategory.clone(),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["ID", "Merchant", "Category", "Subcategory"], rows)
                );
            }
        }
        Some(("add", sub)) => {
            let Some(input) = checked(rule_input(store, sub)) else {
                return Ok(());
            };
            if settle(store.create_rule(&input))?.is_some() {
                println!("Added rule for '{}'", req(sub, "merchant")?);
            }
        }
        Some(("edit", sub)) => {
            let id = req(sub, "id")?;
            let Some(body) = checked(rule_patch(store, id, sub)) else {
                return Ok(());
            };
            if settle(store.update_rule(id, &body))?.is_some() {
                println!("Updated rule {}", id);
            }
        }
        Some(("rm", sub)) => {
            let id = req(sub, "id")?;
            if settle(store.delete_rule(id))?.is_some() {
                println!("Removed rule {}", id);
            }
        }
        _ => {}
    }
    Ok(())
}

fn rule_input(store: &DataStore, sub: &clap::ArgMatches) -> Result<RuleInput, ValidationError> {
    let merchant = store.resolve_merchant(opt(sub, "merchant").unwrap_or_default())?;
    let category = store.resolve_category(opt(sub, "category").unwrap_or_default())?;
    let subcategory_id = match opt(sub, "subcategory") {
        Some(key) => Some(store.resolve_subcategory(category, key)?.id.clone()),
        None => None,
    };
    Ok(RuleInput {
        merchant_id: merchant.id.clone(),
        category_id: category.id.clone(),
        subcategory_id,
    })
}

fn rule_patch(store: &DataStore, id: &str, sub: &clap::ArgMatches) -> Result<RuleBody, ValidationError> {
    let rule = store
        .rules()
        .iter()
        .find(|r| r.id == id)
        .ok_or_else(|| ValidationError::NotFound { kind: "rule", id: id.to_string() })?;
    let merchant_id = match opt(sub, "merchant") {
        Some(key) => Some(store.resolve_merchant(key)?.id.clone()),
        None => None,
    };
    let category = match opt(sub, "category") {
        Some(key) => Some(store.resolve_category(key)?),
        None => None,
    };
    let subcategory_id = match opt(sub, "subcategory") {
        Some(key) => {
            let cat = match category {
                Some(c) => c,
                None => store.resolve_category(&rule.category_id)?,
            };
            Some(store.resolve_subcategory(cat, key)?.id.clone())
        }
        None => None,
    };
    Ok(RuleBody {
        merchant_id,
        category_id: category.map(|c| c.id.clone()),
        subcategory_id,
    })
}

#[derive(Debug, Serialize)]
pub struct RuleRow {
    pub id: String,
    pub merchant: String,
    pub category: String,
    pub subcategory: String,
}

fn rule_row(store: &DataStore, r: &MerchantRule) -> RuleRow {
    let cat = store.category(&r.category_id);
    RuleRow {
        id: r.id.clone(),
        merchant: store
            .merchant(&r.merchant_id)
            .map(|m| m.name.clone())
            .unwrap_or_else(|| r.merchant_id.clone()),
        category: cat.map(|c| c.name.clone()).unwrap_or_else(|| r.category_id.clone()),
        subcategory: r
            .subcategory_id
            .as_deref()
            .map(|s| {
                cat.and_then(|c| c.subcategory(s))
                    .map(|x| x.name.clone())
                    .unwrap_or_else(|| s.to_string())
            })
            .unwrap_or_default(),
    }
}

/// Rules with names resolved for display, in backend order.
pub fn rule_rows(store: &DataStore) -> Vec<RuleRow> {
    store.rules().iter().map(|r| rule_row(store, r)).collect()
}
