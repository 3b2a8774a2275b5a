// Copyright (c) Vino contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{load, opt, req};
use crate::error::ValidationError;
use crate::models::Merchant;
use crate::queries::{merchant_summary, CategorySource};
use crate::store::{DataStore, MerchantInput};
use crate::utils::{checked, fmt_money, maybe_print_json, pretty_table, settle};
use crate::wire::MerchantBody;
use anyhow::Result;

pub fn handle(store: &mut DataStore, m: &clap::ArgMatches) -> Result<()> {
    load(store)?;
    match m.subcommand() {
        Some(("list", sub)) => list(store, sub)?,
        Some(("show", sub)) => show(store, sub)?,
        Some(("add", sub)) => {
            let Some((category, subcategory)) = checked(default_scope(store, sub)) else {
                return Ok(());
            };
            let input = MerchantInput {
                name: req(sub, "name")?.to_string(),
                default_category_id: category,
                default_subcategory_id: subcategory,
            };
            if settle(store.create_merchant(&input))?.is_some() {
                println!("Added merchant '{}'", input.name);
            }
        }
        Some(("edit", sub)) => {
            let Some(id) = checked(store.resolve_merchant(req(sub, "id")?).map(|m| m.id.clone())) else {
                return Ok(());
            };
            let Some((category, subcategory)) = checked(default_scope(store, sub)) else {
                return Ok(());
            };
            let body = MerchantBody {
                name: opt(sub, "name").map(str::to_string),
                default_category_id: category,
                default_subcategory_id: subcategory,
            };
            if settle(store.update_merchant(&id, &body))?.is_some() {
                println!("Updated merchant {}", id);
            }
        }
        Some(("rm", sub)) => {
            let Some(merchant) = checked(store.resolve_merchant(req(sub, "id")?).cloned()) else {
                return Ok(());
            };
            if settle(store.delete_merchant(&merchant.id))?.is_some() {
                println!("Removed merchant '{}'", merchant.name);
            }
        }
        _ => {}
    }
    Ok(())
}

/// `--category` / `--subcategory` resolved to ids.
fn default_scope(
    store: &DataStore,
    sub: &clap::ArgMatches,
) -> Result<(Option<String>, Option<String>), ValidationError> {
    let Some(cat_key) = opt(sub, "category") else {
        return match opt(sub, "subcategory") {
            Some(_) => Err(ValidationError::MissingField("category")),
            None => Ok((None, None)),
        };
    };
    let cat = store.resolve_category(cat_key)?;
    let subcategory = match opt(sub, "subcategory") {
        Some(key) => Some(store.resolve_subcategory(cat, key)?.id.clone()),
        None => None,
    };
    Ok((Some(cat.id.clone()), subcategory))
}

fn kind_label(m: &Merchant) -> &'static str {
    if m.is_placeholder() { "inferred" } else { "" }
}

fn category_label(store: &DataStore, category_id: Option<&str>, subcategory_id: Option<&str>) -> String {
    let Some(cat) = category_id.and_then(|id| store.category(id)) else {
        return category_id.unwrap_or_default().to_string();
    };
    match subcategory_id.and_then(|s| cat.subcategory(s)) {
        Some(s) => format!("{} / {}", cat.name, s.name),
        None => cat.name.clone(),
    }
}

fn list(store: &DataStore, sub: &clap::ArgMatches) -> Result<()> {
    let merchants = store.merchants();
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &merchants)? {
        let rows: Vec<Vec<String>> = merchants
            .iter()
            .map(|m| {
                vec![
                    m.id.clone(),
                    m.name.clone(),
                    category_label(
                        store,
                        m.default_category_id.as_deref(),
                        m.default_subcategory_id.as_deref(),
                    ),
                    kind_label(m).to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["ID", "Merchant", "Default category", "Kind"], rows)
        );
    }
    Ok(())
}

fn show(store: &DataStore, sub: &clap::ArgMatches) -> Result<()> {
    let Some(merchant) = checked(store.resolve_merchant(req(sub, "id")?)) else {
        return Ok(());
    };
    let summary = merchant_summary(merchant, store.rules(), store.transactions());
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &summary)? {
        let source = match summary.source {
            CategorySource::Rule => "rule",
            CategorySource::Default => "merchant default",
            CategorySource::None => "none",
        };
        let rows = vec![
            vec!["ID".to_string(), summary.merchant_id.clone()],
            vec!["Name".to_string(), summary.name.clone()],
            vec!["Kind".to_string(), kind_label(merchant).to_string()],
            vec![
                "Category".to_string(),
                category_label(store, summary.category_id.as_deref(), summary.subcategory_id.as_deref()),
            ],
            vec!["Category from".to_string(), source.to_string()],
            vec!["Movements".to_string(), summary.transactions.to_string()],
            vec!["Spent".to_string(), fmt_money(summary.spent, &store.config().currency)],
        ];
        println!("{}", pretty_table(&["Field", "Value"], rows));
    }
    Ok(())
}
