// Copyright (c) Vino contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{load, opt, req};
use crate::store::{DataStore, NewCategoryInput};
use crate::utils::{checked, maybe_print_json, pretty_table, settle};
use crate::wire::CategoryPatch;
use anyhow::Result;

pub fn handle(store: &mut DataStore, m: &clap::ArgMatches) -> Result<()> {
    load(store)?;
    match m.subcommand() {
        Some(("list", sub)) => list(store, sub)?,
        Some(("add", sub)) => {
            let input = NewCategoryInput {
                name: req(sub, "name")?.to_string(),
                icon: opt(sub, "icon").map(str::to_string),
                color: opt(sub, "color").map(str::to_string),
                subcategories: sub
                    .get_many::<String>("sub")
                    .map(|v| v.cloned().collect())
                    .unwrap_or_default(),
            };
            if settle(store.create_category(&input))?.is_some() {
                println!("Added category '{}'", input.name.trim());
            }
        }
        Some(("edit", sub)) => {
            let Some(id) = checked(store.resolve_category(req(sub, "id")?).map(|c| c.id.clone())) else {
                return Ok(());
            };
            let patch = CategoryPatch {
                name: opt(sub, "name").map(str::to_string),
                icon: opt(sub, "icon").map(str::to_string),
                color: opt(sub, "color").map(str::to_string),
            };
            if settle(store.update_category(&id, &patch))?.is_some() {
                println!("Updated category {}", id);
            }
        }
        Some(("rm", sub)) => {
            let Some(cat) = checked(store.resolve_category(req(sub, "id")?).cloned()) else {
                return Ok(());
            };
            if settle(store.delete_category(&cat.id))?.is_some() {
                println!("Removed category '{}'", cat.name);
            }
        }
        Some(("sub-add", sub)) => {
            let Some(cat) = checked(store.resolve_category(req(sub, "category")?).cloned()) else {
                return Ok(());
            };
            let name = req(sub, "name")?;
            if settle(store.add_subcategory(&cat.id, name))?.is_some() {
                println!("Added subcategory '{}' to '{}'", name, cat.name);
            }
        }
        Some(("sub-edit", sub)) => {
            let id = req(sub, "id")?;
            let name = req(sub, "name")?;
            if settle(store.update_subcategory(id, name))?.is_some() {
                println!("Renamed subcategory {} to '{}'", id, name);
            }
        }
        Some(("sub-rm", sub)) => {
            let id = req(sub, "id")?;
            if settle(store.delete_subcategory(id))?.is_some() {
                println!("Removed subcategory {}", id);
            }
        }
        _ => {}
    }
    Ok(())
}

fn list(store: &DataStore, sub: &clap::ArgMatches) -> Result<()> {
    let cats = store.categories();
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &cats)? {
        let rows: Vec<Vec<String>> = cats
            .iter()
            .map(|c| {
                vec![
                    c.id.clone(),
                    format!("{} {}", c.icon, c.name),
                    c.color.clone(),
                    c.subcategories
                        .iter()
                        .map(|s| format!("{} ({})", s.name, s.id))
                        .collect::<Vec<_>>()
                        .join(", "),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["ID", "Category", "Color", "Subcategories"], rows)
        );
    }
    Ok(())
}
