// Copyright (c) Vino contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::req;
use crate::config::Config;
use crate::utils::pretty_table;
use anyhow::Result;
use std::path::Path;

/// `effective` is what the current invocation resolved (file plus overrides);
/// changes are written to the file at `path` only.
pub fn handle(path: &Path, effective: &Config, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", _)) | None => {
            let rows = vec![
                vec!["api_base_url".to_string(), effective.api_base_url.clone()],
                vec!["currency".to_string(), effective.currency.clone()],
                vec!["top_categories".to_string(), effective.top_categories.to_string()],
                vec!["recent_limit".to_string(), effective.recent_limit.to_string()],
                vec!["movements_limit".to_string(), effective.movements_limit.to_string()],
                vec!["file".to_string(), path.display().to_string()],
            ];
            println!("{}", pretty_table(&["Key", "Value"], rows));
        }
        Some(("set-url", sub)) => {
            let url = req(sub, "url")?;
            if url.is_empty() {
                eprintln!("url is required");
                return Ok(());
            }
            let mut cfg = Config::load_from(path)?;
            cfg.api_base_url = url.trim_end_matches('/').to_string();
            cfg.save_to(path)?;
            println!("Backend URL set to {}", cfg.api_base_url);
        }
        Some(("set-currency", sub)) => {
            let ccy = req(sub, "currency")?.to_uppercase();
            if ccy.is_empty() {
                eprintln!("currency is required");
                return Ok(());
            }
            let mut cfg = Config::load_from(path)?;
            cfg.currency = ccy;
            cfg.save_to(path)?;
            println!("Currency set to {}", cfg.currency);
        }
        _ => {}
    }
    Ok(())
}
