// Copyright (c) Vino contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::{StoreError, ValidationError};
use crate::models::MonthYear;
use crate::normalize::normalize_period_key;
use anyhow::Result;
use chrono::NaiveDate;
use comfy_table::{presets::UTF8_FULL, Cell, Table};
use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Installs the global subscriber once. `RUST_LOG` wins over the default
/// directive.
pub fn init_tracing(verbose: bool) {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let default = if verbose { "vino=debug" } else { "vino=warn" };
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
        let _ = fmt().with_env_filter(filter).with_writer(std::io::stderr).try_init();
    });
}

pub fn parse_date(s: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| ValidationError::InvalidDate(s.trim().to_string()))
}

/// Accepts any period shape the backend uses (`2026-2`, `2/2026`, `2/26`).
pub fn parse_month(s: &str) -> Result<MonthYear, ValidationError> {
    MonthYear::from_period_key(&normalize_period_key(s))
        .ok_or_else(|| ValidationError::InvalidPeriod(s.trim().to_string()))
}

/// Positive amount typed by the user; `,` separators are accepted.
pub fn parse_positive_amount(s: &str) -> Result<f64, ValidationError> {
    let v: f64 = s
        .replace(',', "")
        .trim()
        .parse()
        .map_err(|_| ValidationError::NonPositiveAmount)?;
    if v.is_finite() && v > 0.0 {
        Ok(v)
    } else {
        Err(ValidationError::NonPositiveAmount)
    }
}

pub fn fmt_money(amount: f64, ccy: &str) -> String {
    format!("{} {:.2}", ccy, amount)
}

pub fn fmt_pct(pct: f64) -> String {
    format!("{:.1}%", pct)
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}

/// Validation failures are reported and swallowed; backend failures propagate.
pub fn settle<T>(res: Result<T, StoreError>) -> Result<Option<T>> {
    match res {
        Ok(v) => Ok(Some(v)),
        Err(StoreError::Validation(e)) => {
            eprintln!("{}", e);
            Ok(None)
        }
        Err(StoreError::Api(e)) => Err(e.into()),
    }
}

/// Same as [`settle`] for input parsing done before the store is involved.
pub fn checked<T>(res: Result<T, ValidationError>) -> Option<T> {
    match res {
        Ok(v) => Some(v),
        Err(e) => {
            eprintln!("{}", e);
            None
        }
    }
}
