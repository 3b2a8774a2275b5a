// Copyright (c) Vino contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod auth;
pub mod budgets;
pub mod categories;
pub mod config;
pub mod dashboard;
pub mod merchants;
pub mod rules;
pub mod stats;
pub mod transactions;

use crate::error::ApiError;
use crate::models::MonthYear;
use crate::store::DataStore;
use crate::utils::parse_month;
use anyhow::{Context, Result};

/// Fails without a session, otherwise reloads the store.
pub fn load(store: &mut DataStore) -> Result<()> {
    if store.session().is_none() {
        return Err(ApiError::NotAuthenticated.into());
    }
    store.refresh();
    Ok(())
}

/// Trimmed value of an optional argument; blank counts as absent.
pub(crate) fn opt<'a>(m: &'a clap::ArgMatches, name: &str) -> Option<&'a str> {
    m.get_one::<String>(name).map(|s| s.trim()).filter(|s| !s.is_empty())
}

pub(crate) fn req<'a>(m: &'a clap::ArgMatches, name: &str) -> Result<&'a str> {
    m.get_one::<String>(name)
        .map(|s| s.trim())
        .with_context(|| format!("--{} is required", name))
}

/// `--month` when given, else the current month. `None` after reporting a bad value.
pub(crate) fn month_or_current(m: &clap::ArgMatches) -> Option<MonthYear> {
    match opt(m, "month") {
        Some(raw) => crate::utils::checked(parse_month(raw)),
        None => Some(MonthYear::current()),
    }
}
