// Copyright (c) Vino contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::month_or_current;
use crate::error::ApiError;
use crate::store::DataStore;
use crate::utils::{fmt_money, fmt_pct, maybe_print_json, pretty_table};
use crate::wire::{HomeBreakdown, HomeSummary};
use anyhow::Result;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct Dashboard {
    summary: Option<HomeSummary>,
    breakdown: Option<HomeBreakdown>,
}

pub fn handle(store: &mut DataStore, m: &clap::ArgMatches) -> Result<()> {
    if store.session().is_none() {
        return Err(ApiError::NotAuthenticated.into());
    }
    let Some(month) = month_or_current(m) else {
        return Ok(());
    };
    let period = month.period_key();
    let dash = Dashboard {
        summary: store.home_summary(&period),
        breakdown: store.home_breakdown(&period),
    };
    if maybe_print_json(m.get_flag("json"), m.get_flag("jsonl"), &dash)? {
        return Ok(());
    }
    let ccy = &store.config().currency;
    match &dash.summary {
        Some(s) => {
            let pct = if s.presupuesto_mes > 0.0 { s.gasto_mes / s.presupuesto_mes * 100.0 } else { 0.0 };
            println!(
                "{}: spent {} of {} budgeted ({})",
                period,
                fmt_money(s.gasto_mes, ccy),
                fmt_money(s.presupuesto_mes, ccy),
                fmt_pct(pct)
            );
        }
        None => println!("{}: summary unavailable", period),
    }
    let Some(b) = &dash.breakdown else {
        println!("Breakdown unavailable");
        return Ok(());
    };
    let rows: Vec<Vec<String>> = b
        .gastos_por_categoria
        .iter()
        .map(|c| vec![c.categoria.clone(), fmt_money(c.total, ccy), fmt_pct(c.pct)])
        .collect();
    println!("{}", pretty_table(&["Category", "Spent", "Share"], rows));
    let rows: Vec<Vec<String>> = b
        .transacciones_recientes
        .iter()
        .map(|t| {
            let title = if t.titulo.is_empty() { t.comercio.clone() } else { t.titulo.clone() };
            vec![t.fecha.clone(), title, t.categoria.clone(), fmt_money(t.monto, ccy)]
        })
        .collect();
    println!("{}", pretty_table(&["Date", "Movement", "Category", "Amount"], rows));
    println!(
        "{} movements, largest expense {}",
        b.transacciones_count,
        fmt_money(b.mayor_gasto, ccy)
    );
    Ok(())
}
