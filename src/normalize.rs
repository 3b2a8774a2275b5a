// Copyright (c) Vino contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Turns backend rows into the view models in [`crate::models`].
//!
//! Nothing here fails. A name that cannot be matched resolves to
//! [`UNKNOWN_ID`], a number that cannot be parsed becomes `0`, and a period or
//! date in an unfamiliar shape is passed through untouched.

use crate::models::{
    Budget, BudgetPeriod, Category, DEFAULT_CATEGORY_COLOR, DEFAULT_CATEGORY_ICON, Merchant,
    MerchantKind, MerchantRule, Subcategory, Transaction, UNKNOWN_ID,
};
use crate::wire::{
    CategoriaRaw, MerchantRaw, MovimientoItem, MovimientoRaw, PresupuestoRaw, ReglaRaw,
    SubcategoriaRaw,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static YEAR_DASH_MONTH: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{4})-(\d{1,2})$").unwrap());
static MONTH_SLASH_YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{1,2})/(\d{4})$").unwrap());
static MONTH_SLASH_YY: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{1,2})/(\d{2})$").unwrap());
static NON_NUMERIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\d.\-]").unwrap());

const NO_DESCRIPTION: &str = "Sin descripción";

fn same_name(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

pub fn map_catalog_to_categories(
    categorias: &[CategoriaRaw],
    subcategorias: &[SubcategoriaRaw],
) -> Vec<Category> {
    categorias
        .iter()
        .map(|cat| Category {
            id: cat.id.clone(),
            name: cat.nombre.clone(),
            icon: non_empty(cat.icon.as_deref()).unwrap_or(DEFAULT_CATEGORY_ICON).to_string(),
            color: non_empty(cat.color.as_deref()).unwrap_or(DEFAULT_CATEGORY_COLOR).to_string(),
            subcategories: subcategorias
                .iter()
                .filter(|s| s.categoria_id == cat.id)
                .map(|s| Subcategory {
                    id: s.id.clone(),
                    name: s.nombre.clone(),
                    category_id: cat.id.clone(),
                })
                .collect(),
        })
        .collect()
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|v| !v.is_empty())
}

pub fn map_merchants(raw: &[MerchantRaw]) -> Vec<Merchant> {
    raw.iter()
        .map(|m| Merchant {
            id: m.id.clone(),
            name: m.name.clone(),
            default_category_id: m.default_category_id.clone().filter(|s| !s.is_empty()),
            default_subcategory_id: m.default_subcategory_id.clone().filter(|s| !s.is_empty()),
            kind: MerchantKind::Resolved,
        })
        .collect()
}

/// Appends a placeholder merchant for every rule merchant name that has no
/// backend record, in first-seen order.
pub fn merchants_with_placeholders(merchants: Vec<Merchant>, reglas: &[ReglaRaw]) -> Vec<Merchant> {
    let mut out = merchants;
    let known = out.len();
    for regla in reglas {
        let name = regla.comercio.trim();
        if name.is_empty() {
            continue;
        }
        if out[..known].iter().any(|m| same_name(&m.name, name)) {
            continue;
        }
        if out[known..].iter().any(|m| m.name == name) {
            continue;
        }
        out.push(Merchant::placeholder(name));
    }
    out
}

pub fn map_rules_to_merchant_rules(reglas: &[ReglaRaw], merchants: &[Merchant]) -> Vec<MerchantRule> {
    reglas
        .iter()
        .map(|r| {
            let merchant_id = merchants
                .iter()
                .find(|m| same_name(&m.name, &r.comercio))
                .map(|m| m.id.clone())
                .unwrap_or_else(|| UNKNOWN_ID.to_string());
            MerchantRule {
                id: r.id.clone(),
                merchant_id,
                category_id: r.categoria_id.clone(),
                subcategory_id: Some(r.subcategoria_id.clone()).filter(|s| !s.is_empty()),
            }
        })
        .collect()
}

/// Canonical `YYYY-MM` for `YYYY-M`, `M/YYYY` and `M/YY`; anything else is
/// returned trimmed but otherwise unchanged. Two-digit years below 50 are
/// 20YY, the rest 19YY.
pub fn normalize_period_key(raw: &str) -> String {
    let t = raw.trim();
    if t.is_empty() {
        return String::new();
    }
    if let Some(c) = YEAR_DASH_MONTH.captures(t) {
        return format!("{}-{:0>2}", &c[1], &c[2]);
    }
    if let Some(c) = MONTH_SLASH_YEAR.captures(t) {
        return format!("{}-{:0>2}", &c[2], &c[1]);
    }
    if let Some(c) = MONTH_SLASH_YY.captures(t) {
        let yy: i32 = c[2].parse().unwrap_or(0);
        let year = if yy < 50 { 2000 + yy } else { 1900 + yy };
        return format!("{}-{:0>2}", year, &c[1]);
    }
    t.to_string()
}

/// Money text with `,` thousands separators; anything unparseable is 0.
pub fn parse_money_text(raw: &str) -> f64 {
    raw.replace(',', "")
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Lenient amount parsing for spreadsheet cells: separators and currency
/// symbols are dropped before parsing.
pub fn parse_amount(v: Option<&Value>) -> f64 {
    let s = match v {
        None | Some(Value::Null) => return 0.0,
        Some(Value::Number(n)) => return n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    };
    let cleaned = NON_NUMERIC.replace_all(&s.replace(',', ""), "").into_owned();
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite()).unwrap_or(0.0)
}

pub fn map_budgets(presupuestos: &[PresupuestoRaw]) -> Vec<Budget> {
    presupuestos
        .iter()
        .map(|p| {
            let normalized = normalize_period_key(&p.mes_anio);
            Budget {
                id: p.id.clone(),
                category_id: p.categoria_id.clone(),
                subcategory_id: Some(p.subcategoria_id.trim().to_string()).filter(|s| !s.is_empty()),
                period_key: if normalized.is_empty() { p.mes_anio.clone() } else { normalized },
                amount: parse_money_text(&p.monto),
                period: BudgetPeriod::Monthly,
            }
        })
        .collect()
}

struct Resolved {
    category_id: String,
    subcategory_id: Option<String>,
    merchant_id: String,
}

fn resolve_names(
    category: &str,
    subcategory: &str,
    merchant: &str,
    categories: &[Category],
    merchants: &[Merchant],
) -> Resolved {
    let cat = categories.iter().find(|c| same_name(&c.name, category));
    let sub = cat.and_then(|c| c.subcategories.iter().find(|s| same_name(&s.name, subcategory)));
    let mer = merchants.iter().find(|m| same_name(&m.name, merchant));
    Resolved {
        category_id: cat.map(|c| c.id.clone()).unwrap_or_else(|| UNKNOWN_ID.to_string()),
        subcategory_id: sub.map(|s| s.id.clone()),
        merchant_id: mer.map(|m| m.id.clone()).unwrap_or_else(|| UNKNOWN_ID.to_string()),
    }
}

pub fn map_movement_item(
    item: &MovimientoItem,
    categories: &[Category],
    merchants: &[Merchant],
) -> Transaction {
    let amount = if item.tipo == "Gasto" { -item.monto.abs() } else { item.monto };
    let r = resolve_names(&item.categoria, &item.subcategoria, &item.comercio, categories, merchants);
    let description = [&item.comercio, &item.descripcion]
        .into_iter()
        .find(|s| !s.is_empty())
        .cloned()
        .unwrap_or_else(|| NO_DESCRIPTION.to_string());
    Transaction {
        id: item.id.clone(),
        amount,
        description,
        date: item.fecha.clone(),
        category_id: r.category_id,
        subcategory_id: r.subcategory_id,
        merchant_id: r.merchant_id,
    }
}

/// `D/M/YYYY` to `YYYY-MM-DD`; other shapes pass through.
pub fn day_month_year_to_iso(raw: &str) -> String {
    let t = raw.trim();
    let parts: Vec<&str> = t.split('/').collect();
    if let [d, m, y] = parts[..] {
        return format!("{}-{:0>2}-{:0>2}", y, m, d);
    }
    t.to_string()
}

pub fn map_movement_row(
    row: &MovimientoRaw,
    categories: &[Category],
    merchants: &[Merchant],
) -> Transaction {
    let cat_name = row.nombre_categoria.as_deref().unwrap_or("").trim();
    let sub_name = row.nombre_subcategoria.as_deref().unwrap_or("").trim();
    let comercio = row.comercio.as_deref().unwrap_or("").trim();
    let tipo = row.tipo_movimiento.as_deref().unwrap_or("gasto").to_lowercase();
    let monto = parse_amount(row.monto.as_ref());
    let amount = if tipo == "ingreso" { monto } else { -monto };
    let r = resolve_names(cat_name, sub_name, comercio, categories, merchants);
    Transaction {
        id: row.id.clone().unwrap_or_default(),
        amount,
        description: if comercio.is_empty() { NO_DESCRIPTION.to_string() } else { comercio.to_string() },
        date: row.fecha.as_deref().map(day_month_year_to_iso).unwrap_or_default(),
        category_id: r.category_id,
        subcategory_id: r.subcategory_id,
        merchant_id: r.merchant_id,
    }
}

/// Parent category id with its subcategories, in category order.
pub fn group_subcategories_by_parent(categories: &[Category]) -> Vec<(String, Vec<Subcategory>)> {
    categories
        .iter()
        .map(|c| (c.id.clone(), c.subcategories.clone()))
        .collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UnknownReferences {
    pub categories: usize,
    pub merchants: usize,
}

impl UnknownReferences {
    pub fn is_clean(&self) -> bool {
        self.categories == 0 && self.merchants == 0
    }
}

pub fn unknown_references(transactions: &[Transaction]) -> UnknownReferences {
    let mut out = UnknownReferences::default();
    for t in transactions {
        if t.category_id == UNKNOWN_ID {
            out.categories += 1;
        }
        if t.merchant_id == UNKNOWN_ID {
            out.merchants += 1;
        }
    }
    out
}
