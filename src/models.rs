// Copyright (c) Vino contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// Foreign key used when a name could not be matched to a known record.
pub const UNKNOWN_ID: &str = "unknown";

pub const DEFAULT_CATEGORY_ICON: &str = "📁";
pub const DEFAULT_CATEGORY_COLOR: &str = "#6b7280";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub color: String,
    pub subcategories: Vec<Subcategory>,
}

impl Category {
    pub fn subcategory(&self, id: &str) -> Option<&Subcategory> {
        self.subcategories.iter().find(|s| s.id == id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subcategory {
    pub id: String,
    pub name: String,
    pub category_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MerchantKind {
    /// Backed by a merchant record on the server.
    Resolved,
    /// Inferred from the free-text merchant name of a rule.
    Placeholder,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Merchant {
    pub id: String,
    pub name: String,
    pub default_category_id: Option<String>,
    pub default_subcategory_id: Option<String>,
    pub kind: MerchantKind,
}

impl Merchant {
    pub fn placeholder(name: &str) -> Self {
        let id = format!("comercio-{}", name.split_whitespace().collect::<Vec<_>>().join("_"));
        Self {
            id,
            name: name.to_string(),
            default_category_id: None,
            default_subcategory_id: None,
            kind: MerchantKind::Placeholder,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.kind == MerchantKind::Placeholder
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MerchantRule {
    pub id: String,
    pub merchant_id: String,
    pub category_id: String,
    pub subcategory_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetPeriod {
    Monthly,
    Weekly,
    Yearly,
}

impl BudgetPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            BudgetPeriod::Monthly => "monthly",
            BudgetPeriod::Weekly => "weekly",
            BudgetPeriod::Yearly => "yearly",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub id: String,
    pub category_id: String,
    /// `None` covers the whole category.
    pub subcategory_id: Option<String>,
    /// Canonical `YYYY-MM` when the backend value could be normalized.
    pub period_key: String,
    pub amount: f64,
    pub period: BudgetPeriod,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    /// Negative for expenses.
    pub amount: f64,
    pub description: String,
    /// `YYYY-MM-DD` when the backend sent a recognizable date.
    pub date: String,
    pub category_id: String,
    pub subcategory_id: Option<String>,
    pub merchant_id: String,
}

impl Transaction {
    pub fn is_expense(&self) -> bool {
        self.amount < 0.0
    }

    pub fn naive_date(&self) -> Option<NaiveDate> {
        let head = self.date.get(..10).unwrap_or(&self.date);
        NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
    }

    pub fn has_unknown_reference(&self) -> bool {
        self.category_id == UNKNOWN_ID || self.merchant_id == UNKNOWN_ID
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: User,
}

/// A calendar month; `month` is the zero-based index (0 = January).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MonthYear {
    pub month: u32,
    pub year: i32,
}

impl MonthYear {
    pub fn new(month: u32, year: i32) -> Self {
        Self { month, year }
    }

    pub fn current() -> Self {
        let today = Local::now().date_naive();
        Self::new(today.month0(), today.year())
    }

    pub fn from_period_key(key: &str) -> Option<Self> {
        let (y, m) = key.trim().split_once('-')?;
        let year: i32 = y.parse().ok()?;
        let month: u32 = m.parse().ok()?;
        if y.len() != 4 || !(1..=12).contains(&month) {
            return None;
        }
        Some(Self::new(month - 1, year))
    }

    pub fn period_key(&self) -> String {
        format!("{}-{:02}", self.year, self.month + 1)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.month0() == self.month && date.year() == self.year
    }
}
