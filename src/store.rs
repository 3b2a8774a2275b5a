// Copyright (c) Vino contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! In-memory copy of the backend state and every mutation against it.
//!
//! Each mutation validates its input against the lists held here, calls the
//! backend, and on success reloads everything. Nothing is patched locally.

use crate::api::{ApiClient, ListFilter};
use crate::budget::is_duplicate_budget;
use crate::cache::DashboardCache;
use crate::config::Config;
use crate::error::{ApiError, StoreError, ValidationError};
use crate::models::{
    Budget, BudgetPeriod, Category, Merchant, MerchantRule, MonthYear, Session, Subcategory,
    Transaction, DEFAULT_CATEGORY_COLOR, DEFAULT_CATEGORY_ICON,
};
use crate::normalize::{
    map_budgets, map_catalog_to_categories, map_merchants, map_movement_item, map_movement_row,
    map_rules_to_merchant_rules, merchants_with_placeholders, normalize_period_key,
    unknown_references,
};
use crate::wire::{
    BudgetPatch, CategoryPatch, HomeBreakdown, HomeSummary, MerchantBody, MovementBody,
    MovimientoRaw, NameBody, NewBudget, NewCategory, RuleBody,
};
use chrono::NaiveDate;
use std::thread;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Clone, Default)]
pub struct NewCategoryInput {
    pub name: String,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub subcategories: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct BudgetInput {
    pub category_id: String,
    pub subcategory_id: Option<String>,
    pub period: String,
    pub amount: f64,
}

#[derive(Debug, Clone, Default)]
pub struct BudgetUpdate {
    pub category_id: Option<String>,
    /// `Some(None)` widens the budget to the whole category.
    pub subcategory_id: Option<Option<String>>,
    pub period: Option<String>,
    pub amount: Option<f64>,
}

#[derive(Debug, Clone, Default)]
pub struct MerchantInput {
    pub name: String,
    pub default_category_id: Option<String>,
    pub default_subcategory_id: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct RuleInput {
    pub merchant_id: String,
    pub category_id: String,
    pub subcategory_id: Option<String>,
}

/// A movement as entered by the user. `amount` is the positive magnitude;
/// expenses are sent negative.
#[derive(Debug, Clone)]
pub struct TransactionInput {
    pub date: NaiveDate,
    pub amount: f64,
    pub income: bool,
    pub description: String,
    pub merchant_id: String,
    pub category_id: String,
    pub subcategory_id: Option<String>,
}

pub struct DataStore {
    api: ApiClient,
    config: Config,
    session: Option<Session>,
    cache: DashboardCache,
    categories: Vec<Category>,
    budgets: Vec<Budget>,
    merchants: Vec<Merchant>,
    rules: Vec<MerchantRule>,
    transactions: Vec<Transaction>,
}

fn or_empty<T: Default>(entity: &str, res: Result<T, ApiError>) -> T {
    match res {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(entity, error = %e, "fetch failed; using empty list");
            T::default()
        }
    }
}

fn ensure_positive(amount: f64) -> Result<(), ValidationError> {
    if amount.is_finite() && amount > 0.0 {
        Ok(())
    } else {
        Err(ValidationError::NonPositiveAmount)
    }
}

fn required<'a>(field: &'static str, value: &'a str) -> Result<&'a str, ValidationError> {
    let v = value.trim();
    if v.is_empty() { Err(ValidationError::MissingField(field)) } else { Ok(v) }
}

fn not_found(kind: &'static str, id: &str) -> ValidationError {
    ValidationError::NotFound { kind, id: id.to_string() }
}

/// Canonical `YYYY-MM` for user input, rejecting anything that is not a month.
pub fn canonical_period(raw: &str) -> Result<String, ValidationError> {
    let key = normalize_period_key(raw);
    MonthYear::from_period_key(&key)
        .map(|m| m.period_key())
        .ok_or_else(|| ValidationError::InvalidPeriod(raw.trim().to_string()))
}

impl DataStore {
    pub fn new(api: ApiClient, config: Config) -> Self {
        Self {
            api,
            config,
            session: None,
            cache: DashboardCache::new(),
            categories: Vec::new(),
            budgets: Vec::new(),
            merchants: Vec::new(),
            rules: Vec::new(),
            transactions: Vec::new(),
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn cache(&self) -> &DashboardCache {
        &self.cache
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn budgets(&self) -> &[Budget] {
        &self.budgets
    }

    pub fn merchants(&self) -> &[Merchant] {
        &self.merchants
    }

    pub fn rules(&self) -> &[MerchantRule] {
        &self.rules
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn set_session(&mut self, session: Session) {
        self.api.set_token(Some(session.token.clone()));
        self.session = Some(session);
        self.cache.invalidate();
    }

    pub fn clear_session(&mut self) {
        self.api.set_token(None);
        self.session = None;
        self.cache.invalidate();
        self.categories.clear();
        self.budgets.clear();
        self.merchants.clear();
        self.rules.clear();
        self.transactions.clear();
    }

    /// Reloads every collection. A failing fetch leaves that collection empty.
    pub fn refresh(&mut self) {
        if self.session.is_none() {
            tracing::debug!("no session; skipping refresh");
            return;
        }
        let api = &self.api;
        let limit = self.config.movements_limit;
        let all = ListFilter::default();
        let (cats, subs, budgets, merchants, rules, movements) = thread::scope(|s| {
            let cats = s.spawn(|| or_empty("categorias", api.list_categories()));
            let subs = s.spawn(|| or_empty("subcategorias", api.list_subcategories(None)));
            let budgets = s.spawn(|| or_empty("presupuestos", api.list_budgets(&all)));
            let merchants = s.spawn(|| or_empty("comercios", api.list_merchants()));
            let rules = s.spawn(|| or_empty("reglas", api.list_rules(&all)));
            let movements = s.spawn(|| or_empty("movimientos", api.list_movements(limit)));
            (
                cats.join().unwrap_or_default(),
                subs.join().unwrap_or_default(),
                budgets.join().unwrap_or_default(),
                merchants.join().unwrap_or_default(),
                rules.join().unwrap_or_default(),
                movements.join().unwrap_or_default(),
            )
        });

        self.categories = map_catalog_to_categories(&cats, &subs);
        self.budgets = map_budgets(&budgets);
        self.merchants = merchants_with_placeholders(map_merchants(&merchants), &rules);
        self.rules = map_rules_to_merchant_rules(&rules, &self.merchants);
        self.transactions = movements
            .items
            .iter()
            .map(|m| map_movement_item(m, &self.categories, &self.merchants))
            .collect();

        let unknown = unknown_references(&self.transactions);
        if !unknown.is_clean() {
            tracing::warn!(
                categories = unknown.categories,
                merchants = unknown.merchants,
                "movements reference names that match no category or merchant"
            );
        }
        tracing::debug!(
            categories = self.categories.len(),
            budgets = self.budgets.len(),
            merchants = self.merchants.len(),
            rules = self.rules.len(),
            transactions = self.transactions.len(),
            "refreshed"
        );
    }

    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// Looks a category up by id, then by case-insensitive name.
    pub fn resolve_category(&self, key: &str) -> Result<&Category, ValidationError> {
        let key = key.trim();
        self.category(key)
            .or_else(|| self.categories.iter().find(|c| c.name.to_lowercase() == key.to_lowercase()))
            .ok_or_else(|| ValidationError::UnknownCategory(key.to_string()))
    }

    /// Looks a subcategory of `category` up by id, then by name.
    pub fn resolve_subcategory<'a>(
        &self,
        category: &'a Category,
        key: &str,
    ) -> Result<&'a Subcategory, ValidationError> {
        let key = key.trim();
        category
            .subcategory(key)
            .or_else(|| {
                category
                    .subcategories
                    .iter()
                    .find(|s| s.name.to_lowercase() == key.to_lowercase())
            })
            .ok_or_else(|| ValidationError::SubcategoryMismatch {
                category: category.name.clone(),
                subcategory: key.to_string(),
            })
    }

    pub fn merchant(&self, id: &str) -> Option<&Merchant> {
        self.merchants.iter().find(|m| m.id == id)
    }

    pub fn resolve_merchant(&self, key: &str) -> Result<&Merchant, ValidationError> {
        let key = key.trim();
        self.merchant(key)
            .or_else(|| self.merchants.iter().find(|m| m.name.to_lowercase() == key.to_lowercase()))
            .ok_or_else(|| ValidationError::UnknownMerchant(key.to_string()))
    }

    fn subcategory_by_id(&self, id: &str) -> Option<&Subcategory> {
        self.categories.iter().find_map(|c| c.subcategory(id))
    }

    /// Category must exist and, when given, own the subcategory.
    fn check_scope(&self, category_id: &str, subcategory_id: Option<&str>) -> Result<(), ValidationError> {
        let cat = self
            .category(category_id)
            .ok_or_else(|| ValidationError::UnknownCategory(category_id.to_string()))?;
        if let Some(sub) = subcategory_id {
            if cat.subcategory(sub).is_none() {
                return Err(ValidationError::SubcategoryMismatch {
                    category: cat.name.clone(),
                    subcategory: sub.to_string(),
                });
            }
        }
        Ok(())
    }

    fn resolved_merchant(&self, id: &str) -> Result<&Merchant, ValidationError> {
        let m = self
            .merchant(id)
            .ok_or_else(|| ValidationError::UnknownMerchant(id.to_string()))?;
        if m.is_placeholder() {
            return Err(ValidationError::PlaceholderMerchant(m.name.clone()));
        }
        Ok(m)
    }

    // Categories

    pub fn create_category(&mut self, input: &NewCategoryInput) -> StoreResult<()> {
        let name = required("name", &input.name)?;
        let icon = input.icon.as_deref().filter(|s| !s.is_empty()).unwrap_or(DEFAULT_CATEGORY_ICON);
        let color = input.color.as_deref().filter(|s| !s.is_empty()).unwrap_or(DEFAULT_CATEGORY_COLOR);
        let body = NewCategory {
            name,
            icon,
            color,
            subcategories: input
                .subcategories
                .iter()
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(|name| NameBody { name })
                .collect(),
        };
        self.api.create_category(&body)?;
        self.refresh();
        Ok(())
    }

    pub fn update_category(&mut self, id: &str, patch: &CategoryPatch) -> StoreResult<()> {
        self.category(id).ok_or_else(|| not_found("category", id))?;
        if patch.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(ValidationError::MissingField("name").into());
        }
        self.api.update_category(id, patch)?;
        self.refresh();
        Ok(())
    }

    pub fn delete_category(&mut self, id: &str) -> StoreResult<()> {
        self.category(id).ok_or_else(|| not_found("category", id))?;
        self.api.delete_category(id)?;
        self.refresh();
        Ok(())
    }

    pub fn add_subcategory(&mut self, category_id: &str, name: &str) -> StoreResult<()> {
        let name = required("name", name)?;
        self.category(category_id)
            .ok_or_else(|| ValidationError::UnknownCategory(category_id.to_string()))?;
        self.api.add_subcategory(category_id, name)?;
        self.refresh();
        Ok(())
    }

    pub fn update_subcategory(&mut self, id: &str, name: &str) -> StoreResult<()> {
        let name = required("name", name)?;
        self.subcategory_by_id(id).ok_or_else(|| not_found("subcategory", id))?;
        self.api.update_subcategory(id, name)?;
        self.refresh();
        Ok(())
    }

    pub fn delete_subcategory(&mut self, id: &str) -> StoreResult<()> {
        self.subcategory_by_id(id).ok_or_else(|| not_found("subcategory", id))?;
        self.api.delete_subcategory(id)?;
        self.refresh();
        Ok(())
    }

    // Budgets

    pub fn create_budget(&mut self, input: &BudgetInput) -> StoreResult<()> {
        ensure_positive(input.amount)?;
        let period = canonical_period(&input.period)?;
        let sub = input.subcategory_id.as_deref();
        self.check_scope(&input.category_id, sub)?;
        if is_duplicate_budget(&self.budgets, &input.category_id, sub, &period) {
            return Err(ValidationError::DuplicateBudget { period }.into());
        }
        let body = NewBudget {
            category_id: &input.category_id,
            subcategory_id: sub,
            mes_anio: &period,
            amount: input.amount,
            period: BudgetPeriod::Monthly.as_str(),
            spent: 0.0,
        };
        self.api.create_budget(&body)?;
        self.refresh();
        Ok(())
    }

    pub fn update_budget(&mut self, id: &str, update: &BudgetUpdate) -> StoreResult<()> {
        let current = self
            .budgets
            .iter()
            .find(|b| b.id == id)
            .ok_or_else(|| not_found("budget", id))?;
        if let Some(a) = update.amount {
            ensure_positive(a)?;
        }
        let period = update.period.as_deref().map(canonical_period).transpose()?;
        let category_id = update.category_id.clone().unwrap_or_else(|| current.category_id.clone());
        let subcategory_id = match &update.subcategory_id {
            Some(s) => s.clone(),
            None if update.category_id.is_some() => None,
            None => current.subcategory_id.clone(),
        };
        self.check_scope(&category_id, subcategory_id.as_deref())?;

        let target_period = period.clone().unwrap_or_else(|| current.period_key.clone());
        let scope_changed = category_id != current.category_id
            || subcategory_id != current.subcategory_id
            || target_period != current.period_key;
        if scope_changed {
            let others: Vec<Budget> = self.budgets.iter().filter(|b| b.id != id).cloned().collect();
            if is_duplicate_budget(&others, &category_id, subcategory_id.as_deref(), &target_period) {
                return Err(ValidationError::DuplicateBudget { period: target_period }.into());
            }
        }

        let patch = BudgetPatch {
            category_id: update.category_id.clone(),
            subcategory_id: if update.subcategory_id.is_some() || update.category_id.is_some() {
                Some(subcategory_id.unwrap_or_default())
            } else {
                None
            },
            mes_anio: period,
            amount: update.amount,
        };
        self.api.update_budget(id, &patch)?;
        self.refresh();
        Ok(())
    }

    pub fn delete_budget(&mut self, id: &str) -> StoreResult<()> {
        if !self.budgets.iter().any(|b| b.id == id) {
            return Err(not_found("budget", id).into());
        }
        self.api.delete_budget(id)?;
        self.refresh();
        Ok(())
    }

    // Merchants

    pub fn create_merchant(&mut self, input: &MerchantInput) -> StoreResult<()> {
        let name = required("name", &input.name)?;
        if input.default_subcategory_id.is_some() && input.default_category_id.is_none() {
            return Err(ValidationError::MissingField("category").into());
        }
        if let Some(cat) = &input.default_category_id {
            self.check_scope(cat, input.default_subcategory_id.as_deref())?;
        }
        let body = MerchantBody {
            name: Some(name.to_string()),
            default_category_id: input.default_category_id.clone(),
            default_subcategory_id: input.default_subcategory_id.clone(),
        };
        self.api.create_merchant(&body)?;
        self.refresh();
        Ok(())
    }

    /// Placeholders accept a new default category, which the backend stores on
    /// their rule. They cannot be renamed.
    pub fn update_merchant(&mut self, id: &str, body: &MerchantBody) -> StoreResult<()> {
        let m = self
            .merchant(id)
            .ok_or_else(|| ValidationError::UnknownMerchant(id.to_string()))?;
        if body.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(ValidationError::MissingField("name").into());
        }
        if m.is_placeholder() {
            if body.name.as_deref().is_some_and(|n| n.trim() != m.name) {
                return Err(ValidationError::PlaceholderMerchant(m.name.clone()).into());
            }
            if body.default_category_id.is_none() {
                return Err(ValidationError::MissingField("category").into());
            }
        }
        let (cat, sub) = match &body.default_category_id {
            Some(c) => (Some(c.clone()), body.default_subcategory_id.clone()),
            None => (
                m.default_category_id.clone(),
                body.default_subcategory_id.clone().or_else(|| m.default_subcategory_id.clone()),
            ),
        };
        match cat {
            Some(cat) => self.check_scope(&cat, sub.as_deref())?,
            None if sub.is_some() => return Err(ValidationError::MissingField("category").into()),
            None => {}
        }
        self.api.update_merchant(id, body)?;
        self.refresh();
        Ok(())
    }

    pub fn delete_merchant(&mut self, id: &str) -> StoreResult<()> {
        self.resolved_merchant(id)?;
        self.api.delete_merchant(id)?;
        self.refresh();
        Ok(())
    }

    // Rules

    pub fn create_rule(&mut self, input: &RuleInput) -> StoreResult<()> {
        required("merchant", &input.merchant_id)?;
        required("category", &input.category_id)?;
        let merchant = self
            .merchant(&input.merchant_id)
            .ok_or_else(|| ValidationError::UnknownMerchant(input.merchant_id.clone()))?;
        if self.rules.iter().any(|r| r.merchant_id == merchant.id) {
            return Err(ValidationError::DuplicateRule { merchant: merchant.name.clone() }.into());
        }
        if merchant.is_placeholder() {
            return Err(ValidationError::PlaceholderMerchant(merchant.name.clone()).into());
        }
        self.check_scope(&input.category_id, input.subcategory_id.as_deref())?;
        let body = RuleBody {
            merchant_id: Some(input.merchant_id.clone()),
            category_id: Some(input.category_id.clone()),
            subcategory_id: input.subcategory_id.clone(),
        };
        self.api.create_rule(&body)?;
        self.refresh();
        Ok(())
    }

    pub fn update_rule(&mut self, id: &str, body: &RuleBody) -> StoreResult<()> {
        let rule = self
            .rules
            .iter()
            .find(|r| r.id == id)
            .ok_or_else(|| not_found("rule", id))?;
        if let Some(mid) = &body.merchant_id {
            let merchant = self
                .merchant(mid)
                .ok_or_else(|| ValidationError::UnknownMerchant(mid.clone()))?;
            if self.rules.iter().any(|r| r.id != id && r.merchant_id == merchant.id) {
                return Err(ValidationError::DuplicateRule { merchant: merchant.name.clone() }.into());
            }
        }
        let cat = body.category_id.clone().unwrap_or_else(|| rule.category_id.clone());
        let sub = match (&body.category_id, &body.subcategory_id) {
            (_, Some(s)) => Some(s.clone()),
            (Some(_), None) => None,
            (None, None) => rule.subcategory_id.clone(),
        };
        self.check_scope(&cat, sub.as_deref())?;
        self.api.update_rule(id, body)?;
        self.refresh();
        Ok(())
    }

    pub fn delete_rule(&mut self, id: &str) -> StoreResult<()> {
        if !self.rules.iter().any(|r| r.id == id) {
            return Err(not_found("rule", id).into());
        }
        self.api.delete_rule(id)?;
        self.refresh();
        Ok(())
    }

    // Transactions

    /// The write already succeeded; a stale backend cache is only logged.
    fn invalidate_movements(&self) {
        if let Err(e) = self.api.invalidate_movement_cache() {
            tracing::warn!(error = %e, "movement cache invalidation failed");
        }
    }

    fn movement_body(&self, input: &TransactionInput) -> Result<MovementBody, ValidationError> {
        ensure_positive(input.amount)?;
        required("merchant", &input.merchant_id)?;
        required("category", &input.category_id)?;
        let merchant = self.resolve_merchant(&input.merchant_id)?;
        self.check_scope(&input.category_id, input.subcategory_id.as_deref())?;
        let category = self
            .category(&input.category_id)
            .ok_or_else(|| ValidationError::UnknownCategory(input.category_id.clone()))?;
        let subcategory = input
            .subcategory_id
            .as_deref()
            .and_then(|s| category.subcategory(s))
            .map(|s| s.name.clone())
            .unwrap_or_default();
        Ok(MovementBody {
            fecha: Some(input.date.format("%Y-%m-%d").to_string()),
            monto: Some(if input.income { input.amount } else { -input.amount }),
            descripcion: Some(input.description.trim().to_string()),
            comercio: Some(merchant.name.clone()),
            nombre_categoria: Some(category.name.clone()),
            nombre_subcategoria: Some(subcategory),
            tipo_movimiento: None,
            moneda: None,
        })
    }

    /// Records a new movement and returns it as the backend stored it.
    pub fn create_transaction(&mut self, input: &TransactionInput) -> StoreResult<Option<Transaction>> {
        let mut body = self.movement_body(input)?;
        body.tipo_movimiento = Some(if input.income { "Ingreso" } else { "Gasto" }.to_string());
        body.moneda = Some(self.config.currency.clone());
        let created = self.api.create_movement(&body)?;
        self.invalidate_movements();
        self.refresh();
        Ok(serde_json::from_value::<MovimientoRaw>(created)
            .ok()
            .filter(|row| row.id.is_some())
            .map(|row| map_movement_row(&row, &self.categories, &self.merchants)))
    }

    pub fn update_transaction(&mut self, id: &str, input: &TransactionInput) -> StoreResult<()> {
        if !self.transactions.iter().any(|t| t.id == id) {
            return Err(not_found("transaction", id).into());
        }
        let body = self.movement_body(input)?;
        self.api.update_movement(id, &body)?;
        self.invalidate_movements();
        self.refresh();
        Ok(())
    }

    pub fn delete_transaction(&mut self, id: &str) -> StoreResult<()> {
        if !self.transactions.iter().any(|t| t.id == id) {
            return Err(not_found("transaction", id).into());
        }
        self.api.delete_movement(id)?;
        self.invalidate_movements();
        self.refresh();
        Ok(())
    }

    // Dashboard

    /// Cached per period; a failed call is logged, returns `None` and is retried
    /// on the next request.
    pub fn home_summary(&mut self, period: &str) -> Option<HomeSummary> {
        if let Some(hit) = self.cache.summary(period) {
            tracing::debug!(period, "summary cache hit");
            return Some(hit.clone());
        }
        tracing::debug!(period, "summary cache miss");
        match self.api.home_summary(period, &self.config.currency) {
            Ok(s) => {
                self.cache.put_summary(period, s.clone());
                Some(s)
            }
            Err(e) => {
                tracing::warn!(period, error = %e, "home summary unavailable");
                None
            }
        }
    }

    pub fn home_breakdown(&mut self, period: &str) -> Option<HomeBreakdown> {
        if let Some(hit) = self.cache.breakdown(period) {
            tracing::debug!(period, "breakdown cache hit");
            return Some(hit.clone());
        }
        tracing::debug!(period, "breakdown cache miss");
        let cfg = &self.config;
        match self
            .api
            .home_breakdown(period, &cfg.currency, cfg.top_categories, cfg.recent_limit)
        {
            Ok(b) => {
                self.cache.put_breakdown(period, b.clone());
                Some(b)
            }
            Err(e) => {
                tracing::warn!(period, error = %e, "home breakdown unavailable");
                None
            }
        }
    }
}
