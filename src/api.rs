// Copyright (c) Vino contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Blocking JSON client for the bookkeeping backend.

use crate::error::ApiError;
use crate::wire::{
    BudgetPatch, CategoriaRaw, CategoryPatch, HomeBreakdown, HomeSummary, LoginRequest,
    LoginResponse, MerchantBody, MerchantRaw, MovementBody, MovimientosPage, NameBody,
    NewBudget, NewCategory, PresupuestoRaw, ReglaRaw, RuleBody, SubcategoriaRaw,
};
use reqwest::Method;
use reqwest::blocking::{Client, Response};
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

const UA: &str = concat!("vino/", env!("CARGO_PKG_VERSION"));

/// Optional server-side filters for the budget and rule listings. Empty
/// values are not sent.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListFilter<'a> {
    pub period: Option<&'a str>,
    pub merchant: Option<&'a str>,
    pub category_id: Option<&'a str>,
    pub subcategory_id: Option<&'a str>,
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let http = Client::builder().user_agent(UA).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<Value>,
        authenticated: bool,
    ) -> Result<Response, ApiError> {
        tracing::debug!(%method, path, "backend request");
        let mut req = self
            .http
            .request(method, format!("{}{}", self.base_url, path))
            .header(ACCEPT, "application/json");
        if !query.is_empty() {
            req = req.query(query);
        }
        if authenticated {
            let token = self.token.as_deref().ok_or(ApiError::NotAuthenticated)?;
            req = req.header(AUTHORIZATION, format!("Bearer {}", token));
        }
        if let Some(b) = body {
            req = req.header(CONTENT_TYPE, "application/json").body(b.to_string());
        }
        let resp = req.send()?;
        if resp.status().is_success() {
            return Ok(resp);
        }
        let status = resp.status();
        let text = resp.text().unwrap_or_default();
        Err(ApiError::Status {
            status: status.as_u16(),
            detail: error_detail(&text)
                .or_else(|| status.canonical_reason().map(str::to_string))
                .unwrap_or_else(|| "request failed".to_string()),
        })
    }

    fn read<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T, ApiError> {
        let resp = self.request(Method::GET, path, query, None, true)?;
        decode(resp)
    }

    fn write<B: Serialize>(&self, method: Method, path: &str, body: Option<&B>) -> Result<Value, ApiError> {
        let body = body.map(serde_json::to_value).transpose()?;
        let resp = self.request(method, path, &[], body, true)?;
        decode(resp)
    }

    fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.write::<Value>(Method::DELETE, path, None).map(|_| ())
    }

    pub fn login(&self, username: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let body = serde_json::to_value(LoginRequest { username: username.trim(), password })?;
        let resp = self.request(Method::POST, "/auth/login", &[], Some(body), false)?;
        decode(resp)
    }

    pub fn list_categories(&self) -> Result<Vec<CategoriaRaw>, ApiError> {
        self.read("/categorias", &[])
    }

    pub fn create_category(&self, body: &NewCategory<'_>) -> Result<Value, ApiError> {
        self.write(Method::POST, "/categorias", Some(body))
    }

    pub fn update_category(&self, id: &str, patch: &CategoryPatch) -> Result<Value, ApiError> {
        self.write(Method::PATCH, &format!("/categorias/{}", id), Some(patch))
    }

    pub fn delete_category(&self, id: &str) -> Result<(), ApiError> {
        self.delete(&format!("/categorias/{}", id))
    }

    pub fn add_subcategory(&self, category_id: &str, name: &str) -> Result<Value, ApiError> {
        self.write(
            Method::POST,
            &format!("/categorias/{}/subcategorias", category_id),
            Some(&NameBody { name }),
        )
    }

    pub fn list_subcategories(&self, category_id: Option<&str>) -> Result<Vec<SubcategoriaRaw>, ApiError> {
        let query = filters(&[("categoria_id", category_id)]);
        self.read("/subcategorias", &query)
    }

    pub fn update_subcategory(&self, id: &str, name: &str) -> Result<Value, ApiError> {
        self.write(Method::PATCH, &format!("/subcategorias/{}", id), Some(&NameBody { name }))
    }

    pub fn delete_subcategory(&self, id: &str) -> Result<(), ApiError> {
        self.delete(&format!("/subcategorias/{}", id))
    }

    pub fn list_budgets(&self, filter: &ListFilter<'_>) -> Result<Vec<PresupuestoRaw>, ApiError> {
        let query = filters(&[
            ("mes_anio", filter.period),
            ("categoria_id", filter.category_id),
            ("subcategoria_id", filter.subcategory_id),
        ]);
        self.read("/presupuestos", &query)
    }

    pub fn create_budget(&self, body: &NewBudget<'_>) -> Result<Value, ApiError> {
        self.write(Method::POST, "/presupuestos", Some(body))
    }

    pub fn update_budget(&self, id: &str, patch: &BudgetPatch) -> Result<Value, ApiError> {
        self.write(Method::PATCH, &format!("/presupuestos/{}", id), Some(patch))
    }

    pub fn delete_budget(&self, id: &str) -> Result<(), ApiError> {
        self.delete(&format!("/presupuestos/{}", id))
    }

    pub fn list_merchants(&self) -> Result<Vec<MerchantRaw>, ApiError> {
        self.read("/comercios", &[])
    }

    pub fn create_merchant(&self, body: &MerchantBody) -> Result<Value, ApiError> {
        self.write(Method::POST, "/comercios", Some(body))
    }

    pub fn update_merchant(&self, id: &str, body: &MerchantBody) -> Result<Value, ApiError> {
        self.write(Method::PATCH, &format!("/comercios/{}", id), Some(body))
    }

    pub fn delete_merchant(&self, id: &str) -> Result<(), ApiError> {
        self.delete(&format!("/comercios/{}", id))
    }

    pub fn list_rules(&self, filter: &ListFilter<'_>) -> Result<Vec<ReglaRaw>, ApiError> {
        let query = filters(&[
            ("comercio", filter.merchant),
            ("categoria_id", filter.category_id),
            ("subcategoria_id", filter.subcategory_id),
        ]);
        self.read("/reglas", &query)
    }

    pub fn create_rule(&self, body: &RuleBody) -> Result<Value, ApiError> {
        self.write(Method::POST, "/reglas", Some(body))
    }

    pub fn update_rule(&self, id: &str, body: &RuleBody) -> Result<Value, ApiError> {
        self.write(Method::PATCH, &format!("/reglas/{}", id), Some(body))
    }

    pub fn delete_rule(&self, id: &str) -> Result<(), ApiError> {
        self.delete(&format!("/reglas/{}", id))
    }

    pub fn list_movements(&self, limit: u32) -> Result<MovimientosPage, ApiError> {
        self.read("/movimientos", &[("limit", limit.to_string())])
    }

    pub fn create_movement(&self, body: &MovementBody) -> Result<Value, ApiError> {
        self.write(Method::POST, "/movimientos", Some(body))
    }

    pub fn update_movement(&self, id: &str, body: &MovementBody) -> Result<Value, ApiError> {
        self.write(Method::PATCH, &format!("/movimientos/{}", id), Some(body))
    }

    pub fn delete_movement(&self, id: &str) -> Result<(), ApiError> {
        self.delete(&format!("/movimientos/{}", id))
    }

    pub fn invalidate_movement_cache(&self) -> Result<(), ApiError> {
        self.write::<Value>(Method::POST, "/movimientos/invalidate-cache", None)
            .map(|_| ())
    }

    pub fn home_summary(&self, period: &str, currency: &str) -> Result<HomeSummary, ApiError> {
        self.read(
            "/views/home/summary",
            &[("period", period.to_string()), ("moneda", currency.to_string())],
        )
    }

    pub fn home_breakdown(
        &self,
        period: &str,
        currency: &str,
        top_categories: u32,
        recent_limit: u32,
    ) -> Result<HomeBreakdown, ApiError> {
        self.read(
            "/views/home/breakdown",
            &[
                ("period", period.to_string()),
                ("currency", currency.to_string()),
                ("top_categories", top_categories.to_string()),
                ("recent_limit", recent_limit.to_string()),
            ],
        )
    }
}

fn filters(pairs: &[(&'static str, Option<&str>)]) -> Vec<(&'static str, String)> {
    pairs
        .iter()
        .filter_map(|(k, v)| v.filter(|s| !s.is_empty()).map(|s| (*k, s.to_string())))
        .collect()
}

/// Empty bodies (204, zero length) decode as JSON `null`.
fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, ApiError> {
    let text = resp.text()?;
    if text.trim().is_empty() {
        return Ok(serde_json::from_value(Value::Null)?);
    }
    Ok(serde_json::from_str(&text)?)
}

fn error_detail(body: &str) -> Option<String> {
    let v: Value = serde_json::from_str(body).ok()?;
    match v.get("detail")? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::String(_) | Value::Null => None,
        other => Some(other.to_string()),
    }
}
