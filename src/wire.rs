// Copyright (c) Vino contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Row and request shapes exactly as the bookkeeping backend speaks them.
//!
//! Field names follow the backend (mostly Spanish, some spreadsheet column
//! headers). Ids arrive as strings from the spreadsheet store and as integers
//! from the SQL store, so every id goes through [`id_string`].

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

fn id_string<'de, D>(d: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(value_to_string(Value::deserialize(d)?))
}

fn opt_id_string<'de, D>(d: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Value::deserialize(d)?;
    Ok(match v {
        Value::Null => None,
        other => Some(value_to_string(other)),
    })
}

fn value_to_string(v: Value) -> String {
    match v {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoriaRaw {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(default)]
    pub nombre: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubcategoriaRaw {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(default, deserialize_with = "id_string")]
    pub categoria_id: String,
    #[serde(default)]
    pub nombre: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReglaRaw {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(default)]
    pub comercio: String,
    #[serde(default, deserialize_with = "id_string")]
    pub categoria_id: String,
    #[serde(default)]
    pub categoria_nombre: String,
    #[serde(default, deserialize_with = "id_string")]
    pub subcategoria_id: String,
    #[serde(default)]
    pub subcategoria_nombre: String,
    #[serde(default)]
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PresupuestoRaw {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(default)]
    pub mes_anio: String,
    #[serde(default, deserialize_with = "id_string")]
    pub categoria_id: String,
    #[serde(default)]
    pub categoria_nombre: String,
    #[serde(default, deserialize_with = "id_string")]
    pub subcategoria_id: String,
    #[serde(default)]
    pub subcategoria_nombre: String,
    /// Money as text, possibly with thousands separators.
    #[serde(default, deserialize_with = "id_string")]
    pub monto: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MerchantRaw {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "defaultCategoryId", deserialize_with = "opt_id_string")]
    pub default_category_id: Option<String>,
    #[serde(default, rename = "defaultSubcategoryId", deserialize_with = "opt_id_string")]
    pub default_subcategory_id: Option<String>,
}

/// Movement as returned by the paginated listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MovimientoItem {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(default)]
    pub fecha: String,
    #[serde(default)]
    pub timestamp: String,
    /// "Gasto" or "Ingreso".
    #[serde(default)]
    pub tipo: String,
    #[serde(default)]
    pub moneda: String,
    #[serde(default)]
    pub monto: f64,
    #[serde(default)]
    pub comercio: String,
    #[serde(default)]
    pub descripcion: String,
    #[serde(default)]
    pub categoria: String,
    #[serde(default)]
    pub subcategoria: String,
    #[serde(default)]
    pub medio_pago: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MovimientosPage {
    #[serde(default)]
    pub items: Vec<MovimientoItem>,
    #[serde(default = "first_page")]
    pub page: u32,
    #[serde(default = "default_page_size")]
    pub limit: u32,
    #[serde(default)]
    pub total: u64,
}

fn first_page() -> u32 {
    1
}

fn default_page_size() -> u32 {
    50
}

impl Default for MovimientosPage {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            page: first_page(),
            limit: default_page_size(),
            total: 0,
        }
    }
}

/// Movement as a spreadsheet row (create/update responses).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MovimientoRaw {
    #[serde(rename = "Id", default, deserialize_with = "opt_id_string")]
    pub id: Option<String>,
    #[serde(rename = "Fecha", default)]
    pub fecha: Option<String>,
    #[serde(rename = "Monto", default)]
    pub monto: Option<Value>,
    #[serde(rename = "Comercio", default)]
    pub comercio: Option<String>,
    #[serde(rename = "Nombre_Categoria", default)]
    pub nombre_categoria: Option<String>,
    #[serde(rename = "Nombre_SubCategoria", default)]
    pub nombre_subcategoria: Option<String>,
    #[serde(rename = "Tipo de Movimiento", default)]
    pub tipo_movimiento: Option<String>,
    #[serde(rename = "Moneda", default)]
    pub moneda: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HomeSummary {
    #[serde(default)]
    pub period: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub moneda: String,
    #[serde(default)]
    pub gasto_mes: f64,
    #[serde(default)]
    pub presupuesto_mes: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySpend {
    pub categoria: String,
    pub total: f64,
    #[serde(default)]
    pub pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentMovement {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(default)]
    pub fecha: String,
    #[serde(default)]
    pub titulo: String,
    #[serde(default)]
    pub descripcion: String,
    #[serde(default)]
    pub comercio: String,
    #[serde(default)]
    pub categoria: String,
    #[serde(default)]
    pub monto: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HomeBreakdown {
    #[serde(default)]
    pub period: String,
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub gastos_por_categoria: Vec<CategorySpend>,
    #[serde(default)]
    pub transacciones_recientes: Vec<RecentMovement>,
    #[serde(default)]
    pub mayor_gasto: f64,
    #[serde(default)]
    pub transacciones_count: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginUser {
    #[serde(default, deserialize_with = "id_string")]
    pub id: String,
    #[serde(default)]
    pub nombre: String,
    #[serde(default)]
    pub apellido: String,
    #[serde(default)]
    pub gmail: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    #[serde(default)]
    pub user: Option<LoginUser>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NameBody<'a> {
    pub name: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewCategory<'a> {
    pub name: &'a str,
    pub icon: &'a str,
    pub color: &'a str,
    pub subcategories: Vec<NameBody<'a>>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CategoryPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewBudget<'a> {
    #[serde(rename = "categoryId")]
    pub category_id: &'a str,
    #[serde(rename = "subcategoryId")]
    pub subcategory_id: Option<&'a str>,
    pub mes_anio: &'a str,
    pub amount: f64,
    pub period: &'a str,
    pub spent: f64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BudgetPatch {
    #[serde(rename = "categoryId", skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(rename = "subcategoryId", skip_serializing_if = "Option::is_none")]
    pub subcategory_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mes_anio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct MerchantBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "defaultCategoryId", skip_serializing_if = "Option::is_none")]
    pub default_category_id: Option<String>,
    #[serde(rename = "defaultSubcategoryId", skip_serializing_if = "Option::is_none")]
    pub default_subcategory_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RuleBody {
    #[serde(rename = "merchantId", skip_serializing_if = "Option::is_none")]
    pub merchant_id: Option<String>,
    #[serde(rename = "categoryId", skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(rename = "subcategoryId", skip_serializing_if = "Option::is_none")]
    pub subcategory_id: Option<String>,
}

/// Movement fields by their spreadsheet column names.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MovementBody {
    #[serde(rename = "Fecha", skip_serializing_if = "Option::is_none")]
    pub fecha: Option<String>,
    #[serde(rename = "Monto", skip_serializing_if = "Option::is_none")]
    pub monto: Option<f64>,
    #[serde(rename = "Descripcion", skip_serializing_if = "Option::is_none")]
    pub descripcion: Option<String>,
    #[serde(rename = "Comercio", skip_serializing_if = "Option::is_none")]
    pub comercio: Option<String>,
    #[serde(rename = "Nombre_Categoria", skip_serializing_if = "Option::is_none")]
    pub nombre_categoria: Option<String>,
    #[serde(rename = "Nombre_SubCategoria", skip_serializing_if = "Option::is_none")]
    pub nombre_subcategoria: Option<String>,
    #[serde(rename = "Tipo de Movimiento", skip_serializing_if = "Option::is_none")]
    pub tipo_movimiento: Option<String>,
    #[serde(rename = "Moneda", skip_serializing_if = "Option::is_none")]
    pub moneda: Option<String>,
}
