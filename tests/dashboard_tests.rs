// Copyright (c) Vino contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod common;

use common::{fixture, serve, session, store_for};
use vino::cache::DashboardCache;
use vino::wire::HomeSummary;

const SUMMARY: &str = r#"{"period":"2026-02","user_id":"7","moneda":"ARS","gasto_mes":450.0,"presupuesto_mes":1400.0}"#;
const BREAKDOWN: &str = r#"{
    "period": "2026-02",
    "currency": "ARS",
    "gastos_por_categoria": [{"categoria": "Comida", "total": 450.0, "pct": 88.2}],
    "transacciones_recientes": [{"id": 5, "fecha": "2026-02-15", "titulo": "YPF", "monto": -60.0}],
    "mayor_gasto": 300.0,
    "transacciones_count": 4
}"#;

fn dashboard_backend(breakdown_ok: bool) -> common::Backend {
    serve(move |method, route| match route {
        "/views/home/summary" => (200, SUMMARY.to_string()),
        "/views/home/breakdown" if breakdown_ok => (200, BREAKDOWN.to_string()),
        "/views/home/breakdown" => (500, "boom".to_string()),
        _ => fixture(method, route).unwrap_or((200, "{}".to_string())),
    })
}

#[test]
fn summary_is_fetched_once_per_period() {
    let backend = dashboard_backend(true);
    let mut store = store_for(&backend);

    let first = store.home_summary("2026-02").unwrap();
    let second = store.home_summary("2026-02").unwrap();
    assert_eq!(first, second);
    assert_eq!(first.gasto_mes, 450.0);
    assert_eq!(backend.count("GET", "/views/home/summary"), 1);

    store.home_summary("2026-03");
    assert_eq!(backend.count("GET", "/views/home/summary"), 2);

    let req = backend
        .requests()
        .into_iter()
        .find(|r| r.route() == "/views/home/summary")
        .unwrap();
    assert_eq!(req.path, "/views/home/summary?period=2026-02&moneda=ARS");
}

#[test]
fn breakdown_query_carries_limits() {
    let backend = dashboard_backend(true);
    let mut store = store_for(&backend);
    let b = store.home_breakdown("2026-02").unwrap();
    assert_eq!(b.transacciones_recientes[0].id, "5");
    assert_eq!(b.transacciones_recientes[0].comercio, "");
    assert_eq!(b.transacciones_count, 4);
    let req = backend
        .requests()
        .into_iter()
        .find(|r| r.route() == "/views/home/breakdown")
        .unwrap();
    assert_eq!(
        req.path,
        "/views/home/breakdown?period=2026-02&currency=ARS&top_categories=6&recent_limit=5"
    );
}

#[test]
fn failures_are_not_cached() {
    let backend = dashboard_backend(false);
    let mut store = store_for(&backend);
    assert!(store.home_breakdown("2026-02").is_none());
    assert!(store.home_breakdown("2026-02").is_none());
    assert_eq!(backend.count("GET", "/views/home/breakdown"), 2);
    assert!(store.cache().is_empty());
}

#[test]
fn session_change_invalidates_cache() {
    let backend = dashboard_backend(true);
    let mut store = store_for(&backend);
    store.home_summary("2026-02");
    store.home_breakdown("2026-02");
    assert_eq!(store.cache().len(), 2);

    store.set_session(session());
    assert!(store.cache().is_empty());
    store.home_summary("2026-02");
    assert_eq!(backend.count("GET", "/views/home/summary"), 2);

    store.clear_session();
    assert!(store.cache().is_empty());
}

#[test]
fn cache_is_keyed_by_period() {
    let mut cache = DashboardCache::new();
    let summary: HomeSummary = serde_json::from_str(SUMMARY).unwrap();
    cache.put_summary("2026-02", summary.clone());
    assert_eq!(cache.summary("2026-02"), Some(&summary));
    assert!(cache.summary("2026-03").is_none());
    assert!(cache.breakdown("2026-02").is_none());
    cache.invalidate();
    assert!(cache.is_empty());
}
