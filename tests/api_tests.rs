// Copyright (c) Vino contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod common;

use vino::api::{ApiClient, ListFilter};
use vino::error::ApiError;

fn client(backend: &common::Backend, token: Option<&str>) -> ApiClient {
    let mut api = ApiClient::new(&format!("{}/", backend.url)).unwrap();
    api.set_token(token.map(str::to_string));
    api
}

#[test]
fn login_is_unauthenticated_and_trims_username() {
    let backend = common::serve(|_, _| (200, r#"{"access_token":"abc"}"#.to_string()));
    let resp = client(&backend, None).login("  ana ", "pw").unwrap();
    assert_eq!(resp.access_token, "abc");
    assert!(resp.user.is_none());
    let req = &backend.requests()[0];
    assert_eq!(req.method, "POST");
    assert_eq!(req.path, "/auth/login");
    assert!(req.authorization.is_none());
    assert_eq!(req.json()["username"], "ana");
}

#[test]
fn protected_calls_need_a_token() {
    let backend = common::fixture_backend();
    let err = client(&backend, None).list_categories().unwrap_err();
    assert!(matches!(err, ApiError::NotAuthenticated));
    assert!(backend.requests().is_empty());

    let cats = client(&backend, Some("tok")).list_categories().unwrap();
    assert_eq!(cats.len(), 2);
    assert_eq!(cats[0].id, "1");
    assert_eq!(backend.requests()[0].authorization.as_deref(), Some("Bearer tok"));
}

#[test]
fn error_detail_or_reason_is_surfaced() {
    let backend = common::serve(|_, route| match route {
        "/presupuestos" => (400, r#"{"detail":"Ya existe un presupuesto"}"#.to_string()),
        "/comercios" => (400, r#"{"detail":""}"#.to_string()),
        _ => (404, "not json".to_string()),
    });
    let api = client(&backend, Some("tok"));
    let err = api.list_budgets(&ListFilter::default()).unwrap_err();
    assert_eq!(err.status(), Some(400));
    assert!(err.to_string().contains("Ya existe un presupuesto"));

    let err = api.list_merchants().unwrap_err();
    assert_eq!(err.to_string(), "Bad Request (HTTP 400)");

    let err = api.delete_rule("r1").unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert!(err.to_string().contains("Not Found"));
}

#[test]
fn empty_write_response_is_accepted() {
    let backend = common::serve(|_, _| (200, String::new()));
    let api = client(&backend, Some("tok"));
    api.delete_budget("b1").unwrap();
    api.invalidate_movement_cache().unwrap();
    let paths: Vec<String> = backend.requests().into_iter().map(|r| r.path).collect();
    assert_eq!(paths, ["/presupuestos/b1", "/movimientos/invalidate-cache"]);
}

#[test]
fn list_filters_become_query_parameters() {
    let backend = common::serve(|_, _| (200, "[]".to_string()));
    let api = client(&backend, Some("tok"));
    let filter = ListFilter { period: Some("2026-02"), category_id: Some("1"), subcategory_id: Some(""), ..Default::default() };
    api.list_budgets(&filter).unwrap();
    assert_eq!(backend.requests()[0].path, "/presupuestos?mes_anio=2026-02&categoria_id=1");
}
