// Copyright (c) Vino contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod common;

use std::fs;
use tempfile::TempDir;
use vino::cli;
use vino::commands::auth;
use vino::session::{session_from_login, user_from_login, SessionStore, TOKEN_KEY, USER_KEY};
use vino::wire::LoginResponse;

fn login_response(json: &str) -> LoginResponse {
    serde_json::from_str(json).unwrap()
}

#[test]
fn save_restore_clear() {
    let dir = TempDir::new().unwrap();
    let store = SessionStore::new(dir.path());
    assert!(store.restore().unwrap().is_none());

    store.save(&common::session()).unwrap();
    assert_eq!(fs::read_to_string(dir.path().join(TOKEN_KEY)).unwrap(), "tok-123");
    assert_eq!(store.restore().unwrap(), Some(common::session()));

    store.clear().unwrap();
    assert!(!dir.path().join(USER_KEY).exists());
    assert!(store.restore().unwrap().is_none());
    // clearing twice is fine
    store.clear().unwrap();
}

#[test]
fn both_keys_are_required() {
    let dir = TempDir::new().unwrap();
    let store = SessionStore::new(dir.path());
    fs::write(dir.path().join(TOKEN_KEY), "tok").unwrap();
    assert!(store.restore().unwrap().is_none());

    fs::write(dir.path().join(USER_KEY), "not json").unwrap();
    assert!(store.restore().unwrap().is_none());
}

#[test]
fn user_is_derived_from_login_profile() {
    let full = login_response(
        r#"{"access_token":"t","user":{"id":7,"nombre":"Ana","apellido":"Paz","gmail":"ana@example.com"}}"#,
    );
    let u = user_from_login(" ana ", &full);
    assert_eq!(u.id, "7");
    assert_eq!(u.name, "Ana Paz");
    assert_eq!(u.email, "ana@example.com");

    let no_name = login_response(r#"{"access_token":"t","user":{"nombre":"","apellido":"Paz"}}"#);
    let u = user_from_login("ana", &no_name);
    assert_eq!(u.id, "ana");
    assert_eq!(u.name, "ana");
    assert_eq!(u.email, "");

    let bare = session_from_login("ana", login_response(r#"{"access_token":"t"}"#));
    assert_eq!(bare.token, "t");
    assert_eq!(bare.user.name, "ana");
}

#[test]
fn login_command_persists_session_and_authenticates_store() {
    let backend = common::serve(|method, route| {
        if method == "POST" && route == "/auth/login" {
            return (
                200,
                r#"{"access_token":"fresh","user":{"id":"u1","nombre":"Ana","apellido":"","gmail":""}}"#.to_string(),
            );
        }
        common::fixture(method, route).unwrap_or((200, "{}".to_string()))
    });
    let dir = TempDir::new().unwrap();
    let sessions = SessionStore::new(dir.path());
    let api = vino::api::ApiClient::new(&backend.url).unwrap();
    let mut store = vino::store::DataStore::new(api, vino::config::Config::default());

    let matches = cli::build_cli().get_matches_from([
        "vino", "login", "--username", " ana ", "--password", "secret",
    ]);
    if let Some(("login", sub)) = matches.subcommand() {
        auth::login(&mut store, &sessions, sub).unwrap();
    } else {
        panic!("login command not parsed");
    }

    let login = &backend.requests()[0];
    assert!(login.authorization.is_none());
    assert_eq!(login.json(), serde_json::json!({"username": "ana", "password": "secret"}));
    assert_eq!(store.api().token(), Some("fresh"));
    assert_eq!(sessions.restore().unwrap().unwrap().user.name, "Ana");

    auth::logout(&mut store, &sessions).unwrap();
    assert!(store.session().is_none());
    assert!(sessions.restore().unwrap().is_none());
}

#[test]
fn wrong_credentials_report_backend_detail() {
    let backend = common::serve(|_, _| (401, r#"{"detail":"Usuario o contraseña incorrectos"}"#.to_string()));
    let dir = TempDir::new().unwrap();
    let sessions = SessionStore::new(dir.path());
    let api = vino::api::ApiClient::new(&backend.url).unwrap();
    let mut store = vino::store::DataStore::new(api, vino::config::Config::default());
    let matches = cli::build_cli().get_matches_from(["vino", "login", "-u", "ana", "-p", "x"]);
    let Some(("login", sub)) = matches.subcommand() else {
        panic!("login command not parsed");
    };
    let err = auth::login(&mut store, &sessions, sub).unwrap_err();
    assert!(format!("{:#}", err).contains("Usuario o contraseña incorrectos"));
    assert!(sessions.restore().unwrap().is_none());
}
