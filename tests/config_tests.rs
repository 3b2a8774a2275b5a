// Copyright (c) Vino contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use tempfile::TempDir;
use vino::config::{Config, DEFAULT_API_URL};

#[test]
fn missing_file_gives_defaults() {
    let dir = TempDir::new().unwrap();
    let cfg = Config::load_from(&dir.path().join("config.json")).unwrap();
    assert_eq!(cfg, Config::default());
    assert_eq!(cfg.api_base_url, DEFAULT_API_URL);
    assert_eq!(cfg.currency, "ARS");
}

#[test]
fn saved_config_loads_back_and_fills_gaps() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("config.json");
    let cfg = Config {
        api_base_url: "https://finanzas.example/api/v1".into(),
        currency: "USD".into(),
        ..Config::default()
    };
    cfg.save_to(&path).unwrap();
    assert_eq!(Config::load_from(&path).unwrap(), cfg);

    std::fs::write(&path, r#"{"currency": "EUR"}"#).unwrap();
    let partial = Config::load_from(&path).unwrap();
    assert_eq!(partial.currency, "EUR");
    assert_eq!(partial.movements_limit, 5000);
}

#[test]
fn broken_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, "{").unwrap();
    assert!(Config::load_from(&path).is_err());
}

#[test]
fn flag_beats_environment_beats_file() {
    let base = Config::default();
    let env = Some("http://env:1".to_string());
    assert_eq!(base.clone().with_overrides(env.clone(), Some("http://flag:2")).api_base_url, "http://flag:2");
    assert_eq!(base.clone().with_overrides(env.clone(), None).api_base_url, "http://env:1");
    assert_eq!(base.clone().with_overrides(env, Some("  ")).api_base_url, "http://env:1");
    assert_eq!(base.with_overrides(Some(String::new()), None).api_base_url, DEFAULT_API_URL);
}
