// Copyright (c) Vino contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

static APP: Lazy<(&str, &str, &str)> = Lazy::new(|| ("com.vino", "Vino", "vino"));

pub const API_URL_ENV: &str = "VINO_API_URL";
pub const DEFAULT_API_URL: &str = "http://localhost:8000/api/v1";

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from(APP.0, APP.1, APP.2).context("Could not determine platform-specific dirs")
}

pub fn config_dir() -> Result<PathBuf> {
    let proj = project_dirs()?;
    let dir = proj.config_dir();
    fs::create_dir_all(dir).context("Failed to create config dir")?;
    Ok(dir.to_path_buf())
}

pub fn data_dir() -> Result<PathBuf> {
    let proj = project_dirs()?;
    let dir = proj.data_dir();
    fs::create_dir_all(dir).context("Failed to create data dir")?;
    Ok(dir.to_path_buf())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_base_url: String,
    pub currency: String,
    /// Categories requested from the dashboard breakdown.
    pub top_categories: u32,
    /// Recent movements requested from the dashboard breakdown.
    pub recent_limit: u32,
    /// Page size used when loading movements.
    pub movements_limit: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            currency: "ARS".to_string(),
            top_categories: 6,
            recent_limit: 5,
            movements_limit: 5000,
        }
    }
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        Ok(config_dir()?.join("config.json"))
    }

    /// Reads `path`; a missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        serde_json::from_str(&s).with_context(|| format!("parse {}", path.display()))
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
        }
        let s = serde_json::to_string_pretty(self).context("serialize config")?;
        fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
        Ok(())
    }

    /// Applies the environment and the command-line flag on top of the file
    /// value; the flag wins.
    pub fn with_overrides(mut self, env_url: Option<String>, flag_url: Option<&str>) -> Self {
        let nonblank = |u: &str| Some(u.trim().to_string()).filter(|u| !u.is_empty());
        let pick = flag_url.and_then(nonblank).or_else(|| env_url.as_deref().and_then(nonblank));
        if let Some(url) = pick {
            self.api_base_url = url;
        }
        self
    }

    /// File config plus `VINO_API_URL` and `--api-url`.
    pub fn effective(flag_url: Option<&str>) -> Result<Self> {
        let cfg = Self::load_from(&Self::default_path()?)?;
        Ok(cfg.with_overrides(std::env::var(API_URL_ENV).ok(), flag_url))
    }
}
