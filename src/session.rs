// Copyright (c) Vino contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Persisted login: one file per key inside the data directory.

use crate::config;
use crate::models::{Session, User};
use crate::wire::LoginResponse;
use anyhow::{Context, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub const TOKEN_KEY: &str = "finanzas_token";
pub const USER_KEY: &str = "finanzas_user";

#[derive(Debug, Clone)]
pub struct SessionStore {
    dir: PathBuf,
}

impl SessionStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store rooted in the platform data directory.
    pub fn open_default() -> Result<Self> {
        Ok(Self::new(config::data_dir()?))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }

    fn read_key(&self, key: &str) -> Result<Option<String>> {
        let p = self.key_path(key);
        match fs::read_to_string(&p) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("read {}", p.display())),
        }
    }

    /// The saved session, when both keys are present and the user record parses.
    pub fn restore(&self) -> Result<Option<Session>> {
        let (Some(token), Some(user_json)) = (self.read_key(TOKEN_KEY)?, self.read_key(USER_KEY)?)
        else {
            return Ok(None);
        };
        let token = token.trim().to_string();
        if token.is_empty() {
            return Ok(None);
        }
        match serde_json::from_str::<User>(&user_json) {
            Ok(user) => {
                tracing::info!(user = %user.id, "session restored");
                Ok(Some(Session { token, user }))
            }
            Err(e) => {
                tracing::warn!(error = %e, "stored user is unreadable; ignoring session");
                Ok(None)
            }
        }
    }

    pub fn save(&self, session: &Session) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("create {}", self.dir.display()))?;
        let tp = self.key_path(TOKEN_KEY);
        fs::write(&tp, &session.token).with_context(|| format!("write {}", tp.display()))?;
        let up = self.key_path(USER_KEY);
        let s = serde_json::to_string(&session.user)?;
        fs::write(&up, s).with_context(|| format!("write {}", up.display()))?;
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        for key in [TOKEN_KEY, USER_KEY] {
            let p = self.key_path(key);
            match fs::remove_file(&p) {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(e).with_context(|| format!("remove {}", p.display())),
            }
        }
        tracing::info!("session cleared");
        Ok(())
    }
}

/// Builds the session user from a login response. Missing pieces fall back to
/// the username that was typed.
pub fn user_from_login(username: &str, resp: &LoginResponse) -> User {
    let username = username.trim();
    let Some(u) = resp.user.as_ref() else {
        return User {
            id: username.to_string(),
            name: username.to_string(),
            email: String::new(),
        };
    };
    let full = format!("{} {}", u.nombre, u.apellido).trim().to_string();
    User {
        id: if u.id.is_empty() { username.to_string() } else { u.id.clone() },
        name: if u.nombre.trim().is_empty() { username.to_string() } else { full },
        email: u.gmail.clone(),
    }
}

pub fn session_from_login(username: &str, resp: LoginResponse) -> Session {
    let user = user_from_login(username, &resp);
    Session { token: resp.access_token, user }
}
