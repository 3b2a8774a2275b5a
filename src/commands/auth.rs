// Copyright (c) Vino contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::req;
use crate::session::{session_from_login, SessionStore};
use crate::store::DataStore;
use anyhow::{Context, Result};
use std::io::{self, Write};

fn prompt_secret(label: &str) -> Result<String> {
    print!("{}: ", label);
    io::stdout().flush().ok();
    let mut s = String::new();
    io::stdin().read_line(&mut s).context("read password")?;
    Ok(s.trim_end_matches(['\r', '\n']).to_string())
}

pub fn login(store: &mut DataStore, sessions: &SessionStore, sub: &clap::ArgMatches) -> Result<()> {
    let username = req(sub, "username")?;
    if username.is_empty() {
        eprintln!("username is required");
        return Ok(());
    }
    let password = match sub.get_one::<String>("password") {
        Some(p) => p.clone(),
        None => prompt_secret("Password")?,
    };
    let resp = store.api().login(username, &password).context("Login failed")?;
    let session = session_from_login(username, resp);
    sessions.save(&session)?;
    println!("Signed in as {} ({})", session.user.name, session.user.id);
    store.set_session(session);
    Ok(())
}

pub fn logout(store: &mut DataStore, sessions: &SessionStore) -> Result<()> {
    sessions.clear()?;
    store.clear_session();
    println!("Signed out");
    Ok(())
}

pub fn whoami(store: &DataStore) -> Result<()> {
    match store.session() {
        Some(s) => {
            println!("{} <{}>", s.user.name, s.user.email);
            println!("id: {}", s.user.id);
        }
        None => println!("Not signed in"),
    }
    Ok(())
}
