// Copyright (c) Vino contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use vino::api::ApiClient;
use vino::config::Config;
use vino::session::SessionStore;
use vino::store::DataStore;
use vino::{cli, commands};

fn main() -> Result<()> {
    let matches = cli::build_cli().get_matches();
    vino::init_tracing(matches.get_flag("verbose"));

    let flag_url = matches.get_one::<String>("api-url").map(String::as_str);
    let cfg = Config::effective(flag_url)?;

    if let Some(("config", sub)) = matches.subcommand() {
        return commands::config::handle(&Config::default_path()?, &cfg, sub);
    }

    let api = ApiClient::new(&cfg.api_base_url)?;
    let mut store = DataStore::new(api, cfg);
    let sessions = SessionStore::open_default()?;
    if let Some(session) = sessions.restore()? {
        store.set_session(session);
    }

    match matches.subcommand() {
        Some(("login", sub)) => commands::auth::login(&mut store, &sessions, sub)?,
        Some(("logout", _)) => commands::auth::logout(&mut store, &sessions)?,
        Some(("whoami", _)) => commands::auth::whoami(&store)?,
        Some(("category", sub)) => commands::categories::handle(&mut store, sub)?,
        Some(("merchant", sub)) => commands::merchants::handle(&mut store, sub)?,
        Some(("rules", sub)) => commands::rules::handle(&mut store, sub)?,
        Some(("budget", sub)) => commands::budgets::handle(&mut store, sub)?,
        Some(("tx", sub)) => commands::transactions::handle(&mut store, sub)?,
        Some(("stats", sub)) => commands::stats::handle(&mut store, sub)?,
        Some(("dashboard", sub)) => commands::dashboard::handle(&mut store, sub)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
