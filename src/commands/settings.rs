// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::Settings;
use crate::utils::{pretty_table, set_api_url};
use anyhow::{bail, Result};
use rusqlite::Connection;

pub fn handle(conn: &Connection, settings: &Settings, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", _)) => {
            let rows = vec![
                vec!["api_url".to_string(), settings.api_url.clone()],
                vec!["currency".to_string(), settings.currency.clone()],
                vec![
                    "settings_db".to_string(),
                    crate::db::db_path()?.display().to_string(),
                ],
            ];
            println!("{}", pretty_table(&["Setting", "Value"], rows));
        }
        Some(("set-url", sub)) => {
            let url = sub.get_one::<String>("url").unwrap().trim();
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                bail!("Invalid URL '{}', expected http:// or https://", url);
            }
            set_api_url(conn, url)?;
            println!("API URL set to {}", url.trim_end_matches('/'));
        }
        _ => {}
    }
    Ok(())
}
