// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::api::TransactionApi;
use crate::commands::user_error;
use crate::config::Settings;
use crate::currency::is_supported;
use crate::models::ExchangeRates;
use crate::utils::{
    align_right, get_preferred_currency, maybe_print_json, parse_currency, pretty_table,
    set_preferred_currency,
};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(
    conn: &Connection,
    api: &dyn TransactionApi,
    settings: &Settings,
    m: &clap::ArgMatches,
) -> Result<()> {
    match m.subcommand() {
        Some(("show", _)) => {
            let stored = get_preferred_currency(conn)?;
            if stored == settings.currency {
                println!("Preferred currency: {}", stored);
            } else {
                println!(
                    "Preferred currency: {} (this run: {})",
                    stored, settings.currency
                );
            }
        }
        Some(("set", sub)) => {
            let ccy = set_currency(conn, sub.get_one::<String>("code").unwrap())?;
            println!("Preferred currency set to {}", ccy);
        }
        Some(("list", _)) => list_currencies(api, settings)?,
        Some(("rates", sub)) => {
            let base = match sub.get_one::<String>("base") {
                Some(code) => parse_currency(code)?,
                None => settings.currency.clone(),
            };
            let rates = load_rates(api, &base, sub.get_flag("refresh"))?;
            if !maybe_print_json(sub.get_flag("json"), false, &rates)? {
                print_rates(&rates);
            }
        }
        _ => {}
    }
    Ok(())
}

/// Validates and stores the preferred currency, returning the stored code.
pub fn set_currency(conn: &Connection, code: &str) -> Result<String> {
    let ccy = parse_currency(code)?;
    if !is_supported(&ccy) {
        tracing::warn!("{} is not converted by the backend; amounts may be unconverted", ccy);
    }
    set_preferred_currency(conn, &ccy)?;
    Ok(ccy)
}

fn list_currencies(api: &dyn TransactionApi, settings: &Settings) -> Result<()> {
    // Falls back to the built-in list when the backend is unreachable.
    let codes = api.list_currencies().unwrap_or_default();
    let data = codes
        .into_iter()
        .map(|c| {
            let marker = if c == settings.currency { "*" } else { "" };
            vec![c, marker.to_string()]
        })
        .collect();
    println!("{}", pretty_table(&["Currency", "Current"], data));
    Ok(())
}

/// Rates against `base`, optionally asking the backend to refresh them first.
pub fn load_rates(api: &dyn TransactionApi, base: &str, refresh: bool) -> Result<ExchangeRates> {
    if refresh {
        api.update_exchange_rates()
            .map_err(|e| user_error(e, "update exchange rates"))?;
        println!("Exchange rates updated successfully!");
    }
    api.exchange_rates(base)
        .map_err(|e| user_error(e, "fetch exchange rates"))
}

fn print_rates(rates: &ExchangeRates) {
    let data = rates
        .rates
        .iter()
        .map(|(code, rate)| vec![code.clone(), format!("{:.4}", rate)])
        .collect();
    let mut t = pretty_table(&["Currency", &format!("Per 1 {}", rates.base)], data);
    align_right(&mut t, &[1]);
    println!("{}", t);
    println!("Last updated: {}", rates.last_updated);
}
