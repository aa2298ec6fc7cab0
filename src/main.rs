// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use spendview::api::TransactionClient;
use spendview::config::Settings;
use spendview::error::Surfaced;
use spendview::{cli, commands, db};

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("spendview=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("spendview=warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run() -> Result<()> {
    let matches = cli::build_cli().get_matches();
    init_logging(matches.get_flag("verbose"));

    let conn = db::open_or_init()?;
    let settings = Settings::resolve(
        &conn,
        matches.get_one::<String>("api_url").map(|s| s.as_str()),
        matches.get_one::<String>("currency").map(|s| s.as_str()),
    )?;
    tracing::debug!("using {} in {}", settings.api_url, settings.currency);
    let api = TransactionClient::new(&settings.api_url)?;

    match matches.subcommand() {
        Some(("tx", sub)) => commands::transactions::handle(&api, &settings, sub)?,
        Some(("category", sub)) => commands::categories::handle(&api, sub)?,
        Some(("currency", sub)) => commands::currency::handle(&conn, &api, &settings, sub)?,
        Some(("config", sub)) => commands::settings::handle(&conn, &settings, sub)?,
        Some(("report", sub)) => commands::reports::handle(&api, &settings, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&api, &settings, sub)?,
        Some(("ask", sub)) => commands::analysis::handle(&api, &settings, sub)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}

fn main() {
    if let Err(e) = run() {
        if e.downcast_ref::<Surfaced>().is_none() {
            eprintln!("error: {:#}", e);
        }
        std::process::exit(1);
    }
}
