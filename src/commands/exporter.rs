// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};

use crate::api::TransactionApi;
use crate::commands::user_error;
use crate::config::Settings;
use crate::models::ExportFormat;

pub fn handle(api: &dyn TransactionApi, settings: &Settings, m: &clap::ArgMatches) -> Result<()> {
    let fmt: ExportFormat = m
        .get_one::<String>("format")
        .unwrap()
        .parse()
        .map_err(|e| user_error(e, "export data"))?;
    let out = m.get_one::<String>("out").unwrap().trim();

    let bytes = api
        .export(fmt, &settings.currency)
        .map_err(|e| user_error(e, "export data"))?;
    std::fs::write(out, &bytes).with_context(|| format!("Failed to write {}", out))?;
    tracing::info!("wrote {} bytes of {} export", bytes.len(), fmt.as_str());
    println!("Exported transactions to {}", out);
    Ok(())
}
