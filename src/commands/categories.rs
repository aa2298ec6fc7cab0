// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::api::TransactionApi;
use crate::commands::user_error;
use crate::utils::pretty_table;
use anyhow::Result;

pub fn handle(api: &dyn TransactionApi, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", _)) => {
            let categories = api
                .list_categories()
                .map_err(|e| user_error(e, "load expense categories"))?;
            let data = categories.into_iter().map(|c| vec![c]).collect();
            println!("{}", pretty_table(&["Category"], data));
        }
        _ => {}
    }
    Ok(())
}
