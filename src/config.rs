// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;
use serde::Serialize;

use crate::currency::is_supported;
use crate::utils::{get_api_url, get_preferred_currency, parse_currency};

pub const API_URL_ENV: &str = "SPENDVIEW_API_URL";

/// Values every command runs with, resolved once at startup.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Settings {
    pub api_url: String,
    pub currency: String,
}

impl Settings {
    /// Flag > environment > stored setting > default.
    pub fn resolve(
        conn: &Connection,
        api_url_flag: Option<&str>,
        currency_flag: Option<&str>,
    ) -> Result<Settings> {
        let api_url = match api_url_flag {
            Some(u) => u.to_string(),
            None => match std::env::var(API_URL_ENV) {
                Ok(u) if !u.trim().is_empty() => u,
                _ => get_api_url(conn)?,
            },
        };
        let currency = match currency_flag {
            Some(c) => parse_currency(c)?,
            None => get_preferred_currency(conn)?,
        };
        if !is_supported(&currency) {
            tracing::warn!("currency {} is not in the supported list", currency);
        }
        Ok(Settings {
            api_url: api_url.trim().trim_end_matches('/').to_string(),
            currency,
        })
    }
}
