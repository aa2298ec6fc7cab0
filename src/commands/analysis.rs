// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use crate::api::TransactionApi;
use crate::commands::user_error;
use crate::config::Settings;
use crate::error::ApiError;

pub fn handle(api: &dyn TransactionApi, settings: &Settings, m: &clap::ArgMatches) -> Result<()> {
    let question = m
        .get_many::<String>("question")
        .map(|words| words.map(|w| w.as_str()).collect::<Vec<_>>().join(" "))
        .unwrap_or_default();
    let answer = ask(api, settings, &question)?;
    println!("{}", answer.trim());
    Ok(())
}

/// Sends the question with the display currency; blank questions are not sent.
pub fn ask(api: &dyn TransactionApi, settings: &Settings, question: &str) -> Result<String> {
    let question = question.trim();
    if question.is_empty() {
        let e = ApiError::Invalid("Please enter a question to analyze your finances.".into());
        return Err(user_error(e, "analyze finances"));
    }
    let answer = api
        .analyze(question, &settings.currency)
        .map_err(|e| user_error(e, "analyze finances"))?;
    tracing::info!("analysis answered ({} chars)", answer.len());
    Ok(answer)
}
