// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::path::Path;

use anyhow::{bail, Result};

use crate::api::TransactionApi;
use crate::commands::user_error;
use crate::config::Settings;
use crate::currency::format_money;
use crate::models::{ListFilter, NewTransaction, ReceiptScan, Transaction, TransactionPatch};
use crate::utils::{maybe_print_json, parse_currency, parse_date, parse_decimal, pretty_table};

pub fn handle(api: &dyn TransactionApi, settings: &Settings, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => list(api, settings, sub)?,
        Some(("add", sub)) => add(api, settings, sub)?,
        Some(("edit", sub)) => edit(api, sub)?,
        Some(("rm", sub)) => remove(api, sub)?,
        Some(("scan", sub)) => scan(api, settings, sub)?,
        _ => {}
    }
    Ok(())
}

fn list(api: &dyn TransactionApi, settings: &Settings, sub: &clap::ArgMatches) -> Result<()> {
    let data = query_rows(api, settings, sub)?;
    if sub.get_flag("csv") {
        let mut wtr = csv::Writer::from_writer(std::io::stdout());
        wtr.write_record([
            "id", "date", "merchant", "amount", "currency", "category", "description",
        ])?;
        for t in &data {
            wtr.write_record([
                t.id.to_string(),
                t.date.to_string(),
                t.merchant.clone(),
                t.amount.to_string(),
                t.currency_or(&settings.currency).to_string(),
                t.category.clone(),
                t.description.clone(),
            ])?;
        }
        wtr.flush()?;
        return Ok(());
    }
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        return Ok(());
    }
    if data.is_empty() {
        println!("No transactions found.");
        return Ok(());
    }
    let rows: Vec<Vec<String>> = data
        .iter()
        .map(|t| {
            vec![
                t.id.to_string(),
                t.date.format("%b %-d, %Y").to_string(),
                t.merchant.clone(),
                t.category.clone(),
                t.description.clone(),
                format_money(t.amount, t.currency_or(&settings.currency)),
            ]
        })
        .collect();
    let mut table = pretty_table(
        &["ID", "Date", "Merchant", "Category", "Description", "Amount"],
        rows,
    );
    crate::utils::align_right(&mut table, &[5]);
    println!("{}", table);
    Ok(())
}

/// Transactions matching the list filters, newest first.
pub fn query_rows(
    api: &dyn TransactionApi,
    settings: &Settings,
    sub: &clap::ArgMatches,
) -> Result<Vec<Transaction>> {
    let filter = ListFilter {
        search: sub.get_one::<String>("search").cloned(),
        category: sub.get_one::<String>("category").cloned(),
    };
    let mut data = api
        .list(&settings.currency, &filter)
        .map_err(|e| user_error(e, "load transactions"))?;
    data.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| b.id.cmp(&a.id)));
    if let Some(limit) = sub.get_one::<usize>("limit") {
        data.truncate(*limit);
    }
    Ok(data)
}

/// Builds the submission body from `tx add` arguments.
pub fn draft_from_args(sub: &clap::ArgMatches) -> Result<NewTransaction> {
    let text = |name: &str| sub.get_one::<String>(name).cloned();
    Ok(NewTransaction {
        date: text("date").map(|d| parse_date(&d)).transpose()?,
        merchant: text("merchant").unwrap_or_default(),
        amount: match text("amount") {
            Some(a) => parse_decimal(&a)?,
            None => Default::default(),
        },
        currency: text("tx_currency").map(|c| parse_currency(&c)).transpose()?,
        category: text("category").unwrap_or_default(),
        description: text("description").unwrap_or_default(),
        notes: text("notes"),
        ..Default::default()
    })
}

/// Validates, normalizes and stores a new transaction. Nothing is sent when
/// the local checks fail.
pub fn submit(
    api: &dyn TransactionApi,
    settings: &Settings,
    draft: NewTransaction,
) -> Result<Option<Transaction>> {
    let draft = draft.normalized(&settings.currency);
    draft.validate().map_err(|e| user_error(e, "add transaction"))?;
    let known = api
        .list_categories()
        .map_err(|e| user_error(e, "load expense categories"))?;
    draft
        .validate_category(&known)
        .map_err(|e| user_error(e, "add transaction"))?;
    let created = api
        .create(&draft)
        .map_err(|e| user_error(e, "add transaction"))?;
    tracing::info!(
        "created transaction: {} {} at {}",
        draft.amount,
        draft.currency.as_deref().unwrap_or_default(),
        draft.merchant
    );
    Ok(created)
}

fn add(api: &dyn TransactionApi, settings: &Settings, sub: &clap::ArgMatches) -> Result<()> {
    let draft = draft_from_args(sub)?;
    match submit(api, settings, draft)? {
        Some(t) => println!(
            "Transaction added successfully! #{} {} at '{}' on {}",
            t.id,
            format_money(t.amount, t.currency_or(&settings.currency)),
            t.merchant,
            t.date
        ),
        None => println!("Transaction added successfully!"),
    }
    Ok(())
}

pub fn patch_from_args(sub: &clap::ArgMatches) -> Result<TransactionPatch> {
    let text = |name: &str| sub.get_one::<String>(name).cloned();
    Ok(TransactionPatch {
        date: text("date").map(|d| parse_date(&d)).transpose()?,
        merchant: text("merchant").map(|m| m.trim().to_string()),
        amount: text("amount").map(|a| parse_decimal(&a)).transpose()?,
        currency: text("tx_currency").map(|c| parse_currency(&c)).transpose()?,
        category: text("category"),
        description: text("description"),
        notes: text("notes"),
    })
}

fn edit(api: &dyn TransactionApi, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let patch = patch_from_args(sub)?;
    if patch.is_empty() {
        bail!("Nothing to update for transaction {}", id);
    }
    patch
        .validate()
        .map_err(|e| user_error(e, "update transaction"))?;
    if let Some(category) = &patch.category {
        let known = api
            .list_categories()
            .map_err(|e| user_error(e, "load expense categories"))?;
        if !known.contains(category) {
            bail!("Unknown category '{}'", category);
        }
    }
    api.update(id, &patch)
        .map_err(|e| user_error(e, "update transaction"))?;
    println!("Transaction {} updated successfully!", id);
    Ok(())
}

fn remove(api: &dyn TransactionApi, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    api.delete(id)
        .map_err(|e| user_error(e, "delete transaction"))?;
    println!("Transaction {} deleted.", id);
    Ok(())
}

fn scan(api: &dyn TransactionApi, settings: &Settings, sub: &clap::ArgMatches) -> Result<()> {
    let path = Path::new(sub.get_one::<String>("file").unwrap().trim());
    let scan = api
        .scan_receipt(path, &settings.currency)
        .map_err(|e| user_error(e, "upload receipt"))?;
    if sub.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&scan)?);
    } else {
        print_scan(&scan, &settings.currency);
    }
    if sub.get_flag("save") {
        let created = submit(api, settings, scan.transaction)?;
        match created {
            Some(t) => println!("Saved as transaction #{}", t.id),
            None => println!("Transaction added successfully!"),
        }
    }
    Ok(())
}

fn print_scan(scan: &ReceiptScan, preferred: &str) {
    let t = &scan.transaction;
    let ccy = t.currency.as_deref().unwrap_or(preferred);
    let mut rows = vec![
        vec!["Merchant".to_string(), t.merchant.clone()],
        vec![
            "Date".to_string(),
            t.date.map(|d| d.to_string()).unwrap_or_default(),
        ],
        vec!["Amount".to_string(), format_money(t.amount, ccy)],
        vec!["Category".to_string(), t.category.clone()],
        vec!["Description".to_string(), t.description.clone()],
    ];
    if let Some(tax) = t.tax {
        rows.push(vec!["Tax".to_string(), format_money(tax, ccy)]);
    }
    for item in t.items.iter().flatten() {
        rows.push(vec![
            format!("  {} x{}", item.name, item.quantity.normalize()),
            format_money(item.price, ccy),
        ]);
    }
    println!("Receipt processed successfully!");
    println!("{}", pretty_table(&["Field", "Value"], rows));
    if let Some(tips) = scan.financial_tips.as_deref().filter(|s| !s.trim().is_empty()) {
        println!("{}", tips.trim());
    }
}
