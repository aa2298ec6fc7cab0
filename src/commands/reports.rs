// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::io::BufRead;
use std::sync::mpsc;

use anyhow::Result;

use crate::api::TransactionApi;
use crate::config::Settings;
use crate::currency::format_money;
use crate::error::Surfaced;
use crate::report::aggregate::{month_label, AggregateGroup, GroupShare};
use crate::report::debounce::{next_settled, DEBOUNCE_DELAY};
use crate::report::{Period, ReportPipeline, ReportRequest, ReportSink, ReportSummary};
use crate::utils::{align_right, maybe_print_json, pretty_table};

pub fn handle(api: &dyn TransactionApi, settings: &Settings, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("watch", _)) => watch(api, settings),
        _ => once(api, settings, m),
    }
}

fn request_for(settings: &Settings, period: Period) -> ReportRequest {
    ReportRequest {
        currency: settings.currency.clone(),
        period,
    }
}

fn once(api: &dyn TransactionApi, settings: &Settings, m: &clap::ArgMatches) -> Result<()> {
    let json_flag = m.get_flag("json");
    let jsonl_flag = m.get_flag("jsonl");
    let period = Period::parse_lenient(m.get_one::<String>("period").map(|s| s.as_str()));
    let request = request_for(settings, period);

    let mut pipeline = ReportPipeline::with_system_clock();
    let outcome = if json_flag || jsonl_flag {
        pipeline.refresh(api, &request, &mut ErrorOnlySink)
    } else {
        pipeline.refresh(api, &request, &mut TerminalSink)
    };
    match outcome {
        Ok(report) => {
            maybe_print_json(json_flag, jsonl_flag, report)?;
            Ok(())
        }
        Err(e) => Err(Surfaced(e.to_string()).into()),
    }
}

fn watch(api: &dyn TransactionApi, settings: &Settings) -> Result<()> {
    let (tx, rx) = mpsc::channel::<String>();
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if line.trim().is_empty() {
                continue;
            }
            if tx.send(line).is_err() {
                break;
            }
        }
    });

    let mut pipeline = ReportPipeline::with_system_clock();
    let mut sink = TerminalSink;
    eprintln!("Enter a period (all, week, month, quarter, year); Ctrl-D to stop.");
    // A failed refresh has already been shown and keeps the previous report.
    pipeline
        .refresh(api, &request_for(settings, Period::All), &mut sink)
        .ok();
    while let Some(tag) = next_settled(&rx, DEBOUNCE_DELAY) {
        let period = Period::parse_lenient(Some(&tag));
        println!("--- period: {} ---", period);
        pipeline
            .refresh(api, &request_for(settings, period), &mut sink)
            .ok();
    }
    Ok(())
}

/// Prints each view as a table on stdout and errors on stderr.
pub struct TerminalSink;

impl ReportSink for TerminalSink {
    fn show_categories(&mut self, groups: &[GroupShare], currency: &str) {
        println!("Expenses by category");
        if groups.is_empty() {
            println!("No data available");
            return;
        }
        let rows = groups
            .iter()
            .map(|g| {
                vec![
                    g.key.clone(),
                    format_money(g.total, currency),
                    format!("{:.1}%", g.percent),
                ]
            })
            .collect();
        let mut t = pretty_table(&["Category", "Amount", "Share"], rows);
        align_right(&mut t, &[1, 2]);
        println!("{}", t);
    }

    fn show_monthly(&mut self, groups: &[AggregateGroup], currency: &str) {
        println!("Monthly trend");
        let rows = groups
            .iter()
            .map(|g| vec![month_label(&g.key), format_money(g.total, currency)])
            .collect();
        let mut t = pretty_table(&["Month", "Expenses"], rows);
        align_right(&mut t, &[1]);
        println!("{}", t);
    }

    fn show_top_merchants(&mut self, groups: &[AggregateGroup], currency: &str) {
        println!("Top merchants");
        let rows = groups
            .iter()
            .map(|g| vec![g.key.clone(), format_money(g.total, currency)])
            .collect();
        let mut t = pretty_table(&["Merchant", "Spent"], rows);
        align_right(&mut t, &[1]);
        println!("{}", t);
    }

    fn show_summary(&mut self, summary: &ReportSummary, currency: &str) {
        let extreme = |amount, merchant: &Option<String>| match merchant {
            Some(m) if summary.count > 0 => format!("{} at {}", format_money(amount, currency), m),
            _ => format_money(amount, currency),
        };
        let rows = vec![
            vec!["Transactions".to_string(), summary.count.to_string()],
            vec!["Total spent".to_string(), format_money(summary.total, currency)],
            vec![
                "Average transaction".to_string(),
                format_money(summary.average, currency),
            ],
            vec![
                "Largest expense".to_string(),
                extreme(summary.max_transaction.amount, &summary.max_transaction.merchant),
            ],
            vec![
                "Smallest expense".to_string(),
                extreme(summary.min_transaction.amount, &summary.min_transaction.merchant),
            ],
        ];
        println!("Summary");
        println!("{}", pretty_table(&["Metric", "Value"], rows));
    }

    fn show_error(&mut self, message: &str) {
        eprintln!("error: {}", message);
    }
}

/// Used with `--json`: views are printed as one document afterwards.
struct ErrorOnlySink;

impl ReportSink for ErrorOnlySink {
    fn show_categories(&mut self, _: &[GroupShare], _: &str) {}
    fn show_monthly(&mut self, _: &[AggregateGroup], _: &str) {}
    fn show_top_merchants(&mut self, _: &[AggregateGroup], _: &str) {}
    fn show_summary(&mut self, _: &ReportSummary, _: &str) {}

    fn show_error(&mut self, message: &str) {
        eprintln!("error: {}", message);
    }
}
