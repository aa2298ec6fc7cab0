// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Grouping of transactions into per-key totals.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::Transaction;

/// Number of merchants kept by [`top_merchants`].
pub const TOP_MERCHANTS: usize = 10;

/// Dimension a report view groups by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKey {
    Category,
    Month,
    Merchant,
}

impl GroupKey {
    fn key_of(&self, t: &Transaction) -> String {
        match self {
            GroupKey::Category => t.category.clone(),
            GroupKey::Month => t.month_key(),
            GroupKey::Merchant => t.merchant.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateGroup {
    pub key: String,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub total: Decimal,
}

/// Group with its share of the grand total, in percent (one decimal).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupShare {
    pub key: String,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub total: Decimal,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub percent: Decimal,
}

/// Sums `amount` per key.
pub fn aggregate(transactions: &[Transaction], key: GroupKey) -> HashMap<String, Decimal> {
    let mut totals: HashMap<String, Decimal> = HashMap::new();
    for t in transactions {
        *totals.entry(key.key_of(t)).or_insert(Decimal::ZERO) += t.amount;
    }
    totals
}

// Largest total first; equal totals fall back to key order so output is stable.
fn sorted_desc(totals: HashMap<String, Decimal>) -> Vec<AggregateGroup> {
    let mut groups: Vec<AggregateGroup> = totals
        .into_iter()
        .map(|(key, total)| AggregateGroup { key, total })
        .collect();
    groups.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.key.cmp(&b.key)));
    groups
}

pub fn by_category(transactions: &[Transaction]) -> Vec<AggregateGroup> {
    sorted_desc(aggregate(transactions, GroupKey::Category))
}

/// Monthly totals in chronological order.
pub fn by_month(transactions: &[Transaction]) -> Vec<AggregateGroup> {
    let mut groups: Vec<AggregateGroup> = aggregate(transactions, GroupKey::Month)
        .into_iter()
        .map(|(key, total)| AggregateGroup { key, total })
        .collect();
    // `YYYY-MM` sorts chronologically as text.
    groups.sort_by(|a, b| a.key.cmp(&b.key));
    groups
}

pub fn top_merchants(transactions: &[Transaction], limit: usize) -> Vec<AggregateGroup> {
    let mut groups = sorted_desc(aggregate(transactions, GroupKey::Merchant));
    groups.truncate(limit);
    groups
}

/// `part` as a percentage of `total`; zero when `total` is zero.
pub fn percent_of(part: Decimal, total: Decimal) -> Decimal {
    if total.is_zero() {
        return Decimal::ZERO;
    }
    (part / total * Decimal::ONE_HUNDRED).round_dp(1)
}

pub fn with_shares(groups: &[AggregateGroup]) -> Vec<GroupShare> {
    let total: Decimal = groups.iter().map(|g| g.total).sum();
    groups
        .iter()
        .map(|g| GroupShare {
            key: g.key.clone(),
            total: g.total,
            percent: percent_of(g.total, total),
        })
        .collect()
}

/// `2024-01` -> `Jan 2024`. Keys that are not a month are returned as is.
pub fn month_label(key: &str) -> String {
    NaiveDate::parse_from_str(&format!("{}-01", key), "%Y-%m-%d")
        .map(|d| d.format("%b %Y").to_string())
        .unwrap_or_else(|_| key.to_string())
}
