// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::Transaction;

/// Largest or smallest transaction of a report. An empty report carries a
/// zero-amount placeholder with no merchant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Extreme {
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub amount: Decimal,
    pub merchant: Option<String>,
    pub id: Option<i64>,
}

impl Extreme {
    fn placeholder() -> Self {
        Extreme {
            amount: Decimal::ZERO,
            merchant: None,
            id: None,
        }
    }

    fn of(t: &Transaction) -> Self {
        Extreme {
            amount: t.amount,
            merchant: Some(t.merchant.clone()),
            id: Some(t.id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSummary {
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub total: Decimal,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub average: Decimal,
    pub count: usize,
    pub max_transaction: Extreme,
    pub min_transaction: Extreme,
}

/// Total, count, average and extremes. Ties on an extreme keep the first
/// transaction encountered.
pub fn summarize(transactions: &[Transaction]) -> ReportSummary {
    let total: Decimal = transactions.iter().map(|t| t.amount).sum();
    let count = transactions.len();
    let average = if count == 0 {
        Decimal::ZERO
    } else {
        total / Decimal::from(count)
    };

    let mut max: Option<&Transaction> = None;
    let mut min: Option<&Transaction> = None;
    for t in transactions {
        if max.is_none_or(|m| t.amount > m.amount) {
            max = Some(t);
        }
        if min.is_none_or(|m| t.amount < m.amount) {
            min = Some(t);
        }
    }

    ReportSummary {
        total,
        average,
        count,
        max_transaction: max.map(Extreme::of).unwrap_or_else(Extreme::placeholder),
        min_transaction: min.map(Extreme::of).unwrap_or_else(Extreme::placeholder),
    }
}
