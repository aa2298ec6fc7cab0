// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{Days, Months, NaiveDate};
use serde::Serialize;

use crate::models::Transaction;

/// Relative reporting window ending today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    #[default]
    All,
    Week,
    Month,
    Quarter,
    Year,
}

impl Period {
    /// Unknown or missing tags mean "all".
    pub fn parse_lenient(tag: Option<&str>) -> Period {
        match tag.map(|t| t.trim().to_lowercase()).as_deref() {
            Some("week") => Period::Week,
            Some("month") => Period::Month,
            Some("quarter") => Period::Quarter,
            Some("year") => Period::Year,
            _ => Period::All,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Period::All => "all",
            Period::Week => "week",
            Period::Month => "month",
            Period::Quarter => "quarter",
            Period::Year => "year",
        }
    }

    /// First day inside the window, `None` for [`Period::All`].
    ///
    /// Month arithmetic clamps to the end of shorter months
    /// (e.g. 31 March minus one month is 29 February in a leap year).
    pub fn cutoff(&self, today: NaiveDate) -> Option<NaiveDate> {
        match self {
            Period::All => None,
            Period::Week => today.checked_sub_days(Days::new(7)),
            Period::Month => today.checked_sub_months(Months::new(1)),
            Period::Quarter => today.checked_sub_months(Months::new(3)),
            Period::Year => today.checked_sub_months(Months::new(12)),
        }
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transactions dated within `[cutoff, today]`, both ends inclusive.
/// [`Period::All`] returns the input unchanged.
pub fn filter_by_period(
    transactions: &[Transaction],
    period: Period,
    today: NaiveDate,
) -> Vec<Transaction> {
    let Some(cutoff) = period.cutoff(today) else {
        return transactions.to_vec();
    };
    transactions
        .iter()
        .filter(|t| t.date >= cutoff && t.date <= today)
        .cloned()
        .collect()
}
