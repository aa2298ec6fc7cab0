// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Display formatting for money amounts.

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::{Decimal, RoundingStrategy};

pub const DEFAULT_CURRENCY: &str = "USD";

/// Currencies the backend converts between.
pub const SUPPORTED_CURRENCIES: [&str; 9] =
    ["USD", "EUR", "JPY", "GBP", "AUD", "CAD", "CHF", "CNY", "INR"];

static CODE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z]{3}$").unwrap());

/// Upper-cased ISO 4217 code, or `None` if `s` is not three letters.
pub fn normalize_code(s: &str) -> Option<String> {
    let s = s.trim();
    if CODE_RE.is_match(s) {
        Some(s.to_uppercase())
    } else {
        None
    }
}

pub fn is_supported(code: &str) -> bool {
    SUPPORTED_CURRENCIES.contains(&code)
}

// Symbols as en-US number formatting renders them. Codes without a narrow
// symbol are printed as the code followed by a space.
fn prefix(code: &str) -> String {
    match code {
        "USD" => "$".into(),
        "EUR" => "€".into(),
        "GBP" => "£".into(),
        "JPY" => "¥".into(),
        "AUD" => "A$".into(),
        "CAD" => "CA$".into(),
        "CNY" => "CN¥".into(),
        "INR" => "₹".into(),
        other => format!("{} ", other),
    }
}

/// Formats `amount` with two decimals, thousands separators and the
/// currency symbol, e.g. `-$1,234.50` or `CHF 12.00`.
pub fn format_money(amount: Decimal, code: &str) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let digits = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((&digits, "00"));
    format!(
        "{}{}{}.{}",
        sign,
        prefix(&code.to_uppercase()),
        group_thousands(int_part),
        frac_part
    )
}

fn group_thousands(int_part: &str) -> String {
    let len = int_part.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
