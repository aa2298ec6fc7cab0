// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ApiError;

/// A transaction as returned by `GET /api/transactions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(default)]
    pub id: i64,
    pub date: NaiveDate,
    pub merchant: String,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub amount: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    pub category: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(
        default,
        deserialize_with = "items_from_json_or_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub items: Option<Vec<ReceiptItem>>,
    #[serde(
        default,
        serialize_with = "rust_decimal::serde::float_option::serialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub tax: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receipt_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shop_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receipt_data: Option<String>,
}

impl Transaction {
    /// Recorded currency, or `preferred` when the server sent none.
    pub fn currency_or<'a>(&'a self, preferred: &'a str) -> &'a str {
        match self.currency.as_deref() {
            Some(c) if !c.is_empty() => c,
            _ => preferred,
        }
    }

    /// `YYYY-MM` bucket used by the monthly trend.
    pub fn month_key(&self) -> String {
        self.date.format("%Y-%m").to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptItem {
    pub name: String,
    #[serde(default = "one", serialize_with = "rust_decimal::serde::float::serialize")]
    pub quantity: Decimal,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub price: Decimal,
}

fn one() -> Decimal {
    Decimal::ONE
}

fn null_as_default<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(d)?.unwrap_or_default())
}

// The backend stores line items as JSON text, so they arrive either as an
// array or as a string holding one.
fn items_from_json_or_text<'de, D>(d: D) -> Result<Option<Vec<ReceiptItem>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(d)?;
    let parsed = match raw {
        None | Some(serde_json::Value::Null) => return Ok(None),
        Some(serde_json::Value::String(text)) if text.trim().is_empty() => return Ok(None),
        Some(serde_json::Value::String(text)) => serde_json::from_str::<Vec<ReceiptItem>>(&text),
        Some(v) => serde_json::from_value::<Vec<ReceiptItem>>(v),
    };
    match parsed {
        Ok(items) => Ok(Some(items)),
        Err(e) => {
            tracing::debug!("dropping unparsable receipt items: {}", e);
            Ok(None)
        }
    }
}

// Receipt extraction reports a missing date as "" and may use slashes.
fn date_or_none<'de, D>(d: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(d)? else {
        return Ok(None);
    };
    let text = raw.trim().replace('/', "-");
    if text.is_empty() {
        return Ok(None);
    }
    match NaiveDate::parse_from_str(&text, "%Y-%m-%d") {
        Ok(date) => Ok(Some(date)),
        Err(e) => {
            tracing::debug!("ignoring unreadable date '{}': {}", raw, e);
            Ok(None)
        }
    }
}

/// Body of `POST /api/transactions`, also the draft returned by a receipt scan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewTransaction {
    #[serde(
        default,
        deserialize_with = "date_or_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub merchant: String,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        serialize_with = "rust_decimal::serde::float::serialize"
    )]
    pub amount: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(
        default,
        deserialize_with = "items_from_json_or_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub items: Option<Vec<ReceiptItem>>,
    #[serde(
        default,
        serialize_with = "rust_decimal::serde::float_option::serialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub tax: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receipt_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shop_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receipt_data: Option<String>,
}

impl NewTransaction {
    /// Checks the fields that can be judged without the server.
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.merchant.trim().is_empty() {
            return Err(ApiError::Invalid("Please enter a merchant name".into()));
        }
        if self.amount <= Decimal::ZERO {
            return Err(ApiError::Invalid("Please enter a valid amount".into()));
        }
        if self.category.trim().is_empty() {
            return Err(ApiError::Invalid("Please select a category".into()));
        }
        Ok(())
    }

    /// Checks the category against the server-provided set.
    pub fn validate_category(&self, known: &[String]) -> Result<(), ApiError> {
        if known.iter().any(|c| c == &self.category) {
            Ok(())
        } else {
            Err(ApiError::Invalid(format!(
                "Unknown category '{}'",
                self.category
            )))
        }
    }

    /// Fills the defaults applied before submission.
    pub fn normalized(mut self, preferred_currency: &str) -> Self {
        self.merchant = self.merchant.trim().to_string();
        self.description = self.description.trim().to_string();
        if self.description.is_empty() {
            self.description = format!("Purchase from {}", self.merchant);
        }
        if self.currency.as_deref().is_none_or(|c| c.trim().is_empty()) {
            self.currency = Some(preferred_currency.to_string());
        }
        self
    }
}

/// Body of `PUT /api/transactions/{id}`; only set fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TransactionPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merchant: Option<String>,
    #[serde(
        serialize_with = "rust_decimal::serde::float_option::serialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub amount: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl TransactionPatch {
    pub fn is_empty(&self) -> bool {
        *self == TransactionPatch::default()
    }

    /// Same rules as [`NewTransaction::validate`], for the fields present.
    pub fn validate(&self) -> Result<(), ApiError> {
        if let Some(m) = &self.merchant {
            if m.trim().is_empty() {
                return Err(ApiError::Invalid("Please enter a merchant name".into()));
            }
        }
        if let Some(a) = self.amount {
            if a <= Decimal::ZERO {
                return Err(ApiError::Invalid("Please enter a valid amount".into()));
            }
        }
        if let Some(c) = &self.category {
            if c.trim().is_empty() {
                return Err(ApiError::Invalid("Please select a category".into()));
            }
        }
        Ok(())
    }
}

/// Query parameters of `GET /api/transactions` besides the currency.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListFilter {
    pub search: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            other => Err(ApiError::Invalid(format!(
                "Unknown format: {} (use csv|json)",
                other
            ))),
        }
    }
}

/// Conversion rates relative to `base`, as served by `GET /api/exchange-rates`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExchangeRates {
    pub base: String,
    pub rates: BTreeMap<String, f64>,
    pub last_updated: String,
}

/// Draft extracted from an uploaded receipt; not yet stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReceiptScan {
    pub transaction: NewTransaction,
    pub raw_text: Option<String>,
    pub financial_tips: Option<String>,
}
