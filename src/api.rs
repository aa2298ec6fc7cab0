// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! HTTP client for the expense backend.

use std::collections::BTreeMap;
use std::path::Path;

use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::currency::SUPPORTED_CURRENCIES;
use crate::error::ApiError;
use crate::models::{
    ExchangeRates, ExportFormat, ListFilter, NewTransaction, ReceiptScan, Transaction,
    TransactionPatch,
};
use crate::utils::http_client;

/// Operations the rest of the crate needs from the backend.
///
/// Every call is a single request/response; implementations report
/// non-2xx statuses and network errors as [`ApiError::Transport`] and
/// `{"success": false}` payloads as [`ApiError::Rejected`].
pub trait TransactionApi {
    fn list(&self, currency: &str, filter: &ListFilter) -> Result<Vec<Transaction>, ApiError>;
    fn create(&self, tx: &NewTransaction) -> Result<Option<Transaction>, ApiError>;
    fn update(&self, id: i64, patch: &TransactionPatch) -> Result<(), ApiError>;
    fn delete(&self, id: i64) -> Result<(), ApiError>;
    fn list_categories(&self) -> Result<Vec<String>, ApiError>;
    fn list_currencies(&self) -> Result<Vec<String>, ApiError>;
    fn export(&self, format: ExportFormat, currency: &str) -> Result<Vec<u8>, ApiError>;
    /// Uploads a receipt; amounts are extracted in `currency`.
    fn scan_receipt(&self, path: &Path, currency: &str) -> Result<ReceiptScan, ApiError>;
    fn exchange_rates(&self, base: &str) -> Result<ExchangeRates, ApiError>;
    /// Asks the backend to fetch fresh rates from its provider.
    fn update_exchange_rates(&self) -> Result<(), ApiError>;
    /// Free-form question answered from all transactions, converted to `currency`.
    fn analyze(&self, question: &str, currency: &str) -> Result<String, ApiError>;
}

#[derive(Debug, Deserialize)]
struct Ack {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    transaction: Option<Transaction>,
}

impl Ack {
    fn into_result(self) -> Result<Option<Transaction>, ApiError> {
        if self.success {
            Ok(self.transaction)
        } else {
            Err(ApiError::Rejected(self.error.unwrap_or_default()))
        }
    }
}

#[derive(Debug, Deserialize)]
struct ScanAck {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    transaction: Option<NewTransaction>,
    #[serde(default)]
    raw_text: Option<String>,
    #[serde(default)]
    financial_tips: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RatesAck {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    base: String,
    #[serde(default)]
    rates: BTreeMap<String, f64>,
    #[serde(default)]
    last_updated: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AnswerAck {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    answer: Option<String>,
}

pub struct TransactionClient {
    client: Client,
    base_url: String,
}

impl TransactionClient {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        Ok(Self {
            client: http_client()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn send(&self, req: RequestBuilder, what: &str) -> Result<Response, ApiError> {
        let resp = req.send().map_err(|e| {
            tracing::warn!("{} failed: {}", what, e);
            ApiError::from(e)
        })?;
        let status = resp.status();
        if !status.is_success() {
            tracing::warn!("{} returned HTTP {}", what, status);
            return Err(ApiError::Transport(format!("HTTP {}", status)));
        }
        Ok(resp)
    }

    fn json<T: DeserializeOwned>(&self, req: RequestBuilder, what: &str) -> Result<T, ApiError> {
        let resp = self.send(req, what)?;
        resp.json::<T>().map_err(|e| {
            tracing::warn!("{} returned an unreadable body: {}", what, e);
            ApiError::from(e)
        })
    }
}

impl TransactionApi for TransactionClient {
    fn list(&self, currency: &str, filter: &ListFilter) -> Result<Vec<Transaction>, ApiError> {
        let mut query: Vec<(&str, &str)> = Vec::new();
        if let Some(s) = filter.search.as_deref().filter(|s| !s.trim().is_empty()) {
            query.push(("search", s.trim()));
        }
        if let Some(c) = filter.category.as_deref().filter(|c| !c.is_empty()) {
            query.push(("category", c));
        }
        query.push(("currency", currency));
        tracing::debug!("GET /api/transactions {:?}", query);
        let req = self.client.get(self.url("/api/transactions")).query(&query);
        let txs: Vec<Transaction> = self.json(req, "list transactions")?;
        tracing::debug!("received {} transactions", txs.len());
        Ok(txs)
    }

    fn create(&self, tx: &NewTransaction) -> Result<Option<Transaction>, ApiError> {
        tracing::debug!("POST /api/transactions merchant={}", tx.merchant);
        let req = self.client.post(self.url("/api/transactions")).json(tx);
        let ack: Ack = self.json(req, "create transaction")?;
        ack.into_result()
    }

    fn update(&self, id: i64, patch: &TransactionPatch) -> Result<(), ApiError> {
        tracing::debug!("PUT /api/transactions/{}", id);
        let req = self
            .client
            .put(self.url(&format!("/api/transactions/{}", id)))
            .json(patch);
        let ack: Ack = self.json(req, "update transaction")?;
        ack.into_result().map(|_| ())
    }

    fn delete(&self, id: i64) -> Result<(), ApiError> {
        tracing::debug!("DELETE /api/transactions/{}", id);
        let req = self
            .client
            .delete(self.url(&format!("/api/transactions/{}", id)));
        let ack: Ack = self.json(req, "delete transaction")?;
        ack.into_result().map(|_| ())
    }

    fn list_categories(&self) -> Result<Vec<String>, ApiError> {
        let req = self.client.get(self.url("/api/categories"));
        self.json(req, "list categories")
    }

    fn list_currencies(&self) -> Result<Vec<String>, ApiError> {
        let req = self.client.get(self.url("/api/currencies"));
        match self.json::<Vec<String>>(req, "list currencies") {
            Ok(list) => Ok(list),
            Err(e) => {
                tracing::warn!("using built-in currency list: {}", e);
                Ok(SUPPORTED_CURRENCIES.iter().map(|c| c.to_string()).collect())
            }
        }
    }

    fn export(&self, format: ExportFormat, currency: &str) -> Result<Vec<u8>, ApiError> {
        let req = self
            .client
            .get(self.url("/api/export-data"))
            .query(&[("format", format.as_str()), ("currency", currency)]);
        let resp = self.send(req, "export data")?;
        let bytes = resp.bytes()?;
        Ok(bytes.to_vec())
    }

    fn scan_receipt(&self, path: &Path, currency: &str) -> Result<ReceiptScan, ApiError> {
        let form = reqwest::blocking::multipart::Form::new()
            .text("currency", currency.to_string())
            .file("receipt", path)
            .map_err(|e| ApiError::Invalid(format!("Cannot read {}: {}", path.display(), e)))?;
        tracing::debug!("POST /api/process-receipt {} in {}", path.display(), currency);
        let req = self
            .client
            .post(self.url("/api/process-receipt"))
            .multipart(form);
        let ack: ScanAck = self.json(req, "process receipt")?;
        match (ack.success, ack.transaction) {
            (true, Some(transaction)) => Ok(ReceiptScan {
                transaction,
                raw_text: ack.raw_text,
                financial_tips: ack.financial_tips,
            }),
            (true, None) => Err(ApiError::Rejected(
                "Receipt processed but no transaction was extracted".into(),
            )),
            (false, _) => Err(ApiError::Rejected(ack.error.unwrap_or_default())),
        }
    }

    fn exchange_rates(&self, base: &str) -> Result<ExchangeRates, ApiError> {
        let req = self
            .client
            .get(self.url("/api/exchange-rates"))
            .query(&[("base", base)]);
        let ack: RatesAck = self.json(req, "load exchange rates")?;
        if !ack.success {
            return Err(ApiError::Rejected(ack.error.unwrap_or_default()));
        }
        tracing::debug!("received {} rates against {}", ack.rates.len(), ack.base);
        Ok(ExchangeRates {
            base: if ack.base.is_empty() { base.to_string() } else { ack.base },
            rates: ack.rates,
            last_updated: ack.last_updated.unwrap_or_else(|| "Never".to_string()),
        })
    }

    fn update_exchange_rates(&self) -> Result<(), ApiError> {
        let req = self.client.post(self.url("/api/update-exchange-rates"));
        let ack: Ack = self.json(req, "update exchange rates")?;
        ack.into_result().map(|_| ())
    }

    fn analyze(&self, question: &str, currency: &str) -> Result<String, ApiError> {
        tracing::debug!("POST /api/analyze-finances in {}", currency);
        let req = self
            .client
            .post(self.url("/api/analyze-finances"))
            .json(&serde_json::json!({ "question": question, "currency": currency }));
        let ack: AnswerAck = self.json(req, "analyze finances")?;
        match (ack.success, ack.answer) {
            (true, Some(answer)) => Ok(answer),
            (true, None) => Err(ApiError::Rejected("No analysis was returned".into())),
            (false, _) => Err(ApiError::Rejected(ack.error.unwrap_or_default())),
        }
    }
}
