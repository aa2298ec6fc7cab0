// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{BTreeMap, VecDeque};
use std::path::Path;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use spendview::api::TransactionApi;
use spendview::config::Settings;
use spendview::error::ApiError;
use spendview::models::{
    ExchangeRates, ExportFormat, ListFilter, NewTransaction, ReceiptScan, Transaction,
    TransactionPatch,
};

pub fn tx(id: i64, merchant: &str, amount: &str, category: &str, date: &str) -> Transaction {
    Transaction {
        id,
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        merchant: merchant.to_string(),
        amount: amount.parse::<Decimal>().unwrap(),
        currency: Some("USD".into()),
        category: category.to_string(),
        description: String::new(),
        items: None,
        tax: None,
        payment_method: None,
        receipt_number: None,
        address: None,
        phone_number: None,
        notes: None,
        shop_name: None,
        receipt_data: None,
    }
}

pub fn scenario() -> Vec<Transaction> {
    vec![
        tx(1, "A", "100", "Food", "2024-01-01"),
        tx(2, "B", "50", "Food", "2024-02-01"),
        tx(3, "A", "30", "Transport", "2024-02-15"),
    ]
}

pub fn settings() -> Settings {
    Settings {
        api_url: "http://127.0.0.1:9".into(),
        currency: "USD".into(),
    }
}

/// In-memory backend that records every call.
#[derive(Default)]
pub struct FakeApi {
    pub transactions: Vec<Transaction>,
    pub categories: Vec<String>,
    pub list_outcomes: RefCell<VecDeque<Result<Vec<Transaction>, ApiError>>>,
    pub create_outcome: RefCell<Option<ApiError>>,
    pub export_body: Vec<u8>,
    pub rates: BTreeMap<String, f64>,
    pub analysis: Option<Result<String, ApiError>>,
    pub calls: RefCell<Vec<String>>,
    pub created: RefCell<Vec<NewTransaction>>,
    pub patches: RefCell<Vec<(i64, TransactionPatch)>>,
}

impl FakeApi {
    pub fn with(transactions: Vec<Transaction>) -> Self {
        FakeApi {
            transactions,
            categories: vec!["Food".into(), "Transport".into(), "Other".into()],
            ..Default::default()
        }
    }

    pub fn push_list(&self, outcome: Result<Vec<Transaction>, ApiError>) {
        self.list_outcomes.borrow_mut().push_back(outcome);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: String) {
        self.calls.borrow_mut().push(call);
    }
}

impl TransactionApi for FakeApi {
    fn list(&self, currency: &str, filter: &ListFilter) -> Result<Vec<Transaction>, ApiError> {
        self.record(format!("list {} {:?} {:?}", currency, filter.search, filter.category));
        if let Some(outcome) = self.list_outcomes.borrow_mut().pop_front() {
            return outcome;
        }
        Ok(self
            .transactions
            .iter()
            .filter(|t| filter.category.as_ref().is_none_or(|c| &t.category == c))
            .cloned()
            .collect())
    }

    fn create(&self, tx: &NewTransaction) -> Result<Option<Transaction>, ApiError> {
        self.record(format!("create {}", tx.merchant));
        if let Some(e) = self.create_outcome.borrow_mut().take() {
            return Err(e);
        }
        self.created.borrow_mut().push(tx.clone());
        Ok(None)
    }

    fn update(&self, id: i64, patch: &TransactionPatch) -> Result<(), ApiError> {
        self.record(format!("update {}", id));
        self.patches.borrow_mut().push((id, patch.clone()));
        Ok(())
    }

    fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.record(format!("delete {}", id));
        if self.transactions.iter().any(|t| t.id == id) {
            Ok(())
        } else {
            Err(ApiError::Rejected("Transaction not found".into()))
        }
    }

    fn list_categories(&self) -> Result<Vec<String>, ApiError> {
        self.record("categories".into());
        Ok(self.categories.clone())
    }

    fn list_currencies(&self) -> Result<Vec<String>, ApiError> {
        self.record("currencies".into());
        Ok(vec!["USD".into(), "EUR".into()])
    }

    fn export(&self, format: ExportFormat, currency: &str) -> Result<Vec<u8>, ApiError> {
        self.record(format!("export {} {}", format.as_str(), currency));
        Ok(self.export_body.clone())
    }

    fn scan_receipt(&self, path: &Path, currency: &str) -> Result<ReceiptScan, ApiError> {
        self.record(format!("scan {} {}", path.display(), currency));
        Err(ApiError::Transport("not available".into()))
    }

    fn exchange_rates(&self, base: &str) -> Result<ExchangeRates, ApiError> {
        self.record(format!("rates {}", base));
        Ok(ExchangeRates {
            base: base.to_string(),
            rates: self.rates.clone(),
            last_updated: "Never".into(),
        })
    }

    fn update_exchange_rates(&self) -> Result<(), ApiError> {
        self.record("update rates".into());
        Ok(())
    }

    fn analyze(&self, question: &str, currency: &str) -> Result<String, ApiError> {
        self.record(format!("analyze {} {}", currency, question));
        self.analysis
            .clone()
            .unwrap_or_else(|| Err(ApiError::Transport("not available".into())))
    }
}
