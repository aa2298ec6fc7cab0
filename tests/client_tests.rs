// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::mpsc;
use std::thread;

use rust_decimal::Decimal;
use spendview::api::{TransactionApi, TransactionClient};
use spendview::currency::SUPPORTED_CURRENCIES;
use spendview::error::ApiError;
use spendview::models::{
    ExportFormat, ListFilter, NewTransaction, ReceiptScan, TransactionPatch,
};
use tempfile::tempdir;

struct Captured {
    head: String,
    body: String,
}

/// Serves one canned response on a local port and hands back what it received.
fn serve_once(status: &str, body: &str) -> (String, mpsc::Receiver<Captured>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        body.len(),
        body
    );
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        let head_end = loop {
            let n = stream.read(&mut chunk).unwrap();
            if n == 0 {
                break buf.len();
            }
            buf.extend_from_slice(&chunk[..n]);
            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos + 4;
            }
        };
        let head = String::from_utf8_lossy(&buf[..head_end]).to_string();
        let length = head
            .lines()
            .find_map(|l| {
                let (k, v) = l.split_once(':')?;
                k.eq_ignore_ascii_case("content-length")
                    .then(|| v.trim().parse::<usize>().ok())?
            })
            .unwrap_or(0);
        let chunked = head.to_ascii_lowercase().contains("transfer-encoding: chunked");
        loop {
            let done = if chunked {
                buf.ends_with(b"0\r\n\r\n")
            } else {
                buf.len() >= head_end + length
            };
            if done {
                break;
            }
            let n = stream.read(&mut chunk).unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
        }
        let body = String::from_utf8_lossy(&buf[head_end..]).to_string();
        stream.write_all(response.as_bytes()).unwrap();
        stream.flush().unwrap();
        tx.send(Captured { head, body }).ok();
    });
    (base, rx)
}

fn request_line(c: &Captured) -> &str {
    c.head.lines().next().unwrap_or_default()
}

#[test]
fn list_sends_currency_and_filters() {
    let body = r#"[
        {"id": 3, "date": "2024-02-15", "merchant": "A", "amount": 30.0, "currency": "EUR",
         "category": "Transport", "description": null,
         "items": "[{\"name\": \"Ticket\", \"price\": 30}]"},
        {"id": 2, "date": "2024-02-01", "merchant": "B", "amount": "50", "category": "Food"}
    ]"#;
    let (base, rx) = serve_once("200 OK", body);
    let client = TransactionClient::new(&base).unwrap();
    let filter = ListFilter {
        search: Some("  A ".into()),
        category: Some("Transport".into()),
    };
    let txs = client.list("EUR", &filter).unwrap();

    assert_eq!(txs.len(), 2);
    assert_eq!(txs[0].amount, Decimal::from(30));
    assert_eq!(txs[0].description, "");
    assert_eq!(txs[0].items.as_ref().unwrap()[0].name, "Ticket");
    assert_eq!(txs[1].amount, Decimal::from(50));
    assert!(txs[1].currency.is_none());

    let seen = rx.recv().unwrap();
    assert_eq!(
        request_line(&seen),
        "GET /api/transactions?search=A&category=Transport&currency=EUR HTTP/1.1"
    );
}

#[test]
fn server_error_is_a_transport_failure() {
    let (base, _rx) = serve_once("500 Internal Server Error", r#"{"error": "boom"}"#);
    let client = TransactionClient::new(&base).unwrap();
    let err = client.list("USD", &ListFilter::default()).unwrap_err();
    assert!(err.is_transport());
    assert_eq!(
        err.user_message("load report data"),
        "Failed to load report data. Please try again."
    );
}

#[test]
fn unreadable_body_is_a_transport_failure() {
    let (base, _rx) = serve_once("200 OK", "<html>not json</html>");
    let client = TransactionClient::new(&base).unwrap();
    assert!(client.list_categories().unwrap_err().is_transport());
}

#[test]
fn unreachable_backend_is_a_transport_failure() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);
    let client = TransactionClient::new(&base).unwrap();
    assert!(client.list_categories().unwrap_err().is_transport());
}

#[test]
fn create_posts_json_and_returns_stored_row() {
    let reply = r#"{"success": true, "transaction": {"id": 41, "date": "2024-03-01",
        "merchant": "Cafe", "amount": 3.5, "category": "Food", "description": "Purchase from Cafe"}}"#;
    let (base, rx) = serve_once("201 CREATED", reply);
    let client = TransactionClient::new(&base).unwrap();
    let draft = NewTransaction {
        merchant: "Cafe".into(),
        amount: "3.50".parse().unwrap(),
        category: "Food".into(),
        description: "Purchase from Cafe".into(),
        currency: Some("USD".into()),
        ..Default::default()
    };
    let stored = client.create(&draft).unwrap().unwrap();
    assert_eq!(stored.id, 41);

    let seen = rx.recv().unwrap();
    assert_eq!(request_line(&seen), "POST /api/transactions HTTP/1.1");
    let sent: serde_json::Value = serde_json::from_str(&seen.body).unwrap();
    assert_eq!(sent["merchant"], "Cafe");
    assert_eq!(sent["amount"], 3.5);
    assert_eq!(sent["currency"], "USD");
}

#[test]
fn rejection_carries_server_message() {
    let (base, _rx) = serve_once(
        "200 OK",
        r#"{"success": false, "error": "Invalid date format"}"#,
    );
    let client = TransactionClient::new(&base).unwrap();
    let err = client
        .update(5, &TransactionPatch {
            notes: Some("x".into()),
            ..Default::default()
        })
        .unwrap_err();
    assert_eq!(err, ApiError::Rejected("Invalid date format".into()));
    assert_eq!(err.user_message("update transaction"), "Invalid date format");
}

#[test]
fn delete_targets_the_id() {
    let (base, rx) = serve_once("200 OK", r#"{"success": true}"#);
    let client = TransactionClient::new(&base).unwrap();
    client.delete(17).unwrap();
    assert_eq!(
        request_line(&rx.recv().unwrap()),
        "DELETE /api/transactions/17 HTTP/1.1"
    );
}

#[test]
fn currencies_fall_back_to_builtin_list() {
    let (base, _rx) = serve_once("404 NOT FOUND", "{}");
    let client = TransactionClient::new(&base).unwrap();
    let codes = client.list_currencies().unwrap();
    assert_eq!(codes.len(), SUPPORTED_CURRENCIES.len());
    assert_eq!(codes[0], "USD");
}

#[test]
fn export_returns_raw_bytes() {
    let (base, rx) = serve_once("200 OK", "id,merchant\n1,A\n");
    let client = TransactionClient::new(&base).unwrap();
    let bytes = client.export(ExportFormat::Csv, "GBP").unwrap();
    assert_eq!(bytes, b"id,merchant\n1,A\n");
    assert_eq!(
        request_line(&rx.recv().unwrap()),
        "GET /api/export-data?format=csv&currency=GBP HTTP/1.1"
    );
}

#[test]
fn missing_receipt_file_is_rejected_locally() {
    let client = TransactionClient::new("http://127.0.0.1:9").unwrap();
    let err = client
        .scan_receipt(std::path::Path::new("/definitely/not/here.jpg"), "USD")
        .unwrap_err();
    assert!(matches!(err, ApiError::Invalid(_)));
}

fn scan_with_reply(status: &str, reply: &str) -> (Result<ReceiptScan, ApiError>, Captured) {
    let dir = tempdir().unwrap();
    let receipt = dir.path().join("lawson.jpg");
    std::fs::write(&receipt, b"\xFF\xD8\xFFfake-jpeg").unwrap();
    let (base, rx) = serve_once(status, reply);
    let client = TransactionClient::new(&base).unwrap();
    let outcome = client.scan_receipt(&receipt, "JPY");
    (outcome, rx.recv().unwrap())
}

fn assert_receipt_upload(seen: &Captured) {
    assert_eq!(request_line(seen), "POST /api/process-receipt HTTP/1.1");
    assert!(seen.head.to_ascii_lowercase().contains("multipart/form-data"));
    assert!(seen.body.contains(r#"name="receipt""#));
    assert!(seen.body.contains(r#"filename="lawson.jpg""#));
    assert!(seen.body.contains(r#"name="currency""#));
    assert!(seen.body.contains("JPY"));
}

#[test]
fn scan_decodes_draft_without_a_date() {
    let reply = r#"{"success": true, "transaction": {
        "merchant": "LAWSON", "amount": 540, "currency": "JPY", "category": "Food & Dining",
        "description": "Convenience store", "date": "", "shop_name": "LAWSON Shibuya",
        "items": [{"name": "Onigiri", "quantity": 2, "price": 150},
                  {"name": "Green tea", "quantity": 1, "price": 240}],
        "tax": 0, "payment_method": "", "receipt_number": "", "address": "",
        "phone_number": "", "notes": "", "receipt_data": ""}}"#;
    let (outcome, seen) = scan_with_reply("200 OK", reply);
    assert_receipt_upload(&seen);

    let scan = outcome.unwrap();
    let draft = scan.transaction;
    assert!(draft.date.is_none());
    assert_eq!(draft.merchant, "LAWSON");
    assert_eq!(draft.amount, Decimal::from(540));
    assert_eq!(draft.currency.as_deref(), Some("JPY"));
    let items = draft.items.unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].quantity, Decimal::from(2));
    assert_eq!(draft.tax, Some(Decimal::ZERO));
}

#[test]
fn scan_keeps_a_slashed_date() {
    let reply = r#"{"success": true, "transaction": {"merchant": "LAWSON", "amount": 540,
        "category": "Food & Dining", "date": "2024/03/05"}, "financial_tips": "Cook more."}"#;
    let (outcome, _) = scan_with_reply("200 OK", reply);
    let scan = outcome.unwrap();
    assert_eq!(scan.transaction.date.unwrap().to_string(), "2024-03-05");
    assert_eq!(scan.financial_tips.as_deref(), Some("Cook more."));
}

#[test]
fn scan_without_extracted_transaction_is_rejected() {
    let (outcome, seen) = scan_with_reply("200 OK", r#"{"success": true}"#);
    assert_receipt_upload(&seen);
    assert_eq!(
        outcome.unwrap_err(),
        ApiError::Rejected("Receipt processed but no transaction was extracted".into())
    );
}

#[test]
fn scan_failure_carries_server_message() {
    let (outcome, seen) = scan_with_reply(
        "200 OK",
        r#"{"success": false, "error": "Could not read receipt text"}"#,
    );
    assert_receipt_upload(&seen);
    let err = outcome.unwrap_err();
    assert_eq!(err.user_message("upload receipt"), "Could not read receipt text");
}

#[test]
fn scan_server_error_is_generic() {
    let (outcome, seen) = scan_with_reply(
        "400 BAD REQUEST",
        r#"{"success": false, "error": "No file part"}"#,
    );
    assert_receipt_upload(&seen);
    assert!(outcome.unwrap_err().is_transport());
}

#[test]
fn exchange_rates_are_requested_for_the_base() {
    let reply = r#"{"success": true, "base": "EUR",
        "rates": {"EUR": 1.0, "USD": 1.0869, "JPY": 162.5},
        "last_updated": "2024-03-05 06:00:00 UTC"}"#;
    let (base, rx) = serve_once("200 OK", reply);
    let client = TransactionClient::new(&base).unwrap();
    let rates = client.exchange_rates("EUR").unwrap();

    assert_eq!(rates.base, "EUR");
    assert_eq!(rates.rates.len(), 3);
    assert_eq!(rates.rates["JPY"], 162.5);
    assert_eq!(rates.last_updated, "2024-03-05 06:00:00 UTC");
    assert_eq!(
        request_line(&rx.recv().unwrap()),
        "GET /api/exchange-rates?base=EUR HTTP/1.1"
    );
}

#[test]
fn exchange_rates_rejection_is_verbatim() {
    let (base, _rx) = serve_once("200 OK", r#"{"success": false, "error": "no rates stored"}"#);
    let client = TransactionClient::new(&base).unwrap();
    let err = client.exchange_rates("USD").unwrap_err();
    assert_eq!(err, ApiError::Rejected("no rates stored".into()));
}

#[test]
fn updating_rates_posts_and_reads_ack() {
    let (base, rx) = serve_once(
        "200 OK",
        r#"{"success": true, "message": "Exchange rates updated successfully"}"#,
    );
    let client = TransactionClient::new(&base).unwrap();
    client.update_exchange_rates().unwrap();
    assert_eq!(
        request_line(&rx.recv().unwrap()),
        "POST /api/update-exchange-rates HTTP/1.1"
    );
}

#[test]
fn analyze_sends_question_and_currency() {
    let (base, rx) = serve_once(
        "200 OK",
        r#"{"success": true, "answer": "- Food is 83% of spending"}"#,
    );
    let client = TransactionClient::new(&base).unwrap();
    let answer = client.analyze("Where does my money go?", "GBP").unwrap();
    assert_eq!(answer, "- Food is 83% of spending");

    let seen = rx.recv().unwrap();
    assert_eq!(request_line(&seen), "POST /api/analyze-finances HTTP/1.1");
    let sent: serde_json::Value = serde_json::from_str(&seen.body).unwrap();
    assert_eq!(sent["question"], "Where does my money go?");
    assert_eq!(sent["currency"], "GBP");
}

#[test]
fn analyze_failure_status_is_generic() {
    let (base, _rx) = serve_once(
        "500 INTERNAL SERVER ERROR",
        r#"{"success": false, "error": "Unable to generate analysis. Please try again later."}"#,
    );
    let client = TransactionClient::new(&base).unwrap();
    let err = client.analyze("Trends?", "USD").unwrap_err();
    assert!(err.is_transport());
    assert_eq!(
        err.user_message("analyze finances"),
        "Failed to analyze finances. Please try again."
    );
}
