// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Fetch -> filter -> aggregate -> present.

use chrono::NaiveDate;
use serde::Serialize;

use crate::api::TransactionApi;
use crate::error::ApiError;
use crate::models::{ListFilter, Transaction};
use crate::report::aggregate::{self, AggregateGroup, GroupShare, TOP_MERCHANTS};
use crate::report::period::{Period, filter_by_period};
use crate::report::summary::{ReportSummary, summarize};

/// Source of "today" for the period filter.
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }
}

pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Inputs of one refresh. The currency is passed in rather than read from
/// settings mid-run.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRequest {
    pub currency: String,
    pub period: Period,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub currency: String,
    pub period: Period,
    pub generated_on: NaiveDate,
    pub by_category: Vec<GroupShare>,
    pub by_month: Vec<AggregateGroup>,
    pub top_merchants: Vec<AggregateGroup>,
    pub summary: ReportSummary,
}

/// Presentation targets. Each view is handed over independently.
pub trait ReportSink {
    fn show_categories(&mut self, groups: &[GroupShare], currency: &str);
    fn show_monthly(&mut self, groups: &[AggregateGroup], currency: &str);
    fn show_top_merchants(&mut self, groups: &[AggregateGroup], currency: &str);
    fn show_summary(&mut self, summary: &ReportSummary, currency: &str);
    fn show_error(&mut self, message: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Loading,
    Ready,
    Failed,
}

/// Identifies one in-flight refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// Builds every view of a report from already-fetched transactions.
pub fn build_report(
    transactions: &[Transaction],
    request: &ReportRequest,
    today: NaiveDate,
) -> Report {
    let filtered = filter_by_period(transactions, request.period, today);
    Report {
        currency: request.currency.clone(),
        period: request.period,
        generated_on: today,
        by_category: aggregate::with_shares(&aggregate::by_category(&filtered)),
        by_month: aggregate::by_month(&filtered),
        top_merchants: aggregate::top_merchants(&filtered, TOP_MERCHANTS),
        summary: summarize(&filtered),
    }
}

pub fn render(report: &Report, sink: &mut dyn ReportSink) {
    sink.show_categories(&report.by_category, &report.currency);
    sink.show_monthly(&report.by_month, &report.currency);
    sink.show_top_merchants(&report.top_merchants, &report.currency);
    sink.show_summary(&report.summary, &report.currency);
}

/// Report refresh state machine: `Idle -> Loading -> Ready | Failed`.
///
/// Refreshes may overlap. Nothing is cancelled; each completion is applied
/// as it arrives, so the last one to complete is what stays rendered. The
/// state stays `Loading` while any refresh is outstanding and then reflects
/// the last completion. A failed refresh leaves the previous report in place.
pub struct ReportPipeline<C: Clock = SystemClock> {
    clock: C,
    state: PipelineState,
    current: Option<Report>,
    last_error: Option<ApiError>,
    next_ticket: u64,
    in_flight: usize,
}

impl ReportPipeline<SystemClock> {
    pub fn with_system_clock() -> Self {
        Self::new(SystemClock)
    }
}

impl<C: Clock> ReportPipeline<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            state: PipelineState::Idle,
            current: None,
            last_error: None,
            next_ticket: 0,
            in_flight: 0,
        }
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    pub fn current(&self) -> Option<&Report> {
        self.current.as_ref()
    }

    pub fn last_error(&self) -> Option<&ApiError> {
        self.last_error.as_ref()
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Enters `Loading`. Allowed while another refresh is outstanding.
    pub fn begin(&mut self) -> Ticket {
        self.next_ticket += 1;
        self.in_flight += 1;
        self.state = PipelineState::Loading;
        tracing::debug!("report refresh #{} started", self.next_ticket);
        Ticket(self.next_ticket)
    }

    /// Applies the outcome of the fetch started with `ticket`.
    pub fn complete(
        &mut self,
        ticket: Ticket,
        request: &ReportRequest,
        fetched: Result<Vec<Transaction>, ApiError>,
        sink: &mut dyn ReportSink,
    ) -> Result<&Report, ApiError> {
        self.in_flight = self.in_flight.saturating_sub(1);
        match fetched {
            Ok(transactions) => {
                let report = build_report(&transactions, request, self.clock.today());
                tracing::info!(
                    "report refresh #{} ready: {} of {} transactions in period '{}'",
                    ticket.0,
                    report.summary.count,
                    transactions.len(),
                    request.period
                );
                render(&report, sink);
                self.settle(PipelineState::Ready);
                self.last_error = None;
                Ok(self.current.insert(report))
            }
            Err(e) => {
                tracing::error!("report refresh #{} failed: {}", ticket.0, e);
                sink.show_error(&e.user_message("load report data"));
                self.settle(PipelineState::Failed);
                self.last_error = Some(e.clone());
                Err(e)
            }
        }
    }

    fn settle(&mut self, outcome: PipelineState) {
        self.state = if self.in_flight > 0 {
            PipelineState::Loading
        } else {
            outcome
        };
    }

    /// Fetches all transactions in the requested currency and rebuilds the report.
    pub fn refresh<A: TransactionApi + ?Sized>(
        &mut self,
        api: &A,
        request: &ReportRequest,
        sink: &mut dyn ReportSink,
    ) -> Result<&Report, ApiError> {
        let ticket = self.begin();
        let fetched = api.list(&request.currency, &ListFilter::default());
        self.complete(ticket, request, fetched, sink)
    }
}
