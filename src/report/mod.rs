// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod aggregate;
pub mod debounce;
pub mod period;
pub mod pipeline;
pub mod summary;

pub use aggregate::{AggregateGroup, GroupKey, GroupShare};
pub use period::{Period, filter_by_period};
pub use pipeline::{
    Clock, FixedClock, PipelineState, Report, ReportPipeline, ReportRequest, ReportSink,
    SystemClock, Ticket, build_report,
};
pub use summary::{Extreme, ReportSummary, summarize};
