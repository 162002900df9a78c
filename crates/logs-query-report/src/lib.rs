// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Scheduled CloudWatch Logs Insights report.
//!
//! A run submits one query per configured log group, waits for each query to finish,
//! collects the `@message` field of every result row and mails the messages, newline
//! separated, to a single self-addressed recipient.
//!
//! The log and mail backends sit behind the [`log_search::LogSearch`] and
//! [`mailer::Mailer`] traits; [`aws`] holds the SDK implementations used by the Lambda.

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

pub mod aws;
pub mod config;
pub mod error;
pub mod generator;
pub mod log_search;
pub mod logger;
pub mod mailer;
pub mod poller;
pub mod report;
pub mod window;

pub use config::ReportConfig;
pub use error::{BoxError, ReportError};
pub use generator::ReportGenerator;
pub use report::RunOutcome;
