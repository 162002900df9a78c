// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Configuration Module
//!
//! The report function is configured entirely through environment variables, read once at
//! process start into an immutable [`ReportConfig`] that is handed to the generator.
//!
//! | Variable | Default | Meaning |
//! |---|---|---|
//! | `QUERY_STRING` | required | Logs Insights query, submitted verbatim |
//! | `DAYS_INTERVAL` | `7` | lookback window in days |
//! | `EMAIL_ADDRESS` | required | sender and only recipient of the report |
//! | `LOG_GROUP_NAMES` | required | comma-separated log groups |
//! | `TIME_TO_WAIT_FOR_QUERY_COMPLETION` | `60` | seconds to wait before the first fetch |
//! | `QUERY_MAX_POLL_ATTEMPTS` | `5` | result fetches per query before giving up |
//! | `QUERY_POLL_BACKOFF_MS` | `1000` | base delay between fetches, doubled each attempt |
//! | `REPORT_FAILURE_POLICY` | `abort` | `abort` or `send_partial` |
//! | `MAX_CONCURRENT_QUERIES` | `1` | log groups queried at the same time |
//! | `LOG_LEVEL` | `info` | error, warn, info, debug, trace |
//!
//! ## Edge Cases
//!
//! - Optional values are trimmed; a blank optional value falls back to its default.
//! - A blank required value is treated as missing.
//! - Log group names are trimmed and empty entries (`"a,,b,"`) are dropped. A list that is
//!   empty after this is rejected.
//! - Non-numeric integers and unknown policy or level names are errors, never silently
//!   replaced by defaults.

pub mod failure_policy;
pub mod log_level;

use chrono::TimeDelta;
use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::config::{failure_policy::FailurePolicy, log_level::LogLevel};
use crate::error::ReportError;

pub const QUERY_STRING: &str = "QUERY_STRING";
pub const DAYS_INTERVAL: &str = "DAYS_INTERVAL";
pub const EMAIL_ADDRESS: &str = "EMAIL_ADDRESS";
pub const LOG_GROUP_NAMES: &str = "LOG_GROUP_NAMES";
pub const TIME_TO_WAIT_FOR_QUERY_COMPLETION: &str = "TIME_TO_WAIT_FOR_QUERY_COMPLETION";
pub const QUERY_MAX_POLL_ATTEMPTS: &str = "QUERY_MAX_POLL_ATTEMPTS";
pub const QUERY_POLL_BACKOFF_MS: &str = "QUERY_POLL_BACKOFF_MS";
pub const REPORT_FAILURE_POLICY: &str = "REPORT_FAILURE_POLICY";
pub const MAX_CONCURRENT_QUERIES: &str = "MAX_CONCURRENT_QUERIES";
pub const LOG_LEVEL: &str = "LOG_LEVEL";

const DEFAULT_DAYS_INTERVAL: u32 = 7;
/// Ten years, the longest retention a log group can have.
pub const MAX_DAYS_INTERVAL: u32 = 3653;
const DEFAULT_POLL_WAIT_SECS: u64 = 60;
const DEFAULT_MAX_POLL_ATTEMPTS: u32 = 5;
const DEFAULT_POLL_BACKOFF_MS: u64 = 1000;
const DEFAULT_MAX_CONCURRENT_QUERIES: usize = 1;

/// Configuration for one report run
#[derive(Debug, Clone, PartialEq)]
pub struct ReportConfig {
    /// Logs Insights query text
    pub query_string: String,
    /// Size of the lookback window, in days
    pub days_interval: u32,
    /// Sender and recipient of the report
    pub email_address: String,
    /// Log groups to query, in report order
    pub log_group_names: Vec<String>,
    /// Fixed wait between submitting a query and the first results fetch
    pub poll_wait: Duration,
    /// Maximum results fetches per query
    pub max_poll_attempts: u32,
    /// Base backoff between fetches of a query that is still running
    pub poll_backoff: Duration,
    pub failure_policy: FailurePolicy,
    /// Upper bound on log groups queried concurrently
    pub max_concurrent_queries: usize,
    /// Validated here so a bad `LOG_LEVEL` fails the load. The subscriber reads the variable
    /// itself before configuration is loaded, so that load errors are logged.
    pub log_level: LogLevel,
}

impl ReportConfig {
    /// A configuration with every optional setting at its default.
    pub fn new(
        query_string: impl Into<String>,
        email_address: impl Into<String>,
        log_group_names: Vec<String>,
    ) -> Self {
        ReportConfig {
            query_string: query_string.into(),
            days_interval: DEFAULT_DAYS_INTERVAL,
            email_address: email_address.into(),
            log_group_names,
            poll_wait: Duration::from_secs(DEFAULT_POLL_WAIT_SECS),
            max_poll_attempts: DEFAULT_MAX_POLL_ATTEMPTS,
            poll_backoff: Duration::from_millis(DEFAULT_POLL_BACKOFF_MS),
            failure_policy: FailurePolicy::default(),
            max_concurrent_queries: DEFAULT_MAX_CONCURRENT_QUERIES,
            log_level: LogLevel::default(),
        }
    }

    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self, ReportError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Create configuration from any key/value source, e.g. a map in tests.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ReportError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let query_string = required(&lookup, QUERY_STRING)?;
        let email_address = required(&lookup, EMAIL_ADDRESS)?.trim().to_string();
        let log_group_names = parse_log_group_names(&required(&lookup, LOG_GROUP_NAMES)?);

        let failure_policy = match optional(&lookup, REPORT_FAILURE_POLICY) {
            Some(value) => FailurePolicy::from_env_str(&value).ok_or_else(|| {
                ReportError::InvalidConfig(format!(
                    "Invalid value for {REPORT_FAILURE_POLICY}: '{value}'. Expected abort or send_partial"
                ))
            })?,
            None => FailurePolicy::default(),
        };

        let log_level = match optional(&lookup, LOG_LEVEL) {
            Some(value) => LogLevel::from_str(&value).map_err(ReportError::InvalidConfig)?,
            None => LogLevel::default(),
        };

        let config = ReportConfig {
            query_string,
            days_interval: parse_or(&lookup, DAYS_INTERVAL, DEFAULT_DAYS_INTERVAL)?,
            email_address,
            log_group_names,
            poll_wait: Duration::from_secs(parse_or(
                &lookup,
                TIME_TO_WAIT_FOR_QUERY_COMPLETION,
                DEFAULT_POLL_WAIT_SECS,
            )?),
            max_poll_attempts: parse_or(&lookup, QUERY_MAX_POLL_ATTEMPTS, DEFAULT_MAX_POLL_ATTEMPTS)?,
            poll_backoff: Duration::from_millis(parse_or(
                &lookup,
                QUERY_POLL_BACKOFF_MS,
                DEFAULT_POLL_BACKOFF_MS,
            )?),
            failure_policy,
            max_concurrent_queries: parse_or(
                &lookup,
                MAX_CONCURRENT_QUERIES,
                DEFAULT_MAX_CONCURRENT_QUERIES,
            )?,
            log_level,
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ReportError> {
        if self.query_string.trim().is_empty() {
            return Err(ReportError::InvalidConfig(format!(
                "{QUERY_STRING} cannot be empty"
            )));
        }

        // The address itself is checked by the mail backend.
        if self.email_address.trim().is_empty() {
            return Err(ReportError::InvalidConfig(format!(
                "{EMAIL_ADDRESS} cannot be empty"
            )));
        }

        if self.log_group_names.is_empty() {
            return Err(ReportError::InvalidConfig(format!(
                "{LOG_GROUP_NAMES} must name at least one log group"
            )));
        }

        if self.log_group_names.iter().any(|name| name.trim().is_empty()) {
            return Err(ReportError::InvalidConfig(format!(
                "{LOG_GROUP_NAMES} cannot contain empty log group names"
            )));
        }

        if self.days_interval == 0 {
            return Err(ReportError::InvalidConfig(format!(
                "{DAYS_INTERVAL} must be greater than 0"
            )));
        }

        if self.days_interval > MAX_DAYS_INTERVAL {
            return Err(ReportError::InvalidConfig(format!(
                "{DAYS_INTERVAL} must be at most {MAX_DAYS_INTERVAL}, got {}",
                self.days_interval
            )));
        }

        if self.max_poll_attempts == 0 {
            return Err(ReportError::InvalidConfig(format!(
                "{QUERY_MAX_POLL_ATTEMPTS} must be greater than 0"
            )));
        }

        if self.max_concurrent_queries == 0 {
            return Err(ReportError::InvalidConfig(format!(
                "{MAX_CONCURRENT_QUERIES} must be greater than 0"
            )));
        }

        Ok(())
    }

    pub fn lookback(&self) -> TimeDelta {
        TimeDelta::days(i64::from(self.days_interval))
    }
}

/// Splits a comma-separated list, trimming names and dropping empty entries.
pub fn parse_log_group_names(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

fn optional<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

// Returned untrimmed so the query text reaches the backend verbatim.
fn required<F>(lookup: &F, key: &str) -> Result<String, ReportError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| ReportError::InvalidConfig(format!("{key} environment variable is not set")))
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ReportError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match optional(lookup, key) {
        Some(value) => value.parse::<T>().map_err(|_| {
            ReportError::InvalidConfig(format!("Invalid value for {key}: '{value}'"))
        }),
        None => Ok(default),
    }
}
