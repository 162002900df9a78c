// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use chrono::{DateTime, TimeDelta, Utc};

use crate::error::ReportError;

/// Absolute time range a query is scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    /// Builds the window `[end - lookback, end]`, failing if the start is not representable.
    pub fn ending_at(end: DateTime<Utc>, lookback: TimeDelta) -> Result<Self, ReportError> {
        let start = end.checked_sub_signed(lookback).ok_or_else(|| {
            ReportError::InvalidConfig(format!(
                "Lookback of {} days before {end} is out of range",
                lookback.num_days()
            ))
        })?;
        Ok(TimeWindow { start, end })
    }

    pub fn start_epoch_secs(&self) -> i64 {
        self.start.timestamp()
    }

    pub fn end_epoch_secs(&self) -> i64 {
        self.end.timestamp()
    }
}
