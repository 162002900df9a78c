// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use serde::Serialize;

use crate::error::ReportError;

pub const SUCCESS_STATUS_CODE: u16 = 200;
pub const SUCCESS_MESSAGE: &str = "Email sent successfully!";

/// Result of querying a single log group.
#[derive(Debug)]
pub enum SourceOutcome {
    Collected {
        log_group: String,
        messages: Vec<String>,
    },
    Failed {
        log_group: String,
        error: ReportError,
    },
}

impl SourceOutcome {
    pub fn log_group(&self) -> &str {
        match self {
            SourceOutcome::Collected { log_group, .. } | SourceOutcome::Failed { log_group, .. } => {
                log_group
            }
        }
    }
}

/// Per log group outcomes, kept in configuration order.
#[derive(Debug, Default)]
pub struct Report {
    outcomes: Vec<SourceOutcome>,
}

impl Report {
    pub fn push(&mut self, outcome: SourceOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn outcomes(&self) -> &[SourceOutcome] {
        &self.outcomes
    }

    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.outcomes
            .iter()
            .filter_map(|outcome| match outcome {
                SourceOutcome::Collected { messages, .. } => Some(messages),
                SourceOutcome::Failed { .. } => None,
            })
            .flatten()
            .map(String::as_str)
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &ReportError)> {
        self.outcomes.iter().filter_map(|outcome| match outcome {
            SourceOutcome::Failed { log_group, error } => Some((log_group.as_str(), error)),
            SourceOutcome::Collected { .. } => None,
        })
    }

    pub fn has_failures(&self) -> bool {
        self.failures().next().is_some()
    }

    /// Email body: every collected message on its own line, followed by a
    /// list of failed log groups when there are any.
    pub fn body(&self) -> String {
        let mut body = self.messages().collect::<Vec<_>>().join("\n");

        if self.has_failures() {
            if !body.is_empty() {
                body.push_str("\n\n");
            }
            body.push_str("Failed log groups:");
            for (log_group, error) in self.failures() {
                body.push('\n');
                body.push_str(log_group);
                body.push_str(": ");
                body.push_str(&error.to_string());
            }
        }

        body
    }
}

/// Response returned to the function invoker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunOutcome {
    pub status_code: u16,
    pub body: String,
}

impl RunOutcome {
    pub fn success() -> Self {
        RunOutcome {
            status_code: SUCCESS_STATUS_CODE,
            body: SUCCESS_MESSAGE.to_string(),
        }
    }
}
