// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! What a run does when one of its log groups fails.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// The first failure aborts the run and no email is sent.
    #[default]
    Abort,

    /// Failed log groups are listed at the end of the report and the
    /// remaining groups are still queried and sent.
    SendPartial,
}

impl FailurePolicy {
    pub const fn sends_partial_report(self) -> bool {
        matches!(self, Self::SendPartial)
    }

    pub fn from_env_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "abort" | "fail_fast" => Some(Self::Abort),
            "send_partial" | "partial" => Some(Self::SendPartial),
            _ => None,
        }
    }
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Abort => write!(f, "abort"),
            Self::SendPartial => write!(f, "send_partial"),
        }
    }
}
