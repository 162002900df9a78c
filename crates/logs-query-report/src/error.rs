// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::log_search::QueryStatus;

/// Error type returned by the log search and mail backends.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while generating and sending a report
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to start query on log group {log_group}: {source}")]
    StartQuery {
        log_group: String,
        #[source]
        source: BoxError,
    },

    #[error("Failed to fetch results for query {query_id}: {source}")]
    FetchResults {
        query_id: String,
        #[source]
        source: BoxError,
    },

    #[error("Query {query_id} finished with status {status}")]
    QueryFailed { query_id: String, status: QueryStatus },

    #[error("Query {query_id} did not complete after {attempts} attempts")]
    QueryIncomplete { query_id: String, attempts: u32 },

    #[error("Failed to send email: {0}")]
    SendEmail(#[source] BoxError),
}
