// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::time::Duration;
use tracing::debug;

use crate::config::ReportConfig;
use crate::error::ReportError;
use crate::log_search::{LogSearch, QueryId, QueryResults, QueryStatus};

const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// Waits for a submitted query to reach a terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryPoller {
    /// Fixed wait before the first fetch
    pub initial_wait: Duration,
    /// Fetches allowed before the query counts as incomplete
    pub max_attempts: u32,
    /// Delay after the first non-terminal fetch, doubled after each further one
    pub backoff_base: Duration,
}

impl QueryPoller {
    pub fn from_config(config: &ReportConfig) -> Self {
        QueryPoller {
            initial_wait: config.poll_wait,
            max_attempts: config.max_poll_attempts.max(1),
            backoff_base: config.poll_backoff,
        }
    }

    /// Delay before fetch number `attempt + 1`.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 2_u32.saturating_pow(attempt.saturating_sub(1));
        self.backoff_base.saturating_mul(factor).min(MAX_BACKOFF)
    }

    pub async fn wait_for_results(
        &self,
        search: &(dyn LogSearch + Send + Sync),
        query_id: &QueryId,
    ) -> Result<QueryResults, ReportError> {
        tokio::time::sleep(self.initial_wait).await;

        let mut attempts = 0;
        loop {
            attempts += 1;

            let results = search.get_query_results(query_id).await.map_err(|source| {
                ReportError::FetchResults {
                    query_id: query_id.to_string(),
                    source,
                }
            })?;
            debug!(
                "Query {query_id} is {} with {} rows (attempt {attempts})",
                results.status,
                results.rows.len()
            );

            match results.status {
                QueryStatus::Complete => return Ok(results),
                status if status.is_terminal() => {
                    return Err(ReportError::QueryFailed {
                        query_id: query_id.to_string(),
                        status,
                    });
                }
                _ if attempts >= self.max_attempts => {
                    return Err(ReportError::QueryIncomplete {
                        query_id: query_id.to_string(),
                        attempts,
                    });
                }
                _ => {}
            }

            tokio::time::sleep(self.backoff(attempts)).await;
        }
    }
}
