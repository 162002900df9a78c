// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use aws_sdk_cloudwatchlogs::operation::start_query::StartQueryOutput;
use aws_sdk_cloudwatchlogs::types::{QueryStatus as CloudWatchQueryStatus, ResultField};
use aws_sdk_cloudwatchlogs::Client;
use tracing::debug;

use crate::error::BoxError;
use crate::log_search::{LogSearch, QueryId, QueryResults, QueryStatus, ResultRow};
use crate::window::TimeWindow;

/// Logs Insights backed search using `StartQuery` and `GetQueryResults`.
#[derive(Debug, Clone)]
pub struct CloudWatchLogSearch {
    client: Client,
}

impl CloudWatchLogSearch {
    pub fn new(client: Client) -> Self {
        CloudWatchLogSearch { client }
    }
}

#[async_trait]
impl LogSearch for CloudWatchLogSearch {
    async fn start_query(
        &self,
        log_group: &str,
        query: &str,
        window: &TimeWindow,
    ) -> Result<QueryId, BoxError> {
        // Logs Insights takes epoch seconds, not milliseconds.
        let output = self
            .client
            .start_query()
            .log_group_name(log_group)
            .start_time(window.start_epoch_secs())
            .end_time(window.end_epoch_secs())
            .query_string(query)
            .send()
            .await?;

        let query_id = convert_query_id(&output)?;
        debug!("StartQuery on {log_group} returned {query_id}");
        Ok(query_id)
    }

    async fn get_query_results(&self, query_id: &QueryId) -> Result<QueryResults, BoxError> {
        let output = self
            .client
            .get_query_results()
            .query_id(query_id.as_str())
            .send()
            .await?;

        Ok(QueryResults {
            status: output
                .status()
                .map(convert_status)
                .unwrap_or(QueryStatus::Unknown),
            rows: output.results().iter().map(|row| convert_row(row)).collect(),
        })
    }
}

fn convert_query_id(output: &StartQueryOutput) -> Result<QueryId, BoxError> {
    match output.query_id() {
        Some(query_id) if !query_id.is_empty() => Ok(QueryId::new(query_id)),
        _ => Err("StartQuery response did not contain a query id".into()),
    }
}

fn convert_status(status: &CloudWatchQueryStatus) -> QueryStatus {
    match status {
        CloudWatchQueryStatus::Scheduled => QueryStatus::Scheduled,
        CloudWatchQueryStatus::Running => QueryStatus::Running,
        CloudWatchQueryStatus::Complete => QueryStatus::Complete,
        CloudWatchQueryStatus::Failed => QueryStatus::Failed,
        CloudWatchQueryStatus::Cancelled => QueryStatus::Cancelled,
        CloudWatchQueryStatus::Timeout => QueryStatus::Timeout,
        _ => QueryStatus::Unknown,
    }
}

/// Fields without a name or value are dropped.
fn convert_row(fields: &[ResultField]) -> ResultRow {
    fields
        .iter()
        .filter_map(|field| Some((field.field()?, field.value()?)))
        .collect()
}
