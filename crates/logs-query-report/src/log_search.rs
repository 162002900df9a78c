// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use std::fmt;

use crate::error::BoxError;
use crate::window::TimeWindow;

/// Field holding the raw log event in Logs Insights results.
pub const MESSAGE_FIELD: &str = "@message";

/// Opaque identifier of a submitted query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryId(String);

impl QueryId {
    pub fn new(id: impl Into<String>) -> Self {
        QueryId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QueryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStatus {
    Scheduled,
    Running,
    Complete,
    Failed,
    Cancelled,
    Timeout,
    Unknown,
}

impl QueryStatus {
    /// Whether the query has stopped and its results will not change.
    pub const fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Complete | Self::Failed | Self::Cancelled | Self::Timeout
        )
    }
}

impl fmt::Display for QueryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Scheduled => "Scheduled",
            Self::Running => "Running",
            Self::Complete => "Complete",
            Self::Failed => "Failed",
            Self::Cancelled => "Cancelled",
            Self::Timeout => "Timeout",
            Self::Unknown => "Unknown",
        };
        f.write_str(name)
    }
}

/// One matched log event, as an ordered list of `(field, value)` pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultRow {
    fields: Vec<(String, String)>,
}

impl ResultRow {
    pub fn new(fields: Vec<(String, String)>) -> Self {
        ResultRow { fields }
    }

    /// Value of the first field named `name`, if the row has one.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn message(&self) -> Option<&str> {
        self.get(MESSAGE_FIELD)
    }
}

impl<K, V> FromIterator<(K, V)> for ResultRow
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        ResultRow {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Snapshot returned by a single results fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryResults {
    pub status: QueryStatus,
    pub rows: Vec<ResultRow>,
}

impl QueryResults {
    pub fn complete(rows: Vec<ResultRow>) -> Self {
        QueryResults {
            status: QueryStatus::Complete,
            rows,
        }
    }

    /// Messages of every row carrying the message field, in row order.
    pub fn messages(&self) -> Vec<String> {
        self.rows
            .iter()
            .filter_map(|row| row.message().map(str::to_string))
            .collect()
    }
}

#[async_trait]
pub trait LogSearch {
    /// Submits `query` against one log group over `window`.
    async fn start_query(
        &self,
        log_group: &str,
        query: &str,
        window: &TimeWindow,
    ) -> Result<QueryId, BoxError>;

    /// Fetches the current status and rows of a submitted query.
    async fn get_query_results(&self, query_id: &QueryId) -> Result<QueryResults, BoxError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_statuses() {
        assert!(QueryStatus::Complete.is_terminal());
        assert!(QueryStatus::Failed.is_terminal());
        assert!(QueryStatus::Cancelled.is_terminal());
        assert!(QueryStatus::Timeout.is_terminal());
        assert!(!QueryStatus::Scheduled.is_terminal());
        assert!(!QueryStatus::Running.is_terminal());
        assert!(!QueryStatus::Unknown.is_terminal());
    }

    #[test]
    fn test_row_lookup_returns_first_match() {
        let row: ResultRow = [
            ("@timestamp", "2024-01-01 00:00:00.000"),
            ("@message", "first"),
            ("@message", "second"),
        ]
        .into_iter()
        .collect();
        assert_eq!(row.message(), Some("first"));
        assert_eq!(row.get("@timestamp"), Some("2024-01-01 00:00:00.000"));
        assert_eq!(row.get("@logStream"), None);
    }

    #[test]
    fn test_messages_skip_rows_without_field() {
        let results = QueryResults::complete(vec![
            [("@message", "error A")].into_iter().collect(),
            [("@timestamp", "2024-01-01 00:00:00.000")].into_iter().collect(),
            [("@message", "error B")].into_iter().collect(),
        ]);
        assert_eq!(results.messages(), vec!["error A", "error B"]);
    }

    #[test]
    fn test_empty_message_is_kept() {
        let results = QueryResults::complete(vec![[("@message", "")].into_iter().collect()]);
        assert_eq!(results.messages(), vec![String::new()]);
    }
}
