// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Recording mock backends for the report generator

use logs_query_report::{
    error::BoxError,
    log_search::{LogSearch, QueryId, QueryResults, ResultRow},
    mailer::{Email, Mailer},
    window::TimeWindow,
};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;

/// A backend call, with the (virtual) time it was made.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchCall {
    Start {
        log_group: String,
        query: String,
        window: TimeWindow,
        at: Instant,
    },
    Fetch { query_id: String, at: Instant },
}

#[derive(Default)]
struct GroupScript {
    start_error: Option<String>,
    fetches: VecDeque<Result<QueryResults, String>>,
    latency: Duration,
}

/// Log search whose answers are scripted per log group.
///
/// Query ids are `query-<log group>`. A fetch with nothing left scripted fails.
#[derive(Default)]
pub struct MockLogSearch {
    groups: Mutex<HashMap<String, GroupScript>>,
    calls: Mutex<Vec<SearchCall>>,
}

#[allow(dead_code)]
impl MockLogSearch {
    pub fn new() -> Self {
        Self::default()
    }

    /// The group's query completes on the first fetch with `rows`.
    pub fn with_rows(self, log_group: &str, rows: Vec<ResultRow>) -> Self {
        self.with_fetches(log_group, vec![Ok(QueryResults::complete(rows))])
    }

    pub fn with_fetches(self, log_group: &str, fetches: Vec<Result<QueryResults, String>>) -> Self {
        self.script(log_group, |script| script.fetches = fetches.into());
        self
    }

    pub fn with_start_error(self, log_group: &str, error: &str) -> Self {
        self.script(log_group, |script| script.start_error = Some(error.to_string()));
        self
    }

    /// Every fetch for the group takes `latency` before answering.
    pub fn with_latency(self, log_group: &str, latency: Duration) -> Self {
        self.script(log_group, |script| script.latency = latency);
        self
    }

    fn script(&self, log_group: &str, f: impl FnOnce(&mut GroupScript)) {
        let mut groups = self.groups.lock().unwrap();
        f(groups.entry(log_group.to_string()).or_default());
    }

    pub fn calls(&self) -> Vec<SearchCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn started_groups(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                SearchCall::Start { log_group, .. } => Some(log_group),
                SearchCall::Fetch { .. } => None,
            })
            .collect()
    }

    pub fn fetched_ids(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                SearchCall::Fetch { query_id, .. } => Some(query_id),
                SearchCall::Start { .. } => None,
            })
            .collect()
    }
}

#[async_trait::async_trait]
impl LogSearch for MockLogSearch {
    async fn start_query(
        &self,
        log_group: &str,
        query: &str,
        window: &TimeWindow,
    ) -> Result<QueryId, BoxError> {
        self.calls.lock().unwrap().push(SearchCall::Start {
            log_group: log_group.to_string(),
            query: query.to_string(),
            window: *window,
            at: Instant::now(),
        });

        let groups = self.groups.lock().unwrap();
        match groups.get(log_group) {
            None => Err(format!("ResourceNotFoundException: {log_group}").into()),
            Some(GroupScript {
                start_error: Some(error),
                ..
            }) => Err(error.clone().into()),
            Some(_) => Ok(QueryId::new(format!("query-{log_group}"))),
        }
    }

    async fn get_query_results(&self, query_id: &QueryId) -> Result<QueryResults, BoxError> {
        let log_group = query_id
            .as_str()
            .strip_prefix("query-")
            .unwrap_or_default()
            .to_string();

        let latency = self
            .groups
            .lock()
            .unwrap()
            .get(&log_group)
            .map(|script| script.latency)
            .unwrap_or_default();
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }

        self.calls.lock().unwrap().push(SearchCall::Fetch {
            query_id: query_id.to_string(),
            at: Instant::now(),
        });

        let next = self
            .groups
            .lock()
            .unwrap()
            .get_mut(&log_group)
            .and_then(|script| script.fetches.pop_front());
        match next {
            Some(Ok(results)) => Ok(results),
            Some(Err(error)) => Err(error.into()),
            None => Err(format!("no results scripted for {query_id}").into()),
        }
    }
}

/// Mailer that keeps every email it is asked to send.
#[derive(Default)]
pub struct MockMailer {
    sent: Mutex<Vec<Email>>,
    error: Option<String>,
}

#[allow(dead_code)]
impl MockMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(error: &str) -> Self {
        MockMailer {
            sent: Mutex::new(Vec::new()),
            error: Some(error.to_string()),
        }
    }

    pub fn sent(&self) -> Vec<Email> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Mailer for MockMailer {
    async fn send(&self, email: Email) -> Result<(), BoxError> {
        if let Some(error) = &self.error {
            return Err(error.clone().into());
        }
        self.sent.lock().unwrap().push(email);
        Ok(())
    }
}

/// A result row holding only `@message`.
#[allow(dead_code)]
pub fn message_row(message: &str) -> ResultRow {
    [("@message", message)].into_iter().collect()
}
