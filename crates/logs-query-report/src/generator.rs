// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tracing::{debug, error, info, info_span, warn, Instrument};

use crate::config::ReportConfig;
use crate::error::ReportError;
use crate::log_search::LogSearch;
use crate::mailer::{Email, Mailer};
use crate::poller::QueryPoller;
use crate::report::{Report, RunOutcome, SourceOutcome};
use crate::window::TimeWindow;

/// Runs the configured query against every log group and mails the combined messages.
pub struct ReportGenerator {
    pub config: Arc<ReportConfig>,
    pub log_search: Arc<dyn LogSearch + Send + Sync>,
    pub mailer: Arc<dyn Mailer + Send + Sync>,
}

impl ReportGenerator {
    pub fn new(
        config: Arc<ReportConfig>,
        log_search: Arc<dyn LogSearch + Send + Sync>,
        mailer: Arc<dyn Mailer + Send + Sync>,
    ) -> Self {
        ReportGenerator {
            config,
            log_search,
            mailer,
        }
    }

    /// One end-to-end run over the window ending now.
    pub async fn run(&self) -> Result<RunOutcome, ReportError> {
        self.run_at(Utc::now()).await
    }

    pub async fn run_at(&self, now: DateTime<Utc>) -> Result<RunOutcome, ReportError> {
        self.config.validate()?;

        let window = TimeWindow::ending_at(now, self.config.lookback())?;
        debug!(
            "Querying {} log groups from {} to {}",
            self.config.log_group_names.len(),
            window.start,
            window.end
        );

        let report = self.collect(&window).await?;
        let body = report.body();
        let message_count = report.messages().count();

        let email = Email::self_addressed(&self.config.email_address, body);
        if let Err(e) = self.mailer.send(email).await {
            error!("Failed to send report to {}: {e}", self.config.email_address);
            return Err(ReportError::SendEmail(e));
        }
        info!(
            "Sent report with {message_count} messages to {}",
            self.config.email_address
        );

        Ok(RunOutcome::success())
    }

    /// Queries every log group over `window`.
    ///
    /// At most `max_concurrent_queries` groups are in flight and outcomes are taken in
    /// configuration order. Under the abort policy the first failure is returned and no
    /// later group is started.
    pub async fn collect(&self, window: &TimeWindow) -> Result<Report, ReportError> {
        let poller = QueryPoller::from_config(&self.config);

        let mut outcomes = stream::iter(&self.config.log_group_names)
            .map(|log_group| {
                let span = info_span!("log_group", name = %log_group);
                async move {
                    let result = self.query_log_group(log_group, window, &poller).await;
                    (log_group, result)
                }
                .instrument(span)
            })
            .buffered(self.config.max_concurrent_queries.max(1));

        let mut report = Report::default();
        while let Some((log_group, result)) = outcomes.next().await {
            match result {
                Ok(messages) => {
                    info!("Collected {} messages from {log_group}", messages.len());
                    report.push(SourceOutcome::Collected {
                        log_group: log_group.clone(),
                        messages,
                    });
                }
                Err(e) if self.config.failure_policy.sends_partial_report() => {
                    warn!("Skipping log group {log_group}: {e}");
                    report.push(SourceOutcome::Failed {
                        log_group: log_group.clone(),
                        error: e,
                    });
                }
                Err(e) => {
                    error!("Aborting report, log group {log_group} failed: {e}");
                    return Err(e);
                }
            }
        }

        Ok(report)
    }

    async fn query_log_group(
        &self,
        log_group: &str,
        window: &TimeWindow,
        poller: &QueryPoller,
    ) -> Result<Vec<String>, ReportError> {
        let query_id = self
            .log_search
            .start_query(log_group, &self.config.query_string, window)
            .await
            .map_err(|source| ReportError::StartQuery {
                log_group: log_group.to_string(),
                source,
            })?;
        debug!("Started query {query_id}");

        let results = poller
            .wait_for_results(self.log_search.as_ref(), &query_id)
            .await?;
        Ok(results.messages())
    }
}
