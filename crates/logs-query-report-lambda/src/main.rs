// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

use aws_config::BehaviorVersion;
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde_json::Value;
use std::{env, sync::Arc};
use tracing::{debug, error, info};

use logs_query_report::{
    aws::{CloudWatchLogSearch, SesMailer},
    config::{log_level::LogLevel, LOG_LEVEL},
    logger, ReportConfig, ReportGenerator, RunOutcome,
};

#[tokio::main]
pub async fn main() -> Result<(), Error> {
    // Logging comes up before the rest of the configuration so that config errors are logged.
    let log_level = parse_log_level(env::var(LOG_LEVEL).ok());
    let subscriber = logger::subscriber(log_level.as_directive(), std::io::stdout)?;
    tracing::subscriber::set_global_default(subscriber)?;

    debug!("Logging subsystem enabled");

    let config = match ReportConfig::from_env() {
        Ok(c) => Arc::new(c),
        Err(e) => {
            error!("Error loading report configuration: {e}");
            return Err(e.into());
        }
    };
    info!(
        "Reporting on {} log groups over the last {} days, failure policy {}",
        config.log_group_names.len(),
        config.days_interval,
        config.failure_policy
    );

    let sdk_config = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let generator = ReportGenerator::new(
        config,
        Arc::new(CloudWatchLogSearch::new(aws_sdk_cloudwatchlogs::Client::new(
            &sdk_config,
        ))),
        Arc::new(SesMailer::new(aws_sdk_ses::Client::new(&sdk_config))),
    );

    run(service_fn(|event: LambdaEvent<Value>| {
        handler(event, &generator)
    }))
    .await
}

/// The invocation payload is not used: every run reports on the configured window.
async fn handler(_event: LambdaEvent<Value>, generator: &ReportGenerator) -> Result<RunOutcome, Error> {
    match generator.run().await {
        Ok(outcome) => Ok(outcome),
        Err(e) => {
            error!("Report run failed: {e}");
            Err(e.into())
        }
    }
}

fn parse_log_level(value: Option<String>) -> LogLevel {
    value
        .and_then(|level| level.parse::<LogLevel>().ok())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use lambda_runtime::Context;
    use logs_query_report::{
        error::BoxError,
        log_search::{LogSearch, QueryId, QueryResults},
        mailer::{Email, Mailer},
        window::TimeWindow,
    };
    use serde_json::json;
    use std::sync::Mutex;
    use std::time::Duration;

    struct SingleRowSearch;

    #[async_trait]
    impl LogSearch for SingleRowSearch {
        async fn start_query(
            &self,
            _log_group: &str,
            _query: &str,
            _window: &TimeWindow,
        ) -> Result<QueryId, BoxError> {
            Ok(QueryId::new("q-1"))
        }

        async fn get_query_results(&self, _query_id: &QueryId) -> Result<QueryResults, BoxError> {
            Ok(QueryResults::complete(vec![[("@message", "error A")]
                .into_iter()
                .collect()]))
        }
    }

    #[derive(Default)]
    struct RecordingMailer {
        sent: Mutex<Vec<Email>>,
    }

    #[async_trait]
    impl Mailer for RecordingMailer {
        async fn send(&self, email: Email) -> Result<(), BoxError> {
            self.sent.lock().unwrap().push(email);
            Ok(())
        }
    }

    fn event() -> LambdaEvent<Value> {
        LambdaEvent::new(json!({ "source": "aws.events" }), Context::default())
    }

    #[tokio::test]
    async fn test_handler_returns_success_response() {
        let mut config = ReportConfig::new(
            "fields @message",
            "ops@example.com",
            vec!["app-logs".to_string()],
        );
        config.poll_wait = Duration::ZERO;
        let mailer = Arc::new(RecordingMailer::default());
        let generator =
            ReportGenerator::new(Arc::new(config), Arc::new(SingleRowSearch), mailer.clone());

        let outcome = handler(event(), &generator).await.unwrap();

        assert_eq!(
            serde_json::to_value(outcome).unwrap(),
            json!({ "statusCode": 200, "body": "Email sent successfully!" })
        );
        assert_eq!(mailer.sent.lock().unwrap()[0].body, "error A");
    }

    #[tokio::test]
    async fn test_handler_propagates_errors() {
        let config = ReportConfig::new("fields @message", "ops@example.com", vec![]);
        let mailer = Arc::new(RecordingMailer::default());
        let generator =
            ReportGenerator::new(Arc::new(config), Arc::new(SingleRowSearch), mailer.clone());

        let err = handler(event(), &generator).await.unwrap_err();

        assert_eq!(
            err.to_string(),
            "Invalid configuration: LOG_GROUP_NAMES must name at least one log group"
        );
        assert!(mailer.sent.lock().unwrap().is_empty());
    }

    #[test]
    fn test_parse_log_level() {
        assert_eq!(parse_log_level(Some("debug".to_string())), LogLevel::Debug);
        assert_eq!(parse_log_level(Some("nonsense".to_string())), LogLevel::Info);
        assert_eq!(parse_log_level(None), LogLevel::Info);
    }
}
