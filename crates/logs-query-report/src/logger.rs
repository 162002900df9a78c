// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Tracing event format for the report function.
//!
//! Lines are prefixed so they are easy to filter out of the function's CloudWatch log
//! stream, which also receives the Lambda runtime's own output:
//!
//! ```text
//! LOGS_QUERY_REPORT | INFO | log_group{name=app-logs}: Collected 2 messages from app-logs
//! LOGS_QUERY_REPORT | ERROR | Failed to send report to ops@example.com: AccessDenied
//! ```
//!
//! Timestamps are left out because CloudWatch records the ingestion time of every line.
//! [`subscriber`] turns ANSI styling off; span fields are otherwise written with terminal
//! escape codes whenever some dependency enables the `ansi` feature.

use std::fmt;
use tracing_core::{Event, Subscriber};
use tracing_subscriber::fmt::{
    format::{self, FormatEvent, FormatFields},
    FmtContext, FormattedFields,
};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{
    filter::ParseError,
    fmt::{format::DefaultFields, MakeWriter},
    EnvFilter,
};

pub const LOG_PREFIX: &str = "LOGS_QUERY_REPORT";

/// Targets whose output is only wanted when explicitly asked for.
pub const SILENCED_TARGETS: &str = "h2=off,hyper=off,rustls=off,aws_smithy_runtime=off,aws_config=warn";

/// Filter directive combining the silenced targets with the configured level.
pub fn filter_directive(level: &str) -> String {
    format!("{SILENCED_TARGETS},{level}")
}

/// Subscriber writing [`Formatter`] lines at `level` to `writer`.
pub fn subscriber<W>(
    level: &str,
    writer: W,
) -> Result<tracing_subscriber::fmt::Subscriber<DefaultFields, Formatter, EnvFilter, W>, ParseError>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    Ok(tracing_subscriber::fmt::Subscriber::builder()
        .with_env_filter(EnvFilter::try_new(filter_directive(level))?)
        .with_ansi(false)
        .event_format(Formatter)
        .with_writer(writer)
        .finish())
}

#[derive(Debug, Clone, Copy)]
pub struct Formatter;

impl<S, N> FormatEvent<S, N> for Formatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: format::Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let metadata = event.metadata();
        write!(&mut writer, "{LOG_PREFIX} | {} | ", metadata.level())?;

        if let Some(scope) = ctx.event_scope() {
            for span in scope.from_root() {
                write!(writer, "{}", span.name())?;

                let ext = span.extensions();
                if let Some(fields) = ext.get::<FormattedFields<N>>() {
                    if !fields.is_empty() {
                        write!(writer, "{{{fields}}}")?;
                    }
                }
                write!(writer, ": ")?;
            }
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}
