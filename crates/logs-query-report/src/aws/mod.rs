// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! AWS SDK implementations of the log search and mail backends.

pub mod cloudwatch;
pub mod ses;

pub use cloudwatch::CloudWatchLogSearch;
pub use ses::SesMailer;
