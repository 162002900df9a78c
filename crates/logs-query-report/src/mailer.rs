// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;

use crate::error::BoxError;

pub const REPORT_SUBJECT: &str = "CloudWatch Logs Query Results";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl Email {
    /// A report mail sent from `address` to itself.
    pub fn self_addressed(address: &str, body: String) -> Self {
        Email {
            from: address.to_string(),
            to: address.to_string(),
            subject: REPORT_SUBJECT.to_string(),
            body,
        }
    }
}

#[async_trait]
pub trait Mailer {
    async fn send(&self, email: Email) -> Result<(), BoxError>;
}
