// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use aws_sdk_ses::error::BuildError;
use aws_sdk_ses::types::{Body, Content, Destination, Message};
use aws_sdk_ses::Client;
use tracing::debug;

use crate::error::BoxError;
use crate::mailer::{Email, Mailer};

const CHARSET: &str = "UTF-8";

/// Sends plain-text mail through SES `SendEmail`.
#[derive(Debug, Clone)]
pub struct SesMailer {
    client: Client,
}

impl SesMailer {
    pub fn new(client: Client) -> Self {
        SesMailer { client }
    }
}

#[async_trait]
impl Mailer for SesMailer {
    async fn send(&self, email: Email) -> Result<(), BoxError> {
        let message = build_message(email.subject, email.body)?;
        let destination = Destination::builder().to_addresses(email.to).build();

        let output = self
            .client
            .send_email()
            .source(email.from)
            .destination(destination)
            .message(message)
            .send()
            .await?;
        debug!("SES accepted message {:?}", output.message_id());
        Ok(())
    }
}

fn build_message(subject: String, body: String) -> Result<Message, BuildError> {
    let subject = Content::builder().data(subject).charset(CHARSET).build()?;
    let text = Content::builder().data(body).charset(CHARSET).build()?;
    Ok(Message::builder()
        .subject(subject)
        .body(Body::builder().text(text).build())
        .build())
}
