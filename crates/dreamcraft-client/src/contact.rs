//! Contact form submission.

use std::time::Duration;

use serde::Serialize;

use crate::source::DEFAULT_TIMEOUT;

/// Errors that can occur while sending a contact message.
#[derive(Debug, thiserror::Error)]
pub enum ContactError {
    #[error("Please fill in your {0}")]
    MissingField(&'static str),

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Webhook rejected the message with status {0}")]
    Rejected(u16),
}

/// The fields of the contact form, posted as JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContactForm {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub message: String,
}

impl ContactForm {
    /// Name and message are required; phone and email are optional.
    pub fn validate(&self) -> Result<(), ContactError> {
        if self.name.trim().is_empty() {
            return Err(ContactError::MissingField("name"));
        }
        if self.message.trim().is_empty() {
            return Err(ContactError::MissingField("message"));
        }
        Ok(())
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
}

/// A transient message shown after submitting the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.kind == NotificationKind::Success
    }
}

/// Posts contact messages to a webhook. Each send is a single attempt.
#[derive(Debug, Clone)]
pub struct ContactClient {
    client: reqwest::Client,
    webhook_url: String,
}

impl ContactClient {
    pub fn new(webhook_url: impl Into<String>) -> Result<Self, ContactError> {
        Self::with_timeout(webhook_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(
        webhook_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ContactError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            webhook_url: webhook_url.into(),
        })
    }

    /// Validate and post `form`.
    pub async fn send(&self, form: &ContactForm) -> Result<(), ContactError> {
        form.validate()?;

        let response = self
            .client
            .post(&self.webhook_url)
            .json(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ContactError::Rejected(status.as_u16()));
        }

        tracing::info!("Contact message from {} sent", form.name);
        Ok(())
    }

    /// Send `form` and report the result; clears the form on success.
    pub async fn submit(&self, form: &mut ContactForm) -> Notification {
        match self.send(form).await {
            Ok(()) => {
                form.clear();
                Notification::success("Thank you! Your message has been sent.")
            }
            Err(e @ ContactError::MissingField(_)) => Notification::error(e.to_string()),
            Err(e) => {
                tracing::warn!("Failed to send contact message: {}", e);
                Notification::error("Failed to send your message. Please try again later.")
            }
        }
    }
}
