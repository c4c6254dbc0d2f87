//! Send a contact message to the configured webhook.

use anyhow::{Context, Result};
use dreamcraft_client::{ContactClient, ContactForm};

use crate::config::SiteConfig;

/// Run the contact command.
pub async fn run(config: &SiteConfig, webhook: Option<String>, form: ContactForm) -> Result<()> {
    let url = webhook
        .or_else(|| config.contact.webhook_url.clone())
        .context("No webhook configured. Set [contact] webhook_url or pass --webhook.")?;

    let client = ContactClient::with_timeout(url, config.contact_timeout())?;
    let mut form = form;
    let notification = client.submit(&mut form).await;

    if !notification.is_success() {
        anyhow::bail!(notification.message);
    }

    tracing::info!("{}", notification.message);
    Ok(())
}
