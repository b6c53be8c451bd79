use anyhow::{Error, Result, anyhow};
use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, MultiPart},
    transport::smtp::authentication::Credentials,
};
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    config::Config,
    error::DispatchError,
    models::notification::{DispatchReceipt, NotificationContent},
};

/// Delivery channel for rendered notifications.
#[async_trait]
pub trait DispatchTransport: Send + Sync {
    async fn send(
        &self,
        content: &NotificationContent,
        recipients: &[String],
    ) -> Result<DispatchReceipt, DispatchError>;
}

/// Submission port that upgrades a plain connection; every other port gets implicit TLS.
const STARTTLS_PORT: u16 = 587;

fn uses_starttls(port: u16) -> bool {
    port == STARTTLS_PORT
}

pub struct SmtpTransport {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpTransport {
    pub fn new(config: &Config) -> Result<Self, Error> {
        let (Some(username), Some(password)) = (&config.gmail_user, &config.gmail_app_password)
        else {
            return Err(anyhow!("SMTP credentials are not configured"));
        };

        let from = config
            .sender_address()
            .ok_or_else(|| anyhow!("No sender address configured"))?
            .parse::<Mailbox>()
            .map_err(|e| anyhow!("Invalid sender address: {}", e))?;

        let builder = if uses_starttls(config.smtp_port) {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
        };

        let transport = builder
            .map_err(|e| anyhow!("Failed to create SMTP transport: {}", e))?
            .port(config.smtp_port)
            .credentials(Credentials::new(username.clone(), password.clone()))
            .build();

        info!(
            host = %config.smtp_host,
            port = config.smtp_port,
            starttls = uses_starttls(config.smtp_port),
            "SMTP transport initialized"
        );

        Ok(Self { transport, from })
    }

    fn build_message(
        &self,
        content: &NotificationContent,
        recipients: &[String],
        message_id: &str,
    ) -> Result<Message, DispatchError> {
        let mut builder = Message::builder()
            .from(self.from.clone())
            .subject(&content.subject)
            .message_id(Some(message_id.to_string()));

        for recipient in recipients {
            let mailbox = recipient
                .parse::<Mailbox>()
                .map_err(|e| DispatchError::InvalidAddress(format!("{}: {}", recipient, e)))?;
            builder = builder.to(mailbox);
        }

        builder
            .multipart(MultiPart::alternative_plain_html(
                content.text_body.clone(),
                content.html_body.clone(),
            ))
            .map_err(|e| DispatchError::Build(e.to_string()))
    }

    fn next_message_id(&self) -> String {
        format!("<{}@{}>", Uuid::new_v4(), self.from.email.domain())
    }
}

#[async_trait]
impl DispatchTransport for SmtpTransport {
    async fn send(
        &self,
        content: &NotificationContent,
        recipients: &[String],
    ) -> Result<DispatchReceipt, DispatchError> {
        let message_id = self.next_message_id();
        let message = self.build_message(content, recipients, &message_id)?;

        debug!(
            message_id = %message_id,
            recipient_count = recipients.len(),
            "Sending notification email"
        );

        self.transport
            .send(message)
            .await
            .map_err(|e| DispatchError::Failed(e.to_string()))?;

        info!(message_id = %message_id, "Notification email sent");

        Ok(DispatchReceipt { message_id })
    }
}

/// Logs the notification instead of sending it.
#[derive(Debug, Clone, Default)]
pub struct NoopTransport;

#[async_trait]
impl DispatchTransport for NoopTransport {
    async fn send(
        &self,
        content: &NotificationContent,
        recipients: &[String],
    ) -> Result<DispatchReceipt, DispatchError> {
        let message_id = format!("noop-{}", Uuid::new_v4());

        info!(
            message_id = %message_id,
            subject = %content.subject,
            recipients = %recipients.join(", "),
            "Noop transport: skipping email delivery"
        );

        Ok(DispatchReceipt { message_id })
    }
}
