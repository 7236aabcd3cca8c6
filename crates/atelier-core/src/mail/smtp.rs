//! SMTP mail transport backed by lettre

use super::{MailError, Mailer, OutboundEmail};
use crate::config::MailConfig;
use anyhow::Context;
use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

/// Mailer implementation dispatching over SMTP with STARTTLS
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    /// Build a transport from the mail configuration. Credentials are
    /// attached only when both a username and an environment-provided
    /// password are present.
    pub fn new(config: &MailConfig) -> anyhow::Result<Self> {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
            .with_context(|| format!("Invalid SMTP relay host: {}", config.smtp_host))?
            .port(config.smtp_port);

        if let (Some(username), Some(password)) =
            (config.username.clone(), config.resolved_password()?)
        {
            builder = builder.credentials(Credentials::new(username, password));
        }

        Ok(Self {
            transport: builder.build(),
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: &OutboundEmail) -> Result<(), MailError> {
        let from: Mailbox = email
            .from
            .parse()
            .map_err(|e| MailError::InvalidHeader(format!("from address: {e}")))?;
        let to: Mailbox = email
            .to
            .parse()
            .map_err(|e| MailError::InvalidHeader(format!("to address: {e}")))?;

        let message = Message::builder()
            .from(from)
            .to(to)
            .subject(email.subject.clone())
            .body(email.body.clone())
            .map_err(|e| MailError::InvalidHeader(e.to_string()))?;

        self.transport
            .send(message)
            .await
            .map(|_| ())
            .map_err(|e| MailError::Transport(e.to_string()))
    }
}
