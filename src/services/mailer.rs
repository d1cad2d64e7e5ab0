use std::sync::Arc;

use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};

use crate::config::Config;
use crate::error::{AppError, AppResult};

/// Outgoing mail abstraction
///
/// The account flows only ever talk to this trait, so tests can swap in a
/// mock and deployments without SMTP credentials fall back to logging.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> AppResult<()>;
}

/// Mailer that writes the message to the log instead of delivering it.
/// Used when no SMTP relay is configured.
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> AppResult<()> {
        tracing::info!(to, subject, body, "Outgoing mail (logged, SMTP not configured)");
        Ok(())
    }
}

/// SMTP-backed mailer.
pub struct SmtpMailer {
    transport: SmtpTransport,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(
        host: &str,
        username: Option<String>,
        password: Option<String>,
        from: &str,
    ) -> AppResult<Self> {
        let from = from
            .parse::<Mailbox>()
            .map_err(|_| AppError::Mail(format!("Invalid from address: {}", from)))?;

        let mut builder =
            SmtpTransport::relay(host).map_err(|e| AppError::Mail(e.to_string()))?;
        if let (Some(username), Some(password)) = (username, password) {
            builder = builder.credentials(Credentials::new(username, password));
        }

        Ok(Self { transport: builder.build(), from })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> AppResult<()> {
        let to = to
            .parse::<Mailbox>()
            .map_err(|_| AppError::Mail(format!("Invalid recipient: {}", to)))?;

        let email = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(subject)
            .body(body.to_string())
            .map_err(|e| AppError::Mail(e.to_string()))?;

        // The SMTP transport is blocking; keep it off the async workers.
        let transport = self.transport.clone();
        tokio::task::spawn_blocking(move || transport.send(&email))
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?
            .map_err(|e| AppError::Mail(e.to_string()))?;

        Ok(())
    }
}

/// Picks the mailer implementation for the given configuration.
pub fn mailer_from_config(config: &Config) -> AppResult<Arc<dyn Mailer>> {
    match &config.smtp_host {
        Some(host) => Ok(Arc::new(SmtpMailer::new(
            host,
            config.smtp_username.clone(),
            config.smtp_password.clone(),
            &config.mail_from,
        )?)),
        None => Ok(Arc::new(LogMailer)),
    }
}
