use crate::domain::email::EmailSender;
use crate::infrastructure::config::SmtpConfig;
use anyhow::Result;
use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart, SinglePart, header::ContentType};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::collections::VecDeque;
use std::sync::Mutex;

/// Subject line of password reset emails
pub const RESET_SUBJECT: &str = "Password Reset";

/// Plain-text and HTML bodies of the reset email
pub fn reset_email_bodies(reset_link: &str) -> (String, String) {
    let text = format!(
        "Password Reset Request\n\nOpen the link below to reset your password:\n{}\n",
        reset_link
    );
    let html = format!(
        "<html>\n  <body>\n    <h2>Password Reset Request</h2>\n    \
         <p>Click the link below to reset your password:</p>\n    \
         <a href=\"{link}\">{link}</a>\n  </body>\n</html>\n",
        link = reset_link
    );
    (text, html)
}

/// SMTP delivery over STARTTLS with a bounded connection/command timeout
pub struct SmtpEmailSender {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpEmailSender {
    pub fn new(config: &SmtpConfig) -> Result<Self> {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| anyhow::anyhow!("Invalid SMTP relay {}: {}", config.host, e))?
            .port(config.port)
            .timeout(Some(config.timeout));

        if !config.username.is_empty() {
            builder = builder.credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ));
        }

        let from = config
            .from
            .parse::<Mailbox>()
            .map_err(|e| anyhow::anyhow!("Invalid sender address {}: {}", config.from, e))?;

        Ok(Self {
            transport: builder.build(),
            from,
        })
    }
}

#[async_trait]
impl EmailSender for SmtpEmailSender {
    #[tracing::instrument(skip(self, reset_link))]
    async fn send_password_reset_email(&self, to_address: &str, reset_link: &str) -> Result<()> {
        let to = to_address
            .parse::<Mailbox>()
            .map_err(|e| anyhow::anyhow!("Invalid recipient address: {}", e))?;
        let (text, html) = reset_email_bodies(reset_link);

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(RESET_SUBJECT)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(text),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(html),
                    ),
            )
            .map_err(|e| anyhow::anyhow!("Failed to build email: {}", e))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| anyhow::anyhow!("SMTP delivery failed: {}", e))?;

        tracing::info!("Password reset email sent");
        Ok(())
    }
}

/// Sender used when SMTP is not configured: logs the message and keeps nothing
pub struct LogEmailSender;

#[async_trait]
impl EmailSender for LogEmailSender {
    async fn send_password_reset_email(&self, to_address: &str, reset_link: &str) -> Result<()> {
        tracing::info!(
            "SMTP not configured; password reset email for {} logged, not delivered",
            to_address
        );
        tracing::debug!("Reset link: {}", reset_link);
        Ok(())
    }
}

/// A reset email captured instead of delivered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboxMessage {
    pub to_address: String,
    pub reset_link: String,
}

/// In-process sender for tests: keeps the most recent messages, oldest dropped first.
/// Can be switched to failing mode to exercise delivery errors.
pub struct OutboxEmailSender {
    messages: Mutex<VecDeque<OutboxMessage>>,
    capacity: usize,
    failing: bool,
}

impl Default for OutboxEmailSender {
    fn default() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }
}

impl OutboxEmailSender {
    pub const DEFAULT_CAPACITY: usize = 64;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            messages: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity: capacity.max(1),
            failing: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    /// Retained messages, oldest first
    pub fn messages(&self) -> Vec<OutboxMessage> {
        self.messages
            .lock()
            .map(|messages| messages.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn last_message(&self) -> Option<OutboxMessage> {
        self.messages().pop()
    }
}

#[async_trait]
impl EmailSender for OutboxEmailSender {
    async fn send_password_reset_email(&self, to_address: &str, reset_link: &str) -> Result<()> {
        if self.failing {
            anyhow::bail!("Outbox is configured to reject messages");
        }

        let mut messages = self
            .messages
            .lock()
            .map_err(|_| anyhow::anyhow!("Outbox lock poisoned"))?;
        if messages.len() == self.capacity {
            messages.pop_front();
        }
        messages.push_back(OutboxMessage {
            to_address: to_address.to_string(),
            reset_link: reset_link.to_string(),
        });
        Ok(())
    }
}
