//! Summary e-mail: recipient check, message composition, SMTP delivery.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::export::XLSX_CONTENT_TYPE;

pub const SUBJECT: &str = "📊 AI Job Summary + Excel Attachment";
pub const ATTACHMENT_FILENAME: &str = "JobListings.xlsx";

#[derive(Debug, Error)]
pub enum MailError {
    #[error("{0}")]
    Smtp(String),

    #[error("mail task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl From<lettre::transport::smtp::Error> for MailError {
    fn from(e: lettre::transport::smtp::Error) -> Self {
        MailError::Smtp(e.to_string())
    }
}

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Invalid recipient email address.")]
    InvalidRecipient,

    #[error("Invalid sender address: {0}")]
    InvalidSender(String),

    #[error("Could not compose email: {0}")]
    Compose(String),

    #[error("Email sending error: {0}")]
    Transport(#[from] MailError),
}

/// Delivers a finished message. `AppState` carries an `Arc<dyn MailTransport>`.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn deliver(&self, message: Message) -> Result<(), MailError>;
}

/// SMTP relay over STARTTLS with username/password login.
#[derive(Clone)]
pub struct SmtpMailer {
    transport: SmtpTransport,
}

impl SmtpMailer {
    pub fn new(host: &str, port: u16, username: String, password: String) -> Result<Self, MailError> {
        let transport = SmtpTransport::starttls_relay(host)?
            .port(port)
            .credentials(Credentials::new(username, password))
            .build();
        Ok(Self { transport })
    }
}

#[async_trait]
impl MailTransport for SmtpMailer {
    async fn deliver(&self, message: Message) -> Result<(), MailError> {
        let transport = self.transport.clone();
        tokio::task::spawn_blocking(move || transport.send(&message)).await??;
        Ok(())
    }
}

fn recipient_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    // A prefix match, like a `match` call: anything may follow the last segment.
    PATTERN.get_or_init(|| Regex::new(r"^[^@]+@[^@]+\.[^@]+").expect("recipient pattern is valid"))
}

/// Minimal syntactic check: something, `@`, something, `.`, something.
pub fn is_valid_recipient(address: &str) -> bool {
    recipient_pattern().is_match(address)
}

/// What goes into one summary e-mail.
#[derive(Debug, Clone, Copy)]
pub struct Notification<'a> {
    pub summary: &'a str,
    pub company_summary: &'a str,
    pub spreadsheet: Option<&'a [u8]>,
}

pub fn compose_body(summary: &str, company_summary: &str) -> String {
    format!(
        "AI-Generated Job Market Summary:\n\n{summary}\n\n🏢 Company-Wise Job Openings:\n{company_summary}"
    )
}

pub fn compose_message(
    from: &str,
    to: &str,
    notification: &Notification<'_>,
) -> Result<Message, DispatchError> {
    let from: Mailbox = from
        .parse()
        .map_err(|e: lettre::address::AddressError| DispatchError::InvalidSender(e.to_string()))?;
    let to: Mailbox = to.parse().map_err(|_| DispatchError::InvalidRecipient)?;

    let mut parts = MultiPart::mixed().singlepart(SinglePart::plain(compose_body(
        notification.summary,
        notification.company_summary,
    )));

    if let Some(spreadsheet) = notification.spreadsheet {
        let content_type = ContentType::parse(XLSX_CONTENT_TYPE)
            .map_err(|e| DispatchError::Compose(e.to_string()))?;
        parts = parts.singlepart(
            Attachment::new(ATTACHMENT_FILENAME.to_string()).body(spreadsheet.to_vec(), content_type),
        );
    }

    Message::builder()
        .from(from)
        .to(to)
        .subject(SUBJECT)
        .multipart(parts)
        .map_err(|e| DispatchError::Compose(e.to_string()))
}

/// Validates the recipient, composes the message and hands it to the transport.
/// An invalid recipient never reaches the transport.
pub async fn dispatch(
    transport: &dyn MailTransport,
    from: &str,
    to: &str,
    notification: &Notification<'_>,
) -> Result<(), DispatchError> {
    if !is_valid_recipient(to) {
        warn!("Rejected recipient address '{to}'");
        return Err(DispatchError::InvalidRecipient);
    }

    let message = compose_message(from, to, notification)?;
    debug!("Sending summary email to {to}");
    transport.deliver(message).await?;
    info!("Summary email sent to {to}");
    Ok(())
}
