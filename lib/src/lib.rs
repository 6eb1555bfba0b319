//! SMTP delivery for digest emails
//! Sends two-part (plain text + HTML) messages over an authenticated STARTTLS relay

use std::time::Duration;

use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use thiserror::Error;

const SMTP_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Error, Debug)]
pub enum MailError {
    #[error("Invalid address: {0}")]
    InvalidAddress(#[from] lettre::address::AddressError),
    #[error("Message could not be built: {0}")]
    Build(#[from] lettre::error::Error),
    #[error("SMTP transport failed: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),
}

#[derive(Debug, Clone)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
}

/// A rendered email ready to send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub subject: String,
    pub text: String,
    pub html: String,
}

pub struct MailClient {
    transport: SmtpTransport,
    from: Mailbox,
    to: Mailbox,
}

impl MailClient {
    pub fn new(settings: &SmtpSettings, from: &str, to: &str) -> Result<Self, MailError> {
        let transport = SmtpTransport::starttls_relay(&settings.host)?
            .port(settings.port)
            .credentials(Credentials::new(
                settings.username.clone(),
                settings.password.clone(),
            ))
            .timeout(Some(SMTP_TIMEOUT))
            .build();

        Ok(Self {
            transport,
            from: from.parse()?,
            to: to.parse()?,
        })
    }

    /// Build the multipart/alternative message without sending it
    pub fn compose(&self, envelope: &Envelope) -> Result<Message, MailError> {
        compose(&self.from, &self.to, envelope)
    }

    /// Send an envelope as a multipart/alternative message
    pub fn send(&self, envelope: &Envelope) -> Result<(), MailError> {
        let message = self.compose(envelope)?;
        self.transport.send(&message)?;
        Ok(())
    }
}

fn compose(from: &Mailbox, to: &Mailbox, envelope: &Envelope) -> Result<Message, MailError> {
    let message = Message::builder()
        .from(from.clone())
        .to(to.clone())
        .subject(envelope.subject.clone())
        .multipart(MultiPart::alternative_plain_html(
            envelope.text.clone(),
            envelope.html.clone(),
        ))?;

    Ok(message)
}
