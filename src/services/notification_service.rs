use mailer::{Envelope, MailClient};

use crate::config::EmailConfig;
use crate::domain::{Digest, Post};
use crate::errors::ScoutResult;

#[cfg_attr(test, mockall::automock)]
pub trait Notifier {
    /// Deliver a digest of the given matches
    fn notify(&self, matches: &[Post]) -> ScoutResult<()>;
}

/// Emails a digest over SMTP; a no-op when no email config is present
pub struct EmailNotifier {
    client: Option<MailClient>,
    subreddit: String,
}

impl EmailNotifier {
    pub fn new(email: Option<&EmailConfig>, subreddit: &str) -> ScoutResult<Self> {
        let client = email
            .map(|config| MailClient::new(&config.smtp, &config.from, &config.to))
            .transpose()?;

        Ok(Self {
            client,
            subreddit: subreddit.to_string(),
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.client.is_some()
    }
}

impl Notifier for EmailNotifier {
    fn notify(&self, matches: &[Post]) -> ScoutResult<()> {
        let Some(client) = &self.client else {
            return Ok(());
        };
        if matches.is_empty() {
            return Ok(());
        }

        let digest = Digest::from_matches(matches, &self.subreddit);
        client.send(&Envelope {
            subject: digest.subject,
            text: digest.text,
            html: digest.html,
        })?;

        tracing::info!("Email sent: {} match(es).", matches.len());
        Ok(())
    }
}

/// Dry-run notifier that prints the plain-text digest
pub struct ConsoleNotifier {
    subreddit: String,
}

impl ConsoleNotifier {
    pub fn new(subreddit: &str) -> Self {
        Self {
            subreddit: subreddit.to_string(),
        }
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, matches: &[Post]) -> ScoutResult<()> {
        if matches.is_empty() {
            return Ok(());
        }

        let digest = Digest::from_matches(matches, &self.subreddit);
        println!("[DRY RUN] {}\n", digest.subject);
        println!("{}", digest.text);
        Ok(())
    }
}
