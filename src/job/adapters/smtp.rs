//! SMTP delivery of tracking links.
//!
//! Sends the client a plain-text mail with the tracking URL and the QR
//! image attached. The blocking lettre transport runs inside
//! `spawn_blocking` so the async workflow never stalls on the mail server.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use std::sync::Arc;

use crate::config::SmtpConfig;
use crate::job::{
    domain::{EmailAddress, JobRecord},
    ports::{JobNotifier, NotifyError, NotifyResult},
};

/// Connection settings for the shop's outgoing mail account.
#[derive(Debug, Clone)]
pub struct SmtpSettings {
    /// Relay host name.
    pub host: String,
    /// Relay port.
    pub port: u16,
    /// Account user name.
    pub username: String,
    /// Account password.
    pub password: String,
    /// Sender mailbox, e.g. `Print Shop <jobs@example.com>`.
    pub from: String,
}

impl From<&SmtpConfig> for SmtpSettings {
    fn from(config: &SmtpConfig) -> Self {
        Self {
            host: config.host.clone(),
            port: config.port,
            username: config.username.clone(),
            password: config.password.clone(),
            from: config.from.clone(),
        }
    }
}

/// Notifier that mails the tracking link and QR image via SMTP.
#[derive(Clone)]
pub struct SmtpJobNotifier {
    transport: Arc<SmtpTransport>,
    from: Mailbox,
}

impl SmtpJobNotifier {
    /// Builds the notifier from connection settings.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::InvalidMessage`] when the sender mailbox does
    /// not parse and [`NotifyError::Transport`] when the relay parameters
    /// are rejected.
    pub fn new(settings: &SmtpSettings) -> NotifyResult<Self> {
        let from: Mailbox = settings
            .from
            .parse()
            .map_err(|_| NotifyError::InvalidMessage(format!("bad sender: {}", settings.from)))?;
        let transport = SmtpTransport::relay(&settings.host)
            .map_err(NotifyError::transport)?
            .port(settings.port)
            .credentials(Credentials::new(
                settings.username.clone(),
                settings.password.clone(),
            ))
            .build();
        Ok(Self {
            transport: Arc::new(transport),
            from,
        })
    }
}

#[async_trait]
impl JobNotifier for SmtpJobNotifier {
    async fn job_created(
        &self,
        recipient: &EmailAddress,
        record: &JobRecord,
        tracking_url: &str,
        qr_png: &[u8],
    ) -> NotifyResult<()> {
        let to: Mailbox = recipient
            .as_str()
            .parse()
            .map_err(|_| NotifyError::InvalidMessage(format!("bad recipient: {recipient}")))?;
        let png_type = ContentType::parse("image/png")
            .map_err(|err| NotifyError::InvalidMessage(err.to_string()))?;

        let body = format!(
            "Hello {},\n\n\
             Your print job {} ({}) has been received.\n\
             Track its status any time:\n{}\n\n\
             You can also scan the attached QR code.\n",
            record.client_name(),
            record.job_id(),
            record.file_name(),
            tracking_url,
        );
        let attachment = Attachment::new(format!("qr_{}.png", record.job_id()))
            .body(qr_png.to_vec(), png_type);

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(format!("Print job {} received", record.job_id()))
            .multipart(
                MultiPart::mixed()
                    .singlepart(SinglePart::plain(body))
                    .singlepart(attachment),
            )
            .map_err(|err| NotifyError::InvalidMessage(err.to_string()))?;

        let transport = Arc::clone(&self.transport);
        tokio::task::spawn_blocking(move || transport.send(&message))
            .await
            .map_err(NotifyError::transport)?
            .map_err(NotifyError::transport)?;
        Ok(())
    }
}
