//! Sending the notification.
//!
//! The message itself is always the same, only the student and the distance change.  How it is
//! delivered is up to the `Notifier`:
//!
//! - `SmtpMailer` sends an email through the configured SMTP server (STARTTLS + login)
//! - `LogOnly` only logs what would have been sent (`--dry-run`)
//!

use std::fmt::{Debug, Formatter};

use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use tracing::{debug, info, trace};

use crate::{MailSettings, NotifyError};

/// Subject of every email
pub const SUBJECT: &str = "Student arriving shortly";

/// One notification to send.
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    pub to: Vec<String>,
    pub subject: String,
    pub body: String,
}

impl Notification {
    /// The student is `meters` away from home.
    ///
    pub fn arriving(student_id: i64, meters: u64, to: &[String]) -> Self {
        Notification {
            to: to.to_vec(),
            subject: SUBJECT.to_owned(),
            body: format!(
                "Student with ID {student_id} is {meters} meters from home and will arrive shortly."
            ),
        }
    }
}

/// Anything able to deliver a `Notification`.
///
pub trait Notifier: Debug {
    /// Return notifier's name
    fn name(&self) -> String;
    /// Deliver, once
    fn notify(&self, note: &Notification) -> Result<(), NotifyError>;
}

/// Send email through SMTP.
///
pub struct SmtpMailer {
    /// Sender
    from: Mailbox,
    /// Server description for logs
    server: String,
    /// Connection parameters, nothing is opened before `notify()`
    transport: SmtpTransport,
}

impl SmtpMailer {
    #[tracing::instrument]
    pub fn new(mail: &MailSettings) -> Result<Self, NotifyError> {
        trace!("smtpmailer::new");

        let from = mail
            .from
            .parse::<Mailbox>()
            .map_err(|_| NotifyError::BadAddress(mail.from.clone()))?;

        let creds = Credentials::new(mail.from.clone(), mail.password.clone());
        let transport = SmtpTransport::starttls_relay(&mail.server)
            .map_err(|e| NotifyError::Smtp(e.to_string()))?
            .port(mail.port)
            .credentials(creds)
            .build();

        Ok(SmtpMailer {
            from,
            server: format!("{}:{}", mail.server, mail.port),
            transport,
        })
    }

    /// Build the actual email.
    ///
    pub fn message(&self, note: &Notification) -> Result<Message, NotifyError> {
        let mut builder = Message::builder().from(self.from.clone());
        for to in &note.to {
            let to = to
                .parse::<Mailbox>()
                .map_err(|_| NotifyError::BadAddress(to.clone()))?;
            builder = builder.to(to);
        }

        builder
            .subject(note.subject.clone())
            .header(ContentType::TEXT_PLAIN)
            .body(note.body.clone())
            .map_err(|e| NotifyError::Message(e.to_string()))
    }
}

impl Debug for SmtpMailer {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpMailer")
            .field("from", &self.from.to_string())
            .field("server", &self.server)
            .finish()
    }
}

impl Notifier for SmtpMailer {
    fn name(&self) -> String {
        "smtp".to_string()
    }

    #[tracing::instrument(skip(self))]
    fn notify(&self, note: &Notification) -> Result<(), NotifyError> {
        let email = self.message(note)?;

        debug!("sending through {}", self.server);
        let resp = self
            .transport
            .send(&email)
            .map_err(|e| NotifyError::Smtp(e.to_string()))?;
        debug!("smtp response code {}", resp.code());
        Ok(())
    }
}

/// Log the notification instead of sending it.
///
#[derive(Clone, Copy, Debug, Default)]
pub struct LogOnly;

impl Notifier for LogOnly {
    fn name(&self) -> String {
        "log".to_string()
    }

    fn notify(&self, note: &Notification) -> Result<(), NotifyError> {
        info!(
            "Would send \"{}\" to {}: {}",
            note.subject,
            note.to.join(", "),
            note.body
        );
        Ok(())
    }
}
