//! Outgoing mail abstraction.

use std::collections::HashMap;

use async_trait::async_trait;
use configs::MailConfig;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("mail delivery is not implemented by {0}")]
    NotImplemented(&'static str),
    #[error("invalid mail request: {0}")]
    Invalid(String),
}

/// A message to deliver. Only `to` and `subject` are required.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MailRequest {
    pub to: Vec<String>,
    pub subject: String,
    pub body: Option<String>,
    pub from: Option<String>,
    pub bcc: Vec<String>,
    pub cc: Vec<String>,
    /// file name -> content
    pub attachment_data: HashMap<String, Vec<u8>>,
}

impl MailRequest {
    pub fn new(to: Vec<String>, subject: impl Into<String>) -> Self {
        Self { to, subject: subject.into(), ..Self::default() }
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn sender(mut self, from: impl Into<String>) -> Self {
        self.from = Some(from.into());
        self
    }

    pub fn bcc(mut self, bcc: Vec<String>) -> Self {
        self.bcc = bcc;
        self
    }

    pub fn cc(mut self, cc: Vec<String>) -> Self {
        self.cc = cc;
        self
    }

    pub fn attach(mut self, name: impl Into<String>, data: Vec<u8>) -> Self {
        self.attachment_data.insert(name.into(), data);
        self
    }

    pub fn validate(&self) -> Result<(), MailError> {
        if self.to.iter().all(|r| r.trim().is_empty()) {
            return Err(MailError::Invalid("at least one recipient is required".into()));
        }
        if self.subject.trim().is_empty() {
            return Err(MailError::Invalid("subject must not be empty".into()));
        }
        Ok(())
    }
}

/// Sends mail. Dropping the returned future cancels the send.
#[async_trait]
pub trait MailService: Send + Sync {
    async fn send(&self, request: MailRequest) -> Result<(), MailError>;
}

/// SendGrid-backed mail. Delivery is not wired up yet; every send fails.
#[derive(Clone, Debug, Default)]
pub struct SendGridMailService {
    config: MailConfig,
}

impl SendGridMailService {
    pub fn new(config: MailConfig) -> Self { Self { config } }

    /// Sender used when a request leaves `from` empty.
    pub fn default_sender(&self) -> &str { &self.config.from }
}

#[async_trait]
impl MailService for SendGridMailService {
    async fn send(&self, request: MailRequest) -> Result<(), MailError> {
        request.validate()?;
        let from = request.from.as_deref().unwrap_or_else(|| self.default_sender());
        warn!(recipients = request.to.len(), %from, subject = %request.subject, "sendgrid delivery requested but not implemented");
        Err(MailError::NotImplemented("sendgrid"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> MailRequest { MailRequest::new(vec!["ops@example.com".into()], "Weekly report") }

    #[test]
    fn optional_collections_default_to_empty() {
        let r = request();
        assert!(r.bcc.is_empty() && r.cc.is_empty() && r.attachment_data.is_empty());
        assert!(r.body.is_none() && r.from.is_none());
    }

    #[test]
    fn builder_collects_attachments() {
        let r = request().body("see attached").attach("report.csv", b"a,b\n1,2\n".to_vec());
        assert_eq!(r.body.as_deref(), Some("see attached"));
        assert_eq!(r.attachment_data.get("report.csv").map(Vec::len), Some(8));
    }

    #[test]
    fn recipients_and_subject_are_required() {
        assert!(matches!(MailRequest::new(vec![], "x").validate(), Err(MailError::Invalid(_))));
        assert!(matches!(MailRequest::new(vec!["a@b.c".into()], " ").validate(), Err(MailError::Invalid(_))));
        assert!(request().validate().is_ok());
    }

    #[tokio::test]
    async fn sendgrid_is_not_implemented() {
        let mail = SendGridMailService::new(MailConfig { from: "noreply@example.com".into(), display_name: "Boilerplate".into() });
        let err = mail.send(request()).await.unwrap_err();
        assert!(matches!(err, MailError::NotImplemented("sendgrid")));
    }
}
