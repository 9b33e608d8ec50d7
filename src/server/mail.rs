//! Transactional email
//!
//! All mail is rendered from Mustache templates (HTML-escaped by default) and
//! handed to a `Mailer`. In the serverless deployment the mailer forwards to
//! the provider SDK on the JS side; tests use `RecordingMailer`.

use serde::Serialize;
use std::sync::Mutex;

use super::error::MailError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutgoingEmail {
    pub to: String,
    pub from: String,
    pub subject: String,
    pub html: String,
}

pub trait Mailer {
    fn send(&self, email: &OutgoingEmail) -> Result<(), MailError>;
}

/// Template selection for outgoing mail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailTemplate {
    /// Sent to a new waitlist subscriber
    Welcome,
    /// Sent to the person who filed a support request
    SupportConfirmation,
    /// Sent to the admin inbox for each support request
    SupportAdminNotification,
}

/// Get template content by type
pub fn template_content(template: EmailTemplate) -> &'static str {
    match template {
        EmailTemplate::Welcome => include_str!("templates/welcome.html.mustache"),
        EmailTemplate::SupportConfirmation => include_str!("templates/support_confirmation.html.mustache"),
        EmailTemplate::SupportAdminNotification => include_str!("templates/support_admin.html.mustache"),
    }
}

/// Render an email body
pub fn render_email<T: Serialize>(template: EmailTemplate, context: &T) -> Result<String, MailError> {
    let compiled = mustache::compile_str(template_content(template))?;
    Ok(compiled.render_to_string(context)?)
}

#[derive(Debug, Clone, Serialize)]
pub struct WelcomeContext {
    pub name: String,
    pub email: String,
    pub site_name: String,
    pub subscribed_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SupportContext {
    pub name: String,
    pub email: String,
    pub support_type: String,
    pub message: String,
    pub has_message: bool,
    pub request_id: String,
    pub created_at: String,
    pub site_name: String,
}

/// Mailer that keeps every message in memory
///
/// Recipients registered with `fail_for` get a transport error instead.
#[derive(Debug, Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<OutgoingEmail>>,
    failing: Mutex<Vec<String>>,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_for(&self, recipient: &str) {
        if let Ok(mut failing) = self.failing.lock() {
            failing.push(recipient.to_string());
        }
    }

    pub fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent.lock().map(|sent| sent.clone()).unwrap_or_default()
    }
}

impl Mailer for RecordingMailer {
    fn send(&self, email: &OutgoingEmail) -> Result<(), MailError> {
        let should_fail = self
            .failing
            .lock()
            .map(|failing| failing.iter().any(|r| r == &email.to))
            .unwrap_or(false);
        if should_fail {
            return Err(MailError::Transport(format!("recipient {} rejected", email.to)));
        }
        self.sent
            .lock()
            .map_err(|_| MailError::Transport("mailer lock poisoned".to_string()))?
            .push(email.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_welcome_renders_and_escapes() {
        let html = render_email(
            EmailTemplate::Welcome,
            &WelcomeContext {
                name: "<Ada>".to_string(),
                email: "ada@example.com".to_string(),
                site_name: "Orbit".to_string(),
                subscribed_at: "2026-01-01T00:00:00Z".to_string(),
            },
        )
        .unwrap();
        assert!(html.contains("&lt;Ada&gt;"));
        assert!(html.contains("Orbit waitlist"));
        assert!(!html.contains("<Ada>"));
    }

    #[test]
    fn test_support_message_section_is_optional() {
        let mut context = SupportContext {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            support_type: "billing".to_string(),
            message: String::new(),
            has_message: false,
            request_id: "req-1".to_string(),
            created_at: "now".to_string(),
            site_name: "Orbit".to_string(),
        };
        let without = render_email(EmailTemplate::SupportAdminNotification, &context).unwrap();
        assert!(!without.contains("<strong>Message</strong>"));

        context.message = "Card declined".to_string();
        context.has_message = true;
        let with = render_email(EmailTemplate::SupportAdminNotification, &context).unwrap();
        assert!(with.contains("Card declined"));
        assert!(with.contains("req-1"));
    }

    #[test]
    fn test_recording_mailer_failure() {
        let mailer = RecordingMailer::new();
        mailer.fail_for("bad@x.io");
        let email = OutgoingEmail {
            to: "bad@x.io".to_string(),
            from: "a@b.co".to_string(),
            subject: "s".to_string(),
            html: String::new(),
        };
        assert!(matches!(mailer.send(&email), Err(MailError::Transport(_))));
        assert!(mailer.sent().is_empty());
    }
}
