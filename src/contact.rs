//! Multi-step contact wizard.
//!
//! The visitor enters one field per step (name, then email, then message).
//! Every step is a form post carrying the previous answers as hidden fields, so
//! the wizard itself is a small state machine with no server-side storage.

use serde::{Deserialize, Serialize};

use crate::models::ContactSubmission;

pub const MAX_NAME_LEN: usize = 100;
pub const MAX_MESSAGE_LEN: usize = 5000;

/// Step
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Step {
    #[default]
    Name,
    Email,
    Message,
    Submitted,
}

impl Step {
    /// 1-based position for the progress indicator.
    pub fn number(self) -> usize {
        match self {
            Step::Name => 1,
            Step::Email => 2,
            Step::Message => 3,
            Step::Submitted => 4,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Step::Name => "Your name",
            Step::Email => "Your email",
            Step::Message => "Your message",
            Step::Submitted => "Sent",
        }
    }
}

/// ContactError
///
/// Names the field that blocked the wizard from advancing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContactError {
    #[error("Please tell me your name.")]
    NameRequired,
    #[error("Names are limited to {MAX_NAME_LEN} characters.")]
    NameTooLong,
    #[error("Please enter your email address.")]
    EmailRequired,
    #[error("That email address doesn't look right.")]
    EmailInvalid,
    #[error("Please write a message.")]
    MessageRequired,
    #[error("Messages are limited to {MAX_MESSAGE_LEN} characters.")]
    MessageTooLong,
    #[error("This message has already been sent.")]
    AlreadySubmitted,
}

/// ContactWizard
///
/// The wizard as posted by the browser: the current step plus every value
/// entered so far.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ContactWizard {
    pub step: Step,
    pub name: String,
    pub email: String,
    pub message: String,
}

/// What a form post asks the wizard to do.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    #[default]
    Next,
    Back,
}

impl ContactWizard {
    /// Applies one button press. `Back` never fails.
    pub fn apply(&mut self, action: Action) -> Result<Option<ContactSubmission>, ContactError> {
        match action {
            Action::Next => self.advance(),
            Action::Back => {
                self.back();
                Ok(None)
            }
        }
    }

    /// advance
    ///
    /// Validates the field belonging to the current step and moves forward.
    /// On failure the step is unchanged. Completing the message step returns
    /// the submission to forward to the backend.
    pub fn advance(&mut self) -> Result<Option<ContactSubmission>, ContactError> {
        match self.step {
            Step::Name => {
                self.name = validate_name(&self.name)?;
                self.step = Step::Email;
                Ok(None)
            }
            Step::Email => {
                self.email = validate_email(&self.email)?;
                self.step = Step::Message;
                Ok(None)
            }
            Step::Message => {
                // Earlier answers travel back as hidden fields and may have been edited.
                self.name = validate_name(&self.name)?;
                self.email = validate_email(&self.email)?;
                self.message = validate_message(&self.message)?;
                self.step = Step::Submitted;
                Ok(Some(ContactSubmission {
                    name: self.name.clone(),
                    email: self.email.clone(),
                    message: self.message.clone(),
                }))
            }
            Step::Submitted => Err(ContactError::AlreadySubmitted),
        }
    }

    /// back
    ///
    /// Moves one step back, never before the first. Entered values are kept.
    pub fn back(&mut self) {
        self.step = match self.step {
            Step::Name | Step::Email => Step::Name,
            Step::Message => Step::Email,
            Step::Submitted => Step::Message,
        };
    }

    /// Returns the wizard to the message step after a failed submission.
    pub fn reopen(&mut self) {
        if self.step == Step::Submitted {
            self.step = Step::Message;
        }
    }
}

fn validate_name(name: &str) -> Result<String, ContactError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ContactError::NameRequired);
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(ContactError::NameTooLong);
    }
    Ok(name.to_string())
}

fn validate_email(email: &str) -> Result<String, ContactError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(ContactError::EmailRequired);
    }
    if !looks_like_email(email) {
        return Err(ContactError::EmailInvalid);
    }
    Ok(email.to_string())
}

fn validate_message(message: &str) -> Result<String, ContactError> {
    let message = message.trim();
    if message.is_empty() {
        return Err(ContactError::MessageRequired);
    }
    if message.chars().count() > MAX_MESSAGE_LEN {
        return Err(ContactError::MessageTooLong);
    }
    Ok(message.to_string())
}

/// `local@domain.tld` with no whitespace and a dot inside the domain.
pub fn looks_like_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && tld.len() >= 2,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walks_through_all_three_steps() {
        let mut wizard = ContactWizard {
            name: "  Ada  ".into(),
            ..Default::default()
        };
        assert_eq!(wizard.advance(), Ok(None));
        assert_eq!(wizard.step, Step::Email);
        assert_eq!(wizard.name, "Ada");

        wizard.email = "ada@example.com".into();
        assert_eq!(wizard.advance(), Ok(None));
        assert_eq!(wizard.step, Step::Message);

        wizard.message = "Hello there".into();
        let submission = wizard.advance().unwrap().unwrap();
        assert_eq!(wizard.step, Step::Submitted);
        assert_eq!(submission.name, "Ada");
        assert_eq!(submission.email, "ada@example.com");
        assert_eq!(submission.message, "Hello there");
    }

    #[test]
    fn empty_field_blocks_advancing() {
        let mut wizard = ContactWizard::default();
        assert_eq!(wizard.advance(), Err(ContactError::NameRequired));
        assert_eq!(wizard.step, Step::Name);
    }

    #[test]
    fn bad_email_keeps_email_step() {
        let mut wizard = ContactWizard {
            step: Step::Email,
            name: "Ada".into(),
            email: "ada at example".into(),
            ..Default::default()
        };
        assert_eq!(wizard.advance(), Err(ContactError::EmailInvalid));
        assert_eq!(wizard.step, Step::Email);
    }

    #[test]
    fn tampered_hidden_fields_are_revalidated() {
        let mut wizard = ContactWizard {
            step: Step::Message,
            name: "".into(),
            email: "ada@example.com".into(),
            message: "Hi".into(),
        };
        assert_eq!(wizard.advance(), Err(ContactError::NameRequired));
        assert_eq!(wizard.step, Step::Message);
    }

    #[test]
    fn overlong_message_is_rejected() {
        let mut wizard = ContactWizard {
            step: Step::Message,
            name: "Ada".into(),
            email: "ada@example.com".into(),
            message: "x".repeat(MAX_MESSAGE_LEN + 1),
        };
        assert_eq!(wizard.advance(), Err(ContactError::MessageTooLong));
    }

    #[test]
    fn back_never_goes_before_first_step() {
        let mut wizard = ContactWizard {
            step: Step::Message,
            name: "Ada".into(),
            ..Default::default()
        };
        wizard.back();
        assert_eq!(wizard.step, Step::Email);
        wizard.back();
        wizard.back();
        assert_eq!(wizard.step, Step::Name);
        assert_eq!(wizard.name, "Ada");
    }

    #[test]
    fn back_action_skips_validation() {
        let mut wizard = ContactWizard {
            step: Step::Email,
            email: "not an email".into(),
            ..Default::default()
        };
        assert_eq!(wizard.apply(Action::Back), Ok(None));
        assert_eq!(wizard.step, Step::Name);
        assert_eq!(wizard.email, "not an email");
    }

    #[test]
    fn email_shapes() {
        assert!(looks_like_email("a@b.io"));
        assert!(!looks_like_email("a@b"));
        assert!(!looks_like_email("@b.io"));
        assert!(!looks_like_email("a@@b.io"));
        assert!(!looks_like_email("a@.io"));
        assert!(!looks_like_email("a b@c.io"));
    }
}
