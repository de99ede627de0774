//! Contact form: field validation, honeypot and the simulated submission.

use folio_core::ContactConfig;
use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;
use std::time::{Duration, Instant};
use tracing::{debug, info};

const EMAIL_PATTERN: &str = r"(?i)^[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}$";

fn email_regex() -> Option<&'static Regex> {
    static EMAIL: OnceLock<Option<Regex>> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(EMAIL_PATTERN).ok()).as_ref()
}

pub fn is_valid_email(value: &str) -> bool {
    email_regex().is_some_and(|re| re.is_match(value))
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContactDraft {
    pub name: String,
    pub email: String,
    pub company: String,
    pub position: String,
    pub message: String,
    /// Hidden field; bots fill it, people never see it.
    #[serde(skip)]
    pub honeypot: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Name,
    Email,
    Company,
    Position,
    Message,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::Name,
        Field::Email,
        Field::Company,
        Field::Position,
        Field::Message,
    ];

    pub fn label_key(self) -> &'static str {
        match self {
            Field::Name => "contact.name",
            Field::Email => "contact.email",
            Field::Company => "contact.company",
            Field::Position => "contact.position",
            Field::Message => "contact.message",
        }
    }

    pub fn is_required(self) -> bool {
        matches!(self, Field::Name | Field::Email | Field::Message)
    }

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: Field,
    /// Translation key of the message.
    pub key: &'static str,
}

impl ContactDraft {
    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Email => &self.email,
            Field::Company => &self.company,
            Field::Position => &self.position,
            Field::Message => &self.message,
        }
    }

    pub fn value_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Name => &mut self.name,
            Field::Email => &mut self.email,
            Field::Company => &mut self.company,
            Field::Position => &mut self.position,
            Field::Message => &mut self.message,
        }
    }

    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if self.name.trim().is_empty() {
            errors.push(FieldError {
                field: Field::Name,
                key: "contact.nameRequired",
            });
        }
        if self.email.trim().is_empty() {
            errors.push(FieldError {
                field: Field::Email,
                key: "contact.emailRequired",
            });
        } else if !is_valid_email(self.email.trim()) {
            errors.push(FieldError {
                field: Field::Email,
                key: "contact.invalidEmail",
            });
        }
        if self.message.trim().is_empty() {
            errors.push(FieldError {
                field: Field::Message,
                key: "contact.messageRequired",
            });
        }
        errors
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitResult {
    Rejected(Vec<FieldError>),
    /// Honeypot was filled; nothing happens and no feedback is shown.
    Dropped,
    Busy,
    Submitting,
}

#[derive(Debug, Clone)]
pub struct ContactForm {
    pub draft: ContactDraft,
    focus: Field,
    errors: Vec<FieldError>,
    submitting_until: Option<Instant>,
    banner_until: Option<Instant>,
    submit_delay: Duration,
    banner: Duration,
}

impl ContactForm {
    pub fn new(cfg: &ContactConfig) -> Self {
        Self {
            draft: ContactDraft::default(),
            focus: Field::Name,
            errors: Vec::new(),
            submitting_until: None,
            banner_until: None,
            submit_delay: Duration::from_millis(cfg.submit_delay_ms),
            banner: Duration::from_millis(cfg.banner_ms),
        }
    }

    pub fn focus(&self) -> Field {
        self.focus
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.prev();
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn error_for(&self, field: Field) -> Option<&FieldError> {
        self.errors.iter().find(|e| e.field == field)
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting_until.is_some()
    }

    pub fn banner_visible(&self) -> bool {
        self.banner_until.is_some()
    }

    pub fn insert_char(&mut self, ch: char) {
        if !self.is_submitting() {
            self.draft.value_mut(self.focus).push(ch);
        }
    }

    pub fn backspace(&mut self) {
        if !self.is_submitting() {
            self.draft.value_mut(self.focus).pop();
        }
    }

    pub fn submit(&mut self, now: Instant) -> SubmitResult {
        if self.is_submitting() {
            return SubmitResult::Busy;
        }
        let errors = self.draft.validate();
        if !errors.is_empty() {
            self.errors = errors.clone();
            if let Some(first) = errors.first() {
                self.focus = first.field;
            }
            return SubmitResult::Rejected(errors);
        }
        self.errors.clear();
        if !self.draft.honeypot.is_empty() {
            debug!("contact submission dropped by honeypot");
            return SubmitResult::Dropped;
        }
        self.submitting_until = Some(now + self.submit_delay);
        SubmitResult::Submitting
    }

    /// Returns the submitted draft on the tick that completes the
    /// submission; the form is reset at the same moment.
    pub fn poll(&mut self, now: Instant) -> Option<ContactDraft> {
        if self.banner_until.is_some_and(|until| now >= until) {
            self.banner_until = None;
        }
        let until = self.submitting_until?;
        if now < until {
            return None;
        }
        self.submitting_until = None;
        let submitted = std::mem::take(&mut self.draft);
        info!(
            name = %submitted.name,
            email = %submitted.email,
            company = %submitted.company,
            position = %submitted.position,
            "contact message submitted"
        );
        self.focus = Field::Name;
        self.banner_until = Some(now + self.banner);
        Some(submitted)
    }
}
