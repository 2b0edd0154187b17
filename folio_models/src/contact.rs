//! Contact form submissions and the rule set that decides whether one is
//! valid.
//!
//! [`validate`] is the only place these rules live. The form validator and
//! the submission handler both call it, so a submission accepted on one side
//! is accepted on the other.

use std::{collections::BTreeMap, fmt, str::FromStr};

use nutype::nutype;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use thiserror::Error;

use crate::{email_address::EmailAddress, macros::nutype_string};

pub const NAME_MAX_LENGTH: usize = 100;
pub const SUBJECT_MAX_LENGTH: usize = 200;
pub const MESSAGE_MAX_LENGTH: usize = 5000;

nutype_string!(ContactName(
    sanitize(trim),
    validate(not_empty, len_char_max = 100)
));
nutype_string!(ContactSubject(
    sanitize(trim),
    validate(not_empty, len_char_max = 200)
));
nutype_string!(ContactMessageBody(
    sanitize(trim),
    validate(not_empty, len_char_max = 5000)
));

#[nutype(
    sanitize(trim),
    derive(Debug, Clone, PartialEq, Eq, Hash, Deref, From, Serialize, Deserialize)
)]
pub struct ContactBudget(String);

/// A submission that passed [`validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactSubmission {
    pub name: ContactName,
    pub email: EmailAddress,
    pub subject: ContactSubject,
    pub message: ContactMessageBody,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<ContactBudget>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub honeypot: Option<String>,
}

impl ContactSubmission {
    /// Whether the hidden honeypot field was filled in.
    pub fn is_spam(&self) -> bool {
        self.honeypot.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ContactField {
    Name,
    Email,
    Subject,
    Message,
    Budget,
    Honeypot,
}

impl ContactField {
    pub const ALL: [Self; 6] = [
        Self::Name,
        Self::Email,
        Self::Subject,
        Self::Message,
        Self::Budget,
        Self::Honeypot,
    ];

    pub const REQUIRED: [Self; 4] = [Self::Name, Self::Email, Self::Subject, Self::Message];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Subject => "subject",
            Self::Message => "message",
            Self::Budget => "budget",
            Self::Honeypot => "honeypot",
        }
    }
}

impl fmt::Display for ContactField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown contact form field: {0:?}")]
pub struct UnknownContactField(pub String);

impl FromStr for ContactField {
    type Err = UnknownContactField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| UnknownContactField(s.into()))
    }
}

impl Serialize for ContactField {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ContactField {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer)?
            .parse()
            .map_err(serde::de::Error::custom)
    }
}

/// Messages describing why individual fields were rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<ContactField, Vec<String>>);

impl FieldErrors {
    pub fn push(&mut self, field: ContactField, message: impl Into<String>) {
        self.0.entry(field).or_default().push(message.into());
    }

    /// Replaces all messages of `field`. An empty list clears the field.
    pub fn set(&mut self, field: ContactField, messages: Vec<String>) {
        if messages.is_empty() {
            self.0.remove(&field);
        } else {
            self.0.insert(field, messages);
        }
    }

    pub fn get(&self, field: ContactField) -> &[String] {
        self.0.get(&field).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn contains(&self, field: ContactField) -> bool {
        self.0.contains_key(&field)
    }

    pub fn fields(&self) -> impl Iterator<Item = ContactField> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ContactField, &[String])> {
        self.0.iter().map(|(&field, messages)| (field, messages.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (field, messages)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {}", messages.join(", "))?;
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}

/// Raw value of a single field before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FieldValue {
    /// Absent or `null`.
    #[default]
    Missing,
    Text(String),
    /// Present, but not a string.
    Invalid,
}

impl FieldValue {
    fn from_json(value: Option<&Value>) -> Self {
        match value {
            None | Some(Value::Null) => Self::Missing,
            Some(Value::String(text)) => Self::Text(text.clone()),
            Some(_) => Self::Invalid,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.into())
    }
}

/// Unvalidated contact form input, either taken from the interactive form
/// or decoded from a request body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactCandidate {
    pub name: FieldValue,
    pub email: FieldValue,
    pub subject: FieldValue,
    pub message: FieldValue,
    pub budget: FieldValue,
    pub honeypot: FieldValue,
}

impl ContactCandidate {
    /// Reads the contact fields of a JSON object. Anything that is not an
    /// object produces a candidate with every field missing.
    pub fn from_json(value: &Value) -> Self {
        let Some(object) = value.as_object() else {
            return Self::default();
        };
        let field = |field: ContactField| FieldValue::from_json(object.get(field.as_str()));

        Self {
            name: field(ContactField::Name),
            email: field(ContactField::Email),
            subject: field(ContactField::Subject),
            message: field(ContactField::Message),
            budget: field(ContactField::Budget),
            honeypot: field(ContactField::Honeypot),
        }
    }

    pub fn get(&self, field: ContactField) -> &FieldValue {
        match field {
            ContactField::Name => &self.name,
            ContactField::Email => &self.email,
            ContactField::Subject => &self.subject,
            ContactField::Message => &self.message,
            ContactField::Budget => &self.budget,
            ContactField::Honeypot => &self.honeypot,
        }
    }
}

/// Field state of the interactive contact form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactFormDraft {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub budget: String,
    pub honeypot: String,
}

impl ContactFormDraft {
    pub fn get(&self, field: ContactField) -> &str {
        match field {
            ContactField::Name => &self.name,
            ContactField::Email => &self.email,
            ContactField::Subject => &self.subject,
            ContactField::Message => &self.message,
            ContactField::Budget => &self.budget,
            ContactField::Honeypot => &self.honeypot,
        }
    }

    pub fn set(&mut self, field: ContactField, value: impl Into<String>) {
        let slot = match field {
            ContactField::Name => &mut self.name,
            ContactField::Email => &mut self.email,
            ContactField::Subject => &mut self.subject,
            ContactField::Message => &mut self.message,
            ContactField::Budget => &mut self.budget,
            ContactField::Honeypot => &mut self.honeypot,
        };
        *slot = value.into();
    }
}

impl From<&ContactFormDraft> for ContactCandidate {
    fn from(draft: &ContactFormDraft) -> Self {
        Self {
            name: draft.name.as_str().into(),
            email: draft.email.as_str().into(),
            subject: draft.subject.as_str().into(),
            message: draft.message.as_str().into(),
            budget: draft.budget.as_str().into(),
            honeypot: draft.honeypot.as_str().into(),
        }
    }
}

const REQUIRED: &str = "Required";
const EXPECTED_STRING: &str = "Expected string";
const INVALID_EMAIL: &str = "Invalid email address";

/// Validates a candidate against the contact form rules, collecting the
/// errors of all fields.
pub fn validate(candidate: &ContactCandidate) -> Result<ContactSubmission, FieldErrors> {
    let mut errors = FieldErrors::default();
    let e = &mut errors;

    let name = check(e, ContactField::Name, parse_name(&candidate.name));
    let email = check(e, ContactField::Email, parse_email(&candidate.email));
    let subject = check(e, ContactField::Subject, parse_subject(&candidate.subject));
    let message = check(e, ContactField::Message, parse_message(&candidate.message));
    let budget = check(e, ContactField::Budget, parse_budget(&candidate.budget));
    let honeypot = check(e, ContactField::Honeypot, parse_honeypot(&candidate.honeypot));

    match (name, email, subject, message, budget, honeypot) {
        (Some(name), Some(email), Some(subject), Some(message), Some(budget), Some(honeypot)) => {
            Ok(ContactSubmission {
                name,
                email,
                subject,
                message,
                budget,
                honeypot,
            })
        }
        _ => Err(errors),
    }
}

/// Validates a single field of a candidate, yielding the same messages
/// [`validate`] reports for it.
pub fn validate_field(candidate: &ContactCandidate, field: ContactField) -> Result<(), Vec<String>> {
    let value = candidate.get(field);
    let result = match field {
        ContactField::Name => parse_name(value).map(drop),
        ContactField::Email => parse_email(value).map(drop),
        ContactField::Subject => parse_subject(value).map(drop),
        ContactField::Message => parse_message(value).map(drop),
        ContactField::Budget => parse_budget(value).map(drop),
        ContactField::Honeypot => parse_honeypot(value).map(drop),
    };
    result.map_err(|message| vec![message])
}

fn check<T>(errors: &mut FieldErrors, field: ContactField, result: Result<T, String>) -> Option<T> {
    result.map_err(|message| errors.push(field, message)).ok()
}

fn required_text(value: &FieldValue) -> Result<&str, String> {
    match value {
        FieldValue::Missing => Err(REQUIRED.into()),
        FieldValue::Invalid => Err(EXPECTED_STRING.into()),
        FieldValue::Text(text) => Ok(text),
    }
}

fn optional_text(value: &FieldValue) -> Result<Option<&str>, String> {
    match value {
        FieldValue::Missing => Ok(None),
        FieldValue::Invalid => Err(EXPECTED_STRING.into()),
        FieldValue::Text(text) => Ok(Some(text)),
    }
}

fn parse_name(value: &FieldValue) -> Result<ContactName, String> {
    ContactName::try_new(required_text(value)?.to_owned()).map_err(|err| match err {
        ContactNameError::NotEmptyViolated => "Name is required".into(),
        ContactNameError::LenCharMaxViolated => {
            format!("Name must be at most {NAME_MAX_LENGTH} characters")
        }
    })
}

fn parse_email(value: &FieldValue) -> Result<EmailAddress, String> {
    required_text(value)?
        .trim()
        .parse()
        .map_err(|_| INVALID_EMAIL.into())
}

fn parse_subject(value: &FieldValue) -> Result<ContactSubject, String> {
    ContactSubject::try_new(required_text(value)?.to_owned()).map_err(|err| match err {
        ContactSubjectError::NotEmptyViolated => "Subject is required".into(),
        ContactSubjectError::LenCharMaxViolated => {
            format!("Subject must be at most {SUBJECT_MAX_LENGTH} characters")
        }
    })
}

fn parse_message(value: &FieldValue) -> Result<ContactMessageBody, String> {
    ContactMessageBody::try_new(required_text(value)?.to_owned()).map_err(|err| match err {
        ContactMessageBodyError::NotEmptyViolated => "Message is required".into(),
        ContactMessageBodyError::LenCharMaxViolated => {
            format!("Message must be at most {MESSAGE_MAX_LENGTH} characters")
        }
    })
}

fn parse_budget(value: &FieldValue) -> Result<Option<ContactBudget>, String> {
    Ok(optional_text(value)?
        .map(|budget| ContactBudget::new(budget.to_owned()))
        .filter(|budget| !budget.is_empty()))
}

fn parse_honeypot(value: &FieldValue) -> Result<Option<String>, String> {
    Ok(optional_text(value)?
        .filter(|honeypot| !honeypot.is_empty())
        .map(Into::into))
}
