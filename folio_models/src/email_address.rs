use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailAddress(pub lettre::Address);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailAddressWithName(pub lettre::message::Mailbox);

impl EmailAddress {
    pub fn as_str(&self) -> &str {
        self.0.as_ref()
    }
}

impl EmailAddressWithName {
    pub fn name(&self) -> Option<&str> {
        self.0.name.as_deref()
    }

    pub fn email(&self) -> &str {
        self.0.email.as_ref()
    }
}

impl From<EmailAddress> for EmailAddressWithName {
    fn from(value: EmailAddress) -> Self {
        Self(lettre::message::Mailbox::new(None, value.0))
    }
}

impl FromStr for EmailAddress {
    type Err = <lettre::Address as FromStr>::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

impl FromStr for EmailAddressWithName {
    type Err = <lettre::message::Mailbox as FromStr>::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl fmt::Display for EmailAddressWithName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_mailbox_with_display_name() {
        let mailbox = "Portfolio Contact Form <onboarding@resend.dev>"
            .parse::<EmailAddressWithName>()
            .unwrap();
        assert_eq!(mailbox.name(), Some("Portfolio Contact Form"));
        assert_eq!(mailbox.email(), "onboarding@resend.dev");
    }

    #[test]
    fn reject_invalid_address() {
        assert!("not-an-email".parse::<EmailAddress>().is_err());
        assert!("".parse::<EmailAddress>().is_err());
    }

    #[test]
    fn address_without_name() {
        let mailbox = EmailAddressWithName::from("ana@example.com".parse::<EmailAddress>().unwrap());
        assert_eq!(mailbox.name(), None);
        assert_eq!(mailbox.to_string(), "ana@example.com");
    }
}
