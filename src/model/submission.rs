use serde::Deserialize;
use serde::Serialize;

use crate::Result;
use crate::ValidationError;

/// Raw subscriber input, as received from the front-end
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub key: String,
}

impl Submission {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
        key: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
            key: key.into(),
        }
    }

    /// Trims every field and checks that the submission is complete.
    ///
    /// # Errors
    /// - `ValidationError::MissingField` for the first blank field
    /// - `ValidationError::MalformedEmail` if the address has no local part or domain
    pub fn normalized(self) -> Result<Self> {
        let normalized = Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            key: self.key.trim().to_string(),
        };

        for (field, value) in [
            ("name", &normalized.name),
            ("email", &normalized.email),
            ("phone", &normalized.phone),
            ("key", &normalized.key),
        ] {
            if value.is_empty() {
                return Err(ValidationError::MissingField(field).into());
            }
        }

        if !is_plausible_email(&normalized.email) {
            return Err(ValidationError::MalformedEmail(normalized.email).into());
        }

        Ok(normalized)
    }
}

pub(crate) fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    }
}
