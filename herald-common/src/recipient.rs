use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

/// One campaign target: an email address and the company it belongs to.
///
/// Recipient sequences reach the dispatcher already parsed (CSV handling and
/// column normalization happen upstream); validation here is limited to
/// rejecting blank fields.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    pub email: String,
    pub company: String,
}

impl Recipient {
    #[must_use]
    pub fn new(email: impl Into<String>, company: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            company: company.into(),
        }
    }

    /// Whether both fields are non-blank after trimming.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.email.trim().is_empty() && !self.company.trim().is_empty()
    }

    /// Trimmed copy of this recipient, or `None` if either field is blank.
    #[must_use]
    pub fn normalized(&self) -> Option<Self> {
        let email = self.email.trim();
        let company = self.company.trim();

        if email.is_empty() || company.is_empty() {
            return None;
        }

        Some(Self {
            email: email.to_string(),
            company: company.to_string(),
        })
    }
}

impl Display for Recipient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}>", self.company, self.email)
    }
}
