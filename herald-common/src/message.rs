use serde::{Deserialize, Serialize};

use crate::recipient::Recipient;

/// A fully rendered outbound message, ready for a transport.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub html_body: String,
}

/// The outreach template a campaign renders once per recipient.
///
/// `{{company}}` and `{{email}}` placeholders in the subject and body are
/// substituted at render time. The content itself is configuration; Herald
/// never generates it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MessageTemplate {
    #[serde(default = "default_from")]
    pub from: String,
    #[serde(default = "default_subject")]
    pub subject: String,
    #[serde(default = "default_html_body")]
    pub html_body: String,
}

fn default_from() -> String {
    "outreach@herald.invalid".to_string()
}

fn default_subject() -> String {
    "Partnership opportunity with {{company}}".to_string()
}

fn default_html_body() -> String {
    "<p>Hello {{company}},</p>\
     <p>We would love to explore a collaboration with your team. \
     Reply to this address and we will take it from there.</p>"
        .to_string()
}

impl Default for MessageTemplate {
    fn default() -> Self {
        Self {
            from: default_from(),
            subject: default_subject(),
            html_body: default_html_body(),
        }
    }
}

impl MessageTemplate {
    /// Render the template for one recipient.
    #[must_use]
    pub fn render(&self, recipient: &Recipient) -> Message {
        Message {
            from: self.from.clone(),
            to: recipient.email.clone(),
            subject: substitute(&self.subject, recipient),
            html_body: substitute(&self.html_body, recipient),
        }
    }
}

fn substitute(text: &str, recipient: &Recipient) -> String {
    text.replace("{{company}}", &recipient.company)
        .replace("{{email}}", &recipient.email)
}
