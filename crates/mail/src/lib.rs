//! Outbound email through the Gmail API using a Google service account.
//!
//! The flow is: sign a JWT assertion ([`assertion`]), exchange it for an
//! access token, build an RFC 2822 message ([`mime`]), and post it to the
//! send endpoint ([`gmail::GmailSender`]). [`notice`] renders delay
//! notices into a subject and HTML body.

pub mod assertion;
pub mod config;
pub mod gmail;
pub mod mime;
pub mod notice;

pub use config::MailConfig;
pub use gmail::GmailSender;

/// OAuth scope granting permission to send mail only.
pub const GMAIL_SEND_SCOPE: &str = "https://www.googleapis.com/auth/gmail.send";

/// Error type for email dispatch failures.
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    /// A required setting is missing. Holds the environment variable name.
    #[error("Gmail service account not configured: {0} is not set")]
    NotConfigured(&'static str),

    /// The recipient list is empty.
    #[error("No recipients provided")]
    NoRecipients,

    /// The private key could not be loaded or the assertion signed.
    #[error("Failed to sign service account assertion: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),

    /// A JSON segment of the assertion could not be encoded.
    #[error("Failed to encode assertion: {0}")]
    Encoding(#[from] serde_json::Error),

    /// Transport-level HTTP failure or an unreadable response.
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The token endpoint answered with a non-success status.
    #[error("Token exchange failed: {status}")]
    TokenExchange { status: u16, body: String },

    /// The send endpoint answered with a non-success status.
    #[error("Gmail send failed: {status} {body}")]
    SendFailed { status: u16, body: String },
}
