//! Email delivery through the Gmail API.
//!
//! [`GmailSender`] performs the service-account token exchange and then
//! posts the encoded message. Every precondition is checked before the
//! first network call, and no step is retried.

use chrono::Utc;
use serde::Deserialize;

use crate::assertion::{self, Claims};
use crate::config::MailConfig;
use crate::mime::Message;
use crate::{MailError, GMAIL_SEND_SCOPE};

/// `grant_type` for the OAuth 2.0 JWT-bearer flow.
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

// ---------------------------------------------------------------------------
// GmailSender
// ---------------------------------------------------------------------------

/// Sends HTML email as the configured impersonated mailbox.
#[derive(Debug, Clone)]
pub struct GmailSender {
    config: MailConfig,
    http: reqwest::Client,
}

impl GmailSender {
    pub fn new(config: MailConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    pub fn config(&self) -> &MailConfig {
        &self.config
    }

    /// Send one HTML message to `to`.
    ///
    /// Fails with [`MailError::NoRecipients`] or [`MailError::NotConfigured`]
    /// without touching the network.
    pub async fn send(&self, to: &[String], subject: &str, html: &str) -> Result<(), MailError> {
        if to.is_empty() {
            return Err(MailError::NoRecipients);
        }
        let creds = self.config.credentials()?;

        let claims = Claims::new(&creds, GMAIL_SEND_SCOPE, Utc::now().timestamp());
        let jwt = assertion::sign(&claims, creds.private_key)?;
        let access_token = self.exchange_token(creds.token_uri, &jwt).await?;

        let raw = Message {
            from: creds.impersonate_email,
            to,
            subject,
            html,
        }
        .to_raw();

        let response = self
            .http
            .post(&self.config.send_url)
            .bearer_auth(&access_token)
            .json(&serde_json::json!({ "raw": raw }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "Gmail send rejected");
            return Err(MailError::SendFailed {
                status: status.as_u16(),
                body,
            });
        }

        tracing::info!(recipients = to.len(), subject, "Email sent");
        Ok(())
    }

    /// Trade a signed assertion for a bearer token.
    async fn exchange_token(&self, token_uri: &str, jwt: &str) -> Result<String, MailError> {
        let response = self
            .http
            .post(token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", jwt)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "Service account token exchange rejected");
            return Err(MailError::TokenExchange {
                status: status.as_u16(),
                body,
            });
        }

        let token: TokenResponse = response.json().await?;
        Ok(token.access_token)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    // Port 9 (discard) is never listened on in test environments; reaching
    // the network at all would surface as `MailError::Request`.
    fn unreachable_config() -> MailConfig {
        MailConfig {
            token_uri: "http://127.0.0.1:9/token".into(),
            send_url: "http://127.0.0.1:9/send".into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn empty_recipients_rejected_first() {
        let sender = GmailSender::new(unreachable_config());
        let err = sender.send(&[], "subject", "<p></p>").await.unwrap_err();
        assert_matches!(err, MailError::NoRecipients);
    }

    #[tokio::test]
    async fn missing_credentials_rejected_before_network() {
        let sender = GmailSender::new(unreachable_config());
        let err = sender
            .send(&["pm@gc.com".to_string()], "subject", "<p></p>")
            .await
            .unwrap_err();
        assert_matches!(err, MailError::NotConfigured("GMAIL_SA_CLIENT_EMAIL"));
    }

    #[test]
    fn send_failed_display() {
        let err = MailError::SendFailed {
            status: 403,
            body: "forbidden".into(),
        };
        assert_eq!(err.to_string(), "Gmail send failed: 403 forbidden");
    }
}
