//! Minimal RFC 2822 HTML message, encoded for the Gmail `raw` field.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

/// An outgoing HTML message.
#[derive(Debug, Clone)]
pub struct Message<'a> {
    pub from: &'a str,
    pub to: &'a [String],
    pub subject: &'a str,
    pub html: &'a str,
}

impl Message<'_> {
    /// Render headers and body separated by CRLF.
    /// Line breaks inside header values become spaces.
    pub fn to_mime(&self) -> String {
        let to: Vec<String> = self.to.iter().map(|addr| header_value(addr)).collect();
        let headers = [
            format!("From: {}", header_value(self.from)),
            format!("To: {}", to.join(", ")),
            format!("Subject: {}", header_value(self.subject)),
            "MIME-Version: 1.0".to_string(),
            "Content-Type: text/html; charset=UTF-8".to_string(),
        ];
        format!("{}\r\n\r\n{}", headers.join("\r\n"), self.html)
    }

    /// The message as unpadded base64url, as the send endpoint expects.
    pub fn to_raw(&self) -> String {
        URL_SAFE_NO_PAD.encode(self.to_mime())
    }
}

/// Replace CR and LF with spaces.
fn header_value(raw: &str) -> String {
    raw.replace(['\r', '\n'], " ")
}
