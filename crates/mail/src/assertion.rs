//! RS256 service-account assertion for the OAuth 2.0 JWT-bearer grant.
//!
//! The header and claims are serialized in a fixed field order
//! (`{"alg","typ"}` and `iss, scope, aud, iat, exp, sub`) so the token is
//! byte-for-byte reproducible for a given key and timestamp.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use jsonwebtoken::{Algorithm, EncodingKey};
use serde::{Deserialize, Serialize};

use crate::config::Credentials;
use crate::MailError;

/// Lifetime of an assertion in seconds.
pub const ASSERTION_TTL_SECS: i64 = 3600;

#[derive(Debug, Serialize)]
struct AssertionHeader {
    alg: &'static str,
    typ: &'static str,
}

/// Claims of a service-account assertion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub iss: String,
    pub scope: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
    pub sub: String,
}

impl Claims {
    pub fn new(creds: &Credentials<'_>, scope: &str, now: i64) -> Self {
        Self {
            iss: creds.client_email.to_string(),
            scope: scope.to_string(),
            aud: creds.token_uri.to_string(),
            iat: now,
            exp: now + ASSERTION_TTL_SECS,
            sub: creds.impersonate_email.to_string(),
        }
    }
}

/// Replace literal `\n` escapes with newlines. Keys pasted into a single
/// environment variable usually arrive escaped.
pub fn normalize_private_key(raw: &str) -> String {
    raw.replace("\\n", "\n")
}

/// Sign `claims` with the PEM `private_key`, returning the compact JWT.
pub fn sign(claims: &Claims, private_key: &str) -> Result<String, MailError> {
    let key = EncodingKey::from_rsa_pem(normalize_private_key(private_key).as_bytes())?;

    let header = AssertionHeader {
        alg: "RS256",
        typ: "JWT",
    };
    let signing_input = format!(
        "{}.{}",
        URL_SAFE_NO_PAD.encode(serde_json::to_vec(&header)?),
        URL_SAFE_NO_PAD.encode(serde_json::to_vec(claims)?),
    );
    // Returns the signature already base64url-encoded without padding.
    let signature = jsonwebtoken::crypto::sign(signing_input.as_bytes(), &key, Algorithm::RS256)?;
    Ok(format!("{signing_input}.{signature}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GMAIL_SEND_SCOPE;
    use assert_matches::assert_matches;
    use jsonwebtoken::{DecodingKey, Validation};

    const PRIVATE_KEY: &str = include_str!("../tests/fixtures/service_account_key.pem");
    const PUBLIC_KEY: &str = include_str!("../tests/fixtures/service_account_pub.pem");

    fn creds() -> Credentials<'static> {
        Credentials {
            client_email: "svc@coflow.iam.gserviceaccount.com",
            private_key: PRIVATE_KEY,
            impersonate_email: "info@example.com",
            token_uri: "https://oauth2.googleapis.com/token",
        }
    }

    #[test]
    fn claims_follow_grant_format() {
        let claims = Claims::new(&creds(), GMAIL_SEND_SCOPE, 1_700_000_000);
        assert_eq!(claims.exp - claims.iat, 3600);
        assert_eq!(claims.sub, "info@example.com");
        assert_eq!(
            serde_json::to_string(&claims).unwrap(),
            "{\"iss\":\"svc@coflow.iam.gserviceaccount.com\",\
             \"scope\":\"https://www.googleapis.com/auth/gmail.send\",\
             \"aud\":\"https://oauth2.googleapis.com/token\",\
             \"iat\":1700000000,\"exp\":1700003600,\"sub\":\"info@example.com\"}"
        );
    }

    #[test]
    fn header_segment_is_fixed() {
        let claims = Claims::new(&creds(), GMAIL_SEND_SCOPE, 1_700_000_000);
        let token = sign(&claims, PRIVATE_KEY).unwrap();
        let header = token.split('.').next().unwrap();
        let decoded = URL_SAFE_NO_PAD.decode(header).unwrap();
        assert_eq!(decoded, br#"{"alg":"RS256","typ":"JWT"}"#);
        assert!(!token.contains('='));
    }

    #[test]
    fn verifies_with_public_key() {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims::new(&creds(), GMAIL_SEND_SCOPE, now);
        let token = sign(&claims, PRIVATE_KEY).unwrap();

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&["https://oauth2.googleapis.com/token"]);
        let decoded = jsonwebtoken::decode::<Claims>(
            &token,
            &DecodingKey::from_rsa_pem(PUBLIC_KEY.as_bytes()).unwrap(),
            &validation,
        )
        .unwrap();
        assert_eq!(decoded.claims, claims);
    }

    #[test]
    fn escaped_newlines_are_accepted() {
        let escaped = PRIVATE_KEY.replace('\n', "\\n");
        let claims = Claims::new(&creds(), GMAIL_SEND_SCOPE, 1_700_000_000);
        assert_eq!(
            sign(&claims, &escaped).unwrap(),
            sign(&claims, PRIVATE_KEY).unwrap()
        );
    }

    #[test]
    fn malformed_key_is_a_signing_error() {
        let claims = Claims::new(&creds(), GMAIL_SEND_SCOPE, 0);
        assert_matches!(sign(&claims, "not a key"), Err(MailError::Signing(_)));
    }
}
