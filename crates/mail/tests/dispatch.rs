//! End-to-end dispatch against a local stand-in for the token and send
//! endpoints.

use std::sync::{Arc, Mutex};

use assert_matches::assert_matches;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Form, Json, Router};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use coflow_mail::{GmailSender, MailConfig, MailError};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use serde_json::{json, Value};

const PRIVATE_KEY: &str = include_str!("fixtures/service_account_key.pem");
const PUBLIC_KEY: &str = include_str!("fixtures/service_account_pub.pem");

#[derive(Default)]
struct Recorded {
    token_requests: usize,
    assertion: Option<String>,
    authorization: Option<String>,
    raw: Option<String>,
}

#[derive(Clone)]
struct FakeGoogle {
    recorded: Arc<Mutex<Recorded>>,
    token_status: StatusCode,
    send_status: StatusCode,
}

#[derive(Deserialize)]
struct TokenForm {
    grant_type: String,
    assertion: String,
}

async fn token(State(fake): State<FakeGoogle>, Form(form): Form<TokenForm>) -> (StatusCode, Json<Value>) {
    assert_eq!(form.grant_type, "urn:ietf:params:oauth:grant-type:jwt-bearer");
    let mut recorded = fake.recorded.lock().unwrap();
    recorded.token_requests += 1;
    recorded.assertion = Some(form.assertion);
    (
        fake.token_status,
        Json(json!({ "access_token": "ya29.test-token", "token_type": "Bearer", "expires_in": 3600 })),
    )
}

async fn send(
    State(fake): State<FakeGoogle>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, String) {
    let mut recorded = fake.recorded.lock().unwrap();
    recorded.authorization = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    recorded.raw = body["raw"].as_str().map(str::to_string);
    (fake.send_status, "{\"id\":\"18c\"}".to_string())
}

/// Start the fake endpoints and return a sender pointed at them.
async fn start(token_status: StatusCode, send_status: StatusCode) -> (GmailSender, Arc<Mutex<Recorded>>, String) {
    let fake = FakeGoogle {
        recorded: Arc::default(),
        token_status,
        send_status,
    };
    let recorded = Arc::clone(&fake.recorded);
    let app = Router::new()
        .route("/token", post(token))
        .route("/send", post(send))
        .with_state(fake);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let token_uri = format!("{base}/token");
    let config = MailConfig {
        client_email: Some("svc@coflow.iam.gserviceaccount.com".into()),
        private_key: Some(PRIVATE_KEY.replace('\n', "\\n")),
        impersonate_email: Some("info@example.com".into()),
        token_uri: token_uri.clone(),
        send_url: format!("{base}/send"),
    };
    (GmailSender::new(config), recorded, token_uri)
}

fn to() -> Vec<String> {
    vec!["pm@gc.com".to_string(), "owner@client.org".to_string()]
}

#[tokio::test]
async fn sends_signed_message() {
    let (sender, recorded, token_uri) = start(StatusCode::OK, StatusCode::OK).await;

    sender
        .send(&to(), "Delay Notice - 24-118 - Glass", "<p>Late</p>")
        .await
        .unwrap();

    let recorded = recorded.lock().unwrap();
    assert_eq!(recorded.authorization.as_deref(), Some("Bearer ya29.test-token"));

    let mut validation = Validation::new(Algorithm::RS256);
    validation.set_audience(&[token_uri.as_str()]);
    let claims = jsonwebtoken::decode::<Value>(
        recorded.assertion.as_deref().unwrap(),
        &DecodingKey::from_rsa_pem(PUBLIC_KEY.as_bytes()).unwrap(),
        &validation,
    )
    .unwrap()
    .claims;
    assert_eq!(claims["iss"], "svc@coflow.iam.gserviceaccount.com");
    assert_eq!(claims["sub"], "info@example.com");
    assert_eq!(claims["scope"], "https://www.googleapis.com/auth/gmail.send");

    let mime = URL_SAFE_NO_PAD
        .decode(recorded.raw.as_deref().unwrap())
        .unwrap();
    assert_eq!(
        String::from_utf8(mime).unwrap(),
        "From: info@example.com\r\nTo: pm@gc.com, owner@client.org\r\n\
         Subject: Delay Notice - 24-118 - Glass\r\nMIME-Version: 1.0\r\n\
         Content-Type: text/html; charset=UTF-8\r\n\r\n<p>Late</p>"
    );
}

#[tokio::test]
async fn token_rejection_stops_before_send() {
    let (sender, recorded, _) = start(StatusCode::UNAUTHORIZED, StatusCode::OK).await;

    let err = sender.send(&to(), "s", "<p></p>").await.unwrap_err();
    assert_matches!(err, MailError::TokenExchange { status: 401, .. });
    assert!(recorded.lock().unwrap().raw.is_none());
}

#[tokio::test]
async fn send_rejection_carries_status_and_body() {
    let (sender, _, _) = start(StatusCode::OK, StatusCode::BAD_REQUEST).await;

    let err = sender.send(&to(), "s", "<p></p>").await.unwrap_err();
    assert_matches!(
        err,
        MailError::SendFailed { status: 400, body } if body.contains("18c")
    );
}

#[tokio::test]
async fn no_recipients_makes_no_request() {
    let (sender, recorded, _) = start(StatusCode::OK, StatusCode::OK).await;

    let err = sender.send(&[], "s", "<p></p>").await.unwrap_err();
    assert_matches!(err, MailError::NoRecipients);
    assert_eq!(recorded.lock().unwrap().token_requests, 0);
}
