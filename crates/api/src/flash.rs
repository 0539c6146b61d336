//! Flash redirects for form actions.
//!
//! Every form action answers `303 See Other`. The outcome travels in the
//! query string of the target location as `m=<message>&t=success|error`,
//! which the page reads and shows once.

use axum::response::{IntoResponse, Redirect, Response};
use serde::Serialize;

use crate::error::AppError;

/// Outcome marker carried in the `t` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashKind {
    Success,
    Error,
}

/// A redirect carrying a one-shot message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash {
    pub path: String,
    pub kind: FlashKind,
    pub message: String,
}

/// Return type of form-action handlers. Both arms redirect.
pub type ActionResult = Result<Flash, Flash>;

impl Flash {
    pub fn success(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: FlashKind::Success,
            message: message.into(),
        }
    }

    pub fn error(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: FlashKind::Error,
            message: message.into(),
        }
    }

    /// Report `err` at `path`.
    pub fn from_error(path: impl Into<String>, err: &AppError) -> Self {
        let path = path.into();
        tracing::warn!(error = %err, redirect = %path, "Form action failed");
        Self::error(path, err.user_message())
    }

    /// The full redirect target, including the message parameters.
    pub fn location(&self) -> String {
        let query = serde_urlencoded::to_string([
            ("m", self.message.as_str()),
            ("t", self.kind.as_str()),
        ])
        .unwrap_or_default();
        let sep = if self.path.contains('?') { '&' } else { '?' };
        format!("{}{sep}{query}", self.path)
    }
}

impl FlashKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FlashKind::Success => "success",
            FlashKind::Error => "error",
        }
    }
}

impl IntoResponse for Flash {
    fn into_response(self) -> Response {
        Redirect::to(&self.location()).into_response()
    }
}

/// Turn any handler error into an error flash at a fixed location.
pub trait OrFlash<T> {
    fn or_flash(self, path: &str) -> Result<T, Flash>;
}

impl<T, E: Into<AppError>> OrFlash<T> for Result<T, E> {
    fn or_flash(self, path: &str) -> Result<T, Flash> {
        self.map_err(|e| Flash::from_error(path, &e.into()))
    }
}

/// Accept a caller-supplied redirect only if it is a local absolute path.
pub fn safe_redirect(candidate: Option<&str>, fallback: &str) -> String {
    match candidate.map(str::trim) {
        Some(path) if path.starts_with('/') && !path.starts_with("//") => path.to_string(),
        _ => fallback.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header, StatusCode};
    use coflow_core::error::CoreError;

    #[test]
    fn location_encodes_message() {
        let flash = Flash::success("/projects", "Project created");
        assert_eq!(flash.location(), "/projects?m=Project+created&t=success");
    }

    #[test]
    fn location_appends_to_existing_query() {
        let flash = Flash::error("/change-orders?status=draft", "Title is required");
        assert_eq!(
            flash.location(),
            "/change-orders?status=draft&m=Title+is+required&t=error"
        );
    }

    #[test]
    fn responds_with_see_other() {
        let response = Flash::success("/projects/1", "Saved & done").into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers()[header::LOCATION],
            "/projects/1?m=Saved+%26+done&t=success"
        );
    }

    #[test]
    fn validation_error_becomes_error_flash() {
        let err: Result<(), AppError> =
            Err(CoreError::Validation("CO number is required".into()).into());
        let flash = err.or_flash("/change-orders/new").unwrap_err();
        assert_eq!(flash.kind, FlashKind::Error);
        assert_eq!(flash.message, "CO number is required");
        assert_eq!(flash.path, "/change-orders/new");
    }

    #[test]
    fn redirects_stay_local() {
        assert_eq!(safe_redirect(Some("/projects/7"), "/"), "/projects/7");
        assert_eq!(safe_redirect(Some("https://evil.test"), "/projects"), "/projects");
        assert_eq!(safe_redirect(Some("//evil.test"), "/projects"), "/projects");
        assert_eq!(safe_redirect(None, "/projects"), "/projects");
    }
}
