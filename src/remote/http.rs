//! Blocking HTTPS fetcher.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;

use super::{Fetch, Fetched};
use crate::error::{Error, Result};

/// Default timeout for a single request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// User agent sent with every request.
pub const USER_AGENT: &str = concat!("gdoc2tex/", env!("CARGO_PKG_VERSION"));

/// Fetcher backed by a reqwest blocking client, optionally authorized.
pub struct HttpFetcher {
    client: Client,
    access_token: Option<String>,
}

impl HttpFetcher {
    /// Build a fetcher with [`DEFAULT_TIMEOUT`].
    pub fn new(access_token: Option<String>) -> Result<Self> {
        Self::with_timeout(access_token, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(access_token: Option<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            access_token,
        })
    }

    pub fn is_authorized(&self) -> bool {
        self.access_token.is_some()
    }
}

impl Fetch for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Fetched> {
        log::debug!("GET {url}");

        let mut request = self.client.get(url);
        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }
        let response = request.send()?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(media_type);
        let body = response.bytes()?.to_vec();

        if !status.is_success() {
            let message = error_message(&body).unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("unknown error")
                    .to_string()
            });
            return Err(Error::Remote {
                url: url.to_string(),
                status: status.as_u16(),
                message,
            });
        }

        Ok(Fetched { body, content_type })
    }
}

/// `image/png; charset=binary` -> `image/png`.
fn media_type(header: &str) -> String {
    header
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

#[derive(Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Message of a Google API JSON error body.
fn error_message(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .map(|b| b.error.message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_type_strips_parameters() {
        assert_eq!(media_type("image/png"), "image/png");
        assert_eq!(media_type("Image/JPEG; charset=binary"), "image/jpeg");
        assert_eq!(media_type(""), "");
    }

    #[test]
    fn test_error_message_from_api_body() {
        let body = br#"{"error":{"errors":[],"code":404,"message":"File not found: abc"}}"#;
        assert_eq!(error_message(body).as_deref(), Some("File not found: abc"));
    }

    #[test]
    fn test_error_message_from_html_body() {
        assert_eq!(error_message(b"<html>Forbidden</html>"), None);
    }

    #[test]
    fn test_fetcher_builds() {
        let fetcher = HttpFetcher::new(Some("token".to_string())).unwrap();
        assert!(fetcher.is_authorized());
        assert!(USER_AGENT.starts_with("gdoc2tex/"));
    }
}
