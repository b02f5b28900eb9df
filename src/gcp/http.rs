//! HTTP fetcher for control-plane REST calls
//!
//! Thin wrapper over reqwest: authenticated GET, bounded timeout, typed
//! failure. Every failure is reported through [`Error`] so callers can apply
//! their own retry or fallback policy; nothing here panics or exits.

use crate::error::{Error, Result};
use reqwest::Client;
use std::time::Duration;

/// Per-request timeout. A timed-out fetch reports failure immediately;
/// retries belong to the caller.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Truncate and strip non-printable characters before a body reaches the log.
fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        // Cut on a char boundary; a multibyte character straddling the
        // limit must not panic the fetcher.
        let mut end = MAX_LOG_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!(
            "{}... [truncated, {} bytes total]",
            &body[..end],
            body.len()
        )
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

/// HTTP client for authenticated control-plane GETs.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
}

impl ApiClient {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("cdctl/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self { client })
    }

    /// GET `url` with a bearer token, returning the raw response body.
    ///
    /// The Authorization header value is never logged; only the method, URL,
    /// status, and a truncated body are.
    pub async fn get(&self, url: &str, token: &str) -> Result<String> {
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .bearer_auth(token)
            .header("Content-Type", "application/json")
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!("GET {} -> {} - {}", url, status, sanitize_for_log(&body));
            return Err(Error::BadStatus(status));
        }

        tracing::debug!("GET {} -> {} - {}", url, status, sanitize_for_log(&body));
        Ok(body)
    }
}
