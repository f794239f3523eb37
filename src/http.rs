//! Shared HTTP helper for the Disk API.
//!
//! Every request, whether a metadata lookup or the file download itself, goes
//! through [`Transport::get`]: the query string is re-encoded, the header
//! contract is applied, and any status other than `200 OK` becomes
//! [`DiskError::ApiError`].

use std::time::Duration;

use reqwest::header::{ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::error::{DiskError, Result};
use crate::models::ApiErrorResponse;

/// Total time allowed for one request, body included.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// User-Agent sent with every request.
pub const DEFAULT_USER_AGENT: &str = concat!("yadisk/", env!("CARGO_PKG_VERSION"));

/// When to send the `Authorization` header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuthHeaderPolicy {
    /// Send `OAuth {token}` only when the token is non-empty.
    #[default]
    IfPresent,
    /// Always send `OAuth {token}`, even as `"OAuth "` for an empty token.
    Always,
}

/// Build the `Authorization` header value for a token under a policy.
pub fn authorization_value(token: Option<&str>, policy: AuthHeaderPolicy) -> Option<String> {
    let token = token.unwrap_or_default();
    match policy {
        AuthHeaderPolicy::IfPresent if token.is_empty() => None,
        _ => Some(format!("OAuth {}", token)),
    }
}

/// Parse `uri` and re-encode its query so non-ASCII values (e.g. Cyrillic
/// file names) travel percent-encoded.
///
/// Pairs are decoded, sorted by key and written back form-encoded.
///
/// ```
/// use yadisk::http::encode_query;
///
/// let url = encode_query("https://api.example/disk?path=Горы.jpg").unwrap();
/// assert_eq!(url.query(), Some("path=%D0%93%D0%BE%D1%80%D1%8B.jpg"));
/// ```
pub fn encode_query(uri: &str) -> Result<Url> {
    let mut url = Url::parse(uri)?;
    let mut pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();

    if pairs.is_empty() {
        url.set_query(None);
        return Ok(url);
    }

    pairs.sort_by(|a, b| a.0.cmp(&b.0));
    url.query_pairs_mut().clear().extend_pairs(pairs);
    Ok(url)
}

/// GET helper carrying the header contract and timeout.
#[derive(Clone)]
pub struct Transport {
    http: Client,
    authorization: Option<String>,
    user_agent: String,
    timeout: Duration,
}

impl std::fmt::Debug for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transport")
            .field("authorization", &self.authorization.as_ref().map(|_| "<redacted>"))
            .field("user_agent", &self.user_agent)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Transport {
    /// Create a transport. `authorization` is the full header value, if any.
    pub fn new(authorization: Option<String>, user_agent: String, timeout: Duration) -> Self {
        Self {
            http: Client::new(),
            authorization,
            user_agent,
            timeout,
        }
    }

    /// Whether requests carry an `Authorization` header.
    pub fn sends_authorization(&self) -> bool {
        self.authorization.is_some()
    }

    /// Issue a single GET. The caller owns the returned body.
    pub async fn get(&self, uri: &str) -> Result<Response> {
        let url = encode_query(uri)?;
        debug!(url = %url, auth = self.authorization.is_some(), "GET");

        let mut request = self
            .http
            .get(url.clone())
            .timeout(self.timeout)
            .header(ACCEPT, "application/json")
            .header(USER_AGENT, &self.user_agent);

        if let Some(ref auth) = self.authorization {
            request = request.header(AUTHORIZATION, auth);
        }

        let response = request.send().await?;
        let status = response.status();

        if status != StatusCode::OK {
            let error_body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorResponse>(&error_body)
                .ok()
                .and_then(|body| body.summary())
                .or_else(|| {
                    let trimmed = error_body.trim();
                    (!trimmed.is_empty()).then(|| trimmed.to_string())
                });
            warn!(url = %url, status = status.as_u16(), "request failed");
            return Err(DiskError::ApiError {
                url: url.to_string(),
                status: status.as_u16(),
                message,
            });
        }

        Ok(response)
    }

    /// GET and decode a JSON body.
    pub async fn get_json<T: DeserializeOwned>(&self, uri: &str) -> Result<T> {
        let response = self.get(uri).await?;
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}
