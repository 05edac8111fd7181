//! Shared reqwest plumbing for the service clients.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Response};

use crate::error::{ClientError, Result};

/// Build a client with a per-call timeout and default headers.
///
/// `headers` holds `(name, value)` pairs; secrets are marked sensitive so
/// they never show up in debug output.
pub(crate) fn build_client(
    service: &'static str,
    timeout: Duration,
    headers: &[(&'static str, &str, bool)],
) -> Result<Client> {
    let mut map = HeaderMap::new();
    map.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    for &(name, value, sensitive) in headers {
        let mut value = HeaderValue::from_str(value.trim()).map_err(|e| ClientError::Config {
            service,
            reason: format!("invalid {} header: {}", name, e),
        })?;
        value.set_sensitive(sensitive);
        map.insert(HeaderName::from_static(name), value);
    }

    Client::builder()
        .timeout(timeout)
        .default_headers(map)
        .build()
        .map_err(|e| ClientError::Config {
            service,
            reason: e.to_string(),
        })
}

/// Turn transport errors and non-2xx statuses into `ClientError`
pub(crate) async fn ensure_success(
    service: &'static str,
    response: std::result::Result<Response, reqwest::Error>,
) -> Result<Response> {
    let response = response.map_err(|source| ClientError::Http { service, source })?;
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "<body unavailable>".to_string());
    Err(ClientError::Status {
        service,
        status: status.as_u16(),
        body,
    })
}

/// Decode a JSON body, mapping failures to `InvalidResponse`
pub(crate) async fn read_json<T: serde::de::DeserializeOwned>(
    service: &'static str,
    response: Response,
) -> Result<T> {
    response
        .json::<T>()
        .await
        .map_err(|e| ClientError::invalid(service, e.to_string()))
}

pub(crate) fn trim_base(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}
