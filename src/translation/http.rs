use reqwest::{Client, Proxy, RequestBuilder};

use super::service::ServiceConfig;
use crate::error::Result;

/// `User-Agent` sent with every provider request.
pub const USER_AGENT: &str = concat!(
    "subtranslate/",
    env!("CARGO_PKG_VERSION"),
    " (MediaWiki subpage machine translation)"
);

/// Builds the HTTP client shared by all requests to one provider.
pub fn build_client(config: &ServiceConfig) -> Result<Client> {
    let mut builder = Client::builder()
        .user_agent(USER_AGENT)
        .timeout(config.timeout);

    if let Some(proxy) = &config.http_proxy {
        builder = builder.proxy(Proxy::all(proxy)?);
    }

    Ok(builder.build()?)
}

/// Sends a single-attempt request and returns the body of a 200 response.
///
/// Transport errors, timeouts and non-200 statuses are logged and mapped to
/// `None`; they are never retried here.
pub async fn send(request: RequestBuilder, provider: &str) -> Option<String> {
    let response = match request.send().await {
        Ok(response) => response,
        Err(e) => {
            tracing::error!(provider, error = %e, timeout = e.is_timeout(), "Request to provider failed");
            return None;
        }
    };

    let status = response.status();
    if status != reqwest::StatusCode::OK {
        let reason = status.canonical_reason().unwrap_or("Unknown");
        tracing::error!(
            provider,
            status = status.as_u16(),
            reason,
            "Request to provider returned a non-200 status"
        );
        return None;
    }

    match response.text().await {
        Ok(body) => Some(body),
        Err(e) => {
            tracing::error!(provider, error = %e, "Failed to read provider response body");
            None
        }
    }
}
