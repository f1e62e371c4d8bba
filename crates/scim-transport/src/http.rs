//! HTTP/JSON transport for the remote SCIM API.

use crate::{RequestContext, ScimRequest, ScimTransport};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use scim_config::DirectoryConfig;
use scim_core::{DirectoryError, DirectoryResult};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Media type for SCIM request and response bodies.
pub const SCIM_CONTENT_TYPE: &str = "application/scim+json";

/// Reqwest-based SCIM transport.
///
/// Authenticates every call with a bearer token and resolves paths against
/// the configured host.
pub struct HttpScimTransport {
    client: Client,
    host: String,
    token: String,
}

impl HttpScimTransport {
    /// Creates a transport from directory connection settings.
    pub fn new(config: &DirectoryConfig) -> DirectoryResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.as_str())
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .map_err(|e| DirectoryError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self::with_client(client, &config.host, config.token.clone()))
    }

    /// Creates a transport around an existing reqwest client.
    pub fn with_client(client: Client, host: &str, token: impl Into<String>) -> Self {
        Self {
            client,
            host: host.trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.host, path)
    }

    async fn send(&self, request: ScimRequest) -> DirectoryResult<Option<Value>> {
        let mut builder = self
            .client
            .request(request.method, self.url(&request.path))
            .bearer_auth(&self.token)
            .header(ACCEPT, SCIM_CONTENT_TYPE);

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder
                .header(CONTENT_TYPE, SCIM_CONTENT_TYPE)
                .body(serde_json::to_vec(body)?);
        }

        let response = builder.send().await.map_err(map_reqwest_error)?;
        handle_response(response).await
    }
}

#[async_trait]
impl ScimTransport for HttpScimTransport {
    async fn execute(&self, ctx: &RequestContext, request: ScimRequest) -> DirectoryResult<Option<Value>> {
        let method = request.method.clone();
        let path = request.path.clone();
        debug!(%method, %path, "SCIM request");

        let result = ctx.run(self.send(request)).await;
        match &result {
            Ok(_) => debug!(%method, %path, "SCIM request succeeded"),
            Err(e) => debug!(%method, %path, error = %e, "SCIM request failed"),
        }
        result
    }
}

/// Creates a shareable HTTP transport.
pub fn create_http_transport(config: &DirectoryConfig) -> DirectoryResult<Arc<dyn ScimTransport>> {
    let transport = HttpScimTransport::new(config)?;
    Ok(Arc::new(transport))
}

/// SCIM error document (RFC 7644 section 3.12).
#[derive(Debug, Deserialize)]
struct ScimErrorBody {
    detail: Option<String>,
    #[serde(rename = "scimType")]
    scim_type: Option<String>,
}

async fn handle_response(response: reqwest::Response) -> DirectoryResult<Option<Value>> {
    let status = response.status();
    let bytes = response.bytes().await.map_err(map_reqwest_error)?;

    if !status.is_success() {
        return Err(map_http_error(status, &String::from_utf8_lossy(&bytes)));
    }

    if status == StatusCode::NO_CONTENT || bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }

    Ok(Some(serde_json::from_slice(&bytes)?))
}

fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(error) = serde_json::from_str::<ScimErrorBody>(body) {
        if let Some(detail) = error.detail.filter(|d| !d.is_empty()) {
            return match error.scim_type {
                Some(scim_type) => format!("{} ({})", detail, scim_type),
                None => detail,
            };
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        status.canonical_reason().unwrap_or("no response body").to_string()
    } else {
        trimmed.to_string()
    }
}

fn map_http_error(status: StatusCode, body: &str) -> DirectoryError {
    let message = error_message(status, body);
    match status {
        StatusCode::BAD_REQUEST => DirectoryError::Validation(message),
        StatusCode::UNAUTHORIZED => DirectoryError::Unauthorized(message),
        StatusCode::FORBIDDEN => DirectoryError::Forbidden(message),
        StatusCode::NOT_FOUND => DirectoryError::NotFound(message),
        StatusCode::CONFLICT => DirectoryError::Conflict(message),
        StatusCode::TOO_MANY_REQUESTS => DirectoryError::RateLimited(message),
        _ => DirectoryError::Remote {
            status: status.as_u16(),
            message,
        },
    }
}

fn map_reqwest_error(err: reqwest::Error) -> DirectoryError {
    if err.is_timeout() {
        DirectoryError::Timeout(err.to_string())
    } else if err.is_decode() {
        DirectoryError::Decode(err.to_string())
    } else {
        DirectoryError::Transport(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_construction() {
        let transport = HttpScimTransport::with_client(Client::new(), "https://example.com", "t");
        assert_eq!(
            transport.url("/preview/scim/v2/Users"),
            "https://example.com/preview/scim/v2/Users"
        );

        let trailing = HttpScimTransport::with_client(Client::new(), "https://example.com/", "t");
        assert_eq!(trailing.url("/preview/scim/v2/Me"), "https://example.com/preview/scim/v2/Me");
    }

    #[test]
    fn test_new_from_config() {
        let config = DirectoryConfig {
            host: "https://example.com/".to_string(),
            token: "dapi-1".to_string(),
            ..DirectoryConfig::default()
        };
        let transport = HttpScimTransport::new(&config).unwrap();
        assert_eq!(transport.host, "https://example.com");
        assert_eq!(transport.token, "dapi-1");
    }

    #[test]
    fn test_map_http_error_by_status() {
        assert!(matches!(map_http_error(StatusCode::BAD_REQUEST, ""), DirectoryError::Validation(_)));
        assert!(matches!(map_http_error(StatusCode::UNAUTHORIZED, ""), DirectoryError::Unauthorized(_)));
        assert!(matches!(map_http_error(StatusCode::FORBIDDEN, ""), DirectoryError::Forbidden(_)));
        assert!(matches!(map_http_error(StatusCode::NOT_FOUND, ""), DirectoryError::NotFound(_)));
        assert!(matches!(map_http_error(StatusCode::CONFLICT, ""), DirectoryError::Conflict(_)));
        assert!(matches!(
            map_http_error(StatusCode::TOO_MANY_REQUESTS, ""),
            DirectoryError::RateLimited(_)
        ));
        assert!(matches!(
            map_http_error(StatusCode::SERVICE_UNAVAILABLE, ""),
            DirectoryError::Remote { status: 503, .. }
        ));
    }

    #[test]
    fn test_error_message_prefers_scim_detail() {
        let body = r#"{"schemas":["urn:ietf:params:scim:api:messages:2.0:Error"],"detail":"User already exists","scimType":"uniqueness","status":"409"}"#;
        assert_eq!(
            error_message(StatusCode::CONFLICT, body),
            "User already exists (uniqueness)"
        );

        let no_type = r#"{"detail":"User 42 not found","status":"404"}"#;
        assert_eq!(error_message(StatusCode::NOT_FOUND, no_type), "User 42 not found");
    }

    #[test]
    fn test_error_message_falls_back_to_body_or_reason() {
        assert_eq!(error_message(StatusCode::BAD_GATEWAY, "  upstream down \n"), "upstream down");
        assert_eq!(error_message(StatusCode::NOT_FOUND, ""), "Not Found");
        assert_eq!(error_message(StatusCode::FORBIDDEN, r#"{"error":"nope"}"#), r#"{"error":"nope"}"#);
    }
}
