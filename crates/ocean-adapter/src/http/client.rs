/*
[INPUT]:  HTTP configuration (timeouts) and resolved endpoint configuration
[OUTPUT]: Configured reqwest client ready for API calls
[POS]:    HTTP layer - core client implementation
[UPDATE]: When adding connection options or changing client behavior
*/

use crate::config::OceanConfig;
use crate::http::{OceanError, Result};
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

/// Main HTTP client for the Ocean REST API
#[derive(Debug)]
pub struct OceanClient {
    http_client: Client,
    config: OceanConfig,
}

impl OceanClient {
    /// Create a new client for mainnet with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(OceanConfig::default())
    }

    /// Create a new client from a resolved configuration
    pub fn with_config(config: OceanConfig) -> Result<Self> {
        let client_config = config.client_config();
        // Fail early on a bad base URL rather than on the first request.
        config.api_base_url()?;

        let http_client = Client::builder()
            .timeout(client_config.timeout)
            .connect_timeout(client_config.connect_timeout)
            .default_headers(static_headers())
            .build()?;

        Ok(Self {
            http_client,
            config,
        })
    }

    /// Create a client pointed at an explicit API base URL
    pub fn with_base_url(base_url: &str) -> Result<Self> {
        Self::with_config(OceanConfig {
            api_url: Some(base_url.to_string()),
            ..OceanConfig::default()
        })
    }

    pub fn config(&self) -> &OceanConfig {
        &self.config
    }

    /// Build request builder for an endpoint template
    pub(crate) fn request(&self, method: Method, template: &str) -> Result<RequestBuilder> {
        let url = self.config.endpoint_url(template)?;
        Ok(self.http_client.request(method, url))
    }

    /// Build request builder for an endpoint template followed by one path segment
    pub(crate) fn request_with_segment(
        &self,
        method: Method,
        template: &str,
        segment: &str,
    ) -> Result<RequestBuilder> {
        let mut url = self.config.endpoint_url(template)?;
        url.path_segments_mut()
            .map_err(|_| OceanError::Config(format!("endpoint cannot be a base: {template}")))?
            .pop_if_empty()
            .push(segment);
        Ok(self.http_client.request(method, url))
    }

    /// Send a request and decode a JSON body
    pub(crate) async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = builder.send().await?;
        let status = response.status();
        let url = response.url().clone();
        let body = response.text().await?;

        if !status.is_success() {
            debug!(%url, status = status.as_u16(), "api request rejected");
            return Err(OceanError::api_error(status, body));
        }

        debug!(%url, bytes = body.len(), "api request completed");
        Ok(serde_json::from_str(&body)?)
    }
}

fn static_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers
}
