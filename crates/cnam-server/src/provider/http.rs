//! HTTP provider client.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use cnam_core::{CanonicalKey, LookupResult};
use reqwest::{Client, Url, header};
use serde::Deserialize;
use tracing::{debug, error};

use super::{CnamProvider, ProviderError};
use crate::middleware::REQUEST_ID_HEADER;

const EMPTY_BODY: &str = "no body in response";

/// Configuration for [`HttpProvider`].
///
/// Changing the provider URL or its credentials only takes a settings change
/// and a restart.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Base URL; the number is appended as the last path segment.
    pub base_url: String,
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
    /// Query parameters sent with every lookup (credentials, format).
    pub query: BTreeMap<String, String>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.opencnam.com/v3/phone".to_string(),
            timeout_ms: 5_000,
            query: BTreeMap::from([("format".to_string(), "json".to_string())]),
        }
    }
}

/// Looks numbers up against an OpenCNAM-style REST API.
///
/// One GET per lookup: `{base_url}/{number}?{query}`, carrying the
/// request's correlation id in `x-request-id`.
#[derive(Debug, Clone)]
pub struct HttpProvider {
    client: Client,
    base_url: Url,
    config: ProviderConfig,
}

impl HttpProvider {
    /// Creates a provider client, validating the base URL.
    pub fn new(config: ProviderConfig) -> Result<Self, ProviderError> {
        let base_url = Url::parse(config.base_url.trim_end_matches('/'))
            .map_err(|e| ProviderError::InvalidConfig(format!("base_url: {e}")))?;

        if base_url.cannot_be_a_base() {
            return Err(ProviderError::InvalidConfig(format!(
                "base_url cannot be a base: {}",
                config.base_url
            )));
        }

        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(Self {
            client,
            base_url,
            config,
        })
    }

    /// Returns the lookup URL for `key`, without query parameters.
    pub fn lookup_url(&self, key: &CanonicalKey) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(key.as_str());
        }
        url
    }

    /// Returns the configuration.
    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }
}

#[async_trait]
impl CnamProvider for HttpProvider {
    async fn lookup(
        &self,
        key: &CanonicalKey,
        correlation_id: &str,
    ) -> Result<LookupResult, ProviderError> {
        let url = self.lookup_url(key);
        debug!(url = %url, "Querying CNAM provider");

        let response = self
            .client
            .get(url)
            .query(&self.config.query)
            .header(&REQUEST_ID_HEADER, correlation_id)
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .inspect_err(|e| error!(error = %e, "Provider request failed"))?;

        let status = response.status().as_u16();
        let body = response.text().await?;

        if status >= 400 {
            let body = if body.is_empty() {
                EMPTY_BODY.to_string()
            } else {
                body
            };
            error!(status = status, provider_response = %body, "Error response from provider");
            return Err(ProviderError::Status { status, body });
        }

        if body.trim().is_empty() {
            error!(status = status, provider_response = EMPTY_BODY, "Error response from provider");
            return Err(ProviderError::EmptyBody { status });
        }

        serde_json::from_str(&body).map_err(|e| {
            error!(error = %e, provider_response = %body, "Provider body is not a lookup result");
            ProviderError::Decode(e)
        })
    }

    fn name(&self) -> &str {
        "http"
    }
}
