/// openFDA drug adverse-event API client
///
/// API Documentation: https://open.fda.gov/apis/drug/event/
///
/// Endpoint used:
/// - /drug/event.json?api_key=&search=&limit= - search adverse-event reports
///
/// Errors carry the endpoint path only. The full request URL holds the API
/// key and never reaches logs or error messages.
pub mod types;

pub use self::types::{
    AdverseEvent, EventMeta, EventSearchResponse, Patient, PatientReaction, ResultsMeta,
};

use crate::config::OpenFdaConfig;
use crate::errors::{ConfigError, SignalError};
use crate::logger::{self, LogTag};
use crate::signals::analyzer::{EventSource, QueryTarget};
use crate::signals::query::EVENT_ENDPOINT;
use async_trait::async_trait;
use reqwest::Client;
use std::time::{Duration, Instant};
use url::Url;

// ============================================================================
// API CONFIGURATION
// ============================================================================

/// Upstream error bodies are cut to this many characters
const MAX_ERROR_BODY_CHARS: usize = 512;

const USER_AGENT: &str = concat!("drugsignals/", env!("CARGO_PKG_VERSION"));

// ============================================================================
// CLIENT IMPLEMENTATION
// ============================================================================

pub struct OpenFdaClient {
    client: Client,
    target: QueryTarget,
    timeout: Duration,
}

impl OpenFdaClient {
    pub fn new(config: &OpenFdaConfig) -> Result<Self, ConfigError> {
        if config.timeout_secs == 0 {
            return Err(ConfigError::invalid(
                "openfda.timeout_secs",
                "must be greater than zero",
            ));
        }

        let base_url = Url::parse(config.base_url.trim())
            .map_err(|e| ConfigError::invalid("openfda.base_url", e.to_string()))?;

        let timeout = Duration::from_secs(config.timeout_secs);
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self {
            client,
            target: QueryTarget::new(base_url, config.api_key.clone()),
            timeout,
        })
    }

    /// Base URL and key requests are built against
    pub fn query_target(&self) -> &QueryTarget {
        &self.target
    }

    async fn execute_request(&self, request: Url) -> Result<(reqwest::Response, f64), SignalError> {
        let start = Instant::now();
        let response_result = self.client.get(request).timeout(self.timeout).send().await;
        let elapsed = start.elapsed().as_millis() as f64;

        match response_result {
            Ok(response) => Ok((response, elapsed)),
            Err(err) => {
                let reason = if err.is_timeout() {
                    format!("timed out after {}s", self.timeout.as_secs())
                } else {
                    // Strip the URL, it carries the API key
                    format!("request failed: {}", err.without_url())
                };
                logger::warning(
                    LogTag::Api,
                    &format!("openFDA {} {} ({:.0}ms)", EVENT_ENDPOINT, reason, elapsed),
                );
                Err(SignalError::UpstreamUnavailable {
                    endpoint: EVENT_ENDPOINT.to_string(),
                    reason,
                })
            }
        }
    }

    async fn get_events(&self, request: Url) -> Result<EventSearchResponse, SignalError> {
        let (response, elapsed) = self.execute_request(request).await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let body = truncate_chars(body.trim(), MAX_ERROR_BODY_CHARS);
            logger::warning(
                LogTag::Api,
                &format!("openFDA {} HTTP {}: {}", EVENT_ENDPOINT, status.as_u16(), body),
            );
            return Err(SignalError::UpstreamHttpError {
                endpoint: EVENT_ENDPOINT.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|err| SignalError::UpstreamUnavailable {
                endpoint: EVENT_ENDPOINT.to_string(),
                reason: format!("failed to read body: {}", err.without_url()),
            })?;

        match serde_json::from_slice::<EventSearchResponse>(&bytes) {
            Ok(parsed) => {
                logger::debug(
                    LogTag::Api,
                    &format!(
                        "openFDA {} OK in {:.0}ms: total={}, page={}",
                        EVENT_ENDPOINT,
                        elapsed,
                        parsed.meta.results.total,
                        parsed.results.len()
                    ),
                );
                Ok(parsed)
            }
            Err(err) => {
                logger::warning(
                    LogTag::Api,
                    &format!("openFDA {} parse error: {}", EVENT_ENDPOINT, err),
                );
                Err(SignalError::UpstreamMalformedResponse {
                    endpoint: EVENT_ENDPOINT.to_string(),
                    reason: err.to_string(),
                })
            }
        }
    }
}

#[async_trait]
impl EventSource for OpenFdaClient {
    async fn fetch_events(&self, request: Url) -> Result<EventSearchResponse, SignalError> {
        self.get_events(request).await
    }
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((index, _)) => format!("{}...", &text[..index]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_bad_config() {
        let mut config = OpenFdaConfig::default();
        config.base_url = "not a url".to_string();
        assert!(OpenFdaClient::new(&config).is_err());

        let mut config = OpenFdaConfig::default();
        config.timeout_secs = 0;
        assert!(OpenFdaClient::new(&config).is_err());
    }

    #[test]
    fn test_query_target_from_config() {
        let mut config = OpenFdaConfig::default();
        config.api_key = "abc".to_string();
        let client = OpenFdaClient::new(&config).unwrap();

        assert_eq!(client.query_target().base_url.as_str(), "https://api.fda.gov/");
        assert_eq!(client.query_target().api_key, "abc");
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("short", 10), "short");
        assert_eq!(truncate_chars("abcdef", 3), "abc...");
        assert_eq!(truncate_chars("ééé", 2), "éé...");
    }
}
