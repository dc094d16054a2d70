//! HTTP client for the Onyx API.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, USER_AGENT};
use sampleqc_core::{ClassifierCall, ClimbId, Server};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::analysis::AnalysisObject;
use crate::config::OnyxConfig;
use crate::error::{OnyxError, Result};
use crate::trait_::{SubmissionOutcome, SubmitTarget};

/// User agent for Onyx requests.
const USER_AGENT_VALUE: &str = concat!("mscape-sample-qc/", env!("CARGO_PKG_VERSION"));

/// Sample record as returned by Onyx. Only the fields QC reads are kept.
#[derive(Debug, Clone, Deserialize)]
pub struct SampleRecord {
    /// Climb ID echoed by Onyx
    #[serde(default)]
    pub climb_id: Option<String>,

    /// Classifier calls for the sample's reads
    pub classifier_calls: Vec<ClassifierCall>,
}

#[derive(Deserialize)]
struct Envelope<T> {
    data: T,
}

/// Onyx API client.
#[derive(Debug, Clone)]
pub struct OnyxClient {
    /// HTTP client.
    client: reqwest::Client,

    /// Base URL, without trailing slash.
    base_url: String,

    /// Configuration.
    config: OnyxConfig,
}

impl OnyxClient {
    /// Create a new client.
    pub fn new(config: OnyxConfig) -> Result<Self> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        let auth = HeaderValue::from_str(&format!("Token {}", config.token)).map_err(|_| {
            OnyxError::Config {
                message: "token contains characters not allowed in a header".to_string(),
            }
        })?;
        default_headers.insert(AUTHORIZATION, auth);

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(default_headers)
            .build()
            .map_err(|e| OnyxError::Config {
                message: format!("failed to create HTTP client: {}", e),
            })?;

        let base_url = config.domain.trim_end_matches('/').to_string();

        Ok(Self {
            client,
            base_url,
            config,
        })
    }

    /// Create a client from `ONYX_DOMAIN` / `ONYX_TOKEN`.
    pub fn from_env() -> Result<Self> {
        Self::new(OnyxConfig::from_env()?)
    }

    /// Base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the record for a sample.
    pub async fn get_record(&self, server: Server, climb_id: &ClimbId) -> Result<SampleRecord> {
        let path = format!("projects/{}/{}/", server, climb_id);
        debug!(%server, %climb_id, "fetching sample record");

        let response = self.request(reqwest::Method::GET, &path, None).await?;
        let envelope: Envelope<SampleRecord> =
            response
                .json()
                .await
                .map_err(|e| OnyxError::InvalidResponse {
                    message: format!("failed to parse sample record: {}", e),
                })?;

        Ok(envelope.data)
    }

    /// Submit an analysis to the test or live endpoint.
    ///
    /// Validation failures come back as a rejected outcome; transport and
    /// server failures as errors.
    pub async fn create_analysis(
        &self,
        server: Server,
        analysis: &AnalysisObject,
        target: SubmitTarget,
    ) -> Result<SubmissionOutcome> {
        let path = target.endpoint(server);
        let body = serde_json::to_value(analysis).map_err(|e| OnyxError::InvalidResponse {
            message: format!("failed to encode analysis: {}", e),
        })?;
        debug!(%server, ?target, "submitting analysis");

        let response = match self.request(reqwest::Method::POST, &path, Some(&body)).await {
            Ok(response) => response,
            Err(OnyxError::Rejected { errors, .. }) => {
                return Ok(SubmissionOutcome::rejected(errors));
            }
            Err(e) => return Err(e),
        };

        // Test submissions may answer with an empty body.
        let text = response.text().await?;
        let analysis_id = serde_json::from_str::<Value>(&text)
            .ok()
            .and_then(|v| v.pointer("/data/analysis_id").and_then(Value::as_str).map(str::to_string));

        Ok(SubmissionOutcome::accepted(analysis_id))
    }

    /// Send a request, retrying only failures to connect. Timeouts are not
    /// retried since a POST may already have been applied.
    async fn request(
        &self,
        method: reqwest::Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<reqwest::Response> {
        let mut attempt = 1;

        loop {
            debug!(attempt, path, "connecting to onyx");
            match self.request_once(method.clone(), path, body).await {
                Ok(response) => return Ok(response),
                Err(e) if e.is_retryable() && attempt < self.config.max_attempts => {
                    warn!(
                        error = %e,
                        attempt,
                        max_attempts = self.config.max_attempts,
                        delay_secs = self.config.retry_delay.as_secs_f64(),
                        "onyx connection failed, retrying"
                    );
                    attempt += 1;
                    tokio::time::sleep(self.config.retry_delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Send a single request without retry.
    async fn request_once(
        &self,
        method: reqwest::Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<reqwest::Response> {
        let url = format!("{}/{}", self.base_url, path);
        let mut request = self.client.request(method, &url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();

        match status.as_u16() {
            200..=299 => Ok(response),

            401 | 403 => {
                let body = response.text().await.unwrap_or_default();
                Err(OnyxError::Unauthorized {
                    status: status.as_u16(),
                    message: first_message(&body).unwrap_or_else(|| "check ONYX_TOKEN".to_string()),
                })
            }

            404 => Err(OnyxError::NotFound {
                path: path.to_string(),
            }),

            400..=499 => {
                let body = response.text().await.unwrap_or_default();
                let mut errors = parse_messages(&body);
                if errors.is_empty() && !body.trim().is_empty() {
                    errors.push(body.trim().to_string());
                }
                Err(OnyxError::Rejected {
                    status: status.as_u16(),
                    errors,
                })
            }

            _ => {
                let message = response.text().await.unwrap_or_else(|_| status.to_string());
                Err(OnyxError::Http {
                    status: status.as_u16(),
                    message,
                })
            }
        }
    }
}

/// Flatten the `messages` of an Onyx error body into `field: message` lines.
fn parse_messages(body: &str) -> Vec<String> {
    let Ok(json) = serde_json::from_str::<Value>(body) else {
        return Vec::new();
    };
    let mut out = Vec::new();
    if let Some(messages) = json.get("messages") {
        flatten_messages(None, messages, &mut out);
    }
    out
}

fn flatten_messages(field: Option<&str>, value: &Value, out: &mut Vec<String>) {
    match value {
        Value::Object(map) => {
            for (key, nested) in map {
                let key = match field {
                    Some(parent) => format!("{}.{}", parent, key),
                    None => key.clone(),
                };
                flatten_messages(Some(&key), nested, out);
            }
        }
        Value::Array(items) => {
            for item in items {
                flatten_messages(field, item, out);
            }
        }
        Value::Null => {}
        other => {
            let text = match other {
                Value::String(s) => s.clone(),
                v => v.to_string(),
            };
            match field {
                Some(field) => out.push(format!("{}: {}", field, text)),
                None => out.push(text),
            }
        }
    }
}

fn first_message(body: &str) -> Option<String> {
    parse_messages(body).into_iter().next()
}
