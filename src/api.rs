//! Low-level Where's It Up API client.
//!
//! This module provides direct access to the three REST endpoints the
//! service exposes: listing vantage points, submitting jobs, and retrieving
//! job reports.
//!
//! # API Reference
//!
//! - <https://api.wheresitup.com/docs>

use std::collections::BTreeMap;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// The Where's It Up API base URL.
const WIU_API_URL: &str = "https://api.wheresitup.com/v4";

/// Request timeout for individual API calls.
const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);

/// Errors that may occur when interacting with the Where's It Up API.
#[derive(Debug, Error)]
pub enum Error {
    /// The client id or token is not a hexadecimal string.
    #[error("invalid credential: `{0}` is not a hexadecimal string")]
    InvalidCredential(String),

    /// The job id is not a hexadecimal string.
    #[error("invalid job id: `{0}` is not a hexadecimal string")]
    InvalidId(String),

    /// A transport failure, or a failure reported by the service itself.
    #[error("API error: {message}")]
    Api {
        /// The service's own message when it supplied one, otherwise a
        /// description of the transport failure.
        message: String,
        /// The underlying HTTP error for transport failures.
        #[source]
        source: Option<reqwest::Error>,
    },
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Api {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

/// Error reported by the service in a response body.
fn service_error(message: Option<String>, fallback: &str) -> Error {
    Error::Api {
        message: message.unwrap_or_else(|| fallback.to_string()),
        source: None,
    }
}

/// The service issues credentials and job ids as hexadecimal strings, so
/// anything else is rejected before a network round trip is spent on it.
fn is_hex_id(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_hexdigit())
}

/// One vantage point returned by the `sources` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Source {
    pub name: String,
    /// Remaining per-server fields (title, location, state, ...).
    #[serde(flatten)]
    pub detail: BTreeMap<String, Value>,
}

/// Response to a `sources` request.
#[derive(Debug, Clone, Deserialize)]
pub struct SourcesResponse {
    pub sources: Vec<Source>,
}

/// A single option value, numeric or free-form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Int(i64),
    Text(String),
}

impl From<i64> for OptionValue {
    fn from(value: i64) -> Self {
        OptionValue::Int(value)
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        OptionValue::Text(value.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(value: String) -> Self {
        OptionValue::Text(value)
    }
}

/// Per-test request options, keyed as `test -> option name -> value`.
pub type TestOptions = BTreeMap<String, BTreeMap<String, OptionValue>>;

#[derive(Debug, Serialize)]
struct SubmitRequest<'a> {
    uri: &'a str,
    tests: &'a [String],
    sources: &'a [String],
    options: &'a TestOptions,
}

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    #[serde(rename = "jobID")]
    job_id: Option<String>,
    message: Option<String>,
}

/// Current state of a submitted job as reported by the service.
#[derive(Debug, Clone, Deserialize)]
pub struct JobReport {
    pub response: ReportDetail,
}

impl JobReport {
    /// True when the service has no tasks left in progress for this job.
    pub fn is_complete(&self) -> bool {
        self.response.in_progress.is_empty()
    }
}

/// Body of a job report: tasks still pending and results so far.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportDetail {
    /// Identifiers of tasks the service is still working on.
    #[serde(default)]
    pub in_progress: Vec<String>,
    /// Finished results, keyed as `location -> test -> result`.
    #[serde(default)]
    pub complete: BTreeMap<String, BTreeMap<String, TestReport>>,
    /// Remaining report fields the model does not name.
    #[serde(flatten)]
    pub detail: BTreeMap<String, Value>,
}

/// Result of one test from one location.
#[derive(Debug, Clone, Deserialize)]
pub struct TestReport {
    pub summary: Value,
    /// Full result detail beyond the summary.
    #[serde(flatten)]
    pub detail: BTreeMap<String, Value>,
}

#[derive(Debug, Deserialize)]
struct ReportEnvelope {
    response: Option<ReportDetail>,
    message: Option<String>,
}

/// Client for the Where's It Up REST API.
///
/// Holds the authorization header (fixed at construction) and performs the
/// three domain operations against the versioned base URL. The client is
/// stateless across calls and can be shared by any number of
/// [`Job`](crate::Job)s.
#[derive(Debug, Clone)]
pub struct Client {
    http_client: reqwest::Client,
    base_url: String,
}

impl Client {
    /// Creates a new client from a Where's It Up client id and token.
    ///
    /// Both must be hexadecimal strings; anything else fails with
    /// [`Error::InvalidCredential`] without touching the network.
    pub fn new(client_id: &str, token: &str) -> Result<Self, Error> {
        Self::with_base_url(client_id, token, WIU_API_URL)
    }

    /// Creates a new client against a custom base URL.
    ///
    /// This is primarily useful for testing with mock servers.
    pub fn with_base_url(client_id: &str, token: &str, base_url: &str) -> Result<Self, Error> {
        if !is_hex_id(client_id) {
            return Err(Error::InvalidCredential(client_id.to_string()));
        }
        if !is_hex_id(token) {
            return Err(Error::InvalidCredential(token.to_string()));
        }

        let mut headers = HeaderMap::new();
        let mut auth_value = HeaderValue::from_str(&format!("Bearer {client_id} {token}"))
            .map_err(|_| Error::InvalidCredential(client_id.to_string()))?;
        auth_value.set_sensitive(true);
        headers.insert(HeaderName::from_static("auth"), auth_value);

        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Lists the vantage points available to run tests from.
    pub async fn list_locations(&self) -> Result<SourcesResponse, Error> {
        let response = self
            .http_client
            .get(format!("{}/sources", self.base_url))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(response)
    }

    /// Submits a new job and returns the id the service assigned to it.
    ///
    /// A response without a `jobID` is a rejected submission; the service's
    /// `message` is surfaced through [`Error::Api`].
    pub async fn submit(
        &self,
        uri: &str,
        tests: &[String],
        locations: &[String],
        options: &TestOptions,
    ) -> Result<String, Error> {
        let body = SubmitRequest {
            uri,
            tests,
            sources: locations,
            options,
        };

        let response: SubmitResponse = self
            .http_client
            .post(format!("{}/jobs", self.base_url))
            .json(&body)
            .send()
            .await?
            .json()
            .await?;

        response
            .job_id
            .ok_or_else(|| service_error(response.message, "job submission failed"))
    }

    /// Retrieves the current, possibly incomplete, report for a job.
    ///
    /// The id is validated as hexadecimal before the request is made. A
    /// response without a `response` key is a service failure (job unknown,
    /// retrieval errored), never an empty report.
    pub async fn retrieve(&self, job_id: &str) -> Result<JobReport, Error> {
        if !is_hex_id(job_id) {
            return Err(Error::InvalidId(job_id.to_string()));
        }

        let envelope: ReportEnvelope = self
            .http_client
            .get(format!("{}/jobs/{}", self.base_url, job_id))
            .send()
            .await?
            .json()
            .await?;

        match envelope.response {
            Some(response) => Ok(JobReport { response }),
            None => Err(service_error(envelope.message, "job retrieval failed")),
        }
    }
}
