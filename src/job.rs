//! One Where's It Up job wrapped around the API client.
//!
//! A [`Job`] bundles the request parameters for a test run (target URI,
//! tests, locations, per-test options), delegates the network operations to
//! a borrowed [`Client`], and keeps the latest report returned by the
//! service.
//!
//! # Example
//!
//! ```no_run
//! use wiuppy::{Client, Job};
//!
//! # async fn example() -> Result<(), wiuppy::Error> {
//! let api = Client::new("2696813ca", "cd73da5cd3")?;
//!
//! let mut job = Job::new(&api);
//! job.uri = "https://example.com".into();
//! job.tests = vec!["ping".into(), "trace".into()];
//! job.locations = vec!["denver".into(), "tokyo".into()];
//!
//! job.submit().await?;
//! job.poll().await?;
//! println!("{job}");
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::time::Duration;

use serde_json::Value;
use tokio::time::sleep;
use tracing::info;

use crate::api::{Client, Error, JobReport, TestOptions};

/// Interval between polling attempts. Jobs are short-lived test runs, so a
/// one-second cadence reaches completion within a few iterations.
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// A new or previously submitted Where's It Up job.
///
/// The request fields (`uri`, `tests`, `locations`, `options`) are plain
/// public fields, set by the caller before [`submit`](Job::submit). Each job
/// owns its containers and its results; the API client is only borrowed.
#[derive(Debug)]
pub struct Job<'a> {
    api: &'a Client,
    /// Target URI to test.
    pub uri: String,
    /// Tests to run against the URI.
    pub tests: Vec<String>,
    /// Vantage points to run the tests from.
    pub locations: Vec<String>,
    /// Per-test options, keyed as `test -> option name -> value`.
    pub options: TestOptions,
    /// Delay between retrieve calls in [`poll`](Job::poll).
    pub poll_interval: Duration,
    id: String,
    results: Option<JobReport>,
}

impl<'a> Job<'a> {
    /// Creates an empty, unsubmitted job.
    pub fn new(api: &'a Client) -> Self {
        Self::with_id(api, String::new())
    }

    /// Wraps a previously submitted job so its report can be retrieved.
    pub fn with_id(api: &'a Client, id: impl Into<String>) -> Self {
        Job {
            api,
            uri: String::new(),
            tests: Vec::new(),
            locations: Vec::new(),
            options: TestOptions::new(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            id: id.into(),
            results: None,
        }
    }

    /// The service-assigned job id; empty until the job is submitted.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The most recently retrieved report, if any.
    pub fn results(&self) -> Option<&JobReport> {
        self.results.as_ref()
    }

    /// True once a retrieved report shows no tasks left in progress.
    ///
    /// A job whose report has never been fetched is not complete, whatever
    /// the service's state.
    pub fn is_complete(&self) -> bool {
        self.results.as_ref().is_some_and(JobReport::is_complete)
    }

    /// Submits the job and stores the id the service assigned to it.
    pub async fn submit(&mut self) -> Result<(), Error> {
        self.id = self
            .api
            .submit(&self.uri, &self.tests, &self.locations, &self.options)
            .await?;
        Ok(())
    }

    /// Fetches the current report once, replacing any stored results.
    pub async fn retrieve(&mut self) -> Result<(), Error> {
        self.results = Some(self.api.retrieve(&self.id).await?);
        Ok(())
    }

    /// Fetches the report repeatedly until the job is complete.
    ///
    /// Sleeps [`poll_interval`](Job::poll_interval) between fetches and logs
    /// each new attempt. The loop has no attempt cap: it ends when the
    /// service reports no tasks in progress, or with the first retrieve
    /// error.
    pub async fn poll(&mut self) -> Result<(), Error> {
        loop {
            self.retrieve().await?;
            if self.is_complete() {
                return Ok(());
            }

            sleep(self.poll_interval).await;
            info!(job = %self.id, "polling for job completion");
        }
    }

    /// Renders the job as JSON text: the job id and, once results exist,
    /// each test's `summary` keyed by location and test name. All other
    /// result detail is dropped.
    pub fn render(&self) -> String {
        self.to_string()
    }

    fn summary(&self) -> Value {
        let mut out = serde_json::Map::new();
        out.insert("Job ID".to_string(), Value::String(self.id.clone()));

        if let Some(report) = &self.results {
            let results = report
                .response
                .complete
                .iter()
                .map(|(location, tests)| {
                    let summaries = tests
                        .iter()
                        .map(|(test, result)| (test.clone(), result.summary.clone()))
                        .collect();
                    (location.clone(), Value::Object(summaries))
                })
                .collect();
            out.insert("results".to_string(), Value::Object(results));
        }

        Value::Object(out)
    }
}

impl fmt::Display for Job<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = serde_json::to_string_pretty(&self.summary()).map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}
