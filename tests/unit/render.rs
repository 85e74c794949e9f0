//! Rendering and completion state for jobs that have never been fetched.

use std::time::Duration;

use serde_json::json;
use wiuppy::{Client, Job};

use crate::common::constants::{TEST_CLIENT, TEST_JOB_ID, TEST_TOKEN};

fn client() -> Client {
    Client::new(TEST_CLIENT, TEST_TOKEN).expect("valid test credentials")
}

#[test]
fn job_without_results_renders_only_its_id() {
    let api = client();
    let job = Job::with_id(&api, TEST_JOB_ID);

    let rendered: serde_json::Value = serde_json::from_str(&job.render()).unwrap();
    assert_eq!(rendered, json!({ "Job ID": TEST_JOB_ID }));
}

#[test]
fn display_matches_render() {
    let api = client();
    let job = Job::with_id(&api, TEST_JOB_ID);
    assert_eq!(job.to_string(), job.render());
}

#[test]
fn unsubmitted_job_has_an_empty_id() {
    let api = client();
    let job = Job::new(&api);
    assert_eq!(job.id(), "");

    let rendered: serde_json::Value = serde_json::from_str(&job.render()).unwrap();
    assert_eq!(rendered, json!({ "Job ID": "" }));
}

#[test]
fn job_is_incomplete_until_a_report_is_fetched() {
    let api = client();
    let job = Job::with_id(&api, TEST_JOB_ID);
    assert!(!job.is_complete());
    assert!(job.results().is_none());
}

#[test]
fn poll_interval_defaults_to_one_second() {
    let api = client();
    assert_eq!(Job::new(&api).poll_interval, Duration::from_secs(1));
}
