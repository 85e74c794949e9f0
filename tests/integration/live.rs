use std::env;

use wiuppy::{Client, Job};

/// Helper to build a client from live credentials.
/// Returns None if credentials are not available.
fn get_test_client() -> Option<Client> {
    // Load .env file if present (ignore errors if file doesn't exist)
    let _ = dotenvy::dotenv();

    let client_id = env::var("WIUPPY_CLIENT").ok()?;
    let token = env::var("WIUPPY_TOKEN").ok()?;

    Client::new(&client_id, &token).ok()
}

#[tokio::test]
#[ignore = "requires live Where's It Up credentials"]
async fn live_list_locations() {
    let Some(api) = get_test_client() else {
        eprintln!("Skipping test: WIUPPY_CLIENT / WIUPPY_TOKEN not set");
        return;
    };

    let sources = api.list_locations().await.expect("Failed to list sources");
    assert!(!sources.sources.is_empty());
    assert!(sources.sources.iter().all(|s| !s.name.is_empty()));
}

#[tokio::test]
#[ignore = "requires live Where's It Up credentials and spends a job credit"]
async fn live_submit_and_poll_a_ping_job() {
    let Some(api) = get_test_client() else {
        eprintln!("Skipping test: WIUPPY_CLIENT / WIUPPY_TOKEN not set");
        return;
    };

    let location = api
        .list_locations()
        .await
        .expect("Failed to list sources")
        .sources
        .into_iter()
        .next()
        .expect("Service returned no sources")
        .name;

    let mut job = Job::new(&api);
    job.uri = "https://example.com".into();
    job.tests = vec!["ping".into()];
    job.locations = vec![location.clone()];

    job.submit().await.expect("Failed to submit job");
    assert!(!job.id().is_empty());

    job.poll().await.expect("Failed to poll job");
    assert!(job.is_complete());

    let rendered: serde_json::Value = serde_json::from_str(&job.render()).unwrap();
    assert!(!rendered["results"][&location]["ping"].is_null());
}
