//! Command-line front end for the Where's It Up API.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use wiuppy::config::{CredentialLayer, Credentials};
use wiuppy::{Client, Job, OptionValue, TestOptions};

/// Make a request against the Where's It Up API.
///
/// With --job, retrieves an existing job. With --uri, --tests, and
/// --locations, submits a new one. With neither, lists the available
/// server locations.
#[derive(Debug, Parser)]
#[command(name = "wiuppy", version)]
struct Cli {
    /// Where's It Up client id
    #[arg(short = 'C', long)]
    client: Option<String>,

    /// Where's It Up client token
    #[arg(short = 'T', long)]
    token: Option<String>,

    /// URI to test with a new job
    #[arg(short, long)]
    uri: Option<String>,

    /// Comma-separated tests to run
    #[arg(short, long, value_delimiter = ',')]
    tests: Vec<String>,

    /// Comma-separated server locations to run from
    #[arg(short, long, value_delimiter = ',')]
    locations: Vec<String>,

    /// Set an option for a test as <test>:<option>=<value>,
    /// e.g. nametime:nameserver=8.8.8.8
    #[arg(short, long = "option", value_parser = parse_option)]
    option: Vec<TestOption>,

    /// Job id of an existing request to retrieve
    #[arg(short, long)]
    job: Option<String>,

    /// Query the API until the job is complete
    #[arg(short, long)]
    poll: bool,
}

/// One parsed `--option` argument.
#[derive(Debug, Clone)]
struct TestOption {
    test: String,
    name: String,
    value: OptionValue,
}

fn parse_option(raw: &str) -> Result<TestOption, String> {
    let usage = || format!("expected <test>:<option>=<value>, got `{raw}`");
    let (names, value) = raw.split_once('=').ok_or_else(usage)?;
    let (test, name) = names.split_once(':').ok_or_else(usage)?;

    let value = match value.parse::<i64>() {
        Ok(number) => OptionValue::Int(number),
        Err(_) => OptionValue::Text(value.to_string()),
    };

    Ok(TestOption {
        test: test.to_string(),
        name: name.to_string(),
        value,
    })
}

fn collect_options(specs: Vec<TestOption>) -> TestOptions {
    let mut options = TestOptions::new();
    for spec in specs {
        options
            .entry(spec.test)
            .or_default()
            .insert(spec.name, spec.value);
    }
    options
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout is reserved for the JSON output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let credentials = Credentials::resolve(CredentialLayer {
        client: cli.client,
        token: cli.token,
    })?;

    // WIUPPY_API_URL points the binary at an alternate endpoint, e.g. a
    // local mock server.
    let api = match std::env::var("WIUPPY_API_URL") {
        Ok(base_url) => Client::with_base_url(&credentials.client, &credentials.token, &base_url)?,
        Err(_) => Client::new(&credentials.client, &credentials.token)?,
    };

    // Retrieve an existing job.
    if let Some(id) = cli.job {
        let mut job = Job::with_id(&api, id);
        if cli.poll {
            job.poll().await?;
        } else {
            job.retrieve().await?;
        }
        println!("{job}");
        return Ok(());
    }

    // Submit a new job.
    if cli.uri.is_some() && !cli.tests.is_empty() && !cli.locations.is_empty() {
        let mut job = Job::new(&api);
        job.uri = cli.uri.unwrap_or_default();
        job.tests = cli.tests;
        job.locations = cli.locations;
        job.options = collect_options(cli.option);

        job.submit().await?;
        if cli.poll {
            job.poll().await?;
        }
        println!("{job}");
        return Ok(());
    }

    // With no job arguments, list the available locations.
    let sources = api.list_locations().await?;
    let names: Vec<&str> = sources.sources.iter().map(|s| s.name.as_str()).collect();
    println!("{}", serde_json::to_string(&names)?);
    Ok(())
}
