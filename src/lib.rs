//! Client for the Where's It Up network-testing API.
//!
//! [Where's It Up](https://wheresitup.com) runs network diagnostics (ping,
//! trace, HTTP checks, ...) against a URI from WonderNetwork vantage points
//! around the world. This crate wraps the service's REST API with a small
//! async client and a job convenience layer, and ships the `wiuppy` binary
//! as a command-line front end.
//!
//! # Authentication
//!
//! Every call carries an `Auth: Bearer <client> <token>` header built from
//! your API credentials. Both values are hexadecimal strings from the
//! service's account page and are validated before any request is sent.
//!
//! # Example
//!
//! ```no_run
//! use wiuppy::{Client, Job};
//!
//! # async fn example() -> Result<(), wiuppy::Error> {
//! let api = Client::new("2696813ca", "cd73da5cd3")?;
//!
//! // What can we test from?
//! for source in api.list_locations().await?.sources {
//!     println!("{}", source.name);
//! }
//!
//! // Run a job and wait for it to finish.
//! let mut job = Job::new(&api);
//! job.uri = "https://example.com".into();
//! job.tests = vec!["ping".into()];
//! job.locations = vec!["denver".into()];
//! job.submit().await?;
//! job.poll().await?;
//! println!("{job}");
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod job;

pub use api::{Client, Error, JobReport, OptionValue, Source, SourcesResponse, TestOptions};
pub use config::Credentials;
pub use job::Job;
