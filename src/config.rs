//! Credential resolution for the command line.
//!
//! Credentials come from three layers, in ascending precedence:
//!
//! 1. the `[Auth]` section of an INI-style `~/.wiuppy` file,
//! 2. the `WIUPPY_CLIENT` / `WIUPPY_TOKEN` environment variables,
//! 3. explicit `--client` / `--token` flags.
//!
//! Resolution happens once at startup and produces a [`Credentials`] value;
//! nothing here validates the hex format — that belongs to
//! [`Client::new`](crate::Client::new).

use std::path::PathBuf;

use thiserror::Error;

/// Raised when no layer supplied one of the required fields.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CredentialsError {
    #[error(
        "no client id found: pass --client, set WIUPPY_CLIENT, \
         or add `client` to the [Auth] section of ~/.wiuppy"
    )]
    MissingClient,

    #[error(
        "no token found: pass --token, set WIUPPY_TOKEN, \
         or add `token` to the [Auth] section of ~/.wiuppy"
    )]
    MissingToken,
}

/// Fully resolved API credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub client: String,
    pub token: String,
}

impl Credentials {
    /// Resolves credentials from the config file, the environment, and the
    /// given command-line layer, last writer wins.
    pub fn resolve(flags: CredentialLayer) -> Result<Self, CredentialsError> {
        CredentialLayer::from_config_file()
            .merge(CredentialLayer::from_env())
            .merge(flags)
            .into_credentials()
    }
}

/// One source of credentials; either field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CredentialLayer {
    pub client: Option<String>,
    pub token: Option<String>,
}

impl CredentialLayer {
    /// Reads the `[Auth]` section of `~/.wiuppy`. A missing or unreadable
    /// file is an empty layer, not an error.
    pub fn from_config_file() -> Self {
        match config_path().map(std::fs::read_to_string) {
            Some(Ok(text)) => Self::from_ini(&text),
            _ => Self::default(),
        }
    }

    /// Reads `WIUPPY_CLIENT` and `WIUPPY_TOKEN` from the environment.
    pub fn from_env() -> Self {
        CredentialLayer {
            client: std::env::var("WIUPPY_CLIENT").ok(),
            token: std::env::var("WIUPPY_TOKEN").ok(),
        }
    }

    /// Parses the `client` and `token` keys out of an INI `[Auth]` section.
    ///
    /// Accepts `=` or `:` separators, `#` or `;` comment lines, and
    /// case-insensitive key names. Everything outside `[Auth]` is ignored.
    pub fn from_ini(text: &str) -> Self {
        let mut layer = CredentialLayer::default();
        let mut in_auth = false;

        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }
            if let Some(section) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
                in_auth = section.trim() == "Auth";
                continue;
            }
            if !in_auth {
                continue;
            }

            let Some((key, value)) = line.split_once(['=', ':']) else {
                continue;
            };
            let value = value.trim().to_string();
            match key.trim().to_ascii_lowercase().as_str() {
                "client" => layer.client = Some(value),
                "token" => layer.token = Some(value),
                _ => {}
            }
        }

        layer
    }

    /// Overlays `higher` on this layer, field by field.
    pub fn merge(self, higher: CredentialLayer) -> CredentialLayer {
        CredentialLayer {
            client: higher.client.or(self.client),
            token: higher.token.or(self.token),
        }
    }

    /// Requires both fields to be present.
    pub fn into_credentials(self) -> Result<Credentials, CredentialsError> {
        Ok(Credentials {
            client: self.client.ok_or(CredentialsError::MissingClient)?,
            token: self.token.ok_or(CredentialsError::MissingToken)?,
        })
    }
}

fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".wiuppy"))
}
