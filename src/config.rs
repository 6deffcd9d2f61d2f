// Runtime configuration.
// Loaded from the process environment (and an optional .env file).

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{FolioError, Result};

pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const DEFAULT_EMAIL_API_URL: &str = "https://api.resend.com/emails";

#[derive(Clone, Debug)]
pub struct Config {
    /// GitHub login whose repositories are shown.
    pub account: String,
    /// Optional token; enables the owned-repos endpoint (private repositories).
    pub token: Option<String>,
    pub api_url: String,
    pub request_timeout: Duration,
    pub projects_ttl: Duration,
    pub commits_ttl: Duration,
    /// Concurrent enrichment width. `None` means sequential enrichment.
    pub batch_width: Option<usize>,
    /// Overrides the platform cache directory.
    pub cache_dir: Option<PathBuf>,
    /// Input to [`crate::contact::ContactRelay::new`]; the terminal front end has no contact form.
    pub contact: ContactConfig,
}

/// Settings for the contact relay.
#[derive(Clone, Debug)]
pub struct ContactConfig {
    /// Without a key, submissions are only logged.
    pub api_key: Option<String>,
    pub api_url: String,
    pub to: String,
    pub from: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from any variable source; `from_env` passes the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let account = non_empty(&lookup, "FOLIO_ACCOUNT")
            .or_else(|| non_empty(&lookup, "GITHUB_USERNAME"))
            .ok_or(FolioError::MissingEnv("FOLIO_ACCOUNT"))?;

        Ok(Config {
            account,
            token: non_empty(&lookup, "GITHUB_TOKEN"),
            api_url: non_empty(&lookup, "GITHUB_API_URL")
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            request_timeout: Duration::from_secs(parse_or(&lookup, "FOLIO_REQUEST_TIMEOUT_SECS", 10)),
            projects_ttl: minutes(parse_or(&lookup, "FOLIO_PROJECTS_TTL_MINS", 30)),
            commits_ttl: minutes(parse_or(&lookup, "FOLIO_COMMITS_TTL_MINS", 15)),
            batch_width: non_empty(&lookup, "FOLIO_BATCH_WIDTH")
                .and_then(|v| v.trim().parse().ok())
                .filter(|w| *w > 0),
            cache_dir: non_empty(&lookup, "FOLIO_CACHE_DIR").map(PathBuf::from),
            contact: ContactConfig::from_lookup(&lookup),
        })
    }
}

impl ContactConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        ContactConfig {
            api_key: non_empty(&lookup, "EMAIL_API_KEY"),
            api_url: non_empty(&lookup, "EMAIL_API_URL")
                .unwrap_or_else(|| DEFAULT_EMAIL_API_URL.to_string()),
            to: lookup("CONTACT_TO").unwrap_or_default(),
            from: non_empty(&lookup, "CONTACT_FROM")
                .unwrap_or_else(|| "Portfolio <onboarding@resend.dev>".to_string()),
        }
    }
}

fn non_empty(lookup: impl Fn(&str) -> Option<String>, name: &str) -> Option<String> {
    lookup(name).filter(|v| !v.trim().is_empty())
}

fn parse_or(lookup: impl Fn(&str) -> Option<String>, name: &str, default: u64) -> u64 {
    lookup(name)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn minutes(mins: u64) -> Duration {
    Duration::from_secs(mins.saturating_mul(60))
}
