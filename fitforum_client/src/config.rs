use anyhow::{anyhow, Context, Result};
use std::env;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:5000";

#[derive(Debug, Clone)]
pub struct ForumConfig {
    pub api_base_url: String,
    pub auth_token: Option<String>,
    pub request_timeout: Duration,
    pub response_ordering: ResponseOrdering,
}

impl Default for ForumConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            auth_token: None,
            request_timeout: Duration::from_secs(15),
            response_ordering: ResponseOrdering::default(),
        }
    }
}

impl ForumConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|raw| !raw.trim().is_empty());

        let api_base_url = non_empty("FITFORUM_API_URL").unwrap_or(defaults.api_base_url);
        let auth_token = non_empty("FITFORUM_TOKEN");
        let request_timeout = match non_empty("FITFORUM_HTTP_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw
                    .trim()
                    .parse()
                    .with_context(|| format!("FITFORUM_HTTP_TIMEOUT_SECS is not a number: {raw}"))?;
                Duration::from_secs(secs)
            }
            None => defaults.request_timeout,
        };
        let response_ordering = match non_empty("FITFORUM_RESPONSE_ORDERING") {
            Some(raw) => raw.parse()?,
            None => defaults.response_ordering,
        };

        Ok(Self {
            api_base_url,
            auth_token,
            request_timeout,
            response_ordering,
        })
    }
}

/// How the reply store treats fetch responses that resolve out of order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseOrdering {
    /// Whatever resolves last is displayed, even if it was requested first.
    #[default]
    LastResolvedWins,
    /// Responses older than the most recently issued request are dropped.
    LatestIssuedWins,
}

impl FromStr for ResponseOrdering {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "last-resolved" | "last_resolved" => Ok(Self::LastResolvedWins),
            "latest-issued" | "latest_issued" => Ok(Self::LatestIssuedWins),
            other => Err(anyhow!(
                "unknown response ordering {other:?} (expected last-resolved or latest-issued)"
            )),
        }
    }
}
