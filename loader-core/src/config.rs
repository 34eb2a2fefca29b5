use std::{str::FromStr, time::Duration};

use reqwest::Url;

use crate::error::ConfigError;

pub const BUCKET_VAR: &str = "WEATHER_DATA_BUCKET_NAME";
pub const QUEUE_URL_VAR: &str = "WEATHER_DATA_SQS_QUEUE_URL";
pub const QUEUE_DELAY_VAR: &str = "WEATHER_DATA_SQS_DELAY_SECONDS";
pub const FAILURE_POLICY_VAR: &str = "INGEST_FAILURE_POLICY";
pub const API_ENDPOINT_VAR: &str = "WEATHER_API_ENDPOINT";
pub const API_KEY_VAR: &str = "WEATHER_API_KEY";

/// Delay applied to every queued message unless overridden.
pub const DEFAULT_QUEUE_DELAY_SECONDS: i32 = 10;
/// Upper bound SQS accepts for a per-message delay.
pub const MAX_QUEUE_DELAY_SECONDS: i32 = 900;
pub const LOOKUP_TIMEOUT: Duration = Duration::from_secs(20);

/// What ingestion does when a file or row fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Log and record the failure, carry on with the next row or file.
    #[default]
    Continue,
    /// Stop the batch at the first failure.
    Abort,
}

impl FailurePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailurePolicy::Continue => "continue",
            FailurePolicy::Abort => "abort",
        }
    }
}

impl std::fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "continue" => Ok(FailurePolicy::Continue),
            "abort" => Ok(FailurePolicy::Abort),
            _ => Err(format!(
                "unknown policy '{value}', expected 'continue' or 'abort'"
            )),
        }
    }
}

/// Settings for the ingestion pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestConfig {
    pub bucket: String,
    pub queue_url: String,
    pub queue_delay_seconds: i32,
    pub failure_policy: FailurePolicy,
}

impl IngestConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_source(env_var)
    }

    /// Build from any variable source; empty values count as missing.
    pub fn from_source<F>(source: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bucket = required(&source, BUCKET_VAR)?;
        let queue_url = required(&source, QUEUE_URL_VAR)?;

        let failure_policy = match optional(&source, FAILURE_POLICY_VAR) {
            Some(raw) => raw.parse().map_err(|reason| ConfigError::Invalid {
                var: FAILURE_POLICY_VAR,
                reason,
            })?,
            None => FailurePolicy::default(),
        };

        let queue_delay_seconds = match optional(&source, QUEUE_DELAY_VAR) {
            Some(raw) => parse_delay(&raw)?,
            None => DEFAULT_QUEUE_DELAY_SECONDS,
        };

        Ok(Self {
            bucket,
            queue_url,
            queue_delay_seconds,
            failure_policy,
        })
    }
}

/// Settings for the weather lookup client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupConfig {
    pub endpoint: Url,
    pub api_key: String,
    pub timeout: Duration,
}

impl LookupConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_source(env_var)
    }

    pub fn from_source<F>(source: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_endpoint = required(&source, API_ENDPOINT_VAR)?;
        let endpoint = Url::parse(&raw_endpoint).map_err(|e| ConfigError::Invalid {
            var: API_ENDPOINT_VAR,
            reason: e.to_string(),
        })?;
        let api_key = required(&source, API_KEY_VAR)?;

        Ok(Self {
            endpoint,
            api_key,
            timeout: LOOKUP_TIMEOUT,
        })
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

fn optional<F>(source: &F, var: &'static str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    source(var).filter(|v| !v.is_empty())
}

fn required<F>(source: &F, var: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    optional(source, var).ok_or(ConfigError::Missing(var))
}

fn parse_delay(raw: &str) -> Result<i32, ConfigError> {
    let delay: i32 = raw.parse().map_err(|_| ConfigError::Invalid {
        var: QUEUE_DELAY_VAR,
        reason: format!("'{raw}' is not a number"),
    })?;

    if !(0..=MAX_QUEUE_DELAY_SECONDS).contains(&delay) {
        return Err(ConfigError::Invalid {
            var: QUEUE_DELAY_VAR,
            reason: format!("{delay} is outside 0..={MAX_QUEUE_DELAY_SECONDS}"),
        });
    }

    Ok(delay)
}
