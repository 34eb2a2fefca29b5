use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

/// Suffix an object key must carry to be picked up by ingestion.
pub const CSV_SUFFIX: &str = ".csv";

/// One "object created" notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEvent {
    pub key: String,
}

impl FileEvent {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    pub fn is_csv(&self) -> bool {
        self.key.ends_with(CSV_SUFFIX)
    }
}

/// Payload placed on the queue, one per CSV data row.
///
/// Missing fields decode as empty strings so that the caller reports a
/// validation error rather than a serde one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupRequest {
    #[serde(default)]
    pub lat: String,
    #[serde(default)]
    pub lon: String,
}

impl LookupRequest {
    pub fn new(lon: impl Into<String>, lat: impl Into<String>) -> Self {
        Self {
            lat: lat.into(),
            lon: lon.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LookupResponse {
    pub coord: Coordinates,
    pub main: Main,
    pub weather: Vec<Weather>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lon: f64,
    pub lat: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Main {
    pub temp: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub feels_like: f64,
    pub humidity: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Weather {
    pub id: i64,
    pub main: String,
    pub description: String,
    pub icon: String,
}

/// What the enrichment pipeline reports for one message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherReport {
    pub lon: String,
    pub lat: String,
    pub description: String,
    pub temperature: f64,
}

/// One message handed to the enrichment pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueMessage {
    pub message_id: String,
    pub body: String,
}

/// Outcome of one ingestion run.
///
/// `message_ids` are in file-then-row order. `failures` holds every failure
/// seen, in order, whether or not the run carried on past it.
#[derive(Debug, Default)]
pub struct BatchResult {
    pub message_ids: Vec<String>,
    pub failures: Vec<PipelineError>,
}

impl BatchResult {
    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// First failure of the run.
    pub fn error(&self) -> Option<&PipelineError> {
        self.failures.first()
    }

    /// True when at least one failure was not a poison record.
    pub fn has_transient_failure(&self) -> bool {
        self.failures.iter().any(|err| !err.is_poison())
    }

    pub(crate) fn record_failure(&mut self, err: PipelineError) {
        self.failures.push(err);
    }

    /// Fails with the first failure of any kind.
    pub fn into_result(mut self) -> Result<Vec<String>, PipelineError> {
        if self.failures.is_empty() {
            Ok(self.message_ids)
        } else {
            Err(self.failures.swap_remove(0))
        }
    }

    /// Fails with the first transient failure only; poison records are
    /// dropped, since redelivering the event cannot fix them.
    pub fn into_retry_result(self) -> Result<Vec<String>, PipelineError> {
        match self.failures.into_iter().find(|err| !err.is_poison()) {
            Some(err) => Err(err),
            None => Ok(self.message_ids),
        }
    }
}
