use thiserror::Error;

/// Errors produced by the ingestion and enrichment pipelines.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Input that can never be processed, whatever the number of retries.
    #[error("{0}")]
    Validation(String),

    #[error("unable to read CSV content of '{key}': {source}")]
    Csv {
        key: String,
        #[source]
        source: csv::Error,
    },

    #[error("{0}")]
    Decode(#[from] serde_json::Error),

    #[error("unable to encode lookup request: {0}")]
    Encode(#[source] serde_json::Error),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Delivery(#[from] DeliveryError),

    #[error(transparent)]
    Lookup(#[from] LookupError),
}

impl PipelineError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// True for malformed input (poison records).
    pub fn is_poison(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::Csv { .. } | Self::Decode(_)
        )
    }
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("object '{key}' not found")]
    NotFound { key: String },

    #[error("unable to fetch object '{key}': {reason}")]
    Unavailable { key: String, reason: String },
}

#[derive(Debug, Error)]
#[error("unable to send message: {0}")]
pub struct DeliveryError(pub String);

#[derive(Debug, Error)]
pub enum LookupError {
    #[error(
        "api failed to respond with a 2xx status code, got: {status}. body: {}",
        truncate_body(.body)
    )]
    Status { status: u16, body: String },

    #[error("unable to query weather API: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unable to parse weather API response: {0}")]
    Malformed(#[from] serde_json::Error),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} not configured")]
    Missing(&'static str),

    #[error("{var} is invalid: {reason}")]
    Invalid { var: &'static str, reason: String },
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn json_error() -> serde_json::Error {
        serde_json::from_str::<u8>("x").unwrap_err()
    }

    #[test]
    fn status_error_message_carries_status_and_body() {
        let err = LookupError::Status {
            status: 401,
            body: String::new(),
        };
        assert_eq!(
            err.to_string(),
            "api failed to respond with a 2xx status code, got: 401. body: "
        );
    }

    #[test]
    fn long_bodies_are_truncated_in_display_only() {
        let body = "é".repeat(300);
        let err = LookupError::Status {
            status: 500,
            body: body.clone(),
        };

        let msg = err.to_string();
        assert!(msg.ends_with("..."));
        assert_eq!(msg.matches('é').count(), 200);

        let LookupError::Status { body: kept, .. } = err else {
            unreachable!()
        };
        assert_eq!(kept, body);
    }

    #[test]
    fn poison_classification() {
        assert!(PipelineError::validation("bad data provided").is_poison());
        assert!(PipelineError::Decode(json_error()).is_poison());
        let delivery = DeliveryError("down".into());
        assert!(!PipelineError::from(delivery).is_poison());

        let not_found = FetchError::NotFound {
            key: "a.csv".into(),
        };
        assert!(!PipelineError::from(not_found).is_poison());
    }

    #[test]
    fn encode_failure_is_not_poison() {
        let err = PipelineError::Encode(json_error());
        assert!(!err.is_poison());
        let msg = err.to_string();
        assert!(msg.starts_with("unable to encode lookup request: "));
    }
}
