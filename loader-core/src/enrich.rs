//! Enrichment pipeline: queued lookup requests to weather reports.
//!
//! Unlike ingestion, the first failing message aborts the batch; the queue
//! redelivers the whole batch and dead-letters it once retries run out.

use std::sync::Arc;

use tracing::{error, info, instrument};

use crate::{
    error::PipelineError,
    lookup::LookupClient,
    model::{QueueMessage, WeatherReport},
    transform::decode_request,
};

pub struct EnrichProcessor {
    client: Arc<dyn LookupClient>,
}

impl EnrichProcessor {
    pub fn new(client: Arc<dyn LookupClient>) -> Self {
        Self { client }
    }

    /// Decode one payload, look up its coordinates and report the first
    /// weather descriptor with the current temperature.
    pub async fn process(&self, body: &str) -> Result<WeatherReport, PipelineError> {
        let request = decode_request(body)?;

        let lookup = self.client.lookup(&request.lon, &request.lat).await;
        let response = lookup.inspect_err(|err| {
            error!(error = %err, "unable to query weather API");
        })?;

        let descriptor = response.weather.first().ok_or_else(|| {
            PipelineError::validation("lookup response contained no weather descriptors")
        })?;

        let report = WeatherReport {
            lon: request.lon,
            lat: request.lat,
            description: descriptor.description.clone(),
            temperature: response.main.temp,
        };

        info!(
            lon = %report.lon,
            lat = %report.lat,
            description = %report.description,
            temp = report.temperature,
            "weather data retrieved"
        );
        Ok(report)
    }

    /// Process messages in order; returns the ids of all messages once every
    /// one succeeded, or the first failure.
    #[instrument(skip_all, fields(records = messages.len()))]
    pub async fn process_batch(
        &self,
        messages: &[QueueMessage],
    ) -> Result<Vec<String>, PipelineError> {
        let mut processed = Vec::with_capacity(messages.len());

        for message in messages {
            if let Err(err) = self.process(&message.body).await {
                error!(message_id = %message.message_id, error = %err, "unable to process message");
                return Err(err);
            }
            processed.push(message.message_id.clone());
        }

        info!(count = processed.len(), "weather requests processed");
        Ok(processed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::LookupError,
        model::{Coordinates, LookupResponse, Main, Weather},
    };
    use async_trait::async_trait;
    use std::sync::Mutex;

    fn weather(description: &str) -> Weather {
        Weather {
            id: 1,
            main: "main".to_string(),
            description: description.to_string(),
            icon: "icon".to_string(),
        }
    }

    fn response(descriptors: Vec<Weather>) -> LookupResponse {
        LookupResponse {
            coord: Coordinates { lon: 1.0, lat: 2.0 },
            main: Main {
                temp: 20.5,
                temp_min: 10.0,
                temp_max: 30.0,
                feels_like: 25.0,
                humidity: 90,
            },
            weather: descriptors,
        }
    }

    /// Answers every lookup with a canned result and records the coordinates.
    struct FakeLookup {
        outcome: fn() -> Result<LookupResponse, LookupError>,
        calls: Mutex<Vec<(String, String)>>,
    }

    impl FakeLookup {
        fn new(outcome: fn() -> Result<LookupResponse, LookupError>) -> Arc<Self> {
            Arc::new(Self {
                outcome,
                calls: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> Vec<(String, String)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl LookupClient for FakeLookup {
        async fn lookup(&self, lon: &str, lat: &str) -> Result<LookupResponse, LookupError> {
            let mut calls = self.calls.lock().unwrap();
            calls.push((lon.to_string(), lat.to_string()));
            (self.outcome)()
        }
    }

    fn good() -> Result<LookupResponse, LookupError> {
        Ok(response(vec![weather("warm"), weather("windy")]))
    }

    fn rate_limited() -> Result<LookupResponse, LookupError> {
        Err(LookupError::Status {
            status: 429,
            body: "rate limit exceeded".to_string(),
        })
    }

    fn message(id: &str, body: &str) -> QueueMessage {
        QueueMessage {
            message_id: id.to_string(),
            body: body.to_string(),
        }
    }

    #[tokio::test]
    async fn report_uses_first_descriptor_and_temperature() {
        let lookup = FakeLookup::new(good);
        let report = EnrichProcessor::new(lookup.clone())
            .process(r#"{"lat": "2", "lon": "1"}"#)
            .await
            .expect("message should be processed");

        assert_eq!(report.description, "warm");
        assert_eq!(report.temperature, 20.5);
        assert_eq!(lookup.calls(), vec![("1".to_string(), "2".to_string())]);
    }

    #[tokio::test]
    async fn missing_coordinate_is_rejected_before_lookup() {
        let lookup = FakeLookup::new(good);
        let err = EnrichProcessor::new(lookup.clone())
            .process(r#"{"lat": "123"}"#)
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "invalid message, lon/lat required");
        assert!(lookup.calls().is_empty());
    }

    #[tokio::test]
    async fn malformed_message_is_a_decode_error() {
        let lookup = FakeLookup::new(good);
        let err = EnrichProcessor::new(lookup)
            .process(r#"{"lat": "123}"#)
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::Decode(_)));
    }

    #[tokio::test]
    async fn lookup_failure_is_propagated() {
        let err = EnrichProcessor::new(FakeLookup::new(rate_limited))
            .process(r#"{"lat": "123", "lon": "123"}"#)
            .await
            .unwrap_err();

        let PipelineError::Lookup(LookupError::Status { status, .. }) = &err else {
            panic!("unexpected error: {err}");
        };
        assert_eq!(*status, 429);
        assert!(err.to_string().contains("rate limit exceeded"));
    }

    #[tokio::test]
    async fn empty_descriptor_list_is_a_validation_error() {
        let err = EnrichProcessor::new(FakeLookup::new(|| Ok(response(Vec::new()))))
            .process(r#"{"lat": "1", "lon": "2"}"#)
            .await
            .unwrap_err();

        assert!(err.is_poison());
        assert_eq!(
            err.to_string(),
            "lookup response contained no weather descriptors"
        );
    }

    #[tokio::test]
    async fn batch_returns_processed_ids_in_order() {
        let lookup = FakeLookup::new(good);
        let ids = EnrichProcessor::new(lookup.clone())
            .process_batch(&[
                message("m1", r#"{"lat":"2","lon":"1"}"#),
                message("m2", r#"{"lat":"4","lon":"3"}"#),
            ])
            .await
            .unwrap();

        assert_eq!(ids, vec!["m1", "m2"]);
        assert_eq!(lookup.calls().len(), 2);
    }

    #[tokio::test]
    async fn batch_stops_at_first_failure() {
        let lookup = FakeLookup::new(good);
        let err = EnrichProcessor::new(lookup.clone())
            .process_batch(&[
                message("m1", r#"{"lat":"2","lon":"1"}"#),
                message("m2", "not json"),
                message("m3", r#"{"lat":"4","lon":"3"}"#),
            ])
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::Decode(_)));
        assert_eq!(lookup.calls(), vec![("1".to_string(), "2".to_string())]);
    }

    #[tokio::test]
    async fn empty_batch_is_ok() {
        let ids = EnrichProcessor::new(FakeLookup::new(good))
            .process_batch(&[])
            .await
            .unwrap();
        assert!(ids.is_empty());
    }
}
